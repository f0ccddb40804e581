//! Full renderer lifecycle: populate, run, read while rendering, stop.

use std::thread;
use std::time::{Duration, Instant};

use glint_renderer::{Light, Material, Quad, RenderConfig, RenderError, Renderer, Sphere, Vec3};

fn wait_for_samples(renderer: &Renderer, target: u64) {
    let deadline = Instant::now() + Duration::from_secs(30);
    while renderer.samples_taken() < target {
        assert!(Instant::now() < deadline, "render made no progress");
        thread::sleep(Duration::from_millis(1));
    }
}

#[test]
fn render_converges_while_being_read() {
    let _ = env_logger::builder().is_test(true).try_init();

    let config = RenderConfig {
        width: 32,
        height: 32,
        workers: 4,
        seed: Some(2024),
        ..RenderConfig::default()
    };
    let background = config.background;
    let mut renderer = Renderer::new(config).unwrap();

    renderer
        .add_essence(Sphere::new(Vec3::new(0.0, 0.0, 10.0), 2.0, Material::default()))
        .unwrap();
    renderer
        .add_essence(
            Quad::square(Vec3::new(0.0, -2.5, 10.0), Vec3::Z, Vec3::X, 5.0, Material::mirror()).unwrap(),
        )
        .unwrap();
    renderer.add_light(Light::new(Vec3::new(5.0, 5.0, 0.0), 50.0)).unwrap();
    renderer.run().unwrap();
    assert!(renderer.is_running());

    // Read the live buffer the way a display would, while workers write to it
    let pixels = renderer.pixels();
    for _ in 0..10 {
        let frame = pixels.to_rgba_f32();
        assert_eq!(frame.len(), 32 * 32);
        thread::sleep(Duration::from_millis(2));
    }

    wait_for_samples(&renderer, 20_000);
    renderer.shutdown();
    renderer.join().unwrap();
    assert!(!renderer.is_running());

    // Every sample landed in exactly one pixel
    assert_eq!(pixels.total_samples(), renderer.samples_taken());

    // The top-left corner looks past everything and sees only background
    let corner = pixels.pixel(0, 0).unwrap();
    if corner.count > 0 {
        assert!((corner.color.g - background.g).abs() < 1e-4);
        assert!((corner.color.b - background.b).abs() < 1e-4);
    }

    // The image centre shows the sphere, not the background
    let centre = pixels.pixel(16, 16).unwrap();
    assert!(centre.count > 0);
    assert!(centre.color != background);

    for color in pixels.snapshot() {
        assert!(color.is_finite());
        assert!(color.r <= 1.0 && color.g <= 1.0 && color.b <= 1.0);
    }
}

#[test]
fn stopped_render_can_resume() {
    let config = RenderConfig {
        width: 8,
        height: 8,
        workers: 2,
        seed: Some(5),
        ..RenderConfig::default()
    };
    let mut renderer = Renderer::new(config).unwrap();
    renderer.add_light(Light::new(Vec3::ZERO, 1.0)).unwrap();

    renderer.run().unwrap();
    wait_for_samples(&renderer, 100);
    renderer.join().unwrap();
    let first = renderer.samples_taken();

    renderer.run().unwrap();
    wait_for_samples(&renderer, first + 100);
    renderer.join().unwrap();

    // The resumed pool keeps folding into the same buffer
    let pixels = renderer.pixels();
    assert_eq!(pixels.total_samples(), renderer.samples_taken());
    assert!(renderer.samples_taken() >= first + 100);
}

#[test]
fn zero_sized_render_is_rejected() {
    let config = RenderConfig {
        height: 0,
        ..RenderConfig::default()
    };
    assert!(matches!(Renderer::new(config), Err(RenderError::InvalidDimensions { .. })));
}
