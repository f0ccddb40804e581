//! Headless viewer for the Glint renderer.
//!
//! Stands in for a windowed display: it polls the live pixel buffer at a
//! fixed frame rate, logs progress, and saves the final image as a PNG.

mod scene;

use std::path::PathBuf;
use std::thread;
use std::time::{Duration, Instant};

use anyhow::{Context, Result};
use clap::Parser;
use glint_renderer::{RenderConfig, Renderer};
use rand::rngs::StdRng;
use rand::SeedableRng;

const FRAME_TIME: Duration = Duration::from_millis(16);

/// Render the demo scene headlessly and save the result.
#[derive(Parser, Debug)]
#[command(name = "glint_viewer", version, about)]
struct Args {
    /// JSON render settings; defaults are used when omitted
    #[arg(value_name = "CONFIG")]
    config: Option<PathBuf>,

    /// How long to keep rendering
    #[arg(long, default_value_t = 5.0)]
    seconds: f32,

    /// Where to write the final image
    #[arg(long, default_value = "output.png")]
    output: PathBuf,

    /// Pixel to report once a second; the image centre by default
    #[arg(long, num_args = 2, value_names = ["X", "Y"])]
    probe: Option<Vec<u32>>,
}

impl Args {
    fn probe(&self, width: u32, height: u32) -> (u32, u32) {
        match self.probe.as_deref() {
            Some([x, y]) => (*x, *y),
            _ => (width / 2, height / 2),
        }
    }
}

fn load_config(path: Option<&PathBuf>) -> Result<RenderConfig> {
    let Some(path) = path else {
        return Ok(RenderConfig::default());
    };
    let text = std::fs::read_to_string(path)
        .with_context(|| format!("reading settings from {}", path.display()))?;
    serde_json::from_str(&text).with_context(|| format!("parsing settings in {}", path.display()))
}

fn main() -> Result<()> {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();

    let args = Args::parse();
    let config = load_config(args.config.as_ref())?;
    let (width, height) = (config.width, config.height);

    // Pin the seed so the demo materials and the sampling share one run id
    let seed = config.seed.unwrap_or_else(rand::random);
    let config = RenderConfig {
        seed: Some(seed),
        ..config
    };
    let scene = scene::build_scene(&mut StdRng::seed_from_u64(seed))?;
    let mut renderer = Renderer::with_scene(config, scene)?;

    renderer.run()?;
    let pixels = renderer.pixels();
    let probe = args.probe(width, height);

    let start = Instant::now();
    let mut frames = 0u64;
    let mut last_report = start;
    let run_for = Duration::from_secs_f32(args.seconds);

    while start.elapsed() < run_for {
        // What a display would upload as a float texture each frame
        let frame = pixels.to_rgba_f32();
        let _texture: &[u8] = bytemuck::cast_slice(&frame);
        frames += 1;

        if last_report.elapsed() >= Duration::from_secs(1) {
            let samples = renderer.samples_taken();
            log::info!(
                "{:.1}s: {} samples ({:.2} per pixel), {} frames",
                start.elapsed().as_secs_f32(),
                samples,
                samples as f64 / (width as f64 * height as f64),
                frames
            );
            if let Some(text) = pixels.describe_pixel(probe.0, probe.1) {
                log::info!("Probe {}", text);
            }
            last_report = Instant::now();
        }

        renderer.status()?;
        thread::sleep(FRAME_TIME);
    }

    renderer.join()?;

    let image = image::RgbaImage::from_raw(width, height, pixels.to_rgba8())
        .context("pixel buffer does not match image size")?;
    image
        .save(&args.output)
        .with_context(|| format!("saving {}", args.output.display()))?;
    log::info!("Saved {} ({} samples)", args.output.display(), renderer.samples_taken());

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_args() {
        let args = Args::try_parse_from(["glint_viewer"]).unwrap();
        assert!(args.config.is_none());
        assert_eq!(args.seconds, 5.0);
        assert_eq!(args.output, PathBuf::from("output.png"));
        assert_eq!(args.probe(64, 32), (32, 16));
    }

    #[test]
    fn test_full_args() {
        let args = Args::try_parse_from([
            "glint_viewer",
            "scene.json",
            "--seconds",
            "1.5",
            "--output",
            "out.png",
            "--probe",
            "3",
            "7",
        ])
        .unwrap();
        assert_eq!(args.config, Some(PathBuf::from("scene.json")));
        assert_eq!(args.seconds, 1.5);
        assert_eq!(args.output, PathBuf::from("out.png"));
        assert_eq!(args.probe(64, 32), (3, 7));
    }

    #[test]
    fn test_probe_needs_two_values() {
        assert!(Args::try_parse_from(["glint_viewer", "--probe", "3"]).is_err());
        assert!(Args::try_parse_from(["glint_viewer", "--seconds", "soon"]).is_err());
    }
}
