//! Progressive renderer facade.
//!
//! Owns the scene, the pixel buffer and the worker pool. The lifecycle is:
//! construct, populate the scene, [`Renderer::run`], read the buffer as
//! often as needed, then [`Renderer::shutdown`] or [`Renderer::join`].
//! Dropping a renderer cancels its workers without waiting for them.

use std::sync::atomic::{AtomicBool, AtomicU64, Ordering};
use std::sync::{Arc, Mutex, MutexGuard};

use serde::{Deserialize, Serialize};

use crate::worker::{FailureSlot, WorkerContext, WorkerPool};
use crate::{Camera, Color, Essence, Light, PixelBuffer, RenderError, RenderResult, Scene, Shader};

/// Render configuration.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct RenderConfig {
    pub width: u32,
    pub height: u32,
    /// Number of sampling threads
    pub workers: usize,
    /// Maximum reflection bounce depth
    pub max_depth: u32,
    /// Horizontal field of view of the pinhole camera, in degrees
    pub fov_degrees: f32,
    /// Background color when a ray doesn't hit anything
    pub background: Color,
    /// Offset for shadow and reflection ray origins
    pub epsilon: f32,
    /// Base RNG seed; drawn from entropy when absent
    pub seed: Option<u64>,
}

impl Default for RenderConfig {
    fn default() -> Self {
        Self {
            width: 512,
            height: 512,
            workers: 4,
            max_depth: 5,
            fov_degrees: 60.0,
            background: Color::new(0.0, 0.6, 0.9),
            epsilon: 1e-3,
            seed: None,
        }
    }
}

impl RenderConfig {
    pub fn shader(&self) -> Shader {
        Shader {
            background: self.background,
            max_depth: self.max_depth,
            epsilon: self.epsilon,
        }
    }

    pub fn camera(&self) -> Camera {
        Camera::new(self.width, self.height, self.fov_degrees)
    }
}

/// Multi-threaded progressive ray tracer.
pub struct Renderer {
    config: RenderConfig,
    seed: u64,
    scene: Arc<Scene>,
    pixels: Arc<PixelBuffer>,
    samples: Arc<AtomicU64>,
    failure: FailureSlot,
    pool: Option<WorkerPool>,
    /// Pools started so far; each one samples from its own seed stream
    runs: u64,
}

impl Renderer {
    /// Create a renderer with an empty scene and a black buffer.
    pub fn new(config: RenderConfig) -> RenderResult<Self> {
        Self::with_scene(config, Scene::new())
    }

    pub fn with_scene(config: RenderConfig, scene: Scene) -> RenderResult<Self> {
        if config.width == 0 || config.height == 0 {
            return Err(RenderError::InvalidDimensions {
                width: config.width,
                height: config.height,
            });
        }
        if config.workers == 0 {
            return Err(RenderError::NoWorkers);
        }

        let seed = config.seed.unwrap_or_else(rand::random);
        log::info!(
            "Renderer created: {}x{}, {} workers, seed {}",
            config.width,
            config.height,
            config.workers,
            seed
        );

        Ok(Self {
            pixels: Arc::new(PixelBuffer::new(config.width, config.height)),
            scene: Arc::new(scene),
            samples: Arc::new(AtomicU64::new(0)),
            failure: Arc::new(Mutex::new(None)),
            pool: None,
            runs: 0,
            seed,
            config,
        })
    }

    pub fn config(&self) -> &RenderConfig {
        &self.config
    }

    /// The seed actually in use, for reproducing a run.
    pub fn seed(&self) -> u64 {
        self.seed
    }

    pub fn scene(&self) -> &Scene {
        &self.scene
    }

    /// Mutable access to the scene, refused while workers hold it.
    fn scene_mut(&mut self) -> RenderResult<&mut Scene> {
        Arc::get_mut(&mut self.scene).ok_or(RenderError::SceneLocked)
    }

    pub fn add_light(&mut self, light: Light) -> RenderResult<()> {
        self.scene_mut()?.add_light(light);
        Ok(())
    }

    pub fn add_essence(&mut self, essence: impl Into<Essence>) -> RenderResult<()> {
        self.scene_mut()?.add_essence(essence);
        Ok(())
    }

    /// Start the worker pool and return immediately.
    ///
    /// Fails if a pool from an earlier call is still alive. A render that
    /// has been joined can be started again and keeps accumulating into the
    /// same buffer with fresh samples. Starting again also clears a worker
    /// failure recorded by the previous pool.
    pub fn run(&mut self) -> RenderResult<()> {
        if self.pool.is_some() {
            return Err(RenderError::AlreadyRunning);
        }
        if self.scene.is_empty() {
            log::warn!("Starting render of an empty scene");
        }

        if let Some((worker, message)) = self.lock_failure().take() {
            log::info!("Restarting after worker {} panicked: {}", worker, message);
        }

        let ctx = WorkerContext {
            scene: Arc::clone(&self.scene),
            pixels: Arc::clone(&self.pixels),
            camera: self.config.camera(),
            shader: self.config.shader(),
            cancel: Arc::new(AtomicBool::new(false)),
            samples: Arc::clone(&self.samples),
            failure: Arc::clone(&self.failure),
        };
        let pool = WorkerPool::spawn(self.config.workers, self.pool_seed(), ctx)?;
        self.runs += 1;

        log::info!(
            "Rendering {}x{} with {} workers ({} essences, {} lights)",
            self.config.width,
            self.config.height,
            pool.len(),
            self.scene.essences().len(),
            self.scene.lights().len()
        );
        self.pool = Some(pool);
        Ok(())
    }

    /// The live pixel buffer. Workers keep writing to it while it is read.
    pub fn pixels(&self) -> Arc<PixelBuffer> {
        Arc::clone(&self.pixels)
    }

    /// Total samples traced across all workers so far.
    pub fn samples_taken(&self) -> u64 {
        self.samples.load(Ordering::Relaxed)
    }

    /// True while at least one worker is still sampling.
    pub fn is_running(&self) -> bool {
        self.pool.as_ref().is_some_and(|pool| !pool.is_finished())
    }

    /// Base seed for the next pool. The first run uses the configured seed
    /// unchanged; later runs move to a disjoint stream so a resumed render
    /// does not retrace the samples it already took.
    fn pool_seed(&self) -> u64 {
        self.seed ^ (self.runs << 32)
    }

    fn lock_failure(&self) -> MutexGuard<'_, Option<(usize, String)>> {
        self.failure.lock().unwrap_or_else(|poisoned| poisoned.into_inner())
    }

    /// `Err` if a worker of the current or last pool has panicked. The panic
    /// also stops the render.
    pub fn status(&self) -> RenderResult<()> {
        match self.lock_failure().as_ref() {
            Some((worker, message)) => Err(RenderError::WorkerPanicked {
                worker: *worker,
                message: message.clone(),
            }),
            None => Ok(()),
        }
    }

    /// Signal the workers to stop after their current sample. Does not wait.
    pub fn shutdown(&self) {
        if let Some(pool) = &self.pool {
            log::info!("Stopping render after {} samples", self.samples_taken());
            pool.cancel();
        }
    }

    /// Stop the workers and wait for all of them to exit.
    pub fn join(&mut self) -> RenderResult<()> {
        if let Some(pool) = self.pool.take() {
            pool.join();
            log::info!("Render stopped after {} samples", self.samples_taken());
        }
        self.status()
    }
}

impl Drop for Renderer {
    fn drop(&mut self) {
        if let Some(pool) = &self.pool {
            pool.cancel();
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{Material, Sphere};
    use glam::Vec3;

    fn small_config() -> RenderConfig {
        RenderConfig {
            width: 16,
            height: 16,
            workers: 2,
            seed: Some(1),
            ..RenderConfig::default()
        }
    }

    #[test]
    fn test_invalid_config() {
        let zero = RenderConfig {
            width: 0,
            ..small_config()
        };
        assert!(matches!(
            Renderer::new(zero),
            Err(RenderError::InvalidDimensions { width: 0, height: 16 })
        ));

        let idle = RenderConfig {
            workers: 0,
            ..small_config()
        };
        assert!(matches!(Renderer::new(idle), Err(RenderError::NoWorkers)));
    }

    #[test]
    fn test_fresh_buffer_is_black() {
        let renderer = Renderer::new(small_config()).unwrap();
        let pixels = renderer.pixels();
        assert_eq!(pixels.width(), 16);
        assert_eq!(pixels.height(), 16);
        assert!(pixels.snapshot().iter().all(|c| *c == Color::BLACK));
        assert_eq!(renderer.samples_taken(), 0);
        assert!(!renderer.is_running());
    }

    #[test]
    fn test_scene_locked_while_running() {
        let mut renderer = Renderer::new(small_config()).unwrap();
        renderer
            .add_essence(Sphere::new(Vec3::new(0.0, 0.0, 10.0), 2.0, Material::default()))
            .unwrap();
        renderer.run().unwrap();

        assert!(matches!(
            renderer.add_light(Light::new(Vec3::ZERO, 1.0)),
            Err(RenderError::SceneLocked)
        ));
        assert!(matches!(renderer.run(), Err(RenderError::AlreadyRunning)));

        renderer.join().unwrap();
        assert!(!renderer.is_running());
        renderer.add_light(Light::new(Vec3::ZERO, 1.0)).unwrap();
        assert_eq!(renderer.scene().lights().len(), 1);
    }

    #[test]
    fn test_config_from_json() {
        let config: RenderConfig = serde_json::from_str(r#"{ "width": 320, "seed": 7 }"#).unwrap();
        assert_eq!(config.width, 320);
        assert_eq!(config.height, 512);
        assert_eq!(config.seed, Some(7));
        assert_eq!(config.background, Color::new(0.0, 0.6, 0.9));

        let round = serde_json::to_string(&config).unwrap();
        assert_eq!(serde_json::from_str::<RenderConfig>(&round).unwrap(), config);
    }

    #[test]
    fn test_each_run_gets_its_own_seed() {
        let mut renderer = Renderer::new(small_config()).unwrap();
        let first = renderer.pool_seed();
        assert_eq!(first, 1);

        renderer.run().unwrap();
        renderer.join().unwrap();
        let second = renderer.pool_seed();
        assert_ne!(first, second);

        renderer.run().unwrap();
        renderer.join().unwrap();
        let third = renderer.pool_seed();
        assert!(third != first && third != second);
    }

    #[test]
    fn test_restart_clears_worker_failure() {
        let mut renderer = Renderer::new(small_config()).unwrap();
        renderer
            .add_essence(Sphere::new(Vec3::new(0.0, 0.0, 10.0), 2.0, Material::default()))
            .unwrap();

        // A zero-width camera makes every worker panic on its first pixel pick
        renderer.config.width = 0;
        renderer.run().unwrap();
        while renderer.is_running() {
            std::thread::yield_now();
        }
        assert!(matches!(renderer.status(), Err(RenderError::WorkerPanicked { .. })));
        assert!(matches!(renderer.join(), Err(RenderError::WorkerPanicked { .. })));

        renderer.config.width = 16;
        renderer.run().unwrap();
        assert!(renderer.status().is_ok());
        while renderer.samples_taken() < 100 {
            std::thread::yield_now();
        }
        assert!(renderer.join().is_ok());
        assert!(renderer.status().is_ok());
    }

    #[test]
    fn test_seed_is_reported() {
        let renderer = Renderer::new(small_config()).unwrap();
        assert_eq!(renderer.seed(), 1);
    }
}
