//! Sampling workers.
//!
//! Each worker owns a seeded RNG and loops until cancelled: pick a pixel
//! uniformly at random, trace one jittered primary ray through it, and fold
//! the result into the shared buffer. Random pixel order keeps a partial
//! render evenly noisy instead of half finished.

use std::any::Any;
use std::panic::{self, AssertUnwindSafe};
use std::sync::atomic::{AtomicBool, AtomicU64, Ordering};
use std::sync::{Arc, Mutex};
use std::thread::{self, JoinHandle};

use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};

use crate::{Camera, PixelBuffer, RenderResult, Scene, Shader};

/// The first worker panic of a render, as (worker index, message).
pub(crate) type FailureSlot = Arc<Mutex<Option<(usize, String)>>>;

/// Everything a worker reads or writes, shared across the pool.
#[derive(Clone)]
pub(crate) struct WorkerContext {
    pub scene: Arc<Scene>,
    pub pixels: Arc<PixelBuffer>,
    pub camera: Camera,
    pub shader: Shader,
    pub cancel: Arc<AtomicBool>,
    pub samples: Arc<AtomicU64>,
    pub failure: FailureSlot,
}

struct Worker {
    index: usize,
    ctx: WorkerContext,
    rng: StdRng,
}

impl Worker {
    fn new(index: usize, seed: u64, ctx: WorkerContext) -> Self {
        Self {
            index,
            ctx,
            rng: StdRng::seed_from_u64(seed.wrapping_add(index as u64)),
        }
    }

    /// Trace one sample through a random pixel.
    fn sample_once(&mut self) {
        let camera = &self.ctx.camera;
        let x = self.rng.gen_range(0..camera.width);
        let y = self.rng.gen_range(0..camera.height);
        let ray = camera.get_ray(x, y, &mut self.rng);
        let color = self.ctx.shader.cast_ray(&self.ctx.scene, &ray, 0);
        self.ctx.pixels.accumulate(x, y, color);
        self.ctx.samples.fetch_add(1, Ordering::Relaxed);
    }

    fn run(mut self) {
        let index = self.index;
        let ctx = self.ctx.clone();
        run_guarded(index, &ctx, || self.sample_once());
    }
}

/// Call `step` until cancelled. A panic inside `step` is recorded in the
/// failure slot and cancels every other worker of the pool.
fn run_guarded(index: usize, ctx: &WorkerContext, mut step: impl FnMut()) {
    log::debug!("Worker {} started", index);
    let mut taken = 0u64;

    while !ctx.cancel.load(Ordering::Acquire) {
        if let Err(payload) = panic::catch_unwind(AssertUnwindSafe(&mut step)) {
            let message = panic_message(payload.as_ref());
            log::error!("Worker {} panicked after {} samples: {}", index, taken, message);

            let mut failure = ctx.failure.lock().unwrap_or_else(|poisoned| poisoned.into_inner());
            failure.get_or_insert((index, message));
            ctx.cancel.store(true, Ordering::Release);
            return;
        }
        taken += 1;
    }

    log::debug!("Worker {} stopped after {} samples", index, taken);
}

fn panic_message(payload: &(dyn Any + Send)) -> String {
    if let Some(s) = payload.downcast_ref::<&str>() {
        (*s).to_string()
    } else if let Some(s) = payload.downcast_ref::<String>() {
        s.clone()
    } else {
        "unknown panic".to_string()
    }
}

/// A running set of workers sharing one cancellation flag.
pub(crate) struct WorkerPool {
    handles: Vec<JoinHandle<()>>,
    cancel: Arc<AtomicBool>,
}

impl WorkerPool {
    /// Start `count` workers. If the OS refuses a thread, the workers that
    /// did start are cancelled and the error is returned.
    pub fn spawn(count: usize, seed: u64, ctx: WorkerContext) -> RenderResult<Self> {
        let cancel = Arc::clone(&ctx.cancel);
        let mut handles = Vec::with_capacity(count);

        for index in 0..count {
            let worker = Worker::new(index, seed, ctx.clone());
            let spawned = thread::Builder::new()
                .name(format!("glint-worker-{index}"))
                .spawn(move || worker.run());

            match spawned {
                Ok(handle) => handles.push(handle),
                Err(err) => {
                    cancel.store(true, Ordering::Release);
                    for handle in handles {
                        let _ = handle.join();
                    }
                    return Err(err.into());
                }
            }
        }

        Ok(Self { handles, cancel })
    }

    /// Ask every worker to stop after its current sample. Does not wait.
    pub fn cancel(&self) {
        self.cancel.store(true, Ordering::Release);
    }

    /// True once every worker has exited.
    pub fn is_finished(&self) -> bool {
        self.handles.iter().all(|handle| handle.is_finished())
    }

    pub fn len(&self) -> usize {
        self.handles.len()
    }

    /// Cancel and wait for every worker to exit.
    pub fn join(self) {
        self.cancel();
        for handle in self.handles {
            // Panics are caught inside the loop, so join only fails if the
            // logging itself panicked
            if handle.join().is_err() {
                log::warn!("Worker thread exited abnormally");
            }
        }
    }
}
