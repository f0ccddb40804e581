//! Error types for the renderer.

use glint_math::MathError;
use thiserror::Error;

/// Errors that can occur while setting up or running a render.
#[derive(Error, Debug)]
pub enum RenderError {
    #[error("invalid image dimensions {width}x{height}")]
    InvalidDimensions { width: u32, height: u32 },

    #[error("a render needs at least one worker")]
    NoWorkers,

    #[error("render is already running")]
    AlreadyRunning,

    #[error("scene cannot be modified while workers are tracing it")]
    SceneLocked,

    #[error("quad vertices do not span a plane")]
    DegenerateQuad,

    #[error("worker {worker} panicked: {message}")]
    WorkerPanicked { worker: usize, message: String },

    #[error("failed to spawn worker thread: {0}")]
    Spawn(#[from] std::io::Error),

    #[error(transparent)]
    Math(#[from] MathError),
}

/// Convenience result type for renderer operations.
pub type RenderResult<T> = Result<T, RenderError>;
