//! Glint renderer - progressive Whitted ray tracing.
//!
//! Spheres and planar quads lit by point lights, shaded with diffuse,
//! specular and recursive mirror reflection. A pool of worker threads keeps
//! sampling random pixels and folding the results into a running mean per
//! pixel, so the image sharpens for as long as the render runs while a
//! display reads the buffer at its own pace.

mod camera;
mod color;
mod error;
mod essence;
mod light;
mod material;
mod pixel;
mod renderer;
mod scene;
mod shader;
mod worker;

pub use camera::Camera;
pub use color::Color;
pub use error::{RenderError, RenderResult};
pub use essence::{Essence, Quad, Sphere};
pub use light::Light;
pub use material::Material;
pub use pixel::{color_to_rgba, PixelBuffer, PixelEntity, Rgba};
pub use renderer::{RenderConfig, Renderer};
pub use scene::{Scene, SceneIntersectResult};
pub use shader::{DirectLight, Shader};

/// Re-export Vec3 and the ray type from glint_math
pub use glint_math::{Ray, Vec3};
