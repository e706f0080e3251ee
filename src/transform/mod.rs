//! Staged model-view-projection transforms.
//!
//! Each stage ([`Translate`], [`Rotate`], [`Scale`], [`Viewer`],
//! [`Projection`]) converts its parameters into a 4x4 matrix on demand and
//! memoizes the result until the parameters actually change. [`Mvp`] composes
//! one of each into the final matrix handed to the shader, with its own
//! per-half caches so that dragging the model never recomputes the camera
//! side of the pipeline (and vice versa).

mod mvp;
mod projection;
mod rotate;
mod scale;
mod translate;
mod viewer;

pub use mvp::Mvp;
pub use projection::{FrustumParams, Projection, ProjectionMode};
pub use rotate::Rotate;
pub use scale::Scale;
pub use translate::Translate;
pub use viewer::Viewer;

use glam::Mat4;

/// A stage that produces a transform matrix from its current parameters.
pub trait Transform {
    fn matrix(&self) -> Mat4;
}
