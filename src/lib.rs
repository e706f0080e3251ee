//! # objview
//!
//! **A small interactive Wavefront OBJ model viewer.**
//!
//! Point it at a directory of `.obj` files and walk through them with the
//! keyboard while dragging the model, camera, and lights around with the
//! mouse.
//!
//! ## Quick Start
//!
//! ```no_run
//! use objview::{AppConfig, ModelList};
//!
//! fn main() -> anyhow::Result<()> {
//!     let models = ModelList::from_dir("./models")?;
//!     objview::run(AppConfig::new().title("objview"), models)?;
//!     Ok(())
//! }
//! ```
//!
//! ## Controls
//!
//! | Key | Action |
//! |-----|--------|
//! | `Z` / `X` | Previous / next model |
//! | `T` / `R` / `S` | Drag translates / rotates / scales the model |
//! | `E` / `C` / `U` | Drag moves the eye / look-at point / up hint |
//! | `L` | Drag moves the light; press again to cycle light kinds |
//! | `K` | Scroll adjusts shininess |
//! | `O` / `P` | Orthogonal / perspective projection |
//! | `W` | Toggle wireframe |
//! | `V` | Toggle vsync |
//! | `I` | Dump matrices and state to stdout |
//!
//! The left mouse button drags in x/y; the scroll wheel drives the z axis.

mod app;
mod control;
mod gpu;
mod input;
mod mesh;
mod model;
mod scene;
pub mod transform;

pub use app::{AppConfig, run};
pub use control::{Control, ControlMode, LightMode, LightOpts};
pub use gpu::GpuContext;
pub use input::Input;
pub use mesh::{GpuMesh, ObjGeometry, Vertex3d};
pub use model::{Drawable, Model, ModelList, ViewerError};
pub use scene::{RenderMode, Scene, SceneUniforms};
pub use transform::{FrustumParams, Mvp, ProjectionMode, Transform};

// Re-export glam math types for convenience
pub use glam::{Mat4, Vec2, Vec3, Vec4};

// Re-export commonly used winit types for convenience
pub use winit::event::MouseButton;
pub use winit::keyboard::KeyCode;
