//! Ember Core - renderer-agnostic scene data.
//!
//! This crate provides:
//!
//! - **Mesh geometry**: `Mesh` triangle lists with optional per-corner normals
//! - **Mesh loading**: the line-oriented `v`/`vn`/`f` face/vertex format
//! - **Render settings**: resolution, camera, tracer mode and sampler choice,
//!   loadable from JSON
//!
//! # Example
//!
//! ```ignore
//! use ember_core::{load_obj, RenderSettings};
//!
//! let settings = RenderSettings::load("render.json")?;
//! let mesh = load_obj("bunny.obj")?;
//! println!("{} triangles at {}x{}",
//!     mesh.triangle_count(),
//!     settings.width,
//!     settings.height);
//! ```

pub mod mesh;
pub mod obj;
pub mod settings;

// Re-export commonly used types
pub use mesh::Mesh;
pub use obj::{load_obj, parse_obj, MeshError, MeshResult};
pub use settings::{
    CameraSettings, Projection, RenderSettings, SamplerKind, SamplerSettings, SettingsError,
    SettingsResult, TracerMode,
};
