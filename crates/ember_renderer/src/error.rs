//! Error types for scene setup and rendering.

use ember_core::{MeshError, SettingsError};
use thiserror::Error;

/// Errors that can occur while building a scene or rendering it.
#[derive(Error, Debug)]
pub enum RenderError {
    #[error("could not allocate a {width}x{height} framebuffer")]
    FramebufferAllocation { width: u32, height: u32 },

    #[error("invalid resolution {width}x{height}")]
    InvalidResolution { width: u32, height: u32 },

    #[error("{0} primitives cannot be sampled as area lights")]
    UnsupportedEmitter(&'static str),

    #[error("mesh error: {0}")]
    Mesh(#[from] MeshError),

    #[error("settings error: {0}")]
    Settings(#[from] SettingsError),
}

pub type RenderResult<T> = Result<T, RenderError>;
