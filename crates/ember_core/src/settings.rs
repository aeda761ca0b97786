//! Render configuration.
//!
//! Everything the renderer needs before the pixel loop starts: resolution,
//! camera placement and projection, tracer mode, recursion limit and sampler
//! choice. Settings deserialize from JSON; every field has a default so a
//! partial document is valid.

use std::path::Path;

use ember_math::Vec3;
use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Errors that can occur while loading settings.
#[derive(Error, Debug)]
pub enum SettingsError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("Invalid settings: {0}")]
    Invalid(String),
}

/// Result type for settings operations.
pub type SettingsResult<T> = Result<T, SettingsError>;

/// Which shading path materials take.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum TracerMode {
    /// Direct lighting from deterministic lights plus mirror reflection.
    #[default]
    Whitted,
    /// Direct lighting from all lights, area lights integrated by Monte Carlo.
    AreaLighting,
    /// Random-walk path tracing; light comes from emissive surfaces only.
    PathTracer,
}

/// Sample pattern generators.
///
/// `Regular`, `Jittered` and `MultiJittered` lay samples out on a square grid
/// and expect a perfect-square sample count.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SamplerKind {
    Regular,
    PureRandom,
    Jittered,
    NRooks,
    #[default]
    MultiJittered,
    Hammersley,
}

impl SamplerKind {
    /// True for strategies that need a perfect-square sample count.
    pub fn is_grid_based(&self) -> bool {
        matches!(
            self,
            SamplerKind::Regular | SamplerKind::Jittered | SamplerKind::MultiJittered
        )
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Projection {
    #[default]
    Pinhole,
    Orthographic,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct CameraSettings {
    pub eye: Vec3,
    pub look_at: Vec3,
    pub up: Vec3,
    /// Vertical field of view for the pinhole projection
    pub vfov_degrees: f32,
    pub projection: Projection,
    /// Height of the view volume for the orthographic projection
    pub ortho_height: f32,
    /// Thin-lens aperture radius; 0 gives a pinhole
    pub lens_radius: f32,
    pub focal_distance: f32,
}

impl Default for CameraSettings {
    fn default() -> Self {
        Self {
            eye: Vec3::ZERO,
            look_at: Vec3::NEG_Z,
            up: Vec3::Y,
            vfov_degrees: 60.0,
            projection: Projection::Pinhole,
            ortho_height: 2.0,
            lens_radius: 0.0,
            focal_distance: 1.0,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct SamplerSettings {
    pub kind: SamplerKind,
    /// Samples per pixel
    pub samples: u32,
    /// Independent sample sets
    pub sets: u32,
    pub seed: u64,
    /// Cosine-power exponent for hemisphere samples
    pub hemisphere_exponent: f32,
}

impl Default for SamplerSettings {
    fn default() -> Self {
        Self {
            kind: SamplerKind::MultiJittered,
            samples: 16,
            sets: 83,
            seed: 0x5EED,
            hemisphere_exponent: 1.0,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct RenderSettings {
    pub width: u32,
    pub height: u32,
    pub camera: CameraSettings,
    pub tracer: TracerMode,
    pub max_depth: u32,
    pub sampler: SamplerSettings,
    pub background: Vec3,
}

impl Default for RenderSettings {
    fn default() -> Self {
        Self {
            width: 400,
            height: 300,
            camera: CameraSettings::default(),
            tracer: TracerMode::Whitted,
            max_depth: 5,
            sampler: SamplerSettings::default(),
            background: Vec3::ZERO,
        }
    }
}

impl RenderSettings {
    /// Parse and validate settings from a JSON string.
    pub fn from_json_str(json: &str) -> SettingsResult<Self> {
        let settings: RenderSettings = serde_json::from_str(json)?;
        settings.validate()?;
        Ok(settings)
    }

    /// Load and validate settings from a JSON file.
    pub fn load<P: AsRef<Path>>(path: P) -> SettingsResult<Self> {
        let content = std::fs::read_to_string(path.as_ref())?;
        let settings = Self::from_json_str(&content)?;
        log::info!("Loaded render settings from {}", path.as_ref().display());
        Ok(settings)
    }

    /// Check the settings for values the renderer cannot work with.
    ///
    /// A non-square sample count with a grid-based sampler is a caller
    /// precondition, not an error; it is only reported.
    pub fn validate(&self) -> SettingsResult<()> {
        if self.width == 0 || self.height == 0 {
            return Err(SettingsError::Invalid(format!(
                "resolution must be non-zero, got {}x{}",
                self.width, self.height
            )));
        }
        if self.sampler.samples == 0 || self.sampler.sets == 0 {
            return Err(SettingsError::Invalid(
                "sampler needs at least one sample and one set".to_string(),
            ));
        }
        if self.sampler.kind.is_grid_based() && !is_perfect_square(self.sampler.samples) {
            log::warn!(
                "{:?} sampler expects a perfect-square sample count, got {}",
                self.sampler.kind,
                self.sampler.samples
            );
        }
        Ok(())
    }
}

pub fn is_perfect_square(n: u32) -> bool {
    let root = (n as f64).sqrt().round() as u32;
    root * root == n
}
