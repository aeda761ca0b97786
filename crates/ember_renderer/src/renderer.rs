//! Per-pixel integrator and framebuffer.
//!
//! Implements the render loop with:
//! - Stratified anti-aliasing through the [`Sampler`]
//! - Per-pixel averaging of `num_samples` traced rays
//! - Output to any [`FrameSink`], with [`ImageBuffer`] as the owned default

use std::time::{Duration, Instant};

use crate::error::{RenderError, RenderResult};
use crate::{Camera, Color, Sampler, Scene};
use ember_core::RenderSettings;
use ember_math::Interval;

/// Destination for finished pixels.
pub trait FrameSink {
    /// Width and height in pixels.
    fn dimensions(&self) -> (u32, u32);

    /// Store the color of pixel (x, y); row 0 is the top of the image.
    fn set_pixel(&mut self, x: u32, y: u32, color: Color);
}

/// Clamp a value to [0, 1] range.
#[inline]
pub fn clamp_01(x: f32) -> f32 {
    Interval::UNIT.clamp(x)
}

/// Convert a color to 8-bit RGB, clamping each channel to [0, 1].
pub fn color_to_rgb8(color: Color) -> [u8; 3] {
    [
        (255.0 * clamp_01(color.x)).round() as u8,
        (255.0 * clamp_01(color.y)).round() as u8,
        (255.0 * clamp_01(color.z)).round() as u8,
    ]
}

/// Simple image buffer for storing render output.
#[derive(Debug, Clone)]
pub struct ImageBuffer {
    pub width: u32,
    pub height: u32,
    pub pixels: Vec<Color>,
}

impl ImageBuffer {
    /// Create a new image buffer filled with black.
    ///
    /// Fails on a zero dimension or when the pixel storage cannot be allocated.
    pub fn new(width: u32, height: u32) -> RenderResult<Self> {
        if width == 0 || height == 0 {
            return Err(RenderError::InvalidResolution { width, height });
        }

        let alloc_error = RenderError::FramebufferAllocation { width, height };
        let len = (width as usize)
            .checked_mul(height as usize)
            .ok_or(RenderError::FramebufferAllocation { width, height })?;

        let mut pixels = Vec::new();
        pixels.try_reserve_exact(len).map_err(|_| alloc_error)?;
        pixels.resize(len, Color::ZERO);

        Ok(Self {
            width,
            height,
            pixels,
        })
    }

    /// Get the pixel at (x, y), or `None` outside the image.
    pub fn get(&self, x: u32, y: u32) -> Option<Color> {
        if x >= self.width || y >= self.height {
            return None;
        }
        self.pixels.get(y as usize * self.width as usize + x as usize).copied()
    }

    /// Set the pixel at (x, y). Writes outside the image are ignored.
    pub fn set(&mut self, x: u32, y: u32, color: Color) {
        if x >= self.width || y >= self.height {
            log::warn!("Ignoring pixel write outside {}x{}: ({}, {})", self.width, self.height, x, y);
            return;
        }
        let idx = y as usize * self.width as usize + x as usize;
        self.pixels[idx] = color;
    }

    /// Convert to RGB bytes, row by row from the top.
    pub fn to_rgb8(&self) -> Vec<u8> {
        let mut bytes = Vec::with_capacity(self.pixels.len() * 3);
        for color in &self.pixels {
            bytes.extend_from_slice(&color_to_rgb8(*color));
        }
        bytes
    }
}

impl FrameSink for ImageBuffer {
    fn dimensions(&self) -> (u32, u32) {
        (self.width, self.height)
    }

    fn set_pixel(&mut self, x: u32, y: u32, color: Color) {
        self.set(x, y, color);
    }
}

/// Summary of a finished render.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct RenderStats {
    pub pixels: u64,
    /// Primary rays traced
    pub samples: u64,
    pub elapsed: Duration,
}

impl RenderStats {
    pub fn samples_per_second(&self) -> f64 {
        let secs = self.elapsed.as_secs_f64();
        if secs > 0.0 {
            self.samples as f64 / secs
        } else {
            0.0
        }
    }
}

/// Render a single pixel: one traced ray per sample, averaged.
///
/// `camera_sampler` places the samples inside the pixel and on the lens;
/// `shading_sampler` feeds every draw made while tracing. Camera draws stay at
/// exactly `num_samples` per pixel, so each pixel walks one full stratified set.
pub fn render_pixel(
    camera: &Camera,
    scene: &Scene,
    x: u32,
    y: u32,
    camera_sampler: &mut Sampler,
    shading_sampler: &mut Sampler,
) -> Color {
    let samples = camera_sampler.num_samples();
    let mut pixel_color = Color::ZERO;

    for _ in 0..samples {
        let ray = camera.get_ray(x, y, camera_sampler);
        pixel_color += scene.trace_ray(&ray, shading_sampler);
    }

    pixel_color / samples as f32
}

/// Render every pixel of `sink` from `camera`, single-threaded, top row first.
pub fn render_to<S: FrameSink + ?Sized>(
    camera: &Camera,
    scene: &Scene,
    camera_sampler: &mut Sampler,
    shading_sampler: &mut Sampler,
    sink: &mut S,
) -> RenderStats {
    let (width, height) = sink.dimensions();
    let start = Instant::now();

    log::info!(
        "Rendering {}x{}: {} primitives, {} lights, {:?} tracer, max depth {}, {} samples/pixel",
        width,
        height,
        scene.primitives().len(),
        scene.lights().len(),
        scene.tracer(),
        scene.max_depth(),
        camera_sampler.num_samples()
    );

    for y in 0..height {
        for x in 0..width {
            let color = render_pixel(camera, scene, x, y, camera_sampler, shading_sampler);
            sink.set_pixel(x, y, color);
        }
        log::debug!("Row {}/{} done", y + 1, height);
    }

    let pixels = width as u64 * height as u64;
    let stats = RenderStats {
        pixels,
        samples: pixels * camera_sampler.num_samples() as u64,
        elapsed: start.elapsed(),
    };
    log::info!(
        "Rendered {} pixels ({} samples) in {:.2?}",
        stats.pixels,
        stats.samples,
        stats.elapsed
    );
    stats
}

/// Seed offset for the shading sampler forked from the camera sampler.
const SHADING_SEED_MIX: u64 = 0x9E37_79B9_7F4A_7C15;

/// Camera, samplers and framebuffer configured from [`RenderSettings`].
#[derive(Debug, Clone)]
pub struct Renderer {
    camera: Camera,
    camera_sampler: Sampler,
    shading_sampler: Sampler,
    image: ImageBuffer,
}

impl Renderer {
    /// Validate the settings and allocate the framebuffer.
    pub fn new(settings: &RenderSettings) -> RenderResult<Self> {
        settings.validate()?;
        let image = ImageBuffer::new(settings.width, settings.height)?;
        let camera = Camera::from_settings(&settings.camera, settings.width, settings.height);
        let camera_sampler = Sampler::from_settings(&settings.sampler);
        let shading_sampler = camera_sampler.fork(settings.sampler.seed ^ SHADING_SEED_MIX);

        Ok(Self {
            camera,
            camera_sampler,
            shading_sampler,
            image,
        })
    }

    pub fn camera(&self) -> &Camera {
        &self.camera
    }

    pub fn image(&self) -> &ImageBuffer {
        &self.image
    }

    pub fn into_image(self) -> ImageBuffer {
        self.image
    }

    /// Render `scene` into the owned framebuffer.
    pub fn render(&mut self, scene: &Scene) -> RenderStats {
        render_to(
            &self.camera,
            scene,
            &mut self.camera_sampler,
            &mut self.shading_sampler,
            &mut self.image,
        )
    }

    /// Render `scene` into an external sink of the same resolution.
    pub fn render_into<S: FrameSink + ?Sized>(&mut self, scene: &Scene, sink: &mut S) -> RenderResult<RenderStats> {
        let (width, height) = sink.dimensions();
        if (width, height) != (self.image.width, self.image.height) {
            return Err(RenderError::InvalidResolution { width, height });
        }
        Ok(render_to(
            &self.camera,
            scene,
            &mut self.camera_sampler,
            &mut self.shading_sampler,
            sink,
        ))
    }
}
