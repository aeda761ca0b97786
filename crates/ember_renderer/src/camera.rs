//! Camera for ray generation.

use crate::Sampler;
use ember_core::{CameraSettings, Projection};
use ember_math::{Ray, Vec3};

/// Camera for generating primary rays.
///
/// Pixel (0, 0) is the top-left corner of the image.
#[derive(Debug, Clone)]
pub struct Camera {
    // Image settings
    pub image_width: u32,
    pub image_height: u32,

    // Camera positioning
    look_from: Vec3,
    look_at: Vec3,
    vup: Vec3,

    projection: Projection,
    vfov: f32,          // Vertical field of view in degrees
    ortho_height: f32,  // Viewport height for orthographic projection
    lens_radius: f32,   // Thin lens radius; 0 for a pinhole
    focus_dist: f32,    // Distance from camera to plane of perfect focus

    // Cached computed values (set by initialize())
    center: Vec3,
    pixel00_loc: Vec3,
    pixel_delta_u: Vec3,
    pixel_delta_v: Vec3,
    u: Vec3,
    v: Vec3,
    w: Vec3,
}

impl Camera {
    /// Create a new camera with default settings.
    pub fn new() -> Self {
        Self {
            image_width: 400,
            image_height: 300,
            look_from: Vec3::ZERO,
            look_at: Vec3::NEG_Z,
            vup: Vec3::Y,
            projection: Projection::Pinhole,
            vfov: 60.0,
            ortho_height: 2.0,
            lens_radius: 0.0,
            focus_dist: 1.0,
            // Cached values (initialized to defaults)
            center: Vec3::ZERO,
            pixel00_loc: Vec3::ZERO,
            pixel_delta_u: Vec3::ZERO,
            pixel_delta_v: Vec3::ZERO,
            u: Vec3::X,
            v: Vec3::Y,
            w: Vec3::Z,
        }
    }

    /// Build and initialize a camera from render settings.
    pub fn from_settings(settings: &CameraSettings, width: u32, height: u32) -> Self {
        let mut camera = Self::new()
            .with_resolution(width, height)
            .with_position(settings.eye, settings.look_at, settings.up)
            .with_projection(settings.projection, settings.ortho_height)
            .with_lens(settings.vfov_degrees, settings.lens_radius, settings.focal_distance);
        camera.initialize();
        camera
    }

    /// Set image resolution.
    pub fn with_resolution(mut self, width: u32, height: u32) -> Self {
        self.image_width = width;
        self.image_height = height;
        self
    }

    /// Set camera position.
    pub fn with_position(mut self, look_from: Vec3, look_at: Vec3, vup: Vec3) -> Self {
        self.look_from = look_from;
        self.look_at = look_at;
        self.vup = vup;
        self
    }

    /// Set projection; `ortho_height` is only used by orthographic cameras.
    pub fn with_projection(mut self, projection: Projection, ortho_height: f32) -> Self {
        self.projection = projection;
        self.ortho_height = ortho_height;
        self
    }

    /// Set lens settings.
    pub fn with_lens(mut self, vfov: f32, lens_radius: f32, focus_dist: f32) -> Self {
        self.vfov = vfov;
        self.lens_radius = lens_radius.max(0.0);
        self.focus_dist = if focus_dist > 0.0 { focus_dist } else { 1.0 };
        self
    }

    /// Initialize the camera (must be called before generating rays).
    pub fn initialize(&mut self) {
        self.center = self.look_from;
        let width = self.image_width.max(1) as f32;
        let height = self.image_height.max(1) as f32;

        // Calculate camera basis vectors
        self.w = (self.look_from - self.look_at).normalize_or_zero();
        if self.w == Vec3::ZERO {
            log::warn!("Camera eye and look-at coincide; looking down -Z");
            self.w = Vec3::Z;
        }
        self.u = self.vup.cross(self.w).normalize_or_zero();
        if self.u == Vec3::ZERO {
            // up parallel to the view direction
            self.u = ember_math::orthonormal_basis(self.w).0;
        }
        self.v = self.w.cross(self.u);

        // Calculate viewport dimensions
        let viewport_height = match self.projection {
            Projection::Pinhole => 2.0 * (self.vfov.to_radians() / 2.0).tan() * self.focus_dist,
            Projection::Orthographic => self.ortho_height,
        };
        let viewport_width = viewport_height * (width / height);

        // Calculate viewport vectors
        let viewport_u = viewport_width * self.u;
        let viewport_v = -viewport_height * self.v;

        // Calculate pixel delta vectors
        self.pixel_delta_u = viewport_u / width;
        self.pixel_delta_v = viewport_v / height;

        // Calculate upper left pixel location
        let plane_center = match self.projection {
            Projection::Pinhole => self.center - self.focus_dist * self.w,
            Projection::Orthographic => self.center,
        };
        let viewport_upper_left = plane_center - viewport_u / 2.0 - viewport_v / 2.0;

        self.pixel00_loc = viewport_upper_left + 0.5 * (self.pixel_delta_u + self.pixel_delta_v);
    }

    /// Generate a ray through pixel (i, j), drawing one square sample for the
    /// position inside the pixel and, with a thin lens, one disk sample.
    pub fn get_ray(&self, i: u32, j: u32, sampler: &mut Sampler) -> Ray {
        let offset = sampler.sample_unit_square() - 0.5;

        let pixel_sample = self.pixel00_loc
            + ((i as f32) + offset.x) * self.pixel_delta_u
            + ((j as f32) + offset.y) * self.pixel_delta_v;

        match self.projection {
            Projection::Orthographic => Ray::new(pixel_sample, -self.w),
            Projection::Pinhole => {
                let ray_origin = if self.lens_radius <= 0.0 {
                    self.center
                } else {
                    self.lens_sample(sampler)
                };
                Ray::new(ray_origin, pixel_sample - ray_origin).normalized()
            }
        }
    }

    /// Sample a point on the lens.
    fn lens_sample(&self, sampler: &mut Sampler) -> Vec3 {
        let p = sampler.sample_unit_disk() * self.lens_radius;
        self.center + p.x * self.u + p.y * self.v
    }

    pub fn projection(&self) -> Projection {
        self.projection
    }
}

impl Default for Camera {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use ember_core::SamplerKind;

    fn center_sampler() -> Sampler {
        // a single regular sample sits at the pixel center
        Sampler::new(SamplerKind::Regular, 1, 1, 0)
    }

    #[test]
    fn test_camera_initialize() {
        let mut camera = Camera::new()
            .with_resolution(800, 600)
            .with_position(Vec3::ZERO, Vec3::NEG_Z, Vec3::Y)
            .with_lens(90.0, 0.0, 1.0);

        camera.initialize();

        assert_eq!(camera.center, Vec3::ZERO);
        assert!((camera.w - Vec3::Z).length() < 0.001);
    }

    #[test]
    fn test_center_ray_looks_forward() {
        let mut camera = Camera::new()
            .with_resolution(101, 101)
            .with_position(Vec3::ZERO, Vec3::NEG_Z, Vec3::Y)
            .with_lens(90.0, 0.0, 1.0);
        camera.initialize();

        let ray = camera.get_ray(50, 50, &mut center_sampler());
        assert!((ray.direction - Vec3::NEG_Z).length() < 1e-5);
        assert_eq!(ray.depth, 0);
    }

    #[test]
    fn test_row_zero_is_top() {
        let mut camera = Camera::new()
            .with_resolution(10, 10)
            .with_position(Vec3::ZERO, Vec3::NEG_Z, Vec3::Y)
            .with_lens(90.0, 0.0, 1.0);
        camera.initialize();

        let mut sampler = center_sampler();
        let top_left = camera.get_ray(0, 0, &mut sampler);
        assert!(top_left.direction.y > 0.0);
        assert!(top_left.direction.x < 0.0);

        let bottom_right = camera.get_ray(9, 9, &mut sampler);
        assert!(bottom_right.direction.y < 0.0);
        assert!(bottom_right.direction.x > 0.0);
    }

    #[test]
    fn test_orthographic_rays_are_parallel() {
        let settings = CameraSettings {
            projection: Projection::Orthographic,
            ortho_height: 4.0,
            eye: Vec3::new(0.0, 0.0, 5.0),
            look_at: Vec3::ZERO,
            ..Default::default()
        };
        let camera = Camera::from_settings(&settings, 20, 20);
        let mut sampler = center_sampler();

        let a = camera.get_ray(0, 0, &mut sampler);
        let b = camera.get_ray(19, 19, &mut sampler);
        assert_eq!(a.direction, Vec3::NEG_Z);
        assert_eq!(b.direction, Vec3::NEG_Z);
        assert!((a.origin.x - (-1.9)).abs() < 1e-5);
        assert!((a.origin.y - 1.9).abs() < 1e-5);
        assert!((b.origin.z - 5.0).abs() < 1e-5);
    }

    #[test]
    fn test_thin_lens_converges_at_focus() {
        let settings = CameraSettings {
            lens_radius: 0.5,
            focal_distance: 4.0,
            ..Default::default()
        };
        let camera = Camera::from_settings(&settings, 11, 11);
        let mut sampler = Sampler::new(SamplerKind::MultiJittered, 16, 4, 9);

        // Rays through the center pixel spread at the lens and meet at the focal plane
        let mut origins = Vec::new();
        for _ in 0..16 {
            let ray = camera.get_ray(5, 5, &mut sampler);
            let t = -4.0 / ray.direction.z;
            let focus = ray.at(t);
            assert!(focus.truncate().length() < 0.4, "{:?}", focus);
            origins.push(ray.origin);
        }
        assert!(origins.iter().any(|o| o.length() > 0.05));
    }

    #[test]
    fn test_up_parallel_to_view() {
        let mut camera = Camera::new().with_position(Vec3::new(0.0, 5.0, 0.0), Vec3::ZERO, Vec3::Y);
        camera.initialize();
        assert!((camera.u.length() - 1.0).abs() < 1e-5);
        assert!(camera.u.dot(camera.w).abs() < 1e-5);
    }
}
