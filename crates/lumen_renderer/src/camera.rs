//! Camera for ray generation.

use crate::renderer::{shade, SkyGradient};
use crate::sampling::sample_square;
use crate::{Color, ConfigError, Shape};
use lumen_math::{Ray, Vec3};
use rand::RngCore;
use serde::{Deserialize, Serialize};

/// Largest image, in pixels, a camera accepts.
pub const MAX_PIXELS: usize = 1 << 28;

/// User-facing camera configuration.
///
/// Only turned into ray-generating geometry through [`Camera::new`] or
/// [`Camera::set_settings`], which validate it first.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct CameraSettings {
    /// Width / height
    pub aspect_ratio: f64,
    /// Image width in pixels; the height is derived from the aspect ratio
    pub image_width: u32,
    /// Vertical field of view in degrees
    pub vfov: f64,
    /// Samples per pixel (1 disables jitter)
    pub rays_per_pixel: u32,
    pub look_from: Vec3,
    pub look_at: Vec3,
    pub look_up: Vec3,
    /// Render threads
    pub cores: usize,
    pub background: SkyGradient,
}

impl Default for CameraSettings {
    fn default() -> Self {
        Self {
            aspect_ratio: 1.5,
            image_width: 400,
            vfov: 90.0,
            rays_per_pixel: 10,
            look_from: Vec3::new(-2.0, 2.0, 1.0),
            look_at: Vec3::new(0.0, 0.0, -1.0),
            look_up: Vec3::Y,
            cores: 1,
            background: SkyGradient::default(),
        }
    }
}

impl CameraSettings {
    /// Set image width and aspect ratio.
    pub fn with_resolution(mut self, image_width: u32, aspect_ratio: f64) -> Self {
        self.image_width = image_width;
        self.aspect_ratio = aspect_ratio;
        self
    }

    /// Set samples per pixel.
    pub fn with_quality(mut self, rays_per_pixel: u32) -> Self {
        self.rays_per_pixel = rays_per_pixel;
        self
    }

    /// Set camera position.
    pub fn with_position(mut self, look_from: Vec3, look_at: Vec3, look_up: Vec3) -> Self {
        self.look_from = look_from;
        self.look_at = look_at;
        self.look_up = look_up;
        self
    }

    /// Set vertical field of view in degrees.
    pub fn with_fov(mut self, vfov: f64) -> Self {
        self.vfov = vfov;
        self
    }

    /// Set the number of render threads.
    pub fn with_cores(mut self, cores: usize) -> Self {
        self.cores = cores;
        self
    }

    /// Set the sky gradient colors.
    pub fn with_backgrounds(mut self, bottom: Color, top: Color) -> Self {
        self.background = SkyGradient::new(bottom, top);
        self
    }
}

/// Geometry derived from [`CameraSettings`].
#[derive(Debug, Clone, PartialEq)]
struct Viewport {
    image_height: u32,
    // Camera basis: w points back toward the eye, u right, v up
    u: Vec3,
    v: Vec3,
    w: Vec3,
    /// One pixel to the right
    cell_right: Vec3,
    /// One pixel down
    cell_down: Vec3,
    /// Top-left corner of the viewport, in the look-at plane
    corner: Vec3,
}

/// Camera for generating rays into the scene.
#[derive(Debug, Clone)]
pub struct Camera {
    settings: CameraSettings,
    viewport: Viewport,
}

impl Camera {
    /// Validate `settings` and derive the viewport.
    pub fn new(settings: CameraSettings) -> Result<Self, ConfigError> {
        let viewport = update_parameters(&settings)?;
        Ok(Self { settings, viewport })
    }

    /// Replace the settings, re-deriving the viewport.
    ///
    /// On error the camera keeps its previous settings.
    pub fn set_settings(&mut self, settings: CameraSettings) -> Result<(), ConfigError> {
        self.viewport = update_parameters(&settings)?;
        self.settings = settings;
        Ok(())
    }

    pub fn image_width(&self) -> u32 {
        self.settings.image_width
    }

    pub fn image_height(&self) -> u32 {
        self.viewport.image_height
    }

    /// Total number of pixels.
    pub fn pixel_count(&self) -> usize {
        self.settings.image_width as usize * self.viewport.image_height as usize
    }

    pub fn rays_per_pixel(&self) -> u32 {
        self.settings.rays_per_pixel
    }

    pub fn cores(&self) -> usize {
        self.settings.cores
    }

    /// Generate a ray through pixel (x, y), jittered unless sampling once
    /// per pixel.
    pub fn get_ray(&self, x: u32, y: u32, rng: &mut dyn RngCore) -> Ray {
        let (mut right, mut down) = (x as f64, y as f64);
        if self.settings.rays_per_pixel != 1 {
            let (dx, dy) = sample_square(rng);
            right += dx;
            down += dy;
        }

        let target =
            self.viewport.corner + self.viewport.cell_right * right + self.viewport.cell_down * down;
        Ray::new(self.settings.look_from, target - self.settings.look_from)
    }

    /// Trace one sample from the camera against `world`.
    pub fn shade(&self, ray: &Ray, world: &dyn Shape, rng: &mut dyn RngCore) -> Color {
        shade(ray, world, 0, &self.settings.background, rng)
    }
}

/// Derive the viewport from the settings, rejecting unusable values.
fn update_parameters(settings: &CameraSettings) -> Result<Viewport, ConfigError> {
    if settings.image_width == 0 {
        return Err(ConfigError::InvalidImageWidth);
    }
    if !(settings.aspect_ratio.is_finite() && settings.aspect_ratio > 0.0) {
        return Err(ConfigError::InvalidAspectRatio(settings.aspect_ratio));
    }
    if !(settings.vfov > 0.0 && settings.vfov < 180.0) {
        return Err(ConfigError::InvalidFieldOfView(settings.vfov));
    }
    if settings.rays_per_pixel == 0 {
        return Err(ConfigError::InvalidRaysPerPixel);
    }
    if settings.cores == 0 {
        return Err(ConfigError::InvalidCores);
    }
    settings.background.validate()?;

    let width = settings.image_width as f64;
    let exact_height = (width / settings.aspect_ratio).trunc();
    if exact_height < 1.0 {
        return Err(ConfigError::DegenerateImageHeight {
            width: settings.image_width,
            aspect_ratio: settings.aspect_ratio,
        });
    }
    if exact_height > u32::MAX as f64 || width * exact_height > MAX_PIXELS as f64 {
        return Err(ConfigError::ImageTooLarge {
            width: settings.image_width,
            aspect_ratio: settings.aspect_ratio,
            max: MAX_PIXELS,
        });
    }
    let image_height = exact_height as u32;
    let height = exact_height;

    let view = settings.look_from - settings.look_at;
    let focal = view.length();
    if !(focal.is_finite() && focal > 0.0) {
        return Err(ConfigError::DegenerateCameraBasis("look-from equals look-at"));
    }

    // Calculate viewport dimensions
    let theta = settings.vfov.to_radians();
    let vp_height = 2.0 * (theta / 2.0).tan() * focal;
    let vp_width = vp_height * settings.aspect_ratio;

    // Calculate camera basis vectors
    let w = view / focal;
    let u = settings
        .look_up
        .cross(w)
        .try_normalize()
        .ok_or(ConfigError::DegenerateCameraBasis(
            "up vector is parallel to the view direction",
        ))?;
    let v = w.cross(u);

    let cell_right = u * (vp_width / width);
    let cell_down = v * (-vp_height / height);
    let corner = settings.look_at - cell_right * (width / 2.0) - cell_down * (height / 2.0);

    log::debug!(
        "Viewport {:.3}x{:.3} at focal distance {:.3}, image {}x{}",
        vp_width,
        vp_height,
        focal,
        settings.image_width,
        image_height
    );

    Ok(Viewport {
        image_height,
        u,
        v,
        w,
        cell_right,
        cell_down,
        corner,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::rngs::StdRng;
    use rand::SeedableRng;

    fn looking_down_z() -> CameraSettings {
        CameraSettings::default()
            .with_resolution(100, 1.0)
            .with_position(Vec3::ZERO, Vec3::new(0.0, 0.0, -1.0), Vec3::Y)
            .with_fov(90.0)
            .with_quality(1)
    }

    #[test]
    fn test_camera_initialize() {
        let camera = Camera::new(CameraSettings::default().with_resolution(300, 1.5)).unwrap();
        assert_eq!(camera.image_height(), 200);
        assert_eq!(camera.pixel_count(), 300 * 200);

        let vp = &camera.viewport;
        assert!(vp.u.dot(vp.v).abs() < 1e-12);
        assert!(vp.v.dot(vp.w).abs() < 1e-12);
        assert!(vp.w.dot(vp.u).abs() < 1e-12);
        assert!((vp.v.length() - 1.0).abs() < 1e-12);
    }

    #[test]
    fn test_basis_for_axis_aligned_view() {
        let camera = Camera::new(looking_down_z()).unwrap();
        let vp = &camera.viewport;
        assert!((vp.w - Vec3::Z).length() < 1e-12);
        assert!((vp.u - Vec3::X).length() < 1e-12);
        assert!((vp.v - Vec3::Y).length() < 1e-12);

        // 90 degree fov at distance 1 gives a 2x2 viewport over 100 pixels
        assert!((vp.cell_right - Vec3::new(0.02, 0.0, 0.0)).length() < 1e-12);
        assert!((vp.cell_down - Vec3::new(0.0, -0.02, 0.0)).length() < 1e-12);
        assert!((vp.corner - Vec3::new(-1.0, 1.0, -1.0)).length() < 1e-12);
    }

    #[test]
    fn test_center_ray_points_at_look_at() {
        let camera = Camera::new(looking_down_z()).unwrap();
        let mut rng = StdRng::seed_from_u64(42);

        let ray = camera.get_ray(50, 50, &mut rng);
        assert_eq!(ray.origin(), Vec3::ZERO);
        assert!((ray.direction() - (-Vec3::Z)).length() < 1e-12);

        // Top-left pixel is up and to the left
        let corner = camera.get_ray(0, 0, &mut rng);
        assert!(corner.direction().x < 0.0);
        assert!(corner.direction().y > 0.0);
    }

    #[test]
    fn test_single_ray_per_pixel_has_no_jitter() {
        let camera = Camera::new(looking_down_z()).unwrap();
        let mut a = StdRng::seed_from_u64(1);
        let mut b = StdRng::seed_from_u64(2);
        assert_eq!(camera.get_ray(10, 20, &mut a), camera.get_ray(10, 20, &mut b));
    }

    #[test]
    fn test_jitter_stays_within_half_a_pixel() {
        let camera = Camera::new(looking_down_z().with_quality(16)).unwrap();
        let mut rng = StdRng::seed_from_u64(5);

        let mut jittered = false;
        for _ in 0..200 {
            let ray = camera.get_ray(50, 50, &mut rng);
            // Project back onto the look-at plane z = -1
            let p = ray.at(-1.0 / ray.direction().z);
            assert!(p.x.abs() <= 0.01 + 1e-12);
            assert!(p.y.abs() <= 0.01 + 1e-12);
            jittered |= p.x.abs() > 1e-6;
        }
        assert!(jittered);
    }

    #[test]
    fn test_invalid_settings_are_rejected() {
        let base = CameraSettings::default();

        let cases = [
            (base.clone().with_resolution(0, 1.5), ConfigError::InvalidImageWidth),
            (base.clone().with_resolution(100, 0.0), ConfigError::InvalidAspectRatio(0.0)),
            (base.clone().with_fov(180.0), ConfigError::InvalidFieldOfView(180.0)),
            (base.clone().with_quality(0), ConfigError::InvalidRaysPerPixel),
            (base.clone().with_cores(0), ConfigError::InvalidCores),
            (
                base.clone().with_resolution(1, 2.0),
                ConfigError::DegenerateImageHeight {
                    width: 1,
                    aspect_ratio: 2.0,
                },
            ),
        ];
        for (settings, expected) in cases {
            assert_eq!(Camera::new(settings).unwrap_err(), expected);
        }
    }

    #[test]
    fn test_oversized_image_is_rejected() {
        // Height would saturate u32
        let tall = CameraSettings::default().with_resolution(1000, 1e-9);
        assert_eq!(
            Camera::new(tall).unwrap_err(),
            ConfigError::ImageTooLarge {
                width: 1000,
                aspect_ratio: 1e-9,
                max: MAX_PIXELS,
            }
        );

        // Height fits in u32 but the buffer would not be sane
        let huge = CameraSettings::default().with_resolution(100_000, 0.01);
        assert!(matches!(
            Camera::new(huge),
            Err(ConfigError::ImageTooLarge { .. })
        ));

        // Exactly at the limit is fine
        let edge = CameraSettings::default().with_resolution(1 << 14, 1.0);
        let camera = Camera::new(edge).unwrap();
        assert_eq!(camera.pixel_count(), MAX_PIXELS);
    }

    #[test]
    fn test_degenerate_basis_is_rejected() {
        let same_point = CameraSettings::default().with_position(Vec3::ONE, Vec3::ONE, Vec3::Y);
        assert!(matches!(
            Camera::new(same_point),
            Err(ConfigError::DegenerateCameraBasis(_))
        ));

        let straight_down =
            CameraSettings::default().with_position(Vec3::new(0.0, 5.0, 0.0), Vec3::ZERO, Vec3::Y);
        assert!(matches!(
            Camera::new(straight_down),
            Err(ConfigError::DegenerateCameraBasis(_))
        ));
    }

    #[test]
    fn test_set_settings_rederives_viewport() {
        let mut camera = Camera::new(looking_down_z()).unwrap();
        let before = camera.viewport.clone();

        camera
            .set_settings(looking_down_z().with_resolution(200, 2.0))
            .unwrap();
        assert_eq!(camera.image_height(), 100);
        assert_ne!(camera.viewport, before);

        // A rejected update leaves the camera untouched
        let snapshot = camera.viewport.clone();
        assert!(camera.set_settings(looking_down_z().with_fov(-1.0)).is_err());
        assert_eq!(camera.viewport, snapshot);
        assert_eq!(camera.image_width(), 200);
    }

    #[test]
    fn test_settings_from_json() {
        let json = r#"{ "image_width": 64, "rays_per_pixel": 4, "look_from": [0.0, 1.0, 5.0] }"#;
        let settings: CameraSettings = serde_json::from_str(json).unwrap();

        assert_eq!(settings.image_width, 64);
        assert_eq!(settings.rays_per_pixel, 4);
        assert_eq!(settings.look_from, Vec3::new(0.0, 1.0, 5.0));
        assert_eq!(settings.aspect_ratio, CameraSettings::default().aspect_ratio);
    }
}
