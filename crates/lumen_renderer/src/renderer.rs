//! Core path tracing renderer.
//!
//! Implements Monte Carlo path tracing with:
//! - Recursive shading bounded by [`MAX_DEPTH`]
//! - Ambient, diffuse and mirror terms weighted by the hit [`Material`]
//! - Anti-aliasing via multi-sampling
//!
//! [`Material`]: crate::Material

use crate::material::check_color;
use crate::sampling::random_unit_vector;
use crate::{Camera, Color, ConfigError, Hit, Shape};
use lumen_math::{Ray, Vec3};
use rand::RngCore;
use serde::{Deserialize, Serialize};

/// Deepest bounce that still gathers light; anything past it is black.
pub const MAX_DEPTH: u32 = 10;

/// Lower bound of the hit window, keeps bounces off their own surface.
pub const MIN_HIT_DISTANCE: f64 = 1e-5;

/// Bounce directions shorter than this fall back to the surface normal.
const DEGENERATE_DIRECTION_SQ: f64 = 1e-12;

/// Background for rays that leave the scene, blended by direction height.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct SkyGradient {
    /// Seen looking straight down
    pub bottom: Color,
    /// Seen looking straight up
    pub top: Color,
}

impl SkyGradient {
    pub fn new(bottom: Color, top: Color) -> Self {
        Self { bottom, top }
    }

    /// Background color along a unit `direction`.
    pub fn sample(&self, direction: Vec3) -> Color {
        let t = 0.5 * (direction.y + 1.0);
        self.bottom * (1.0 - t) + self.top * t
    }

    pub(crate) fn validate(&self) -> Result<(), ConfigError> {
        check_color(self.bottom)?;
        check_color(self.top)
    }
}

impl Default for SkyGradient {
    fn default() -> Self {
        Self {
            bottom: Color::ONE,
            top: Color::new(0.5, 0.5, 1.0),
        }
    }
}

/// Compute the color seen by a ray.
///
/// `depth` counts bounces taken so far; the camera starts at 0.
pub fn shade(
    ray: &Ray,
    world: &dyn Shape,
    depth: u32,
    sky: &SkyGradient,
    rng: &mut dyn RngCore,
) -> Color {
    if depth > MAX_DEPTH {
        return Color::ZERO;
    }

    let mut hit = Hit::new();
    if !world.hit(ray, MIN_HIT_DISTANCE, &mut hit) {
        return sky.sample(ray.direction());
    }

    let Some(material) = hit.material() else {
        return Color::ZERO;
    };

    let mut color = material.color() * material.ambient();

    if material.diffusion() > 0.0 {
        let direction = bounce_direction(hit.normal + random_unit_vector(rng), hit.normal);
        let bounced = Ray::new(hit.point, direction);
        color += shade(&bounced, world, depth + 1, sky, rng) * material.diffusion();
    }

    if material.reflection() > 0.0 {
        let d = ray.direction();
        let mirrored = d - hit.normal * (2.0 * d.dot(hit.normal));
        let direction = bounce_direction(
            mirrored + random_unit_vector(rng) * material.fuzz(),
            hit.normal,
        );
        let reflected = Ray::new(hit.point, direction);
        color += material.color()
            * shade(&reflected, world, depth + 1, sky, rng)
            * material.reflection();
    }

    color
}

#[inline]
fn bounce_direction(direction: Vec3, normal: Vec3) -> Vec3 {
    if direction.length_squared() < DEGENERATE_DIRECTION_SQ {
        normal
    } else {
        direction
    }
}

/// Average of `rays_per_pixel` samples through pixel (x, y).
pub fn render_pixel(
    camera: &Camera,
    world: &dyn Shape,
    x: u32,
    y: u32,
    rng: &mut dyn RngCore,
) -> Color {
    let samples = camera.rays_per_pixel();
    let mut pixel_color = Color::ZERO;

    for _ in 0..samples {
        let ray = camera.get_ray(x, y, rng);
        pixel_color += camera.shade(&ray, world, rng);
    }

    pixel_color / samples as f64
}

/// Convert a linear color to 8-bit RGB: clamp to [0, 1], scale, truncate.
pub fn color_to_rgb(color: Color) -> [u8; 3] {
    let c = color.clamp(Color::ZERO, Color::ONE) * 255.0;
    // NaN casts to 0
    [c.x as u8, c.y as u8, c.z as u8]
}

/// Rendered image, `(0, 0)` top-left, row-major.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PixelBuffer {
    width: u32,
    height: u32,
    pixels: Vec<[u8; 3]>,
}

impl PixelBuffer {
    /// Create a new buffer filled with black.
    pub fn new(width: u32, height: u32) -> Self {
        Self {
            width,
            height,
            pixels: vec![[0; 3]; width as usize * height as usize],
        }
    }

    pub fn width(&self) -> u32 {
        self.width
    }

    pub fn height(&self) -> u32 {
        self.height
    }

    /// Get the pixel at (x, y).
    pub fn get(&self, x: u32, y: u32) -> [u8; 3] {
        self.pixels[self.index(x, y)]
    }

    /// Set the pixel at (x, y).
    pub fn set(&mut self, x: u32, y: u32, rgb: [u8; 3]) {
        let index = self.index(x, y);
        self.pixels[index] = rgb;
    }

    pub fn pixels(&self) -> &[[u8; 3]] {
        &self.pixels
    }

    pub fn pixels_mut(&mut self) -> &mut [[u8; 3]] {
        &mut self.pixels
    }

    /// Flat `RGBRGB...` view of the pixels.
    pub fn as_rgb_bytes(&self) -> &[u8] {
        self.pixels.as_flattened()
    }

    /// Owned copy of [`PixelBuffer::as_rgb_bytes`], for image encoders.
    pub fn to_rgb_bytes(&self) -> Vec<u8> {
        self.as_rgb_bytes().to_vec()
    }

    fn index(&self, x: u32, y: u32) -> usize {
        y as usize * self.width as usize + x as usize
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{CameraSettings, Material, Quad, Shapes, Sphere};
    use rand::rngs::StdRng;
    use rand::SeedableRng;

    fn sky() -> SkyGradient {
        SkyGradient::default()
    }

    /// No shapes at all
    fn empty_world() -> Shapes<'static> {
        Shapes::new()
    }

    #[test]
    fn test_sky_gradient() {
        let sky = sky();
        assert_eq!(sky.sample(-Vec3::Y), Color::ONE);
        assert_eq!(sky.sample(Vec3::Y), Color::new(0.5, 0.5, 1.0));

        let horizon = sky.sample(Vec3::X);
        assert!((horizon - Color::new(0.75, 0.75, 1.0)).length() < 1e-12);
    }

    #[test]
    fn test_miss_returns_background() {
        let world = empty_world();
        let mut rng = StdRng::seed_from_u64(1);
        let ray = Ray::new(Vec3::ZERO, Vec3::new(0.0, 1.0, 1.0));

        let expected = sky().sample(ray.direction());
        assert_eq!(shade(&ray, &world, 0, &sky(), &mut rng), expected);
    }

    #[test]
    fn test_depth_cap_is_black() {
        let world = empty_world();
        let mut rng = StdRng::seed_from_u64(1);
        let ray = Ray::new(Vec3::ZERO, Vec3::Y);

        assert_eq!(shade(&ray, &world, MAX_DEPTH + 1, &sky(), &mut rng), Color::ZERO);
        assert_ne!(shade(&ray, &world, MAX_DEPTH, &sky(), &mut rng), Color::ZERO);
    }

    #[test]
    fn test_emissive_surface_shows_its_color() {
        let red = Color::new(1.0, 0.0, 0.0);
        let mut world = Shapes::new();
        world.add(Box::new(Sphere::new(
            Vec3::new(0.0, 0.0, -3.0),
            1.0,
            Material::emissive(red).unwrap(),
        )));

        let mut rng = StdRng::seed_from_u64(9);
        let ray = Ray::new(Vec3::ZERO, -Vec3::Z);
        assert_eq!(shade(&ray, &world, 0, &sky(), &mut rng), red);
    }

    #[test]
    fn test_perfect_mirror_reflects_the_sky() {
        // Mirror facing up, looked at from above at 45 degrees
        let mirror = Material::new(0.0, 1.0, 0.0, 0.0, Color::ONE).unwrap();
        let mut world = Shapes::new();
        world.add(Box::new(Quad::new(
            Vec3::new(-5.0, 0.0, -5.0),
            Vec3::new(10.0, 0.0, 0.0),
            Vec3::new(0.0, 0.0, 10.0),
            mirror,
        )));

        let mut rng = StdRng::seed_from_u64(2);
        let ray = Ray::new(Vec3::new(0.0, 1.0, 1.0), Vec3::new(0.0, -1.0, -1.0));
        let color = shade(&ray, &world, 0, &sky(), &mut rng);

        // Reflected ray points along (0, 1, -1) / sqrt 2
        let expected = sky().sample(Vec3::new(0.0, 1.0, -1.0).normalize());
        assert!((color - expected).length() < 1e-9, "color = {color:?}");
    }

    #[test]
    fn test_shading_is_finite_and_non_negative() {
        let mut world = Shapes::new();
        world.add(Box::new(Sphere::new(
            Vec3::new(0.0, -100.5, -1.0),
            100.0,
            Material::default(),
        )));
        world.add(Box::new(Sphere::new(
            Vec3::new(0.0, 0.0, -1.0),
            0.5,
            Material::new(0.1, 0.6, 0.3, 0.0, Color::new(0.8, 0.6, 0.2))
                .unwrap()
                .with_fuzz(0.3),
        )));

        let mut rng = StdRng::seed_from_u64(42);
        for i in 0..200 {
            let angle = i as f64 * 0.01 - 1.0;
            let ray = Ray::new(Vec3::ZERO, Vec3::new(angle, angle * 0.5, -1.0));
            let color = shade(&ray, &world, 0, &sky(), &mut rng);
            assert!(color.is_finite());
            assert!(color.min_element() >= 0.0, "color = {color:?}");
        }
    }

    #[test]
    fn test_render_pixel_hits_sphere() {
        let mut world = Shapes::new();
        world.add(Box::new(Sphere::new(
            Vec3::new(0.0, 0.0, -1.0),
            0.5,
            Material::emissive(Color::new(0.2, 0.4, 0.6)).unwrap(),
        )));

        let settings = CameraSettings::default()
            .with_resolution(10, 1.0)
            .with_position(Vec3::ZERO, Vec3::new(0.0, 0.0, -1.0), Vec3::Y)
            .with_quality(4);
        let camera = Camera::new(settings).unwrap();
        let mut rng = StdRng::seed_from_u64(42);

        // All jittered samples of the center pixel land on the sphere
        let color = render_pixel(&camera, &world, 5, 5, &mut rng);
        assert!((color - Color::new(0.2, 0.4, 0.6)).length() < 1e-12);
    }

    #[test]
    fn test_color_to_rgb() {
        assert_eq!(color_to_rgb(Color::ZERO), [0, 0, 0]);
        assert_eq!(color_to_rgb(Color::ONE), [255, 255, 255]);
        assert_eq!(color_to_rgb(Color::new(0.5, 2.0, -1.0)), [127, 255, 0]);
        assert_eq!(color_to_rgb(Color::new(f64::NAN, 0.999, 0.0)), [0, 254, 0]);
    }

    #[test]
    fn test_pixel_buffer_layout() {
        let mut buffer = PixelBuffer::new(3, 2);
        buffer.set(2, 1, [1, 2, 3]);

        assert_eq!(buffer.get(2, 1), [1, 2, 3]);
        assert_eq!(buffer.pixels()[5], [1, 2, 3]);
        assert_eq!(buffer.as_rgb_bytes().len(), 18);
        assert_eq!(&buffer.as_rgb_bytes()[15..], &[1, 2, 3]);
    }
}
