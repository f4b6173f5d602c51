//! Demo scenes built in code.
//!
//! A [`Scene`] hands back owned shapes split in two groups: a few large
//! ones tested directly, and many small ones meant for a [`Bvh`]. Use
//! [`assemble`] to turn them into a world.

use clap::ValueEnum;
use lumen_math::Vec3;
use lumen_renderer::{
    Bvh, CameraSettings, Color, ConfigError, FramedQuad, Material, Parallelepiped, Quad, Shape,
    Shapes, SkyGradient, Sphere,
};
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};
use serde::{Deserialize, Serialize};

/// Scenes selectable with `--scene`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, ValueEnum, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum SceneKind {
    /// Two spheres resting on a huge ground sphere
    #[default]
    Spheres,
    /// A framed mirror behind a field of small colored spheres
    FramedMirror,
    /// Traffic lights made of boxes, lit by a pink moon
    Parallelepipeds,
}

/// Viewpoint chosen by a scene.
#[derive(Debug, Clone, PartialEq)]
pub struct View {
    pub look_from: Vec3,
    pub look_at: Vec3,
    pub vfov: f64,
    pub aspect_ratio: f64,
    pub background: SkyGradient,
}

impl View {
    /// Replace the viewpoint fields of `camera`, keeping its resolution,
    /// sample count and cores.
    pub fn apply(&self, camera: CameraSettings) -> CameraSettings {
        let width = camera.image_width;
        camera
            .with_resolution(width, self.aspect_ratio)
            .with_position(self.look_from, self.look_at, Vec3::Y)
            .with_fov(self.vfov)
            .with_backgrounds(self.background.bottom, self.background.top)
    }
}

pub struct Scene {
    /// Shapes added to the world directly
    pub big: Vec<Box<dyn Shape>>,
    /// Shapes indexed by a BVH
    pub small: Vec<Box<dyn Shape>>,
    pub view: View,
}

impl Scene {
    /// Build the scene of the given kind. `seed` drives any random layout.
    pub fn build(kind: SceneKind, seed: u64) -> Result<Self, ConfigError> {
        let mut rng = StdRng::seed_from_u64(seed);
        let scene = match kind {
            SceneKind::Spheres => spheres()?,
            SceneKind::FramedMirror => framed_mirror(&mut rng)?,
            SceneKind::Parallelepipeds => parallelepipeds()?,
        };

        log::info!(
            "Built scene {:?}: {} big shapes, {} small shapes",
            kind,
            scene.big.len(),
            scene.small.len()
        );
        Ok(scene)
    }
}

/// Combine the big shapes with a BVH over `small` into one world.
pub fn assemble<'a>(big: Vec<Box<dyn Shape>>, small: &'a [Box<dyn Shape>]) -> Shapes<'a> {
    let mut world = Shapes::new();
    for shape in big {
        world.add(shape);
    }
    if !small.is_empty() {
        world.add(Box::new(Bvh::new(small)));
    }
    world
}

/// Rejects spheres that would overlap one already placed.
#[derive(Debug, Default)]
pub struct SpherePlacer {
    placed: Vec<Sphere>,
}

impl SpherePlacer {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn can_place(&self, sphere: &Sphere) -> bool {
        !self.placed.iter().any(|other| other.overlaps(sphere))
    }

    /// Record `sphere` if it fits, returning whether it was accepted.
    pub fn try_place(&mut self, sphere: &Sphere) -> bool {
        if self.can_place(sphere) {
            self.placed.push(sphere.clone());
            true
        } else {
            false
        }
    }

    /// Number of spheres placed so far.
    pub fn len(&self) -> usize {
        self.placed.len()
    }
}

fn spheres() -> Result<Scene, ConfigError> {
    let small_radius = 10.0;
    let big_radius = 1000.0;

    let big: Vec<Box<dyn Shape>> = vec![
        Box::new(Sphere::new(
            Vec3::new(0.0, small_radius, 50.0),
            small_radius,
            Material::default(),
        )),
        Box::new(Sphere::new(
            Vec3::new(-35.0, small_radius, 50.0),
            small_radius,
            Material::default(),
        )),
        Box::new(Sphere::new(
            Vec3::new(0.0, -big_radius, 50.0),
            big_radius,
            Material::default(),
        )),
    ];

    Ok(Scene {
        big,
        small: Vec::new(),
        view: View {
            look_from: Vec3::new(-17.5, 15.0, -20.0),
            look_at: Vec3::new(-17.5, 8.0, 50.0),
            vfov: 50.0,
            aspect_ratio: 1.5,
            background: SkyGradient::default(),
        },
    })
}

/// Small spheres to scatter in front of the mirror.
const FRAMED_MIRROR_SPHERES: usize = 300;

/// Give up after this many rejected candidates per wanted sphere.
const PLACEMENT_ATTEMPTS: usize = 100;

fn framed_mirror(rng: &mut StdRng) -> Result<Scene, ConfigError> {
    let green_metal = Material::new(0.0, 0.5, 0.0, 0.0, Color::new(0.0, 0.5, 0.0))?;
    let red_stuff = Material::new(0.0, 0.0, 0.5, 0.5, Color::new(0.7, 0.0, 0.0))?;
    let mirror_attenuated = Material::new(0.3, 0.8, 0.0, 0.0, Color::ONE)?;

    let ground_radius = 300.0;
    let ground_center = Vec3::new(0.0, -ground_radius, 1.0);
    let mut big: Vec<Box<dyn Shape>> = vec![Box::new(Sphere::new(
        ground_center,
        ground_radius,
        green_metal,
    ))];

    // Mirror wall with a red frame
    let quad_width = 15.0;
    let quad_height = 5.0;
    let quad_depth = 10.1;
    big.push(Box::new(FramedQuad::new(
        Vec3::new(-quad_width / 2.0, 0.0, quad_depth),
        Vec3::new(quad_width, 0.0, 0.0),
        Vec3::new(0.0, quad_height, 0.0),
        0.2,
        mirror_attenuated,
        red_stuff,
    )?));

    // Scatter small spheres resting on the ground
    let radius = 0.5;
    let mut placer = SpherePlacer::new();
    let mut small: Vec<Box<dyn Shape>> = Vec::with_capacity(FRAMED_MIRROR_SPHERES);
    let mut attempts = 0;
    while small.len() < FRAMED_MIRROR_SPHERES {
        if attempts == FRAMED_MIRROR_SPHERES * PLACEMENT_ATTEMPTS {
            log::warn!(
                "Placed only {} of {} spheres",
                placer.len(),
                FRAMED_MIRROR_SPHERES
            );
            break;
        }
        attempts += 1;

        let x = rng.gen_range(-20.0..20.0);
        let z = rng.gen_range(-20.0..quad_depth - 5.0);
        let position = rest_on_sphere(Vec3::new(x, 0.0, z), radius, ground_center, ground_radius);
        let color = Color::new(rng.gen(), rng.gen(), rng.gen());
        let sphere = Sphere::new(position, radius, Material::new(0.0, 0.0, 0.5, 0.5, color)?);

        if placer.try_place(&sphere) {
            small.push(Box::new(sphere));
        }
    }

    Ok(Scene {
        big,
        small,
        view: View {
            look_from: Vec3::new(0.0, 6.0, -20.0),
            look_at: Vec3::new(0.0, 1.0, 0.0),
            vfov: 30.0,
            aspect_ratio: 1.5,
            background: SkyGradient::default(),
        },
    })
}

/// Move a sphere of `radius` at `position` along the line to `center` so
/// it touches the outside of the sphere (`center`, `ground_radius`).
fn rest_on_sphere(position: Vec3, radius: f64, center: Vec3, ground_radius: f64) -> Vec3 {
    let to_center = center - position;
    let gap = to_center.length() - ground_radius - radius;
    position + to_center.normalize_or_zero() * gap
}

fn parallelepipeds() -> Result<Scene, ConfigError> {
    let attenuated_mirror = Material::new(0.4, 0.6, 0.1, 0.0, Color::ONE)?.with_fuzz(0.015);
    let pink = Color::new(255.0, 192.0, 203.0) / 255.0;
    let pink_light = Material::emissive(pink * 10.0)?;

    let ground_size = 20.0;
    let mut big: Vec<Box<dyn Shape>> = vec![Box::new(Quad::new(
        Vec3::new(-ground_size / 2.0, 0.0, -ground_size / 2.0),
        Vec3::new(ground_size, 0.0, 0.0),
        Vec3::new(0.0, 0.0, ground_size),
        attenuated_mirror,
    ))];

    for (i, signal) in [Signal::Stop, Signal::Caution, Signal::Go].into_iter().enumerate() {
        let center = Vec3::new((i as f64 - 1.0) * 4.0, 0.0, 0.0);
        big.push(Box::new(traffic_light(center, 0.5, 10.0, signal)?));
    }

    big.push(Box::new(axis(Vec3::new(-7.0, 0.0, 7.0), 0.1, 2.0)?));
    big.push(Box::new(Sphere::new(Vec3::new(20.0, 10.0, 10.0), 10.0, pink_light)));

    Ok(Scene {
        big,
        small: Vec::new(),
        view: View {
            look_from: Vec3::new(5.0, 20.0, 30.0),
            look_at: Vec3::ZERO,
            vfov: 20.0,
            aspect_ratio: 1.0,
            background: SkyGradient::new(Color::new(0.2, 0.2, 0.3), Color::new(0.2, 0.2, 0.5)),
        },
    })
}

/// Which lamp of a traffic light is lit.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Signal {
    Stop,
    Caution,
    Go,
}

/// A pole on a square base, carrying a box with three lamps.
///
/// `scaler` sets the overall size. The lit lamp is scaled by `intensity`,
/// the others are dimmed.
pub fn traffic_light(
    center: Vec3,
    scaler: f64,
    intensity: f64,
    signal: Signal,
) -> Result<Shapes<'static>, ConfigError> {
    const DIMMED: f64 = 0.2;

    let dark_diffuse = Material::new(0.8, 0.0, 0.2, 0.0, Color::ONE)?;
    let mut red = Material::emissive(Color::new(1.0, 0.0, 0.0))?;
    let mut orange = Material::emissive(Color::new(1.0, 0.5, 0.0))?;
    let mut green = Material::emissive(Color::new(0.0, 1.0, 0.0))?;

    for (lamp, lit) in [
        (&mut red, Signal::Stop),
        (&mut orange, Signal::Caution),
        (&mut green, Signal::Go),
    ] {
        lamp.multiply_color(if signal == lit { intensity } else { DIMMED });
    }

    let pole_length = 7.0 * scaler;
    let top = center + Vec3::new(0.0, pole_length, 0.0);
    let mut parts = Shapes::new();

    // Lamp housing
    let box_width = scaler;
    let box_height = scaler * 3.0;
    parts.add(Box::new(Parallelepiped::new(
        top - Vec3::new(box_width / 2.0, 0.0, box_width / 2.0),
        Vec3::new(box_width, 0.0, 0.0),
        Vec3::new(0.0, box_height, 0.0),
        Vec3::new(0.0, 0.0, box_width),
        dark_diffuse.clone(),
    )));

    // Pole, hanging down from the housing
    let pole_width = scaler / 4.0;
    parts.add(Box::new(Parallelepiped::new(
        top - Vec3::new(pole_width / 2.0, 0.0, pole_width / 2.0),
        Vec3::new(pole_width, 0.0, 0.0),
        Vec3::new(0.0, -pole_length, 0.0),
        Vec3::new(0.0, 0.0, pole_width),
        dark_diffuse.clone(),
    )));

    // Base
    let base_length = scaler * 4.0;
    let base_height = scaler * 0.3;
    parts.add(Box::new(Parallelepiped::new(
        top + Vec3::new(-base_length / 2.0, -pole_length, -base_length / 2.0),
        Vec3::new(base_length, 0.0, 0.0),
        Vec3::new(0.0, base_height, 0.0),
        Vec3::new(0.0, 0.0, base_length),
        dark_diffuse,
    )));

    // Lamps, top to bottom
    let lamp_radius = scaler * 0.3;
    let lamp_center = top + Vec3::new(0.0, scaler * 1.5, scaler * 0.4);
    for (offset, material) in [(scaler, red), (0.0, orange), (-scaler, green)] {
        parts.add(Box::new(Sphere::new(
            lamp_center + Vec3::new(0.0, offset, 0.0),
            lamp_radius,
            material,
        )));
    }

    Ok(parts)
}

/// Coordinate axis marker: thin red, green and blue boxes along +x, +y
/// and +z from `center`.
pub fn axis(center: Vec3, width: f64, length: f64) -> Result<Shapes<'static>, ConfigError> {
    let half = width / 2.0;
    let mut parts = Shapes::new();

    parts.add(Box::new(Parallelepiped::new(
        center + Vec3::new(0.0, -half, -half),
        Vec3::new(0.0, 0.0, width),
        Vec3::new(length, 0.0, 0.0),
        Vec3::new(0.0, width, 0.0),
        Material::emissive(Color::new(1.0, 0.0, 0.0))?,
    )));
    parts.add(Box::new(Parallelepiped::new(
        center + Vec3::new(-half, 0.0, -half),
        Vec3::new(width, 0.0, 0.0),
        Vec3::new(0.0, length, 0.0),
        Vec3::new(0.0, 0.0, width),
        Material::emissive(Color::new(0.0, 1.0, 0.0))?,
    )));
    parts.add(Box::new(Parallelepiped::new(
        center + Vec3::new(-half, -half, 0.0),
        Vec3::new(width, 0.0, 0.0),
        Vec3::new(0.0, width, 0.0),
        Vec3::new(0.0, 0.0, length),
        Material::emissive(Color::new(0.0, 0.0, 1.0))?,
    )));

    Ok(parts)
}
