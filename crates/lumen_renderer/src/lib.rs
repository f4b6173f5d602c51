//! Lumen renderer - CPU path tracing
//!
//! A Monte Carlo path tracer over spheres and quads. Scenes are trees of
//! [`Shape`] trait objects, optionally indexed by a [`Bvh`], and rendered
//! by a [`Camera`] on a fixed pool of threads.

mod bvh;
mod camera;
mod chunk;
mod error;
mod hit;
mod material;
mod parallelepiped;
mod quad;
mod renderer;
pub mod sampling;
mod shape;
mod sphere;

pub use bvh::Bvh;
pub use camera::{Camera, CameraSettings, MAX_PIXELS};
pub use chunk::{partition, render};
pub use error::{ConfigError, RenderError, RenderResult};
pub use hit::Hit;
pub use material::{Color, Material};
pub use parallelepiped::{FramedQuad, Parallelepiped};
pub use quad::Quad;
pub use renderer::{
    color_to_rgb, render_pixel, shade, PixelBuffer, SkyGradient, MAX_DEPTH, MIN_HIT_DISTANCE,
};
pub use shape::{Shape, Shapes};
pub use sphere::Sphere;

/// Re-export Vec3 and common math types from lumen_math
pub use lumen_math::{Aabb, Interval, Ray, Vec3};
