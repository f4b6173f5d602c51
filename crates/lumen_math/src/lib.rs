//! Lumen math types.
//!
//! Double precision vectors come from glam (`DVec3`, re-exported as `Vec3`).
//! This crate adds the ray, interval and bounding box types the tracer is
//! built on.

pub use glam::{dvec3, DVec3};

/// Three component f64 vector used for points, directions and colors.
pub type Vec3 = DVec3;

mod aabb;
mod interval;
mod ray;

pub use aabb::Aabb;
pub use interval::Interval;
pub use ray::Ray;
