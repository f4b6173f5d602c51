//! Closest-hit accumulator shared by every intersection query.

use crate::{Material, Shape};
use lumen_math::Vec3;

/// Record of the closest ray-shape intersection found so far.
///
/// A `Hit` is threaded by `&mut` through a whole traversal. Shapes only
/// overwrite it with intersections at `dist` no greater than the current
/// one, so after any query it holds the closest accepted hit.
#[derive(Clone, Copy)]
pub struct Hit<'a> {
    /// Point of intersection
    pub point: Vec3,
    /// Surface normal at the intersection (unit length)
    pub normal: Vec3,
    /// Distance along the ray
    pub dist: f64,
    /// Primitive that was hit
    pub shape: Option<&'a dyn Shape>,
}

impl<'a> Hit<'a> {
    /// An empty record: no shape, distance `f64::MAX`.
    pub fn new() -> Self {
        Self {
            point: Vec3::ZERO,
            normal: Vec3::ZERO,
            dist: f64::MAX,
            shape: None,
        }
    }

    /// True once any shape has been recorded.
    pub fn is_hit(&self) -> bool {
        self.shape.is_some()
    }

    /// Material of the recorded primitive, if any.
    pub fn material(&self) -> Option<&'a Material> {
        self.shape.and_then(|shape| shape.material())
    }

    /// Accept `dist` if it lies in `(min_dist, self.dist]`.
    ///
    /// A tie replaces the current record, so when two shapes are hit at
    /// exactly the same distance the one tested last wins. The distance is
    /// the same either way, but the shape and normal depend on traversal
    /// order and may differ between a BVH and a linear scan.
    #[inline]
    pub fn accepts(&self, min_dist: f64, dist: f64) -> bool {
        min_dist < dist && dist <= self.dist
    }
}

impl<'a> Default for Hit<'a> {
    fn default() -> Self {
        Self::new()
    }
}

impl std::fmt::Debug for Hit<'_> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Hit")
            .field("point", &self.point)
            .field("normal", &self.normal)
            .field("dist", &self.dist)
            .field("is_hit", &self.is_hit())
            .finish()
    }
}
