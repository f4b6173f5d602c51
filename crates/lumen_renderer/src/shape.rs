//! Shape trait and the linear-scan composite.

use crate::{Hit, Material};
use lumen_math::{Aabb, Ray};

/// Trait for anything a ray can be intersected with.
pub trait Shape: Send + Sync {
    /// Test `ray` against this shape.
    ///
    /// Only intersections at distance `t` with `min_dist < t <= hit.dist` are
    /// accepted. On success `hit` is overwritten and true is returned;
    /// otherwise `hit` is left untouched.
    fn hit<'a>(&'a self, ray: &Ray, min_dist: f64, hit: &mut Hit<'a>) -> bool;

    /// Get the axis-aligned bounding box of this shape.
    fn bounding_box(&self) -> Aabb;

    /// Surface material. Containers have none; the primitive they forward
    /// to is what ends up in the [`Hit`].
    fn material(&self) -> Option<&Material> {
        None
    }
}

/// An owning, unordered collection of shapes queried by linear scan.
pub struct Shapes<'a> {
    shapes: Vec<Box<dyn Shape + 'a>>,
    bbox: Aabb,
}

impl<'a> Shapes<'a> {
    /// Create a new empty collection.
    pub fn new() -> Self {
        Self {
            shapes: Vec::new(),
            bbox: Aabb::EMPTY,
        }
    }

    /// Add a shape to the collection.
    pub fn add(&mut self, shape: Box<dyn Shape + 'a>) {
        self.bbox.union_with(&shape.bounding_box());
        self.shapes.push(shape);
    }

    /// Get the number of shapes.
    pub fn len(&self) -> usize {
        self.shapes.len()
    }

    /// Check if the collection is empty.
    pub fn is_empty(&self) -> bool {
        self.shapes.is_empty()
    }

    /// Borrow the shapes, e.g. to index them with a [`crate::Bvh`].
    pub fn as_slice(&self) -> &[Box<dyn Shape + 'a>] {
        &self.shapes
    }
}

impl Default for Shapes<'_> {
    fn default() -> Self {
        Self::new()
    }
}

impl<'a> FromIterator<Box<dyn Shape + 'a>> for Shapes<'a> {
    fn from_iter<I: IntoIterator<Item = Box<dyn Shape + 'a>>>(iter: I) -> Self {
        let mut shapes = Shapes::new();
        for shape in iter {
            shapes.add(shape);
        }
        shapes
    }
}

impl Shape for Shapes<'_> {
    fn hit<'a>(&'a self, ray: &Ray, min_dist: f64, hit: &mut Hit<'a>) -> bool {
        let mut hit_anything = false;
        for shape in &self.shapes {
            hit_anything |= shape.hit(ray, min_dist, hit);
        }
        hit_anything
    }

    fn bounding_box(&self) -> Aabb {
        self.bbox
    }
}
