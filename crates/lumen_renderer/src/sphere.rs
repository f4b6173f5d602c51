//! Sphere primitive for ray tracing.

use crate::{Hit, Material, Shape};
use lumen_math::{Aabb, Ray, Vec3};

/// A sphere primitive.
#[derive(Debug, Clone)]
pub struct Sphere {
    center: Vec3,
    radius: f64,
    radius_squared: f64,
    material: Material,
    bbox: Aabb,
}

impl Sphere {
    /// Create a new sphere. Negative radii are clamped to zero.
    pub fn new(center: Vec3, radius: f64, material: Material) -> Self {
        let radius = radius.max(0.0);
        let rvec = Vec3::splat(radius);
        let bbox = Aabb::from_points(center - rvec, center + rvec);

        Self {
            center,
            radius,
            radius_squared: radius * radius,
            material,
            bbox,
        }
    }

    /// True if the two spheres overlap.
    pub fn overlaps(&self, other: &Sphere) -> bool {
        (other.center - self.center).length() < self.radius + other.radius
    }
}

impl Shape for Sphere {
    fn hit<'a>(&'a self, ray: &Ray, min_dist: f64, hit: &mut Hit<'a>) -> bool {
        // Project the center onto the ray; the chord half-length follows
        // from the distance between the center and that projection.
        let oc = self.center - ray.origin();
        let projection = oc.dot(ray.direction());
        if projection < 0.0 {
            // Center is behind the origin
            return false;
        }

        let center_to_ray_sq = oc.length_squared() - projection * projection;
        let half_chord_sq = self.radius_squared - center_to_ray_sq;
        if half_chord_sq <= 0.0 {
            return false;
        }

        // Nearer root only
        let dist = projection - half_chord_sq.sqrt();
        if !hit.accepts(min_dist, dist) {
            return false;
        }

        let point = ray.at(dist);
        hit.point = point;
        hit.dist = dist;
        hit.normal = (point - self.center).normalize_or_zero();
        hit.shape = Some(self);
        true
    }

    fn bounding_box(&self) -> Aabb {
        self.bbox
    }

    fn material(&self) -> Option<&Material> {
        Some(&self.material)
    }
}
