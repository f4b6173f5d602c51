//! Planar parallelogram primitive.

use crate::{Hit, Material, Shape};
use lumen_math::{Aabb, Ray, Vec3};

/// A parallelogram spanned by `side1` and `side2` from `corner`.
///
/// Unlike [`crate::Sphere`], the reported normal is flipped to face the
/// incoming ray.
#[derive(Debug, Clone)]
pub struct Quad {
    corner: Vec3,
    side1: Vec3,
    side2: Vec3,
    /// `side1 x side2`, not normalized
    normal: Vec3,
    unit_normal: Vec3,
    /// Plane constant: `normal . p == d` for every point on the plane
    d: f64,
    /// `normal / |normal|^2`, used to solve for the local coordinates
    w: Vec3,
    material: Material,
    bbox: Aabb,
}

impl Quad {
    pub fn new(corner: Vec3, side1: Vec3, side2: Vec3, material: Material) -> Self {
        let normal = side1.cross(side2);
        let length_sq = normal.length_squared();
        let w = if length_sq > 0.0 {
            normal / length_sq
        } else {
            Vec3::ZERO
        };

        let diagonal1 = Aabb::from_points(corner, corner + side1 + side2);
        let diagonal2 = Aabb::from_points(corner + side1, corner + side2);
        let bbox = Aabb::surrounding(&diagonal1, &diagonal2);

        Self {
            corner,
            side1,
            side2,
            normal,
            unit_normal: normal.normalize_or_zero(),
            d: normal.dot(corner),
            w,
            material,
            bbox,
        }
    }
}

impl Shape for Quad {
    fn hit<'a>(&'a self, ray: &Ray, min_dist: f64, hit: &mut Hit<'a>) -> bool {
        let den = self.normal.dot(ray.direction());
        if den == 0.0 {
            // Parallel to the plane
            return false;
        }

        let t = (self.d - self.normal.dot(ray.origin())) / den;
        if !hit.accepts(min_dist, t) {
            return false;
        }

        // Solve point = corner + alpha * side1 + beta * side2
        let point = ray.at(t);
        let planar = point - self.corner;
        let alpha = self.w.dot(planar.cross(self.side2));
        if !(0.0..=1.0).contains(&alpha) {
            return false;
        }
        let beta = self.w.dot(self.side1.cross(planar));
        if !(0.0..=1.0).contains(&beta) {
            return false;
        }

        hit.point = point;
        hit.dist = t;
        hit.normal = if self.unit_normal.dot(ray.direction()) > 0.0 {
            -self.unit_normal
        } else {
            self.unit_normal
        };
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

#[cfg(test)]
mod tests {
    use super::*;

    fn unit_quad() -> Quad {
        Quad::new(
            Vec3::new(-0.5, -0.5, 0.0),
            Vec3::X,
            Vec3::Y,
            Material::default(),
        )
    }

    #[test]
    fn test_quad_hit_center() {
        let quad = unit_quad();
        let ray = Ray::new(Vec3::new(0.0, 0.0, -1.0), Vec3::Z);

        let mut hit = Hit::new();
        assert!(quad.hit(&ray, 1e-5, &mut hit));
        assert!((hit.dist - 1.0).abs() < 1e-12);
        assert!(hit.point.length() < 1e-12);
    }

    #[test]
    fn test_normal_faces_the_ray() {
        let quad = unit_quad();

        let from_front = Ray::new(Vec3::new(0.0, 0.0, -1.0), Vec3::Z);
        let mut hit = Hit::new();
        assert!(quad.hit(&from_front, 1e-5, &mut hit));
        assert_eq!(hit.normal, -Vec3::Z);

        let from_back = Ray::new(Vec3::new(0.0, 0.0, 1.0), -Vec3::Z);
        let mut hit = Hit::new();
        assert!(quad.hit(&from_back, 1e-5, &mut hit));
        assert_eq!(hit.normal, Vec3::Z);
    }

    #[test]
    fn test_outside_parameter_range_misses() {
        let quad = unit_quad();

        for origin in [
            Vec3::new(0.6, 0.0, -1.0),
            Vec3::new(0.0, -0.6, -1.0),
            Vec3::new(2.0, 2.0, -1.0),
        ] {
            let ray = Ray::new(origin, Vec3::Z);
            let mut hit = Hit::new();
            assert!(!quad.hit(&ray, 1e-5, &mut hit), "origin {origin:?}");
        }
    }

    #[test]
    fn test_parallel_ray_misses() {
        let quad = unit_quad();
        let ray = Ray::new(Vec3::new(-2.0, 0.0, 0.0), Vec3::X);
        let mut hit = Hit::new();
        assert!(!quad.hit(&ray, 1e-5, &mut hit));
    }

    #[test]
    fn test_behind_origin_misses() {
        let quad = unit_quad();
        let ray = Ray::new(Vec3::new(0.0, 0.0, 1.0), Vec3::Z);
        let mut hit = Hit::new();
        assert!(!quad.hit(&ray, 1e-5, &mut hit));
    }

    #[test]
    fn test_skewed_quad_local_coordinates() {
        // Parallelogram, not a rectangle
        let quad = Quad::new(
            Vec3::ZERO,
            Vec3::new(2.0, 0.0, 0.0),
            Vec3::new(1.0, 1.0, 0.0),
            Material::default(),
        );

        // (2.9, 0.9) lies inside: alpha = 1.0, beta = 0.9
        let inside = Ray::new(Vec3::new(2.9, 0.9, 5.0), -Vec3::Z);
        let mut hit = Hit::new();
        assert!(quad.hit(&inside, 1e-5, &mut hit));
        assert!((hit.dist - 5.0).abs() < 1e-12);

        // (0.2, 0.9) is left of the slanted edge
        let outside = Ray::new(Vec3::new(0.2, 0.9, 5.0), -Vec3::Z);
        let mut hit = Hit::new();
        assert!(!quad.hit(&outside, 1e-5, &mut hit));
    }

    #[test]
    fn test_flat_bounding_box_is_padded() {
        let bbox = unit_quad().bounding_box();
        assert!(bbox.z.size() > 0.0);
        assert!(bbox.hit(&Ray::new(Vec3::new(0.0, 0.0, -1.0), Vec3::Z)));
    }

    #[test]
    fn test_degenerate_sides_never_hit() {
        let quad = Quad::new(Vec3::ZERO, Vec3::X, Vec3::X * 2.0, Material::default());
        let ray = Ray::new(Vec3::new(0.5, 0.0, -1.0), Vec3::Z);
        let mut hit = Hit::new();
        assert!(!quad.hit(&ray, 1e-5, &mut hit));
    }
}
