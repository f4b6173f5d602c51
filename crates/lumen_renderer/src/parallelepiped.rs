//! Closed boxes and framed panels assembled from quads.

use crate::{ConfigError, Hit, Material, Quad, Shape, Shapes};
use lumen_math::{Aabb, Ray, Vec3};

/// A closed box spanned by three edge vectors from one corner.
///
/// Made of six [`Quad`] faces; intersection is a scan over the faces.
pub struct Parallelepiped {
    faces: Shapes<'static>,
}

impl Parallelepiped {
    pub fn new(corner: Vec3, side1: Vec3, side2: Vec3, side3: Vec3, material: Material) -> Self {
        let opposite = corner + side1 + side2 + side3;
        let faces: Shapes = [
            Quad::new(corner, side1, side2, material.clone()),
            Quad::new(corner, side2, side3, material.clone()),
            Quad::new(corner, side3, side1, material.clone()),
            Quad::new(opposite, -side2, -side1, material.clone()),
            Quad::new(opposite, -side3, -side2, material.clone()),
            Quad::new(opposite, -side1, -side3, material),
        ]
        .into_iter()
        .map(|face| Box::new(face) as Box<dyn Shape>)
        .collect();

        Self { faces }
    }
}

impl Shape for Parallelepiped {
    fn hit<'a>(&'a self, ray: &Ray, min_dist: f64, hit: &mut Hit<'a>) -> bool {
        self.faces.hit(ray, min_dist, hit)
    }

    fn bounding_box(&self) -> Aabb {
        self.faces.bounding_box()
    }
}

/// Offset of the inner panel from the frame plane.
const FRAME_INSET_DEPTH: f64 = 0.001;

/// A quad with a border: an outer quad drawn with `frame_material` and an
/// inner quad drawn with `material`.
///
/// The inner quad is inset by `frame_size` on every edge and shifted by
/// [`FRAME_INSET_DEPTH`] against the normal `side1 x side2`, so it covers
/// the outer quad when seen from that side.
pub struct FramedQuad {
    parts: Shapes<'static>,
}

impl FramedQuad {
    pub fn new(
        corner: Vec3,
        side1: Vec3,
        side2: Vec3,
        frame_size: f64,
        material: Material,
        frame_material: Material,
    ) -> Result<Self, ConfigError> {
        let (len1, len2) = (side1.length(), side2.length());
        if !(frame_size >= 0.0 && 2.0 * frame_size < len1 && 2.0 * frame_size < len2) {
            return Err(ConfigError::InvalidFrameSize {
                frame_size,
                side1: len1,
                side2: len2,
            });
        }

        let dir1 = side1 / len1;
        let dir2 = side2 / len2;
        let behind = side1.cross(side2).normalize_or_zero() * FRAME_INSET_DEPTH;
        let inner_corner = corner + (dir1 + dir2) * frame_size - behind;
        let inner_side1 = side1 - dir1 * (2.0 * frame_size);
        let inner_side2 = side2 - dir2 * (2.0 * frame_size);

        let mut parts = Shapes::new();
        parts.add(Box::new(Quad::new(inner_corner, inner_side1, inner_side2, material)));
        parts.add(Box::new(Quad::new(corner, side1, side2, frame_material)));

        Ok(Self { parts })
    }
}

impl Shape for FramedQuad {
    fn hit<'a>(&'a self, ray: &Ray, min_dist: f64, hit: &mut Hit<'a>) -> bool {
        self.parts.hit(ray, min_dist, hit)
    }

    fn bounding_box(&self) -> Aabb {
        self.parts.bounding_box()
    }
}
