use crate::{Interval, Ray, Vec3};

/// Minimum thickness of a padded box axis.
const PAD_DELTA: f64 = 0.0001;

/// Axis-Aligned Bounding Box for spatial acceleration structures (BVH).
///
/// An AABB is defined by three intervals (one per axis) that bound a 3D volume.
/// The default box is empty and acts as the identity for [`Aabb::union_with`].
#[derive(Debug, Copy, Clone, PartialEq, Default)]
pub struct Aabb {
    pub x: Interval,
    pub y: Interval,
    pub z: Interval,
}

impl Aabb {
    /// Create a new AABB from three intervals, padding degenerate axes.
    pub fn new(x: Interval, y: Interval, z: Interval) -> Self {
        let mut aabb = Self { x, y, z };
        aabb.pad_to_minimums();
        aabb
    }

    /// Create an AABB from two corner points.
    pub fn from_points(a: Vec3, b: Vec3) -> Self {
        Self::new(
            Interval::new(a.x.min(b.x), a.x.max(b.x)),
            Interval::new(a.y.min(b.y), a.y.max(b.y)),
            Interval::new(a.z.min(b.z), a.z.max(b.z)),
        )
    }

    /// Create an AABB that surrounds two other AABBs.
    pub fn surrounding(box0: &Aabb, box1: &Aabb) -> Self {
        Self {
            x: Interval::surrounding(&box0.x, &box1.x),
            y: Interval::surrounding(&box0.y, &box1.y),
            z: Interval::surrounding(&box0.z, &box1.z),
        }
    }

    /// Grow this box so it also encloses `other`.
    pub fn union_with(&mut self, other: &Aabb) {
        self.x.union_with(&other.x);
        self.y.union_with(&other.y);
        self.z.union_with(&other.z);
    }

    /// Get the interval for a specific axis (0=X, 1=Y, 2=Z).
    pub fn axis_interval(&self, n: usize) -> Interval {
        match n {
            0 => self.x,
            1 => self.y,
            _ => self.z,
        }
    }

    /// True if any axis is empty.
    pub fn is_empty(&self) -> bool {
        self.x.is_empty() || self.y.is_empty() || self.z.is_empty()
    }

    /// True if `other` lies entirely inside this box.
    pub fn contains_box(&self, other: &Aabb) -> bool {
        (0..3).all(|axis| {
            let outer = self.axis_interval(axis);
            let inner = other.axis_interval(axis);
            outer.min <= inner.min && inner.max <= outer.max
        })
    }

    /// Test if a ray's supporting line crosses this AABB.
    pub fn hit(&self, r: &Ray) -> bool {
        self.hit_within(r, Interval::UNIVERSE)
    }

    /// Test if a ray intersects this AABB within the given parametric window.
    ///
    /// Uses the slab method. A zero direction component gives an infinite
    /// inverse direction, which the min/max updates absorb without a branch.
    pub fn hit_within(&self, r: &Ray, mut ray_t: Interval) -> bool {
        let origin = r.origin();
        let direction = r.direction();

        for axis in 0..3 {
            let slab = self.axis_interval(axis);
            let adinv = 1.0 / direction[axis];
            let mut t0 = (slab.min - origin[axis]) * adinv;
            let mut t1 = (slab.max - origin[axis]) * adinv;
            if adinv < 0.0 {
                std::mem::swap(&mut t0, &mut t1);
            }
            if t0 > ray_t.min {
                ray_t.min = t0;
            }
            if t1 < ray_t.max {
                ray_t.max = t1;
            }
            if ray_t.max <= ray_t.min {
                return false;
            }
        }

        true
    }

    /// Pad intervals to avoid zero-width AABBs (degenerate cases).
    fn pad_to_minimums(&mut self) {
        if self.x.size() < PAD_DELTA {
            self.x = self.x.expand(PAD_DELTA);
        }
        if self.y.size() < PAD_DELTA {
            self.y = self.y.expand(PAD_DELTA);
        }
        if self.z.size() < PAD_DELTA {
            self.z = self.z.expand(PAD_DELTA);
        }
    }

    /// Returns the center point of the bounding box.
    pub fn centroid(&self) -> Vec3 {
        Vec3::new(self.x.center(), self.y.center(), self.z.center())
    }

    pub const EMPTY: Aabb = Aabb {
        x: Interval::EMPTY,
        y: Interval::EMPTY,
        z: Interval::EMPTY,
    };
}
