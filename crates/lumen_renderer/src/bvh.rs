//! Bounding Volume Hierarchy (BVH) acceleration structure.
//!
//! A binary tree of boxes over a caller-owned slice of shapes. Nodes store
//! indices into that slice, and the borrow ties the tree's lifetime to the
//! shapes it indexes.

use crate::{Hit, Shape};
use lumen_math::{Aabb, Interval, Ray};

/// Maximum primitives per leaf node before splitting.
const LEAF_MAX_SIZE: usize = 4;

/// BVH node - either a branch with two children or a leaf with primitives.
enum BvhNode {
    /// Internal node with two children.
    Branch {
        left: Box<BvhNode>,
        right: Box<BvhNode>,
        bbox: Aabb,
    },
    /// Leaf node with at most [`LEAF_MAX_SIZE`] shape indices.
    Leaf { indices: Vec<usize>, bbox: Aabb },
}

/// Immutable BVH over `&'a [Box<dyn Shape>]`.
pub struct Bvh<'a> {
    shapes: &'a [Box<dyn Shape + 'a>],
    root: BvhNode,
}

impl<'a> Bvh<'a> {
    /// Build a BVH over `shapes`.
    ///
    /// Median split: at each level the shapes are sorted by the center of
    /// their box on one axis (x, y, z in turn) and cut in half.
    pub fn new(shapes: &'a [Box<dyn Shape + 'a>]) -> Self {
        let boxes: Vec<Aabb> = shapes.iter().map(|shape| shape.bounding_box()).collect();
        let root = build(&boxes, (0..shapes.len()).collect(), 0);
        let bvh = Self { shapes, root };

        log::debug!(
            "Built BVH over {} shapes, depth {}",
            bvh.len(),
            bvh.depth()
        );
        bvh
    }

    /// Number of indexed shapes.
    pub fn len(&self) -> usize {
        self.shapes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.shapes.is_empty()
    }

    /// Number of levels; a lone leaf has depth 1.
    pub fn depth(&self) -> usize {
        self.root.depth()
    }

    /// Indices of every shape in a leaf the ray can reach.
    ///
    /// Branch boxes are tested against the unbounded ray line. Testing the
    /// returned shapes directly gives the same closest hit as testing all
    /// of them.
    pub fn candidates(&self, ray: &Ray) -> Vec<usize> {
        let mut out = Vec::new();
        self.root.collect_candidates(ray, &mut out);
        out
    }
}

fn build(boxes: &[Aabb], mut indices: Vec<usize>, axis: usize) -> BvhNode {
    let bbox = indices.iter().fold(Aabb::EMPTY, |mut acc, &i| {
        acc.union_with(&boxes[i]);
        acc
    });

    // Create leaf for small sets
    if indices.len() <= LEAF_MAX_SIZE {
        return BvhNode::Leaf { indices, bbox };
    }

    // Largest center first
    indices.sort_by(|&a, &b| {
        let a_center = boxes[a].axis_interval(axis).center();
        let b_center = boxes[b].axis_interval(axis).center();
        b_center.total_cmp(&a_center)
    });

    // The left half takes the extra shape when the count is odd
    let mid = (indices.len() + 1) / 2;
    let right_indices = indices.split_off(mid);

    let next_axis = (axis + 1) % 3;
    BvhNode::Branch {
        left: Box::new(build(boxes, indices, next_axis)),
        right: Box::new(build(boxes, right_indices, next_axis)),
        bbox,
    }
}

impl BvhNode {
    fn hit<'a>(
        &self,
        shapes: &'a [Box<dyn Shape + 'a>],
        ray: &Ray,
        min_dist: f64,
        hit: &mut Hit<'a>,
    ) -> bool {
        match self {
            BvhNode::Leaf { indices, .. } => {
                let mut hit_anything = false;
                for &i in indices {
                    hit_anything |= shapes[i].hit(ray, min_dist, hit);
                }
                hit_anything
            }

            BvhNode::Branch { left, right, bbox } => {
                // Nothing below can beat the current closest hit if the box
                // is missed inside (min_dist, hit.dist)
                if !bbox.hit_within(ray, Interval::new(min_dist, hit.dist)) {
                    return false;
                }

                let hit_left = left.hit(shapes, ray, min_dist, hit);
                let hit_right = right.hit(shapes, ray, min_dist, hit);
                hit_left || hit_right
            }
        }
    }

    fn collect_candidates(&self, ray: &Ray, out: &mut Vec<usize>) {
        match self {
            BvhNode::Leaf { indices, .. } => out.extend_from_slice(indices),
            BvhNode::Branch { left, right, bbox } => {
                if bbox.hit(ray) {
                    left.collect_candidates(ray, out);
                    right.collect_candidates(ray, out);
                }
            }
        }
    }

    fn depth(&self) -> usize {
        match self {
            BvhNode::Leaf { .. } => 1,
            BvhNode::Branch { left, right, .. } => 1 + left.depth().max(right.depth()),
        }
    }

    fn bbox(&self) -> Aabb {
        match self {
            BvhNode::Leaf { bbox, .. } | BvhNode::Branch { bbox, .. } => *bbox,
        }
    }
}

impl Shape for Bvh<'_> {
    fn hit<'a>(&'a self, ray: &Ray, min_dist: f64, hit: &mut Hit<'a>) -> bool {
        self.root.hit(self.shapes, ray, min_dist, hit)
    }

    fn bounding_box(&self) -> Aabb {
        self.root.bbox()
    }
}
