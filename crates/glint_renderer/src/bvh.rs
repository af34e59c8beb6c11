//! Bounding Volume Hierarchy (BVH) acceleration structure.
//!
//! Median-split binary tree over the flattened scene objects. Planes stay
//! outside the tree and are tested linearly before traversal.

use crate::accel::{Accelerator, SceneObjects, Segment, Shadow};
use crate::{Hit, ObjectRef, Primitive};
use glint_core::{Color, MAX_BVH_DEPTH};
use glint_math::{Aabb, Ray, Vec3};

/// Maximum objects per leaf node before splitting.
const LEAF_MAX_SIZE: usize = 2;

/// Slack added around every object box so grazing hits are never pruned.
const BOX_PADDING: f32 = 1e-4;

/// BVH node - either a branch with two children or a leaf with objects.
#[derive(Debug, Clone)]
pub enum BvhNode {
    /// Internal node with two children.
    Branch {
        left: Box<BvhNode>,
        right: Box<BvhNode>,
        bbox: Aabb,
    },
    /// Leaf node with at most two objects, unless depth ran out first.
    Leaf { objects: Vec<ObjectRef>, bbox: Aabb },
}

impl BvhNode {
    pub fn bounding_box(&self) -> Aabb {
        match self {
            BvhNode::Leaf { bbox, .. } => *bbox,
            BvhNode::Branch { bbox, .. } => *bbox,
        }
    }
}

/// Shape summary of a built tree.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct BvhStats {
    pub nodes: usize,
    pub leaves: usize,
    pub max_depth: usize,
    pub max_leaf_size: usize,
}

/// An object with the data construction sorts and bounds by.
struct Entry {
    object: ObjectRef,
    bbox: Aabb,
    centroid: Vec3,
}

/// Spatial index over a fixed scene.
#[derive(Debug, Clone)]
pub struct Bvh {
    objects: SceneObjects,
    root: Option<BvhNode>,
}

impl Bvh {
    /// Build the tree over every non-plane object.
    pub fn new(primitives: Vec<Primitive>) -> Self {
        let objects = SceneObjects::new(primitives);

        let entries: Vec<Entry> = objects
            .bounded()
            .iter()
            .filter_map(|&object| {
                Some(Entry {
                    object,
                    bbox: objects.bounding_box(object)?.expand(BOX_PADDING),
                    centroid: objects.centroid(object)?,
                })
            })
            .collect();

        let root = if entries.is_empty() {
            None
        } else {
            Some(Self::build(entries, 0))
        };

        let bvh = Self { objects, root };
        let stats = bvh.stats();
        log::info!(
            "Built BVH: {} objects, {} planes, {} nodes, {} leaves, depth {}",
            bvh.objects.bounded().len(),
            bvh.objects.planes().len(),
            stats.nodes,
            stats.leaves,
            stats.max_depth
        );
        bvh
    }

    /// Recursive BVH construction.
    ///
    /// Sort by centroid along the longest axis of the node's box, split at
    /// the median index, recurse.
    fn build(mut entries: Vec<Entry>, depth: usize) -> BvhNode {
        let bbox = entries
            .iter()
            .fold(Aabb::EMPTY, |acc, e| Aabb::surrounding(&acc, &e.bbox));

        if entries.len() <= LEAF_MAX_SIZE || depth >= MAX_BVH_DEPTH {
            return BvhNode::Leaf {
                objects: entries.into_iter().map(|e| e.object).collect(),
                bbox,
            };
        }

        let axis = bbox.longest_axis();
        entries.sort_by(|a, b| a.centroid[axis].total_cmp(&b.centroid[axis]));

        let mid = entries.len() / 2;
        let right_entries = entries.split_off(mid);

        BvhNode::Branch {
            left: Box::new(Self::build(entries, depth + 1)),
            right: Box::new(Self::build(right_entries, depth + 1)),
            bbox,
        }
    }

    pub fn root(&self) -> Option<&BvhNode> {
        self.root.as_ref()
    }

    pub fn stats(&self) -> BvhStats {
        fn walk(node: &BvhNode, depth: usize, stats: &mut BvhStats) {
            stats.nodes += 1;
            stats.max_depth = stats.max_depth.max(depth);
            match node {
                BvhNode::Leaf { objects, .. } => {
                    stats.leaves += 1;
                    stats.max_leaf_size = stats.max_leaf_size.max(objects.len());
                }
                BvhNode::Branch { left, right, .. } => {
                    walk(left, depth + 1, stats);
                    walk(right, depth + 1, stats);
                }
            }
        }

        let mut stats = BvhStats::default();
        if let Some(root) = &self.root {
            walk(root, 0, &mut stats);
        }
        stats
    }

    fn nearest_in(&self, node: &BvhNode, ray: &Ray, best: &mut Option<(ObjectRef, Hit)>) {
        let closest = best.map_or(f32::INFINITY, |(_, hit)| hit.t);
        match node.bounding_box().intersect(ray) {
            Some(t) if t <= closest => {}
            _ => return,
        }

        match node {
            BvhNode::Leaf { objects, .. } => {
                for &object in objects {
                    self.objects.consider(object, ray, best);
                }
            }
            BvhNode::Branch { left, right, .. } => {
                // The right subtree is pruned against whatever the left found
                self.nearest_in(left, ray, best);
                self.nearest_in(right, ray, best);
            }
        }
    }

    fn occluded_in(&self, node: &BvhNode, segment: &Segment, light: &mut Color) -> bool {
        if !node.bounding_box().hit(&segment.ray, segment.range) {
            return false;
        }

        match node {
            BvhNode::Leaf { objects, .. } => objects
                .iter()
                .any(|&object| self.objects.block(object, segment, light)),
            BvhNode::Branch { left, right, .. } => {
                self.occluded_in(left, segment, light) || self.occluded_in(right, segment, light)
            }
        }
    }
}

impl Accelerator for Bvh {
    fn objects(&self) -> &SceneObjects {
        &self.objects
    }

    fn nearest(&self, ray: &Ray) -> Option<(ObjectRef, Hit)> {
        let mut best = None;
        for &plane in self.objects.planes() {
            self.objects.consider(plane, ray, &mut best);
        }
        if let Some(root) = &self.root {
            self.nearest_in(root, ray, &mut best);
        }
        best
    }

    fn shadow(&self, from: Vec3, to: Vec3) -> Shadow {
        let Some(segment) = Segment::new(from, to) else {
            return Shadow::Lit(Color::ONE);
        };

        let mut light = Color::ONE;
        for &plane in self.objects.planes() {
            if self.objects.block(plane, &segment, &mut light) {
                return Shadow::Occluded;
            }
        }
        if let Some(root) = &self.root {
            if self.occluded_in(root, &segment, &mut light) {
                return Shadow::Occluded;
            }
        }
        Shadow::Lit(light)
    }
}
