//! Constructive solid geometry.
//!
//! A solid is described along a ray by the sorted list of parameter
//! intervals where the ray is inside it. Boolean operations combine those
//! lists; the first boundary in front of the origin is the visible surface.
//!
//! Every list produced here is sorted by entry and its intervals do not
//! overlap. The combinators rely on their inputs having the same shape.

use crate::{Hit, Primitive};
use glint_core::{Material, SceneError, SceneResult};
use glint_math::{Aabb, Ray, Vec3};

/// A boundary crossing: where along the ray, and the solid's outward normal there.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Crossing {
    pub t: f32,
    pub normal: Vec3,
}

impl Crossing {
    pub fn new(t: f32, normal: Vec3) -> Self {
        Self { t, normal }
    }

    /// The same crossing seen from the other side of the surface.
    fn flipped(self) -> Self {
        Self {
            t: self.t,
            normal: -self.normal,
        }
    }
}

/// One stretch of the ray inside a solid.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Span {
    pub entry: Crossing,
    pub exit: Crossing,
}

impl Span {
    /// True when `t` lies strictly inside the span.
    pub fn surrounds(&self, t: f32) -> bool {
        self.entry.t < t && t < self.exit.t
    }

    fn overlaps(&self, other: &Span) -> bool {
        self.entry.t < other.exit.t && self.exit.t > other.entry.t
    }
}

/// Merge two span lists; touching or overlapping spans fuse into one.
pub fn union(a: &[Span], b: &[Span]) -> Vec<Span> {
    let mut all: Vec<Span> = a.iter().chain(b).copied().collect();
    all.sort_by(|x, y| x.entry.t.total_cmp(&y.entry.t));

    let mut merged: Vec<Span> = Vec::with_capacity(all.len());
    for span in all {
        match merged.last_mut() {
            Some(current) if span.entry.t <= current.exit.t => {
                // Absorbed span only matters if it reaches further
                if span.exit.t > current.exit.t {
                    current.exit = span.exit;
                }
            }
            _ => merged.push(span),
        }
    }
    merged
}

/// Stretches inside both solids.
pub fn intersection(a: &[Span], b: &[Span]) -> Vec<Span> {
    let mut out = Vec::new();
    for sa in a {
        for sb in b.iter().filter(|sb| sa.overlaps(sb)) {
            let entry = if sa.entry.t >= sb.entry.t { sa.entry } else { sb.entry };
            let exit = if sa.exit.t <= sb.exit.t { sa.exit } else { sb.exit };
            out.push(Span { entry, exit });
        }
    }
    out.sort_by(|x, y| x.entry.t.total_cmp(&y.entry.t));
    out
}

/// Stretches inside `a` but not `b`.
///
/// Where `b` cuts into `a`, the new boundary is `b`'s surface seen from the
/// inside, so its normals are flipped. A `b` span covering an `a` span
/// entirely removes it.
pub fn difference(a: &[Span], b: &[Span]) -> Vec<Span> {
    let mut out = Vec::new();
    for &sa in a {
        let mut pieces = vec![sa];
        for sb in b.iter().filter(|sb| sa.overlaps(sb)) {
            let mut next = Vec::with_capacity(pieces.len() + 1);
            for piece in pieces {
                if !piece.overlaps(sb) {
                    next.push(piece);
                    continue;
                }
                if sb.entry.t > piece.entry.t {
                    next.push(Span {
                        entry: piece.entry,
                        exit: sb.entry.flipped(),
                    });
                }
                if sb.exit.t < piece.exit.t {
                    next.push(Span {
                        entry: sb.exit.flipped(),
                        exit: piece.exit,
                    });
                }
            }
            pieces = next;
        }
        out.extend(pieces);
    }
    out
}

/// Boolean operation of an interior CSG node.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CsgOp {
    Union,
    Intersection,
    Difference,
}

impl CsgOp {
    pub fn combine(self, left: &[Span], right: &[Span]) -> Vec<Span> {
        match self {
            CsgOp::Union => union(left, right),
            CsgOp::Intersection => intersection(left, right),
            CsgOp::Difference => difference(left, right),
        }
    }
}

/// Binary CSG tree. Leaves own their primitive.
#[derive(Debug, Clone)]
pub enum CsgNode {
    Leaf(Box<Primitive>),
    Branch {
        op: CsgOp,
        left: Box<CsgNode>,
        right: Box<CsgNode>,
    },
}

impl CsgNode {
    /// Wrap a closed primitive. Lone triangles have no inside and are rejected.
    pub fn leaf(primitive: impl Into<Primitive>) -> SceneResult<Self> {
        let primitive = primitive.into();
        if let Primitive::Triangle(_) = primitive {
            return Err(SceneError::UnsupportedCsgLeaf(primitive.kind()));
        }
        Ok(CsgNode::Leaf(Box::new(primitive)))
    }

    pub fn branch(op: CsgOp, left: CsgNode, right: CsgNode) -> Self {
        CsgNode::Branch {
            op,
            left: Box::new(left),
            right: Box::new(right),
        }
    }

    pub fn union(left: CsgNode, right: CsgNode) -> Self {
        Self::branch(CsgOp::Union, left, right)
    }

    pub fn intersection(left: CsgNode, right: CsgNode) -> Self {
        Self::branch(CsgOp::Intersection, left, right)
    }

    pub fn difference(left: CsgNode, right: CsgNode) -> Self {
        Self::branch(CsgOp::Difference, left, right)
    }

    /// Inside intervals of the whole subtree along the ray's line.
    ///
    /// Leaf intervals that end at or behind the origin are dropped.
    pub fn spans(&self, ray: &Ray) -> Vec<Span> {
        match self {
            CsgNode::Leaf(primitive) => {
                let mut spans = primitive.spans(ray);
                spans.retain(|s| s.exit.t > 0.0);
                spans
            }
            CsgNode::Branch { op, left, right } => {
                op.combine(&left.spans(ray), &right.spans(ray))
            }
        }
    }

    pub fn bounding_box(&self) -> Aabb {
        match self {
            CsgNode::Leaf(primitive) => primitive.bounding_box(),
            CsgNode::Branch { op, left, right } => match op {
                CsgOp::Union => Aabb::surrounding(&left.bounding_box(), &right.bounding_box()),
                CsgOp::Intersection => Aabb::overlap(&left.bounding_box(), &right.bounding_box()),
                CsgOp::Difference => left.bounding_box(),
            },
        }
    }
}

/// A CSG tree placed in the scene as a single primitive with its own material.
///
/// Leaf materials are ignored.
#[derive(Debug, Clone)]
pub struct CsgSolid {
    root: CsgNode,
    material: Material,
    bbox: Aabb,
}

impl CsgSolid {
    pub fn new(root: CsgNode, material: Material) -> Self {
        let bbox = root.bounding_box();
        Self {
            root,
            material,
            bbox,
        }
    }

    pub fn root(&self) -> &CsgNode {
        &self.root
    }

    pub fn material(&self) -> &Material {
        &self.material
    }

    pub fn spans(&self, ray: &Ray) -> Vec<Span> {
        self.root.spans(ray)
    }

    /// First boundary in front of the origin.
    ///
    /// Entry queries take the first span whose entry is ahead; exit queries
    /// take the first span whose exit is ahead.
    pub fn intersect(&self, ray: &Ray, want_exit: bool) -> Option<Hit> {
        self.spans(ray).into_iter().find_map(|span| {
            let crossing = if want_exit { span.exit } else { span.entry };
            (crossing.t > 0.0 && crossing.t.is_finite())
                .then(|| Hit::new(ray, crossing.t, crossing.normal))
        })
    }

    pub fn bounding_box(&self) -> Aabb {
        self.bbox
    }
}
