//! Bounding Volume Hierarchy (BVH) acceleration structure.
//!
//! A binary tree over primitives in a [`PrimitiveArena`]. Nodes are ordinary
//! arena entries holding the ids of their two children, so a tree answers the
//! same intersection queries as any single primitive.
//!
//! Construction picks a random split axis per node and splits the primitives
//! at the median of their bound minimum along it. Leaves hold at most two
//! primitives; a single primitive becomes a node whose children alias it.

use std::cmp::Ordering;

use crate::error::{RenderError, RenderResult};
use crate::interaction::SurfaceInteraction;
use crate::primitive::{Primitive, PrimitiveArena, PrimitiveId};
use rand::{Rng, RngCore};
use tessera_math::{Bounds3, Interval, Ray};

/// Interior node of the hierarchy. Immutable once built.
#[derive(Debug, Clone, Copy)]
pub struct BvhNode {
    left: PrimitiveId,
    right: PrimitiveId,
    bound: Bounds3,
}

impl BvhNode {
    pub fn left(&self) -> PrimitiveId {
        self.left
    }

    pub fn right(&self) -> PrimitiveId {
        self.right
    }

    pub fn world_bound(&self) -> Bounds3 {
        self.bound
    }

    pub fn intersect(&self, arena: &PrimitiveArena, ray: &Ray, ray_t: Interval) -> bool {
        if !self.bound.hit(ray, ray_t) {
            return false;
        }
        arena.intersect(self.left, ray, ray_t)
            || (self.right != self.left && arena.intersect(self.right, ray, ray_t))
    }

    /// Nearest hit in either subtree.
    ///
    /// The right subtree is searched only up to the left hit, so the result
    /// is the closest hit overall rather than the first one found.
    pub fn intersect_p(
        &self,
        arena: &PrimitiveArena,
        ray: &Ray,
        ray_t: Interval,
    ) -> Option<SurfaceInteraction> {
        if !self.bound.hit(ray, ray_t) {
            return None;
        }

        let hit_left = arena.intersect_p(self.left, ray, ray_t);
        if self.right == self.left {
            return hit_left;
        }

        // Only check right up to closest hit
        let right_max = hit_left.map_or(ray_t.max, |isect| isect.time);
        let hit_right = arena.intersect_p(self.right, ray, ray_t.with_max(right_max));

        hit_right.or(hit_left)
    }
}

/// Shape of a finished hierarchy, for logging.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct BvhStats {
    pub nodes: usize,
    pub depth: usize,
}

/// Builds a BVH over `primitives` inside `arena` and returns the root id.
///
/// Every id must already be in the arena. The same `rng` state always yields
/// the same tree.
pub fn build(
    arena: &mut PrimitiveArena,
    primitives: &[PrimitiveId],
    rng: &mut dyn RngCore,
) -> RenderResult<PrimitiveId> {
    if primitives.is_empty() {
        return Err(RenderError::EmptyScene);
    }

    // Bounds are read once up front; sorting compares these cached values.
    let mut items = primitives
        .iter()
        .map(|&id| {
            arena
                .get(id)
                .map(|p| (id, p.world_bound()))
                .ok_or(RenderError::InvalidPrimitive(id))
        })
        .collect::<RenderResult<Vec<_>>>()?;

    let (root, _) = build_recursive(arena, &mut items, rng);
    Ok(root)
}

fn build_recursive(
    arena: &mut PrimitiveArena,
    items: &mut [(PrimitiveId, Bounds3)],
    rng: &mut dyn RngCore,
) -> (PrimitiveId, Bounds3) {
    let axis = rng.gen_range(0..3);

    let (left, right) = match items.len() {
        1 => (items[0], items[0]),
        2 => {
            if compare_min(&items[0].1, &items[1].1, axis) == Ordering::Greater {
                (items[1], items[0])
            } else {
                (items[0], items[1])
            }
        }
        n => {
            items.sort_by(|a, b| compare_min(&a.1, &b.1, axis));
            let (lower, upper) = items.split_at_mut(n / 2);
            (
                build_recursive(arena, lower, rng),
                build_recursive(arena, upper, rng),
            )
        }
    };

    let bound = Bounds3::merge(&left.1, &right.1);
    let id = arena.push(BvhNode {
        left: left.0,
        right: right.0,
        bound,
    });
    (id, bound)
}

#[inline]
fn compare_min(a: &Bounds3, b: &Bounds3, axis: usize) -> Ordering {
    a.p_min[axis].total_cmp(&b.p_min[axis])
}

/// Counts nodes and depth of the tree rooted at `root`.
///
/// Non-BVH primitives count as leaves at depth zero.
pub fn stats(arena: &PrimitiveArena, root: PrimitiveId) -> BvhStats {
    match arena.get(root) {
        Some(Primitive::Bvh(node)) => {
            let left = stats(arena, node.left);
            let right = if node.right == node.left {
                BvhStats::default()
            } else {
                stats(arena, node.right)
            };
            BvhStats {
                nodes: 1 + left.nodes + right.nodes,
                depth: 1 + left.depth.max(right.depth),
            }
        }
        _ => BvhStats::default(),
    }
}
