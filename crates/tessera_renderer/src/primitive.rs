//! Primitives: shapes bound to materials, and collections of primitives.
//!
//! Every primitive lives in a [`PrimitiveArena`] and is referred to by a
//! [`PrimitiveId`]. Composite primitives (aggregates and BVH nodes) store ids
//! of their children, never the children themselves, so the whole scene graph
//! is one flat vector that is read-only once rendering starts.

use crate::bvh::BvhNode;
use crate::error::{RenderError, RenderResult};
use crate::interaction::SurfaceInteraction;
use crate::shape::Shape;
use tessera_math::{Bounds3, Interval, Ray};

/// Index of a primitive in its arena.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct PrimitiveId(pub usize);

/// Index of a material in the scene's material table.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct MaterialId(pub usize);

/// Shutter interval used when caching a shape's bound.
const DEFAULT_SHUTTER: (f64, f64) = (0.0, 1.0);

/// One shape plus the material it is rendered with.
#[derive(Debug, Clone)]
pub struct GeometricPrimitive {
    shape: Shape,
    material: MaterialId,
    bound: Bounds3,
}

impl GeometricPrimitive {
    pub fn new(shape: impl Into<Shape>, material: MaterialId) -> Self {
        let shape = shape.into();
        let bound = shape.world_bound(DEFAULT_SHUTTER.0, DEFAULT_SHUTTER.1);
        Self {
            shape,
            material,
            bound,
        }
    }

    pub fn shape(&self) -> &Shape {
        &self.shape
    }

    pub fn material(&self) -> MaterialId {
        self.material
    }

    pub fn world_bound(&self) -> Bounds3 {
        self.bound
    }

    #[inline]
    pub fn intersect(&self, ray: &Ray, ray_t: Interval) -> bool {
        self.shape.intersect(ray, ray_t)
    }

    #[inline]
    pub fn intersect_p(
        &self,
        ray: &Ray,
        ray_t: Interval,
        id: PrimitiveId,
    ) -> Option<SurfaceInteraction> {
        let hit = self.shape.intersect_p(ray, ray_t)?;
        Some(SurfaceInteraction::from_shape_hit(hit, id, self.material))
    }
}

/// Ordered list of child primitives with a cached bound.
///
/// The bound is merged incrementally on every addition and is therefore
/// always the union of all children's bounds.
#[derive(Debug, Clone, Default)]
pub struct Aggregate {
    children: Vec<PrimitiveId>,
    bound: Bounds3,
}

impl Aggregate {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn children(&self) -> &[PrimitiveId] {
        &self.children
    }

    pub fn len(&self) -> usize {
        self.children.len()
    }

    pub fn is_empty(&self) -> bool {
        self.children.is_empty()
    }

    pub fn world_bound(&self) -> Bounds3 {
        self.bound
    }

    fn push(&mut self, child: PrimitiveId, child_bound: &Bounds3) {
        self.bound = Bounds3::merge(&self.bound, child_bound);
        self.children.push(child);
    }

    /// Linear scan; panics when the aggregate has no children.
    pub fn intersect(&self, arena: &PrimitiveArena, ray: &Ray, ray_t: Interval) -> bool {
        assert!(!self.is_empty(), "intersect called on an empty aggregate");
        self.children
            .iter()
            .any(|&child| arena.intersect(child, ray, ray_t))
    }

    /// Nearest hit among the children, shrinking `t_max` as hits are found.
    ///
    /// Children hit at exactly the same distance resolve in insertion order,
    /// which callers should not rely on.
    pub fn intersect_p(
        &self,
        arena: &PrimitiveArena,
        ray: &Ray,
        ray_t: Interval,
    ) -> Option<SurfaceInteraction> {
        assert!(!self.is_empty(), "intersect_p called on an empty aggregate");
        let mut closest = None;
        let mut closest_so_far = ray_t.max;

        for &child in &self.children {
            if let Some(isect) = arena.intersect_p(child, ray, ray_t.with_max(closest_so_far)) {
                closest_so_far = isect.time;
                closest = Some(isect);
            }
        }

        closest
    }
}

/// The closed set of primitive kinds.
#[derive(Debug, Clone)]
pub enum Primitive {
    Geometric(GeometricPrimitive),
    Aggregate(Aggregate),
    Bvh(BvhNode),
}

impl Primitive {
    pub fn kind(&self) -> &'static str {
        match self {
            Primitive::Geometric(_) => "GeometricPrimitive",
            Primitive::Aggregate(_) => "Aggregate",
            Primitive::Bvh(_) => "BvhNode",
        }
    }

    pub fn world_bound(&self) -> Bounds3 {
        match self {
            Primitive::Geometric(g) => g.world_bound(),
            Primitive::Aggregate(a) => a.world_bound(),
            Primitive::Bvh(node) => node.world_bound(),
        }
    }

    /// Material of a geometric primitive. Composite primitives have none.
    pub fn material(&self) -> RenderResult<MaterialId> {
        match self {
            Primitive::Geometric(g) => Ok(g.material()),
            other => Err(RenderError::UnsupportedOperation {
                operation: "material",
                primitive: other.kind(),
            }),
        }
    }
}

impl From<GeometricPrimitive> for Primitive {
    fn from(g: GeometricPrimitive) -> Self {
        Primitive::Geometric(g)
    }
}

impl From<Aggregate> for Primitive {
    fn from(a: Aggregate) -> Self {
        Primitive::Aggregate(a)
    }
}

impl From<BvhNode> for Primitive {
    fn from(node: BvhNode) -> Self {
        Primitive::Bvh(node)
    }
}

/// Flat storage for every primitive of a scene.
///
/// Ids handed out by [`PrimitiveArena::push`] stay valid for the lifetime of
/// the arena; the query methods index directly and panic on a foreign id.
///
/// Once a primitive is the child of an aggregate or BVH node, its parent's
/// cached bound depends on it, so an aggregate that has a parent accepts no
/// further children.
#[derive(Debug, Clone, Default)]
pub struct PrimitiveArena {
    primitives: Vec<Primitive>,
    /// `referenced[i]` is set once primitive `i` has a parent.
    referenced: Vec<bool>,
}

impl PrimitiveArena {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn len(&self) -> usize {
        self.primitives.len()
    }

    pub fn is_empty(&self) -> bool {
        self.primitives.is_empty()
    }

    pub fn push(&mut self, primitive: impl Into<Primitive>) -> PrimitiveId {
        let primitive = primitive.into();
        match &primitive {
            Primitive::Geometric(_) => {}
            Primitive::Aggregate(agg) => {
                for &child in agg.children() {
                    self.mark_referenced(child);
                }
            }
            Primitive::Bvh(node) => {
                self.mark_referenced(node.left());
                self.mark_referenced(node.right());
            }
        }

        let id = PrimitiveId(self.primitives.len());
        self.primitives.push(primitive);
        self.referenced.push(false);
        id
    }

    fn mark_referenced(&mut self, id: PrimitiveId) {
        if let Some(flag) = self.referenced.get_mut(id.0) {
            *flag = true;
        }
    }

    /// Whether `id` is already a child of some aggregate or BVH node.
    pub fn is_referenced(&self, id: PrimitiveId) -> bool {
        self.referenced.get(id.0).copied().unwrap_or(false)
    }

    /// Wraps `shape` in a [`GeometricPrimitive`] and stores it.
    pub fn add_shape(&mut self, shape: impl Into<Shape>, material: MaterialId) -> PrimitiveId {
        self.push(GeometricPrimitive::new(shape, material))
    }

    pub fn get(&self, id: PrimitiveId) -> Option<&Primitive> {
        self.primitives.get(id.0)
    }

    pub fn contains(&self, id: PrimitiveId) -> bool {
        id.0 < self.primitives.len()
    }

    /// Appends `child` to the aggregate `aggregate`, merging its bound.
    ///
    /// Fails when `aggregate` is not an aggregate, when either id is unknown,
    /// when `child` is an empty aggregate, when `aggregate` already has a
    /// parent, or when the addition would make the aggregate reachable from
    /// itself.
    pub fn add_primitive(
        &mut self,
        aggregate: PrimitiveId,
        child: PrimitiveId,
    ) -> RenderResult<()> {
        let child_bound = match self.get(child) {
            None => return Err(RenderError::InvalidPrimitive(child)),
            Some(Primitive::Aggregate(agg)) if agg.is_empty() => {
                return Err(RenderError::EmptyAggregate);
            }
            Some(primitive) => primitive.world_bound(),
        };
        if self.reaches(child, aggregate) {
            return Err(RenderError::UnsupportedOperation {
                operation: "add_primitive (cycle)",
                primitive: "Aggregate",
            });
        }

        let has_parent = self.is_referenced(aggregate);
        match self.primitives.get_mut(aggregate.0) {
            Some(Primitive::Aggregate(_)) if has_parent => {
                Err(RenderError::UnsupportedOperation {
                    operation: "add_primitive (aggregate already has a parent)",
                    primitive: "Aggregate",
                })
            }
            Some(Primitive::Aggregate(agg)) => {
                agg.push(child, &child_bound);
                self.referenced[child.0] = true;
                Ok(())
            }
            Some(other) => Err(RenderError::UnsupportedOperation {
                operation: "add_primitive",
                primitive: other.kind(),
            }),
            None => Err(RenderError::InvalidPrimitive(aggregate)),
        }
    }

    pub fn add_primitives(
        &mut self,
        aggregate: PrimitiveId,
        children: &[PrimitiveId],
    ) -> RenderResult<()> {
        children
            .iter()
            .try_for_each(|&child| self.add_primitive(aggregate, child))
    }

    /// Whether `target` is `from` or one of its descendants.
    fn reaches(&self, from: PrimitiveId, target: PrimitiveId) -> bool {
        if from == target {
            return true;
        }
        match self.get(from) {
            Some(Primitive::Aggregate(agg)) => {
                agg.children().iter().any(|&c| self.reaches(c, target))
            }
            Some(Primitive::Bvh(node)) => {
                self.reaches(node.left(), target) || self.reaches(node.right(), target)
            }
            _ => false,
        }
    }

    pub fn world_bound(&self, id: PrimitiveId) -> Bounds3 {
        self.primitives[id.0].world_bound()
    }

    pub fn material(&self, id: PrimitiveId) -> RenderResult<MaterialId> {
        self.get(id)
            .ok_or(RenderError::InvalidPrimitive(id))?
            .material()
    }

    /// Existence test against primitive `id` within `ray_t`.
    pub fn intersect(&self, id: PrimitiveId, ray: &Ray, ray_t: Interval) -> bool {
        match &self.primitives[id.0] {
            Primitive::Geometric(g) => g.intersect(ray, ray_t),
            Primitive::Aggregate(agg) => agg.intersect(self, ray, ray_t),
            Primitive::Bvh(node) => node.intersect(self, ray, ray_t),
        }
    }

    /// Nearest hit against primitive `id` within `ray_t`.
    pub fn intersect_p(
        &self,
        id: PrimitiveId,
        ray: &Ray,
        ray_t: Interval,
    ) -> Option<SurfaceInteraction> {
        match &self.primitives[id.0] {
            Primitive::Geometric(g) => g.intersect_p(ray, ray_t, id),
            Primitive::Aggregate(agg) => agg.intersect_p(self, ray, ray_t),
            Primitive::Bvh(node) => node.intersect_p(self, ray, ray_t),
        }
    }
}
