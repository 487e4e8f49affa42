use crate::{Interval, Point3, Ray, Vec3};

/// Axis-aligned bounding box.
///
/// Component-wise `p_min <= p_max` for every box built from points. The
/// default box is empty (`p_min = +inf`, `p_max = -inf`) and is the identity
/// element for [`Bounds3::merge`].
#[derive(Debug, Copy, Clone, PartialEq)]
pub struct Bounds3 {
    pub p_min: Point3,
    pub p_max: Point3,
}

impl Default for Bounds3 {
    fn default() -> Self {
        Self::EMPTY
    }
}

impl Bounds3 {
    pub const EMPTY: Bounds3 = Bounds3 {
        p_min: Point3::splat(f64::INFINITY),
        p_max: Point3::splat(f64::NEG_INFINITY),
    };

    /// Box spanning two arbitrary corner points.
    pub fn new(a: Point3, b: Point3) -> Self {
        Self {
            p_min: a.min(b),
            p_max: a.max(b),
        }
    }

    /// Degenerate box containing a single point.
    pub fn from_point(p: Point3) -> Self {
        Self { p_min: p, p_max: p }
    }

    pub fn is_empty(&self) -> bool {
        self.p_min.x > self.p_max.x || self.p_min.y > self.p_max.y || self.p_min.z > self.p_max.z
    }

    /// One of the eight corners; bit 0 selects x, bit 1 y, bit 2 z.
    pub fn corner(&self, index: usize) -> Point3 {
        let pick = |bit: usize, min: f64, max: f64| if index & bit != 0 { max } else { min };
        Point3::new(
            pick(1, self.p_min.x, self.p_max.x),
            pick(2, self.p_min.y, self.p_max.y),
            pick(4, self.p_min.z, self.p_max.z),
        )
    }

    pub fn diagonal(&self) -> Vec3 {
        self.p_max - self.p_min
    }

    pub fn surface_area(&self) -> f64 {
        let d = self.diagonal();
        2.0 * (d.x * d.y + d.x * d.z + d.y * d.z)
    }

    pub fn volume(&self) -> f64 {
        let d = self.diagonal();
        d.x * d.y * d.z
    }

    /// Index (0=X, 1=Y, 2=Z) of the axis with the longest extent.
    pub fn maximum_extent(&self) -> usize {
        let d = self.diagonal();
        if d.x > d.y && d.x > d.z {
            0
        } else if d.y > d.z {
            1
        } else {
            2
        }
    }

    pub fn centroid(&self) -> Point3 {
        (self.p_min + self.p_max) * 0.5
    }

    /// Linear interpolation between the corners, per axis.
    pub fn lerp(&self, t: Vec3) -> Point3 {
        self.p_min + (self.p_max - self.p_min) * t
    }

    /// Position of `p` relative to the box: `p_min` maps to 0, `p_max` to 1.
    pub fn offset(&self, p: Point3) -> Vec3 {
        let mut o = p - self.p_min;
        for axis in 0..3 {
            if self.p_max[axis] > self.p_min[axis] {
                o[axis] /= self.p_max[axis] - self.p_min[axis];
            }
        }
        o
    }

    /// Sphere enclosing the box as `(center, radius)`; radius is 0 for an empty box.
    pub fn bounding_sphere(&self) -> (Point3, f64) {
        let center = self.centroid();
        let radius = if Self::inside(center, self) {
            center.distance(self.p_max)
        } else {
            0.0
        };
        (center, radius)
    }

    pub fn merge(a: &Bounds3, b: &Bounds3) -> Bounds3 {
        Bounds3 {
            p_min: a.p_min.min(b.p_min),
            p_max: a.p_max.max(b.p_max),
        }
    }

    pub fn merge_point(b: &Bounds3, p: Point3) -> Bounds3 {
        Bounds3 {
            p_min: b.p_min.min(p),
            p_max: b.p_max.max(p),
        }
    }

    /// Overlap of two boxes; empty when they are disjoint.
    pub fn intersect(a: &Bounds3, b: &Bounds3) -> Bounds3 {
        Bounds3 {
            p_min: a.p_min.max(b.p_min),
            p_max: a.p_max.min(b.p_max),
        }
    }

    pub fn inside(p: Point3, b: &Bounds3) -> bool {
        p.x >= b.p_min.x
            && p.x <= b.p_max.x
            && p.y >= b.p_min.y
            && p.y <= b.p_max.y
            && p.z >= b.p_min.z
            && p.z <= b.p_max.z
    }

    /// Like [`Bounds3::inside`] but excludes the upper faces.
    pub fn inside_exclusive(p: Point3, b: &Bounds3) -> bool {
        p.x >= b.p_min.x
            && p.x < b.p_max.x
            && p.y >= b.p_min.y
            && p.y < b.p_max.y
            && p.z >= b.p_min.z
            && p.z < b.p_max.z
    }

    /// Grows the box by `delta` in every direction.
    pub fn expand(b: &Bounds3, delta: f64) -> Bounds3 {
        Bounds3 {
            p_min: b.p_min - Vec3::splat(delta),
            p_max: b.p_max + Vec3::splat(delta),
        }
    }

    /// Slab test against the open parametric range of `ray_t`.
    ///
    /// Runs once per BVH node visited, so it works entirely on the stack. A
    /// zero direction component gives an infinite reciprocal, which turns that
    /// axis into a non-restrictive slab when the origin lies between its planes.
    #[inline]
    pub fn hit(&self, ray: &Ray, mut ray_t: Interval) -> bool {
        let origin = ray.origin();
        let inv_dir = ray.inv_direction();

        for axis in 0..3 {
            let inv = inv_dir[axis];
            let mut t0 = (self.p_min[axis] - origin[axis]) * inv;
            let mut t1 = (self.p_max[axis] - origin[axis]) * inv;
            if inv < 0.0 {
                std::mem::swap(&mut t0, &mut t1);
            }
            // f64::max/min ignore a NaN operand (0 * inf on a slab plane).
            ray_t.min = t0.max(ray_t.min);
            ray_t.max = t1.min(ray_t.max);
            // A single touching point counts, so zero-thickness boxes can be hit.
            if ray_t.max < ray_t.min {
                return false;
            }
        }

        true
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::rngs::StdRng;
    use rand::{Rng, SeedableRng};

    fn random_point(rng: &mut StdRng, extent: f64) -> Point3 {
        Point3::new(
            rng.gen_range(-extent..extent),
            rng.gen_range(-extent..extent),
            rng.gen_range(-extent..extent),
        )
    }

    fn random_box(rng: &mut StdRng) -> Bounds3 {
        Bounds3::new(random_point(rng, 10.0), random_point(rng, 10.0))
    }

    /// Per-axis interval intersection without the early exit or cached reciprocal.
    fn brute_force_hit(b: &Bounds3, ray: &Ray, ray_t: Interval) -> bool {
        let mut lo = ray_t.min;
        let mut hi = ray_t.max;
        for axis in 0..3 {
            let o = ray.origin()[axis];
            let d = ray.direction()[axis];
            if d == 0.0 {
                if o < b.p_min[axis] || o > b.p_max[axis] {
                    return false;
                }
                continue;
            }
            let ta = (b.p_min[axis] - o) / d;
            let tb = (b.p_max[axis] - o) / d;
            lo = lo.max(ta.min(tb));
            hi = hi.min(ta.max(tb));
        }
        lo <= hi
    }

    #[test]
    fn test_default_is_empty() {
        let b = Bounds3::default();
        assert!(b.is_empty());
        assert_eq!(b, Bounds3::EMPTY);
    }

    #[test]
    fn test_new_orders_corners() {
        let b = Bounds3::new(Point3::new(1.0, -2.0, 3.0), Point3::new(-1.0, 2.0, 0.0));
        assert_eq!(b.p_min, Point3::new(-1.0, -2.0, 0.0));
        assert_eq!(b.p_max, Point3::new(1.0, 2.0, 3.0));
    }

    #[test]
    fn test_empty_is_merge_identity() {
        let mut rng = StdRng::seed_from_u64(7);
        for _ in 0..100 {
            let b = random_box(&mut rng);
            assert_eq!(Bounds3::merge(&Bounds3::EMPTY, &b), b);
            assert_eq!(Bounds3::merge(&b, &Bounds3::EMPTY), b);
        }
    }

    #[test]
    fn test_merge_commutative_and_associative() {
        let mut rng = StdRng::seed_from_u64(11);
        for _ in 0..500 {
            let a = random_box(&mut rng);
            let b = random_box(&mut rng);
            let c = random_box(&mut rng);
            assert_eq!(Bounds3::merge(&a, &b), Bounds3::merge(&b, &a));
            assert_eq!(
                Bounds3::merge(&Bounds3::merge(&a, &b), &c),
                Bounds3::merge(&a, &Bounds3::merge(&b, &c))
            );
        }
    }

    #[test]
    fn test_merge_point_contains_point() {
        let mut rng = StdRng::seed_from_u64(13);
        let mut b = Bounds3::EMPTY;
        for _ in 0..500 {
            let p = random_point(&mut rng, 100.0);
            b = Bounds3::merge_point(&b, p);
            assert!(Bounds3::inside(p, &b));
        }
    }

    #[test]
    fn test_intersect_overlap_and_disjoint() {
        let a = Bounds3::new(Point3::ZERO, Point3::splat(2.0));
        let b = Bounds3::new(Point3::splat(1.0), Point3::splat(3.0));
        let overlap = Bounds3::intersect(&a, &b);
        assert_eq!(overlap, Bounds3::new(Point3::splat(1.0), Point3::splat(2.0)));

        let c = Bounds3::new(Point3::splat(5.0), Point3::splat(6.0));
        assert!(Bounds3::intersect(&a, &c).is_empty());
    }

    #[test]
    fn test_inside_exclusive_excludes_upper_face() {
        let b = Bounds3::new(Point3::ZERO, Point3::ONE);
        assert!(Bounds3::inside(Point3::ONE, &b));
        assert!(!Bounds3::inside_exclusive(Point3::ONE, &b));
        assert!(Bounds3::inside_exclusive(Point3::ZERO, &b));
    }

    #[test]
    fn test_derived_quantities() {
        let b = Bounds3::new(Point3::ZERO, Point3::new(4.0, 2.0, 1.0));
        assert_eq!(b.diagonal(), Vec3::new(4.0, 2.0, 1.0));
        assert_eq!(b.surface_area(), 2.0 * (8.0 + 4.0 + 2.0));
        assert_eq!(b.volume(), 8.0);
        assert_eq!(b.maximum_extent(), 0);
        assert_eq!(b.centroid(), Point3::new(2.0, 1.0, 0.5));
        assert_eq!(b.offset(Point3::new(2.0, 1.0, 1.0)), Vec3::new(0.5, 0.5, 1.0));
        assert_eq!(b.corner(0), b.p_min);
        assert_eq!(b.corner(7), b.p_max);
        assert_eq!(b.corner(1), Point3::new(4.0, 0.0, 0.0));

        let (center, radius) = b.bounding_sphere();
        assert_eq!(center, b.centroid());
        assert!((radius - b.diagonal().length() * 0.5).abs() < 1e-12);
        assert_eq!(Bounds3::EMPTY.bounding_sphere().1, 0.0);
    }

    #[test]
    fn test_expand() {
        let b = Bounds3::expand(&Bounds3::new(Point3::ZERO, Point3::ONE), 0.5);
        assert_eq!(b.p_min, Point3::splat(-0.5));
        assert_eq!(b.p_max, Point3::splat(1.5));
    }

    #[test]
    fn test_hit_basic() {
        let b = Bounds3::new(Point3::splat(-1.0), Point3::splat(1.0));
        let t = Interval::new(0.0, 100.0);

        let toward = Ray::new(Point3::new(0.0, 0.0, -5.0), Vec3::Z, 0.0);
        assert!(b.hit(&toward, t));

        let away = Ray::new(Point3::new(0.0, 0.0, -5.0), -Vec3::Z, 0.0);
        assert!(!b.hit(&away, t));

        let beside = Ray::new(Point3::new(10.0, 0.0, 0.0), Vec3::Z, 0.0);
        assert!(!b.hit(&beside, t));

        // Range ends before the box starts.
        assert!(!b.hit(&toward, Interval::new(0.0, 3.0)));
    }

    #[test]
    fn test_hit_empty_box_never_hits() {
        let mut rng = StdRng::seed_from_u64(17);
        for _ in 0..200 {
            let ray = Ray::new(random_point(&mut rng, 5.0), random_point(&mut rng, 1.0), 0.0);
            assert!(!Bounds3::EMPTY.hit(&ray, Interval::UNIVERSE));
        }
        let axis_ray = Ray::new(Point3::ZERO, Vec3::X, 0.0);
        assert!(!Bounds3::EMPTY.hit(&axis_ray, Interval::UNIVERSE));
    }

    #[test]
    fn test_hit_axis_aligned_rays() {
        let b = Bounds3::new(Point3::splat(-1.0), Point3::splat(1.0));
        let t = Interval::new(0.0, f64::INFINITY);

        // Zero y/z components with the origin inside those slabs.
        let inside_slabs = Ray::new(Point3::new(-5.0, 0.5, -0.5), Vec3::X, 0.0);
        assert!(b.hit(&inside_slabs, t));

        // Zero y component with the origin outside the y slab.
        let outside_slab = Ray::new(Point3::new(-5.0, 3.0, 0.0), Vec3::X, 0.0);
        assert!(!b.hit(&outside_slab, t));

        // Negative axis direction.
        let negative = Ray::new(Point3::new(5.0, 0.0, 0.0), -Vec3::X, 0.0);
        assert!(b.hit(&negative, t));
    }

    #[test]
    fn test_hit_degenerate_boxes() {
        let t = Interval::new(0.0, 100.0);

        let point = Bounds3::from_point(Point3::new(0.0, 0.0, -5.0));
        let through = Ray::new(Point3::ZERO, -Vec3::Z, 0.0);
        assert!(point.hit(&through, t));
        let past = Ray::new(Point3::new(0.5, 0.0, 0.0), -Vec3::Z, 0.0);
        assert!(!point.hit(&past, t));

        // Flat in z, crossed by an oblique ray.
        let flat = Bounds3::new(Point3::new(-1.0, -1.0, -3.0), Point3::new(1.0, 1.0, -3.0));
        let oblique = Ray::new(Point3::ZERO, Vec3::new(0.1, 0.1, -1.0), 0.0);
        assert!(flat.hit(&oblique, t));
        assert!(!flat.hit(&oblique, Interval::new(0.0, 2.0)));
    }

    #[test]
    fn test_hit_matches_brute_force() {
        let mut rng = StdRng::seed_from_u64(19);
        let mut hits = 0;
        for _ in 0..5000 {
            let b = random_box(&mut rng);
            let dir = random_point(&mut rng, 1.0);
            if dir.length_squared() < 1e-6 {
                continue;
            }
            let ray = Ray::new(random_point(&mut rng, 20.0), dir, 0.0);
            let ray_t = Interval::new(0.0, rng.gen_range(1.0..60.0));
            let expected = brute_force_hit(&b, &ray, ray_t);
            assert_eq!(b.hit(&ray, ray_t), expected, "box {:?} ray {:?}", b, ray);
            if expected {
                hits += 1;
            }
        }
        assert!(hits > 0);
    }
}
