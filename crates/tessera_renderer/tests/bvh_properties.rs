//! BVH queries against a brute-force scan of the same primitives.

use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};
use tessera_renderer::{
    bvh, Aggregate, Bounds3, Interval, MaterialId, MovingSphere, Point3, PrimitiveArena,
    PrimitiveId, Ray, Sphere, Triangle, Vec3,
};

const MAT: MaterialId = MaterialId(0);

fn random_point(rng: &mut StdRng, extent: f64) -> Point3 {
    Point3::new(
        rng.gen_range(-extent..extent),
        rng.gen_range(-extent..extent),
        rng.gen_range(-extent..extent),
    )
}

fn random_direction(rng: &mut StdRng) -> Vec3 {
    loop {
        let v = random_point(rng, 1.0);
        if v.length_squared() > 1e-6 && v.length_squared() <= 1.0 {
            return v;
        }
    }
}

/// Random mix of spheres, moving spheres and triangles.
fn random_primitives(
    arena: &mut PrimitiveArena,
    rng: &mut StdRng,
    count: usize,
) -> Vec<PrimitiveId> {
    (0..count)
        .map(|i| match i % 3 {
            0 => {
                let center = random_point(rng, 10.0);
                let radius = rng.gen_range(0.1..1.5);
                arena.add_shape(Sphere::new(center, radius), MAT)
            }
            1 => {
                let a = random_point(rng, 10.0);
                let b = a + random_point(rng, 1.5);
                let c = a + random_point(rng, 1.5);
                arena.add_shape(Triangle::new(a, b, c), MAT)
            }
            _ => {
                let c0 = random_point(rng, 10.0);
                let c1 = c0 + random_point(rng, 0.5);
                let radius = rng.gen_range(0.1..1.0);
                arena.add_shape(MovingSphere::new(c0, c1, 0.0, 1.0, radius), MAT)
            }
        })
        .collect()
}

fn brute_force_nearest(
    arena: &PrimitiveArena,
    ids: &[PrimitiveId],
    ray: &Ray,
    ray_t: Interval,
) -> Option<f64> {
    ids.iter()
        .filter_map(|&id| arena.intersect_p(id, ray, ray_t))
        .map(|isect| isect.time)
        .min_by(f64::total_cmp)
}

#[test]
fn bvh_nearest_hit_matches_linear_scan() {
    let mut rng = StdRng::seed_from_u64(2024);

    for (count, seed) in [(1, 1), (2, 2), (3, 3), (17, 4), (150, 5)] {
        let mut arena = PrimitiveArena::new();
        let ids = random_primitives(&mut arena, &mut rng, count);
        let root = bvh::build(&mut arena, &ids, &mut StdRng::seed_from_u64(seed)).unwrap();

        let mut hits = 0;
        for _ in 0..1500 {
            let ray = Ray::new(
                random_point(&mut rng, 15.0),
                random_direction(&mut rng),
                rng.gen_range(0.0..1.0),
            );
            let ray_t = Interval::new(0.0001, f64::INFINITY);

            let expected = brute_force_nearest(&arena, &ids, &ray, ray_t);
            let actual = arena.intersect_p(root, &ray, ray_t);
            assert_eq!(arena.intersect(root, &ray, ray_t), expected.is_some());

            match (expected, actual) {
                (None, None) => {}
                (Some(t), Some(isect)) => {
                    hits += 1;
                    assert!(
                        (t - isect.time).abs() < 1e-9,
                        "bvh hit {} but nearest is {}",
                        isect.time,
                        t
                    );
                }
                (e, a) => panic!("brute force {:?} vs bvh {:?}", e, a.map(|i| i.time)),
            }
        }

        assert!(hits > 0 || count < 3, "no rays hit {} primitives", count);
    }
}

#[test]
fn bvh_respects_t_max() {
    let mut rng = StdRng::seed_from_u64(77);
    let mut arena = PrimitiveArena::new();
    let ids = random_primitives(&mut arena, &mut rng, 60);
    let root = bvh::build(&mut arena, &ids, &mut StdRng::seed_from_u64(0)).unwrap();

    for _ in 0..1000 {
        let ray = Ray::new(random_point(&mut rng, 15.0), random_direction(&mut rng), 0.5);
        let ray_t = Interval::new(0.0001, rng.gen_range(0.5..20.0));
        let expected = brute_force_nearest(&arena, &ids, &ray, ray_t);
        let actual = arena.intersect_p(root, &ray, ray_t).map(|i| i.time);
        match (expected, actual) {
            (None, None) => {}
            (Some(e), Some(a)) => assert!((e - a).abs() < 1e-9 && a < ray_t.max),
            other => panic!("mismatch {:?}", other),
        }
    }
}

#[test]
fn bvh_over_aggregates_matches_flat_aggregate() {
    let mut rng = StdRng::seed_from_u64(9);
    let mut arena = PrimitiveArena::new();
    let ids = random_primitives(&mut arena, &mut rng, 40);

    // Two nested groups inside the BVH, one flat aggregate beside it.
    let left = arena.push(Aggregate::new());
    arena.add_primitives(left, &ids[..20]).unwrap();
    let right = arena.push(Aggregate::new());
    arena.add_primitives(right, &ids[20..]).unwrap();
    let root = bvh::build(&mut arena, &[left, right], &mut StdRng::seed_from_u64(1)).unwrap();

    let flat = arena.push(Aggregate::new());
    arena.add_primitives(flat, &ids).unwrap();
    assert_eq!(arena.world_bound(root), arena.world_bound(flat));

    for _ in 0..1000 {
        let ray = Ray::new(random_point(&mut rng, 15.0), random_direction(&mut rng), 0.0);
        let ray_t = Interval::new(0.0001, f64::INFINITY);
        let a = arena.intersect_p(root, &ray, ray_t).map(|i| (i.primitive, i.time));
        let b = arena.intersect_p(flat, &ray, ray_t).map(|i| (i.primitive, i.time));
        assert_eq!(a.map(|x| x.1), b.map(|x| x.1));
    }
}

#[test]
fn root_bound_of_two_spheres_is_their_merge() {
    let mut arena = PrimitiveArena::new();
    let a = arena.add_shape(Sphere::new(Point3::new(-3.0, 0.0, 0.0), 1.0), MAT);
    let b = arena.add_shape(Sphere::new(Point3::new(4.0, 2.0, -1.0), 0.5), MAT);
    let root = bvh::build(&mut arena, &[a, b], &mut StdRng::seed_from_u64(0)).unwrap();

    let expected = Bounds3::merge(&arena.world_bound(a), &arena.world_bound(b));
    assert_eq!(arena.world_bound(root), expected);
    assert_eq!(expected.p_min, Point3::new(-4.0, -1.0, -1.5));
    assert_eq!(expected.p_max, Point3::new(4.5, 2.5, 1.0));
}
