//! End-to-end renders through the tile scheduler.

use rand::rngs::StdRng;
use rand::{RngCore, SeedableRng};
use tessera_renderer::{
    scenes, Camera, CenterSampler, Color, Film, Integrator, Lambertian, Material, Point3,
    PreviewBuffer, Ray, RenderError, RenderSettings, ScatterRecord, Scene, SceneBuilder, Sphere,
    SurfaceInteraction, TileScheduler, Vec3,
};

const SKY: Color = Color::new(0.7, 0.8, 1.0);

fn init_logging() {
    let _ = env_logger::builder().is_test(true).try_init();
}

/// Unit sphere seen head-on from distance 5 by a square camera.
fn single_sphere_scene() -> Scene {
    let mut builder = SceneBuilder::new();
    let grey = builder.add_material(Lambertian::new(Color::splat(0.5)));
    builder
        .add_shape(Sphere::new(Point3::ZERO, 1.0), grey)
        .unwrap();

    let camera = Camera::new()
        .with_position(Point3::new(0.0, 0.0, 5.0), Point3::ZERO, Vec3::Y)
        .with_lens(30.0, 0.0, 5.0)
        .with_aspect_ratio(1.0);

    builder
        .build(camera, SKY, &mut StdRng::seed_from_u64(0))
        .unwrap()
}

#[test]
fn depth_one_sphere_renders_flat_silhouette() {
    init_logging();
    let scene = single_sphere_scene();
    let integrator = Integrator::new(1, 1).with_sampler(CenterSampler);
    let mut film = Film::new(64, 64, 16);
    TileScheduler::new(4, 0)
        .render(&scene, &integrator, &mut film, None)
        .unwrap();

    let sky = tessera_renderer::quantize(SKY);
    // Angular radius of the sphere against half the vertical field of view.
    let half_fov = 15f64.to_radians().tan();
    let radius_px = (1.0 / (25.0f64 - 1.0).sqrt()) / half_fov * 32.0;

    let mut mismatches = 0;
    for y in 0..64u32 {
        for x in 0..64u32 {
            let dx = x as f64 + 0.5 - 32.0;
            let dy = y as f64 + 0.5 - 32.0;
            let r = (dx * dx + dy * dy).sqrt();
            let pixel = film.pixel(x, y);

            if r < radius_px - 1.0 {
                assert_eq!(pixel, [0, 0, 0], "inside silhouette at ({}, {})", x, y);
            } else if r > radius_px + 1.0 {
                assert_eq!(pixel, sky, "outside silhouette at ({}, {})", x, y);
            } else if pixel != [0, 0, 0] && pixel != sky {
                mismatches += 1;
            }
        }
    }
    // Edge pixels are either fully in or fully out with one centered sample.
    assert_eq!(mismatches, 0);
}

#[test]
fn repeated_renders_are_identical_across_thread_counts() {
    init_logging();
    let settings = RenderSettings {
        scene: 0,
        samples_per_pixel: 2,
        max_depth: 4,
        image_width: 48,
        tile_size: 8,
        seed: 17,
        ..Default::default()
    };

    let render = |threads: usize| {
        let scene = scenes::build_scene(settings.scene, settings.seed).unwrap();
        let mut film = settings.film(scene.camera().aspect_ratio());
        TileScheduler::new(threads, settings.seed)
            .render(&scene, &settings.integrator(), &mut film, None)
            .unwrap();
        film
    };

    let first = render(1);
    let second = render(1);
    let parallel = render(4);
    assert_eq!(first.data(), second.data());
    assert_eq!(first.data(), parallel.data());
}

#[test]
fn different_seeds_change_the_image() {
    let scene = single_sphere_scene();
    let integrator = Integrator::new(4, 1);
    let render = |seed| {
        let mut film = Film::new(24, 24, 8);
        TileScheduler::new(2, seed)
            .render(&scene, &integrator, &mut film, None)
            .unwrap();
        film
    };
    assert_ne!(render(1).data(), render(2).data());
}

/// Panics whenever a ray hits the left half of the scene.
struct PanicOnLeft;

impl Material for PanicOnLeft {
    fn scatter(
        &self,
        _ray_in: &Ray,
        isect: &SurfaceInteraction,
        _rng: &mut dyn RngCore,
    ) -> Option<ScatterRecord> {
        if isect.point.x < 0.0 {
            panic!("hit poisoned surface at x = {}", isect.point.x);
        }
        None
    }
}

#[test]
fn panicking_tile_is_reported_and_others_finish() {
    init_logging();
    let mut builder = SceneBuilder::new();
    let poisoned = builder.add_material(PanicOnLeft);
    builder
        .add_shape(Sphere::new(Point3::ZERO, 1.0), poisoned)
        .unwrap();
    let camera = Camera::new()
        .with_position(Point3::new(0.0, 0.0, 5.0), Point3::ZERO, Vec3::Y)
        .with_lens(30.0, 0.0, 5.0)
        .with_aspect_ratio(1.0);
    let scene = builder
        .build(camera, SKY, &mut StdRng::seed_from_u64(0))
        .unwrap();

    let integrator = Integrator::new(2, 1).with_sampler(CenterSampler);
    let mut film = Film::new(32, 32, 8);
    let preview = PreviewBuffer::new(32, 32);
    let result = TileScheduler::new(3, 0).render(&scene, &integrator, &mut film, Some(&preview));

    let Err(RenderError::TileFailures(failures)) = result else {
        panic!("expected tile failures");
    };
    assert!(!failures.is_empty());
    assert!(failures.len() < film.tiles().len());
    for failure in &failures {
        assert!(failure.message.contains("poisoned"));
        // Only tiles reaching the left half of the image can fail.
        assert!(failure.tile.x0 < 16);
    }
    assert!(failures.windows(2).all(|w| w[0].index < w[1].index));

    // The far right column never sees the sphere and renders as sky.
    let sky = tessera_renderer::quantize(SKY);
    assert_eq!(film.pixel(31, 0), sky);
    assert_eq!(
        preview.published_tiles(),
        film.tiles().len() - failures.len()
    );
}

#[test]
fn odd_thread_count_and_tile_size_render_every_tile() {
    let scene = single_sphere_scene();
    let mut film = Film::new(8, 8, 3);
    let stats = TileScheduler::new(7, 0)
        .render(&scene, &Integrator::new(1, 1), &mut film, None)
        .unwrap();
    assert_eq!(stats.tiles, 9);
    assert_eq!(stats.threads, 7);
}
