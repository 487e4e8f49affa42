//! Built-in demo scenes, selected by id.
//!
//! Asset paths are relative to the working directory. Missing assets never
//! abort a scene: textures fall back to a debug color and meshes to a sphere.

use std::sync::Arc;

use crate::camera::Camera;
use crate::error::{RenderError, RenderResult};
use crate::material::{Dielectric, DiffuseLight, Lambertian, Metal};
use crate::sampling::{random_f64, random_range, random_vec3};
use crate::scene::{Scene, SceneBuilder};
use crate::shape::{MovingSphere, Sphere, Triangle};
use rand::rngs::StdRng;
use rand::SeedableRng;
use tessera_core::{CheckerTexture, ImageTexture, Mesh, NoiseTexture, Perlin, Texture};
use tessera_math::{Color, Point3, Transform, Vec3};

pub const EARTH_TEXTURE_PATH: &str = "assets/textures/earthmap.jpg";
pub const BUNNY_MODEL_PATH: &str = "assets/models/bunny.obj";

/// Names of the built-in scenes, indexed by id.
pub const SCENE_NAMES: [&str; 7] = [
    "random balls",
    "two checker spheres",
    "two perlin spheres",
    "earth",
    "simple light",
    "bunny",
    "cornell box",
];

const SKY: Color = Color::new(0.70, 0.80, 1.00);

/// Builds scene `id`; `seed` drives scene randomness and the BVH build.
pub fn build_scene(id: u32, seed: u64) -> RenderResult<Scene> {
    let mut rng = StdRng::seed_from_u64(seed);
    let name = SCENE_NAMES
        .get(id as usize)
        .ok_or_else(|| RenderError::InvalidSettings(format!("unknown scene id {}", id)))?;
    log::info!("Building scene {}: {}", id, name);

    let (builder, camera, background) = match id {
        0 => random_balls(&mut rng)?,
        1 => two_spheres()?,
        2 => two_perlin_spheres(&mut rng)?,
        3 => earth()?,
        4 => simple_light(&mut rng)?,
        5 => bunny()?,
        _ => cornell_box()?,
    };

    builder.build(camera, background, &mut rng)
}

type SceneParts = (SceneBuilder, Camera, Color);

fn outdoor_camera(aperture: f64) -> Camera {
    Camera::new()
        .with_position(Point3::new(13.0, 2.0, 3.0), Point3::ZERO, Vec3::Y)
        .with_lens(20.0, aperture, 10.0)
        .with_aspect_ratio(16.0 / 9.0)
        .with_shutter(0.0, 1.0)
}

fn checker() -> Arc<dyn Texture> {
    Arc::new(CheckerTexture::from_colors(
        Color::new(0.2, 0.3, 0.1),
        Color::new(0.9, 0.9, 0.9),
    ))
}

fn random_balls(rng: &mut StdRng) -> RenderResult<SceneParts> {
    let mut builder = SceneBuilder::new();

    let ground = builder.add_material(Lambertian::textured(checker()));
    builder.add_shape(Sphere::new(Point3::new(0.0, -1000.0, 0.0), 1000.0), ground)?;

    for a in -11..11 {
        for b in -11..11 {
            let choose_mat = random_f64(rng);
            let center = Point3::new(
                a as f64 + 0.9 * random_f64(rng),
                0.2,
                b as f64 + 0.9 * random_f64(rng),
            );

            if (center - Point3::new(4.0, 0.2, 0.0)).length() <= 0.9 {
                continue;
            }

            if choose_mat < 0.8 {
                // diffuse, bouncing during the shutter
                let albedo = random_vec3(rng, 0.0, 1.0) * random_vec3(rng, 0.0, 1.0);
                let material = builder.add_material(Lambertian::new(albedo));
                let center1 = center + Vec3::new(0.0, random_range(rng, 0.0, 0.5), 0.0);
                builder.add_shape(MovingSphere::new(center, center1, 0.0, 1.0, 0.2), material)?;
            } else if choose_mat < 0.95 {
                // metal
                let albedo = random_vec3(rng, 0.5, 1.0);
                let fuzz = random_range(rng, 0.0, 0.5);
                let material = builder.add_material(Metal::new(albedo, fuzz));
                builder.add_shape(Sphere::new(center, 0.2), material)?;
            } else {
                // glass
                let material = builder.add_material(Dielectric::new(1.5));
                builder.add_shape(Sphere::new(center, 0.2), material)?;
            }
        }
    }

    let glass = builder.add_material(Dielectric::new(1.5));
    builder.add_shape(Sphere::new(Point3::new(0.0, 1.0, 0.0), 1.0), glass)?;

    let earth = builder.add_material(Lambertian::textured(Arc::new(
        ImageTexture::open_or_fallback(EARTH_TEXTURE_PATH),
    )));
    builder.add_shape(Sphere::new(Point3::new(-4.0, 1.0, 0.0), 1.0), earth)?;

    let metal = builder.add_material(Metal::new(Color::new(0.7, 0.6, 0.5), 0.0));
    builder.add_shape(Sphere::new(Point3::new(4.0, 1.0, 0.0), 1.0), metal)?;

    Ok((builder, outdoor_camera(0.1), SKY))
}

fn two_spheres() -> RenderResult<SceneParts> {
    let mut builder = SceneBuilder::new();
    let checker = builder.add_material(Lambertian::textured(checker()));
    builder.add_shape(Sphere::new(Point3::new(0.0, -10.0, 0.0), 10.0), checker)?;
    builder.add_shape(Sphere::new(Point3::new(0.0, 10.0, 0.0), 10.0), checker)?;
    Ok((builder, outdoor_camera(0.0), SKY))
}

fn two_perlin_spheres(rng: &mut StdRng) -> RenderResult<SceneParts> {
    let mut builder = SceneBuilder::new();
    let marble = builder.add_material(Lambertian::textured(Arc::new(NoiseTexture::new(
        Perlin::new(rng),
        4.0,
    ))));
    builder.add_shape(Sphere::new(Point3::new(0.0, -1000.0, 0.0), 1000.0), marble)?;
    builder.add_shape(Sphere::new(Point3::new(0.0, 2.0, 0.0), 2.0), marble)?;
    Ok((builder, outdoor_camera(0.0), SKY))
}

fn earth() -> RenderResult<SceneParts> {
    let mut builder = SceneBuilder::new();
    let surface = builder.add_material(Lambertian::textured(Arc::new(
        ImageTexture::open_or_fallback(EARTH_TEXTURE_PATH),
    )));
    builder.add_shape(Sphere::new(Point3::ZERO, 2.0), surface)?;
    Ok((builder, outdoor_camera(0.0), SKY))
}

fn simple_light(rng: &mut StdRng) -> RenderResult<SceneParts> {
    let mut builder = SceneBuilder::new();
    let marble = builder.add_material(Lambertian::textured(Arc::new(NoiseTexture::new(
        Perlin::new(rng),
        4.0,
    ))));
    builder.add_shape(Sphere::new(Point3::new(0.0, -1000.0, 0.0), 1000.0), marble)?;
    builder.add_shape(Sphere::new(Point3::new(0.0, 2.0, 0.0), 2.0), marble)?;

    // Emissive quad behind the sphere, split into two triangles.
    let panel = builder.add_material(DiffuseLight::new(Color::splat(4.0)));
    let (p00, p10, p11, p01) = (
        Point3::new(3.0, 1.0, -2.0),
        Point3::new(5.0, 1.0, -2.0),
        Point3::new(5.0, 3.0, -2.0),
        Point3::new(3.0, 3.0, -2.0),
    );
    builder.add_shape(Triangle::new(p00, p10, p11), panel)?;
    builder.add_shape(Triangle::new(p00, p11, p01), panel)?;

    let overhead = builder.add_material(DiffuseLight::new(Color::ONE));
    builder.add_shape(Sphere::new(Point3::new(0.0, 7.0, 0.0), 2.0), overhead)?;

    let camera = Camera::new()
        .with_position(Point3::new(26.0, 3.0, 6.0), Point3::new(0.0, 2.0, 0.0), Vec3::Y)
        .with_lens(20.0, 0.0, 10.0)
        .with_aspect_ratio(16.0 / 9.0)
        .with_shutter(0.0, 1.0);

    Ok((builder, camera, Color::ZERO))
}

fn bunny() -> RenderResult<SceneParts> {
    let mut builder = SceneBuilder::new();
    let red = builder.add_material(Lambertian::new(Color::new(1.0, 0.1, 0.1)));

    match Mesh::load_obj(BUNNY_MODEL_PATH, false) {
        Ok(mesh) => {
            // Fit the model into a 2-unit box centered at the origin.
            let extent = mesh.bounds.diagonal().max_element();
            let scale = if extent > 0.0 { 2.0 / extent } else { 1.0 };
            let fit = Transform::scale(scale, scale, scale)
                * Transform::translate(-mesh.bounds.centroid());
            builder.add_mesh(&mesh.transformed(&fit), red)?;
        }
        Err(e) => {
            log::error!("{}; rendering a placeholder sphere instead", e);
            builder.add_shape(Sphere::new(Point3::ZERO, 1.0), red)?;
        }
    }

    let camera = Camera::new()
        .with_position(Point3::new(0.0, 1.0, 8.0), Point3::ZERO, Vec3::Y)
        .with_lens(20.0, 0.0, 8.0)
        .with_aspect_ratio(16.0 / 9.0);

    Ok((builder, camera, SKY))
}

fn cornell_box() -> RenderResult<SceneParts> {
    let mut builder = SceneBuilder::new();
    let red = builder.add_material(Lambertian::new(Color::new(0.65, 0.05, 0.05)));
    let white = builder.add_material(Lambertian::new(Color::splat(0.73)));
    let green = builder.add_material(Lambertian::new(Color::new(0.12, 0.45, 0.15)));
    let light = builder.add_material(DiffuseLight::new(Color::splat(15.0)));

    let p = |x: f64, y: f64, z: f64| Point3::new(x, y, z);
    let walls = [
        // right
        (p(555.0, 0.0, 0.0), p(555.0, 0.0, -555.0), p(555.0, 555.0, 0.0), green),
        (p(555.0, 0.0, -555.0), p(555.0, 555.0, -555.0), p(555.0, 555.0, 0.0), green),
        // left
        (p(0.0, 0.0, 0.0), p(0.0, 0.0, -555.0), p(0.0, 555.0, 0.0), red),
        (p(0.0, 0.0, -555.0), p(0.0, 555.0, -555.0), p(0.0, 555.0, 0.0), red),
        // floor
        (p(0.0, 0.0, 0.0), p(0.0, 0.0, -555.0), p(555.0, 0.0, -555.0), white),
        (p(0.0, 0.0, 0.0), p(555.0, 0.0, -555.0), p(555.0, 0.0, 0.0), white),
        // back
        (p(0.0, 0.0, -555.0), p(0.0, 555.0, -555.0), p(555.0, 555.0, -555.0), white),
        (p(0.0, 0.0, -555.0), p(555.0, 555.0, -555.0), p(555.0, 0.0, -555.0), white),
        // ceiling
        (p(0.0, 555.0, 0.0), p(0.0, 555.0, -555.0), p(555.0, 555.0, -555.0), white),
        (p(0.0, 555.0, 0.0), p(555.0, 555.0, -555.0), p(555.0, 555.0, 0.0), white),
        // light, just below the ceiling
        (p(213.0, 554.0, -227.0), p(213.0, 554.0, -332.0), p(343.0, 554.0, -332.0), light),
        (p(213.0, 554.0, -227.0), p(343.0, 554.0, -332.0), p(343.0, 554.0, -227.0), light),
    ];
    for (a, b, c, material) in walls {
        builder.add_shape(Triangle::new(a, b, c), material)?;
    }

    // Inner panel, grouped into its own aggregate.
    let offset = Transform::translate(Vec3::new(50.0, 0.0, -200.0));
    let corners = [
        p(0.0, 0.0, 0.0),
        p(165.0, 0.0, 0.0),
        p(165.0, 165.0, 0.0),
        p(0.0, 165.0, 0.0),
    ]
    .map(|c| offset.apply_point(c));
    let lower = builder.create_shape(Triangle::new(corners[0], corners[1], corners[2]), white)?;
    let upper = builder.create_shape(Triangle::new(corners[0], corners[2], corners[3]), white)?;
    builder.add_aggregate(&[lower, upper])?;

    let camera = Camera::new()
        .with_position(p(278.0, 278.0, 800.0), p(278.0, 278.0, 0.0), Vec3::Y)
        .with_lens(40.0, 0.0, 10.0)
        .with_aspect_ratio(1.0);

    Ok((builder, camera, Color::ZERO))
}
