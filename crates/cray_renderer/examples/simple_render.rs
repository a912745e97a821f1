//! Simple path tracer example.
//!
//! Renders one of two scenes and saves it as PNG and PPM.
//!
//! ```text
//! RUST_LOG=info cargo run --release --example simple_render -- [spheres|cornell]
//! ```

use anyhow::{bail, Context, Result};
use cray_renderer::sampling::{gen_f32, gen_range_f32, random_vec3};
use cray_renderer::{
    make_box, render, BvhNode, Camera, CheckerTexture, Color, ConstantMedium, Dielectric,
    DiffuseLight, Hittable, HittableList, Lambertian, Material, Metal, NoiseTexture, Quad,
    RenderConfig, RotateY, Sphere, Translate, Vec3,
};
use rand::rngs::StdRng;
use rand::SeedableRng;
use std::fs::File;
use std::io::BufWriter;
use std::sync::Arc;

fn main() -> Result<()> {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();

    let scene = std::env::args().nth(1).unwrap_or_else(|| "spheres".to_string());
    let mut rng = StdRng::seed_from_u64(2024);

    let start = std::time::Instant::now();
    let (world, camera) = match scene.as_str() {
        "spheres" => bouncing_spheres(&mut rng),
        "cornell" => cornell_smoke(&mut rng),
        other => bail!("unknown scene '{}' (expected 'spheres' or 'cornell')", other),
    };
    log::info!("Scene '{}' built in {:?}", scene, start.elapsed());

    let image = render(&camera, &world, &RenderConfig::default())?;

    let png = format!("{}.png", scene);
    image.save_png(&png)?;

    let ppm = format!("{}.ppm", scene);
    let file = File::create(&ppm).with_context(|| format!("creating {}", ppm))?;
    image.write_ppm(BufWriter::new(file))?;
    log::info!("Saved to {} and {}", png, ppm);

    Ok(())
}

/// Random small spheres around three large ones on a checkered ground.
/// Diffuse spheres bounce during the exposure.
fn bouncing_spheres(rng: &mut StdRng) -> (BvhNode, Camera) {
    let mut world = HittableList::new();

    let checker = Arc::new(CheckerTexture::from_colors(
        0.32,
        Color::new(0.2, 0.3, 0.1),
        Color::new(0.9, 0.9, 0.9),
    ));
    world.add(Arc::new(Sphere::new(
        Vec3::new(0.0, -1000.0, 0.0),
        1000.0,
        Arc::new(Lambertian::from_texture(checker)),
    )));

    for a in -11..11 {
        for b in -11..11 {
            let choose_mat = gen_f32(rng);
            let center = Vec3::new(
                a as f32 + 0.9 * gen_f32(rng),
                0.2,
                b as f32 + 0.9 * gen_f32(rng),
            );

            if (center - Vec3::new(4.0, 0.2, 0.0)).length() <= 0.9 {
                continue;
            }

            let sphere: Arc<dyn Hittable> = if choose_mat < 0.8 {
                let albedo = random_vec3(rng, 0.0, 1.0) * random_vec3(rng, 0.0, 1.0);
                let bounce = Vec3::new(0.0, gen_range_f32(rng, 0.0, 0.5), 0.0);
                Arc::new(Sphere::moving(
                    center,
                    center + bounce,
                    0.2,
                    Arc::new(Lambertian::new(albedo)),
                ))
            } else if choose_mat < 0.95 {
                let albedo = random_vec3(rng, 0.5, 1.0);
                let fuzz = gen_range_f32(rng, 0.0, 0.5);
                Arc::new(Sphere::new(center, 0.2, Arc::new(Metal::new(albedo, fuzz))))
            } else {
                Arc::new(Sphere::new(center, 0.2, Arc::new(Dielectric::new(1.5))))
            };
            world.add(sphere);
        }
    }

    world.add(Arc::new(Sphere::new(
        Vec3::new(0.0, 1.0, 0.0),
        1.0,
        Arc::new(Dielectric::new(1.5)),
    )));
    world.add(Arc::new(Sphere::new(
        Vec3::new(-4.0, 1.0, 0.0),
        1.0,
        Arc::new(Lambertian::from_texture(Arc::new(NoiseTexture::new(4.0, rng)))),
    )));
    world.add(Arc::new(Sphere::new(
        Vec3::new(4.0, 1.0, 0.0),
        1.0,
        Arc::new(Metal::new(Color::new(0.7, 0.6, 0.5), 0.0)),
    )));

    let camera = Camera::new()
        .with_image(400, 16.0 / 9.0)
        .with_quality(50, 20)
        .with_position(Vec3::new(13.0, 2.0, 3.0), Vec3::ZERO, Vec3::Y)
        .with_lens(20.0, 0.6, 10.0)
        .with_background(Color::new(0.7, 0.8, 1.0));

    (BvhNode::from_list(&world, rng), camera)
}

/// Cornell box lit from the ceiling, with two rotated boxes of smoke.
fn cornell_smoke(rng: &mut StdRng) -> (BvhNode, Camera) {
    let mut world = HittableList::new();

    let red: Arc<dyn Material> = Arc::new(Lambertian::new(Color::new(0.65, 0.05, 0.05)));
    let white: Arc<dyn Material> = Arc::new(Lambertian::new(Color::splat(0.73)));
    let green: Arc<dyn Material> = Arc::new(Lambertian::new(Color::new(0.12, 0.45, 0.15)));
    let light: Arc<dyn Material> = Arc::new(DiffuseLight::new(Color::splat(7.0)));

    let walls = [
        (Vec3::new(555.0, 0.0, 0.0), Vec3::new(0.0, 555.0, 0.0), Vec3::new(0.0, 0.0, 555.0), green),
        (Vec3::ZERO, Vec3::new(0.0, 555.0, 0.0), Vec3::new(0.0, 0.0, 555.0), red),
        (Vec3::new(113.0, 554.0, 127.0), Vec3::new(330.0, 0.0, 0.0), Vec3::new(0.0, 0.0, 305.0), light),
        (Vec3::new(0.0, 555.0, 0.0), Vec3::new(555.0, 0.0, 0.0), Vec3::new(0.0, 0.0, 555.0), white.clone()),
        (Vec3::ZERO, Vec3::new(555.0, 0.0, 0.0), Vec3::new(0.0, 0.0, 555.0), white.clone()),
        (Vec3::new(0.0, 0.0, 555.0), Vec3::new(555.0, 0.0, 0.0), Vec3::new(0.0, 555.0, 0.0), white.clone()),
    ];
    for (q, u, v, material) in walls {
        world.add(Arc::new(Quad::new(q, u, v, material)));
    }

    let tall: Arc<dyn Hittable> = Arc::new(make_box(
        Vec3::ZERO,
        Vec3::new(165.0, 330.0, 165.0),
        white.clone(),
    ));
    let tall = Arc::new(RotateY::new(tall, 15.0));
    let tall = Arc::new(Translate::new(tall, Vec3::new(265.0, 0.0, 295.0)));

    let short: Arc<dyn Hittable> = Arc::new(make_box(
        Vec3::ZERO,
        Vec3::new(165.0, 165.0, 165.0),
        white,
    ));
    let short = Arc::new(RotateY::new(short, -18.0));
    let short = Arc::new(Translate::new(short, Vec3::new(130.0, 0.0, 65.0)));

    world.add(Arc::new(ConstantMedium::new(tall, 0.01, Color::ZERO)));
    world.add(Arc::new(ConstantMedium::new(short, 0.01, Color::ONE)));

    let camera = Camera::new()
        .with_image(300, 1.0)
        .with_quality(100, 20)
        .with_position(Vec3::new(278.0, 278.0, -800.0), Vec3::new(278.0, 278.0, 0.0), Vec3::Y)
        .with_lens(40.0, 0.0, 10.0)
        .with_background(Color::ZERO);

    (BvhNode::from_list(&world, rng), camera)
}
