//! Core path tracing renderer.
//!
//! Implements Monte Carlo path tracing with:
//! - Recursive ray tracing with configurable depth
//! - Gamma correction
//! - Anti-aliasing via multi-sampling
//! - Parallel bucket rendering with per-bucket random streams

use crate::bucket::{generate_buckets, render_bucket, BucketResult, DEFAULT_BUCKET_SIZE};
use crate::error::{RenderError, RenderResult};
use crate::output::ImageBuffer;
use crate::{Camera, Color, HitRecord, Hittable, Ray};
use cray_math::Interval;
use rand::rngs::StdRng;
use rand::{RngCore, SeedableRng};
use rayon::prelude::*;
use std::sync::atomic::{AtomicBool, AtomicUsize, Ordering};
use std::time::Instant;

/// Minimum hit distance, to keep scattered rays off their own surface.
const SHADOW_ACNE_EPSILON: f32 = 0.001;

/// Render configuration.
#[derive(Debug, Clone)]
pub struct RenderConfig {
    /// Base seed for the per-bucket random streams
    pub seed: u64,
    /// Bucket edge length in pixels
    pub bucket_size: u32,
    /// Worker threads; None uses rayon's global pool
    pub threads: Option<usize>,
}

impl Default for RenderConfig {
    fn default() -> Self {
        Self {
            seed: 0,
            bucket_size: DEFAULT_BUCKET_SIZE,
            threads: None,
        }
    }
}

/// Compute the color seen by a ray.
///
/// Follows the ray through at most `depth` scatter events, accumulating
/// emission and attenuation along the path.
pub fn ray_color(
    ray: &Ray,
    world: &dyn Hittable,
    depth: u32,
    background: Color,
    rng: &mut dyn RngCore,
) -> Color {
    // Bounce limit reached: no more light is gathered
    if depth == 0 {
        return Color::ZERO;
    }

    let mut rec = HitRecord::default();

    if !world.hit(
        ray,
        Interval::new(SHADOW_ACNE_EPSILON, f32::INFINITY),
        &mut rec,
        rng,
    ) {
        return background;
    }

    let emission = rec.material.emitted(rec.u, rec.v, rec.p);

    match rec.material.scatter(ray, &rec, rng) {
        Some(result) => {
            let scattered_color = ray_color(&result.scattered, world, depth - 1, background, rng);
            emission + result.attenuation * scattered_color
        }
        // Absorbed
        None => emission,
    }
}

/// Apply gamma correction (gamma = 2.0).
#[inline]
pub fn linear_to_gamma(linear: f32) -> f32 {
    if linear > 0.0 {
        linear.sqrt()
    } else {
        0.0
    }
}

/// Convert a linear color to gamma-corrected 8-bit RGB.
pub fn color_to_rgb8(color: Color) -> [u8; 3] {
    let to_byte = |c: f32| {
        let c = if c.is_nan() { 0.0 } else { c };
        (256.0 * linear_to_gamma(c).clamp(0.0, 0.999)) as u8
    };
    [to_byte(color.x), to_byte(color.y), to_byte(color.z)]
}

/// Render a single pixel with multi-sampling.
pub fn render_pixel(
    camera: &Camera,
    world: &dyn Hittable,
    x: u32,
    y: u32,
    rng: &mut dyn RngCore,
) -> Color {
    let mut pixel_color = Color::ZERO;

    for _ in 0..camera.samples_per_pixel {
        // get_ray jitters within the pixel for anti-aliasing
        let ray = camera.get_ray(x, y, rng);
        pixel_color += ray_color(&ray, world, camera.max_depth, camera.background, rng);
    }

    pixel_color * camera.samples_scale()
}

fn prepared(camera: &Camera) -> Camera {
    let mut camera = camera.clone();
    camera.initialize();
    camera
}

/// Render the entire scene on the calling thread, in scanline order, with
/// a single random stream.
pub fn render_serial(camera: &Camera, world: &dyn Hittable, rng: &mut dyn RngCore) -> ImageBuffer {
    let camera = prepared(camera);
    let mut image = ImageBuffer::new(camera.image_width, camera.image_height());

    for y in 0..camera.image_height() {
        for x in 0..camera.image_width {
            image.set(x, y, render_pixel(&camera, world, x, y, rng));
        }
    }

    image
}

/// Render the entire scene in parallel buckets.
///
/// The output depends only on the scene, the camera and `config.seed`, not
/// on the thread count or scheduling.
pub fn render(camera: &Camera, world: &dyn Hittable, config: &RenderConfig) -> RenderResult<ImageBuffer> {
    render_with_cancel(camera, world, config, &AtomicBool::new(false))
}

/// Like [`render`], but stops handing out buckets once `cancel` is set.
///
/// Buckets already in flight finish; the partial image is discarded and
/// `RenderError::Cancelled` is returned.
pub fn render_with_cancel(
    camera: &Camera,
    world: &dyn Hittable,
    config: &RenderConfig,
    cancel: &AtomicBool,
) -> RenderResult<ImageBuffer> {
    let camera = prepared(camera);

    match config.threads {
        Some(threads) => {
            let pool = rayon::ThreadPoolBuilder::new().num_threads(threads).build()?;
            pool.install(|| render_buckets(&camera, world, config, cancel))
        }
        None => render_buckets(&camera, world, config, cancel),
    }
}

fn render_buckets(
    camera: &Camera,
    world: &dyn Hittable,
    config: &RenderConfig,
    cancel: &AtomicBool,
) -> RenderResult<ImageBuffer> {
    let width = camera.image_width;
    let height = camera.image_height();
    let buckets = generate_buckets(width, height, config.bucket_size);
    let total = buckets.len();

    log::info!(
        "Rendering {}x{} at {} spp in {} buckets on {} threads",
        width,
        height,
        camera.samples_per_pixel,
        total,
        rayon::current_num_threads()
    );
    let start = Instant::now();
    let completed = AtomicUsize::new(0);

    let results: Vec<BucketResult> = buckets
        .par_iter()
        .filter_map(|bucket| {
            if cancel.load(Ordering::Relaxed) {
                return None;
            }

            let mut rng = StdRng::seed_from_u64(bucket.seed(config.seed));
            let pixels = render_bucket(bucket, camera, world, &mut rng);

            let done = completed.fetch_add(1, Ordering::Relaxed) + 1;
            log::debug!("Bucket {} finished ({}/{})", bucket.index, done, total);
            Some(BucketResult::new(*bucket, pixels))
        })
        .collect();

    if results.len() < total {
        log::info!("Render cancelled after {} of {} buckets", results.len(), total);
        return Err(RenderError::Cancelled {
            completed: results.len(),
            total,
        });
    }

    let mut image = ImageBuffer::new(width, height);
    for result in &results {
        image.write_bucket(result);
    }

    log::info!("Render finished in {:.2?}", start.elapsed());
    Ok(image)
}
