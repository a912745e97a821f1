//! cray renderer - CPU Path Tracing
//!
//! A Monte Carlo path tracer for offline rendering of analytic scenes:
//! spheres (optionally moving), quads, boxes, instanced transforms and
//! constant-density volumes, organised in a BVH and shaded with diffuse,
//! metal, glass and emissive materials.
//!
//! # Example
//!
//! ```ignore
//! use cray_renderer::{render, Camera, HittableList, Lambertian, RenderConfig, Sphere, Vec3};
//! use std::sync::Arc;
//!
//! let mut world = HittableList::new();
//! world.add(Arc::new(Sphere::new(
//!     Vec3::new(0.0, 0.0, -1.0),
//!     0.5,
//!     Arc::new(Lambertian::new(Vec3::splat(0.5))),
//! )));
//!
//! let camera = Camera::new().with_image(400, 16.0 / 9.0).with_quality(100, 50);
//! let image = render(&camera, &world, &RenderConfig::default())?;
//! image.save_png("out.png")?;
//! ```

mod bucket;
mod bvh;
mod camera;
mod error;
mod hittable;
mod material;
mod medium;
mod output;
mod perlin;
mod quad;
mod renderer;
pub mod sampling;
mod sphere;
mod texture;
mod transform;

pub use bucket::{generate_buckets, render_bucket, Bucket, BucketResult, DEFAULT_BUCKET_SIZE};
pub use bvh::BvhNode;
pub use camera::Camera;
pub use error::{RenderError, RenderResult, TextureError, TextureResult};
pub use hittable::{HitRecord, Hittable, HittableList};
pub use material::{Color, Dielectric, DiffuseLight, Isotropic, Lambertian, Material, Metal, ScatterResult};
pub use medium::ConstantMedium;
pub use output::ImageBuffer;
pub use perlin::Perlin;
pub use quad::{make_box, Quad};
pub use renderer::{
    color_to_rgb8, linear_to_gamma, ray_color, render, render_pixel, render_serial,
    render_with_cancel, RenderConfig,
};
pub use sphere::Sphere;
pub use texture::{
    CheckerTexture, ImageData, ImageTexture, NoiseTexture, SolidColor, Texture,
    MISSING_TEXTURE_COLOR,
};
pub use transform::{RotateY, Translate};

/// Re-export Vec3 and common math types from cray_math
pub use cray_math::{Aabb, Interval, Ray, Vec3};
