//! Constant-density participating medium (smoke, fog).

use crate::material::Isotropic;
use crate::sampling::gen_f32;
use crate::texture::Texture;
use crate::{
    hittable::{HitRecord, Hittable},
    Color, Material, Ray,
};
use cray_math::{Aabb, Interval, Vec3};
use rand::RngCore;
use std::sync::Arc;

/// Offset past the entry point when searching for the exit point.
const EXIT_EPSILON: f32 = 0.0001;

/// Volume bounded by a closed shape in which rays scatter at a random,
/// exponentially distributed depth.
///
/// The boundary must be convex: the ray is assumed to enter and leave it
/// exactly once. A density that is not positive gives an empty volume.
pub struct ConstantMedium {
    boundary: Arc<dyn Hittable>,
    /// `-1 / density`, None for an empty volume
    neg_inv_density: Option<f32>,
    phase_function: Arc<dyn Material>,
}

impl ConstantMedium {
    pub fn new(boundary: Arc<dyn Hittable>, density: f32, albedo: Color) -> Self {
        Self::with_phase_function(boundary, density, Arc::new(Isotropic::new(albedo)))
    }

    pub fn from_texture(boundary: Arc<dyn Hittable>, density: f32, texture: Arc<dyn Texture>) -> Self {
        Self::with_phase_function(boundary, density, Arc::new(Isotropic::from_texture(texture)))
    }

    fn with_phase_function(
        boundary: Arc<dyn Hittable>,
        density: f32,
        phase_function: Arc<dyn Material>,
    ) -> Self {
        let neg_inv_density = if density > 0.0 {
            Some(-1.0 / density)
        } else {
            log::warn!("Medium density {} is not positive; volume will be empty", density);
            None
        };

        Self {
            boundary,
            neg_inv_density,
            phase_function,
        }
    }
}

impl Hittable for ConstantMedium {
    fn hit<'a>(
        &'a self,
        ray: &Ray,
        ray_t: Interval,
        rec: &mut HitRecord<'a>,
        rng: &mut dyn RngCore,
    ) -> bool {
        let Some(neg_inv_density) = self.neg_inv_density else {
            return false;
        };

        let mut entry = HitRecord::default();
        let mut exit = HitRecord::default();

        if !self.boundary.hit(ray, Interval::UNIVERSE, &mut entry, rng) {
            return false;
        }

        if !self.boundary.hit(
            ray,
            Interval::new(entry.t + EXIT_EPSILON, f32::INFINITY),
            &mut exit,
            rng,
        ) {
            return false;
        }

        let mut t_enter = entry.t.max(ray_t.min);
        let t_exit = exit.t.min(ray_t.max);

        if t_enter >= t_exit {
            return false;
        }

        // The camera may sit inside the volume.
        t_enter = t_enter.max(0.0);

        let ray_length = ray.direction().length();
        let distance_inside_boundary = (t_exit - t_enter) * ray_length;
        // 1 - U lies in (0, 1], keeping the logarithm finite.
        let hit_distance = neg_inv_density * (1.0 - gen_f32(rng)).ln();

        if hit_distance > distance_inside_boundary {
            return false;
        }

        rec.t = t_enter + hit_distance / ray_length;
        rec.p = ray.at(rec.t);
        rec.normal = Vec3::X; // arbitrary
        rec.front_face = true; // also arbitrary
        rec.material = self.phase_function.as_ref();

        true
    }

    fn bounding_box(&self) -> Aabb {
        self.boundary.bounding_box()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::material::Lambertian;
    use crate::Sphere;
    use rand::rngs::StdRng;
    use rand::SeedableRng;

    fn sphere_boundary(radius: f32) -> Arc<dyn Hittable> {
        Arc::new(Sphere::new(
            Vec3::ZERO,
            radius,
            Arc::new(Lambertian::new(Color::ONE)),
        ))
    }

    #[test]
    fn test_dense_medium_scatters_inside_boundary() {
        let fog = ConstantMedium::new(sphere_boundary(1.0), 1000.0, Color::splat(0.3));
        let ray = Ray::new(Vec3::new(0.0, 0.0, -5.0), Vec3::Z, 0.0);
        let mut rng = StdRng::seed_from_u64(21);

        for _ in 0..100 {
            let mut rec = HitRecord::default();
            assert!(fog.hit(&ray, Interval::new(0.001, f32::INFINITY), &mut rec, &mut rng));
            assert!(rec.t >= 4.0 && rec.t <= 6.0);
            let scattered = rec
                .material
                .scatter(&ray, &rec, &mut rng)
                .expect("isotropic phase function always scatters");
            assert_eq!(scattered.attenuation, Color::splat(0.3));
        }
    }

    #[test]
    fn test_thin_medium_mostly_passes_through() {
        let fog = ConstantMedium::new(sphere_boundary(1.0), 1e-4, Color::ONE);
        let ray = Ray::new(Vec3::new(0.0, 0.0, -5.0), Vec3::Z, 0.0);
        let mut rng = StdRng::seed_from_u64(21);

        let hits = (0..200)
            .filter(|_| {
                let mut rec = HitRecord::default();
                fog.hit(&ray, Interval::new(0.001, f32::INFINITY), &mut rec, &mut rng)
            })
            .count();
        assert!(hits < 5, "{} of 200 rays scattered in a near-vacuum", hits);
    }

    #[test]
    fn test_medium_misses_when_boundary_missed() {
        let fog = ConstantMedium::new(sphere_boundary(1.0), 1000.0, Color::ONE);
        let ray = Ray::new(Vec3::new(5.0, 0.0, -5.0), Vec3::Z, 0.0);
        let mut rec = HitRecord::default();
        let mut rng = StdRng::seed_from_u64(21);

        assert!(!fog.hit(&ray, Interval::new(0.001, f32::INFINITY), &mut rec, &mut rng));
    }

    #[test]
    fn test_medium_respects_search_interval() {
        let fog = ConstantMedium::new(sphere_boundary(1.0), 1000.0, Color::ONE);
        let ray = Ray::new(Vec3::new(0.0, 0.0, -5.0), Vec3::Z, 0.0);
        let mut rec = HitRecord::default();
        let mut rng = StdRng::seed_from_u64(21);

        // Volume spans t in [4, 6]; the interval ends before it.
        assert!(!fog.hit(&ray, Interval::new(0.001, 3.5), &mut rec, &mut rng));
    }

    #[test]
    fn test_ray_starting_inside_medium() {
        let fog = ConstantMedium::new(sphere_boundary(2.0), 1000.0, Color::ONE);
        let ray = Ray::new(Vec3::ZERO, Vec3::X, 0.0);
        let mut rec = HitRecord::default();
        let mut rng = StdRng::seed_from_u64(21);

        assert!(fog.hit(&ray, Interval::new(0.001, f32::INFINITY), &mut rec, &mut rng));
        assert!(rec.t >= 0.001 && rec.t <= 2.0);
    }

    #[test]
    fn test_non_positive_density_never_scatters() {
        let ray = Ray::new(Vec3::new(0.0, 0.0, -5.0), Vec3::Z, 0.0);
        let mut rng = StdRng::seed_from_u64(21);

        for density in [0.0, -2.0, f32::NAN] {
            let fog = ConstantMedium::new(sphere_boundary(1.0), density, Color::ONE);
            for _ in 0..50 {
                let mut rec = HitRecord::default();
                assert!(!fog.hit(&ray, Interval::new(0.001, f32::INFINITY), &mut rec, &mut rng));
            }
        }
    }

    #[test]
    fn test_medium_bbox_is_boundary_bbox() {
        let boundary = sphere_boundary(1.5);
        let fog = ConstantMedium::new(boundary.clone(), 0.5, Color::ONE);
        assert_eq!(fog.bounding_box(), boundary.bounding_box());
    }
}
