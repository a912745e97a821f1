//! Bounding Volume Hierarchy (BVH) acceleration structure.
//!
//! Binary tree built once over the scene's objects. Each node splits its
//! objects at the median along a randomly chosen axis, which keeps the
//! expected depth logarithmic without a surface-area heuristic.

use crate::{HitRecord, Hittable, HittableList, Ray};
use cray_math::{Aabb, Interval};
use rand::{Rng, RngCore};
use std::cmp::Ordering;
use std::sync::Arc;

/// Interior node of the hierarchy.
///
/// A node built over a single object holds it as both children, so every
/// node has two valid children and traversal needs no leaf special case.
pub struct BvhNode {
    left: Arc<dyn Hittable>,
    right: Arc<dyn Hittable>,
    bbox: Aabb,
}

impl BvhNode {
    /// Build a BVH over `objects`, reordering the slice in place.
    pub fn new(objects: &mut [Arc<dyn Hittable>], rng: &mut dyn RngCore) -> Self {
        log::debug!("Building BVH over {} objects", objects.len());

        if objects.is_empty() {
            let empty: Arc<dyn Hittable> = Arc::new(HittableList::new());
            return Self {
                left: empty.clone(),
                right: empty,
                bbox: Aabb::EMPTY,
            };
        }

        Self::build(objects, rng)
    }

    /// Build a BVH over the objects of a list.
    pub fn from_list(list: &HittableList, rng: &mut dyn RngCore) -> Self {
        let mut objects = list.objects().to_vec();
        Self::new(&mut objects, rng)
    }

    fn build(objects: &mut [Arc<dyn Hittable>], rng: &mut dyn RngCore) -> Self {
        let axis = rng.gen_range(0..3);
        let comparator = |a: &Arc<dyn Hittable>, b: &Arc<dyn Hittable>| box_compare(a, b, axis);

        let (left, right): (Arc<dyn Hittable>, Arc<dyn Hittable>) = match objects.len() {
            1 => (objects[0].clone(), objects[0].clone()),
            2 => {
                if comparator(&objects[1], &objects[0]) == Ordering::Less {
                    objects.swap(0, 1);
                }
                (objects[0].clone(), objects[1].clone())
            }
            n => {
                objects.sort_by(comparator);
                let (lower, upper) = objects.split_at_mut(n / 2);
                (
                    Arc::new(Self::build(lower, rng)),
                    Arc::new(Self::build(upper, rng)),
                )
            }
        };

        let bbox = Aabb::surrounding(&left.bounding_box(), &right.bounding_box());
        Self { left, right, bbox }
    }
}

/// Order two objects by the lower bound of their boxes along `axis`.
fn box_compare(a: &Arc<dyn Hittable>, b: &Arc<dyn Hittable>, axis: usize) -> Ordering {
    let a_min = a.bounding_box().axis_interval(axis).min;
    let b_min = b.bounding_box().axis_interval(axis).min;
    a_min.partial_cmp(&b_min).unwrap_or(Ordering::Equal)
}

impl Hittable for BvhNode {
    fn hit<'a>(
        &'a self,
        ray: &Ray,
        ray_t: Interval,
        rec: &mut HitRecord<'a>,
        rng: &mut dyn RngCore,
    ) -> bool {
        if !self.bbox.hit(ray, ray_t) {
            return false;
        }

        let hit_left = self.left.hit(ray, ray_t, rec, rng);

        // Only check right up to the closest hit so far
        let right_max = if hit_left { rec.t } else { ray_t.max };
        let hit_right = self.right.hit(ray, Interval::new(ray_t.min, right_max), rec, rng);

        hit_left || hit_right
    }

    fn bounding_box(&self) -> Aabb {
        self.bbox
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::sampling::{gen_range_f32, random_unit_vector, random_vec3};
    use crate::{Lambertian, Material, Quad, Sphere};
    use cray_math::Vec3;
    use rand::rngs::StdRng;
    use rand::SeedableRng;

    fn sphere(center: Vec3, radius: f32) -> Arc<dyn Hittable> {
        Arc::new(Sphere::new(
            center,
            radius,
            Arc::new(Lambertian::new(Vec3::splat(0.5))),
        ))
    }

    fn material_ptr(material: &dyn Material) -> *const () {
        material as *const dyn Material as *const ()
    }

    #[test]
    fn test_bvh_empty_never_hits() {
        let mut rng = StdRng::seed_from_u64(0);
        let bvh = BvhNode::new(&mut [], &mut rng);
        let ray = Ray::new(Vec3::ZERO, -Vec3::Z, 0.0);
        let mut rec = HitRecord::default();

        assert_eq!(bvh.bounding_box(), Aabb::EMPTY);
        assert!(!bvh.hit(&ray, Interval::UNIVERSE, &mut rec, &mut rng));
    }

    #[test]
    fn test_bvh_single_object_duplicates_leaf() {
        let mut rng = StdRng::seed_from_u64(0);
        let mut objects = vec![sphere(Vec3::new(0.0, 0.0, -1.0), 0.5)];
        let bvh = BvhNode::new(&mut objects, &mut rng);

        assert!(Arc::ptr_eq(&bvh.left, &bvh.right));
        assert_eq!(bvh.bounding_box(), objects[0].bounding_box());

        let ray = Ray::new(Vec3::ZERO, Vec3::new(0.0, 0.0, -1.0), 0.0);
        let mut rec = HitRecord::default();
        assert!(bvh.hit(&ray, Interval::new(0.001, f32::INFINITY), &mut rec, &mut rng));
        assert!((rec.t - 0.5).abs() < 1e-5);
    }

    #[test]
    fn test_bvh_two_objects_are_ordered() {
        let mut rng = StdRng::seed_from_u64(4);
        let far = sphere(Vec3::new(5.0, 5.0, 5.0), 0.5);
        let near = sphere(Vec3::new(-5.0, -5.0, -5.0), 0.5);
        let mut objects = vec![far.clone(), near.clone()];
        let bvh = BvhNode::new(&mut objects, &mut rng);

        // Whatever axis was chosen, `near` has the smaller lower bound.
        assert!(Arc::ptr_eq(&bvh.left, &near));
        assert!(Arc::ptr_eq(&bvh.right, &far));
    }

    #[test]
    fn test_bvh_box_encloses_all_objects() {
        let mut rng = StdRng::seed_from_u64(9);
        let mut objects: Vec<Arc<dyn Hittable>> = (0..37)
            .map(|_| sphere(random_vec3(&mut rng, -20.0, 20.0), 1.0))
            .collect();
        let expected = objects
            .iter()
            .fold(Aabb::EMPTY, |acc, o| Aabb::surrounding(&acc, &o.bounding_box()));

        let bvh = BvhNode::new(&mut objects, &mut rng);
        assert_eq!(bvh.bounding_box(), expected);
    }

    #[test]
    fn test_bvh_multiple_spheres() {
        let mut rng = StdRng::seed_from_u64(1);
        let mut spheres: Vec<Arc<dyn Hittable>> = (0..10)
            .map(|i| sphere(Vec3::new(i as f32, 0.0, -5.0), 0.5))
            .collect();
        let bvh = BvhNode::new(&mut spheres, &mut rng);

        let ray = Ray::new(Vec3::new(5.0, 0.0, 0.0), Vec3::new(0.0, 0.0, -1.0), 0.0);
        let mut rec = HitRecord::default();
        assert!(bvh.hit(&ray, Interval::new(0.001, f32::INFINITY), &mut rec, &mut rng));
        assert!((rec.p.z - (-4.5)).abs() < 0.01);
    }

    fn random_scene(rng: &mut StdRng, count: usize) -> HittableList {
        let mut list = HittableList::new();
        for i in 0..count {
            let material: Arc<dyn Material> = Arc::new(Lambertian::new(Vec3::splat(0.5)));
            let center = random_vec3(rng, -10.0, 10.0);
            if i % 4 == 0 {
                let u = random_vec3(rng, -2.0, 2.0);
                let v = random_vec3(rng, -2.0, 2.0);
                list.add(Arc::new(Quad::new(center, u, v, material)));
            } else {
                let radius = gen_range_f32(rng, 0.2, 2.0);
                list.add(Arc::new(Sphere::new(center, radius, material)));
            }
        }
        list
    }

    #[test]
    fn test_bvh_matches_linear_scan() {
        let mut rng = StdRng::seed_from_u64(2024);

        for scene in 0..20 {
            let list = random_scene(&mut rng, 10 + scene * 7);
            let bvh = BvhNode::from_list(&list, &mut rng);

            for _ in 0..300 {
                let origin = random_vec3(&mut rng, -15.0, 15.0);
                let ray = Ray::new(origin, random_unit_vector(&mut rng), 0.0);
                let ray_t = Interval::new(0.001, gen_range_f32(&mut rng, 1.0, 40.0));

                let mut linear_rec = HitRecord::default();
                let mut bvh_rec = HitRecord::default();
                let linear_hit = list.hit(&ray, ray_t, &mut linear_rec, &mut rng);
                let bvh_hit = bvh.hit(&ray, ray_t, &mut bvh_rec, &mut rng);

                assert_eq!(linear_hit, bvh_hit);
                if linear_hit {
                    assert_eq!(linear_rec.t, bvh_rec.t);
                    assert_eq!(linear_rec.p, bvh_rec.p);
                    assert_eq!(
                        material_ptr(linear_rec.material),
                        material_ptr(bvh_rec.material)
                    );
                }
            }
        }
    }
}
