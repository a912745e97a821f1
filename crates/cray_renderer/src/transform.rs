//! Instancing wrappers that move an object without copying its geometry.
//!
//! Both wrappers move the ray into the child's local space, delegate, and
//! move the resulting hit back into world space.

use crate::{
    hittable::{HitRecord, Hittable},
    Ray,
};
use cray_math::{Aabb, Interval, Vec3};
use rand::RngCore;
use std::sync::Arc;

/// An object displaced by a fixed offset.
pub struct Translate {
    object: Arc<dyn Hittable>,
    offset: Vec3,
    bbox: Aabb,
}

impl Translate {
    pub fn new(object: Arc<dyn Hittable>, offset: Vec3) -> Self {
        let bbox = object.bounding_box() + offset;
        Self {
            object,
            offset,
            bbox,
        }
    }
}

impl Hittable for Translate {
    fn hit<'a>(
        &'a self,
        ray: &Ray,
        ray_t: Interval,
        rec: &mut HitRecord<'a>,
        rng: &mut dyn RngCore,
    ) -> bool {
        let local_ray = Ray::new(ray.origin() - self.offset, ray.direction(), ray.time());

        if !self.object.hit(&local_ray, ray_t, rec, rng) {
            return false;
        }

        rec.p += self.offset;
        true
    }

    fn bounding_box(&self) -> Aabb {
        self.bbox
    }
}

/// An object rotated about the world Y axis.
pub struct RotateY {
    object: Arc<dyn Hittable>,
    sin_theta: f32,
    cos_theta: f32,
    bbox: Aabb,
}

impl RotateY {
    /// Rotate `object` counter-clockwise (looking down -Y) by `angle` degrees.
    pub fn new(object: Arc<dyn Hittable>, angle: f32) -> Self {
        let radians = angle.to_radians();
        let (sin_theta, cos_theta) = radians.sin_cos();

        let mut rotated = Self {
            object,
            sin_theta,
            cos_theta,
            bbox: Aabb::EMPTY,
        };

        // A rotated box is no longer axis-aligned: bound its 8 corners.
        let child_bbox = rotated.object.bounding_box();
        let mut min = Vec3::splat(f32::INFINITY);
        let mut max = Vec3::splat(f32::NEG_INFINITY);
        for corner in child_bbox.corners() {
            let world = rotated.to_world(corner);
            min = min.min(world);
            max = max.max(world);
        }
        rotated.bbox = Aabb::from_points(min, max);

        rotated
    }

    #[inline]
    fn to_local(&self, v: Vec3) -> Vec3 {
        Vec3::new(
            self.cos_theta * v.x - self.sin_theta * v.z,
            v.y,
            self.sin_theta * v.x + self.cos_theta * v.z,
        )
    }

    #[inline]
    fn to_world(&self, v: Vec3) -> Vec3 {
        Vec3::new(
            self.cos_theta * v.x + self.sin_theta * v.z,
            v.y,
            -self.sin_theta * v.x + self.cos_theta * v.z,
        )
    }
}

impl Hittable for RotateY {
    fn hit<'a>(
        &'a self,
        ray: &Ray,
        ray_t: Interval,
        rec: &mut HitRecord<'a>,
        rng: &mut dyn RngCore,
    ) -> bool {
        let local_ray = Ray::new(
            self.to_local(ray.origin()),
            self.to_local(ray.direction()),
            ray.time(),
        );

        if !self.object.hit(&local_ray, ray_t, rec, rng) {
            return false;
        }

        // The face orientation is invariant under rotation, so only the
        // vectors need converting.
        rec.p = self.to_world(rec.p);
        rec.normal = self.to_world(rec.normal);
        true
    }

    fn bounding_box(&self) -> Aabb {
        self.bbox
    }
}
