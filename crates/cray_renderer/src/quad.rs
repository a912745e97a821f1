//! Planar parallelogram primitive and the box built from six of them.

use crate::{
    hittable::{HitRecord, Hittable, HittableList},
    Material, Ray,
};
use cray_math::{Aabb, Interval, Vec3};
use rand::RngCore;
use std::sync::Arc;

/// A parallelogram with corner `q` spanned by edge vectors `u` and `v`.
pub struct Quad {
    q: Vec3,
    u: Vec3,
    v: Vec3,
    /// `n / (n . n)` with `n = u x v`, for recovering planar coordinates
    w: Vec3,
    normal: Vec3,
    /// Plane offset: `normal . x = d` for points on the plane
    d: f32,
    material: Arc<dyn Material>,
    bbox: Aabb,
}

impl Quad {
    pub fn new(q: Vec3, u: Vec3, v: Vec3, material: Arc<dyn Material>) -> Self {
        let n = u.cross(v);
        let normal = n.normalize();

        // Box of both diagonals, padded so an axis-aligned quad has volume.
        let diagonal0 = Aabb::from_points(q, q + u + v);
        let diagonal1 = Aabb::from_points(q + u, q + v);

        Self {
            q,
            u,
            v,
            w: n / n.dot(n),
            normal,
            d: normal.dot(q),
            material,
            bbox: Aabb::surrounding(&diagonal0, &diagonal1).pad(),
        }
    }

    /// Planar coordinates `(alpha, beta)` of a point on the quad's plane,
    /// or None if it lies outside the parallelogram.
    fn planar_coordinates(&self, intersection: Vec3) -> Option<(f32, f32)> {
        let planar_hitpt = intersection - self.q;
        let alpha = self.w.dot(planar_hitpt.cross(self.v));
        let beta = self.w.dot(self.u.cross(planar_hitpt));

        let unit = Interval::new(0.0, 1.0);
        if unit.contains(alpha) && unit.contains(beta) {
            Some((alpha, beta))
        } else {
            None
        }
    }
}

impl Hittable for Quad {
    fn hit<'a>(
        &'a self,
        ray: &Ray,
        ray_t: Interval,
        rec: &mut HitRecord<'a>,
        _rng: &mut dyn RngCore,
    ) -> bool {
        let denom = self.normal.dot(ray.direction());

        // Parallel to the plane
        if denom.abs() < 1e-8 {
            return false;
        }

        let t = (self.d - self.normal.dot(ray.origin())) / denom;
        if !ray_t.contains(t) {
            return false;
        }

        let intersection = ray.at(t);
        let Some((alpha, beta)) = self.planar_coordinates(intersection) else {
            return false;
        };

        rec.t = t;
        rec.p = intersection;
        rec.u = alpha;
        rec.v = beta;
        rec.material = self.material.as_ref();
        rec.set_face_normal(ray, self.normal);

        true
    }

    fn bounding_box(&self) -> Aabb {
        self.bbox
    }
}

/// Axis-aligned box between two opposite corners, as six quads.
pub fn make_box(a: Vec3, b: Vec3, material: Arc<dyn Material>) -> HittableList {
    let mut sides = HittableList::new();

    let min = a.min(b);
    let max = a.max(b);

    let dx = Vec3::new(max.x - min.x, 0.0, 0.0);
    let dy = Vec3::new(0.0, max.y - min.y, 0.0);
    let dz = Vec3::new(0.0, 0.0, max.z - min.z);

    let faces = [
        (Vec3::new(min.x, min.y, max.z), dx, dy),   // front
        (Vec3::new(max.x, min.y, max.z), -dz, dy),  // right
        (Vec3::new(max.x, min.y, min.z), -dx, dy),  // back
        (Vec3::new(min.x, min.y, min.z), dz, dy),   // left
        (Vec3::new(min.x, max.y, max.z), dx, -dz),  // top
        (Vec3::new(min.x, min.y, min.z), dx, dz),   // bottom
    ];

    for (q, u, v) in faces {
        sides.add(Arc::new(Quad::new(q, u, v, material.clone())));
    }

    sides
}
