use crate::{Interval, Ray, Vec3};
use std::ops::Add;

/// Minimum thickness of any box axis. Thinner axes are padded so that flat
/// geometry (an axis-aligned quad, for instance) still has a usable box.
const MIN_THICKNESS: f32 = 0.0001;

/// Axis-Aligned Bounding Box for spatial acceleration structures (BVH).
///
/// An AABB is defined by three intervals (one per axis) that bound a 3D volume.
#[derive(Debug, Copy, Clone, PartialEq)]
pub struct Aabb {
    pub x: Interval,
    pub y: Interval,
    pub z: Interval,
}

impl Aabb {
    pub const EMPTY: Aabb = Aabb {
        x: Interval::EMPTY,
        y: Interval::EMPTY,
        z: Interval::EMPTY,
    };

    pub const UNIVERSE: Aabb = Aabb {
        x: Interval::UNIVERSE,
        y: Interval::UNIVERSE,
        z: Interval::UNIVERSE,
    };

    /// Create a new AABB from three intervals, padded to the minimum thickness.
    pub fn new(x: Interval, y: Interval, z: Interval) -> Self {
        Self { x, y, z }.pad()
    }

    /// Create an AABB from two opposite corners, in any order.
    pub fn from_points(a: Vec3, b: Vec3) -> Self {
        Self::new(
            Interval::new(a.x.min(b.x), a.x.max(b.x)),
            Interval::new(a.y.min(b.y), a.y.max(b.y)),
            Interval::new(a.z.min(b.z), a.z.max(b.z)),
        )
    }

    /// Create an AABB that surrounds two other AABBs.
    pub fn surrounding(box0: &Aabb, box1: &Aabb) -> Self {
        Self {
            x: Interval::surrounding(&box0.x, &box1.x),
            y: Interval::surrounding(&box0.y, &box1.y),
            z: Interval::surrounding(&box0.z, &box1.z),
        }
    }

    /// Get the interval for a specific axis (0=X, 1=Y, 2=Z).
    pub fn axis_interval(&self, n: usize) -> Interval {
        match n {
            0 => self.x,
            1 => self.y,
            _ => self.z,
        }
    }

    /// Test if a ray intersects this AABB within the given interval.
    ///
    /// Slab method. A zero direction component yields an infinite inverse;
    /// `f32::max`/`f32::min` also discard the NaN produced when the origin
    /// lies exactly on such a slab, so every case stays ordered.
    pub fn hit(&self, r: &Ray, mut ray_t: Interval) -> bool {
        let origin = r.origin.to_array();
        let direction = r.direction.to_array();

        for axis in 0..3 {
            let slab = self.axis_interval(axis);
            let adinv = 1.0 / direction[axis];

            let mut t0 = (slab.min - origin[axis]) * adinv;
            let mut t1 = (slab.max - origin[axis]) * adinv;
            if adinv < 0.0 {
                std::mem::swap(&mut t0, &mut t1);
            }

            ray_t.min = t0.max(ray_t.min);
            ray_t.max = t1.min(ray_t.max);
            if ray_t.max <= ray_t.min {
                return false;
            }
        }

        true
    }

    /// Returns a copy with every axis at least `MIN_THICKNESS` wide.
    pub fn pad(&self) -> Aabb {
        let pad_axis = |i: Interval| {
            if i.size() < MIN_THICKNESS {
                i.expand(MIN_THICKNESS)
            } else {
                i
            }
        };

        Aabb {
            x: pad_axis(self.x),
            y: pad_axis(self.y),
            z: pad_axis(self.z),
        }
    }

    /// The eight corner points, used when re-bounding a rotated box.
    pub fn corners(&self) -> [Vec3; 8] {
        let (x, y, z) = (self.x, self.y, self.z);
        [
            Vec3::new(x.min, y.min, z.min),
            Vec3::new(x.max, y.min, z.min),
            Vec3::new(x.min, y.max, z.min),
            Vec3::new(x.max, y.max, z.min),
            Vec3::new(x.min, y.min, z.max),
            Vec3::new(x.max, y.min, z.max),
            Vec3::new(x.min, y.max, z.max),
            Vec3::new(x.max, y.max, z.max),
        ]
    }
}

impl Default for Aabb {
    fn default() -> Self {
        Self::EMPTY
    }
}

impl Add<Vec3> for Aabb {
    type Output = Aabb;

    fn add(self, offset: Vec3) -> Aabb {
        Aabb {
            x: self.x.add_scalar(offset.x),
            y: self.y.add_scalar(offset.y),
            z: self.z.add_scalar(offset.z),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn unit_box() -> Aabb {
        Aabb::from_points(Vec3::splat(-1.0), Vec3::splat(1.0))
    }

    #[test]
    fn test_aabb_from_points_any_order() {
        let aabb = Aabb::from_points(Vec3::new(10.0, 0.0, 10.0), Vec3::new(0.0, 10.0, 0.0));

        assert_eq!(aabb.x, Interval::new(0.0, 10.0));
        assert_eq!(aabb.y, Interval::new(0.0, 10.0));
        assert_eq!(aabb.z, Interval::new(0.0, 10.0));
    }

    #[test]
    fn test_aabb_pads_flat_axis() {
        let flat = Aabb::from_points(Vec3::new(0.0, 0.0, 2.0), Vec3::new(1.0, 1.0, 2.0));

        assert!(flat.z.size() >= MIN_THICKNESS * 0.999);
        assert!(flat.z.contains(2.0));
        assert_eq!(flat.x, Interval::new(0.0, 1.0));
    }

    #[test]
    fn test_aabb_hit() {
        let aabb = unit_box();

        let ray = Ray::new(Vec3::new(0.0, 0.0, -5.0), Vec3::Z, 0.0);
        assert!(aabb.hit(&ray, Interval::new(0.0, 100.0)));

        let ray = Ray::new(Vec3::new(0.0, 0.0, -5.0), -Vec3::Z, 0.0);
        assert!(!aabb.hit(&ray, Interval::new(0.0, 100.0)));

        let ray = Ray::new(Vec3::new(10.0, 0.0, 0.0), Vec3::Z, 0.0);
        assert!(!aabb.hit(&ray, Interval::new(0.0, 100.0)));
    }

    #[test]
    fn test_aabb_hit_respects_interval() {
        let aabb = unit_box();
        let ray = Ray::new(Vec3::new(0.0, 0.0, -5.0), Vec3::Z, 0.0);

        // Box spans t in [4, 6].
        assert!(!aabb.hit(&ray, Interval::new(0.0, 3.9)));
        assert!(!aabb.hit(&ray, Interval::new(6.1, 10.0)));
        assert!(aabb.hit(&ray, Interval::new(5.0, 5.5)));
    }

    #[test]
    fn test_aabb_empty_interval_never_hits() {
        let aabb = unit_box();
        let ray = Ray::new(Vec3::new(0.0, 0.0, -5.0), Vec3::Z, 0.0);

        assert!(!aabb.hit(&ray, Interval::EMPTY));
        assert!(!aabb.hit(&ray, Interval::new(5.0, 5.0)));
    }

    #[test]
    fn test_aabb_hit_axis_aligned_ray_with_zero_components() {
        let aabb = unit_box();

        let inside = Ray::new(Vec3::new(0.5, 0.5, -5.0), Vec3::Z, 0.0);
        assert!(aabb.hit(&inside, Interval::UNIVERSE));

        let outside = Ray::new(Vec3::new(1.5, 0.5, -5.0), Vec3::Z, 0.0);
        assert!(!aabb.hit(&outside, Interval::UNIVERSE));

        // Origin exactly on a slab boundary with a zero direction component.
        let grazing = Ray::new(Vec3::new(1.0, 0.0, -5.0), Vec3::Z, 0.0);
        assert!(aabb.hit(&grazing, Interval::new(0.0, 100.0)));
    }

    #[test]
    fn test_aabb_empty_box_never_hits() {
        let ray = Ray::new(Vec3::ZERO, Vec3::new(1.0, 0.5, 0.25), 0.0);
        assert!(!Aabb::EMPTY.hit(&ray, Interval::UNIVERSE));
    }

    #[test]
    fn test_aabb_surrounding_algebra() {
        let a = Aabb::from_points(Vec3::ZERO, Vec3::new(5.0, 5.0, 5.0));
        let b = Aabb::from_points(Vec3::new(3.0, -3.0, 3.0), Vec3::new(10.0, 10.0, 10.0));
        let c = Aabb::from_points(Vec3::new(-2.0, 1.0, 7.0), Vec3::new(1.0, 2.0, 12.0));

        assert_eq!(Aabb::surrounding(&a, &b), Aabb::surrounding(&b, &a));
        assert_eq!(
            Aabb::surrounding(&Aabb::surrounding(&a, &b), &c),
            Aabb::surrounding(&a, &Aabb::surrounding(&b, &c))
        );
        assert_eq!(Aabb::surrounding(&a, &a), a);
        assert_eq!(Aabb::surrounding(&a, &Aabb::EMPTY), a);
    }

    #[test]
    fn test_aabb_translate() {
        let translated = Aabb::from_points(Vec3::ZERO, Vec3::ONE) + Vec3::new(5.0, 0.0, 0.0);

        assert_eq!(translated.x, Interval::new(5.0, 6.0));
        assert_eq!(translated.y, Interval::new(0.0, 1.0));
    }
}
