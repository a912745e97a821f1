// Vector helpers for scattering.
//
// Extends glam::Vec3 with the reflection/refraction operations the
// materials need.

use glam::Vec3;

/// Extension trait for Vec3 used by the shading code.
pub trait Vec3Ext {
    /// True if every component is close enough to zero to make the vector
    /// useless as a ray direction.
    fn near_zero(&self) -> bool;

    /// Mirror reflection about the normal `n`.
    fn reflect(&self, n: Vec3) -> Vec3;

    /// Snell refraction of a unit vector through a surface with unit normal
    /// `n` facing the incoming side.
    fn refract(&self, n: Vec3, etai_over_etat: f32) -> Vec3;
}

impl Vec3Ext for Vec3 {
    fn near_zero(&self) -> bool {
        const S: f32 = 1e-8;
        self.x.abs() < S && self.y.abs() < S && self.z.abs() < S
    }

    fn reflect(&self, n: Vec3) -> Vec3 {
        *self - 2.0 * self.dot(n) * n
    }

    fn refract(&self, n: Vec3, etai_over_etat: f32) -> Vec3 {
        let cos_theta = (-*self).dot(n).min(1.0);
        let r_out_perp = etai_over_etat * (*self + cos_theta * n);
        let r_out_parallel = -(1.0 - r_out_perp.length_squared()).abs().sqrt() * n;
        r_out_perp + r_out_parallel
    }
}
