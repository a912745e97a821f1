//! Gradient (Perlin) noise.

use crate::sampling::random_vec3;
use cray_math::Vec3;
use rand::{Rng, RngCore};

const POINT_COUNT: usize = 256;

/// Lattice gradient noise with three independent permutation tables.
pub struct Perlin {
    gradients: [Vec3; POINT_COUNT],
    perm_x: [usize; POINT_COUNT],
    perm_y: [usize; POINT_COUNT],
    perm_z: [usize; POINT_COUNT],
}

impl Perlin {
    pub fn new(rng: &mut dyn RngCore) -> Self {
        let mut gradients = [Vec3::ZERO; POINT_COUNT];
        for g in gradients.iter_mut() {
            *g = random_vec3(rng, -1.0, 1.0).normalize_or(Vec3::X);
        }

        Self {
            gradients,
            perm_x: generate_perm(rng),
            perm_y: generate_perm(rng),
            perm_z: generate_perm(rng),
        }
    }

    /// Smoothed noise in roughly [-1, 1].
    pub fn noise(&self, p: Vec3) -> f32 {
        let f = p - p.floor();
        let i = p.x.floor() as i32;
        let j = p.y.floor() as i32;
        let k = p.z.floor() as i32;
        // Casts saturate far from the origin; lattice indices wrap mod 256.

        let mut c = [[[Vec3::ZERO; 2]; 2]; 2];
        for (di, plane) in c.iter_mut().enumerate() {
            for (dj, row) in plane.iter_mut().enumerate() {
                for (dk, cell) in row.iter_mut().enumerate() {
                    let idx = self.perm_x[(i.wrapping_add(di as i32) & 255) as usize]
                        ^ self.perm_y[(j.wrapping_add(dj as i32) & 255) as usize]
                        ^ self.perm_z[(k.wrapping_add(dk as i32) & 255) as usize];
                    *cell = self.gradients[idx];
                }
            }
        }

        trilinear_interp(&c, f)
    }

    /// Sum of `depth` octaves, each at double frequency and half weight.
    pub fn turb(&self, p: Vec3, depth: u32) -> f32 {
        let mut accum = 0.0;
        let mut temp_p = p;
        let mut weight = 1.0;

        for _ in 0..depth {
            accum += weight * self.noise(temp_p);
            weight *= 0.5;
            temp_p *= 2.0;
        }

        accum.abs()
    }
}

fn generate_perm(rng: &mut dyn RngCore) -> [usize; POINT_COUNT] {
    let mut p = [0usize; POINT_COUNT];
    for (i, slot) in p.iter_mut().enumerate() {
        *slot = i;
    }
    // Fisher-Yates
    for i in (1..POINT_COUNT).rev() {
        let target = rng.gen_range(0..=i);
        p.swap(i, target);
    }
    p
}

fn trilinear_interp(c: &[[[Vec3; 2]; 2]; 2], f: Vec3) -> f32 {
    // Hermite smoothing of the local coordinates.
    let s = f * f * (3.0 - 2.0 * f);

    let mut accum = 0.0;
    for (i, plane) in c.iter().enumerate() {
        for (j, row) in plane.iter().enumerate() {
            for (k, gradient) in row.iter().enumerate() {
                let (fi, fj, fk) = (i as f32, j as f32, k as f32);
                let weight = Vec3::new(f.x - fi, f.y - fj, f.z - fk);
                accum += (fi * s.x + (1.0 - fi) * (1.0 - s.x))
                    * (fj * s.y + (1.0 - fj) * (1.0 - s.y))
                    * (fk * s.z + (1.0 - fk) * (1.0 - s.z))
                    * gradient.dot(weight);
            }
        }
    }
    accum
}
