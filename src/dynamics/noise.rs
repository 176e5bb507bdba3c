//! Coherent noise sources sampled by the wind force.

use glam::Vec3;
use rand::{seq::SliceRandom, Rng, SeedableRng};
use rand_pcg::Pcg32;

/// Deterministic 3D noise returning values roughly in `[-1, 1]`.
pub trait NoiseSource: Send + Sync {
    fn sample(&self, position: Vec3) -> f32;
}

impl<F> NoiseSource for F
where
    F: Fn(Vec3) -> f32 + Send + Sync,
{
    fn sample(&self, position: Vec3) -> f32 {
        self(position)
    }
}

const TABLE_SIZE: usize = 256;

/// Seeded lattice value noise with smoothstep-faded trilinear interpolation.
#[derive(Debug, Clone)]
pub struct ValueNoise {
    permutation: [u8; TABLE_SIZE],
    values: [f32; TABLE_SIZE],
    frequency: f32,
}

impl ValueNoise {
    pub fn new(seed: u64, frequency: f32) -> Self {
        let mut rng = Pcg32::seed_from_u64(seed);

        let mut order: Vec<u8> = (0..TABLE_SIZE).map(|i| i as u8).collect();
        order.shuffle(&mut rng);
        let mut permutation = [0u8; TABLE_SIZE];
        permutation.copy_from_slice(&order);

        let mut values = [0.0f32; TABLE_SIZE];
        for value in values.iter_mut() {
            *value = rng.random_range(-1.0..=1.0);
        }

        Self {
            permutation,
            values,
            frequency,
        }
    }

    pub fn frequency(&self) -> f32 {
        self.frequency
    }

    fn lattice(&self, x: i32, y: i32, z: i32) -> f32 {
        let p = &self.permutation;
        let a = p[(x & 255) as usize] as i32;
        let b = p[((a + y) & 255) as usize] as i32;
        let c = p[((b + z) & 255) as usize] as usize;
        self.values[c]
    }
}

fn fade(t: f32) -> f32 {
    t * t * (3.0 - 2.0 * t)
}

fn lerp(a: f32, b: f32, t: f32) -> f32 {
    a + (b - a) * t
}

impl NoiseSource for ValueNoise {
    fn sample(&self, position: Vec3) -> f32 {
        let p = position * self.frequency;
        let cell = p.floor();
        let (x, y, z) = (cell.x as i32, cell.y as i32, cell.z as i32);
        let f = p - cell;
        let (u, v, w) = (fade(f.x), fade(f.y), fade(f.z));

        let x00 = lerp(self.lattice(x, y, z), self.lattice(x + 1, y, z), u);
        let x10 = lerp(self.lattice(x, y + 1, z), self.lattice(x + 1, y + 1, z), u);
        let x01 = lerp(self.lattice(x, y, z + 1), self.lattice(x + 1, y, z + 1), u);
        let x11 = lerp(
            self.lattice(x, y + 1, z + 1),
            self.lattice(x + 1, y + 1, z + 1),
            u,
        );

        lerp(lerp(x00, x10, v), lerp(x01, x11, v), w)
    }
}
