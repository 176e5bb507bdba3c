//! Distance-constraint relaxation keeping adjacent particles one segment apart.

use crate::{core::particle::Particle, utils::math::length_and_direction};

/// Gauss–Seidel distance solver. Corrections applied to pair `(i, i+1)` are
/// visible to pair `(i+1, i+2)` within the same pass.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct StiffnessSolver {
    pub stiffness: f32,
    pub iterations: u32,
}

impl StiffnessSolver {
    pub fn new(stiffness: f32, iterations: u32) -> Self {
        Self {
            stiffness,
            iterations,
        }
    }

    /// Runs all passes and returns the largest absolute stretch measured in
    /// the last pass. Coincident neighbours carry no direction and are left
    /// alone.
    pub fn relax(&self, particles: &mut [Particle], segment_length: f32) -> f32 {
        let mut max_stretch = 0.0f32;

        for _ in 0..self.iterations {
            max_stretch = 0.0;
            for i in 0..particles.len().saturating_sub(1) {
                let (head, tail) = particles.split_at_mut(i + 1);
                let a = &mut head[i];
                let b = &mut tail[0];

                let segment = b.position_current - a.position_current;
                let Some((length, direction)) = length_and_direction(segment) else {
                    continue;
                };
                let stretch = length - segment_length;
                max_stretch = max_stretch.max(stretch.abs());

                let correction = direction * stretch * self.stiffness;
                match (a.is_attached, b.is_attached) {
                    (true, true) => {}
                    (true, false) => b.position_current -= correction,
                    (false, true) => a.position_current += correction,
                    (false, false) => {
                        a.position_current += correction * 0.5;
                        b.position_current -= correction * 0.5;
                    }
                }
            }
        }

        max_stretch
    }
}
