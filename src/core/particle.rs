use std::ops::{Index, IndexMut};

use glam::Vec3;
use serde::{Deserialize, Serialize};

use super::bounds::Aabb;

/// Verlet particle state. Velocity is implicit in the position delta.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Particle {
    pub position_previous: Vec3,
    pub position_current: Vec3,
    pub acceleration: Vec3,
    /// Pinned particles are skipped by integration and never moved by
    /// constraints or collision, but still pull on their neighbours.
    pub is_attached: bool,
}

impl Default for Particle {
    fn default() -> Self {
        Self::at(Vec3::ZERO)
    }
}

impl Particle {
    /// A particle at rest at `position`.
    pub fn at(position: Vec3) -> Self {
        Self {
            position_previous: position,
            position_current: position,
            acceleration: Vec3::ZERO,
            is_attached: false,
        }
    }

    /// Movement during the last tick.
    pub fn displacement(&self) -> Vec3 {
        self.position_current - self.position_previous
    }

    /// Velocity estimate for a tick of length `dt`.
    pub fn velocity(&self, dt: f32) -> Vec3 {
        if dt <= f32::EPSILON {
            return Vec3::ZERO;
        }
        self.displacement() / dt
    }

    /// Places the particle at `position` with no implicit velocity.
    pub fn teleport(&mut self, position: Vec3) {
        self.position_previous = position;
        self.position_current = position;
    }
}

/// Ordered particle chain; index 0 is the rope start.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ParticleChain {
    particles: Vec<Particle>,
    average_segment_length: f32,
}

/// Serializable copy of a chain that a host may persist and restore.
pub type ChainSnapshot = ParticleChain;

impl ParticleChain {
    pub fn new(particles: Vec<Particle>, average_segment_length: f32) -> Self {
        Self {
            particles,
            average_segment_length,
        }
    }

    /// Nominal distance between adjacent particles.
    pub fn average_segment_length(&self) -> f32 {
        self.average_segment_length
    }

    pub fn len(&self) -> usize {
        self.particles.len()
    }

    pub fn is_empty(&self) -> bool {
        self.particles.is_empty()
    }

    pub fn as_slice(&self) -> &[Particle] {
        &self.particles
    }

    pub fn as_mut_slice(&mut self) -> &mut [Particle] {
        &mut self.particles
    }

    pub fn iter(&self) -> std::slice::Iter<'_, Particle> {
        self.particles.iter()
    }

    pub fn first(&self) -> Option<&Particle> {
        self.particles.first()
    }

    pub fn last(&self) -> Option<&Particle> {
        self.particles.last()
    }

    pub fn first_mut(&mut self) -> Option<&mut Particle> {
        self.particles.first_mut()
    }

    pub fn last_mut(&mut self) -> Option<&mut Particle> {
        self.particles.last_mut()
    }

    /// Current positions in rope order, for renderers.
    pub fn positions(&self) -> Vec<Vec3> {
        self.particles.iter().map(|p| p.position_current).collect()
    }

    /// Writes current positions into a reusable buffer.
    pub fn write_positions(&self, out: &mut Vec<Vec3>) {
        out.clear();
        out.extend(self.particles.iter().map(|p| p.position_current));
    }

    /// Sum of the actual segment lengths.
    pub fn current_length(&self) -> f32 {
        self.particles
            .windows(2)
            .map(|pair| pair[0].position_current.distance(pair[1].position_current))
            .sum()
    }

    /// Actual length minus nominal length of the segment ending at `index`.
    /// Zero for the first particle.
    pub fn segment_stretch(&self, index: usize) -> f32 {
        if index == 0 || index >= self.particles.len() {
            return 0.0;
        }
        self.particles[index - 1]
            .position_current
            .distance(self.particles[index].position_current)
            - self.average_segment_length
    }

    /// Largest `actual / nominal` segment ratio along the chain.
    pub fn max_stretch_ratio(&self) -> f32 {
        if self.average_segment_length <= f32::EPSILON {
            return 0.0;
        }
        self.particles
            .windows(2)
            .map(|pair| {
                pair[0].position_current.distance(pair[1].position_current)
                    / self.average_segment_length
            })
            .fold(0.0, f32::max)
    }

    /// Bounds of the current positions.
    pub fn bounds(&self) -> Aabb {
        Aabb::from_points(self.particles.iter().map(|p| p.position_current))
    }

    /// Largest per-tick displacement of any particle.
    pub fn max_displacement(&self) -> f32 {
        self.particles
            .iter()
            .map(|p| p.displacement().length())
            .fold(0.0, f32::max)
    }

    pub fn snapshot(&self) -> ChainSnapshot {
        self.clone()
    }

    pub fn restore(&mut self, snapshot: ChainSnapshot) {
        *self = snapshot;
    }
}

impl Index<usize> for ParticleChain {
    type Output = Particle;

    fn index(&self, index: usize) -> &Self::Output {
        &self.particles[index]
    }
}

impl IndexMut<usize> for ParticleChain {
    fn index_mut(&mut self, index: usize) -> &mut Self::Output {
        &mut self.particles[index]
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;

    fn line(count: usize, spacing: f32) -> ParticleChain {
        let particles = (0..count)
            .map(|i| Particle::at(Vec3::new(i as f32 * spacing, 0.0, 0.0)))
            .collect();
        ParticleChain::new(particles, 1.0)
    }

    #[test]
    fn stretch_measurements() {
        let chain = line(4, 1.5);
        assert_relative_eq!(chain.current_length(), 4.5);
        assert_relative_eq!(chain.segment_stretch(0), 0.0);
        assert_relative_eq!(chain.segment_stretch(2), 0.5);
        assert_relative_eq!(chain.max_stretch_ratio(), 1.5);
    }

    #[test]
    fn snapshot_restores_state() {
        let mut chain = line(3, 1.0);
        let snapshot = chain.snapshot();
        chain[1].position_current.y = 4.0;
        assert_relative_eq!(chain.max_displacement(), 4.0);

        chain.restore(snapshot);
        assert_eq!(chain[1].position_current, Vec3::X);
        assert_eq!(chain.bounds().max, Vec3::new(2.0, 0.0, 0.0));
    }
}
