use std::sync::Arc;

use glam::Vec3;

use crate::core::{
    particle::Particle,
    settings::{DampingModel, RopeConfig, WindModel},
};

use super::noise::{NoiseSource, ValueNoise};

/// Trait describing a per-particle acceleration contribution.
pub trait ForceGenerator: Send + Sync {
    fn acceleration(&self, particle: &Particle, time: f64) -> Vec3;
}

/// Constant gravity, already multiplied by its scale.
pub struct GravityForce {
    pub gravity: Vec3,
}

impl GravityForce {
    pub fn new(gravity: Vec3, scale: f32) -> Self {
        Self {
            gravity: gravity * scale,
        }
    }
}

impl ForceGenerator for GravityForce {
    fn acceleration(&self, _particle: &Particle, _time: f64) -> Vec3 {
        self.gravity
    }
}

/// Noise-driven wind sampled at the particle position shifted by time.
pub struct WindForce {
    pub direction: Vec3,
    pub model: WindModel,
    pub noise: Option<Arc<dyn NoiseSource>>,
}

impl WindForce {
    fn noise_sample(&self, particle: &Particle, time: f64) -> f32 {
        match &self.noise {
            Some(noise) => {
                let timed = particle.position_current + Vec3::ONE * time as f32;
                noise.sample(timed)
            }
            None => match self.model {
                WindModel::Scaled { .. } => 1.0,
                WindModel::Clamped { max, .. } => max,
            },
        }
    }
}

impl ForceGenerator for WindForce {
    fn acceleration(&self, particle: &Particle, time: f64) -> Vec3 {
        let sample = self.noise_sample(particle, time);
        match self.model {
            WindModel::Scaled { scale } => self.direction * scale * sample,
            WindModel::Clamped { min, max } => self.direction * sample.clamp(min.min(max), max.max(min)),
        }
    }
}

/// Drag opposing the particle's movement during the previous tick.
pub struct DampingForce {
    pub factor: f32,
    pub model: DampingModel,
}

impl ForceGenerator for DampingForce {
    fn acceleration(&self, particle: &Particle, _time: f64) -> Vec3 {
        let velocity = particle.displacement();
        match self.model {
            DampingModel::Linear => -self.factor * velocity,
            DampingModel::Quadratic => -self.factor * velocity.length() * velocity,
        }
    }
}

/// Collection of force generators whose sum becomes each particle's acceleration.
#[derive(Default)]
pub struct ForceModel {
    forces: Vec<Box<dyn ForceGenerator>>,
}

impl ForceModel {
    pub fn new() -> Self {
        Self { forces: Vec::new() }
    }

    /// Builds the generators enabled by `config`. A host-provided
    /// `wind_noise` takes precedence over the configured built-in noise.
    pub fn from_config(config: &RopeConfig, wind_noise: Option<Arc<dyn NoiseSource>>) -> Self {
        let mut model = Self::new();

        if config.gravity.enabled {
            model.add_force(GravityForce::new(config.gravity.vector, config.gravity.scale));
        }

        if config.wind.enabled {
            let noise = wind_noise.or_else(|| {
                config
                    .wind
                    .noise
                    .map(|n| Arc::new(ValueNoise::new(n.seed, n.frequency)) as Arc<dyn NoiseSource>)
            });
            model.add_force(WindForce {
                direction: config.wind.direction,
                model: config.wind.model,
                noise,
            });
        }

        if config.damping.enabled {
            model.add_force(DampingForce {
                factor: config.damping.factor,
                model: config.damping.model,
            });
        }

        model
    }

    pub fn add_force<F: ForceGenerator + 'static>(&mut self, force: F) {
        self.forces.push(Box::new(force));
    }

    pub fn len(&self) -> usize {
        self.forces.len()
    }

    pub fn is_empty(&self) -> bool {
        self.forces.is_empty()
    }

    /// Overwrites every particle's acceleration, attached ones included.
    pub fn compute_accelerations(&self, particles: &mut [Particle], time: f64) {
        for particle in particles.iter_mut() {
            let total = self
                .forces
                .iter()
                .fold(Vec3::ZERO, |acc, force| acc + force.acceleration(particle, time));
            particle.acceleration = total;
        }
    }
}
