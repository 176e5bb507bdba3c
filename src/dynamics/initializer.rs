//! Builds the initial particle layout and settles it with a short pre-roll.

use glam::Vec3;
use log::debug;
use rand::{Rng, SeedableRng};
use rand_pcg::Pcg32;

use crate::{
    config::{
        DEFAULT_PREPROCESS_ITERATIONS, DEFAULT_STIFFNESS, DEFAULT_STIFFNESS_ITERATIONS,
        DEFAULT_TIME_STEP, MAX_PARTICLE_COUNT, MIN_PARTICLE_COUNT, UNWRAPPING_JITTER,
    },
    core::{
        particle::{Particle, ParticleChain},
        settings::{ChainLayout, RopeConfig},
    },
    error::{Result, RopeError},
    utils::{arc, logging::ScopedTimer},
};

use super::{integrator::Integrator, stiffness::StiffnessSolver};

/// Creates particle chains for a rope.
#[derive(Debug, Clone)]
pub struct ChainInitializer {
    pub layout: ChainLayout,
    /// Seed for the unwrapping jitter; `None` draws from entropy.
    pub jitter_seed: Option<u64>,
    pub preprocess_iterations: u32,
    pub preprocess_time_step: f64,
    /// Free-end chains start collapsed at the start point when true, hanging
    /// straight along `bow_direction` when false.
    pub unwrap_from_start: bool,
    pub solver: StiffnessSolver,
    /// Direction arc and zigzag layouts bow towards.
    pub bow_direction: Vec3,
}

impl Default for ChainInitializer {
    fn default() -> Self {
        Self {
            layout: ChainLayout::Straight,
            jitter_seed: None,
            preprocess_iterations: DEFAULT_PREPROCESS_ITERATIONS,
            preprocess_time_step: DEFAULT_TIME_STEP,
            unwrap_from_start: true,
            solver: StiffnessSolver::new(DEFAULT_STIFFNESS, DEFAULT_STIFFNESS_ITERATIONS),
            bow_direction: Vec3::NEG_Y,
        }
    }
}

impl ChainInitializer {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn from_config(config: &RopeConfig) -> Self {
        let sim = &config.simulation;
        let gravity = config.gravity.acceleration();
        Self {
            layout: sim.layout,
            jitter_seed: sim.jitter_seed,
            preprocess_iterations: sim.preprocess_iterations,
            preprocess_time_step: sim.preprocess_time_step,
            unwrap_from_start: sim.unwrap_from_start,
            solver: StiffnessSolver::new(sim.stiffness, sim.stiffness_iterations),
            bow_direction: gravity.try_normalize().unwrap_or(Vec3::NEG_Y),
        }
    }

    pub fn with_jitter_seed(mut self, seed: u64) -> Self {
        self.jitter_seed = Some(seed);
        self
    }

    pub fn with_layout(mut self, layout: ChainLayout) -> Self {
        self.layout = layout;
        self
    }

    pub fn with_preprocess_iterations(mut self, iterations: u32) -> Self {
        self.preprocess_iterations = iterations;
        self
    }

    pub fn with_preprocess_time_step(mut self, time_step: f64) -> Self {
        self.preprocess_time_step = time_step;
        self
    }

    pub fn with_hanging_start(mut self) -> Self {
        self.unwrap_from_start = false;
        self
    }

    /// Lays out `particle_count` particles from `start` towards `end` and runs
    /// the pre-roll.
    ///
    /// With no `end` the rope unwraps from `start`, or hangs straight along
    /// `bow_direction` at full length when `unwrap_from_start` is off. The
    /// first particle is
    /// always pinned; the last one only when an end target is given. When both
    /// ends coincide every particle gets a small random offset so the
    /// stiffness solver has directions to work with.
    pub fn initialize(
        &self,
        start: Vec3,
        end: Option<Vec3>,
        initial_acceleration: Vec3,
        particle_count: usize,
        segment_length: f32,
    ) -> ParticleChain {
        let count = particle_count.clamp(MIN_PARTICLE_COUNT, MAX_PARTICLE_COUNT);
        let is_hanging = end.is_none() && !self.unwrap_from_start;
        let end_location = match end {
            Some(end) => end,
            None if is_hanging => {
                start + self.bow_direction * segment_length * (count - 1) as f32
            }
            None => start,
        };
        let is_unwrapping = end_location == start;

        let points = if is_unwrapping {
            self.jittered_points(start, count)
        } else if is_hanging {
            arc::straight_points(start, end_location, segment_length, count - 1)
        } else {
            self.layout_points(start, end_location, segment_length, count)
        };

        let mut particles: Vec<Particle> = points
            .into_iter()
            .map(|position| Particle {
                acceleration: initial_acceleration,
                ..Particle::at(position)
            })
            .collect();

        if let Some(first) = particles.first_mut() {
            first.is_attached = true;
            first.teleport(start);
        }
        if let Some(last) = particles.last_mut() {
            last.is_attached = end.is_some();
            last.teleport(end_location);
        }

        debug!(
            "rope chain created: {} particles, segment {:.4}, layout {:?}, unwrapping {}, hanging {}",
            count, segment_length, self.layout, is_unwrapping, is_hanging
        );

        let mut chain = ParticleChain::new(particles, segment_length);
        self.preroll(&mut chain);
        chain
    }

    /// Builds a chain from explicit world positions (previous = current), with
    /// no jitter, layout or pre-roll.
    pub fn from_positions(positions: &[Vec3], segment_length: f32) -> Result<ParticleChain> {
        if positions.is_empty() {
            return Err(RopeError::EmptyPositions);
        }
        if !(MIN_PARTICLE_COUNT..=MAX_PARTICLE_COUNT).contains(&positions.len()) {
            return Err(RopeError::InvalidParticleCount {
                requested: positions.len(),
                min: MIN_PARTICLE_COUNT,
                max: MAX_PARTICLE_COUNT,
            });
        }

        let particles = positions.iter().copied().map(Particle::at).collect();
        Ok(ParticleChain::new(particles, segment_length))
    }

    /// Runs `preprocess_iterations` fixed-step ticks of integration and
    /// stiffness relaxation. No forces are recomputed and nothing collides.
    pub fn preroll(&self, chain: &mut ParticleChain) {
        if self.preprocess_iterations == 0 {
            return;
        }

        let _timer = ScopedTimer::new("initializer::preroll");
        let integrator = Integrator::new();
        let dt = self.preprocess_time_step as f32;
        let segment_length = chain.average_segment_length();

        for _ in 0..self.preprocess_iterations {
            integrator.integrate(chain.as_mut_slice(), dt);
            self.solver.relax(chain.as_mut_slice(), segment_length);
        }
    }

    fn layout_points(&self, start: Vec3, end: Vec3, segment_length: f32, count: usize) -> Vec<Vec3> {
        let segments = count - 1;
        match self.layout {
            ChainLayout::Straight => arc::straight_points(start, end, segment_length, segments),
            ChainLayout::Arc => {
                arc::arc_points(start, end, self.bow_direction, segment_length, segments)
            }
            ChainLayout::Zigzag => {
                arc::zigzag_points(start, end, self.bow_direction, segment_length, segments)
            }
        }
    }

    fn jittered_points(&self, origin: Vec3, count: usize) -> Vec<Vec3> {
        let mut rng = match self.jitter_seed {
            Some(seed) => Pcg32::seed_from_u64(seed),
            None => Pcg32::from_rng(&mut rand::rng()),
        };

        (0..count)
            .map(|_| {
                origin
                    + Vec3::new(
                        rng.random_range(-UNWRAPPING_JITTER..=UNWRAPPING_JITTER),
                        rng.random_range(-UNWRAPPING_JITTER..=UNWRAPPING_JITTER),
                        rng.random_range(-UNWRAPPING_JITTER..=UNWRAPPING_JITTER),
                    )
            })
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;

    #[test]
    fn straight_layout_without_preroll() {
        let chain = ChainInitializer::new()
            .with_preprocess_iterations(0)
            .initialize(Vec3::ZERO, Some(Vec3::new(2.0, 0.0, 0.0)), Vec3::ZERO, 5, 0.5);

        assert_eq!(chain.len(), 5);
        for (i, particle) in chain.iter().enumerate() {
            assert_relative_eq!(particle.position_current.x, 0.5 * i as f32, epsilon = 1e-6);
            assert_eq!(particle.position_current, particle.position_previous);
        }
        assert!(chain[0].is_attached);
        assert!(chain[4].is_attached);
        assert!(!chain[2].is_attached);
    }

    #[test]
    fn free_end_is_not_attached() {
        let chain = ChainInitializer::new().initialize(
            Vec3::ZERO,
            None,
            Vec3::new(0.0, -9.8, 0.0),
            6,
            0.2,
        );
        assert!(chain[0].is_attached);
        assert!(!chain[5].is_attached);
        assert_eq!(chain[0].position_current, Vec3::ZERO);
    }

    #[test]
    fn unwrapping_jitter_stays_small() {
        let chain = ChainInitializer::new()
            .with_jitter_seed(11)
            .with_preprocess_iterations(0)
            .initialize(Vec3::ONE, None, Vec3::ZERO, 8, 0.1);

        for particle in chain.iter() {
            let offset = particle.position_current - Vec3::ONE;
            assert!(offset.abs().max_element() <= UNWRAPPING_JITTER + 1e-6);
        }
        let distinct = chain
            .iter()
            .skip(1)
            .take(6)
            .any(|p| p.position_current != Vec3::ONE);
        assert!(distinct, "interior particles should be jittered");
    }

    #[test]
    fn from_positions_copies_without_changes() {
        let positions = [Vec3::ZERO, Vec3::X, Vec3::new(2.0, 1.0, 0.0)];
        let chain = ChainInitializer::from_positions(&positions, 1.0).unwrap();
        assert_eq!(chain.positions(), positions.to_vec());
        assert!(chain.iter().all(|p| !p.is_attached && p.displacement() == Vec3::ZERO));

        assert_eq!(
            ChainInitializer::from_positions(&[], 1.0),
            Err(RopeError::EmptyPositions)
        );
        assert!(matches!(
            ChainInitializer::from_positions(&positions[..2], 1.0),
            Err(RopeError::InvalidParticleCount { requested: 2, .. })
        ));
    }

    #[test]
    fn hanging_start_lays_chain_along_gravity() {
        let chain = ChainInitializer::new()
            .with_hanging_start()
            .with_layout(ChainLayout::Zigzag)
            .with_preprocess_iterations(0)
            .initialize(Vec3::new(1.0, 2.0, 0.0), None, Vec3::ZERO, 5, 0.5);

        for (i, particle) in chain.iter().enumerate() {
            assert_relative_eq!(particle.position_current.x, 1.0, epsilon = 1e-6);
            assert_relative_eq!(particle.position_current.y, 2.0 - 0.5 * i as f32, epsilon = 1e-6);
        }
        assert!(chain[0].is_attached);
        assert!(!chain[4].is_attached);
        assert_relative_eq!(chain.current_length(), 2.0, epsilon = 1e-5);
    }

    #[test]
    fn preroll_uses_configured_time_step() {
        let falling = |time_step: f64| {
            let positions = [Vec3::ZERO, Vec3::X, Vec3::new(2.0, 0.0, 0.0)];
            let mut chain = ChainInitializer::from_positions(&positions, 1.0).unwrap();
            for particle in chain.as_mut_slice() {
                particle.acceleration = Vec3::new(0.0, -10.0, 0.0);
            }
            ChainInitializer::new()
                .with_preprocess_iterations(1)
                .with_preprocess_time_step(time_step)
                .preroll(&mut chain);
            chain[0].position_current.y
        };

        assert!(falling(0.1) < falling(0.01));

        let config = RopeConfig::standard().with_preprocess_time_step(0.025);
        let initializer = ChainInitializer::from_config(&config);
        assert_relative_eq!(initializer.preprocess_time_step, 0.025);
        assert!(initializer.unwrap_from_start);
        assert!(!ChainInitializer::from_config(&config.with_hanging_start()).unwrap_from_start);
    }

    #[test]
    fn arc_layout_starts_with_sag() {
        let chain = ChainInitializer::new()
            .with_layout(ChainLayout::Arc)
            .with_preprocess_iterations(0)
            .initialize(Vec3::ZERO, Some(Vec3::new(1.0, 0.0, 0.0)), Vec3::ZERO, 9, 0.25);

        assert!(chain[4].position_current.y < -0.2);
        assert_eq!(chain[8].position_current, Vec3::new(1.0, 0.0, 0.0));
    }
}
