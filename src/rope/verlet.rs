use std::sync::Arc;

use glam::Vec3;
use log::{debug, warn};

use crate::{
    collision::{
        queries::{BodyHandle, SpaceQuery},
        resolver::{CollisionResolver, CollisionStats},
    },
    config::{MAX_PARTICLE_COUNT, MIN_PARTICLE_COUNT},
    core::{
        particle::{ChainSnapshot, ParticleChain},
        settings::RopeConfig,
    },
    dynamics::{
        forces::ForceModel, initializer::ChainInitializer, integrator::Integrator,
        noise::NoiseSource, stiffness::StiffnessSolver,
    },
    error::{Result, RopeError},
    utils::logging::ScopedTimer,
};

use super::{
    driver::{RopeAttachments, RopeDriver, TickOutcome},
    listener::StepListener,
};

/// One simulated rope.
///
/// Each tick pins the ends, then runs forces, integration, stiffness and
/// collision in that order over the time accumulated since the last
/// simulated tick.
pub struct VerletRope {
    config: RopeConfig,
    origin: Vec3,
    attachments: RopeAttachments,
    chain: Option<ParticleChain>,
    forces: ForceModel,
    integrator: Integrator,
    solver: StiffnessSolver,
    collision: CollisionResolver,
    driver: RopeDriver,
    wind_noise: Option<Arc<dyn NoiseSource>>,
    listeners: Vec<Box<dyn StepListener>>,
    time: f64,
    simulation_delta: f64,
    was_created: bool,
}

impl VerletRope {
    /// Validates `config` and prepares a rope with no chain yet. The chain
    /// is built by [`VerletRope::create`] or lazily on the first tick.
    pub fn new(config: RopeConfig) -> Result<Self> {
        config.validate()?;

        Ok(Self {
            forces: ForceModel::from_config(&config, None),
            integrator: Integrator::new(),
            solver: StiffnessSolver::new(
                config.simulation.stiffness,
                config.simulation.stiffness_iterations,
            ),
            collision: CollisionResolver::new(config.collision.clone()),
            config,
            origin: Vec3::ZERO,
            attachments: RopeAttachments::default(),
            chain: None,
            driver: RopeDriver::FreeSimulated,
            wind_noise: None,
            listeners: Vec::new(),
            time: 0.0,
            simulation_delta: 0.0,
            was_created: false,
        })
    }

    pub fn with_origin(mut self, origin: Vec3) -> Self {
        self.origin = origin;
        self
    }

    pub fn config(&self) -> &RopeConfig {
        &self.config
    }

    /// Applies a new configuration. Force, stiffness and collision values
    /// take effect on the next tick; the chain is only rebuilt when the
    /// particle count, rope length or layout changed.
    pub fn set_config(&mut self, config: RopeConfig) -> Result<()> {
        config.validate()?;

        let rebuild = self.config.topology_differs(&config);
        self.config = config;
        self.forces = ForceModel::from_config(&self.config, self.wind_noise.clone());
        self.solver = StiffnessSolver::new(
            self.config.simulation.stiffness,
            self.config.simulation.stiffness_iterations,
        );
        self.collision.set_settings(self.config.collision.clone());

        if rebuild && self.chain.is_some() {
            debug!("rope topology changed, rebuilding chain");
            self.create(self.attachments);
        }
        Ok(())
    }

    /// Position the start falls back to when no start attachment is given.
    pub fn origin(&self) -> Vec3 {
        self.origin
    }

    pub fn set_origin(&mut self, origin: Vec3) {
        self.origin = origin;
    }

    pub fn attachments(&self) -> RopeAttachments {
        self.attachments
    }

    /// Targets used by [`VerletRope::tick`] from now on.
    pub fn set_attachment_targets(&mut self, attachments: RopeAttachments) {
        self.attachments = attachments;
    }

    pub fn driver(&self) -> &RopeDriver {
        &self.driver
    }

    /// Switches between free simulation and rigid-body driven positions.
    /// The chain is rebuilt when the driver kind or the segment count changes.
    pub fn set_driver(&mut self, driver: RopeDriver) -> Result<()> {
        if let RopeDriver::RigidBodyDriven(positions) = &driver {
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
        }

        let rebuild = match (&self.driver, &driver) {
            (RopeDriver::FreeSimulated, RopeDriver::FreeSimulated) => false,
            (RopeDriver::RigidBodyDriven(old), RopeDriver::RigidBodyDriven(new)) => {
                old.len() != new.len()
            }
            _ => true,
        };

        self.driver = driver;
        if rebuild && self.chain.is_some() {
            self.create(self.attachments);
        }
        Ok(())
    }

    /// Installs a host noise source for wind, replacing the built-in one.
    pub fn set_wind_noise(&mut self, noise: Option<Arc<dyn NoiseSource>>) {
        self.wind_noise = noise;
        self.forces = ForceModel::from_config(&self.config, self.wind_noise.clone());
    }

    pub fn collision(&self) -> &CollisionResolver {
        &self.collision
    }

    pub fn set_collision_exceptions<I: IntoIterator<Item = BodyHandle>>(&mut self, bodies: I) {
        self.collision.set_exceptions(bodies);
    }

    pub fn add_collision_exception(&mut self, body: BodyHandle) {
        self.collision.add_exception(body);
    }

    pub fn add_listener<L: StepListener + 'static>(&mut self, listener: L) {
        self.listeners.push(Box::new(listener));
    }

    /// Builds a fresh chain between the given targets, replacing any
    /// existing one, and runs the pre-roll.
    pub fn create(&mut self, attachments: RopeAttachments) {
        self.attachments = attachments;

        let segment_length = self.config.average_segment_length();
        let initializer = ChainInitializer::from_config(&self.config);
        let start = attachments.start.unwrap_or(self.origin);
        let generate = |initializer: &ChainInitializer| {
            initializer.initialize(
                start,
                attachments.end,
                self.config.gravity.acceleration(),
                self.config.simulation.particle_count,
                segment_length,
            )
        };

        let chain = match &self.driver {
            RopeDriver::FreeSimulated => generate(&initializer),
            RopeDriver::RigidBodyDriven(positions) => {
                match ChainInitializer::from_positions(positions, segment_length) {
                    Ok(chain) => chain,
                    Err(err) => {
                        warn!("rigid-body positions rejected ({err}), generating layout instead");
                        generate(&initializer)
                    }
                }
            }
        };

        debug!(
            "rope created with {} particles, length {:.3}",
            chain.len(),
            self.config.simulation.rope_length
        );

        self.chain = Some(chain);
        self.collision.reset();
        self.was_created = true;
    }

    /// Discards the chain. The next tick rebuilds it.
    pub fn destroy(&mut self) {
        self.chain = None;
        self.collision.reset();
    }

    pub fn ensure_created(&mut self) {
        if self.chain.is_none() {
            self.create(self.attachments);
        }
    }

    pub fn is_created(&self) -> bool {
        self.chain.is_some()
    }

    pub fn chain(&self) -> Option<&ParticleChain> {
        self.chain.as_ref()
    }

    /// Current particle positions in rope order; empty when destroyed.
    pub fn positions(&self) -> Vec<Vec3> {
        self.chain
            .as_ref()
            .map(ParticleChain::positions)
            .unwrap_or_default()
    }

    pub fn write_positions(&self, out: &mut Vec<Vec3>) {
        match &self.chain {
            Some(chain) => chain.write_positions(out),
            None => out.clear(),
        }
    }

    pub fn current_length(&self) -> f32 {
        self.chain
            .as_ref()
            .map(ParticleChain::current_length)
            .unwrap_or(0.0)
    }

    /// Seconds of host time seen by this rope.
    pub fn time(&self) -> f64 {
        self.time
    }

    pub fn snapshot(&self) -> Option<ChainSnapshot> {
        self.chain.as_ref().map(ParticleChain::snapshot)
    }

    /// Replaces the chain with `snapshot` and drops dynamic tracking state
    /// gathered for the previous chain.
    pub fn restore(&mut self, snapshot: ChainSnapshot) -> Result<()> {
        if !(MIN_PARTICLE_COUNT..=MAX_PARTICLE_COUNT).contains(&snapshot.len()) {
            return Err(RopeError::InvalidParticleCount {
                requested: snapshot.len(),
                min: MIN_PARTICLE_COUNT,
                max: MAX_PARTICLE_COUNT,
            });
        }
        self.chain = Some(snapshot);
        self.collision.reset();
        Ok(())
    }

    /// Stores `attachments` and advances the rope by `dt` seconds.
    pub fn step<S: SpaceQuery + ?Sized>(
        &mut self,
        dt: f64,
        attachments: RopeAttachments,
        space: &S,
    ) -> TickOutcome {
        self.attachments = attachments;
        self.tick(dt, space)
    }

    /// Advances the rope by `dt` seconds using the stored attachment targets.
    pub fn tick<S: SpaceQuery + ?Sized>(&mut self, dt: f64, space: &S) -> TickOutcome {
        self.ensure_created();

        self.time += dt;
        self.simulation_delta += dt;

        let rate = self.config.simulation.simulation_rate;
        if rate != 0 && self.simulation_delta < 1.0 / rate as f64 {
            return TickOutcome::Skipped;
        }

        let Some(chain) = self.chain.as_mut() else {
            return TickOutcome::Skipped;
        };

        if let RopeDriver::RigidBodyDriven(positions) = &self.driver {
            for (particle, &position) in chain.as_mut_slice().iter_mut().zip(positions) {
                particle.position_previous = particle.position_current;
                particle.position_current = position;
            }
        }

        let start = match (&self.driver, self.attachments.start) {
            (_, Some(start)) => Some(start),
            (RopeDriver::FreeSimulated, None) => Some(self.origin),
            (RopeDriver::RigidBodyDriven(_), None) => None,
        };
        if let (Some(start), Some(first)) = (start, chain.first_mut()) {
            first.position_current = start;
        }
        if let (Some(end), Some(last)) = (self.attachments.end, chain.last_mut()) {
            if last.is_attached {
                last.position_current = end;
            }
        }

        let delta = self.simulation_delta;
        let should_simulate =
            self.driver.is_simulated() && (self.config.simulation.simulate || self.was_created);
        self.was_created = false;

        let mut stats = CollisionStats::default();
        if should_simulate {
            let _timer = ScopedTimer::new("rope::simulate");
            let dt = delta as f32;
            let segment_length = chain.average_segment_length();

            self.forces.compute_accelerations(chain.as_mut_slice(), self.time);
            self.integrator.integrate(chain.as_mut_slice(), dt);
            self.solver.relax(chain.as_mut_slice(), segment_length);
            stats = self.collision.resolve(chain, space, dt);
        }

        for listener in self.listeners.iter_mut() {
            listener.on_step(delta);
        }
        self.simulation_delta = 0.0;

        TickOutcome::Simulated { delta, stats }
    }
}
