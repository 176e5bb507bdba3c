//! Verlet Rope – rope simulation core for Rust.
//!
//! Ropes are chains of Verlet particles kept at a fixed spacing by an
//! iterative distance solver, pushed around by gravity, wind and damping, and
//! kept out of static and moving obstacles through ray casts answered by the
//! host's physics world. Each tick produces the ordered particle positions a
//! renderer needs.

pub mod collision;
pub mod config;
pub mod core;
pub mod dynamics;
pub mod error;
pub mod rope;
pub mod utils;
pub mod world;

pub use glam::Vec3;

pub use collision::{
    queries::{BodyHandle, EmptySpace, OverlapHit, OverlapQuery, RaycastHit, RaycastQuery, SpaceQuery},
    resolver::{CollisionResolver, CollisionStats},
    scene::{CollisionScene, SceneShape},
};
pub use crate::core::{
    bounds::Aabb,
    particle::{ChainSnapshot, Particle, ParticleChain},
    settings::{ChainLayout, CollisionBehavior, CollisionType, DampingModel, RopeConfig, WindModel},
};
pub use dynamics::{
    forces::{ForceGenerator, ForceModel},
    initializer::ChainInitializer,
    integrator::Integrator,
    noise::{NoiseSource, ValueNoise},
    stiffness::StiffnessSolver,
};
pub use error::{Result, RopeError};
pub use rope::{RopeAttachments, RopeDriver, StepListener, TickOutcome, TickRecorder, VerletRope};
pub use utils::allocator::{Arena, EntityId, GenerationalId};
pub use world::{RopeWorld, WorldStepReport};

/// High-level convenience wrapper that owns a [`RopeWorld`] together with a
/// [`CollisionScene`] the ropes collide against.
#[derive(Default)]
pub struct RopeEngine {
    world: RopeWorld,
    scene: CollisionScene,
}

impl RopeEngine {
    pub fn new() -> Self {
        Self::default()
    }

    /// Adds a rope between `attachments` and returns its generated [`EntityId`].
    pub fn add_rope(&mut self, config: RopeConfig, attachments: RopeAttachments) -> Result<EntityId> {
        self.world.spawn_rope(config, attachments)
    }

    pub fn remove_rope(&mut self, id: EntityId) -> Result<VerletRope> {
        self.world.remove_rope(id)
    }

    /// Updates the end targets a rope follows from the next step on.
    pub fn set_attachments(&mut self, id: EntityId, attachments: RopeAttachments) -> Result<()> {
        self.world.set_attachments(id, attachments)
    }

    /// Moves the scene's dynamic bodies, then ticks every rope by `dt`.
    pub fn step(&mut self, dt: f64) -> WorldStepReport {
        self.scene.advance(dt as f32);
        self.world.step(dt, &self.scene)
    }

    /// Current particle positions of a rope, start first.
    pub fn positions(&self, id: EntityId) -> Result<Vec<Vec3>> {
        self.world.positions(id)
    }

    /// Enables or disables stepping ropes on the rayon thread pool.
    pub fn set_parallel_enabled(&mut self, enabled: bool) {
        self.world.set_parallel_enabled(enabled);
    }

    pub fn parallel_enabled(&self) -> bool {
        self.world.parallel_enabled()
    }

    pub fn world(&self) -> &RopeWorld {
        &self.world
    }

    pub fn world_mut(&mut self) -> &mut RopeWorld {
        &mut self.world
    }

    pub fn scene(&self) -> &CollisionScene {
        &self.scene
    }

    pub fn scene_mut(&mut self) -> &mut CollisionScene {
        &mut self.scene
    }
}
