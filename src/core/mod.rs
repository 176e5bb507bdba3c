//! Core types describing rope particles, bounds, and host configuration.

pub mod bounds;
pub mod particle;
pub mod settings;

pub use bounds::Aabb;
pub use particle::{ChainSnapshot, Particle, ParticleChain};
pub use settings::{
    ChainLayout, CollisionBehavior, CollisionSettings, CollisionType, DampingModel,
    DampingSettings, GravitySettings, NoiseSettings, RopeConfig, SimulationSettings,
    WindModel, WindSettings,
};
