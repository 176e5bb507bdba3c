//! Simulation dynamics modules: forces, integration, stiffness relaxation, and chain setup.

pub mod forces;
pub mod initializer;
pub mod integrator;
pub mod noise;
pub mod stiffness;

pub use forces::{DampingForce, ForceGenerator, ForceModel, GravityForce, WindForce};
pub use initializer::ChainInitializer;
pub use integrator::Integrator;
pub use noise::{NoiseSource, ValueNoise};
pub use stiffness::StiffnessSolver;
