//! Host-supplied rope configuration.
//!
//! Every group mirrors one concern of the pipeline. Values are read each tick;
//! only the topology fields of [`SimulationSettings`] force the chain to be
//! rebuilt when they change.

use glam::Vec3;
use log::warn;
use serde::{Deserialize, Serialize};

use crate::{
    config::{
        DEFAULT_DAMPING_FACTOR, DEFAULT_DYNAMIC_TRACKING_MARGIN, DEFAULT_GRAVITY,
        DEFAULT_IGNORE_COLLISION_STRETCH, DEFAULT_MAX_DYNAMIC_COLLISIONS, DEFAULT_PARTICLE_COUNT,
        DEFAULT_PREPROCESS_ITERATIONS, DEFAULT_ROPE_LENGTH, DEFAULT_SLIDE_COLLISION_STRETCH,
        DEFAULT_STIFFNESS, DEFAULT_STIFFNESS_ITERATIONS, DEFAULT_TIME_STEP, DEFAULT_WIND,
        DEFAULT_WIND_FORCE_RANGE, DEFAULT_WIND_SCALE, MAX_PARTICLE_COUNT, MIN_PARTICLE_COUNT, STIFFNESS_RANGE,
    },
    error::{Result, RopeError},
};

/// Which obstacle categories the rope collides with.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
pub enum CollisionType {
    None,
    #[default]
    StaticOnly,
    DynamicOnly,
    All,
}

impl CollisionType {
    pub fn includes_static(self) -> bool {
        matches!(self, Self::StaticOnly | Self::All)
    }

    pub fn includes_dynamic(self) -> bool {
        matches!(self, Self::DynamicOnly | Self::All)
    }
}

/// How the rope reacts to a hit.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
pub enum CollisionBehavior {
    /// Collision is disabled entirely.
    #[default]
    None,
    /// Particles are pushed out of obstacles and slide along them while the
    /// segment is stretched.
    SlideStretch,
}

/// Drag formula used by the damping force.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
pub enum DampingModel {
    /// `-k * v`
    #[default]
    Linear,
    /// `-k * |v| * v`
    Quadratic,
}

/// How a noise sample turns into wind acceleration.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub enum WindModel {
    /// `direction * scale * sample`
    Scaled { scale: f32 },
    /// `direction * clamp(sample, min, max)`
    Clamped { min: f32, max: f32 },
}

impl Default for WindModel {
    fn default() -> Self {
        Self::Clamped {
            min: DEFAULT_WIND_FORCE_RANGE.0,
            max: DEFAULT_WIND_FORCE_RANGE.1,
        }
    }
}

impl WindModel {
    pub fn scaled() -> Self {
        Self::Scaled {
            scale: DEFAULT_WIND_SCALE,
        }
    }
}

/// Initial particle placement between the two rope ends.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
pub enum ChainLayout {
    /// Evenly spaced along the start→end direction.
    #[default]
    Straight,
    /// On a circular arc of the rope length through both ends, bowed along gravity.
    Arc,
    /// Alternating segments that take up the slack, bowed along gravity.
    Zigzag,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct SimulationSettings {
    pub rope_length: f32,
    pub particle_count: usize,
    /// Maximum simulation ticks per second; `0` simulates on every host tick.
    pub simulation_rate: u32,
    pub stiffness: f32,
    pub stiffness_iterations: u32,
    pub preprocess_iterations: u32,
    /// Fixed step, in seconds, of each pre-roll iteration.
    pub preprocess_time_step: f64,
    /// With no end target the chain starts collapsed at the start point and
    /// unwraps. When false it starts hanging straight along gravity at full
    /// length instead.
    pub unwrap_from_start: bool,
    /// When false the chain is only pinned and re-emitted, never simulated.
    pub simulate: bool,
    pub layout: ChainLayout,
    /// Seed for the unwrapping jitter; `None` draws from entropy.
    pub jitter_seed: Option<u64>,
}

impl Default for SimulationSettings {
    fn default() -> Self {
        Self {
            rope_length: DEFAULT_ROPE_LENGTH,
            particle_count: DEFAULT_PARTICLE_COUNT,
            simulation_rate: 0,
            stiffness: DEFAULT_STIFFNESS,
            stiffness_iterations: DEFAULT_STIFFNESS_ITERATIONS,
            preprocess_iterations: DEFAULT_PREPROCESS_ITERATIONS,
            preprocess_time_step: DEFAULT_TIME_STEP,
            unwrap_from_start: true,
            simulate: true,
            layout: ChainLayout::default(),
            jitter_seed: None,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct GravitySettings {
    pub enabled: bool,
    pub vector: Vec3,
    pub scale: f32,
}

impl Default for GravitySettings {
    fn default() -> Self {
        Self {
            enabled: true,
            vector: Vec3::from_array(DEFAULT_GRAVITY),
            scale: 1.0,
        }
    }
}

impl GravitySettings {
    /// Effective gravity acceleration, zero when disabled.
    pub fn acceleration(&self) -> Vec3 {
        if self.enabled {
            self.vector * self.scale
        } else {
            Vec3::ZERO
        }
    }
}

/// Parameters of the built-in value noise used for wind.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct NoiseSettings {
    pub seed: u64,
    pub frequency: f32,
}

impl Default for NoiseSettings {
    fn default() -> Self {
        Self {
            seed: 0,
            frequency: 0.5,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct WindSettings {
    pub enabled: bool,
    pub direction: Vec3,
    pub model: WindModel,
    /// Built-in noise; `None` uses a constant sample unless the host installs
    /// its own source.
    pub noise: Option<NoiseSettings>,
}

impl Default for WindSettings {
    fn default() -> Self {
        Self {
            enabled: false,
            direction: Vec3::from_array(DEFAULT_WIND),
            model: WindModel::default(),
            noise: Some(NoiseSettings::default()),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct DampingSettings {
    pub enabled: bool,
    pub factor: f32,
    pub model: DampingModel,
}

impl Default for DampingSettings {
    fn default() -> Self {
        Self {
            enabled: true,
            factor: DEFAULT_DAMPING_FACTOR,
            model: DampingModel::default(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct CollisionSettings {
    pub collision_type: CollisionType,
    pub behavior: CollisionBehavior,
    /// Stretch factor (in segment lengths) above which hits slide.
    pub slide_stretch: f32,
    /// Stretch factor (in segment lengths) above which collision is skipped.
    pub ignore_stretch: f32,
    pub max_dynamic_collisions: usize,
    pub dynamic_tracking_margin: f32,
    pub static_mask: u32,
    pub dynamic_mask: u32,
    pub hit_from_inside: bool,
    pub hit_back_faces: bool,
}

impl Default for CollisionSettings {
    fn default() -> Self {
        Self {
            collision_type: CollisionType::default(),
            behavior: CollisionBehavior::default(),
            slide_stretch: DEFAULT_SLIDE_COLLISION_STRETCH,
            ignore_stretch: DEFAULT_IGNORE_COLLISION_STRETCH,
            max_dynamic_collisions: DEFAULT_MAX_DYNAMIC_COLLISIONS,
            dynamic_tracking_margin: DEFAULT_DYNAMIC_TRACKING_MARGIN,
            static_mask: 1,
            dynamic_mask: 1,
            hit_from_inside: false,
            hit_back_faces: false,
        }
    }
}

impl CollisionSettings {
    /// False when collision cannot produce any hit with the current masks.
    pub fn is_active(&self) -> bool {
        if self.behavior == CollisionBehavior::None {
            return false;
        }
        match self.collision_type {
            CollisionType::None => false,
            CollisionType::StaticOnly => self.static_mask != 0,
            CollisionType::DynamicOnly => self.dynamic_mask != 0,
            CollisionType::All => self.static_mask != 0 || self.dynamic_mask != 0,
        }
    }

    pub fn tracks_dynamic(&self) -> bool {
        self.is_active() && self.collision_type.includes_dynamic() && self.dynamic_mask != 0
    }

    pub fn checks_static(&self) -> bool {
        self.is_active() && self.collision_type.includes_static() && self.static_mask != 0
    }
}

/// Complete rope configuration.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, Default)]
#[serde(default)]
pub struct RopeConfig {
    pub simulation: SimulationSettings,
    pub gravity: GravitySettings,
    pub wind: WindSettings,
    pub damping: DampingSettings,
    pub collision: CollisionSettings,
}

impl RopeConfig {
    pub fn new() -> Self {
        Self::default()
    }

    /// The standard preset: 10 particles, stiffness 0.9 with 2 passes,
    /// gravity on, no wind, unit damping and no collision.
    pub fn standard() -> Self {
        Self::default()
    }

    pub fn with_rope_length(mut self, rope_length: f32) -> Self {
        self.simulation.rope_length = rope_length;
        self
    }

    pub fn with_particle_count(mut self, particle_count: usize) -> Self {
        self.simulation.particle_count = particle_count;
        self
    }

    pub fn with_stiffness(mut self, stiffness: f32, iterations: u32) -> Self {
        self.simulation.stiffness = stiffness;
        self.simulation.stiffness_iterations = iterations;
        self
    }

    pub fn with_preprocess_iterations(mut self, iterations: u32) -> Self {
        self.simulation.preprocess_iterations = iterations;
        self
    }

    pub fn with_preprocess_time_step(mut self, time_step: f64) -> Self {
        self.simulation.preprocess_time_step = time_step;
        self
    }

    /// Starts a rope without an end target hanging at full length instead of
    /// unwrapping from the start point.
    pub fn with_hanging_start(mut self) -> Self {
        self.simulation.unwrap_from_start = false;
        self
    }

    pub fn with_simulation_rate(mut self, rate: u32) -> Self {
        self.simulation.simulation_rate = rate;
        self
    }

    pub fn with_layout(mut self, layout: ChainLayout) -> Self {
        self.simulation.layout = layout;
        self
    }

    pub fn with_jitter_seed(mut self, seed: u64) -> Self {
        self.simulation.jitter_seed = Some(seed);
        self
    }

    pub fn with_gravity(mut self, vector: Vec3) -> Self {
        self.gravity.enabled = true;
        self.gravity.vector = vector;
        self
    }

    pub fn without_gravity(mut self) -> Self {
        self.gravity.enabled = false;
        self
    }

    pub fn with_wind(mut self, direction: Vec3, model: WindModel) -> Self {
        self.wind.enabled = true;
        self.wind.direction = direction;
        self.wind.model = model;
        self
    }

    pub fn with_damping(mut self, factor: f32, model: DampingModel) -> Self {
        self.damping.enabled = true;
        self.damping.factor = factor;
        self.damping.model = model;
        self
    }

    pub fn without_damping(mut self) -> Self {
        self.damping.enabled = false;
        self
    }

    pub fn with_collision(mut self, collision_type: CollisionType, behavior: CollisionBehavior) -> Self {
        self.collision.collision_type = collision_type;
        self.collision.behavior = behavior;
        self
    }

    /// Nominal distance between adjacent particles.
    pub fn average_segment_length(&self) -> f32 {
        let segments = self.simulation.particle_count.max(2) - 1;
        self.simulation.rope_length / segments as f32
    }

    /// Whether switching from `self` to `other` requires a new chain.
    pub fn topology_differs(&self, other: &RopeConfig) -> bool {
        self.simulation.particle_count != other.simulation.particle_count
            || self.simulation.rope_length != other.simulation.rope_length
            || self.simulation.layout != other.simulation.layout
            || self.simulation.unwrap_from_start != other.simulation.unwrap_from_start
    }

    /// Checks the values that cannot be repaired silently.
    pub fn validate(&self) -> Result<()> {
        let count = self.simulation.particle_count;
        if !(MIN_PARTICLE_COUNT..=MAX_PARTICLE_COUNT).contains(&count) {
            return Err(RopeError::InvalidParticleCount {
                requested: count,
                min: MIN_PARTICLE_COUNT,
                max: MAX_PARTICLE_COUNT,
            });
        }

        let length = self.simulation.rope_length;
        if !(length.is_finite() && length > 0.0) {
            return Err(RopeError::InvalidRopeLength(length));
        }

        let stiffness = self.simulation.stiffness;
        if !(STIFFNESS_RANGE.0..=STIFFNESS_RANGE.1).contains(&stiffness) {
            return Err(RopeError::InvalidStiffness(stiffness));
        }

        Ok(())
    }

    /// Returns a copy with out-of-range values clamped into range.
    pub fn sanitized(&self) -> Self {
        let mut config = self.clone();
        let sim = &mut config.simulation;

        let count = sim.particle_count.clamp(MIN_PARTICLE_COUNT, MAX_PARTICLE_COUNT);
        if count != sim.particle_count {
            warn!("particle count {} clamped to {}", sim.particle_count, count);
            sim.particle_count = count;
        }

        if !(sim.rope_length.is_finite() && sim.rope_length > 0.0) {
            warn!("rope length {} replaced by default", sim.rope_length);
            sim.rope_length = DEFAULT_ROPE_LENGTH;
        }

        let stiffness = sim.stiffness.clamp(STIFFNESS_RANGE.0, STIFFNESS_RANGE.1);
        if stiffness != sim.stiffness {
            warn!("stiffness {} clamped to {}", sim.stiffness, stiffness);
            sim.stiffness = stiffness;
        }

        if !(sim.preprocess_time_step.is_finite() && sim.preprocess_time_step > 0.0) {
            warn!("pre-roll step {} replaced by default", sim.preprocess_time_step);
            sim.preprocess_time_step = DEFAULT_TIME_STEP;
        }

        let collision = &mut config.collision;
        collision.slide_stretch = collision.slide_stretch.max(1.0);
        collision.ignore_stretch = collision.ignore_stretch.max(collision.slide_stretch);
        collision.max_dynamic_collisions = collision.max_dynamic_collisions.max(1);
        collision.dynamic_tracking_margin = collision.dynamic_tracking_margin.max(0.0);

        config
    }
}
