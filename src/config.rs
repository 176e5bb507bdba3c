//! Global configuration constants for the rope simulation core.

/// Default gravity vector applied to rope particles (Y-up).
pub const DEFAULT_GRAVITY: [f32; 3] = [0.0, -9.8, 0.0];

/// Fixed timestep used by the pre-roll pass (in seconds).
pub const DEFAULT_TIME_STEP: f64 = 1.0 / 60.0;

/// Default rope length in world units.
pub const DEFAULT_ROPE_LENGTH: f32 = 3.0;

/// Default number of simulated particles.
pub const DEFAULT_PARTICLE_COUNT: usize = 10;

/// Smallest particle count a rope can be configured with.
pub const MIN_PARTICLE_COUNT: usize = 3;

/// Largest particle count a rope can be configured with.
pub const MAX_PARTICLE_COUNT: usize = 300;

/// Default distance-constraint stiffness.
pub const DEFAULT_STIFFNESS: f32 = 0.9;

/// Accepted stiffness range.
pub const STIFFNESS_RANGE: (f32, f32) = (0.2, 1.5);

/// Number of stiffness relaxation passes performed per tick.
pub const DEFAULT_STIFFNESS_ITERATIONS: u32 = 2;

/// Number of fixed-timestep ticks run when a chain is created.
pub const DEFAULT_PREPROCESS_ITERATIONS: u32 = 5;

/// Per-axis random offset applied when a rope unwraps from a single point.
pub const UNWRAPPING_JITTER: f32 = 0.005;

/// Default wind direction.
pub const DEFAULT_WIND: [f32; 3] = [1.0, 0.0, 0.0];

/// Multiplier used by the scaled wind model.
pub const DEFAULT_WIND_SCALE: f32 = 20.0;

/// Default clamp range for the clamped wind model.
pub const DEFAULT_WIND_FORCE_RANGE: (f32, f32) = (-1.0, 1.0);

/// Default damping factor.
pub const DEFAULT_DAMPING_FACTOR: f32 = 1.0;

/// Ray extension used for static collision checks.
pub const STATIC_COLLISION_CHECK_LENGTH: f32 = 0.005;

/// Ray extension used for dynamic body collision checks.
pub const DYNAMIC_COLLISION_CHECK_LENGTH: f32 = 0.1;

/// Segment stretch (in segment lengths) above which hits slide along the surface.
pub const DEFAULT_SLIDE_COLLISION_STRETCH: f32 = 1.05;

/// Segment stretch (in segment lengths) above which collision is skipped.
pub const DEFAULT_IGNORE_COLLISION_STRETCH: f32 = 5.0;

/// Maximum number of dynamic bodies tracked per rope.
pub const DEFAULT_MAX_DYNAMIC_COLLISIONS: usize = 4;

/// Extra size added to the rope bounds when looking for dynamic bodies.
pub const DEFAULT_DYNAMIC_TRACKING_MARGIN: f32 = 1.0;

/// Frame budget used by [`crate::world::RopeWorld`] before warning (milliseconds).
pub const DEFAULT_FRAME_BUDGET_MS: f32 = 4.0;
