//! Per-rope orchestration: attachment pinning, the tick pipeline, and step notifications.

pub mod driver;
pub mod listener;
pub mod verlet;

pub use driver::{RopeAttachments, RopeDriver, TickOutcome};
pub use listener::{StepListener, TickRecorder};
pub use verlet::VerletRope;
