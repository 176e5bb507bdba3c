//! Utility helpers including math extensions, placement geometry, allocators, and logging.

pub mod allocator;
pub mod arc;
pub mod logging;
pub mod math;

pub use allocator::{Arena, EntityId, GenerationalId};
pub use math::*;
