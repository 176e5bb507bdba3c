use glam::Vec3;
use serde::{Deserialize, Serialize};

use crate::collision::resolver::CollisionStats;

/// Where a rope gets its particle positions from.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, Default)]
pub enum RopeDriver {
    /// Positions come from the Verlet pipeline.
    #[default]
    FreeSimulated,
    /// Positions are copied from host rigid-body segments every tick.
    RigidBodyDriven(Vec<Vec3>),
}

impl RopeDriver {
    pub fn is_simulated(&self) -> bool {
        matches!(self, Self::FreeSimulated)
    }
}

/// World-space targets for the two rope ends.
///
/// A missing start falls back to the rope origin; a missing end leaves the
/// rope free.
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct RopeAttachments {
    pub start: Option<Vec3>,
    pub end: Option<Vec3>,
}

impl RopeAttachments {
    pub fn new(start: Option<Vec3>, end: Option<Vec3>) -> Self {
        Self { start, end }
    }

    /// Pinned at `start`, free at the other end.
    pub fn hanging(start: Vec3) -> Self {
        Self {
            start: Some(start),
            end: None,
        }
    }

    pub fn between(start: Vec3, end: Vec3) -> Self {
        Self {
            start: Some(start),
            end: Some(end),
        }
    }
}

/// What happened during one host tick.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum TickOutcome {
    /// The rate cap held simulation back; positions are unchanged.
    Skipped,
    /// The pipeline ran over `delta` seconds of accumulated time.
    Simulated { delta: f64, stats: CollisionStats },
}

impl TickOutcome {
    pub fn was_simulated(&self) -> bool {
        matches!(self, Self::Simulated { .. })
    }

    pub fn delta(&self) -> Option<f64> {
        match self {
            Self::Simulated { delta, .. } => Some(*delta),
            Self::Skipped => None,
        }
    }

    pub fn stats(&self) -> CollisionStats {
        match self {
            Self::Simulated { stats, .. } => *stats,
            Self::Skipped => CollisionStats::default(),
        }
    }
}
