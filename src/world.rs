use glam::Vec3;

use crate::{
    collision::{queries::SpaceQuery, resolver::CollisionStats},
    config::DEFAULT_FRAME_BUDGET_MS,
    core::settings::RopeConfig,
    error::{Result, RopeError},
    rope::{RopeAttachments, TickOutcome, VerletRope},
    utils::{
        allocator::{Arena, EntityId},
        logging::{warn_if_frame_budget_exceeded, ScopedTimer},
    },
};

/// Summary of one [`RopeWorld::step`].
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct WorldStepReport {
    pub simulated: usize,
    pub skipped: usize,
    pub stats: CollisionStats,
    pub over_budget: bool,
}

/// Container stepping many independent ropes against one host world.
///
/// Ropes share no mutable state, so with the `parallel` feature they are
/// ticked on the rayon thread pool.
pub struct RopeWorld {
    ropes: Arena<VerletRope>,
    parallel_enabled: bool,
    frame_budget_ms: f32,
}

impl Default for RopeWorld {
    fn default() -> Self {
        Self::new()
    }
}

impl RopeWorld {
    pub fn new() -> Self {
        Self {
            ropes: Arena::new(),
            parallel_enabled: cfg!(feature = "parallel"),
            frame_budget_ms: DEFAULT_FRAME_BUDGET_MS,
        }
    }

    pub fn add_rope(&mut self, rope: VerletRope) -> EntityId {
        self.ropes.insert(rope)
    }

    /// Creates a rope from `config`, builds its chain between `attachments`
    /// and registers it.
    pub fn spawn_rope(&mut self, config: RopeConfig, attachments: RopeAttachments) -> Result<EntityId> {
        let mut rope = VerletRope::new(config)?;
        rope.create(attachments);
        Ok(self.add_rope(rope))
    }

    pub fn remove_rope(&mut self, id: EntityId) -> Result<VerletRope> {
        self.ropes.remove(id).ok_or(RopeError::RopeNotFound(id))
    }

    pub fn rope(&self, id: EntityId) -> Option<&VerletRope> {
        self.ropes.get(id)
    }

    pub fn rope_mut(&mut self, id: EntityId) -> Option<&mut VerletRope> {
        self.ropes.get_mut(id)
    }

    pub fn set_attachments(&mut self, id: EntityId, attachments: RopeAttachments) -> Result<()> {
        let rope = self.ropes.get_mut(id).ok_or(RopeError::RopeNotFound(id))?;
        rope.set_attachment_targets(attachments);
        Ok(())
    }

    pub fn positions(&self, id: EntityId) -> Result<Vec<Vec3>> {
        self.ropes
            .get(id)
            .map(VerletRope::positions)
            .ok_or(RopeError::RopeNotFound(id))
    }

    pub fn ids(&self) -> impl Iterator<Item = EntityId> + '_ {
        self.ropes.ids()
    }

    pub fn len(&self) -> usize {
        self.ropes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.ropes.is_empty()
    }

    pub fn set_parallel_enabled(&mut self, enabled: bool) {
        self.parallel_enabled = enabled;
    }

    pub fn parallel_enabled(&self) -> bool {
        self.parallel_enabled
    }

    /// Milliseconds a world step may take before a warning is logged; `0`
    /// disables the check.
    pub fn set_frame_budget_ms(&mut self, budget_ms: f32) {
        self.frame_budget_ms = budget_ms;
    }

    pub fn frame_budget_ms(&self) -> f32 {
        self.frame_budget_ms
    }

    /// Ticks every rope by `dt` with its stored attachment targets.
    pub fn step<S>(&mut self, dt: f64, space: &S) -> WorldStepReport
    where
        S: SpaceQuery + Sync + ?Sized,
    {
        let timer = ScopedTimer::new("world::step");

        let outcomes = if self.parallel_enabled {
            self.tick_parallel(dt, space)
        } else {
            self.ropes
                .iter_mut()
                .map(|(_, rope)| rope.tick(dt, space))
                .collect::<Vec<_>>()
        };

        let mut report = WorldStepReport::default();
        for outcome in &outcomes {
            match outcome {
                TickOutcome::Simulated { stats, .. } => {
                    report.simulated += 1;
                    report.stats.accumulate(stats);
                }
                TickOutcome::Skipped => report.skipped += 1,
            }
        }

        report.over_budget = warn_if_frame_budget_exceeded(timer.elapsed(), self.frame_budget_ms);
        report
    }

    #[cfg(feature = "parallel")]
    fn tick_parallel<S>(&mut self, dt: f64, space: &S) -> Vec<TickOutcome>
    where
        S: SpaceQuery + Sync + ?Sized,
    {
        use rayon::prelude::*;

        self.ropes
            .par_iter_mut()
            .map(|(_, rope)| rope.tick(dt, space))
            .collect()
    }

    #[cfg(not(feature = "parallel"))]
    fn tick_parallel<S>(&mut self, dt: f64, space: &S) -> Vec<TickOutcome>
    where
        S: SpaceQuery + Sync + ?Sized,
    {
        self.ropes
            .iter_mut()
            .map(|(_, rope)| rope.tick(dt, space))
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::collision::queries::EmptySpace;

    #[test]
    fn ropes_are_looked_up_by_id() {
        let mut world = RopeWorld::new();
        let id = world
            .spawn_rope(RopeConfig::standard(), RopeAttachments::hanging(Vec3::ZERO))
            .unwrap();
        assert_eq!(world.len(), 1);
        assert_eq!(world.positions(id).unwrap().len(), 10);

        world.remove_rope(id).unwrap();
        assert!(world.is_empty());
        assert_eq!(world.positions(id), Err(RopeError::RopeNotFound(id)));
        assert!(world.set_attachments(id, RopeAttachments::default()).is_err());
    }

    #[test]
    fn step_reports_skipped_ropes() {
        let mut world = RopeWorld::new();
        world
            .spawn_rope(RopeConfig::standard(), RopeAttachments::hanging(Vec3::ZERO))
            .unwrap();
        world
            .spawn_rope(
                RopeConfig::standard().with_simulation_rate(10),
                RopeAttachments::hanging(Vec3::X),
            )
            .unwrap();

        let report = world.step(1.0 / 60.0, &EmptySpace);
        assert_eq!(report.simulated, 1);
        assert_eq!(report.skipped, 1);
    }
}
