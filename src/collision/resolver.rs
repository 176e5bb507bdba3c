//! Ray-based collision response for rope particles.
//!
//! Every free particle casts its last movement against the host world. The
//! first hit wins: static geometry is tried first, then each tracked dynamic
//! body in the order it was first seen.

use glam::Vec3;

use crate::{
    config::{DYNAMIC_COLLISION_CHECK_LENGTH, STATIC_COLLISION_CHECK_LENGTH},
    core::{particle::ParticleChain, settings::CollisionSettings},
    utils::{
        logging::ScopedTimer,
        math::{extend_by, slide},
    },
};

use super::{
    queries::{BodyHandle, RaycastHit, RaycastQuery, SpaceQuery},
    tracker::{DynamicCollisionTracker, TrackedBody},
};

/// Counters describing one collision pass.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct CollisionStats {
    pub static_hits: usize,
    pub dynamic_hits: usize,
    /// Particles whose segment was stretched past the ignore threshold.
    pub skipped_overstretched: usize,
    pub tracked_bodies: usize,
}

impl CollisionStats {
    pub fn total_hits(&self) -> usize {
        self.static_hits + self.dynamic_hits
    }

    pub fn accumulate(&mut self, other: &CollisionStats) {
        self.static_hits += other.static_hits;
        self.dynamic_hits += other.dynamic_hits;
        self.skipped_overstretched += other.skipped_overstretched;
        self.tracked_bodies += other.tracked_bodies;
    }
}

/// Position a particle is moved to after a hit: pulled back from the hit
/// point towards the ray origin by `check_length`, plus the tangential part
/// of `movement` when sliding.
pub fn resolved_position(
    from: Vec3,
    movement: Vec3,
    hit: &RaycastHit,
    check_length: f32,
    is_sliding: bool,
) -> Vec3 {
    let direction = (hit.point - from).normalize_or_zero();
    let position = hit.point - direction * check_length;
    if is_sliding {
        position + slide(movement, hit.normal)
    } else {
        position
    }
}

/// Per-rope collision state: settings, exceptions and dynamic tracking.
#[derive(Debug, Default)]
pub struct CollisionResolver {
    settings: CollisionSettings,
    tracker: DynamicCollisionTracker,
    exceptions: Vec<BodyHandle>,
}

impl CollisionResolver {
    pub fn new(settings: CollisionSettings) -> Self {
        Self {
            settings,
            tracker: DynamicCollisionTracker::new(),
            exceptions: Vec::new(),
        }
    }

    pub fn settings(&self) -> &CollisionSettings {
        &self.settings
    }

    /// Applies new settings. Tracking restarts when dynamic collision is
    /// switched off.
    pub fn set_settings(&mut self, settings: CollisionSettings) {
        self.settings = settings;
        if !self.settings.tracks_dynamic() {
            self.tracker.clear();
        }
    }

    pub fn tracker(&self) -> &DynamicCollisionTracker {
        &self.tracker
    }

    pub fn exceptions(&self) -> &[BodyHandle] {
        &self.exceptions
    }

    /// Bodies every collision ray passes through, e.g. the ones the rope is
    /// attached to.
    pub fn set_exceptions<I: IntoIterator<Item = BodyHandle>>(&mut self, bodies: I) {
        self.exceptions.clear();
        for body in bodies {
            self.add_exception(body);
        }
    }

    pub fn add_exception(&mut self, body: BodyHandle) {
        if !self.exceptions.contains(&body) {
            self.exceptions.push(body);
        }
    }

    pub fn remove_exception(&mut self, body: BodyHandle) {
        self.exceptions.retain(|b| *b != body);
    }

    pub fn reset(&mut self) {
        self.tracker.clear();
    }

    /// Refreshes dynamic tracking and pushes particles out of whatever they
    /// moved into this tick.
    pub fn resolve<S: SpaceQuery + ?Sized>(
        &mut self,
        chain: &mut ParticleChain,
        space: &S,
        dt: f32,
    ) -> CollisionStats {
        let mut stats = CollisionStats::default();
        if !self.settings.is_active() {
            self.tracker.clear();
            return stats;
        }

        let _timer = ScopedTimer::new("collision::resolve");

        if self.settings.tracks_dynamic() {
            stats.tracked_bodies = self.tracker.track(
                space,
                chain.bounds(),
                self.settings.dynamic_tracking_margin,
                self.settings.dynamic_mask,
                self.settings.max_dynamic_collisions,
                dt,
            );
        } else {
            self.tracker.clear();
        }

        let segment_length = chain.average_segment_length();
        let slide_length = segment_length * self.settings.slide_stretch;
        let ignore_length = segment_length * self.settings.ignore_stretch;
        let check_static = self.settings.checks_static();
        let check_dynamic = self.settings.tracks_dynamic();

        for i in 0..chain.len() {
            if chain[i].is_attached {
                continue;
            }

            let current_segment_length = if i > 0 {
                chain[i - 1].position_current.distance(chain[i].position_current)
            } else {
                0.0
            };
            if current_segment_length > ignore_length {
                stats.skipped_overstretched += 1;
                continue;
            }

            let is_sliding = current_segment_length > slide_length;
            let previous = chain[i].position_previous;
            let movement = chain[i].displacement();

            if check_static {
                if let Some(position) = self.collide_static(space, previous, movement, is_sliding) {
                    chain[i].position_current = position;
                    stats.static_hits += 1;
                    continue;
                }
            }

            if check_dynamic {
                let resolved = self.tracker.iter().find_map(|body| {
                    self.collide_dynamic(space, previous, movement, body, is_sliding)
                });
                if let Some(position) = resolved {
                    chain[i].position_current = position;
                    stats.dynamic_hits += 1;
                }
            }
        }

        stats
    }

    fn cast<S: SpaceQuery + ?Sized>(
        &self,
        space: &S,
        origin: Vec3,
        motion: Vec3,
        mask: u32,
    ) -> Option<RaycastHit> {
        let query = RaycastQuery {
            origin,
            motion,
            mask,
            exclude: &self.exceptions,
            hit_from_inside: self.settings.hit_from_inside,
            hit_back_faces: self.settings.hit_back_faces,
        };
        space.raycast(&query)
    }

    fn collide_static<S: SpaceQuery + ?Sized>(
        &self,
        space: &S,
        previous: Vec3,
        movement: Vec3,
        is_sliding: bool,
    ) -> Option<Vec3> {
        if movement == Vec3::ZERO {
            return None;
        }

        let motion = extend_by(movement, STATIC_COLLISION_CHECK_LENGTH);
        let hit = self.cast(space, previous, motion, self.settings.static_mask)?;
        Some(resolved_position(
            previous,
            movement,
            &hit,
            STATIC_COLLISION_CHECK_LENGTH,
            is_sliding,
        ))
    }

    /// A moving body is checked with a short ray from where the particle
    /// would be in the body's frame back along the body's movement, so hits
    /// are found even when the particle itself is at rest.
    fn collide_dynamic<S: SpaceQuery + ?Sized>(
        &self,
        space: &S,
        previous: Vec3,
        movement: Vec3,
        body: &TrackedBody,
        is_sliding: bool,
    ) -> Option<Vec3> {
        let check_length = DYNAMIC_COLLISION_CHECK_LENGTH;
        let (origin, motion) = if body.movement != Vec3::ZERO {
            (
                previous + body.movement,
                -body.movement.normalize_or_zero() * check_length,
            )
        } else if movement != Vec3::ZERO {
            (previous, extend_by(movement, check_length))
        } else {
            return None;
        };

        let hit = self.cast(space, origin, motion, self.settings.dynamic_mask)?;
        Some(resolved_position(origin, movement, &hit, check_length, is_sliding))
    }
}
