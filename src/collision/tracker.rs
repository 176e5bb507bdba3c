use std::collections::HashMap;

use glam::Vec3;
use log::debug;

use crate::core::bounds::Aabb;

use super::queries::{BodyHandle, OverlapQuery, SpaceQuery};

/// Movement bookkeeping for one dynamic body near the rope.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct TrackedBody {
    pub body: BodyHandle,
    pub previous_position: Vec3,
    /// Displacement of the body during the last tracking pass.
    pub movement: Vec3,
    pub last_seen_tick: u64,
}

/// Dynamic bodies overlapping the rope, refreshed once per tick.
///
/// Entries not reported by the latest overlap query are evicted. Iteration
/// follows the order bodies were first seen.
#[derive(Debug, Default)]
pub struct DynamicCollisionTracker {
    entries: HashMap<BodyHandle, TrackedBody>,
    order: Vec<BodyHandle>,
    tick: u64,
}

impl DynamicCollisionTracker {
    pub fn new() -> Self {
        Self::default()
    }

    /// Queries bodies overlapping `bounds` grown by `margin` and updates
    /// their movement. Returns the number of bodies tracked afterwards.
    pub fn track<S: SpaceQuery + ?Sized>(
        &mut self,
        space: &S,
        bounds: Aabb,
        margin: f32,
        mask: u32,
        max_results: usize,
        dt: f32,
    ) -> usize {
        self.tick = self.tick.wrapping_add(1);
        let tick = self.tick;

        if bounds.is_empty() || bounds.size() == Vec3::ZERO {
            self.clear();
            return 0;
        }

        let query = OverlapQuery {
            bounds: bounds.grown(margin),
            mask,
            max_results,
        };

        for hit in space.overlap_box(&query).into_iter().take(max_results) {
            if !self.entries.contains_key(&hit.body) {
                debug!("tracking dynamic body {:?}", hit.body);
                self.order.push(hit.body);
            }
            let entry = self.entries.entry(hit.body).or_insert_with(|| TrackedBody {
                body: hit.body,
                previous_position: hit.position - hit.velocity * dt,
                movement: Vec3::ZERO,
                last_seen_tick: 0,
            });
            if entry.last_seen_tick == tick {
                continue;
            }

            entry.movement = hit.position - entry.previous_position;
            entry.previous_position = hit.position;
            entry.last_seen_tick = tick;
        }

        let before = self.entries.len();
        self.entries.retain(|_, entry| entry.last_seen_tick == tick);
        if self.entries.len() != before {
            let entries = &self.entries;
            self.order.retain(|handle| entries.contains_key(handle));
            debug!("evicted {} dynamic bodies", before - self.entries.len());
        }

        self.entries.len()
    }

    pub fn get(&self, body: BodyHandle) -> Option<&TrackedBody> {
        self.entries.get(&body)
    }

    pub fn iter(&self) -> impl Iterator<Item = &TrackedBody> + '_ {
        self.order.iter().filter_map(|handle| self.entries.get(handle))
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn clear(&mut self) {
        self.entries.clear();
        self.order.clear();
    }
}
