use glam::Vec3;

use crate::{core::bounds::Aabb, utils::allocator::EntityId};

/// Stable identifier of a host physics body.
pub type BodyHandle = EntityId;

/// Ray cast request. The ray starts at `origin` and covers `motion`
/// (direction scaled by length).
#[derive(Debug, Clone, Copy)]
pub struct RaycastQuery<'a> {
    pub origin: Vec3,
    pub motion: Vec3,
    pub mask: u32,
    /// Bodies the ray must pass through.
    pub exclude: &'a [BodyHandle],
    pub hit_from_inside: bool,
    pub hit_back_faces: bool,
}

impl<'a> RaycastQuery<'a> {
    pub fn new(origin: Vec3, motion: Vec3, mask: u32) -> Self {
        Self {
            origin,
            motion,
            mask,
            exclude: &[],
            hit_from_inside: false,
            hit_back_faces: false,
        }
    }

    pub fn with_exclusions(mut self, exclude: &'a [BodyHandle]) -> Self {
        self.exclude = exclude;
        self
    }

    pub fn end(&self) -> Vec3 {
        self.origin + self.motion
    }

    pub fn length(&self) -> f32 {
        self.motion.length()
    }

    pub fn is_excluded(&self, body: BodyHandle) -> bool {
        self.exclude.contains(&body)
    }
}

/// Result of a ray cast. Only the closest hit is reported.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct RaycastHit {
    pub point: Vec3,
    pub normal: Vec3,
    pub body: Option<BodyHandle>,
}

/// Box overlap request used to find dynamic bodies near a rope.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct OverlapQuery {
    pub bounds: Aabb,
    pub mask: u32,
    pub max_results: usize,
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct OverlapHit {
    pub body: BodyHandle,
    pub position: Vec3,
    pub velocity: Vec3,
}

/// Spatial queries a host physics world exposes to the rope.
///
/// Both calls are synchronous. Returning nothing is a normal outcome.
pub trait SpaceQuery {
    fn raycast(&self, query: &RaycastQuery<'_>) -> Option<RaycastHit>;

    fn overlap_box(&self, query: &OverlapQuery) -> Vec<OverlapHit>;
}

impl<T: SpaceQuery + ?Sized> SpaceQuery for &T {
    fn raycast(&self, query: &RaycastQuery<'_>) -> Option<RaycastHit> {
        (**self).raycast(query)
    }

    fn overlap_box(&self, query: &OverlapQuery) -> Vec<OverlapHit> {
        (**self).overlap_box(query)
    }
}

/// A world with nothing in it.
#[derive(Debug, Clone, Copy, Default)]
pub struct EmptySpace;

impl SpaceQuery for EmptySpace {
    fn raycast(&self, _query: &RaycastQuery<'_>) -> Option<RaycastHit> {
        None
    }

    fn overlap_box(&self, _query: &OverlapQuery) -> Vec<OverlapHit> {
        Vec::new()
    }
}
