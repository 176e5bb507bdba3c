//! Collision modules: host query contract, dynamic body tracking, and per-particle response.

pub mod queries;
pub mod resolver;
pub mod scene;
pub mod tracker;

pub use queries::{
    BodyHandle, EmptySpace, OverlapHit, OverlapQuery, RaycastHit, RaycastQuery, SpaceQuery,
};
pub use resolver::{CollisionResolver, CollisionStats};
pub use scene::{CollisionScene, SceneBody, SceneShape};
pub use tracker::{DynamicCollisionTracker, TrackedBody};
