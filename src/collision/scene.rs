//! Small in-memory physics world implementing [`SpaceQuery`].
//!
//! Useful for demos, tests and hosts without a physics engine of their own.
//! Shapes are closed and convex, so back faces are never reported.

use glam::Vec3;
use serde::{Deserialize, Serialize};

use crate::{
    core::bounds::Aabb,
    utils::allocator::{Arena, EntityId},
};

use super::queries::{BodyHandle, OverlapHit, OverlapQuery, RaycastHit, RaycastQuery, SpaceQuery};

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub enum SceneShape {
    Sphere { radius: f32 },
    Box { half_extents: Vec3 },
}

impl SceneShape {
    fn bounds(&self, position: Vec3) -> Aabb {
        match *self {
            SceneShape::Sphere { radius } => {
                Aabb::from_center_half_extents(position, Vec3::splat(radius))
            }
            SceneShape::Box { half_extents } => {
                Aabb::from_center_half_extents(position, half_extents)
            }
        }
    }

    fn contains(&self, position: Vec3, point: Vec3) -> bool {
        match *self {
            SceneShape::Sphere { radius } => point.distance_squared(position) < radius * radius,
            SceneShape::Box { half_extents } => {
                let local = (point - position).abs();
                local.cmplt(half_extents).all()
            }
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct SceneBody {
    pub shape: SceneShape,
    pub position: Vec3,
    pub velocity: Vec3,
    /// Collision layer bits matched against query masks.
    pub layer: u32,
    pub is_dynamic: bool,
}

/// Static and dynamic bodies answering ray casts and box overlaps.
#[derive(Default)]
pub struct CollisionScene {
    bodies: Arena<SceneBody>,
}

impl CollisionScene {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn add_body(&mut self, body: SceneBody) -> BodyHandle {
        self.bodies.insert(body)
    }

    pub fn add_static_sphere(&mut self, center: Vec3, radius: f32, layer: u32) -> BodyHandle {
        self.add_body(SceneBody {
            shape: SceneShape::Sphere { radius },
            position: center,
            velocity: Vec3::ZERO,
            layer,
            is_dynamic: false,
        })
    }

    pub fn add_static_box(&mut self, center: Vec3, half_extents: Vec3, layer: u32) -> BodyHandle {
        self.add_body(SceneBody {
            shape: SceneShape::Box { half_extents },
            position: center,
            velocity: Vec3::ZERO,
            layer,
            is_dynamic: false,
        })
    }

    pub fn add_dynamic(
        &mut self,
        shape: SceneShape,
        position: Vec3,
        velocity: Vec3,
        layer: u32,
    ) -> BodyHandle {
        self.add_body(SceneBody {
            shape,
            position,
            velocity,
            layer,
            is_dynamic: true,
        })
    }

    pub fn body(&self, handle: BodyHandle) -> Option<&SceneBody> {
        self.bodies.get(handle)
    }

    pub fn body_mut(&mut self, handle: BodyHandle) -> Option<&mut SceneBody> {
        self.bodies.get_mut(handle)
    }

    pub fn remove(&mut self, handle: BodyHandle) -> Option<SceneBody> {
        self.bodies.remove(handle)
    }

    pub fn len(&self) -> usize {
        self.bodies.len()
    }

    pub fn is_empty(&self) -> bool {
        self.bodies.is_empty()
    }

    /// Moves every dynamic body by its velocity.
    pub fn advance(&mut self, dt: f32) {
        for (_, body) in self.bodies.iter_mut() {
            if body.is_dynamic {
                body.position += body.velocity * dt;
            }
        }
    }

    fn cast_body(query: &RaycastQuery<'_>, id: EntityId, body: &SceneBody) -> Option<(RaycastHit, f32)> {
        let length = query.length();
        if length <= f32::EPSILON {
            return None;
        }
        let dir = query.motion / length;

        if body.shape.contains(body.position, query.origin) {
            return query.hit_from_inside.then_some((
                RaycastHit {
                    point: query.origin,
                    normal: -dir,
                    body: Some(id),
                },
                0.0,
            ));
        }

        let hit = match body.shape {
            SceneShape::Sphere { radius } => ray_sphere(query.origin, dir, length, body.position, radius)
                .map(|(point, distance)| (point, (point - body.position).normalize_or_zero(), distance)),
            SceneShape::Box { half_extents } => {
                ray_aabb(query.origin, dir, length, body.position, half_extents)
            }
        };

        hit.map(|(point, normal, distance)| {
            (
                RaycastHit {
                    point,
                    normal,
                    body: Some(id),
                },
                distance,
            )
        })
    }
}

impl SpaceQuery for CollisionScene {
    fn raycast(&self, query: &RaycastQuery<'_>) -> Option<RaycastHit> {
        self.bodies
            .iter()
            .filter(|(id, body)| body.layer & query.mask != 0 && !query.is_excluded(*id))
            .filter_map(|(id, body)| Self::cast_body(query, id, body))
            .min_by(|a, b| a.1.total_cmp(&b.1))
            .map(|(hit, _)| hit)
    }

    fn overlap_box(&self, query: &OverlapQuery) -> Vec<OverlapHit> {
        self.bodies
            .iter()
            .filter(|(_, body)| body.is_dynamic && body.layer & query.mask != 0)
            .filter(|(_, body)| body.shape.bounds(body.position).intersects(&query.bounds))
            .take(query.max_results)
            .map(|(id, body)| OverlapHit {
                body: id,
                position: body.position,
                velocity: body.velocity,
            })
            .collect()
    }
}

fn ray_sphere(origin: Vec3, dir: Vec3, max_distance: f32, center: Vec3, radius: f32) -> Option<(Vec3, f32)> {
    let oc = origin - center;
    let b = 2.0 * oc.dot(dir);
    let c = oc.length_squared() - radius * radius;
    let discriminant = b * b - 4.0 * c;
    if discriminant < 0.0 {
        return None;
    }
    let t = (-b - discriminant.sqrt()) * 0.5;
    if t < 0.0 || t > max_distance {
        return None;
    }
    Some((origin + dir * t, t))
}

fn ray_aabb(
    origin: Vec3,
    dir: Vec3,
    max_distance: f32,
    center: Vec3,
    half_extents: Vec3,
) -> Option<(Vec3, Vec3, f32)> {
    let mut t_enter = f32::NEG_INFINITY;
    let mut t_exit = max_distance;
    let mut normal = Vec3::ZERO;

    for i in 0..3 {
        let origin_component = origin[i];
        let dir_component = dir[i];
        let min = center[i] - half_extents[i];
        let max = center[i] + half_extents[i];

        if dir_component.abs() < 1e-6 {
            if origin_component < min || origin_component > max {
                return None;
            }
            continue;
        }

        let inv_dir = 1.0 / dir_component;
        let mut t1 = (min - origin_component) * inv_dir;
        let mut t2 = (max - origin_component) * inv_dir;
        if t1 > t2 {
            std::mem::swap(&mut t1, &mut t2);
        }

        if t1 > t_enter {
            t_enter = t1;
            normal = Vec3::ZERO;
            normal[i] = -dir_component.signum();
        }

        t_exit = t_exit.min(t2);
        if t_enter > t_exit {
            return None;
        }
    }

    // Entry behind the origin means the ray starts inside the box.
    if !t_enter.is_finite() || t_enter < 0.0 {
        return None;
    }
    Some((origin + dir * t_enter, normal, t_enter))
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;

    #[test]
    fn ray_hits_closest_sphere_on_mask() {
        let mut scene = CollisionScene::new();
        let near = scene.add_static_sphere(Vec3::new(0.0, -2.0, 0.0), 0.5, 1);
        let _far = scene.add_static_sphere(Vec3::new(0.0, -4.0, 0.0), 0.5, 1);
        let _other_layer = scene.add_static_sphere(Vec3::new(0.0, -1.0, 0.0), 0.2, 2);

        let query = RaycastQuery::new(Vec3::ZERO, Vec3::new(0.0, -10.0, 0.0), 1);
        let hit = scene.raycast(&query).unwrap();
        assert_eq!(hit.body, Some(near));
        assert_relative_eq!(hit.point.y, -1.5, epsilon = 1e-5);
        assert_relative_eq!(hit.normal.y, 1.0, epsilon = 1e-5);

        let excluded = [near];
        let hit = scene.raycast(&query.with_exclusions(&excluded)).unwrap();
        assert_relative_eq!(hit.point.y, -3.5, epsilon = 1e-5);
    }

    #[test]
    fn box_hit_reports_face_normal() {
        let mut scene = CollisionScene::new();
        scene.add_static_box(Vec3::new(2.0, 0.0, 0.0), Vec3::splat(0.5), 1);

        let query = RaycastQuery::new(Vec3::ZERO, Vec3::new(3.0, 0.0, 0.0), 1);
        let hit = scene.raycast(&query).unwrap();
        assert_relative_eq!(hit.point.x, 1.5, epsilon = 1e-5);
        assert_eq!(hit.normal, Vec3::new(-1.0, 0.0, 0.0));

        let short = RaycastQuery::new(Vec3::ZERO, Vec3::new(1.0, 0.0, 0.0), 1);
        assert!(scene.raycast(&short).is_none());
    }

    #[test]
    fn rays_starting_inside_need_opt_in() {
        let mut scene = CollisionScene::new();
        scene.add_static_sphere(Vec3::ZERO, 1.0, 1);

        let mut query = RaycastQuery::new(Vec3::ZERO, Vec3::X, 1);
        assert!(scene.raycast(&query).is_none());

        query.hit_from_inside = true;
        let hit = scene.raycast(&query).unwrap();
        assert_eq!(hit.point, Vec3::ZERO);
    }

    #[test]
    fn overlap_reports_dynamic_bodies_only() {
        let mut scene = CollisionScene::new();
        scene.add_static_sphere(Vec3::ZERO, 1.0, 1);
        let ball = scene.add_dynamic(
            SceneShape::Sphere { radius: 0.25 },
            Vec3::new(0.5, 0.0, 0.0),
            Vec3::X,
            1,
        );
        scene.add_dynamic(SceneShape::Sphere { radius: 0.25 }, Vec3::splat(10.0), Vec3::ZERO, 1);

        let query = OverlapQuery {
            bounds: Aabb::new(Vec3::splat(-1.0), Vec3::ONE),
            mask: 1,
            max_results: 8,
        };
        let hits = scene.overlap_box(&query);
        assert_eq!(hits.len(), 1);
        assert_eq!(hits[0].body, ball);
        assert_eq!(hits[0].velocity, Vec3::X);

        scene.advance(0.5);
        assert_eq!(scene.body(ball).unwrap().position, Vec3::new(1.0, 0.0, 0.0));
    }
}
