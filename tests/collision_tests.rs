use verlet_rope::*;

const DT: f64 = 1.0 / 60.0;

fn floor_scene() -> (CollisionScene, BodyHandle) {
    let mut scene = CollisionScene::new();
    let floor = scene.add_static_box(Vec3::new(0.0, -0.5, 0.0), Vec3::new(5.0, 0.5, 5.0), 1);
    (scene, floor)
}

fn colliding_config(seed: u64) -> RopeConfig {
    RopeConfig::standard()
        .with_jitter_seed(seed)
        .with_collision(CollisionType::StaticOnly, CollisionBehavior::SlideStretch)
}

fn lowest_point(positions: &[Vec3]) -> f32 {
    positions.iter().map(|p| p.y).fold(f32::INFINITY, f32::min)
}

#[test]
fn test_rope_rests_on_static_floor() {
    let (scene, _) = floor_scene();

    for seed in [1, 7, 42] {
        let mut rope = VerletRope::new(colliding_config(seed)).unwrap();
        let attachments = RopeAttachments::hanging(Vec3::new(0.0, 1.0, 0.0));

        let mut lowest = f32::INFINITY;
        for _ in 0..600 {
            rope.step(DT, attachments, &scene);
            lowest = lowest.min(lowest_point(&rope.positions()));
        }

        let tip = *rope.positions().last().unwrap();
        assert!(lowest > -0.001, "seed {seed}: rope sank to {lowest}");
        assert!(tip.y < 0.05, "seed {seed}: tip should lie on the floor, got {tip}");
    }
}

#[test]
fn test_rope_without_collision_falls_through_floor() {
    let (scene, _) = floor_scene();
    let config = RopeConfig::standard().with_jitter_seed(1);
    let mut rope = VerletRope::new(config).unwrap();
    let attachments = RopeAttachments::hanging(Vec3::new(0.0, 1.0, 0.0));

    for _ in 0..600 {
        rope.step(DT, attachments, &scene);
    }
    assert!(lowest_point(&rope.positions()) < -1.0);
}

#[test]
fn test_excepted_body_is_passed_through() {
    let (scene, floor) = floor_scene();
    let mut rope = VerletRope::new(colliding_config(1)).unwrap();
    rope.add_collision_exception(floor);
    let attachments = RopeAttachments::hanging(Vec3::new(0.0, 1.0, 0.0));

    let mut hits = 0;
    for _ in 0..600 {
        hits += rope.step(DT, attachments, &scene).stats().static_hits;
    }
    assert_eq!(hits, 0);
    assert!(lowest_point(&rope.positions()) < -1.0);
}

#[test]
fn test_dynamic_bodies_are_tracked_and_evicted() {
    let mut engine = RopeEngine::new();
    let ball = engine.scene_mut().add_dynamic(
        SceneShape::Sphere { radius: 0.25 },
        Vec3::new(0.4, -0.3, 0.0),
        Vec3::ZERO,
        1,
    );
    let config = RopeConfig::standard()
        .with_jitter_seed(3)
        .with_collision(CollisionType::DynamicOnly, CollisionBehavior::SlideStretch);
    let rope = engine
        .add_rope(config, RopeAttachments::hanging(Vec3::ZERO))
        .unwrap();

    let report = engine.step(DT);
    assert_eq!(report.stats.tracked_bodies, 1);
    let tracker = engine.world().rope(rope).unwrap().collision().tracker();
    assert!(tracker.get(ball).is_some());

    engine.scene_mut().body_mut(ball).unwrap().position = Vec3::new(50.0, 0.0, 0.0);
    let report = engine.step(DT);
    assert_eq!(report.stats.tracked_bodies, 0);
    assert!(engine.world().rope(rope).unwrap().collision().tracker().is_empty());
}

#[test]
fn test_moving_paddle_pushes_hanging_rope() {
    let mut engine = RopeEngine::new();
    let config = RopeConfig::standard()
        .with_jitter_seed(11)
        .with_collision(CollisionType::DynamicOnly, CollisionBehavior::SlideStretch);
    let rope = engine
        .add_rope(config, RopeAttachments::hanging(Vec3::ZERO))
        .unwrap();

    for _ in 0..300 {
        engine.step(DT);
    }

    engine.scene_mut().add_dynamic(
        SceneShape::Box {
            half_extents: Vec3::new(0.2, 0.5, 0.5),
        },
        Vec3::new(-1.0, -1.5, 0.0),
        Vec3::new(2.0, 0.0, 0.0),
        1,
    );

    let mut dynamic_hits = 0;
    for _ in 0..90 {
        dynamic_hits += engine.step(DT).stats.dynamic_hits;
    }

    assert!(dynamic_hits > 0, "paddle never touched the rope");
    for position in engine.positions(rope).unwrap() {
        assert!(position.is_finite());
    }
}

#[test]
fn test_inactive_collision_ignores_scene() {
    let (scene, _) = floor_scene();
    let mut config = colliding_config(2);
    config.collision.static_mask = 0;

    let mut rope = VerletRope::new(config).unwrap();
    let attachments = RopeAttachments::hanging(Vec3::new(0.0, 1.0, 0.0));
    for _ in 0..120 {
        let outcome = rope.step(DT, attachments, &scene);
        assert_eq!(outcome.stats(), CollisionStats::default());
    }
}
