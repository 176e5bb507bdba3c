use verlet_rope::*;

fn main() {
    let mut engine = RopeEngine::new();

    let ground = engine
        .scene_mut()
        .add_static_box(Vec3::new(0.0, -0.5, 0.0), Vec3::new(10.0, 0.5, 10.0), 1);
    engine
        .scene_mut()
        .add_static_sphere(Vec3::new(0.5, 1.0, 0.0), 0.4, 1);
    let ball = engine.scene_mut().add_dynamic(
        SceneShape::Sphere { radius: 0.3 },
        Vec3::new(-3.0, 0.5, 0.0),
        Vec3::new(1.5, 0.0, 0.0),
        1,
    );

    let config = RopeConfig::standard()
        .with_particle_count(24)
        .with_collision(CollisionType::All, CollisionBehavior::SlideStretch);
    let rope = engine
        .add_rope(
            config,
            RopeAttachments::between(Vec3::new(-1.0, 2.0, 0.0), Vec3::new(1.5, 2.0, 0.0)),
        )
        .expect("valid rope config");

    let mut hits = CollisionStats::default();
    for _ in 0..300 {
        let report = engine.step(1.0 / 60.0);
        hits.accumulate(&report.stats);
    }

    println!(
        "static hits: {}, dynamic hits: {}",
        hits.static_hits, hits.dynamic_hits
    );
    if let Some(body) = engine.scene().body(ball) {
        println!("Ball ended at {:?}", body.position);
    }
    let lowest = engine
        .positions(rope)
        .expect("rope exists")
        .into_iter()
        .map(|p| p.y)
        .fold(f32::INFINITY, f32::min);
    println!("Lowest rope point: {lowest:.3} (ground {ground:?} at y = 0)");
}
