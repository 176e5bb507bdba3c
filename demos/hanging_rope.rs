use verlet_rope::*;

fn main() {
    let mut engine = RopeEngine::new();
    engine.set_parallel_enabled(true);

    let config = RopeConfig::standard()
        .with_rope_length(4.0)
        .with_particle_count(16)
        .with_wind(Vec3::new(1.0, 0.0, 0.5), WindModel::scaled());
    let anchor = Vec3::new(0.0, 5.0, 0.0);
    let rope = engine
        .add_rope(config, RopeAttachments::hanging(anchor))
        .expect("valid rope config");

    for frame in 0..240 {
        // Swing the anchor back and forth.
        let t = frame as f32 / 60.0;
        let start = anchor + Vec3::new(t.sin(), 0.0, 0.0);
        engine
            .set_attachments(rope, RopeAttachments::hanging(start))
            .expect("rope exists");
        engine.step(1.0 / 60.0);
    }

    let positions = engine.positions(rope).expect("rope exists");
    println!("Rope after 4 seconds ({} particles):", positions.len());
    for (i, p) in positions.iter().enumerate() {
        println!("  {i:2}: ({:6.3}, {:6.3}, {:6.3})", p.x, p.y, p.z);
    }
}
