use approx::assert_relative_eq;
use verlet_rope::*;

fn unwrap_from(seed: u64) -> ParticleChain {
    let config = RopeConfig::standard().with_jitter_seed(seed);
    ChainInitializer::from_config(&config).initialize(
        Vec3::new(0.0, 2.0, 0.0),
        None,
        config.gravity.acceleration(),
        config.simulation.particle_count,
        config.average_segment_length(),
    )
}

fn segment_ratios(chain: &ParticleChain) -> Vec<f32> {
    let positions = chain.positions();
    positions
        .windows(2)
        .map(|pair| pair[0].distance(pair[1]) / chain.average_segment_length())
        .collect()
}

#[test]
fn test_same_seed_gives_identical_chain() {
    assert_eq!(unwrap_from(99), unwrap_from(99));
}

#[test]
fn test_different_seeds_give_different_chains() {
    assert_ne!(unwrap_from(1).positions(), unwrap_from(2).positions());
}

#[test]
fn test_unwrapped_rope_spreads_out_during_preroll() {
    for seed in 0..5 {
        let chain = unwrap_from(seed);
        assert_eq!(chain[0].position_current, Vec3::new(0.0, 2.0, 0.0));
        assert!(chain[0].is_attached);
        assert!(!chain[chain.len() - 1].is_attached);

        for ratio in segment_ratios(&chain) {
            assert!(
                (0.8..=1.2).contains(&ratio),
                "seed {seed}: segment ratio {ratio} after pre-roll"
            );
        }
    }
}

#[test]
fn test_particle_count_is_clamped() {
    let chain = ChainInitializer::new()
        .with_preprocess_iterations(0)
        .initialize(Vec3::ZERO, Some(Vec3::X), Vec3::ZERO, 1, 0.5);
    assert_eq!(chain.len(), 3);

    let chain = ChainInitializer::new()
        .with_preprocess_iterations(0)
        .initialize(Vec3::ZERO, Some(Vec3::X), Vec3::ZERO, 10_000, 0.01);
    assert_eq!(chain.len(), 300);
}

#[test]
fn test_zigzag_layout_keeps_segment_length() {
    let chain = ChainInitializer::new()
        .with_layout(ChainLayout::Zigzag)
        .with_preprocess_iterations(0)
        .initialize(Vec3::ZERO, Some(Vec3::new(1.0, 0.0, 0.0)), Vec3::ZERO, 9, 0.25);

    for ratio in segment_ratios(&chain) {
        assert_relative_eq!(ratio, 1.0, epsilon = 1e-4);
    }
    assert!(chain[1].position_current.y.abs() > 0.05);
    assert_eq!(chain[8].position_current, Vec3::new(1.0, 0.0, 0.0));
}

#[test]
fn test_arc_layout_bows_along_gravity() {
    let config = RopeConfig::standard()
        .with_layout(ChainLayout::Arc)
        .with_gravity(Vec3::new(0.0, 0.0, -9.8))
        .with_preprocess_iterations(0);
    let chain = ChainInitializer::from_config(&config).initialize(
        Vec3::ZERO,
        Some(Vec3::new(2.0, 0.0, 0.0)),
        Vec3::ZERO,
        config.simulation.particle_count,
        config.average_segment_length(),
    );

    let middle = chain[5].position_current;
    assert!(middle.z < -0.3, "arc should bulge towards -z, got {middle}");
    assert_relative_eq!(middle.y, 0.0, epsilon = 1e-4);
}

#[test]
fn test_rope_created_with_seed_is_reproducible() {
    let config = RopeConfig::standard().with_jitter_seed(5);
    let attachments = RopeAttachments::hanging(Vec3::ONE);

    let mut a = VerletRope::new(config.clone()).unwrap();
    let mut b = VerletRope::new(config).unwrap();
    for _ in 0..60 {
        a.step(1.0 / 60.0, attachments, &EmptySpace);
        b.step(1.0 / 60.0, attachments, &EmptySpace);
    }
    assert_eq!(a.positions(), b.positions());
}

#[test]
fn test_hanging_start_rope_begins_at_full_length() {
    let config = RopeConfig::standard().with_hanging_start();
    let rope_length = config.simulation.rope_length;
    let anchor = Vec3::new(0.0, 3.0, 0.0);

    let mut rope = VerletRope::new(config).unwrap();
    rope.create(RopeAttachments::hanging(anchor));
    let positions = rope.positions();
    let tip = *positions.last().unwrap();

    assert_eq!(positions[0], anchor);
    assert!(tip.x.abs() < 1e-4 && tip.z.abs() < 1e-4, "tip left the vertical: {tip}");
    assert!(anchor.distance(tip) > 0.95 * rope_length);
    assert!(!rope.chain().unwrap()[positions.len() - 1].is_attached);
}
