//! Randomised checks of the numeric invariants
//!
//! Inputs come from a seeded PCG generator so failures reproduce.

use fusion_compass::{
    Convention, Direction, DirectionClassifier, OrientationEngine, SmoothingFilter,
};
use nalgebra::Vector3;
use rand::prelude::*;
use rand_pcg::Pcg64;

const SEED: u64 = 0x5eed_c0de;

fn random_vector(rng: &mut Pcg64, scale: f32) -> Vector3<f32> {
    Vector3::new(
        rng.random_range(-scale..scale),
        rng.random_range(-scale..scale),
        rng.random_range(-scale..scale),
    )
}

#[test]
fn test_azimuth_always_in_range() {
    let mut rng = Pcg64::seed_from_u64(SEED);

    for convention in [Convention::Nwu, Convention::Enu, Convention::Ned] {
        let engine = OrientationEngine::new(convention, 0.1);
        let mut fused = 0;

        for _ in 0..10_000 {
            let gravity = random_vector(&mut rng, 12.0);
            let geomagnetic = random_vector(&mut rng, 60.0);

            if let Some(sample) = engine.fuse(&gravity, &geomagnetic) {
                fused += 1;
                assert!(
                    (0.0..360.0).contains(&sample.azimuth),
                    "{:?}: azimuth {} for {:?} / {:?}",
                    convention,
                    sample.azimuth,
                    gravity,
                    geomagnetic
                );
                assert!((-90.0..=90.0).contains(&sample.pitch));
                assert!((-180.0..=180.0).contains(&sample.roll));
                assert!((-90.0..=90.0).contains(&sample.inclination));
            }
        }

        // Random pairs are almost never parallel
        assert!(fused > 9_900, "{:?}: only {} fused", convention, fused);
    }
}

#[test]
fn test_field_strength_is_norm_of_estimate() {
    let mut rng = Pcg64::seed_from_u64(SEED + 1);
    let engine = OrientationEngine::default();

    for _ in 0..1_000 {
        let gravity = random_vector(&mut rng, 12.0);
        let geomagnetic = random_vector(&mut rng, 60.0);

        if let Some(sample) = engine.fuse(&gravity, &geomagnetic) {
            assert!(sample.magnetic_field >= 0.0);
            assert!((sample.magnetic_field - geomagnetic.magnitude()).abs() < 1e-4);
        }
    }
}

#[test]
fn test_heading_ignores_vector_lengths() {
    let mut rng = Pcg64::seed_from_u64(SEED + 2);
    let engine = OrientationEngine::default();

    for _ in 0..1_000 {
        let gravity = random_vector(&mut rng, 12.0);
        let geomagnetic = random_vector(&mut rng, 60.0);
        let Some(reference) = engine.fuse(&gravity, &geomagnetic) else {
            continue;
        };

        let scaled = engine
            .fuse(&(gravity * 3.0), &(geomagnetic * 0.5))
            .expect("scaling up gravity keeps the frame usable");

        let d = (reference.azimuth - scaled.azimuth).abs();
        assert!(d.min(360.0 - d) < 0.05, "{} vs {}", reference.azimuth, scaled.azimuth);
    }
}

#[test]
fn test_filter_converges_to_any_constant() {
    let mut rng = Pcg64::seed_from_u64(SEED + 3);

    for _ in 0..100 {
        let target = random_vector(&mut rng, 100.0);
        let mut filter = SmoothingFilter::default();
        let mut previous = target.magnitude();

        for _ in 0..1_500 {
            let error = (filter.update(target) - target).magnitude();
            assert!(error <= previous + 1e-4);
            previous = error;
        }

        assert!(previous < 1e-3, "residual {} for {:?}", previous, target);
    }
}

#[test]
fn test_classify_total_and_nearest_within_sector() {
    let classifier = DirectionClassifier::new();

    assert_eq!(classifier.classify(0), Direction::North);
    assert_eq!(classifier.classify(360), Direction::North);

    for angle in 0..=360 {
        let direction = classifier.classify(angle);
        // Every result is within half a sector of one of its own angles
        let nearest = direction
            .angles()
            .iter()
            .map(|&owned| (angle - owned).abs())
            .min()
            .unwrap();
        assert!(nearest <= 22, "angle {} -> {:?}", angle, direction);
    }
}

#[test]
fn test_classify_matches_random_azimuths() {
    let mut rng = Pcg64::seed_from_u64(SEED + 4);
    let classifier = DirectionClassifier::new();

    for _ in 0..5_000 {
        let azimuth: f32 = rng.random_range(0.0..360.0);
        let by_azimuth = classifier.classify_azimuth(azimuth);
        assert_eq!(by_azimuth, classifier.classify(azimuth as i32));
    }
}
