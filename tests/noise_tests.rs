/// Integration tests for the Perlin noise generator
use noise::NoiseFn;
use voxel_world::{noise as sample, PerlinNoise};

#[test]
fn test_noise_is_bit_identical_across_calls_and_instances() {
    let mut rng = fastrand::Rng::with_seed(7);
    let other = PerlinNoise::new();
    for _ in 0..1_000 {
        let (x, y, z) = (rng.f64() * 512.0 - 256.0, rng.f64() * 64.0, rng.f64() * 512.0 - 256.0);
        let a = sample(x, y, z);
        let b = sample(x, y, z);
        assert_eq!(a.to_bits(), b.to_bits());
        assert_eq!(a.to_bits(), other.get([x, y, z]).to_bits());
    }
}

#[test]
fn test_noise_stays_in_unit_range() {
    let mut rng = fastrand::Rng::with_seed(0xDEC0DE);
    let mut min = f64::MAX;
    let mut max = f64::MIN;
    for _ in 0..100_000 {
        let value = sample(
            rng.f64() * 2_000.0 - 1_000.0,
            rng.f64() * 2_000.0 - 1_000.0,
            rng.f64() * 2_000.0 - 1_000.0,
        );
        assert!((-1.0..=1.0).contains(&value), "{value} out of range");
        min = min.min(value);
        max = max.max(value);
    }
    // The sample should exercise both signs
    assert!(min < -0.3 && max > 0.3, "suspiciously flat noise: {min}..{max}");
}

#[test]
fn test_integer_lattice_points_are_zero() {
    for x in -3..3 {
        for z in -3..3 {
            assert_eq!(sample(x as f64, 0.0, z as f64), 0.0);
        }
    }
}

#[test]
fn test_noise_is_continuous() {
    // Small steps produce small changes
    let mut previous = sample(0.0, 0.3, 0.7);
    for i in 1..2_000 {
        let value = sample(i as f64 * 0.001, 0.3, 0.7);
        assert!((value - previous).abs() < 0.01);
        previous = value;
    }
}
