//! Property-based tests for the binaura-core protocol and math.
//!
//! Exercises azimuth wrapping, settings clamping invariants, and the
//! bounds of the polar-position conversion with randomized inputs.

use proptest::prelude::*;

use binaura_core::{
    DISTANCE_EPSILON, Param, Quat, SpatialSettings, Transform, Vec3, polar_position, wrap_azimuth,
};

proptest! {
    #![proptest_config(ProptestConfig::with_cases(500))]

    /// Wrapping any finite angle lands in [-180, 180] and is a fixed point.
    #[test]
    fn wrap_azimuth_lands_in_window_and_stays(angle in -100_000.0f32..100_000.0f32) {
        let wrapped = wrap_azimuth(angle);
        prop_assert!((-180.0..=180.0).contains(&wrapped), "wrap({angle}) = {wrapped}");
        prop_assert_eq!(wrap_azimuth(wrapped), wrapped);
    }

    /// After any sequence of min/max attenuation writes, min <= max and
    /// both stay inside [0.1, 10].
    #[test]
    fn attenuation_ordering_holds(writes in prop::collection::vec((any::<bool>(), -5.0f32..20.0f32), 1..32)) {
        let mut settings = SpatialSettings::default();
        for (is_min, value) in writes {
            if is_min {
                settings.set_min_attenuation(value);
            } else {
                settings.set_max_attenuation(value);
            }
            let min = settings.min_attenuation();
            let max = settings.max_attenuation();
            prop_assert!(min <= max, "min {min} > max {max}");
            prop_assert!((0.1..=10.0).contains(&min));
            prop_assert!((0.1..=10.0).contains(&max));
        }
    }

    /// Every generic set leaves the read-back value inside the external
    /// scale, whatever the input.
    #[test]
    fn generic_set_stays_in_scale(
        which in 0usize..Param::ALL.len(),
        value in -10_000.0f32..10_000.0f32,
    ) {
        let param = Param::ALL[which];
        let mut settings = SpatialSettings::default();
        settings.set(param, value);
        let spec = param.spec();
        let read = settings.get(param);
        prop_assert!(
            read >= spec.min && read <= spec.max,
            "{} read back {read} outside [{}, {}]",
            param.name(),
            spec.min,
            spec.max
        );
    }

    /// Polar output is always bounded: azimuth in [-180, 180], elevation in
    /// [-90, 90], distance >= epsilon, for any listener pose.
    #[test]
    fn polar_position_is_bounded(
        sx in -100.0f32..100.0, sy in -100.0f32..100.0, sz in -100.0f32..100.0,
        lx in -100.0f32..100.0, ly in -100.0f32..100.0, lz in -100.0f32..100.0,
        ax in -1.0f32..1.0, ay in -1.0f32..1.0, az in -1.0f32..1.0,
        angle in -6.3f32..6.3,
    ) {
        let listener = Transform::new(
            Vec3::new(lx, ly, lz),
            Quat::from_axis_angle(Vec3::new(ax, ay, az), angle),
        );
        let polar = polar_position(Vec3::new(sx, sy, sz), &listener);
        prop_assert!((-180.0..=180.0).contains(&polar.azimuth), "azimuth {}", polar.azimuth);
        prop_assert!((-90.0..=90.0).contains(&polar.elevation), "elevation {}", polar.elevation);
        prop_assert!(polar.distance >= DISTANCE_EPSILON, "distance {}", polar.distance);
    }

    /// Rotating into local space preserves distance (up to float error).
    #[test]
    fn polar_distance_matches_world_distance(
        sx in -50.0f32..50.0, sy in -50.0f32..50.0, sz in -50.0f32..50.0,
        angle in -3.1f32..3.1,
    ) {
        let listener = Transform::new(
            Vec3::ZERO,
            Quat::from_axis_angle(Vec3::new(0.0, 1.0, 0.0), angle),
        );
        let source = Vec3::new(sx, sy, sz);
        let world = source.length().max(DISTANCE_EPSILON);
        let polar = polar_position(source, &listener);
        prop_assert!(
            (polar.distance - world).abs() < 1e-2 * world.max(1.0),
            "local {} vs world {world}",
            polar.distance
        );
    }
}
