//! Property tests for the angle primitives.

use gochara_core::{
    ALL_ASPECTS, angular_separation, aspect_distance, normalize_360, signed_aspect_offset,
};
use proptest::prelude::*;

proptest! {
    #[test]
    fn normalized_is_in_range(a in -1.0e6f64..1.0e6) {
        let n = normalize_360(a);
        prop_assert!((0.0..360.0).contains(&n), "n = {}", n);
    }

    #[test]
    fn separation_is_symmetric(a in -720.0f64..720.0, b in -720.0f64..720.0) {
        let ab = angular_separation(a, b);
        let ba = angular_separation(b, a);
        prop_assert!((ab - ba).abs() < 1e-9, "ab = {}, ba = {}", ab, ba);
    }

    #[test]
    fn separation_in_range(a in -720.0f64..720.0, b in -720.0f64..720.0) {
        let s = angular_separation(a, b);
        prop_assert!((0.0..=180.0).contains(&s), "s = {}", s);
    }

    #[test]
    fn separation_invariant_under_full_turns(a in 0.0f64..360.0, b in 0.0f64..360.0, k in -3i32..3) {
        let shifted = angular_separation(a + 360.0 * k as f64, b);
        prop_assert!((shifted - angular_separation(a, b)).abs() < 1e-8);
    }

    #[test]
    fn aspect_distance_zero_when_exact(b in 0.0f64..360.0, idx in 0usize..5) {
        let aspect = ALL_ASPECTS[idx];
        let a = b + aspect.angle_deg();
        prop_assert!(aspect_distance(a, b, aspect.angle_deg()) < 1e-9);
    }

    #[test]
    fn aspect_distance_in_range(a in 0.0f64..360.0, b in 0.0f64..360.0, idx in 0usize..5) {
        let d = aspect_distance(a, b, ALL_ASPECTS[idx].angle_deg());
        prop_assert!((0.0..=180.0).contains(&d));
    }

    #[test]
    fn signed_offset_magnitude_matches_distance_inside_orb(
        b in 0.0f64..360.0,
        off in -10.0f64..10.0,
        idx in 0usize..5,
    ) {
        let target = ALL_ASPECTS[idx].angle_deg();
        let a = b + target + off;
        let d = aspect_distance(a, b, target);
        let s = signed_aspect_offset(a, b, target);
        prop_assert!((d - s.abs()).abs() < 1e-8, "d = {}, s = {}", d, s);
    }
}

#[test]
fn distance_positive_when_not_exact() {
    assert!(aspect_distance(0.0, 61.0, 60.0) > 0.0);
}
