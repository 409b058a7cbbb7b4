//! Angle primitives on the ecliptic circle.
//!
//! Every comparison in the engine goes through these helpers, so all
//! longitudes are brought into [0, 360) before they meet each other.

/// Normalize an angle to [0, 360) degrees.
pub fn normalize_360(deg: f64) -> f64 {
    let r = deg % 360.0;
    // `-1e-17 % 360 + 360` rounds to exactly 360.0.
    if r < 0.0 {
        let wrapped = r + 360.0;
        if wrapped >= 360.0 { 0.0 } else { wrapped }
    } else {
        r
    }
}

/// Normalize an angle to (-180, +180].
pub fn normalize_to_pm180(deg: f64) -> f64 {
    let mut d = deg % 360.0;
    if d > 180.0 {
        d -= 360.0;
    } else if d <= -180.0 {
        d += 360.0;
    }
    d
}

/// Shortest-path separation between two longitudes, in [0, 180].
pub fn angular_separation(a: f64, b: f64) -> f64 {
    let diff = (normalize_360(a) - normalize_360(b)).abs();
    if diff > 180.0 { 360.0 - diff } else { diff }
}

/// Distance of a pair's separation from an aspect's target angle, in [0, 180].
///
/// A pair is inside the orb of an aspect when this value is `<= orb`.
pub fn aspect_distance(a: f64, b: f64, target_deg: f64) -> f64 {
    (angular_separation(a, b) - target_deg).abs()
}

/// Signed offset of `a - b` from the nearer of `+target` and `-target`.
///
/// Its absolute value equals [`aspect_distance`] whenever the pair is
/// within 90 degrees of the aspect, and unlike the distance it changes
/// sign when the pair passes through exactness, which is what the
/// interpolating refiner needs.
pub fn signed_aspect_offset(a: f64, b: f64, target_deg: f64) -> f64 {
    let delta = normalize_to_pm180(normalize_360(a) - normalize_360(b));
    let plus = normalize_to_pm180(delta - target_deg);
    let minus = normalize_to_pm180(delta + target_deg);
    if plus.abs() <= minus.abs() { plus } else { minus }
}
