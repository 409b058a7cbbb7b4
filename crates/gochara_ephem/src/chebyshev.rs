//! Chebyshev series evaluation via the Clenshaw recurrence.

/// Evaluate `sum(c_k * T_k(s))` for normalised time `s` in `[-1, 1]`.
pub fn clenshaw(coeffs: &[f64], s: f64) -> f64 {
    match coeffs {
        [] => 0.0,
        [c0] => *c0,
        [c0, rest @ ..] => {
            let two_s = 2.0 * s;
            let (b1, b2) = rest
                .iter()
                .rev()
                .fold((0.0, 0.0), |(b1, b2), &c| (two_s * b1 - b2 + c, b1));
            s * b1 - b2 + c0
        }
    }
}

/// Evaluate `sum(c_k * T_k'(s))`, the derivative with respect to `s`.
///
/// Walks the forward recurrence for `T_k` and `T_k'` together:
/// `T_k' = 2 T_{k-1} + 2 s T_{k-1}' - T_{k-2}'`.
pub fn clenshaw_derivative(coeffs: &[f64], s: f64) -> f64 {
    if coeffs.len() <= 1 {
        return 0.0;
    }
    let two_s = 2.0 * s;
    let (mut t2, mut dt2) = (1.0, 0.0);
    let (mut t1, mut dt1) = (s, 1.0);
    let mut result = coeffs[1];

    for &c in &coeffs[2..] {
        let t = two_s * t1 - t2;
        let dt = 2.0 * t1 + two_s * dt1 - dt2;
        result += c * dt;
        (t2, dt2) = (t1, dt1);
        (t1, dt1) = (t, dt);
    }
    result
}
