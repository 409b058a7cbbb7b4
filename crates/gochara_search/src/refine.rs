//! Timestamp refinement for transitions and aspect windows.
//!
//! Ingresses and stations are bisected inside their detection bracket by
//! re-classifying the body at the midpoint. Aspect exact times are
//! linearly interpolated from the signed offsets recorded around the best
//! sample. Refinement only moves timestamps; it never adds or drops
//! events.

use gochara_core::{Body, EphemerisProvider, HouseCuspSet, Sign, Unavailable, UnavailableReason};
use tracing::debug;

use crate::orb_window::{ClosedWindow, OffsetSample};
use crate::settings::RefineConfig;
use crate::state::{Transition, TransitionKind};

/// Bisect `[t_a, t_b]` for the instant `classify` stops returning `initial`.
///
/// A provider failure at a midpoint ends the search with the bracket
/// narrowed so far. Returns the midpoint of the final bracket.
fn bisect_change<T, F>(
    mut t_a: f64,
    mut t_b: f64,
    initial: T,
    config: &RefineConfig,
    classify: F,
) -> f64
where
    T: PartialEq,
    F: Fn(f64) -> Result<T, Unavailable>,
{
    for _ in 0..config.max_iterations {
        if (t_b - t_a).abs() < config.convergence_days {
            break;
        }
        let t_mid = 0.5 * (t_a + t_b);
        match classify(t_mid) {
            Ok(v) if v == initial => t_a = t_mid,
            Ok(_) => t_b = t_mid,
            Err(u) => {
                debug!(error = %u, "refinement stopped on provider failure");
                break;
            }
        }
    }
    0.5 * (t_a + t_b)
}

/// Refined instant of a transition.
pub fn refine_transition<P: EphemerisProvider + ?Sized>(
    provider: &P,
    transition: &Transition,
    cusps: Option<&HouseCuspSet>,
    config: &RefineConfig,
) -> f64 {
    let body = transition.body;
    let (t_a, t_b) = (transition.jd_before, transition.jd_after);
    match transition.kind {
        TransitionKind::Sign { from, .. } => bisect_change(t_a, t_b, from, config, |t| {
            longitude(provider, body, t).map(Sign::from_longitude)
        }),
        TransitionKind::House { from, .. } => match cusps {
            Some(c) => bisect_change(t_a, t_b, from, config, |t| {
                longitude(provider, body, t).map(|lon| c.house_of(lon))
            }),
            None => t_b,
        },
        TransitionKind::Station { retrograde } => {
            bisect_change(t_a, t_b, !retrograde, config, |t| {
                let pos = provider.longitude_and_speed(t, body)?;
                pos.speed_deg_per_day
                    .map(|v| v < 0.0)
                    .ok_or(Unavailable::new(UnavailableReason::Unsupported, t))
            })
        }
    }
}

fn longitude<P: EphemerisProvider + ?Sized>(
    provider: &P,
    body: Body,
    jd: f64,
) -> Result<f64, Unavailable> {
    provider.longitude_and_speed(jd, body).map(|p| p.longitude_deg)
}

/// Check if a sign change is a genuine zero crossing rather than a jump
/// across the ±180 seam.
pub(crate) fn is_genuine_crossing(f_a: f64, f_b: f64) -> bool {
    f_a * f_b < 0.0 && (f_a - f_b).abs() < 270.0
}

fn interpolate_zero((t_a, f_a): OffsetSample, (t_b, f_b): OffsetSample) -> f64 {
    t_a + (t_b - t_a) * f_a / (f_a - f_b)
}

/// Exact instant of an aspect window.
///
/// Only the first bracket with a genuine sign change is used, so a window
/// that passes exact more than once (near a station) reports the first
/// pass. Without a crossing the best sample stands.
pub fn refine_exact(window: &ClosedWindow) -> f64 {
    let best = window.best;
    let exact = if best.1 == 0.0 {
        best.0
    } else {
        [window.before_best.map(|b| (b, best)), window.after_best.map(|a| (best, a))]
            .into_iter()
            .flatten()
            .find(|&(a, b)| is_genuine_crossing(a.1, b.1))
            .map(|(a, b)| interpolate_zero(a, b))
            .unwrap_or(best.0)
    };
    exact.clamp(window.opened_jd, window.closed_jd)
}
