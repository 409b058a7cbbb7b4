//! Eclipses and lunar phases over a scan range.
//!
//! Eclipse instants come from the provider's global search; this module
//! walks them across the range and classifies them. Lunar phases are found
//! by sampling the Moon-Sun elongation and interpolating crossings of the
//! quarter angles.

use std::collections::BTreeSet;

use chrono::Datelike;
use gochara_core::{
    Body, EclipseFlags, EclipseHit, EphemerisProvider, SignPosition, Unavailable,
    jd_to_datetime, normalize_360, normalize_to_pm180, sign_position,
};
use tracing::{debug, warn};

use crate::event::{ALL_LUNAR_PHASES, EclipseKind, Event, EventDetail, LunarPhase};
use crate::refine::is_genuine_crossing;
use crate::settings::PhaseConfig;

/// Solar eclipse type from provider flags.
pub fn classify_solar(flags: EclipseFlags) -> EclipseKind {
    if flags.contains(EclipseFlags::TOTAL) {
        EclipseKind::TotalSolar
    } else if flags.contains(EclipseFlags::ANNULAR) {
        EclipseKind::AnnularSolar
    } else if flags.contains(EclipseFlags::PARTIAL) {
        EclipseKind::PartialSolar
    } else {
        EclipseKind::Solar
    }
}

/// Lunar eclipse type from provider flags.
pub fn classify_lunar(flags: EclipseFlags) -> EclipseKind {
    if flags.contains(EclipseFlags::TOTAL) {
        EclipseKind::TotalLunar
    } else if flags.contains(EclipseFlags::PARTIAL) {
        EclipseKind::PartialLunar
    } else if flags.contains(EclipseFlags::PENUMBRAL) {
        EclipseKind::PenumbralLunar
    } else {
        EclipseKind::Lunar
    }
}

fn position_of<P: EphemerisProvider + ?Sized>(
    provider: &P,
    body: Body,
    jd: f64,
) -> Option<SignPosition> {
    match provider.longitude_and_speed(jd, body) {
        Ok(p) => Some(sign_position(p.longitude_deg)),
        Err(u) => {
            debug!(body = body.id(), error = %u, "no position for event");
            None
        }
    }
}

/// Walk one eclipse series from `start_jd`, jumping `skip_days` past each
/// hit, until the provider runs dry or a hit passes `end_jd`.
fn walk_eclipses<F>(start_jd: f64, end_jd: f64, skip_days: f64, next: F) -> Vec<EclipseHit>
where
    F: Fn(f64) -> Option<EclipseHit>,
{
    let mut hits = Vec::new();
    let mut cursor = start_jd;
    while let Some(hit) = next(cursor) {
        if hit.jd_ut > end_jd {
            break;
        }
        if hit.jd_ut >= start_jd {
            hits.push(hit);
        }
        cursor = hit.jd_ut.max(cursor) + skip_days;
    }
    hits
}

/// Solar and lunar eclipses inside `[start_jd, end_jd]`, solar first, each
/// series in time order.
pub fn find_eclipses<P: EphemerisProvider + ?Sized>(
    provider: &P,
    start_jd: f64,
    end_jd: f64,
    config: &PhaseConfig,
) -> Vec<Event> {
    let skip = config.eclipse_skip_days;
    let solar = walk_eclipses(start_jd, end_jd, skip, |t| provider.next_solar_eclipse(t))
        .into_iter()
        .map(|hit| (hit.jd_ut, classify_solar(hit.flags)));
    let lunar = walk_eclipses(start_jd, end_jd, skip, |t| provider.next_lunar_eclipse(t))
        .into_iter()
        .map(|hit| (hit.jd_ut, classify_lunar(hit.flags)));

    solar
        .chain(lunar)
        .map(|(jd, eclipse)| {
            let body = if eclipse.is_solar() { Body::Sun } else { Body::Moon };
            Event::new(EventDetail::Eclipse {
                eclipse,
                position: position_of(provider, body, jd),
                timestamp: jd,
            })
        })
        .collect()
}

fn elongation<P: EphemerisProvider + ?Sized>(provider: &P, jd: f64) -> Result<f64, Unavailable> {
    let moon = provider.longitude_and_speed(jd, Body::Moon)?;
    let sun = provider.longitude_and_speed(jd, Body::Sun)?;
    Ok(normalize_360(moon.longitude_deg - sun.longitude_deg))
}

/// Crossing test that also accepts a sample landing exactly on target.
fn crosses(f_a: f64, f_b: f64) -> bool {
    is_genuine_crossing(f_a, f_b) || (f_b == 0.0 && f_a != 0.0 && f_a.abs() < 90.0)
}

/// Lunar phases inside `[start_jd, end_jd]`, at most one per phase per UTC
/// calendar month, in time order.
pub fn find_lunar_phases<P: EphemerisProvider + ?Sized>(
    provider: &P,
    start_jd: f64,
    end_jd: f64,
    config: &PhaseConfig,
) -> Vec<Event> {
    let step = config.lunar_phase_step_days();
    let n_steps = ((end_jd - start_jd) / step).ceil().max(0.0) as u64;

    let mut found: Vec<(f64, LunarPhase)> = Vec::new();
    let mut prev: Option<(f64, f64)> = None;
    let mut failures = 0usize;

    for k in 0..=n_steps {
        let t = (start_jd + k as f64 * step).min(end_jd);
        let e = match elongation(provider, t) {
            Ok(e) => e,
            Err(_) => {
                failures += 1;
                continue;
            }
        };
        for phase in ALL_LUNAR_PHASES {
            let target = phase.elongation_deg();
            let f_b = normalize_to_pm180(e - target);
            match prev {
                Some((t_prev, e_prev)) => {
                    let f_a = normalize_to_pm180(e_prev - target);
                    if crosses(f_a, f_b) {
                        let t_cross = t_prev + (t - t_prev) * f_a / (f_a - f_b);
                        found.push((t_cross, phase));
                    }
                }
                // Nothing earlier to bracket against; only an exact hit counts.
                None if f_b == 0.0 => found.push((t, phase)),
                None => {}
            }
        }
        prev = Some((t, e));
    }
    if failures > 0 {
        warn!(failures, "lunar phase samples unavailable");
    }

    found.sort_by(|a, b| a.0.total_cmp(&b.0));
    let mut seen = BTreeSet::new();
    found
        .into_iter()
        .filter(|&(jd, phase)| match jd_to_datetime(jd) {
            Some(dt) => seen.insert((phase, dt.year(), dt.month())),
            None => false,
        })
        .map(|(jd, phase)| {
            Event::new(EventDetail::LunarPhase {
                phase,
                position: position_of(provider, Body::Moon, jd),
                timestamp: jd,
            })
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn solar_precedence() {
        let both = EclipseFlags::TOTAL.union(EclipseFlags::ANNULAR);
        assert_eq!(classify_solar(both), EclipseKind::TotalSolar);
        assert_eq!(classify_solar(EclipseFlags::ANNULAR), EclipseKind::AnnularSolar);
        assert_eq!(classify_solar(EclipseFlags::PARTIAL), EclipseKind::PartialSolar);
        assert_eq!(classify_solar(EclipseFlags::NONE), EclipseKind::Solar);
    }

    #[test]
    fn lunar_precedence() {
        let f = EclipseFlags::PARTIAL.union(EclipseFlags::PENUMBRAL);
        assert_eq!(classify_lunar(f), EclipseKind::PartialLunar);
        assert_eq!(classify_lunar(EclipseFlags::PENUMBRAL), EclipseKind::PenumbralLunar);
        assert_eq!(classify_lunar(EclipseFlags::ANNULAR), EclipseKind::Lunar);
    }

    #[test]
    fn walk_skips_and_stops() {
        let instants = [5.0, 100.0, 300.0, 480.0, 700.0];
        let next = |t: f64| {
            instants.iter().find(|&&x| x >= t).map(|&jd| EclipseHit {
                jd_ut: jd,
                flags: EclipseFlags::TOTAL,
            })
        };
        let hits: Vec<f64> = walk_eclipses(0.0, 600.0, 170.0, next)
            .iter()
            .map(|h| h.jd_ut)
            .collect();
        // 100 is skipped by the jump past 5; 700 is past the end.
        assert_eq!(hits, vec![5.0, 300.0, 480.0]);
    }

    #[test]
    fn exact_sample_counts_once() {
        assert!(crosses(-1.0, 0.0));
        assert!(!crosses(0.0, 1.0));
        assert!(crosses(-1.0, 1.0));
        assert!(!crosses(170.0, -170.0));
    }
}
