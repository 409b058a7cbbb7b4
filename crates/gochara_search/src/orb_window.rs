//! Orb windows for aspect events.
//!
//! Every (body, counterpart, aspect) key is an independent state machine:
//! closed until the distance from exact drops inside the orb, open while it
//! stays inside, and closed again (emitting a [`ClosedWindow`]) on the first
//! sample back outside. Windows still open when the scan ends are
//! force-closed at the final sample.

use std::collections::BTreeMap;

use gochara_core::{AspectKind, Body, aspect_distance, signed_aspect_offset};

use crate::event::{Counterpart, NatalPointId};
use crate::settings::OrbTable;

#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct WindowKey {
    pub body: Body,
    pub counterpart: Counterpart,
    pub aspect: AspectKind,
}

/// `(jd, signed offset from exact)` for one sample of a key.
pub type OffsetSample = (f64, f64);

#[derive(Debug, Clone, Copy, PartialEq)]
struct OrbWindow {
    orb_deg: f64,
    opened_jd: f64,
    best_distance_deg: f64,
    best: OffsetSample,
    /// In-window sample just before the best one.
    before_best: Option<OffsetSample>,
    /// Sample just after the best one; may be the closing sample.
    after_best: Option<OffsetSample>,
    last: OffsetSample,
}

/// A finished window, ready to become an aspect event.
#[derive(Debug, Clone, PartialEq)]
pub struct ClosedWindow {
    pub key: WindowKey,
    pub orb_deg: f64,
    pub opened_jd: f64,
    pub best_jd: f64,
    pub best_distance_deg: f64,
    pub closed_jd: f64,
    /// Closed by the end of the scan rather than by leaving the orb.
    pub forced: bool,
    pub before_best: Option<OffsetSample>,
    pub best: OffsetSample,
    pub after_best: Option<OffsetSample>,
}

/// Orb for a pair of moving bodies.
pub fn transit_pair_orb(orbs: &OrbTable, a: Body, b: Body) -> f64 {
    orbs.orb(a).min(orbs.orb(b))
}

/// Orb for a moving body against a natal point.
///
/// The point's own orb wins; otherwise a point named after a body borrows
/// that body's orb, and anything else falls back to the moving body's.
pub fn natal_pair_orb(
    orbs: &OrbTable,
    body: Body,
    point: &NatalPointId,
    point_orb: Option<f64>,
) -> f64 {
    let natal = point_orb
        .or_else(|| point.as_body().map(|b| orbs.orb(b)))
        .unwrap_or_else(|| orbs.orb(body));
    orbs.orb(body).min(natal)
}

#[derive(Debug, Default)]
pub struct OrbWindowEngine {
    windows: BTreeMap<WindowKey, OrbWindow>,
    closed: Vec<ClosedWindow>,
}

impl OrbWindowEngine {
    pub fn new() -> Self {
        Self::default()
    }

    /// Feed the longitudes of both sides of `key` at `jd`.
    pub fn update(&mut self, key: WindowKey, orb_deg: f64, jd: f64, lon_a: f64, lon_b: f64) {
        let target = key.aspect.angle_deg();
        let distance = aspect_distance(lon_a, lon_b, target);
        let offset = signed_aspect_offset(lon_a, lon_b, target);
        let inside = distance <= orb_deg;

        match (self.windows.get_mut(&key), inside) {
            (None, false) => {}
            (None, true) => {
                self.windows.insert(
                    key,
                    OrbWindow {
                        orb_deg,
                        opened_jd: jd,
                        best_distance_deg: distance,
                        best: (jd, offset),
                        before_best: None,
                        after_best: None,
                        last: (jd, offset),
                    },
                );
            }
            (Some(w), true) => {
                if distance < w.best_distance_deg {
                    w.before_best = Some(w.last);
                    w.best = (jd, offset);
                    w.best_distance_deg = distance;
                    w.after_best = None;
                } else if w.after_best.is_none() {
                    w.after_best = Some((jd, offset));
                }
                w.last = (jd, offset);
            }
            (Some(w), false) => {
                if w.after_best.is_none() {
                    w.after_best = Some((jd, offset));
                }
                if let Some(w) = self.windows.remove(&key) {
                    self.closed.push(close(key, w, jd, false));
                }
            }
        }
    }

    /// Close every live window at `final_jd`, in key order.
    pub fn flush(&mut self, final_jd: f64) {
        let live = std::mem::take(&mut self.windows);
        self.closed.extend(
            live.into_iter()
                .map(|(key, w)| close(key, w, final_jd, true)),
        );
    }

    pub fn open_count(&self) -> usize {
        self.windows.len()
    }

    pub fn closed(&self) -> &[ClosedWindow] {
        &self.closed
    }

    pub fn into_closed(self) -> Vec<ClosedWindow> {
        self.closed
    }
}

fn close(key: WindowKey, w: OrbWindow, closed_jd: f64, forced: bool) -> ClosedWindow {
    ClosedWindow {
        key,
        orb_deg: w.orb_deg,
        opened_jd: w.opened_jd,
        best_jd: w.best.0,
        best_distance_deg: w.best_distance_deg,
        closed_jd,
        forced,
        before_best: w.before_best,
        best: w.best,
        after_best: w.after_best,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn key() -> WindowKey {
        WindowKey {
            body: Body::Mars,
            counterpart: Counterpart::Natal(NatalPointId::new("SUN")),
            aspect: AspectKind::Conjunction,
        }
    }

    #[test]
    fn open_best_close() {
        let mut e = OrbWindowEngine::new();
        // natal point at 100, orb 1.0
        e.update(key(), 1.0, 0.0, 101.5, 100.0);
        assert_eq!(e.open_count(), 0);
        e.update(key(), 1.0, 1.0, 100.8, 100.0);
        assert_eq!(e.open_count(), 1);
        e.update(key(), 1.0, 2.0, 101.3, 100.0);
        assert_eq!(e.open_count(), 0);

        let closed = e.into_closed();
        assert_eq!(closed.len(), 1);
        let w = &closed[0];
        assert_eq!(w.opened_jd, 1.0);
        assert_eq!(w.best_jd, 1.0);
        assert_eq!(w.closed_jd, 2.0);
        assert!(!w.forced);
        assert!((w.best_distance_deg - 0.8).abs() < 1e-9);
        assert_eq!(w.before_best, None);
        assert_eq!(w.after_best.map(|s| s.0), Some(2.0));
    }

    #[test]
    fn best_moves_only_on_strict_improvement() {
        let mut e = OrbWindowEngine::new();
        e.update(key(), 2.0, 0.0, 101.0, 100.0);
        e.update(key(), 2.0, 1.0, 99.0, 100.0);
        e.update(key(), 2.0, 2.0, 99.5, 100.0);
        e.update(key(), 2.0, 3.0, 97.0, 100.0);
        let w = &e.closed()[0];
        assert_eq!(w.best_jd, 2.0);
        assert_eq!(w.before_best.map(|s| s.0), Some(1.0));
        assert_eq!(w.after_best.map(|s| s.0), Some(3.0));
    }

    #[test]
    fn flush_force_closes_at_final_sample() {
        let mut e = OrbWindowEngine::new();
        e.update(key(), 1.0, 0.0, 100.5, 100.0);
        e.flush(5.0);
        let closed = e.into_closed();
        assert_eq!(closed.len(), 1);
        assert_eq!(closed[0].closed_jd, 5.0);
        assert!(closed[0].forced);
    }

    #[test]
    fn keys_are_independent() {
        let mut e = OrbWindowEngine::new();
        let square = WindowKey {
            aspect: AspectKind::Square,
            ..key()
        };
        e.update(key(), 1.0, 0.0, 100.5, 100.0);
        e.update(square.clone(), 1.0, 0.0, 190.5, 100.0);
        assert_eq!(e.open_count(), 2);
        e.update(key(), 1.0, 1.0, 110.0, 100.0);
        assert_eq!(e.open_count(), 1);
    }

    #[test]
    fn natal_orb_precedence() {
        let orbs = OrbTable::default();
        let sun = NatalPointId::new("SUN");
        let asc = NatalPointId::new("ASC");
        // Moon 6 vs natal Sun 4
        assert_eq!(natal_pair_orb(&orbs, Body::Moon, &sun, None), 4.0);
        // explicit point orb
        assert_eq!(natal_pair_orb(&orbs, Body::Moon, &sun, Some(1.0)), 1.0);
        // unnamed point borrows the moving body's orb
        assert_eq!(natal_pair_orb(&orbs, Body::Mars, &asc, None), 2.5);
        assert_eq!(transit_pair_orb(&orbs, Body::Moon, Body::Pluto), 1.5);
    }
}
