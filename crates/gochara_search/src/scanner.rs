//! The timeline scanner.
//!
//! Walks `[start_jd, end_jd]` on the fast-cadence base tick, sampling each
//! body on its own stride, and feeds the samples to the state tracker and
//! the orb-window engine. After the walk it refines what was found and
//! collects eclipses and lunar phases.

use std::collections::{BTreeMap, BTreeSet};
use std::time::Instant;

use gochara_core::{ALL_ASPECTS, Body, EphemerisProvider, HouseCuspSet};
use tracing::{debug, info, info_span};

use crate::eclipse_phase::{find_eclipses, find_lunar_phases};
use crate::error::SearchError;
use crate::event::{Counterpart, Event, EventDetail, NatalPointId};
use crate::orb_window::{
    ClosedWindow, OrbWindowEngine, WindowKey, natal_pair_orb, transit_pair_orb,
};
use crate::refine::{refine_exact, refine_transition};
use crate::settings::ScanSettings;
use crate::state::{Sample, StateTracker, Transition, TransitionKind};

/// A fixed point of the natal chart.
#[derive(Debug, Clone, PartialEq)]
pub struct NatalTarget {
    pub id: NatalPointId,
    pub longitude_deg: f64,
    /// Overrides the orb table for this point.
    pub orb_deg: Option<f64>,
}

/// Everything one scan needs, in Julian Dates.
#[derive(Debug, Clone)]
pub struct ScanPlan {
    pub start_jd: f64,
    pub end_jd: f64,
    /// Bodies to sample, in report order.
    pub bodies: Vec<Body>,
    pub natal_points: Vec<NatalTarget>,
    pub natal_cusps: Option<HouseCuspSet>,
    /// Track aspects between moving bodies.
    pub include_sky: bool,
    pub deadline: Option<Instant>,
}

impl ScanPlan {
    pub fn new(start_jd: f64, end_jd: f64, bodies: Vec<Body>) -> Self {
        Self {
            start_jd,
            end_jd,
            bodies,
            natal_points: Vec::new(),
            natal_cusps: None,
            include_sky: true,
            deadline: None,
        }
    }

    fn validate(&self) -> Result<(), &'static str> {
        if !self.start_jd.is_finite() || !self.end_jd.is_finite() {
            return Err("scan range must be finite");
        }
        if self.end_jd <= self.start_jd {
            return Err("end_jd must be after start_jd");
        }
        if self
            .natal_points
            .iter()
            .any(|p| !p.longitude_deg.is_finite())
        {
            return Err("natal longitudes must be finite");
        }
        if self
            .natal_points
            .iter()
            .filter_map(|p| p.orb_deg)
            .any(|o| !o.is_finite() || o <= 0.0 || o >= 90.0)
        {
            return Err("natal orbs must be finite and in (0, 90) degrees");
        }
        let mut seen = BTreeSet::new();
        if !self.bodies.iter().all(|b| seen.insert(*b)) {
            return Err("bodies must not repeat");
        }
        let mut ids = BTreeSet::new();
        if !self.natal_points.iter().all(|p| ids.insert(&p.id)) {
            return Err("natal point ids must not repeat");
        }
        Ok(())
    }
}

/// Raw scan output before it is shaped into a response.
#[derive(Debug, Clone, Default)]
pub struct ScanOutcome {
    /// Events per body, unsorted. Sky-pair aspects appear under both bodies.
    pub body_events: BTreeMap<Body, Vec<Event>>,
    /// Bodies with at least one successful sample.
    pub sampled: BTreeSet<Body>,
    pub eclipses: Vec<Event>,
    pub lunar_phases: Vec<Event>,
}

fn check_deadline(deadline: Option<Instant>) -> Result<(), SearchError> {
    match deadline {
        Some(d) if Instant::now() >= d => Err(SearchError::DeadlineExceeded),
        _ => Ok(()),
    }
}

/// Run a scan.
pub fn scan<P: EphemerisProvider + ?Sized>(
    provider: &P,
    plan: &ScanPlan,
    settings: &ScanSettings,
) -> Result<ScanOutcome, SearchError> {
    settings.validate().map_err(SearchError::InvalidConfig)?;
    plan.validate().map_err(SearchError::InvalidRequest)?;

    let _span = info_span!(
        "scan",
        start_jd = plan.start_jd,
        end_jd = plan.end_jd,
        bodies = plan.bodies.len()
    )
    .entered();

    let step = settings.cadence.base_step_days();
    let last_tick = ((plan.end_jd - plan.start_jd) / step - 1e-6).ceil().max(1.0) as u64;
    let strides: Vec<(Body, u64)> = plan
        .bodies
        .iter()
        .map(|&b| (b, settings.cadence.stride(b.cadence_class())))
        .collect();

    let cusps = plan.natal_cusps.as_ref();
    let mut tracker = StateTracker::new(cusps);
    let mut windows = OrbWindowEngine::new();
    let mut current: Vec<(Body, f64)> = Vec::with_capacity(strides.len());
    let mut due = vec![false; strides.len()];
    let mut failures = 0usize;

    for tick in 0..=last_tick {
        check_deadline(plan.deadline)?;
        let t = (plan.start_jd + tick as f64 * step).min(plan.end_jd);
        let is_last = tick == last_tick;

        for (slot, &(_, stride)) in due.iter_mut().zip(&strides) {
            *slot = is_last || tick % stride == 0;
        }
        let due_count = due.iter().filter(|&&d| d).count();

        current.clear();
        for (i, &(body, _)) in strides.iter().enumerate() {
            // A body off its own stride is still sampled when a sky partner
            // is due, so every pair runs at the finer of the two cadences.
            let partner_due = plan.include_sky && due_count > usize::from(due[i]);
            if !due[i] && !partner_due {
                continue;
            }
            match provider.longitude_and_speed(t, body) {
                Ok(pos) => {
                    if !pos.longitude_deg.is_finite() {
                        return Err(SearchError::Internal(format!(
                            "non-finite longitude for {} at JD {t}",
                            body.id()
                        )));
                    }
                    let sample = Sample::new(t, pos);
                    tracker.observe(body, &sample);
                    current.push((body, sample.longitude_deg));
                }
                Err(u) => {
                    failures += 1;
                    debug!(body = body.id(), error = %u, "sample skipped");
                }
            }
        }

        for &(body, lon) in &current {
            for point in &plan.natal_points {
                let orb = natal_pair_orb(&settings.orbs, body, &point.id, point.orb_deg);
                for aspect in ALL_ASPECTS {
                    let key = WindowKey {
                        body,
                        counterpart: Counterpart::Natal(point.id.clone()),
                        aspect,
                    };
                    windows.update(key, orb, t, lon, point.longitude_deg);
                }
            }
        }

        if plan.include_sky {
            for (i, &(a, lon_a)) in current.iter().enumerate() {
                for &(b, lon_b) in &current[i + 1..] {
                    let orb = transit_pair_orb(&settings.orbs, a, b);
                    for aspect in ALL_ASPECTS {
                        let key = WindowKey {
                            body: a,
                            counterpart: Counterpart::Transit(b),
                            aspect,
                        };
                        windows.update(key, orb, t, lon_a, lon_b);
                    }
                }
            }
        }
    }

    windows.flush(plan.end_jd);

    let sampled: BTreeSet<Body> = plan
        .bodies
        .iter()
        .copied()
        .filter(|&b| tracker.has_sampled(b))
        .collect();
    let transitions = tracker.into_transitions();
    let closed = windows.into_closed();
    info!(
        ticks = last_tick + 1,
        failures,
        transitions = transitions.len(),
        windows = closed.len(),
        "sampling finished"
    );

    let mut body_events: BTreeMap<Body, Vec<Event>> = BTreeMap::new();
    for tr in &transitions {
        check_deadline(plan.deadline)?;
        let jd = refine_transition(provider, tr, cusps, &settings.refine);
        body_events
            .entry(tr.body)
            .or_default()
            .push(transition_event(tr, jd));
    }
    for w in &closed {
        let event = aspect_event(w)?;
        if let Counterpart::Transit(other) = w.key.counterpart {
            body_events.entry(other).or_default().push(event.clone());
        }
        body_events.entry(w.key.body).or_default().push(event);
    }

    check_deadline(plan.deadline)?;
    let eclipses = find_eclipses(provider, plan.start_jd, plan.end_jd, &settings.phases);
    let lunar_phases = find_lunar_phases(provider, plan.start_jd, plan.end_jd, &settings.phases);

    Ok(ScanOutcome {
        body_events,
        sampled,
        eclipses,
        lunar_phases,
    })
}

fn transition_event(tr: &Transition, jd: f64) -> Event {
    let body = tr.body;
    let detail = match tr.kind {
        TransitionKind::Sign { from, to } => EventDetail::SignIngress {
            body,
            from,
            to,
            timestamp: jd,
        },
        TransitionKind::House { from, to } => EventDetail::HouseIngress {
            body,
            from,
            to,
            timestamp: jd,
        },
        TransitionKind::Station { retrograde: true } => EventDetail::StationStart {
            body,
            timestamp: jd,
        },
        TransitionKind::Station { retrograde: false } => EventDetail::StationEnd {
            body,
            timestamp: jd,
        },
    };
    Event::new(detail)
}

fn aspect_event(w: &ClosedWindow) -> Result<Event, SearchError> {
    let exact = refine_exact(w);
    if !(w.opened_jd <= exact && exact <= w.closed_jd) {
        return Err(SearchError::Internal(format!(
            "aspect window out of order: open {} exact {exact} close {}",
            w.opened_jd, w.closed_jd
        )));
    }
    Ok(Event::new(EventDetail::AspectFormed {
        body: w.key.body,
        counterpart: w.key.counterpart.clone(),
        aspect: w.key.aspect,
        origin: w.key.counterpart.origin(),
        orb_deg: w.orb_deg,
        best_distance_deg: w.best_distance_deg,
        window_open: w.opened_jd,
        exact,
        window_close: w.closed_jd,
    }))
}
