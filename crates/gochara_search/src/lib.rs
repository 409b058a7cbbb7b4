//! Transit event search engine.
//!
//! This crate provides:
//! - Sign, house and station transitions per body, refined by bisection
//! - Aspect orb windows against natal points and between moving bodies
//! - Eclipses and lunar phases over the scan range
//! - Calendar-date requests and per-body timeline responses
//!
//! Positions come from any [`gochara_core::EphemerisProvider`]. A scan is a
//! pure function of the provider, the request and the settings.

pub mod aggregate;
pub mod eclipse_phase;
pub mod error;
pub mod event;
pub mod orb_window;
pub mod refine;
pub mod request;
pub mod scanner;
pub mod settings;
pub mod state;

pub use aggregate::{Availability, build_timelines, sort_and_dedup};
pub use eclipse_phase::{classify_lunar, classify_solar, find_eclipses, find_lunar_phases};
pub use error::SearchError;
pub use event::{
    ALL_LUNAR_PHASES, AspectOrigin, Counterpart, EclipseKind, Event, EventDetail, EventKind,
    LunarPhase, NatalPointId,
};
pub use orb_window::{
    ClosedWindow, OrbWindowEngine, WindowKey, natal_pair_orb, transit_pair_orb,
};
pub use refine::{refine_exact, refine_transition};
pub use request::{
    BodyTimeline, NatalHouses, NatalPoint, NatalReference, Period, ScanRequest, ScanResponse,
    plan_for, resolve_cusps, run_scan,
};
pub use scanner::{NatalTarget, ScanOutcome, ScanPlan, scan};
pub use settings::{CadenceTable, OrbTable, PhaseConfig, RefineConfig, ScanSettings};
pub use state::{DiscreteState, Sample, StateTracker, Transition, TransitionKind};
