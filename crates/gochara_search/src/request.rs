//! Calendar-date scan requests and their responses.

use std::collections::BTreeSet;
use std::time::Instant;

use chrono::{DateTime, NaiveDate, Utc};
use gochara_core::{
    ALL_BODIES, Body, EphemerisProvider, HouseCuspSet, HouseSystem, OPTIONAL_BODIES,
    SignPosition, datetime_to_jd, naive_date_to_jd, sign_position,
};
use serde::{Deserialize, Serialize};
use tracing::{info, warn};

use crate::aggregate::{Availability, build_timelines, sort_and_dedup};
use crate::error::SearchError;
use crate::event::{Event, NatalPointId};
use crate::scanner::{NatalTarget, ScanPlan, scan};
use crate::settings::ScanSettings;

fn default_true() -> bool {
    true
}

/// A point of the natal chart.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct NatalPoint {
    pub id: NatalPointId,
    pub longitude_deg: f64,
    #[serde(default)]
    pub orb_deg: Option<f64>,
}

/// Where natal house cusps come from.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "source", rename_all = "snake_case")]
pub enum NatalHouses {
    /// Twelve cusp longitudes given directly.
    Cusps {
        cusps: Vec<f64>,
        #[serde(default)]
        system: HouseSystem,
    },
    /// Cusps computed by the provider for a birth instant and place.
    Birth {
        birth: DateTime<Utc>,
        latitude_deg: f64,
        longitude_deg: f64,
        #[serde(default)]
        system: HouseSystem,
    },
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct NatalReference {
    #[serde(default)]
    pub points: Vec<NatalPoint>,
    #[serde(default)]
    pub houses: Option<NatalHouses>,
}

/// A scan over whole calendar days; `end` is inclusive.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ScanRequest {
    pub start: NaiveDate,
    pub end: NaiveDate,
    #[serde(default)]
    pub natal: Option<NatalReference>,
    #[serde(default = "default_true")]
    pub include_sky: bool,
    #[serde(default = "default_true")]
    pub include_moon: bool,
    #[serde(default)]
    pub include_optional_bodies: bool,
}

impl ScanRequest {
    pub fn new(start: NaiveDate, end: NaiveDate) -> Self {
        Self {
            start,
            end,
            natal: None,
            include_sky: true,
            include_moon: true,
            include_optional_bodies: false,
        }
    }

    /// Bodies to track, in report order.
    pub fn bodies(&self) -> Vec<Body> {
        let optional: &[Body] = if self.include_optional_bodies {
            &OPTIONAL_BODIES
        } else {
            &[]
        };
        ALL_BODIES
            .iter()
            .chain(optional)
            .copied()
            .filter(|&b| self.include_moon || b != Body::Moon)
            .collect()
    }

    /// `[start 00:00 UT, end 00:00 UT + 1 day]`.
    pub fn jd_range(&self) -> (f64, f64) {
        (naive_date_to_jd(self.start), naive_date_to_jd(self.end) + 1.0)
    }

    pub fn validate(&self) -> Result<(), SearchError> {
        if self.end < self.start {
            return Err(SearchError::InvalidRequest("end date precedes start date"));
        }
        let Some(natal) = &self.natal else {
            return Ok(());
        };
        if natal.points.iter().any(|p| p.id.as_str().trim().is_empty()) {
            return Err(SearchError::InvalidRequest("natal point id must not be empty"));
        }
        let mut ids = BTreeSet::new();
        if !natal.points.iter().all(|p| ids.insert(&p.id)) {
            return Err(SearchError::InvalidRequest("natal point ids must not repeat"));
        }
        if let Some(NatalHouses::Birth {
            latitude_deg,
            longitude_deg,
            ..
        }) = &natal.houses
        {
            if !(-90.0..=90.0).contains(latitude_deg) {
                return Err(SearchError::InvalidRequest("latitude must be in [-90, 90]"));
            }
            if !(-180.0..=180.0).contains(longitude_deg) {
                return Err(SearchError::InvalidRequest(
                    "longitude must be in [-180, 180]",
                ));
            }
        }
        Ok(())
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Period {
    pub start: NaiveDate,
    pub end: NaiveDate,
}

/// Everything reported for one body.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct BodyTimeline {
    pub body: Body,
    pub availability: Availability,
    /// Position at noon UT of the first requested day.
    pub start_position: Option<SignPosition>,
    /// Position at noon UT of the last requested day.
    pub end_position: Option<SignPosition>,
    pub events: Vec<Event>,
}

impl BodyTimeline {
    pub fn unavailable(body: Body) -> Self {
        Self {
            body,
            availability: Availability::Unavailable,
            start_position: None,
            end_position: None,
            events: Vec::new(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ScanResponse {
    pub period: Period,
    pub timelines: Vec<BodyTimeline>,
    pub eclipses: Vec<Event>,
    pub lunar_phases: Vec<Event>,
}

/// Resolve natal cusps. A provider that cannot compute them disables house
/// ingress for the scan instead of failing it.
pub fn resolve_cusps<P: EphemerisProvider + ?Sized>(
    provider: &P,
    houses: &NatalHouses,
) -> Result<Option<HouseCuspSet>, SearchError> {
    match houses {
        NatalHouses::Cusps { cusps, system } => {
            Ok(Some(HouseCuspSet::from_slice(cusps, *system)?))
        }
        NatalHouses::Birth {
            birth,
            latitude_deg,
            longitude_deg,
            system,
        } => {
            let jd = datetime_to_jd(birth);
            match provider.house_cusps(jd, *latitude_deg, *longitude_deg, *system) {
                Ok(cusps) => Ok(Some(HouseCuspSet::new(cusps, *system)?)),
                Err(u) => {
                    warn!(error = %u, "natal cusps unavailable; house ingress skipped");
                    Ok(None)
                }
            }
        }
    }
}

fn noon_position<P: EphemerisProvider + ?Sized>(
    provider: &P,
    body: Body,
    date: NaiveDate,
) -> Option<SignPosition> {
    provider
        .longitude_and_speed(naive_date_to_jd(date) + 0.5, body)
        .ok()
        .map(|p| sign_position(p.longitude_deg))
}

/// Build the plan for a request.
pub fn plan_for<P: EphemerisProvider + ?Sized>(
    provider: &P,
    request: &ScanRequest,
    deadline: Option<Instant>,
) -> Result<ScanPlan, SearchError> {
    request.validate()?;
    let (start_jd, end_jd) = request.jd_range();
    let mut plan = ScanPlan::new(start_jd, end_jd, request.bodies());
    plan.include_sky = request.include_sky;
    plan.deadline = deadline;

    if let Some(natal) = &request.natal {
        plan.natal_points = natal
            .points
            .iter()
            .map(|p| NatalTarget {
                id: p.id.clone(),
                longitude_deg: p.longitude_deg,
                orb_deg: p.orb_deg,
            })
            .collect();
        plan.natal_cusps = match &natal.houses {
            Some(h) => resolve_cusps(provider, h)?,
            None => None,
        };
    }
    Ok(plan)
}

/// Scan a calendar-date request end to end.
pub fn run_scan<P: EphemerisProvider + ?Sized>(
    provider: &P,
    request: &ScanRequest,
    settings: &ScanSettings,
    deadline: Option<Instant>,
) -> Result<ScanResponse, SearchError> {
    let plan = plan_for(provider, request, deadline)?;
    let outcome = scan(provider, &plan, settings)?;

    let mut timelines = build_timelines(&plan.bodies, outcome.body_events, &outcome.sampled);
    for timeline in timelines
        .iter_mut()
        .filter(|t| t.availability == Availability::Available)
    {
        timeline.start_position = noon_position(provider, timeline.body, request.start);
        timeline.end_position = noon_position(provider, timeline.body, request.end);
    }

    let mut eclipses = outcome.eclipses;
    sort_and_dedup(&mut eclipses);
    let mut lunar_phases = outcome.lunar_phases;
    sort_and_dedup(&mut lunar_phases);

    info!(
        start = %request.start,
        end = %request.end,
        events = timelines.iter().map(|t| t.events.len()).sum::<usize>(),
        eclipses = eclipses.len(),
        lunar_phases = lunar_phases.len(),
        "scan complete"
    );

    Ok(ScanResponse {
        period: Period {
            start: request.start,
            end: request.end,
        },
        timelines,
        eclipses,
        lunar_phases,
    })
}
