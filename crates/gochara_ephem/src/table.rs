//! File-backed longitude table made of Chebyshev segments.
//!
//! Each body owns a sorted list of segments. A segment covers
//! `[start_jd, start_jd + span_days]` and stores Chebyshev coefficients of
//! the body's *unwrapped* ecliptic longitude, so a segment can run across
//! 360 deg without a discontinuity. Speed comes from the derivative of the
//! series.
//!
//! Eclipse instants are listed explicitly; the table carries the result of
//! the global eclipse search rather than the geometry to redo it.

use std::collections::BTreeMap;
use std::path::Path;

use gochara_core::{
    Body, BodyPosition, EclipseFlags, EclipseHit, EphemerisProvider, HouseSystem, Unavailable,
    UnavailableReason, normalize_360,
};
use serde::{Deserialize, Serialize};
use tracing::{debug, info};

use crate::chebyshev::{clenshaw, clenshaw_derivative};
use crate::config::EphemerisConfig;
use crate::error::EphemError;

/// One Chebyshev segment of unwrapped longitude.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LongitudeSegment {
    pub start_jd: f64,
    pub span_days: f64,
    pub coefficients: Vec<f64>,
}

impl LongitudeSegment {
    fn end_jd(&self) -> f64 {
        self.start_jd + self.span_days
    }

    fn contains(&self, jd: f64) -> bool {
        jd >= self.start_jd && jd <= self.end_jd()
    }

    /// Longitude in [0, 360) and speed in deg/day at `jd`.
    fn evaluate(&self, jd: f64) -> (f64, f64) {
        let half = 0.5 * self.span_days;
        let s = ((jd - self.start_jd - half) / half).clamp(-1.0, 1.0);
        let lon = clenshaw(&self.coefficients, s);
        let dlon_ds = clenshaw_derivative(&self.coefficients, s);
        (normalize_360(lon), dlon_ds / half)
    }

    fn validate(&self) -> Result<(), &'static str> {
        if !self.start_jd.is_finite() {
            return Err("segment start_jd must be finite");
        }
        if !self.span_days.is_finite() || self.span_days <= 0.0 {
            return Err("segment span_days must be positive");
        }
        if self.coefficients.is_empty() {
            return Err("segment needs at least one coefficient");
        }
        if self.coefficients.iter().any(|c| !c.is_finite()) {
            return Err("segment coefficients must be finite");
        }
        Ok(())
    }
}

/// Eclipse type names accepted in the table file.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum EclipseKindName {
    Total,
    Annular,
    Hybrid,
    Partial,
    Penumbral,
}

impl EclipseKindName {
    fn flags(self) -> EclipseFlags {
        match self {
            Self::Total => EclipseFlags::TOTAL,
            Self::Annular => EclipseFlags::ANNULAR,
            Self::Hybrid => EclipseFlags::TOTAL.union(EclipseFlags::ANNULAR),
            Self::Partial => EclipseFlags::PARTIAL,
            Self::Penumbral => EclipseFlags::PENUMBRAL,
        }
    }
}

/// An eclipse listed in the table file.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct EclipseRecord {
    pub jd_ut: f64,
    pub kind: EclipseKindName,
}

/// On-disk layout of a longitude table.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct TableFile {
    /// Body identifier (e.g. `"MARS"`) to its segments.
    pub bodies: BTreeMap<String, Vec<LongitudeSegment>>,
    #[serde(default)]
    pub solar_eclipses: Vec<EclipseRecord>,
    #[serde(default)]
    pub lunar_eclipses: Vec<EclipseRecord>,
}

/// Ephemeris provider backed by a [`TableFile`].
#[derive(Debug, Clone)]
pub struct TableEphemeris {
    segments: BTreeMap<Body, Vec<LongitudeSegment>>,
    solar_eclipses: Vec<EclipseHit>,
    lunar_eclipses: Vec<EclipseHit>,
}

impl TableEphemeris {
    /// Load a table from the path in `config`.
    pub fn load(config: &EphemerisConfig) -> Result<Self, EphemError> {
        config.validate()?;
        Self::load_path(&config.table_path)
    }

    pub fn load_path(path: &Path) -> Result<Self, EphemError> {
        let content = std::fs::read_to_string(path).map_err(|source| EphemError::Io {
            path: path.to_path_buf(),
            source,
        })?;
        let table = Self::from_json(&content)?;
        info!(
            path = %path.display(),
            bodies = table.segments.len(),
            solar_eclipses = table.solar_eclipses.len(),
            lunar_eclipses = table.lunar_eclipses.len(),
            "loaded longitude table"
        );
        Ok(table)
    }

    /// Parse a table from its JSON text.
    pub fn from_json(content: &str) -> Result<Self, EphemError> {
        let file: TableFile = serde_json::from_str(content)?;
        Self::from_table(file)
    }

    /// Validate and index an in-memory table.
    pub fn from_table(file: TableFile) -> Result<Self, EphemError> {
        let mut segments = BTreeMap::new();
        for (name, mut segs) in file.bodies {
            let body: Body = name
                .parse()
                .map_err(|_| EphemError::InvalidTable(format!("unknown body '{name}'")))?;
            for seg in &segs {
                seg.validate()
                    .map_err(|msg| EphemError::InvalidTable(format!("{name}: {msg}")))?;
            }
            segs.sort_by(|a, b| a.start_jd.total_cmp(&b.start_jd));
            if segs.windows(2).any(|w| w[1].start_jd < w[0].end_jd() - 1e-9) {
                return Err(EphemError::InvalidTable(format!(
                    "{name}: segments overlap"
                )));
            }
            segments.insert(body, segs);
        }

        Ok(Self {
            segments,
            solar_eclipses: index_eclipses(&file.solar_eclipses)?,
            lunar_eclipses: index_eclipses(&file.lunar_eclipses)?,
        })
    }

    /// Bodies the table has data for.
    pub fn bodies(&self) -> impl Iterator<Item = Body> + '_ {
        self.segments.keys().copied()
    }

    /// Covered `[first, last]` Julian Date range for a body.
    pub fn coverage(&self, body: Body) -> Option<(f64, f64)> {
        let segs = self.segments.get(&body)?;
        Some((segs.first()?.start_jd, segs.last()?.end_jd()))
    }
}

fn index_eclipses(records: &[EclipseRecord]) -> Result<Vec<EclipseHit>, EphemError> {
    if records.iter().any(|r| !r.jd_ut.is_finite()) {
        return Err(EphemError::InvalidTable(
            "eclipse instants must be finite".to_string(),
        ));
    }
    let mut hits: Vec<EclipseHit> = records
        .iter()
        .map(|r| EclipseHit {
            jd_ut: r.jd_ut,
            flags: r.kind.flags(),
        })
        .collect();
    hits.sort_by(|a, b| a.jd_ut.total_cmp(&b.jd_ut));
    Ok(hits)
}

fn first_at_or_after(hits: &[EclipseHit], jd_ut: f64) -> Option<EclipseHit> {
    let idx = hits.partition_point(|h| h.jd_ut < jd_ut);
    hits.get(idx).copied()
}

impl EphemerisProvider for TableEphemeris {
    fn longitude_and_speed(&self, jd_ut: f64, body: Body) -> Result<BodyPosition, Unavailable> {
        let segs = self
            .segments
            .get(&body)
            .ok_or(Unavailable::new(UnavailableReason::BodyNotSupported, jd_ut))?;

        // Last segment starting at or before jd; a boundary instant belongs
        // to the later segment.
        let idx = segs.partition_point(|s| s.start_jd <= jd_ut);
        let seg = idx
            .checked_sub(1)
            .and_then(|i| segs.get(i))
            .filter(|s| s.contains(jd_ut))
            .ok_or_else(|| {
                debug!(body = body.id(), jd_ut, "epoch outside table coverage");
                Unavailable::new(UnavailableReason::OutOfRange, jd_ut)
            })?;

        let (lon, speed) = seg.evaluate(jd_ut);
        Ok(BodyPosition {
            longitude_deg: lon,
            speed_deg_per_day: Some(speed),
        })
    }

    fn house_cusps(
        &self,
        jd_ut: f64,
        _latitude_deg: f64,
        _longitude_deg: f64,
        _system: HouseSystem,
    ) -> Result<[f64; 12], Unavailable> {
        Err(Unavailable::new(UnavailableReason::Unsupported, jd_ut))
    }

    fn next_solar_eclipse(&self, jd_ut: f64) -> Option<EclipseHit> {
        first_at_or_after(&self.solar_eclipses, jd_ut)
    }

    fn next_lunar_eclipse(&self, jd_ut: f64) -> Option<EclipseHit> {
        first_at_or_after(&self.lunar_eclipses, jd_ut)
    }
}
