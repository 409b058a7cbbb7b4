//! The ephemeris provider contract.
//!
//! The search engine never computes planetary positions itself. Everything
//! it needs from astronomy goes through [`EphemerisProvider`], and a
//! per-instant failure comes back as an explicit [`Unavailable`] instead of
//! aborting the scan.

use std::fmt::{Display, Formatter};

use serde::{Deserialize, Serialize};

use crate::body::Body;
use crate::house::HouseSystem;

/// Ecliptic longitude (and optionally speed) of a body at one instant.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct BodyPosition {
    /// Ecliptic longitude in degrees, [0, 360).
    pub longitude_deg: f64,
    /// Longitude speed in degrees per day, when the provider supplies it.
    pub speed_deg_per_day: Option<f64>,
}

/// Why a provider could not answer.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum UnavailableReason {
    /// The provider has no data for this body at all.
    BodyNotSupported,
    /// The instant lies outside the provider's data range.
    OutOfRange,
    /// The provider does not implement this computation.
    Unsupported,
    /// The underlying computation failed.
    ComputationFailed,
}

/// A provider-side failure for one request. Never fatal to a scan.
#[derive(Debug, Clone, Copy, PartialEq, thiserror::Error)]
#[error("{reason} at JD {jd_ut}")]
pub struct Unavailable {
    pub reason: UnavailableReason,
    pub jd_ut: f64,
}

impl Unavailable {
    pub fn new(reason: UnavailableReason, jd_ut: f64) -> Self {
        Self { reason, jd_ut }
    }
}

impl Display for UnavailableReason {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::BodyNotSupported => f.write_str("body not supported"),
            Self::OutOfRange => f.write_str("epoch out of range"),
            Self::Unsupported => f.write_str("computation not supported"),
            Self::ComputationFailed => f.write_str("computation failed"),
        }
    }
}

/// Eclipse type bits reported by a provider alongside an eclipse instant.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
pub struct EclipseFlags(u32);

impl EclipseFlags {
    pub const NONE: Self = Self(0);
    pub const TOTAL: Self = Self(1 << 0);
    pub const ANNULAR: Self = Self(1 << 1);
    pub const PARTIAL: Self = Self(1 << 2);
    pub const PENUMBRAL: Self = Self(1 << 3);

    pub const fn from_bits(bits: u32) -> Self {
        Self(bits)
    }

    pub const fn bits(self) -> u32 {
        self.0
    }

    pub const fn contains(self, other: Self) -> bool {
        other.0 != 0 && self.0 & other.0 == other.0
    }

    pub const fn union(self, other: Self) -> Self {
        Self(self.0 | other.0)
    }
}

/// An eclipse instant found by a provider's global search.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct EclipseHit {
    /// Instant of greatest eclipse, Julian Date UT.
    pub jd_ut: f64,
    pub flags: EclipseFlags,
}

/// Source of body positions, house cusps and eclipse instants.
///
/// Implementations must be deterministic: the same request always yields
/// the same answer. They are shared read-only across scans.
pub trait EphemerisProvider: Send + Sync {
    /// Ecliptic longitude in [0, 360) and, if available, speed in deg/day.
    fn longitude_and_speed(&self, jd_ut: f64, body: Body) -> Result<BodyPosition, Unavailable>;

    /// Twelve house cusps for an instant and geographic location.
    fn house_cusps(
        &self,
        jd_ut: f64,
        latitude_deg: f64,
        longitude_deg: f64,
        system: HouseSystem,
    ) -> Result<[f64; 12], Unavailable>;

    /// First solar eclipse at or after `jd_ut`.
    fn next_solar_eclipse(&self, jd_ut: f64) -> Option<EclipseHit>;

    /// First lunar eclipse at or after `jd_ut`.
    fn next_lunar_eclipse(&self, jd_ut: f64) -> Option<EclipseHit>;
}

impl<P: EphemerisProvider + ?Sized> EphemerisProvider for &P {
    fn longitude_and_speed(&self, jd_ut: f64, body: Body) -> Result<BodyPosition, Unavailable> {
        (**self).longitude_and_speed(jd_ut, body)
    }

    fn house_cusps(
        &self,
        jd_ut: f64,
        latitude_deg: f64,
        longitude_deg: f64,
        system: HouseSystem,
    ) -> Result<[f64; 12], Unavailable> {
        (**self).house_cusps(jd_ut, latitude_deg, longitude_deg, system)
    }

    fn next_solar_eclipse(&self, jd_ut: f64) -> Option<EclipseHit> {
        (**self).next_solar_eclipse(jd_ut)
    }

    fn next_lunar_eclipse(&self, jd_ut: f64) -> Option<EclipseHit> {
        (**self).next_lunar_eclipse(jd_ut)
    }
}
