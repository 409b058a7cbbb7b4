//! Core vocabulary for the gochara transit engine.
//!
//! This crate provides:
//! - Angle math: normalization, shortest separation, aspect distance
//! - Tracked bodies with cadence classes and default orbs
//! - Zodiac signs and house-cusp lookup (explicit cusps and whole-sign)
//! - The fixed aspect catalog
//! - Julian Date ↔ UTC conversions
//! - The [`EphemerisProvider`] contract consumed by the search engine

pub mod angle;
pub mod aspect;
pub mod body;
pub mod error;
pub mod house;
pub mod provider;
pub mod sign;
pub mod time;

pub use angle::{
    angular_separation, aspect_distance, normalize_360, normalize_to_pm180,
    signed_aspect_offset,
};
pub use aspect::{ALL_ASPECTS, AspectKind};
pub use body::{ALL_BODIES, Body, CadenceClass, OPTIONAL_BODIES};
pub use error::CoreError;
pub use house::{HouseCuspSet, HouseSystem};
pub use provider::{
    BodyPosition, EclipseFlags, EclipseHit, EphemerisProvider, Unavailable, UnavailableReason,
};
pub use sign::{ALL_SIGNS, Sign, SignPosition, sign_position};
pub use time::{datetime_to_jd, jd_to_datetime, naive_date_to_jd};
