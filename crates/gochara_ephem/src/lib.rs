//! Longitude-table ephemeris provider.
//!
//! [`TableEphemeris`] implements [`gochara_core::EphemerisProvider`] from a
//! JSON file of per-body Chebyshev segments plus a list of eclipse instants.
//! It is the provider the command line uses; the scan engine itself only
//! sees the trait.

pub mod chebyshev;
pub mod config;
pub mod error;
pub mod global;
pub mod table;

pub use config::EphemerisConfig;
pub use error::EphemError;
pub use global::{init, is_initialized, provider};
pub use table::{EclipseKindName, EclipseRecord, LongitudeSegment, TableEphemeris, TableFile};
