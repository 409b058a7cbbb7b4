//! Error type for scan requests and the scan engine.

use gochara_core::CoreError;

/// Errors that abort a scan.
///
/// Per-sample provider failures are not errors; they degrade the affected
/// body and the scan carries on.
#[derive(Debug, Clone, PartialEq, thiserror::Error)]
#[non_exhaustive]
pub enum SearchError {
    /// The request itself is malformed (dates, coordinates, natal points).
    #[error("invalid request: {0}")]
    InvalidRequest(&'static str),
    /// Scan settings are inconsistent (cadence, orbs, refinement).
    #[error("invalid config: {0}")]
    InvalidConfig(&'static str),
    /// The scan ran past its deadline.
    #[error("scan deadline exceeded")]
    DeadlineExceeded,
    /// An invariant broke mid-scan, e.g. a non-finite longitude.
    #[error("internal error: {0}")]
    Internal(String),
    #[error(transparent)]
    Core(#[from] CoreError),
}
