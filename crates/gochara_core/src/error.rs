//! Error types for core value construction.

/// Errors from building core values (cusp sets, bodies, aspects).
#[derive(Debug, Clone, PartialEq, thiserror::Error)]
#[non_exhaustive]
pub enum CoreError {
    /// House cusp input rejected.
    #[error("invalid cusps: {0}")]
    InvalidCusps(&'static str),
    /// Body identifier not recognized.
    #[error("unknown body: {0}")]
    UnknownBody(String),
}
