//! Error type for loading and installing a provider.

use std::path::PathBuf;

#[derive(Debug, thiserror::Error)]
#[non_exhaustive]
pub enum EphemError {
    #[error("invalid config: {0}")]
    InvalidConfig(&'static str),
    #[error("cannot read {}: {source}", .path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
    #[error("table parse error: {0}")]
    Parse(#[from] serde_json::Error),
    #[error("invalid table: {0}")]
    InvalidTable(String),
    #[error("global provider already initialized")]
    AlreadyInitialized,
    #[error("global provider not initialized; call init() first")]
    NotInitialized,
}
