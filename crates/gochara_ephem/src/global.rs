//! Process-wide provider handle.
//!
//! The CLI loads one table at startup and every scan reads from it. Library
//! callers that manage their own provider never need this module.

use std::sync::OnceLock;

use tracing::info;

use crate::config::EphemerisConfig;
use crate::error::EphemError;
use crate::table::TableEphemeris;

static PROVIDER: OnceLock<TableEphemeris> = OnceLock::new();

/// Load the table named by `config` and install it globally.
///
/// Fails with [`EphemError::AlreadyInitialized`] on a second call.
pub fn init(config: &EphemerisConfig) -> Result<(), EphemError> {
    if PROVIDER.get().is_some() {
        return Err(EphemError::AlreadyInitialized);
    }
    let table = TableEphemeris::load(config)?;
    PROVIDER
        .set(table)
        .map_err(|_| EphemError::AlreadyInitialized)?;
    info!(path = %config.table_path.display(), "global ephemeris installed");
    Ok(())
}

pub fn is_initialized() -> bool {
    PROVIDER.get().is_some()
}

/// The installed provider.
pub fn provider() -> Result<&'static TableEphemeris, EphemError> {
    PROVIDER.get().ok_or(EphemError::NotInitialized)
}
