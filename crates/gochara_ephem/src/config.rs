//! Provider configuration.

use std::path::PathBuf;

use serde::{Deserialize, Serialize};

use crate::error::EphemError;

/// Where the longitude table lives.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct EphemerisConfig {
    pub table_path: PathBuf,
}

impl EphemerisConfig {
    pub fn new(table_path: impl Into<PathBuf>) -> Self {
        Self {
            table_path: table_path.into(),
        }
    }

    /// Reject configurations that cannot name a table.
    pub fn validate(&self) -> Result<(), EphemError> {
        if self.table_path.as_os_str().is_empty() {
            return Err(EphemError::InvalidConfig("table_path must not be empty"));
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn empty_path_rejected() {
        let cfg = EphemerisConfig::new("");
        assert!(matches!(
            cfg.validate(),
            Err(EphemError::InvalidConfig(_))
        ));
    }

    #[test]
    fn nonempty_path_accepted() {
        assert!(EphemerisConfig::new("data/table.json").validate().is_ok());
    }
}
