//! `gochara.toml` loading and validation.
//!
//! ```toml
//! [ephemeris]
//! table_path = "data/longitudes.json"
//!
//! [cadence]
//! fast_minutes = 60
//! medium_minutes = 180
//! slow_minutes = 720
//!
//! [orbs]
//! default = 2.0
//! MOON = 6.0
//! SUN = 4.0
//!
//! [scan]
//! lunar_phase_step_minutes = 30
//! eclipse_skip_days = 170.0
//! refine_max_iterations = 20
//! include_optional_bodies = false
//!
//! [logging]
//! level = "info"
//! format = "pretty"
//! ```
//!
//! Every section is optional; missing values take the defaults shown.

mod error;

use std::collections::BTreeMap;
use std::path::{Path, PathBuf};

use gochara_core::Body;
use gochara_ephem::EphemerisConfig;
use gochara_search::{CadenceTable, OrbTable, PhaseConfig, RefineConfig, ScanSettings};
use serde::{Deserialize, Serialize};
use tracing::debug;

pub use error::ConfigError;

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct GocharaConfig {
    #[serde(default)]
    pub ephemeris: EphemerisSection,
    #[serde(default)]
    pub cadence: CadenceSection,
    #[serde(default)]
    pub orbs: OrbSection,
    #[serde(default)]
    pub scan: ScanSection,
    #[serde(default)]
    pub logging: LoggingSection,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct EphemerisSection {
    pub table_path: Option<PathBuf>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct CadenceSection {
    #[serde(default = "default_fast")]
    pub fast_minutes: u32,
    #[serde(default = "default_medium")]
    pub medium_minutes: u32,
    #[serde(default = "default_slow")]
    pub slow_minutes: u32,
}

fn default_fast() -> u32 {
    CadenceTable::default().fast_minutes
}

fn default_medium() -> u32 {
    CadenceTable::default().medium_minutes
}

fn default_slow() -> u32 {
    CadenceTable::default().slow_minutes
}

impl Default for CadenceSection {
    fn default() -> Self {
        Self {
            fast_minutes: default_fast(),
            medium_minutes: default_medium(),
            slow_minutes: default_slow(),
        }
    }
}

/// Per-body orb overrides keyed by body id or name.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct OrbSection {
    #[serde(default = "default_orb")]
    pub default: f64,
    #[serde(flatten)]
    pub bodies: BTreeMap<String, f64>,
}

fn default_orb() -> f64 {
    OrbTable::default().default_deg
}

impl Default for OrbSection {
    fn default() -> Self {
        Self {
            default: default_orb(),
            bodies: BTreeMap::new(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct ScanSection {
    #[serde(default = "default_phase_step")]
    pub lunar_phase_step_minutes: u32,
    #[serde(default = "default_eclipse_skip")]
    pub eclipse_skip_days: f64,
    #[serde(default = "default_refine_iterations")]
    pub refine_max_iterations: u32,
    #[serde(default)]
    pub include_optional_bodies: bool,
}

fn default_phase_step() -> u32 {
    PhaseConfig::default().lunar_phase_step_minutes
}

fn default_eclipse_skip() -> f64 {
    PhaseConfig::default().eclipse_skip_days
}

fn default_refine_iterations() -> u32 {
    RefineConfig::default().max_iterations
}

impl Default for ScanSection {
    fn default() -> Self {
        Self {
            lunar_phase_step_minutes: default_phase_step(),
            eclipse_skip_days: default_eclipse_skip(),
            refine_max_iterations: default_refine_iterations(),
            include_optional_bodies: false,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum LogFormat {
    #[default]
    Pretty,
    Compact,
    Json,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct LoggingSection {
    #[serde(default = "default_level")]
    pub level: String,
    #[serde(default)]
    pub format: LogFormat,
}

fn default_level() -> String {
    "info".to_string()
}

impl Default for LoggingSection {
    fn default() -> Self {
        Self {
            level: default_level(),
            format: LogFormat::default(),
        }
    }
}

const LOG_LEVELS: [&str; 5] = ["trace", "debug", "info", "warn", "error"];

impl GocharaConfig {
    /// Read, parse and validate a config file.
    pub fn load(path: &Path) -> Result<Self, ConfigError> {
        let content = std::fs::read_to_string(path).map_err(|source| ConfigError::Read {
            path: path.to_path_buf(),
            source,
        })?;
        let config = Self::from_toml(&content)?;
        debug!(path = %path.display(), "config loaded");
        Ok(config)
    }

    /// Parse and validate TOML text.
    pub fn from_toml(content: &str) -> Result<Self, ConfigError> {
        let config: Self = toml::from_str(content)?;
        config.validate()?;
        Ok(config)
    }

    pub fn validate(&self) -> Result<(), ConfigError> {
        self.scan_settings()?
            .validate()
            .map_err(ConfigError::Invalid)?;
        if !LOG_LEVELS.contains(&self.logging.level.to_ascii_lowercase().as_str()) {
            return Err(ConfigError::Invalid(
                "logging.level must be one of trace, debug, info, warn, error",
            ));
        }
        if let Some(path) = &self.ephemeris.table_path {
            EphemerisConfig::new(path)
                .validate()
                .map_err(|_| ConfigError::Invalid("ephemeris.table_path must not be empty"))?;
        }
        Ok(())
    }

    pub fn cadence_table(&self) -> CadenceTable {
        CadenceTable {
            fast_minutes: self.cadence.fast_minutes,
            medium_minutes: self.cadence.medium_minutes,
            slow_minutes: self.cadence.slow_minutes,
        }
    }

    /// Built-in orbs overlaid with the `[orbs]` entries.
    pub fn orb_table(&self) -> Result<OrbTable, ConfigError> {
        let mut table = OrbTable {
            default_deg: self.orbs.default,
            ..OrbTable::default()
        };
        for (name, &orb) in &self.orbs.bodies {
            let body: Body = name
                .parse()
                .map_err(|_| ConfigError::UnknownBody(name.clone()))?;
            table.orbs.insert(body, orb);
        }
        Ok(table)
    }

    pub fn scan_settings(&self) -> Result<ScanSettings, ConfigError> {
        Ok(ScanSettings {
            cadence: self.cadence_table(),
            orbs: self.orb_table()?,
            refine: RefineConfig {
                max_iterations: self.scan.refine_max_iterations,
                ..RefineConfig::default()
            },
            phases: PhaseConfig {
                lunar_phase_step_minutes: self.scan.lunar_phase_step_minutes,
                eclipse_skip_days: self.scan.eclipse_skip_days,
            },
        })
    }

    /// Provider config, with `override_path` taking precedence over the file.
    pub fn ephemeris_config(
        &self,
        override_path: Option<&Path>,
    ) -> Result<EphemerisConfig, ConfigError> {
        override_path
            .map(Path::to_path_buf)
            .or_else(|| self.ephemeris.table_path.clone())
            .map(EphemerisConfig::new)
            .ok_or(ConfigError::Invalid("no ephemeris table_path configured"))
    }
}
