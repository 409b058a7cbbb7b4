//! Tunable scan parameters: cadence, orbs, refinement and the
//! eclipse/phase finder.

use std::collections::BTreeMap;

use gochara_core::{Body, CadenceClass};
use serde::{Deserialize, Serialize};

const MINUTES_PER_DAY: f64 = 1440.0;

/// Sampling interval per cadence class, in minutes.
///
/// The fast interval is the scanner's base tick, so the medium and slow
/// intervals must be whole multiples of it.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct CadenceTable {
    pub fast_minutes: u32,
    pub medium_minutes: u32,
    pub slow_minutes: u32,
}

impl Default for CadenceTable {
    fn default() -> Self {
        Self {
            fast_minutes: 60,
            medium_minutes: 180,
            slow_minutes: 720,
        }
    }
}

impl CadenceTable {
    pub fn minutes(&self, class: CadenceClass) -> u32 {
        match class {
            CadenceClass::Fast => self.fast_minutes,
            CadenceClass::Medium => self.medium_minutes,
            CadenceClass::Slow => self.slow_minutes,
        }
    }

    /// Base tick length in days.
    pub fn base_step_days(&self) -> f64 {
        f64::from(self.fast_minutes) / MINUTES_PER_DAY
    }

    /// Number of base ticks between two samples of a class.
    pub fn stride(&self, class: CadenceClass) -> u64 {
        u64::from((self.minutes(class) / self.fast_minutes.max(1)).max(1))
    }

    pub fn validate(&self) -> Result<(), &'static str> {
        if self.fast_minutes == 0 || self.medium_minutes == 0 || self.slow_minutes == 0 {
            return Err("cadence intervals must be greater than zero");
        }
        if self.medium_minutes % self.fast_minutes != 0
            || self.slow_minutes % self.fast_minutes != 0
        {
            return Err("medium and slow cadence must be multiples of the fast cadence");
        }
        Ok(())
    }
}

/// Orb in degrees per body, with a fallback for bodies not listed.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct OrbTable {
    pub orbs: BTreeMap<Body, f64>,
    pub default_deg: f64,
}

impl Default for OrbTable {
    fn default() -> Self {
        Self {
            orbs: Body::all_with_optional()
                .map(|b| (b, b.default_orb_deg()))
                .collect(),
            default_deg: 2.0,
        }
    }
}

impl OrbTable {
    pub fn orb(&self, body: Body) -> f64 {
        self.orbs.get(&body).copied().unwrap_or(self.default_deg)
    }

    pub fn validate(&self) -> Result<(), &'static str> {
        let valid = |o: f64| o.is_finite() && o > 0.0 && o < 90.0;
        if !valid(self.default_deg) || !self.orbs.values().all(|&o| valid(o)) {
            return Err("orbs must be finite and in (0, 90) degrees");
        }
        Ok(())
    }
}

/// Bisection limits for ingress and station refinement.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct RefineConfig {
    pub max_iterations: u32,
    pub convergence_days: f64,
}

impl Default for RefineConfig {
    fn default() -> Self {
        Self {
            max_iterations: 20,
            convergence_days: 30.0 / 86_400.0,
        }
    }
}

impl RefineConfig {
    pub fn validate(&self) -> Result<(), &'static str> {
        if self.max_iterations == 0 {
            return Err("max_iterations must be > 0");
        }
        if !self.convergence_days.is_finite() || self.convergence_days <= 0.0 {
            return Err("convergence_days must be positive");
        }
        Ok(())
    }
}

/// Eclipse search skip and lunar phase sampling.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct PhaseConfig {
    pub lunar_phase_step_minutes: u32,
    /// Days to jump past an eclipse before searching for the next one.
    pub eclipse_skip_days: f64,
}

impl Default for PhaseConfig {
    fn default() -> Self {
        Self {
            lunar_phase_step_minutes: 30,
            eclipse_skip_days: 170.0,
        }
    }
}

impl PhaseConfig {
    pub fn lunar_phase_step_days(&self) -> f64 {
        f64::from(self.lunar_phase_step_minutes) / MINUTES_PER_DAY
    }

    pub fn validate(&self) -> Result<(), &'static str> {
        if self.lunar_phase_step_minutes == 0 {
            return Err("lunar_phase_step_minutes must be greater than zero");
        }
        // Phases of one kind recur every ~29.5 days; a coarser step could
        // straddle two crossings of the same target.
        if self.lunar_phase_step_minutes > 24 * 60 {
            return Err("lunar_phase_step_minutes must not exceed one day");
        }
        if !self.eclipse_skip_days.is_finite() || self.eclipse_skip_days <= 0.0 {
            return Err("eclipse_skip_days must be positive");
        }
        Ok(())
    }
}

/// Everything a scan needs besides the plan itself.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ScanSettings {
    pub cadence: CadenceTable,
    pub orbs: OrbTable,
    pub refine: RefineConfig,
    pub phases: PhaseConfig,
}

impl ScanSettings {
    pub fn validate(&self) -> Result<(), &'static str> {
        self.cadence.validate()?;
        self.orbs.validate()?;
        self.refine.validate()?;
        self.phases.validate()
    }
}
