//! House cusp sets and house lookup.
//!
//! Quadrant systems are consumed as 12 explicit cusp longitudes computed by
//! the ephemeris provider. Whole-sign houses ignore the intermediate cusps
//! and count signs from the sign of the first cusp.

use serde::{Deserialize, Serialize};

use crate::angle::normalize_360;
use crate::error::CoreError;
use crate::sign::Sign;

/// House division system the cusps were computed with.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum HouseSystem {
    #[default]
    Placidus,
    Koch,
    Porphyry,
    Regiomontanus,
    Campanus,
    Equal,
    /// Each sign is one house, counted from the sign of the first cusp.
    WholeSign,
}

impl HouseSystem {
    /// Single-letter code conventionally used by ephemeris libraries.
    pub const fn code(self) -> char {
        match self {
            Self::Placidus => 'P',
            Self::Koch => 'K',
            Self::Porphyry => 'O',
            Self::Regiomontanus => 'R',
            Self::Campanus => 'C',
            Self::Equal => 'E',
            Self::WholeSign => 'W',
        }
    }

    pub const fn from_code(code: char) -> Option<Self> {
        match code.to_ascii_uppercase() {
            'P' => Some(Self::Placidus),
            'K' => Some(Self::Koch),
            'O' => Some(Self::Porphyry),
            'R' => Some(Self::Regiomontanus),
            'C' => Some(Self::Campanus),
            'E' => Some(Self::Equal),
            'W' => Some(Self::WholeSign),
            _ => None,
        }
    }
}

/// Twelve house cusps plus the system used to compute them.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct HouseCuspSet {
    cusps: [f64; 12],
    system: HouseSystem,
}

impl HouseCuspSet {
    /// Build a cusp set, normalizing every cusp into [0, 360).
    pub fn new(cusps: [f64; 12], system: HouseSystem) -> Result<Self, CoreError> {
        if cusps.iter().any(|c| !c.is_finite()) {
            return Err(CoreError::InvalidCusps("cusp longitudes must be finite"));
        }
        Ok(Self {
            cusps: cusps.map(normalize_360),
            system,
        })
    }

    /// Build from a slice, which must hold exactly 12 cusps.
    pub fn from_slice(cusps: &[f64], system: HouseSystem) -> Result<Self, CoreError> {
        let arr: [f64; 12] = cusps
            .try_into()
            .map_err(|_| CoreError::InvalidCusps("exactly 12 cusps are required"))?;
        Self::new(arr, system)
    }

    pub fn cusps(&self) -> &[f64; 12] {
        &self.cusps
    }

    pub fn system(&self) -> HouseSystem {
        self.system
    }

    /// House number (1-12) containing an ecliptic longitude.
    pub fn house_of(&self, lon_deg: f64) -> u8 {
        let lon = normalize_360(lon_deg);
        match self.system {
            HouseSystem::WholeSign => {
                let point = Sign::from_longitude(lon).index();
                let first = Sign::from_longitude(self.cusps[0]).index();
                (point + 12 - first) % 12 + 1
            }
            _ => self.house_from_cusps(lon),
        }
    }

    /// Half-open interval search `[cusp[i], cusp[i+1])`, wrapping at 360.
    fn house_from_cusps(&self, lon: f64) -> u8 {
        for i in 0..12 {
            let a = self.cusps[i];
            let b = self.cusps[(i + 1) % 12];
            let mut lon_n = lon;
            let mut b_n = b;
            if b < a {
                if lon < a {
                    lon_n += 360.0;
                }
                b_n += 360.0;
            }
            if a <= lon_n && lon_n < b_n {
                return (i + 1) as u8;
            }
        }
        // Only reachable with degenerate cusps (e.g. all equal).
        12
    }
}
