//! Tracked bodies, their cadence classes and default orbs.

use std::fmt::{Display, Formatter};
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::error::CoreError;

/// Moving bodies the scanner can track.
///
/// `Chiron` and `TrueNode` are optional: not every ephemeris build carries
/// them, and scans only include them when asked to.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum Body {
    Sun,
    Moon,
    Mercury,
    Venus,
    Mars,
    Jupiter,
    Saturn,
    Uranus,
    Neptune,
    Pluto,
    Chiron,
    TrueNode,
}

/// The ten classical bodies in scan order.
pub const ALL_BODIES: [Body; 10] = [
    Body::Sun,
    Body::Moon,
    Body::Mercury,
    Body::Venus,
    Body::Mars,
    Body::Jupiter,
    Body::Saturn,
    Body::Uranus,
    Body::Neptune,
    Body::Pluto,
];

/// Bodies tracked only on request.
pub const OPTIONAL_BODIES: [Body; 2] = [Body::Chiron, Body::TrueNode];

/// How densely a body needs to be sampled.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum CadenceClass {
    /// The Moon: ~13 deg/day.
    Fast,
    /// Sun and inner planets: up to ~2 deg/day.
    Medium,
    /// Outer planets, Chiron, lunar node.
    Slow,
}

impl Body {
    /// Identifier used in responses and config tables.
    pub const fn id(self) -> &'static str {
        match self {
            Self::Sun => "SUN",
            Self::Moon => "MOON",
            Self::Mercury => "MERCURY",
            Self::Venus => "VENUS",
            Self::Mars => "MARS",
            Self::Jupiter => "JUPITER",
            Self::Saturn => "SATURN",
            Self::Uranus => "URANUS",
            Self::Neptune => "NEPTUNE",
            Self::Pluto => "PLUTO",
            Self::Chiron => "CHIRON",
            Self::TrueNode => "TRUE_NODE",
        }
    }

    /// Display name used in event descriptions.
    pub const fn name(self) -> &'static str {
        match self {
            Self::Sun => "Sun",
            Self::Moon => "Moon",
            Self::Mercury => "Mercury",
            Self::Venus => "Venus",
            Self::Mars => "Mars",
            Self::Jupiter => "Jupiter",
            Self::Saturn => "Saturn",
            Self::Uranus => "Uranus",
            Self::Neptune => "Neptune",
            Self::Pluto => "Pluto",
            Self::Chiron => "Chiron",
            Self::TrueNode => "North Node",
        }
    }

    pub const fn cadence_class(self) -> CadenceClass {
        match self {
            Self::Moon => CadenceClass::Fast,
            Self::Sun | Self::Mercury | Self::Venus | Self::Mars => CadenceClass::Medium,
            _ => CadenceClass::Slow,
        }
    }

    /// Base orb in degrees used when no orb table overrides it.
    pub const fn default_orb_deg(self) -> f64 {
        match self {
            Self::Moon => 6.0,
            Self::Sun => 4.0,
            Self::Mercury | Self::Venus => 3.0,
            Self::Mars => 2.5,
            Self::Jupiter | Self::Saturn => 2.0,
            Self::Uranus | Self::Neptune | Self::Pluto => 1.5,
            Self::Chiron | Self::TrueNode => 1.5,
        }
    }

    pub const fn is_optional(self) -> bool {
        matches!(self, Self::Chiron | Self::TrueNode)
    }

    /// Classical bodies followed by the optional ones.
    pub fn all_with_optional() -> impl Iterator<Item = Body> {
        ALL_BODIES.into_iter().chain(OPTIONAL_BODIES)
    }
}

impl Display for Body {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.name())
    }
}

impl FromStr for Body {
    type Err = CoreError;

    /// Parse an identifier or display name, case-insensitively.
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let wanted = s.trim();
        Self::all_with_optional()
            .find(|b| b.id().eq_ignore_ascii_case(wanted) || b.name().eq_ignore_ascii_case(wanted))
            .ok_or_else(|| CoreError::UnknownBody(wanted.to_string()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parse_id_and_name() {
        assert_eq!("MARS".parse::<Body>().unwrap(), Body::Mars);
        assert_eq!("mars".parse::<Body>().unwrap(), Body::Mars);
        assert_eq!("North Node".parse::<Body>().unwrap(), Body::TrueNode);
        assert_eq!("true_node".parse::<Body>().unwrap(), Body::TrueNode);
    }

    #[test]
    fn parse_unknown_fails() {
        assert!("Vulcan".parse::<Body>().is_err());
    }

    #[test]
    fn moon_is_fast() {
        assert_eq!(Body::Moon.cadence_class(), CadenceClass::Fast);
        assert_eq!(Body::Venus.cadence_class(), CadenceClass::Medium);
        assert_eq!(Body::Pluto.cadence_class(), CadenceClass::Slow);
    }

    #[test]
    fn optional_bodies_flagged() {
        assert!(Body::Chiron.is_optional());
        assert!(!Body::Sun.is_optional());
        assert_eq!(Body::all_with_optional().count(), 12);
    }

    #[test]
    fn orbs_positive() {
        for body in Body::all_with_optional() {
            assert!(body.default_orb_deg() > 0.0, "{body}");
        }
    }
}
