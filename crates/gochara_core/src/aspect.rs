//! The fixed catalog of major aspects.

use std::fmt::{Display, Formatter};

use serde::{Deserialize, Serialize};

/// A named target separation between two bodies or points.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum AspectKind {
    Conjunction,
    Sextile,
    Square,
    Trine,
    Opposition,
}

/// All aspects in catalog order.
pub const ALL_ASPECTS: [AspectKind; 5] = [
    AspectKind::Conjunction,
    AspectKind::Sextile,
    AspectKind::Square,
    AspectKind::Trine,
    AspectKind::Opposition,
];

impl AspectKind {
    /// Target separation in degrees.
    pub const fn angle_deg(self) -> f64 {
        match self {
            Self::Conjunction => 0.0,
            Self::Sextile => 60.0,
            Self::Square => 90.0,
            Self::Trine => 120.0,
            Self::Opposition => 180.0,
        }
    }

    pub const fn name(self) -> &'static str {
        match self {
            Self::Conjunction => "conjunction",
            Self::Sextile => "sextile",
            Self::Square => "square",
            Self::Trine => "trine",
            Self::Opposition => "opposition",
        }
    }

    pub const fn all() -> &'static [AspectKind; 5] {
        &ALL_ASPECTS
    }
}

impl Display for AspectKind {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.name())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn angles_in_range() {
        for a in ALL_ASPECTS {
            assert!((0.0..=180.0).contains(&a.angle_deg()), "{a}");
        }
    }

    #[test]
    fn catalog_is_ordered_by_angle() {
        let angles: Vec<f64> = ALL_ASPECTS.iter().map(|a| a.angle_deg()).collect();
        assert!(angles.windows(2).all(|w| w[0] < w[1]));
    }
}
