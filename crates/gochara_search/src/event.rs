//! Event records produced by a scan.
//!
//! Times are kept as Julian Dates (UT) internally and serialized as
//! RFC 3339 UTC strings.

use std::fmt::{Display, Formatter};

use gochara_core::{AspectKind, Body, Sign, SignPosition};
use serde::{Deserialize, Serialize};

/// Discriminant of [`EventDetail`], ordered for tie-breaking.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum EventKind {
    SignIngress,
    HouseIngress,
    StationStart,
    StationEnd,
    AspectFormed,
    Eclipse,
    LunarPhase,
}

/// Identifier of a natal chart point, e.g. `"SUN"` or `"ASC"`.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct NatalPointId(pub String);

impl NatalPointId {
    pub fn new(id: impl Into<String>) -> Self {
        Self(id.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// The body this point is named after, if any.
    pub fn as_body(&self) -> Option<Body> {
        self.0.parse().ok()
    }

    /// Human-readable name for descriptions.
    pub fn display_name(&self) -> &str {
        if let Some(body) = self.as_body() {
            return body.name();
        }
        match self.0.to_ascii_uppercase().as_str() {
            "ASC" => "Ascendant",
            "MC" => "Midheaven",
            "DSC" => "Descendant",
            "IC" => "Imum Coeli",
            _ => &self.0,
        }
    }
}

impl Display for NatalPointId {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        f.write_str(&self.0)
    }
}

/// The other side of an aspect.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(tag = "type", content = "id", rename_all = "snake_case")]
pub enum Counterpart {
    /// Another moving body.
    Transit(Body),
    /// A fixed natal point.
    Natal(NatalPointId),
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum AspectOrigin {
    TransitToNatal,
    TransitToTransit,
}

impl Counterpart {
    pub fn origin(&self) -> AspectOrigin {
        match self {
            Self::Transit(_) => AspectOrigin::TransitToTransit,
            Self::Natal(_) => AspectOrigin::TransitToNatal,
        }
    }
}

/// Eclipse classification.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum EclipseKind {
    TotalSolar,
    AnnularSolar,
    PartialSolar,
    Solar,
    TotalLunar,
    PartialLunar,
    PenumbralLunar,
    Lunar,
}

impl EclipseKind {
    pub const fn name(self) -> &'static str {
        match self {
            Self::TotalSolar => "Total Solar Eclipse",
            Self::AnnularSolar => "Annular Solar Eclipse",
            Self::PartialSolar => "Partial Solar Eclipse",
            Self::Solar => "Solar Eclipse",
            Self::TotalLunar => "Total Lunar Eclipse",
            Self::PartialLunar => "Partial Lunar Eclipse",
            Self::PenumbralLunar => "Penumbral Lunar Eclipse",
            Self::Lunar => "Lunar Eclipse",
        }
    }

    pub const fn is_solar(self) -> bool {
        matches!(
            self,
            Self::TotalSolar | Self::AnnularSolar | Self::PartialSolar | Self::Solar
        )
    }
}

/// Lunar phase subtypes and their Moon-Sun elongation.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum LunarPhase {
    NewMoon,
    FirstQuarter,
    FullMoon,
    LastQuarter,
}

pub const ALL_LUNAR_PHASES: [LunarPhase; 4] = [
    LunarPhase::NewMoon,
    LunarPhase::FirstQuarter,
    LunarPhase::FullMoon,
    LunarPhase::LastQuarter,
];

impl LunarPhase {
    pub const fn elongation_deg(self) -> f64 {
        match self {
            Self::NewMoon => 0.0,
            Self::FirstQuarter => 90.0,
            Self::FullMoon => 180.0,
            Self::LastQuarter => 270.0,
        }
    }

    pub const fn name(self) -> &'static str {
        match self {
            Self::NewMoon => "New Moon",
            Self::FirstQuarter => "First Quarter",
            Self::FullMoon => "Full Moon",
            Self::LastQuarter => "Last Quarter",
        }
    }
}

/// Kind-specific payload of an [`Event`].
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "kind", rename_all = "SCREAMING_SNAKE_CASE")]
pub enum EventDetail {
    SignIngress {
        body: Body,
        from: Sign,
        to: Sign,
        #[serde(serialize_with = "jd_serde::serialize")]
        timestamp: f64,
    },
    HouseIngress {
        body: Body,
        from: u8,
        to: u8,
        #[serde(serialize_with = "jd_serde::serialize")]
        timestamp: f64,
    },
    StationStart {
        body: Body,
        #[serde(serialize_with = "jd_serde::serialize")]
        timestamp: f64,
    },
    StationEnd {
        body: Body,
        #[serde(serialize_with = "jd_serde::serialize")]
        timestamp: f64,
    },
    AspectFormed {
        body: Body,
        counterpart: Counterpart,
        aspect: AspectKind,
        origin: AspectOrigin,
        orb_deg: f64,
        /// Smallest sampled distance from exact, in degrees.
        best_distance_deg: f64,
        #[serde(serialize_with = "jd_serde::serialize")]
        window_open: f64,
        #[serde(serialize_with = "jd_serde::serialize")]
        exact: f64,
        #[serde(serialize_with = "jd_serde::serialize")]
        window_close: f64,
    },
    Eclipse {
        eclipse: EclipseKind,
        position: Option<SignPosition>,
        #[serde(serialize_with = "jd_serde::serialize")]
        timestamp: f64,
    },
    LunarPhase {
        phase: LunarPhase,
        position: Option<SignPosition>,
        #[serde(serialize_with = "jd_serde::serialize")]
        timestamp: f64,
    },
}

impl EventDetail {
    pub fn kind(&self) -> EventKind {
        match self {
            Self::SignIngress { .. } => EventKind::SignIngress,
            Self::HouseIngress { .. } => EventKind::HouseIngress,
            Self::StationStart { .. } => EventKind::StationStart,
            Self::StationEnd { .. } => EventKind::StationEnd,
            Self::AspectFormed { .. } => EventKind::AspectFormed,
            Self::Eclipse { .. } => EventKind::Eclipse,
            Self::LunarPhase { .. } => EventKind::LunarPhase,
        }
    }

    /// Sort key: the exact instant for aspects, the single timestamp
    /// otherwise.
    pub fn primary_jd(&self) -> f64 {
        match *self {
            Self::AspectFormed { exact, .. } => exact,
            Self::SignIngress { timestamp, .. }
            | Self::HouseIngress { timestamp, .. }
            | Self::StationStart { timestamp, .. }
            | Self::StationEnd { timestamp, .. }
            | Self::Eclipse { timestamp, .. }
            | Self::LunarPhase { timestamp, .. } => timestamp,
        }
    }

    fn describe(&self) -> String {
        match self {
            Self::SignIngress { body, to, .. } => format!("{} enters {}", body.name(), to.name()),
            Self::HouseIngress { body, to, .. } => format!("{} enters house {to}", body.name()),
            Self::StationStart { body, .. } => format!("{} turns retrograde", body.name()),
            Self::StationEnd { body, .. } => format!("{} turns direct", body.name()),
            Self::AspectFormed {
                body,
                counterpart,
                aspect,
                ..
            } => match counterpart {
                Counterpart::Transit(other) => {
                    format!("{} {} {}", body.name(), aspect.name(), other.name())
                }
                Counterpart::Natal(point) => format!(
                    "{} {} natal {}",
                    body.name(),
                    aspect.name(),
                    point.display_name()
                ),
            },
            Self::Eclipse {
                eclipse, position, ..
            } => with_sign(eclipse.name(), position.as_ref()),
            Self::LunarPhase {
                phase, position, ..
            } => with_sign(phase.name(), position.as_ref()),
        }
    }
}

fn with_sign(name: &str, position: Option<&SignPosition>) -> String {
    match position {
        Some(p) => format!("{name} in {}", p.sign.name()),
        None => name.to_string(),
    }
}

/// One reported event.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Event {
    #[serde(flatten)]
    pub detail: EventDetail,
    pub description: String,
}

impl Event {
    pub fn new(detail: EventDetail) -> Self {
        let description = detail.describe();
        Self {
            detail,
            description,
        }
    }

    pub fn kind(&self) -> EventKind {
        self.detail.kind()
    }

    pub fn primary_jd(&self) -> f64 {
        self.detail.primary_jd()
    }
}

impl From<EventDetail> for Event {
    fn from(detail: EventDetail) -> Self {
        Self::new(detail)
    }
}

pub(crate) mod jd_serde {
    use gochara_core::jd_to_datetime;
    use serde::Serializer;

    pub fn serialize<S: Serializer>(jd: &f64, serializer: S) -> Result<S::Ok, S::Error> {
        let dt = jd_to_datetime(*jd)
            .ok_or_else(|| serde::ser::Error::custom(format!("JD {jd} out of range")))?;
        serializer.serialize_str(&dt.to_rfc3339_opts(chrono::SecondsFormat::Secs, true))
    }
}
