//! Synthetic providers for scan tests.

#![allow(dead_code)]

use std::collections::BTreeMap;
use std::f64::consts::TAU;

use gochara_core::{
    Body, BodyPosition, EclipseFlags, EclipseHit, EphemerisProvider, HouseSystem, Unavailable,
    UnavailableReason, normalize_360,
};

/// 2024-01-01 00:00 UT.
pub const JAN_1_2024: f64 = 2_460_310.5;

/// One hour in days.
pub const HOUR: f64 = 1.0 / 24.0;

#[derive(Debug, Clone)]
pub enum Motion {
    /// `lon0 + speed * (t - jd0)`.
    Linear { jd0: f64, lon0: f64, speed: f64 },
    /// Piecewise linear through `(jd, unwrapped longitude)` points.
    Points(Vec<(f64, f64)>),
    /// Forward drift with a sinusoidal wobble, which produces stations.
    Wobble {
        jd0: f64,
        lon0: f64,
        drift: f64,
        amplitude: f64,
        period: f64,
    },
}

impl Motion {
    fn at(&self, t: f64) -> Option<(f64, f64)> {
        match self {
            Self::Linear { jd0, lon0, speed } => Some((lon0 + speed * (t - jd0), *speed)),
            Self::Points(points) => {
                const EPS: f64 = 1e-9;
                let w = points
                    .windows(2)
                    .find(|w| t >= w[0].0 - EPS && t <= w[1].0 + EPS)?;
                let (t0, l0) = w[0];
                let (t1, l1) = w[1];
                let slope = (l1 - l0) / (t1 - t0);
                Some((l0 + slope * (t - t0), slope))
            }
            Self::Wobble {
                jd0,
                lon0,
                drift,
                amplitude,
                period,
            } => {
                let phase = TAU * (t - jd0) / period;
                let lon = lon0 + drift * (t - jd0) + amplitude * phase.sin();
                let speed = drift + amplitude * TAU / period * phase.cos();
                Some((lon, speed))
            }
        }
    }
}

#[derive(Debug, Clone)]
pub struct Track {
    pub motion: Motion,
    /// Half-open `[from, to)` spans where sampling fails.
    pub gaps: Vec<(f64, f64)>,
}

#[derive(Debug, Clone, Default)]
pub struct Synthetic {
    pub tracks: BTreeMap<Body, Track>,
    pub cusps: Option<[f64; 12]>,
    pub solar: Vec<EclipseHit>,
    pub lunar: Vec<EclipseHit>,
}

impl Synthetic {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with(mut self, body: Body, motion: Motion) -> Self {
        self.tracks.insert(
            body,
            Track {
                motion,
                gaps: Vec::new(),
            },
        );
        self
    }

    pub fn with_gap(mut self, body: Body, from: f64, to: f64) -> Self {
        if let Some(track) = self.tracks.get_mut(&body) {
            track.gaps.push((from, to));
        }
        self
    }

    pub fn with_solar(mut self, jd_ut: f64, flags: EclipseFlags) -> Self {
        self.solar.push(EclipseHit { jd_ut, flags });
        self
    }

    pub fn with_lunar(mut self, jd_ut: f64, flags: EclipseFlags) -> Self {
        self.lunar.push(EclipseHit { jd_ut, flags });
        self
    }

    /// Every classical body moving linearly at a plausible mean speed.
    pub fn solar_system(jd0: f64) -> Self {
        let mean = [
            (Body::Sun, 280.0, 0.9856),
            (Body::Moon, 10.0, 13.176),
            (Body::Mercury, 265.0, 1.2),
            (Body::Venus, 250.0, 1.1),
            (Body::Mars, 255.0, 0.7),
            (Body::Jupiter, 35.0, 0.08),
            (Body::Saturn, 340.0, 0.03),
            (Body::Uranus, 49.0, 0.01),
            (Body::Neptune, 355.0, 0.006),
            (Body::Pluto, 299.0, 0.004),
        ];
        mean.into_iter().fold(Self::new(), |p, (body, lon0, speed)| {
            p.with(body, Motion::Linear { jd0, lon0, speed })
        })
    }
}

impl EphemerisProvider for Synthetic {
    fn longitude_and_speed(&self, jd_ut: f64, body: Body) -> Result<BodyPosition, Unavailable> {
        let track = self
            .tracks
            .get(&body)
            .ok_or(Unavailable::new(UnavailableReason::BodyNotSupported, jd_ut))?;
        if track.gaps.iter().any(|&(a, b)| jd_ut >= a && jd_ut < b) {
            return Err(Unavailable::new(UnavailableReason::ComputationFailed, jd_ut));
        }
        let (lon, speed) = track
            .motion
            .at(jd_ut)
            .ok_or(Unavailable::new(UnavailableReason::OutOfRange, jd_ut))?;
        Ok(BodyPosition {
            longitude_deg: normalize_360(lon),
            speed_deg_per_day: Some(speed),
        })
    }

    fn house_cusps(
        &self,
        jd_ut: f64,
        _latitude_deg: f64,
        _longitude_deg: f64,
        _system: HouseSystem,
    ) -> Result<[f64; 12], Unavailable> {
        self.cusps
            .ok_or(Unavailable::new(UnavailableReason::Unsupported, jd_ut))
    }

    fn next_solar_eclipse(&self, jd_ut: f64) -> Option<EclipseHit> {
        self.solar.iter().find(|h| h.jd_ut >= jd_ut).copied()
    }

    fn next_lunar_eclipse(&self, jd_ut: f64) -> Option<EclipseHit> {
        self.lunar.iter().find(|h| h.jd_ut >= jd_ut).copied()
    }
}
