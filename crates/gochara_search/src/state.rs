//! Per-body discrete state and transition detection.
//!
//! The tracker turns a stream of samples into sign, house and station
//! transitions. Each transition keeps the bracket between the last good
//! sample and the sample that revealed the change, which the refiner
//! narrows afterwards.

use std::collections::BTreeMap;

use gochara_core::{Body, BodyPosition, HouseCuspSet, Sign};

/// A successful provider reading for one body at one instant.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Sample {
    pub jd: f64,
    pub longitude_deg: f64,
    pub speed_deg_per_day: Option<f64>,
}

impl Sample {
    pub fn new(jd: f64, position: BodyPosition) -> Self {
        Self {
            jd,
            longitude_deg: position.longitude_deg,
            speed_deg_per_day: position.speed_deg_per_day,
        }
    }

    /// Negative speed means retrograde; zero counts as direct.
    pub fn is_retrograde(&self) -> Option<bool> {
        self.speed_deg_per_day.map(|v| v < 0.0)
    }
}

/// Last known classification of a body.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct DiscreteState {
    pub sign: Sign,
    /// `None` without a cusp set.
    pub house: Option<u8>,
    /// `None` until a sample carries speed.
    pub retrograde: Option<bool>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TransitionKind {
    Sign { from: Sign, to: Sign },
    House { from: u8, to: u8 },
    /// `retrograde` is the state entered.
    Station { retrograde: bool },
}

/// A detected change of state, not yet refined.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Transition {
    pub body: Body,
    pub kind: TransitionKind,
    /// Last good sample before the change.
    pub jd_before: f64,
    /// First sample showing the change.
    pub jd_after: f64,
}

#[derive(Debug, Clone, Copy)]
struct Tracked {
    state: DiscreteState,
    last_jd: f64,
}

/// Discrete state for every body seen so far.
#[derive(Debug)]
pub struct StateTracker<'a> {
    cusps: Option<&'a HouseCuspSet>,
    bodies: BTreeMap<Body, Tracked>,
    transitions: Vec<Transition>,
}

impl<'a> StateTracker<'a> {
    pub fn new(cusps: Option<&'a HouseCuspSet>) -> Self {
        Self {
            cusps,
            bodies: BTreeMap::new(),
            transitions: Vec::new(),
        }
    }

    /// Feed one successful sample. Failed samples are simply not fed, which
    /// leaves the state and the bracket start untouched.
    pub fn observe(&mut self, body: Body, sample: &Sample) {
        let sign = Sign::from_longitude(sample.longitude_deg);
        let house = self.cusps.map(|c| c.house_of(sample.longitude_deg));
        let retrograde = sample.is_retrograde();

        let Some(tracked) = self.bodies.get_mut(&body) else {
            self.bodies.insert(
                body,
                Tracked {
                    state: DiscreteState {
                        sign,
                        house,
                        retrograde,
                    },
                    last_jd: sample.jd,
                },
            );
            return;
        };

        let jd_before = tracked.last_jd;
        let prev = tracked.state;
        let mut push = |kind| {
            self.transitions.push(Transition {
                body,
                kind,
                jd_before,
                jd_after: sample.jd,
            })
        };

        if sign != prev.sign {
            push(TransitionKind::Sign {
                from: prev.sign,
                to: sign,
            });
        }
        match (prev.house, house) {
            (Some(from), Some(to)) if from != to => push(TransitionKind::House { from, to }),
            _ => {}
        }
        match (prev.retrograde, retrograde) {
            (Some(was), Some(now)) if was != now => {
                push(TransitionKind::Station { retrograde: now })
            }
            _ => {}
        }

        tracked.state = DiscreteState {
            sign,
            house: house.or(prev.house),
            retrograde: retrograde.or(prev.retrograde),
        };
        tracked.last_jd = sample.jd;
    }

    pub fn state(&self, body: Body) -> Option<&DiscreteState> {
        self.bodies.get(&body).map(|t| &t.state)
    }

    /// Whether the body has had at least one successful sample.
    pub fn has_sampled(&self, body: Body) -> bool {
        self.bodies.contains_key(&body)
    }

    pub fn transitions(&self) -> &[Transition] {
        &self.transitions
    }

    pub fn into_transitions(self) -> Vec<Transition> {
        self.transitions
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use gochara_core::HouseSystem;

    fn sample(jd: f64, lon: f64, speed: Option<f64>) -> Sample {
        Sample {
            jd,
            longitude_deg: lon,
            speed_deg_per_day: speed,
        }
    }

    #[test]
    fn first_sample_seeds_silently() {
        let mut t = StateTracker::new(None);
        t.observe(Body::Mars, &sample(0.0, 29.5, Some(0.5)));
        assert!(t.transitions().is_empty());
        let s = t.state(Body::Mars).unwrap();
        assert_eq!(s.sign, Sign::Aries);
        assert_eq!(s.house, None);
        assert_eq!(s.retrograde, Some(false));
    }

    #[test]
    fn sign_ingress_detected() {
        let mut t = StateTracker::new(None);
        t.observe(Body::Mars, &sample(0.0, 29.5, Some(0.5)));
        t.observe(Body::Mars, &sample(1.0, 30.5, Some(0.5)));
        assert_eq!(
            t.transitions(),
            &[Transition {
                body: Body::Mars,
                kind: TransitionKind::Sign {
                    from: Sign::Aries,
                    to: Sign::Taurus
                },
                jd_before: 0.0,
                jd_after: 1.0,
            }]
        );
    }

    #[test]
    fn house_ingress_needs_cusps() {
        let cusps = HouseCuspSet::new(
            [0.0, 30.0, 60.0, 90.0, 120.0, 150.0, 180.0, 210.0, 240.0, 270.0, 300.0, 330.0],
            HouseSystem::Placidus,
        )
        .unwrap();
        let mut t = StateTracker::new(Some(&cusps));
        t.observe(Body::Sun, &sample(0.0, 59.0, None));
        t.observe(Body::Sun, &sample(1.0, 61.0, None));
        let kinds: Vec<_> = t.transitions().iter().map(|x| x.kind).collect();
        assert!(kinds.contains(&TransitionKind::House { from: 2, to: 3 }));

        let mut t = StateTracker::new(None);
        t.observe(Body::Sun, &sample(0.0, 59.0, None));
        t.observe(Body::Sun, &sample(1.0, 61.0, None));
        assert!(
            t.transitions()
                .iter()
                .all(|x| !matches!(x.kind, TransitionKind::House { .. }))
        );
    }

    #[test]
    fn stations_both_ways() {
        let mut t = StateTracker::new(None);
        t.observe(Body::Mercury, &sample(0.0, 100.0, Some(0.1)));
        t.observe(Body::Mercury, &sample(1.0, 100.05, Some(-0.1)));
        t.observe(Body::Mercury, &sample(2.0, 100.0, Some(0.0)));
        let kinds: Vec<_> = t.transitions().iter().map(|x| x.kind).collect();
        assert_eq!(
            kinds,
            vec![
                TransitionKind::Station { retrograde: true },
                TransitionKind::Station { retrograde: false },
            ]
        );
    }

    #[test]
    fn retrograde_seeded_on_first_speed() {
        let mut t = StateTracker::new(None);
        t.observe(Body::Saturn, &sample(0.0, 10.0, None));
        t.observe(Body::Saturn, &sample(1.0, 10.0, Some(-0.05)));
        assert!(t.transitions().is_empty());
        assert_eq!(t.state(Body::Saturn).unwrap().retrograde, Some(true));
    }

    #[test]
    fn skipped_sample_widens_bracket() {
        let mut t = StateTracker::new(None);
        t.observe(Body::Venus, &sample(0.0, 28.0, Some(1.2)));
        // sample at 1.0 failed and was never fed
        t.observe(Body::Venus, &sample(2.0, 30.4, Some(1.2)));
        let tr = t.transitions()[0];
        assert_eq!(tr.jd_before, 0.0);
        assert_eq!(tr.jd_after, 2.0);
    }

    #[test]
    fn wraps_pisces_to_aries() {
        let mut t = StateTracker::new(None);
        t.observe(Body::Moon, &sample(0.0, 359.0, Some(13.0)));
        t.observe(Body::Moon, &sample(0.1, 0.3, Some(13.0)));
        assert_eq!(
            t.transitions()[0].kind,
            TransitionKind::Sign {
                from: Sign::Pisces,
                to: Sign::Aries
            }
        );
    }
}
