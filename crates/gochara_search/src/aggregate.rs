//! Ordering, de-duplication and per-body grouping of scan output.

use std::cmp::Ordering;
use std::collections::{BTreeMap, BTreeSet};

use gochara_core::Body;
use serde::{Deserialize, Serialize};
use tracing::warn;

use crate::event::Event;
use crate::request::BodyTimeline;

/// Whether a body produced any data during the scan.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Availability {
    Available,
    /// No sample succeeded over the whole range.
    Unavailable,
}

fn event_order(a: &Event, b: &Event) -> Ordering {
    a.primary_jd()
        .total_cmp(&b.primary_jd())
        .then_with(|| a.kind().cmp(&b.kind()))
        .then_with(|| a.description.cmp(&b.description))
}

/// Sort by primary instant, then kind, then description; drop exact
/// duplicates.
pub fn sort_and_dedup(events: &mut Vec<Event>) {
    events.sort_by(event_order);
    events.dedup_by(|a, b| a.detail == b.detail);
}

/// One timeline per body in `bodies` order.
pub fn build_timelines(
    bodies: &[Body],
    mut per_body: BTreeMap<Body, Vec<Event>>,
    sampled: &BTreeSet<Body>,
) -> Vec<BodyTimeline> {
    bodies
        .iter()
        .map(|&body| {
            if !sampled.contains(&body) {
                warn!(body = body.id(), "no successful sample; body unavailable");
                return BodyTimeline::unavailable(body);
            }
            let mut events = per_body.remove(&body).unwrap_or_default();
            sort_and_dedup(&mut events);
            BodyTimeline {
                body,
                availability: Availability::Available,
                start_position: None,
                end_position: None,
                events,
            }
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::event::EventDetail;
    use gochara_core::Sign;

    fn ingress(jd: f64, to: Sign) -> Event {
        Event::new(EventDetail::SignIngress {
            body: Body::Mars,
            from: Sign::Aries,
            to,
            timestamp: jd,
        })
    }

    fn station(jd: f64) -> Event {
        Event::new(EventDetail::StationStart {
            body: Body::Mars,
            timestamp: jd,
        })
    }

    #[test]
    fn sorts_by_time_then_kind() {
        let mut v = vec![station(2.0), ingress(3.0, Sign::Taurus), ingress(2.0, Sign::Taurus)];
        sort_and_dedup(&mut v);
        assert_eq!(v[0].primary_jd(), 2.0);
        assert_eq!(v[0].kind(), crate::event::EventKind::SignIngress);
        assert_eq!(v[1].kind(), crate::event::EventKind::StationStart);
        assert_eq!(v[2].primary_jd(), 3.0);
    }

    #[test]
    fn removes_duplicates() {
        let mut v = vec![ingress(1.0, Sign::Taurus), ingress(1.0, Sign::Taurus)];
        sort_and_dedup(&mut v);
        assert_eq!(v.len(), 1);
    }

    #[test]
    fn unsampled_body_is_unavailable() {
        let mut per_body = BTreeMap::new();
        per_body.insert(Body::Mars, vec![station(1.0)]);
        let sampled: BTreeSet<_> = [Body::Mars].into();
        let t = build_timelines(&[Body::Mars, Body::Pluto], per_body, &sampled);
        assert_eq!(t[0].availability, Availability::Available);
        assert_eq!(t[0].events.len(), 1);
        assert_eq!(t[1].availability, Availability::Unavailable);
        assert!(t[1].events.is_empty());
    }
}
