//! Departures from a stop and their ordering.

use std::cmp::Ordering;

use super::ClockTime;

/// One scheduled call of a bus at a stop.
///
/// All times are seconds since the start of the service day. Fields the
/// upstream API left out are zero-valued rather than absent.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Departure {
    pub scheduled_arrival: f64,
    pub realtime_arrival: f64,
    pub arrival_delay: f64,
    pub scheduled_departure: f64,
    pub realtime_departure: f64,
    pub departure_delay: f64,

    /// Whether the realtime fields carry a live prediction.
    pub realtime: bool,

    /// Upstream realtime state, e.g. `SCHEDULED` or `UPDATED`.
    pub realtime_state: String,

    /// Destination text shown on the bus for this trip.
    pub headsign: String,

    /// Short name of the owning route, empty when no route matched.
    pub route: String,
}

impl Departure {
    /// Departure time, preferring the live prediction when one exists.
    pub fn effective_departure(&self) -> f64 {
        if self.realtime {
            self.realtime_departure
        } else {
            self.scheduled_departure
        }
    }

    /// Wall-clock form of [`Departure::effective_departure`].
    pub fn departure_clock(&self) -> ClockTime {
        ClockTime::from_seconds(self.effective_departure())
    }

    /// Compare by scheduled departure time.
    pub fn cmp_scheduled(&self, other: &Self) -> Ordering {
        self.scheduled_departure.total_cmp(&other.scheduled_departure)
    }
}

/// Sort departures by scheduled departure time.
///
/// The sort is stable: departures with equal times keep their source order.
pub fn sort_by_scheduled_departure(departures: &mut [Departure]) {
    departures.sort_by(Departure::cmp_scheduled);
}

#[cfg(test)]
mod tests {
    use super::*;

    fn departure(headsign: &str, scheduled: f64) -> Departure {
        Departure {
            scheduled_departure: scheduled,
            realtime_departure: scheduled,
            headsign: headsign.to_string(),
            ..Default::default()
        }
    }

    #[test]
    fn effective_time_prefers_realtime() {
        let mut dep = departure("Tapiola", 3600.0);
        dep.realtime_departure = 3720.0;

        assert_eq!(dep.effective_departure(), 3600.0);

        dep.realtime = true;
        assert_eq!(dep.effective_departure(), 3720.0);
        assert_eq!(dep.departure_clock().to_string(), "01:02");
    }

    #[test]
    fn sorts_ascending() {
        let mut deps = vec![
            departure("C", 300.0),
            departure("A", 100.0),
            departure("B", 200.0),
        ];
        sort_by_scheduled_departure(&mut deps);

        let order: Vec<_> = deps.iter().map(|d| d.headsign.as_str()).collect();
        assert_eq!(order, ["A", "B", "C"]);
    }

    #[test]
    fn ties_keep_source_order() {
        let mut deps = vec![
            departure("first", 100.0),
            departure("early", 50.0),
            departure("second", 100.0),
            departure("third", 100.0),
        ];
        sort_by_scheduled_departure(&mut deps);

        let order: Vec<_> = deps.iter().map(|d| d.headsign.as_str()).collect();
        assert_eq!(order, ["early", "first", "second", "third"]);
    }

    #[test]
    fn sort_ignores_realtime() {
        let mut late = departure("late", 100.0);
        late.realtime = true;
        late.realtime_departure = 500.0;
        let mut deps = vec![late, departure("other", 200.0)];
        sort_by_scheduled_departure(&mut deps);

        assert_eq!(deps[0].headsign, "late");
    }
}

#[cfg(test)]
mod proptests {
    use super::*;
    use proptest::prelude::*;

    proptest! {
        /// Sorting is stable: equal times keep their relative input order.
        #[test]
        fn sort_is_stable(times in prop::collection::vec(0u32..5, 0..40)) {
            let mut deps: Vec<Departure> = times
                .iter()
                .enumerate()
                .map(|(i, t)| Departure {
                    scheduled_departure: f64::from(*t),
                    headsign: i.to_string(),
                    ..Default::default()
                })
                .collect();

            sort_by_scheduled_departure(&mut deps);

            for pair in deps.windows(2) {
                prop_assert!(pair[0].scheduled_departure <= pair[1].scheduled_departure);
                if pair[0].scheduled_departure == pair[1].scheduled_departure {
                    let a: usize = pair[0].headsign.parse().unwrap();
                    let b: usize = pair[1].headsign.parse().unwrap();
                    prop_assert!(a < b);
                }
            }
        }
    }
}
