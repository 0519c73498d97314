//! Per-stop departure tables.

use super::{Departure, StopSnapshot, sort_by_scheduled_departure};

/// A route's short name plus every destination headsign seen in its patterns.
///
/// Only used while matching departures to routes; not retained afterwards.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct RouteHeadsigns {
    pub short_name: String,
    pub headsigns: Vec<String>,
}

impl RouteHeadsigns {
    pub fn new<I, S>(short_name: impl Into<String>, headsigns: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self {
            short_name: short_name.into(),
            headsigns: headsigns.into_iter().map(Into::into).collect(),
        }
    }
}

/// A stop together with its departures.
///
/// Departures are always ordered by scheduled departure time.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct RouteData {
    pub stop: StopSnapshot,
    departures: Vec<Departure>,
}

impl RouteData {
    /// Create route data, putting departures into scheduled order.
    pub fn new(stop: StopSnapshot, mut departures: Vec<Departure>) -> Self {
        sort_by_scheduled_departure(&mut departures);
        Self { stop, departures }
    }

    /// Departures in scheduled order.
    pub fn departures(&self) -> &[Departure] {
        &self.departures
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn new_sorts_departures() {
        let departures = [400.0, 100.0, 250.0]
            .into_iter()
            .map(|t| Departure {
                scheduled_departure: t,
                ..Default::default()
            })
            .collect();

        let data = RouteData::new(StopSnapshot::new("HSL:1", "Stop", "E1"), departures);
        let times: Vec<f64> = data
            .departures()
            .iter()
            .map(|d| d.scheduled_departure)
            .collect();

        assert_eq!(times, [100.0, 250.0, 400.0]);
    }

    #[test]
    fn route_headsigns_from_strs() {
        let route = RouteHeadsigns::new("215", ["Leppävaara", "Tapiola"]);
        assert_eq!(route.short_name, "215");
        assert_eq!(route.headsigns, ["Leppävaara", "Tapiola"]);
    }
}
