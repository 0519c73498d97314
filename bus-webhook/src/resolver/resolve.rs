//! Query resolution over the corpus.

use std::fmt;

use serde::Deserialize;
use tracing::debug;

use crate::corpus::Corpus;
use crate::domain::{ClockTime, StopSnapshot};

use super::MAX_ANSWER_LINES;
use super::intent::{Destinations, QueryIntent};

/// Why a query produced no answer.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum ResolveError {
    /// The destination phrase has no configured headsign.
    #[error("destination could not be mapped: {0:?}")]
    DestinationUnmapped(String),

    /// The query was understood but no departure matched.
    #[error("no routes found")]
    NoRoutesFound,
}

/// Ordering of destination-only answer lines.
///
/// Lines are keyed by the first departure time recorded for each route.
/// `LatestFirst` is the historical behaviour of the assistant and stays the
/// default until callers are ready for soonest-first answers.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum LineOrder {
    #[default]
    LatestFirst,
    SoonestFirst,
}

/// Resolves queries against a corpus snapshot.
pub struct QueryResolver<'a> {
    corpus: &'a Corpus,
    destinations: &'a Destinations,
    order: LineOrder,
}

impl<'a> QueryResolver<'a> {
    pub fn new(corpus: &'a Corpus, destinations: &'a Destinations) -> Self {
        Self {
            corpus,
            destinations,
            order: LineOrder::default(),
        }
    }

    /// Set the ordering of destination-only answers.
    pub fn with_order(mut self, order: LineOrder) -> Self {
        self.order = order;
        self
    }

    /// Resolve a query into at most [`MAX_ANSWER_LINES`] answer lines.
    ///
    /// The destination is mapped before the corpus is looked at, so an
    /// unknown destination is always reported as such.
    pub fn resolve(&self, intent: &QueryIntent) -> Result<Vec<String>, ResolveError> {
        let key = intent.destination_key();
        let headsign = self
            .destinations
            .headsign_for(key)
            .ok_or_else(|| ResolveError::DestinationUnmapped(key.to_string()))?;

        let mut lines = match intent {
            QueryIntent::RouteAndDestination { route_digits, .. } => {
                route_and_destination(self.corpus, route_digits, headsign)
            }
            QueryIntent::DestinationOnly { .. } => {
                destination_only(self.corpus, headsign, self.order)
            }
        };

        debug!(?intent, headsign, ?lines, "resolved");

        if lines.is_empty() {
            return Err(ResolveError::NoRoutesFound);
        }

        lines.truncate(MAX_ANSWER_LINES);
        Ok(lines)
    }
}

/// One line per stop listing every matching departure of the route.
///
/// A departure matches when its route contains `route_digits` and its
/// headsign contains `headsign` (ignoring case). Stops appear in corpus
/// order, times in the stop's scheduled order.
pub fn route_and_destination(corpus: &Corpus, route_digits: &str, headsign: &str) -> Vec<String> {
    let term = headsign.to_lowercase();

    corpus
        .stops()
        .iter()
        .filter_map(|route_data| {
            let times: Vec<String> = route_data
                .departures()
                .iter()
                .filter(|d| d.route.contains(route_digits))
                .filter(|d| d.headsign.to_lowercase().contains(&term))
                .map(|d| d.departure_clock().to_string())
                .collect();

            if times.is_empty() {
                None
            } else {
                Some(format!(
                    "Leaves from {} at {}",
                    route_data.stop,
                    times.join(", ")
                ))
            }
        })
        .collect()
}

/// Answer line of a destination-only query: one route, all its times.
struct RouteLine<'c> {
    route: &'c str,
    stop: &'c StopSnapshot,
    first_departure: f64,
    times: Vec<ClockTime>,
}

impl RouteLine<'_> {
    /// Whether a departure on `route` belongs to this line.
    ///
    /// Route names are compared by containment, so "215N" joins a "215"
    /// line. Unmatched departures only group with each other.
    fn accepts(&self, route: &str) -> bool {
        if self.route.is_empty() {
            route.is_empty()
        } else {
            route.contains(self.route)
        }
    }
}

impl fmt::Display for RouteLine<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Bus {} leaves from {} at ", self.route, self.stop)?;
        for (i, time) in self.times.iter().enumerate() {
            if i > 0 {
                f.write_str(",")?;
            }
            write!(f, "{time}")?;
        }
        Ok(())
    }
}

/// One line per route heading towards `headsign`, across all stops.
///
/// A route's line is attributed to the stop where the route was first
/// seen; later matches on any stop append their time to it.
pub fn destination_only(corpus: &Corpus, headsign: &str, order: LineOrder) -> Vec<String> {
    let term = headsign.to_lowercase();
    let mut lines: Vec<RouteLine<'_>> = Vec::new();

    for route_data in corpus.stops() {
        let matching = route_data
            .departures()
            .iter()
            .filter(|d| d.headsign.to_lowercase().contains(&term));

        for departure in matching {
            match lines.iter_mut().find(|line| line.accepts(&departure.route)) {
                Some(line) => line.times.push(departure.departure_clock()),
                None => lines.push(RouteLine {
                    route: &departure.route,
                    stop: &route_data.stop,
                    first_departure: departure.effective_departure(),
                    times: vec![departure.departure_clock()],
                }),
            }
        }
    }

    match order {
        LineOrder::LatestFirst => {
            lines.sort_by(|a, b| b.first_departure.total_cmp(&a.first_departure))
        }
        LineOrder::SoonestFirst => {
            lines.sort_by(|a, b| a.first_departure.total_cmp(&b.first_departure))
        }
    }

    lines.iter().map(ToString::to_string).collect()
}
