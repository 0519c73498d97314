//! Headsign-to-route matching.
//!
//! Digitransit stop times carry a free-text headsign but no route. The
//! route list of the stop carries, per route, the destination headsigns of
//! its patterns. Stop-time headsigns are usually longer than the pattern
//! ones ("Leppävaara via Otaniemi" vs "Leppävaara"), so the default
//! strategy looks for the pattern headsign *inside* the stop-time headsign.
//!
//! Matching is a heuristic: two routes serving the same terminal will both
//! match, and the first route in source order wins. Such ambiguities are
//! logged at debug level.

use serde::Deserialize;
use tracing::debug;

use crate::domain::{Departure, RouteHeadsigns};

/// Strategy for deciding which route a departure belongs to.
pub trait HeadsignMatcher: Send + Sync {
    /// Whether a route's destination headsign identifies a departure headsign.
    fn matches(&self, departure_headsign: &str, route_headsign: &str) -> bool;

    /// Every route with a headsign matching `departure_headsign`, in
    /// source order.
    fn candidates<'r>(
        &self,
        departure_headsign: &str,
        routes: &'r [RouteHeadsigns],
    ) -> Vec<&'r RouteHeadsigns> {
        routes
            .iter()
            .filter(|route| {
                route
                    .headsigns
                    .iter()
                    .any(|hs| self.matches(departure_headsign, hs))
            })
            .collect()
    }

    /// Find the route owning a departure headsign.
    ///
    /// Routes are scanned in order, and each route's headsigns in order;
    /// the first pair that matches wins.
    fn resolve<'r>(
        &self,
        departure_headsign: &str,
        routes: &'r [RouteHeadsigns],
    ) -> Option<&'r RouteHeadsigns> {
        let candidates = self.candidates(departure_headsign, routes);
        let (&first, rest) = candidates.split_first()?;

        if !rest.is_empty() {
            let others: Vec<&str> = rest.iter().map(|r| r.short_name.as_str()).collect();
            debug!(
                headsign = departure_headsign,
                chosen = %first.short_name,
                ?others,
                "ambiguous headsign, using first route"
            );
        }

        Some(first)
    }
}

/// Case-insensitive substring containment.
#[derive(Debug, Clone, Copy, Default)]
pub struct SubstringMatcher;

impl HeadsignMatcher for SubstringMatcher {
    fn matches(&self, departure_headsign: &str, route_headsign: &str) -> bool {
        // An empty pattern headsign would claim every departure.
        !route_headsign.is_empty()
            && departure_headsign
                .to_lowercase()
                .contains(&route_headsign.to_lowercase())
    }
}

/// Case-insensitive equality.
#[derive(Debug, Clone, Copy, Default)]
pub struct ExactMatcher;

impl HeadsignMatcher for ExactMatcher {
    fn matches(&self, departure_headsign: &str, route_headsign: &str) -> bool {
        !route_headsign.is_empty()
            && departure_headsign.to_lowercase() == route_headsign.to_lowercase()
    }
}

/// Matching strategy selectable from configuration.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum MatchStrategy {
    #[default]
    Substring,
    Exact,
}

impl HeadsignMatcher for MatchStrategy {
    fn matches(&self, departure_headsign: &str, route_headsign: &str) -> bool {
        match self {
            MatchStrategy::Substring => SubstringMatcher.matches(departure_headsign, route_headsign),
            MatchStrategy::Exact => ExactMatcher.matches(departure_headsign, route_headsign),
        }
    }
}

/// Assign a route short name to every departure.
///
/// Departures no route claims keep an empty `route`.
pub fn assign_routes<M>(departures: &mut [Departure], routes: &[RouteHeadsigns], matcher: &M)
where
    M: HeadsignMatcher + ?Sized,
{
    for departure in departures.iter_mut() {
        match matcher.resolve(&departure.headsign, routes) {
            Some(route) => departure.route = route.short_name.clone(),
            None => debug!(headsign = %departure.headsign, "no route matches headsign"),
        }
    }
}
