//! Conversion from Digitransit DTOs to domain types.
//!
//! Missing values are filled with zero values rather than rejected: a stop
//! time without a realtime prediction, or a stop without coordinates, is
//! still useful. The only hard failure is a missing stop object.

use tracing::debug;

use crate::domain::{Departure, RouteData, RouteHeadsigns, StopSnapshot};
use crate::matching::{HeadsignMatcher, assign_routes};

use super::types::{RouteDto, StopDto, StopQueryData, StopTimeDto};

/// Error during DTO to domain conversion.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum ConversionError {
    /// The API returned no stop object for the id.
    #[error("stop not found: {0}")]
    StopNotFound(String),
}

/// Convert a stop query response into route data.
///
/// Departures are ordered by scheduled departure and tagged with their
/// route using `matcher`.
pub fn convert_stop<M>(
    gtfs_id: &str,
    data: StopQueryData,
    matcher: &M,
) -> Result<RouteData, ConversionError>
where
    M: HeadsignMatcher + ?Sized,
{
    let stop = data
        .stop
        .ok_or_else(|| ConversionError::StopNotFound(gtfs_id.to_string()))?;

    let snapshot = convert_snapshot(gtfs_id, &stop);
    let routes = convert_routes(stop.routes.unwrap_or_default());
    debug!(stop = gtfs_id, ?routes, "route headsigns");

    let mut departures: Vec<Departure> = stop
        .stoptimes_without_patterns
        .unwrap_or_default()
        .into_iter()
        .map(convert_stop_time)
        .collect();

    assign_routes(&mut departures, &routes, matcher);

    Ok(RouteData::new(snapshot, departures))
}

fn convert_snapshot(gtfs_id: &str, stop: &StopDto) -> StopSnapshot {
    StopSnapshot::new(
        gtfs_id,
        stop.name.clone().unwrap_or_default(),
        stop.code.clone().unwrap_or_default(),
    )
    .with_location(stop.lat.unwrap_or_default(), stop.lon.unwrap_or_default())
}

/// Collect each route's pattern headsigns, keeping API order.
///
/// Routes without a short name cannot be reported and are dropped.
fn convert_routes(routes: Vec<RouteDto>) -> Vec<RouteHeadsigns> {
    routes
        .into_iter()
        .filter_map(|route| {
            let short_name = route.short_name?;
            let headsigns = route
                .patterns
                .unwrap_or_default()
                .into_iter()
                .filter_map(|pattern| pattern.headsign)
                .collect::<Vec<_>>();
            Some(RouteHeadsigns::new(short_name, headsigns))
        })
        .collect()
}

fn convert_stop_time(dto: StopTimeDto) -> Departure {
    Departure {
        scheduled_arrival: dto.scheduled_arrival.unwrap_or_default(),
        realtime_arrival: dto.realtime_arrival.unwrap_or_default(),
        arrival_delay: dto.arrival_delay.unwrap_or_default(),
        scheduled_departure: dto.scheduled_departure.unwrap_or_default(),
        realtime_departure: dto.realtime_departure.unwrap_or_default(),
        departure_delay: dto.departure_delay.unwrap_or_default(),
        realtime: dto.realtime.unwrap_or_default(),
        realtime_state: dto.realtime_state.unwrap_or_default(),
        headsign: dto.headsign.unwrap_or_default(),
        route: String::new(),
    }
}
