//! Domain types for bus departures.
//!
//! These types hold normalized stop data. Everything upstream-specific
//! (optional fields, loose typing) has been resolved by the time a value
//! of these types exists.

mod departure;
mod route_data;
mod stop;
mod time;

pub use departure::{Departure, sort_by_scheduled_departure};
pub use route_data::{RouteData, RouteHeadsigns};
pub use stop::StopSnapshot;
pub use time::ClockTime;
