//! Digitransit (HSL journey planner) GraphQL client.
//!
//! This module fetches live stop data from the Digitransit routing API and
//! normalizes it into domain types.
//!
//! Key characteristics of the API:
//! - Stop times carry a headsign but no route, so departures are tied to
//!   routes by matching headsign text (see [`crate::matching`])
//! - Times are seconds since the start of the service day
//! - Realtime fields are only meaningful when `realtime` is true

mod client;
mod convert;
mod error;
mod mock;
mod types;

pub use client::{DigitransitClient, DigitransitConfig};
pub use convert::{ConversionError, convert_stop};
pub use error::DigitransitError;
pub use mock::MockDigitransitClient;
pub use types::{
    GraphQlError, GraphQlResponse, PatternDto, RouteDto, StopDto, StopQueryData, StopTimeDto,
};
