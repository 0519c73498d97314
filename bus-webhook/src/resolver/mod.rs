//! Query resolution.
//!
//! Turns a caller's query ("bus 215 to Leppävaara", "next bus to
//! Leppävaara") into spoken answer lines by scanning the departure corpus.
//! Resolution is a pure function of the corpus snapshot and the query.

mod intent;
mod resolve;


pub use intent::{Destinations, QueryIntent};
pub use resolve::{LineOrder, QueryResolver, ResolveError, destination_only, route_and_destination};

/// The assistant speaks at most this many answer lines.
pub const MAX_ANSWER_LINES: usize = 2;
