//! Parsed queries and destination lookup.

use std::collections::HashMap;

/// What the caller asked for.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum QueryIntent {
    /// "When does bus 215 to Leppävaara leave?"
    RouteAndDestination {
        route_digits: String,
        destination_key: String,
    },

    /// "When does the next bus to Leppävaara leave?"
    DestinationOnly { destination_key: String },
}

impl QueryIntent {
    /// The user-facing destination phrase.
    pub fn destination_key(&self) -> &str {
        match self {
            QueryIntent::RouteAndDestination {
                destination_key, ..
            }
            | QueryIntent::DestinationOnly { destination_key } => destination_key,
        }
    }

    /// Requested route digits; empty for destination-only queries.
    pub fn route_digits(&self) -> &str {
        match self {
            QueryIntent::RouteAndDestination { route_digits, .. } => route_digits,
            QueryIntent::DestinationOnly { .. } => "",
        }
    }
}

/// Mapping from spoken destination keys to the headsign text to match.
///
/// Keys are case-insensitive.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Destinations {
    headsigns: HashMap<String, String>,
}

impl Destinations {
    pub fn new(headsigns: HashMap<String, String>) -> Self {
        Self {
            headsigns: headsigns
                .into_iter()
                .map(|(key, headsign)| (key.to_lowercase(), headsign))
                .collect(),
        }
    }

    /// Headsign term for a destination key, if one is configured.
    pub fn headsign_for(&self, key: &str) -> Option<&str> {
        self.headsigns.get(&key.to_lowercase()).map(String::as_str)
    }

    pub fn len(&self) -> usize {
        self.headsigns.len()
    }

    pub fn is_empty(&self) -> bool {
        self.headsigns.is_empty()
    }
}

impl<K: Into<String>, V: Into<String>> FromIterator<(K, V)> for Destinations {
    fn from_iter<I: IntoIterator<Item = (K, V)>>(iter: I) -> Self {
        Self::new(
            iter.into_iter()
                .map(|(k, v)| (k.into(), v.into()))
                .collect(),
        )
    }
}
