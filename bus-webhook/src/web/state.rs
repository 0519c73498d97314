//! Application state for the web layer.

use std::sync::Arc;

use crate::corpus::CorpusHandle;
use crate::resolver::{Destinations, LineOrder};

/// Shared application state.
#[derive(Clone)]
pub struct AppState {
    /// Departure corpus, swapped wholesale on refresh
    pub corpus: CorpusHandle,

    /// Destination phrase to headsign mapping
    pub destinations: Arc<Destinations>,

    /// Ordering of destination-only answers
    pub line_order: LineOrder,
}

impl AppState {
    pub fn new(corpus: CorpusHandle, destinations: Destinations, line_order: LineOrder) -> Self {
        Self {
            corpus,
            destinations: Arc::new(destinations),
            line_order,
        }
    }
}
