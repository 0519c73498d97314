//! In-memory departure corpus.
//!
//! The corpus holds one [`RouteData`] per configured stop, in configured
//! order. It is built in full and never mutated: a refresh builds a new
//! corpus and swaps it into the shared [`CorpusHandle`], so a request
//! always sees either the old or the new data for every stop.

use std::collections::BTreeSet;
use std::future::Future;
use std::sync::Arc;

use futures::future::try_join_all;
use tokio::sync::RwLock;
use tracing::{info, warn};

use crate::digitransit::{DigitransitError, StopQueryData, convert_stop};
use crate::domain::RouteData;
use crate::matching::{HeadsignMatcher, MatchStrategy};

/// Source of raw stop data.
///
/// Implemented by the live Digitransit client and by the file-backed mock.
pub trait StopSource: Send + Sync {
    /// Fetch the stop query response for one stop.
    fn fetch_stop(
        &self,
        gtfs_id: &str,
    ) -> impl Future<Output = Result<StopQueryData, DigitransitError>> + Send;
}

/// Departure data of all monitored stops.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Corpus {
    stops: Vec<RouteData>,
}

impl Corpus {
    pub fn new(stops: Vec<RouteData>) -> Self {
        Self { stops }
    }

    /// Stops in configured order.
    pub fn stops(&self) -> &[RouteData] {
        &self.stops
    }

    pub fn len(&self) -> usize {
        self.stops.len()
    }

    pub fn is_empty(&self) -> bool {
        self.stops.is_empty()
    }

    /// Total number of departures across all stops.
    pub fn departure_count(&self) -> usize {
        self.stops.iter().map(|s| s.departures().len()).sum()
    }

    /// Route short names that at least one departure was matched to.
    pub fn matched_routes(&self) -> BTreeSet<&str> {
        self.stops
            .iter()
            .flat_map(|s| s.departures())
            .map(|d| d.route.as_str())
            .filter(|r| !r.is_empty())
            .collect()
    }
}

/// Builds a corpus from a stop source.
pub struct CorpusLoader<S, M = MatchStrategy> {
    source: S,
    stop_ids: Vec<String>,
    matcher: M,
}

impl<S: StopSource, M: HeadsignMatcher> CorpusLoader<S, M> {
    pub fn new(source: S, stop_ids: Vec<String>, matcher: M) -> Self {
        Self {
            source,
            stop_ids,
            matcher,
        }
    }

    /// Fetch and normalize every configured stop.
    ///
    /// Fails if any single stop fails; a partial corpus is never returned.
    pub async fn load(&self) -> Result<Corpus, DigitransitError> {
        let fetches = self.stop_ids.iter().map(|id| self.source.fetch_stop(id));
        let responses = try_join_all(fetches).await?;

        let stops = self
            .stop_ids
            .iter()
            .zip(responses)
            .map(|(id, data)| -> Result<RouteData, DigitransitError> {
                let route_data = convert_stop(id, data, &self.matcher)?;
                info!(
                    stop = %id,
                    name = %route_data.stop,
                    departures = route_data.departures().len(),
                    "loaded stop"
                );
                Ok(route_data)
            })
            .collect::<Result<Vec<_>, _>>()?;

        Ok(Corpus::new(stops))
    }
}

/// Shared, swappable handle to the current corpus.
#[derive(Clone, Default)]
pub struct CorpusHandle {
    inner: Arc<RwLock<Arc<Corpus>>>,
}

impl CorpusHandle {
    pub fn new(corpus: Corpus) -> Self {
        Self {
            inner: Arc::new(RwLock::new(Arc::new(corpus))),
        }
    }

    /// The current corpus. Later refreshes do not affect the returned value.
    pub async fn snapshot(&self) -> Arc<Corpus> {
        let guard = self.inner.read().await;
        Arc::clone(&guard)
    }

    /// Replace the corpus wholesale.
    pub async fn replace(&self, corpus: Corpus) {
        let mut guard = self.inner.write().await;
        *guard = Arc::new(corpus);
    }

    /// Rebuild the corpus and swap it in.
    ///
    /// On failure the current corpus is kept and the error is returned.
    pub async fn refresh<S, M>(
        &self,
        loader: &CorpusLoader<S, M>,
    ) -> Result<usize, DigitransitError>
    where
        S: StopSource,
        M: HeadsignMatcher,
    {
        let corpus = loader.load().await?;
        let count = corpus.departure_count();
        self.replace(corpus).await;
        Ok(count)
    }
}

/// Log configured routes that no departure was matched to.
///
/// Usually a sign of a headsign mismatch or a route not serving the
/// monitored stops at the moment.
pub fn report_unmatched_routes(corpus: &Corpus, expected_routes: &[String]) -> Vec<String> {
    let matched = corpus.matched_routes();
    let missing: Vec<String> = expected_routes
        .iter()
        .filter(|r| !matched.contains(r.as_str()))
        .cloned()
        .collect();

    for route in &missing {
        warn!(route = %route, "configured route matched no departures");
    }

    missing
}
