//! Digitransit GraphQL HTTP client.
//!
//! Fetches one stop per request: its identity, the routes serving it (with
//! pattern headsigns) and its upcoming stop times.

use std::sync::Arc;

use reqwest::header::{HeaderMap, HeaderName, HeaderValue};
use serde::Serialize;
use tokio::sync::Semaphore;
use tracing::{debug, warn};

use crate::corpus::StopSource;

use super::error::DigitransitError;
use super::types::{GraphQlResponse, StopQueryData};

/// Default GraphQL endpoint (HSL region router).
const DEFAULT_API_URL: &str = "https://api.digitransit.fi/routing/v2/hsl/gtfs/v1";

/// Header carrying the Digitransit subscription key.
const API_KEY_HEADER: &str = "digitransit-subscription-key";

/// Default maximum concurrent requests.
const DEFAULT_MAX_CONCURRENT: usize = 4;

/// Query for a stop's routes and upcoming stop times.
///
/// Can be tried out at https://api.digitransit.fi/graphiql/hsl.
const STOP_QUERY: &str = r#"query ($id: String!) {
  stop(id: $id) {
    name
    code
    lat
    lon
    routes {
      shortName
      patterns {
        headsign
      }
    }
    stoptimesWithoutPatterns {
      scheduledArrival
      realtimeArrival
      arrivalDelay
      scheduledDeparture
      realtimeDeparture
      departureDelay
      realtime
      realtimeState
      serviceDay
      headsign
    }
  }
}"#;

/// Configuration for the Digitransit client.
#[derive(Debug, Clone)]
pub struct DigitransitConfig {
    /// GraphQL endpoint URL
    pub api_url: String,
    /// Subscription key, if the endpoint requires one
    pub api_key: Option<String>,
    /// Maximum concurrent requests
    pub max_concurrent: usize,
    /// Request timeout in seconds
    pub timeout_secs: u64,
}

impl DigitransitConfig {
    /// Create a config pointing at the default HSL endpoint.
    pub fn new() -> Self {
        Self {
            api_url: DEFAULT_API_URL.to_string(),
            api_key: None,
            max_concurrent: DEFAULT_MAX_CONCURRENT,
            timeout_secs: 30,
        }
    }

    /// Set a custom endpoint URL.
    pub fn with_api_url(mut self, url: impl Into<String>) -> Self {
        self.api_url = url.into();
        self
    }

    /// Set the subscription key.
    pub fn with_api_key(mut self, key: impl Into<String>) -> Self {
        self.api_key = Some(key.into());
        self
    }

    /// Set maximum concurrent requests.
    pub fn with_max_concurrent(mut self, n: usize) -> Self {
        self.max_concurrent = n;
        self
    }

    /// Set request timeout.
    pub fn with_timeout(mut self, secs: u64) -> Self {
        self.timeout_secs = secs;
        self
    }
}

impl Default for DigitransitConfig {
    fn default() -> Self {
        Self::new()
    }
}

#[derive(Serialize)]
struct GraphQlRequest<'a> {
    query: &'static str,
    variables: StopVariables<'a>,
}

#[derive(Serialize)]
struct StopVariables<'a> {
    id: &'a str,
}

/// Digitransit GraphQL client.
///
/// Uses a semaphore to limit concurrent requests.
#[derive(Debug, Clone)]
pub struct DigitransitClient {
    http: reqwest::Client,
    api_url: String,
    semaphore: Arc<Semaphore>,
}

impl DigitransitClient {
    /// Create a new client with the given configuration.
    pub fn new(config: DigitransitConfig) -> Result<Self, DigitransitError> {
        let mut headers = HeaderMap::new();

        if let Some(key) = &config.api_key {
            let value = HeaderValue::from_str(key).map_err(|_| DigitransitError::Api {
                status: 0,
                message: "Invalid API key format".to_string(),
            })?;
            headers.insert(HeaderName::from_static(API_KEY_HEADER), value);
        }

        let http = reqwest::Client::builder()
            .default_headers(headers)
            .timeout(std::time::Duration::from_secs(config.timeout_secs))
            .build()?;

        Ok(Self {
            http,
            api_url: config.api_url,
            semaphore: Arc::new(Semaphore::new(config.max_concurrent.max(1))),
        })
    }

    /// Fetch the raw stop query response for a stop.
    ///
    /// A stop unknown to the API yields `Ok` with no stop object; the
    /// conversion step reports it as not found.
    pub async fn get_stop(&self, gtfs_id: &str) -> Result<StopQueryData, DigitransitError> {
        let _permit = self
            .semaphore
            .acquire()
            .await
            .map_err(|_| DigitransitError::Api {
                status: 0,
                message: "Semaphore closed".to_string(),
            })?;

        let request = GraphQlRequest {
            query: STOP_QUERY,
            variables: StopVariables { id: gtfs_id },
        };

        debug!(stop = gtfs_id, url = %self.api_url, "fetching stop");
        let response = self.http.post(&self.api_url).json(&request).send().await?;

        let status = response.status();

        if status == reqwest::StatusCode::UNAUTHORIZED || status == reqwest::StatusCode::FORBIDDEN {
            return Err(DigitransitError::Unauthorized);
        }

        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            return Err(DigitransitError::Api {
                status: status.as_u16(),
                message: body,
            });
        }

        let body = response.text().await?;

        let parsed: GraphQlResponse<StopQueryData> =
            serde_json::from_str(&body).map_err(|e| DigitransitError::Json {
                message: e.to_string(),
                body: Some(body.chars().take(500).collect()),
            })?;

        into_data(gtfs_id, parsed)
    }
}

impl StopSource for DigitransitClient {
    async fn fetch_stop(&self, gtfs_id: &str) -> Result<StopQueryData, DigitransitError> {
        self.get_stop(gtfs_id).await
    }
}

/// Unwrap the GraphQL envelope.
///
/// Errors alongside data are logged and the data is used; errors without
/// data fail the request.
fn into_data(
    gtfs_id: &str,
    response: GraphQlResponse<StopQueryData>,
) -> Result<StopQueryData, DigitransitError> {
    let messages = || {
        response
            .errors
            .iter()
            .map(|e| e.message.as_str())
            .collect::<Vec<_>>()
            .join("; ")
    };

    match &response.data {
        Some(_) if !response.errors.is_empty() => {
            warn!(stop = gtfs_id, errors = %messages(), "partial GraphQL response");
        }
        None if !response.errors.is_empty() => {
            return Err(DigitransitError::GraphQl(messages()));
        }
        _ => {}
    }

    Ok(response.data.unwrap_or_default())
}
