//! Mock Digitransit source for running without API access.
//!
//! Loads recorded GraphQL responses from JSON files and serves them as if
//! they were live API responses.

use std::collections::HashMap;
use std::path::Path;
use std::sync::Arc;

use crate::corpus::StopSource;

use super::error::DigitransitError;
use super::types::{GraphQlResponse, StopQueryData};

/// Mock source that serves stop responses from JSON files.
#[derive(Debug, Clone)]
pub struct MockDigitransitClient {
    /// Pre-loaded responses, keyed by stop gtfsId.
    stops: Arc<HashMap<String, StopQueryData>>,
}

impl MockDigitransitClient {
    /// Create a mock client by loading JSON files from a directory.
    ///
    /// Expects files named `{gtfsId}.json` (e.g. `HSL:2112401.json`), each
    /// holding a complete GraphQL response body.
    pub fn new(data_dir: impl AsRef<Path>) -> Result<Self, DigitransitError> {
        let data_dir = data_dir.as_ref();
        let mut stops = HashMap::new();

        let entries = std::fs::read_dir(data_dir).map_err(|e| DigitransitError::Api {
            status: 0,
            message: format!("Failed to read mock data directory: {}", e),
        })?;

        for entry in entries {
            let entry = entry.map_err(|e| DigitransitError::Api {
                status: 0,
                message: format!("Failed to read directory entry: {}", e),
            })?;

            let path = entry.path();
            if !path.is_file() || path.extension().and_then(|s| s.to_str()) != Some("json") {
                continue;
            }

            let gtfs_id = path
                .file_stem()
                .and_then(|s| s.to_str())
                .ok_or_else(|| DigitransitError::Api {
                    status: 0,
                    message: format!("Invalid filename: {:?}", path),
                })?
                .to_string();

            let json = std::fs::read_to_string(&path).map_err(|e| DigitransitError::Api {
                status: 0,
                message: format!("Failed to read {:?}: {}", path, e),
            })?;

            let response: GraphQlResponse<StopQueryData> =
                serde_json::from_str(&json).map_err(|e| DigitransitError::Json {
                    message: format!("Failed to parse {:?}: {}", path, e),
                    body: None,
                })?;

            stops.insert(gtfs_id, response.data.unwrap_or_default());
        }

        if stops.is_empty() {
            return Err(DigitransitError::Api {
                status: 0,
                message: format!("No mock stop files found in {:?}", data_dir),
            });
        }

        Ok(Self {
            stops: Arc::new(stops),
        })
    }

    /// Stop ids with recorded data.
    pub fn stop_ids(&self) -> Vec<&str> {
        let mut ids: Vec<&str> = self.stops.keys().map(String::as_str).collect();
        ids.sort_unstable();
        ids
    }
}

impl StopSource for MockDigitransitClient {
    /// Unknown ids behave like the live API: a response without a stop.
    async fn fetch_stop(&self, gtfs_id: &str) -> Result<StopQueryData, DigitransitError> {
        Ok(self.stops.get(gtfs_id).cloned().unwrap_or_default())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn write(dir: &Path, name: &str, body: &str) {
        std::fs::write(dir.join(name), body).unwrap();
    }

    #[tokio::test]
    async fn serves_recorded_stops() {
        let dir = tempfile::tempdir().unwrap();
        write(
            dir.path(),
            "HSL:1.json",
            r#"{"data": {"stop": {"name": "Kamppi", "code": "H1234"}}}"#,
        );
        write(dir.path(), "notes.txt", "ignored");

        let client = MockDigitransitClient::new(dir.path()).unwrap();
        assert_eq!(client.stop_ids(), ["HSL:1"]);

        let data = client.fetch_stop("HSL:1").await.unwrap();
        assert_eq!(data.stop.unwrap().code.as_deref(), Some("H1234"));

        let unknown = client.fetch_stop("HSL:2").await.unwrap();
        assert!(unknown.stop.is_none());
    }

    #[test]
    fn empty_directory_is_an_error() {
        let dir = tempfile::tempdir().unwrap();
        assert!(MockDigitransitClient::new(dir.path()).is_err());
    }

    #[test]
    fn invalid_json_is_an_error() {
        let dir = tempfile::tempdir().unwrap();
        write(dir.path(), "HSL:1.json", "{not json");

        let err = MockDigitransitClient::new(dir.path()).unwrap_err();
        assert!(matches!(err, DigitransitError::Json { .. }));
    }
}
