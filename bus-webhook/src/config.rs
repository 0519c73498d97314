//! Application configuration.
//!
//! Read from a JSON file (`config-file.json` by default) and overlaid with
//! `BUS_WEBHOOK_*` environment variables. Every key listed in
//! [`ConfigError::Missing`] must be present; the rest have defaults.
//!
//! ```json
//! {
//!   "stopGtfsIds": ["HSL:2112401", "HSL:2112402"],
//!   "callSignToHeadsign": {"sello": "Leppävaara", "tapiola": "Tapiola"},
//!   "routes": ["215", "550"],
//!   "port": "8443",
//!   "logFile": "bus-webhook",
//!   "clientCert": "certs/client-ca.crt",
//!   "serverCert": "certs/server.crt",
//!   "serverKey": "certs/server.key"
//! }
//! ```

use std::collections::HashMap;
use std::path::{Path, PathBuf};
use std::time::Duration;

use serde::Deserialize;

use crate::digitransit::DigitransitConfig;
use crate::matching::MatchStrategy;
use crate::resolver::{Destinations, LineOrder};

/// Default configuration file, relative to the working directory.
pub const DEFAULT_CONFIG_FILE: &str = "config-file.json";

/// Prefix of environment variables overriding file settings.
pub const ENV_PREFIX: &str = "BUS_WEBHOOK";

/// Errors that can occur while loading configuration.
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("failed reading '{path}': {source}")]
    Load {
        path: String,
        #[source]
        source: config::ConfigError,
    },

    #[error("required configuration key '{0}' is missing")]
    Missing(&'static str),

    #[error("invalid port: {0:?}")]
    InvalidPort(String),
}

/// Settings as they appear in the file, before validation.
///
/// Keys may arrive lowercased from environment overrides, hence the aliases.
#[derive(Debug, Default, Deserialize)]
#[serde(rename_all = "camelCase", default)]
struct RawConfig {
    #[serde(alias = "stopgtfsids")]
    stop_gtfs_ids: Vec<String>,
    #[serde(alias = "callsigntoheadsign")]
    call_sign_to_headsign: HashMap<String, String>,
    routes: Vec<String>,
    port: Option<String>,
    #[serde(alias = "logfile")]
    log_file: Option<String>,
    #[serde(alias = "clientcert")]
    client_cert: Option<PathBuf>,
    #[serde(alias = "servercert")]
    server_cert: Option<PathBuf>,
    #[serde(alias = "serverkey")]
    server_key: Option<PathBuf>,
    #[serde(alias = "apiurl")]
    api_url: Option<String>,
    #[serde(alias = "apikey")]
    api_key: Option<String>,
    #[serde(alias = "requesttimeoutsecs")]
    request_timeout_secs: Option<u64>,
    #[serde(alias = "refreshintervalsecs")]
    refresh_interval_secs: Option<u64>,
    #[serde(alias = "headsignmatching")]
    headsign_matching: MatchStrategy,
    #[serde(alias = "destinationorder")]
    destination_order: LineOrder,
}

/// Validated application configuration.
#[derive(Debug, Clone)]
pub struct AppConfig {
    /// Stops to monitor, in answer order
    pub stop_gtfs_ids: Vec<String>,

    /// Destination phrase to headsign text
    pub call_sign_to_headsign: HashMap<String, String>,

    /// Route numbers expected to be served by the monitored stops
    pub routes: Vec<String>,

    pub port: u16,

    /// Log file name, without the `.log` suffix
    pub log_file: String,

    /// CA bundle client certificates must chain to
    pub client_cert: PathBuf,
    pub server_cert: PathBuf,
    pub server_key: PathBuf,

    pub api_url: Option<String>,
    pub api_key: Option<String>,
    pub request_timeout_secs: Option<u64>,

    /// Corpus refresh period; `None` loads the corpus once at startup
    pub refresh_interval_secs: Option<u64>,

    pub headsign_matching: MatchStrategy,
    pub destination_order: LineOrder,
}

impl AppConfig {
    /// Load configuration from `path`, overlaid with the environment.
    pub fn load(path: impl AsRef<Path>) -> Result<Self, ConfigError> {
        let path = path.as_ref();
        let load_error = |source| ConfigError::Load {
            path: path.display().to_string(),
            source,
        };

        let raw: RawConfig = config::Config::builder()
            .add_source(config::File::new(
                &path.to_string_lossy(),
                config::FileFormat::Json,
            ))
            .add_source(config::Environment::with_prefix(ENV_PREFIX))
            .build()
            .map_err(load_error)?
            .try_deserialize()
            .map_err(load_error)?;

        raw.validate()
    }

    /// Parse configuration from a JSON string, without environment overrides.
    pub fn from_json(json: &str) -> Result<Self, ConfigError> {
        let raw: RawConfig = config::Config::builder()
            .add_source(config::File::from_str(json, config::FileFormat::Json))
            .build()
            .and_then(config::Config::try_deserialize)
            .map_err(|source| ConfigError::Load {
                path: "<inline>".to_string(),
                source,
            })?;

        raw.validate()
    }

    /// Destination mapping used by the resolver.
    pub fn destinations(&self) -> Destinations {
        Destinations::new(self.call_sign_to_headsign.clone())
    }

    /// Digitransit client settings.
    pub fn digitransit(&self) -> DigitransitConfig {
        let mut config = DigitransitConfig::new();
        if let Some(url) = &self.api_url {
            config = config.with_api_url(url);
        }
        if let Some(key) = &self.api_key {
            config = config.with_api_key(key);
        }
        if let Some(secs) = self.request_timeout_secs {
            config = config.with_timeout(secs);
        }
        config
    }

    pub fn refresh_interval(&self) -> Option<Duration> {
        self.refresh_interval_secs
            .filter(|&secs| secs > 0)
            .map(Duration::from_secs)
    }

    /// Path of the log file, with the `.log` suffix.
    pub fn log_path(&self) -> PathBuf {
        PathBuf::from(format!("{}.log", self.log_file))
    }
}

impl RawConfig {
    /// Check required keys, reporting the first one missing.
    fn validate(self) -> Result<AppConfig, ConfigError> {
        fn required<T>(value: Option<T>, key: &'static str) -> Result<T, ConfigError> {
            value.ok_or(ConfigError::Missing(key))
        }

        fn non_empty(value: Option<String>) -> Option<String> {
            value.filter(|s| !s.trim().is_empty())
        }

        let log_file = required(non_empty(self.log_file), "logFile")?;
        if self.call_sign_to_headsign.is_empty() {
            return Err(ConfigError::Missing("callSignToHeadsign"));
        }
        if self.stop_gtfs_ids.is_empty() {
            return Err(ConfigError::Missing("stopGtfsIds"));
        }
        let port = required(non_empty(self.port), "port")?;
        let port = port
            .trim()
            .parse()
            .map_err(|_| ConfigError::InvalidPort(port))?;
        let server_cert = required(self.server_cert, "serverCert")?;
        let server_key = required(self.server_key, "serverKey")?;
        let client_cert = required(self.client_cert, "clientCert")?;

        Ok(AppConfig {
            stop_gtfs_ids: self.stop_gtfs_ids,
            call_sign_to_headsign: self.call_sign_to_headsign,
            routes: self.routes,
            port,
            log_file,
            client_cert,
            server_cert,
            server_key,
            api_url: self.api_url,
            api_key: self.api_key,
            request_timeout_secs: self.request_timeout_secs,
            refresh_interval_secs: self.refresh_interval_secs,
            headsign_matching: self.headsign_matching,
            destination_order: self.destination_order,
        })
    }
}
