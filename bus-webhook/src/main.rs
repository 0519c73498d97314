use std::net::SocketAddr;
use std::path::PathBuf;
use std::process::ExitCode;

use tracing::{error, info};

use bus_webhook::config::{AppConfig, ConfigError, DEFAULT_CONFIG_FILE};
use bus_webhook::corpus::{CorpusHandle, CorpusLoader, StopSource, report_unmatched_routes};
use bus_webhook::digitransit::{DigitransitClient, DigitransitError, MockDigitransitClient};
use bus_webhook::logging::{LoggingError, init_logging};
use bus_webhook::web::tls::{TlsError, rustls_config};
use bus_webhook::web::{AppState, create_router};

/// Overrides the configuration file path.
const CONFIG_PATH_VAR: &str = "BUS_WEBHOOK_CONFIG";

/// Serve recorded stop responses from this directory instead of the live API.
const MOCK_DIR_VAR: &str = "BUS_WEBHOOK_MOCK_DIR";

#[derive(Debug, thiserror::Error)]
enum StartupError {
    #[error("configuration: {0}")]
    Config(#[from] ConfigError),

    #[error("logging: {0}")]
    Logging(#[from] LoggingError),

    #[error("loading departures: {0}")]
    Digitransit(#[from] DigitransitError),

    #[error("TLS: {0}")]
    Tls(#[from] TlsError),

    #[error("server: {0}")]
    Serve(#[from] std::io::Error),
}

#[tokio::main]
async fn main() -> ExitCode {
    match run().await {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            error!(error = %e, "fatal startup error");
            eprintln!("bus-webhook: {e}");
            ExitCode::FAILURE
        }
    }
}

fn config_path() -> PathBuf {
    std::env::args_os()
        .nth(1)
        .map(PathBuf::from)
        .or_else(|| std::env::var_os(CONFIG_PATH_VAR).map(PathBuf::from))
        .unwrap_or_else(|| PathBuf::from(DEFAULT_CONFIG_FILE))
}

async fn run() -> Result<(), StartupError> {
    let config = AppConfig::load(config_path())?;
    init_logging(&config.log_path())?;

    info!(
        stops = ?config.stop_gtfs_ids,
        routes = ?config.routes,
        destinations = config.call_sign_to_headsign.len(),
        port = config.port,
        matching = ?config.headsign_matching,
        order = ?config.destination_order,
        "configuration loaded"
    );

    match std::env::var_os(MOCK_DIR_VAR) {
        Some(dir) => {
            info!(dir = ?dir, "using mock stop data");
            serve(config, MockDigitransitClient::new(dir)?).await
        }
        None => {
            let client = DigitransitClient::new(config.digitransit())?;
            serve(config, client).await
        }
    }
}

async fn serve<S>(config: AppConfig, source: S) -> Result<(), StartupError>
where
    S: StopSource + 'static,
{
    let loader = CorpusLoader::new(source, config.stop_gtfs_ids.clone(), config.headsign_matching);

    // Any stop failing to load is fatal: no partial corpus.
    let corpus = loader.load().await?;
    info!(
        stops = corpus.len(),
        departures = corpus.departure_count(),
        "departure corpus loaded"
    );
    report_unmatched_routes(&corpus, &config.routes);

    let corpus = CorpusHandle::new(corpus);

    if let Some(period) = config.refresh_interval() {
        let handle = corpus.clone();
        tokio::spawn(async move {
            let mut interval = tokio::time::interval(period);
            interval.tick().await; // First tick is immediate, skip it
            loop {
                interval.tick().await;
                match handle.refresh(&loader).await {
                    Ok(count) => info!(departures = count, "refreshed departure corpus"),
                    Err(e) => error!(error = %e, "failed to refresh departure corpus"),
                }
            }
        });
    }

    let tls = rustls_config(&config.server_cert, &config.server_key, &config.client_cert)?;

    let state = AppState::new(corpus, config.destinations(), config.destination_order);
    let app = create_router(state);

    let addr = SocketAddr::from(([0, 0, 0, 0], config.port));
    info!(%addr, "bus webhook listening");

    axum_server::bind_rustls(addr, tls)
        .serve(app.into_make_service())
        .await?;

    Ok(())
}
