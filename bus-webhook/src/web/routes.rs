//! HTTP route handlers.

use axum::body::Bytes;
use axum::{
    Json, Router,
    extract::State,
    routing::{get, post},
};
use tower_http::trace::TraceLayer;
use tracing::{error, info, warn};

use crate::resolver::{QueryResolver, ResolveError};

use super::dto::{RequestError, WebhookRequest};
use super::response::WebhookResponse;
use super::state::AppState;

/// Create the application router.
pub fn create_router(state: AppState) -> Router {
    Router::new()
        .route("/getRoute", post(get_route))
        .route("/health", get(health))
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}

/// Health check endpoint.
async fn health() -> &'static str {
    "ok"
}

/// Dialogflow fulfillment endpoint.
///
/// Always answers 200 with a complete envelope; failures are reported in
/// the spoken text.
async fn get_route(State(state): State<AppState>, body: Bytes) -> Json<WebhookResponse> {
    let request = parse_request(&body);
    let response = answer(&state, &request).await;

    info!(
        fulfillment = %response.fulfillment_text,
        speech = ?response.speech(),
        "webhook response"
    );

    Json(response)
}

/// Parse a request body, treating malformed input as an empty request.
fn parse_request(body: &[u8]) -> WebhookRequest {
    match serde_json::from_slice::<WebhookRequest>(body) {
        Ok(request) => {
            info!(
                query = request
                    .query_result
                    .as_ref()
                    .and_then(|q| q.query_text.as_deref())
                    .unwrap_or_default(),
                destination = request.destination().unwrap_or_default(),
                "webhook request"
            );
            request
        }
        Err(e) => {
            warn!(error = %e, bytes = body.len(), "malformed webhook request");
            WebhookRequest::default()
        }
    }
}

async fn answer(state: &AppState, request: &WebhookRequest) -> WebhookResponse {
    let intent = match request.to_intent() {
        Ok(intent) => intent,
        Err(RequestError::MissingDestination) => return WebhookResponse::destination_unmapped(),
        Err(RequestError::UnsupportedIntent { name, destination }) => {
            error!(intent = ?name, "unsupported intent");
            return if state.destinations.headsign_for(&destination).is_some() {
                WebhookResponse::no_routes_found()
            } else {
                WebhookResponse::destination_unmapped()
            };
        }
    };

    let corpus = state.corpus.snapshot().await;
    let resolved = QueryResolver::new(&corpus, &state.destinations)
        .with_order(state.line_order)
        .resolve(&intent);

    match resolved {
        Ok(lines) => WebhookResponse::answers(intent.route_digits(), lines),
        Err(ResolveError::DestinationUnmapped(key)) => {
            info!(destination = %key, "destination not mapped");
            WebhookResponse::destination_unmapped()
        }
        Err(ResolveError::NoRoutesFound) => WebhookResponse::no_routes_found(),
    }
}
