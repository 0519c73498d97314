//! Web layer for the bus departure webhook.
//!
//! Exposes the Dialogflow fulfillment endpoint and a health check.

mod dto;
mod response;
mod routes;
mod state;
pub mod tls;

pub use dto::*;
pub use response::WebhookResponse;
pub use routes::create_router;
pub use state::AppState;
