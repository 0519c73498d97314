//! Dialogflow webhook request DTOs.
//!
//! Only the fields the webhook consumes are modelled. Example request
//! fragment:
//!
//! ```json
//! "queryResult": {
//!   "queryText": "bus 215 to sello",
//!   "parameters": {"route": [215], "place-attraction": "sello"},
//!   "intent": {"displayName": "Bus-Destination"}
//! }
//! ```

use serde::Deserialize;
use serde_json::Value;

use crate::resolver::QueryIntent;

/// Intent display name for route + destination queries.
pub const BUS_DESTINATION_INTENT: &str = "Bus-Destination";

/// Intent display name for destination-only queries.
pub const DESTINATION_ONLY_INTENT: &str = "Destination-Only";

/// Route digits beyond this length are dropped as conversational noise.
const MAX_ROUTE_DIGITS: usize = 3;

/// Webhook request body.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct WebhookRequest {
    pub query_result: Option<QueryResult>,
}

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct QueryResult {
    pub query_text: Option<String>,
    pub intent: Option<IntentInfo>,
    pub parameters: Option<Parameters>,
}

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct IntentInfo {
    pub display_name: Option<String>,
}

/// Slot values extracted by Dialogflow.
///
/// Kept as raw JSON: Dialogflow sends `""` for unfilled slots.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct Parameters {
    /// Route number as spoken, split into parts: `[2, 1, 5]`, `[21, 5]` or `[215]`.
    pub route: Option<Value>,

    #[serde(rename = "place-attraction")]
    pub place_attraction: Option<Value>,
}

/// A request the resolver cannot handle.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum RequestError {
    /// No destination was given (or the route slot was absent for a route query).
    MissingDestination,

    /// The intent is neither of the supported ones.
    UnsupportedIntent {
        name: Option<String>,
        destination: String,
    },
}

impl WebhookRequest {
    fn display_name(&self) -> Option<&str> {
        self.query_result
            .as_ref()?
            .intent
            .as_ref()?
            .display_name
            .as_deref()
    }

    fn parameters(&self) -> Option<&Parameters> {
        self.query_result.as_ref()?.parameters.as_ref()
    }

    /// The raw destination phrase, if any.
    pub fn destination(&self) -> Option<&str> {
        self.parameters()?.place_attraction.as_ref()?.as_str()
    }

    /// Interpret the request as a query.
    pub fn to_intent(&self) -> Result<QueryIntent, RequestError> {
        let name = self.display_name();

        if name.is_some_and(|n| n.eq_ignore_ascii_case(BUS_DESTINATION_INTENT)) {
            // Without a route slot the request cannot be answered; treat it
            // like a request without a destination. An empty route list
            // yields empty digits, which match every route.
            let digits = self
                .parameters()
                .and_then(|p| p.route.as_ref())
                .map(route_digits)
                .ok_or(RequestError::MissingDestination)?;
            let destination_key = self
                .destination()
                .ok_or(RequestError::MissingDestination)?
                .to_string();
            return Ok(QueryIntent::RouteAndDestination {
                route_digits: digits,
                destination_key,
            });
        }

        if name.is_some_and(|n| n.eq_ignore_ascii_case(DESTINATION_ONLY_INTENT)) {
            let destination_key = self
                .destination()
                .ok_or(RequestError::MissingDestination)?
                .to_string();
            return Ok(QueryIntent::DestinationOnly { destination_key });
        }

        Err(RequestError::UnsupportedIntent {
            name: name.map(str::to_string),
            destination: self.destination().unwrap_or_default().to_string(),
        })
    }
}

/// Concatenate spoken route parts into route digits.
///
/// Numbers are rendered without decimals; at most three digits are kept.
pub fn route_digits(route: &Value) -> String {
    let parts = match route {
        Value::Array(parts) => parts.as_slice(),
        single => std::slice::from_ref(single),
    };

    let digits: String = parts
        .iter()
        .filter_map(|part| match part {
            Value::Number(n) => n.as_f64().map(|f| format!("{f:.0}")),
            Value::String(s) => Some(s.trim().to_string()),
            _ => None,
        })
        .collect();

    digits.chars().take(MAX_ROUTE_DIGITS).collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn request(body: Value) -> WebhookRequest {
        serde_json::from_value(body).unwrap()
    }

    #[test]
    fn bus_destination_request() {
        let req = request(json!({
            "responseId": "abc",
            "queryResult": {
                "queryText": "route 215 to sello",
                "parameters": {"route": [2, 1, 5], "place-attraction": "sello"},
                "intent": {"name": "projects/x/agent/intents/1", "displayName": "Bus-Destination"}
            }
        }));

        assert_eq!(
            req.to_intent(),
            Ok(QueryIntent::RouteAndDestination {
                route_digits: "215".into(),
                destination_key: "sello".into(),
            })
        );
    }

    #[test]
    fn destination_only_request() {
        let req = request(json!({
            "queryResult": {
                "parameters": {"place-attraction": "tapiola"},
                "intent": {"displayName": "destination-only"}
            }
        }));

        assert_eq!(
            req.to_intent(),
            Ok(QueryIntent::DestinationOnly {
                destination_key: "tapiola".into(),
            })
        );
    }

    #[test]
    fn route_without_route_parameter() {
        let req = request(json!({
            "queryResult": {
                "parameters": {"place-attraction": "sello"},
                "intent": {"displayName": "Bus-Destination"}
            }
        }));

        assert_eq!(req.to_intent(), Err(RequestError::MissingDestination));
    }

    #[test]
    fn unsupported_intent() {
        let req = request(json!({
            "queryResult": {
                "parameters": {"place-attraction": "sello"},
                "intent": {"displayName": "Default Welcome Intent"}
            }
        }));

        assert_eq!(
            req.to_intent(),
            Err(RequestError::UnsupportedIntent {
                name: Some("Default Welcome Intent".into()),
                destination: "sello".into(),
            })
        );
    }

    #[test]
    fn empty_request() {
        let req = WebhookRequest::default();
        assert!(req.destination().is_none());
        assert_eq!(
            req.to_intent(),
            Err(RequestError::UnsupportedIntent {
                name: None,
                destination: String::new(),
            })
        );
    }

    #[test]
    fn unfilled_slots_are_empty_strings() {
        let req = request(json!({
            "queryResult": {
                "parameters": {"route": "", "place-attraction": ""},
                "intent": {"displayName": "Bus-Destination"}
            }
        }));

        assert_eq!(req.destination(), Some(""));
        assert_eq!(
            req.to_intent(),
            Ok(QueryIntent::RouteAndDestination {
                route_digits: String::new(),
                destination_key: String::new(),
            })
        );
    }

    #[test]
    fn empty_route_list_keeps_the_query() {
        let req = request(json!({
            "queryResult": {
                "parameters": {"route": [], "place-attraction": "sello"},
                "intent": {"displayName": "Bus-Destination"}
            }
        }));

        assert_eq!(
            req.to_intent(),
            Ok(QueryIntent::RouteAndDestination {
                route_digits: String::new(),
                destination_key: "sello".into(),
            })
        );
    }

    #[test]
    fn route_digit_concatenation() {
        assert_eq!(route_digits(&json!([2, 1, 4])), "214");
        assert_eq!(route_digits(&json!([21, 4])), "214");
        assert_eq!(route_digits(&json!([214.0])), "214");
        assert_eq!(route_digits(&json!(["55"])), "55");
        assert_eq!(route_digits(&json!(550)), "550");
        assert_eq!(route_digits(&json!([])), "");
    }

    #[test]
    fn route_digits_are_capped() {
        assert_eq!(route_digits(&json!([2154, 7])), "215");
        assert_eq!(route_digits(&json!([1, 2, 3, 4])), "123");
    }

    #[test]
    fn route_digits_skip_non_numbers() {
        assert_eq!(route_digits(&json!([null, 5, {"a": 1}])), "5");
    }
}
