//! Dialogflow webhook response envelope.
//!
//! Every reply, including error replies, is a complete envelope: the
//! assistant treats an empty body as a transport failure.

use serde::Serialize;

use crate::resolver::MAX_ANSWER_LINES;

const DESTINATION_UNMAPPED_TEXT: &str = "Destination could not be mapped";
const DESTINATION_UNMAPPED_SPEECH: &str = "Sorry, but destination could not be mapped! Please retry.";
const NO_ROUTES_TEXT: &str = "No routes to provided destination";
const NO_ROUTES_SPEECH: &str = "Sorry, but no routes were found! Please retry.";

/// Webhook response body.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct WebhookResponse {
    pub fulfillment_text: String,
    pub payload: Payload,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Payload {
    pub google: GooglePayload,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct GooglePayload {
    pub expect_user_response: bool,
    pub rich_response: RichResponse,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct RichResponse {
    pub items: Vec<Item>,
    pub suggestions: Vec<Suggestion>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Item {
    pub simple_response: SimpleResponse,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct SimpleResponse {
    pub text_to_speech: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Suggestion {
    pub title: String,
}

impl WebhookResponse {
    fn new(fulfillment_text: impl Into<String>, speech: impl IntoIterator<Item = String>) -> Self {
        let items = speech
            .into_iter()
            .map(|text_to_speech| Item {
                simple_response: SimpleResponse { text_to_speech },
            })
            .collect();

        Self {
            fulfillment_text: fulfillment_text.into(),
            payload: Payload {
                google: GooglePayload {
                    expect_user_response: true,
                    rich_response: RichResponse {
                        items,
                        suggestions: Vec::new(),
                    },
                },
            },
        }
    }

    /// Reply with resolved answer lines.
    ///
    /// Only the first [`MAX_ANSWER_LINES`] lines are spoken.
    pub fn answers(route_digits: &str, lines: Vec<String>) -> Self {
        Self::new(
            format!("Here are upcoming buses for route {route_digits}"),
            lines.into_iter().take(MAX_ANSWER_LINES),
        )
    }

    /// Reply for a destination with no configured headsign.
    pub fn destination_unmapped() -> Self {
        Self::new(
            DESTINATION_UNMAPPED_TEXT,
            [DESTINATION_UNMAPPED_SPEECH.to_string()],
        )
    }

    /// Reply for a query that matched no departures.
    pub fn no_routes_found() -> Self {
        Self::new(NO_ROUTES_TEXT, [NO_ROUTES_SPEECH.to_string()])
    }

    /// Spoken texts, in order.
    pub fn speech(&self) -> Vec<&str> {
        self.payload
            .google
            .rich_response
            .items
            .iter()
            .map(|item| item.simple_response.text_to_speech.as_str())
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn answers_envelope_shape() {
        let response = WebhookResponse::answers("215", vec!["Leaves from Sello (E1234) at 01:00".into()]);

        let json = serde_json::to_value(&response).unwrap();
        assert_eq!(
            json,
            json!({
                "fulfillmentText": "Here are upcoming buses for route 215",
                "payload": {
                    "google": {
                        "expectUserResponse": true,
                        "richResponse": {
                            "items": [
                                {"simpleResponse": {"textToSpeech": "Leaves from Sello (E1234) at 01:00"}}
                            ],
                            "suggestions": []
                        }
                    }
                }
            })
        );
    }

    #[test]
    fn answers_are_capped() {
        let lines = vec!["a".to_string(), "b".to_string(), "c".to_string()];
        let response = WebhookResponse::answers("", lines);

        assert_eq!(response.speech(), ["a", "b"]);
        assert_eq!(response.fulfillment_text, "Here are upcoming buses for route ");
    }

    #[test]
    fn error_envelopes_have_one_item() {
        let unmapped = WebhookResponse::destination_unmapped();
        assert_eq!(unmapped.fulfillment_text, "Destination could not be mapped");
        assert_eq!(
            unmapped.speech(),
            ["Sorry, but destination could not be mapped! Please retry."]
        );
        assert!(unmapped.payload.google.expect_user_response);

        let no_routes = WebhookResponse::no_routes_found();
        assert_eq!(no_routes.fulfillment_text, "No routes to provided destination");
        assert_eq!(
            no_routes.speech(),
            ["Sorry, but no routes were found! Please retry."]
        );
    }
}
