//! Digitransit client error types.

use super::convert::ConversionError;

/// Errors from fetching or converting stop data.
#[derive(Debug, thiserror::Error)]
pub enum DigitransitError {
    /// HTTP request failed (network error, timeout, etc.)
    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    /// JSON deserialization failed
    #[error("JSON parse error: {message}")]
    Json {
        message: String,
        body: Option<String>,
    },

    /// API returned an error status code
    #[error("API error {status}: {message}")]
    Api { status: u16, message: String },

    /// Request was rejected (missing or invalid subscription key)
    #[error("unauthorized: check the Digitransit API key")]
    Unauthorized,

    /// GraphQL layer reported errors and returned no data
    #[error("GraphQL error: {0}")]
    GraphQl(String),

    /// Response did not describe a usable stop
    #[error(transparent)]
    Conversion(#[from] ConversionError),
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn error_display() {
        let err = DigitransitError::Api {
            status: 500,
            message: "Internal Server Error".into(),
        };
        assert_eq!(err.to_string(), "API error 500: Internal Server Error");

        let err = DigitransitError::Json {
            message: "expected value".into(),
            body: Some("<html>".into()),
        };
        assert_eq!(err.to_string(), "JSON parse error: expected value");

        let err = DigitransitError::GraphQl("Validation error".into());
        assert_eq!(err.to_string(), "GraphQL error: Validation error");

        let err = DigitransitError::from(ConversionError::StopNotFound("HSL:1".into()));
        assert_eq!(err.to_string(), "stop not found: HSL:1");
    }
}
