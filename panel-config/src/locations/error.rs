//! Locations API error types.

/// Errors that can occur when searching the locations API.
#[derive(Debug, thiserror::Error)]
pub enum LocationsError {
    /// HTTP request failed
    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    /// Rate limited by the API
    #[error("rate limited by locations API")]
    RateLimited,

    /// API returned an error status
    #[error("API error {status}: {message}")]
    Api { status: u16, message: String },

    /// Failed to parse response JSON
    #[error("JSON parse error: {message}")]
    Json { message: String },
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn error_display() {
        let err = LocationsError::Api {
            status: 503,
            message: "upstream timeout".into(),
        };
        assert_eq!(err.to_string(), "API error 503: upstream timeout");

        let err = LocationsError::Json {
            message: "expected value".into(),
        };
        assert_eq!(err.to_string(), "JSON parse error: expected value");

        assert_eq!(
            LocationsError::RateLimited.to_string(),
            "rate limited by locations API"
        );
    }
}
