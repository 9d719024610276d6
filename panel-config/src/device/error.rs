//! Device client error types.

/// Errors from the device HTTP client.
#[derive(Debug, thiserror::Error)]
pub enum DeviceError {
    /// HTTP request failed (network error, timeout, etc.)
    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    /// Device answered with an error status
    #[error("device error {status}: {message}")]
    Api { status: u16, message: String },

    /// JSON deserialization failed
    #[error("JSON parse error: {message}{}", .body.as_deref().map(|b| format!(" (body: {b})")).unwrap_or_default())]
    Json {
        message: String,
        body: Option<String>,
    },
}
