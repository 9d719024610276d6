//! Device HTTP client.
//!
//! Talks to the REST API the panel firmware serves next to the dashboard.

use serde::de::DeserializeOwned;
use tracing::debug;

use crate::domain::{Settings, SettingsUpdate};
use crate::sync::SettingsApi;

use super::error::DeviceError;
use super::sysinfo::SysInfo;

/// Default device address (mDNS).
pub const DEFAULT_DEVICE_URL: &str = "http://suntransit.local";

/// Configuration for the device client.
#[derive(Debug, Clone)]
pub struct DeviceConfig {
    /// Base URL of the device, without the `/api` prefix
    pub base_url: String,
    /// Request timeout in seconds
    pub timeout_secs: u64,
}

impl DeviceConfig {
    pub fn new(base_url: impl Into<String>) -> Self {
        Self {
            base_url: base_url.into(),
            timeout_secs: 10,
        }
    }

    /// Set request timeout.
    pub fn with_timeout(mut self, secs: u64) -> Self {
        self.timeout_secs = secs;
        self
    }
}

impl Default for DeviceConfig {
    fn default() -> Self {
        Self::new(DEFAULT_DEVICE_URL)
    }
}

/// Client for the device REST API.
#[derive(Debug, Clone)]
pub struct DeviceClient {
    http: reqwest::Client,
    base_url: String,
}

impl DeviceClient {
    pub fn new(config: DeviceConfig) -> Result<Self, DeviceError> {
        let http = reqwest::Client::builder()
            .timeout(std::time::Duration::from_secs(config.timeout_secs))
            .build()?;

        Ok(Self {
            http,
            base_url: config.base_url.trim_end_matches('/').to_string(),
        })
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    /// `GET /api/settings`
    pub async fn get_settings(&self) -> Result<Settings, DeviceError> {
        self.get_json("/api/settings").await
    }

    /// `POST /api/settings` with a partial update.
    ///
    /// The device answers `{}`; only the status matters.
    pub async fn post_settings(&self, update: &SettingsUpdate) -> Result<(), DeviceError> {
        let url = format!("{}/api/settings", self.base_url);
        let response = self.http.post(&url).json(update).send().await?;
        let status = response.status();

        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            return Err(DeviceError::Api {
                status: status.as_u16(),
                message: body,
            });
        }

        debug!(?update, "settings posted");
        Ok(())
    }

    /// `GET /api/sysinfo`
    pub async fn get_sysinfo(&self) -> Result<SysInfo, DeviceError> {
        self.get_json("/api/sysinfo").await
    }

    async fn get_json<T: DeserializeOwned>(&self, path: &str) -> Result<T, DeviceError> {
        let url = format!("{}{}", self.base_url, path);
        let response = self.http.get(&url).send().await?;
        let status = response.status();

        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            return Err(DeviceError::Api {
                status: status.as_u16(),
                message: body,
            });
        }

        let body = response.text().await?;

        serde_json::from_str(&body).map_err(|e| DeviceError::Json {
            message: e.to_string(),
            body: Some(body.chars().take(500).collect()),
        })
    }
}

impl SettingsApi for DeviceClient {
    type Error = DeviceError;

    async fn fetch_settings(&self) -> Result<Settings, DeviceError> {
        self.get_settings().await
    }

    async fn update_settings(&self, update: &SettingsUpdate) -> Result<(), DeviceError> {
        self.post_settings(update).await
    }
}
