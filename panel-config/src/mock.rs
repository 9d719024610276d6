//! Mock device for development without hardware.
//!
//! Serves `/api/settings` and `/api/sysinfo` from memory the way the panel
//! firmware does, optionally failing a share of settings requests and
//! serving a static dashboard build for every other path.

use std::collections::BTreeMap;
use std::path::PathBuf;
use std::sync::Arc;
use std::sync::atomic::{AtomicU64, Ordering};

use axum::{
    Json, Router,
    extract::State,
    http::StatusCode,
    routing::get,
};
use chrono::Utc;
use rand::Rng;
use tokio::net::TcpListener;
use tokio::sync::RwLock;
use tower_http::services::ServeDir;
use tracing::{debug, info};

use crate::device::sysinfo::{
    AppState, DebugInfo, Hardware, Memory, Software, SysInfo, TaskInfo,
};
use crate::domain::{CurrentStation, Product, Settings, SettingsUpdate};
use crate::locations::DEFAULT_BASE_URL;

/// Reported chip model (ESP32).
const MOCK_CHIP_MODEL: u32 = 1;

/// Configuration for the mock device.
#[derive(Debug, Clone)]
pub struct MockConfig {
    /// Probability (0.0..=1.0) that a settings request answers 500.
    pub failure_rate: f64,
    /// Hostname reported in sysinfo.
    pub hostname: String,
    /// Report a task list, as firmware built with tracing does.
    pub report_tasks: bool,
    /// Directory served for non-API paths.
    pub static_dir: Option<PathBuf>,
}

impl Default for MockConfig {
    fn default() -> Self {
        Self {
            failure_rate: 0.0,
            hostname: "suntransit-fake.local".to_string(),
            report_tasks: true,
            static_dir: None,
        }
    }
}

impl MockConfig {
    pub fn with_failure_rate(mut self, rate: f64) -> Self {
        self.failure_rate = rate.clamp(0.0, 1.0);
        self
    }

    pub fn with_static_dir(mut self, dir: impl Into<PathBuf>) -> Self {
        self.static_dir = Some(dir.into());
        self
    }
}

/// In-memory device state.
#[derive(Clone)]
pub struct MockDevice {
    settings: Arc<RwLock<Settings>>,
    config: Arc<MockConfig>,
    // f64 bits, adjustable while serving
    failure_rate: Arc<AtomicU64>,
}

impl MockDevice {
    pub fn new(config: MockConfig) -> Self {
        let failure_rate = config.failure_rate.clamp(0.0, 1.0);
        Self {
            settings: Arc::new(RwLock::new(Settings::default())),
            config: Arc::new(config),
            failure_rate: Arc::new(AtomicU64::new(failure_rate.to_bits())),
        }
    }

    /// Start from the given settings instead of the defaults.
    pub fn with_settings(self, settings: Settings) -> Self {
        Self {
            settings: Arc::new(RwLock::new(settings)),
            ..self
        }
    }

    pub fn failure_rate(&self) -> f64 {
        f64::from_bits(self.failure_rate.load(Ordering::Relaxed))
    }

    /// Change the share of failing settings requests for every clone.
    pub fn set_failure_rate(&self, rate: f64) {
        let rate = rate.clamp(0.0, 1.0);
        self.failure_rate.store(rate.to_bits(), Ordering::Relaxed);
    }

    /// Current stored settings.
    pub async fn settings(&self) -> Settings {
        self.settings.read().await.clone()
    }

    /// Build the HTTP router.
    pub fn router(&self) -> Router {
        let api = Router::new()
            .route("/api/settings", get(get_settings).post(post_settings))
            .route("/api/sysinfo", get(get_sysinfo))
            .with_state(self.clone());

        match &self.config.static_dir {
            Some(dir) => api.fallback_service(ServeDir::new(dir)),
            None => api,
        }
    }

    fn should_fail(&self) -> bool {
        let rate = self.failure_rate();
        rate > 0.0 && rand::thread_rng().gen_bool(rate)
    }

    async fn sysinfo(&self) -> SysInfo {
        let settings = self.settings.read().await;
        let mut rng = rand::thread_rng();

        let tasks = self.config.report_tasks.then(|| {
            (0..10)
                .map(|i| TaskInfo {
                    name: format!("TaskNumber{i}"),
                    priority: i,
                    state: rng.gen_range(0..6),
                    stack_high_water_mark: rng.gen_range(0..10_000),
                    runtime: Some(rng.gen_range(0..100)),
                    core_id: Some(rng.gen_range(0..2)),
                })
                .collect()
        });

        SysInfo {
            app_state: AppState {
                time: Some(Utc::now().timestamp_millis()),
                mdns_hostname: self.config.hostname.clone(),
            },
            software: Software {
                app_version: "Mock app version".to_string(),
                idf_version: "Mock IDF version".to_string(),
                project_name: "Mock project name".to_string(),
                compile_time: "Mock compile time".to_string(),
                compile_date: "Mock compile date".to_string(),
            },
            hardware: Hardware {
                mac_address: "1A:2B:3C:4D:5E:6F".to_string(),
                chip_model: MOCK_CHIP_MODEL,
            },
            memory: Memory {
                free_heap: 123_456,
                minimum_free_heap: 123_456,
            },
            tasks,
            debug: Some(DebugInfo {
                bvg_api_url: settings
                    .current_station
                    .as_ref()
                    .map(|station| departures_url(station, settings.max_departure_count)),
            }),
        }
    }
}

/// The departures URL the firmware polls for a station.
///
/// Every product appears as a query flag, set for the enabled ones.
/// Parameters are sorted by name.
pub fn departures_url(station: &CurrentStation, max_results: u32) -> String {
    let mut params: BTreeMap<&str, String> = BTreeMap::from([
        ("results", max_results.to_string()),
        ("pretty", "false".to_string()),
        ("remarks", "false".to_string()),
        ("duration", "60".to_string()),
    ]);
    for product in Product::ALL {
        params.insert(product.as_str(), station.is_enabled(product).to_string());
    }

    let query: Vec<String> = params.iter().map(|(k, v)| format!("{k}={v}")).collect();
    format!(
        "{}/stops/{}/departures?{}",
        DEFAULT_BASE_URL,
        station.id(),
        query.join("&")
    )
}

async fn get_settings(State(device): State<MockDevice>) -> Result<Json<Settings>, StatusCode> {
    if device.should_fail() {
        return Err(StatusCode::INTERNAL_SERVER_ERROR);
    }
    Ok(Json(device.settings().await))
}

async fn post_settings(
    State(device): State<MockDevice>,
    Json(update): Json<SettingsUpdate>,
) -> Result<Json<serde_json::Value>, StatusCode> {
    if device.should_fail() {
        debug!(?update, "failing settings update on purpose");
        return Err(StatusCode::INTERNAL_SERVER_ERROR);
    }

    let mut settings = device.settings.write().await;
    settings.apply(&update);
    debug!(settings = ?*settings, "updated settings");

    Ok(Json(serde_json::json!({})))
}

async fn get_sysinfo(State(device): State<MockDevice>) -> Json<SysInfo> {
    Json(device.sysinfo().await)
}

/// Serve the mock device until the listener fails.
pub async fn serve(listener: TcpListener, device: MockDevice) -> std::io::Result<()> {
    if let Ok(addr) = listener.local_addr() {
        info!("mock device listening on http://{addr}");
    }
    axum::serve(listener, device.router()).await
}
