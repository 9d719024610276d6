//! Device diagnostics snapshot.
//!
//! `GET /api/sysinfo` returns firmware build info, heap statistics and,
//! when the firmware is built with tracing enabled, the task list.

use std::fmt;
use std::time::Duration;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// How often the diagnostics view refreshes when auto-refresh is on.
pub const SYS_INFO_REFRESH_INTERVAL: Duration = Duration::from_secs(5);

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SysInfo {
    pub app_state: AppState,
    pub software: Software,
    pub hardware: Hardware,
    pub memory: Memory,
    /// `None` unless the firmware has task tracing enabled.
    pub tasks: Option<Vec<TaskInfo>>,
    #[serde(default)]
    pub debug: Option<DebugInfo>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AppState {
    /// Device clock, milliseconds since the Unix epoch. `None` before SNTP sync.
    pub time: Option<i64>,
    pub mdns_hostname: String,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Software {
    pub app_version: String,
    pub idf_version: String,
    pub project_name: String,
    pub compile_time: String,
    pub compile_date: String,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Hardware {
    pub mac_address: String,
    pub chip_model: u32,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Memory {
    pub free_heap: u64,
    pub minimum_free_heap: u64,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TaskInfo {
    pub name: String,
    pub priority: u32,
    pub state: u8,
    pub stack_high_water_mark: u32,
    /// CPU share in percent, if runtime stats are compiled in.
    pub runtime: Option<u32>,
    pub core_id: Option<u32>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DebugInfo {
    /// Departures URL the device polls. `None` without a station.
    pub bvg_api_url: Option<String>,
}

/// Scheduler state of a task.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TaskState {
    Running,
    Ready,
    Blocked,
    Suspended,
    Deleted,
    Invalid,
}

impl TaskState {
    /// Map the scheduler's numeric state. Out-of-range values are `Invalid`.
    pub fn from_code(code: u8) -> Self {
        match code {
            0 => TaskState::Running,
            1 => TaskState::Ready,
            2 => TaskState::Blocked,
            3 => TaskState::Suspended,
            4 => TaskState::Deleted,
            _ => TaskState::Invalid,
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            TaskState::Running => "running",
            TaskState::Ready => "ready",
            TaskState::Blocked => "blocked",
            TaskState::Suspended => "suspended",
            TaskState::Deleted => "deleted",
            TaskState::Invalid => "invalid",
        }
    }
}

impl fmt::Display for TaskState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Chip name for an `esp_chip_model_t` code.
pub fn chip_model_name(code: u32) -> Option<&'static str> {
    match code {
        1 => Some("ESP32"),
        2 => Some("ESP32-S2"),
        5 => Some("ESP32-C3"),
        9 => Some("ESP32-S3"),
        12 => Some("ESP32-C2"),
        13 => Some("ESP32-C6"),
        16 => Some("ESP32-H2"),
        999 => Some("POSIX/Linux simulator"),
        _ => None,
    }
}

/// Display label for a sysinfo field name. Unknown keys label themselves.
pub fn field_label(key: &str) -> &str {
    match key {
        "time" => "System time (UTC)",
        "app_version" => "App version",
        "mdns_hostname" => "mDNS hostname",
        "idf_version" => "IDF version",
        "project_name" => "Project name",
        "compile_time" => "Compile time",
        "compile_date" => "Compile date",
        "free_heap" => "Free heap",
        "minimum_free_heap" => "Minimum free heap since boot",
        "mac_address" => "MAC address",
        "chip_model" => "Chip model",
        "bvg_api_url" => "BVG API URL",
        other => other,
    }
}

impl TaskInfo {
    pub fn task_state(&self) -> TaskState {
        TaskState::from_code(self.state)
    }
}

impl AppState {
    /// Device clock as a UTC timestamp.
    pub fn system_time(&self) -> Option<DateTime<Utc>> {
        self.time.and_then(DateTime::from_timestamp_millis)
    }
}

impl SysInfo {
    /// Tasks with the most stack headroom first.
    pub fn tasks_by_stack_headroom(&self) -> Vec<&TaskInfo> {
        let mut tasks: Vec<&TaskInfo> = self.tasks.iter().flatten().collect();
        tasks.sort_by(|a, b| b.stack_high_water_mark.cmp(&a.stack_high_water_mark));
        tasks
    }

    pub fn chip_name(&self) -> &str {
        chip_model_name(self.hardware.chip_model).unwrap_or("Unknown")
    }

    /// Labelled rows for the scalar sections, in display order.
    pub fn rows(&self) -> Vec<(&'static str, String)> {
        let time = self
            .app_state
            .system_time()
            .map(|t| t.format("%Y-%m-%d %H:%M:%S").to_string())
            .unwrap_or_else(|| "Unknown".to_string());
        let url = self
            .debug
            .as_ref()
            .and_then(|d| d.bvg_api_url.clone())
            .unwrap_or_else(|| "No station configured".to_string());

        vec![
            ("time", time),
            ("mdns_hostname", self.app_state.mdns_hostname.clone()),
            ("app_version", self.software.app_version.clone()),
            ("idf_version", self.software.idf_version.clone()),
            ("project_name", self.software.project_name.clone()),
            ("compile_time", self.software.compile_time.clone()),
            ("compile_date", self.software.compile_date.clone()),
            ("free_heap", self.memory.free_heap.to_string()),
            ("minimum_free_heap", self.memory.minimum_free_heap.to_string()),
            ("chip_model", self.chip_name().to_string()),
            ("mac_address", self.hardware.mac_address.clone()),
            ("bvg_api_url", url),
        ]
    }
}

#[cfg(test)]
pub(crate) fn sample() -> SysInfo {
    SysInfo {
        app_state: AppState {
            time: Some(1_700_000_000_000),
            mdns_hostname: "suntransit.local".to_string(),
        },
        software: Software {
            app_version: "v1.2.0".to_string(),
            idf_version: "v5.3".to_string(),
            project_name: "suntransit".to_string(),
            compile_time: "12:00:00".to_string(),
            compile_date: "Jan  1 2025".to_string(),
        },
        hardware: Hardware {
            mac_address: "1A:2B:3C:4D:5E:6F".to_string(),
            chip_model: 9,
        },
        memory: Memory {
            free_heap: 123_456,
            minimum_free_heap: 100_000,
        },
        tasks: Some(vec![
            TaskInfo {
                name: "IDLE0".to_string(),
                priority: 0,
                state: 1,
                stack_high_water_mark: 800,
                runtime: Some(90),
                core_id: Some(0),
            },
            TaskInfo {
                name: "main".to_string(),
                priority: 1,
                state: 0,
                stack_high_water_mark: 2400,
                runtime: Some(5),
                core_id: Some(1),
            },
        ]),
        debug: None,
    }
}
