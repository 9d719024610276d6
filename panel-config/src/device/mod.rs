//! Device REST API client.
//!
//! The panel firmware owns two resources:
//! - `/api/settings`: read with GET, partially updated with POST
//! - `/api/sysinfo`: read-only diagnostics snapshot

mod client;
mod error;
pub mod sysinfo;

pub use client::{DEFAULT_DEVICE_URL, DeviceClient, DeviceConfig};
pub use error::DeviceError;
pub use sysinfo::{SYS_INFO_REFRESH_INTERVAL, SysInfo, TaskState};
