//! Command-line options and process setup.
//!
//! Every option falls back to a `PANEL_*` environment variable.

use std::net::SocketAddr;
use std::path::PathBuf;

use structopt::StructOpt;
use tracing_subscriber::{EnvFilter, layer::SubscriberExt, util::SubscriberInitExt};

use crate::device::{DeviceConfig, DeviceError};
use crate::domain::{DomainError, Product};
use crate::locations::{LocationsConfig, LocationsError};
use crate::mock::MockConfig;
use crate::sync::SyncError;

/// Log filter used when `RUST_LOG` is unset.
pub const DEFAULT_LOG_FILTER: &str = "info,panel_config=debug";

#[derive(StructOpt, Debug, Clone)]
#[structopt(name = "panel-config", about = "Configure a departure board panel")]
pub struct Opts {
    /// Device address
    #[structopt(long, default_value = "http://suntransit.local", env = "PANEL_DEVICE_URL")]
    pub device_url: String,

    /// Transit locations API base URL
    #[structopt(
        long,
        default_value = "https://v6.bvg.transport.rest",
        env = "PANEL_LOCATIONS_URL"
    )]
    pub locations_url: String,

    /// Request timeout in seconds
    #[structopt(long, default_value = "10", env = "PANEL_TIMEOUT_SECS")]
    pub timeout_secs: u64,

    #[structopt(subcommand)]
    pub command: Command,
}

#[derive(StructOpt, Debug, Clone)]
pub enum Command {
    /// Print the current settings
    Show,

    /// Print device diagnostics
    Sysinfo {
        /// Keep refreshing every few seconds
        #[structopt(long)]
        watch: bool,
    },

    /// Search stations by name
    Search { query: String },

    /// Search interactively and pick a station
    Pick,

    /// Make a search result the current station
    SetStation {
        query: String,
        /// Position in the result list
        #[structopt(long, default_value = "0")]
        index: usize,
    },

    /// Hide departures leaving sooner than this many minutes
    MinMinutes { minutes: u32 },

    /// Switch a product at the current station on or off
    Toggle {
        product: Product,
        #[structopt(parse(try_from_str = parse_switch))]
        state: bool,
    },

    /// Run a mock device
    ServeMock {
        #[structopt(long, default_value = "127.0.0.1:8080", env = "PANEL_MOCK_ADDR")]
        addr: SocketAddr,
        /// Share of settings requests answered with 500 (0.0 to 1.0)
        #[structopt(long, default_value = "0", env = "PANEL_MOCK_FAILURE_RATE")]
        failure_rate: f64,
        /// Directory served for every non-API path
        #[structopt(long, env = "PANEL_MOCK_STATIC_DIR")]
        static_dir: Option<PathBuf>,
        /// Report no task list, like firmware without tracing
        #[structopt(long)]
        no_tasks: bool,
    },
}

fn parse_switch(s: &str) -> Result<bool, String> {
    match s {
        "on" | "true" | "1" => Ok(true),
        "off" | "false" | "0" => Ok(false),
        other => Err(format!("expected on or off, got {other:?}")),
    }
}

impl Opts {
    pub fn device_config(&self) -> DeviceConfig {
        DeviceConfig::new(&self.device_url).with_timeout(self.timeout_secs)
    }

    pub fn locations_config(&self) -> LocationsConfig {
        LocationsConfig::default()
            .with_base_url(&self.locations_url)
            .with_timeout(self.timeout_secs)
    }
}

impl Command {
    /// Mock device configuration, for `serve-mock`.
    pub fn mock_config(&self) -> Option<MockConfig> {
        match self {
            Command::ServeMock {
                failure_rate,
                static_dir,
                no_tasks,
                ..
            } => Some(MockConfig {
                static_dir: static_dir.clone(),
                report_tasks: !no_tasks,
                ..MockConfig::default().with_failure_rate(*failure_rate)
            }),
            _ => None,
        }
    }
}

/// Install the global tracing subscriber.
pub fn init_logging() {
    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new(DEFAULT_LOG_FILTER));

    tracing_subscriber::registry()
        .with(filter)
        .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
        .init();
}

/// Anything a command can fail with.
#[derive(Debug, thiserror::Error)]
pub enum CliError {
    #[error(transparent)]
    Device(#[from] DeviceError),

    #[error(transparent)]
    Locations(#[from] LocationsError),

    #[error(transparent)]
    Sync(#[from] SyncError),

    #[error(transparent)]
    Domain(#[from] DomainError),

    #[error("no station found for {0:?}")]
    NoMatch(String),

    #[error("{0}")]
    Io(#[from] std::io::Error),
}

#[cfg(test)]
mod tests {
    use super::*;

    fn parse(args: &[&str]) -> Opts {
        Opts::from_iter_safe(std::iter::once("panel-config").chain(args.iter().copied())).unwrap()
    }

    #[test]
    fn explicit_flags_build_client_configs() {
        let opts = parse(&[
            "--device-url",
            "http://192.168.1.20/",
            "--locations-url",
            "http://localhost:3000",
            "--timeout-secs",
            "3",
            "show",
        ]);

        let device = opts.device_config();
        assert_eq!(device.base_url, "http://192.168.1.20/");
        assert_eq!(device.timeout_secs, 3);

        let locations = opts.locations_config();
        assert_eq!(locations.base_url, "http://localhost:3000");
        assert_eq!(locations.timeout_secs, 3);
        assert_eq!(locations.results, 10);
    }

    #[test]
    fn toggle_arguments() {
        let opts = parse(&["--device-url", "http://d", "toggle", "tram", "off"]);
        match opts.command {
            Command::Toggle { product, state } => {
                assert_eq!(product, Product::Tram);
                assert!(!state);
            }
            other => panic!("unexpected command {other:?}"),
        }

        let bad = Opts::from_iter_safe(["panel-config", "toggle", "zeppelin", "on"]);
        assert!(bad.is_err());
        let bad = Opts::from_iter_safe(["panel-config", "toggle", "bus", "maybe"]);
        assert!(bad.is_err());
    }

    #[test]
    fn set_station_defaults_to_first_result() {
        let opts = parse(&["--device-url", "http://d", "set-station", "alexanderplatz"]);
        match opts.command {
            Command::SetStation { query, index } => {
                assert_eq!(query, "alexanderplatz");
                assert_eq!(index, 0);
            }
            other => panic!("unexpected command {other:?}"),
        }
    }

    #[test]
    fn serve_mock_config() {
        let opts = parse(&[
            "--device-url",
            "http://d",
            "serve-mock",
            "--addr",
            "127.0.0.1:9000",
            "--failure-rate",
            "0.2",
            "--no-tasks",
        ]);

        let config = opts.command.mock_config().unwrap();
        assert_eq!(config.failure_rate, 0.2);
        assert!(!config.report_tasks);
        assert!(config.static_dir.is_none());
        assert_eq!(config.hostname, "suntransit-fake.local");

        assert!(parse(&["--device-url", "http://d", "show"]).command.mock_config().is_none());
    }

    #[test]
    fn switch_words() {
        assert_eq!(parse_switch("on"), Ok(true));
        assert_eq!(parse_switch("0"), Ok(false));
        assert!(parse_switch("yes please").is_err());
    }
}
