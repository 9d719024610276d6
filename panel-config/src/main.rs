use std::process::ExitCode;

use structopt::StructOpt;
use tokio::io::{AsyncBufReadExt, BufReader};
use tokio::net::TcpListener;
use tracing::{error, info, warn};

use panel_config::config::{CliError, Command, Opts, init_logging};
use panel_config::device::{DeviceClient, SYS_INFO_REFRESH_INTERVAL, SysInfo};
use panel_config::domain::{Settings, Station};
use panel_config::locations::{
    CachedStationSource, LocationsClient, SearchCacheConfig, StationPicker, StationSearch,
    StationSource,
};
use panel_config::mock::{self, MockDevice};
use panel_config::services::product_rows;
use panel_config::sync::SettingsSync;

#[tokio::main]
async fn main() -> ExitCode {
    init_logging();
    let opts = Opts::from_args();

    match run(opts).await {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            error!("{e}");
            ExitCode::FAILURE
        }
    }
}

async fn run(opts: Opts) -> Result<(), CliError> {
    if let Command::ServeMock { addr, .. } = opts.command {
        let config = opts.command.mock_config().unwrap_or_default();
        let listener = TcpListener::bind(addr).await?;
        mock::serve(listener, MockDevice::new(config)).await?;
        return Ok(());
    }

    let device = DeviceClient::new(opts.device_config())?;

    match opts.command.clone() {
        Command::Show => {
            let mut sync = SettingsSync::new(device);
            print_settings(sync.load().await?);
        }
        Command::Sysinfo { watch } => sysinfo(&device, watch).await?,
        Command::Search { query } => {
            let locations = LocationsClient::new(opts.locations_config())?;
            let stations = locations.search_stations(&query).await?;
            if stations.is_empty() {
                return Err(CliError::NoMatch(query));
            }
            print_options(&stations);
        }
        Command::Pick => {
            let locations = LocationsClient::new(opts.locations_config())?;
            pick(SettingsSync::new(device), locations).await?;
        }
        Command::SetStation { query, index } => {
            let locations = LocationsClient::new(opts.locations_config())?;
            let mut picker = StationPicker::new();
            picker.set_options(locations.search_stations(&query).await?);
            if picker.select_index(index).is_none() {
                return Err(CliError::NoMatch(query));
            }

            let mut sync = SettingsSync::new(device);
            sync.load().await?;
            submit(&mut sync, &mut picker).await?;
        }
        Command::MinMinutes { minutes } => {
            let mut sync = SettingsSync::new(device);
            sync.load().await?;
            let result = sync.set_min_departure_minutes(minutes).await;
            report(&mut sync);
            print_settings(&result?);
        }
        Command::Toggle { product, state } => {
            let mut sync = SettingsSync::new(device);
            sync.load().await?;
            let result = sync.toggle_product(product, state).await;
            report(&mut sync);
            print_settings(&result?);
        }
        Command::ServeMock { .. } => {}
    }

    Ok(())
}

async fn sysinfo(device: &DeviceClient, watch: bool) -> Result<(), CliError> {
    if !watch {
        print_sysinfo(&device.get_sysinfo().await?);
        return Ok(());
    }

    let mut interval = tokio::time::interval(SYS_INFO_REFRESH_INTERVAL);
    loop {
        interval.tick().await;
        match device.get_sysinfo().await {
            Ok(info) => print_sysinfo(&info),
            Err(e) => warn!(error = %e, "failed to fetch sysinfo"),
        }
    }
}

/// Interactive station picker: each line is a search, `:N` picks result N.
async fn pick(
    mut sync: SettingsSync<DeviceClient>,
    locations: LocationsClient,
) -> Result<(), CliError> {
    let settings = sync.load().await?;
    if let Some(current) = &settings.current_station {
        println!("Current station: {}", current.name());
    }

    let search = StationSearch::new(CachedStationSource::new(
        locations,
        &SearchCacheConfig::default(),
    ));
    let mut results = search.subscribe();
    let mut picker = StationPicker::new();
    let mut lines = BufReader::new(tokio::io::stdin()).lines();

    println!("Type a station name, `:N` to pick result N, an empty line to quit.");
    loop {
        tokio::select! {
            line = lines.next_line() => {
                let Some(line) = line? else { break };
                let line = line.trim();
                if line.is_empty() {
                    break;
                }

                let Some(index) = line.strip_prefix(':') else {
                    let _ = search.input(line);
                    continue;
                };
                let Ok(index) = index.trim().parse::<usize>() else {
                    println!("`:N` takes a number");
                    continue;
                };
                if picker.select_index(index).is_none() {
                    println!("No result {index}");
                    continue;
                }
                if submit(&mut sync, &mut picker).await? {
                    break;
                }
            }
            changed = results.changed() => {
                if changed.is_err() {
                    break;
                }
                let latest = results.borrow_and_update().clone();
                info!(query = %latest.query, found = latest.stations.len(), "search results");
                picker.set_options(latest.stations);
                print_options(picker.options());
            }
        }
    }

    Ok(())
}

/// Save the picker's selection. Returns whether anything was saved.
async fn submit(
    sync: &mut SettingsSync<DeviceClient>,
    picker: &mut StationPicker,
) -> Result<bool, CliError> {
    let current_id = sync
        .settings()
        .and_then(|s| s.current_station.as_ref())
        .map(|s| s.id().to_string());

    let Some(station) = picker.submit(current_id.as_deref(), sync.is_saving()) else {
        println!("Already the current station");
        return Ok(false);
    };

    let result = sync.select_station(station).await;
    report(sync);
    print_settings(&result?);
    Ok(true)
}

fn report(sync: &mut SettingsSync<DeviceClient>) {
    for notification in sync.take_notifications() {
        if notification.is_error() {
            eprintln!("{notification}");
        } else {
            println!("{notification}");
        }
    }
}

fn print_settings(settings: &Settings) {
    match &settings.current_station {
        Some(station) => {
            println!("Station: {} ({})", station.name(), station.id());
            for row in product_rows(station) {
                let mark = if row.enabled { "x" } else { " " };
                let lock = if row.toggle_locked { " (locked)" } else { "" };
                println!(
                    "  [{mark}] {:<9} {}{lock}",
                    row.product.label(),
                    row.lines.join(", ")
                );
            }
        }
        None => println!("Station: none"),
    }
    println!(
        "Hide departures leaving in less than: {} min",
        settings.min_departure_minutes
    );
    println!("Departures shown: {}", settings.max_departure_count);
    println!(
        "Cancelled departures: {}",
        if settings.show_cancelled_departures { "shown" } else { "hidden" }
    );
}

fn print_options(stations: &[Station]) {
    for (i, station) in stations.iter().enumerate() {
        let products: Vec<&str> = station.products().map(|p| p.label()).collect();
        println!("{i:>3}  {}  [{}]", station.name, products.join(", "));
    }
}

fn print_sysinfo(info: &SysInfo) {
    for (label, value) in info.rows() {
        println!("{:<28} {value}", panel_config::device::sysinfo::field_label(label));
    }

    let tasks = info.tasks_by_stack_headroom();
    if !tasks.is_empty() {
        println!();
        println!(
            "{:<20} {:>8} {:>10} {:>10} {:>7} {:>5}",
            "Task", "Priority", "State", "Stack HWM", "Runtime", "Core"
        );
        for task in tasks {
            let runtime = task.runtime.map(|r| format!("{r}%")).unwrap_or_default();
            let core = task.core_id.map(|c| c.to_string()).unwrap_or_default();
            println!(
                "{:<20} {:>8} {:>10} {:>10} {:>7} {:>5}",
                task.name,
                task.priority,
                task.task_state().to_string(),
                task.stack_high_water_mark,
                runtime,
                core
            );
        }
    }
    println!();
}
