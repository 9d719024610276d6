//! Domain types for the departures panel configuration.
//!
//! Products, stations and settings as the device stores them, plus the
//! partial updates the dashboard sends. Validation lives on the types so
//! callers can check an edit before it goes over the wire.

mod error;
mod product;
mod settings;
mod station;

pub use error::DomainError;
pub use product::{Product, UnknownProduct};
pub use settings::{
    DEFAULT_MAX_DEPARTURE_COUNT, MAX_MIN_DEPARTURE_MINUTES, Settings, SettingsUpdate,
};
pub use station::{CurrentStation, Station};

#[cfg(test)]
pub(crate) use station::station as test_station;
