//! Configuration client for a departure board panel.
//!
//! The panel shows upcoming public-transit departures for one station. This
//! crate finds stations on the transit locations API, edits the panel's
//! settings with optimistic updates, reads its diagnostics, and can stand in
//! for the device with a mock server.

pub mod config;
pub mod device;
pub mod domain;
pub mod locations;
pub mod mock;
pub mod services;
pub mod sync;
