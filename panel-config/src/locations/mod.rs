//! Transit locations search.
//!
//! Looks up stops by name on the third-party locations API, normalizes the
//! line listings into [`Station`](crate::domain::Station)s and debounces
//! searches driven by keystrokes.
//!
//! Key characteristics of the API:
//! - lines without an id and repeated lines show up regularly
//! - regional trains are sometimes reported as buses; their ids start
//!   with `r`

mod cache;
mod client;
mod error;
mod normalize;
mod picker;
mod search;
mod types;

pub use cache::{CachedStationSource, SearchCacheConfig};
pub use client::{DEFAULT_BASE_URL, LocationsClient, LocationsConfig, StationSource};
pub use error::LocationsError;
pub use normalize::{normalize_results, normalize_station};
pub use picker::StationPicker;
pub use search::{SEARCH_DEBOUNCE, SearchResults, StationSearch};
pub use types::{LineItem, LocationItem, LocationsQuery};
