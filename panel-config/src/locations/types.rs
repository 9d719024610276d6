//! Locations API request and response types.
//!
//! These mirror the JSON the transit API speaks. Every field is optional on
//! the way in: the API omits or nulls fields freely, and the normalizer
//! filters whatever doesn't make sense.

use serde::{Deserialize, Serialize};

/// Query string for `GET /locations`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct LocationsQuery {
    pub query: String,
    pub fuzzy: bool,
    pub results: u32,
    pub stops: bool,
    pub addresses: bool,
    pub poi: bool,
    pub lines_of_stops: bool,
    pub language: &'static str,
}

impl LocationsQuery {
    /// Stops only, with their lines, ten results.
    pub fn stops(query: impl Into<String>) -> Self {
        Self {
            query: query.into(),
            fuzzy: true,
            results: 10,
            stops: true,
            addresses: false,
            poi: false,
            lines_of_stops: true,
            language: "en",
        }
    }

    pub fn with_results(mut self, results: u32) -> Self {
        self.results = results;
        self
    }
}

/// One search result.
#[derive(Debug, Clone, Default, Deserialize, Serialize)]
pub struct LocationItem {
    #[serde(default)]
    pub id: Option<String>,
    #[serde(default)]
    pub name: Option<String>,
    #[serde(default)]
    pub lines: Option<Vec<LineItem>>,
}

/// A line serving a stop, as reported by the API.
#[derive(Debug, Clone, Default, Deserialize, Serialize)]
pub struct LineItem {
    #[serde(default)]
    pub id: Option<String>,
    #[serde(default)]
    pub name: Option<String>,
    #[serde(default)]
    pub product: Option<String>,
}

impl LineItem {
    pub fn new(id: &str, name: &str, product: &str) -> Self {
        Self {
            id: Some(id.to_string()),
            name: Some(name.to_string()),
            product: Some(product.to_string()),
        }
    }
}
