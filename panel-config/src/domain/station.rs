//! Station types.

use std::collections::{BTreeMap, BTreeSet};

use serde::{Deserialize, Serialize};

use super::error::DomainError;
use super::product::Product;

/// A transit stop with the lines serving it, grouped by product.
///
/// Groups are keyed by [`Product`] in an ordered map, so iteration order is
/// the canonical product order. Within a group, line names keep the order in
/// which the source reported them.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Station {
    pub id: String,
    pub name: String,
    #[serde(default)]
    pub lines_by_product: BTreeMap<Product, Vec<String>>,
}

impl Station {
    /// Products served at this station, in canonical order.
    pub fn products(&self) -> impl Iterator<Item = Product> + '_ {
        self.lines_by_product.keys().copied()
    }

    /// Whether the station has at least one line of the given product.
    pub fn serves(&self, product: Product) -> bool {
        self.lines_by_product.contains_key(&product)
    }

    /// Line names of one product group (empty if the product isn't served).
    pub fn lines(&self, product: Product) -> &[String] {
        self.lines_by_product
            .get(&product)
            .map(Vec::as_slice)
            .unwrap_or(&[])
    }
}

/// The station the device shows departures for, with the products the user
/// chose to display.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CurrentStation {
    #[serde(flatten)]
    pub station: Station,
    #[serde(default)]
    pub enabled_products: BTreeSet<Product>,
}

impl CurrentStation {
    /// Select a station with every product it serves enabled.
    pub fn with_all_products(station: Station) -> Self {
        let enabled_products = station.products().collect();
        Self {
            station,
            enabled_products,
        }
    }

    pub fn id(&self) -> &str {
        &self.station.id
    }

    pub fn name(&self) -> &str {
        &self.station.name
    }

    pub fn is_enabled(&self, product: Product) -> bool {
        self.enabled_products.contains(&product)
    }

    /// Check the enabled set against the station's product groups.
    ///
    /// Enabled products must be served by the station, and a station with
    /// any product group must keep at least one of them enabled.
    pub fn validate(&self) -> Result<(), DomainError> {
        if let Some(product) = self
            .enabled_products
            .iter()
            .find(|p| !self.station.serves(**p))
        {
            return Err(DomainError::ProductNotServed {
                product: *product,
                station: self.station.name.clone(),
            });
        }

        if self.enabled_products.is_empty() && !self.station.lines_by_product.is_empty() {
            return Err(DomainError::NoProductEnabled(self.station.name.clone()));
        }

        Ok(())
    }
}

#[cfg(test)]
pub(crate) fn station(id: &str, name: &str, groups: &[(Product, &[&str])]) -> Station {
    Station {
        id: id.to_string(),
        name: name.to_string(),
        lines_by_product: groups
            .iter()
            .map(|(p, lines)| (*p, lines.iter().map(|l| l.to_string()).collect()))
            .collect(),
    }
}
