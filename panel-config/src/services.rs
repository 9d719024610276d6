//! Product toggles for the current station.
//!
//! The "Services" section lists one row per product group with a switch to
//! show or hide that product's departures on the panel.

use crate::domain::{CurrentStation, DomainError, Product};

/// One product group as the services section shows it.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ProductRow<'a> {
    pub product: Product,
    pub lines: &'a [String],
    pub enabled: bool,
    /// Switches are hidden when the station only has one product group.
    pub toggle_shown: bool,
    /// The last enabled product can't be switched off.
    pub toggle_locked: bool,
}

/// Whether the section shows switches at all.
pub fn show_toggles(station: &CurrentStation) -> bool {
    station.station.lines_by_product.len() > 1
}

/// Whether switching `product` off is forbidden.
pub fn is_toggle_locked(station: &CurrentStation, product: Product) -> bool {
    station.is_enabled(product) && station.enabled_products.len() == 1
}

/// Rows in canonical product order.
pub fn product_rows(station: &CurrentStation) -> Vec<ProductRow<'_>> {
    let toggle_shown = show_toggles(station);
    station
        .station
        .lines_by_product
        .iter()
        .map(|(product, lines)| ProductRow {
            product: *product,
            lines,
            enabled: station.is_enabled(*product),
            toggle_shown,
            toggle_locked: is_toggle_locked(station, *product),
        })
        .collect()
}

/// The station with `product` switched on or off.
///
/// Switching on a product the station doesn't serve, or switching off the
/// last enabled one, is rejected. Setting a switch to its current position
/// returns the station unchanged.
pub fn toggle_product(
    station: &CurrentStation,
    product: Product,
    enabled: bool,
) -> Result<CurrentStation, DomainError> {
    if !station.station.serves(product) {
        return Err(DomainError::ProductNotServed {
            product,
            station: station.station.name.clone(),
        });
    }

    let mut next = station.clone();
    if enabled {
        next.enabled_products.insert(product);
    } else {
        if is_toggle_locked(station, product) {
            return Err(DomainError::LastEnabledProduct(product));
        }
        next.enabled_products.remove(&product);
    }

    Ok(next)
}
