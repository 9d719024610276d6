//! Turn raw locations results into stations grouped by product.

use std::collections::{BTreeMap, HashSet};

use tracing::trace;

use crate::domain::{Product, Station};

use super::types::{LineItem, LocationItem};

/// Normalize every result that identifies a stop.
///
/// Results without an id (addresses, points of interest) are skipped.
pub fn normalize_results(items: &[LocationItem]) -> Vec<Station> {
    items
        .iter()
        .filter(|item| item.id.as_deref().is_some_and(|id| !id.is_empty()))
        .map(normalize_station)
        .collect()
}

/// Build a [`Station`] from one search result.
///
/// Lines are filtered and grouped in four steps:
/// 1. lines without an id are dropped,
/// 2. repeated ids keep their first occurrence,
/// 3. ids starting with `r` are filed under [`Product::Regional`], whatever
///    product the API claims (regional trains come back labelled as buses),
/// 4. the rest are grouped by product, keeping first-seen order per group.
///
/// Lines whose product is missing or unknown are dropped as well. Nothing
/// here fails: bad entries just don't make it into the result.
pub fn normalize_station(item: &LocationItem) -> Station {
    let mut seen = HashSet::new();
    let mut lines_by_product: BTreeMap<Product, Vec<String>> = BTreeMap::new();

    for line in item.lines.iter().flatten() {
        let Some(id) = line.id.as_deref().filter(|id| !id.is_empty()) else {
            continue;
        };
        if !seen.insert(id) {
            continue;
        }
        let Some(product) = classify(id, line) else {
            trace!(line = id, product = ?line.product, "dropping line with unknown product");
            continue;
        };

        lines_by_product
            .entry(product)
            .or_default()
            .push(line.name.clone().unwrap_or_default());
    }

    Station {
        id: item.id.clone().unwrap_or_default(),
        name: item.name.clone().unwrap_or_default(),
        lines_by_product,
    }
}

fn classify(id: &str, line: &LineItem) -> Option<Product> {
    if id.starts_with('r') {
        return Some(Product::Regional);
    }
    line.product.as_deref()?.parse().ok()
}


#[cfg(test)]
mod proptests {
    use super::*;
    use proptest::prelude::*;

    fn product_name() -> impl Strategy<Value = String> {
        prop_oneof![
            Just("suburban".to_string()),
            Just("subway".to_string()),
            Just("tram".to_string()),
            Just("bus".to_string()),
            Just("ferry".to_string()),
            Just("express".to_string()),
            Just("regional".to_string()),
        ]
    }

    /// Short ids from a small alphabet so duplicates and "r" prefixes are common.
    fn line() -> impl Strategy<Value = LineItem> {
        ("[rs1-3]{0,2}", "[A-Z]{1,3}", product_name()).prop_map(|(id, name, product)| LineItem {
            id: Some(id),
            name: Some(name),
            product: Some(product),
        })
    }

    fn line_list() -> impl Strategy<Value = Vec<LineItem>> {
        prop::collection::vec(line(), 0..20)
    }

    fn station_for(lines: &[LineItem]) -> Station {
        normalize_station(&LocationItem {
            id: Some("1".to_string()),
            name: Some("Test".to_string()),
            lines: Some(lines.to_vec()),
        })
    }

    proptest! {
        /// Output has exactly one entry per distinct non-empty id.
        #[test]
        fn one_entry_per_distinct_id(lines in line_list()) {
            let station = station_for(&lines);
            let distinct: HashSet<_> = lines
                .iter()
                .filter_map(|l| l.id.as_deref())
                .filter(|id| !id.is_empty())
                .collect();
            let total: usize = station.lines_by_product.values().map(Vec::len).sum();
            prop_assert_eq!(total, distinct.len());
        }

        /// Empty-id lines never contribute a name.
        #[test]
        fn empty_ids_absent(lines in line_list()) {
            let with_empty: Vec<LineItem> = lines
                .iter()
                .cloned()
                .chain(std::iter::once(LineItem::new("", "EMPTY", "bus")))
                .collect();
            let station = station_for(&with_empty);
            let names: Vec<&String> = station.lines_by_product.values().flatten().collect();
            prop_assert!(!names.iter().any(|n| n.as_str() == "EMPTY"));
        }

        /// The first occurrence of each id is the one that survives.
        #[test]
        fn first_occurrence_survives(lines in line_list()) {
            let station = station_for(&lines);
            let mut seen = HashSet::new();
            for line in &lines {
                let id = line.id.as_deref().unwrap_or_default();
                if id.is_empty() || !seen.insert(id) {
                    continue;
                }
                let product = if id.starts_with('r') {
                    Product::Regional
                } else {
                    line.product.as_deref().unwrap().parse().unwrap()
                };
                let name = line.name.as_deref().unwrap();
                prop_assert!(station.lines(product).iter().any(|n| n == name));
            }
        }

        /// Lines with an "r" id only ever land in the regional group.
        #[test]
        fn r_prefix_is_regional(lines in line_list()) {
            let only_r: Vec<LineItem> = lines
                .into_iter()
                .filter(|l| l.id.as_deref().is_some_and(|id| id.starts_with('r')))
                .collect();
            let station = station_for(&only_r);
            prop_assert!(station.products().all(|p| p == Product::Regional));
        }
    }
}
