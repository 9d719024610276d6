//! Transit product types.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

/// Error returned when parsing an unknown product name.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("unknown product: {0}")]
pub struct UnknownProduct(pub String);

/// Category of transit line served at a stop.
///
/// The declaration order is the canonical order: product groups are always
/// iterated suburban first and regional last, whatever order the API
/// reported them in.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Product {
    Suburban,
    Subway,
    Tram,
    Bus,
    Ferry,
    Express,
    Regional,
}

impl Product {
    /// All products in canonical order.
    pub const ALL: [Product; 7] = [
        Product::Suburban,
        Product::Subway,
        Product::Tram,
        Product::Bus,
        Product::Ferry,
        Product::Express,
        Product::Regional,
    ];

    /// Wire name, as used by the device and the locations API.
    pub fn as_str(&self) -> &'static str {
        match self {
            Product::Suburban => "suburban",
            Product::Subway => "subway",
            Product::Tram => "tram",
            Product::Bus => "bus",
            Product::Ferry => "ferry",
            Product::Express => "express",
            Product::Regional => "regional",
        }
    }

    /// Human-readable name ("Suburban", "Bus", ...).
    pub fn label(&self) -> &'static str {
        match self {
            Product::Suburban => "Suburban",
            Product::Subway => "Subway",
            Product::Tram => "Tram",
            Product::Bus => "Bus",
            Product::Ferry => "Ferry",
            Product::Express => "Express",
            Product::Regional => "Regional",
        }
    }
}

impl FromStr for Product {
    type Err = UnknownProduct;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Product::ALL
            .into_iter()
            .find(|p| p.as_str() == s)
            .ok_or_else(|| UnknownProduct(s.to_string()))
    }
}

impl fmt::Display for Product {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parse_known_products() {
        for product in Product::ALL {
            assert_eq!(product.as_str().parse::<Product>(), Ok(product));
        }
    }

    #[test]
    fn reject_unknown_product() {
        assert_eq!(
            "national".parse::<Product>(),
            Err(UnknownProduct("national".to_string()))
        );
        assert!("Bus".parse::<Product>().is_err());
        assert!("".parse::<Product>().is_err());
    }

    #[test]
    fn canonical_order() {
        let mut shuffled = vec![Product::Regional, Product::Bus, Product::Suburban];
        shuffled.sort();
        assert_eq!(
            shuffled,
            vec![Product::Suburban, Product::Bus, Product::Regional]
        );
    }

    #[test]
    fn serde_lowercase() {
        assert_eq!(serde_json::to_string(&Product::Ferry).unwrap(), "\"ferry\"");
        let p: Product = serde_json::from_str("\"express\"").unwrap();
        assert_eq!(p, Product::Express);
    }

    #[test]
    fn label_capitalised() {
        assert_eq!(Product::Suburban.label(), "Suburban");
        assert_eq!(Product::Tram.to_string(), "tram");
    }
}
