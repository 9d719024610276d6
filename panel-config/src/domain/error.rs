//! Domain error types.
//!
//! These errors represent rule violations in settings edits. They are
//! distinct from API/IO errors.

use super::Product;

/// Domain-level errors for settings validation.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum DomainError {
    /// Enabled product has no lines at the station
    #[error("{station} has no {product} lines")]
    ProductNotServed { product: Product, station: String },

    /// Station has product groups but none are enabled
    #[error("at least one product must stay enabled at {0}")]
    NoProductEnabled(String),

    /// Disabling this product would leave nothing enabled
    #[error("{0} is the last enabled product and cannot be disabled")]
    LastEnabledProduct(Product),

    /// Edit requires a selected station
    #[error("no station selected")]
    NoStation,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn error_display() {
        let err = DomainError::ProductNotServed {
            product: Product::Ferry,
            station: "Zoo".into(),
        };
        assert_eq!(err.to_string(), "Zoo has no ferry lines");

        let err = DomainError::NoProductEnabled("Zoo".into());
        assert_eq!(err.to_string(), "at least one product must stay enabled at Zoo");

        let err = DomainError::LastEnabledProduct(Product::Bus);
        assert_eq!(
            err.to_string(),
            "bus is the last enabled product and cannot be disabled"
        );

        assert_eq!(DomainError::NoStation.to_string(), "no station selected");
    }
}
