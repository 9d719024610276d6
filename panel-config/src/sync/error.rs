//! Settings synchronizer error types.

use crate::domain::DomainError;

type BoxError = Box<dyn std::error::Error + Send + Sync>;

/// Errors from loading or saving settings.
#[derive(Debug, thiserror::Error)]
pub enum SyncError {
    /// Fetching settings from the device failed
    #[error("Error loading settings: {0}")]
    Load(#[source] BoxError),

    /// Posting the update failed; the optimistic value was rolled back
    #[error("Error saving settings: {0}")]
    Save(#[source] BoxError),

    /// Save attempted before settings were loaded
    #[error("settings not loaded")]
    NotLoaded,

    /// Another save is still in flight
    #[error("a settings save is already in progress")]
    SaveInProgress,

    /// The update breaks a settings rule
    #[error(transparent)]
    Invalid(#[from] DomainError),
}

impl SyncError {
    pub(crate) fn load(err: impl std::error::Error + Send + Sync + 'static) -> Self {
        SyncError::Load(Box::new(err))
    }

    pub(crate) fn save(err: impl std::error::Error + Send + Sync + 'static) -> Self {
        SyncError::Save(Box::new(err))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::Product;

    #[test]
    fn error_display() {
        let err = SyncError::load(DomainError::NoStation);
        assert_eq!(err.to_string(), "Error loading settings: no station selected");

        assert_eq!(
            SyncError::SaveInProgress.to_string(),
            "a settings save is already in progress"
        );

        let err: SyncError = DomainError::LastEnabledProduct(Product::Tram).into();
        assert_eq!(
            err.to_string(),
            "tram is the last enabled product and cannot be disabled"
        );
    }
}
