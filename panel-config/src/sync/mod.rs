//! Settings synchronization with optimistic updates.
//!
//! The settings shown to the user are a local copy of the device's. Edits are
//! applied locally first, posted, and then either confirmed or rolled back.

mod error;
mod notification;
mod state;
mod synchronizer;

use std::future::Future;

use crate::domain::{Settings, SettingsUpdate};

pub use error::SyncError;
pub use notification::{Notification, SaveKind, Severity};
pub use state::SyncState;
pub use synchronizer::SettingsSync;

/// Remote settings resource.
pub trait SettingsApi {
    type Error: std::error::Error + Send + Sync + 'static;

    /// Read the full settings.
    fn fetch_settings(&self) -> impl Future<Output = Result<Settings, Self::Error>> + Send;

    /// Apply a partial update.
    fn update_settings(
        &self,
        update: &SettingsUpdate,
    ) -> impl Future<Output = Result<(), Self::Error>> + Send;
}
