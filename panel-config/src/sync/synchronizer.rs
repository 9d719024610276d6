//! Settings synchronizer.
//!
//! Owns the settings state and the API it syncs with. Saves are applied
//! optimistically, sent, then confirmed or rolled back. Every finished save
//! queues a [`Notification`].
//!
//! Each state transition is published on a watch channel, so a view can
//! show the optimistic value while the save is still in flight.

use std::collections::VecDeque;

use tokio::sync::watch;
use tracing::{debug, info, warn};

use crate::domain::{CurrentStation, DomainError, Product, Settings, SettingsUpdate, Station};
use crate::services;

use super::SettingsApi;
use super::error::SyncError;
use super::notification::{Notification, SaveKind};
use super::state::SyncState;

pub struct SettingsSync<A> {
    api: A,
    state: SyncState,
    published: watch::Sender<SyncState>,
    notifications: VecDeque<Notification>,
}

impl<A: SettingsApi> SettingsSync<A> {
    pub fn new(api: A) -> Self {
        let (published, _) = watch::channel(SyncState::Unloaded);
        Self {
            api,
            state: SyncState::Unloaded,
            published,
            notifications: VecDeque::new(),
        }
    }

    pub fn api(&self) -> &A {
        &self.api
    }

    pub fn state(&self) -> &SyncState {
        &self.state
    }

    /// Settings to display (optimistic while a save is pending).
    pub fn settings(&self) -> Option<&Settings> {
        self.state.displayed()
    }

    pub fn is_saving(&self) -> bool {
        self.state.is_pending()
    }

    /// Watch state transitions, including the pending state of a save.
    pub fn subscribe(&self) -> watch::Receiver<SyncState> {
        self.published.subscribe()
    }

    /// Drain the notifications queued by finished saves.
    pub fn take_notifications(&mut self) -> Vec<Notification> {
        self.notifications.drain(..).collect()
    }

    /// Fetch settings from the device.
    ///
    /// On failure the state is left as it was; with nothing loaded the view
    /// has nothing to show but the error.
    pub async fn load(&mut self) -> Result<&Settings, SyncError> {
        if self.state.is_pending() {
            return Err(SyncError::SaveInProgress);
        }

        let settings = self.api.fetch_settings().await.map_err(|e| {
            warn!(error = %e, "failed to load settings");
            SyncError::load(e)
        })?;
        debug!(?settings, "settings loaded");

        self.state.loaded(settings)?;
        self.published.send_replace(self.state.clone());
        self.state.confirmed().ok_or(SyncError::NotLoaded)
    }

    /// Save a partial update.
    ///
    /// The merged value is displayed at once. If the device rejects the
    /// update, or the returned future is dropped before it finishes, the
    /// previously confirmed settings are restored. Failures are not retried.
    pub async fn save(&mut self, update: SettingsUpdate) -> Result<Settings, SyncError> {
        let update = self.state.begin(update)?;
        let kind = SaveKind::of(&update);
        self.published.send_replace(self.state.clone());

        let pending = PendingSave::new(&mut self.state, &self.published);
        match self.api.update_settings(&update).await {
            Ok(()) => {
                let settings = pending.succeed();
                info!(?kind, "settings saved");
                self.notifications.push_back(Notification::saved(kind));
                Ok(settings)
            }
            Err(e) => {
                pending.fail();
                warn!(?kind, error = %e, "saving settings failed, rolled back");
                self.notifications.push_back(Notification::save_failed(kind));
                Err(SyncError::save(e))
            }
        }
    }

    /// Save the "hide departures leaving in less than" filter.
    pub async fn set_min_departure_minutes(&mut self, minutes: u32) -> Result<Settings, SyncError> {
        self.save(SettingsUpdate::min_departure_minutes(minutes))
            .await
    }

    /// Switch to a new station with all of its products enabled.
    pub async fn change_station(&mut self, station: Station) -> Result<Settings, SyncError> {
        self.select_station(CurrentStation::with_all_products(station))
            .await
    }

    pub async fn select_station(&mut self, station: CurrentStation) -> Result<Settings, SyncError> {
        self.save(SettingsUpdate::station(station)).await
    }

    /// Show or hide one product's departures at the current station.
    pub async fn toggle_product(
        &mut self,
        product: Product,
        enabled: bool,
    ) -> Result<Settings, SyncError> {
        let settings = self.settings().ok_or(SyncError::NotLoaded)?;
        let current = settings
            .current_station
            .as_ref()
            .ok_or(DomainError::NoStation)?;
        let next = services::toggle_product(current, product, enabled)?;
        if &next == current {
            debug!(?product, enabled, "product switch unchanged, nothing to save");
            return Ok(settings.clone());
        }
        self.select_station(next).await
    }
}

/// Rolls a pending save back unless it is explicitly resolved.
///
/// Every resolution, rollback included, is published.
struct PendingSave<'a> {
    state: Option<&'a mut SyncState>,
    published: &'a watch::Sender<SyncState>,
}

impl<'a> PendingSave<'a> {
    fn new(state: &'a mut SyncState, published: &'a watch::Sender<SyncState>) -> Self {
        Self {
            state: Some(state),
            published,
        }
    }

    fn succeed(mut self) -> Settings {
        let Some(state) = self.state.take() else {
            return Settings::default();
        };
        let settings = state.succeed().cloned().unwrap_or_default();
        self.published.send_replace(state.clone());
        settings
    }

    fn fail(mut self) {
        if let Some(state) = self.state.take() {
            state.fail();
            self.published.send_replace(state.clone());
        }
    }
}

impl Drop for PendingSave<'_> {
    fn drop(&mut self) {
        if let Some(state) = self.state.take() {
            debug!("save abandoned, rolling back");
            state.fail();
            self.published.send_replace(state.clone());
        }
    }
}
