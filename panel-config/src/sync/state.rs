//! Optimistic settings state machine.
//!
//! ```text
//! Unloaded --load--> Confirmed --begin--> Pending --succeed--> Confirmed(optimistic)
//!                        ^                   |
//!                        +------fail---------+   Confirmed(previous)
//! ```
//!
//! While a save is pending the optimistic value is what the user sees; the
//! previously confirmed value is kept so a failed save can be undone.

use std::mem;

use crate::domain::{Settings, SettingsUpdate};

use super::error::SyncError;

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub enum SyncState {
    /// Nothing fetched yet.
    #[default]
    Unloaded,
    /// Matches what the device last confirmed.
    Confirmed(Settings),
    /// An update is in flight.
    Pending {
        confirmed: Settings,
        optimistic: Settings,
    },
}

impl SyncState {
    /// The settings to display: optimistic while pending.
    pub fn displayed(&self) -> Option<&Settings> {
        match self {
            SyncState::Unloaded => None,
            SyncState::Confirmed(settings) => Some(settings),
            SyncState::Pending { optimistic, .. } => Some(optimistic),
        }
    }

    /// The last value the device confirmed.
    pub fn confirmed(&self) -> Option<&Settings> {
        match self {
            SyncState::Unloaded => None,
            SyncState::Confirmed(settings) => Some(settings),
            SyncState::Pending { confirmed, .. } => Some(confirmed),
        }
    }

    pub fn is_pending(&self) -> bool {
        matches!(self, SyncState::Pending { .. })
    }

    /// Take a freshly fetched value as confirmed.
    pub fn loaded(&mut self, settings: Settings) -> Result<(), SyncError> {
        if self.is_pending() {
            return Err(SyncError::SaveInProgress);
        }
        *self = SyncState::Confirmed(settings);
        Ok(())
    }

    /// Start a save: apply the update optimistically.
    ///
    /// Returns the update as it must be sent, with business rules applied.
    /// Invalid updates leave the state untouched.
    pub fn begin(&mut self, update: SettingsUpdate) -> Result<SettingsUpdate, SyncError> {
        let confirmed = match self {
            SyncState::Unloaded => return Err(SyncError::NotLoaded),
            SyncState::Pending { .. } => return Err(SyncError::SaveInProgress),
            SyncState::Confirmed(settings) => settings,
        };

        let update = update.normalized();
        update.validate()?;

        let optimistic = confirmed.merged(&update);
        let confirmed = mem::take(confirmed);
        *self = SyncState::Pending {
            confirmed,
            optimistic,
        };
        Ok(update)
    }

    /// The device accepted the update: the optimistic value becomes confirmed.
    pub fn succeed(&mut self) -> Option<&Settings> {
        self.resolve(true)
    }

    /// The update failed: go back to the previously confirmed value.
    pub fn fail(&mut self) -> Option<&Settings> {
        self.resolve(false)
    }

    fn resolve(&mut self, accepted: bool) -> Option<&Settings> {
        *self = match mem::take(self) {
            SyncState::Pending {
                confirmed,
                optimistic,
            } => SyncState::Confirmed(if accepted { optimistic } else { confirmed }),
            other => other,
        };
        self.confirmed()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::{CurrentStation, Product, test_station};

    fn confirmed(minutes: u32) -> SyncState {
        SyncState::Confirmed(Settings {
            min_departure_minutes: minutes,
            ..Settings::default()
        })
    }

    #[test]
    fn unloaded_rejects_save() {
        let mut state = SyncState::default();
        assert!(matches!(
            state.begin(SettingsUpdate::min_departure_minutes(3)),
            Err(SyncError::NotLoaded)
        ));
        assert!(state.displayed().is_none());
    }

    #[test]
    fn pending_shows_optimistic_value() {
        let mut state = confirmed(5);
        state.begin(SettingsUpdate::min_departure_minutes(10)).unwrap();

        assert!(state.is_pending());
        assert_eq!(state.displayed().unwrap().min_departure_minutes, 10);
        assert_eq!(state.confirmed().unwrap().min_departure_minutes, 5);
    }

    #[test]
    fn failure_restores_confirmed_value() {
        let mut state = confirmed(5);
        state.begin(SettingsUpdate::min_departure_minutes(10)).unwrap();

        let settings = state.fail().unwrap();
        assert_eq!(settings.min_departure_minutes, 5);
        assert_eq!(state, confirmed(5));
    }

    #[test]
    fn success_confirms_optimistic_value() {
        let mut state = confirmed(5);
        state.begin(SettingsUpdate::min_departure_minutes(10)).unwrap();

        state.succeed();
        assert_eq!(state, confirmed(10));
    }

    #[test]
    fn one_save_at_a_time() {
        let mut state = confirmed(5);
        state.begin(SettingsUpdate::min_departure_minutes(10)).unwrap();

        assert!(matches!(
            state.begin(SettingsUpdate::min_departure_minutes(15)),
            Err(SyncError::SaveInProgress)
        ));
        assert!(matches!(
            state.loaded(Settings::default()),
            Err(SyncError::SaveInProgress)
        ));
        assert_eq!(state.displayed().unwrap().min_departure_minutes, 10);
    }

    #[test]
    fn station_change_resets_filter_optimistically() {
        let mut state = confirmed(7);
        let station = CurrentStation::with_all_products(test_station(
            "1",
            "Zoo",
            &[(Product::Bus, &["100"])],
        ));
        let update = SettingsUpdate {
            current_station: Some(station),
            ..SettingsUpdate::default()
        };

        let sent = state.begin(update).unwrap();
        assert_eq!(sent.min_departure_minutes, Some(0));
        assert_eq!(state.displayed().unwrap().min_departure_minutes, 0);
    }

    #[test]
    fn invalid_update_leaves_state() {
        let mut state = confirmed(7);
        let mut station = CurrentStation::with_all_products(test_station(
            "1",
            "Zoo",
            &[(Product::Bus, &["100"])],
        ));
        station.enabled_products.clear();

        assert!(matches!(
            state.begin(SettingsUpdate::station(station)),
            Err(SyncError::Invalid(_))
        ));
        assert_eq!(state, confirmed(7));
    }

    #[test]
    fn resolve_without_pending_is_noop() {
        let mut state = confirmed(3);
        assert_eq!(state.fail().unwrap().min_departure_minutes, 3);
        assert_eq!(state, confirmed(3));
    }
}
