//! Device settings and partial updates.

use serde::{Deserialize, Serialize};

use super::error::DomainError;
use super::station::CurrentStation;

/// Upper bound of the "hide departures leaving in less than" filter.
pub const MAX_MIN_DEPARTURE_MINUTES: u32 = 30;

/// Default number of departures the device lists.
pub const DEFAULT_MAX_DEPARTURE_COUNT: u32 = 12;

/// Settings stored on the device.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Settings {
    /// Departures leaving sooner than this are hidden.
    pub min_departure_minutes: u32,

    /// How many departures the panel lists at most.
    #[serde(default = "default_max_departure_count")]
    pub max_departure_count: u32,

    #[serde(default = "default_show_cancelled")]
    pub show_cancelled_departures: bool,

    /// `None` until the user picks a station.
    pub current_station: Option<CurrentStation>,
}

fn default_max_departure_count() -> u32 {
    DEFAULT_MAX_DEPARTURE_COUNT
}

fn default_show_cancelled() -> bool {
    true
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            min_departure_minutes: 0,
            max_departure_count: DEFAULT_MAX_DEPARTURE_COUNT,
            show_cancelled_departures: true,
            current_station: None,
        }
    }
}

impl Settings {
    /// Shallow merge: fields present in the update replace ours.
    pub fn merged(&self, update: &SettingsUpdate) -> Settings {
        let mut next = self.clone();
        next.apply(update);
        next
    }

    pub fn apply(&mut self, update: &SettingsUpdate) {
        if let Some(minutes) = update.min_departure_minutes {
            self.min_departure_minutes = minutes;
        }
        if let Some(count) = update.max_departure_count {
            self.max_departure_count = count;
        }
        if let Some(show) = update.show_cancelled_departures {
            self.show_cancelled_departures = show;
        }
        if let Some(station) = &update.current_station {
            self.current_station = Some(station.clone());
        }
    }
}

/// Partial settings, as posted to the device.
///
/// Absent fields are left out of the JSON body so the device keeps its
/// stored value for them.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SettingsUpdate {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub min_departure_minutes: Option<u32>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub max_departure_count: Option<u32>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub show_cancelled_departures: Option<bool>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub current_station: Option<CurrentStation>,
}

impl SettingsUpdate {
    /// Update only the departure filter, clamped to `0..=30` minutes.
    pub fn min_departure_minutes(minutes: u32) -> Self {
        Self {
            min_departure_minutes: Some(minutes.min(MAX_MIN_DEPARTURE_MINUTES)),
            ..Self::default()
        }
    }

    /// Select a station.
    pub fn station(station: CurrentStation) -> Self {
        Self {
            current_station: Some(station),
            ..Self::default()
        }
        .normalized()
    }

    pub fn is_empty(&self) -> bool {
        self == &Self::default()
    }

    pub fn changes_station(&self) -> bool {
        self.current_station.is_some()
    }

    /// Apply the business rules that ride along with an update.
    ///
    /// A station change always resets the departure filter to 0.
    pub fn normalized(mut self) -> Self {
        if self.current_station.is_some() {
            self.min_departure_minutes = Some(0);
        }
        self
    }

    /// Check the station carried by this update, if any.
    pub fn validate(&self) -> Result<(), DomainError> {
        match &self.current_station {
            Some(station) => station.validate(),
            None => Ok(()),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::Product;
    use crate::domain::station::station;

    #[test]
    fn defaults_match_device() {
        let settings = Settings::default();
        assert_eq!(settings.min_departure_minutes, 0);
        assert_eq!(settings.max_departure_count, 12);
        assert!(settings.show_cancelled_departures);
        assert!(settings.current_station.is_none());
    }

    #[test]
    fn deserialize_without_optional_fields() {
        let settings: Settings =
            serde_json::from_str(r#"{"minDepartureMinutes": 4, "currentStation": null}"#).unwrap();
        assert_eq!(settings.min_departure_minutes, 4);
        assert_eq!(settings.max_departure_count, DEFAULT_MAX_DEPARTURE_COUNT);
        assert!(settings.show_cancelled_departures);
    }

    #[test]
    fn update_skips_absent_fields() {
        let update = SettingsUpdate::min_departure_minutes(7);
        let json = serde_json::to_string(&update).unwrap();
        assert_eq!(json, r#"{"minDepartureMinutes":7}"#);
    }

    #[test]
    fn min_departure_minutes_is_clamped() {
        let update = SettingsUpdate::min_departure_minutes(45);
        assert_eq!(update.min_departure_minutes, Some(MAX_MIN_DEPARTURE_MINUTES));
    }

    #[test]
    fn merge_keeps_absent_fields() {
        let settings = Settings {
            min_departure_minutes: 5,
            max_departure_count: 8,
            ..Settings::default()
        };
        let merged = settings.merged(&SettingsUpdate::min_departure_minutes(10));

        assert_eq!(merged.min_departure_minutes, 10);
        assert_eq!(merged.max_departure_count, 8);
        assert_eq!(settings.min_departure_minutes, 5);
    }

    #[test]
    fn station_change_resets_filter() {
        let s = station("1", "Zoo", &[(Product::Bus, &["100"])]);
        let update = SettingsUpdate::station(CurrentStation::with_all_products(s));
        assert_eq!(update.min_departure_minutes, Some(0));

        let settings = Settings {
            min_departure_minutes: 12,
            ..Settings::default()
        };
        let merged = settings.merged(&update);
        assert_eq!(merged.min_departure_minutes, 0);
        assert_eq!(merged.current_station.unwrap().id(), "1");
    }

    #[test]
    fn normalized_overrides_explicit_filter() {
        let s = station("1", "Zoo", &[(Product::Bus, &["100"])]);
        let update = SettingsUpdate {
            min_departure_minutes: Some(9),
            current_station: Some(CurrentStation::with_all_products(s)),
            ..SettingsUpdate::default()
        }
        .normalized();
        assert_eq!(update.min_departure_minutes, Some(0));
    }

    #[test]
    fn empty_update() {
        assert!(SettingsUpdate::default().is_empty());
        assert!(!SettingsUpdate::min_departure_minutes(0).is_empty());
    }
}
