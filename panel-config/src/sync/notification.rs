//! User-visible save notifications.

use std::fmt;

use crate::domain::SettingsUpdate;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Severity {
    Success,
    Error,
}

/// What a save was about; decides the notification wording.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SaveKind {
    Settings,
    Station,
}

impl SaveKind {
    pub fn of(update: &SettingsUpdate) -> Self {
        if update.changes_station() {
            SaveKind::Station
        } else {
            SaveKind::Settings
        }
    }
}

/// A transient message shown after a save.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Notification {
    pub severity: Severity,
    pub message: String,
}

impl Notification {
    pub fn saved(kind: SaveKind) -> Self {
        let message = match kind {
            SaveKind::Settings => "Settings saved successfully",
            SaveKind::Station => "Station changed successfully",
        };
        Self {
            severity: Severity::Success,
            message: message.to_string(),
        }
    }

    pub fn save_failed(kind: SaveKind) -> Self {
        let message = match kind {
            SaveKind::Settings => "Error saving settings, please try again",
            SaveKind::Station => "Error, please try again",
        };
        Self {
            severity: Severity::Error,
            message: message.to_string(),
        }
    }

    pub fn is_error(&self) -> bool {
        self.severity == Severity::Error
    }
}

impl fmt::Display for Notification {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.message)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn wording() {
        assert_eq!(
            Notification::saved(SaveKind::Settings).to_string(),
            "Settings saved successfully"
        );
        assert_eq!(
            Notification::saved(SaveKind::Station).to_string(),
            "Station changed successfully"
        );
        assert_eq!(
            Notification::save_failed(SaveKind::Settings).to_string(),
            "Error saving settings, please try again"
        );
        assert!(Notification::save_failed(SaveKind::Station).is_error());
    }

    #[test]
    fn kind_of_update() {
        assert_eq!(
            SaveKind::of(&SettingsUpdate::min_departure_minutes(3)),
            SaveKind::Settings
        );
    }
}
