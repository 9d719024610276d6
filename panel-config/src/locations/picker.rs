//! Station picker state.

use crate::domain::{CurrentStation, Station};

/// Options and selection of the "select new station" dialog.
#[derive(Debug, Clone, Default)]
pub struct StationPicker {
    options: Vec<Station>,
    selected: Option<Station>,
}

impl StationPicker {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn options(&self) -> &[Station] {
        &self.options
    }

    pub fn selected(&self) -> Option<&Station> {
        self.selected.as_ref()
    }

    /// Replace the options with a fresh result list.
    pub fn set_options(&mut self, stations: Vec<Station>) {
        self.options = stations;
    }

    /// Select an option, or clear the selection with `None`.
    ///
    /// A selected station is kept at the front of the option list so it stays
    /// visible when the next results arrive.
    pub fn select(&mut self, station: Option<Station>) {
        if let Some(station) = &station {
            self.options.insert(0, station.clone());
        }
        self.selected = station;
    }

    /// Select the option at `index`, if there is one.
    pub fn select_index(&mut self, index: usize) -> Option<&Station> {
        let station = self.options.get(index).cloned();
        self.select(station);
        self.selected.as_ref()
    }

    /// Whether "Save" is unavailable.
    ///
    /// Nothing selected, the already current station selected, or a save in
    /// flight all disable submission.
    pub fn is_submission_disabled(&self, current_station_id: Option<&str>, saving: bool) -> bool {
        match &self.selected {
            None => true,
            Some(selected) => saving || Some(selected.id.as_str()) == current_station_id,
        }
    }

    /// Take the selection as the new current station, every product enabled.
    ///
    /// Returns `None` when submission is disabled; the selection is cleared
    /// otherwise.
    pub fn submit(
        &mut self,
        current_station_id: Option<&str>,
        saving: bool,
    ) -> Option<CurrentStation> {
        if self.is_submission_disabled(current_station_id, saving) {
            return None;
        }
        self.selected
            .take()
            .map(CurrentStation::with_all_products)
    }
}
