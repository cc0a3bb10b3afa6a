use std::collections::BTreeSet;
use std::path::PathBuf;

use chrono::NaiveDate;

use crate::color::ChartPalette;
use crate::data::filter::{DateInterval, date_bounds, filter_by_date};
use crate::data::model::Table;

// ---------------------------------------------------------------------------
// Panel toggles
// ---------------------------------------------------------------------------

/// Every collapsible section of the dashboard.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum Panel {
    Hourly,
    Condition,
    Season,
    Month,
    Weekday,
    Temperature,
    Humidity,
    Windspeed,
    Weather,
}

impl Panel {
    /// Label of the button that opens / closes the panel.
    pub fn button_label(self) -> &'static str {
        match self {
            Panel::Hourly => "Details",
            Panel::Condition => "Condition",
            Panel::Season => "Bike Renters By Season",
            Panel::Month => "Bike Renters By Month",
            Panel::Weekday => "Bike Renters By Day",
            Panel::Temperature => "Effect of Temperature",
            Panel::Humidity => "Effect of Humidity",
            Panel::Windspeed => "Effect of Windspeed",
            Panel::Weather => "Effect of Weathersit",
        }
    }
}

/// Which panels are open in this session. All start closed.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct PanelToggles {
    open: BTreeSet<Panel>,
}

impl PanelToggles {
    pub fn is_open(&self, panel: Panel) -> bool {
        self.open.contains(&panel)
    }

    pub fn toggle(&mut self, panel: Panel) {
        if !self.open.remove(&panel) {
            self.open.insert(panel);
        }
    }
}

// ---------------------------------------------------------------------------
// Application state
// ---------------------------------------------------------------------------

/// The full UI state, independent of rendering.
pub struct AppState {
    /// The loaded dataset, never mutated once set.
    pub table: Table,

    /// File the table was read from.
    pub source: Option<PathBuf>,

    /// Earliest and latest date in `table` (None if it is empty).
    pub bounds: Option<(NaiveDate, NaiveDate)>,

    /// Selected date range, kept inside `bounds`.
    pub interval: Option<DateInterval>,

    /// Rows of `table` inside `interval` (recomputed when it changes).
    pub visible: Table,

    pub panels: PanelToggles,

    pub palette: ChartPalette,

    /// Status / error message shown in the UI.
    pub status_message: Option<String>,
}

impl AppState {
    pub fn new(table: Table, source: Option<PathBuf>) -> Self {
        let mut state = AppState {
            table: Table::default(),
            source: None,
            bounds: None,
            interval: None,
            visible: Table::default(),
            panels: PanelToggles::default(),
            palette: ChartPalette::default(),
            status_message: None,
        };
        state.set_dataset(table, source);
        state
    }

    /// Ingest a newly loaded dataset and reset the interval to its full span.
    ///
    /// Panel toggles survive so the same charts stay open for the new data.
    pub fn set_dataset(&mut self, table: Table, source: Option<PathBuf>) {
        self.bounds = date_bounds(&table);
        self.interval = self.bounds.map(DateInterval::spanning);
        self.table = table;
        self.source = source;
        self.status_message = None;
        self.refilter();
    }

    /// Move the start of the interval, clamped to the table's dates.
    pub fn set_start(&mut self, start: NaiveDate) {
        if let Some(interval) = self.interval {
            self.set_interval(DateInterval { start, ..interval });
        }
    }

    /// Move the end of the interval, clamped to the table's dates.
    pub fn set_end(&mut self, end: NaiveDate) {
        if let Some(interval) = self.interval {
            self.set_interval(DateInterval { end, ..interval });
        }
    }

    fn set_interval(&mut self, interval: DateInterval) {
        let Some(bounds) = self.bounds else {
            return;
        };
        let clamped = interval.clamped(bounds);
        if self.interval == Some(clamped) {
            return;
        }
        if clamped.is_inverted() {
            log::warn!(
                "Start date {} is after end date {}; no rows selected",
                clamped.start,
                clamped.end
            );
        }
        self.interval = Some(clamped);
        self.refilter();
    }

    /// Recompute `visible` after an interval change.
    pub fn refilter(&mut self) {
        self.visible = match self.interval {
            Some(iv) => filter_by_date(&self.table, iv.start, iv.end),
            None => Table::default(),
        };
        log::debug!(
            "{} of {} rows in selected range",
            self.visible.len(),
            self.table.len()
        );
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::data::model::fixtures::{date, season_table};

    #[test]
    fn panels_start_closed_and_toggle() {
        let mut panels = PanelToggles::default();
        assert!(!panels.is_open(Panel::Season));
        panels.toggle(Panel::Season);
        assert!(panels.is_open(Panel::Season));
        assert!(!panels.is_open(Panel::Month));
        panels.toggle(Panel::Season);
        assert!(!panels.is_open(Panel::Season));
    }

    #[test]
    fn new_state_spans_whole_table() {
        let state = AppState::new(season_table(), None);
        assert_eq!(state.bounds, Some((date(2011, 1, 1), date(2011, 6, 1))));
        assert_eq!(
            state.interval,
            Some(DateInterval::new(date(2011, 1, 1), date(2011, 6, 1)))
        );
        assert_eq!(state.visible, state.table);
    }

    #[test]
    fn moving_ends_refilters_and_clamps() {
        let mut state = AppState::new(season_table(), None);
        state.set_end(date(2011, 1, 1));
        assert_eq!(state.visible.len(), 1);

        state.set_start(date(2000, 1, 1));
        state.set_end(date(2030, 1, 1));
        assert_eq!(
            state.interval,
            Some(DateInterval::new(date(2011, 1, 1), date(2011, 6, 1)))
        );
        assert_eq!(state.visible.len(), 3);
    }

    #[test]
    fn inverted_interval_shows_nothing() {
        let mut state = AppState::new(season_table(), None);
        state.set_start(date(2011, 6, 1));
        state.set_end(date(2011, 1, 2));
        assert!(state.interval.is_some_and(|iv| iv.is_inverted()));
        assert!(state.visible.is_empty());
        assert_eq!(state.table.len(), 3);
    }

    #[test]
    fn empty_table_has_no_interval() {
        let mut state = AppState::new(Table::default(), None);
        assert_eq!(state.interval, None);
        state.set_start(date(2011, 1, 1));
        assert!(state.visible.is_empty());
    }
}
