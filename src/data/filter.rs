use chrono::NaiveDate;

use super::model::Table;

// ---------------------------------------------------------------------------
// Date interval: the range selected in the side panel
// ---------------------------------------------------------------------------

/// Inclusive `[start, end]` range of dates.
///
/// `start > end` is representable on purpose: filtering with an inverted
/// interval yields an empty table rather than an error.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct DateInterval {
    pub start: NaiveDate,
    pub end: NaiveDate,
}

impl DateInterval {
    pub fn new(start: NaiveDate, end: NaiveDate) -> Self {
        DateInterval { start, end }
    }

    /// The interval covering the whole of `bounds`.
    pub fn spanning((min, max): (NaiveDate, NaiveDate)) -> Self {
        DateInterval::new(min, max)
    }

    /// Clamp both ends into `[min, max]`.
    pub fn clamped(self, (min, max): (NaiveDate, NaiveDate)) -> Self {
        DateInterval {
            start: self.start.clamp(min, max),
            end: self.end.clamp(min, max),
        }
    }

    pub fn is_inverted(&self) -> bool {
        self.start > self.end
    }

    pub fn contains(&self, date: NaiveDate) -> bool {
        self.start <= date && date <= self.end
    }
}

// ---------------------------------------------------------------------------
// Queries
// ---------------------------------------------------------------------------

/// Earliest and latest `dteday` in the table; `None` when it is empty.
pub fn date_bounds(table: &Table) -> Option<(NaiveDate, NaiveDate)> {
    table.iter().fold(None, |acc, rec| match acc {
        None => Some((rec.dteday, rec.dteday)),
        Some((lo, hi)) => Some((lo.min(rec.dteday), hi.max(rec.dteday))),
    })
}

/// Rows whose date lies in `[start, end]`, inclusive, in original order.
///
/// An inverted range (`start > end`) matches nothing.
pub fn filter_by_date(table: &Table, start: NaiveDate, end: NaiveDate) -> Table {
    let interval = DateInterval::new(start, end);
    table
        .iter()
        .filter(|rec| interval.contains(rec.dteday))
        .cloned()
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::data::model::fixtures::{date, record, season_table};

    #[test]
    fn date_bounds_scans_all_rows() {
        let table = Table::from_records(vec![
            record(date(2011, 6, 1), 2.0, 1.0),
            record(date(2011, 1, 1), 1.0, 1.0),
            record(date(2012, 12, 31), 1.0, 1.0),
        ]);
        assert_eq!(
            date_bounds(&table),
            Some((date(2011, 1, 1), date(2012, 12, 31)))
        );
        assert_eq!(date_bounds(&Table::default()), None);
    }

    #[test]
    fn single_day_interval_returns_that_day() {
        let table = season_table();
        let day = date(2011, 1, 1);
        let out = filter_by_date(&table, day, day);
        assert_eq!(out.len(), 1);
        assert_eq!(out.records()[0], table.records()[0]);
    }

    #[test]
    fn filter_is_inclusive_and_preserves_order() {
        let table = Table::from_records(vec![
            record(date(2011, 1, 3), 1.0, 3.0),
            record(date(2011, 1, 1), 1.0, 1.0),
            record(date(2011, 1, 2), 1.0, 2.0),
            record(date(2011, 1, 5), 1.0, 5.0),
            record(date(2011, 1, 2), 1.0, 22.0),
        ]);
        let (s, e) = (date(2011, 1, 2), date(2011, 1, 3));
        let out = filter_by_date(&table, s, e);

        assert!(out.iter().all(|r| s <= r.dteday && r.dteday <= e));
        let expected: Vec<_> = table
            .iter()
            .filter(|r| s <= r.dteday && r.dteday <= e)
            .cloned()
            .collect();
        assert_eq!(out.records(), expected.as_slice());
        let counts: Vec<f64> = out.iter().map(|r| r.cnt_day).collect();
        assert_eq!(counts, vec![3.0, 2.0, 22.0]);
    }

    #[test]
    fn inverted_interval_is_empty() {
        let table = season_table();
        let out = filter_by_date(&table, date(2011, 6, 1), date(2011, 1, 1));
        assert!(out.is_empty());
    }

    #[test]
    fn filter_is_idempotent() {
        let table = season_table();
        let a = filter_by_date(&table, date(2011, 1, 1), date(2011, 3, 1));
        let b = filter_by_date(&table, date(2011, 1, 1), date(2011, 3, 1));
        assert_eq!(a, b);
        assert_eq!(table, season_table());
    }

    #[test]
    fn clamped_keeps_interval_inside_bounds() {
        let bounds = (date(2011, 1, 1), date(2012, 12, 31));
        let wide = DateInterval::new(date(2010, 5, 5), date(2013, 1, 1)).clamped(bounds);
        assert_eq!(wide, DateInterval::spanning(bounds));

        let inside = DateInterval::new(date(2011, 2, 1), date(2011, 3, 1));
        assert_eq!(inside.clamped(bounds), inside);
        assert!(!inside.is_inverted());
        assert!(DateInterval::new(date(2011, 3, 1), date(2011, 2, 1)).is_inverted());
    }
}
