use std::cmp::Ordering;
use std::fmt;
use std::str::FromStr;

use chrono::{NaiveDate, NaiveDateTime};
use serde::{Deserialize, Deserializer};

use super::error::InvalidColumnError;

// ---------------------------------------------------------------------------
// Column – the fixed schema of the aggregated dataset
// ---------------------------------------------------------------------------

/// Time resolution of a measurement, encoded in the column-name suffix.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Granularity {
    /// `_day`: one value per date.
    Day,
    /// `_hour`: one value per 2-hour bucket, several rows share a date.
    Hour,
}

impl Granularity {
    /// Adjective for axis labels: "daily" or "2-hourly".
    pub fn label(self) -> &'static str {
        match self {
            Granularity::Day => "daily",
            Granularity::Hour => "2-hourly",
        }
    }
}

/// Every column the dashboard reads. Anything else in the file is ignored.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum Column {
    Dteday,
    CasualDay,
    RegisteredDay,
    CntDay,
    CasualHour,
    RegisteredHour,
    CntHour,
    TempDay,
    TempHour,
    AtempDay,
    AtempHour,
    HumDay,
    HumHour,
    WindspeedDay,
    WindspeedHour,
    WeathersitDay,
    SeasonDay,
    MnthDay,
    WeekdayHour,
}

impl Column {
    pub const ALL: [Column; 19] = [
        Column::Dteday,
        Column::CasualDay,
        Column::RegisteredDay,
        Column::CntDay,
        Column::CasualHour,
        Column::RegisteredHour,
        Column::CntHour,
        Column::TempDay,
        Column::TempHour,
        Column::AtempDay,
        Column::AtempHour,
        Column::HumDay,
        Column::HumHour,
        Column::WindspeedDay,
        Column::WindspeedHour,
        Column::WeathersitDay,
        Column::SeasonDay,
        Column::MnthDay,
        Column::WeekdayHour,
    ];

    /// Header name as it appears in the data file.
    pub fn name(self) -> &'static str {
        match self {
            Column::Dteday => "dteday",
            Column::CasualDay => "casual_day",
            Column::RegisteredDay => "registered_day",
            Column::CntDay => "cnt_day",
            Column::CasualHour => "casual_hour",
            Column::RegisteredHour => "registered_hour",
            Column::CntHour => "cnt_hour",
            Column::TempDay => "temp_day",
            Column::TempHour => "temp_hour",
            Column::AtempDay => "atemp_day",
            Column::AtempHour => "atemp_hour",
            Column::HumDay => "hum_day",
            Column::HumHour => "hum_hour",
            Column::WindspeedDay => "windspeed_day",
            Column::WindspeedHour => "windspeed_hour",
            Column::WeathersitDay => "weathersit_day",
            Column::SeasonDay => "season_day",
            Column::MnthDay => "mnth_day",
            Column::WeekdayHour => "weekday_hour",
        }
    }

    pub fn granularity(self) -> Option<Granularity> {
        let name = self.name();
        if name.ends_with("_day") {
            Some(Granularity::Day)
        } else if name.ends_with("_hour") {
            Some(Granularity::Hour)
        } else {
            None
        }
    }

    pub fn is_numeric(self) -> bool {
        self != Column::Dteday
    }
}

impl FromStr for Column {
    type Err = InvalidColumnError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Column::ALL
            .iter()
            .copied()
            .find(|c| c.name() == s)
            .ok_or_else(|| InvalidColumnError::Unknown(s.to_string()))
    }
}

impl fmt::Display for Column {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

// ---------------------------------------------------------------------------
// Value – a single cell
// ---------------------------------------------------------------------------

/// One cell of a [`Record`]: the date column or a numeric measurement.
///
/// Build numbers with [`Value::number`] so `-0.0` and `0.0` land in the
/// same group.
#[derive(Debug, Clone, Copy)]
pub enum Value {
    Date(NaiveDate),
    Number(f64),
}

// -- Manual Eq/Ord so Value can key a BTreeMap; equality follows `cmp` --

impl PartialEq for Value {
    fn eq(&self, other: &Self) -> bool {
        self.cmp(other) == Ordering::Equal
    }
}

impl Eq for Value {}

impl PartialOrd for Value {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

impl Ord for Value {
    fn cmp(&self, other: &Self) -> Ordering {
        match (self, other) {
            (Value::Date(a), Value::Date(b)) => a.cmp(b),
            (Value::Number(a), Value::Number(b)) => a.total_cmp(b),
            (Value::Date(_), Value::Number(_)) => Ordering::Less,
            (Value::Number(_), Value::Date(_)) => Ordering::Greater,
        }
    }
}

impl fmt::Display for Value {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Value::Date(d) => write!(f, "{}", d.format("%Y-%m-%d")),
            Value::Number(v) if v.fract() == 0.0 && v.abs() < 1e15 => write!(f, "{}", *v as i64),
            Value::Number(v) => write!(f, "{v:.4}"),
        }
    }
}

impl Value {
    /// A numeric cell with negative zero folded into zero.
    pub fn number(v: f64) -> Self {
        Value::Number(v + 0.0)
    }

    pub fn as_f64(&self) -> Option<f64> {
        match self {
            Value::Number(v) => Some(*v),
            Value::Date(_) => None,
        }
    }
}

// ---------------------------------------------------------------------------
// Record – one row of the dataset
// ---------------------------------------------------------------------------

/// One row: a date plus daily (`_day`) and 2-hour bucket (`_hour`) measurements.
///
/// Categorical columns (`weathersit_day`, `season_day`, `mnth_day`,
/// `weekday_hour`) are stored as numbers like the rest so they group by
/// their numeric order.
#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct Record {
    #[serde(deserialize_with = "deserialize_date")]
    pub dteday: NaiveDate,
    pub casual_day: f64,
    pub registered_day: f64,
    pub cnt_day: f64,
    pub casual_hour: f64,
    pub registered_hour: f64,
    pub cnt_hour: f64,
    pub temp_day: f64,
    pub temp_hour: f64,
    pub atemp_day: f64,
    pub atemp_hour: f64,
    pub hum_day: f64,
    pub hum_hour: f64,
    pub windspeed_day: f64,
    pub windspeed_hour: f64,
    pub weathersit_day: f64,
    pub season_day: f64,
    pub mnth_day: f64,
    pub weekday_hour: f64,
}

impl Record {
    /// Read one cell by column.
    pub fn value(&self, column: Column) -> Value {
        match column {
            Column::Dteday => Value::Date(self.dteday),
            numeric => Value::number(self.number(numeric).unwrap_or(f64::NAN)),
        }
    }

    /// First numeric column holding NaN or an infinity, if any.
    pub fn non_finite_column(&self) -> Option<Column> {
        Column::ALL
            .into_iter()
            .find(|&c| self.number(c).is_some_and(|v| !v.is_finite()))
    }

    /// Read a numeric cell; `None` for the date column.
    pub fn number(&self, column: Column) -> Option<f64> {
        let v = match column {
            Column::Dteday => return None,
            Column::CasualDay => self.casual_day,
            Column::RegisteredDay => self.registered_day,
            Column::CntDay => self.cnt_day,
            Column::CasualHour => self.casual_hour,
            Column::RegisteredHour => self.registered_hour,
            Column::CntHour => self.cnt_hour,
            Column::TempDay => self.temp_day,
            Column::TempHour => self.temp_hour,
            Column::AtempDay => self.atemp_day,
            Column::AtempHour => self.atemp_hour,
            Column::HumDay => self.hum_day,
            Column::HumHour => self.hum_hour,
            Column::WindspeedDay => self.windspeed_day,
            Column::WindspeedHour => self.windspeed_hour,
            Column::WeathersitDay => self.weathersit_day,
            Column::SeasonDay => self.season_day,
            Column::MnthDay => self.mnth_day,
            Column::WeekdayHour => self.weekday_hour,
        };
        Some(v)
    }
}

/// Parse `YYYY-MM-DD`, also accepting a trailing `HH:MM:SS` timestamp.
pub fn parse_date(s: &str) -> Option<NaiveDate> {
    let s = s.trim();
    NaiveDate::parse_from_str(s, "%Y-%m-%d")
        .ok()
        .or_else(|| {
            NaiveDateTime::parse_from_str(s, "%Y-%m-%d %H:%M:%S")
                .ok()
                .map(|dt| dt.date())
        })
}

fn deserialize_date<'de, D>(deserializer: D) -> Result<NaiveDate, D::Error>
where
    D: Deserializer<'de>,
{
    let raw = String::deserialize(deserializer)?;
    parse_date(&raw).ok_or_else(|| serde::de::Error::custom(format!("invalid date '{raw}'")))
}

// ---------------------------------------------------------------------------
// Table – the complete loaded dataset
// ---------------------------------------------------------------------------

/// The full dataset at rest. Rows keep file order and are never mutated.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Table {
    records: Vec<Record>,
}

impl Table {
    pub fn from_records(records: Vec<Record>) -> Self {
        Table { records }
    }

    pub fn records(&self) -> &[Record] {
        &self.records
    }

    pub fn iter(&self) -> std::slice::Iter<'_, Record> {
        self.records.iter()
    }

    /// Number of rows.
    pub fn len(&self) -> usize {
        self.records.len()
    }

    /// Whether the table has no rows.
    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }
}

impl FromIterator<Record> for Table {
    fn from_iter<I: IntoIterator<Item = Record>>(iter: I) -> Self {
        Table::from_records(iter.into_iter().collect())
    }
}

// ---------------------------------------------------------------------------
// Test fixtures
// ---------------------------------------------------------------------------

#[cfg(test)]
pub(crate) mod fixtures {
    use super::*;

    pub fn date(y: i32, m: u32, d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, d).expect("valid test date")
    }

    /// A record with every measurement zeroed except the ones under test.
    pub fn record(dteday: NaiveDate, season_day: f64, cnt_day: f64) -> Record {
        Record {
            dteday,
            casual_day: 0.0,
            registered_day: 0.0,
            cnt_day,
            casual_hour: 0.0,
            registered_hour: 0.0,
            cnt_hour: 0.0,
            temp_day: 0.0,
            temp_hour: 0.0,
            atemp_day: 0.0,
            atemp_hour: 0.0,
            hum_day: 0.0,
            hum_hour: 0.0,
            windspeed_day: 0.0,
            windspeed_hour: 0.0,
            weathersit_day: 1.0,
            season_day,
            mnth_day: 1.0,
            weekday_hour: 0.0,
        }
    }

    /// The three-row season table used throughout the tests.
    pub fn season_table() -> Table {
        Table::from_records(vec![
            record(date(2011, 1, 1), 1.0, 100.0),
            record(date(2011, 1, 2), 1.0, 200.0),
            record(date(2011, 6, 1), 2.0, 50.0),
        ])
    }
}

#[cfg(test)]
mod tests {
    use super::fixtures::*;
    use super::*;

    #[test]
    fn column_names_round_trip_through_from_str() {
        for column in Column::ALL {
            assert_eq!(column.name().parse::<Column>(), Ok(column));
        }
        assert_eq!(
            "hr".parse::<Column>(),
            Err(InvalidColumnError::Unknown("hr".into()))
        );
    }

    #[test]
    fn granularity_follows_suffix() {
        assert_eq!(Column::CntDay.granularity(), Some(Granularity::Day));
        assert_eq!(Column::WeekdayHour.granularity(), Some(Granularity::Hour));
        assert_eq!(Column::Dteday.granularity(), None);
        assert_eq!(Granularity::Hour.label(), "2-hourly");
        assert!(!Column::Dteday.is_numeric());
        assert!(Column::SeasonDay.is_numeric());
    }

    #[test]
    fn numbers_order_numerically() {
        let mut values = vec![Value::Number(10.0), Value::Number(2.0), Value::Number(1.0)];
        values.sort();
        assert_eq!(
            values,
            vec![Value::Number(1.0), Value::Number(2.0), Value::Number(10.0)]
        );
        assert!(Value::Date(date(2012, 1, 1)) < Value::Number(0.0));
    }

    #[test]
    fn negative_zero_equals_zero() {
        assert_eq!(Value::number(-0.0), Value::number(0.0));
        assert_eq!(Value::number(-0.0).cmp(&Value::number(0.0)), Ordering::Equal);
        assert_eq!(Value::Number(f64::NAN), Value::Number(f64::NAN));
        assert_ne!(Value::Number(1.0), Value::Number(2.0));
    }

    #[test]
    fn finds_non_finite_cells() {
        let mut rec = record(date(2011, 1, 1), 1.0, 10.0);
        assert_eq!(rec.non_finite_column(), None);
        rec.hum_hour = f64::INFINITY;
        assert_eq!(rec.non_finite_column(), Some(Column::HumHour));
        rec.season_day = f64::NAN;
        assert_eq!(rec.non_finite_column(), Some(Column::HumHour));
    }

    #[test]
    fn whole_numbers_display_without_fraction() {
        assert_eq!(Value::Number(300.0).to_string(), "300");
        assert_eq!(Value::Number(0.344167).to_string(), "0.3442");
        assert_eq!(Value::Date(date(2011, 1, 1)).to_string(), "2011-01-01");
    }

    #[test]
    fn parse_date_accepts_timestamps() {
        assert_eq!(parse_date("2011-01-01"), Some(date(2011, 1, 1)));
        assert_eq!(parse_date(" 2011-01-01 00:00:00"), Some(date(2011, 1, 1)));
        assert_eq!(parse_date("01/01/2011"), None);
    }

    #[test]
    fn record_value_reads_each_column() {
        let rec = record(date(2011, 1, 1), 3.0, 42.0);
        assert_eq!(rec.value(Column::Dteday), Value::Date(date(2011, 1, 1)));
        assert_eq!(rec.value(Column::SeasonDay), Value::Number(3.0));
        assert_eq!(rec.number(Column::CntDay), Some(42.0));
        assert_eq!(rec.number(Column::Dteday), None);
    }
}
