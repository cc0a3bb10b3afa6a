use std::path::{Path, PathBuf};

use anyhow::{Context, Result, bail};
use arrow::array::{Array, ArrayRef, Date32Array, Float64Array};
use arrow::compute::cast;
use arrow::datatypes::DataType;
use arrow::record_batch::RecordBatch;
use chrono::NaiveDate;
use parquet::arrow::arrow_reader::ParquetRecordBatchReaderBuilder;

use super::error::DataLoadError;
use super::model::{Column, Record, Table};

// ---------------------------------------------------------------------------
// Public entry-point
// ---------------------------------------------------------------------------

/// Load the dataset from a file.  Dispatch by extension.
///
/// Supported formats:
/// * `.csv` / `.txt` – comma-delimited with a header row
/// * `.tsv`          – tab-delimited with a header row
/// * `.parquet`      – one column per field, numeric columns of any
///                     integer/float type, `dteday` as text or a date type
///
/// Every [`Column`] must be present; extra columns are ignored.
pub fn load(path: &Path) -> Result<Table, DataLoadError> {
    if !path.exists() {
        return Err(DataLoadError::NotFound(path.to_path_buf()));
    }

    let ext = path
        .extension()
        .and_then(|e| e.to_str())
        .unwrap_or("")
        .to_ascii_lowercase();

    let table = match ext.as_str() {
        "csv" | "txt" => load_delimited(path, b','),
        "tsv" => load_delimited(path, b'\t'),
        "parquet" | "pq" => load_parquet(path),
        other => Err(DataLoadError::UnsupportedFormat(other.to_string())),
    }?;

    log::debug!("Parsed {} rows from {}", table.len(), path.display());
    Ok(table)
}

/// Names of required columns absent from `headers`, in schema order.
fn missing_columns(headers: &[&str]) -> Vec<String> {
    Column::ALL
        .iter()
        .filter(|c| !headers.contains(&c.name()))
        .map(|c| c.name().to_string())
        .collect()
}

fn read_error(path: &Path) -> impl FnOnce(anyhow::Error) -> DataLoadError {
    let path: PathBuf = path.to_path_buf();
    move |cause| DataLoadError::Read { path, cause }
}

// ---------------------------------------------------------------------------
// Delimited text loader
// ---------------------------------------------------------------------------

/// Header row with column names, one record per line.
/// Rows are deserialised straight into [`Record`] by header name.
fn load_delimited(path: &Path, delimiter: u8) -> Result<Table, DataLoadError> {
    let mut reader = csv::ReaderBuilder::new()
        .delimiter(delimiter)
        .trim(csv::Trim::All)
        .from_path(path)
        .context("opening delimited file")
        .map_err(read_error(path))?;

    let headers = reader
        .headers()
        .context("reading header row")
        .map_err(read_error(path))?
        .clone();

    let names: Vec<&str> = headers.iter().collect();
    let missing = missing_columns(&names);
    if !missing.is_empty() {
        return Err(DataLoadError::MissingColumns(missing));
    }

    let records: Result<Vec<Record>> = reader
        .deserialize::<Record>()
        .enumerate()
        // Row numbers are 1-based and count the header as row 1.
        .map(|(i, row)| {
            let rec = row.with_context(|| format!("row {}", i + 2))?;
            if let Some(c) = rec.non_finite_column() {
                bail!("row {}: '{c}' is not a finite number", i + 2);
            }
            Ok(rec)
        })
        .collect();

    records.map(Table::from_records).map_err(read_error(path))
}

// ---------------------------------------------------------------------------
// Parquet loader
// ---------------------------------------------------------------------------

/// Load a Parquet file, one Arrow column per [`Column`].
///
/// Works with files written by both **Pandas** (`df.to_parquet()`) and
/// **Polars** (`df.write_parquet()`): integer counts are widened to `f64`,
/// and `dteday` may be a string, a date or a timestamp.
fn load_parquet(path: &Path) -> Result<Table, DataLoadError> {
    let file = std::fs::File::open(path)
        .context("opening parquet file")
        .map_err(read_error(path))?;
    let builder = ParquetRecordBatchReaderBuilder::try_new(file)
        .context("reading parquet metadata")
        .map_err(read_error(path))?;

    let schema = builder.schema().clone();
    let names: Vec<&str> = schema.fields().iter().map(|f| f.name().as_str()).collect();
    let missing = missing_columns(&names);
    if !missing.is_empty() {
        return Err(DataLoadError::MissingColumns(missing));
    }

    let reader = builder
        .build()
        .context("building parquet reader")
        .map_err(read_error(path))?;

    let mut records = Vec::new();
    let mut offset = 0;
    for batch_result in reader {
        let batch = batch_result
            .context("reading parquet record batch")
            .map_err(read_error(path))?;
        let parsed = batch_records(&batch, offset).map_err(read_error(path))?;
        offset += batch.num_rows();
        records.extend(parsed);
    }

    Ok(Table::from_records(records))
}

// -- Parquet / Arrow helpers --

/// Convert one record batch; `offset` is the index of its first row in the file.
fn batch_records(batch: &RecordBatch, offset: usize) -> Result<Vec<Record>> {
    let dates = date_column(column(batch, Column::Dteday)?)?;
    let mut numeric = Vec::with_capacity(Column::ALL.len() - 1);
    for c in Column::ALL.into_iter().filter(|c| c.is_numeric()) {
        let arr = float_column(column(batch, c)?).with_context(|| format!("column '{c}'"))?;
        numeric.push((c, arr));
    }

    (0..batch.num_rows())
        .map(|row| {
            let at = offset + row;
            if dates.is_null(row) {
                bail!("row {at}: null 'dteday'");
            }
            let dteday: NaiveDate = dates
                .value_as_date(row)
                .with_context(|| format!("row {at}: 'dteday' out of range"))?;

            let get = |c: Column| -> Result<f64> {
                let (_, arr) = numeric
                    .iter()
                    .find(|(col, _)| *col == c)
                    .with_context(|| format!("column '{c}' not loaded"))?;
                if arr.is_null(row) {
                    bail!("row {at}: null '{c}'");
                }
                let v = arr.value(row);
                if !v.is_finite() {
                    bail!("row {at}: '{c}' is not a finite number");
                }
                Ok(v)
            };

            Ok(Record {
                dteday,
                casual_day: get(Column::CasualDay)?,
                registered_day: get(Column::RegisteredDay)?,
                cnt_day: get(Column::CntDay)?,
                casual_hour: get(Column::CasualHour)?,
                registered_hour: get(Column::RegisteredHour)?,
                cnt_hour: get(Column::CntHour)?,
                temp_day: get(Column::TempDay)?,
                temp_hour: get(Column::TempHour)?,
                atemp_day: get(Column::AtempDay)?,
                atemp_hour: get(Column::AtempHour)?,
                hum_day: get(Column::HumDay)?,
                hum_hour: get(Column::HumHour)?,
                windspeed_day: get(Column::WindspeedDay)?,
                windspeed_hour: get(Column::WindspeedHour)?,
                weathersit_day: get(Column::WeathersitDay)?,
                season_day: get(Column::SeasonDay)?,
                mnth_day: get(Column::MnthDay)?,
                weekday_hour: get(Column::WeekdayHour)?,
            })
        })
        .collect()
}

fn column(batch: &RecordBatch, c: Column) -> Result<&ArrayRef> {
    batch
        .column_by_name(c.name())
        .with_context(|| format!("column '{c}' missing from record batch"))
}

/// Cast any integer/float column to `Float64`.
fn float_column(col: &ArrayRef) -> Result<Float64Array> {
    match col.data_type() {
        dt if dt.is_numeric() => {
            let casted = cast(col.as_ref(), &DataType::Float64)?;
            casted
                .as_any()
                .downcast_ref::<Float64Array>()
                .cloned()
                .context("expected Float64Array after cast")
        }
        other => bail!("expected a numeric column, got {other:?}"),
    }
}

/// Cast a string / date / timestamp column to `Date32`.
fn date_column(col: &ArrayRef) -> Result<Date32Array> {
    let casted = match col.data_type() {
        DataType::Utf8
        | DataType::LargeUtf8
        | DataType::Date32
        | DataType::Date64
        | DataType::Timestamp(_, _) => cast(col.as_ref(), &DataType::Date32).context("casting 'dteday'")?,
        other => bail!("column 'dteday' has type {other:?}, expected text or a date"),
    };
    casted
        .as_any()
        .downcast_ref::<Date32Array>()
        .cloned()
        .context("expected Date32Array after cast")
}

#[cfg(test)]
mod tests {
    use std::fs;
    use std::sync::Arc;

    use arrow::array::{Int64Array, StringArray};
    use arrow::datatypes::{Field, Schema};
    use parquet::arrow::ArrowWriter;
    use tempfile::TempDir;

    use super::*;
    use crate::data::model::fixtures::date;

    fn header(delimiter: char) -> String {
        Column::ALL
            .iter()
            .map(|c| c.name())
            .collect::<Vec<_>>()
            .join(&delimiter.to_string())
    }

    /// One data row in `Column::ALL` order with the given date and cnt_day.
    fn row(delimiter: char, dteday: &str, season: u32, cnt_day: u32) -> String {
        let mut cells = vec![dteday.to_string()];
        for c in Column::ALL.iter().skip(1) {
            let cell = match c {
                Column::SeasonDay => season.to_string(),
                Column::CntDay => cnt_day.to_string(),
                Column::TempDay => "0.344167".to_string(),
                _ => "1".to_string(),
            };
            cells.push(cell);
        }
        cells.join(&delimiter.to_string())
    }

    #[test]
    fn loads_csv_and_ignores_extra_columns() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("all_data.csv");
        let text = format!(
            "{},hr\n{},0\n{},2\n",
            header(','),
            row(',', "2011-01-01", 1, 985),
            row(',', "2011-01-02", 1, 801),
        );
        fs::write(&path, text).unwrap();

        let table = load(&path).unwrap();
        assert_eq!(table.len(), 2);
        assert_eq!(table.records()[0].dteday, date(2011, 1, 1));
        assert_eq!(table.records()[0].cnt_day, 985.0);
        assert!((table.records()[1].temp_day - 0.344167).abs() < 1e-12);
    }

    #[test]
    fn loads_tab_delimited() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("all_data.tsv");
        let text = format!("{}\n{}\n", header('\t'), row('\t', "2011-03-01", 1, 10));
        fs::write(&path, text).unwrap();

        let table = load(&path).unwrap();
        assert_eq!(table.len(), 1);
        assert_eq!(table.records()[0].dteday, date(2011, 3, 1));
    }

    #[test]
    fn missing_file_is_not_found() {
        let dir = TempDir::new().unwrap();
        let err = load(&dir.path().join("nope.csv")).unwrap_err();
        assert!(matches!(err, DataLoadError::NotFound(_)));
    }

    #[test]
    fn unknown_extension_is_rejected() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("data.xlsx");
        fs::write(&path, "whatever").unwrap();
        let err = load(&path).unwrap_err();
        assert!(matches!(err, DataLoadError::UnsupportedFormat(ext) if ext == "xlsx"));
    }

    #[test]
    fn reports_every_missing_column() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("partial.csv");
        fs::write(&path, "dteday,cnt_day,season_day\n2011-01-01,1,1\n").unwrap();

        match load(&path).unwrap_err() {
            DataLoadError::MissingColumns(cols) => {
                assert_eq!(cols.len(), Column::ALL.len() - 3);
                assert!(cols.contains(&"weekday_hour".to_string()));
                assert!(!cols.contains(&"cnt_day".to_string()));
            }
            other => panic!("unexpected error: {other}"),
        }
    }

    #[test]
    fn malformed_row_reports_its_position() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("bad.csv");
        let text = format!(
            "{}\n{}\n{}\n",
            header(','),
            row(',', "2011-01-01", 1, 1),
            row(',', "not-a-date", 1, 1),
        );
        fs::write(&path, text).unwrap();

        let err = load(&path).unwrap_err();
        assert!(matches!(err, DataLoadError::Read { .. }));
        assert!(err.to_string().contains("row 3"), "{err}");
    }

    #[test]
    fn non_finite_cells_are_malformed() {
        for bad in ["NaN", "inf", "-inf"] {
            let dir = TempDir::new().unwrap();
            let path = dir.path().join("nan.csv");
            let good = row(',', "2011-01-01", 1, 1);
            let broken = good.replacen(",1,", &format!(",{bad},"), 1);
            fs::write(&path, format!("{}\n{good}\n{broken}\n", header(','))).unwrap();

            let err = load(&path).unwrap_err();
            assert!(matches!(err, DataLoadError::Read { .. }), "{bad}: {err}");
            assert!(err.to_string().contains("not a finite number"), "{err}");
            assert!(err.to_string().contains("row 3"), "{err}");
        }
    }

    /// Parquet file with two rows; `hum_hour` holds the given values.
    fn write_parquet(path: &Path, hum_hour: [f64; 2]) {
        let mut fields = vec![Field::new("dteday", DataType::Utf8, false)];
        let mut arrays: Vec<ArrayRef> =
            vec![Arc::new(StringArray::from(vec!["2011-01-01", "2011-01-02"]))];
        for c in Column::ALL.iter().skip(1) {
            if *c == Column::CntDay {
                fields.push(Field::new(c.name(), DataType::Int64, false));
                arrays.push(Arc::new(Int64Array::from(vec![985, 801])));
            } else if *c == Column::HumHour {
                fields.push(Field::new(c.name(), DataType::Float64, false));
                arrays.push(Arc::new(Float64Array::from(hum_hour.to_vec())));
            } else {
                fields.push(Field::new(c.name(), DataType::Float64, false));
                arrays.push(Arc::new(Float64Array::from(vec![0.5, 1.0])));
            }
        }
        let schema = Arc::new(Schema::new(fields));
        let batch = RecordBatch::try_new(schema.clone(), arrays).unwrap();
        let file = fs::File::create(path).unwrap();
        let mut writer = ArrowWriter::try_new(file, schema, None).unwrap();
        writer.write(&batch).unwrap();
        writer.close().unwrap();
    }

    #[test]
    fn parquet_rejects_non_finite_values() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("nan.parquet");
        write_parquet(&path, [0.5, f64::NAN]);

        let err = load(&path).unwrap_err();
        assert!(matches!(err, DataLoadError::Read { .. }));
        assert!(err.to_string().contains("hum_hour"), "{err}");
    }

    #[test]
    fn loads_parquet_with_integer_counts_and_text_dates() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("all_data.parquet");
        write_parquet(&path, [0.5, 1.0]);

        let table = load(&path).unwrap();
        assert_eq!(table.len(), 2);
        assert_eq!(table.records()[1].dteday, date(2011, 1, 2));
        assert_eq!(table.records()[1].cnt_day, 801.0);
        assert_eq!(table.records()[0].hum_hour, 0.5);
    }
}
