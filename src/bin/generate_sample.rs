use std::f64::consts::PI;
use std::path::{Path, PathBuf};
use std::sync::Arc;

use anyhow::{Context, Result};
use arrow::array::{ArrayRef, Float64Array, Int64Array, StringArray};
use arrow::datatypes::{DataType, Field, Schema};
use arrow::record_batch::RecordBatch;
use chrono::{Datelike, NaiveDate};
use parquet::arrow::ArrowWriter;

use bikeshare_dashboard::data::model::Column;

/// Two-hour buckets per day.
const BUCKETS: u32 = 12;

/// Minimal deterministic PRNG (xoshiro256**)
struct SimpleRng {
    state: [u64; 4],
}

impl SimpleRng {
    fn new(seed: u64) -> Self {
        let mut s = [0u64; 4];
        let mut x = seed;
        for slot in &mut s {
            x = x.wrapping_mul(6364136223846793005).wrapping_add(1);
            *slot = x;
        }
        SimpleRng { state: s }
    }

    fn next_u64(&mut self) -> u64 {
        let result = (self.state[1].wrapping_mul(5))
            .rotate_left(7)
            .wrapping_mul(9);
        let t = self.state[1] << 17;
        self.state[2] ^= self.state[0];
        self.state[3] ^= self.state[1];
        self.state[1] ^= self.state[2];
        self.state[0] ^= self.state[3];
        self.state[2] ^= t;
        self.state[3] = self.state[3].rotate_left(45);
        result
    }

    fn next_f64(&mut self) -> f64 {
        (self.next_u64() >> 11) as f64 / (1u64 << 53) as f64
    }

    /// Box-Muller transform for normal distribution
    fn gauss(&mut self, mean: f64, std_dev: f64) -> f64 {
        let u1 = self.next_f64().max(1e-15);
        let u2 = self.next_f64();
        let z = (-2.0 * u1.ln()).sqrt() * (2.0 * PI * u2).cos();
        mean + std_dev * z
    }
}

/// Round a normalised measurement to the 0.02 grid the real data uses.
fn normalised(v: f64) -> f64 {
    (v.clamp(0.02, 1.0) * 50.0).round() / 50.0
}

/// Relative demand of a 2-hour bucket starting at `hour`; commute peaks on
/// working days, a broad midday hump at weekends.
fn bucket_profile(hour: u32, weekend: bool) -> f64 {
    let h = hour as f64 + 1.0;
    let bump = |centre: f64, width: f64| (-(h - centre).powi(2) / (2.0 * width * width)).exp();
    if weekend {
        0.05 + bump(14.0, 3.5)
    } else {
        0.05 + bump(8.0, 1.2) + 1.1 * bump(17.5, 1.5) + 0.3 * bump(12.5, 2.0)
    }
}

/// One generated row: the value of each [`Column`] in schema order, plus the bucket hour.
struct Row {
    dteday: NaiveDate,
    values: Vec<f64>,
    hr: i64,
}

fn generate(rng: &mut SimpleRng, first: NaiveDate, days: u32) -> Vec<Row> {
    let mut rows = Vec::with_capacity((days * BUCKETS) as usize);

    for (day_no, date) in first.iter_days().take(days as usize).enumerate() {
        let doy = date.ordinal() as f64;
        let month = date.month();
        let season = ((month - 1) / 3 + 1) as f64;
        let weekday = date.weekday().num_days_from_sunday();
        let weekend = weekday == 0 || weekday == 6;
        let growth = 1.0 + 0.6 * day_no as f64 / days as f64;

        let temp_day = normalised(0.48 - 0.3 * (2.0 * PI * (doy - 20.0) / 365.0).cos() + rng.gauss(0.0, 0.05));
        let atemp_day = normalised(0.9 * temp_day + 0.04);
        let hum_day = normalised(rng.gauss(0.62, 0.14));
        let windspeed_day = normalised(rng.gauss(0.19, 0.07).abs());
        let roll = rng.next_f64();
        let weathersit = if roll < 0.64 {
            1.0
        } else if roll < 0.95 {
            2.0
        } else {
            3.0
        };
        let weather_factor = [1.0, 0.8, 0.35][weathersit as usize - 1];

        let mut hourly = Vec::with_capacity(BUCKETS as usize);
        for bucket in 0..BUCKETS {
            let hour = bucket * 2;
            let temp_hour = normalised(temp_day + rng.gauss(0.0, 0.04));
            let atemp_hour = normalised(0.9 * temp_hour + 0.04);
            let hum_hour = normalised(hum_day + rng.gauss(0.0, 0.06));
            let windspeed_hour = normalised((windspeed_day + rng.gauss(0.0, 0.05)).abs());

            let comfort = 1.0 - (temp_hour - 0.65).abs() - 0.4 * (hum_hour - 0.5).max(0.0);
            let demand = 420.0 * bucket_profile(hour, weekend) * comfort.max(0.05) * weather_factor * growth;
            let cnt = (demand + rng.gauss(0.0, demand.sqrt())).max(1.0).round();
            let casual_share = if weekend { 0.38 } else { 0.16 };
            let casual = (cnt * casual_share).round();

            hourly.push((hour, casual, cnt - casual, cnt, temp_hour, atemp_hour, hum_hour, windspeed_hour));
        }

        let casual_day: f64 = hourly.iter().map(|h| h.1).sum();
        let registered_day: f64 = hourly.iter().map(|h| h.2).sum();

        for (hour, casual, registered, cnt, temp_hour, atemp_hour, hum_hour, windspeed_hour) in hourly {
            let values = Column::ALL
                .iter()
                .filter(|c| c.is_numeric())
                .map(|c| match c {
                    Column::CasualDay => casual_day,
                    Column::RegisteredDay => registered_day,
                    Column::CntDay => casual_day + registered_day,
                    Column::CasualHour => casual,
                    Column::RegisteredHour => registered,
                    Column::CntHour => cnt,
                    Column::TempDay => temp_day,
                    Column::TempHour => temp_hour,
                    Column::AtempDay => atemp_day,
                    Column::AtempHour => atemp_hour,
                    Column::HumDay => hum_day,
                    Column::HumHour => hum_hour,
                    Column::WindspeedDay => windspeed_day,
                    Column::WindspeedHour => windspeed_hour,
                    Column::WeathersitDay => weathersit,
                    Column::SeasonDay => season,
                    Column::MnthDay => month as f64,
                    Column::WeekdayHour => weekday as f64,
                    Column::Dteday => f64::NAN,
                })
                .collect();
            rows.push(Row {
                dteday: date,
                values,
                hr: hour as i64,
            });
        }
    }

    rows
}

fn write_csv(path: &Path, rows: &[Row]) -> Result<()> {
    let mut writer = csv::Writer::from_path(path).context("creating CSV file")?;

    let mut header: Vec<&str> = Column::ALL.iter().map(|c| c.name()).collect();
    header.push("hr");
    writer.write_record(&header)?;

    for row in rows {
        let mut record = vec![row.dteday.format("%Y-%m-%d").to_string()];
        record.extend(row.values.iter().map(|v| v.to_string()));
        record.push(row.hr.to_string());
        writer.write_record(&record)?;
    }
    writer.flush().context("flushing CSV")?;
    Ok(())
}

fn write_parquet(path: &Path, rows: &[Row]) -> Result<()> {
    let mut fields = vec![Field::new(Column::Dteday.name(), DataType::Utf8, false)];
    let mut arrays: Vec<ArrayRef> = vec![Arc::new(StringArray::from(
        rows.iter()
            .map(|r| r.dteday.format("%Y-%m-%d").to_string())
            .collect::<Vec<_>>(),
    ))];

    for (i, column) in Column::ALL.iter().filter(|c| c.is_numeric()).enumerate() {
        fields.push(Field::new(column.name(), DataType::Float64, false));
        arrays.push(Arc::new(Float64Array::from(
            rows.iter().map(|r| r.values[i]).collect::<Vec<_>>(),
        )));
    }
    fields.push(Field::new("hr", DataType::Int64, false));
    arrays.push(Arc::new(Int64Array::from(
        rows.iter().map(|r| r.hr).collect::<Vec<_>>(),
    )));

    let schema = Arc::new(Schema::new(fields));
    let batch = RecordBatch::try_new(schema.clone(), arrays).context("building record batch")?;

    let file = std::fs::File::create(path).context("creating parquet file")?;
    let mut writer = ArrowWriter::try_new(file, schema, None).context("creating parquet writer")?;
    writer.write(&batch).context("writing parquet batch")?;
    writer.close().context("closing parquet writer")?;
    Ok(())
}

fn main() -> Result<()> {
    env_logger::init();

    let out_dir = std::env::args_os()
        .nth(1)
        .map(PathBuf::from)
        .unwrap_or_else(|| PathBuf::from("."));
    std::fs::create_dir_all(&out_dir)
        .with_context(|| format!("creating {}", out_dir.display()))?;

    let mut rng = SimpleRng::new(42);
    let first = NaiveDate::from_ymd_opt(2011, 1, 1).context("invalid start date")?;
    let rows = generate(&mut rng, first, 731);

    let csv_path = out_dir.join("all_data.csv");
    write_csv(&csv_path, &rows)?;
    let parquet_path = out_dir.join("all_data.parquet");
    write_parquet(&parquet_path, &rows)?;

    log::info!("Generated {} rows over {} days", rows.len(), rows.len() as u32 / BUCKETS);
    println!(
        "Wrote {} rows to {} and {}",
        rows.len(),
        csv_path.display(),
        parquet_path.display()
    );
    Ok(())
}
