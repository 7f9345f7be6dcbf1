use std::fs::File;
use std::path::{Path, PathBuf};
use std::sync::Arc;

use anyhow::{Context, Result};
use arrow::array::{ArrayRef, Float64Array, Int64Array, StringArray};
use arrow::datatypes::{DataType, Field, Schema};
use arrow::record_batch::RecordBatch;
use chrono::{Datelike, Duration, NaiveDate};
use clap::{Parser, ValueEnum};
use parquet::arrow::ArrowWriter;
use serde::Serialize;

#[derive(Debug, Clone, Copy, ValueEnum)]
enum Format {
    Csv,
    Json,
    Parquet,
}

impl Format {
    fn extension(self) -> &'static str {
        match self {
            Format::Csv => "csv",
            Format::Json => "json",
            Format::Parquet => "parquet",
        }
    }
}

/// Write synthetic pollutant and hospitalization tables for trying the viewer.
#[derive(Debug, Parser)]
struct Args {
    /// Output directory.
    #[arg(long, default_value = ".")]
    out_dir: PathBuf,

    #[arg(long, value_enum, default_value_t = Format::Csv)]
    format: Format,

    /// Year left out of the Benzene table to show a monitoring gap.
    #[arg(long, default_value_t = 2009)]
    gap_year: i32,
}

/// Simple xoshiro256** PRNG so sample data is reproducible without extra crates.
struct SimpleRng {
    state: [u64; 4],
}

impl SimpleRng {
    fn new(seed: u64) -> Self {
        let mut s = seed;
        let mut state = [0u64; 4];
        for slot in &mut state {
            // splitmix64
            s = s.wrapping_add(0x9e3779b97f4a7c15);
            let mut z = s;
            z = (z ^ (z >> 30)).wrapping_mul(0xbf58476d1ce4e5b9);
            z = (z ^ (z >> 27)).wrapping_mul(0x94d049bb133111eb);
            *slot = z ^ (z >> 31);
        }
        Self { state }
    }

    fn next_u64(&mut self) -> u64 {
        let result = self.state[1].wrapping_mul(5).rotate_left(7).wrapping_mul(9);
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
        let z = (-2.0 * u1.ln()).sqrt() * (2.0 * std::f64::consts::PI * u2).cos();
        mean + std_dev * z
    }
}

// ---------------------------------------------------------------------------
// Row types, with the column names the viewer expects
// ---------------------------------------------------------------------------

#[derive(Debug, Serialize)]
struct PollutantRow {
    site: &'static str,
    date_local: String,
    arithmetic_mean: f64,
}

#[derive(Debug, Serialize)]
struct HospitalizationRow {
    #[serde(rename = "Year")]
    year: i32,
    #[serde(rename = "Age Group")]
    age_group: &'static str,
    #[serde(rename = "Case Count")]
    case_count: i64,
}

/// (name, base level, yearly trend, noise, seasonal amplitude)
const POLLUTANTS: [(&str, f64, f64, f64, f64); 3] = [
    ("Benzene", 0.9, -0.025, 0.08, 0.2),
    ("NO2", 18.0, -0.35, 2.5, 3.0),
    ("Ozone", 0.038, 0.0002, 0.004, 0.008),
];

const AGE_GROUPS: [(&str, f64); 4] = [("0-4", 0.3), ("5-17", 0.25), ("18-64", 0.3), ("65+", 0.15)];

fn pollutant_rows(
    rng: &mut SimpleRng,
    (base, trend, noise, seasonal): (f64, f64, f64, f64),
    skip_year: Option<i32>,
) -> Vec<PollutantRow> {
    let mut rows = Vec::new();
    let mut day = NaiveDate::from_ymd_opt(2000, 1, 1).unwrap_or_default();
    let end = NaiveDate::from_ymd_opt(2024, 12, 31).unwrap_or_default();

    while day <= end {
        if Some(day.year()) != skip_year {
            let years = f64::from(day.year() - 2000);
            let season = (2.0 * std::f64::consts::PI * f64::from(day.ordinal()) / 365.0).sin();
            let value = (base + trend * years + seasonal * season + rng.gauss(0.0, noise)).max(0.0);
            rows.push(PollutantRow {
                site: "Holtsville",
                date_local: day.format("%Y-%m-%d").to_string(),
                arithmetic_mean: (value * 1e4).round() / 1e4,
            });
        }
        day += Duration::days(6);
    }
    rows
}

fn hospitalization_rows(rng: &mut SimpleRng) -> Vec<HospitalizationRow> {
    let mut rows = Vec::new();
    for year in 2000..=2021 {
        let total = 1400.0 - 25.0 * f64::from(year - 2000) + rng.gauss(0.0, 60.0);
        for (age_group, share) in AGE_GROUPS {
            rows.push(HospitalizationRow {
                year,
                age_group,
                case_count: (total * share).round().max(0.0) as i64,
            });
        }
    }
    rows
}

// ---------------------------------------------------------------------------
// Writers
// ---------------------------------------------------------------------------

fn write_table<T: Serialize>(
    path: &Path,
    format: Format,
    rows: &[T],
    to_batch: impl Fn(&[T]) -> Result<RecordBatch>,
) -> Result<()> {
    match format {
        Format::Csv => {
            let mut wtr = csv::Writer::from_path(path).context("creating CSV")?;
            for row in rows {
                wtr.serialize(row)?;
            }
            wtr.flush()?;
        }
        Format::Json => {
            let file = File::create(path).context("creating JSON")?;
            serde_json::to_writer_pretty(file, rows).context("writing JSON")?;
        }
        Format::Parquet => {
            let batch = to_batch(rows)?;
            let file = File::create(path).context("creating parquet file")?;
            let mut writer = ArrowWriter::try_new(file, batch.schema(), None)?;
            writer.write(&batch)?;
            writer.close()?;
        }
    }
    Ok(())
}

fn pollutant_batch(rows: &[PollutantRow]) -> Result<RecordBatch> {
    let schema = Arc::new(Schema::new(vec![
        Field::new("site", DataType::Utf8, false),
        Field::new("date_local", DataType::Utf8, false),
        Field::new("arithmetic_mean", DataType::Float64, false),
    ]));
    let columns: Vec<ArrayRef> = vec![
        Arc::new(StringArray::from_iter_values(rows.iter().map(|r| r.site))),
        Arc::new(StringArray::from_iter_values(rows.iter().map(|r| r.date_local.as_str()))),
        Arc::new(Float64Array::from_iter_values(rows.iter().map(|r| r.arithmetic_mean))),
    ];
    Ok(RecordBatch::try_new(schema, columns)?)
}

fn hospitalization_batch(rows: &[HospitalizationRow]) -> Result<RecordBatch> {
    let schema = Arc::new(Schema::new(vec![
        Field::new("Year", DataType::Int64, false),
        Field::new("Age Group", DataType::Utf8, false),
        Field::new("Case Count", DataType::Int64, false),
    ]));
    let columns: Vec<ArrayRef> = vec![
        Arc::new(Int64Array::from_iter_values(rows.iter().map(|r| i64::from(r.year)))),
        Arc::new(StringArray::from_iter_values(rows.iter().map(|r| r.age_group))),
        Arc::new(Int64Array::from_iter_values(rows.iter().map(|r| r.case_count))),
    ];
    Ok(RecordBatch::try_new(schema, columns)?)
}

fn main() -> Result<()> {
    let args = Args::parse();
    std::fs::create_dir_all(&args.out_dir).context("creating output directory")?;
    let ext = args.format.extension();
    let mut rng = SimpleRng::new(42);

    for (name, base, trend, noise, seasonal) in POLLUTANTS {
        let skip = (name == "Benzene").then_some(args.gap_year);
        let rows = pollutant_rows(&mut rng, (base, trend, noise, seasonal), skip);
        let path = args
            .out_dir
            .join(format!("Suffolk County {name} Trends 2000-2024.{ext}"));
        write_table(&path, args.format, &rows, pollutant_batch)?;
        println!("Wrote {} {name} readings to {}", rows.len(), path.display());
    }

    let rows = hospitalization_rows(&mut rng);
    let path = args
        .out_dir
        .join(format!("Suffolk County Asthma Hospitalizations 2000-2021.{ext}"));
    write_table(&path, args.format, &rows, hospitalization_batch)?;
    println!("Wrote {} hospitalization rows to {}", rows.len(), path.display());

    if !matches!(args.format, Format::Csv) {
        println!("Point the viewer at these files with --benzene/--no2/--ozone/--hospitalizations");
    }
    Ok(())
}
