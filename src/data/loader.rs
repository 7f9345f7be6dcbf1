use std::collections::BTreeMap;
use std::path::Path;

use anyhow::{Context, Result, bail};
use arrow::array::Array;
use arrow::util::display::{ArrayFormatter, FormatOptions};
use parquet::arrow::arrow_reader::ParquetRecordBatchReaderBuilder;
use serde_json::Value as JsonValue;

use super::model::{DatasetKey, RawRow, SourceColumns};

// ---------------------------------------------------------------------------
// Public entry-points
// ---------------------------------------------------------------------------

/// Read every dataset from its file, keyed by dataset.
pub fn load_sources<'a, I>(files: I) -> Result<BTreeMap<DatasetKey, Vec<RawRow>>>
where
    I: IntoIterator<Item = (DatasetKey, &'a Path)>,
{
    let mut sources = BTreeMap::new();
    for (key, path) in files {
        let rows = load_dataset(key, path)
            .with_context(|| format!("loading {key} data from {}", path.display()))?;
        log::info!("Loaded {} {key} rows from {}", rows.len(), path.display());
        sources.insert(key, rows);
    }
    Ok(sources)
}

/// Read the rows of one dataset, using its column mapping.
pub fn load_dataset(key: DatasetKey, path: &Path) -> Result<Vec<RawRow>> {
    load_file(path, key.columns())
}

/// Load raw rows from a table file.  Dispatch by extension.
///
/// Supported formats:
/// * `.csv`     – header row, one measurement per row
/// * `.json`    – `[{ "<timestamp column>": ..., "<value column>": ... }, ...]`
/// * `.parquet` – flat table with the two named columns
pub fn load_file(path: &Path, columns: SourceColumns) -> Result<Vec<RawRow>> {
    let ext = path
        .extension()
        .and_then(|e| e.to_str())
        .unwrap_or("")
        .to_ascii_lowercase();

    match ext.as_str() {
        "csv" => load_csv(path, columns),
        "json" => load_json(path, columns),
        "parquet" | "pq" => load_parquet(path, columns),
        other => bail!("Unsupported file extension: .{other}"),
    }
}

// ---------------------------------------------------------------------------
// CSV loader
// ---------------------------------------------------------------------------

/// Extra columns (site, county, units, ...) are ignored.
fn load_csv(path: &Path, columns: SourceColumns) -> Result<Vec<RawRow>> {
    let mut reader = csv::Reader::from_path(path).context("opening CSV")?;
    let headers = reader.headers().context("reading CSV headers")?.clone();

    let ts_idx = column_index(headers.iter(), columns.timestamp)
        .with_context(|| format!("CSV missing '{}' column", columns.timestamp))?;
    let value_idx = column_index(headers.iter(), columns.value)
        .with_context(|| format!("CSV missing '{}' column", columns.value))?;

    let mut rows = Vec::new();
    for (row_no, result) in reader.records().enumerate() {
        let line = row_no + 1;
        let record = result.with_context(|| format!("CSV row {line}"))?;
        rows.push(RawRow::new(
            line,
            record.get(ts_idx).unwrap_or(""),
            record.get(value_idx).unwrap_or(""),
        ));
    }
    Ok(rows)
}

/// Header match ignoring surrounding whitespace (and a UTF-8 BOM on the first header).
fn column_index<'h>(mut headers: impl Iterator<Item = &'h str>, name: &str) -> Option<usize> {
    headers.position(|h| h.trim_start_matches('\u{feff}').trim() == name)
}

// ---------------------------------------------------------------------------
// JSON loader
// ---------------------------------------------------------------------------

/// Expected JSON schema (records-oriented, `df.to_json(orient='records')`).
/// Timestamps may be ISO date strings or the epoch milliseconds pandas writes
/// for datetime columns:
///
/// ```json
/// [
///   { "date_local": "2000-03-01", "arithmetic_mean": 0.031, "site": "..." },
///   ...
/// ]
/// ```
fn load_json(path: &Path, columns: SourceColumns) -> Result<Vec<RawRow>> {
    let text = std::fs::read_to_string(path).context("reading JSON file")?;
    let root: JsonValue = serde_json::from_str(&text).context("parsing JSON")?;

    let records = root.as_array().context("Expected top-level JSON array")?;

    records
        .iter()
        .enumerate()
        .map(|(i, rec)| {
            let line = i + 1;
            let obj = rec
                .as_object()
                .with_context(|| format!("Row {line} is not a JSON object"))?;
            let ts = obj
                .get(columns.timestamp)
                .with_context(|| format!("Row {line}: missing '{}'", columns.timestamp))?;
            let value = obj.get(columns.value).unwrap_or(&JsonValue::Null);
            Ok(RawRow::new(line, json_to_cell(ts), json_to_cell(value)))
        })
        .collect()
}

fn json_to_cell(val: &JsonValue) -> String {
    match val {
        JsonValue::String(s) => s.clone(),
        JsonValue::Null => String::new(),
        other => other.to_string(),
    }
}

// ---------------------------------------------------------------------------
// Parquet loader
// ---------------------------------------------------------------------------

/// Load a Parquet table. Any column type is accepted; cells are rendered to
/// text (dates as ISO-8601, nulls as empty) and interpreted later.
fn load_parquet(path: &Path, columns: SourceColumns) -> Result<Vec<RawRow>> {
    let file = std::fs::File::open(path).context("opening parquet file")?;
    let builder =
        ParquetRecordBatchReaderBuilder::try_new(file).context("reading parquet metadata")?;
    let reader = builder.build().context("building parquet reader")?;

    let options = FormatOptions::default();
    let mut rows = Vec::new();

    for batch_result in reader {
        let batch = batch_result.context("reading parquet record batch")?;
        let schema = batch.schema();

        let ts_idx = schema
            .index_of(columns.timestamp)
            .map_err(|_| anyhow::anyhow!("Parquet file missing '{}' column", columns.timestamp))?;
        let value_idx = schema
            .index_of(columns.value)
            .map_err(|_| anyhow::anyhow!("Parquet file missing '{}' column", columns.value))?;

        let ts_col = batch.column(ts_idx);
        let value_col = batch.column(value_idx);
        let ts_fmt = ArrayFormatter::try_new(ts_col.as_ref(), &options)
            .context("formatting timestamp column")?;
        let value_fmt = ArrayFormatter::try_new(value_col.as_ref(), &options)
            .context("formatting value column")?;

        for row in 0..batch.num_rows() {
            let line = rows.len() + 1;
            let cell = |col: &dyn Array, fmt: &ArrayFormatter<'_>| {
                if col.is_null(row) {
                    String::new()
                } else {
                    fmt.value(row).to_string()
                }
            };
            rows.push(RawRow::new(
                line,
                cell(ts_col.as_ref(), &ts_fmt),
                cell(value_col.as_ref(), &value_fmt),
            ));
        }
    }

    Ok(rows)
}

#[cfg(test)]
mod tests {
    use std::io::Write;
    use std::sync::Arc;

    use arrow::array::{Float64Array, Int64Array, StringArray, TimestampMillisecondArray};
    use arrow::datatypes::{DataType, Field, Schema, TimeUnit};
    use arrow::record_batch::RecordBatch;
    use parquet::arrow::ArrowWriter;

    use super::*;
    use crate::data::annualize::aggregate;
    use crate::data::model::{ParseMode, Reducer};

    fn write_temp(suffix: &str, contents: &str) -> tempfile::NamedTempFile {
        let mut file = tempfile::Builder::new().suffix(suffix).tempfile().unwrap();
        file.write_all(contents.as_bytes()).unwrap();
        file
    }

    #[test]
    fn test_csv_maps_pollutant_columns() {
        let file = write_temp(
            ".csv",
            "site,date_local,arithmetic_mean,units\n\
             A,2000-03-01,0.03,ppm\n\
             A,2000-07-01,,ppm\n",
        );
        let rows = load_dataset(DatasetKey::Ozone, file.path()).unwrap();

        assert_eq!(
            rows,
            vec![
                RawRow::new(1, "2000-03-01", "0.03"),
                RawRow::new(2, "2000-07-01", ""),
            ]
        );
    }

    #[test]
    fn test_csv_maps_hospitalization_columns() {
        let file = write_temp(".csv", "\u{feff}Year,Age Group,Case Count\n2001,0-4,12\n2001,5-17,30\n");
        let rows = load_dataset(DatasetKey::Hospitalizations, file.path()).unwrap();

        assert_eq!(rows.len(), 2);
        assert_eq!(rows[1], RawRow::new(2, "2001", "30"));
    }

    #[test]
    fn test_csv_missing_column_is_an_error() {
        let file = write_temp(".csv", "date,value\n2000-01-01,1\n");
        let err = load_dataset(DatasetKey::Benzene, file.path()).unwrap_err();
        assert!(format!("{err:#}").contains("missing 'date_local' column"));
    }

    #[test]
    fn test_json_records() {
        let file = write_temp(
            ".json",
            r#"[{"Year": 2003, "Case Count": 41}, {"Year": "2004", "Case Count": null}]"#,
        );
        let rows = load_dataset(DatasetKey::Hospitalizations, file.path()).unwrap();

        assert_eq!(
            rows,
            vec![RawRow::new(1, "2003", "41"), RawRow::new(2, "2004", "")]
        );
    }

    #[test]
    fn test_parquet_table() {
        let file = tempfile::Builder::new().suffix(".parquet").tempfile().unwrap();
        let schema = Arc::new(Schema::new(vec![
            Field::new("Year", DataType::Int64, false),
            Field::new("Case Count", DataType::Float64, true),
            Field::new("Region", DataType::Utf8, false),
        ]));
        let batch = RecordBatch::try_new(
            schema.clone(),
            vec![
                Arc::new(Int64Array::from(vec![2010, 2011])),
                Arc::new(Float64Array::from(vec![Some(12.5), None])),
                Arc::new(StringArray::from(vec!["Suffolk", "Suffolk"])),
            ],
        )
        .unwrap();
        let mut writer = ArrowWriter::try_new(file.reopen().unwrap(), schema, None).unwrap();
        writer.write(&batch).unwrap();
        writer.close().unwrap();

        let rows = load_dataset(DatasetKey::Hospitalizations, file.path()).unwrap();
        assert_eq!(
            rows,
            vec![RawRow::new(1, "2010", "12.5"), RawRow::new(2, "2011", "")]
        );
    }

    #[test]
    fn test_json_epoch_millisecond_dates() {
        let file = write_temp(
            ".json",
            r#"[{"date_local": 1109678400500, "arithmetic_mean": 0.03},
                {"date_local": 1136073600000, "arithmetic_mean": 0.05}]"#,
        );
        let rows = load_dataset(DatasetKey::Ozone, file.path()).unwrap();
        let series = aggregate(&rows, Reducer::Mean, ParseMode::Strict).unwrap();

        assert_eq!(series.value_for(2005), Some(0.03));
        assert_eq!(series.value_for(2006), Some(0.05));
    }

    #[test]
    fn test_parquet_millisecond_timestamps_aggregate() {
        let file = tempfile::Builder::new().suffix(".parquet").tempfile().unwrap();
        let schema = Arc::new(Schema::new(vec![
            Field::new(
                "date_local",
                DataType::Timestamp(TimeUnit::Millisecond, None),
                false,
            ),
            Field::new("arithmetic_mean", DataType::Float64, false),
        ]));
        let batch = RecordBatch::try_new(
            schema.clone(),
            vec![
                // 2005-03-01 12:00:00.500, 2005-09-01 00:00:00.250, 2006-01-01 00:00:00
                Arc::new(TimestampMillisecondArray::from(vec![
                    1_109_678_400_500,
                    1_125_532_800_250,
                    1_136_073_600_000,
                ])),
                Arc::new(Float64Array::from(vec![2.0, 4.0, 1.0])),
            ],
        )
        .unwrap();
        let mut writer = ArrowWriter::try_new(file.reopen().unwrap(), schema, None).unwrap();
        writer.write(&batch).unwrap();
        writer.close().unwrap();

        let rows = load_dataset(DatasetKey::Ozone, file.path()).unwrap();
        assert_eq!(rows.len(), 3);
        assert!(rows[0].timestamp.starts_with("2005-03-01"));

        let series = aggregate(&rows, Reducer::Mean, ParseMode::Strict).unwrap();
        assert_eq!(series.value_for(2005), Some(3.0));
        assert_eq!(series.value_for(2006), Some(1.0));
    }

    #[test]
    fn test_unsupported_extension() {
        let file = write_temp(".xlsx", "");
        let err = load_dataset(DatasetKey::Ozone, file.path()).unwrap_err();
        assert!(err.to_string().contains("Unsupported file extension"));
    }

    #[test]
    fn test_load_sources_names_failing_file() {
        let good = write_temp(".csv", "date_local,arithmetic_mean\n2000-01-01,1\n");
        let missing = Path::new("/definitely/not/here.csv");
        let err = load_sources([
            (DatasetKey::Ozone, good.path()),
            (DatasetKey::No2, missing),
        ])
        .unwrap_err();
        assert!(format!("{err:#}").contains("loading NO2 data"));
    }
}
