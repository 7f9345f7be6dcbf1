use std::collections::BTreeMap;

use chrono::{DateTime, Datelike, NaiveDate, NaiveDateTime, Utc};

use super::model::{AnnualSeries, ParseMode, RawRow, Reducer};
use crate::error::{MalformedRowError, RowField};

const DATE_FORMATS: [&str; 3] = ["%Y-%m-%d", "%m/%d/%Y", "%Y/%m/%d"];
// `%.f` also matches when there is no fractional part.
const DATETIME_FORMATS: [&str; 4] = [
    "%Y-%m-%d %H:%M:%S%.f",
    "%Y-%m-%dT%H:%M:%S%.f",
    "%Y-%m-%d %H:%M",
    "%Y-%m-%dT%H:%M",
];

// ---------------------------------------------------------------------------
// Public entry-points
// ---------------------------------------------------------------------------

/// Group raw rows by calendar year and reduce each group to one value.
///
/// Empty value cells are missing measurements and are dropped silently.
/// Any other unparseable cell is a [`MalformedRowError`] in strict mode and a
/// skipped row in lenient mode.
pub fn aggregate(
    rows: &[RawRow],
    reducer: Reducer,
    mode: ParseMode,
) -> Result<AnnualSeries, MalformedRowError> {
    let mut points = Vec::with_capacity(rows.len());
    let mut missing = 0usize;
    let mut skipped = 0usize;

    for row in rows {
        match parse_row(row) {
            Ok(Some(point)) => points.push(point),
            Ok(None) => missing += 1,
            Err(e) => match mode {
                ParseMode::Strict => return Err(e),
                ParseMode::Lenient => {
                    log::warn!("Skipping {e}");
                    skipped += 1;
                }
            },
        }
    }

    if missing > 0 {
        log::debug!("{missing} rows without a measurement ignored");
    }
    if skipped > 0 {
        log::info!("{skipped} malformed rows skipped");
    }

    Ok(annualize(&points, reducer))
}

/// Reduce already-typed `(year, value)` points to an [`AnnualSeries`].
pub fn annualize(points: &[(i32, f64)], reducer: Reducer) -> AnnualSeries {
    // year → (sum, count)
    let mut groups: BTreeMap<i32, (f64, usize)> = BTreeMap::new();
    for &(year, value) in points {
        let acc = groups.entry(year).or_insert((0.0, 0));
        acc.0 += value;
        acc.1 += 1;
    }

    let years = groups
        .into_iter()
        .map(|(year, (sum, count))| {
            let value = match reducer {
                Reducer::Sum => sum,
                Reducer::Mean => sum / count as f64,
            };
            (year, value)
        })
        .collect();

    AnnualSeries::from_years(years)
}

// ---------------------------------------------------------------------------
// Cell parsing
// ---------------------------------------------------------------------------

/// `Ok(None)` when the value cell is empty.
fn parse_row(row: &RawRow) -> Result<Option<(i32, f64)>, MalformedRowError> {
    let year = parse_year(&row.timestamp).ok_or_else(|| MalformedRowError {
        line: row.line,
        field: RowField::Timestamp,
        text: row.timestamp.clone(),
        reason: "is not a recognised date or year".to_string(),
    })?;

    let text = row.value.trim();
    if text.is_empty() {
        return Ok(None);
    }
    let malformed_value = |reason: &str| MalformedRowError {
        line: row.line,
        field: RowField::Value,
        text: row.value.clone(),
        reason: reason.to_string(),
    };
    let value: f64 = text.parse().map_err(|_| malformed_value("is not a number"))?;
    if !value.is_finite() {
        return Err(malformed_value("is not a finite number"));
    }

    Ok(Some((year, value)))
}

/// Extract the calendar year from a bare year, a date, a date-time or an
/// epoch-millisecond timestamp.
pub fn parse_year(text: &str) -> Option<i32> {
    let s = text.trim();
    if s.is_empty() {
        return None;
    }

    if s.len() == 4 && s.bytes().all(|b| b.is_ascii_digit()) {
        return s.parse().ok();
    }
    // Spreadsheets sometimes export integer years as floats ("2005.0").
    if let Some(whole) = s.strip_suffix(".0") {
        if whole.len() == 4 && whole.bytes().all(|b| b.is_ascii_digit()) {
            return whole.parse().ok();
        }
    }
    // pandas `to_json` writes datetimes as epoch milliseconds.
    if s.len() >= 10 && s.bytes().all(|b| b.is_ascii_digit()) {
        return s
            .parse::<i64>()
            .ok()
            .and_then(DateTime::<Utc>::from_timestamp_millis)
            .map(|dt| dt.year());
    }

    for fmt in DATE_FORMATS {
        if let Ok(d) = NaiveDate::parse_from_str(s, fmt) {
            return Some(d.year());
        }
    }
    for fmt in DATETIME_FORMATS {
        if let Ok(dt) = NaiveDateTime::parse_from_str(s, fmt) {
            return Some(dt.year());
        }
    }
    DateTime::parse_from_rfc3339(s).ok().map(|dt| dt.year())
}
