use std::collections::BTreeMap;
use std::fmt;
use std::str::FromStr;

// ---------------------------------------------------------------------------
// DatasetKey – the closed set of source datasets
// ---------------------------------------------------------------------------

/// Identifies one of the four source datasets.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum DatasetKey {
    Benzene,
    No2,
    Ozone,
    Hospitalizations,
}

/// Where the timestamp and measurement live in a source table.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SourceColumns {
    pub timestamp: &'static str,
    pub value: &'static str,
}

impl DatasetKey {
    pub const ALL: [DatasetKey; 4] = [
        DatasetKey::Benzene,
        DatasetKey::No2,
        DatasetKey::Ozone,
        DatasetKey::Hospitalizations,
    ];

    /// The keys a user may pick for the primary chart, in dropdown order.
    pub const POLLUTANTS: [DatasetKey; 3] =
        [DatasetKey::Benzene, DatasetKey::No2, DatasetKey::Ozone];

    pub fn name(self) -> &'static str {
        match self {
            DatasetKey::Benzene => "Benzene",
            DatasetKey::No2 => "NO2",
            DatasetKey::Ozone => "Ozone",
            DatasetKey::Hospitalizations => "Hospitalizations",
        }
    }

    pub fn is_pollutant(self) -> bool {
        !matches!(self, DatasetKey::Hospitalizations)
    }

    /// Pollutant readings are averaged per year, hospital cases are counted.
    pub fn reducer(self) -> Reducer {
        if self.is_pollutant() {
            Reducer::Mean
        } else {
            Reducer::Sum
        }
    }

    pub fn columns(self) -> SourceColumns {
        if self.is_pollutant() {
            SourceColumns {
                timestamp: "date_local",
                value: "arithmetic_mean",
            }
        } else {
            SourceColumns {
                timestamp: "Year",
                value: "Case Count",
            }
        }
    }
}

impl fmt::Display for DatasetKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

impl FromStr for DatasetKey {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let wanted = s.trim();
        DatasetKey::ALL
            .into_iter()
            .find(|k| k.name().eq_ignore_ascii_case(wanted))
            .ok_or_else(|| {
                format!("unknown dataset '{wanted}' (expected Benzene, NO2, Ozone or Hospitalizations)")
            })
    }
}

// ---------------------------------------------------------------------------
// Raw input and aggregation settings
// ---------------------------------------------------------------------------

/// One row as handed over by the reader: the two relevant cells as text.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RawRow {
    /// 1-based data row number in the source table.
    pub line: usize,
    pub timestamp: String,
    pub value: String,
}

impl RawRow {
    pub fn new(line: usize, timestamp: impl Into<String>, value: impl Into<String>) -> Self {
        Self {
            line,
            timestamp: timestamp.into(),
            value: value.into(),
        }
    }
}

/// How the values of one year are combined.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Reducer {
    Mean,
    Sum,
}

/// What to do with a row whose timestamp or value cannot be parsed.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum ParseMode {
    /// Abort the dataset on the first malformed row.
    #[default]
    Strict,
    /// Skip malformed rows and keep going.
    Lenient,
}

// ---------------------------------------------------------------------------
// AnnualSeries – sparse, one value per calendar year
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct YearPoint {
    pub year: i32,
    pub value: f64,
}

/// Yearly values in ascending year order. Years without data are absent.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct AnnualSeries {
    points: Vec<YearPoint>,
}

impl AnnualSeries {
    /// Build from per-year values; the map guarantees unique, sorted years.
    pub fn from_years(years: BTreeMap<i32, f64>) -> Self {
        let points = years
            .into_iter()
            .map(|(year, value)| YearPoint { year, value })
            .collect();
        Self { points }
    }

    pub fn points(&self) -> &[YearPoint] {
        &self.points
    }

    pub fn len(&self) -> usize {
        self.points.len()
    }

    pub fn is_empty(&self) -> bool {
        self.points.is_empty()
    }

    /// First and last year present, if any.
    pub fn year_range(&self) -> Option<(i32, i32)> {
        let first = self.points.first()?;
        let last = self.points.last()?;
        Some((first.year, last.year))
    }

    pub fn value_for(&self, year: i32) -> Option<f64> {
        self.points
            .binary_search_by_key(&year, |p| p.year)
            .ok()
            .map(|i| self.points[i].value)
    }
}
