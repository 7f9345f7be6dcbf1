use std::fmt;

use thiserror::Error;

use crate::data::model::DatasetKey;

// ---------------------------------------------------------------------------
// Row-level parse failure
// ---------------------------------------------------------------------------

/// Which cell of a raw row could not be interpreted.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RowField {
    Timestamp,
    Value,
}

impl fmt::Display for RowField {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            RowField::Timestamp => write!(f, "timestamp"),
            RowField::Value => write!(f, "value"),
        }
    }
}

/// A raw row whose timestamp or value cell is unusable.
#[derive(Error, Debug, Clone, PartialEq)]
#[error("row {line}: {field} '{text}' {reason}")]
pub struct MalformedRowError {
    /// 1-based data row number in the source table.
    pub line: usize,
    pub field: RowField,
    pub text: String,
    pub reason: String,
}

// ---------------------------------------------------------------------------
// Core error taxonomy
// ---------------------------------------------------------------------------

/// Errors surfaced by the aggregation pipeline and the selection state.
#[derive(Error, Debug, Clone, PartialEq)]
pub enum TrendsError {
    /// A dataset could not be aggregated because one of its rows is malformed.
    #[error("malformed {dataset} data: {source}")]
    MalformedRow {
        dataset: DatasetKey,
        #[source]
        source: MalformedRowError,
    },

    /// The registry holds no series for this key.
    #[error("no annual series loaded for {0}")]
    UnknownDataset(DatasetKey),

    /// Only pollutants can be selected for the primary chart.
    #[error("{0} is not a selectable pollutant")]
    InvalidSelection(DatasetKey),
}
