use std::sync::Arc;

use crate::data::model::{AnnualSeries, DatasetKey};
use crate::data::registry::SeriesRegistry;
use crate::error::TrendsError;
use crate::state::SelectionState;

// ---------------------------------------------------------------------------
// ViewModel – what the two charts show
// ---------------------------------------------------------------------------

/// Series and titles for the pollutant chart and the hospitalization chart.
#[derive(Debug, Clone, PartialEq)]
pub struct ViewModel {
    pub primary_key: DatasetKey,
    pub primary_series: Arc<AnnualSeries>,
    pub primary_label: String,
    pub secondary_series: Arc<AnnualSeries>,
    pub secondary_label: String,
}

/// Derive the view for the current selection. No state is read or written
/// beyond the two arguments.
pub fn compose(
    selection: &SelectionState,
    registry: &SeriesRegistry,
    region: &str,
) -> Result<ViewModel, TrendsError> {
    let primary_key = selection.get();
    let primary_series = registry.lookup(primary_key)?;
    let secondary_series = registry.lookup(DatasetKey::Hospitalizations)?;

    let primary_label = format!(
        "Average {primary_key} Concentration {}",
        year_span(&primary_series)
    );
    let secondary_label = format!(
        "Annual Asthma Hospitalizations in {region} {}",
        year_span(&secondary_series)
    );

    Ok(ViewModel {
        primary_key,
        primary_series,
        primary_label,
        secondary_series,
        secondary_label,
    })
}

/// "(2000–2024)" from the years actually present.
fn year_span(series: &AnnualSeries) -> String {
    match series.year_range() {
        Some((first, last)) if first == last => format!("({first})"),
        Some((first, last)) => format!("({first}–{last})"),
        None => "(no data)".to_string(),
    }
}
