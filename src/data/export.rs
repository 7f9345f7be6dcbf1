use std::collections::BTreeSet;
use std::io::Write;
use std::path::Path;

use anyhow::{Context, Result};
use serde::Serialize;

use crate::view::ViewModel;

// ---------------------------------------------------------------------------
// CSV export of the displayed view
// ---------------------------------------------------------------------------

#[derive(Debug, Serialize)]
struct ExportRow {
    year: i32,
    pollutant: Option<f64>,
    hospitalizations: Option<f64>,
}

/// Write both charts' data side by side, one row per year present in either
/// series. A year missing from one series leaves its cell blank.
pub fn write_view_csv(path: &Path, view: &ViewModel) -> Result<()> {
    let file = std::fs::File::create(path)
        .with_context(|| format!("creating {}", path.display()))?;
    write_view(file, view).with_context(|| format!("writing {}", path.display()))?;
    log::info!("Exported {} view to {}", view.primary_key, path.display());
    Ok(())
}

pub fn write_view<W: Write>(writer: W, view: &ViewModel) -> Result<()> {
    let mut wtr = csv::WriterBuilder::new()
        .has_headers(false)
        .from_writer(writer);
    wtr.write_record(["year", view.primary_key.name(), "hospitalizations"])?;

    let years: BTreeSet<i32> = view
        .primary_series
        .points()
        .iter()
        .chain(view.secondary_series.points())
        .map(|p| p.year)
        .collect();

    for year in years {
        wtr.serialize(ExportRow {
            year,
            pollutant: view.primary_series.value_for(year),
            hospitalizations: view.secondary_series.value_for(year),
        })?;
    }
    wtr.flush()?;
    Ok(())
}
