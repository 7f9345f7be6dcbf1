use std::sync::Arc;

use crate::data::model::DatasetKey;
use crate::data::registry::SeriesRegistry;
use crate::error::TrendsError;
use crate::ui::plot::{self, ChartStyle, Figure};
use crate::view::{ViewModel, compose};

// ---------------------------------------------------------------------------
// Selection state
// ---------------------------------------------------------------------------

/// The pollutant shown on the primary chart. Always one of
/// [`DatasetKey::POLLUTANTS`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SelectionState {
    selected: DatasetKey,
}

impl Default for SelectionState {
    fn default() -> Self {
        Self {
            selected: DatasetKey::Ozone,
        }
    }
}

impl SelectionState {
    /// Start from `key` instead of the default.
    pub fn with_initial(key: DatasetKey) -> Result<Self, TrendsError> {
        let mut state = Self::default();
        state.set(key)?;
        Ok(state)
    }

    /// Select a pollutant. Anything else is rejected and the current
    /// selection is kept.
    pub fn set(&mut self, key: DatasetKey) -> Result<(), TrendsError> {
        if !key.is_pollutant() {
            return Err(TrendsError::InvalidSelection(key));
        }
        self.selected = key;
        Ok(())
    }

    pub fn get(&self) -> DatasetKey {
        self.selected
    }
}

// ---------------------------------------------------------------------------
// Application state
// ---------------------------------------------------------------------------

/// The full UI state, independent of rendering.
pub struct AppState {
    /// Annual series, shared read-only.
    pub registry: Arc<SeriesRegistry>,

    /// Region name used in chart titles.
    pub region: String,

    /// Which pollutant is on the primary chart.
    pub selection: SelectionState,

    /// Current view, recomputed on every selection change.
    pub view: ViewModel,

    /// Pollutant chart, redrawn per selection.
    pub primary_figure: Figure,

    /// Hospitalization chart, built once.
    pub secondary_figure: Figure,

    /// Status / error message shown in the UI.
    pub status_message: Option<String>,
}

impl AppState {
    /// Compose the initial view and render both charts.
    pub fn new(
        registry: Arc<SeriesRegistry>,
        region: impl Into<String>,
        initial: DatasetKey,
    ) -> Result<Self, TrendsError> {
        let region = region.into();
        let selection = SelectionState::with_initial(initial)?;
        let view = compose(&selection, &registry, &region)?;

        let primary_figure = plot::render(
            &view.primary_series,
            &view.primary_label,
            ChartStyle::pollutant(),
        );
        let secondary_figure = plot::render(
            &view.secondary_series,
            &view.secondary_label,
            ChartStyle::hospitalizations(),
        );

        Ok(Self {
            registry,
            region,
            selection,
            view,
            primary_figure,
            secondary_figure,
            status_message: None,
        })
    }

    /// Apply a user selection: update state, recompose, redraw the primary
    /// chart. On error nothing visible changes except the status line.
    pub fn handle_selection_change(&mut self, key: DatasetKey) -> Result<(), TrendsError> {
        match self.try_select(key) {
            Ok(()) => {
                log::debug!("Selected {key}");
                self.status_message = None;
                Ok(())
            }
            Err(e) => {
                log::error!("Selection rejected: {e}");
                self.status_message = Some(format!("Error: {e}"));
                Err(e)
            }
        }
    }

    fn try_select(&mut self, key: DatasetKey) -> Result<(), TrendsError> {
        let mut next = self.selection;
        next.set(key)?;
        let view = compose(&next, &self.registry, &self.region)?;

        self.primary_figure = plot::render(
            &view.primary_series,
            &view.primary_label,
            ChartStyle::pollutant(),
        );
        self.selection = next;
        self.view = view;
        Ok(())
    }
}
