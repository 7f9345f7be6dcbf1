use eframe::egui::{self, Color32, RichText, Ui};

use crate::data::model::DatasetKey;
use crate::state::AppState;

// ---------------------------------------------------------------------------
// Top bar
// ---------------------------------------------------------------------------

/// Render the top menu / toolbar.
pub fn top_bar(ui: &mut Ui, state: &mut AppState) {
    egui::menu::bar(ui, |ui: &mut Ui| {
        ui.menu_button("File", |ui: &mut Ui| {
            if ui.button("Export view as CSV…").clicked() {
                export_dialog(state);
                ui.close_menu();
            }
        });

        ui.separator();

        let years = |key: DatasetKey| {
            state
                .registry
                .lookup(key)
                .map(|s| s.len())
                .unwrap_or_default()
        };
        ui.label(format!(
            "{}: {} years, hospitalizations: {} years",
            state.view.primary_key,
            years(state.view.primary_key),
            years(DatasetKey::Hospitalizations),
        ));

        if let Some(msg) = &state.status_message {
            ui.separator();
            ui.label(RichText::new(msg).color(Color32::RED));
        }
    });
}

// ---------------------------------------------------------------------------
// Pollutant selector
// ---------------------------------------------------------------------------

/// "Select Pollutant:" dropdown shown under the pollutant chart.
pub fn pollutant_selector(ui: &mut Ui, state: &mut AppState) {
    ui.vertical_centered(|ui: &mut Ui| {
        ui.add_space(10.0);
        ui.label(RichText::new("Select Pollutant:").strong().size(14.0));

        let current = state.selection.get();
        let mut picked = None;
        egui::ComboBox::from_id_salt("pollutant_dropdown")
            .selected_text(current.name())
            .width(ui.available_width() * 0.6)
            .show_ui(ui, |ui: &mut Ui| {
                for key in DatasetKey::POLLUTANTS {
                    if ui.selectable_label(current == key, key.name()).clicked() {
                        picked = Some(key);
                    }
                }
            });

        if let Some(key) = picked.filter(|&k| k != current) {
            // Error already recorded in the status line.
            let _ = state.handle_selection_change(key);
        }
    });
}

// ---------------------------------------------------------------------------
// File dialog
// ---------------------------------------------------------------------------

pub fn export_dialog(state: &mut AppState) {
    let default_name = format!("{}_vs_hospitalizations.csv", state.view.primary_key);
    let file = rfd::FileDialog::new()
        .set_title("Export displayed data")
        .set_file_name(default_name)
        .add_filter("CSV", &["csv"])
        .save_file();

    if let Some(path) = file {
        match crate::data::export::write_view_csv(&path, &state.view) {
            Ok(()) => state.status_message = None,
            Err(e) => {
                log::error!("Failed to export view: {e:#}");
                state.status_message = Some(format!("Error: {e:#}"));
            }
        }
    }
}
