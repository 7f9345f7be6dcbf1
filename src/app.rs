use eframe::egui::{self, Ui};

use crate::state::AppState;
use crate::ui::{panels, plot};

/// Below this width the two charts are stacked.
const SIDE_BY_SIDE_MIN_WIDTH: f32 = 960.0;

// ---------------------------------------------------------------------------
// eframe App implementation
// ---------------------------------------------------------------------------

pub struct TrendsApp {
    pub state: AppState,
    pub heading: String,
}

impl TrendsApp {
    pub fn new(state: AppState, heading: String) -> Self {
        Self { state, heading }
    }

    fn pollutant_chart(&mut self, ui: &mut Ui) {
        plot::show_figure(ui, "pollutant_chart", &self.state.primary_figure);
        panels::pollutant_selector(ui, &mut self.state);
    }
}

impl eframe::App for TrendsApp {
    fn update(&mut self, ctx: &egui::Context, _frame: &mut eframe::Frame) {
        // ---- Top panel: menu bar ----
        egui::TopBottomPanel::top("top_bar").show(ctx, |ui| {
            panels::top_bar(ui, &mut self.state);
        });

        // ---- Central panel: heading + both charts ----
        egui::CentralPanel::default().show(ctx, |ui| {
            ui.vertical_centered(|ui: &mut Ui| {
                ui.heading(&self.heading);
            });
            ui.add_space(20.0);

            egui::ScrollArea::vertical()
                .auto_shrink([false, false])
                .show(ui, |ui: &mut Ui| {
                    if ui.available_width() >= SIDE_BY_SIDE_MIN_WIDTH {
                        ui.columns(2, |cols| {
                            self.pollutant_chart(&mut cols[0]);
                            plot::show_figure(
                                &mut cols[1],
                                "hospitalization_chart",
                                &self.state.secondary_figure,
                            );
                        });
                    } else {
                        self.pollutant_chart(ui);
                        ui.add_space(20.0);
                        plot::show_figure(ui, "hospitalization_chart", &self.state.secondary_figure);
                    }
                });
        });
    }
}
