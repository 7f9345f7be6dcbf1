use eframe::egui::{Color32, RichText, Ui};
use egui_plot::{Line, Plot, Points, uniform_grid_spacer};

use crate::color::{HOSPITALIZATION_HUE, POLLUTANT_HUE, line_color, marker_color};
use crate::data::model::AnnualSeries;

const CHART_HEIGHT: f32 = 400.0;

// ---------------------------------------------------------------------------
// Figure – renderer output, independent of egui
// ---------------------------------------------------------------------------

/// Axis labels and colours of one kind of chart.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ChartStyle {
    pub x_label: &'static str,
    pub y_label: &'static str,
    pub hue: f32,
    /// Years between x-axis ticks.
    pub x_tick_step: f64,
}

impl ChartStyle {
    pub fn pollutant() -> Self {
        Self {
            x_label: "Year",
            y_label: "Concentration",
            hue: POLLUTANT_HUE,
            x_tick_step: 2.0,
        }
    }

    pub fn hospitalizations() -> Self {
        Self {
            x_label: "Year",
            y_label: "Hospitalizations",
            hue: HOSPITALIZATION_HUE,
            x_tick_step: 2.0,
        }
    }
}

/// A line chart ready to be drawn.
#[derive(Debug, Clone, PartialEq)]
pub struct Figure {
    pub title: String,
    pub x_label: &'static str,
    pub y_label: &'static str,
    /// `[year, value]` pairs in ascending year order.
    pub points: Vec<[f64; 2]>,
    pub line_color: Color32,
    pub marker_color: Color32,
    pub x_tick_step: f64,
}

/// Turn an annual series into a line chart with markers.
///
/// Gaps stay gaps: consecutive points are joined, missing years get no point.
pub fn render(series: &AnnualSeries, label: &str, style: ChartStyle) -> Figure {
    let points = series
        .points()
        .iter()
        .map(|p| [f64::from(p.year), p.value])
        .collect();

    Figure {
        title: label.to_string(),
        x_label: style.x_label,
        y_label: style.y_label,
        points,
        line_color: line_color(style.hue),
        marker_color: marker_color(style.hue),
        x_tick_step: style.x_tick_step,
    }
}

// ---------------------------------------------------------------------------
// egui drawing
// ---------------------------------------------------------------------------

/// Draw a figure into the given area. `id` must be unique per chart.
pub fn show_figure(ui: &mut Ui, id: &str, figure: &Figure) {
    ui.vertical_centered(|ui: &mut Ui| {
        ui.label(RichText::new(&figure.title).strong().size(15.0));
    });

    if figure.points.is_empty() {
        ui.allocate_ui([ui.available_width(), CHART_HEIGHT].into(), |ui: &mut Ui| {
            ui.centered_and_justified(|ui: &mut Ui| {
                ui.label("No data available");
            });
        });
        return;
    }

    let step = figure.x_tick_step;

    Plot::new(id)
        .height(CHART_HEIGHT)
        .x_axis_label(figure.x_label)
        .y_axis_label(figure.y_label)
        .x_grid_spacer(uniform_grid_spacer(move |_| [step, step * 5.0, step * 10.0]))
        .x_axis_formatter(|mark, _range| format!("{:.0}", mark.value))
        .label_formatter(|_name, value| format!("{:.0}: {:.4}", value.x, value.y))
        .allow_boxed_zoom(true)
        .allow_drag(true)
        .allow_scroll(true)
        .allow_zoom(true)
        .show(ui, |plot_ui| {
            let line = Line::new(figure.points.clone())
                .name(figure.y_label)
                .color(figure.line_color)
                .width(2.0);
            plot_ui.line(line);

            let markers = Points::new(figure.points.clone())
                .color(figure.marker_color)
                .radius(3.5);
            plot_ui.points(markers);
        });
}
