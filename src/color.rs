use eframe::egui::Color32;
use palette::{Hsl, IntoColor, Srgb};

// ---------------------------------------------------------------------------
// Series colours
// ---------------------------------------------------------------------------

/// Hue (degrees) of the pollutant line.
pub const POLLUTANT_HUE: f32 = 120.0;

/// Hue (degrees) of the hospitalization line.
pub const HOSPITALIZATION_HUE: f32 = 0.0;

/// Convert an HSL triple to an egui colour.
pub fn hsl_color(hue: f32, saturation: f32, lightness: f32) -> Color32 {
    let hsl = Hsl::new(hue, saturation, lightness);
    let rgb: Srgb = hsl.into_color();
    Color32::from_rgb(
        (rgb.red.clamp(0.0, 1.0) * 255.0).round() as u8,
        (rgb.green.clamp(0.0, 1.0) * 255.0).round() as u8,
        (rgb.blue.clamp(0.0, 1.0) * 255.0).round() as u8,
    )
}

/// Line colour for a chart with the given hue.
pub fn line_color(hue: f32) -> Color32 {
    hsl_color(hue, 1.0, 0.4)
}

/// A lighter shade of the same hue, used for the point markers.
pub fn marker_color(hue: f32) -> Color32 {
    hsl_color(hue, 0.75, 0.55)
}
