use eframe::egui::Color32;
use palette::{Hsl, IntoColor, Srgb};

use crate::data::model::Commodity;

// ---------------------------------------------------------------------------
// Fixed commodity palette
// ---------------------------------------------------------------------------

/// The same colour for a commodity in every chart, legend and table row.
pub const COMMODITY_COLORS: [(Commodity, &str); 5] = [
    (Commodity::Cheese, "#636EFA"),
    (Commodity::Coffee, "#EF553B"),
    (Commodity::Honey, "#00CC96"),
    (Commodity::Milk, "#AB63FA"),
    (Commodity::Yogurt, "#FFA15A"),
];

fn commodity_rgb(commodity: Commodity) -> Option<Srgb<u8>> {
    COMMODITY_COLORS
        .iter()
        .find(|(c, _)| *c == commodity)
        .and_then(|(_, hex)| hex.parse::<Srgb<u8>>().ok())
}

fn to_color32(rgb: Srgb<u8>) -> Color32 {
    Color32::from_rgb(rgb.red, rgb.green, rgb.blue)
}

/// Chart colour for a commodity.
pub fn commodity_color(commodity: Commodity) -> Color32 {
    commodity_rgb(commodity)
        .map(to_color32)
        .unwrap_or(Color32::GRAY)
}

/// Commodity colour adjusted to stay readable as text on the current theme:
/// lightened on dark backgrounds, darkened on light ones.
pub fn commodity_text_color(commodity: Commodity, dark_mode: bool) -> Color32 {
    let Some(rgb) = commodity_rgb(commodity) else {
        return Color32::GRAY;
    };
    let mut hsl: Hsl = rgb.into_format::<f32>().into_color();
    hsl.lightness = if dark_mode {
        hsl.lightness.max(0.65)
    } else {
        hsl.lightness.min(0.40)
    };
    let adjusted: Srgb = hsl.into_color();
    to_color32(adjusted.into_format())
}
