use eframe::egui::Color32;
use palette::{Mix, Srgb};

// ---------------------------------------------------------------------------
// Diverging "seismic" colour map
// ---------------------------------------------------------------------------

/// Dark blue → blue → white → red → dark red, white at the centre.
#[derive(Debug, Clone)]
pub struct SeismicColormap {
    stops: Vec<(f32, Srgb)>,
}

impl Default for SeismicColormap {
    fn default() -> Self {
        Self {
            stops: vec![
                (0.0, Srgb::new(0.0, 0.0, 0.3)),
                (0.25, Srgb::new(0.0, 0.0, 1.0)),
                (0.5, Srgb::new(1.0, 1.0, 1.0)),
                (0.75, Srgb::new(1.0, 0.0, 0.0)),
                (1.0, Srgb::new(0.5, 0.0, 0.0)),
            ],
        }
    }
}

impl SeismicColormap {
    /// Colour at position `t ∈ [0, 1]`; values outside are clamped.
    pub fn color_at(&self, t: f32) -> Color32 {
        let t = if t.is_nan() { 0.5 } else { t.clamp(0.0, 1.0) };
        let upper = self
            .stops
            .iter()
            .position(|(pos, _)| *pos >= t)
            .unwrap_or(self.stops.len() - 1)
            .max(1);
        let (p0, c0) = self.stops[upper - 1];
        let (p1, c1) = self.stops[upper];
        let factor = if p1 > p0 { (t - p0) / (p1 - p0) } else { 0.0 };
        to_color32(c0.mix(c1, factor))
    }

    /// Map `value` through the limits `[lo, hi]`. A zero-width (or reversed)
    /// range maps everything to the centre colour.
    pub fn map(&self, value: f64, lo: f64, hi: f64) -> Color32 {
        if value.is_nan() {
            return Color32::TRANSPARENT;
        }
        let t = if hi > lo {
            ((value - lo) / (hi - lo)) as f32
        } else {
            0.5
        };
        self.color_at(t)
    }
}

fn to_color32(rgb: Srgb) -> Color32 {
    Color32::from_rgb(
        (rgb.red * 255.0).round() as u8,
        (rgb.green * 255.0).round() as u8,
        (rgb.blue * 255.0).round() as u8,
    )
}

// ---------------------------------------------------------------------------
// Trace colours offered for wiggle plots
// ---------------------------------------------------------------------------

pub const TRACE_COLORS: [(&str, Color32); 5] = [
    ("red", Color32::RED),
    ("black", Color32::BLACK),
    ("blue", Color32::BLUE),
    ("dark gray", Color32::DARK_GRAY),
    ("green", Color32::DARK_GREEN),
];

/// Display name of a trace colour, falling back to its hex code.
pub fn trace_color_name(color: Color32) -> String {
    TRACE_COLORS
        .iter()
        .find(|(_, c)| *c == color)
        .map(|(name, _)| name.to_string())
        .unwrap_or_else(|| color.to_hex())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn endpoints_and_centre() {
        let cmap = SeismicColormap::default();
        let deep = cmap.color_at(0.0);
        assert_eq!((deep.r(), deep.g()), (0, 0));
        assert!((70..80).contains(&deep.b()));
        assert_eq!(cmap.color_at(0.5), Color32::WHITE);
        assert_eq!(cmap.color_at(1.0), Color32::from_rgb(128, 0, 0));
        assert_eq!(cmap.color_at(0.75), Color32::from_rgb(255, 0, 0));
    }

    #[test]
    fn out_of_range_values_clamp() {
        let cmap = SeismicColormap::default();
        assert_eq!(cmap.map(10.0, -1.0, 1.0), cmap.color_at(1.0));
        assert_eq!(cmap.map(-10.0, -1.0, 1.0), cmap.color_at(0.0));
        assert_eq!(cmap.map(0.0, -1.0, 1.0), Color32::WHITE);
    }

    #[test]
    fn degenerate_limits_map_to_centre() {
        let cmap = SeismicColormap::default();
        assert_eq!(cmap.map(3.0, 0.0, 0.0), Color32::WHITE);
        assert_eq!(cmap.map(3.0, 1.0, -1.0), Color32::WHITE);
    }

    #[test]
    fn named_trace_colors() {
        assert_eq!(trace_color_name(Color32::RED), "red");
        assert_eq!(
            trace_color_name(Color32::from_rgb(1, 2, 3)),
            Color32::from_rgb(1, 2, 3).to_hex()
        );
    }
}
