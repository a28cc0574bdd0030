use eframe::egui::{self, Color32, ColorImage, Stroke, TextureHandle, TextureOptions, Ui};
use egui_plot::{Line, Plot, PlotImage, PlotPoint, PlotPoints, Polygon};

use crate::color::SeismicColormap;
use crate::render::{Content, Raster, WigglePlot};
use crate::state::AppState;

// ---------------------------------------------------------------------------
// Raster texture cache
// ---------------------------------------------------------------------------

/// GPU copy of the image raster. Re-uploaded when a new render happened or
/// the colour limits moved; the raster values themselves never change.
#[derive(Default)]
pub struct RasterTexture {
    key: Option<(u64, u64)>,
    handle: Option<TextureHandle>,
}

impl RasterTexture {
    fn update(
        &mut self,
        ctx: &egui::Context,
        generation: u64,
        raster: &Raster,
        cmap: &SeismicColormap,
    ) -> Option<&TextureHandle> {
        let [w, h] = raster.size();
        if w == 0 || h == 0 {
            return None;
        }
        let key = (generation, raster.revision());
        if self.key != Some(key) || self.handle.is_none() {
            let rgba: Vec<u8> = raster
                .colors(cmap)
                .iter()
                .flat_map(|c| c.to_array())
                .collect();
            let image = ColorImage::from_rgba_unmultiplied([w, h], &rgba);
            if let Some(handle) = self.handle.as_mut() {
                handle.set(image, TextureOptions::NEAREST);
            } else {
                self.handle =
                    Some(ctx.load_texture("seismic_raster", image, TextureOptions::NEAREST));
            }
            self.key = Some(key);
            log::debug!("uploaded {w}x{h} raster texture (revision {})", key.1);
        }
        self.handle.as_ref()
    }
}

// ---------------------------------------------------------------------------
// Seismic plot (central panel)
// ---------------------------------------------------------------------------

/// Render the current session in the central panel.
pub fn seismic_plot(
    ui: &mut Ui,
    state: &AppState,
    texture: &mut RasterTexture,
    cmap: &SeismicColormap,
) {
    if state.dataset.is_none() {
        ui.centered_and_justified(|ui: &mut Ui| {
            ui.heading("No section loaded  (View → Regenerate section)");
        });
        return;
    }

    let session = &state.session;
    let axes = &session.axes;
    // egui_plot has no inverted axis: draw at -y and relabel the ticks.
    let flip = if axes.y_inverted { -1.0 } else { 1.0 };

    let mut plot = Plot::new("seismic_plot")
        .x_axis_label(axes.x_label.to_string())
        .y_axis_label(axes.y_label.to_string())
        // + 0.0 turns -0 into 0
        .y_axis_formatter(move |mark, _range| format!("{}", flip * mark.value + 0.0))
        .allow_boxed_zoom(true)
        .allow_drag(true)
        .allow_scroll(true)
        .allow_zoom(true);
    if let Some((lo, hi)) = axes.x_limits {
        plot = plot.include_x(lo).include_x(hi);
    }
    if let Some((lo, hi)) = axes.y_limits {
        plot = plot.include_y(flip * lo).include_y(flip * hi);
    }

    match &session.content {
        Content::Empty => {
            plot.show(ui, |_plot_ui| {});
        }
        Content::Wiggle(wiggle) => {
            plot.show(ui, |plot_ui| draw_wiggle(plot_ui, wiggle, flip));
        }
        Content::Image(image) => {
            let raster = &image.raster;
            let tex_id = texture
                .update(ui.ctx(), state.generation, raster, cmap)
                .map(|t| t.id());
            let (lo, hi) = raster.color_limits();
            ui.with_layout(egui::Layout::right_to_left(egui::Align::TOP), |ui: &mut Ui| {
                colorbar(ui, cmap, lo, hi);
                plot.show(ui, |plot_ui| {
                    if let (Some(id), Some((min, max))) = (tex_id, raster.extent()) {
                        let center = PlotPoint::new(
                            (min[0] + max[0]) / 2.0,
                            flip * (min[1] + max[1]) / 2.0,
                        );
                        let size = [(max[0] - min[0]) as f32, (max[1] - min[1]) as f32];
                        plot_ui.image(PlotImage::new(id, center, size));
                    }
                });
            });
        }
    }
}

fn draw_wiggle(plot_ui: &mut egui_plot::PlotUi, wiggle: &WigglePlot, flip: f64) {
    for trace in &wiggle.traces {
        for patch in &trace.fill {
            let points: PlotPoints = patch.points.iter().map(|p| [p[0], flip * p[1]]).collect();
            plot_ui.polygon(
                Polygon::new(points)
                    .fill_color(wiggle.color)
                    .stroke(Stroke::NONE),
            );
        }

        for segment in line_segments(&trace.offsets, &wiggle.y) {
            let points: PlotPoints = segment.iter().map(|p| [p[0], flip * p[1]]).collect();
            plot_ui.line(
                Line::new(points)
                    .name(format!("trace {}", trace.column))
                    .color(wiggle.color)
                    .width(wiggle.line_width),
            );
        }
    }
}

/// Split a trace into runs of drawable points; NaN samples end a run.
fn line_segments(offsets: &[f64], y: &[f64]) -> Vec<Vec<[f64; 2]>> {
    let mut segments = Vec::new();
    let mut current = Vec::new();
    for (&x, &y) in offsets.iter().zip(y) {
        if x.is_nan() || y.is_nan() {
            if !current.is_empty() {
                segments.push(std::mem::take(&mut current));
            }
        } else {
            current.push([x, y]);
        }
    }
    if !current.is_empty() {
        segments.push(current);
    }
    segments
}

/// Vertical gradient of the colour map with the current limits.
fn colorbar(ui: &mut Ui, cmap: &SeismicColormap, lo: f64, hi: f64) {
    ui.vertical(|ui: &mut Ui| {
        ui.label(format!("{hi:.3}"));
        let height = (ui.available_height() - 24.0).max(100.0);
        let (rect, _) = ui.allocate_exact_size(egui::vec2(20.0, height), egui::Sense::hover());

        let painter = ui.painter();
        let steps = 64;
        let step_height = rect.height() / steps as f32;
        for i in 0..steps {
            // max at the top
            let t = 1.0 - i as f32 / (steps - 1) as f32;
            let top = rect.top() + i as f32 * step_height;
            painter.rect_filled(
                egui::Rect::from_min_size(
                    egui::pos2(rect.left(), top),
                    egui::vec2(rect.width(), step_height + 1.0),
                ),
                0.0,
                cmap.color_at(t),
            );
        }
        painter.rect_stroke(
            rect,
            0.0,
            Stroke::new(1.0, Color32::GRAY),
            egui::StrokeKind::Inside,
        );

        ui.label(format!("{lo:.3}"));
    });
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn nan_breaks_the_trace_line() {
        let offsets = [0.0, 1.0, f64::NAN, 0.5, 0.0];
        let y = [0.0, 1.0, 2.0, 3.0, 4.0];
        assert_eq!(
            line_segments(&offsets, &y),
            vec![vec![[0.0, 0.0], [1.0, 1.0]], vec![[0.5, 3.0], [0.0, 4.0]]]
        );
    }

    #[test]
    fn finite_trace_is_one_line() {
        let segments = line_segments(&[0.0, 0.2, 0.0], &[0.0, 1.0, 2.0]);
        assert_eq!(segments.len(), 1);
        assert_eq!(segments[0].len(), 3);
    }
}
