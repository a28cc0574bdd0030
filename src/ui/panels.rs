use eframe::egui::{self, Color32, RichText, ScrollArea, Ui};

use crate::color::{trace_color_name, TRACE_COLORS};
use crate::render::FillMode;
use crate::state::{AppState, PlotKind};

// ---------------------------------------------------------------------------
// Left side panel – plot settings
// ---------------------------------------------------------------------------

/// Render the left settings panel.
pub fn side_panel(ui: &mut Ui, state: &mut AppState) {
    ui.heading("Section");
    ui.separator();

    ScrollArea::vertical()
        .auto_shrink([false, false])
        .show(ui, |ui: &mut Ui| {
            synthetic_section(ui, state);
            ui.separator();

            // ---- Plot kind ----
            ui.strong("Display");
            ui.horizontal(|ui: &mut Ui| {
                ui.radio_value(&mut state.settings.kind, PlotKind::Wiggle, "Wiggle");
                ui.radio_value(&mut state.settings.kind, PlotKind::Image, "Image");
            });
            ui.separator();

            // ---- Window ----
            ui.strong("Window");
            let settings = &mut state.settings;
            ui.label("Traces (start, end)");
            ui.text_edit_singleline(&mut settings.trace_range);
            ui.label("Time samples (start, end)");
            ui.text_edit_singleline(&mut settings.time_range);
            ui.checkbox(&mut settings.time_in_seconds, "Time window in seconds");
            ui.checkbox(&mut settings.x_from_offset, "X from offset header");
            ui.checkbox(&mut settings.t_from_dt, "Y in seconds");
            ui.add(egui::Slider::new(&mut settings.percentile, 0.0..=100.0).text("clip percentile"));
            ui.separator();

            let kind = settings.kind;
            match kind {
                PlotKind::Wiggle => wiggle_options(ui, state),
                PlotKind::Image => {
                    ui.strong("Image");
                    ui.horizontal(|ui: &mut Ui| {
                        ui.label("Gain");
                        ui.add(
                            egui::DragValue::new(&mut state.settings.image.gain)
                                .range(0.01..=100.0)
                                .speed(0.05),
                        );
                    });
                }
            }
            ui.separator();

            if ui.button("Apply").clicked() {
                state.apply();
            }
        });
}

fn synthetic_section(ui: &mut Ui, state: &mut AppState) {
    egui::CollapsingHeader::new(RichText::new("Synthetic shot gather").strong())
        .id_salt("synthetic")
        .default_open(false)
        .show(ui, |ui: &mut Ui| {
            let synth = &mut state.synth;
            egui::Grid::new("synth_grid").num_columns(2).show(ui, |ui: &mut Ui| {
                ui.label("Traces");
                ui.add(egui::DragValue::new(&mut synth.num_traces).range(1..=1000));
                ui.end_row();
                ui.label("Samples");
                ui.add(egui::DragValue::new(&mut synth.num_samples).range(1..=10_000));
                ui.end_row();
                ui.label("dt [s]");
                ui.add(
                    egui::DragValue::new(&mut synth.dt)
                        .range(0.0001..=0.1)
                        .speed(0.0001),
                );
                ui.end_row();
                ui.label("Receiver spacing [m]");
                ui.add(egui::DragValue::new(&mut synth.receiver_spacing).range(0.5..=500.0));
                ui.end_row();
                ui.label("Peak frequency [Hz]");
                ui.add(egui::DragValue::new(&mut synth.peak_frequency).range(1.0..=200.0));
                ui.end_row();
                ui.label("Noise");
                ui.add(
                    egui::DragValue::new(&mut synth.noise_level)
                        .range(0.0..=1.0)
                        .speed(0.005),
                );
                ui.end_row();
                ui.label("Seed");
                ui.add(egui::DragValue::new(&mut synth.seed));
                ui.end_row();
            });
            if ui.button("Regenerate").clicked() {
                state.regenerate();
            }
        });
}

fn wiggle_options(ui: &mut Ui, state: &mut AppState) {
    let wiggle = &mut state.settings.wiggle;
    ui.strong("Wiggle");
    egui::Grid::new("wiggle_grid").num_columns(2).show(ui, |ui: &mut Ui| {
        ui.label("Trace skip");
        ui.add(egui::DragValue::new(&mut wiggle.trace_skip).range(1..=100));
        ui.end_row();

        let mut capped = wiggle.max_traces.is_some();
        ui.checkbox(&mut capped, "Max traces");
        let mut max = wiggle.max_traces.unwrap_or(100);
        ui.add_enabled(capped, egui::DragValue::new(&mut max).range(1..=10_000));
        wiggle.max_traces = capped.then_some(max);
        ui.end_row();

        ui.label("Line width");
        ui.add(egui::DragValue::new(&mut wiggle.line_width).range(0.1..=5.0).speed(0.05));
        ui.end_row();

        ui.label("Gain");
        ui.add(egui::DragValue::new(&mut wiggle.gain).range(0.0..=100.0).speed(0.05));
        ui.end_row();

        ui.label("Fill");
        ui.horizontal(|ui: &mut Ui| {
            ui.radio_value(&mut wiggle.fill, FillMode::VariableArea, "Variable area");
            ui.radio_value(&mut wiggle.fill, FillMode::None, "None");
        });
        ui.end_row();

        ui.label("Color");
        egui::ComboBox::from_id_salt("trace_color")
            .selected_text(trace_color_name(wiggle.color))
            .show_ui(ui, |ui: &mut Ui| {
                for (name, color) in TRACE_COLORS {
                    ui.selectable_value(&mut wiggle.color, color, RichText::new(name).color(color));
                }
            });
        ui.end_row();
    });
}

// ---------------------------------------------------------------------------
// Bottom panel – interactive clip and gain
// ---------------------------------------------------------------------------

/// Sliders bound to the image session's display state. Only the colour
/// limits change; the raster values stay as rendered.
pub fn display_controls(ui: &mut Ui, state: &mut AppState) {
    let Some(image) = state.session.image_session_mut() else {
        return;
    };

    let max_clip = image.display.max_clip;
    let mut value = max_clip.value;
    if ui
        .add(egui::Slider::new(&mut value, max_clip.min..=max_clip.max).text("max clip"))
        .changed()
    {
        image.set_max_clip(value);
    }

    let min_clip = image.display.min_clip;
    let mut value = min_clip.value;
    if ui
        .add(egui::Slider::new(&mut value, min_clip.min..=min_clip.max).text("min clip"))
        .changed()
    {
        image.set_min_clip(value);
    }

    let gain = image.display.gain;
    let mut value = gain.value;
    if ui
        .add(egui::Slider::new(&mut value, gain.min..=gain.max).text("gain"))
        .changed()
    {
        image.set_gain(value);
    }

    let (lo, hi) = image.raster.color_limits();
    ui.label(format!("color limits: [{lo:.4}, {hi:.4}]"));
}

// ---------------------------------------------------------------------------
// Top bar
// ---------------------------------------------------------------------------

/// Render the top menu / toolbar.
pub fn top_bar(ui: &mut Ui, state: &mut AppState) {
    egui::menu::bar(ui, |ui: &mut Ui| {
        ui.menu_button("View", |ui: &mut Ui| {
            if ui.button("Trace headers…").clicked() {
                state.show_headers = true;
                ui.close_menu();
            }
            if ui.button("Regenerate section").clicked() {
                state.regenerate();
                ui.close_menu();
            }
        });

        ui.separator();

        if let Some(ds) = &state.dataset {
            ui.label(ds.summary().to_string());
        }

        for warning in &state.session.warnings {
            ui.separator();
            ui.label(RichText::new(warning.to_string()).color(Color32::YELLOW));
        }

        if let Some(msg) = &state.status_message {
            ui.separator();
            ui.label(RichText::new(msg).color(Color32::RED));
        }
    });
}
