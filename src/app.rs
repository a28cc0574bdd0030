use eframe::egui;

use crate::color::SeismicColormap;
use crate::state::AppState;
use crate::ui::{headers, panels, plot};

// ---------------------------------------------------------------------------
// eframe App implementation
// ---------------------------------------------------------------------------

pub struct RustySeisApp {
    pub state: AppState,
    pub raster_texture: plot::RasterTexture,
    pub colormap: SeismicColormap,
}

impl Default for RustySeisApp {
    fn default() -> Self {
        let mut state = AppState::default();
        state.regenerate();
        Self {
            state,
            raster_texture: plot::RasterTexture::default(),
            colormap: SeismicColormap::default(),
        }
    }
}

impl eframe::App for RustySeisApp {
    fn update(&mut self, ctx: &egui::Context, _frame: &mut eframe::Frame) {
        // ---- Top panel: menu bar ----
        egui::TopBottomPanel::top("top_bar").show(ctx, |ui| {
            panels::top_bar(ui, &mut self.state);
        });

        // ---- Left side panel: plot settings ----
        egui::SidePanel::left("settings_panel")
            .default_width(240.0)
            .resizable(true)
            .show(ctx, |ui| {
                panels::side_panel(ui, &mut self.state);
            });

        // ---- Image controls ----
        if self.state.session.image_session().is_some() {
            egui::TopBottomPanel::bottom("display_controls").show(ctx, |ui| {
                panels::display_controls(ui, &mut self.state);
            });
        }

        // ---- Header table window ----
        headers::header_window(ctx, &mut self.state);

        // ---- Central panel: plot ----
        egui::CentralPanel::default().show(ctx, |ui| {
            plot::seismic_plot(ui, &self.state, &mut self.raster_texture, &self.colormap);
        });
    }
}
