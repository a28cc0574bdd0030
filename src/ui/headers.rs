use eframe::egui::{self, Ui};
use egui_extras::{Column, TableBuilder};

use crate::state::AppState;

// ---------------------------------------------------------------------------
// Trace header window
// ---------------------------------------------------------------------------

/// Floating window listing the trace header table, one row per trace.
pub fn header_window(ctx: &egui::Context, state: &mut AppState) {
    let Some(dataset) = &state.dataset else {
        return;
    };
    let headers = dataset.headers();

    egui::Window::new("Trace headers")
        .open(&mut state.show_headers)
        .default_size([420.0, 360.0])
        .resizable(true)
        .show(ctx, |ui: &mut Ui| {
            if headers.columns.is_empty() {
                ui.label("No header attributes.");
                return;
            }
            TableBuilder::new(ui)
                .striped(true)
                .columns(Column::auto().at_least(60.0), headers.columns.len())
                .header(20.0, |mut header| {
                    for name in &headers.columns {
                        header.col(|ui: &mut Ui| {
                            ui.strong(name);
                        });
                    }
                })
                .body(|body| {
                    body.rows(18.0, headers.len(), |mut row| {
                        let trace = row.index();
                        for name in &headers.columns {
                            row.col(|ui: &mut Ui| {
                                ui.label(headers.value(trace, name).to_string());
                            });
                        }
                    });
                });
        });
}
