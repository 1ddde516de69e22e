// src/gui/components/notice.rs
use eframe::egui;

use crate::gui::app::App;

/// Modal-ish final notification. Stays up until OK.
pub fn draw(ctx: &egui::Context, app: &mut App) {
    let Some(msg) = app.notice.clone() else { return };

    let mut close = false;
    egui::Window::new("Run finished")
        .collapsible(false)
        .resizable(false)
        .anchor(egui::Align2::CENTER_CENTER, [0.0, 0.0])
        .show(ctx, |ui| {
            ui.label(msg);
            if ui.button("OK").clicked() {
                close = true;
            }
        });
    if close {
        app.notice = None;
    }
}
