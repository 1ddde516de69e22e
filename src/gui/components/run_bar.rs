// src/gui/components/run_bar.rs
use eframe::egui;

use crate::gui::app::App;

pub fn draw(ui: &mut egui::Ui, app: &mut App) {
    ui.horizontal(|ui| {
        let red = egui::Color32::from_rgb(220, 30, 30);
        let black = egui::Color32::BLACK;
        let button = egui::Button::new(egui::RichText::new("RUN").color(black).strong()).fill(red);

        if ui.add_enabled(!app.running, button).clicked() {
            app.start_run(ui.ctx());
        }
        if app.running {
            ui.spinner();
        }

        ui.label(format!("Status: {}", app.status_text()));
    });
}
