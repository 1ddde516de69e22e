// src/gui/components/report_view.rs
//
// Log tail of the current run, then the last run's summary and one
// table row per archive entry.

use eframe::egui;
use egui_extras::{Column, TableBuilder};

use crate::gui::app::App;

pub fn draw(ui: &mut egui::Ui, app: &mut App) {
    log_tail(ui, app);

    let Some(report) = &app.last else {
        ui.label("No run yet.");
        return;
    };

    for line in report.summary_lines() {
        ui.label(line);
    }
    if !report.skipped_pages.is_empty() {
        let pages: Vec<String> = report.skipped_pages.iter().map(|p| p.to_string()).collect();
        ui.colored_label(ui.visuals().warn_fg_color, format!("Skipped pages: {}", pages.join(", ")));
    }
    if report.entries.is_empty() {
        return;
    }

    ui.separator();
    TableBuilder::new(ui)
        .striped(true)
        .column(Column::remainder().at_least(200.0).clip(true))
        .column(Column::auto().at_least(60.0))
        .header(22.0, |mut header| {
            header.col(|ui| { ui.strong("File"); });
            header.col(|ui| { ui.strong("Rows"); });
        })
        .body(|mut body| {
            for entry in &report.entries {
                body.row(18.0, |mut row| {
                    row.col(|ui| { ui.label(&entry.name); });
                    row.col(|ui| { ui.label(entry.rows.to_string()); });
                });
            }
        });
}

fn log_tail(ui: &mut egui::Ui, app: &App) {
    let lines = app.log_lines();
    egui::CollapsingHeader::new(format!("Log ({})", lines.len()))
        .default_open(app.running)
        .show(ui, |ui| {
            egui::ScrollArea::vertical()
                .id_salt("log_tail")
                .max_height(140.0)
                .stick_to_bottom(true)
                .show(ui, |ui| {
                    for line in &lines {
                        ui.monospace(line);
                    }
                });
        });
    ui.separator();
}
