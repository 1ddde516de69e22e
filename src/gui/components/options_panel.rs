// src/gui/components/options_panel.rs
//
// Left panel: every run option. Writes straight into AppState;
// free-text fields are parsed later by App::apply_fields.

use std::time::Duration;

use eframe::egui::{self, DragValue, TextEdit};

use crate::config::{
    consts::RETRY_PAUSE_MS,
    options::{RetryPolicy, StrategyKind},
    state::AppState,
};
use crate::reference::EXTENSIONS;

pub fn draw(ui: &mut egui::Ui, state: &mut AppState) {
    reference_section(ui, state);
    ui.separator();
    source_section(ui, state);
    ui.separator();
    extraction_section(ui, state);
    ui.separator();
    matching_section(ui, state);
    ui.separator();
    export_section(ui, state);
}

/* ---------------- sections ---------------- */

fn reference_section(ui: &mut egui::Ui, state: &mut AppState) {
    ui.heading("Reference");
    ui.horizontal(|ui| {
        ui.add(TextEdit::singleline(&mut state.gui.reference_text).desired_width(220.0));
        if ui.button("Browse…").clicked() {
            if let Some(p) = rfd::FileDialog::new()
                .add_filter("Spreadsheet", EXTENSIONS)
                .pick_file()
            {
                state.gui.reference_text = p.to_string_lossy().into_owned();
                logf!("UI: reference → {}", state.gui.reference_text);
            }
        }
    });
}

fn source_section(ui: &mut egui::Ui, state: &mut AppState) {
    ui.heading("Source");
    let gui = &mut state.gui;
    ui.horizontal(|ui| {
        ui.radio_value(&mut gui.use_snapshots, false, "Browser (WebDriver)");
        ui.radio_value(&mut gui.use_snapshots, true, "Saved pages");
    });

    if gui.use_snapshots {
        ui.horizontal(|ui| {
            ui.add(TextEdit::singleline(&mut gui.snapshots_text).desired_width(220.0));
            if ui.button("Browse…").clicked() {
                if let Some(p) = rfd::FileDialog::new().pick_folder() {
                    gui.snapshots_text = p.to_string_lossy().into_owned();
                }
            }
        });
        return;
    }

    let d = &mut gui.driver;
    egui::Grid::new("driver_grid").num_columns(2).show(ui, |ui| {
        ui.label("Endpoint");
        ui.text_edit_singleline(&mut d.endpoint);
        ui.end_row();

        ui.label("Browser");
        egui::ComboBox::from_id_salt("browser")
            .selected_text(d.browser.as_str())
            .show_ui(ui, |ui| {
                for b in ["chrome", "firefox", "MicrosoftEdge"] {
                    ui.selectable_value(&mut d.browser, s!(b), b);
                }
            });
        ui.end_row();

        ui.label("Page URL");
        optional_text(ui, &mut d.url);
        ui.end_row();

        ui.label("Session id");
        optional_text(ui, &mut d.session);
        ui.end_row();
    });
    ui.checkbox(&mut d.headless, "Headless");
}

fn extraction_section(ui: &mut egui::Ui, state: &mut AppState) {
    ui.heading("Extraction");
    let ex = &mut state.options.extract;

    let mut kind = ex.strategy;
    ui.horizontal(|ui| {
        ui.label("Columns by:");
        ui.selectable_value(&mut kind, StrategyKind::Header, "Header text");
        ui.selectable_value(&mut kind, StrategyKind::Static, "Column class");
    });
    if kind != ex.strategy {
        ex.set_strategy(kind);
        logf!("UI: strategy → {:?}", kind);
    }

    egui::Grid::new("columns_grid").num_columns(2).show(ui, |ui| {
        ui.label("Name");
        ui.text_edit_singleline(&mut ex.columns.name);
        ui.end_row();
        ui.label("Identifier");
        ui.text_edit_singleline(&mut ex.columns.identifier);
        ui.end_row();
        ui.label("Assignee");
        ui.text_edit_singleline(&mut ex.columns.assignee);
        ui.end_row();
    });

    ui.label("Extra columns (label=column, one per line)");
    ui.add(TextEdit::multiline(&mut state.gui.extras_text).desired_rows(2));

    egui::Grid::new("paging_grid").num_columns(2).show(ui, |ui| {
        ui.label("Page size");
        ui.add(DragValue::new(&mut ex.page_size).range(1..=10_000));
        ui.end_row();
        ui.label("Page ceiling");
        ui.add(DragValue::new(&mut ex.page_ceiling).range(1..=100_000));
        ui.end_row();
        ui.label("Delay (ms)");
        ms_field(ui, &mut ex.delay);
        ui.end_row();
        ui.label("Jitter (ms)");
        ms_field(ui, &mut ex.jitter);
        ui.end_row();
        ui.label("Attempts per page");
        retry_field(ui, &mut ex.retry);
        ui.end_row();
    });
}

fn matching_section(ui: &mut egui::Ui, state: &mut AppState) {
    ui.heading("Matching");
    let m = &mut state.options.matching;

    ui.horizontal(|ui| {
        ui.label("Key delimiter");
        let mut d = m.key.delimiter.to_string();
        if ui.add(TextEdit::singleline(&mut d).desired_width(24.0)).changed() {
            if let Some(c) = d.chars().last() {
                m.key.delimiter = c;
            }
        }
    });
    ui.checkbox(&mut m.key.case_fold, "Ignore case in names");
    ui.horizontal(|ui| {
        ui.label("Unassigned label");
        ui.text_edit_singleline(&mut m.unassigned_label);
    });
}

fn export_section(ui: &mut egui::Ui, state: &mut AppState) {
    ui.heading("Export");
    ui.horizontal(|ui| {
        ui.label("Folder");
        ui.add(TextEdit::singleline(&mut state.gui.out_dir_text).desired_width(170.0));
        if ui.button("Browse…").clicked() {
            if let Some(p) = rfd::FileDialog::new().pick_folder() {
                state.gui.out_dir_text = p.to_string_lossy().into_owned();
            }
        }
    });
    let ex = &mut state.options.export;
    ui.horizontal(|ui| {
        ui.label("Prefix");
        ui.text_edit_singleline(&mut ex.prefix);
    });
    ui.checkbox(&mut ex.web_columns, "Append extra web columns");
}

/* ---------------- widgets ---------------- */

fn optional_text(ui: &mut egui::Ui, value: &mut Option<String>) {
    let mut text = value.clone().unwrap_or_default();
    if ui.text_edit_singleline(&mut text).changed() {
        let t = text.trim();
        *value = (!t.is_empty()).then(|| s!(t));
    }
}

fn ms_field(ui: &mut egui::Ui, value: &mut Duration) {
    let mut ms = value.as_millis() as u64;
    if ui.add(DragValue::new(&mut ms).range(0..=60_000)).changed() {
        *value = Duration::from_millis(ms);
    }
}

fn retry_field(ui: &mut egui::Ui, retry: &mut RetryPolicy) {
    let mut n = retry.attempts();
    if ui.add(DragValue::new(&mut n).range(1..=20)).changed() {
        *retry = if n <= 1 {
            RetryPolicy::Off
        } else {
            let pause = match retry.pause() {
                p if p.is_zero() => Duration::from_millis(RETRY_PAUSE_MS),
                p => p,
            };
            RetryPolicy::Fixed { attempts: n, pause }
        };
    }
}
