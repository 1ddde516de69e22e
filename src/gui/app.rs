// src/gui/app.rs
use std::{
    error::Error,
    sync::{mpsc, Arc, Mutex},
    thread,
};

use eframe::egui;

use crate::{
    cli::parse_extra,
    config::{options::SourceOptions, state::AppState},
    file,
    runner::{self, RunReport},
};

use super::{components, progress::GuiProgress};

pub fn run(options: eframe::NativeOptions) -> Result<(), Box<dyn Error>> {
    eframe::run_native(
        "Table Match",
        options,
        Box::new(|_cc| Ok(Box::new(App::new(AppState::new())))),
    )?;
    Ok(())
}

pub struct App {
    // single source of truth (UI thread only)
    pub state: AppState,

    // status/progress (worker writes here)
    pub status: Arc<Mutex<String>>,
    pub log_tail: Arc<Mutex<Vec<String>>>,
    pub running: bool,
    rx: Option<mpsc::Receiver<RunReport>>,

    // last finished run; `notice` is the pop-up until dismissed
    pub last: Option<RunReport>,
    pub notice: Option<String>,
}

impl App {
    pub fn new(state: AppState) -> Self {
        logf!("Init: out_dir={}", state.options.export.out_dir.display());
        Self {
            state,
            status: Arc::new(Mutex::new(s!("Idle"))),
            log_tail: Arc::new(Mutex::new(Vec::new())),
            running: false,
            rx: None,
            last: None,
            notice: None,
        }
    }

    pub fn status<T: Into<String>>(&self, msg: T) {
        if let Ok(mut s) = self.status.lock() {
            *s = msg.into();
        }
    }

    pub fn status_text(&self) -> String {
        self.status.lock().map(|s| s.clone()).unwrap_or_default()
    }

    pub fn log_lines(&self) -> Vec<String> {
        self.log_tail.lock().map(|l| l.clone()).unwrap_or_default()
    }

    /// Push text fields into `state.options`.
    pub fn apply_fields(&mut self) -> Result<(), String> {
        let gui = &self.state.gui;
        let opts = &mut self.state.options;

        let reference = gui.reference_text.trim();
        if reference.is_empty() {
            return Err(s!("Pick a reference spreadsheet first"));
        }
        opts.reference = reference.into();

        opts.source = if gui.use_snapshots {
            let dir = gui.snapshots_text.trim();
            if dir.is_empty() {
                return Err(s!("Pick a snapshot folder first"));
            }
            SourceOptions::Snapshots { dir: file::normalize_dir_path(dir) }
        } else {
            SourceOptions::WebDriver(gui.driver.clone())
        };

        let mut extras = Vec::new();
        for line in gui.extras_text.lines().filter(|l| !l.trim().is_empty()) {
            extras.push(parse_extra(line).map_err(|e| e.to_string())?);
        }
        opts.extract.columns.extras = extras;

        if !gui.out_dir_text.trim().is_empty() {
            opts.export.out_dir = file::normalize_dir_path(&gui.out_dir_text);
        }
        Ok(())
    }

    /// Start a run on a worker thread. The UI keeps painting meanwhile.
    pub fn start_run(&mut self, ctx: &egui::Context) {
        if self.running { return; }
        if let Err(msg) = self.apply_fields() {
            self.status(msg);
            return;
        }

        let opts = self.state.options.clone();
        let status = self.status.clone();
        let lines = self.log_tail.clone();
        if let Ok(mut l) = lines.lock() {
            l.clear();
        }
        let ctx = ctx.clone();
        let (tx, rx) = mpsc::channel();

        logf!("GUI: run start reference={}", opts.reference.display());
        self.status("Starting…");
        self.running = true;
        self.rx = Some(rx);

        thread::spawn(move || {
            let mut prog = GuiProgress::new(status, lines, ctx.clone());
            let report = runner::run(&opts, Some(&mut prog));
            let _ = tx.send(report);
            ctx.request_repaint();
        });
    }

    fn poll_run(&mut self) {
        let Some(rx) = &self.rx else { return };
        match rx.try_recv() {
            Ok(report) => {
                let msg = report.status.message();
                logf!("GUI: run done: {msg}");
                self.status(msg.clone());
                self.notice = Some(msg);
                self.last = Some(report);
                self.running = false;
                self.rx = None;
            }
            Err(mpsc::TryRecvError::Empty) => {}
            Err(mpsc::TryRecvError::Disconnected) => {
                loge!("GUI: worker ended without a report");
                self.status("Run aborted");
                self.running = false;
                self.rx = None;
            }
        }
    }
}

impl eframe::App for App {
    fn update(&mut self, ctx: &egui::Context, _frame: &mut eframe::Frame) {
        self.poll_run();

        egui::SidePanel::left("options")
            .resizable(true)
            .default_width(320.0)
            .show(ctx, |ui| {
                egui::ScrollArea::vertical().show(ui, |ui| {
                    ui.add_enabled_ui(!self.running, |ui| {
                        components::options_panel::draw(ui, &mut self.state);
                    });
                });
            });

        egui::CentralPanel::default().show(ctx, |ui| {
            components::run_bar::draw(ui, self);
            ui.separator();
            components::report_view::draw(ui, self);
        });

        components::notice::draw(ctx, self);
    }
}
