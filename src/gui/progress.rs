// src/gui/progress.rs
use std::sync::{Arc, Mutex};

use eframe::egui;

use crate::progress::Progress;

const LOG_TAIL: usize = 200;

/// Writes run progress into the shared status line and log tail, and wakes the UI.
pub struct GuiProgress {
    status: Arc<Mutex<String>>,
    lines: Arc<Mutex<Vec<String>>>,
    ctx: egui::Context,
    done: usize,
    total: usize,
}

impl GuiProgress {
    pub fn new(status: Arc<Mutex<String>>, lines: Arc<Mutex<Vec<String>>>, ctx: egui::Context) -> Self {
        Self { status, lines, ctx, done: 0, total: 0 }
    }
    fn set_status(&self, msg: impl Into<String>) {
        let text = msg.into();
        if let Ok(mut lines) = self.lines.lock() {
            lines.push(text.clone());
            if lines.len() > LOG_TAIL {
                let extra = lines.len() - LOG_TAIL;
                lines.drain(..extra);
            }
        }
        if let Ok(mut s) = self.status.lock() {
            *s = text;
        }
        self.ctx.request_repaint();
    }
}

impl Progress for GuiProgress {
    fn begin(&mut self, total: usize) {
        self.total = total;
        self.set_status(format!("Reading {total} page(s)…"));
    }
    fn log(&mut self, msg: &str) {
        self.set_status(s!(msg));
    }
    fn page_done(&mut self, page: usize, rows: usize) {
        self.done += 1;
        self.set_status(format!("Page {page}/{}: {rows} row(s)", self.total));
    }
    fn finish(&mut self) {
        logd!("GUI: progress finished after {}/{} page(s)", self.done, self.total);
        self.ctx.request_repaint();
    }
}
