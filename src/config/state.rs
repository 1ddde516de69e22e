// src/config/state.rs
use super::options::{DriverOptions, RunOptions};

/// Everything the GUI edits, in one place.
#[derive(Clone, Debug, Default)]
pub struct AppState {
    pub options: RunOptions,
    pub gui: GuiState,
}

/// Text-field mirrors of options that need parsing before they apply.
#[derive(Clone, Debug, Default)]
pub struct GuiState {
    pub reference_text: String,
    pub snapshots_text: String,
    pub out_dir_text: String,
    /// One `label=column` per line.
    pub extras_text: String,
    pub use_snapshots: bool,
    /// Kept while snapshots are selected so toggling back doesn't lose edits.
    pub driver: DriverOptions,
}

impl AppState {
    pub fn new() -> Self {
        let options = RunOptions::default();
        let gui = GuiState {
            out_dir_text: options.export.out_dir.to_string_lossy().into_owned(),
            ..GuiState::default()
        };
        Self { options, gui }
    }
}
