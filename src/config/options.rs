// src/config/options.rs
use std::path::PathBuf;
use std::time::Duration;

use chrono::NaiveDate;

use super::consts::*;
use crate::core::KeyPolicy;

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct RunOptions {
    pub reference: PathBuf,
    pub source: SourceOptions,
    pub extract: ExtractOptions,
    pub matching: MatchOptions,
    pub export: ExportOptions,
}

impl Default for RunOptions {
    fn default() -> Self {
        Self {
            reference: PathBuf::new(),
            source: SourceOptions::WebDriver(DriverOptions::default()),
            extract: ExtractOptions::default(),
            matching: MatchOptions::default(),
            export: ExportOptions::default(),
        }
    }
}

/* ---------------- Source ---------------- */

#[derive(Clone, Debug, PartialEq, Eq)]
pub enum SourceOptions {
    /// Live browser through a WebDriver server (chromedriver, geckodriver).
    WebDriver(DriverOptions),
    /// Saved HTML pages, read in file-name order; "next" advances one file.
    Snapshots { dir: PathBuf },
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct DriverOptions {
    pub endpoint: String,
    pub browser: String,
    /// Page to open after the session starts. `None` keeps whatever is loaded.
    pub url: Option<String>,
    /// Attach to an existing session instead of creating one.
    pub session: Option<String>,
    pub headless: bool,
    pub ready_timeout: Duration,
}

impl Default for DriverOptions {
    fn default() -> Self {
        Self {
            endpoint: s!(DEFAULT_WEBDRIVER),
            browser: s!(DEFAULT_BROWSER),
            url: None,
            session: None,
            headless: false,
            ready_timeout: Duration::from_millis(DRIVER_READY_TIMEOUT_MS),
        }
    }
}

/* ---------------- Extraction ---------------- */

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum StrategyKind {
    /// Field → fixed column class.
    Static,
    /// Field → header text, resolved to a column class per page.
    Header,
}

/// Where each field lives. For `Static` the locators are column classes,
/// for `Header` they are header captions.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct ColumnMap {
    pub name: String,
    pub identifier: String,
    pub assignee: String,
    /// Optional business columns: (output label, locator).
    pub extras: Vec<(String, String)>,
}

impl ColumnMap {
    pub fn default_for(kind: StrategyKind) -> Self {
        match kind {
            StrategyKind::Static => Self {
                name: s!(NAME_COLUMN),
                identifier: s!(ID_COLUMN),
                assignee: s!(ASSIGNEE_COLUMN),
                extras: Vec::new(),
            },
            StrategyKind::Header => Self {
                name: s!(NAME_HEADER),
                identifier: s!(ID_HEADER),
                assignee: s!(ASSIGNEE_HEADER),
                extras: Vec::new(),
            },
        }
    }
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Selectors {
    pub rows: String,
    pub header_cells: String,
    /// Tried in order; first one with a number wins.
    pub totals: Vec<String>,
    pub next: String,
    /// Cell selector inside a row; `{column}` is replaced by the column class.
    pub cell_template: String,
    pub column_class_prefix: String,
    pub column_class_marker: String,
}

impl Default for Selectors {
    fn default() -> Self {
        Self {
            rows: s!(ROW_SELECTOR),
            header_cells: s!(HEADER_CELL_SELECTOR),
            totals: TOTAL_SELECTORS.iter().map(|s| s!(*s)).collect(),
            next: s!(NEXT_SELECTOR),
            cell_template: s!(CELL_TEMPLATE),
            column_class_prefix: s!(COLUMN_CLASS_PREFIX),
            column_class_marker: s!(COLUMN_CLASS_MARKER),
        }
    }
}

impl Selectors {
    pub fn cell(&self, column: &str) -> String {
        self.cell_template.replace("{column}", column)
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum RetryPolicy {
    /// One attempt per page; a failed page is skipped.
    Off,
    /// Up to `attempts` tries per page with `pause` in between.
    Fixed { attempts: u32, pause: Duration },
}

impl RetryPolicy {
    pub fn attempts(&self) -> u32 {
        match self {
            RetryPolicy::Off => 1,
            RetryPolicy::Fixed { attempts, .. } => (*attempts).max(1),
        }
    }
    pub fn pause(&self) -> Duration {
        match self {
            RetryPolicy::Off => Duration::ZERO,
            RetryPolicy::Fixed { pause, .. } => *pause,
        }
    }
}

/// What to assume when the total-count element can't be read.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum TotalFallback { NoPages, OnePage }

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct ExtractOptions {
    pub strategy: StrategyKind,
    pub columns: ColumnMap,
    pub selectors: Selectors,
    pub page_size: usize,
    pub page_ceiling: usize,
    pub delay: Duration,
    pub jitter: Duration,
    pub row_timeout: Duration,
    pub row_poll: Duration,
    pub retry: RetryPolicy,
    pub total_fallback: TotalFallback,
}

impl Default for ExtractOptions {
    fn default() -> Self {
        Self {
            strategy: StrategyKind::Header,
            columns: ColumnMap::default_for(StrategyKind::Header),
            selectors: Selectors::default(),
            page_size: PAGE_SIZE,
            page_ceiling: PAGE_CEILING,
            delay: Duration::from_millis(PAGE_DELAY_MS),
            jitter: Duration::from_millis(PAGE_JITTER_MS),
            row_timeout: Duration::from_millis(ROW_WAIT_TIMEOUT_MS),
            row_poll: Duration::from_millis(ROW_POLL_MS),
            retry: RetryPolicy::Fixed {
                attempts: MAX_RETRIES,
                pause: Duration::from_millis(RETRY_PAUSE_MS),
            },
            total_fallback: TotalFallback::OnePage,
        }
    }
}

impl ExtractOptions {
    /// Switch strategy; column map follows unless the user already changed it.
    pub fn set_strategy(&mut self, kind: StrategyKind) {
        if self.strategy == kind { return; }
        if self.columns == ColumnMap::default_for(self.strategy) {
            self.columns = ColumnMap::default_for(kind);
        }
        self.strategy = kind;
    }

    /// Zero-wait settings, handy for offline snapshots.
    pub fn without_delays(mut self) -> Self {
        self.delay = Duration::ZERO;
        self.jitter = Duration::ZERO;
        self.row_poll = Duration::ZERO;
        self.row_timeout = Duration::ZERO;
        if let RetryPolicy::Fixed { attempts, .. } = self.retry {
            self.retry = RetryPolicy::Fixed { attempts, pause: Duration::ZERO };
        }
        self
    }
}

/* ---------------- Matching ---------------- */

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct MatchOptions {
    pub key: KeyPolicy,
    pub unassigned_label: String,
}

impl Default for MatchOptions {
    fn default() -> Self {
        Self { key: KeyPolicy::default(), unassigned_label: s!(UNASSIGNED_LABEL) }
    }
}

/* ---------------- Export ---------------- */

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct ExportOptions {
    pub out_dir: PathBuf,
    pub prefix: String,
    /// Append the scraped extra columns after the spreadsheet columns.
    pub web_columns: bool,
}

impl Default for ExportOptions {
    fn default() -> Self {
        Self {
            out_dir: PathBuf::from(DEFAULT_OUT_DIR),
            prefix: s!(ZIP_PREFIX),
            web_columns: false,
        }
    }
}

impl ExportOptions {
    /// "<prefix>_<YYYY-MM-DD>.zip"
    pub fn archive_name(&self, date: NaiveDate) -> String {
        format!("{}_{}.zip", self.prefix, date.format("%Y-%m-%d"))
    }
}
