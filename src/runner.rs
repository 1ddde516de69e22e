// src/runner.rs
//
// One run: source → reference → extract → match → archive.
// Every run ends with exactly one RunStatus; errors never escape `run`.

use std::path::PathBuf;
use std::time::{Duration, Instant};

use chrono::{Local, NaiveDate};

use crate::{
    archive::{self, ArchiveEntry},
    config::options::{RunOptions, SourceOptions},
    dom::{SnapshotDom, TableDom, WebDriverDom},
    error::RunError,
    extract::{self, strategy},
    matcher::{self, MatchSummary},
    progress::Progress,
    reference::{self, ReferenceTable},
};

#[derive(Clone, Debug, PartialEq, Eq)]
pub enum RunStatus {
    Success { archive: PathBuf, groups: usize, rows: usize },
    NoData,
    Failed(String),
}

impl RunStatus {
    /// Final notification text.
    pub fn message(&self) -> String {
        match self {
            RunStatus::Success { archive, groups, rows } => format!(
                "Archive saved: {} ({groups} file(s), {rows} row(s))", archive.display()
            ),
            RunStatus::NoData => s!("No matching data found"),
            RunStatus::Failed(msg) => format!("Run failed: {msg}"),
        }
    }

    pub fn is_success(&self) -> bool { matches!(self, RunStatus::Success { .. }) }
}

#[derive(Clone, Debug)]
pub struct RunReport {
    pub status: RunStatus,
    pub total_pages: usize,
    pub pages_read: usize,
    pub skipped_pages: Vec<usize>,
    pub dropped_rows: usize,
    pub records: usize,
    pub summary: Option<MatchSummary>,
    pub entries: Vec<ArchiveEntry>,
    pub elapsed: Duration,
}

impl RunReport {
    fn new(status: RunStatus) -> Self {
        Self {
            status,
            total_pages: 0,
            pages_read: 0,
            skipped_pages: Vec::new(),
            dropped_rows: 0,
            records: 0,
            summary: None,
            entries: Vec::new(),
            elapsed: Duration::ZERO,
        }
    }

    /// Human summary: counts, match rate, files, time taken.
    pub fn summary_lines(&self) -> Vec<String> {
        let mut out = vec![format!(
            "Pages: {}/{} read, {} skipped",
            self.pages_read, self.total_pages, self.skipped_pages.len()
        )];
        out.push(format!("Records: {} ({} without name/id dropped)", self.records, self.dropped_rows));
        if let Some(s) = &self.summary {
            out.push(format!(
                "Matched: {} ({:.1}%), unmatched: {}, duplicates: {}",
                s.matched, s.match_rate(), s.unmatched, s.duplicates
            ));
            out.push(format!("Reference rows not found on the page: {}", s.unclaimed.len()));
        }
        if !self.entries.is_empty() {
            out.push(format!("Files: {}", self.entries.len()));
        }
        out.push(format!("Elapsed: {:.1}s", self.elapsed.as_secs_f64()));
        out
    }
}

/// Open the configured table source. Failing here is a dependency error.
pub fn open_source(source: &SourceOptions) -> Result<Box<dyn TableDom>, RunError> {
    match source {
        SourceOptions::WebDriver(opts) => Ok(Box::new(WebDriverDom::connect(opts)?)),
        SourceOptions::Snapshots { dir } => {
            let dom = SnapshotDom::open_dir(dir)
                .map_err(|e| RunError::DependencyLoad(e.to_string()))?;
            Ok(Box::new(dom))
        }
    }
}

/// Top-level entry for GUI and CLI.
pub fn run(opts: &RunOptions, mut progress: Option<&mut (dyn Progress + '_)>) -> RunReport {
    let started = Instant::now();
    logf!("Run: begin reference={} source={:?}", opts.reference.display(), opts.source);

    say(&mut progress, "Connecting to the table source…");
    let mut dom = match open_source(&opts.source) {
        Ok(d) => d,
        Err(e) => return failed(e, started, progress),
    };

    say(&mut progress, "Loading reference spreadsheet…");
    let table = match reference::load_path(&opts.reference, &opts.matching.key) {
        Ok(t) => t,
        Err(e) => return failed(e, started, progress),
    };
    say(&mut progress, &format!("Reference loaded: {} row(s)", table.len()));

    let mut report = run_with(dom.as_mut(), &table, opts, progress, Local::now().date_naive());
    report.elapsed = started.elapsed();
    report
}

/// Stages 2–4 against an already opened source and loaded reference.
pub fn run_with(
    dom: &mut dyn TableDom,
    table: &ReferenceTable,
    opts: &RunOptions,
    mut progress: Option<&mut (dyn Progress + '_)>,
    date: NaiveDate,
) -> RunReport {
    let started = Instant::now();
    let mut report = RunReport::new(RunStatus::NoData);

    let status = match pipeline(dom, table, opts, progress.as_deref_mut(), date, &mut report) {
        Ok(status) => status,
        Err(e) => {
            loge!("Run: failed: {e}");
            RunStatus::Failed(e.to_string())
        }
    };
    report.status = status;
    report.elapsed = started.elapsed();
    finish(&report, progress);
    report
}

fn pipeline(
    dom: &mut dyn TableDom,
    table: &ReferenceTable,
    opts: &RunOptions,
    mut progress: Option<&mut (dyn Progress + '_)>,
    date: NaiveDate,
    report: &mut RunReport,
) -> Result<RunStatus, RunError> {
    let mut rows = strategy::for_options(&opts.extract);

    say(&mut progress, "Reading table pages…");
    let extraction = extract::extract_all(dom, rows.as_mut(), &opts.extract, progress.as_deref_mut())?;
    report.total_pages = extraction.total_pages;
    report.pages_read = extraction.pages_read;
    report.skipped_pages = extraction.skipped_pages.clone();
    report.dropped_rows = extraction.dropped_rows;
    report.records = extraction.records.len();

    if extraction.records.is_empty() {
        logf!("Run: no records extracted, nothing to export");
        return Ok(RunStatus::NoData);
    }

    say(&mut progress, &format!("Matching {} record(s)…", extraction.records.len()));
    let outcome = matcher::match_records(extraction.records, table, &opts.matching);
    report.summary = Some(outcome.summary.clone());

    if outcome.groups.is_empty() {
        logf!("Run: no record matched the reference, nothing to export");
        return Ok(RunStatus::NoData);
    }

    say(&mut progress, &format!("Writing {} file(s)…", outcome.groups.len()));
    let extra_labels: Vec<String> = opts.extract.columns.extras.iter().map(|(l, _)| l.clone()).collect();
    let result = archive::export(&outcome.groups, table.headers(), &extra_labels, &opts.export, date)?;
    report.entries = result.entries;

    Ok(RunStatus::Success {
        archive: result.path,
        groups: outcome.groups.len(),
        rows: outcome.groups.row_count(),
    })
}

/* ---------------- helpers ---------------- */

fn say(progress: &mut Option<&mut (dyn Progress + '_)>, msg: &str) {
    if let Some(p) = progress.as_deref_mut() {
        p.log(msg);
    }
}

fn failed(e: RunError, started: Instant, progress: Option<&mut (dyn Progress + '_)>) -> RunReport {
    loge!("Run: aborted: {e}");
    let mut report = RunReport::new(RunStatus::Failed(e.to_string()));
    report.elapsed = started.elapsed();
    finish(&report, progress);
    report
}

fn finish(report: &RunReport, progress: Option<&mut (dyn Progress + '_)>) {
    logf!("Run: {}", report.status.message());
    for line in report.summary_lines() {
        logf!("Run: {line}");
    }
    if let Some(p) = progress {
        p.log(&report.status.message());
        p.finish();
    }
}
