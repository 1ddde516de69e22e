// src/cli.rs
use std::{env, error::Error, path::PathBuf, time::Duration};

use crate::{
    config::options::{DriverOptions, RetryPolicy, RunOptions, SourceOptions, StrategyKind},
    progress::Progress,
    runner::{self, RunStatus},
};

pub enum Command {
    Run(RunOptions),
    Help,
}

pub fn help() -> &'static str { include_str!("cli_help.txt") }

pub fn run() -> Result<RunStatus, Box<dyn Error>> {
    let opts = match parse_args(env::args().skip(1))? {
        Command::Help => {
            eprintln!("{}", help());
            return Ok(RunStatus::NoData);
        }
        Command::Run(opts) => opts,
    };

    let mut prog = CliProgress::default();
    let report = runner::run(&opts, Some(&mut prog));

    for line in report.summary_lines() {
        eprintln!("{line}");
    }
    println!("{}", report.status.message());
    Ok(report.status)
}

pub fn parse_args<I>(args: I) -> Result<Command, Box<dyn Error>>
where
    I: IntoIterator<Item = String>,
{
    let mut opts = RunOptions::default();
    let mut driver = DriverOptions::default();
    let mut snapshots: Option<PathBuf> = None;
    let mut reference: Option<PathBuf> = None;

    // column overrides apply after the strategy is known
    let (mut name, mut id, mut assignee) = (None, None, None);
    let mut extras: Vec<(String, String)> = Vec::new();

    let mut args = args.into_iter();
    while let Some(a) = args.next() {
        let mut value = |flag: &str| args.next().ok_or_else(|| format!("Missing value for {flag}"));
        match a.as_str() {
            "-r" | "--reference" => reference = Some(PathBuf::from(value(&a)?)),

            "--webdriver" => driver.endpoint = value(&a)?,
            "--browser" => driver.browser = value(&a)?,
            "--url" => driver.url = Some(value(&a)?),
            "--session" => driver.session = Some(value(&a)?),
            "--headless" => driver.headless = true,
            "--snapshots" => snapshots = Some(PathBuf::from(value(&a)?)),

            "--strategy" => {
                let v = value(&a)?;
                let kind = match v.to_ascii_lowercase().as_str() {
                    "static" => StrategyKind::Static,
                    "header" => StrategyKind::Header,
                    other => return Err(format!("Unknown strategy: {other}").into()),
                };
                opts.extract.set_strategy(kind);
            }
            "--name" => name = Some(value(&a)?),
            "--id" => id = Some(value(&a)?),
            "--assignee" => assignee = Some(value(&a)?),
            "--extra" => extras.push(parse_extra(&value(&a)?)?),
            "--page-size" => opts.extract.page_size = parse_positive(&a, &value(&a)?)?,
            "--ceiling" => opts.extract.page_ceiling = parse_positive(&a, &value(&a)?)?,
            "--delay" => opts.extract.delay = Duration::from_millis(value(&a)?.parse()?),
            "--jitter" => opts.extract.jitter = Duration::from_millis(value(&a)?.parse()?),
            "--retries" => {
                let attempts: u32 = value(&a)?.parse()?;
                opts.extract.retry = match (attempts, opts.extract.retry) {
                    (0 | 1, _) => RetryPolicy::Off,
                    (n, RetryPolicy::Fixed { pause, .. }) => RetryPolicy::Fixed { attempts: n, pause },
                    (n, RetryPolicy::Off) => RetryPolicy::Fixed {
                        attempts: n,
                        pause: Duration::from_millis(crate::config::consts::RETRY_PAUSE_MS),
                    },
                };
            }
            "--no-retry" => opts.extract.retry = RetryPolicy::Off,

            "--delimiter" => {
                let v = value(&a)?;
                let mut chars = v.chars();
                match (chars.next(), chars.next()) {
                    (Some(c), None) => opts.matching.key.delimiter = c,
                    _ => return Err(format!("Delimiter must be one character: {v:?}").into()),
                }
            }
            "--no-case-fold" => opts.matching.key.case_fold = false,
            "--unassigned" => opts.matching.unassigned_label = value(&a)?,

            "-o" | "--out" => opts.export.out_dir = crate::file::normalize_dir_path(&value(&a)?),
            "--prefix" => opts.export.prefix = value(&a)?,
            "--web-columns" => opts.export.web_columns = true,

            "-h" | "--help" => return Ok(Command::Help),
            _ => return Err(format!("Unknown arg: {a}").into()),
        }
    }

    opts.reference = reference.ok_or("Missing --reference <FILE>")?;
    opts.source = match snapshots {
        Some(dir) => SourceOptions::Snapshots { dir },
        None => SourceOptions::WebDriver(driver),
    };

    let cols = &mut opts.extract.columns;
    if let Some(v) = name { cols.name = v; }
    if let Some(v) = id { cols.identifier = v; }
    if let Some(v) = assignee { cols.assignee = v; }
    cols.extras.extend(extras);

    Ok(Command::Run(opts))
}

/// "label=locator"
pub fn parse_extra(s: &str) -> Result<(String, String), Box<dyn Error>> {
    match s.split_once('=') {
        Some((label, loc)) if !label.trim().is_empty() && !loc.trim().is_empty() => {
            Ok((s!(label.trim()), s!(loc.trim())))
        }
        _ => Err(format!("Expected LABEL=COLUMN, got: {s}").into()),
    }
}

fn parse_positive(flag: &str, v: &str) -> Result<usize, Box<dyn Error>> {
    let n: usize = v.parse()?;
    if n == 0 {
        return Err(format!("{flag} must be at least 1").into());
    }
    Ok(n)
}

/* ---------------- progress ---------------- */

#[derive(Default)]
struct CliProgress {
    total: usize,
}

impl Progress for CliProgress {
    fn begin(&mut self, total_pages: usize) {
        self.total = total_pages;
        eprintln!("Pages to read: {total_pages}");
    }
    fn log(&mut self, msg: &str) {
        eprintln!("{msg}");
    }
    fn page_done(&mut self, page: usize, rows: usize) {
        eprintln!("Page {page}/{}: {rows} row(s)", self.total);
    }
}
