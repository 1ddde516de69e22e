// src/extract/mod.rs
//! Paginated extractor: reads the visible table page by page through a
//! [`TableDom`] until the next control is disabled or the page limit is hit.
//!
//! The loop is bounded by `min(total_pages, page_ceiling)`, so a misread
//! total or a next button that never disables can't spin forever.
use std::thread;
use std::time::Duration;

use rand::Rng;

pub mod strategy;

pub use strategy::{HeaderColumns, RowStrategy, StaticColumns};

use crate::config::options::{ExtractOptions, TotalFallback};
use crate::core::sanitize::{digits_only, first_number};
use crate::dom::{self, DomError, TableDom};
use crate::error::{PageError, RunError};
use crate::progress::Progress;

/// One scraped table row.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct WebRecord {
    pub name: String,
    pub identifier: String,
    pub assignee: String,
    /// Optional business columns, (label, value) in configured order.
    pub extras: Vec<(String, String)>,
}

impl WebRecord {
    /// Both identity fields usable for matching.
    pub fn has_identity(&self) -> bool {
        !self.name.trim().is_empty() && !digits_only(&self.identifier).is_empty()
    }
}

/// Result of trying to move to the next page.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Advance {
    Next,
    /// Next control missing or disabled: normal end of the table.
    Exhausted,
}

#[derive(Clone, Debug, Default)]
pub struct Extraction {
    pub records: Vec<WebRecord>,
    pub total_pages: usize,
    pub pages_read: usize,
    /// 1-based numbers of pages given up on after all attempts.
    pub skipped_pages: Vec<usize>,
    /// Rows without a usable name or identifier.
    pub dropped_rows: usize,
    pub retries: u32,
}

/// Pages announced by the total-count element, `ceil(total / page_size)`.
pub fn total_pages(dom: &mut dyn TableDom, opts: &ExtractOptions) -> Result<usize, DomError> {
    let page_size = opts.page_size.max(1);

    for selector in &opts.selectors.totals {
        let Some(el) = dom.query_first(selector)? else { continue };
        let text = dom.text(&el)?;
        if let Some(total) = first_number(&text) {
            let pages = total.div_ceil(page_size);
            logf!("Extract: total {total} item(s) → {pages} page(s) of {page_size} ({selector})");
            return Ok(pages);
        }
        logd!("Extract: no number in {selector}: {text:?}");
    }

    let pages = match opts.total_fallback {
        TotalFallback::NoPages => 0,
        TotalFallback::OnePage => 1,
    };
    logf!("Extract: total count unreadable, assuming {pages} page(s)");
    Ok(pages)
}

pub fn extract_all(
    dom: &mut dyn TableDom,
    strategy: &mut dyn RowStrategy,
    opts: &ExtractOptions,
    mut progress: Option<&mut (dyn Progress + '_)>,
) -> Result<Extraction, RunError> {
    let mut out = Extraction { total_pages: total_pages(dom, opts)?, ..Extraction::default() };

    let limit = out.total_pages.min(opts.page_ceiling);
    if limit < out.total_pages {
        logf!("Extract: capping {} page(s) at ceiling {}", out.total_pages, opts.page_ceiling);
    }
    if let Some(p) = progress.as_deref_mut() {
        p.begin(limit);
    }

    let attempts = opts.retry.attempts();
    let mut page = 1;

    while page <= limit {
        let mut attempt = 0;
        loop {
            attempt += 1;
            match read_page(dom, strategy, opts) {
                Ok((rows, dropped)) => {
                    logf!("Extract: page {page}/{limit}: {} row(s), {dropped} dropped", rows.len());
                    if let Some(p) = progress.as_deref_mut() {
                        p.page_done(page, rows.len());
                    }
                    out.records.extend(rows);
                    out.dropped_rows += dropped;
                    out.pages_read += 1;
                    break;
                }
                Err(PageError::Dom(e)) if !e.is_transient() => return Err(e.into()),
                Err(e) => {
                    if attempt >= attempts {
                        loge!("Extract: page {page} skipped after {attempt} attempt(s): {e}");
                        if let Some(p) = progress.as_deref_mut() {
                            p.log(&format!("Page {page} skipped: {e}"));
                            p.page_done(page, 0);
                        }
                        out.skipped_pages.push(page);
                        break;
                    }
                    logd!("Extract: page {page} attempt {attempt}/{attempts} failed: {e}");
                    out.retries += 1;
                    thread::sleep(opts.retry.pause());
                }
            }
        }

        if page == limit { break; }
        match advance_retrying(dom, opts, &mut out.retries)? {
            Some(Advance::Next) => {
                pause(opts);
                page += 1;
            }
            Some(Advance::Exhausted) => {
                logf!("Extract: last page reached at {page}/{limit}");
                break;
            }
            None => {
                loge!("Extract: next page unreachable after page {page}/{limit}, keeping partial result");
                if let Some(p) = progress.as_deref_mut() {
                    p.log(&format!("Stopped after page {page}: next page unreachable"));
                }
                break;
            }
        }
    }

    logf!(
        "Extract: done, {} record(s) from {} page(s), {} skipped, {} retries",
        out.records.len(), out.pages_read, out.skipped_pages.len(), out.retries
    );
    Ok(out)
}

/// Wait for rows, then read every row of the current page.
/// Returns the usable records and how many rows were dropped.
fn read_page(
    dom: &mut dyn TableDom,
    strategy: &mut dyn RowStrategy,
    opts: &ExtractOptions,
) -> Result<(Vec<WebRecord>, usize), PageError> {
    let rows_sel = &opts.selectors.rows;
    if !dom::wait_for(dom, rows_sel, opts.row_timeout, opts.row_poll)? {
        return Err(PageError::Timeout(opts.row_timeout));
    }

    strategy.begin_page(dom)?;
    let rows = dom.query_all(rows_sel)?;
    if rows.is_empty() {
        return Err(PageError::EmptyPage);
    }

    let mut records = Vec::with_capacity(rows.len());
    let mut dropped = 0;
    for row in &rows {
        let rec = strategy.extract(dom, row)?;
        if rec.has_identity() { records.push(rec); } else { dropped += 1; }
    }
    Ok((records, dropped))
}

/// Click the next control unless it is missing or disabled.
pub fn advance(dom: &mut dyn TableDom, opts: &ExtractOptions) -> Result<Advance, DomError> {
    let Some(next) = dom.query_first(&opts.selectors.next)? else {
        return Ok(Advance::Exhausted);
    };
    let disabled = dom.attribute(&next, "disabled")?;
    if disabled.is_some_and(|v| v != "false") {
        return Ok(Advance::Exhausted);
    }
    dom.click(&next)?;
    Ok(Advance::Next)
}

/// [`advance`] under the retry policy. Transient errors re-query the next
/// control; `None` once attempts run out.
fn advance_retrying(
    dom: &mut dyn TableDom,
    opts: &ExtractOptions,
    retries: &mut u32,
) -> Result<Option<Advance>, DomError> {
    let attempts = opts.retry.attempts();
    let mut attempt = 0;
    loop {
        attempt += 1;
        match advance(dom, opts) {
            Ok(a) => return Ok(Some(a)),
            Err(e) if !e.is_transient() => return Err(e),
            Err(e) => {
                if attempt >= attempts {
                    loge!("Extract: next click failed after {attempt} attempt(s): {e}");
                    return Ok(None);
                }
                logd!("Extract: next click attempt {attempt}/{attempts} failed: {e}");
                *retries += 1;
                thread::sleep(opts.retry.pause());
            }
        }
    }
}

/// Let the table re-render: fixed delay plus random jitter.
fn pause(opts: &ExtractOptions) {
    let jitter_ms = opts.jitter.as_millis() as u64;
    let extra = if jitter_ms == 0 { 0 } else { rand::rng().random_range(0..=jitter_ms) };
    let wait = opts.delay + Duration::from_millis(extra);
    if !wait.is_zero() {
        thread::sleep(wait);
    }
}
