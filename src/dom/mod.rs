// src/dom/mod.rs
//! # DOM query layer
//!
//! The extractor only ever talks to a [`TableDom`]: find elements by CSS
//! selector, read their text and attributes, click one. It never edits the
//! table; the only state it changes is the current page, through a click on
//! the pagination control.
//!
//! ## Implementations
//! - [`webdriver::WebDriverDom`] – a live browser behind a W3C WebDriver server.
//!   This is what sees the JavaScript-rendered table.
//! - [`snapshot::SnapshotDom`] – saved HTML pages; a click moves to the next
//!   page. Offline runs and tests.
//!
//! Element handles are opaque strings owned by the implementation and are only
//! valid until the next page change.
use std::thread;
use std::time::{Duration, Instant};

use thiserror::Error;

pub mod snapshot;
pub mod webdriver;

pub use snapshot::SnapshotDom;
pub use webdriver::WebDriverDom;

#[derive(Clone, Debug, PartialEq, Eq, Hash)]
pub struct Element(String);

impl Element {
    pub fn new(id: impl Into<String>) -> Self { Self(id.into()) }
    pub fn id(&self) -> &str { &self.0 }
}

#[derive(Error, Debug)]
pub enum DomError {
    #[error("invalid selector: {0}")]
    InvalidSelector(String),
    #[error("stale element: {0}")]
    Stale(String),
    #[error("webdriver error `{error}`: {message}")]
    Driver { error: String, message: String },
    #[error("transport error: {0}")]
    Transport(String),
    #[error("unexpected response: {0}")]
    Protocol(String),
    #[error("snapshot error: {0}")]
    Snapshot(String),
}

impl DomError {
    /// Errors a re-render can cause and a later attempt can get past.
    pub fn is_transient(&self) -> bool {
        match self {
            DomError::Stale(_) => true,
            DomError::Driver { error, .. } => matches!(
                error.as_str(),
                "no such element"
                    | "stale element reference"
                    | "element click intercepted"
                    | "element not interactable"
                    | "timeout"
            ),
            _ => false,
        }
    }
}

pub trait TableDom {
    fn query_all(&mut self, selector: &str) -> Result<Vec<Element>, DomError>;
    fn query_in(&mut self, parent: &Element, selector: &str) -> Result<Vec<Element>, DomError>;
    fn text(&mut self, el: &Element) -> Result<String, DomError>;
    fn attribute(&mut self, el: &Element, name: &str) -> Result<Option<String>, DomError>;
    fn click(&mut self, el: &Element) -> Result<(), DomError>;

    fn query_first(&mut self, selector: &str) -> Result<Option<Element>, DomError> {
        Ok(self.query_all(selector)?.into_iter().next())
    }

    fn first_in(&mut self, parent: &Element, selector: &str) -> Result<Option<Element>, DomError> {
        Ok(self.query_in(parent, selector)?.into_iter().next())
    }

    /// Trimmed text of the first match under `parent`, empty when missing.
    fn text_in(&mut self, parent: &Element, selector: &str) -> Result<String, DomError> {
        match self.first_in(parent, selector)? {
            Some(el) => Ok(self.text(&el)?.trim().to_string()),
            None => Ok(s!()),
        }
    }

    fn classes(&mut self, el: &Element) -> Result<Vec<String>, DomError> {
        Ok(self
            .attribute(el, "class")?
            .map(|c| c.split_whitespace().map(String::from).collect())
            .unwrap_or_default())
    }
}

/// Poll until `selector` matches something or `timeout` runs out.
/// Always checks at least once.
pub fn wait_for(
    dom: &mut dyn TableDom,
    selector: &str,
    timeout: Duration,
    poll: Duration,
) -> Result<bool, DomError> {
    let start = Instant::now();
    loop {
        if !dom.query_all(selector)?.is_empty() { return Ok(true); }
        if start.elapsed() >= timeout { return Ok(false); }
        thread::sleep(poll.min(timeout.saturating_sub(start.elapsed())));
    }
}
