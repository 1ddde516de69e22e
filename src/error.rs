// src/error.rs
use std::time::Duration;

use thiserror::Error;

use crate::dom::DomError;

/// Fatal errors of one run. Per-page trouble lives in [`PageError`] and
/// only becomes fatal when the DOM itself is gone.
#[derive(Error, Debug)]
pub enum RunError {
    #[error("dependency unavailable: {0}")]
    DependencyLoad(String),
    #[error("spreadsheet could not be read: {0}")]
    DataFormat(String),
    #[error(transparent)]
    Dom(#[from] DomError),
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
    #[error("archive error: {0}")]
    Archive(#[from] zip::result::ZipError),
}

/// Why one page attempt failed.
#[derive(Error, Debug)]
pub enum PageError {
    #[error("rows did not render within {0:?}")]
    Timeout(Duration),
    #[error("no data rows on page")]
    EmptyPage,
    #[error(transparent)]
    Dom(#[from] DomError),
}

impl PageError {
    /// Worth another attempt on the same page.
    pub fn is_transient(&self) -> bool {
        match self {
            PageError::Timeout(_) | PageError::EmptyPage => true,
            PageError::Dom(e) => e.is_transient(),
        }
    }
}
