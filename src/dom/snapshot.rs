// src/dom/snapshot.rs
//
// Saved pages of the table, one HTML file per page. Handles are
// "<page>:<ordinal>" where ordinal is the element's position in document
// order, so a handle from an earlier page is reported stale.

use std::collections::HashSet;
use std::fs;
use std::path::Path;

use scraper::{ElementRef, Html, Selector};

use super::{DomError, Element, TableDom};
use crate::core::sanitize::{first_number, normalize_ws};

pub struct SnapshotDom {
    pages: Vec<Html>,
    current: usize,
}

impl SnapshotDom {
    pub fn from_pages<I, S>(pages: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        let mut pages: Vec<Html> = pages.into_iter().map(|p| Html::parse_document(p.as_ref())).collect();
        if pages.is_empty() {
            pages.push(Html::new_document());
        }
        Self { pages, current: 0 }
    }

    /// Every `.html`/`.htm` file in `dir`, ordered by the number in the file
    /// name ("page_2" before "page_10"), then by name.
    pub fn open_dir(dir: &Path) -> Result<Self, DomError> {
        let entries = fs::read_dir(dir)
            .map_err(|e| DomError::Snapshot(format!("{}: {e}", dir.display())))?;

        let mut files: Vec<(usize, String, std::path::PathBuf)> = Vec::new();
        for entry in entries {
            let path = entry.map_err(|e| DomError::Snapshot(e.to_string()))?.path();
            if !path.is_file() { continue; }
            let ext = path.extension().and_then(|s| s.to_str()).unwrap_or("").to_ascii_lowercase();
            if ext != "html" && ext != "htm" { continue; }
            let stem = path.file_stem().and_then(|s| s.to_str()).unwrap_or("").to_string();
            files.push((first_number(&stem).unwrap_or(usize::MAX), stem, path));
        }
        if files.is_empty() {
            return Err(DomError::Snapshot(format!("no .html pages in {}", dir.display())));
        }
        files.sort();

        let mut pages = Vec::with_capacity(files.len());
        for (_, _, path) in &files {
            let text = fs::read_to_string(path)
                .map_err(|e| DomError::Snapshot(format!("{}: {e}", path.display())))?;
            pages.push(text);
        }
        logf!("Snapshot: {} page(s) from {}", pages.len(), dir.display());
        Ok(Self::from_pages(pages))
    }

    pub fn page_count(&self) -> usize { self.pages.len() }

    /// Zero-based index of the page currently "rendered".
    pub fn current_page(&self) -> usize { self.current }

    fn doc(&self) -> &Html { &self.pages[self.current] }

    fn all_elements(&self) -> impl Iterator<Item = ElementRef<'_>> {
        self.doc().root_element().descendants().filter_map(ElementRef::wrap)
    }

    fn parse_selector(selector: &str) -> Result<Selector, DomError> {
        Selector::parse(selector).map_err(|e| DomError::InvalidSelector(format!("{selector}: {e:?}")))
    }

    fn resolve(&self, el: &Element) -> Result<ElementRef<'_>, DomError> {
        let (page, ordinal) = el
            .id()
            .split_once(':')
            .and_then(|(p, o)| Some((p.parse::<usize>().ok()?, o.parse::<usize>().ok()?)))
            .ok_or_else(|| DomError::Snapshot(format!("bad handle {}", el.id())))?;
        if page != self.current {
            return Err(DomError::Stale(s!(el.id())));
        }
        self.all_elements()
            .nth(ordinal)
            .ok_or_else(|| DomError::Stale(s!(el.id())))
    }

    /// Turn matched elements into handles, keeping document order.
    fn handles<'a>(&'a self, matched: impl Iterator<Item = ElementRef<'a>>) -> Vec<Element> {
        let wanted: HashSet<_> = matched.map(|e| e.id()).collect();
        if wanted.is_empty() { return Vec::new(); }
        self.all_elements()
            .enumerate()
            .filter(|(_, e)| wanted.contains(&e.id()))
            .map(|(i, _)| Element::new(format!("{}:{}", self.current, i)))
            .collect()
    }
}

impl TableDom for SnapshotDom {
    fn query_all(&mut self, selector: &str) -> Result<Vec<Element>, DomError> {
        let sel = Self::parse_selector(selector)?;
        Ok(self.handles(self.doc().select(&sel)))
    }

    fn query_in(&mut self, parent: &Element, selector: &str) -> Result<Vec<Element>, DomError> {
        let sel = Self::parse_selector(selector)?;
        let root = self.resolve(parent)?;
        Ok(self.handles(root.select(&sel)))
    }

    fn text(&mut self, el: &Element) -> Result<String, DomError> {
        let node = self.resolve(el)?;
        Ok(normalize_ws(&node.text().collect::<String>()))
    }

    fn attribute(&mut self, el: &Element, name: &str) -> Result<Option<String>, DomError> {
        let node = self.resolve(el)?;
        Ok(node.value().attr(name).map(String::from))
    }

    fn click(&mut self, el: &Element) -> Result<(), DomError> {
        self.resolve(el)?;
        if self.current + 1 < self.pages.len() {
            self.current += 1;
            logd!("Snapshot: advanced to page {}", self.current + 1);
        } else {
            logd!("Snapshot: click on last page ignored");
        }
        Ok(())
    }
}
