// src/extract/strategy.rs
//
// Row → WebRecord. Both strategies read cells with the same selector
// template; they differ in how a field finds its column class.

use std::collections::HashMap;

use super::WebRecord;
use crate::config::options::{ColumnMap, ExtractOptions, Selectors, StrategyKind};
use crate::core::sanitize::normalize_ws;
use crate::dom::{DomError, Element, TableDom};

pub trait RowStrategy {
    /// Called at the start of every page attempt, before any row is read.
    fn begin_page(&mut self, _dom: &mut dyn TableDom) -> Result<(), DomError> { Ok(()) }

    /// Column class for a field locator, if known.
    fn column_for<'a>(&'a self, locator: &'a str) -> Option<&'a str>;

    fn columns(&self) -> &ColumnMap;
    fn selectors(&self) -> &Selectors;

    fn extract(&self, dom: &mut dyn TableDom, row: &Element) -> Result<WebRecord, DomError> {
        let cols = self.columns();
        let name = self.cell(dom, row, &cols.name)?;
        let identifier = self.cell(dom, row, &cols.identifier)?;
        let assignee = self.cell(dom, row, &cols.assignee)?;

        let mut extras = Vec::with_capacity(cols.extras.len());
        for (label, locator) in &cols.extras {
            extras.push((label.clone(), self.cell(dom, row, locator)?));
        }
        Ok(WebRecord { name, identifier, assignee, extras })
    }

    /// Trimmed cell text; empty when the column is unknown or the cell missing.
    fn cell(&self, dom: &mut dyn TableDom, row: &Element, locator: &str) -> Result<String, DomError> {
        match self.column_for(locator) {
            Some(class) => dom.text_in(row, &self.selectors().cell(class)),
            None => Ok(s!()),
        }
    }
}

pub fn for_options(opts: &ExtractOptions) -> Box<dyn RowStrategy> {
    match opts.strategy {
        StrategyKind::Static => Box::new(StaticColumns::new(opts.columns.clone(), opts.selectors.clone())),
        StrategyKind::Header => Box::new(HeaderColumns::new(opts.columns.clone(), opts.selectors.clone())),
    }
}

/* ---------------- Static column classes ---------------- */

pub struct StaticColumns {
    columns: ColumnMap,
    selectors: Selectors,
}

impl StaticColumns {
    pub fn new(columns: ColumnMap, selectors: Selectors) -> Self {
        Self { columns, selectors }
    }
}

impl RowStrategy for StaticColumns {
    fn column_for<'a>(&'a self, locator: &'a str) -> Option<&'a str> { Some(locator) }
    fn columns(&self) -> &ColumnMap { &self.columns }
    fn selectors(&self) -> &Selectors { &self.selectors }
}

/* ---------------- Header captions ---------------- */

/// Maps header caption → column class by reading the header row, so the
/// table may reorder its columns between runs or pages.
pub struct HeaderColumns {
    columns: ColumnMap,
    selectors: Selectors,
    resolved: HashMap<String, String>,
}

impl HeaderColumns {
    pub fn new(columns: ColumnMap, selectors: Selectors) -> Self {
        Self { columns, selectors, resolved: HashMap::new() }
    }

    /// Caption → class as read on the last page.
    pub fn resolved(&self) -> &HashMap<String, String> { &self.resolved }

    fn wanted(&self) -> Vec<&str> {
        let c = &self.columns;
        let mut v = vec![c.name.as_str(), c.identifier.as_str(), c.assignee.as_str()];
        v.extend(c.extras.iter().map(|(_, loc)| loc.as_str()));
        v
    }

    fn column_class<'a>(&self, classes: &'a [String]) -> Option<&'a String> {
        classes.iter().find(|c| {
            c.starts_with(&self.selectors.column_class_prefix)
                && c.contains(&self.selectors.column_class_marker)
        })
    }
}

impl RowStrategy for HeaderColumns {
    fn begin_page(&mut self, dom: &mut dyn TableDom) -> Result<(), DomError> {
        let wanted: Vec<String> = self.wanted().into_iter().map(String::from).collect();
        let mut map = HashMap::new();

        for th in dom.query_all(&self.selectors.header_cells)? {
            let caption = normalize_ws(&dom.text(&th)?);
            // fixed-column tables repeat the header; first one wins
            if !wanted.contains(&caption) || map.contains_key(&caption) { continue; }
            let classes = dom.classes(&th)?;
            if let Some(class) = self.column_class(&classes) {
                map.insert(caption, class.clone());
            }
        }

        for caption in [&self.columns.name, &self.columns.identifier] {
            if !map.contains_key(caption) {
                logd!("Header: no column found for \"{caption}\"");
            }
        }
        if map != self.resolved {
            logd!("Header: resolved {} column(s): {:?}", map.len(), map);
        }
        self.resolved = map;
        Ok(())
    }

    fn column_for<'a>(&'a self, locator: &'a str) -> Option<&'a str> {
        self.resolved.get(locator).map(String::as_str)
    }

    fn columns(&self) -> &ColumnMap { &self.columns }
    fn selectors(&self) -> &Selectors { &self.selectors }
}
