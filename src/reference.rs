// src/reference.rs
//
// Reference spreadsheet → lookup table keyed by CompositeKey.
// Built once before extraction, read-only afterwards.

use std::collections::HashMap;
use std::fs;
use std::io::Cursor;
use std::path::Path;

use calamine::{Data, Reader, open_workbook_auto_from_rs};

use crate::core::{CompositeKey, KeyPolicy};
use crate::error::RunError;

pub const EXTENSIONS: &[&str] = &["xlsx", "xlsm", "xls", "xlsb", "ods"];

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct ReferenceRow {
    /// Padded to the header width.
    pub cells: Vec<String>,
    /// `None` when name or identifier is blank; such rows never match.
    pub key: Option<CompositeKey>,
}

#[derive(Clone, Debug)]
pub struct ReferenceTable {
    headers: Vec<String>,
    rows: Vec<ReferenceRow>,
    index: HashMap<CompositeKey, usize>,
    duplicate_keys: usize,
}

impl ReferenceTable {
    /// First grid row is the header. Duplicate keys: first row wins.
    pub fn from_grid(grid: Vec<Vec<String>>, policy: &KeyPolicy) -> Result<Self, RunError> {
        let mut it = grid.into_iter();
        let raw_headers = it.next().ok_or_else(|| RunError::DataFormat(s!("sheet is empty")))?;

        let data: Vec<Vec<String>> = it
            .map(trim_trailing_blanks)
            .filter(|r| r.len() >= 2)
            .collect();
        if data.is_empty() {
            return Err(RunError::DataFormat(s!("no data rows with at least two cells")));
        }

        let width = data.iter().map(Vec::len).max().unwrap_or(0).max(raw_headers.len());
        let headers: Vec<String> = (0..width)
            .map(|i| match raw_headers.get(i).map(|h| h.trim()) {
                Some(h) if !h.is_empty() => s!(h),
                _ => format!("Column {}", i + 1),
            })
            .collect();

        let mut rows = Vec::with_capacity(data.len());
        let mut index = HashMap::with_capacity(data.len());
        let mut duplicate_keys = 0;

        for mut cells in data {
            let key = policy.key(&cells[0], &cells[1]);
            if let Some(k) = &key {
                if index.contains_key(k) {
                    duplicate_keys += 1;
                    logd!("Reference: duplicate key {k}, keeping first row");
                } else {
                    index.insert(k.clone(), rows.len());
                }
            }
            cells.resize(width, s!());
            rows.push(ReferenceRow { cells, key });
        }

        logf!(
            "Reference: {} row(s), {} key(s), {} duplicate(s), {} column(s)",
            rows.len(), index.len(), duplicate_keys, headers.len()
        );
        Ok(Self { headers, rows, index, duplicate_keys })
    }

    pub fn headers(&self) -> &[String] { &self.headers }
    pub fn rows(&self) -> &[ReferenceRow] { &self.rows }
    pub fn len(&self) -> usize { self.rows.len() }
    pub fn is_empty(&self) -> bool { self.rows.is_empty() }
    pub fn key_count(&self) -> usize { self.index.len() }
    pub fn duplicate_keys(&self) -> usize { self.duplicate_keys }

    pub fn get(&self, key: &CompositeKey) -> Option<&ReferenceRow> {
        self.index.get(key).map(|&i| &self.rows[i])
    }

    /// Rows that own a lookup key, in sheet order.
    pub fn keyed_rows(&self) -> impl Iterator<Item = (&CompositeKey, &ReferenceRow)> {
        self.rows.iter().enumerate().filter_map(|(i, r)| {
            let k = r.key.as_ref()?;
            (self.index.get(k) == Some(&i)).then_some((k, r))
        })
    }
}

/* ---------------- Loading ---------------- */

pub fn load_path(path: &Path, policy: &KeyPolicy) -> Result<ReferenceTable, RunError> {
    let ext = path.extension().and_then(|s| s.to_str()).unwrap_or("").to_ascii_lowercase();
    if !EXTENSIONS.contains(&ext.as_str()) {
        return Err(RunError::DataFormat(format!(
            "{}: expected a spreadsheet ({})", path.display(), EXTENSIONS.join(", ")
        )));
    }
    let bytes = fs::read(path)
        .map_err(|e| RunError::DataFormat(format!("{}: {e}", path.display())))?;
    logf!("Reference: reading {} ({} bytes)", path.display(), bytes.len());
    load_bytes(bytes, policy)
}

/// First sheet of any workbook format calamine recognises.
pub fn load_bytes(bytes: Vec<u8>, policy: &KeyPolicy) -> Result<ReferenceTable, RunError> {
    ReferenceTable::from_grid(read_grid(bytes)?, policy)
}

fn read_grid(bytes: Vec<u8>) -> Result<Vec<Vec<String>>, RunError> {
    let mut book = open_workbook_auto_from_rs(Cursor::new(bytes))
        .map_err(|e| RunError::DataFormat(e.to_string()))?;
    let range = book
        .worksheet_range_at(0)
        .ok_or_else(|| RunError::DataFormat(s!("workbook has no sheets")))?
        .map_err(|e| RunError::DataFormat(e.to_string()))?;

    Ok(range
        .rows()
        .map(|row| row.iter().map(cell_text).collect())
        .collect())
}

fn cell_text(cell: &Data) -> String {
    match cell {
        Data::Empty => s!(),
        Data::String(s) => s.clone(),
        Data::Int(i) => i.to_string(),
        // whole numbers (ids typed as numbers) must not turn into 1.1e17
        Data::Float(f) if f.fract() == 0.0 && f.abs() < 1e15 => format!("{}", *f as i64),
        other => other.to_string(),
    }
}

fn trim_trailing_blanks(mut row: Vec<String>) -> Vec<String> {
    while row.last().is_some_and(|c| c.trim().is_empty()) {
        row.pop();
    }
    row
}
