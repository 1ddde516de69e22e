// src/archive.rs
//
// Assignee groups → one CSV entry each → one zip on disk.

use std::io::{Cursor, Write};
use std::path::PathBuf;

use chrono::NaiveDate;
use zip::write::SimpleFileOptions;
use zip::{CompressionMethod, ZipWriter};

use crate::config::consts::ENTRY_EXT;
use crate::config::options::ExportOptions;
use crate::csv;
use crate::error::RunError;
use crate::file;
use crate::matcher::{AssigneeGroup, AssigneeGroups};

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct ArchiveEntry {
    pub name: String,
    pub rows: usize,
}

#[derive(Clone, Debug)]
pub struct ExportResult {
    pub path: PathBuf,
    pub entries: Vec<ArchiveEntry>,
}

/// Header line plus rows for one group. With `extra_labels`, the scraped
/// extra values follow the spreadsheet columns.
pub fn group_document(group: &AssigneeGroup<'_>, headers: &[String], extra_labels: &[String]) -> String {
    let mut head: Vec<String> = headers.to_vec();
    head.extend(extra_labels.iter().cloned());

    let rows: Vec<Vec<String>> = group
        .rows
        .iter()
        .map(|r| {
            let mut cells = r.reference.cells.clone();
            for label in extra_labels {
                let v = r.web.extras.iter().find(|(l, _)| l == label).map(|(_, v)| v.clone());
                cells.push(v.unwrap_or_default());
            }
            cells
        })
        .collect();

    csv::to_document(&head, &rows)
}

/// In-memory zip, one deflated `<label>.csv` per group.
pub fn build_archive(
    groups: &AssigneeGroups<'_>,
    headers: &[String],
    extra_labels: &[String],
) -> Result<(Vec<u8>, Vec<ArchiveEntry>), RunError> {
    let mut zw = ZipWriter::new(Cursor::new(Vec::new()));
    let options = SimpleFileOptions::default().compression_method(CompressionMethod::Deflated);
    let mut entries = Vec::with_capacity(groups.len());

    for group in groups.iter() {
        let name = format!("{}.{}", group.label, ENTRY_EXT);
        let doc = group_document(group, headers, extra_labels);
        zw.start_file(name.as_str(), options)?;
        zw.write_all(doc.as_bytes())?;
        logd!("Archive: {name} ({} row(s))", group.rows.len());
        entries.push(ArchiveEntry { name, rows: group.rows.len() });
    }

    let bytes = zw.finish()?.into_inner();
    Ok((bytes, entries))
}

/// Build the archive and save it as `<out_dir>/<prefix>_<date>.zip`.
pub fn export(
    groups: &AssigneeGroups<'_>,
    headers: &[String],
    extra_labels: &[String],
    opts: &ExportOptions,
    date: NaiveDate,
) -> Result<ExportResult, RunError> {
    let labels: &[String] = if opts.web_columns { extra_labels } else { &[] };
    let (bytes, entries) = build_archive(groups, headers, labels)?;

    let path = file::save_bytes(&opts.out_dir, &opts.archive_name(date), &bytes)?;
    logf!(
        "Archive: wrote {} ({} entr(ies), {} bytes)",
        path.display(), entries.len(), bytes.len()
    );
    Ok(ExportResult { path, entries })
}
