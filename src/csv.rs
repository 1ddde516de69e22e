// src/csv.rs
use std::mem::take;

use crate::config::consts::BOM;

pub const SEP: char = ',';

/* ---------------- Parsing ---------------- */

/// Minimal CSV parser (quotes + CRLF tolerant, leading BOM skipped).
pub fn parse_rows(text: &str, sep: char) -> Vec<Vec<String>> {
    let text = text.strip_prefix(BOM).unwrap_or(text);
    let mut rows = Vec::new();
    let mut field = s!();
    let mut row = Vec::new();
    let mut in_quotes = false;
    let mut chars = text.chars().peekable();

    while let Some(ch) = chars.next() {
        match ch {
            '"' => {
                if in_quotes {
                    if matches!(chars.peek(), Some('"')) {
                        chars.next(); // double-quote escape
                        field.push('"');
                    } else {
                        in_quotes = false;
                    }
                } else {
                    in_quotes = true;
                }
            }
            c if c == sep && !in_quotes => {
                row.push(take(&mut field));
            }
            '\n' | '\r' if !in_quotes => {
                if ch == '\r' && matches!(chars.peek(), Some('\n')) { chars.next(); }
                row.push(take(&mut field));
                if !(row.len() == 1 && row[0].is_empty()) {
                    rows.push(take(&mut row));
                } else {
                    row.clear();
                }
            }
            _ => field.push(ch),
        }
    }

    // Flush any trailing field/row even if quotes were unterminated.
    if !field.is_empty() || !row.is_empty() {
        row.push(field);
        rows.push(row);
    }

    rows
}

/* ---------------- Writing ---------------- */

fn needs_quotes(field: &str, sep: char) -> bool {
    field.contains(sep) || field.contains('"') || field.contains('\n') || field.contains('\r')
}

/// Quote a field only when it has to be; embedded quotes are doubled.
pub fn encode_field(field: &str, sep: char) -> String {
    if needs_quotes(field, sep) {
        join!("\"", &field.replace('"', "\"\""), "\"")
    } else {
        s!(field)
    }
}

/// Append a single row (no line terminator).
pub fn push_row<S: AsRef<str>>(out: &mut String, row: &[S], sep: char) {
    for (i, cell) in row.iter().enumerate() {
        if i > 0 { out.push(sep); }
        out.push_str(&encode_field(cell.as_ref(), sep));
    }
}

/// Archive entry body: BOM, header line, then one line per row, '\n' separated.
pub fn to_document<S: AsRef<str>>(headers: &[S], rows: &[Vec<String>]) -> String {
    let mut out = String::new();
    out.push(BOM);
    push_row(&mut out, headers, SEP);
    for r in rows {
        out.push('\n');
        push_row(&mut out, r, SEP);
    }
    out
}
