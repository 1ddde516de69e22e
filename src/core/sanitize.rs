// src/core/sanitize.rs

/// Characters browsers and file systems refuse in a file name.
const FORBIDDEN: &[char] = &['/', '\\', '?', '%', '*', ':', '|', '"', '<', '>'];

pub fn normalize_ws(s: &str) -> String {
    let mut out = String::with_capacity(s.len());
    let mut prev_space = false;
    for ch in s.chars() {
        if ch.is_whitespace() {
            if !prev_space { out.push(' '); prev_space = true; }
        } else { out.push(ch); prev_space = false; }
    }
    out.trim().to_string()
}

/// Keep ASCII digits only ("1101 0119-9001" → "11010119900").
pub fn digits_only(s: &str) -> String {
    s.chars().filter(|c| c.is_ascii_digit()).collect()
}

/// First run of digits (commas allowed as grouping) in `s`, e.g. "共 1,234 条" → 1234.
pub fn first_number(s: &str) -> Option<usize> {
    let start = s.find(|c: char| c.is_ascii_digit())?;
    let digits: String = s[start..]
        .chars()
        .take_while(|c| c.is_ascii_digit() || *c == ',')
        .filter(char::is_ascii_digit)
        .collect();
    digits.parse().ok()
}

/// Assignee → archive entry stem. Forbidden characters become '_';
/// blank input falls back to `fallback`.
pub fn sanitize_label(name: &str, fallback: &str) -> String {
    let trimmed = name.trim();
    if trimmed.is_empty() { return s!(fallback); }

    let out: String = trimmed
        .chars()
        .map(|ch| if FORBIDDEN.contains(&ch) || ch.is_control() { '_' } else { ch })
        .collect();

    // "." and ".." are not usable entry names
    if out.chars().all(|c| c == '.') { s!(fallback) } else { out }
}
