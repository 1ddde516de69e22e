// src/matcher.rs
//
// Join scraped records to reference rows by composite key, drop repeated
// keys, and bucket the matched rows by assignee.

use std::collections::{HashMap, HashSet};

use crate::config::consts::UNCLAIMED_LOG_LIMIT;
use crate::config::options::MatchOptions;
use crate::core::sanitize::sanitize_label;
use crate::core::{CompositeKey, KeyPolicy};
use crate::extract::WebRecord;
use crate::reference::{ReferenceRow, ReferenceTable};

/// A scraped record with its reference row, if the key is known.
#[derive(Clone, Debug)]
pub struct MatchedRecord<'r> {
    pub key: CompositeKey,
    pub web: WebRecord,
    pub reference: Option<&'r ReferenceRow>,
}

/// One matched row inside an assignee group.
#[derive(Clone, Debug)]
pub struct GroupRow<'r> {
    pub reference: &'r ReferenceRow,
    pub web: WebRecord,
}

#[derive(Clone, Debug)]
pub struct AssigneeGroup<'r> {
    /// Sanitized assignee, also the archive entry stem.
    pub label: String,
    pub rows: Vec<GroupRow<'r>>,
}

/// Groups in order of first appearance; labels are unique.
#[derive(Clone, Debug, Default)]
pub struct AssigneeGroups<'r> {
    groups: Vec<AssigneeGroup<'r>>,
    index: HashMap<String, usize>,
}

impl<'r> AssigneeGroups<'r> {
    pub fn push(&mut self, label: String, row: GroupRow<'r>) {
        match self.index.get(&label) {
            Some(&i) => self.groups[i].rows.push(row),
            None => {
                self.index.insert(label.clone(), self.groups.len());
                self.groups.push(AssigneeGroup { label, rows: vec![row] });
            }
        }
    }

    pub fn get(&self, label: &str) -> Option<&AssigneeGroup<'r>> {
        self.index.get(label).map(|&i| &self.groups[i])
    }

    pub fn iter(&self) -> impl Iterator<Item = &AssigneeGroup<'r>> { self.groups.iter() }
    pub fn len(&self) -> usize { self.groups.len() }
    pub fn is_empty(&self) -> bool { self.groups.is_empty() }
    pub fn row_count(&self) -> usize { self.groups.iter().map(|g| g.rows.len()).sum() }
}

#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct MatchSummary {
    pub records: usize,
    pub matched: usize,
    pub unmatched: usize,
    pub duplicates: usize,
    /// Records without a usable key.
    pub skipped: usize,
    /// Reference keys no record claimed, in sheet order.
    pub unclaimed: Vec<CompositeKey>,
}

impl MatchSummary {
    /// Matched share of all records, in percent.
    pub fn match_rate(&self) -> f64 {
        if self.records == 0 { 0.0 } else { self.matched as f64 * 100.0 / self.records as f64 }
    }
}

pub struct MatchOutcome<'r> {
    pub groups: AssigneeGroups<'r>,
    pub summary: MatchSummary,
}

/// Key every record, keep the first record per key, look up its row.
/// Returns the unique records plus (skipped, duplicates) counts.
pub fn resolve<'r>(
    records: Vec<WebRecord>,
    table: &'r ReferenceTable,
    policy: &KeyPolicy,
) -> (Vec<MatchedRecord<'r>>, usize, usize) {
    let mut seen: HashSet<CompositeKey> = HashSet::with_capacity(records.len());
    let mut out = Vec::with_capacity(records.len());
    let (mut skipped, mut duplicates) = (0, 0);

    for web in records {
        let Some(key) = policy.key(&web.name, &web.identifier) else {
            skipped += 1;
            continue;
        };
        if !seen.insert(key.clone()) {
            duplicates += 1;
            logd!("Match: duplicate record {key}, dropped");
            continue;
        }
        let reference = table.get(&key);
        out.push(MatchedRecord { key, web, reference });
    }
    (out, skipped, duplicates)
}

pub fn match_records<'r>(
    records: Vec<WebRecord>,
    table: &'r ReferenceTable,
    opts: &MatchOptions,
) -> MatchOutcome<'r> {
    let total = records.len();
    let (resolved, skipped, duplicates) = resolve(records, table, &opts.key);

    let mut groups = AssigneeGroups::default();
    let mut claimed: HashSet<CompositeKey> = HashSet::with_capacity(resolved.len());
    let mut unmatched = 0;

    for m in resolved {
        let Some(reference) = m.reference else {
            unmatched += 1;
            continue;
        };
        claimed.insert(m.key);
        let label = sanitize_label(&m.web.assignee, &opts.unassigned_label);
        groups.push(label, GroupRow { reference, web: m.web });
    }

    let unclaimed: Vec<CompositeKey> = table
        .keyed_rows()
        .filter(|(k, _)| !claimed.contains(*k))
        .map(|(k, _)| k.clone())
        .collect();

    let summary = MatchSummary {
        records: total,
        matched: claimed.len(),
        unmatched,
        duplicates,
        skipped,
        unclaimed,
    };
    log_summary(&summary, table);

    MatchOutcome { groups, summary }
}

fn log_summary(summary: &MatchSummary, table: &ReferenceTable) {
    logf!(
        "Match: {} matched, {} unmatched, {} duplicate(s), {} skipped ({:.1}%)",
        summary.matched, summary.unmatched, summary.duplicates, summary.skipped,
        summary.match_rate()
    );
    if summary.unclaimed.is_empty() {
        logf!("Match: every reference row was claimed");
        return;
    }
    for key in summary.unclaimed.iter().take(UNCLAIMED_LOG_LIMIT) {
        if let Some(row) = table.get(key) {
            logf!("Match: unclaimed reference row: {}, {}", row.cells[0], row.cells[1]);
        }
    }
    logf!("Match: {} reference row(s) unclaimed", summary.unclaimed.len());
}
