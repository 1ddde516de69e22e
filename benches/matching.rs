// benches/matching.rs
use criterion::{black_box, criterion_group, criterion_main, Criterion};

use tablematch::{
    config::options::MatchOptions,
    core::KeyPolicy,
    csv::to_document,
    extract::WebRecord,
    matcher::match_records,
    reference::ReferenceTable,
};

const N: usize = 20_000;

fn sheet() -> ReferenceTable {
    let mut grid = vec![vec!["name".to_string(), "id".to_string(), "amount".to_string()]];
    for i in 0..N {
        grid.push(vec![format!("Person {i}"), format!("{:018}", i * 7919), i.to_string()]);
    }
    ReferenceTable::from_grid(grid, &KeyPolicy::default()).expect("synthetic sheet")
}

fn records() -> Vec<WebRecord> {
    // every other row matches; ids carry spaces like the live table shows them
    (0..N)
        .map(|i| {
            let id = format!("{:018}", if i % 2 == 0 { i * 7919 } else { i * 7919 + 1 });
            WebRecord {
                name: format!(" Person {i} "),
                identifier: format!("{} {}", &id[..6], &id[6..]),
                assignee: format!("Agent {}", i % 40),
                extras: Vec::new(),
            }
        })
        .collect()
}

fn bench_matching(c: &mut Criterion) {
    let table = sheet();
    let recs = records();
    let opts = MatchOptions::default();

    c.bench_function("reference_from_grid", |b| b.iter(|| black_box(sheet().len())));

    c.bench_function("match_records", |b| {
        b.iter(|| {
            let out = match_records(black_box(recs.clone()), &table, &opts);
            black_box(out.groups.row_count())
        })
    });
}

fn bench_csv(c: &mut Criterion) {
    let headers = vec!["姓名".to_string(), "证件号".to_string(), "备注".to_string()];
    let rows: Vec<Vec<String>> = (0..N)
        .map(|i| vec![format!("Person {i}"), format!("{:018}", i), format!("note, with \"quotes\" {i}")])
        .collect();

    c.bench_function("csv_document", |b| {
        b.iter(|| black_box(to_document(&headers, &rows).len()))
    });
}

criterion_group!(benches, bench_matching, bench_csv);
criterion_main!(benches);
