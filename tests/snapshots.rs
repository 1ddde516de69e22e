// tests/snapshots.rs
mod common;

use std::fs;

use common::{col, page, tmp_dir, STOCK};
use tablematch::config::options::{ExtractOptions, StrategyKind};
use tablematch::dom::{DomError, SnapshotDom, TableDom};
use tablematch::extract::{extract_all, HeaderColumns, RowStrategy, StaticColumns};

fn opts(kind: StrategyKind, page_size: usize) -> ExtractOptions {
    let mut o = ExtractOptions::default().without_delays();
    o.set_strategy(kind);
    o.page_size = page_size;
    o
}

#[test]
fn header_strategy_follows_reordered_columns() {
    let moved = [
        col("CPE", "el-table_5_column_40"),
        col("姓名", "el-table_5_column_41"),
        col("证件号", "el-table_5_column_42"),
    ];
    let p1 = page(4, &STOCK, &[&["张三", "110101199001011234", "Ann", "10"], &["李四", "220202198802022345", "Bob", "20"]], false);
    let p2 = page(4, &moved, &[&["Ann", "王五", "330303197703033456"], &["", "赵六", "440404196604044567"]], true);
    let mut dom = SnapshotDom::from_pages([p1, p2]);
    let o = opts(StrategyKind::Header, 2);
    let mut strategy = HeaderColumns::new(o.columns.clone(), o.selectors.clone());

    let out = extract_all(&mut dom, &mut strategy, &o, None).unwrap();

    assert_eq!(out.pages_read, 2);
    let names: Vec<&str> = out.records.iter().map(|r| r.name.as_str()).collect();
    assert_eq!(names, vec!["张三", "李四", "王五", "赵六"]);
    assert_eq!(out.records[2].identifier, "330303197703033456");
    assert_eq!(out.records[2].assignee, "Ann");
    assert_eq!(out.records[3].assignee, "");
    assert_eq!(strategy.resolved().get("姓名").map(String::as_str), Some("el-table_5_column_41"));
}

#[test]
fn static_strategy_reads_stock_classes() {
    let p1 = page(1, &STOCK, &[&["张三", "1101 0119 9001 0112 34", "Ann", "10"]], true);
    let mut dom = SnapshotDom::from_pages([p1]);
    let o = opts(StrategyKind::Static, 500);
    let mut strategy = StaticColumns::new(o.columns.clone(), o.selectors.clone());

    let out = extract_all(&mut dom, &mut strategy, &o, None).unwrap();

    assert_eq!(out.records.len(), 1);
    assert_eq!(out.records[0].name, "张三");
    assert_eq!(out.records[0].identifier, "1101 0119 9001 0112 34");
}

#[test]
fn extra_columns_are_carried_by_label() {
    let p1 = page(1, &STOCK, &[&["张三", "110101199001011234", "Ann", "1,200"]], true);
    let mut dom = SnapshotDom::from_pages([p1]);
    let mut o = opts(StrategyKind::Header, 500);
    o.columns.extras.push(("Amount".into(), "金额".into()));
    o.columns.extras.push(("Missing".into(), "不存在".into()));
    let mut strategy = HeaderColumns::new(o.columns.clone(), o.selectors.clone());

    let out = extract_all(&mut dom, &mut strategy, &o, None).unwrap();

    assert_eq!(
        out.records[0].extras,
        vec![("Amount".to_string(), "1,200".to_string()), ("Missing".to_string(), String::new())]
    );
}

#[test]
fn header_without_identity_columns_reads_nothing() {
    let cols = [col("Other", "el-table_2_column_1"), col("Thing", "el-table_2_column_2")];
    let p1 = page(1, &cols, &[&["a", "1"]], true);
    let mut dom = SnapshotDom::from_pages([p1]);
    let o = opts(StrategyKind::Header, 500);
    let mut strategy = HeaderColumns::new(o.columns.clone(), o.selectors.clone());

    strategy.begin_page(&mut dom).unwrap();
    assert!(strategy.resolved().is_empty());

    let out = extract_all(&mut dom, &mut strategy, &o, None).unwrap();
    assert!(out.records.is_empty());
    assert_eq!(out.dropped_rows, 1);
}

#[test]
fn click_moves_forward_and_stales_old_handles() {
    let p1 = page(2, &STOCK, &[&["张三", "1", "Ann", ""]], false);
    let p2 = page(2, &STOCK, &[&["李四", "2", "Bob", ""]], true);
    let mut dom = SnapshotDom::from_pages([p1, p2]);

    let row = dom.query_first("tr.el-table__row").unwrap().unwrap();
    assert_eq!(dom.text_in(&row, "td.el-table_2_column_8 .cell").unwrap(), "张三");

    let next = dom.query_first(".btn-next").unwrap().unwrap();
    assert_eq!(dom.attribute(&next, "disabled").unwrap(), None);
    dom.click(&next).unwrap();
    assert_eq!(dom.current_page(), 1);

    assert!(matches!(dom.text(&row), Err(DomError::Stale(_))));

    // last page: click is a no-op
    let next = dom.query_first(".btn-next").unwrap().unwrap();
    assert_eq!(dom.attribute(&next, "disabled").unwrap().as_deref(), Some("disabled"));
    dom.click(&next).unwrap();
    assert_eq!(dom.current_page(), 1);
}

#[test]
fn bad_selector_is_reported() {
    let mut dom = SnapshotDom::from_pages([page(0, &STOCK, &[], true)]);
    assert!(matches!(dom.query_all("tr[[["), Err(DomError::InvalidSelector(_))));
}

#[test]
fn open_dir_orders_pages_by_number() {
    let dir = tmp_dir("snap_order");
    fs::write(dir.join("page_10.html"), page(3, &STOCK, &[&["C", "3", "", ""]], true)).unwrap();
    fs::write(dir.join("page_2.html"), page(3, &STOCK, &[&["B", "2", "", ""]], false)).unwrap();
    fs::write(dir.join("page_1.htm"), page(3, &STOCK, &[&["A", "1", "", ""]], false)).unwrap();
    fs::write(dir.join("notes.txt"), "ignored").unwrap();

    let mut dom = SnapshotDom::open_dir(&dir).unwrap();
    assert_eq!(dom.page_count(), 3);

    let o = opts(StrategyKind::Static, 1);
    let mut strategy = StaticColumns::new(o.columns.clone(), o.selectors.clone());
    let out = extract_all(&mut dom, &mut strategy, &o, None).unwrap();
    let names: Vec<&str> = out.records.iter().map(|r| r.name.as_str()).collect();
    assert_eq!(names, vec!["A", "B", "C"]);
}

#[test]
fn open_dir_without_pages_fails() {
    let dir = tmp_dir("snap_empty");
    assert!(matches!(SnapshotDom::open_dir(&dir), Err(DomError::Snapshot(_))));
}
