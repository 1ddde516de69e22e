// tests/pagination.rs
//
// Extractor against a scripted in-memory table.

use std::collections::HashMap;

use tablematch::config::consts::{ASSIGNEE_COLUMN, ID_COLUMN, NAME_COLUMN, NEXT_SELECTOR, ROW_SELECTOR, TOTAL_SELECTORS};
use tablematch::config::options::{ExtractOptions, RetryPolicy, StrategyKind, TotalFallback};
use tablematch::dom::{DomError, Element, TableDom};
use tablematch::error::RunError;
use tablematch::extract::{extract_all, total_pages, StaticColumns};
use tablematch::progress::Progress;

type Row = (&'static str, &'static str, &'static str);

struct ScriptedDom {
    pages: Vec<Vec<Row>>,
    current: usize,
    total_text: Option<String>,
    /// page index → number of row queries that come back empty
    flaky: HashMap<usize, usize>,
    broken_next: bool,
    /// clicks that fail as if a loading mask covered the button
    intercepted: usize,
    clicks: usize,
    row_queries: usize,
}

impl ScriptedDom {
    fn new(pages: Vec<Vec<Row>>) -> Self {
        let total: usize = pages.iter().map(Vec::len).sum();
        Self {
            pages,
            current: 0,
            total_text: Some(format!("共 {total} 条")),
            flaky: HashMap::new(),
            broken_next: false,
            intercepted: 0,
            clicks: 0,
            row_queries: 0,
        }
    }

    fn cell(&self, page: usize, row: usize, col: &str) -> String {
        let (name, id, assignee) = self.pages[page][row];
        match col {
            "name" => name.into(),
            "id" => id.into(),
            _ => assignee.into(),
        }
    }
}

impl TableDom for ScriptedDom {
    fn query_all(&mut self, selector: &str) -> Result<Vec<Element>, DomError> {
        if selector == ROW_SELECTOR {
            self.row_queries += 1;
            if let Some(n) = self.flaky.get_mut(&self.current) {
                if *n > 0 {
                    *n -= 1;
                    return Ok(Vec::new());
                }
            }
            let rows = self.pages.get(self.current).map(Vec::len).unwrap_or(0);
            return Ok((0..rows).map(|i| Element::new(format!("row:{}:{i}", self.current))).collect());
        }
        if selector == TOTAL_SELECTORS[0] && self.total_text.is_some() {
            return Ok(vec![Element::new("total")]);
        }
        if selector == NEXT_SELECTOR {
            return Ok(vec![Element::new("next")]);
        }
        Ok(Vec::new())
    }

    fn query_in(&mut self, parent: &Element, selector: &str) -> Result<Vec<Element>, DomError> {
        let col = if selector.contains(NAME_COLUMN) {
            "name"
        } else if selector.contains(ID_COLUMN) {
            "id"
        } else if selector.contains(ASSIGNEE_COLUMN) {
            "assignee"
        } else {
            return Ok(Vec::new());
        };
        let rest = parent.id().strip_prefix("row:").ok_or_else(|| DomError::Stale(parent.id().into()))?;
        Ok(vec![Element::new(format!("cell:{rest}:{col}"))])
    }

    fn text(&mut self, el: &Element) -> Result<String, DomError> {
        if el.id() == "total" {
            return Ok(self.total_text.clone().unwrap_or_default());
        }
        let parts: Vec<&str> = el.id().split(':').collect();
        match parts.as_slice() {
            ["cell", page, row, col] => {
                let page: usize = page.parse().unwrap();
                if page != self.current {
                    return Err(DomError::Stale(el.id().into()));
                }
                Ok(self.cell(page, row.parse().unwrap(), col))
            }
            _ => Ok(String::new()),
        }
    }

    fn attribute(&mut self, el: &Element, name: &str) -> Result<Option<String>, DomError> {
        let last = self.current + 1 >= self.pages.len();
        Ok((el.id() == "next" && name == "disabled" && last).then(|| "disabled".to_string()))
    }

    fn click(&mut self, _el: &Element) -> Result<(), DomError> {
        if self.broken_next {
            return Err(DomError::Transport("connection reset".into()));
        }
        if self.intercepted > 0 {
            self.intercepted -= 1;
            return Err(DomError::Driver {
                error: "element click intercepted".into(),
                message: "loading mask".into(),
            });
        }
        self.clicks += 1;
        if self.current + 1 < self.pages.len() {
            self.current += 1;
        }
        Ok(())
    }
}

#[derive(Default)]
struct Recorder {
    begun: Option<usize>,
    pages: Vec<(usize, usize)>,
    finished: bool,
}

impl Progress for Recorder {
    fn begin(&mut self, total_pages: usize) { self.begun = Some(total_pages); }
    fn page_done(&mut self, page: usize, rows: usize) { self.pages.push((page, rows)); }
    fn finish(&mut self) { self.finished = true; }
}

fn opts(page_size: usize) -> ExtractOptions {
    let mut o = ExtractOptions::default().without_delays();
    o.set_strategy(StrategyKind::Static);
    o.page_size = page_size;
    o
}

fn three_pages() -> Vec<Vec<Row>> {
    vec![
        vec![("张三", "110101199001011234", "Ann"), ("李四", "220202198802022345", "Bob")],
        vec![("王五", "330303197703033456", "Ann"), ("赵六", "440404196604044567", "")],
        vec![("钱七", "550505195505055678", "Bob"), ("孙八", "660606194406066789", "Ann")],
    ]
}

fn run(dom: &mut ScriptedDom, o: &ExtractOptions, progress: Option<&mut (dyn Progress + '_)>) -> Result<tablematch::extract::Extraction, RunError> {
    let mut strategy = StaticColumns::new(o.columns.clone(), o.selectors.clone());
    extract_all(dom, &mut strategy, o, progress)
}

#[test]
fn reads_every_page_until_next_is_disabled() {
    let mut dom = ScriptedDom::new(three_pages());
    let o = opts(2);
    let mut rec = Recorder::default();

    let out = run(&mut dom, &o, Some(&mut rec)).unwrap();

    assert_eq!(out.total_pages, 3);
    assert_eq!(out.pages_read, 3);
    assert_eq!(out.records.len(), 6);
    assert_eq!(out.records[0].name, "张三");
    assert_eq!(out.records[3].assignee, "");
    assert_eq!(dom.clicks, 2);
    assert_eq!(rec.begun, Some(3));
    assert_eq!(rec.pages, vec![(1, 2), (2, 2), (3, 2)]);
}

#[test]
fn total_uses_ceiling_division_and_commas() {
    let mut dom = ScriptedDom::new(three_pages());
    dom.total_text = Some("Total 1,001".into());
    assert_eq!(total_pages(&mut dom, &opts(500)).unwrap(), 3);

    dom.total_text = Some("共 0 条".into());
    assert_eq!(total_pages(&mut dom, &opts(500)).unwrap(), 0);
}

#[test]
fn ceiling_caps_the_page_loop() {
    let mut dom = ScriptedDom::new(three_pages());
    dom.total_text = Some("共 20 条".into());
    let mut o = opts(2);
    o.page_ceiling = 2;

    let out = run(&mut dom, &o, None).unwrap();

    assert_eq!(out.total_pages, 10);
    assert_eq!(out.pages_read, 2);
    assert_eq!(out.records.len(), 4);
    // no click once the last allowed page is read
    assert_eq!(dom.clicks, 1);
}

#[test]
fn page_that_times_out_once_is_read_exactly_once() {
    let mut dom = ScriptedDom::new(three_pages());
    dom.flaky.insert(1, 1);
    let o = opts(2);

    let out = run(&mut dom, &o, None).unwrap();

    assert_eq!(out.records.len(), 6);
    assert_eq!(out.retries, 1);
    assert!(out.skipped_pages.is_empty());
    let wangs = out.records.iter().filter(|r| r.name == "王五").count();
    assert_eq!(wangs, 1);
}

#[test]
fn exhausted_retries_skip_the_page_and_continue() {
    let mut dom = ScriptedDom::new(three_pages());
    dom.flaky.insert(1, 10);
    let mut o = opts(2);
    o.retry = RetryPolicy::Fixed { attempts: 3, pause: std::time::Duration::ZERO };
    let mut rec = Recorder::default();

    let out = run(&mut dom, &o, Some(&mut rec)).unwrap();

    assert_eq!(out.skipped_pages, vec![2]);
    assert_eq!(out.pages_read, 2);
    assert_eq!(out.records.len(), 4);
    assert_eq!(out.retries, 2);
    assert_eq!(rec.pages, vec![(1, 2), (2, 0), (3, 2)]);
}

#[test]
fn retry_off_gives_one_attempt() {
    let mut dom = ScriptedDom::new(three_pages());
    dom.flaky.insert(0, 1);
    let mut o = opts(2);
    o.retry = RetryPolicy::Off;

    let out = run(&mut dom, &o, None).unwrap();
    assert_eq!(out.skipped_pages, vec![1]);
    assert_eq!(out.records.len(), 4);
}

#[test]
fn unreadable_total_uses_fallback() {
    let mut dom = ScriptedDom::new(three_pages());
    dom.total_text = None;
    let mut o = opts(2);

    let out = run(&mut dom, &o, None).unwrap();
    assert_eq!(out.total_pages, 1);
    assert_eq!(out.records.len(), 2);
    assert_eq!(dom.clicks, 0);

    let mut dom = ScriptedDom::new(three_pages());
    dom.total_text = None;
    o.total_fallback = TotalFallback::NoPages;
    let out = run(&mut dom, &o, None).unwrap();
    assert!(out.records.is_empty());
    assert_eq!(dom.row_queries, 0);
}

#[test]
fn disabled_next_ends_before_announced_total() {
    let mut dom = ScriptedDom::new(three_pages()[..2].to_vec());
    dom.total_text = Some("共 10 条".into());

    let out = run(&mut dom, &opts(2), None).unwrap();
    assert_eq!(out.total_pages, 5);
    assert_eq!(out.pages_read, 2);
    assert_eq!(out.records.len(), 4);
}

#[test]
fn rows_without_identity_are_dropped() {
    let mut dom = ScriptedDom::new(vec![vec![
        ("张三", "110101199001011234", "Ann"),
        ("", "220202198802022345", "Ann"),
        ("王五", "—", "Ann"),
    ]]);

    let out = run(&mut dom, &opts(500), None).unwrap();
    assert_eq!(out.records.len(), 1);
    assert_eq!(out.dropped_rows, 2);
}

#[test]
fn transport_failure_on_advance_is_fatal() {
    let mut dom = ScriptedDom::new(three_pages());
    dom.broken_next = true;

    let res = run(&mut dom, &opts(2), None);
    assert!(matches!(res, Err(RunError::Dom(DomError::Transport(_)))));
}

#[test]
fn intercepted_click_is_retried() {
    let mut dom = ScriptedDom::new(three_pages());
    dom.intercepted = 1;

    let out = run(&mut dom, &opts(2), None).unwrap();

    assert_eq!(out.pages_read, 3);
    assert_eq!(out.records.len(), 6);
    assert_eq!(out.retries, 1);
    assert_eq!(dom.clicks, 2);
}

#[test]
fn stuck_next_keeps_pages_already_read() {
    let mut dom = ScriptedDom::new(three_pages());
    dom.intercepted = usize::MAX;
    let mut o = opts(2);
    o.retry = RetryPolicy::Fixed { attempts: 3, pause: std::time::Duration::ZERO };

    let out = run(&mut dom, &o, None).unwrap();

    assert_eq!(out.pages_read, 1);
    assert_eq!(out.records.len(), 2);
    assert_eq!(out.records[1].name, "李四");
    assert_eq!(dom.clicks, 0);
}
