// tests/common/mod.rs
//
// Saved-page builder shaped like an Element UI table.
#![allow(dead_code)]

use std::fs;
use std::path::PathBuf;

pub struct Col<'a> {
    pub caption: &'a str,
    pub class: &'a str,
}

pub const fn col<'a>(caption: &'a str, class: &'a str) -> Col<'a> {
    Col { caption, class }
}

/// Default layout: name / id / assignee at the stock column classes, plus an amount column.
pub const STOCK: [Col<'static>; 4] = [
    col("姓名", "el-table_2_column_8"),
    col("证件号", "el-table_2_column_9"),
    col("CPE", "el-table_2_column_20"),
    col("金额", "el-table_2_column_21"),
];

pub fn page(total: usize, cols: &[Col<'_>], rows: &[&[&str]], last: bool) -> String {
    let mut h = String::from("<html><body><div class=\"el-table\"><table><thead><tr>");
    for c in cols {
        h.push_str(&format!("<th class=\"{} is-leaf\"><div class=\"cell\">{}</div></th>", c.class, c.caption));
    }
    h.push_str("</tr></thead></table><table><tbody>");
    for r in rows {
        h.push_str("<tr class=\"el-table__row\">");
        for (c, v) in cols.iter().zip(r.iter()) {
            h.push_str(&format!("<td class=\"{}\"><div class=\"cell\"> {} </div></td>", c.class, v));
        }
        h.push_str("</tr>");
    }
    h.push_str("</tbody></table></div>");
    h.push_str(&format!("<div class=\"el-pagination\"><span class=\"el-pagination__total\">共 {total} 条</span>"));
    if last {
        h.push_str("<button type=\"button\" class=\"btn-next\" disabled=\"disabled\">next</button>");
    } else {
        h.push_str("<button type=\"button\" class=\"btn-next\">next</button>");
    }
    h.push_str("</div></body></html>");
    h
}

pub fn tmp_dir(name: &str) -> PathBuf {
    let mut p = std::env::temp_dir();
    p.push(format!("tablematch_{}", name));
    let _ = fs::remove_dir_all(&p);
    fs::create_dir_all(&p).unwrap();
    p
}

pub fn grid(rows: &[&[&str]]) -> Vec<Vec<String>> {
    rows.iter().map(|r| r.iter().map(|c| c.to_string()).collect()).collect()
}
