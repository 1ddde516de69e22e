// src/config/consts.rs

// Local log
pub const LOG_FILE: &str = ".store/debug.log";

// WebDriver
pub const DEFAULT_WEBDRIVER: &str = "http://localhost:9515";
pub const DEFAULT_BROWSER: &str = "chrome";
pub const DRIVER_READY_TIMEOUT_MS: u64 = 15_000;
pub const DRIVER_POLL_MS: u64 = 250;
pub const DRIVER_HTTP_TIMEOUT_MS: u64 = 30_000;

// Table selectors (Element UI tables)
pub const ROW_SELECTOR: &str = "tr.el-table__row";
pub const HEADER_CELL_SELECTOR: &str = "thead tr th";
pub const TOTAL_SELECTORS: &[&str] = &[".el-pagination__total", ".pagination-total"];
pub const NEXT_SELECTOR: &str = ".btn-next";
pub const CELL_TEMPLATE: &str = "td.{column} .cell";
pub const COLUMN_CLASS_PREFIX: &str = "el-table_";
pub const COLUMN_CLASS_MARKER: &str = "column_";

// Default column map (static strategy: column classes; header strategy: header text)
pub const NAME_COLUMN: &str = "el-table_2_column_8";
pub const ID_COLUMN: &str = "el-table_2_column_9";
pub const ASSIGNEE_COLUMN: &str = "el-table_2_column_20";
pub const NAME_HEADER: &str = "姓名";
pub const ID_HEADER: &str = "证件号";
pub const ASSIGNEE_HEADER: &str = "CPE";

// Pagination
pub const PAGE_SIZE: usize = 500;
pub const PAGE_CEILING: usize = 1_000;
pub const PAGE_DELAY_MS: u64 = 2_000;
pub const PAGE_JITTER_MS: u64 = 1_000;
pub const ROW_WAIT_TIMEOUT_MS: u64 = 15_000;
pub const ROW_POLL_MS: u64 = 100;
pub const MAX_RETRIES: u32 = 5;
pub const RETRY_PAUSE_MS: u64 = 2_000;

// Matching
pub const KEY_DELIMITER: char = '|';
pub const UNASSIGNED_LABEL: &str = "unassigned";
pub const UNCLAIMED_LOG_LIMIT: usize = 10;

// Export
pub const DEFAULT_OUT_DIR: &str = "out";
pub const ZIP_PREFIX: &str = "assignee_data";
pub const ENTRY_EXT: &str = "csv";
pub const BOM: char = '\u{FEFF}';
