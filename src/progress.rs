// src/progress.rs
/// Lightweight progress reporting used by the long-running stages.
/// Frontends (GUI/CLI) implement this to surface status to users.
pub trait Progress {
    /// Called when the page count is known.
    fn begin(&mut self, _total_pages: usize) {}

    /// Free-form status line for human eyes.
    fn log(&mut self, _msg: &str) {}

    /// One page was read (or given up on, with `rows == 0`).
    fn page_done(&mut self, _page: usize, _rows: usize) {}

    /// Called at the end, successful or not.
    fn finish(&mut self) {}
}
