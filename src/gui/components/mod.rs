// src/gui/components/mod.rs
pub mod notice;
pub mod options_panel;
pub mod report_view;
pub mod run_bar;
