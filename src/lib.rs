// src/lib.rs

#[macro_use]
pub mod macros;
#[macro_use]
pub mod log;

pub mod config;
pub mod core;
pub mod error;

pub mod dom;
pub mod extract;
pub mod reference;
pub mod matcher;

pub mod archive;
pub mod csv;
pub mod file;

pub mod progress;
pub mod runner;

pub mod cli;
pub mod gui;
