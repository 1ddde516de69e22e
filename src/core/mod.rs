// src/core/mod.rs

pub mod key;
pub mod sanitize;

pub use key::{CompositeKey, KeyPolicy};
