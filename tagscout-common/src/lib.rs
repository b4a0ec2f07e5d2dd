//! # tagscout common library
//!
//! Shared code for the tagscout pipeline:
//! - Error type used across crates
//! - Settings loading (ENV → TOML priority)
//! - Timestamp helpers
//! - CSV read/write helpers

pub mod config;
pub mod csv;
pub mod error;
pub mod time;

pub use error::{Error, Result};
