//! Data models for the discovery pipeline

pub mod row;

pub use row::{RecordSet, VideoRow};
