//! tagscout library interface
//!
//! Hashtag sound discovery pipeline: scrape short-video metadata for a
//! hashtag, normalize the nested records into flat rows, filter by recency,
//! sort by views, split licensed music from original sounds, enrich the
//! music side with catalog labels, and keep the unsigned tracks.

pub mod export;
pub mod models;
pub mod pipeline;
pub mod services;

pub use models::{RecordSet, VideoRow};
pub use pipeline::PipelineContext;
