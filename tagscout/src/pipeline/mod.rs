//! Pipeline stages and the context that carries stage outputs
//!
//! The original interactive tool cached each stage's output in session
//! state; here the equivalent is an explicit [`PipelineContext`] the caller
//! threads through the stage calls. No globals.

pub mod stages;

use crate::models::RecordSet;

/// Stage outputs, addressed by name. Each field is `None` until the
/// corresponding stage has run.
#[derive(Debug, Default, Clone)]
pub struct PipelineContext {
    /// Fetched, recency-filtered, popularity-sorted rows
    pub scraped: Option<RecordSet>,
    /// Licensed-music side of the split
    pub music: Option<RecordSet>,
    /// Original-sound side of the split
    pub original: Option<RecordSet>,
    /// Music rows after catalog enrichment
    pub enriched: Option<RecordSet>,
    /// Enriched rows with no recognized label
    pub unsigned: Option<RecordSet>,
}

impl PipelineContext {
    pub fn new() -> Self {
        Self::default()
    }
}
