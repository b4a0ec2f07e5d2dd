//! Normalized video row
//!
//! One flat row per scraped video. The raw service records have no fixed
//! schema; every field that comes out of a nested sub-mapping is optional
//! and defaults to `None` rather than failing normalization.

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

/// An ordered set of normalized rows. Insertion order is arrival order from
/// the scrape service; downstream stages re-sort by popularity.
pub type RecordSet = Vec<VideoRow>;

/// One normalized video record
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct VideoRow {
    /// Creator display name (from nested author metadata)
    pub author: Option<String>,
    /// Video caption
    pub text: String,
    /// Platform video identifier
    pub id: String,
    /// Like count
    pub digg_count: u64,
    /// Share count
    pub share_count: u64,
    /// View count (popularity sort key)
    pub play_count: u64,
    /// Comment count
    pub comment_count: u64,
    /// Video duration in seconds (from nested video metadata)
    pub duration_secs: Option<u64>,
    /// Sound/track name (from nested music metadata)
    pub music: Option<String>,
    /// Sound/track author (from nested music metadata)
    pub music_author: Option<String>,
    /// Whether the sound is the creator's own recording
    pub music_original: Option<bool>,
    /// Upload date, parsed from the record's ISO timestamp
    pub create_time: Option<NaiveDate>,
    /// Public video URL
    pub video_url: String,
    /// Rights-holder label, attached by the enrichment stage
    pub label: Option<String>,
}
