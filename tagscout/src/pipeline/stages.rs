//! Pure pipeline stages
//!
//! Each stage consumes one record set and produces new ones. Stages assume
//! well-formed rows; a missing optional field is data, not a fault, so
//! nothing here has an error path.

use crate::models::{RecordSet, VideoRow};
use chrono::{DateTime, Utc};
use tagscout_common::time::recency_cutoff;

/// Label values that do not identify a rights holder
const UNSIGNED_PLACEHOLDERS: &[&str] = &["unknown", "n/a", "none"];

/// Keep rows uploaded within the trailing window ending at `now`.
///
/// `now` is injected by the caller, never read here. Rows without a parsed
/// upload date are excluded: recency cannot be asserted for them. Relative
/// order of survivors is preserved.
pub fn filter_recent(rows: RecordSet, window_weeks: i64, now: DateTime<Utc>) -> RecordSet {
    let cutoff = recency_cutoff(now, window_weeks);
    rows.into_iter()
        .filter(|row| matches!(row.create_time, Some(date) if date >= cutoff))
        .collect()
}

/// Stable descending sort on view count. Ties keep their input order.
pub fn sort_by_play_count(mut rows: RecordSet) -> RecordSet {
    rows.sort_by(|a, b| b.play_count.cmp(&a.play_count));
    rows
}

/// Partition rows into (licensed music, original sounds).
///
/// A row is an original sound iff its music name contains
/// "original sound" case-insensitively. A row without a music name is a
/// music row. Exhaustive and disjoint; order preserved within each side.
pub fn split_music_and_original(rows: RecordSet) -> (RecordSet, RecordSet) {
    rows.into_iter().partition(|row| !is_original_sound(row))
}

fn is_original_sound(row: &VideoRow) -> bool {
    row.music
        .as_deref()
        .map(|name| name.to_lowercase().contains("original sound"))
        .unwrap_or(false)
}

/// Keep rows whose label is absent, empty, or an unrecognized placeholder.
pub fn filter_unsigned(rows: RecordSet) -> RecordSet {
    rows.into_iter()
        .filter(|row| is_unsigned(row.label.as_deref()))
        .collect()
}

fn is_unsigned(label: Option<&str>) -> bool {
    match label {
        None => true,
        Some(value) => {
            let trimmed = value.trim();
            trimmed.is_empty()
                || UNSIGNED_PLACEHOLDERS.contains(&trimmed.to_ascii_lowercase().as_str())
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::NaiveDate;

    fn row(id: &str) -> VideoRow {
        VideoRow {
            id: id.to_string(),
            ..VideoRow::default()
        }
    }

    fn dated(id: &str, y: i32, m: u32, d: u32) -> VideoRow {
        VideoRow {
            create_time: NaiveDate::from_ymd_opt(y, m, d),
            ..row(id)
        }
    }

    fn with_music(id: &str, music: Option<&str>) -> VideoRow {
        VideoRow {
            music: music.map(str::to_string),
            ..row(id)
        }
    }

    fn now() -> DateTime<Utc> {
        DateTime::parse_from_rfc3339("2024-03-01T12:00:00Z")
            .unwrap()
            .with_timezone(&Utc)
    }

    #[test]
    fn recent_rows_survive_old_rows_drop() {
        let rows = vec![
            dated("fresh", 2024, 2, 25),
            dated("stale", 2023, 11, 1),
            dated("edge", 2024, 1, 19), // exactly 42 days before now
        ];
        let kept = filter_recent(rows, 6, now());
        let ids: Vec<&str> = kept.iter().map(|r| r.id.as_str()).collect();
        assert_eq!(ids, vec!["fresh", "edge"]);
    }

    #[test]
    fn rows_without_dates_are_excluded() {
        let rows = vec![row("undated"), dated("fresh", 2024, 2, 25)];
        let kept = filter_recent(rows, 6, now());
        assert_eq!(kept.len(), 1);
        assert_eq!(kept[0].id, "fresh");
    }

    #[test]
    fn filter_recent_output_is_subset_preserving_order() {
        let rows = vec![
            dated("a", 2024, 2, 1),
            dated("b", 2024, 2, 10),
            dated("c", 2024, 2, 20),
        ];
        let kept = filter_recent(rows.clone(), 6, now());
        assert_eq!(kept, rows);
    }

    #[test]
    fn sort_is_descending() {
        let mut rows = vec![row("low"), row("high"), row("mid")];
        rows[0].play_count = 10;
        rows[1].play_count = 1000;
        rows[2].play_count = 100;

        let sorted = sort_by_play_count(rows);
        let counts: Vec<u64> = sorted.iter().map(|r| r.play_count).collect();
        assert_eq!(counts, vec![1000, 100, 10]);
    }

    #[test]
    fn sort_is_stable_on_ties() {
        let mut rows = vec![row("first"), row("second"), row("third")];
        rows[0].play_count = 50;
        rows[1].play_count = 50;
        rows[2].play_count = 50;

        let sorted = sort_by_play_count(rows);
        let ids: Vec<&str> = sorted.iter().map(|r| r.id.as_str()).collect();
        assert_eq!(ids, vec!["first", "second", "third"]);
    }

    #[test]
    fn split_is_exhaustive_and_disjoint() {
        let rows = vec![
            with_music("licensed", Some("Midnight Drive")),
            with_music("original", Some("Original Sound - user123")),
            with_music("no_music", None),
            with_music("mixed_case", Some("ORIGINAL SOUND remix")),
        ];
        let total = rows.len();

        let (music, original) = split_music_and_original(rows);
        assert_eq!(music.len() + original.len(), total);

        let music_ids: Vec<&str> = music.iter().map(|r| r.id.as_str()).collect();
        let original_ids: Vec<&str> = original.iter().map(|r| r.id.as_str()).collect();
        assert_eq!(music_ids, vec!["licensed", "no_music"]);
        assert_eq!(original_ids, vec!["original", "mixed_case"]);
    }

    #[test]
    fn absent_music_does_not_count_as_original_sound() {
        let (music, original) = split_music_and_original(vec![with_music("x", None)]);
        assert_eq!(music.len(), 1);
        assert!(original.is_empty());
    }

    #[test]
    fn unsigned_filter_keeps_unlabelled_rows() {
        let mk = |id: &str, label: Option<&str>| VideoRow {
            label: label.map(str::to_string),
            ..row(id)
        };
        let rows = vec![
            mk("absent", None),
            mk("empty", Some("")),
            mk("spaces", Some("   ")),
            mk("placeholder", Some("Unknown")),
            mk("na", Some("N/A")),
            mk("signed", Some("Big Label Records")),
        ];

        let unsigned = filter_unsigned(rows);
        let ids: Vec<&str> = unsigned.iter().map(|r| r.id.as_str()).collect();
        assert_eq!(ids, vec!["absent", "empty", "spaces", "placeholder", "na"]);
    }
}
