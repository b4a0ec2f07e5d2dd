//! Record normalizer
//!
//! Flattens one raw scrape record into a [`VideoRow`]. This is a total
//! function: any JSON value is accepted, including non-objects. A nested
//! sub-mapping that is missing or not an object yields `None` for every
//! field sourced from it. Counters default to 0 so they stay numerically
//! comparable downstream.

use crate::models::VideoRow;
use chrono::{DateTime, NaiveDate};
use serde_json::Value;

/// Normalize one raw record into a flat row. Never fails.
pub fn normalize(raw: &Value) -> VideoRow {
    VideoRow {
        author: nested_str(raw, "authorMeta", "name"),
        text: string_field(raw, "text"),
        id: string_field(raw, "id"),
        digg_count: counter(raw, "diggCount"),
        share_count: counter(raw, "shareCount"),
        play_count: counter(raw, "playCount"),
        comment_count: counter(raw, "commentCount"),
        duration_secs: nested(raw, "videoMeta")
            .and_then(|m| m.get("duration"))
            .and_then(Value::as_u64),
        music: nested_str(raw, "musicMeta", "musicName"),
        music_author: nested_str(raw, "musicMeta", "musicAuthor"),
        music_original: nested(raw, "musicMeta")
            .and_then(|m| m.get("musicOriginal"))
            .and_then(Value::as_bool),
        create_time: raw
            .get("createTimeISO")
            .and_then(Value::as_str)
            .and_then(parse_iso_date),
        video_url: string_field(raw, "webVideoUrl"),
        label: None,
    }
}

/// Nested sub-mapping accessor: present and an object, or `None`.
fn nested<'a>(raw: &'a Value, key: &str) -> Option<&'a Value> {
    raw.get(key).filter(|v| v.is_object())
}

fn nested_str(raw: &Value, outer: &str, inner: &str) -> Option<String> {
    nested(raw, outer)
        .and_then(|m| m.get(inner))
        .and_then(Value::as_str)
        .map(str::to_string)
}

/// Top-level string field; numeric identifiers are accepted as their
/// decimal rendering, anything else is empty.
fn string_field(raw: &Value, key: &str) -> String {
    match raw.get(key) {
        Some(Value::String(s)) => s.clone(),
        Some(Value::Number(n)) => n.to_string(),
        _ => String::new(),
    }
}

/// Top-level counter; absent, negative, or non-integer values become 0.
fn counter(raw: &Value, key: &str) -> u64 {
    raw.get(key).and_then(Value::as_u64).unwrap_or(0)
}

/// Parse an RFC 3339 timestamp to a calendar date; unparsable input is
/// dropped, never an error.
fn parse_iso_date(s: &str) -> Option<NaiveDate> {
    DateTime::parse_from_rfc3339(s).ok().map(|dt| dt.date_naive())
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn full_record_flattens() {
        let raw = json!({
            "id": "7234",
            "text": "new track out now",
            "webVideoUrl": "https://example.com/v/7234",
            "diggCount": 10,
            "shareCount": 2,
            "playCount": 1500,
            "commentCount": 7,
            "createTimeISO": "2024-02-20T08:30:00.000Z",
            "authorMeta": { "name": "dj_example" },
            "videoMeta": { "duration": 34 },
            "musicMeta": {
                "musicName": "Midnight Drive",
                "musicAuthor": "Some Artist",
                "musicOriginal": false
            }
        });

        let row = normalize(&raw);
        assert_eq!(row.author.as_deref(), Some("dj_example"));
        assert_eq!(row.text, "new track out now");
        assert_eq!(row.id, "7234");
        assert_eq!(row.play_count, 1500);
        assert_eq!(row.duration_secs, Some(34));
        assert_eq!(row.music.as_deref(), Some("Midnight Drive"));
        assert_eq!(row.music_author.as_deref(), Some("Some Artist"));
        assert_eq!(row.music_original, Some(false));
        assert_eq!(
            row.create_time,
            NaiveDate::from_ymd_opt(2024, 2, 20)
        );
        assert_eq!(row.video_url, "https://example.com/v/7234");
        assert!(row.label.is_none());
    }

    #[test]
    fn missing_music_meta_yields_all_three_absent() {
        let raw = json!({ "id": "1", "text": "hi" });
        let row = normalize(&raw);
        assert!(row.music.is_none());
        assert!(row.music_author.is_none());
        assert!(row.music_original.is_none());
    }

    #[test]
    fn non_object_music_meta_is_treated_as_absent() {
        let raw = json!({ "musicMeta": "not an object" });
        let row = normalize(&raw);
        assert!(row.music.is_none());
        assert!(row.music_author.is_none());
        assert!(row.music_original.is_none());
    }

    #[test]
    fn counters_default_to_zero() {
        let raw = json!({ "id": "1" });
        let row = normalize(&raw);
        assert_eq!(row.digg_count, 0);
        assert_eq!(row.share_count, 0);
        assert_eq!(row.play_count, 0);
        assert_eq!(row.comment_count, 0);
    }

    #[test]
    fn negative_and_fractional_counters_become_zero() {
        let raw = json!({ "playCount": -5, "diggCount": 1.5 });
        let row = normalize(&raw);
        assert_eq!(row.play_count, 0);
        assert_eq!(row.digg_count, 0);
    }

    #[test]
    fn unparsable_timestamp_is_dropped() {
        let raw = json!({ "createTimeISO": "yesterday-ish" });
        assert!(normalize(&raw).create_time.is_none());
    }

    #[test]
    fn numeric_id_is_rendered_as_text() {
        let raw = json!({ "id": 7234001122i64, "text": 5 });
        let row = normalize(&raw);
        assert_eq!(row.id, "7234001122");
        assert_eq!(row.text, "5");
    }

    #[test]
    fn never_panics_on_non_object_input() {
        for raw in [
            json!(null),
            json!(42),
            json!("just a string"),
            json!([1, 2, 3]),
            json!({ "authorMeta": null, "videoMeta": [], "musicMeta": 7 }),
        ] {
            let row = normalize(&raw);
            assert!(row.author.is_none());
            assert_eq!(row.play_count, 0);
        }
    }

    #[test]
    fn original_sound_scenario() {
        let raw = json!({
            "musicMeta": { "musicName": "Original sound - user123" },
            "text": "hi"
        });
        let row = normalize(&raw);
        assert_eq!(row.music.as_deref(), Some("Original sound - user123"));
        assert_eq!(row.text, "hi");
    }
}
