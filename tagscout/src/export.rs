//! CSV export of record sets
//!
//! Header names match the normalized row's display names. Absent optional
//! fields serialize as empty cells; dates as YYYY-MM-DD.

use crate::models::VideoRow;
use std::path::Path;
use tagscout_common::csv;

/// Export column order
pub const CSV_HEADER: [&str; 14] = [
    "Author",
    "Text",
    "id",
    "diggCount",
    "shareCount",
    "playCount",
    "commentCount",
    "Duration (seconds)",
    "Music",
    "Music author",
    "Music original?",
    "Create Time",
    "video_url",
    "Label",
];

fn header_row() -> Vec<String> {
    CSV_HEADER.iter().map(|s| s.to_string()).collect()
}

/// One export row, in [`CSV_HEADER`] order.
pub fn csv_row(row: &VideoRow) -> Vec<String> {
    vec![
        row.author.clone().unwrap_or_default(),
        row.text.clone(),
        row.id.clone(),
        row.digg_count.to_string(),
        row.share_count.to_string(),
        row.play_count.to_string(),
        row.comment_count.to_string(),
        row.duration_secs.map(|d| d.to_string()).unwrap_or_default(),
        row.music.clone().unwrap_or_default(),
        row.music_author.clone().unwrap_or_default(),
        row.music_original
            .map(|b| b.to_string())
            .unwrap_or_default(),
        row.create_time.map(|d| d.to_string()).unwrap_or_default(),
        row.video_url.clone(),
        row.label.clone().unwrap_or_default(),
    ]
}

/// Serialize rows (with header) to CSV text.
pub fn to_csv_string(rows: &[VideoRow]) -> String {
    let data: Vec<Vec<String>> = rows.iter().map(csv_row).collect();
    csv::rows_to_string(&data, &Some(header_row()), ',')
}

/// Parse CSV text back to raw cells (round-trip verification helper).
pub fn parse_csv_string(text: &str) -> Vec<Vec<String>> {
    csv::parse_rows(text, ',')
}

/// Write rows to a CSV file.
pub fn write_csv_file(path: &Path, rows: &[VideoRow]) -> tagscout_common::Result<()> {
    std::fs::write(path, to_csv_string(rows))?;
    Ok(())
}
