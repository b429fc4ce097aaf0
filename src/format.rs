//! Display formatting for the result panel.

/// Playback length as shown next to the metadata, e.g. 125 -> "2분 5초".
pub fn duration_text(seconds: u64) -> String {
    format!("{}분 {}초", seconds / 60, seconds % 60)
}

/// File size label for a format row, e.g. 15728640 -> "15.0MB".
///
/// Always labeled in MB with one decimal, whatever the magnitude.
pub fn filesize_text(bytes: u64) -> String {
    format!("{:.1}MB", bytes as f64 / 1024.0 / 1024.0)
}

/// File name offered in the save dialog, derived from the video title and
/// the chosen quality. Path separators and other characters that upset
/// file systems are replaced.
pub fn suggested_file_name(title: &str, quality: Option<&str>) -> String {
    let base: String = title
        .chars()
        .map(|c| match c {
            '/' | '\\' | ':' | '*' | '?' | '"' | '<' | '>' | '|' => '_',
            other => other,
        })
        .collect();
    match quality {
        Some(quality) => format!("{} [{}].mp4", base.trim(), quality),
        None => format!("{}.mp4", base.trim()),
    }
}
