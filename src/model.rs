use serde::Deserialize;
use std::path::PathBuf;

/// Shown when the backend omits a video title
pub const FALLBACK_TITLE: &str = "제목 없음";
/// Shown when the backend omits the uploader name
pub const FALLBACK_UPLOADER: &str = "알 수 없음";
/// Shown when the extraction call itself fails (network, bad response)
pub const CONNECTION_ERROR: &str = "서버 연결 오류가 발생했습니다.";
/// Shown when the backend reports failure without an error message
pub const UNKNOWN_ERROR: &str = "알 수 없는 오류가 발생했습니다.";

/// One quality variant of the extracted video.
#[derive(Debug, Clone, Deserialize)]
pub struct VideoFormat {
    /// Quality label, e.g. "720p"
    pub quality: String,
    /// Direct download URL for this variant
    pub url: String,
    /// File size in bytes, when the backend knows it
    pub filesize: Option<u64>,
}

/// The backend's answer to one extraction request.
///
/// Held only in view state; every submission outcome replaces the previous
/// value wholesale. `success` discriminates the two render branches, the
/// rest of the fields are best-effort and render with placeholders when
/// absent.
#[derive(Debug, Clone, Deserialize)]
pub struct ExtractionResult {
    pub success: bool,
    pub title: Option<String>,
    pub uploader: Option<String>,
    /// Playback length in whole seconds
    pub duration: Option<u64>,
    /// Thumbnail image URL
    pub thumbnail: Option<String>,
    /// Primary download URL
    pub stream_url: Option<String>,
    pub formats: Option<Vec<VideoFormat>>,
    /// Backend-supplied message, meaningful when `success` is false
    pub error: Option<String>,
}

impl ExtractionResult {
    /// Synthetic failure result carrying a fixed message, used when the
    /// request never produced a decodable backend answer.
    pub fn failure(message: impl Into<String>) -> Self {
        Self {
            success: false,
            title: None,
            uploader: None,
            duration: None,
            thumbnail: None,
            stream_url: None,
            formats: None,
            error: Some(message.into()),
        }
    }

    pub fn title_text(&self) -> &str {
        self.title.as_deref().unwrap_or(FALLBACK_TITLE)
    }

    pub fn uploader_text(&self) -> &str {
        self.uploader.as_deref().unwrap_or(FALLBACK_UPLOADER)
    }

    /// Message for the error panel, falling back to the fixed default.
    pub fn error_text(&self) -> &str {
        self.error.as_deref().unwrap_or(UNKNOWN_ERROR)
    }

    /// Quality variants, empty slice when the backend sent none.
    pub fn format_list(&self) -> &[VideoFormat] {
        self.formats.as_deref().unwrap_or_default()
    }
}

/// Represents the current state of a file download
#[derive(Clone, Copy, PartialEq, Eq)]
pub enum DownloadStatus {
    /// Download is in progress
    Downloading,
    /// Download has completed successfully
    Done,
    /// Download gave up after an error
    Failed,
}

/// Data structure for tracking a download task in the UI
pub struct DownloadTask {
    /// Identifier used to pair the task with its event channel
    pub id: u64,
    /// File name shown in the downloads panel
    pub file_name: String,
    /// Destination the user picked
    pub dest: PathBuf,
    /// Current status of the download
    pub status: DownloadStatus,
    /// Progress fraction (0.0 to 1.0)
    pub progress: f32,
}

/// Messages a download worker sends back to the view.
pub enum DownloadEvent {
    Progress(f32),
    Done,
    Failed,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn decodes_full_success_response() {
        let json = r#"{
            "success": true,
            "title": "T",
            "uploader": "U",
            "duration": 125,
            "stream_url": "https://x/video.mp4"
        }"#;
        let result: ExtractionResult = serde_json::from_str(json).unwrap();
        assert!(result.success);
        assert_eq!(result.title_text(), "T");
        assert_eq!(result.uploader_text(), "U");
        assert_eq!(result.duration, Some(125));
        assert_eq!(result.stream_url.as_deref(), Some("https://x/video.mp4"));
        assert!(result.format_list().is_empty());
    }

    #[test]
    fn missing_optional_fields_fall_back_to_placeholders() {
        let result: ExtractionResult = serde_json::from_str(r#"{"success": true}"#).unwrap();
        assert_eq!(result.title_text(), FALLBACK_TITLE);
        assert_eq!(result.uploader_text(), FALLBACK_UPLOADER);
        assert_eq!(result.duration, None);
        assert!(result.thumbnail.is_none());
        assert!(result.stream_url.is_none());
    }

    #[test]
    fn decodes_format_rows() {
        let json = r#"{
            "success": true,
            "formats": [{"quality": "720p", "url": "https://x/a.mp4", "filesize": 15728640}]
        }"#;
        let result: ExtractionResult = serde_json::from_str(json).unwrap();
        let formats = result.format_list();
        assert_eq!(formats.len(), 1);
        assert_eq!(formats[0].quality, "720p");
        assert_eq!(formats[0].url, "https://x/a.mp4");
        assert_eq!(formats[0].filesize, Some(15728640));
    }

    #[test]
    fn backend_failure_surfaces_its_message() {
        let result: ExtractionResult =
            serde_json::from_str(r#"{"success": false, "error": "Invalid URL"}"#).unwrap();
        assert!(!result.success);
        assert_eq!(result.error_text(), "Invalid URL");
    }

    #[test]
    fn backend_failure_without_message_uses_fallback() {
        let result: ExtractionResult = serde_json::from_str(r#"{"success": false}"#).unwrap();
        assert_eq!(result.error_text(), UNKNOWN_ERROR);
    }

    #[test]
    fn body_without_success_flag_is_a_decode_error() {
        assert!(serde_json::from_str::<ExtractionResult>(r#"{"title": "T"}"#).is_err());
    }

    #[test]
    fn synthetic_failure_carries_fixed_message() {
        let result = ExtractionResult::failure(CONNECTION_ERROR);
        assert!(!result.success);
        assert_eq!(result.error_text(), CONNECTION_ERROR);
    }
}
