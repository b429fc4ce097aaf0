//! Streaming a video URL to a file the user picked.

use std::path::{Path, PathBuf};

use thiserror::Error;
use tokio::{fs::File, io::AsyncWriteExt, sync::mpsc::UnboundedSender};

use crate::model::DownloadEvent;
use crate::progress::progress_fraction;

#[derive(Debug, Error)]
pub enum DownloadError {
    #[error("download request failed: {0}")]
    Request(#[from] reqwest::Error),
    #[error("could not write file: {0}")]
    Io(#[from] std::io::Error),
}

/// Download `url` into `dest`, reporting progress over `events`.
///
/// Runs until the stream ends or errors; the final event is always `Done`
/// or `Failed`. Send failures are ignored since the view may have dropped
/// the receiver when its row was removed.
pub async fn spawn_download(url: String, dest: PathBuf, events: UnboundedSender<DownloadEvent>) {
    match stream_to_file(&url, &dest, &events).await {
        Ok(()) => {
            tracing::info!(dest = %dest.display(), "download finished");
            let _ = events.send(DownloadEvent::Done);
        }
        Err(err) => {
            tracing::warn!(dest = %dest.display(), "download failed: {err}");
            let _ = events.send(DownloadEvent::Failed);
        }
    }
}

async fn stream_to_file(
    url: &str,
    dest: &Path,
    events: &UnboundedSender<DownloadEvent>,
) -> Result<(), DownloadError> {
    let mut response = reqwest::get(url).await?.error_for_status()?;
    let total = response.content_length();

    let mut file = File::create(dest).await?;
    let mut downloaded: u64 = 0;
    while let Some(chunk) = response.chunk().await? {
        file.write_all(&chunk).await?;
        downloaded += chunk.len() as u64;
        let _ = events.send(DownloadEvent::Progress(progress_fraction(downloaded, total)));
    }
    file.flush().await?;
    Ok(())
}
