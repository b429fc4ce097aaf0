//! Fetching and decoding thumbnail images for display.

use std::time::Duration;

use eframe::egui::ColorImage;
use thiserror::Error;

const FETCH_TIMEOUT: Duration = Duration::from_secs(15);

#[derive(Debug, Error)]
pub enum ThumbnailError {
    #[error("thumbnail request failed: {0}")]
    Request(#[from] reqwest::Error),
    #[error("thumbnail could not be decoded: {0}")]
    Decode(#[from] image::ImageError),
}

/// Fetch the image behind `url` and convert it for egui.
///
/// Blocking; run it on a blocking worker, never on the UI thread.
pub fn fetch_thumbnail(url: &str) -> Result<ColorImage, ThumbnailError> {
    let client = reqwest::blocking::Client::builder()
        .timeout(FETCH_TIMEOUT)
        .build()?;
    let bytes = client.get(url).send()?.error_for_status()?.bytes()?;
    let rgba = image::load_from_memory(&bytes)?.to_rgba8();
    let size = [rgba.width() as usize, rgba.height() as usize];
    Ok(ColorImage::from_rgba_unmultiplied(size, &rgba))
}
