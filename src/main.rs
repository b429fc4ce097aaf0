//! Main application for the TwiHub desktop downloader

// Environment -> backend base URL configuration
mod config;
// Streaming a picked video URL to disk
mod downloader;
// HTTP client for the extraction backend
mod extractor;
// Localized display formatting
mod format;
// Data models for extraction results and download tasks
mod model;
// Progress accounting utilities
mod progress;
// Thumbnail fetching module
mod thumbnail;

use config::AppConfig;
use downloader::spawn_download;
use extractor::{ExtractorClient, resolve_outcome};
use model::{DownloadEvent, DownloadStatus, DownloadTask, ExtractionResult};

// eframe/egui for GUI application framework
use eframe::{App, Frame, egui};
// OnceCell for single-time runtime initialization
use once_cell::sync::OnceCell;
// FileDialog for choosing download destinations
use rfd::FileDialog;
use std::{
    collections::HashMap,
    path::Path,
    sync::{Arc, Mutex},
};
use tokio::{
    runtime::Runtime,
    sync::mpsc::{UnboundedReceiver, UnboundedSender, unbounded_channel},
};

use egui::{ColorImage, TextureOptions, Visuals};

// Global Tokio runtime stored in a OnceCell for lazy init
static RUNTIME: OnceCell<Arc<Runtime>> = OnceCell::new();

/// Program entry point: initializes logging, the runtime, and the GUI
fn main() -> Result<(), eframe::Error> {
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("twihub=info")),
        )
        .init();

    let rt = Arc::new(Runtime::new().expect("failed to start tokio runtime"));
    RUNTIME.set(rt).expect("runtime already initialized");

    // Backend selection is fixed at build time; resolved once, injected below
    let app_config = AppConfig::resolve();
    tracing::info!(base_url = %app_config.base_url, "starting TwiHub desktop");

    let options = eframe::NativeOptions::default();
    eframe::run_native(
        "TwiHub",
        options,
        Box::new(move |cc| {
            // Use dark theme visuals
            cc.egui_ctx.set_visuals(Visuals::dark());
            Box::new(TwiHubApp::new(app_config))
        }),
    )
}

/// Application state for the extraction form view
struct TwiHubApp {
    /// Client bound to the configured extraction backend
    extractor: ExtractorClient,
    /// Input field for the Twitter/X post URL
    url_input: String,
    /// True while an extraction request is in flight
    loading: bool,
    /// Outcome of the most recent submission
    result: Option<ExtractionResult>,
    /// Identifies the submission whose outcome is still welcome;
    /// outcomes tagged with an older value are dropped on arrival
    generation: u64,
    /// Extraction outcomes coming back from spawned requests
    outcome_tx: UnboundedSender<(u64, ExtractionResult)>,
    outcome_rx: UnboundedReceiver<(u64, ExtractionResult)>,
    /// Decoded thumbnail images waiting to become textures
    thumbnail_results: Arc<Mutex<Vec<(u64, ColorImage)>>>,
    /// Texture for the current result's thumbnail
    thumbnail: Option<egui::TextureHandle>,
    /// File downloads started from the result panel
    downloads: Vec<DownloadTask>,
    /// Event channel for each download id
    download_rxs: HashMap<u64, UnboundedReceiver<DownloadEvent>>,
    next_download_id: u64,
}

impl TwiHubApp {
    fn new(config: AppConfig) -> Self {
        let (outcome_tx, outcome_rx) = unbounded_channel();
        Self {
            extractor: ExtractorClient::new(&config),
            url_input: String::new(),
            loading: false,
            result: None,
            generation: 0,
            outcome_tx,
            outcome_rx,
            thumbnail_results: Arc::new(Mutex::new(Vec::new())),
            thumbnail: None,
            downloads: Vec::new(),
            download_rxs: HashMap::new(),
            next_download_id: 0,
        }
    }

    /// Kick off an extraction request for the current input.
    fn submit(&mut self, ctx: &egui::Context) {
        if !submittable(&self.url_input, self.loading) {
            return;
        }
        let url = self.url_input.trim().to_owned();

        self.loading = true;
        self.result = None;
        self.thumbnail = None;
        self.generation += 1;
        tracing::debug!(%url, "submitting extraction request");

        let generation = self.generation;
        let client = self.extractor.clone();
        let tx = self.outcome_tx.clone();
        let ctx_c = ctx.clone();
        RUNTIME.get().unwrap().spawn(async move {
            let outcome = resolve_outcome(client.extract(&url).await);
            let _ = tx.send((generation, outcome));
            ctx_c.request_repaint();
        });
    }

    /// Accept or drop one extraction outcome.
    ///
    /// Outcomes tagged with a stale generation belong to an abandoned
    /// submission and are discarded. Returns the thumbnail URL to fetch
    /// when the accepted outcome has one.
    fn apply_outcome(&mut self, generation: u64, outcome: ExtractionResult) -> Option<String> {
        if generation != self.generation {
            return None;
        }
        let thumb_url = if outcome.success {
            outcome.thumbnail.clone()
        } else {
            None
        };
        self.loading = false;
        self.result = Some(outcome);
        thumb_url
    }

    /// Fetch the thumbnail behind `url` on a blocking worker.
    fn request_thumbnail(&self, ctx: &egui::Context, generation: u64, url: String) {
        let results = Arc::clone(&self.thumbnail_results);
        let ctx_c = ctx.clone();
        RUNTIME.get().unwrap().spawn_blocking(move || {
            match thumbnail::fetch_thumbnail(&url) {
                Ok(img) => {
                    results.lock().unwrap().push((generation, img));
                    ctx_c.request_repaint();
                }
                // missing thumbnail just leaves the image area empty
                Err(err) => tracing::debug!("thumbnail unavailable: {err}"),
            }
        });
    }

    /// Ask for a destination and start streaming `url` there.
    fn start_download(&mut self, url: &str, suggested_name: String) {
        let Some(dest) = FileDialog::new().set_file_name(&suggested_name).save_file() else {
            return;
        };
        let file_name = dest
            .file_name()
            .map(|n| n.to_string_lossy().into_owned())
            .unwrap_or(suggested_name);

        let id = self.next_download_id;
        self.next_download_id += 1;

        // Create progress channel and insert receiver
        let (tx, rx) = unbounded_channel();
        self.download_rxs.insert(id, rx);
        self.downloads.push(DownloadTask {
            id,
            file_name,
            dest: dest.clone(),
            status: DownloadStatus::Downloading,
            progress: 0.0,
        });

        RUNTIME
            .get()
            .unwrap()
            .spawn(spawn_download(url.to_owned(), dest, tx));
    }
}

/// GUI update loop: called each frame to redraw and handle interactions
impl App for TwiHubApp {
    fn update(&mut self, ctx: &egui::Context, _frame: &mut Frame) {
        // Collect extraction outcomes; stale generations are dropped
        while let Ok((generation, outcome)) = self.outcome_rx.try_recv() {
            if let Some(thumb_url) = self.apply_outcome(generation, outcome) {
                self.request_thumbnail(ctx, generation, thumb_url);
            }
        }

        // Handle completed thumbnail fetches
        {
            let mut pending = self.thumbnail_results.lock().unwrap();
            for (generation, img) in pending.drain(..) {
                if generation != self.generation {
                    continue;
                }
                // Load image into egui texture and cache it
                let tex = ctx.load_texture("thumbnail", img, TextureOptions::default());
                self.thumbnail = Some(tex);
            }
        }

        // Poll all download channels for updates
        for task in self.downloads.iter_mut() {
            if let Some(rx) = self.download_rxs.get_mut(&task.id) {
                while let Ok(event) = rx.try_recv() {
                    match event {
                        DownloadEvent::Progress(frac) => {
                            // Only update if progress increased
                            if frac > task.progress {
                                task.progress = frac;
                            }
                        }
                        DownloadEvent::Done => {
                            task.progress = 1.0;
                            task.status = DownloadStatus::Done;
                        }
                        DownloadEvent::Failed => task.status = DownloadStatus::Failed,
                    }
                }
            }
        }

        // Right-side panel: list of file downloads
        if !self.downloads.is_empty() {
            egui::SidePanel::right("downloads_panel").show(ctx, |ui| {
                ui.heading("다운로드 목록");
                ui.separator();

                egui::ScrollArea::vertical()
                    .auto_shrink([false; 2])
                    .show(ui, |ui| {
                        let mut to_remove = vec![];

                        for task in &self.downloads {
                            let status_text = match task.status {
                                DownloadStatus::Downloading => "⬇ 다운로드 중",
                                DownloadStatus::Done => "✅ 완료",
                                DownloadStatus::Failed => "⚠ 실패",
                            };
                            ui.group(|ui| {
                                ui.label(&task.file_name);
                                ui.label(status_text);
                                ui.add(egui::ProgressBar::new(task.progress).show_percentage());
                                // When settled, provide folder and remove options
                                if task.status != DownloadStatus::Downloading {
                                    ui.horizontal(|ui| {
                                        if task.status == DownloadStatus::Done
                                            && ui.button("폴더 열기").clicked()
                                        {
                                            if let Some(folder) = task.dest.parent() {
                                                open_folder(folder);
                                            }
                                        }
                                        // Queue removal of the settled task
                                        if ui.button("❌").clicked() {
                                            to_remove.push(task.id);
                                        }
                                    });
                                }
                            });
                        }

                        // Remove tasks and their channels after iteration
                        if !to_remove.is_empty() {
                            self.downloads.retain(|t| !to_remove.contains(&t.id));
                            for id in to_remove {
                                self.download_rxs.remove(&id);
                            }
                        }
                    });
            });
        }

        // Main panel: URL form and the conditional result panel
        egui::CentralPanel::default().show(ctx, |ui| {
            egui::ScrollArea::vertical()
                .auto_shrink([false; 2])
                .show(ui, |ui| {
                    ui.heading("TwiHub");
                    ui.label("Download Twitter/X videos easily");
                    ui.add_space(12.0);

                    // URL input field; Enter submits like the form button
                    ui.label("트위터 URL");
                    let input = ui.add(
                        egui::TextEdit::singleline(&mut self.url_input)
                            .hint_text(
                                "https://twitter.com/user/status/... 또는 https://x.com/user/status/...",
                            )
                            .desired_width(f32::INFINITY),
                    );
                    let enter_pressed =
                        input.lost_focus() && ui.input(|i| i.key_pressed(egui::Key::Enter));

                    // Submission requires a non-blank URL and no request in flight
                    let can_submit = submittable(&self.url_input, self.loading);

                    ui.add_space(8.0);
                    let mut do_submit = enter_pressed && can_submit;
                    ui.horizontal(|ui| {
                        let label = if self.loading { "처리 중..." } else { "동영상 추출" };
                        if ui.add_enabled(can_submit, egui::Button::new(label)).clicked() {
                            do_submit = true;
                        }
                        if self.loading {
                            ui.add(egui::Spinner::new());
                        }
                    });
                    if do_submit {
                        self.submit(ctx);
                    }

                    if let Some(result) = self.result.clone() {
                        ui.add_space(16.0);
                        ui.separator();

                        if result.success {
                            ui.horizontal(|ui| {
                                if let Some(tex) = &self.thumbnail {
                                    ui.add(egui::Image::new(tex).max_width(160.0));
                                }
                                ui.vertical(|ui| {
                                    ui.heading(result.title_text());
                                    ui.label(format!("업로더: {}", result.uploader_text()));
                                    if let Some(duration) = result.duration {
                                        ui.label(format!(
                                            "재생시간: {}",
                                            format::duration_text(duration)
                                        ));
                                    }
                                });
                            });

                            if let Some(stream_url) = result.stream_url.clone() {
                                ui.add_space(12.0);
                                ui.separator();
                                ui.heading("다운로드");
                                ui.horizontal(|ui| {
                                    if ui.button("동영상 다운로드").clicked() {
                                        let name = format::suggested_file_name(
                                            result.title_text(),
                                            None,
                                        );
                                        self.start_download(&stream_url, name);
                                    }
                                    if ui.button("새 탭에서 보기").clicked() {
                                        open_in_browser(&stream_url);
                                    }
                                });
                            }

                            let formats = result.format_list();
                            if !formats.is_empty() {
                                ui.add_space(12.0);
                                ui.separator();
                                ui.heading("다른 화질");
                                for row in formats {
                                    ui.group(|ui| {
                                        ui.horizontal(|ui| {
                                            ui.strong(&row.quality);
                                            if let Some(size) = row.filesize {
                                                ui.weak(format!(
                                                    "({})",
                                                    format::filesize_text(size)
                                                ));
                                            }
                                            ui.with_layout(
                                                egui::Layout::right_to_left(egui::Align::Center),
                                                |ui| {
                                                    if ui.button("다운로드").clicked() {
                                                        let name = format::suggested_file_name(
                                                            result.title_text(),
                                                            Some(&row.quality),
                                                        );
                                                        self.start_download(&row.url, name);
                                                    }
                                                },
                                            );
                                        });
                                    });
                                }
                            }
                        } else {
                            ui.vertical_centered(|ui| {
                                ui.add_space(8.0);
                                ui.colored_label(
                                    egui::Color32::LIGHT_RED,
                                    "오류가 발생했습니다",
                                );
                                ui.label(result.error_text());
                            });
                        }
                    }
                });
        });

        // Request periodic repaint for progress updates
        ctx.request_repaint_after(std::time::Duration::from_millis(100));
    }
}

/// Whether a submission may start: the input must be non-blank after
/// trimming and no request may be in flight.
fn submittable(url_input: &str, loading: bool) -> bool {
    !loading && !url_input.trim().is_empty()
}

/// Open `url` with the system browser, detached from the UI thread.
fn open_in_browser(url: &str) {
    let target = url.to_owned();
    std::thread::spawn(move || spawn_opener(&target));
}

/// Reveal `folder` in the platform file manager.
fn open_folder(folder: &Path) {
    let target = folder.display().to_string();
    std::thread::spawn(move || spawn_opener(&target));
}

fn spawn_opener(target: &str) {
    #[cfg(target_os = "windows")]
    {
        let _ = std::process::Command::new("explorer").arg(target).spawn();
    }
    #[cfg(target_os = "macos")]
    {
        let _ = std::process::Command::new("open").arg(target).spawn();
    }
    #[cfg(all(unix, not(target_os = "macos")))]
    {
        let _ = std::process::Command::new("xdg-open").arg(target).spawn();
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::Environment;

    fn app() -> TwiHubApp {
        TwiHubApp::new(AppConfig::for_environment(Environment::Development))
    }

    #[test]
    fn blank_input_cannot_submit() {
        assert!(!submittable("", false));
        assert!(!submittable("   \t", false));
    }

    #[test]
    fn inflight_request_blocks_resubmission() {
        assert!(submittable("https://x.com/user/status/1", false));
        assert!(!submittable("https://x.com/user/status/1", true));
    }

    #[test]
    fn stale_outcome_is_dropped() {
        let mut app = app();
        app.generation = 2;
        app.loading = true;
        let thumb = app.apply_outcome(1, ExtractionResult::failure("old"));
        assert_eq!(thumb, None);
        assert!(app.loading);
        assert!(app.result.is_none());
    }

    #[test]
    fn current_outcome_lands_and_requests_its_thumbnail() {
        let mut app = app();
        app.generation = 3;
        app.loading = true;
        let outcome: ExtractionResult = serde_json::from_str(
            r#"{"success": true, "title": "T", "thumbnail": "https://x/t.jpg"}"#,
        )
        .unwrap();
        let thumb = app.apply_outcome(3, outcome);
        assert_eq!(thumb.as_deref(), Some("https://x/t.jpg"));
        assert!(!app.loading);
        assert_eq!(app.result.as_ref().unwrap().title_text(), "T");
    }

    #[test]
    fn repeated_submission_replaces_the_result_wholesale() {
        let mut app = app();
        app.generation = 1;
        let first: ExtractionResult =
            serde_json::from_str(r#"{"success": true, "title": "T"}"#).unwrap();
        app.apply_outcome(1, first);

        app.generation = 2;
        app.apply_outcome(2, ExtractionResult::failure("Invalid URL"));
        let result = app.result.as_ref().unwrap();
        assert!(!result.success);
        assert_eq!(result.error_text(), "Invalid URL");
        assert_eq!(result.title, None);
    }
}
