use crate::api;
use crate::config::ApiConfig;
use log::{info, warn};
use std::path::PathBuf;
use std::sync::{Arc, Mutex};
use std::time::Duration;

const PROGRESS_STEP: u8 = 10;
/// Simulated progress stalls here until the real response lands.
const PROGRESS_CAP: u8 = 90;
const TICK_INTERVAL: Duration = Duration::from_millis(200);

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum UploadStatus {
    Uploading,
    Success,
    Error,
}

#[derive(Debug, Clone)]
pub struct UploadItem {
    pub filename: String,
    pub status: UploadStatus,
    pub progress: u8,
    pub document_id: Option<i64>,
    pub error: Option<String>,
}

/// Tracks a batch of independent per-file uploads. Transitions are pure;
/// `upload_batch` is the async driver that feeds them.
#[derive(Debug, Default)]
pub struct UploadWorkflow {
    items: Vec<UploadItem>,
}

impl UploadWorkflow {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn items(&self) -> &[UploadItem] {
        &self.items
    }

    pub fn begin(&mut self, filename: impl Into<String>) -> usize {
        self.items.push(UploadItem {
            filename: filename.into(),
            status: UploadStatus::Uploading,
            progress: 0,
            document_id: None,
            error: None,
        });
        self.items.len() - 1
    }

    /// Advance simulated progress while the request is in flight.
    pub fn tick(&mut self, index: usize) {
        let item = &mut self.items[index];
        if item.status == UploadStatus::Uploading {
            item.progress = (item.progress + PROGRESS_STEP).min(PROGRESS_CAP);
        }
    }

    pub fn succeed(&mut self, index: usize, document_id: i64) {
        let item = &mut self.items[index];
        item.status = UploadStatus::Success;
        item.progress = 100;
        item.document_id = Some(document_id);
    }

    pub fn fail(&mut self, index: usize, message: impl Into<String>) {
        let item = &mut self.items[index];
        item.status = UploadStatus::Error;
        item.progress = 0;
        item.error = Some(message.into());
    }

    pub fn all_done(&self) -> bool {
        self.items
            .iter()
            .all(|i| i.status != UploadStatus::Uploading)
    }
}

/// Upload each file independently; one failure never affects the others.
pub async fn upload_batch(
    state: Arc<Mutex<UploadWorkflow>>,
    config: &ApiConfig,
    paths: Vec<PathBuf>,
) {
    let mut handles = Vec::new();
    for path in paths {
        let filename = path
            .file_name()
            .and_then(|n| n.to_str())
            .unwrap_or("unknown")
            .to_string();
        let index = state.lock().unwrap().begin(&filename);
        let state = state.clone();
        let config = config.clone();
        handles.push(tokio::spawn(async move {
            let mut ticker = tokio::time::interval(TICK_INTERVAL);
            ticker.tick().await; // first tick completes immediately
            let upload = api::upload_document(&config, &path);
            tokio::pin!(upload);
            loop {
                tokio::select! {
                    _ = ticker.tick() => {
                        state.lock().unwrap().tick(index);
                    }
                    result = &mut upload => {
                        match result {
                            Ok(response) => {
                                info!("uploaded {} as document {}", filename, response.document_id);
                                state.lock().unwrap().succeed(index, response.document_id);
                            }
                            Err(e) => {
                                warn!("upload of {} failed: {}", filename, e);
                                state.lock().unwrap().fail(index, e.to_string());
                            }
                        }
                        break;
                    }
                }
            }
        }));
    }
    for handle in handles {
        let _ = handle.await;
    }
}
