use crate::api;
use crate::config::ApiConfig;
use crate::models::DocumentInfo;
use log::{debug, warn};

/// Owns the set of documents chosen as query context.
///
/// State transitions (`apply_*`, `toggle`, `toggle_all`) are pure so any
/// rendering shell can drive them; the async methods only do the fetch and
/// delegate to them.
#[derive(Debug)]
pub struct DocumentSelector {
    config: ApiConfig,
    documents: Vec<DocumentInfo>,
    selected: Vec<i64>,
    loading: bool,
    error: Option<String>,
}

impl DocumentSelector {
    pub fn new(config: ApiConfig) -> Self {
        Self {
            config,
            documents: Vec::new(),
            selected: Vec::new(),
            loading: false,
            error: None,
        }
    }

    pub fn documents(&self) -> &[DocumentInfo] {
        &self.documents
    }

    pub fn selected(&self) -> &[i64] {
        &self.selected
    }

    pub fn is_loading(&self) -> bool {
        self.loading
    }

    pub fn error(&self) -> Option<&str> {
        self.error.as_deref()
    }

    /// Fetch the document list once on activation. If nothing was selected
    /// yet and the library is non-empty, select everything by default.
    pub async fn load(&mut self) -> Result<(), String> {
        self.loading = true;
        self.error = None;
        let result = api::list_documents(&self.config).await;
        self.loading = false;
        match result {
            Ok(docs) => {
                self.apply_initial_listing(docs);
                Ok(())
            }
            Err(e) => {
                // Selection stays untouched on a failed fetch.
                warn!("failed to load documents: {}", e);
                let message = e.to_string();
                self.error = Some(message.clone());
                Err(message)
            }
        }
    }

    /// Refetch after the library changed elsewhere (e.g. a delete). Selected
    /// ids that no longer exist are dropped.
    pub async fn refresh(&mut self) -> Result<(), String> {
        self.loading = true;
        self.error = None;
        let result = api::list_documents(&self.config).await;
        self.loading = false;
        match result {
            Ok(docs) => {
                self.apply_refreshed_listing(docs);
                Ok(())
            }
            Err(e) => {
                let message = e.to_string();
                self.error = Some(message.clone());
                Err(message)
            }
        }
    }

    pub fn apply_initial_listing(&mut self, docs: Vec<DocumentInfo>) {
        if self.selected.is_empty() && !docs.is_empty() {
            self.selected = docs.iter().map(|d| d.id).collect();
            debug!("auto-selected all {} documents", self.selected.len());
        }
        self.documents = docs;
    }

    pub fn apply_refreshed_listing(&mut self, docs: Vec<DocumentInfo>) {
        self.selected.retain(|id| docs.iter().any(|d| d.id == *id));
        self.documents = docs;
    }

    /// Flip membership of `id` in the selection. Ids not present in the
    /// current document list are rejected; returns whether anything changed.
    pub fn toggle(&mut self, id: i64) -> bool {
        if !self.documents.iter().any(|d| d.id == id) {
            warn!("ignoring toggle for unknown document id {}", id);
            return false;
        }
        if let Some(pos) = self.selected.iter().position(|s| *s == id) {
            self.selected.remove(pos);
        } else {
            self.selected.push(id);
        }
        true
    }

    /// Single select-all/deselect-all control: clears the selection when
    /// every document is already selected, otherwise selects every document.
    pub fn toggle_all(&mut self) {
        if self.selected.len() == self.documents.len() {
            self.selected.clear();
        } else {
            self.selected = self.documents.iter().map(|d| d.id).collect();
        }
    }

    pub fn deselect_all(&mut self) {
        self.selected.clear();
    }
}
