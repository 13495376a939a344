use crate::api::{self, DeleteResponse};
use crate::config::ApiConfig;
use crate::events::{EventBus, LibraryEvent};
use crate::models::DocumentInfo;
use log::info;

/// Lists and deletes library documents, independent of the query workflow.
/// Deletion is expected to be confirmed by the caller before `delete` runs.
#[derive(Debug)]
pub struct DocumentManager {
    config: ApiConfig,
    events: EventBus,
    documents: Vec<DocumentInfo>,
    deleting: Option<i64>,
    error: Option<String>,
}

impl DocumentManager {
    pub fn new(config: ApiConfig, events: EventBus) -> Self {
        Self {
            config,
            events,
            documents: Vec::new(),
            deleting: None,
            error: None,
        }
    }

    pub fn documents(&self) -> &[DocumentInfo] {
        &self.documents
    }

    pub fn deleting(&self) -> Option<i64> {
        self.deleting
    }

    pub fn error(&self) -> Option<&str> {
        self.error.as_deref()
    }

    pub async fn load(&mut self) -> Result<(), String> {
        self.error = None;
        match api::list_documents(&self.config).await {
            Ok(docs) => {
                self.documents = docs;
                Ok(())
            }
            Err(e) => {
                let message = e.to_string();
                self.error = Some(message.clone());
                Err(message)
            }
        }
    }

    /// Delete a document on the backend. On success the row is dropped from
    /// the local listing and a library-changed event is broadcast so views
    /// holding their own snapshot can refetch. On failure the listing is
    /// left as it was.
    pub async fn delete(&mut self, id: i64) -> Result<DeleteResponse, String> {
        self.deleting = Some(id);
        self.error = None;
        let result = api::delete_document(&self.config, id).await;
        self.deleting = None;
        match result {
            Ok(response) => {
                self.documents.retain(|d| d.id != id);
                self.events.emit(LibraryEvent::Changed);
                info!(
                    "deleted document {} ({} chunks)",
                    response.filename, response.chunks_deleted
                );
                Ok(response)
            }
            Err(e) => {
                let message = e.to_string();
                self.error = Some(message.clone());
                Err(message)
            }
        }
    }
}
