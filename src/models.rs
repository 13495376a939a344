use serde::{Deserialize, Serialize};

/// A document as reported by the backend library listing. The client never
/// mutates these; it only caches the latest snapshot.
#[derive(Debug, Serialize, Deserialize, Clone, PartialEq)]
pub struct DocumentInfo {
    pub id: i64,
    pub filename: String,
    pub file_type: String,
    pub upload_date: String,
    pub chunks_count: i64,
}

/// One answered question. Created once per submitted question, then immutable.
#[derive(Debug, Serialize, Deserialize, Clone, PartialEq)]
pub struct QueryResult {
    pub id: String,
    pub question: String,
    pub answer: String,
    pub created_at: String,
}

impl QueryResult {
    pub fn new(question: String, answer: String) -> Self {
        Self {
            id: uuid::Uuid::new_v4().to_string(),
            question,
            answer,
            created_at: chrono::Utc::now().to_rfc3339(),
        }
    }
}

/// Opaque reference the backend expects for a stored document.
pub fn document_ref(id: i64) -> String {
    format!("document-{}", id)
}
