use crate::config::{ApiConfig, REQUEST_TIMEOUT};
use crate::models::DocumentInfo;
use reqwest::multipart::{Form, Part};
use reqwest::Client;
use serde::{Deserialize, Serialize};
use std::path::Path;

#[derive(Debug, Serialize, Deserialize, Clone)]
pub struct UploadResponse {
    pub document_id: i64,
    pub filename: String,
}

#[derive(Debug, Serialize, Deserialize, Clone)]
pub struct DeleteResponse {
    pub filename: String,
    pub chunks_deleted: i64,
}

#[derive(Debug, Serialize, Deserialize, Clone, PartialEq)]
pub struct QueryRequest {
    pub documents: Vec<String>,
    pub questions: Vec<String>,
}

#[derive(Debug, Serialize, Deserialize, Clone)]
pub struct QueryResponse {
    pub answers: Vec<String>,
}

#[derive(Debug, Serialize, Deserialize, Clone)]
pub struct HealthResponse {
    pub service: String,
    pub database_enabled: bool,
    pub version: String,
}

#[derive(Debug, thiserror::Error)]
pub enum ApiError {
    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),
    #[error("API error: {status} - {message}")]
    Api { status: u16, message: String },
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
}

impl Serialize for ApiError {
    fn serialize<S>(&self, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: serde::Serializer,
    {
        serializer.serialize_str(&self.to_string())
    }
}

fn client() -> Result<Client, ApiError> {
    Ok(Client::builder().timeout(REQUEST_TIMEOUT).build()?)
}

async fn check(resp: reqwest::Response) -> Result<reqwest::Response, ApiError> {
    if resp.status().is_success() {
        return Ok(resp);
    }
    let status = resp.status().as_u16();
    let message = resp.text().await.unwrap_or_default();
    Err(ApiError::Api { status, message })
}

/// Upload one file as multipart form data.
pub async fn upload_document(config: &ApiConfig, path: &Path) -> Result<UploadResponse, ApiError> {
    let filename = path
        .file_name()
        .and_then(|n| n.to_str())
        .unwrap_or("unknown")
        .to_string();
    let bytes = tokio::fs::read(path).await?;
    let form = Form::new().part("file", Part::bytes(bytes).file_name(filename));

    let resp = client()?
        .post(format!("{}/upload", config.base_url))
        .multipart(form)
        .send()
        .await?;
    Ok(check(resp).await?.json().await?)
}

pub async fn list_documents(config: &ApiConfig) -> Result<Vec<DocumentInfo>, ApiError> {
    let resp = client()?
        .get(format!("{}/documents", config.base_url))
        .send()
        .await?;
    Ok(check(resp).await?.json().await?)
}

pub async fn delete_document(config: &ApiConfig, id: i64) -> Result<DeleteResponse, ApiError> {
    let resp = client()?
        .delete(format!("{}/documents/{}", config.base_url, id))
        .send()
        .await?;
    Ok(check(resp).await?.json().await?)
}

/// One batched question-answering call. Answers come back aligned
/// positionally to the submitted questions.
pub async fn run_query(
    config: &ApiConfig,
    request: &QueryRequest,
) -> Result<QueryResponse, ApiError> {
    let resp = client()?
        .post(format!("{}/query", config.base_url))
        .header("Content-Type", "application/json")
        .json(request)
        .send()
        .await?;
    Ok(check(resp).await?.json().await?)
}

pub async fn health_check(config: &ApiConfig) -> Result<HealthResponse, ApiError> {
    let resp = client()?
        .get(format!("{}/health", config.base_url))
        .send()
        .await?;
    Ok(check(resp).await?.json().await?)
}
