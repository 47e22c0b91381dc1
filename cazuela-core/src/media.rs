//! Media upload adapter.
//!
//! Device-local references (file://, content://, bare paths) attached to a
//! draft are uploaded to the media host and replaced with the returned
//! remote URL before the submission payload is built. References that are
//! already remote pass through untouched, which is what keeps prior step
//! images alive on the edit-existing path.

use std::collections::HashMap;
use std::path::Path;
use std::sync::{Arc, Mutex};

use async_trait::async_trait;
use tokio::task::JoinSet;

use crate::error::{MediaError, MediaSlot, UploadError};
use crate::hydrate;
use crate::types::RecipeDraft;

/// Trait for media hosts, enabling mockability in tests.
#[async_trait]
pub trait MediaUploader: Send + Sync {
    /// Upload the media behind a device-local URI and return its remote URL.
    async fn upload(&self, local_uri: &str) -> Result<String, UploadError>;
}

/// True when a reference still lives on the device and must be uploaded.
pub fn is_local_uri(uri: &str) -> bool {
    let lower = uri.to_ascii_lowercase();
    !(lower.starts_with("http://") || lower.starts_with("https://"))
}

/// Media references of a draft with every local URI replaced by a remote
/// URL. Step entries keep the draft's order and length.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ResolvedMedia {
    pub final_photo_url: Option<String>,
    pub step_media: Vec<Option<String>>,
}

/// Upload every local media reference of a draft, concurrently.
///
/// Uploads are independent, so they fan out in parallel; results land in
/// their original slots regardless of completion order. Any failure aborts
/// the resolution with the offending slot named — the caller must not
/// issue the create/update call afterward.
pub async fn resolve_media(
    uploader: &Arc<dyn MediaUploader>,
    draft: &RecipeDraft,
) -> Result<ResolvedMedia, MediaError> {
    let mut resolved = ResolvedMedia {
        final_photo_url: draft.final_photo_uri.clone(),
        step_media: draft.steps.iter().map(|s| s.media_uri.clone()).collect(),
    };

    let mut jobs: Vec<(MediaSlot, String)> = Vec::new();
    if let Some(uri) = &draft.final_photo_uri {
        if is_local_uri(uri) {
            jobs.push((MediaSlot::FinalPhoto, uri.clone()));
        }
    }
    for (index, step) in draft.steps.iter().enumerate() {
        if let Some(uri) = &step.media_uri {
            if is_local_uri(uri) {
                jobs.push((MediaSlot::Step(index), uri.clone()));
            }
        }
    }

    if jobs.is_empty() {
        return Ok(resolved);
    }
    tracing::debug!(uploads = jobs.len(), "resolving local media");

    let mut tasks = JoinSet::new();
    for (slot, uri) in jobs {
        let uploader = Arc::clone(uploader);
        tasks.spawn(async move { (slot, uploader.upload(&uri).await) });
    }

    let mut outcomes: Vec<(MediaSlot, Result<String, UploadError>)> = Vec::new();
    while let Some(joined) = tasks.join_next().await {
        match joined {
            Ok(outcome) => outcomes.push(outcome),
            Err(e) => {
                return Err(MediaError {
                    slot: MediaSlot::FinalPhoto,
                    source: UploadError::RequestFailed(format!("upload task failed: {e}")),
                })
            }
        }
    }

    // Report the earliest failing slot so the message is deterministic.
    outcomes.sort_by_key(|(slot, _)| match slot {
        MediaSlot::FinalPhoto => 0,
        MediaSlot::Step(i) => i + 1,
    });

    for (slot, outcome) in outcomes {
        let url = outcome.map_err(|source| MediaError { slot, source })?;
        match slot {
            MediaSlot::FinalPhoto => resolved.final_photo_url = Some(url),
            MediaSlot::Step(index) => resolved.step_media[index] = Some(url),
        }
    }

    Ok(resolved)
}

/// Production uploader posting multipart bodies to the media host.
pub struct HttpMediaUploader {
    endpoint: String,
    client: reqwest::Client,
    bearer_token: Option<String>,
}

impl HttpMediaUploader {
    pub fn new(endpoint: impl Into<String>) -> Self {
        Self {
            endpoint: endpoint.into(),
            client: reqwest::Client::new(),
            bearer_token: None,
        }
    }

    /// Attach a bearer token to every upload request.
    pub fn with_bearer_token(mut self, token: impl Into<String>) -> Self {
        self.bearer_token = Some(token.into());
        self
    }

    fn local_path(uri: &str) -> &str {
        uri.strip_prefix("file://").unwrap_or(uri)
    }
}

#[async_trait]
impl MediaUploader for HttpMediaUploader {
    async fn upload(&self, local_uri: &str) -> Result<String, UploadError> {
        let path = Self::local_path(local_uri);
        let data = std::fs::read(path).map_err(|source| UploadError::ReadFailed {
            uri: local_uri.to_string(),
            source,
        })?;

        let file_name = Path::new(path)
            .file_name()
            .map(|n| n.to_string_lossy().to_string())
            .unwrap_or_else(|| "upload".to_string());

        let part = reqwest::multipart::Part::bytes(data).file_name(file_name);
        let form = reqwest::multipart::Form::new().part("file", part);

        let mut request = self.client.post(&self.endpoint).multipart(form);
        if let Some(token) = &self.bearer_token {
            request = request.bearer_auth(token);
        }

        tracing::debug!(uri = local_uri, "uploading media");
        let response = request
            .send()
            .await
            .map_err(|e| UploadError::RequestFailed(e.to_string()))?;

        let status = response.status().as_u16();
        let body = response
            .text()
            .await
            .map_err(|e| UploadError::RequestFailed(e.to_string()))?;

        if !(200..300).contains(&status) {
            return Err(UploadError::Api {
                status,
                message: body,
            });
        }

        let value: serde_json::Value =
            serde_json::from_str(&body).map_err(|e| UploadError::Parse(e.to_string()))?;

        // The media host has answered with all three spellings over time.
        hydrate::pick_str(&value, &["url", "secureUrl", "secure_url"])
            .map(str::to_string)
            .ok_or_else(|| UploadError::Parse("response carried no url field".to_string()))
    }
}

enum MockUploadResponse {
    Url(String),
    Error(String),
}

/// Mock uploader for testing.
pub struct MockUploader {
    responses: HashMap<String, MockUploadResponse>,
    uploads: Mutex<Vec<String>>,
}

impl MockUploader {
    /// Create a new empty mock uploader.
    pub fn new() -> Self {
        Self {
            responses: HashMap::new(),
            uploads: Mutex::new(Vec::new()),
        }
    }

    /// Add a successful upload mapping.
    pub fn with_url(mut self, local_uri: &str, remote_url: &str) -> Self {
        self.responses.insert(
            local_uri.to_string(),
            MockUploadResponse::Url(remote_url.to_string()),
        );
        self
    }

    /// Add a failing upload.
    pub fn with_error(mut self, local_uri: &str, error: &str) -> Self {
        self.responses.insert(
            local_uri.to_string(),
            MockUploadResponse::Error(error.to_string()),
        );
        self
    }

    /// URIs that were actually uploaded, in call order.
    pub fn uploads(&self) -> Vec<String> {
        self.uploads.lock().unwrap().clone()
    }
}

impl Default for MockUploader {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl MediaUploader for MockUploader {
    async fn upload(&self, local_uri: &str) -> Result<String, UploadError> {
        self.uploads.lock().unwrap().push(local_uri.to_string());
        match self.responses.get(local_uri) {
            Some(MockUploadResponse::Url(url)) => Ok(url.clone()),
            Some(MockUploadResponse::Error(e)) => Err(UploadError::RequestFailed(e.clone())),
            None => Err(UploadError::RequestFailed(format!(
                "no mock response for URI: {local_uri}"
            ))),
        }
    }
}
