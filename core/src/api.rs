use crate::config::ServiceConfig;
use reqwest::{multipart, Client, StatusCode, Url};
use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};
use std::time::Duration;
use thiserror::Error;

const REQUEST_TIMEOUT: Duration = Duration::from_secs(30);
const BODY_SNIPPET_CHARS: usize = 200;
const CSRF_HEADER: &str = "X-CSRFToken";

#[derive(Debug, Error)]
pub enum ApiError {
    #[error("invalid base url '{0}'")]
    InvalidBaseUrl(String),
    /// HTTP 409: target artifacts from a previous job already exist.
    #[error("{message}")]
    Conflict { message: String },
    #[error("server returned {status}: {message}")]
    Http { status: StatusCode, message: String },
    #[error("network error: {0}")]
    Network(#[from] reqwest::Error),
    #[error("unexpected response payload: {0}")]
    Payload(String),
    #[error("unexpected content type '{content_type}': {body}")]
    UnexpectedContentType { content_type: String, body: String },
}

// ---- wire DTOs (snake_case to match the backend) ----

#[derive(Debug, Clone, Deserialize)]
pub struct UploadResponse {
    pub message: Option<String>,
    pub error: Option<String>,
    pub previous_documents_deleted: Option<PreviousDocumentsDeleted>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct PreviousDocumentsDeleted {
    pub count: u32,
}

#[derive(Debug, Clone, Serialize)]
pub struct TranslationRequest {
    pub target_language: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub source_language: Option<String>,
    pub clear_target: bool,
    pub cleanup_source: bool,
}

impl TranslationRequest {
    /// The client always asks the backend to clear stale targets and remove
    /// sources once translated.
    pub fn new(target_language: &str, source_language: Option<&str>) -> Self {
        Self {
            target_language: target_language.to_string(),
            source_language: source_language
                .map(str::trim)
                .filter(|lang| !lang.is_empty() && *lang != "auto")
                .map(str::to_string),
            clear_target: true,
            cleanup_source: true,
        }
    }
}

#[derive(Debug, Clone, Deserialize)]
pub struct TranslationResponse {
    pub success: bool,
    pub data: Option<TranslationReport>,
    pub error: Option<String>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum JobStatus {
    Succeeded,
    Failed,
    PartiallySucceeded,
}

#[derive(Debug, Clone, Deserialize)]
pub struct TranslationReport {
    pub status: JobStatus,
    pub total_documents: u32,
    pub succeeded_documents: u32,
    pub failed_documents: u32,
    #[serde(default)]
    pub documents: Vec<DocumentOutcome>,
    pub source_cleanup: Option<CleanupReport>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum DocumentStatus {
    Succeeded,
    Failed,
}

#[derive(Debug, Clone, Deserialize)]
pub struct DocumentOutcome {
    pub id: String,
    pub source_filename: Option<String>,
    pub translated_filename: Option<String>,
    pub status: DocumentStatus,
    pub translated_to: Option<String>,
    pub error: Option<DocumentError>,
}

impl DocumentOutcome {
    /// Display-name fallback chain: translated filename, source filename,
    /// then the opaque document id.
    pub fn display_name(&self) -> &str {
        self.translated_filename
            .as_deref()
            .or(self.source_filename.as_deref())
            .unwrap_or(&self.id)
    }
}

#[derive(Debug, Clone, Deserialize)]
pub struct DocumentError {
    pub message: Option<String>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct CleanupReport {
    pub cleanup_attempted: bool,
    #[serde(default)]
    pub cleaned_files: u32,
    #[serde(default)]
    pub failed_cleanups: u32,
    pub reason: Option<String>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct DeleteAllResponse {
    pub success: bool,
    pub deleted_count: Option<u32>,
    pub error: Option<String>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct DeleteOneResponse {
    pub success: bool,
    pub error: Option<String>,
}

// ---- client ----

/// Typed client for the translation backend.
#[derive(Debug, Clone)]
pub struct ApiClient {
    http: Client,
    base: Url,
    csrf_token: Option<String>,
}

impl ApiClient {
    pub fn new(config: &ServiceConfig) -> Result<Self, ApiError> {
        let base = Url::parse(&config.base_url)
            .map_err(|_| ApiError::InvalidBaseUrl(config.base_url.clone()))?;
        let http = Client::builder()
            .timeout(REQUEST_TIMEOUT)
            .build()
            .map_err(ApiError::Network)?;
        Ok(Self {
            http,
            base,
            csrf_token: config.csrf_token.clone(),
        })
    }

    pub fn base_url(&self) -> &Url {
        &self.base
    }

    /// Builds `<base>/<segments...>/` with proper segment encoding; the
    /// backend routes all end in a trailing slash.
    fn endpoint(&self, segments: &[&str]) -> Result<Url, ApiError> {
        let mut url = self.base.clone();
        {
            let mut parts = url
                .path_segments_mut()
                .map_err(|_| ApiError::InvalidBaseUrl(self.base.to_string()))?;
            parts.pop_if_empty();
            for segment in segments {
                parts.push(segment);
            }
            parts.push("");
        }
        Ok(url)
    }

    /// `POST /upload/` — multipart body: file content, email, anti-forgery
    /// token when configured.
    pub async fn upload_document(
        &self,
        email: &str,
        file_name: &str,
        bytes: Vec<u8>,
    ) -> Result<UploadResponse, ApiError> {
        let mut form = multipart::Form::new()
            .part(
                "file",
                multipart::Part::bytes(bytes).file_name(file_name.to_string()),
            )
            .text("email", email.to_string());
        if let Some(token) = &self.csrf_token {
            form = form.text("csrfmiddlewaretoken", token.clone());
        }

        let response = self
            .http
            .post(self.endpoint(&["upload"])?)
            .multipart(form)
            .send()
            .await?;
        self.read_json(response).await
    }

    /// `POST /translate/` — exactly one request per launch. HTTP 409 maps to
    /// [`ApiError::Conflict`].
    pub async fn translate_documents(
        &self,
        request: &TranslationRequest,
    ) -> Result<TranslationResponse, ApiError> {
        let response = self
            .http
            .post(self.endpoint(&["translate"])?)
            .json(request)
            .send()
            .await?;
        self.read_json(response).await
    }

    /// URL of a translated artifact, suitable for handing to the browser.
    pub fn download_url(&self, filename: &str) -> Result<Url, ApiError> {
        self.endpoint(&["download", filename])
    }

    /// `POST /delete-translated/` — removes every translated artifact.
    pub async fn delete_all_translated(&self) -> Result<DeleteAllResponse, ApiError> {
        let response = self
            .http
            .post(self.endpoint(&["delete-translated"])?)
            .send()
            .await?;
        self.read_json(response).await
    }

    /// `POST /delete-individual/{filename}/` — removes one artifact. The
    /// response must be JSON; anything else surfaces the raw (truncated)
    /// body as the error.
    pub async fn delete_translated_document(
        &self,
        filename: &str,
    ) -> Result<DeleteOneResponse, ApiError> {
        let mut request = self
            .http
            .post(self.endpoint(&["delete-individual", filename])?);
        if let Some(token) = &self.csrf_token {
            request = request.header(CSRF_HEADER, token);
        }
        let response = request.send().await?;

        let content_type = response
            .headers()
            .get(reqwest::header::CONTENT_TYPE)
            .and_then(|value| value.to_str().ok())
            .unwrap_or_default()
            .to_string();
        if !content_type.starts_with("application/json") {
            let body = response.text().await.unwrap_or_default();
            return Err(ApiError::UnexpectedContentType {
                content_type,
                body: snippet(&body),
            });
        }
        self.read_json(response).await
    }

    async fn read_json<T: DeserializeOwned>(
        &self,
        response: reqwest::Response,
    ) -> Result<T, ApiError> {
        let status = response.status();
        let body = response.text().await?;

        if status == StatusCode::CONFLICT {
            return Err(ApiError::Conflict {
                message: error_message_from_body(&body).unwrap_or_else(|| snippet(&body)),
            });
        }
        if !status.is_success() {
            let message = error_message_from_body(&body)
                .or_else(|| {
                    let raw = snippet(&body);
                    (!raw.is_empty()).then_some(raw)
                })
                .unwrap_or_else(|| status.to_string());
            return Err(ApiError::Http { status, message });
        }

        serde_json::from_str(&body)
            .map_err(|err| ApiError::Payload(format!("{err} in body: {}", snippet(&body))))
    }
}

/// Best-effort extraction of a human-readable message from a JSON error
/// body: `error` field first, then `message`.
pub fn error_message_from_body(body: &str) -> Option<String> {
    let value: serde_json::Value = serde_json::from_str(body).ok()?;
    value
        .get("error")
        .or_else(|| value.get("message"))?
        .as_str()
        .map(str::to_string)
}

fn snippet(body: &str) -> String {
    let trimmed = body.trim();
    if trimmed.chars().count() <= BODY_SNIPPET_CHARS {
        trimmed.to_string()
    } else {
        let mut cut: String = trimmed.chars().take(BODY_SNIPPET_CHARS).collect();
        cut.push('…');
        cut
    }
}
