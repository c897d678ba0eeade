use crate::api::{ApiClient, ApiError};
use crate::i18n::{t, t_with, Locale};
use crate::selection::SelectedFile;
use serde::Serialize;
use tokio::task::JoinSet;
use uuid::Uuid;

/// Settled outcome of one file's upload request.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct UploadResult {
    pub file_name: String,
    pub success: bool,
    pub message: String,
}

/// Aggregate of a whole batch; `successful + failed == total` always holds.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct BatchSummary {
    pub batch_id: String,
    pub total: u32,
    pub successful: u32,
    pub failed: u32,
    /// Stale artifacts the backend reported clearing while accepting the
    /// batch, summed across files.
    pub previous_documents_deleted: u32,
    /// Per-file outcomes in dispatch order, regardless of settle order.
    pub results: Vec<UploadResult>,
}

impl BatchSummary {
    pub fn any_succeeded(&self) -> bool {
        self.successful > 0
    }

    pub fn headline(&self, locale: Locale) -> String {
        t(locale, "upload_complete")
    }

    pub fn caption(&self, locale: Locale) -> String {
        t_with(
            locale,
            "successful_failed",
            &[
                ("successful", &self.successful.to_string()),
                ("failed", &self.failed.to_string()),
            ],
        )
    }
}

#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct UploadProgressEvent {
    pub batch_id: String,
    /// "uploading", "settled" or "complete".
    pub status: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub file_name: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub file_success: Option<bool>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub message: Option<String>,
    pub settled: u32,
    pub total: u32,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub summary: Option<BatchSummary>,
}

/// Uploads every file of the batch concurrently, one multipart request per
/// file. Completions settle in any order; the batch is complete only once
/// the settled counter reaches the total captured at dispatch time.
pub async fn upload_batch<F>(
    api: &ApiClient,
    locale: Locale,
    email: &str,
    files: Vec<SelectedFile>,
    mut on_event: F,
) -> BatchSummary
where
    F: FnMut(UploadProgressEvent),
{
    let batch_id = Uuid::new_v4().to_string();
    let total = files.len() as u32;

    on_event(UploadProgressEvent {
        batch_id: batch_id.clone(),
        status: "uploading".to_string(),
        file_name: None,
        file_success: None,
        message: Some(t_with(
            locale,
            "uploading_files",
            &[("count", &total.to_string())],
        )),
        settled: 0,
        total,
        summary: None,
    });

    let mut tasks: JoinSet<(usize, UploadResult, u32)> = JoinSet::new();
    for (index, file) in files.into_iter().enumerate() {
        on_event(UploadProgressEvent {
            batch_id: batch_id.clone(),
            status: "uploading".to_string(),
            file_name: Some(file.name.clone()),
            file_success: None,
            message: None,
            settled: 0,
            total,
            summary: None,
        });

        let api = api.clone();
        let email = email.to_string();
        tasks.spawn(async move {
            let (result, previous_deleted) = upload_one(&api, locale, &email, &file).await;
            (index, result, previous_deleted)
        });
    }

    let mut slots: Vec<Option<UploadResult>> = vec![None; total as usize];
    let mut settled = 0u32;
    let mut previous_documents_deleted = 0u32;

    while let Some(joined) = tasks.join_next().await {
        settled += 1;
        match joined {
            Ok((index, result, previous_deleted)) => {
                previous_documents_deleted += previous_deleted;
                on_event(UploadProgressEvent {
                    batch_id: batch_id.clone(),
                    status: "settled".to_string(),
                    file_name: Some(result.file_name.clone()),
                    file_success: Some(result.success),
                    message: Some(result.message.clone()),
                    settled,
                    total,
                    summary: None,
                });
                slots[index] = Some(result);
            }
            Err(join_error) => {
                log::warn!("upload task aborted: {join_error}");
            }
        }
    }

    let results: Vec<UploadResult> = slots
        .into_iter()
        .map(|slot| {
            slot.unwrap_or_else(|| UploadResult {
                file_name: String::new(),
                success: false,
                message: t(locale, "upload_failed_generic"),
            })
        })
        .collect();

    let successful = results.iter().filter(|result| result.success).count() as u32;
    let summary = BatchSummary {
        batch_id: batch_id.clone(),
        total,
        successful,
        failed: total - successful,
        previous_documents_deleted,
        results,
    };

    on_event(UploadProgressEvent {
        batch_id,
        status: "complete".to_string(),
        file_name: None,
        file_success: None,
        message: Some(summary.caption(locale)),
        settled,
        total,
        summary: Some(summary.clone()),
    });

    summary
}

async fn upload_one(
    api: &ApiClient,
    locale: Locale,
    email: &str,
    file: &SelectedFile,
) -> (UploadResult, u32) {
    let bytes = match tokio::fs::read(&file.path).await {
        Ok(bytes) => bytes,
        Err(error) => {
            return (
                UploadResult {
                    file_name: file.name.clone(),
                    success: false,
                    message: t_with(locale, "upload_failed", &[("error", &error.to_string())]),
                },
                0,
            );
        }
    };

    match api.upload_document(email, &file.name, bytes).await {
        Ok(response) => {
            let message = response
                .message
                .unwrap_or_else(|| t(locale, "file_uploaded_successfully"));
            let previous_deleted = response
                .previous_documents_deleted
                .map(|cleared| cleared.count)
                .unwrap_or(0);
            (
                UploadResult {
                    file_name: file.name.clone(),
                    success: true,
                    message,
                },
                previous_deleted,
            )
        }
        Err(error) => (
            UploadResult {
                file_name: file.name.clone(),
                success: false,
                message: upload_failure_message(locale, &error),
            },
            0,
        ),
    }
}

/// Message precedence for a failed upload: server-provided body text, then
/// the caught error mapped to a localized message, then the generic one.
fn upload_failure_message(locale: Locale, error: &ApiError) -> String {
    match error {
        ApiError::Http { message, .. } | ApiError::Conflict { message }
            if !message.is_empty() =>
        {
            message.clone()
        }
        ApiError::Network(_) => t(locale, "network_error_upload"),
        _ => t(locale, "upload_failed_generic"),
    }
}
