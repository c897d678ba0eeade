use crate::api::{
    ApiClient, ApiError, CleanupReport, DocumentStatus, JobStatus, TranslationReport,
    TranslationRequest, TranslationResponse,
};
use crate::i18n::{t, t_with, Locale};
use serde::Serialize;
use std::time::{Duration, Instant};
use tokio::time::MissedTickBehavior;

/// Lifecycle of one translation launch. Terminal states return to `Idle`
/// once the result has been rendered.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum JobState {
    Idle,
    Validating,
    Requesting,
    Succeeded,
    Failed,
    Conflict,
}

/// Visual weight of the headline message.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum HeadlineTone {
    Success,
    Warning,
    Error,
}

/// Message key for the cosmetic progress stage shown while the request is
/// in flight. Fixed thresholds, decoupled from real backend progress.
pub fn stage_key(elapsed_secs: u64) -> &'static str {
    match elapsed_secs {
        0..=1 => "starting_translation_process",
        2..=3 => "preparing_documents",
        4..=5 => "connecting_service",
        6..=7 => "processing_documents",
        8..=9 => "translating_content",
        _ => "finalizing_translation",
    }
}

pub fn stage_label(locale: Locale, elapsed_secs: u64) -> String {
    t(locale, stage_key(elapsed_secs))
}

/// Guard out of `Idle`: both fields must be present or no request is made.
pub fn validate_launch(locale: Locale, email: &str, target_language: &str) -> Result<(), String> {
    if email.trim().is_empty() {
        return Err(t(locale, "please_enter_email_address"));
    }
    if target_language.trim().is_empty() {
        return Err(t(locale, "please_select_target_language"));
    }
    Ok(())
}

#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct TranslationProgressEvent {
    pub state: JobState,
    pub elapsed_seconds: u64,
    pub stage: String,
    pub control_enabled: bool,
    pub control_caption: String,
}

/// One row of the collapsible per-document detail list.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct DocumentRow {
    pub mark: &'static str,
    pub succeeded: bool,
    pub display_name: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub translated_to: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub download_url: Option<String>,
    /// Filename to pass to the individual-delete endpoint.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub delete_filename: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
}

/// Render description of a completed job's result area.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ReportView {
    pub summary_lines: Vec<String>,
    pub details_caption: String,
    pub downloads_caption: String,
    pub documents: Vec<DocumentRow>,
}

impl ReportView {
    /// Translated artifacts available for download/deletion.
    pub fn artifact_filenames(&self) -> Vec<String> {
        self.documents
            .iter()
            .filter_map(|row| row.delete_filename.clone())
            .collect()
    }
}

#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct TranslationOutcome {
    pub state: JobState,
    pub headline: String,
    pub tone: HeadlineTone,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub details: Option<ReportView>,
    /// Restored launch-control caption; the control is re-enabled on every
    /// terminal path.
    pub control_caption: String,
}

impl TranslationOutcome {
    fn terminal(
        locale: Locale,
        state: JobState,
        headline: String,
        tone: HeadlineTone,
        details: Option<ReportView>,
    ) -> Self {
        Self {
            state,
            headline,
            tone,
            details,
            control_caption: t(locale, "launch_translation_process"),
        }
    }
}

/// Runs one translation launch end to end: guard, single request, cosmetic
/// 1-second stage ticker, classification. The ticker lives in the same
/// select loop as the request, so no terminal path can leave it running.
pub async fn run_translation<F>(
    api: &ApiClient,
    locale: Locale,
    email: &str,
    target_language: &str,
    source_language: Option<&str>,
    mut on_event: F,
) -> TranslationOutcome
where
    F: FnMut(TranslationProgressEvent),
{
    if let Err(message) = validate_launch(locale, email, target_language) {
        return TranslationOutcome::terminal(
            locale,
            JobState::Idle,
            message,
            HeadlineTone::Error,
            None,
        );
    }

    let body = TranslationRequest::new(target_language, source_language);
    let request = api.translate_documents(&body);
    tokio::pin!(request);

    let started = Instant::now();
    let mut ticker = tokio::time::interval(Duration::from_secs(1));
    ticker.set_missed_tick_behavior(MissedTickBehavior::Skip);

    let result = loop {
        tokio::select! {
            result = &mut request => break result,
            _ = ticker.tick() => {
                let elapsed = started.elapsed().as_secs();
                on_event(TranslationProgressEvent {
                    state: JobState::Requesting,
                    elapsed_seconds: elapsed,
                    stage: stage_label(locale, elapsed),
                    control_enabled: false,
                    control_caption: t(locale, "translation_in_progress"),
                });
            }
        }
    };

    match result {
        Ok(response) => outcome_from_response(api, locale, response),
        Err(error) => outcome_from_error(locale, &error),
    }
}

fn outcome_from_response(
    api: &ApiClient,
    locale: Locale,
    response: TranslationResponse,
) -> TranslationOutcome {
    if !response.success {
        let error = response
            .error
            .unwrap_or_else(|| t(locale, "translation_request_failed"));
        return TranslationOutcome::terminal(
            locale,
            JobState::Failed,
            t_with(locale, "translation_failed_error", &[("error", &error)]),
            HeadlineTone::Error,
            None,
        );
    }

    let Some(report) = response.data else {
        return TranslationOutcome::terminal(
            locale,
            JobState::Failed,
            t(locale, "translation_request_failed"),
            HeadlineTone::Error,
            None,
        );
    };

    let (headline, tone) = headline_for(locale, &report);
    let details = build_report_view(api, locale, &report);
    TranslationOutcome::terminal(locale, JobState::Succeeded, headline, tone, Some(details))
}

fn outcome_from_error(locale: Locale, error: &ApiError) -> TranslationOutcome {
    match error {
        ApiError::Conflict { .. } => TranslationOutcome::terminal(
            locale,
            JobState::Conflict,
            t(locale, "previous_files_cleared"),
            HeadlineTone::Warning,
            None,
        ),
        ApiError::Http { message, .. } => {
            let headline = if message.is_empty() {
                t(locale, "translation_request_failed")
            } else {
                message.clone()
            };
            TranslationOutcome::terminal(locale, JobState::Failed, headline, HeadlineTone::Error, None)
        }
        other => TranslationOutcome::terminal(
            locale,
            JobState::Failed,
            classify_error_text(locale, &other.to_string()),
            HeadlineTone::Error,
            None,
        ),
    }
}

/// Maps a transport/parse error onto a more specific localized message when
/// the text matches a known backend failure, else embeds the raw error.
pub fn classify_error_text(locale: Locale, raw: &str) -> String {
    let lowered = raw.to_lowercase();
    if lowered.contains("no documents found") {
        t(locale, "no_documents_found_error")
    } else if lowered.contains("session error") {
        t(locale, "session_error_retry")
    } else if lowered.contains("target files already exist") {
        t(locale, "target_files_exist_error")
    } else {
        t_with(locale, "translation_failed_error", &[("error", raw)])
    }
}

fn headline_for(locale: Locale, report: &TranslationReport) -> (String, HeadlineTone) {
    if report.failed_documents == 0 && report.succeeded_documents > 0 {
        return (
            t(locale, "translation_completed_successfully"),
            HeadlineTone::Success,
        );
    }
    if report.succeeded_documents > 0 {
        return (
            t(locale, "translation_partially_completed"),
            HeadlineTone::Warning,
        );
    }
    (t(locale, "translation_failed_all"), HeadlineTone::Error)
}

const fn status_text(status: JobStatus) -> &'static str {
    match status {
        JobStatus::Succeeded => "Succeeded",
        JobStatus::Failed => "Failed",
        JobStatus::PartiallySucceeded => "PartiallySucceeded",
    }
}

fn build_report_view(api: &ApiClient, locale: Locale, report: &TranslationReport) -> ReportView {
    let mut summary_lines = vec![
        format!("{} {}", t(locale, "status_label"), status_text(report.status)),
        t_with(
            locale,
            "total_documents",
            &[("total", &report.total_documents.to_string())],
        ),
        t_with(
            locale,
            "succeeded_label",
            &[("count", &report.succeeded_documents.to_string())],
        ),
        t_with(
            locale,
            "failed_label",
            &[("count", &report.failed_documents.to_string())],
        ),
    ];
    if let Some(cleanup) = &report.source_cleanup {
        summary_lines.push(cleanup_summary(locale, cleanup));
    }

    let documents = report
        .documents
        .iter()
        .map(|doc| {
            let display_name = doc.display_name().to_string();
            if doc.status == DocumentStatus::Succeeded {
                let artifact = doc
                    .translated_filename
                    .clone()
                    .unwrap_or_else(|| display_name.clone());
                let download_url = api
                    .download_url(&artifact)
                    .map(|url| url.to_string())
                    .ok();
                DocumentRow {
                    mark: "✓",
                    succeeded: true,
                    display_name,
                    translated_to: doc.translated_to.as_ref().map(|language| {
                        t_with(locale, "translated_to", &[("language", language)])
                    }),
                    download_url,
                    delete_filename: Some(artifact),
                    error: None,
                }
            } else {
                let error = doc
                    .error
                    .as_ref()
                    .and_then(|error| error.message.clone())
                    .unwrap_or_else(|| t(locale, "translation_failed"));
                DocumentRow {
                    mark: "✗",
                    succeeded: false,
                    display_name,
                    translated_to: None,
                    download_url: None,
                    delete_filename: None,
                    error: Some(error),
                }
            }
        })
        .collect();

    ReportView {
        summary_lines,
        details_caption: t(locale, "view_translation_details"),
        downloads_caption: t(locale, "download_translated_documents"),
        documents,
    }
}

fn cleanup_summary(locale: Locale, cleanup: &CleanupReport) -> String {
    if !cleanup.cleanup_attempted {
        let reason = cleanup.reason.as_deref().unwrap_or("unknown");
        return t_with(locale, "cleanup_not_performed", &[("reason", reason)]);
    }
    if cleanup.cleaned_files > 0 {
        let mut line = t_with(
            locale,
            "automatically_removed_source_files",
            &[("count", &cleanup.cleaned_files.to_string())],
        );
        if cleanup.failed_cleanups > 0 {
            line.push(' ');
            line.push_str(&t_with(
                locale,
                "failed_cleanup_count",
                &[("count", &cleanup.failed_cleanups.to_string())],
            ));
        }
        return line;
    }
    if cleanup.failed_cleanups > 0 {
        return t_with(
            locale,
            "failed_to_remove_source_files",
            &[("count", &cleanup.failed_cleanups.to_string())],
        );
    }
    t(locale, "no_source_files_found")
}
