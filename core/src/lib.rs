pub mod api;
mod commands;
pub mod config;
pub mod deletion;
pub mod email;
pub mod i18n;
pub mod prefs;
pub mod selection;
pub mod translator;
pub mod uploader;

#[cfg(test)]
mod integration_tests;

pub use api::{
    ApiClient, ApiError, CleanupReport, DocumentOutcome, DocumentStatus, JobStatus,
    TranslationReport, TranslationRequest, TranslationResponse, UploadResponse,
};
pub use commands::{
    add_selected_files, clear_selection, delete_all_translated, delete_translated_document,
    email_input_changed, get_startup_state, open_download, remove_selected_file, set_locale,
    start_translation_job, start_upload_batch, DeletionNoticePayload, SelectionUpdate,
    StartupState, Workbench,
};
pub use config::{ServiceConfig, APP_DIR};
pub use deletion::{delete_all, delete_one, DownloadList, Notice, RemovalEffect};
pub use email::{is_valid_email, on_email_input, EmailInputOutcome};
pub use i18n::{resolve_locale, t, t_with, Locale, DEFAULT_LOCALE};
pub use prefs::{format_set_cookie, parse_cookie_header, CookieStore, PrefsError};
pub use selection::{
    submit_enabled, FileCategory, FileRow, SelectedFile, SelectionManager, SelectionView,
};
pub use translator::{
    run_translation, stage_key, validate_launch, DocumentRow, HeadlineTone, JobState, ReportView,
    TranslationOutcome, TranslationProgressEvent,
};
pub use uploader::{upload_batch, BatchSummary, UploadProgressEvent, UploadResult};
