use crate::api::ApiClient;
use crate::config::ServiceConfig;
use crate::deletion::{self, DownloadList, Notice};
use crate::email::{is_valid_email, on_email_input, EmailInputOutcome};
use crate::i18n::{resolve_locale, t, Locale};
use crate::prefs::{
    CookieStore, PrefsError, EMAIL_COOKIE, EMAIL_COOKIE_DAYS, LOCALE_COOKIE, LOCALE_COOKIE_DAYS,
};
use crate::selection::{submit_enabled, SelectedFile, SelectionManager, SelectionView};
use crate::translator;
use crate::uploader;
use log::warn;
use serde::Serialize;
use std::path::Path;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Mutex;
use tauri::{AppHandle, Emitter, Manager, State};

const UPLOAD_PROGRESS_EVENT: &str = "upload-progress";
const TRANSLATION_PROGRESS_EVENT: &str = "translation-progress";
const TRANSLATION_COMPLETE_EVENT: &str = "translation-complete";
const DELETION_NOTICE_EVENT: &str = "deletion-notice";

/// Shared state behind every command. One instance is managed by the app.
pub struct Workbench {
    api: ApiClient,
    selection: Mutex<SelectionManager>,
    cookies: Mutex<CookieStore>,
    downloads: Mutex<DownloadList>,
    locale: Mutex<Locale>,
    upload_active: AtomicBool,
    job_active: AtomicBool,
}

impl Workbench {
    pub fn new(config: &ServiceConfig, cookies: CookieStore) -> Result<Self, String> {
        let api = ApiClient::new(config).map_err(|error| error.to_string())?;
        let stored = cookies.get(LOCALE_COOKIE);
        let locale = resolve_locale(stored.as_deref(), system_locale().as_deref());
        Ok(Self {
            api,
            selection: Mutex::new(SelectionManager::new()),
            cookies: Mutex::new(cookies),
            downloads: Mutex::new(DownloadList::new()),
            locale: Mutex::new(locale),
            upload_active: AtomicBool::new(false),
            job_active: AtomicBool::new(false),
        })
    }

    fn locale(&self) -> Locale {
        self.locale
            .lock()
            .map(|guard| *guard)
            .unwrap_or(crate::i18n::DEFAULT_LOCALE)
    }
}

fn system_locale() -> Option<String> {
    std::env::var("LANG").ok()
}

fn emit_event<P: Serialize + Clone>(app: &AppHandle, event: &str, payload: P) {
    if let Err(error) = app.emit(event, payload) {
        warn!("failed to emit {event}: {error}");
    }
}

fn persist_cookies(cookies: &mut CookieStore) {
    if let Err(error) = cookies.persist() {
        match error {
            PrefsError::NoConfigDir => {}
            other => warn!("failed to persist preferences: {other}"),
        }
    }
}

#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct StartupState {
    pub locale: &'static str,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub email: Option<String>,
    pub selection: SelectionView,
    pub submit_enabled: bool,
    pub launch_caption: String,
}

#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct SelectionUpdate {
    pub added: usize,
    pub selection: SelectionView,
    pub submit_enabled: bool,
}

#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct DeletionNoticePayload {
    pub notice: Notice,
    /// Set for individual deletions: whether the downloads section is now
    /// empty and should be collapsed.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub section_empty: Option<bool>,
}

#[tauri::command]
pub fn get_startup_state(state: State<'_, Workbench>) -> Result<StartupState, String> {
    let locale = state.locale();
    let email = state
        .cookies
        .lock()
        .map_err(|_| "preferences lock poisoned".to_string())?
        .get(EMAIL_COOKIE);
    let selection = state
        .selection
        .lock()
        .map_err(|_| "selection lock poisoned".to_string())?;

    Ok(StartupState {
        locale: locale.code(),
        submit_enabled: submit_enabled(email.as_deref().unwrap_or_default(), &selection),
        selection: selection.view(locale),
        email,
        launch_caption: t(locale, "launch_translation_process"),
    })
}

#[tauri::command]
pub fn set_locale(state: State<'_, Workbench>, tag: String) -> Result<&'static str, String> {
    let locale = Locale::parse(&tag).ok_or_else(|| format!("unsupported locale '{tag}'"))?;
    {
        let mut current = state
            .locale
            .lock()
            .map_err(|_| "locale lock poisoned".to_string())?;
        *current = locale;
    }
    let mut cookies = state
        .cookies
        .lock()
        .map_err(|_| "preferences lock poisoned".to_string())?;
    cookies.set(LOCALE_COOKIE, locale.code(), Some(LOCALE_COOKIE_DAYS));
    persist_cookies(&mut cookies);
    Ok(locale.code())
}

#[tauri::command]
pub fn add_selected_files(
    state: State<'_, Workbench>,
    paths: Vec<String>,
) -> Result<SelectionUpdate, String> {
    let locale = state.locale();
    let mut files = Vec::with_capacity(paths.len());
    for path in &paths {
        match SelectedFile::from_path(Path::new(path)) {
            Ok(file) => files.push(file),
            // Unreadable picks are dropped; the rest of the batch stands.
            Err(error) => warn!("skipping unreadable file {path}: {error}"),
        }
    }

    let mut selection = state
        .selection
        .lock()
        .map_err(|_| "selection lock poisoned".to_string())?;
    let added = selection.add_files(files);
    let email = state
        .cookies
        .lock()
        .map_err(|_| "preferences lock poisoned".to_string())?
        .get(EMAIL_COOKIE)
        .unwrap_or_default();

    Ok(SelectionUpdate {
        added,
        submit_enabled: submit_enabled(&email, &selection),
        selection: selection.view(locale),
    })
}

#[tauri::command]
pub fn remove_selected_file(
    state: State<'_, Workbench>,
    index: usize,
) -> Result<SelectionView, String> {
    let locale = state.locale();
    let mut selection = state
        .selection
        .lock()
        .map_err(|_| "selection lock poisoned".to_string())?;
    selection.remove_at(index);
    Ok(selection.view(locale))
}

#[tauri::command]
pub fn clear_selection(state: State<'_, Workbench>) -> Result<SelectionView, String> {
    let locale = state.locale();
    let mut selection = state
        .selection
        .lock()
        .map_err(|_| "selection lock poisoned".to_string())?;
    selection.clear();
    Ok(selection.view(locale))
}

/// Live validation feedback for the email field; persists the address once
/// it is valid.
#[tauri::command]
pub fn email_input_changed(
    state: State<'_, Workbench>,
    email: String,
) -> Result<EmailInputOutcome, String> {
    let locale = state.locale();
    let has_files = !state
        .selection
        .lock()
        .map_err(|_| "selection lock poisoned".to_string())?
        .is_empty();

    let outcome = on_email_input(&email, has_files, locale);
    if outcome.persist {
        let mut cookies = state
            .cookies
            .lock()
            .map_err(|_| "preferences lock poisoned".to_string())?;
        cookies.set(EMAIL_COOKIE, email.trim(), Some(EMAIL_COOKIE_DAYS));
        persist_cookies(&mut cookies);
    }
    Ok(outcome)
}

/// Dispatches the whole selection as one concurrent upload batch. Progress
/// arrives on the `upload-progress` event; a second invocation while a batch
/// is in flight is rejected.
#[tauri::command]
pub fn start_upload_batch(
    app: AppHandle,
    state: State<'_, Workbench>,
    email: String,
) -> Result<(), String> {
    let locale = state.locale();
    if !is_valid_email(email.trim()) {
        return Err(t(locale, "please_enter_valid_email"));
    }
    let files = state
        .selection
        .lock()
        .map_err(|_| "selection lock poisoned".to_string())?
        .snapshot();
    if files.is_empty() {
        return Err(t(locale, "please_select_files_first"));
    }
    if state
        .upload_active
        .compare_exchange(false, true, Ordering::SeqCst, Ordering::SeqCst)
        .is_err()
    {
        return Err(t(locale, "uploading_files_busy"));
    }

    {
        let mut cookies = state
            .cookies
            .lock()
            .map_err(|_| "preferences lock poisoned".to_string())?;
        cookies.set(EMAIL_COOKIE, email.trim(), Some(EMAIL_COOKIE_DAYS));
        persist_cookies(&mut cookies);
    }

    let api = state.api.clone();
    let email = email.trim().to_string();
    tauri::async_runtime::spawn(async move {
        let handle = app.clone();
        uploader::upload_batch(&api, locale, &email, files, move |event| {
            emit_event(&handle, UPLOAD_PROGRESS_EVENT, event);
        })
        .await;

        let workbench = app.state::<Workbench>();
        workbench.upload_active.store(false, Ordering::SeqCst);
    });

    Ok(())
}

/// Launches one translation job. Repeated invocations while a job is active
/// are silent no-ops, so a double click cannot fire two requests.
#[tauri::command]
pub fn start_translation_job(
    app: AppHandle,
    state: State<'_, Workbench>,
    email: String,
    target_language: String,
    source_language: Option<String>,
) -> Result<(), String> {
    let locale = state.locale();
    if state
        .job_active
        .compare_exchange(false, true, Ordering::SeqCst, Ordering::SeqCst)
        .is_err()
    {
        return Ok(());
    }

    let api = state.api.clone();
    tauri::async_runtime::spawn(async move {
        let handle = app.clone();
        let outcome = translator::run_translation(
            &api,
            locale,
            &email,
            &target_language,
            source_language.as_deref(),
            move |event| {
                emit_event(&handle, TRANSLATION_PROGRESS_EVENT, event);
            },
        )
        .await;

        let workbench = app.state::<Workbench>();
        if let Some(details) = &outcome.details {
            if let Ok(mut downloads) = workbench.downloads.lock() {
                downloads.replace(details.artifact_filenames());
            }
        }
        workbench.job_active.store(false, Ordering::SeqCst);

        emit_event(&app, TRANSLATION_COMPLETE_EVENT, outcome);
    });

    Ok(())
}

#[tauri::command]
pub fn delete_all_translated(app: AppHandle, state: State<'_, Workbench>) -> Result<(), String> {
    let locale = state.locale();
    let api = state.api.clone();
    tauri::async_runtime::spawn(async move {
        let notice = deletion::delete_all(&api, locale).await;

        if !notice.is_error {
            let workbench = app.state::<Workbench>();
            if let Ok(mut downloads) = workbench.downloads.lock() {
                downloads.clear();
            };
        }
        emit_event(
            &app,
            DELETION_NOTICE_EVENT,
            DeletionNoticePayload {
                notice,
                section_empty: None,
            },
        );
    });
    Ok(())
}

#[tauri::command]
pub fn delete_translated_document(
    app: AppHandle,
    state: State<'_, Workbench>,
    filename: String,
) -> Result<(), String> {
    let locale = state.locale();
    let api = state.api.clone();
    tauri::async_runtime::spawn(async move {
        let notice = deletion::delete_one(&api, locale, &filename).await;

        let mut section_empty = None;
        if !notice.is_error {
            let workbench = app.state::<Workbench>();
            if let Ok(mut downloads) = workbench.downloads.lock() {
                let effect = downloads.remove_entry(&filename);
                section_empty = Some(effect.section_empty);
            };
        }
        emit_event(
            &app,
            DELETION_NOTICE_EVENT,
            DeletionNoticePayload {
                notice,
                section_empty,
            },
        );
    });
    Ok(())
}

/// Hands a translated artifact's URL to the system browser.
#[tauri::command]
pub fn open_download(state: State<'_, Workbench>, filename: String) -> Result<(), String> {
    let url = state
        .api
        .download_url(&filename)
        .map_err(|error| error.to_string())?;
    open::that_detached(url.as_str()).map_err(|error| format!("failed to open browser: {error}"))
}
