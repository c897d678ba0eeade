use doc_translator_core::{CookieStore, ServiceConfig, Workbench, APP_DIR};
use log::{warn, LevelFilter};
use tauri::Manager;

#[cfg_attr(mobile, tauri::mobile_entry_point)]
pub fn run() {
    tauri::Builder::<tauri::Wry>::default()
        .plugin(tauri_plugin_dialog::init())
        .plugin(tauri_plugin_opener::init())
        .setup(|app| {
            if cfg!(debug_assertions) {
                app.handle().plugin(
                    tauri_plugin_log::Builder::default()
                        .level(LevelFilter::Info)
                        .build(),
                )?;
            }

            let config = ServiceConfig::load_default();
            let cookies = CookieStore::open_default(APP_DIR).unwrap_or_else(|error| {
                warn!("falling back to in-memory preferences: {error}");
                CookieStore::in_memory()
            });
            let workbench = Workbench::new(&config, cookies)?;
            app.manage(workbench);
            Ok(())
        })
        .invoke_handler(tauri::generate_handler![
            doc_translator_core::get_startup_state,
            doc_translator_core::set_locale,
            doc_translator_core::add_selected_files,
            doc_translator_core::remove_selected_file,
            doc_translator_core::clear_selection,
            doc_translator_core::email_input_changed,
            doc_translator_core::start_upload_batch,
            doc_translator_core::start_translation_job,
            doc_translator_core::delete_all_translated,
            doc_translator_core::delete_translated_document,
            doc_translator_core::open_download
        ])
        .run(tauri::generate_context!())
        .expect("error while running tauri application");
}
