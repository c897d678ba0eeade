use once_cell::sync::Lazy;
use serde::{Deserialize, Serialize};
use std::collections::HashMap;

/// Locales shipped with the client. Lookups fall back to English, then to
/// the raw key, so a missing entry renders as its key instead of panicking.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Locale {
    En,
    Fr,
}

/// Used when neither the stored preference nor the system language matches
/// a shipped locale.
pub const DEFAULT_LOCALE: Locale = Locale::Fr;

impl Locale {
    /// Accepts bare codes ("fr") as well as full tags ("fr-FR", "fr_CA").
    pub fn parse(tag: &str) -> Option<Self> {
        let primary = tag.trim().split(['-', '_']).next().unwrap_or_default();
        match primary.to_ascii_lowercase().as_str() {
            "en" => Some(Locale::En),
            "fr" => Some(Locale::Fr),
            _ => None,
        }
    }

    pub const fn code(self) -> &'static str {
        match self {
            Locale::En => "en",
            Locale::Fr => "fr",
        }
    }
}

/// Picks the active locale: stored preference first, then the system
/// language, then [`DEFAULT_LOCALE`].
pub fn resolve_locale(stored: Option<&str>, system: Option<&str>) -> Locale {
    stored
        .and_then(Locale::parse)
        .or_else(|| system.and_then(Locale::parse))
        .unwrap_or(DEFAULT_LOCALE)
}

const EN_MESSAGES: &[(&str, &str)] = &[
    ("click_here_to_select", "Click here to select documents or drag and drop your files here"),
    ("selected_files", "Selected {count} file(s)"),
    ("click_add_documents", "Click here to add other documents"),
    ("uploading_files", "Uploading {count} file(s)..."),
    ("uploading_files_busy", "An upload is already in progress."),
    ("upload_complete", "Upload Complete!"),
    ("successful_failed", "Successful: {successful}, Failed: {failed}"),
    ("file_uploaded_successfully", "File uploaded successfully"),
    ("upload_failed", "Upload failed: {error}"),
    ("upload_failed_generic", "Upload failed."),
    ("network_error_upload", "Network error during upload."),
    ("please_select_files_first", "Please select files first."),
    ("please_enter_valid_email", "Please enter a valid email address"),
    ("please_enter_email_address", "Please enter your email address."),
    ("please_select_target_language", "Please select a target language."),
    ("launch_translation_process", "Launch Translation Process"),
    ("translation_in_progress", "Translation in Progress..."),
    ("translation_request_failed", "Translation request failed. Please try again."),
    ("previous_files_cleared", "Previous translation files were found and cleared automatically. Please try the translation again."),
    ("translation_completed_successfully", "Translation completed successfully!"),
    ("translation_partially_completed", "Translation completed with some failures."),
    ("translation_failed_all", "Translation failed for all documents."),
    ("translation_failed", "Failed"),
    ("translation_failed_error", "Translation failed: {error}"),
    ("status_label", "Status:"),
    ("total_documents", "Total documents: {total}"),
    ("succeeded_label", "Succeeded: {count}"),
    ("failed_label", "Failed: {count}"),
    ("automatically_removed_source_files", "Automatically removed {count} source files."),
    ("failed_cleanup_count", "({count} failed to clean)"),
    ("failed_to_remove_source_files", "Failed to automatically remove {count} source files."),
    ("no_source_files_found", "No source files found to remove."),
    ("cleanup_not_performed", "Automatic source cleanup was not performed: {reason}."),
    ("view_translation_details", "View translation details"),
    ("translated_to", "Translated to: {language}"),
    ("download_translated_document", "Download Translated Document"),
    ("download_translated_documents", "Download Translated Documents:"),
    ("no_documents_found_error", "No documents found to translate. Please upload your files again."),
    ("session_error_retry", "Session error. Please try again."),
    ("target_files_exist_error", "Target files from a previous translation already exist. Please try again."),
    ("starting_translation_process", "Starting translation process"),
    ("preparing_documents", "Starting translation process - Preparing documents for translation"),
    ("connecting_service", "Starting translation process - Connecting to translation service"),
    ("processing_documents", "Starting translation process - Processing documents"),
    ("translating_content", "Starting translation process - Translating content"),
    ("finalizing_translation", "Starting translation process - Finalizing translation"),
    ("all_documents_deleted", "Deleted {count} translated document(s)."),
    ("document_deleted", "Deleted {filename}."),
    ("delete_failed", "Deletion failed: {error}"),
];

const FR_MESSAGES: &[(&str, &str)] = &[
    ("click_here_to_select", "Cliquez ici pour sélectionner des documents ou déposez vos fichiers ici"),
    ("selected_files", "{count} fichier(s) sélectionné(s)"),
    ("click_add_documents", "Cliquez ici pour ajouter d'autres documents"),
    ("uploading_files", "Téléchargement de {count} fichier(s)..."),
    ("uploading_files_busy", "Un téléchargement est déjà en cours."),
    ("upload_complete", "Téléchargement Terminé !"),
    ("successful_failed", "Réussis : {successful}, Échoués : {failed}"),
    ("file_uploaded_successfully", "Fichier téléchargé avec succès"),
    ("upload_failed", "Échec du téléchargement : {error}"),
    ("upload_failed_generic", "Échec du téléchargement."),
    ("network_error_upload", "Erreur réseau lors du téléchargement."),
    ("please_select_files_first", "Veuillez d'abord sélectionner des fichiers."),
    ("please_enter_valid_email", "Veuillez saisir une adresse email valide"),
    ("please_enter_email_address", "Veuillez saisir votre adresse email."),
    ("please_select_target_language", "Veuillez sélectionner une langue cible."),
    ("launch_translation_process", "Lancer le Processus de Traduction"),
    ("translation_in_progress", "Traduction en cours..."),
    ("translation_request_failed", "Échec de la demande de traduction. Veuillez réessayer."),
    ("previous_files_cleared", "Les fichiers de traduction précédents ont été trouvés et supprimés automatiquement. Veuillez relancer la traduction."),
    ("translation_completed_successfully", "Traduction terminée avec succès !"),
    ("translation_partially_completed", "Traduction terminée avec des échecs."),
    ("translation_failed_all", "Échec de la traduction pour tous les documents."),
    ("translation_failed", "Échoué"),
    ("translation_failed_error", "Échec de la traduction : {error}"),
    ("status_label", "Statut :"),
    ("total_documents", "Total de documents : {total}"),
    ("succeeded_label", "Réussis : {count}"),
    ("failed_label", "Échoués : {count}"),
    ("automatically_removed_source_files", "{count} fichiers sources supprimés automatiquement."),
    ("failed_cleanup_count", "({count} échecs de nettoyage)"),
    ("failed_to_remove_source_files", "Échec de la suppression automatique de {count} fichiers sources."),
    ("no_source_files_found", "Aucun fichier source trouvé à supprimer."),
    ("cleanup_not_performed", "Le nettoyage automatique des fichiers sources n'a pas été effectué : {reason}."),
    ("view_translation_details", "Voir les détails de la traduction"),
    ("translated_to", "Traduit vers : {language}"),
    ("download_translated_document", "Télécharger le Document Traduit"),
    ("download_translated_documents", "Télécharger les Documents Traduits :"),
    ("no_documents_found_error", "Aucun document à traduire. Veuillez téléverser vos fichiers à nouveau."),
    ("session_error_retry", "Erreur de session. Veuillez réessayer."),
    ("target_files_exist_error", "Des fichiers cibles d'une traduction précédente existent déjà. Veuillez réessayer."),
    ("starting_translation_process", "Démarrage du processus de traduction"),
    ("preparing_documents", "Démarrage du processus de traduction - Préparation des documents"),
    ("connecting_service", "Démarrage du processus de traduction - Connexion au service de traduction"),
    ("processing_documents", "Démarrage du processus de traduction - Traitement des documents"),
    ("translating_content", "Démarrage du processus de traduction - Traduction du contenu"),
    ("finalizing_translation", "Démarrage du processus de traduction - Finalisation de la traduction"),
    ("all_documents_deleted", "{count} document(s) traduit(s) supprimé(s)."),
    ("document_deleted", "{filename} supprimé."),
    ("delete_failed", "Échec de la suppression : {error}"),
];

static EN_TABLE: Lazy<HashMap<&'static str, &'static str>> =
    Lazy::new(|| EN_MESSAGES.iter().copied().collect());
static FR_TABLE: Lazy<HashMap<&'static str, &'static str>> =
    Lazy::new(|| FR_MESSAGES.iter().copied().collect());

fn table(locale: Locale) -> &'static HashMap<&'static str, &'static str> {
    match locale {
        Locale::En => &EN_TABLE,
        Locale::Fr => &FR_TABLE,
    }
}

/// Resolves a message: active locale, then English, then the key itself.
pub fn lookup<'a>(locale: Locale, key: &'a str) -> &'a str {
    if let Some(text) = table(locale).get(key).copied() {
        return text;
    }
    if let Some(text) = EN_TABLE.get(key).copied() {
        log::debug!("message key '{key}' missing for locale {}, using English", locale.code());
        return text;
    }
    log::warn!("unknown message key '{key}'");
    key
}

pub fn t(locale: Locale, key: &str) -> String {
    lookup(locale, key).to_string()
}

/// Looks up a message and substitutes every `{name}` placeholder named in
/// `params`. Placeholders without a matching parameter are left untouched.
pub fn t_with(locale: Locale, key: &str, params: &[(&str, &str)]) -> String {
    let mut text = lookup(locale, key).to_string();
    for (name, value) in params {
        text = text.replace(&format!("{{{name}}}"), value);
    }
    text
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn resolves_full_language_tags() {
        assert_eq!(Locale::parse("fr-FR"), Some(Locale::Fr));
        assert_eq!(Locale::parse("en_US"), Some(Locale::En));
        assert_eq!(Locale::parse("de"), None);
    }

    #[test]
    fn stored_preference_wins_over_system_language() {
        assert_eq!(resolve_locale(Some("en"), Some("fr-FR")), Locale::En);
        assert_eq!(resolve_locale(None, Some("en-GB")), Locale::En);
    }

    #[test]
    fn falls_back_to_french_when_nothing_matches() {
        assert_eq!(resolve_locale(None, Some("de-DE")), Locale::Fr);
        assert_eq!(resolve_locale(None, None), Locale::Fr);
    }

    #[test]
    fn lookup_falls_back_to_english_then_key() {
        assert_eq!(lookup(Locale::Fr, "translation_failed"), "Échoué");
        // A key present in English only still resolves for French callers.
        assert_eq!(lookup(Locale::En, "upload_complete"), "Upload Complete!");
        assert_eq!(lookup(Locale::En, "not_a_real_key"), "not_a_real_key");
    }

    #[test]
    fn interpolates_named_placeholders() {
        let text = t_with(
            Locale::En,
            "successful_failed",
            &[("successful", "2"), ("failed", "1")],
        );
        assert_eq!(text, "Successful: 2, Failed: 1");
    }

    #[test]
    fn leaves_unmatched_placeholders_in_place() {
        let text = t_with(Locale::En, "total_documents", &[]);
        assert_eq!(text, "Total documents: {total}");
    }
}
