use crate::api::{ApiClient, ApiError};
use crate::i18n::{t, t_with, Locale};
use serde::Serialize;

/// Transient banner shown after a deletion attempt. `clear_after_ms` is how
/// long the front-end should keep it on screen; `None` means sticky.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Notice {
    pub text: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub clear_after_ms: Option<u64>,
    pub is_error: bool,
}

impl Notice {
    fn transient(text: String, clear_after_ms: u64) -> Self {
        Self {
            text,
            clear_after_ms: Some(clear_after_ms),
            is_error: false,
        }
    }

    fn error(text: String) -> Self {
        Self {
            text,
            clear_after_ms: None,
            is_error: true,
        }
    }
}

/// Deletes every translated artifact on the server.
pub async fn delete_all(api: &ApiClient, locale: Locale) -> Notice {
    match api.delete_all_translated().await {
        Ok(response) if response.success => {
            let count = response.deleted_count.unwrap_or(0);
            Notice::transient(
                t_with(
                    locale,
                    "all_documents_deleted",
                    &[("count", &count.to_string())],
                ),
                3_000,
            )
        }
        Ok(response) => Notice::error(delete_failure_text(
            locale,
            response.error.as_deref(),
        )),
        Err(error) => Notice::error(delete_failure_text(locale, Some(&error.to_string()))),
    }
}

/// Deletes one translated artifact by filename.
pub async fn delete_one(api: &ApiClient, locale: Locale, filename: &str) -> Notice {
    match api.delete_translated_document(filename).await {
        Ok(response) if response.success => Notice::transient(
            t_with(locale, "document_deleted", &[("filename", filename)]),
            2_000,
        ),
        Ok(response) => Notice::error(delete_failure_text(
            locale,
            response.error.as_deref(),
        )),
        // Surface the content-type mismatch verbatim; the HTML snippet in it
        // is what tells the user the session expired.
        Err(error @ ApiError::UnexpectedContentType { .. }) => {
            Notice::error(error.to_string())
        }
        Err(error) => Notice::error(delete_failure_text(locale, Some(&error.to_string()))),
    }
}

fn delete_failure_text(locale: Locale, detail: Option<&str>) -> String {
    match detail {
        Some(detail) if !detail.is_empty() => {
            t_with(locale, "delete_failed", &[("error", detail)])
        }
        _ => t_with(locale, "delete_failed", &[("error", "unknown error")]),
    }
}

/// Client-side list of downloadable translated artifacts. Mirrors the
/// server's state between full refreshes so the result area stays accurate
/// after individual deletions.
#[derive(Debug, Default)]
pub struct DownloadList {
    entries: Vec<String>,
}

/// What `remove_entry` changed, so the caller knows whether to collapse the
/// whole downloads section.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RemovalEffect {
    pub removed: bool,
    pub section_empty: bool,
}

impl DownloadList {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn replace(&mut self, entries: Vec<String>) {
        self.entries = entries;
    }

    pub fn clear(&mut self) {
        self.entries.clear();
    }

    pub fn entries(&self) -> &[String] {
        &self.entries
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn remove_entry(&mut self, filename: &str) -> RemovalEffect {
        let before = self.entries.len();
        self.entries.retain(|entry| entry != filename);
        RemovalEffect {
            removed: self.entries.len() != before,
            section_empty: self.entries.is_empty(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn removing_last_entry_empties_the_section() {
        let mut list = DownloadList::new();
        list.replace(vec!["a.fr.pdf".to_string(), "b.fr.docx".to_string()]);

        let effect = list.remove_entry("a.fr.pdf");
        assert_eq!(
            effect,
            RemovalEffect {
                removed: true,
                section_empty: false
            }
        );

        let effect = list.remove_entry("b.fr.docx");
        assert_eq!(
            effect,
            RemovalEffect {
                removed: true,
                section_empty: true
            }
        );
    }

    #[test]
    fn removing_unknown_entry_is_a_no_op() {
        let mut list = DownloadList::new();
        list.replace(vec!["a.fr.pdf".to_string()]);

        let effect = list.remove_entry("missing.pdf");
        assert!(!effect.removed);
        assert!(!effect.section_empty);
        assert_eq!(list.entries(), ["a.fr.pdf".to_string()]);
    }

    #[test]
    fn failure_text_falls_back_when_detail_is_empty() {
        assert_eq!(
            delete_failure_text(Locale::En, Some("boom")),
            "Deletion failed: boom"
        );
        assert_eq!(
            delete_failure_text(Locale::En, Some("")),
            "Deletion failed: unknown error"
        );
        assert_eq!(
            delete_failure_text(Locale::En, None),
            "Deletion failed: unknown error"
        );
    }
}
