use crate::email::is_valid_email;
use crate::i18n::{t, t_with, Locale};
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::{Path, PathBuf};

/// One file the user picked or dropped. Two selections are considered the
/// same document when name and size both match.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SelectedFile {
    pub name: String,
    pub size: u64,
    pub path: PathBuf,
}

impl SelectedFile {
    /// Builds an entry from a filesystem path, normalizing the path the way
    /// the rest of the app expects (`dunce` avoids `\\?\` forms on Windows).
    pub fn from_path(path: &Path) -> std::io::Result<Self> {
        let canonical = dunce::canonicalize(path).unwrap_or_else(|_| path.to_path_buf());
        let metadata = fs::metadata(&canonical)?;
        let name = canonical
            .file_name()
            .map(|name| name.to_string_lossy().into_owned())
            .unwrap_or_else(|| canonical.to_string_lossy().into_owned());
        Ok(Self {
            name,
            size: metadata.len(),
            path: canonical,
        })
    }

    fn same_document(&self, other: &SelectedFile) -> bool {
        self.name == other.name && self.size == other.size
    }
}

/// Icon bucket for the preview list, keyed by file extension.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum FileCategory {
    Pdf,
    Docx,
    Pptx,
    Xlsx,
    Txt,
    Csv,
    Md,
    Other,
}

impl FileCategory {
    pub fn from_name(name: &str) -> Self {
        let extension = name
            .rsplit_once('.')
            .map(|(_, ext)| ext.to_ascii_lowercase())
            .unwrap_or_default();
        match extension.as_str() {
            "pdf" => FileCategory::Pdf,
            "doc" | "docx" => FileCategory::Docx,
            "ppt" | "pptx" => FileCategory::Pptx,
            "xls" | "xlsx" => FileCategory::Xlsx,
            "txt" => FileCategory::Txt,
            "csv" => FileCategory::Csv,
            "md" | "markdown" => FileCategory::Md,
            _ => FileCategory::Other,
        }
    }

    pub const fn icon(self) -> &'static str {
        match self {
            FileCategory::Pdf => "icon-pdf",
            FileCategory::Docx => "icon-docx",
            FileCategory::Pptx => "icon-pptx",
            FileCategory::Xlsx => "icon-xlsx",
            FileCategory::Txt => "icon-txt",
            FileCategory::Csv => "icon-csv",
            FileCategory::Md => "icon-md",
            FileCategory::Other => "icon-file",
        }
    }
}

/// State of the per-file indicator slot in the preview list. Hidden until an
/// upload batch starts.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum ProgressMark {
    Hidden,
    Uploading,
    Done,
}

/// One row of the rendered preview list.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct FileRow {
    pub index: usize,
    pub name: String,
    pub size: u64,
    pub icon: &'static str,
    pub progress: ProgressMark,
}

/// Declarative render description of the selection area: the caller maps
/// this straight onto the view without consulting any other state.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct SelectionView {
    pub rows: Vec<FileRow>,
    pub caption: String,
    pub placeholder: bool,
}

/// Accumulated file selection, deduplicated by (name, size) and kept in
/// first-seen order.
#[derive(Debug, Default)]
pub struct SelectionManager {
    files: Vec<SelectedFile>,
}

impl SelectionManager {
    pub fn new() -> Self {
        Self::default()
    }

    /// Adds files that are not already selected; returns how many were new.
    pub fn add_files(&mut self, incoming: impl IntoIterator<Item = SelectedFile>) -> usize {
        let mut added = 0;
        for file in incoming {
            if self.files.iter().any(|existing| existing.same_document(&file)) {
                continue;
            }
            self.files.push(file);
            added += 1;
        }
        added
    }

    /// Silent no-op when the index is out of bounds.
    pub fn remove_at(&mut self, index: usize) {
        if index < self.files.len() {
            self.files.remove(index);
        }
    }

    pub fn clear(&mut self) {
        self.files.clear();
    }

    pub fn files(&self) -> &[SelectedFile] {
        &self.files
    }

    /// Copy handed to the upload orchestrator at submit time; later selection
    /// edits do not affect a batch already dispatched.
    pub fn snapshot(&self) -> Vec<SelectedFile> {
        self.files.clone()
    }

    pub fn len(&self) -> usize {
        self.files.len()
    }

    pub fn is_empty(&self) -> bool {
        self.files.is_empty()
    }

    pub fn view(&self, locale: Locale) -> SelectionView {
        if self.files.is_empty() {
            return SelectionView {
                rows: Vec::new(),
                caption: t(locale, "click_here_to_select"),
                placeholder: true,
            };
        }

        let rows = self
            .files
            .iter()
            .enumerate()
            .map(|(index, file)| FileRow {
                index,
                name: file.name.clone(),
                size: file.size,
                icon: FileCategory::from_name(&file.name).icon(),
                progress: ProgressMark::Hidden,
            })
            .collect();

        SelectionView {
            rows,
            caption: t_with(
                locale,
                "selected_files",
                &[("count", &self.files.len().to_string())],
            ),
            placeholder: false,
        }
    }
}

/// Submit gate: a structurally valid email AND at least one selected file.
pub fn submit_enabled(email: &str, selection: &SelectionManager) -> bool {
    is_valid_email(email.trim()) && !selection.is_empty()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn file(name: &str, size: u64) -> SelectedFile {
        SelectedFile {
            name: name.to_string(),
            size,
            path: PathBuf::from(name),
        }
    }

    #[test]
    fn duplicate_name_and_size_collapses_to_one_entry() {
        let mut selection = SelectionManager::new();
        selection.add_files([file("a.pdf", 100)]);
        let added = selection.add_files([file("a.pdf", 100)]);
        assert_eq!(added, 0);
        assert_eq!(selection.len(), 1);
    }

    #[test]
    fn same_name_different_size_is_a_different_document() {
        let mut selection = SelectionManager::new();
        selection.add_files([file("a.pdf", 100), file("a.pdf", 200)]);
        assert_eq!(selection.len(), 2);
    }

    #[test]
    fn preserves_first_seen_order_across_adds() {
        let mut selection = SelectionManager::new();
        selection.add_files([file("b.docx", 1), file("a.pdf", 2)]);
        selection.add_files([file("a.pdf", 2), file("c.txt", 3)]);
        let names: Vec<&str> = selection.files().iter().map(|f| f.name.as_str()).collect();
        assert_eq!(names, ["b.docx", "a.pdf", "c.txt"]);
    }

    #[test]
    fn remove_out_of_bounds_is_a_no_op() {
        let mut selection = SelectionManager::new();
        selection.add_files([file("a.pdf", 1)]);
        selection.remove_at(5);
        assert_eq!(selection.len(), 1);
        selection.remove_at(0);
        assert!(selection.is_empty());
    }

    #[test]
    fn no_add_remove_sequence_produces_duplicates() {
        let mut selection = SelectionManager::new();
        for round in 0..3 {
            selection.add_files([file("a.pdf", 10), file("b.md", 20), file("a.pdf", 10)]);
            if round == 1 {
                selection.remove_at(0);
            }
        }
        for (i, left) in selection.files().iter().enumerate() {
            for right in selection.files().iter().skip(i + 1) {
                assert!(!(left.name == right.name && left.size == right.size));
            }
        }
    }

    #[test]
    fn extension_categories_map_to_icons() {
        assert_eq!(FileCategory::from_name("report.PDF"), FileCategory::Pdf);
        assert_eq!(FileCategory::from_name("deck.pptx"), FileCategory::Pptx);
        assert_eq!(FileCategory::from_name("notes.markdown"), FileCategory::Md);
        assert_eq!(FileCategory::from_name("archive.tar.gz"), FileCategory::Other);
        assert_eq!(FileCategory::from_name("no_extension"), FileCategory::Other);
        assert_eq!(FileCategory::Csv.icon(), "icon-csv");
    }

    #[test]
    fn empty_selection_renders_placeholder() {
        let selection = SelectionManager::new();
        let view = selection.view(Locale::En);
        assert!(view.placeholder);
        assert!(view.rows.is_empty());
        assert_eq!(
            view.caption,
            "Click here to select documents or drag and drop your files here"
        );
    }

    #[test]
    fn rows_start_with_hidden_progress_slots() {
        let mut selection = SelectionManager::new();
        selection.add_files([file("a.pdf", 1), file("b.csv", 2)]);
        let view = selection.view(Locale::En);
        assert_eq!(view.caption, "Selected 2 file(s)");
        assert!(view
            .rows
            .iter()
            .all(|row| row.progress == ProgressMark::Hidden));
        assert_eq!(view.rows[1].icon, "icon-csv");
    }

    #[test]
    fn submit_requires_email_and_files() {
        let mut selection = SelectionManager::new();
        assert!(!submit_enabled("user@example.com", &selection));
        selection.add_files([file("a.pdf", 1)]);
        assert!(submit_enabled("user@example.com", &selection));
        assert!(!submit_enabled("bad-email", &selection));
    }
}
