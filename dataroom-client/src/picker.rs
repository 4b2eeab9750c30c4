//! Google Drive file picker: paged listing, name search, multi-selection
//! across pages and a sequential import of the selection.

use crate::api::ApiClient;
use crate::format::format_size;
use crate::models::{DriveFile, ImportRequest};
use crate::ui::{Button, ButtonVariant, Dialogs};
use std::fmt;

/// Page token of the first page.
const FIRST_PAGE: &str = "";

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct ImportProgress {
    pub done: usize,
    pub total: usize,
}

/// Outcome of one import batch.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ImportSummary {
    pub imported: usize,
    pub failed: usize,
}

impl ImportSummary {
    pub fn message(&self) -> String {
        if self.failed == 0 {
            format!("Imported {} file(s).", self.imported)
        } else {
            format!(
                "Imported {} file(s). {} file(s) failed or already exist.",
                self.imported, self.failed
            )
        }
    }
}

#[derive(Debug, Default)]
pub struct FilePicker {
    files: Vec<DriveFile>,
    current_page_token: String,
    next_page_token: Option<String>,
    page_history: Vec<String>,
    query: String,
    /// Selection order is import order.
    selected: Vec<DriveFile>,
    loading: bool,
    importing: bool,
    progress: ImportProgress,
}

impl FilePicker {
    pub fn new() -> Self {
        Self::default()
    }

    /// Load the first page.
    pub async fn open(&mut self, api: &ApiClient) {
        self.load_page(api, FIRST_PAGE.to_string()).await;
    }

    /// Fetch `page_token` (empty for the first page) with the current query.
    ///
    /// The response replaces the listing and the next-page token. A failed
    /// fetch is logged and leaves the picker as it was.
    /// Fetch one page. Returns whether the listing was replaced.
    pub async fn load_page(&mut self, api: &ApiClient, page_token: String) -> bool {
        self.loading = true;
        let result = api
            .drive_files(Some(page_token.as_str()), Some(self.query.as_str()))
            .await;
        self.loading = false;

        match result {
            Ok(list) => {
                self.files = list.files;
                self.next_page_token = list.next_page_token.filter(|t| !t.is_empty());
                self.current_page_token = page_token;
                true
            }
            Err(e) => {
                tracing::error!(error = %e, "Failed to load Drive files");
                false
            }
        }
    }

    pub async fn next_page(&mut self, api: &ApiClient) {
        let Some(next) = self.next_page_token.clone() else {
            return;
        };
        let current = self.current_page_token.clone();
        if self.load_page(api, next).await {
            self.page_history.push(current);
        }
    }

    pub async fn previous_page(&mut self, api: &ApiClient) {
        let Some(previous) = self.page_history.pop() else {
            return;
        };
        if !self.load_page(api, previous.clone()).await {
            self.page_history.push(previous);
        }
    }

    /// Filter by name, starting again from the first page.
    pub async fn search(&mut self, api: &ApiClient, query: &str) {
        self.query = query.trim().to_string();
        self.page_history.clear();
        self.load_page(api, FIRST_PAGE.to_string()).await;
    }

    pub fn has_next_page(&self) -> bool {
        self.next_page_token.is_some()
    }

    pub fn has_previous_page(&self) -> bool {
        !self.page_history.is_empty()
    }

    /// Listed files minus folders.
    pub fn visible_files(&self) -> impl Iterator<Item = &DriveFile> {
        self.files.iter().filter(|f| !f.is_folder())
    }

    pub fn query(&self) -> &str {
        &self.query
    }

    pub fn is_loading(&self) -> bool {
        self.loading
    }

    pub fn is_importing(&self) -> bool {
        self.importing
    }

    pub fn progress(&self) -> ImportProgress {
        self.progress
    }

    pub fn toggle(&mut self, file: &DriveFile) {
        match self.selected.iter().position(|f| f.id == file.id) {
            Some(index) => {
                self.selected.remove(index);
            }
            None => self.selected.push(file.clone()),
        }
    }

    /// Toggle a visible file by id. Returns false when no such file is listed.
    pub fn toggle_id(&mut self, id: &str) -> bool {
        let Some(file) = self.visible_files().find(|f| f.id == id).cloned() else {
            return false;
        };
        self.toggle(&file);
        true
    }

    pub fn is_selected(&self, id: &str) -> bool {
        self.selected.iter().any(|f| f.id == id)
    }

    pub fn selected(&self) -> &[DriveFile] {
        &self.selected
    }

    /// Import every selected file, one request at a time.
    ///
    /// Failures (including duplicates) are counted, not retried; the batch
    /// ends with a single alert. An empty selection does nothing and yields
    /// `None`.
    pub async fn import_selected(
        &mut self,
        api: &ApiClient,
        dialogs: &dyn Dialogs,
    ) -> Option<ImportSummary> {
        if self.selected.is_empty() {
            return None;
        }

        let batch = self.selected.clone();
        self.importing = true;
        self.progress = ImportProgress {
            done: 0,
            total: batch.len(),
        };

        let mut summary = ImportSummary {
            imported: 0,
            failed: 0,
        };
        for file in &batch {
            match api.import_file(&ImportRequest::from(file)).await {
                Ok(_) => summary.imported += 1,
                Err(e) => {
                    tracing::warn!(file_id = %file.id, name = %file.name, error = %e, "Import failed");
                    summary.failed += 1;
                }
            }
            self.progress.done += 1;
        }

        self.importing = false;
        dialogs.alert(&summary.message());
        Some(summary)
    }

    /// Forget listing, paging, query and selection.
    pub fn reset(&mut self) {
        *self = Self::default();
    }

    pub fn render(&self) -> PickerView {
        let rows = self
            .visible_files()
            .map(|file| PickerRow {
                id: file.id.clone(),
                name: file.name.clone(),
                size: size_label(file),
                selected: self.is_selected(&file.id),
            })
            .collect();

        let import_label = if self.importing {
            format!("Importing {}/{}...", self.progress.done, self.progress.total)
        } else {
            format!("Import {} file(s)", self.selected.len())
        };

        PickerView {
            query: self.query.clone(),
            rows,
            loading: self.loading,
            previous_button: Button::new("Previous")
                .variant(ButtonVariant::Secondary)
                .disabled(!self.has_previous_page()),
            next_button: Button::new("Next")
                .variant(ButtonVariant::Secondary)
                .disabled(!self.has_next_page()),
            import_button: Button::new(import_label)
                .disabled(self.selected.is_empty() || self.importing),
            cancel_button: Button::new("Cancel").variant(ButtonVariant::Ghost),
        }
    }
}

/// "Google Doc" for Workspace documents, otherwise the formatted byte size.
pub fn size_label(file: &DriveFile) -> String {
    if file.is_google_doc() {
        return "Google Doc".to_string();
    }
    format_size(file.size.as_deref().and_then(|s| s.parse().ok()))
}

#[derive(Debug, Clone, PartialEq)]
pub struct PickerRow {
    pub id: String,
    pub name: String,
    pub size: String,
    pub selected: bool,
}

#[derive(Debug, Clone, PartialEq)]
pub struct PickerView {
    pub query: String,
    pub rows: Vec<PickerRow>,
    pub loading: bool,
    pub previous_button: Button,
    pub next_button: Button,
    pub import_button: Button,
    pub cancel_button: Button,
}

impl fmt::Display for PickerView {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f, "Import from Google Drive")?;
        if !self.query.is_empty() {
            writeln!(f, "Search: {}", self.query)?;
        }
        if self.loading {
            writeln!(f, "Loading...")?;
        } else if self.rows.is_empty() {
            writeln!(f, "No files found")?;
        }
        for (index, row) in self.rows.iter().enumerate() {
            let mark = if row.selected { "x" } else { " " };
            writeln!(f, "{:>3}. [{}] {} ({})", index + 1, mark, row.name, row.size)?;
        }
        writeln!(f, "{}  {}", self.previous_button, self.next_button)?;
        write!(f, "{}  {}", self.cancel_button, self.import_button)
    }
}
