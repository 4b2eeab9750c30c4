//! One imported file with its view and delete actions.

use crate::api::ApiClient;
use crate::format::{format_date, format_size};
use crate::models::DataroomFile;
use crate::ui::{Button, ButtonVariant, Dialogs};
use std::fmt;
use std::future::Future;

#[derive(Debug, Clone)]
pub struct FileCard {
    file: DataroomFile,
}

impl FileCard {
    pub fn new(file: DataroomFile) -> Self {
        Self { file }
    }

    pub fn file(&self) -> &DataroomFile {
        &self.file
    }

    /// Open the file in a new browser context. No state changes.
    pub fn view(&self, api: &ApiClient, dialogs: &dyn Dialogs) {
        dialogs.open_in_new_context(&api.view_url(self.file.id));
    }

    /// Ask for confirmation, delete, then run `on_deleted`.
    ///
    /// Nothing is removed locally; the parent refetches from `on_deleted`.
    /// Returns whether the file was deleted.
    pub async fn delete<F, Fut>(&self, api: &ApiClient, dialogs: &dyn Dialogs, on_deleted: F) -> bool
    where
        F: FnOnce() -> Fut,
        Fut: Future<Output = ()>,
    {
        let question = format!("Are you sure you want to delete \"{}\"?", self.file.name);
        if !dialogs.confirm(&question) {
            return false;
        }

        match api.delete_file(self.file.id).await {
            Ok(_) => {
                tracing::info!(file_id = self.file.id, "Deleted file");
                on_deleted().await;
                true
            }
            Err(e) => {
                tracing::error!(file_id = self.file.id, error = %e, "Failed to delete file");
                dialogs.alert("Failed to delete file");
                false
            }
        }
    }

    pub fn render(&self) -> CardView {
        CardView {
            id: self.file.id,
            name: self.file.name.clone(),
            size: format_size(self.file.size),
            imported: format_date(&self.file.created_at),
            view_button: Button::new("View").variant(ButtonVariant::Secondary),
            delete_button: Button::new("Delete").variant(ButtonVariant::Danger),
        }
    }
}

/// What a card shows.
#[derive(Debug, Clone, PartialEq)]
pub struct CardView {
    pub id: i64,
    pub name: String,
    pub size: String,
    pub imported: String,
    pub view_button: Button,
    pub delete_button: Button,
}

impl fmt::Display for CardView {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f, "#{} {}", self.id, self.name)?;
        writeln!(f, "    {} | Imported {}", self.size, self.imported)?;
        write!(f, "    {}  {}", self.view_button, self.delete_button)
    }
}
