//! Root application state: authentication, the imported file list, the
//! search query and the picker.

use crate::api::ApiClient;
use crate::card::{CardView, FileCard};
use crate::models::DataroomFile;
use crate::picker::{FilePicker, ImportSummary};
use crate::ui::{Button, ButtonVariant, Dialogs};
use std::fmt;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AuthState {
    Unknown,
    Authenticated,
    Unauthenticated,
}

pub struct DataRoomApp {
    api: ApiClient,
    auth: AuthState,
    files: Vec<DataroomFile>,
    search_query: String,
    picker_open: bool,
    picker: FilePicker,
}

impl DataRoomApp {
    pub fn new(api: ApiClient) -> Self {
        Self {
            api,
            auth: AuthState::Unknown,
            files: Vec::new(),
            search_query: String::new(),
            picker_open: false,
            picker: FilePicker::new(),
        }
    }

    /// Resolve the auth state once, then load files when signed in.
    ///
    /// A failed status check counts as signed out.
    pub async fn mount(&mut self) {
        self.auth = match self.api.auth_status().await {
            Ok(status) if status.authenticated => AuthState::Authenticated,
            Ok(_) => AuthState::Unauthenticated,
            Err(e) => {
                tracing::error!(error = %e, "Failed to check auth status");
                AuthState::Unauthenticated
            }
        };

        if self.auth == AuthState::Authenticated {
            self.fetch_files().await;
        }
    }

    /// Reload the file list, through search when a query is set.
    ///
    /// On failure the previous list stays.
    pub async fn fetch_files(&mut self) {
        let query = self.search_query.trim();
        let result = if query.is_empty() {
            self.api.list_files().await
        } else {
            self.api.search_files(query).await
        };

        match result {
            Ok(response) => self.files = response.files,
            Err(e) => tracing::error!(error = %e, "Failed to fetch files"),
        }
    }

    pub async fn search(&mut self, query: &str) {
        self.search_query = query.to_string();
        self.fetch_files().await;
    }

    /// Send the user to Google's consent screen.
    pub async fn login(&self, dialogs: &dyn Dialogs) {
        match self.api.login_url().await {
            Ok(response) => dialogs.redirect(&response.auth_url),
            Err(e) => {
                tracing::error!(error = %e, "Failed to start login");
                dialogs.alert("Failed to start login");
            }
        }
    }

    /// Sign out once the logout call has been awaited, whatever its outcome.
    pub async fn logout(&mut self) {
        if let Err(e) = self.api.logout().await {
            tracing::error!(error = %e, "Failed to logout");
        }

        self.auth = AuthState::Unauthenticated;
        self.files.clear();
        self.close_picker();
    }

    pub async fn open_picker(&mut self) {
        self.picker_open = true;
        self.picker.open(&self.api).await;
    }

    pub fn close_picker(&mut self) {
        self.picker_open = false;
        self.picker.reset();
    }

    /// Import the picker's selection, then refetch and close the picker.
    pub async fn import_selected(&mut self, dialogs: &dyn Dialogs) -> Option<ImportSummary> {
        let summary = self.picker.import_selected(&self.api, dialogs).await?;
        self.fetch_files().await;
        self.close_picker();
        Some(summary)
    }

    pub fn view_file(&self, id: i64, dialogs: &dyn Dialogs) -> bool {
        match self.card(id) {
            Some(card) => {
                card.view(&self.api, dialogs);
                true
            }
            None => false,
        }
    }

    /// Delete through the file's card, refetching when it reports success.
    pub async fn delete_file(&mut self, id: i64, dialogs: &dyn Dialogs) -> bool {
        let Some(card) = self.card(id) else {
            return false;
        };

        let mut refresh = false;
        let deleted = card
            .delete(&self.api, dialogs, || {
                refresh = true;
                std::future::ready(())
            })
            .await;

        if refresh {
            self.fetch_files().await;
        }
        deleted
    }

    pub fn auth(&self) -> AuthState {
        self.auth
    }

    pub fn files(&self) -> &[DataroomFile] {
        &self.files
    }

    pub fn search_query(&self) -> &str {
        &self.search_query
    }

    pub fn is_picker_open(&self) -> bool {
        self.picker_open
    }

    pub fn picker(&self) -> &FilePicker {
        &self.picker
    }

    /// The picker together with the client it fetches through.
    pub fn picker_mut(&mut self) -> (&mut FilePicker, &ApiClient) {
        (&mut self.picker, &self.api)
    }

    pub fn api(&self) -> &ApiClient {
        &self.api
    }

    fn card(&self, id: i64) -> Option<FileCard> {
        self.files
            .iter()
            .find(|f| f.id == id)
            .cloned()
            .map(FileCard::new)
    }

    pub fn screen(&self) -> Screen {
        match self.auth {
            AuthState::Unknown => Screen::CheckingAuth,
            AuthState::Unauthenticated => Screen::Login {
                login_button: Button::new("Connect Google Drive"),
            },
            AuthState::Authenticated => {
                let cards: Vec<CardView> = self
                    .files
                    .iter()
                    .cloned()
                    .map(|f| FileCard::new(f).render())
                    .collect();
                let empty_message = cards.is_empty().then(|| {
                    if self.search_query.trim().is_empty() {
                        "No files yet. Import files from Google Drive to get started.".to_string()
                    } else {
                        format!("No files match \"{}\"", self.search_query.trim())
                    }
                });

                Screen::DataRoom(DataRoomView {
                    import_button: Button::new("Import from Google Drive"),
                    logout_button: Button::new("Logout").variant(ButtonVariant::Ghost),
                    search_query: self.search_query.clone(),
                    cards,
                    empty_message,
                    picker_open: self.picker_open,
                })
            }
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub enum Screen {
    CheckingAuth,
    Login { login_button: Button },
    DataRoom(DataRoomView),
}

#[derive(Debug, Clone, PartialEq)]
pub struct DataRoomView {
    pub import_button: Button,
    pub logout_button: Button,
    pub search_query: String,
    pub cards: Vec<CardView>,
    pub empty_message: Option<String>,
    pub picker_open: bool,
}

impl fmt::Display for Screen {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Screen::CheckingAuth => write!(f, "Checking authentication..."),
            Screen::Login { login_button } => {
                writeln!(f, "Acme Data Room")?;
                writeln!(f, "Connect your Google Drive to import documents.")?;
                write!(f, "{}", login_button)
            }
            Screen::DataRoom(view) => {
                writeln!(f, "Acme Data Room  {}  {}", view.import_button, view.logout_button)?;
                if !view.search_query.is_empty() {
                    writeln!(f, "Search: {}", view.search_query)?;
                }
                if let Some(message) = &view.empty_message {
                    return write!(f, "{}", message);
                }
                let count = view.cards.len();
                writeln!(f, "{} file(s)", count)?;
                for (index, card) in view.cards.iter().enumerate() {
                    write!(f, "{}", card)?;
                    if index + 1 < count {
                        writeln!(f)?;
                    }
                }
                Ok(())
            }
        }
    }
}
