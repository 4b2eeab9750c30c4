//! Test helpers: a wiremock backend and a dialog recorder.

#![allow(dead_code)]

use dataroom_client::{ApiClient, Dialogs};
use serde_json::{json, Value};
use std::collections::VecDeque;
use std::sync::Mutex;
use wiremock::MockServer;

pub struct Backend {
    pub server: MockServer,
    pub api: ApiClient,
}

impl Backend {
    pub async fn start() -> Self {
        let server = MockServer::start().await;
        let api = ApiClient::new(format!("{}/api", server.uri()));
        Self { server, api }
    }
}

/// Records every dialog; `confirm` answers from a queue (default: no).
#[derive(Default)]
pub struct RecordingDialogs {
    pub alerts: Mutex<Vec<String>>,
    pub confirms: Mutex<Vec<String>>,
    pub opened: Mutex<Vec<String>>,
    pub redirects: Mutex<Vec<String>>,
    answers: Mutex<VecDeque<bool>>,
}

impl RecordingDialogs {
    pub fn answering(answers: &[bool]) -> Self {
        let dialogs = Self::default();
        dialogs.answers.lock().unwrap().extend(answers);
        dialogs
    }

    pub fn alerts(&self) -> Vec<String> {
        self.alerts.lock().unwrap().clone()
    }

    pub fn opened(&self) -> Vec<String> {
        self.opened.lock().unwrap().clone()
    }

    pub fn redirects(&self) -> Vec<String> {
        self.redirects.lock().unwrap().clone()
    }

    pub fn confirm_count(&self) -> usize {
        self.confirms.lock().unwrap().len()
    }
}

impl Dialogs for RecordingDialogs {
    fn alert(&self, message: &str) {
        self.alerts.lock().unwrap().push(message.to_string());
    }

    fn confirm(&self, message: &str) -> bool {
        self.confirms.lock().unwrap().push(message.to_string());
        self.answers.lock().unwrap().pop_front().unwrap_or(false)
    }

    fn open_in_new_context(&self, url: &str) {
        self.opened.lock().unwrap().push(url.to_string());
    }

    fn redirect(&self, url: &str) {
        self.redirects.lock().unwrap().push(url.to_string());
    }
}

pub fn dataroom_file(id: i64, name: &str) -> Value {
    json!({
        "id": id,
        "name": name,
        "mime_type": "application/pdf",
        "size": 2048,
        "google_drive_id": format!("drive-{}", id),
        "created_at": "2025-12-24T10:30:00+00:00"
    })
}

pub fn drive_file(id: &str, name: &str, mime_type: &str) -> Value {
    json!({"id": id, "name": name, "mimeType": mime_type, "size": "1024"})
}
