//! Test helpers for dataroom-service integration tests.
//!
//! Every app gets its own SQLite file and upload directory in a temp dir, and
//! its own wiremock server standing in for Google's OAuth and Drive endpoints.

#![allow(dead_code)]

use chrono::{DateTime, Utc};
use dataroom_service::config::{
    DatabaseConfig, DataroomConfig, Environment, GoogleConfig, StorageConfig,
};
use dataroom_service::models::{NewFile, StoredFile};
use dataroom_service::services::{storage_key_for, Database};
use dataroom_service::startup::Application;
use secrecy::Secret;
use std::path::PathBuf;
use tempfile::TempDir;
use wiremock::MockServer;

pub const FRONTEND_URL: &str = "http://localhost:5173";
pub const ACCESS_TOKEN: &str = "access-1";

pub struct TestApp {
    pub address: String,
    pub port: u16,
    pub db: Database,
    pub google: MockServer,
    pub upload_dir: PathBuf,
    client: reqwest::Client,
    _dir: TempDir,
}

impl TestApp {
    pub async fn spawn() -> Self {
        let dir = tempfile::tempdir().expect("Failed to create temp dir");
        let upload_dir = dir.path().join("uploads");
        let google = MockServer::start().await;

        let config = DataroomConfig {
            common: service_core::config::Config { port: 0 },
            environment: Environment::Dev,
            service_name: "dataroom-service-test".to_string(),
            log_level: "error".to_string(),
            otlp_endpoint: None,
            frontend_url: FRONTEND_URL.to_string(),
            database: DatabaseConfig {
                url: format!("sqlite://{}", dir.path().join("dataroom.db").display()),
                max_connections: 5,
            },
            google: GoogleConfig {
                client_id: "test-client-id".to_string(),
                client_secret: Secret::new("test-client-secret".to_string()),
                redirect_uri: "http://localhost:5001/api/auth/callback".to_string(),
                auth_url: format!("{}/o/oauth2/auth", google.uri()),
                token_url: format!("{}/token", google.uri()),
                drive_api_url: format!("{}/drive/v3", google.uri()),
            },
            storage: StorageConfig {
                upload_dir: upload_dir.display().to_string(),
            },
        };

        let app = Application::build(config)
            .await
            .expect("Failed to build test application");
        let port = app.port();
        let db = app.db().clone();

        tokio::spawn(async move {
            app.run_until_stopped().await.ok();
        });

        let client = reqwest::Client::builder()
            .redirect(reqwest::redirect::Policy::none())
            .build()
            .expect("Failed to build HTTP client");

        let address = format!("http://127.0.0.1:{}", port);
        for _ in 0..50 {
            if client.get(format!("{}/health", address)).send().await.is_ok() {
                break;
            }
            tokio::time::sleep(tokio::time::Duration::from_millis(20)).await;
        }

        TestApp {
            address,
            port,
            db,
            google,
            upload_dir,
            client,
            _dir: dir,
        }
    }

    /// HTTP client that does not follow redirects.
    pub fn client(&self) -> &reqwest::Client {
        &self.client
    }

    pub fn api(&self, path: &str) -> String {
        format!("{}/api{}", self.address, path)
    }

    pub async fn seed_token(
        &self,
        access_token: &str,
        refresh_token: Option<&str>,
        expiry: Option<DateTime<Utc>>,
    ) {
        self.db
            .save_token(access_token, refresh_token, expiry)
            .await
            .expect("Failed to seed token");
    }

    /// A token that stays valid for the whole test.
    pub async fn sign_in(&self) {
        self.seed_token(
            ACCESS_TOKEN,
            Some("refresh-1"),
            Some(Utc::now() + chrono::Duration::hours(1)),
        )
        .await;
    }

    /// Insert a file record and write its bytes, as a finished import would.
    pub async fn seed_file(&self, drive_id: &str, name: &str, bytes: &[u8]) -> StoredFile {
        let storage_key = storage_key_for(drive_id, name);
        std::fs::write(self.upload_dir.join(&storage_key), bytes).expect("Failed to write file");

        self.db
            .insert_file(&NewFile {
                name: name.to_string(),
                mime_type: Some("text/plain".to_string()),
                size: Some(bytes.len() as i64),
                google_drive_id: drive_id.to_string(),
                storage_key,
            })
            .await
            .expect("Failed to seed file")
            .expect("Seeded file already exists")
    }

    pub fn stored_path(&self, file: &StoredFile) -> PathBuf {
        self.upload_dir.join(&file.storage_key)
    }
}
