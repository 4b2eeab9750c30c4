pub mod database;
pub mod drive;
pub mod google_api;
pub mod google_oauth;
pub mod metrics;
pub mod oauth_state;
pub mod storage;
pub mod tokens;

pub use database::Database;
pub use drive::DriveClient;
pub use google_api::GoogleApiError;
pub use google_oauth::{GoogleOAuthClient, TokenGrant};
pub use metrics::{get_metrics, init_metrics, record_import};
pub use oauth_state::OAuthStateStore;
pub use storage::{storage_key_for, LocalStorage, Storage};
pub use tokens::TokenManager;
