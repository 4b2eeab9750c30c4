pub mod auth;
pub mod drive;
pub mod files;
pub mod health;

pub use auth::{auth_callback, auth_login, auth_logout, auth_status};
pub use drive::{import_file, list_drive_files};
pub use files::{delete_file, get_file, list_files, search_files};
pub use health::{health_check, metrics_endpoint};
