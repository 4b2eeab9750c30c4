//! Client side of the data room: a typed API client for the backend plus the
//! state machines behind the data room screens (root app, Drive file picker,
//! file cards) and the presentational primitives they render.
pub mod api;
pub mod app;
pub mod card;
pub mod error;
pub mod format;
pub mod models;
pub mod picker;
pub mod ui;

pub use api::ApiClient;
pub use app::{AuthState, DataRoomApp, Screen};
pub use card::FileCard;
pub use error::ClientError;
pub use picker::{FilePicker, ImportSummary};
pub use ui::Dialogs;
