pub mod auth;
pub mod drive;
pub mod files;

pub use auth::{AuthStatusResponse, LoginResponse, OAuthCallbackParams};
pub use drive::{DriveFile, DriveFileList, DriveListParams, ImportRequest, ImportResponse};
pub use files::{FileListResponse, FileResponse, SearchParams, SuccessResponse};
