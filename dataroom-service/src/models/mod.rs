pub mod file;
pub mod oauth_token;

pub use file::{NewFile, StoredFile};
pub use oauth_token::OAuthToken;
