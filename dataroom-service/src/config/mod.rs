use secrecy::Secret;
use serde::Deserialize;
use service_core::config::{self as core_config, get_env};
use service_core::error::AppError;
use std::env;

/// Read-only Drive access; the data room never writes back to Drive.
pub const GOOGLE_SCOPES: &[&str] = &[
    "https://www.googleapis.com/auth/drive.readonly",
    "https://www.googleapis.com/auth/drive.metadata.readonly",
];

#[derive(Debug, Clone, Deserialize)]
pub struct DataroomConfig {
    #[serde(flatten)]
    pub common: core_config::Config,
    pub environment: Environment,
    pub service_name: String,
    pub log_level: String,
    pub otlp_endpoint: Option<String>,
    pub frontend_url: String,
    pub database: DatabaseConfig,
    pub google: GoogleConfig,
    pub storage: StorageConfig,
}

#[derive(Debug, Clone, Deserialize, PartialEq)]
#[serde(rename_all = "lowercase")]
pub enum Environment {
    Dev,
    Prod,
}

#[derive(Debug, Clone, Deserialize)]
pub struct DatabaseConfig {
    pub url: String,
    pub max_connections: u32,
}

#[derive(Debug, Clone, Deserialize)]
pub struct GoogleConfig {
    pub client_id: String,
    pub client_secret: Secret<String>,
    pub redirect_uri: String,
    /// Consent screen endpoint.
    pub auth_url: String,
    /// Token endpoint used for code exchange and refresh.
    pub token_url: String,
    /// Drive v3 base, e.g. `https://www.googleapis.com/drive/v3`.
    pub drive_api_url: String,
}

#[derive(Debug, Clone, Deserialize)]
pub struct StorageConfig {
    pub upload_dir: String,
}

impl DataroomConfig {
    pub fn load() -> Result<Self, AppError> {
        // Load common config (handles .env and APP__ prefix)
        let common = core_config::Config::load()?;

        let environment: Environment = env::var("ENVIRONMENT")
            .unwrap_or_else(|_| "dev".to_string())
            .parse()
            .map_err(|e: String| AppError::ConfigError(anyhow::anyhow!(e)))?;
        let is_prod = environment == Environment::Prod;

        Ok(DataroomConfig {
            common,
            environment,
            service_name: get_env("SERVICE_NAME", Some("dataroom-service"), is_prod)?,
            log_level: get_env("LOG_LEVEL", Some("info"), is_prod)?,
            otlp_endpoint: env::var("OTLP_ENDPOINT").ok(),
            frontend_url: get_env("FRONTEND_URL", Some("http://localhost:5173"), is_prod)?,
            database: DatabaseConfig {
                url: get_env("DATABASE_URL", Some("sqlite://dataroom.db"), is_prod)?,
                max_connections: get_env("DATABASE_MAX_CONNECTIONS", Some("5"), is_prod)?
                    .parse()
                    .map_err(|e| {
                        AppError::ConfigError(anyhow::anyhow!(
                            "DATABASE_MAX_CONNECTIONS is not a number: {}",
                            e
                        ))
                    })?,
            },
            google: GoogleConfig {
                client_id: get_env("GOOGLE_CLIENT_ID", Some(""), is_prod)?,
                client_secret: Secret::new(get_env("GOOGLE_CLIENT_SECRET", Some(""), is_prod)?),
                redirect_uri: get_env(
                    "GOOGLE_REDIRECT_URI",
                    Some("http://localhost:5001/api/auth/callback"),
                    is_prod,
                )?,
                auth_url: env::var("GOOGLE_AUTH_URL")
                    .unwrap_or_else(|_| "https://accounts.google.com/o/oauth2/auth".to_string()),
                token_url: env::var("GOOGLE_TOKEN_URL")
                    .unwrap_or_else(|_| "https://oauth2.googleapis.com/token".to_string()),
                drive_api_url: env::var("GOOGLE_DRIVE_API_URL")
                    .unwrap_or_else(|_| "https://www.googleapis.com/drive/v3".to_string()),
            },
            storage: StorageConfig {
                upload_dir: get_env("UPLOAD_DIR", Some("uploads"), is_prod)?,
            },
        })
    }
}

impl std::str::FromStr for Environment {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "dev" | "development" => Ok(Environment::Dev),
            "prod" | "production" => Ok(Environment::Prod),
            _ => Err(format!("Invalid environment: {}", s)),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_environment_aliases() {
        assert_eq!("prod".parse::<Environment>(), Ok(Environment::Prod));
        assert_eq!("Production".parse::<Environment>(), Ok(Environment::Prod));
        assert_eq!("dev".parse::<Environment>(), Ok(Environment::Dev));
        assert!("staging".parse::<Environment>().is_err());
    }
}
