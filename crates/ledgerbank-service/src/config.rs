//! Service configuration.

use serde::Deserialize;
use std::path::Path;

use ledgerbank_core::{AccountType, DEFAULT_ACCOUNT_NUMBER_PREFIX};

/// Service configuration loaded from environment variables.
#[derive(Debug, Clone)]
pub struct ServiceConfig {
    /// Address to listen on (default: "0.0.0.0:8080").
    pub listen_addr: String,

    /// Path to `RocksDB` data directory (default: "/data/ledgerbank").
    pub data_dir: String,

    /// HS256 secret shared with the auth layer that issues bearer tokens.
    pub jwt_secret: Option<String>,

    /// Expected `iss` claim, if the issuer should be checked.
    pub jwt_issuer: Option<String>,

    /// Prefix for generated account numbers (default: "ACC").
    pub account_number_prefix: String,

    /// Account type used when an account is provisioned implicitly.
    pub default_account_type: AccountType,

    /// Maximum request body size in bytes.
    pub max_body_bytes: usize,

    /// Request timeout in seconds.
    pub request_timeout_seconds: u64,
}

/// Auth secrets file structure.
#[derive(Debug, Deserialize)]
struct AuthSecrets {
    jwt_secret: String,
    #[serde(default)]
    issuer: Option<String>,
}

impl ServiceConfig {
    /// Load configuration from environment variables and secrets files.
    #[must_use]
    pub fn from_env() -> Self {
        let (jwt_secret, jwt_issuer) = load_auth_secrets();

        let default_account_type = std::env::var("DEFAULT_ACCOUNT_TYPE")
            .ok()
            .and_then(|s| match s.parse() {
                Ok(kind) => Some(kind),
                Err(e) => {
                    tracing::warn!(error = %e, "Ignoring DEFAULT_ACCOUNT_TYPE");
                    None
                }
            })
            .unwrap_or_default();

        Self {
            listen_addr: std::env::var("LISTEN_ADDR").unwrap_or_else(|_| "0.0.0.0:8080".into()),
            data_dir: std::env::var("DATA_DIR").unwrap_or_else(|_| "/data/ledgerbank".into()),
            jwt_secret,
            jwt_issuer,
            account_number_prefix: std::env::var("ACCOUNT_NUMBER_PREFIX")
                .unwrap_or_else(|_| DEFAULT_ACCOUNT_NUMBER_PREFIX.into()),
            default_account_type,
            max_body_bytes: std::env::var("MAX_BODY_BYTES")
                .ok()
                .and_then(|s| s.parse().ok())
                .unwrap_or(1024 * 1024), // 1MB
            request_timeout_seconds: std::env::var("REQUEST_TIMEOUT_SECONDS")
                .ok()
                .and_then(|s| s.parse().ok())
                .unwrap_or(30),
        }
    }
}

/// Load the token secret from file or environment.
fn load_auth_secrets() -> (Option<String>, Option<String>) {
    let secret_paths = [
        ".secrets/auth.json",
        "ledgerbank/.secrets/auth.json",
        "../.secrets/auth.json",
    ];

    for path in &secret_paths {
        if let Ok(secrets) = load_secrets_file::<AuthSecrets>(path) {
            tracing::info!(path = %path, "Loaded auth secrets from file");
            return (Some(secrets.jwt_secret), secrets.issuer);
        }
    }

    tracing::debug!("Auth secrets file not found, using environment variables");
    (
        std::env::var("JWT_SECRET").ok(),
        std::env::var("JWT_ISSUER").ok(),
    )
}

/// Load secrets from a JSON file.
fn load_secrets_file<T: serde::de::DeserializeOwned>(path: &str) -> Result<T, std::io::Error> {
    let path = Path::new(path);
    if !path.exists() {
        return Err(std::io::Error::new(
            std::io::ErrorKind::NotFound,
            "Secrets file not found",
        ));
    }
    let contents = std::fs::read_to_string(path)?;
    serde_json::from_str(&contents)
        .map_err(|e| std::io::Error::new(std::io::ErrorKind::InvalidData, e))
}

impl Default for ServiceConfig {
    fn default() -> Self {
        Self {
            listen_addr: "0.0.0.0:8080".into(),
            data_dir: "/data/ledgerbank".into(),
            jwt_secret: None,
            jwt_issuer: None,
            account_number_prefix: DEFAULT_ACCOUNT_NUMBER_PREFIX.into(),
            default_account_type: AccountType::Savings,
            max_body_bytes: 1024 * 1024,
            request_timeout_seconds: 30,
        }
    }
}
