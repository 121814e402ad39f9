//! Global configuration parsing, validation, and credential loading.

use std::env;
use std::fs;
use std::path::Path;

use serde::Deserialize;
use tracing::warn;

use crate::{AppError, Result};

/// Keyring service name under which tokens are stored.
const KEYRING_SERVICE: &str = "postpilot";

/// Backend connectivity settings.
///
/// The bearer token for backend calls is loaded at runtime via OS keychain
/// or environment variables, not from the TOML config file.
#[derive(Debug, Clone, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "snake_case")]
pub struct BackendConfig {
    /// Base URL of the backend, e.g. `http://localhost:5000`.
    pub base_url: String,
    /// Request timeout in seconds.
    #[serde(default = "default_request_timeout")]
    pub request_timeout_seconds: u64,
    /// Connect timeout in seconds.
    #[serde(default = "default_connect_timeout")]
    pub connect_timeout_seconds: u64,
}

fn default_request_timeout() -> u64 {
    30
}

fn default_connect_timeout() -> u64 {
    10
}

/// Publish-due scanner settings.
#[derive(Debug, Clone, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "snake_case")]
pub struct ScannerConfig {
    /// Whether the daemon runs the scanner at all.
    #[serde(default = "default_true")]
    pub enabled: bool,
    /// Fixed period between scan passes.
    #[serde(default = "default_poll_interval")]
    pub poll_interval_seconds: u64,
}

fn default_true() -> bool {
    true
}

fn default_poll_interval() -> u64 {
    60
}

/// Remote chat-completion endpoint used for idea generation.
#[derive(Debug, Clone, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "snake_case")]
pub struct GeneratorConfig {
    /// Chat completions URL, e.g. `https://api.openai.com/v1/chat/completions`.
    pub endpoint: String,
    /// Model identifier sent with every request.
    pub model: String,
    /// Upper bound on generated tokens.
    #[serde(default = "default_max_tokens")]
    pub max_tokens: u32,
    /// API key for the completion endpoint (populated at runtime).
    #[serde(skip)]
    pub api_key: String,
}

fn default_max_tokens() -> u32 {
    1024
}

/// Global configuration parsed from `config.toml`.
#[derive(Debug, Clone, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "snake_case")]
pub struct GlobalConfig {
    /// Backend connectivity settings.
    pub backend: BackendConfig,
    /// Scanner thresholds and behavior.
    #[serde(default = "ScannerConfig::default_config")]
    pub scanner: ScannerConfig,
    /// Idea generation endpoint; optional, generation commands fail without it.
    pub generator: Option<GeneratorConfig>,
    /// Backend bearer token (populated at runtime).
    #[serde(skip)]
    pub access_token: String,
    /// LinkedIn access token (populated at runtime; may legitimately be absent
    /// until the operator completes the OAuth round-trip).
    #[serde(skip)]
    pub linkedin_token: Option<String>,
}

impl ScannerConfig {
    fn default_config() -> Self {
        Self {
            enabled: true,
            poll_interval_seconds: default_poll_interval(),
        }
    }
}

impl GlobalConfig {
    /// Load and validate configuration from a TOML file path.
    ///
    /// # Errors
    ///
    /// Returns `AppError::Config` if the file cannot be read or contains
    /// invalid TOML, or if validation fails.
    pub fn load_from_path(path: impl AsRef<Path>) -> Result<Self> {
        let raw = fs::read_to_string(path)
            .map_err(|err| AppError::Config(format!("failed to read config: {err}")))?;
        Self::from_toml_str(&raw)
    }

    /// Parse configuration from a TOML string and validate it.
    ///
    /// # Errors
    ///
    /// Returns `AppError::Config` if parsing or validation fails.
    pub fn from_toml_str(raw: &str) -> Result<Self> {
        let config: Self = toml::from_str(raw)?;
        config.validate()?;
        Ok(config)
    }

    /// Load tokens from OS keychain with env-var fallback.
    ///
    /// Tries the `postpilot` keyring service first, then falls back to
    /// `POSTPILOT_ACCESS_TOKEN` / `POSTPILOT_LINKEDIN_TOKEN` /
    /// `POSTPILOT_GENERATOR_API_KEY` environment variables. The backend
    /// token is mandatory; the LinkedIn token may be absent (the scanner
    /// emits an auth-required event instead of publishing).
    ///
    /// # Errors
    ///
    /// Returns `AppError::Config` if the backend token is found nowhere, or
    /// if the generator is configured but its API key is missing.
    pub async fn load_credentials(&mut self) -> Result<()> {
        self.access_token = load_credential("access_token", "POSTPILOT_ACCESS_TOKEN")
            .await?
            .ok_or_else(|| {
                AppError::Config(
                    "backend access token not found in keychain or POSTPILOT_ACCESS_TOKEN env var"
                        .into(),
                )
            })?;
        self.linkedin_token =
            load_credential("linkedin_token", "POSTPILOT_LINKEDIN_TOKEN").await?;
        if let Some(generator) = self.generator.as_mut() {
            generator.api_key =
                load_credential("generator_api_key", "POSTPILOT_GENERATOR_API_KEY")
                    .await?
                    .ok_or_else(|| {
                        AppError::Config(
                            "generator configured but no API key in keychain or \
                             POSTPILOT_GENERATOR_API_KEY env var"
                                .into(),
                        )
                    })?;
        }
        Ok(())
    }

    /// Redirect target for obtaining a LinkedIn access token.
    #[must_use]
    pub fn linkedin_auth_url(&self) -> String {
        format!("{}/auth/linkedin", self.backend.base_url)
    }

    fn validate(&self) -> Result<()> {
        if self.backend.base_url.is_empty() {
            return Err(AppError::Config("backend.base_url must not be empty".into()));
        }
        if !self.backend.base_url.starts_with("http://")
            && !self.backend.base_url.starts_with("https://")
        {
            return Err(AppError::Config(
                "backend.base_url must start with http:// or https://".into(),
            ));
        }
        if self.backend.base_url.ends_with('/') {
            return Err(AppError::Config(
                "backend.base_url must not end with a trailing slash".into(),
            ));
        }
        if self.scanner.poll_interval_seconds == 0 {
            return Err(AppError::Config(
                "scanner.poll_interval_seconds must be greater than zero".into(),
            ));
        }
        Ok(())
    }
}

/// Store a token in the OS keychain under the `postpilot` service.
///
/// # Errors
///
/// Returns `AppError::Config` if the keychain rejects the write.
pub async fn store_credential(keyring_key: &str, value: &str) -> Result<()> {
    let key = keyring_key.to_owned();
    let value = value.to_owned();
    tokio::task::spawn_blocking(move || {
        keyring::Entry::new(KEYRING_SERVICE, &key).and_then(|entry| entry.set_password(&value))
    })
    .await
    .map_err(|err| AppError::Config(format!("keychain task panicked: {err}")))?
    .map_err(|err| AppError::Config(format!("failed to store credential: {err}")))
}

/// Load a single credential from OS keychain with env-var fallback.
///
/// Returns `Ok(None)` when neither source has a value — callers decide
/// whether that is an error.
async fn load_credential(keyring_key: &str, env_key: &str) -> Result<Option<String>> {
    let key = keyring_key.to_owned();

    // Try OS keychain first via spawn_blocking (keyring is synchronous I/O).
    let keychain_result = tokio::task::spawn_blocking(move || {
        keyring::Entry::new(KEYRING_SERVICE, &key).and_then(|entry| entry.get_password())
    })
    .await
    .map_err(|err| AppError::Config(format!("keychain task panicked: {err}")))?;

    match keychain_result {
        Ok(value) if !value.is_empty() => return Ok(Some(value)),
        Ok(_) => {
            warn!(key = keyring_key, "keychain entry is empty, trying env var");
        }
        Err(err) => {
            warn!(
                key = keyring_key,
                ?err,
                "keychain lookup failed, trying env var"
            );
        }
    }

    // Fallback to environment variable.
    Ok(env::var(env_key).ok().filter(|value| !value.is_empty()))
}
