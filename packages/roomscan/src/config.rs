//! Pipeline configuration with secure credential handling.
//!
//! All external endpoints and credentials are resolved once at startup and
//! validated here, rather than scattered per-component checks. Secrets use
//! the `secrecy` crate so API keys never leak into logs or debug output.

use secrecy::{ExposeSecret, SecretBox};
use std::fmt;
use std::path::PathBuf;

use crate::error::{PipelineError, Result};

/// Default reverse image search endpoint.
pub const DEFAULT_SEARCH_ENDPOINT: &str = "http://localhost:5000/reverse";

/// Default directory for cropped item images.
pub const DEFAULT_CROP_DIR: &str = "cropped_items";

/// Default report output path.
pub const DEFAULT_REPORT_PATH: &str = "roomscan_report.xlsx";

/// A secret string that won't be logged or displayed.
pub struct SecretString(SecretBox<str>);

impl SecretString {
    pub fn new(value: impl Into<String>) -> Self {
        Self(SecretBox::new(Box::from(value.into().as_str())))
    }

    /// Expose the secret value for use.
    ///
    /// Only call this when actually using the secret (e.g., in an API
    /// request).
    pub fn expose(&self) -> &str {
        self.0.expose_secret()
    }
}

impl Clone for SecretString {
    fn clone(&self) -> Self {
        Self::new(self.expose().to_string())
    }
}

impl fmt::Debug for SecretString {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("[REDACTED]")
    }
}

impl fmt::Display for SecretString {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("[REDACTED]")
    }
}

impl From<String> for SecretString {
    fn from(s: String) -> Self {
        Self::new(s)
    }
}

impl From<&str> for SecretString {
    fn from(s: &str) -> Self {
        Self::new(s)
    }
}

/// Everything the production pipeline needs to talk to its collaborators.
#[derive(Debug, Clone)]
pub struct PipelineConfig {
    /// Google Vision API key for object localization.
    pub vision_api_key: SecretString,

    /// Reverse image search endpoint.
    pub search_endpoint: String,

    /// Apify token for the scraping actors.
    pub apify_token: SecretString,

    /// Directory cropped items are written into.
    pub crop_dir: PathBuf,

    /// Where the spreadsheet report is written.
    pub report_path: PathBuf,
}

impl PipelineConfig {
    /// Build a config from explicit values.
    pub fn new(vision_api_key: impl Into<SecretString>, apify_token: impl Into<SecretString>) -> Self {
        Self {
            vision_api_key: vision_api_key.into(),
            search_endpoint: DEFAULT_SEARCH_ENDPOINT.to_string(),
            apify_token: apify_token.into(),
            crop_dir: PathBuf::from(DEFAULT_CROP_DIR),
            report_path: PathBuf::from(DEFAULT_REPORT_PATH),
        }
    }

    /// Load configuration from the environment.
    ///
    /// `GOOGLE_VISION_API_KEY` and `APIFY_TOKEN` are required;
    /// `REVERSE_SEARCH_ENDPOINT` falls back to [`DEFAULT_SEARCH_ENDPOINT`].
    /// The caller (binary) is responsible for loading `.env` files first.
    pub fn from_env() -> Result<Self> {
        let vision_api_key = require_env("GOOGLE_VISION_API_KEY")?;
        let apify_token = require_env("APIFY_TOKEN")?;
        let search_endpoint = std::env::var("REVERSE_SEARCH_ENDPOINT")
            .unwrap_or_else(|_| DEFAULT_SEARCH_ENDPOINT.to_string());

        Ok(Self {
            vision_api_key: SecretString::new(vision_api_key),
            search_endpoint,
            apify_token: SecretString::new(apify_token),
            crop_dir: PathBuf::from(DEFAULT_CROP_DIR),
            report_path: PathBuf::from(DEFAULT_REPORT_PATH),
        })
    }

    /// Set the reverse search endpoint.
    pub fn with_search_endpoint(mut self, endpoint: impl Into<String>) -> Self {
        self.search_endpoint = endpoint.into();
        self
    }

    /// Set the crop output directory.
    pub fn with_crop_dir(mut self, dir: impl Into<PathBuf>) -> Self {
        self.crop_dir = dir.into();
        self
    }

    /// Set the report output path.
    pub fn with_report_path(mut self, path: impl Into<PathBuf>) -> Self {
        self.report_path = path.into();
        self
    }
}

fn require_env(name: &'static str) -> Result<String> {
    match std::env::var(name) {
        Ok(value) if !value.trim().is_empty() => Ok(value),
        _ => Err(PipelineError::Config(format!("{name} is not set"))),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn secrets_are_redacted_in_debug_and_display() {
        let secret = SecretString::new("sk-very-secret");
        assert_eq!(format!("{secret:?}"), "[REDACTED]");
        assert_eq!(format!("{secret}"), "[REDACTED]");
        assert_eq!(secret.expose(), "sk-very-secret");
    }

    #[test]
    fn config_debug_never_contains_secrets() {
        let config = PipelineConfig::new("vision-key", "apify-token");
        let dump = format!("{config:?}");
        assert!(!dump.contains("vision-key"));
        assert!(!dump.contains("apify-token"));
    }

    #[test]
    fn defaults_are_applied() {
        let config = PipelineConfig::new("k", "t");
        assert_eq!(config.search_endpoint, DEFAULT_SEARCH_ENDPOINT);
        assert_eq!(config.crop_dir, PathBuf::from(DEFAULT_CROP_DIR));
        assert_eq!(config.report_path, PathBuf::from(DEFAULT_REPORT_PATH));
    }
}
