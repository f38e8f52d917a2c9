//! Process-wide defaults and per-transaction gateway identity.
//!
//! [`Settings`] carries the allow-lists used by the country and
//! transaction-source fields. It is loaded once at startup from a TOML file
//! and handed explicitly to catalog construction; nothing here is global.
//!
//! # Example Configuration
//!
//! ```toml
//! allowed_countries = ["ARG", "BRA", "CHL"]
//! allowed_tx_sources = ["WEB", "MOBILE"]
//! ```
//!
//! # Environment Variables
//!
//! - `NPS_CONFIG` - Path to the configuration file (default: `nps.toml`)
//! - `NPS_ALLOWED_COUNTRIES` - Comma-separated override for `allowed_countries`
//! - `NPS_ALLOWED_TX_SOURCES` - Comma-separated override for `allowed_tx_sources`

use std::fmt;
use std::path::Path;

use serde::{Deserialize, Serialize};

use crate::error::ConfigError;

/// Allow-lists applied to enumeration-constrained fields.
///
/// Both lists default to `None`, meaning the corresponding field accepts any
/// value that passes its other rules.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Settings {
    /// Country codes accepted by `psp_Country`.
    #[serde(default, alias = "ALLOWED_COUNTRIES")]
    pub allowed_countries: Option<Vec<String>>,

    /// Transaction sources accepted by `psp_TxSource`.
    #[serde(default, alias = "ALLOWED_TX_SOURCES")]
    pub allowed_tx_sources: Option<Vec<String>>,
}

impl Settings {
    /// Loads settings from the path given by the `NPS_CONFIG` environment
    /// variable, falling back to `nps.toml` in the current directory.
    ///
    /// # Errors
    ///
    /// Returns an error if the file exists but cannot be read or parsed.
    pub fn load() -> Result<Self, ConfigError> {
        let path = std::env::var("NPS_CONFIG").unwrap_or_else(|_| "nps.toml".to_owned());
        Self::load_from(&path)
    }

    /// Loads settings from a specific file path.
    ///
    /// A missing file is not an error: defaults are used instead. Environment
    /// overrides are applied on top of whatever the file provides.
    ///
    /// # Errors
    ///
    /// Returns an error if the file exists but cannot be read or parsed.
    pub fn load_from(path: &str) -> Result<Self, ConfigError> {
        let content = if Path::new(path).exists() {
            std::fs::read_to_string(path).map_err(|source| ConfigError::Io {
                path: path.to_owned(),
                source,
            })?
        } else {
            #[cfg(feature = "telemetry")]
            tracing::debug!(path, "no configuration file found, using defaults");
            String::new()
        };

        let mut settings = Self::from_toml(&content).map_err(|source| ConfigError::Parse {
            path: path.to_owned(),
            source,
        })?;

        if let Ok(countries) = std::env::var("NPS_ALLOWED_COUNTRIES") {
            settings.allowed_countries = Some(split_list(&countries));
        }
        if let Ok(sources) = std::env::var("NPS_ALLOWED_TX_SOURCES") {
            settings.allowed_tx_sources = Some(split_list(&sources));
        }

        Ok(settings)
    }

    /// Parses settings from a TOML document. No environment overrides apply.
    ///
    /// # Errors
    ///
    /// Returns the TOML error if the document does not describe [`Settings`].
    pub fn from_toml(content: &str) -> Result<Self, toml::de::Error> {
        toml::from_str(content)
    }

    /// Sets the allowed country codes.
    #[must_use]
    pub fn with_allowed_countries<I, S>(mut self, countries: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.allowed_countries = Some(countries.into_iter().map(Into::into).collect());
        self
    }

    /// Sets the allowed transaction sources.
    #[must_use]
    pub fn with_allowed_tx_sources<I, S>(mut self, sources: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.allowed_tx_sources = Some(sources.into_iter().map(Into::into).collect());
        self
    }
}

fn split_list(value: &str) -> Vec<String> {
    value
        .split(',')
        .map(str::trim)
        .filter(|item| !item.is_empty())
        .map(str::to_owned)
        .collect()
}

/// Who is talking to the gateway, and where.
#[derive(Clone, PartialEq, Eq)]
pub struct GatewayIdentity {
    /// Gateway service URL.
    pub url: String,
    /// Merchant account name issued by the gateway.
    pub merchant_id: String,
    /// Shared secret used to sign requests.
    pub secret: String,
}

impl GatewayIdentity {
    /// Creates a new identity.
    #[must_use]
    pub fn new(
        url: impl Into<String>,
        merchant_id: impl Into<String>,
        secret: impl Into<String>,
    ) -> Self {
        Self {
            url: url.into(),
            merchant_id: merchant_id.into(),
            secret: secret.into(),
        }
    }
}

impl fmt::Debug for GatewayIdentity {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("GatewayIdentity")
            .field("url", &self.url)
            .field("merchant_id", &self.merchant_id)
            .field("secret", &"<redacted>")
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    #[test]
    fn test_default_has_no_allow_lists() {
        let settings = Settings::default();
        assert!(settings.allowed_countries.is_none());
        assert!(settings.allowed_tx_sources.is_none());
    }

    #[test]
    fn test_from_toml() {
        let settings = Settings::from_toml(
            r#"
            allowed_countries = ["ARG", "BRA"]
            allowed_tx_sources = ["WEB"]
            "#,
        )
        .unwrap();
        assert_eq!(
            settings.allowed_countries.as_deref(),
            Some(&["ARG".to_owned(), "BRA".to_owned()][..])
        );
        assert_eq!(settings.allowed_tx_sources.as_deref(), Some(&["WEB".to_owned()][..]));
    }

    #[test]
    fn test_from_toml_legacy_keys() {
        let settings = Settings::from_toml("ALLOWED_COUNTRIES = [\"URY\"]").unwrap();
        assert_eq!(settings.allowed_countries, Some(vec!["URY".to_owned()]));
        assert!(settings.allowed_tx_sources.is_none());
    }

    #[test]
    fn test_from_toml_rejects_wrong_type() {
        assert!(Settings::from_toml("allowed_countries = \"ARG\"").is_err());
    }

    #[test]
    fn test_load_from_missing_file_uses_defaults() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("absent.toml");
        let settings = Settings::load_from(path.to_str().unwrap()).unwrap();
        assert_eq!(settings.allowed_countries.is_some(), std::env::var("NPS_ALLOWED_COUNTRIES").is_ok());
    }

    #[test]
    fn test_load_from_file() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        writeln!(file, "allowed_tx_sources = [\"WEB\", \"POS\"]").unwrap();
        let settings = Settings::load_from(file.path().to_str().unwrap()).unwrap();
        if std::env::var("NPS_ALLOWED_TX_SOURCES").is_err() {
            assert_eq!(
                settings.allowed_tx_sources,
                Some(vec!["WEB".to_owned(), "POS".to_owned()])
            );
        }
    }

    #[test]
    fn test_load_from_invalid_file() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        writeln!(file, "allowed_countries = [").unwrap();
        let err = Settings::load_from(file.path().to_str().unwrap()).unwrap_err();
        assert!(matches!(err, ConfigError::Parse { .. }));
    }

    #[test]
    fn test_split_list() {
        assert_eq!(split_list("ARG, BRA,,CHL "), vec!["ARG", "BRA", "CHL"]);
    }

    #[test]
    fn test_identity_debug_redacts_secret() {
        let identity = GatewayIdentity::new("https://nps.example/ws", "merchant", "topsecret");
        let debug = format!("{identity:?}");
        assert!(debug.contains("merchant"));
        assert!(!debug.contains("topsecret"));
    }
}
