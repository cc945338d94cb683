//! Client configuration.
//!
//! Deserialized from TOML. Every table is optional; an empty document yields a
//! production client with default HTTP settings.
//!
//! ```toml
//! environment = "sandbox"
//! timestamp_zone = "east_africa"
//!
//! [http]
//! timeout_secs = 20
//!
//! [endpoints]
//! b2c_payment = "/mpesa/b2c/v3/paymentrequest"
//! ```

use std::{fs, path::Path};

use serde::Deserialize;

use crate::{
    api::EndpointConfig,
    codec::TimestampZone,
    error::{DarajaError, Result},
    transport::{HttpConfig, http::validate_base_url},
};

/// Production API host.
pub const PRODUCTION_BASE_URL: &str = "https://api.safaricom.co.ke";

/// Sandbox API host.
pub const SANDBOX_BASE_URL: &str = "https://sandbox.safaricom.co.ke";

/// Daraja deployment to talk to.
#[derive(Debug, Clone, Copy, Default, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "snake_case")]
pub enum Environment {
    /// Live payments.
    #[default]
    Production,
    /// Safaricom's test deployment.
    Sandbox,
}

impl Environment {
    /// Returns the host for this environment.
    #[must_use]
    pub const fn base_url(self) -> &'static str {
        match self {
            Self::Production => PRODUCTION_BASE_URL,
            Self::Sandbox => SANDBOX_BASE_URL,
        }
    }
}

/// Root client configuration.
///
/// # Examples
///
/// ```
/// use mpesa_daraja::config::{DarajaConfig, Environment};
///
/// let config = DarajaConfig::from_toml(r#"environment = "sandbox""#).unwrap();
/// assert_eq!(config.environment, Environment::Sandbox);
/// assert_eq!(config.base_url(), "https://sandbox.safaricom.co.ke");
/// ```
#[derive(Debug, Clone, Default, Deserialize, PartialEq, Eq)]
#[serde(deny_unknown_fields)]
pub struct DarajaConfig {
    /// Deployment; ignored when `base_url` is set.
    #[serde(default)]
    pub environment: Environment,

    /// Explicit API host, e.g. a test double.
    #[serde(default)]
    pub base_url: Option<String>,

    /// Zone used to render request timestamps.
    #[serde(default)]
    pub timestamp_zone: TimestampZone,

    /// HTTP transport settings.
    #[serde(default)]
    pub http: HttpConfig,

    /// Per-operation path overrides.
    #[serde(default)]
    pub endpoints: EndpointConfig,
}

impl DarajaConfig {
    /// Parses and validates a TOML document.
    ///
    /// # Errors
    ///
    /// Returns [`DarajaError::Config`] if the document does not parse or fails
    /// [`validate`](Self::validate).
    pub fn from_toml(document: &str) -> Result<Self> {
        let config: Self = toml::from_str(document)
            .map_err(|e| DarajaError::Config(format!("failed to parse config: {e}")))?;
        config.validate()?;
        Ok(config)
    }

    /// Reads, parses and validates a TOML file.
    ///
    /// # Errors
    ///
    /// Returns [`DarajaError::Config`] if the file cannot be read or its
    /// contents are invalid.
    pub fn from_file(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();
        let document = fs::read_to_string(path).map_err(|e| {
            DarajaError::Config(format!("failed to read config file {}: {e}", path.display()))
        })?;
        Self::from_toml(&document)
    }

    /// Validates every section.
    ///
    /// # Errors
    ///
    /// Returns [`DarajaError::Config`] if `base_url` is not an absolute HTTP(S)
    /// URL, HTTP settings are out of range, or an endpoint override is unsafe.
    pub fn validate(&self) -> Result<()> {
        if let Some(base_url) = &self.base_url {
            validate_base_url(base_url)?;
        }
        self.http.validate()?;
        self.endpoints.validate()
    }

    /// Returns the effective API host.
    #[must_use]
    pub fn base_url(&self) -> &str {
        self.base_url.as_deref().unwrap_or(self.environment.base_url())
    }
}
