//! Error types for the Daraja client.
//!
//! Every fallible operation in this crate returns [`Result`], whose error type
//! is [`DarajaError`]. All variants implement [`std::error::Error`] via
//! [`thiserror::Error`].
//!
//! # Error Categories
//!
//! - **Validation** ([`DarajaError::Validation`]): a required field is missing or
//!   empty. Raised before any network traffic.
//! - **Transport** ([`DarajaError::Transport`]): DNS, connection, TLS, timeout or
//!   cancellation failures.
//! - **Decode** ([`DarajaError::Decode`]): the provider answered, but the body did
//!   not match the expected JSON shape.
//! - **Remote** ([`DarajaError::Remote`]): the provider reported a business-level
//!   failure through its error envelope.
//! - **Input** ([`DarajaError::InvalidInput`]): an untyped payload value has the
//!   wrong type for its field. Raised before any network traffic.
//! - **Local** ([`DarajaError::Encode`], [`DarajaError::Config`]): payload
//!   serialization or configuration problems.
//!
//! # Examples
//!
//! ```
//! use mpesa_daraja::error::{DarajaError, Result};
//!
//! fn require_shortcode(shortcode: &str) -> Result<&str> {
//!     if shortcode.is_empty() {
//!         return Err(DarajaError::missing("business_short_code"));
//!     }
//!     Ok(shortcode)
//! }
//!
//! assert!(require_shortcode("174379").is_ok());
//! assert!(matches!(
//!     require_shortcode(""),
//!     Err(DarajaError::Validation { field }) if field == "business_short_code"
//! ));
//! ```

use thiserror::Error;

/// Result type alias for Daraja operations.
pub type Result<T> = std::result::Result<T, DarajaError>;

/// Errors that can occur while talking to the Daraja API.
///
/// Callers must branch on the variant before trusting any response fields.
/// The client performs no local recovery: every error reaches the caller
/// unchanged.
///
/// # Error Recovery
///
/// - [`Validation`](Self::Validation), [`InvalidInput`](Self::InvalidInput): fix the
///   request and resend
/// - [`Transport`](Self::Transport): safe to retry when [`is_retryable`](Self::is_retryable)
///   returns `true`
/// - [`Decode`](Self::Decode): the provider changed its response shape or answered with
///   an unexpected error page
/// - [`Remote`](Self::Remote): inspect `code` and `description`; usually a business rule
///   rejected the payment
/// - [`Config`](Self::Config): fix configuration or environment
#[must_use = "errors should be handled, propagated, or explicitly panicked"]
#[derive(Debug, Error)]
pub enum DarajaError {
    /// A required request field is missing or empty.
    ///
    /// Raised before any HTTP request is built. `field` names the first
    /// offending field in declaration order.
    #[error("invalid payload: missing required field `{field}`")]
    Validation {
        /// Name of the missing field.
        field: String,
    },

    /// An untyped payload value does not fit its field.
    ///
    /// Raised by [`send_map`](crate::DarajaClient::send_map) before any HTTP
    /// request is built, e.g. when `amount` is not a decimal.
    #[error("invalid request payload: {0}")]
    InvalidInput(#[source] serde_json::Error),

    /// HTTP communication with the provider failed.
    ///
    /// Wraps [`reqwest::Error`]. Common causes:
    /// - request or connect timeout elapsed
    /// - connection refused or reset
    /// - DNS resolution failure
    /// - TLS handshake failure
    #[error("HTTP request failed: {0}")]
    Transport(#[from] reqwest::Error),

    /// The response body could not be decoded into the expected shape.
    ///
    /// `status` is the HTTP status the provider answered with.
    #[error("failed to decode response (HTTP {status}): {source}")]
    Decode {
        /// HTTP status code of the undecodable response.
        status: u16,
        /// Underlying JSON error.
        #[source]
        source: serde_json::Error,
    },

    /// The provider reported a business-level failure.
    ///
    /// Only the STK push operation decodes a distinct failure envelope;
    /// other operations return their acknowledgement shape and expose
    /// `error_code` on it instead.
    #[error("request rejected by M-Pesa: {description} (code: {code})")]
    Remote {
        /// Provider result code.
        code: String,
        /// Provider result description.
        description: String,
    },

    /// The request payload could not be serialized.
    #[error("failed to encode request payload: {0}")]
    Encode(#[source] serde_json::Error),

    /// Configuration is invalid.
    ///
    /// Raised by config parsing and validation, by client construction, and
    /// when credentials cannot be read from the environment.
    #[error("invalid configuration: {0}")]
    Config(String),
}

impl DarajaError {
    /// Creates a [`Validation`](Self::Validation) error for `field`.
    pub fn missing(field: impl Into<String>) -> Self {
        Self::Validation { field: field.into() }
    }

    /// Returns `true` if resending the same request might succeed.
    ///
    /// Only timeouts and connection failures qualify. This is a
    /// classification helper; the client itself never retries.
    #[must_use]
    pub fn is_retryable(&self) -> bool {
        match self {
            Self::Transport(err) => err.is_timeout() || err.is_connect(),
            _ => false,
        }
    }

    /// Returns the name of the offending field for validation errors.
    #[must_use]
    pub fn field(&self) -> Option<&str> {
        match self {
            Self::Validation { field } => Some(field),
            _ => None,
        }
    }
}
