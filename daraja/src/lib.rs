//! M-Pesa Daraja: typed async client for Safaricom's Daraja REST API
//!
//! Builds authenticated requests for the Daraja operations, sends them over a
//! pooled HTTP client and decodes the provider's JSON answers into typed
//! records.
//!
//! # Architecture
//!
//! ```text
//! ┌──────────────────┐
//! │  Caller          │  builds request records, holds the access token
//! └────────┬─────────┘
//!          │ stk_push(token, &StkPushRequest)
//!          │
//! ┌────────▼───────────────────────────────────────┐
//! │           DarajaClient (this crate)            │
//! │  ┌──────────────┐      ┌──────────────────┐    │
//! │  │  api records │──────│  codec           │    │
//! │  │  (validate,  │      │  (timestamp,     │    │
//! │  │   to_wire)   │      │   password)      │    │
//! │  └──────────────┘      └──────────────────┘    │
//! └────────┬───────────────────────────────────────┘
//!          │ HTTPS, Authorization: Bearer <token>
//!          │
//! ┌────────▼─────────┐
//! │  Daraja API      │  api.safaricom.co.ke / sandbox
//! └──────────────────┘
//! ```
//!
//! # Quick Start
//!
//! ## 1. Get an Access Token
//!
//! ```rust,no_run
//! use mpesa_daraja::{DarajaClient, api::ConsumerCredentials};
//!
//! # async fn example() -> mpesa_daraja::error::Result<()> {
//! let client = DarajaClient::new()?;
//! let credentials = ConsumerCredentials::from_env()?;
//!
//! let token = client.generate_token(&credentials).await?;
//! println!("token valid for {}s", token.expires_in);
//! # Ok(())
//! # }
//! ```
//!
//! ## 2. Query an Account Balance
//!
//! ```rust,no_run
//! use mpesa_daraja::{
//!     DarajaClient,
//!     api::{AccountBalanceRequest, IdentifierType},
//!     config::DarajaConfig,
//! };
//!
//! # async fn example(token: &str) -> mpesa_daraja::error::Result<()> {
//! let config = DarajaConfig::from_toml(r#"environment = "sandbox""#)?;
//! let client = DarajaClient::with_config(&config)?;
//!
//! let request = AccountBalanceRequest {
//!     initiator: "testapi".to_owned(),
//!     security_credential: "encrypted-credential".into(),
//!     party_a: "600996".to_owned(),
//!     identifier_type: IdentifierType::ShortCode,
//!     remarks: "balance check".to_owned(),
//!     queue_timeout_url: "https://example.com/timeout".to_owned(),
//!     result_url: "https://example.com/result".to_owned(),
//! };
//!
//! let ack = client.account_balance(token, &request).await?;
//! if ack.is_accepted() {
//!     println!("conversation {}", ack.conversation_id);
//! }
//! # Ok(())
//! # }
//! ```
//!
//! ## 3. Send an Untyped Payload
//!
//! ```rust,no_run
//! use mpesa_daraja::{DarajaClient, api::PullTransactionsRequest};
//! use serde_json::json;
//!
//! # async fn example(token: &str) -> mpesa_daraja::error::Result<()> {
//! let client = DarajaClient::new()?;
//! let payload = json!({
//!     "short_code": "600000",
//!     "start_date": "2024-01-01 00:00:00",
//!     "end_date": "2024-01-01 23:59:59"
//! });
//!
//! let page = client
//!     .send_map::<PullTransactionsRequest>(token, payload.as_object().unwrap())
//!     .await?;
//! println!("{} transactions", page.transactions.len());
//! # Ok(())
//! # }
//! ```
//!
//! # Module Organization
//!
//! - [`client`]: [`DarajaClient`], one method per operation plus `send`/`send_map`
//! - [`api`]: request and response records, the [`api::Operation`] catalogue
//! - [`codec`]: timestamps, STK password encoding, required-field checks
//! - [`config`]: TOML configuration
//! - [`transport`]: HTTP transport abstraction
//! - [`error`]: Error types with recovery guidance
//!
//! # Error Handling
//!
//! Every call returns [`Result<T>`](error::Result). Branch on the variant
//! before trusting any response field:
//!
//! ```rust
//! use mpesa_daraja::DarajaError;
//!
//! fn describe(err: &DarajaError) -> String {
//!     match err {
//!         DarajaError::Validation { field } => format!("fix field {field}"),
//!         DarajaError::Remote { code, description } => format!("rejected {code}: {description}"),
//!         e if e.is_retryable() => "try again".to_owned(),
//!         e => e.to_string(),
//!     }
//! }
//!
//! assert_eq!(describe(&DarajaError::missing("amount")), "fix field amount");
//! ```
//!
//! # Security Considerations
//!
//! - Passkeys, security credentials, consumer secrets and tokens are redacted
//!   from `Debug` output and never logged
//! - Access tokens containing CR, LF or NUL are rejected before a request is built
//! - Endpoint overrides may not contain `..` or `//`

#![allow(
    clippy::multiple_crate_versions,
    reason = "transitive dependencies from reqwest and wiremock"
)]

pub mod api;
pub mod client;
pub mod codec;
pub mod config;
pub mod error;
pub mod transport;

pub use api::DarajaRequest;
pub use client::DarajaClient;
pub use config::{DarajaConfig, Environment};
pub use error::{DarajaError, Result};
