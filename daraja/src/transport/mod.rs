//! Transport abstraction.
//!
//! The transport moves bytes: it attaches per-request authorization, sends the
//! request and hands back status and body. It never interprets the
//! body. Decoding and the per-operation status policy live in
//! [`DarajaClient`](crate::DarajaClient).
//!
//! Authorization is part of every [`RequestContext`]; no header state is
//! shared between requests, so concurrent calls with different tokens cannot
//! observe each other's credentials.
//!
//! # Examples
//!
//! ```rust,no_run
//! use mpesa_daraja::transport::{
//!     Authorization, HttpConfig, HttpTransport, RequestContext, Transport,
//! };
//!
//! # async fn example() -> mpesa_daraja::error::Result<()> {
//! let transport = HttpTransport::with_config(&HttpConfig::default())?;
//!
//! let ctx = RequestContext {
//!     base_url: "https://sandbox.safaricom.co.ke",
//!     path: "/mpesa/accountbalance/v1/query",
//!     authorization: Authorization::Bearer("access-token"),
//!     content_type: Some("application/json"),
//! };
//!
//! let response = transport.post(ctx, b"{}").await?;
//! println!("Status: {}", response.status);
//! # Ok(())
//! # }
//! ```

#[allow(
    redundant_imports,
    reason = "Future needed for RPITIT despite being in Edition 2024 prelude"
)]
use std::future::Future;
use std::fmt;

use crate::error::Result;

pub mod config;
pub mod http;
mod sealed;

pub use config::{HttpConfig, HttpVersion};
pub use http::HttpTransport;

/// Credentials attached to a single request.
#[derive(Clone, Copy)]
pub enum Authorization<'a> {
    /// `Authorization: Bearer <token>`.
    Bearer(&'a str),
    /// `Authorization: Basic base64(<username>:<password>)`.
    Basic {
        /// Consumer key.
        username: &'a str,
        /// Consumer secret.
        password: &'a str,
    },
}

impl fmt::Debug for Authorization<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Bearer(_) => f.write_str("Bearer([REDACTED])"),
            Self::Basic { username, .. } => f
                .debug_struct("Basic")
                .field("username", username)
                .field("password", &"[REDACTED]")
                .finish(),
        }
    }
}

/// Request parameters for a single transport call.
#[derive(Debug, Clone)]
pub struct RequestContext<'a> {
    /// API base URL (e.g. <https://api.safaricom.co.ke>).
    pub base_url: &'a str,
    /// Request path, optionally with a query string.
    pub path: &'a str,
    /// Credentials for this request only.
    pub authorization: Authorization<'a>,
    /// `Content-Type` header value, if any.
    pub content_type: Option<&'a str>,
}

/// Raw response from a transport call.
///
/// Non-2xx statuses are returned here rather than as errors.
#[derive(Debug)]
pub struct TransportResponse {
    /// HTTP status code.
    pub status: u16,
    /// Raw response body.
    pub body: Vec<u8>,
}

impl TransportResponse {
    /// Returns `true` for 2xx statuses.
    #[must_use]
    pub const fn is_success(&self) -> bool {
        self.status >= 200 && self.status < 300
    }
}

/// Transport protocol abstraction.
///
/// Sealed: only transports defined in this crate can be used by the client.
pub trait Transport: sealed::private::Sealed + Send + Sync {
    /// Executes a GET request.
    ///
    /// # Errors
    ///
    /// Returns error if the URL is invalid or the request cannot be completed.
    fn get<'a>(
        &'a self,
        ctx: RequestContext<'a>,
    ) -> impl Future<Output = Result<TransportResponse>> + Send + 'a;

    /// Executes a POST request with body.
    ///
    /// # Errors
    ///
    /// Returns error if the URL is invalid or the request cannot be completed.
    fn post<'a>(
        &'a self,
        ctx: RequestContext<'a>,
        body: &'a [u8],
    ) -> impl Future<Output = Result<TransportResponse>> + Send + 'a;

    /// Returns the protocol name recorded on request spans.
    fn protocol_name(&self) -> &'static str;
}
