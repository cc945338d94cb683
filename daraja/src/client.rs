//! Daraja API client.
//!
//! [`DarajaClient`] owns the HTTP transport, the base URL, the endpoint table
//! and the clock. Every bearer-authenticated call follows the same steps:
//!
//! 1. validate the request record (no network traffic on failure)
//! 2. validate the access token
//! 3. encode the wire payload, injecting constants, timestamp and password
//! 4. POST it with that call's own `Authorization` header
//! 5. decode the response with the operation's status policy
//!
//! The token travels with each call. The client holds no per-request state, so
//! one instance can serve any number of concurrent tasks with different
//! tokens.

use std::sync::Arc;

use serde_json::{Map, Value};
use tracing::{Span, debug, field::Empty, instrument};
use uuid::Uuid;

use crate::{
    api::{
        AccessToken, AccountBalanceRequest, AccountBalanceResponse, B2bPaymentRequest,
        B2bPaymentResponse, B2cPaymentRequest, B2cPaymentResponse, ConsumerCredentials,
        DarajaRequest, EndpointConfig, Operation, PullRegisterRequest, PullRegisterResponse,
        PullTransactionsRequest, PullTransactionsResponse, RegisterUrlRequest, RegisterUrlResponse,
        ReversalRequest, ReversalResponse, SimulateTransactionRequest,
        SimulateTransactionResponse, StkPushQueryRequest, StkPushQueryResponse, StkPushRequest,
        StkPushResponse, TransactionStatusRequest, TransactionStatusResponse, decode,
    },
    codec::{Clock, SystemClock, require_non_empty},
    config::DarajaConfig,
    error::{DarajaError, Result},
    transport::{Authorization, HttpTransport, RequestContext, Transport},
};

const JSON_CONTENT_TYPE: &str = "application/json";

/// Rejects empty tokens and tokens that would break the header line.
fn check_access_token(access_token: &str) -> Result<()> {
    if access_token.trim().is_empty() || access_token.contains(['\r', '\n', '\0']) {
        return Err(DarajaError::missing("access_token"));
    }
    Ok(())
}

/// Typed client for the Daraja REST API.
///
/// Cheap to clone; clones share the connection pool.
///
/// # Examples
///
/// ```rust,no_run
/// use mpesa_daraja::{
///     DarajaClient,
///     api::{ConsumerCredentials, StkPushRequest},
///     config::DarajaConfig,
/// };
/// use rust_decimal::Decimal;
///
/// # async fn example() -> mpesa_daraja::error::Result<()> {
/// let config = DarajaConfig::from_toml(r#"environment = "sandbox""#)?;
/// let client = DarajaClient::with_config(&config)?;
///
/// let token = client.generate_token(&ConsumerCredentials::from_env()?).await?;
///
/// let request = StkPushRequest {
///     business_short_code: "174379".to_owned(),
///     passkey: "bfb279f9aa9bdbcf".into(),
///     transaction_type: Default::default(),
///     amount: Decimal::ONE,
///     party_a: "254708374149".to_owned(),
///     party_b: "174379".to_owned(),
///     phone_number: "254708374149".to_owned(),
///     call_back_url: "https://example.com/callback".to_owned(),
///     account_reference: "INV-001".to_owned(),
///     transaction_desc: "Invoice 001".to_owned(),
/// };
///
/// let response = client.stk_push(token.as_str(), &request).await?;
/// println!("checkout request: {}", response.checkout_request_id);
/// # Ok(())
/// # }
/// ```
#[derive(Debug, Clone)]
pub struct DarajaClient {
    transport: HttpTransport,
    base_url: String,
    endpoints: EndpointConfig,
    clock: Arc<dyn Clock>,
}

impl DarajaClient {
    /// Creates a production client with default settings.
    ///
    /// # Errors
    ///
    /// Returns error if the HTTP client cannot be built.
    pub fn new() -> Result<Self> {
        Self::with_config(&DarajaConfig::default())
    }

    /// Creates a client from configuration.
    ///
    /// # Errors
    ///
    /// Returns [`DarajaError::Config`] if the configuration is invalid and
    /// [`DarajaError::Transport`] if the HTTP client cannot be built.
    pub fn with_config(config: &DarajaConfig) -> Result<Self> {
        config.validate()?;
        let transport = HttpTransport::with_config(&config.http)?;

        Ok(Self {
            transport,
            base_url: config.base_url().to_owned(),
            endpoints: config.endpoints.clone(),
            clock: Arc::new(SystemClock::new(config.timestamp_zone)),
        })
    }

    /// Replaces the clock used for timestamps and STK passwords.
    #[must_use]
    pub fn with_clock(mut self, clock: impl Clock + 'static) -> Self {
        self.clock = Arc::new(clock);
        self
    }

    /// Returns the API host.
    #[must_use]
    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    /// Points the client at another host.
    ///
    /// The URL is checked when the next request is built.
    pub fn set_base_url(&mut self, base_url: impl Into<String>) {
        self.base_url = base_url.into();
    }

    /// Returns the endpoint table.
    #[must_use]
    pub fn endpoints(&self) -> &EndpointConfig {
        &self.endpoints
    }

    /// Exchanges consumer credentials for an access token.
    ///
    /// Sent as `GET` with HTTP basic authentication. The body is decoded
    /// whatever the status code.
    ///
    /// # Errors
    ///
    /// - [`DarajaError::Validation`] if the key or secret is empty
    /// - [`DarajaError::Transport`] if the request fails
    /// - [`DarajaError::Decode`] if the body is not an access token
    #[instrument(
        name = "daraja_request",
        skip_all,
        fields(
            operation = %Operation::GenerateToken,
            request_id = %Uuid::new_v4(),
            http.method = Operation::GenerateToken.method(),
            http.status_code = Empty,
            network.protocol.name = self.transport.protocol_name(),
            otel.kind = "client"
        )
    )]
    pub async fn generate_token(&self, credentials: &ConsumerCredentials) -> Result<AccessToken> {
        require_non_empty(&[
            ("consumer_key", credentials.consumer_key()),
            ("consumer_secret", credentials.consumer_secret()),
        ])?;

        let ctx = RequestContext {
            base_url: &self.base_url,
            path: self.endpoints.resolve(Operation::GenerateToken),
            authorization: Authorization::Basic {
                username: credentials.consumer_key(),
                password: credentials.consumer_secret(),
            },
            content_type: None,
        };

        debug!(path = ctx.path, "requesting access token");
        let response = self.transport.get(ctx).await?;
        Span::current().record("http.status_code", u64::from(response.status));

        let token: AccessToken = decode(response.status, &response.body)?;
        debug!(expires_in = token.expires_in, "access token issued");
        Ok(token)
    }

    /// Sends any bearer-authenticated request.
    ///
    /// The named operation methods are thin wrappers around this.
    ///
    /// # Errors
    ///
    /// - [`DarajaError::Validation`] if a required field or the token is empty
    /// - [`DarajaError::Encode`] if the payload cannot be serialized
    /// - [`DarajaError::Config`] if the base URL or path is invalid
    /// - [`DarajaError::Transport`] if the request fails
    /// - [`DarajaError::Remote`] if an STK push is rejected
    /// - [`DarajaError::Decode`] if the body does not match the response shape
    #[instrument(
        name = "daraja_request",
        skip_all,
        fields(
            operation = %R::OPERATION,
            request_id = %Uuid::new_v4(),
            http.method = R::OPERATION.method(),
            http.status_code = Empty,
            network.protocol.name = self.transport.protocol_name(),
            otel.kind = "client"
        )
    )]
    pub async fn send<R: DarajaRequest>(
        &self,
        access_token: &str,
        request: &R,
    ) -> Result<R::Response> {
        request.validate()?;
        check_access_token(access_token)?;

        let body = request.to_wire(self.clock.as_ref())?;

        let ctx = RequestContext {
            base_url: &self.base_url,
            path: self.endpoints.resolve(R::OPERATION),
            authorization: Authorization::Bearer(access_token),
            content_type: Some(JSON_CONTENT_TYPE),
        };

        debug!(path = ctx.path, bytes = body.len(), "sending request");
        let response = self.transport.post(ctx, &body).await?;
        Span::current().record("http.status_code", u64::from(response.status));
        debug!(status = response.status, bytes = response.body.len(), "response received");

        R::decode_response(&response)
    }

    /// Sends a request built from an untyped payload.
    ///
    /// The payload must contain every key in [`DarajaRequest::REQUIRED_KEYS`];
    /// keys the record does not know are dropped.
    ///
    /// # Errors
    ///
    /// Returns [`DarajaError::Validation`] naming the first missing key,
    /// [`DarajaError::InvalidInput`] if a value has the wrong type, and otherwise
    /// the errors of [`send`](Self::send).
    pub async fn send_map<R: DarajaRequest>(
        &self,
        access_token: &str,
        payload: &Map<String, Value>,
    ) -> Result<R::Response> {
        let request = R::from_map(payload)?;
        self.send(access_token, &request).await
    }

    /// Starts an STK push.
    ///
    /// A non-2xx answer fails with [`DarajaError::Remote`].
    ///
    /// # Errors
    ///
    /// See [`send`](Self::send).
    pub async fn stk_push(
        &self,
        access_token: &str,
        request: &StkPushRequest,
    ) -> Result<StkPushResponse> {
        self.send(access_token, request).await
    }

    /// Queries the status of an STK push.
    ///
    /// # Errors
    ///
    /// See [`send`](Self::send).
    pub async fn stk_push_query(
        &self,
        access_token: &str,
        request: &StkPushQueryRequest,
    ) -> Result<StkPushQueryResponse> {
        self.send(access_token, request).await
    }

    /// Registers C2B confirmation and validation URLs.
    ///
    /// # Errors
    ///
    /// See [`send`](Self::send).
    pub async fn register_urls(
        &self,
        access_token: &str,
        request: &RegisterUrlRequest,
    ) -> Result<RegisterUrlResponse> {
        self.send(access_token, request).await
    }

    /// Simulates a C2B payment.
    ///
    /// # Errors
    ///
    /// See [`send`](Self::send).
    pub async fn simulate_transaction(
        &self,
        access_token: &str,
        request: &SimulateTransactionRequest,
    ) -> Result<SimulateTransactionResponse> {
        self.send(access_token, request).await
    }

    /// Reverses a transaction.
    ///
    /// # Errors
    ///
    /// See [`send`](Self::send).
    pub async fn reverse_transaction(
        &self,
        access_token: &str,
        request: &ReversalRequest,
    ) -> Result<ReversalResponse> {
        self.send(access_token, request).await
    }

    /// Queries the status of a transaction.
    ///
    /// # Errors
    ///
    /// See [`send`](Self::send).
    pub async fn transaction_status(
        &self,
        access_token: &str,
        request: &TransactionStatusRequest,
    ) -> Result<TransactionStatusResponse> {
        self.send(access_token, request).await
    }

    /// Queries an account balance.
    ///
    /// # Errors
    ///
    /// See [`send`](Self::send).
    pub async fn account_balance(
        &self,
        access_token: &str,
        request: &AccountBalanceRequest,
    ) -> Result<AccountBalanceResponse> {
        self.send(access_token, request).await
    }

    /// Sends a business-to-customer payment.
    ///
    /// # Errors
    ///
    /// See [`send`](Self::send).
    pub async fn b2c_payment(
        &self,
        access_token: &str,
        request: &B2cPaymentRequest,
    ) -> Result<B2cPaymentResponse> {
        self.send(access_token, request).await
    }

    /// Sends a business-to-business payment.
    ///
    /// # Errors
    ///
    /// See [`send`](Self::send).
    pub async fn b2b_payment(
        &self,
        access_token: &str,
        request: &B2bPaymentRequest,
    ) -> Result<B2bPaymentResponse> {
        self.send(access_token, request).await
    }

    /// Registers a shortcode for the pull API.
    ///
    /// # Errors
    ///
    /// See [`send`](Self::send).
    pub async fn register_pull_api(
        &self,
        access_token: &str,
        request: &PullRegisterRequest,
    ) -> Result<PullRegisterResponse> {
        self.send(access_token, request).await
    }

    /// Pulls transactions for a time window.
    ///
    /// # Errors
    ///
    /// See [`send`](Self::send).
    pub async fn pull_transactions(
        &self,
        access_token: &str,
        request: &PullTransactionsRequest,
    ) -> Result<PullTransactionsResponse> {
        self.send(access_token, request).await
    }
}
