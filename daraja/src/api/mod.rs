//! Request and response records for every Daraja operation.
//!
//! Each operation pairs a caller-built request record with a response record.
//! The [`DarajaRequest`] trait ties them together: it names the
//! [`Operation`], validates the record, derives the provider's wire payload
//! and decodes the answer.
//!
//! Request records use snake_case field names. The wire encoder renames them to
//! the provider's PascalCase and injects fixed constants (`CommandID`,
//! `TransactionType`), the timestamp and the STK password.
//!
//! # Operations
//!
//! | Family | Records |
//! |--------|---------|
//! | Token | [`ConsumerCredentials`], [`AccessToken`] |
//! | STK push | [`StkPushRequest`], [`StkPushQueryRequest`] |
//! | C2B | [`RegisterUrlRequest`], [`SimulateTransactionRequest`] |
//! | Account | [`ReversalRequest`], [`TransactionStatusRequest`], [`AccountBalanceRequest`] |
//! | Payouts | [`B2cPaymentRequest`], [`B2bPaymentRequest`] |
//! | Pull | [`PullRegisterRequest`], [`PullTransactionsRequest`] |

use std::fmt;

use serde::{Serialize, de::DeserializeOwned};
use serde_json::{Map, Value};

use crate::{
    codec::{Clock, check_keys},
    error::{DarajaError, Result},
    transport::TransportResponse,
};

pub mod account;
pub mod ack;
pub mod auth;
pub mod c2b;
pub(crate) mod de;
pub mod endpoint;
pub mod payouts;
pub mod pull;
pub mod secret;
pub mod stk;

pub use account::{AccountBalanceRequest, ReversalRequest, TransactionStatusRequest};
pub use ack::{
    AccountBalanceResponse, Acknowledgement, AcknowledgementResult, B2bPaymentResponse,
    B2cPaymentResponse, ProviderFault, ReversalResponse, SimulateTransactionResponse,
    TransactionStatusResponse,
};
pub use auth::{AccessToken, ConsumerCredentials};
pub use c2b::{RegisterUrlRequest, RegisterUrlResponse, ResponseType, SimulateTransactionRequest};
pub use endpoint::EndpointConfig;
pub use payouts::{B2bCommand, B2bPaymentRequest, B2cCommand, B2cPaymentRequest, IdentifierType};
pub use pull::{
    PullRegisterRequest, PullRegisterResponse, PullTransactionsRequest, PullTransactionsResponse,
    Transaction,
};
pub use secret::Secret;
pub use stk::{
    StkCallbackError, StkPushFailure, StkPushQueryRequest, StkPushQueryResponse, StkPushRequest,
    StkPushResponse, StkTransactionType,
};

/// Remote operations exposed by the Daraja API.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Operation {
    /// OAuth client-credentials token exchange.
    GenerateToken,
    /// STK push (Lipa na M-Pesa Online) initiation.
    StkPush,
    /// STK push status query.
    StkPushQuery,
    /// C2B confirmation/validation URL registration.
    RegisterUrls,
    /// C2B transaction simulation (sandbox).
    SimulateTransaction,
    /// Transaction reversal.
    ReverseTransaction,
    /// Transaction status query.
    TransactionStatus,
    /// Account balance query.
    AccountBalance,
    /// Business-to-customer payment.
    B2cPayment,
    /// Business-to-business payment.
    B2bPayment,
    /// Pull API registration.
    RegisterPullApi,
    /// Pull API transaction query.
    PullTransactions,
}

impl Operation {
    /// Every operation, in catalogue order.
    pub const ALL: [Self; 12] = [
        Self::GenerateToken,
        Self::StkPush,
        Self::StkPushQuery,
        Self::RegisterUrls,
        Self::SimulateTransaction,
        Self::ReverseTransaction,
        Self::TransactionStatus,
        Self::AccountBalance,
        Self::B2cPayment,
        Self::B2bPayment,
        Self::RegisterPullApi,
        Self::PullTransactions,
    ];

    /// Returns the snake_case name used in logs and the `[endpoints]` table.
    #[must_use]
    pub const fn name(self) -> &'static str {
        match self {
            Self::GenerateToken => "generate_token",
            Self::StkPush => "stk_push",
            Self::StkPushQuery => "stk_push_query",
            Self::RegisterUrls => "register_urls",
            Self::SimulateTransaction => "simulate_transaction",
            Self::ReverseTransaction => "reverse_transaction",
            Self::TransactionStatus => "transaction_status",
            Self::AccountBalance => "account_balance",
            Self::B2cPayment => "b2c_payment",
            Self::B2bPayment => "b2b_payment",
            Self::RegisterPullApi => "register_pull_api",
            Self::PullTransactions => "pull_transactions",
        }
    }

    /// Returns the provider's path for this operation.
    #[must_use]
    pub const fn default_path(self) -> &'static str {
        match self {
            Self::GenerateToken => "/oauth/v1/generate?grant_type=client_credentials",
            Self::StkPush => "/mpesa/stkpush/v1/processrequest",
            Self::StkPushQuery => "/mpesa/stkpushquery/v1/query",
            Self::RegisterUrls => "/mpesa/c2b/v2/registerurl",
            Self::SimulateTransaction => "/mpesa/c2b/v1/simulate",
            Self::ReverseTransaction => "/mpesa/reversal/v1/request",
            Self::TransactionStatus => "/mpesa/transactionstatus/v1/query",
            Self::AccountBalance => "/mpesa/accountbalance/v1/query",
            Self::B2cPayment => "/mpesa/b2c/v1/paymentrequest",
            Self::B2bPayment => "/mpesa/b2b/v1/paymentrequest",
            Self::RegisterPullApi => "/pulltransactions/v1/register",
            Self::PullTransactions => "/pulltransactions/v1/query",
        }
    }

    /// Returns the HTTP method: `GET` for the token exchange, `POST` otherwise.
    #[must_use]
    pub const fn method(self) -> &'static str {
        match self {
            Self::GenerateToken => "GET",
            _ => "POST",
        }
    }
}

impl fmt::Display for Operation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// A request record for one bearer-authenticated Daraja operation.
///
/// Implemented by every request record except the token exchange, which uses
/// basic authentication and has its own entry point.
pub trait DarajaRequest: DeserializeOwned + fmt::Debug + Send + Sync {
    /// Decoded success shape.
    type Response: DeserializeOwned + Send;

    /// Operation this record targets.
    const OPERATION: Operation;

    /// Keys an untyped payload must contain, in declaration order.
    const REQUIRED_KEYS: &'static [&'static str];

    /// Keys an untyped payload may contain.
    const OPTIONAL_KEYS: &'static [&'static str] = &[];

    /// Checks that every required field is present and non-empty.
    ///
    /// # Errors
    ///
    /// Returns [`DarajaError::Validation`] naming the first offending field.
    fn validate(&self) -> Result<()>;

    /// Serializes the provider's wire payload.
    ///
    /// `clock` supplies the timestamp for operations that send one.
    ///
    /// # Errors
    ///
    /// Returns [`DarajaError::Encode`] if serialization fails.
    fn to_wire(&self, clock: &dyn Clock) -> Result<Vec<u8>>;

    /// Decodes a provider response.
    ///
    /// The default decodes the success shape whatever the status code.
    ///
    /// # Errors
    ///
    /// Returns [`DarajaError::Decode`] if the body does not match.
    fn decode_response(response: &TransportResponse) -> Result<Self::Response> {
        decode(response.status, &response.body)
    }

    /// Builds the record from an untyped payload.
    ///
    /// Required keys are checked first, in declaration order; only required
    /// and optional keys are kept.
    ///
    /// # Errors
    ///
    /// Returns [`DarajaError::Validation`] for a missing key and
    /// [`DarajaError::InvalidInput`] if a value has the wrong type.
    fn from_map(payload: &Map<String, Value>) -> Result<Self> {
        let mut cleaned = check_keys(Self::REQUIRED_KEYS, payload)?;
        for &key in Self::OPTIONAL_KEYS {
            if let Some(value) = payload.get(key) {
                cleaned.insert(key.to_owned(), value.clone());
            }
        }
        serde_json::from_value(Value::Object(cleaned)).map_err(DarajaError::InvalidInput)
    }
}

/// Serializes a wire payload.
pub(crate) fn encode<T: Serialize>(wire: &T) -> Result<Vec<u8>> {
    serde_json::to_vec(wire).map_err(DarajaError::Encode)
}

/// Decodes a JSON body, tagging failures with the HTTP status.
pub(crate) fn decode<T: DeserializeOwned>(status: u16, body: &[u8]) -> Result<T> {
    serde_json::from_slice(body).map_err(|source| DarajaError::Decode { status, source })
}
