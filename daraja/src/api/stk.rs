//! STK push (Lipa na M-Pesa Online) records.
//!
//! Both STK operations authenticate with a password derived from the
//! shortcode, the passkey and the request timestamp. Callers supply the
//! passkey; the encoder reads the clock once and sends the matching
//! `Password` and `Timestamp`.

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use tracing::warn;

use super::{
    DarajaRequest, Operation, Secret, ack::ProviderFault, de::string_or_number, decode, encode,
};
use crate::{
    codec::{Clock, StkPassword, require_non_empty, require_positive},
    error::{DarajaError, Result},
    transport::TransportResponse,
};

/// STK push transaction type.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub enum StkTransactionType {
    /// Payment to a paybill number.
    #[default]
    CustomerPayBillOnline,
    /// Payment to a till number.
    CustomerBuyGoodsOnline,
}

/// STK push initiation request.
///
/// # Examples
///
/// ```
/// use mpesa_daraja::api::{DarajaRequest, StkPushRequest};
/// use rust_decimal::Decimal;
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
/// assert!(request.validate().is_ok());
/// ```
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct StkPushRequest {
    /// Paybill or till shortcode receiving the payment.
    pub business_short_code: String,
    /// Lipa na M-Pesa Online passkey.
    pub passkey: Secret,
    /// Transaction type; defaults to `CustomerPayBillOnline`.
    #[serde(default)]
    pub transaction_type: StkTransactionType,
    /// Amount to charge.
    pub amount: Decimal,
    /// Phone number sending the money.
    pub party_a: String,
    /// Shortcode receiving the money.
    pub party_b: String,
    /// Phone number receiving the prompt.
    pub phone_number: String,
    /// URL the provider posts the final result to.
    pub call_back_url: String,
    /// Account reference shown to the customer.
    pub account_reference: String,
    /// Free-text description.
    pub transaction_desc: String,
}

#[derive(Serialize)]
#[serde(rename_all = "PascalCase")]
struct StkPushWire<'a> {
    business_short_code: &'a str,
    password: &'a str,
    timestamp: &'a str,
    transaction_type: StkTransactionType,
    amount: Decimal,
    party_a: &'a str,
    party_b: &'a str,
    phone_number: &'a str,
    #[serde(rename = "CallBackURL")]
    call_back_url: &'a str,
    account_reference: &'a str,
    transaction_desc: &'a str,
}

impl DarajaRequest for StkPushRequest {
    type Response = StkPushResponse;

    const OPERATION: Operation = Operation::StkPush;
    const REQUIRED_KEYS: &'static [&'static str] = &[
        "business_short_code",
        "passkey",
        "amount",
        "party_a",
        "party_b",
        "phone_number",
        "call_back_url",
        "account_reference",
        "transaction_desc",
    ];
    const OPTIONAL_KEYS: &'static [&'static str] = &["transaction_type"];

    fn validate(&self) -> Result<()> {
        require_non_empty(&[
            ("business_short_code", &self.business_short_code),
            ("passkey", self.passkey.expose()),
        ])?;
        require_positive("amount", self.amount)?;
        require_non_empty(&[
            ("party_a", &self.party_a),
            ("party_b", &self.party_b),
            ("phone_number", &self.phone_number),
            ("call_back_url", &self.call_back_url),
            ("account_reference", &self.account_reference),
            ("transaction_desc", &self.transaction_desc),
        ])
    }

    fn to_wire(&self, clock: &dyn Clock) -> Result<Vec<u8>> {
        let stk = StkPassword::new(&self.business_short_code, self.passkey.expose(), clock);
        encode(&StkPushWire {
            business_short_code: &self.business_short_code,
            password: stk.password(),
            timestamp: stk.timestamp().as_str(),
            transaction_type: self.transaction_type,
            amount: self.amount,
            party_a: &self.party_a,
            party_b: &self.party_b,
            phone_number: &self.phone_number,
            call_back_url: &self.call_back_url,
            account_reference: &self.account_reference,
            transaction_desc: &self.transaction_desc,
        })
    }

    /// Non-2xx answers become [`DarajaError::Remote`], read from the
    /// [`StkPushFailure`] envelope or, failing that, from the provider's
    /// `errorCode`/`errorMessage` fault body.
    fn decode_response(response: &TransportResponse) -> Result<StkPushResponse> {
        let status = response.status;
        if response.is_success() {
            return decode(status, &response.body);
        }

        let (code, description) = match decode::<StkPushFailure>(status, &response.body) {
            Ok(failure) => {
                let callback = failure.body.stk_callback;
                (callback.result_code, callback.result_desc)
            }
            Err(err) => match serde_json::from_slice::<ProviderFault>(&response.body) {
                Ok(fault) if fault.is_error() => {
                    (fault.error_code.unwrap_or_default(), fault.error_message.unwrap_or_default())
                }
                _ => return Err(err),
            },
        };

        warn!(status, result_code = %code, result_desc = %description, "STK push rejected");
        Err(DarajaError::Remote { code, description })
    }
}

/// STK push acceptance.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct StkPushResponse {
    /// Merchant request identifier.
    #[serde(rename = "MerchantRequestID", default)]
    pub merchant_request_id: String,
    /// Checkout request identifier used by [`StkPushQueryRequest`].
    #[serde(rename = "CheckoutRequestID")]
    pub checkout_request_id: String,
    /// Response code; `0` means the prompt was sent.
    #[serde(rename = "ResponseCode", deserialize_with = "string_or_number")]
    pub response_code: String,
    /// Response description.
    #[serde(rename = "ResponseDescription")]
    pub response_description: String,
    /// Message suitable for the customer.
    #[serde(rename = "CustomerMessage", default)]
    pub customer_message: String,
}

/// Error envelope returned with a non-2xx STK push status.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct StkPushFailure {
    /// Envelope body.
    #[serde(rename = "Body")]
    pub body: StkFailureBody,
}

/// Body of an [`StkPushFailure`].
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct StkFailureBody {
    /// Callback error details.
    #[serde(rename = "stkCallback")]
    pub stk_callback: StkCallbackError,
}

/// Result code and description of a failed STK push.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "PascalCase")]
pub struct StkCallbackError {
    /// Merchant request identifier, when known.
    #[serde(rename = "MerchantRequestID", default)]
    pub merchant_request_id: String,
    /// Checkout request identifier, when known.
    #[serde(rename = "CheckoutRequestID", default)]
    pub checkout_request_id: String,
    /// Provider result code.
    #[serde(deserialize_with = "string_or_number")]
    pub result_code: String,
    /// Provider result description.
    pub result_desc: String,
}

/// STK push status query.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct StkPushQueryRequest {
    /// Shortcode the push was sent from.
    pub business_short_code: String,
    /// Lipa na M-Pesa Online passkey.
    pub passkey: Secret,
    /// Checkout request identifier from [`StkPushResponse`].
    pub checkout_request_id: String,
}

#[derive(Serialize)]
#[serde(rename_all = "PascalCase")]
struct StkPushQueryWire<'a> {
    business_short_code: &'a str,
    password: &'a str,
    timestamp: &'a str,
    #[serde(rename = "CheckoutRequestID")]
    checkout_request_id: &'a str,
}

impl DarajaRequest for StkPushQueryRequest {
    type Response = StkPushQueryResponse;

    const OPERATION: Operation = Operation::StkPushQuery;
    const REQUIRED_KEYS: &'static [&'static str] =
        &["business_short_code", "passkey", "checkout_request_id"];

    fn validate(&self) -> Result<()> {
        require_non_empty(&[
            ("business_short_code", &self.business_short_code),
            ("passkey", self.passkey.expose()),
            ("checkout_request_id", &self.checkout_request_id),
        ])
    }

    fn to_wire(&self, clock: &dyn Clock) -> Result<Vec<u8>> {
        let stk = StkPassword::new(&self.business_short_code, self.passkey.expose(), clock);
        encode(&StkPushQueryWire {
            business_short_code: &self.business_short_code,
            password: stk.password(),
            timestamp: stk.timestamp().as_str(),
            checkout_request_id: &self.checkout_request_id,
        })
    }
}

/// STK push status.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct StkPushQueryResponse {
    /// Response code of the query itself.
    #[serde(rename = "ResponseCode", deserialize_with = "string_or_number")]
    pub response_code: String,
    /// Response description.
    #[serde(rename = "ResponseDescription")]
    pub response_description: String,
    /// Merchant request identifier.
    #[serde(rename = "MerchantRequestID")]
    pub merchant_request_id: String,
    /// Checkout request identifier.
    #[serde(rename = "CheckoutRequestID")]
    pub checkout_request_id: String,
    /// Result code of the payment; `0` means paid.
    #[serde(rename = "ResultCode", deserialize_with = "string_or_number")]
    pub result_code: String,
    /// Result description.
    #[serde(rename = "ResultDesc")]
    pub result_desc: String,
    /// Error fields of a rejected query.
    #[serde(flatten)]
    pub fault: ProviderFault,
}
