//! Customer-to-business records: URL registration and simulation.

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use super::{
    DarajaRequest, Operation, SimulateTransactionResponse, ack::ProviderFault,
    de::string_or_number, encode,
};
use crate::{
    codec::{Clock, require_non_empty, require_positive},
    error::Result,
};

/// What the provider does when the validation URL is unreachable.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub enum ResponseType {
    /// Complete the transaction.
    #[default]
    Completed,
    /// Cancel the transaction.
    Cancelled,
}

/// C2B confirmation and validation URL registration.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RegisterUrlRequest {
    /// Shortcode the URLs apply to.
    pub short_code: String,
    /// Default action when validation is unreachable.
    pub response_type: ResponseType,
    /// URL receiving payment confirmations.
    pub confirmation_url: String,
    /// URL receiving validation requests.
    pub validation_url: String,
}

#[derive(Serialize)]
#[serde(rename_all = "PascalCase")]
struct RegisterUrlWire<'a> {
    short_code: &'a str,
    response_type: ResponseType,
    #[serde(rename = "ConfirmationURL")]
    confirmation_url: &'a str,
    #[serde(rename = "ValidationURL")]
    validation_url: &'a str,
}

impl DarajaRequest for RegisterUrlRequest {
    type Response = RegisterUrlResponse;

    const OPERATION: Operation = Operation::RegisterUrls;
    const REQUIRED_KEYS: &'static [&'static str] =
        &["short_code", "response_type", "confirmation_url", "validation_url"];

    fn validate(&self) -> Result<()> {
        require_non_empty(&[
            ("short_code", &self.short_code),
            ("confirmation_url", &self.confirmation_url),
            ("validation_url", &self.validation_url),
        ])
    }

    fn to_wire(&self, _clock: &dyn Clock) -> Result<Vec<u8>> {
        encode(&RegisterUrlWire {
            short_code: &self.short_code,
            response_type: self.response_type,
            confirmation_url: &self.confirmation_url,
            validation_url: &self.validation_url,
        })
    }
}

/// URL registration result.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct RegisterUrlResponse {
    /// Originator conversation identifier.
    #[serde(rename = "OriginatorConversationID", alias = "OriginatorCoversationID")]
    pub originator_conversation_id: String,
    /// Response code; `0` means registered.
    #[serde(rename = "ResponseCode", deserialize_with = "string_or_number")]
    pub response_code: String,
    /// Response description.
    #[serde(rename = "ResponseDescription")]
    pub response_description: String,
    /// Error fields of a rejected registration.
    #[serde(flatten)]
    pub fault: ProviderFault,
}

/// Simulated C2B payment (sandbox only).
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SimulateTransactionRequest {
    /// Shortcode receiving the payment.
    pub short_code: String,
    /// Amount paid.
    pub amount: Decimal,
    /// Paying phone number.
    pub msisdn: String,
    /// Bill reference (account number).
    pub bill_ref_number: String,
}

#[derive(Serialize)]
#[serde(rename_all = "PascalCase")]
struct SimulateWire<'a> {
    short_code: &'a str,
    #[serde(rename = "CommandID")]
    command_id: &'static str,
    amount: Decimal,
    msisdn: &'a str,
    bill_ref_number: &'a str,
}

impl DarajaRequest for SimulateTransactionRequest {
    type Response = SimulateTransactionResponse;

    const OPERATION: Operation = Operation::SimulateTransaction;
    const REQUIRED_KEYS: &'static [&'static str] =
        &["short_code", "amount", "msisdn", "bill_ref_number"];

    fn validate(&self) -> Result<()> {
        require_non_empty(&[("short_code", &self.short_code)])?;
        require_positive("amount", self.amount)?;
        require_non_empty(&[("msisdn", &self.msisdn), ("bill_ref_number", &self.bill_ref_number)])
    }

    fn to_wire(&self, _clock: &dyn Clock) -> Result<Vec<u8>> {
        encode(&SimulateWire {
            short_code: &self.short_code,
            command_id: "CustomerPayBillOnline",
            amount: self.amount,
            msisdn: &self.msisdn,
            bill_ref_number: &self.bill_ref_number,
        })
    }
}
