//! Pull API: registration and transaction queries.

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use super::{
    DarajaRequest, Operation,
    ack::ProviderFault,
    de::{string_or_number, u64_from_string_or_number},
    encode,
};
use crate::{
    codec::{Clock, require_non_empty},
    error::Result,
};

/// Pull API registration.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PullRegisterRequest {
    /// Shortcode to register.
    pub short_code: String,
    /// Safaricom number nominated for notifications.
    pub nominated_number: String,
    /// URL receiving pull notifications.
    pub call_back_url: String,
}

#[derive(Serialize)]
#[serde(rename_all = "PascalCase")]
struct PullRegisterWire<'a> {
    short_code: &'a str,
    nominated_number: &'a str,
    #[serde(rename = "CallBackURL")]
    call_back_url: &'a str,
}

impl DarajaRequest for PullRegisterRequest {
    type Response = PullRegisterResponse;

    const OPERATION: Operation = Operation::RegisterPullApi;
    const REQUIRED_KEYS: &'static [&'static str] =
        &["short_code", "nominated_number", "call_back_url"];

    fn validate(&self) -> Result<()> {
        require_non_empty(&[
            ("short_code", &self.short_code),
            ("nominated_number", &self.nominated_number),
            ("call_back_url", &self.call_back_url),
        ])
    }

    fn to_wire(&self, _clock: &dyn Clock) -> Result<Vec<u8>> {
        encode(&PullRegisterWire {
            short_code: &self.short_code,
            nominated_number: &self.nominated_number,
            call_back_url: &self.call_back_url,
        })
    }
}

/// Pull API registration result.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct PullRegisterResponse {
    /// Provider reference.
    #[serde(rename = "ResponseRefID")]
    pub response_ref_id: String,
    /// Registration status code.
    #[serde(rename = "ResponseStatus", deserialize_with = "string_or_number")]
    pub response_status: String,
    /// Registered shortcode.
    #[serde(rename = "ShortCode")]
    pub short_code: String,
    /// Response description.
    #[serde(rename = "ResponseDescription")]
    pub response_description: String,
    /// Error fields of a rejected registration.
    #[serde(flatten)]
    pub fault: ProviderFault,
}

/// Pull API transaction query.
///
/// Dates use the provider's `YYYY-MM-DD HH:MM:SS` format.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PullTransactionsRequest {
    /// Registered shortcode.
    pub short_code: String,
    /// Window start.
    pub start_date: String,
    /// Window end.
    pub end_date: String,
    /// Number of records to skip.
    #[serde(default)]
    pub offset_value: u32,
}

#[derive(Serialize)]
#[serde(rename_all = "PascalCase")]
struct PullTransactionsWire<'a> {
    short_code: &'a str,
    start_date: &'a str,
    end_date: &'a str,
    // Provider spelling.
    #[serde(rename = "OffSetValue")]
    offset_value: String,
}

impl DarajaRequest for PullTransactionsRequest {
    type Response = PullTransactionsResponse;

    const OPERATION: Operation = Operation::PullTransactions;
    const REQUIRED_KEYS: &'static [&'static str] = &["short_code", "start_date", "end_date"];
    const OPTIONAL_KEYS: &'static [&'static str] = &["offset_value"];

    fn validate(&self) -> Result<()> {
        require_non_empty(&[
            ("short_code", &self.short_code),
            ("start_date", &self.start_date),
            ("end_date", &self.end_date),
        ])
    }

    fn to_wire(&self, _clock: &dyn Clock) -> Result<Vec<u8>> {
        encode(&PullTransactionsWire {
            short_code: &self.short_code,
            start_date: &self.start_date,
            end_date: &self.end_date,
            offset_value: self.offset_value.to_string(),
        })
    }
}

/// Page of pulled transactions.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct PullTransactionsResponse {
    /// Provider reference.
    #[serde(rename = "ResponseRefID")]
    pub response_ref_id: String,
    /// Response code.
    #[serde(rename = "ResponseCode", deserialize_with = "string_or_number")]
    pub response_code: String,
    /// Response message.
    #[serde(rename = "ResponseMessage")]
    pub response_message: String,
    /// Transactions in this page.
    #[serde(rename = "Response")]
    pub transactions: Vec<Transaction>,
    /// Error fields of a rejected query.
    #[serde(flatten)]
    pub fault: ProviderFault,
}

/// One pulled transaction.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Transaction {
    /// M-Pesa receipt number.
    #[serde(rename = "transactionId")]
    pub transaction_id: String,
    /// Transaction date as sent by the provider.
    #[serde(rename = "trxDate")]
    pub trx_date: String,
    /// Payer phone number.
    #[serde(deserialize_with = "u64_from_string_or_number")]
    pub msisdn: u64,
    /// Sender name or number.
    pub sender: String,
    /// Transaction type.
    #[serde(rename = "transactiontype")]
    pub transaction_type: String,
    /// Bill reference.
    #[serde(rename = "billreference")]
    pub bill_reference: String,
    /// Amount, decoded from the provider's decimal string.
    pub amount: Decimal,
    /// Receiving organisation name.
    #[serde(rename = "organizationname")]
    pub organization_name: String,
}
