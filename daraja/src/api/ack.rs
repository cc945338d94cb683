//! Synchronous acknowledgements of asynchronous operations.
//!
//! Simulate, reversal, status, balance, B2C and B2B all answer immediately
//! with conversation identifiers; the final outcome arrives later on the
//! caller's result URL. All of them share [`Acknowledgement`].

use serde::{Deserialize, Serialize};

use super::de::string_or_number;

/// Error fields the provider adds to a rejected request.
///
/// These operations decode their success shape whatever the HTTP status, so a
/// rejection surfaces here rather than as an error.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ProviderFault {
    /// Provider request identifier.
    #[serde(rename = "requestId", default, skip_serializing_if = "Option::is_none")]
    pub request_id: Option<String>,
    /// Provider error code, e.g. `404.001.03`.
    #[serde(rename = "errorCode", default, skip_serializing_if = "Option::is_none")]
    pub error_code: Option<String>,
    /// Provider error message.
    #[serde(rename = "errorMessage", default, skip_serializing_if = "Option::is_none")]
    pub error_message: Option<String>,
}

impl ProviderFault {
    /// Returns `true` if the provider reported an error code.
    #[must_use]
    pub fn is_error(&self) -> bool {
        self.error_code.as_deref().is_some_and(|code| !code.is_empty())
    }
}

/// Inline result block some operations return alongside the acknowledgement.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "PascalCase")]
pub struct AcknowledgementResult {
    /// Result type.
    #[serde(default, deserialize_with = "string_or_number")]
    pub result_type: String,
    /// Result code; `0` means accepted.
    #[serde(default, deserialize_with = "string_or_number")]
    pub result_code: String,
}

/// Conversation-id acknowledgement.
///
/// # Examples
///
/// ```
/// use mpesa_daraja::api::Acknowledgement;
///
/// let ack: Acknowledgement = serde_json::from_str(r#"{
///     "ConversationID": "AG_20191219_00005797af5d7d75f652",
///     "OriginatorCoversationID": "16740-34861180-1",
///     "ResponseCode": "0",
///     "ResponseDescription": "Accept the service request successfully."
/// }"#).unwrap();
///
/// assert_eq!(ack.originator_conversation_id, "16740-34861180-1");
/// assert!(ack.is_accepted());
/// ```
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct Acknowledgement {
    /// Provider conversation identifier.
    #[serde(rename = "ConversationID")]
    pub conversation_id: String,
    /// Originator conversation identifier.
    ///
    /// Also accepted under the provider's misspelling `OriginatorCoversationID`.
    #[serde(rename = "OriginatorConversationID", alias = "OriginatorCoversationID")]
    pub originator_conversation_id: String,
    /// Response code; `0` means accepted.
    #[serde(rename = "ResponseCode", deserialize_with = "string_or_number")]
    pub response_code: String,
    /// Response description.
    #[serde(rename = "ResponseDescription")]
    pub response_description: String,
    /// Inline result block, when present.
    #[serde(rename = "Result", skip_serializing_if = "Option::is_none")]
    pub result: Option<AcknowledgementResult>,
    /// Error fields of a rejected request.
    #[serde(flatten)]
    pub fault: ProviderFault,
}

impl Acknowledgement {
    /// Returns `true` if the provider accepted the request for processing.
    #[must_use]
    pub fn is_accepted(&self) -> bool {
        !self.fault.is_error() && self.response_code == "0"
    }
}

/// C2B simulation acknowledgement.
pub type SimulateTransactionResponse = Acknowledgement;
/// Reversal acknowledgement.
pub type ReversalResponse = Acknowledgement;
/// Transaction status acknowledgement.
pub type TransactionStatusResponse = Acknowledgement;
/// Account balance acknowledgement.
pub type AccountBalanceResponse = Acknowledgement;
/// B2C payment acknowledgement.
pub type B2cPaymentResponse = Acknowledgement;
/// B2B payment acknowledgement.
pub type B2bPaymentResponse = Acknowledgement;
