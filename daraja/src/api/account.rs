//! Reversal, transaction status and account balance.
//!
//! All three are initiator-authenticated and answer asynchronously on
//! `result_url`.

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use super::{
    AccountBalanceResponse, DarajaRequest, IdentifierType, Operation, ReversalResponse, Secret,
    TransactionStatusResponse, encode,
};
use crate::{
    codec::{Clock, require_non_empty, require_positive},
    error::Result,
};

/// Transaction reversal.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ReversalRequest {
    /// Initiator username.
    pub initiator: String,
    /// Encrypted initiator password.
    pub security_credential: Secret,
    /// M-Pesa receipt number of the transaction to reverse.
    pub transaction_id: String,
    /// Amount to reverse.
    pub amount: Decimal,
    /// Shortcode that received the original payment.
    pub receiver_party: String,
    /// Identifier type of `receiver_party`.
    pub receiver_identifier_type: IdentifierType,
    /// URL receiving the final result.
    pub result_url: String,
    /// URL notified when the request times out in the queue.
    pub queue_timeout_url: String,
    /// Free-text remarks.
    pub remarks: String,
    /// Optional occasion text.
    #[serde(default)]
    pub occasion: Option<String>,
}

#[derive(Serialize)]
#[serde(rename_all = "PascalCase")]
struct ReversalWire<'a> {
    initiator: &'a str,
    security_credential: &'a str,
    #[serde(rename = "CommandID")]
    command_id: &'static str,
    #[serde(rename = "TransactionID")]
    transaction_id: &'a str,
    amount: Decimal,
    receiver_party: &'a str,
    receiver_identifier_type: IdentifierType,
    #[serde(rename = "ResultURL")]
    result_url: &'a str,
    #[serde(rename = "QueueTimeOutURL")]
    queue_timeout_url: &'a str,
    remarks: &'a str,
    occasion: &'a str,
}

impl DarajaRequest for ReversalRequest {
    type Response = ReversalResponse;

    const OPERATION: Operation = Operation::ReverseTransaction;
    const REQUIRED_KEYS: &'static [&'static str] = &[
        "initiator",
        "security_credential",
        "transaction_id",
        "amount",
        "receiver_party",
        "receiver_identifier_type",
        "result_url",
        "queue_timeout_url",
        "remarks",
    ];
    const OPTIONAL_KEYS: &'static [&'static str] = &["occasion"];

    fn validate(&self) -> Result<()> {
        require_non_empty(&[
            ("initiator", &self.initiator),
            ("security_credential", self.security_credential.expose()),
            ("transaction_id", &self.transaction_id),
        ])?;
        require_positive("amount", self.amount)?;
        require_non_empty(&[
            ("receiver_party", &self.receiver_party),
            ("result_url", &self.result_url),
            ("queue_timeout_url", &self.queue_timeout_url),
            ("remarks", &self.remarks),
        ])
    }

    fn to_wire(&self, _clock: &dyn Clock) -> Result<Vec<u8>> {
        encode(&ReversalWire {
            initiator: &self.initiator,
            security_credential: self.security_credential.expose(),
            command_id: "TransactionReversal",
            transaction_id: &self.transaction_id,
            amount: self.amount,
            receiver_party: &self.receiver_party,
            receiver_identifier_type: self.receiver_identifier_type,
            result_url: &self.result_url,
            queue_timeout_url: &self.queue_timeout_url,
            remarks: &self.remarks,
            occasion: self.occasion.as_deref().unwrap_or_default(),
        })
    }
}

/// Transaction status query.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TransactionStatusRequest {
    /// Initiator username.
    pub initiator: String,
    /// Encrypted initiator password.
    pub security_credential: Secret,
    /// M-Pesa receipt number to look up.
    pub transaction_id: String,
    /// Originator conversation identifier, for lookups without a receipt.
    #[serde(default)]
    pub originator_conversation_id: Option<String>,
    /// Organisation or phone number that owns the transaction.
    pub party_a: String,
    /// Identifier type of `party_a`.
    pub identifier_type: IdentifierType,
    /// URL receiving the final result.
    pub result_url: String,
    /// URL notified when the request times out in the queue.
    pub queue_timeout_url: String,
    /// Free-text remarks.
    pub remarks: String,
    /// Optional occasion text.
    #[serde(default)]
    pub occasion: Option<String>,
}

#[derive(Serialize)]
#[serde(rename_all = "PascalCase")]
struct TransactionStatusWire<'a> {
    initiator: &'a str,
    security_credential: &'a str,
    #[serde(rename = "CommandID")]
    command_id: &'static str,
    #[serde(rename = "TransactionID")]
    transaction_id: &'a str,
    #[serde(rename = "OriginatorConversationID")]
    originator_conversation_id: &'a str,
    party_a: &'a str,
    identifier_type: IdentifierType,
    #[serde(rename = "ResultURL")]
    result_url: &'a str,
    #[serde(rename = "QueueTimeOutURL")]
    queue_timeout_url: &'a str,
    remarks: &'a str,
    occasion: &'a str,
}

impl DarajaRequest for TransactionStatusRequest {
    type Response = TransactionStatusResponse;

    const OPERATION: Operation = Operation::TransactionStatus;
    const REQUIRED_KEYS: &'static [&'static str] = &[
        "initiator",
        "security_credential",
        "transaction_id",
        "party_a",
        "identifier_type",
        "result_url",
        "queue_timeout_url",
        "remarks",
    ];
    const OPTIONAL_KEYS: &'static [&'static str] = &["originator_conversation_id", "occasion"];

    fn validate(&self) -> Result<()> {
        require_non_empty(&[
            ("initiator", &self.initiator),
            ("security_credential", self.security_credential.expose()),
            ("transaction_id", &self.transaction_id),
            ("party_a", &self.party_a),
            ("result_url", &self.result_url),
            ("queue_timeout_url", &self.queue_timeout_url),
            ("remarks", &self.remarks),
        ])
    }

    fn to_wire(&self, _clock: &dyn Clock) -> Result<Vec<u8>> {
        encode(&TransactionStatusWire {
            initiator: &self.initiator,
            security_credential: self.security_credential.expose(),
            command_id: "TransactionStatusQuery",
            transaction_id: &self.transaction_id,
            originator_conversation_id: self.originator_conversation_id.as_deref().unwrap_or_default(),
            party_a: &self.party_a,
            identifier_type: self.identifier_type,
            result_url: &self.result_url,
            queue_timeout_url: &self.queue_timeout_url,
            remarks: &self.remarks,
            occasion: self.occasion.as_deref().unwrap_or_default(),
        })
    }
}

/// Account balance query.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AccountBalanceRequest {
    /// Initiator username.
    pub initiator: String,
    /// Encrypted initiator password.
    pub security_credential: Secret,
    /// Shortcode whose balance is queried.
    pub party_a: String,
    /// Identifier type of `party_a`.
    pub identifier_type: IdentifierType,
    /// Free-text remarks.
    pub remarks: String,
    /// URL notified when the request times out in the queue.
    pub queue_timeout_url: String,
    /// URL receiving the final result.
    pub result_url: String,
}

#[derive(Serialize)]
#[serde(rename_all = "PascalCase")]
struct AccountBalanceWire<'a> {
    initiator: &'a str,
    security_credential: &'a str,
    #[serde(rename = "CommandID")]
    command_id: &'static str,
    party_a: &'a str,
    identifier_type: IdentifierType,
    remarks: &'a str,
    #[serde(rename = "QueueTimeOutURL")]
    queue_timeout_url: &'a str,
    #[serde(rename = "ResultURL")]
    result_url: &'a str,
}

impl DarajaRequest for AccountBalanceRequest {
    type Response = AccountBalanceResponse;

    const OPERATION: Operation = Operation::AccountBalance;
    const REQUIRED_KEYS: &'static [&'static str] = &[
        "initiator",
        "security_credential",
        "party_a",
        "identifier_type",
        "remarks",
        "queue_timeout_url",
        "result_url",
    ];

    fn validate(&self) -> Result<()> {
        require_non_empty(&[
            ("initiator", &self.initiator),
            ("security_credential", self.security_credential.expose()),
            ("party_a", &self.party_a),
            ("remarks", &self.remarks),
            ("queue_timeout_url", &self.queue_timeout_url),
            ("result_url", &self.result_url),
        ])
    }

    fn to_wire(&self, _clock: &dyn Clock) -> Result<Vec<u8>> {
        encode(&AccountBalanceWire {
            initiator: &self.initiator,
            security_credential: self.security_credential.expose(),
            command_id: "AccountBalance",
            party_a: &self.party_a,
            identifier_type: self.identifier_type,
            remarks: &self.remarks,
            queue_timeout_url: &self.queue_timeout_url,
            result_url: &self.result_url,
        })
    }
}

#[cfg(test)]
mod tests {
    use serde_json::{Value, json};

    use super::*;
    use crate::codec::SystemClock;

    fn wire(request: &impl DarajaRequest) -> Value {
        serde_json::from_slice(&request.to_wire(&SystemClock::default()).unwrap()).unwrap()
    }

    fn reversal() -> ReversalRequest {
        ReversalRequest {
            initiator: "apiop37".to_owned(),
            security_credential: Secret::new("cred"),
            transaction_id: "PDU91HIVIT".to_owned(),
            amount: Decimal::new(200, 0),
            receiver_party: "603021".to_owned(),
            receiver_identifier_type: IdentifierType::Organization,
            result_url: "https://example.com/result".to_owned(),
            queue_timeout_url: "https://example.com/timeout".to_owned(),
            remarks: "Payment reversal".to_owned(),
            occasion: None,
        }
    }

    #[test]
    fn test_reversal_wire_payload() {
        let body = wire(&reversal());
        assert_eq!(body["CommandID"], "TransactionReversal");
        assert_eq!(body["TransactionID"], "PDU91HIVIT");
        assert_eq!(body["ReceiverIdentifierType"], "11");
        assert_eq!(body["Amount"], "200");
        assert_eq!(body["Occasion"], "");
        assert_eq!(body.as_object().unwrap().len(), 11);
    }

    #[test]
    fn test_reversal_validation() {
        let request = ReversalRequest { transaction_id: " ".to_owned(), ..reversal() };
        assert_eq!(request.validate().unwrap_err().field(), Some("transaction_id"));
    }

    #[test]
    fn test_transaction_status_wire_payload() {
        let request = TransactionStatusRequest {
            initiator: "testapi".to_owned(),
            security_credential: Secret::new("cred"),
            transaction_id: "OEI2AK4Q16".to_owned(),
            originator_conversation_id: Some("AG_2019".to_owned()),
            party_a: "600996".to_owned(),
            identifier_type: IdentifierType::ShortCode,
            result_url: "https://example.com/result".to_owned(),
            queue_timeout_url: "https://example.com/timeout".to_owned(),
            remarks: "status".to_owned(),
            occasion: None,
        };
        let body = wire(&request);
        assert_eq!(body["CommandID"], "TransactionStatusQuery");
        assert_eq!(body["OriginatorConversationID"], "AG_2019");
        assert_eq!(body["IdentifierType"], "4");
        assert_eq!(body["Occasion"], "");
    }

    #[test]
    fn test_account_balance_wire_payload() {
        let request = AccountBalanceRequest {
            initiator: "testapi".to_owned(),
            security_credential: Secret::new("cred"),
            party_a: "600996".to_owned(),
            identifier_type: IdentifierType::ShortCode,
            remarks: "balance".to_owned(),
            queue_timeout_url: "https://example.com/timeout".to_owned(),
            result_url: "https://example.com/result".to_owned(),
        };
        assert_eq!(
            wire(&request),
            json!({
                "Initiator": "testapi",
                "SecurityCredential": "cred",
                "CommandID": "AccountBalance",
                "PartyA": "600996",
                "IdentifierType": "4",
                "Remarks": "balance",
                "QueueTimeOutURL": "https://example.com/timeout",
                "ResultURL": "https://example.com/result"
            })
        );
    }

    #[test]
    fn test_account_balance_from_map_missing_identifier_type() {
        let payload = json!({
            "initiator": "testapi",
            "security_credential": "cred",
            "party_a": "600996",
            "remarks": "balance"
        });
        let err = AccountBalanceRequest::from_map(payload.as_object().unwrap()).unwrap_err();
        assert_eq!(err.field(), Some("identifier_type"));
    }
}
