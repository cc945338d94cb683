//! Business-to-customer and business-to-business payments.

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use super::{B2bPaymentResponse, B2cPaymentResponse, DarajaRequest, Operation, Secret, encode};
use crate::{
    codec::{Clock, require_non_empty, require_positive},
    error::Result,
};

/// Kind of party identifier, sent as the provider's numeric code.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum IdentifierType {
    /// Phone number (`1`).
    #[serde(rename = "1")]
    Msisdn,
    /// Till number (`2`).
    #[serde(rename = "2")]
    TillNumber,
    /// Organisation shortcode (`4`).
    #[serde(rename = "4")]
    ShortCode,
    /// Organisation identifier used by reversals (`11`).
    #[serde(rename = "11")]
    Organization,
}

/// B2C command.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum B2cCommand {
    /// Salary disbursement.
    SalaryPayment,
    /// Ordinary business payment.
    BusinessPayment,
    /// Promotional payment.
    PromotionPayment,
}

/// B2B command.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum B2bCommand {
    /// Pay a paybill.
    BusinessPayBill,
    /// Pay a till.
    BusinessBuyGoods,
    /// Move funds to a business's disbursement account.
    DisburseFundsToBusiness,
    /// Move funds between two businesses' utility accounts.
    BusinessToBusinessTransfer,
    /// Move funds between two merchants.
    MerchantToMerchantTransfer,
}

/// Business-to-customer payment.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct B2cPaymentRequest {
    /// Initiator username.
    pub initiator_name: String,
    /// Encrypted initiator password.
    pub security_credential: Secret,
    /// Payment kind.
    pub command_id: B2cCommand,
    /// Amount to send.
    pub amount: Decimal,
    /// Sending shortcode.
    pub party_a: String,
    /// Receiving phone number.
    pub party_b: String,
    /// Free-text remarks.
    pub remarks: String,
    /// URL notified when the request times out in the queue.
    pub queue_timeout_url: String,
    /// URL receiving the final result.
    pub result_url: String,
    /// Optional occasion text.
    #[serde(default)]
    pub occasion: Option<String>,
}

#[derive(Serialize)]
#[serde(rename_all = "PascalCase")]
struct B2cWire<'a> {
    initiator_name: &'a str,
    security_credential: &'a str,
    #[serde(rename = "CommandID")]
    command_id: B2cCommand,
    amount: Decimal,
    party_a: &'a str,
    party_b: &'a str,
    remarks: &'a str,
    #[serde(rename = "QueueTimeOutURL")]
    queue_timeout_url: &'a str,
    #[serde(rename = "ResultURL")]
    result_url: &'a str,
    occasion: &'a str,
}

impl DarajaRequest for B2cPaymentRequest {
    type Response = B2cPaymentResponse;

    const OPERATION: Operation = Operation::B2cPayment;
    const REQUIRED_KEYS: &'static [&'static str] = &[
        "initiator_name",
        "security_credential",
        "command_id",
        "amount",
        "party_a",
        "party_b",
        "remarks",
        "queue_timeout_url",
        "result_url",
    ];
    const OPTIONAL_KEYS: &'static [&'static str] = &["occasion"];

    fn validate(&self) -> Result<()> {
        require_non_empty(&[
            ("initiator_name", &self.initiator_name),
            ("security_credential", self.security_credential.expose()),
        ])?;
        require_positive("amount", self.amount)?;
        require_non_empty(&[
            ("party_a", &self.party_a),
            ("party_b", &self.party_b),
            ("remarks", &self.remarks),
            ("queue_timeout_url", &self.queue_timeout_url),
            ("result_url", &self.result_url),
        ])
    }

    fn to_wire(&self, _clock: &dyn Clock) -> Result<Vec<u8>> {
        encode(&B2cWire {
            initiator_name: &self.initiator_name,
            security_credential: self.security_credential.expose(),
            command_id: self.command_id,
            amount: self.amount,
            party_a: &self.party_a,
            party_b: &self.party_b,
            remarks: &self.remarks,
            queue_timeout_url: &self.queue_timeout_url,
            result_url: &self.result_url,
            occasion: self.occasion.as_deref().unwrap_or_default(),
        })
    }
}

/// Business-to-business payment.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct B2bPaymentRequest {
    /// Initiator username.
    pub initiator: String,
    /// Encrypted initiator password.
    pub security_credential: Secret,
    /// Payment kind.
    pub command_id: B2bCommand,
    /// Identifier type of `party_a`.
    pub sender_identifier_type: IdentifierType,
    /// Identifier type of `party_b`.
    pub receiver_identifier_type: IdentifierType,
    /// Amount to send.
    pub amount: Decimal,
    /// Sending shortcode.
    pub party_a: String,
    /// Receiving shortcode or till.
    pub party_b: String,
    /// Free-text remarks.
    pub remarks: String,
    /// Account reference at the receiver.
    pub account_reference: String,
    /// Optional phone number of the customer on whose behalf the business pays.
    #[serde(default)]
    pub requester: Option<String>,
    /// URL notified when the request times out in the queue.
    pub queue_timeout_url: String,
    /// URL receiving the final result.
    pub result_url: String,
}

#[derive(Serialize)]
#[serde(rename_all = "PascalCase")]
struct B2bWire<'a> {
    initiator: &'a str,
    security_credential: &'a str,
    #[serde(rename = "CommandID")]
    command_id: B2bCommand,
    sender_identifier_type: IdentifierType,
    // Provider spelling.
    #[serde(rename = "RecieverIdentifierType")]
    receiver_identifier_type: IdentifierType,
    amount: Decimal,
    party_a: &'a str,
    party_b: &'a str,
    remarks: &'a str,
    account_reference: &'a str,
    requester: &'a str,
    #[serde(rename = "QueueTimeOutURL")]
    queue_timeout_url: &'a str,
    #[serde(rename = "ResultURL")]
    result_url: &'a str,
}

impl DarajaRequest for B2bPaymentRequest {
    type Response = B2bPaymentResponse;

    const OPERATION: Operation = Operation::B2bPayment;
    const REQUIRED_KEYS: &'static [&'static str] = &[
        "initiator",
        "security_credential",
        "command_id",
        "sender_identifier_type",
        "receiver_identifier_type",
        "amount",
        "party_a",
        "party_b",
        "remarks",
        "account_reference",
        "queue_timeout_url",
        "result_url",
    ];
    const OPTIONAL_KEYS: &'static [&'static str] = &["requester"];

    fn validate(&self) -> Result<()> {
        require_non_empty(&[
            ("initiator", &self.initiator),
            ("security_credential", self.security_credential.expose()),
        ])?;
        require_positive("amount", self.amount)?;
        require_non_empty(&[
            ("party_a", &self.party_a),
            ("party_b", &self.party_b),
            ("remarks", &self.remarks),
            ("account_reference", &self.account_reference),
            ("queue_timeout_url", &self.queue_timeout_url),
            ("result_url", &self.result_url),
        ])
    }

    fn to_wire(&self, _clock: &dyn Clock) -> Result<Vec<u8>> {
        encode(&B2bWire {
            initiator: &self.initiator,
            security_credential: self.security_credential.expose(),
            command_id: self.command_id,
            sender_identifier_type: self.sender_identifier_type,
            receiver_identifier_type: self.receiver_identifier_type,
            amount: self.amount,
            party_a: &self.party_a,
            party_b: &self.party_b,
            remarks: &self.remarks,
            account_reference: &self.account_reference,
            requester: self.requester.as_deref().unwrap_or_default(),
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

    fn b2c() -> B2cPaymentRequest {
        B2cPaymentRequest {
            initiator_name: "testapi".to_owned(),
            security_credential: Secret::new("cred"),
            command_id: B2cCommand::BusinessPayment,
            amount: Decimal::new(250, 0),
            party_a: "600996".to_owned(),
            party_b: "254728762287".to_owned(),
            remarks: "refund".to_owned(),
            queue_timeout_url: "https://example.com/timeout".to_owned(),
            result_url: "https://example.com/result".to_owned(),
            occasion: None,
        }
    }

    fn b2b() -> B2bPaymentRequest {
        B2bPaymentRequest {
            initiator: "testapi".to_owned(),
            security_credential: Secret::new("cred"),
            command_id: B2bCommand::BusinessPayBill,
            sender_identifier_type: IdentifierType::ShortCode,
            receiver_identifier_type: IdentifierType::ShortCode,
            amount: Decimal::new(1000, 0),
            party_a: "600979".to_owned(),
            party_b: "600000".to_owned(),
            remarks: "supplies".to_owned(),
            account_reference: "353353".to_owned(),
            requester: None,
            queue_timeout_url: "https://example.com/timeout".to_owned(),
            result_url: "https://example.com/result".to_owned(),
        }
    }

    #[test]
    fn test_b2c_wire_payload() {
        let body = wire(&b2c());
        assert_eq!(body["InitiatorName"], "testapi");
        assert_eq!(body["SecurityCredential"], "cred");
        assert_eq!(body["CommandID"], "BusinessPayment");
        assert_eq!(body["QueueTimeOutURL"], "https://example.com/timeout");
        assert_eq!(body["ResultURL"], "https://example.com/result");
        assert_eq!(body["Occasion"], "");
    }

    #[test]
    fn test_b2c_occasion_passthrough() {
        let request = B2cPaymentRequest { occasion: Some("bonus".to_owned()), ..b2c() };
        assert_eq!(wire(&request)["Occasion"], "bonus");
    }

    #[test]
    fn test_b2c_validation_reports_initiator_first() {
        let request = B2cPaymentRequest {
            initiator_name: String::new(),
            result_url: String::new(),
            ..b2c()
        };
        assert_eq!(request.validate().unwrap_err().field(), Some("initiator_name"));
    }

    #[test]
    fn test_b2b_wire_payload_uses_provider_spelling() {
        let body = wire(&b2b());
        assert_eq!(body["SenderIdentifierType"], "4");
        assert_eq!(body["RecieverIdentifierType"], "4");
        assert!(body.get("ReceiverIdentifierType").is_none());
        assert_eq!(body["CommandID"], "BusinessPayBill");
        assert_eq!(body["Requester"], "");
        assert_eq!(body["AccountReference"], "353353");
    }

    #[test]
    fn test_b2b_from_map() {
        let payload = json!({
            "initiator": "testapi",
            "security_credential": "cred",
            "command_id": "BusinessBuyGoods",
            "sender_identifier_type": "4",
            "receiver_identifier_type": "2",
            "amount": "10.50",
            "party_a": "600979",
            "party_b": "000000",
            "remarks": "ok",
            "account_reference": "ref",
            "requester": "254700000000",
            "queue_timeout_url": "https://example.com/t",
            "result_url": "https://example.com/r"
        });
        let request = B2bPaymentRequest::from_map(payload.as_object().unwrap()).unwrap();
        assert_eq!(request.command_id, B2bCommand::BusinessBuyGoods);
        assert_eq!(request.receiver_identifier_type, IdentifierType::TillNumber);
        assert_eq!(request.amount, Decimal::new(1050, 2));
        assert_eq!(request.requester.as_deref(), Some("254700000000"));
    }

    #[test]
    fn test_from_map_wrong_type_is_invalid_input() {
        let mut payload = json!({
            "initiator_name": "testapi",
            "security_credential": "cred",
            "command_id": "NotACommand",
            "amount": 1,
            "party_a": "1",
            "party_b": "2",
            "remarks": "r",
            "queue_timeout_url": "https://example.com/t",
            "result_url": "https://example.com/r"
        });
        let err = B2cPaymentRequest::from_map(payload.as_object().unwrap()).unwrap_err();
        assert!(matches!(err, crate::error::DarajaError::InvalidInput(_)));

        payload["command_id"] = json!("SalaryPayment");
        assert!(B2cPaymentRequest::from_map(payload.as_object().unwrap()).is_ok());
    }
}
