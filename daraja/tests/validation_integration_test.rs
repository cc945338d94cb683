//! Required-field enforcement for every bearer-authenticated operation.
//!
//! Each test mounts a catch-all mock that must see zero requests, then sends
//! one request per required field with that field blanked (typed records) or
//! removed (untyped payloads). Every request must fail with a validation
//! error naming exactly that field.

use mpesa_daraja::{
    DarajaClient, DarajaConfig, DarajaRequest,
    api::{
        AccountBalanceRequest, B2bCommand, B2bPaymentRequest, B2cCommand, B2cPaymentRequest,
        IdentifierType, PullRegisterRequest, PullTransactionsRequest, RegisterUrlRequest,
        ResponseType, ReversalRequest, Secret, SimulateTransactionRequest, StkPushQueryRequest,
        StkPushRequest, StkTransactionType, TransactionStatusRequest,
    },
};
use rust_decimal::Decimal;
use serde::Serialize;
use serde_json::Value;
use wiremock::{Mock, MockServer, ResponseTemplate, matchers::any};

const TOKEN: &str = "token";

/// Builds one copy of `$base` per listed field, with that field set to its blank value.
macro_rules! blanked {
    ($base:expr; $($field:ident = $blank:expr),+ $(,)?) => {
        vec![$((stringify!($field), {
            let mut request = $base;
            request.$field = $blank;
            request
        })),+]
    };
}

async fn silent_server() -> MockServer {
    let server = MockServer::start().await;
    Mock::given(any()).respond_with(ResponseTemplate::new(200)).expect(0).mount(&server).await;
    server
}

fn client_for(server: &MockServer) -> DarajaClient {
    let config = DarajaConfig { base_url: Some(server.uri()), ..Default::default() };
    DarajaClient::with_config(&config).unwrap()
}

fn blank() -> String {
    String::new()
}

async fn assert_each_blank_rejected<R: DarajaRequest>(
    client: &DarajaClient,
    cases: Vec<(&str, R)>,
) {
    for (field, request) in cases {
        assert!(
            R::REQUIRED_KEYS.contains(&field),
            "{}: `{field}` is not a required key",
            R::OPERATION
        );
        let Err(err) = client.send(TOKEN, &request).await else {
            panic!("{}: blank `{field}` was accepted", R::OPERATION);
        };
        assert_eq!(err.field(), Some(field), "{}", R::OPERATION);
    }
}

async fn assert_each_key_required<R: DarajaRequest + Serialize>(client: &DarajaClient, valid: &R) {
    let Value::Object(complete) = serde_json::to_value(valid).unwrap() else {
        panic!("{}: record does not serialize to an object", R::OPERATION);
    };

    for &key in R::REQUIRED_KEYS {
        let mut payload = complete.clone();
        payload.remove(key);

        let Err(err) = client.send_map::<R>(TOKEN, &payload).await else {
            panic!("{}: payload without `{key}` was accepted", R::OPERATION);
        };
        assert_eq!(err.field(), Some(key), "{}", R::OPERATION);
    }
}

fn stk_push() -> StkPushRequest {
    StkPushRequest {
        business_short_code: "174379".to_owned(),
        passkey: Secret::new("passkey"),
        transaction_type: StkTransactionType::CustomerPayBillOnline,
        amount: Decimal::ONE,
        party_a: "254708374149".to_owned(),
        party_b: "174379".to_owned(),
        phone_number: "254708374149".to_owned(),
        call_back_url: "https://example.com/callback".to_owned(),
        account_reference: "INV-001".to_owned(),
        transaction_desc: "Invoice 001".to_owned(),
    }
}

fn stk_push_query() -> StkPushQueryRequest {
    StkPushQueryRequest {
        business_short_code: "174379".to_owned(),
        passkey: Secret::new("passkey"),
        checkout_request_id: "ws_CO_191220191020363925".to_owned(),
    }
}

fn register_urls() -> RegisterUrlRequest {
    RegisterUrlRequest {
        short_code: "600984".to_owned(),
        response_type: ResponseType::Completed,
        confirmation_url: "https://example.com/confirmation".to_owned(),
        validation_url: "https://example.com/validation".to_owned(),
    }
}

fn simulate() -> SimulateTransactionRequest {
    SimulateTransactionRequest {
        short_code: "600984".to_owned(),
        amount: Decimal::new(100, 0),
        msisdn: "254708374149".to_owned(),
        bill_ref_number: "ACC-1".to_owned(),
    }
}

fn reversal() -> ReversalRequest {
    ReversalRequest {
        initiator: "apiop37".to_owned(),
        security_credential: Secret::new("encrypted"),
        transaction_id: "PDU91HIVIT".to_owned(),
        amount: Decimal::new(200, 0),
        receiver_party: "603021".to_owned(),
        receiver_identifier_type: IdentifierType::Organization,
        result_url: "https://example.com/result".to_owned(),
        queue_timeout_url: "https://example.com/timeout".to_owned(),
        remarks: "reversal".to_owned(),
        occasion: None,
    }
}

fn transaction_status() -> TransactionStatusRequest {
    TransactionStatusRequest {
        initiator: "testapi".to_owned(),
        security_credential: Secret::new("encrypted"),
        transaction_id: "OEI2AK4Q16".to_owned(),
        originator_conversation_id: None,
        party_a: "600996".to_owned(),
        identifier_type: IdentifierType::ShortCode,
        result_url: "https://example.com/result".to_owned(),
        queue_timeout_url: "https://example.com/timeout".to_owned(),
        remarks: "status".to_owned(),
        occasion: None,
    }
}

fn account_balance() -> AccountBalanceRequest {
    AccountBalanceRequest {
        initiator: "testapi".to_owned(),
        security_credential: Secret::new("encrypted"),
        party_a: "600996".to_owned(),
        identifier_type: IdentifierType::ShortCode,
        remarks: "balance".to_owned(),
        queue_timeout_url: "https://example.com/timeout".to_owned(),
        result_url: "https://example.com/result".to_owned(),
    }
}

fn b2c_payment() -> B2cPaymentRequest {
    B2cPaymentRequest {
        initiator_name: "testapi".to_owned(),
        security_credential: Secret::new("encrypted"),
        command_id: B2cCommand::BusinessPayment,
        amount: Decimal::new(250, 0),
        party_a: "600996".to_owned(),
        party_b: "254728762287".to_owned(),
        remarks: "payout".to_owned(),
        queue_timeout_url: "https://example.com/timeout".to_owned(),
        result_url: "https://example.com/result".to_owned(),
        occasion: None,
    }
}

fn b2b_payment() -> B2bPaymentRequest {
    B2bPaymentRequest {
        initiator: "testapi".to_owned(),
        security_credential: Secret::new("encrypted"),
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

fn pull_register() -> PullRegisterRequest {
    PullRegisterRequest {
        short_code: "600000".to_owned(),
        nominated_number: "0722000000".to_owned(),
        call_back_url: "https://example.com/pull".to_owned(),
    }
}

fn pull_transactions() -> PullTransactionsRequest {
    PullTransactionsRequest {
        short_code: "600000".to_owned(),
        start_date: "2024-01-01 00:00:00".to_owned(),
        end_date: "2024-01-01 23:59:59".to_owned(),
        offset_value: 0,
    }
}

#[tokio::test]
async fn test_blank_required_field_is_rejected_for_every_operation() {
    let server = silent_server().await;
    let client = client_for(&server);

    assert_each_blank_rejected(
        &client,
        blanked!(stk_push();
            business_short_code = blank(),
            passkey = Secret::new(""),
            amount = Decimal::ZERO,
            party_a = blank(),
            party_b = blank(),
            phone_number = "   ".to_owned(),
            call_back_url = blank(),
            account_reference = blank(),
            transaction_desc = blank(),
        ),
    )
    .await;

    assert_each_blank_rejected(
        &client,
        blanked!(stk_push_query();
            business_short_code = blank(),
            passkey = Secret::new(" "),
            checkout_request_id = blank(),
        ),
    )
    .await;

    assert_each_blank_rejected(
        &client,
        blanked!(register_urls();
            short_code = blank(),
            confirmation_url = blank(),
            validation_url = blank(),
        ),
    )
    .await;

    assert_each_blank_rejected(
        &client,
        blanked!(simulate();
            short_code = blank(),
            amount = Decimal::new(-5, 0),
            msisdn = blank(),
            bill_ref_number = blank(),
        ),
    )
    .await;

    assert_each_blank_rejected(
        &client,
        blanked!(reversal();
            initiator = blank(),
            security_credential = Secret::new(""),
            transaction_id = blank(),
            amount = Decimal::ZERO,
            receiver_party = blank(),
            result_url = blank(),
            queue_timeout_url = blank(),
            remarks = blank(),
        ),
    )
    .await;

    assert_each_blank_rejected(
        &client,
        blanked!(transaction_status();
            initiator = blank(),
            security_credential = Secret::new(""),
            transaction_id = blank(),
            party_a = blank(),
            result_url = blank(),
            queue_timeout_url = blank(),
            remarks = blank(),
        ),
    )
    .await;

    assert_each_blank_rejected(
        &client,
        blanked!(account_balance();
            initiator = blank(),
            security_credential = Secret::new(""),
            party_a = blank(),
            remarks = blank(),
            queue_timeout_url = blank(),
            result_url = blank(),
        ),
    )
    .await;

    assert_each_blank_rejected(
        &client,
        blanked!(b2c_payment();
            initiator_name = blank(),
            security_credential = Secret::new(""),
            amount = Decimal::ZERO,
            party_a = blank(),
            party_b = blank(),
            remarks = blank(),
            queue_timeout_url = blank(),
            result_url = blank(),
        ),
    )
    .await;

    assert_each_blank_rejected(
        &client,
        blanked!(b2b_payment();
            initiator = blank(),
            security_credential = Secret::new(""),
            amount = Decimal::ZERO,
            party_a = blank(),
            party_b = blank(),
            remarks = blank(),
            account_reference = blank(),
            queue_timeout_url = blank(),
            result_url = blank(),
        ),
    )
    .await;

    assert_each_blank_rejected(
        &client,
        blanked!(pull_register();
            short_code = blank(),
            nominated_number = blank(),
            call_back_url = blank(),
        ),
    )
    .await;

    assert_each_blank_rejected(
        &client,
        blanked!(pull_transactions();
            short_code = blank(),
            start_date = blank(),
            end_date = blank(),
        ),
    )
    .await;
}

#[tokio::test]
async fn test_missing_required_key_is_rejected_for_every_operation() {
    let server = silent_server().await;
    let client = client_for(&server);

    assert_each_key_required(&client, &stk_push()).await;
    assert_each_key_required(&client, &stk_push_query()).await;
    assert_each_key_required(&client, &register_urls()).await;
    assert_each_key_required(&client, &simulate()).await;
    assert_each_key_required(&client, &reversal()).await;
    assert_each_key_required(&client, &transaction_status()).await;
    assert_each_key_required(&client, &account_balance()).await;
    assert_each_key_required(&client, &b2c_payment()).await;
    assert_each_key_required(&client, &b2b_payment()).await;
    assert_each_key_required(&client, &pull_register()).await;
    assert_each_key_required(&client, &pull_transactions()).await;
}

#[test]
fn test_complete_records_pass_validation() {
    assert!(stk_push().validate().is_ok());
    assert!(stk_push_query().validate().is_ok());
    assert!(register_urls().validate().is_ok());
    assert!(simulate().validate().is_ok());
    assert!(reversal().validate().is_ok());
    assert!(transaction_status().validate().is_ok());
    assert!(account_balance().validate().is_ok());
    assert!(b2c_payment().validate().is_ok());
    assert!(b2b_payment().validate().is_ok());
    assert!(pull_register().validate().is_ok());
    assert!(pull_transactions().validate().is_ok());
}
