//! STK push against the Daraja sandbox.
//!
//! Exchanges consumer credentials for a token, prompts the customer's phone
//! for payment and then polls the prompt's status once.
//!
//! # Running this example
//!
//! ```bash
//! export DARAJA_CONSUMER_KEY=<sandbox consumer key>
//! export DARAJA_CONSUMER_SECRET=<sandbox consumer secret>
//! export DARAJA_PASSKEY=<Lipa Na M-Pesa passkey>
//! export DARAJA_PHONE=254708374149
//! cargo run --example stk_push
//! ```

#![allow(
    clippy::print_stdout,
    clippy::print_stderr,
    clippy::uninlined_format_args,
    reason = "examples are allowed to use println and simple formatting"
)]

use std::env;

use mpesa_daraja::{
    DarajaClient, DarajaConfig, Environment,
    api::{ConsumerCredentials, Secret, StkPushQueryRequest, StkPushRequest, StkTransactionType},
};
use rust_decimal::Decimal;

/// Sandbox Lipa Na M-Pesa shortcode.
const SHORT_CODE: &str = "174379";

fn required_env(name: &str) -> Result<String, Box<dyn std::error::Error>> {
    env::var(name).map_err(|_| format!("{name} environment variable not set").into())
}

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    println!("M-Pesa Daraja: STK Push Example\n");

    let config = DarajaConfig { environment: Environment::Sandbox, ..Default::default() };
    let client = DarajaClient::with_config(&config)?;

    println!("1. Requesting access token from {}...", client.base_url());
    let credentials = ConsumerCredentials::from_env()?;
    let token = client.generate_token(&credentials).await?;
    println!("   ✓ Token valid for {}s", token.expires_in);

    let passkey = Secret::new(required_env("DARAJA_PASSKEY")?);
    let phone = required_env("DARAJA_PHONE")?;

    println!("\n2. Sending STK push to {}...", phone);
    let request = StkPushRequest {
        business_short_code: SHORT_CODE.to_owned(),
        passkey: passkey.clone(),
        transaction_type: StkTransactionType::CustomerPayBillOnline,
        amount: Decimal::ONE,
        party_a: phone.clone(),
        party_b: SHORT_CODE.to_owned(),
        phone_number: phone,
        call_back_url: "https://example.com/mpesa/callback".to_owned(),
        account_reference: "EXAMPLE-001".to_owned(),
        transaction_desc: "Example payment".to_owned(),
    };
    let response = client.stk_push(token.as_str(), &request).await?;
    println!("   ✓ {}", response.customer_message);
    println!("   Checkout request: {}", response.checkout_request_id);

    println!("\n3. Querying prompt status...");
    let query = StkPushQueryRequest {
        business_short_code: SHORT_CODE.to_owned(),
        passkey,
        checkout_request_id: response.checkout_request_id,
    };
    let status = client.stk_push_query(token.as_str(), &query).await?;
    if status.fault.is_error() {
        println!("   Not final yet: {}", status.fault.error_message.unwrap_or_default());
    } else {
        println!("   Result {}: {}", status.result_code, status.result_desc);
    }

    Ok(())
}
