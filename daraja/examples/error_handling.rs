//! Branching on Daraja client errors.
//!
//! Builds requests that fail in each way the client reports and prints the
//! recovery each error calls for. Only the last step touches the network.
//!
//! # Running this example
//!
//! ```bash
//! cargo run --example error_handling
//! ```

#![allow(
    clippy::print_stdout,
    clippy::print_stderr,
    clippy::uninlined_format_args,
    reason = "examples are allowed to use println and simple formatting"
)]

use mpesa_daraja::{
    DarajaClient, DarajaConfig, DarajaError,
    api::{AccountBalanceRequest, IdentifierType},
};
use serde_json::{Map, Value};

fn describe(err: &DarajaError) -> String {
    match err {
        DarajaError::Validation { field } => format!("fix `{field}` and resend"),
        DarajaError::Remote { code, description } => {
            format!("provider rejected the request ({code}): {description}")
        }
        DarajaError::Config(msg) => format!("fix configuration: {msg}"),
        e if e.is_retryable() => format!("transient, retry later: {e}"),
        e => format!("not retryable: {e}"),
    }
}

fn balance_request() -> AccountBalanceRequest {
    AccountBalanceRequest {
        initiator: "testapi".to_owned(),
        security_credential: "encrypted-credential".into(),
        party_a: "600996".to_owned(),
        identifier_type: IdentifierType::ShortCode,
        remarks: "balance check".to_owned(),
        queue_timeout_url: "https://example.com/timeout".to_owned(),
        result_url: "https://example.com/result".to_owned(),
    }
}

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    println!("M-Pesa Daraja: Error Handling Example\n");

    let client = DarajaClient::new()?;

    println!("1. Empty field:");
    let request = AccountBalanceRequest { remarks: String::new(), ..balance_request() };
    if let Err(e) = client.account_balance("token", &request).await {
        println!("   {}", describe(&e));
    }

    println!("\n2. Missing access token:");
    if let Err(e) = client.account_balance("", &balance_request()).await {
        println!("   {}", describe(&e));
    }

    println!("\n3. Untyped payload without a required key:");
    let payload: Map<String, Value> = [("initiator", "testapi"), ("party_a", "600996")]
        .into_iter()
        .map(|(key, value)| (key.to_owned(), Value::from(value)))
        .collect();
    if let Err(e) = client.send_map::<AccountBalanceRequest>("token", &payload).await {
        println!("   {}", describe(&e));
    }

    println!("\n4. Invalid configuration:");
    if let Err(e) = DarajaConfig::from_toml("[http]\ntimeout_secs = 0") {
        println!("   {}", describe(&e));
    }

    println!("\n5. Unreachable host:");
    let mut offline = client.clone();
    offline.set_base_url("http://127.0.0.1:9");
    if let Err(e) = offline.account_balance("token", &balance_request()).await {
        println!("   {}", describe(&e));
    }

    Ok(())
}
