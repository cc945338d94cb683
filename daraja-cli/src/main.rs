//! `daraja`: operator harness for the M-Pesa Daraja client.
//!
//! Loads configuration and consumer credentials from the environment,
//! exchanges the credentials for an access token and prints the token's
//! lifetime as JSON on stdout. The token itself is never printed.
//!
//! # Environment Variables
//!
//! - `DARAJA_CONFIG`: path to a TOML config file (default: production settings)
//! - `DARAJA_CONSUMER_KEY` / `DARAJA_CONSUMER_SECRET`: app credentials
//! - `LOG_FORMAT` / `RUST_LOG`: log format and filter

#![allow(
    clippy::multiple_crate_versions,
    reason = "transitive dependencies from reqwest and tracing-subscriber"
)]

mod observability;

use std::{env, process::ExitCode};

use mpesa_daraja::{DarajaClient, DarajaConfig, api::ConsumerCredentials, error::Result};
use serde_json::{Value, json};
use tracing::{error, info};

use crate::observability::{LogFormat, init_observability};

/// Names the TOML config file to load.
const CONFIG_ENV: &str = "DARAJA_CONFIG";

fn load_config() -> Result<DarajaConfig> {
    match env::var_os(CONFIG_ENV) {
        Some(path) => DarajaConfig::from_file(path),
        None => Ok(DarajaConfig::default()),
    }
}

async fn run() -> Result<Value> {
    let config = load_config()?;
    let client = DarajaClient::with_config(&config)?;
    let credentials = ConsumerCredentials::from_env()?;

    info!(base_url = client.base_url(), "requesting access token");
    let token = client.generate_token(&credentials).await?;

    Ok(json!({
        "base_url": client.base_url(),
        "expires_in": token.expires_in,
    }))
}

#[tokio::main]
async fn main() -> ExitCode {
    init_observability(LogFormat::from_env());

    match run().await {
        Ok(report) => {
            println!("{report}");
            ExitCode::SUCCESS
        }
        Err(e) => {
            error!(error = %e, retryable = e.is_retryable(), "token exchange failed");
            ExitCode::FAILURE
        }
    }
}

#[cfg(test)]
mod tests {
    use std::fs;

    use mpesa_daraja::{Environment, config::SANDBOX_BASE_URL};

    use super::*;

    #[test]
    fn test_load_config_from_env() {
        let path = env::temp_dir().join(format!("daraja-cli-{}.toml", std::process::id()));
        fs::write(&path, "environment = \"sandbox\"\n").unwrap();

        // SAFETY: DARAJA_CONFIG is only read by this test within the test binary.
        unsafe {
            env::remove_var(CONFIG_ENV);
            assert_eq!(load_config().unwrap(), DarajaConfig::default());

            env::set_var(CONFIG_ENV, &path);
            let config = load_config().unwrap();
            assert_eq!(config.environment, Environment::Sandbox);
            assert_eq!(config.base_url(), SANDBOX_BASE_URL);

            env::set_var(CONFIG_ENV, "/nonexistent/daraja.toml");
            assert!(load_config().is_err());

            env::remove_var(CONFIG_ENV);
        }

        fs::remove_file(&path).unwrap();
    }
}
