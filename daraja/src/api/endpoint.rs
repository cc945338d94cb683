//! Per-operation path overrides.

use serde::Deserialize;

use super::Operation;
use crate::error::{DarajaError, Result};

/// Endpoint path overrides, read from the `[endpoints]` config table.
///
/// Unset entries fall back to [`Operation::default_path`].
///
/// # Examples
///
/// ```
/// use mpesa_daraja::api::{EndpointConfig, Operation};
///
/// let endpoints: EndpointConfig = toml::from_str(r#"b2c_payment = "/mpesa/b2c/v3/paymentrequest""#).unwrap();
/// assert_eq!(endpoints.resolve(Operation::B2cPayment), "/mpesa/b2c/v3/paymentrequest");
/// assert_eq!(endpoints.resolve(Operation::StkPush), "/mpesa/stkpush/v1/processrequest");
/// ```
#[derive(Debug, Clone, Default, Deserialize, PartialEq, Eq)]
#[serde(deny_unknown_fields)]
pub struct EndpointConfig {
    /// Token exchange path.
    pub generate_token: Option<String>,
    /// STK push path.
    pub stk_push: Option<String>,
    /// STK push query path.
    pub stk_push_query: Option<String>,
    /// C2B URL registration path.
    pub register_urls: Option<String>,
    /// C2B simulation path.
    pub simulate_transaction: Option<String>,
    /// Reversal path.
    pub reverse_transaction: Option<String>,
    /// Transaction status path.
    pub transaction_status: Option<String>,
    /// Account balance path.
    pub account_balance: Option<String>,
    /// B2C payment path.
    pub b2c_payment: Option<String>,
    /// B2B payment path.
    pub b2b_payment: Option<String>,
    /// Pull API registration path.
    pub register_pull_api: Option<String>,
    /// Pull API query path.
    pub pull_transactions: Option<String>,
}

impl EndpointConfig {
    fn get(&self, operation: Operation) -> Option<&String> {
        match operation {
            Operation::GenerateToken => self.generate_token.as_ref(),
            Operation::StkPush => self.stk_push.as_ref(),
            Operation::StkPushQuery => self.stk_push_query.as_ref(),
            Operation::RegisterUrls => self.register_urls.as_ref(),
            Operation::SimulateTransaction => self.simulate_transaction.as_ref(),
            Operation::ReverseTransaction => self.reverse_transaction.as_ref(),
            Operation::TransactionStatus => self.transaction_status.as_ref(),
            Operation::AccountBalance => self.account_balance.as_ref(),
            Operation::B2cPayment => self.b2c_payment.as_ref(),
            Operation::B2bPayment => self.b2b_payment.as_ref(),
            Operation::RegisterPullApi => self.register_pull_api.as_ref(),
            Operation::PullTransactions => self.pull_transactions.as_ref(),
        }
    }

    /// Returns the path for `operation`.
    #[must_use]
    pub fn resolve(&self, operation: Operation) -> &str {
        self.get(operation).map_or_else(|| operation.default_path(), String::as_str)
    }

    /// Validates every override.
    ///
    /// # Errors
    ///
    /// Returns [`DarajaError::Config`] if an override does not start with `/`
    /// or contains `..` or `//`.
    pub fn validate(&self) -> Result<()> {
        for operation in Operation::ALL {
            if let Some(path) = self.get(operation) {
                validate_endpoint_path(operation.name(), path)?;
            }
        }
        Ok(())
    }
}

fn validate_endpoint_path(name: &str, path: &str) -> Result<()> {
    if path.contains("..") {
        return Err(DarajaError::Config(format!(
            "endpoint '{name}' contains path traversal sequence '..': {path}"
        )));
    }

    if path.contains("//") {
        return Err(DarajaError::Config(format!(
            "endpoint '{name}' contains double slash '//': {path}"
        )));
    }

    if !path.starts_with('/') {
        return Err(DarajaError::Config(format!("endpoint '{name}' must start with '/': {path}")));
    }

    Ok(())
}
