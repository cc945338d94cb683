//! Integration tests for file-based configuration driving a live client.

use std::fs;

use mpesa_daraja::{
    DarajaClient, DarajaConfig, DarajaError, Environment,
    api::{Operation, PullRegisterRequest},
    config::SANDBOX_BASE_URL,
};
use serde_json::json;
use wiremock::{
    Mock, MockServer, ResponseTemplate,
    matchers::{method, path},
};

fn write_config(name: &str, contents: &str) -> std::path::PathBuf {
    let path = std::env::temp_dir().join(format!("{name}-{}.toml", std::process::id()));
    fs::write(&path, contents).unwrap();
    path
}

#[test]
fn test_sandbox_config_file() {
    let path = write_config("daraja-sandbox", "environment = \"sandbox\"\n");

    let config = DarajaConfig::from_file(&path).unwrap();
    fs::remove_file(&path).unwrap();

    assert_eq!(config.environment, Environment::Sandbox);
    let client = DarajaClient::with_config(&config).unwrap();
    assert_eq!(client.base_url(), SANDBOX_BASE_URL);
    assert_eq!(
        client.endpoints().resolve(Operation::StkPush),
        Operation::StkPush.default_path()
    );
}

#[test]
fn test_invalid_config_file_is_rejected() {
    let path = write_config("daraja-invalid", "[http]\nconnect_timeout_secs = 600\n");

    let err = DarajaConfig::from_file(&path).unwrap_err();
    fs::remove_file(&path).unwrap();

    assert!(matches!(err, DarajaError::Config(_)));
    assert!(err.to_string().contains("connect_timeout_secs"));
}

#[tokio::test]
async fn test_config_file_points_client_at_overridden_endpoint() {
    let server = MockServer::start().await;

    Mock::given(method("POST"))
        .and(path("/pulltransactions/v2/register"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "ResponseRefID": "ref-1",
            "ResponseStatus": 1000,
            "ShortCode": "600000",
            "ResponseDescription": "Success"
        })))
        .expect(1)
        .mount(&server)
        .await;

    let toml = format!(
        "base_url = \"{}\"\n\n[endpoints]\nregister_pull_api = \"/pulltransactions/v2/register\"\n",
        server.uri()
    );
    let path = write_config("daraja-override", &toml);
    let config = DarajaConfig::from_file(&path).unwrap();
    fs::remove_file(&path).unwrap();

    let client = DarajaClient::with_config(&config).unwrap();
    let request = PullRegisterRequest {
        short_code: "600000".to_owned(),
        nominated_number: "0722000000".to_owned(),
        call_back_url: "https://example.com/pull".to_owned(),
    };
    let response = client.register_pull_api("token", &request).await.unwrap();

    assert_eq!(response.response_status, "1000");
    assert_eq!(response.response_description, "Success");
}
