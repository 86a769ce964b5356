#![allow(dead_code)]

use chrono::{Duration, Utc};
use truesign_domain::Credentials;
use truesign_infra::TrueSignClient;
use uuid::Uuid;
use wiremock::matchers::{method, path};
use wiremock::{Mock, MockServer, ResponseTemplate};

pub const TOKEN: &str = "issued-token";

/// Base path the tests mount their mocks under
pub fn base_url(server: &MockServer) -> String {
    format!("{}/v1/", server.uri())
}

/// Client with valid credentials pointing at `server`
pub fn client(server: &MockServer) -> TrueSignClient {
    TrueSignClient::new(&base_url(server), Credentials::new("county", "s3cret"))
        .expect("client should build")
}

/// Token response expiring `expires_in` from now
pub fn token_body(token: &str, expires_in: Duration) -> serde_json::Value {
    serde_json::json!({
        "Token": token,
        "Expires_UTC": (Utc::now() + expires_in).to_rfc3339(),
    })
}

/// Mount an `auth` endpoint issuing [`TOKEN`] for an hour.
pub async fn mount_auth(server: &MockServer) {
    Mock::given(method("POST"))
        .and(path("/v1/auth"))
        .respond_with(ResponseTemplate::new(200).set_body_json(token_body(TOKEN, Duration::hours(1))))
        .mount(server)
        .await;
}

/// Minimal envelope body as the server returns it
pub fn envelope_json(id: Uuid, title: &str) -> serde_json::Value {
    serde_json::json!({
        "Id": id,
        "Type_Id": Uuid::nil(),
        "Status": 0,
        "Content": {
            "API_Version": 1,
            "Title": title,
            "Signers": null,
            "Documents": [],
            "Created_On_UTC": "2024-05-01T10:00:00"
        }
    })
}

/// Number of requests the server saw for `request_path`
pub async fn hits(server: &MockServer, request_path: &str) -> usize {
    server
        .received_requests()
        .await
        .expect("request recording enabled")
        .iter()
        .filter(|request| request.url.path() == request_path)
        .count()
}
