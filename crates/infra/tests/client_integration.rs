//! End-to-end client behavior against a mocked TrueSign API

#[path = "support.rs"]
mod support;

use chrono::Duration;
use support::{base_url, client, envelope_json, hits, mount_auth, token_body, TOKEN};
use truesign_domain::{
    AccessCode, Credentials, DocumentDto, EnvelopeDto, EnvelopeStatus, Signer, SignerDto,
    TrueSignError,
};
use truesign_infra::TrueSignClient;
use uuid::Uuid;
use wiremock::matchers::{any, body_partial_json, header, method, path};
use wiremock::{Mock, MockServer, ResponseTemplate};

// ============================================================================
// Authentication
// ============================================================================

#[tokio::test]
async fn first_call_authenticates_exactly_once() {
    let server = MockServer::start().await;
    mount_auth(&server).await;
    let id = Uuid::new_v4();
    Mock::given(method("GET"))
        .and(path(format!("/v1/envelope/{id}")))
        .and(header("Authorization", format!("Bearer {TOKEN}").as_str()))
        .respond_with(ResponseTemplate::new(200).set_body_json(envelope_json(id, "Lease")))
        .mount(&server)
        .await;
    let client = client(&server);

    client.get_envelope(id).await.unwrap();
    client.get_envelope(id).await.unwrap();

    assert_eq!(hits(&server, "/v1/auth").await, 1);
    assert_eq!(hits(&server, &format!("/v1/envelope/{id}")).await, 2);
}

#[tokio::test]
async fn concurrent_calls_share_one_login() {
    let server = MockServer::start().await;
    mount_auth(&server).await;
    Mock::given(method("GET"))
        .and(path("/v1/envelope/Users"))
        .respond_with(ResponseTemplate::new(200).set_body_json(serde_json::json!([])))
        .mount(&server)
        .await;
    let client = std::sync::Arc::new(client(&server));

    let (a, b) = tokio::join!(client.list_users(), client.list_users());
    a.unwrap();
    b.unwrap();

    assert_eq!(hits(&server, "/v1/auth").await, 1);
}

#[tokio::test]
async fn token_inside_refresh_threshold_is_renewed() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/v1/auth"))
        .respond_with(
            ResponseTemplate::new(200).set_body_json(token_body(TOKEN, Duration::seconds(90))),
        )
        .mount(&server)
        .await;
    Mock::given(method("GET"))
        .and(path("/v1/envelope"))
        .respond_with(ResponseTemplate::new(200).set_body_json(serde_json::json!([])))
        .mount(&server)
        .await;
    let client = TrueSignClient::builder()
        .base_url(base_url(&server))
        .credentials(Credentials::new("county", "s3cret"))
        .refresh_threshold_secs(120)
        .build()
        .unwrap();

    client.list_envelopes().await.unwrap();
    client.list_envelopes().await.unwrap();

    assert_eq!(hits(&server, "/v1/auth").await, 2);
}

#[tokio::test]
async fn unauthorized_response_forces_login_on_next_call() {
    let server = MockServer::start().await;
    mount_auth(&server).await;
    Mock::given(method("GET"))
        .and(path("/v1/envelope/Users"))
        .respond_with(ResponseTemplate::new(401).set_body_string("token revoked"))
        .up_to_n_times(1)
        .mount(&server)
        .await;
    Mock::given(method("GET"))
        .and(path("/v1/envelope/Users"))
        .respond_with(ResponseTemplate::new(200).set_body_json(
            serde_json::json!([{ "Email": "clerk@court.gov", "Name": "Clerk" }]),
        ))
        .mount(&server)
        .await;
    let client = client(&server);

    let err = client.list_users().await.unwrap_err();
    assert!(err.is_unauthorized());
    assert_eq!(hits(&server, "/v1/envelope/Users").await, 1, "failed call is not retried");

    let users = client.list_users().await.unwrap();
    assert_eq!(users[0].email, "clerk@court.gov");
    assert_eq!(hits(&server, "/v1/auth").await, 2);
}

#[tokio::test]
async fn failed_login_fails_the_triggering_call() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/v1/auth"))
        .respond_with(ResponseTemplate::new(401).set_body_string("Unknown client"))
        .mount(&server)
        .await;
    let client = client(&server);

    let err = client.list_envelopes().await.unwrap_err();

    assert!(matches!(err, TrueSignError::Auth(ref body) if body == "Unknown client"));
    assert_eq!(hits(&server, "/v1/envelope").await, 0);
}

// ============================================================================
// Operations
// ============================================================================

#[tokio::test]
async fn empty_title_is_rejected_without_network() {
    let server = MockServer::start().await;
    Mock::given(any()).respond_with(ResponseTemplate::new(200)).expect(0).mount(&server).await;

    let err = client(&server).create_envelope(&EnvelopeDto::new("")).await.unwrap_err();

    assert!(err.is_validation());
}

#[tokio::test]
async fn created_envelope_keeps_document_order() {
    let server = MockServer::start().await;
    mount_auth(&server).await;
    let id = Uuid::new_v4();
    let mut body = envelope_json(id, "Custody order");
    body["Content"]["Documents"] = serde_json::json!([
        { "Id": Uuid::new_v4(), "Title": "A", "Client_Id": "1", "Upload_Url": "https://blob/a" },
        { "Id": Uuid::new_v4(), "Title": "B", "Client_Id": "2", "Upload_Url": "https://blob/b" }
    ]);
    Mock::given(method("POST"))
        .and(path("/v1/envelope"))
        .and(body_partial_json(serde_json::json!({
            "Title": "Custody order",
            "Documents": [{ "Title": "A" }, { "Title": "B" }]
        })))
        .respond_with(ResponseTemplate::new(200).set_body_json(body))
        .expect(1)
        .mount(&server)
        .await;

    let dto = EnvelopeDto::new("Custody order").with_documents(vec![
        DocumentDto::new("A").with_client_id("1"),
        DocumentDto::new("B").with_client_id("2"),
    ]);
    let envelope = client(&server).create_envelope(&dto).await.unwrap();

    let titles: Vec<_> = envelope.content.documents.iter().map(|d| d.title.as_str()).collect();
    assert_eq!(titles, vec!["A", "B"]);
    assert_eq!(envelope.status, EnvelopeStatus::Created);
}

#[tokio::test]
async fn add_files_returns_upload_urls() {
    let server = MockServer::start().await;
    mount_auth(&server).await;
    let id = Uuid::new_v4();
    Mock::given(method("POST"))
        .and(path(format!("/v1/envelope/{id}/files")))
        .respond_with(ResponseTemplate::new(200).set_body_json(serde_json::json!([
            { "Id": Uuid::new_v4(), "Title": "Order 101", "Client_Id": "101", "Upload_Url": "https://blob/101" }
        ])))
        .mount(&server)
        .await;

    let documents = client(&server)
        .add_files(id, &[DocumentDto::new("Order 101").with_client_id("101")])
        .await
        .unwrap();

    assert_eq!(documents[0].upload_url.as_deref(), Some("https://blob/101"));
    assert_eq!(documents[0].client_id.as_deref(), Some("101"));
}

#[tokio::test]
async fn external_signer_with_access_code() {
    let server = MockServer::start().await;
    mount_auth(&server).await;
    let id = Uuid::new_v4();
    Mock::given(method("POST"))
        .and(path(format!("/v1/envelope/{id}/AddExternalSigner")))
        .and(body_partial_json(serde_json::json!({
            "Email": "rae@mail.com",
            "First_Name": "Rae",
            "Last_Name": "Moss",
            "Code": { "Description": "Case number", "Value": "24-117" }
        })))
        .respond_with(ResponseTemplate::new(200))
        .expect(1)
        .mount(&server)
        .await;
    let client = client(&server);

    let missing_email = Signer::external(&SignerDto::new("", "Rae", "Moss"), None);
    assert!(client.add_external_signer(id, &missing_email).await.unwrap_err().is_validation());

    let signer = Signer::external(
        &SignerDto::new("rae@mail.com", "Rae", "Moss"),
        Some(AccessCode::new("Case number", "24-117")),
    );
    client.add_external_signer(id, &signer).await.unwrap();
}

#[tokio::test]
async fn send_and_delete_envelope() {
    let server = MockServer::start().await;
    mount_auth(&server).await;
    let id = Uuid::new_v4();
    let mut sent = envelope_json(id, "Lease");
    sent["Status"] = serde_json::json!(1);
    Mock::given(method("GET"))
        .and(path(format!("/v1/envelope/{id}/send")))
        .respond_with(ResponseTemplate::new(200).set_body_json(sent))
        .expect(1)
        .mount(&server)
        .await;
    Mock::given(method("DELETE"))
        .and(path(format!("/v1/envelope/{id}")))
        .respond_with(ResponseTemplate::new(204))
        .expect(1)
        .mount(&server)
        .await;
    let client = client(&server);

    let envelope = client.send_envelope(id).await.unwrap();
    assert_eq!(envelope.status, EnvelopeStatus::ReadyToSign);
    client.delete_envelope(id).await.unwrap();
}

#[tokio::test]
async fn envelope_history_is_typed() {
    let server = MockServer::start().await;
    mount_auth(&server).await;
    let id = Uuid::new_v4();
    Mock::given(method("GET"))
        .and(path(format!("/v1/envelope/{id}/History")))
        .respond_with(ResponseTemplate::new(200).set_body_json(serde_json::json!([
            { "DateTime_UTC": "2024-05-01T10:00:00", "History_Type": 0, "Message": "Created" },
            { "DateTime_UTC": "2024-05-01T11:00:00", "History_Type": "Viewed", "Message": null }
        ])))
        .mount(&server)
        .await;

    let history = client(&server).envelope_history(id).await.unwrap();

    assert_eq!(history.len(), 2);
    assert_eq!(history[0].message, "Created");
    assert!(history[1].message.is_empty());
}

// ============================================================================
// Error statuses
// ============================================================================

async fn assert_every_operation_fails_with(status: u16) {
    let server = MockServer::start().await;
    mount_auth(&server).await;
    Mock::given(any())
        .respond_with(ResponseTemplate::new(status).set_body_string("X"))
        .mount(&server)
        .await;
    let client = client(&server);
    let id = Uuid::new_v4();
    let external = Signer::external(&SignerDto::new("a@x.com", "Ann", "Lee"), None);

    let results: Vec<(&str, Result<(), TrueSignError>)> = vec![
        ("create", client.create_envelope(&EnvelopeDto::new("T")).await.map(drop)),
        ("files", client.add_files(id, &[DocumentDto::new("A")]).await.map(drop)),
        ("external", client.add_external_signer(id, &external).await),
        ("internal", client.add_internal_signer(id, &Signer::internal("a@x.com"), true).await),
        ("designers", client.set_designers(id, &["a@x.com".to_string()]).await),
        ("creator", client.set_creator(id, "a@x.com").await),
        ("send", client.send_envelope(id).await.map(drop)),
        ("get", client.get_envelope(id).await.map(drop)),
        ("delete", client.delete_envelope(id).await),
        ("users", client.list_users().await.map(drop)),
        ("list", client.list_envelopes().await.map(drop)),
        ("history", client.envelope_history(id).await.map(drop)),
    ];

    for (operation, result) in results {
        let err = result.expect_err(operation);
        assert_eq!(err.status(), Some(status), "{operation}");
        assert_eq!(err.body(), Some("X"), "{operation}");
        assert!(err.to_string().contains('X'), "{operation}");
    }
}

#[tokio::test]
async fn conflict_surfaces_body_for_every_operation() {
    assert_every_operation_fails_with(409).await;
}

#[tokio::test]
async fn server_error_surfaces_body_for_every_operation() {
    assert_every_operation_fails_with(500).await;
}
