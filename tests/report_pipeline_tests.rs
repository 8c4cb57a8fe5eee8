//! Integration tests for the report pipeline
//!
//! Uses wiremock to stand in for the identity endpoint and the Graph API,
//! verifying collector behavior, failure isolation, and mail composition.

use rpt365::collect;
use rpt365::config::TenantConfig;
use rpt365::graph::auth::GraphAuth;
use rpt365::graph::GraphClient;
use rpt365::report;
use serde_json::json;
use wiremock::matchers::{body_partial_json, method, path, query_param};
use wiremock::{Mock, MockServer, ResponseTemplate};

fn graph_client(server: &MockServer) -> GraphClient {
    GraphClient::with_endpoints(
        "test-token".to_string(),
        format!("{}/v1.0", server.uri()),
        format!("{}/beta", server.uri()),
    )
}

fn tenant() -> TenantConfig {
    TenantConfig {
        name: "contoso".into(),
        tenant_id: "tid".into(),
        client_id: "cid".into(),
        client_secret: "secret".into(),
        admin_email: "admin@contoso.onmicrosoft.com".into(),
        description: None,
    }
}

/// A token response without an access_token is a fatal authentication
/// failure; no collector must run afterwards.
#[tokio::test]
async fn auth_failure_aborts_before_any_collector() {
    let identity = MockServer::start().await;
    let graph = MockServer::start().await;

    Mock::given(method("POST"))
        .and(path("/tid/oauth2/v2.0/token"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "token_type": "Bearer",
            "error_description": "no token for you"
        })))
        .expect(1)
        .mount(&identity)
        .await;

    let auth = GraphAuth::with_authority(identity.uri());
    let result = auth.client_credentials_token(&tenant()).await;
    assert!(result.is_err());

    // The pipeline only builds a GraphClient from a successful exchange, so
    // the Graph surface must never have been touched.
    assert!(graph.received_requests().await.unwrap().is_empty());
}

#[tokio::test]
async fn token_exchange_returns_bearer_token() {
    let identity = MockServer::start().await;

    Mock::given(method("POST"))
        .and(path("/tid/oauth2/v2.0/token"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "access_token": "abc123",
            "token_type": "Bearer",
            "expires_in": 3599
        })))
        .expect(1)
        .mount(&identity)
        .await;

    let auth = GraphAuth::with_authority(identity.uri());
    let token = auth.client_credentials_token(&tenant()).await.unwrap();
    assert_eq!(token, "abc123");
}

/// End-to-end scenario from the group collector through composition: one
/// group "Engineering" with 3 members lands as a table row inside the
/// template placeholder, with the rest of the template unchanged.
#[tokio::test]
async fn group_section_is_embedded_in_template() {
    let graph = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/v1.0/groups"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "value": [{"id": "g1", "displayName": "Engineering"}]
        })))
        .expect(1)
        .mount(&graph)
        .await;

    Mock::given(method("GET"))
        .and(path("/v1.0/groups/g1/members"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "value": [{}, {}, {}]
        })))
        .expect(1)
        .mount(&graph)
        .await;

    let client = graph_client(&graph);
    let section = collect::groups::collect(&client).await.unwrap();
    let fragment = report::render(&section);

    assert!(fragment.contains("<tr><td>Engineering</td><td>3</td></tr>"));

    let template = "<html><body><h1>Report</h1>{{content}}<p>footer</p></body></html>";
    let composed = report::compose(template, &fragment);

    assert!(composed.starts_with("<html><body><h1>Report</h1><div class='data-table'>"));
    assert!(composed.ends_with("</div><p>footer</p></body></html>"));
    assert!(composed.contains(&fragment));
}

/// Message enumeration failing for one user yields "Unknown" for that user
/// only; other users keep their counts and the collector succeeds.
#[tokio::test]
async fn message_count_failure_is_isolated_per_user() {
    let graph = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/v1.0/users"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "value": [
                {"id": "u1", "displayName": "Alice Adams", "givenName": "Alice"},
                {"id": "u2", "displayName": "Bob Brown", "givenName": "Bob"},
                {"id": "room1", "displayName": "Conference Room"}
            ]
        })))
        .mount(&graph)
        .await;

    for user in ["u1", "u2"] {
        Mock::given(method("GET"))
            .and(path(format!("/v1.0/users/{}", user)))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!({
                "hireDate": "0001-01-01T00:00:00Z"
            })))
            .mount(&graph)
            .await;

        Mock::given(method("GET"))
            .and(path(format!("/v1.0/users/{}/memberOf", user)))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!({
                "value": [
                    {"@odata.type": "#microsoft.graph.group"},
                    {"@odata.type": "#microsoft.graph.directoryRole"}
                ]
            })))
            .mount(&graph)
            .await;
    }

    // Alice's mailbox errors out; Bob's pages through to completion.
    Mock::given(method("GET"))
        .and(path("/v1.0/users/u1/messages"))
        .respond_with(ResponseTemplate::new(503).set_body_json(json!({
            "error": {"code": "MailboxNotEnabledForRESTAPI", "message": "unsupported"}
        })))
        .mount(&graph)
        .await;

    Mock::given(method("GET"))
        .and(path("/v1.0/users/u2/messages"))
        .and(query_param("$top", "10"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "value": [{}, {}],
            "@odata.nextLink": format!("{}/v1.0/users/u2/messages?page=2", graph.uri())
        })))
        .mount(&graph)
        .await;

    Mock::given(method("GET"))
        .and(path("/v1.0/users/u2/messages"))
        .and(query_param("page", "2"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "value": [{}]
        })))
        .mount(&graph)
        .await;

    let client = graph_client(&graph);
    let section = collect::employees::collect(&client).await.unwrap();
    let html = report::render(&section);

    // Alice: unknown tenure (sentinel), 1 group, unknown messages
    assert!(html.contains("<tr><td>Alice Adams</td><td>Unknown</td><td>1</td><td>Unknown</td></tr>"));
    // Bob: message pages 2 + 1
    assert!(html.contains("<tr><td>Bob Brown</td><td>Unknown</td><td>1</td><td>3</td></tr>"));
    // The room account has no given name and is excluded entirely
    assert!(!html.contains("Conference Room"));
}

#[tokio::test]
async fn drive_usage_is_rounded_up_and_id_abbreviated() {
    let graph = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/v1.0/drives"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "value": [{
                "id": "b!0123456789abcdefghij",
                "quota": {"total": 1_000_000_000u64, "remaining": 400_000_000u64}
            }]
        })))
        .expect(1)
        .mount(&graph)
        .await;

    let client = graph_client(&graph);
    let section = collect::drives::collect(&client).await.unwrap();
    let html = report::render(&section);

    assert!(html.contains("<tr><td>b!012...cdefghij</td><td>600MB</td></tr>"));
}

/// The site collector runs against the beta surface through explicit
/// per-call addressing, not a client-wide version switch.
#[tokio::test]
async fn site_lists_are_collected_from_beta_surface() {
    let graph = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/beta/sites/root"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({"id": "site1"})))
        .expect(1)
        .mount(&graph)
        .await;

    Mock::given(method("GET"))
        .and(path("/beta/sites/site1/lists"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "value": [{"id": "l1", "displayName": "Tasks"}]
        })))
        .expect(1)
        .mount(&graph)
        .await;

    Mock::given(method("GET"))
        .and(path("/beta/sites/site1/lists/l1/items"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "value": [{}, {}]
        })))
        .expect(1)
        .mount(&graph)
        .await;

    let client = graph_client(&graph);
    let section = collect::sites::collect(&client).await.unwrap();
    let html = report::render(&section);

    assert!(html.contains("<tr><td>Tasks</td><td>2</td></tr>"));
}

#[tokio::test]
async fn report_is_sent_via_graph_sendmail() {
    let graph = MockServer::start().await;

    Mock::given(method("POST"))
        .and(path("/v1.0/users/admin@contoso.onmicrosoft.com/sendMail"))
        .and(body_partial_json(json!({
            "message": {
                "subject": "Current data for tenant contoso",
                "body": {"contentType": "html"}
            },
            "saveToSentItems": false
        })))
        .respond_with(ResponseTemplate::new(202))
        .expect(1)
        .mount(&graph)
        .await;

    let client = graph_client(&graph);
    report::send(
        &client,
        "contoso",
        "admin@contoso.onmicrosoft.com",
        "<div>body</div>",
    )
    .await
    .unwrap();
}

#[tokio::test]
async fn sendmail_error_body_is_surfaced() {
    let graph = MockServer::start().await;

    Mock::given(method("POST"))
        .and(path("/v1.0/users/admin@contoso.onmicrosoft.com/sendMail"))
        .respond_with(ResponseTemplate::new(403).set_body_json(json!({
            "error": {"code": "Authorization_RequestDenied", "message": "no Mail.Send"}
        })))
        .mount(&graph)
        .await;

    let client = graph_client(&graph);
    let err = report::send(
        &client,
        "contoso",
        "admin@contoso.onmicrosoft.com",
        "<div>body</div>",
    )
    .await
    .unwrap_err();

    let msg = err.to_string();
    assert!(msg.contains("403"));
    assert!(msg.contains("Authorization_RequestDenied"));
}
