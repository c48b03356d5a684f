use serde_json::json;
use wiremock::matchers::{method, path};
use wiremock::{Mock, MockServer, ResponseTemplate};
use zoho_books_rs::{AuthSession, Contact, ListFilters, Operation, Operations, Page};

mod test_utils;

#[tokio::test]
async fn operation_tracks_a_failed_then_successful_call() {
    test_utils::do_setup();
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/api/v3/contacts/1"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "code": 0,
            "message": "success",
            "contact": { "contact_id": "1", "contact_name": "Acme" }
        })))
        .mount(&server)
        .await;
    Mock::given(method("GET"))
        .and(path("/api/v3/contacts/2"))
        .respond_with(ResponseTemplate::new(404).set_body_json(json!({
            "code": 1002,
            "message": "Contact not found"
        })))
        .mount(&server)
        .await;

    let client = test_utils::authorized_client(&server);
    let operation: Operation<Contact> = Operation::new();
    let mut updates = operation.subscribe();

    operation.execute(client.contacts().get("1")).await.unwrap();
    assert!(updates.has_changed().unwrap());
    let state = updates.borrow_and_update().clone();
    assert_eq!(state.data.unwrap().contact_name, "Acme");
    assert!(!state.is_loading);

    let error = operation
        .execute(client.contacts().get("2"))
        .await
        .unwrap_err();
    assert_eq!(error.http_status(), 404);

    let state = operation.state();
    let summary = state.error.unwrap();
    assert_eq!(summary.message, "Contact not found");
    assert_eq!(summary.http_status, 404);
    assert_eq!(state.data.unwrap().contact_id, "1");
}

#[tokio::test]
async fn loading_is_visible_while_the_call_runs() {
    test_utils::do_setup();
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/api/v3/contacts"))
        .respond_with(
            ResponseTemplate::new(200)
                .set_delay(std::time::Duration::from_millis(200))
                .set_body_json(json!({ "code": 0, "message": "success", "contacts": [] })),
        )
        .mount(&server)
        .await;

    let client = test_utils::authorized_client(&server);
    let operation: Operation<Page<Contact>> = Operation::new();
    let mut updates = operation.subscribe();

    let filters = ListFilters::default();
    let contacts = client.contacts();
    let call = operation.execute(contacts.list(&filters));
    let observer = async {
        updates.changed().await.unwrap();
        updates.borrow_and_update().is_loading
    };
    let (result, saw_loading) = tokio::join!(call, observer);

    assert!(result.unwrap().items.is_empty());
    assert!(saw_loading);
    assert!(!operation.state().is_loading);
}

#[tokio::test]
async fn session_login_and_logout() {
    test_utils::do_setup();
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/oauth/v2/token"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "access_token": "1000.session",
            "refresh_token": "1000.session-refresh",
            "token_type": "Bearer",
            "expires_in": 3600
        })))
        .mount(&server)
        .await;

    let client = test_utils::mock_client(&server, test_utils::credential());
    let session = AuthSession::new(client).await;
    assert!(!session.state().is_authenticated);
    assert!(session.authorization_url().as_str().contains("access_type=offline"));

    session.login("code").await.unwrap();
    assert!(session.state().is_authenticated);
    assert_eq!(
        session.client().refresh_token().await.as_deref(),
        Some("1000.session-refresh")
    );

    session.logout().await;
    let state = session.state();
    assert!(!state.is_authenticated);
    assert_eq!(session.client().access_token().await, None);
    assert_eq!(session.client().refresh_token().await, None);
}

#[tokio::test]
async fn failed_login_keeps_state_and_records_error() {
    test_utils::do_setup();
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/oauth/v2/token"))
        .respond_with(ResponseTemplate::new(400).set_body_json(json!({ "error": "invalid_code" })))
        .mount(&server)
        .await;

    let client = test_utils::mock_client(&server, test_utils::credential());
    let session = AuthSession::new(client).await;
    let error = session.login("bad").await.unwrap_err();

    assert_eq!(error.http_status(), 400);
    let state = session.state();
    assert!(!state.is_authenticated);
    assert!(!state.is_loading);
    assert_eq!(state.error.unwrap().message, "failed to exchange code for token");
}

#[tokio::test]
async fn operations_keep_errors_per_id() {
    test_utils::do_setup();
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/api/v3/invoices/1/status/sent"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "code": 0,
            "message": "Invoice status has been changed to Sent."
        })))
        .mount(&server)
        .await;
    Mock::given(method("POST"))
        .and(path("/api/v3/invoices/2/status/sent"))
        .respond_with(ResponseTemplate::new(400).set_body_json(json!({
            "code": 1037,
            "message": "Invoice is already sent"
        })))
        .mount(&server)
        .await;

    let client = test_utils::authorized_client(&server);
    let invoices = client.invoices();
    let operations = Operations::new();
    let (first, second) = tokio::join!(
        operations.execute("send-1", invoices.mark_as_sent("1")),
        operations.execute("send-2", invoices.mark_as_sent("2")),
    );

    assert_eq!(first.unwrap().code, 0);
    assert_eq!(second.unwrap_err().http_status(), 400);
    assert_eq!(operations.error("send-1"), None);
    assert_eq!(operations.error("send-2").unwrap().message, "Invoice is already sent");
    assert!(!operations.is_loading("send-1"));
    assert!(!operations.is_loading("send-2"));
}
