use std::time::Duration;

use serde_json::json;
use wiremock::matchers::{body_partial_json, header, method, path};
use wiremock::{Mock, MockServer, ResponseTemplate};

use heistkit_api::{heist, user, ClientError, HeistPhase, HttpClient, Selection, UserStatus};

fn endpoint(server: &MockServer) -> String {
    format!("{}/graphql", server.uri())
}

/// The blocking client owns its own runtime; build, use and drop it off the async workers.
async fn blocking<T, F>(f: F) -> T
where
    F: FnOnce() -> T + Send + 'static,
    T: Send + 'static,
{
    tokio::task::spawn_blocking(f).await.unwrap()
}

#[tokio::test(flavor = "multi_thread")]
async fn get_user_round_trip() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/graphql"))
        .and(body_partial_json(json!({
            "operationName": "GetUser",
            "variables": { "id": "/users/3" }
        })))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "data": { "user": { "id": "/users/3", "username": "nyx", "status": "Alive" } }
        })))
        .expect(1)
        .mount(&server)
        .await;

    let url = endpoint(&server);
    let user = blocking(move || {
        let client = HttpClient::builder(url).build().unwrap();
        user::get_user(&client, "3")
    })
    .await
    .unwrap()
    .unwrap();

    assert_eq!(user.username.as_deref(), Some("nyx"));
    assert_eq!(user.status, Some(UserStatus::Alive));
}

#[tokio::test(flavor = "multi_thread")]
async fn bearer_token_is_sent() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(header("authorization", "Bearer s3cret"))
        .and(header("content-type", "application/json"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "data": { "updateUser": { "user": { "id": "/users/1", "status": "Dead" } } }
        })))
        .expect(1)
        .mount(&server)
        .await;

    let url = endpoint(&server);
    let payload = blocking(move || {
        let client = HttpClient::builder(url)
            .with_bearer_token("s3cret")
            .with_timeout(Duration::from_secs(5))
            .build()
            .unwrap();
        user::kill_user(&client, "1")
    })
    .await
    .unwrap();

    assert_eq!(payload.entity.unwrap().status, Some(UserStatus::Dead));
}

#[tokio::test(flavor = "multi_thread")]
async fn graphql_errors_with_200_keep_paths() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "data": null,
            "errors": [{
                "message": "Item \"/heists/9\" not found.",
                "locations": [{ "line": 1, "column": 34 }],
                "path": ["heist"],
                "extensions": { "status": 404 }
            }]
        })))
        .mount(&server)
        .await;

    let url = endpoint(&server);
    let err = blocking(move || {
        let client = HttpClient::builder(url).build().unwrap();
        heist::get_heist(&client, "9")
    })
    .await
    .unwrap_err();

    match &err {
        ClientError::Graphql { status, errors } => {
            assert_eq!(*status, 200);
            assert_eq!(errors[0].locations[0].column, 34);
        }
        other => panic!("unexpected error: {other:?}"),
    }
    assert_eq!(err.status(), Some(404));
    assert_eq!(err.error_paths(), vec!["heist".to_string()]);
}

#[tokio::test(flavor = "multi_thread")]
async fn non_graphql_404_is_http_status() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .respond_with(ResponseTemplate::new(404).set_body_string("Not Found"))
        .mount(&server)
        .await;

    let url = endpoint(&server);
    let err = blocking(move || {
        let client = HttpClient::builder(url).build().unwrap();
        heist::update_heist_phase(&client, "1", HeistPhase::InProgress)
    })
    .await
    .unwrap_err();

    match err {
        ClientError::HttpStatus { status, body } => {
            assert_eq!(status, 404);
            assert_eq!(body, "Not Found");
        }
        other => panic!("unexpected error: {other:?}"),
    }
}

#[tokio::test(flavor = "multi_thread")]
async fn graphql_errors_on_error_status_are_kept() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .respond_with(ResponseTemplate::new(401).set_body_json(json!({
            "errors": [{ "message": "JWT Token not found", "path": ["user"] }]
        })))
        .mount(&server)
        .await;

    let url = endpoint(&server);
    let err = blocking(move || {
        let client = HttpClient::builder(url).build().unwrap();
        user::get_user(&client, "1")
    })
    .await
    .unwrap_err();

    assert!(matches!(err, ClientError::Graphql { status: 401, .. }));
    assert_eq!(err.status(), Some(401));
}

#[tokio::test(flavor = "multi_thread")]
async fn partial_query_posts_rendered_selection() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(body_partial_json(json!({
            "query": "query GetHeistPartial($id: ID!) { heist(id: $id) { id phase } }",
            "operationName": "GetHeistPartial",
            "variables": { "id": "/heists/2" }
        })))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "data": { "heist": { "id": "/heists/2", "phase": "Succeeded" } }
        })))
        .expect(1)
        .mount(&server)
        .await;

    let url = endpoint(&server);
    let heist = blocking(move || {
        let client = HttpClient::builder(url).build().unwrap();
        let sel = Selection::parse_fields("id, phase").unwrap();
        heist::get_heist_partial(&client, "2", &sel)
    })
    .await
    .unwrap()
    .unwrap();

    assert_eq!(heist.phase, Some(HeistPhase::Succeeded));
}

#[tokio::test(flavor = "multi_thread")]
async fn unreachable_endpoint_is_http_error() {
    let port = {
        let listener = std::net::TcpListener::bind("127.0.0.1:0").unwrap();
        listener.local_addr().unwrap().port()
    };
    let url = format!("http://127.0.0.1:{port}/graphql");

    let err = blocking(move || {
        let client = HttpClient::builder(url)
            .with_timeout(Duration::from_secs(2))
            .build()
            .unwrap();
        user::get_user(&client, "1")
    })
    .await
    .unwrap_err();

    assert!(matches!(err, ClientError::Http { status: None, .. }));
}
