use axum::http::{self, Request, StatusCode};
use http_body_util::BodyExt;
use mock_server::{app, User, UserEnvelope};
use serde_json::Value;
use tower::ServiceExt;

async fn body_json<T: serde::de::DeserializeOwned>(response: axum::response::Response) -> T {
    let bytes = response.into_body().collect().await.unwrap().to_bytes();
    serde_json::from_slice(&bytes).unwrap()
}

async fn body_bytes(response: axum::response::Response) -> bytes::Bytes {
    response.into_body().collect().await.unwrap().to_bytes()
}

fn json_request(method: &str, uri: &str, body: &str) -> Request<String> {
    Request::builder()
        .method(method)
        .uri(uri)
        .header(http::header::CONTENT_TYPE, "application/json")
        .body(body.to_string())
        .unwrap()
}

fn empty_request(method: &str, uri: &str) -> Request<String> {
    Request::builder().method(method).uri(uri).body(String::new()).unwrap()
}

// --- users ---

#[tokio::test]
async fn search_without_email_lists_nothing() {
    let resp = app().oneshot(empty_request("GET", "/api/user")).await.unwrap();

    assert_eq!(resp.status(), StatusCode::OK);
    let body: Value = body_json(resp).await;
    assert_eq!(body["users"], serde_json::json!([]));
}

#[tokio::test]
async fn create_user_returns_envelope() {
    let resp = app()
        .oneshot(json_request("POST", "/api/user", r#"{"user":{"email":"jane@test"}}"#))
        .await
        .unwrap();

    assert_eq!(resp.status(), StatusCode::OK);
    let created: UserEnvelope<User> = body_json(resp).await;
    assert_eq!(created.user.email, "jane@test");
    assert!(created.user.active);
}

#[tokio::test]
async fn create_user_blank_email_returns_field_errors() {
    let resp = app()
        .oneshot(json_request("POST", "/api/user", r#"{"user":{"username":"jane"}}"#))
        .await
        .unwrap();

    assert_eq!(resp.status(), StatusCode::BAD_REQUEST);
    let body: Value = body_json(resp).await;
    assert_eq!(body["fieldErrors"]["user.email"][0]["code"], "[blank]user.email");
}

#[tokio::test]
async fn create_user_without_envelope_is_rejected() {
    let resp = app()
        .oneshot(json_request("POST", "/api/user", r#"{"email":"jane@test"}"#))
        .await
        .unwrap();

    assert_eq!(resp.status(), StatusCode::UNPROCESSABLE_ENTITY);
}

#[tokio::test]
async fn get_user_not_found_has_json_error() {
    let resp = app()
        .oneshot(empty_request("GET", "/api/user/00000000-0000-0000-0000-000000000000"))
        .await
        .unwrap();

    assert_eq!(resp.status(), StatusCode::NOT_FOUND);
    let body: Value = body_json(resp).await;
    assert_eq!(body["error"], "not found");
}

#[tokio::test]
async fn get_user_bad_uuid_returns_400() {
    let resp = app().oneshot(empty_request("GET", "/api/user/not-a-uuid")).await.unwrap();

    assert_eq!(resp.status(), StatusCode::BAD_REQUEST);
}

#[tokio::test]
async fn delete_user_not_found() {
    let resp = app()
        .oneshot(empty_request("DELETE", "/api/user/00000000-0000-0000-0000-000000000000"))
        .await
        .unwrap();

    assert_eq!(resp.status(), StatusCode::NOT_FOUND);
}

// --- diagnostics ---

#[tokio::test]
async fn echo_reflects_method_query_headers_and_body() {
    let resp = app()
        .oneshot(json_request("PUT", "/echo?a=1&b=two", r#"{"x":1}"#))
        .await
        .unwrap();

    assert_eq!(resp.status(), StatusCode::OK);
    let body: Value = body_json(resp).await;
    assert_eq!(body["method"], "PUT");
    assert_eq!(body["query"], "a=1&b=two");
    assert_eq!(body["body"], r#"{"x":1}"#);
    assert_eq!(body["headers"][0], serde_json::json!(["content-type", "application/json"]));
}

#[tokio::test]
async fn fixed_status_has_json_body() {
    let resp = app().oneshot(empty_request("GET", "/status/418")).await.unwrap();

    assert_eq!(resp.status(), StatusCode::IM_A_TEAPOT);
    let body: Value = body_json(resp).await;
    assert_eq!(body["status"], 418);
}

#[tokio::test]
async fn fixed_no_content_is_empty() {
    let resp = app().oneshot(empty_request("DELETE", "/status/204")).await.unwrap();

    assert_eq!(resp.status(), StatusCode::NO_CONTENT);
    assert!(body_bytes(resp).await.is_empty());
}

#[tokio::test]
async fn text_route_is_not_json() {
    let resp = app().oneshot(empty_request("GET", "/text")).await.unwrap();

    assert_eq!(resp.status(), StatusCode::OK);
    let bytes = body_bytes(resp).await;
    assert!(serde_json::from_slice::<Value>(&bytes).is_err());
}

// --- full user lifecycle ---

#[tokio::test]
async fn user_lifecycle() {
    use tower::Service;

    let mut app = app().into_service();

    // create
    let resp = ServiceExt::ready(&mut app)
        .await
        .unwrap()
        .call(json_request(
            "POST",
            "/api/user",
            r#"{"user":{"email":"walk@test","username":"walker"}}"#,
        ))
        .await
        .unwrap();
    assert_eq!(resp.status(), StatusCode::OK);
    let created: UserEnvelope<User> = body_json(resp).await;
    let id = created.user.id;

    // search by email
    let resp = ServiceExt::ready(&mut app)
        .await
        .unwrap()
        .call(empty_request("GET", "/api/user?email=walk%40test"))
        .await
        .unwrap();
    assert_eq!(resp.status(), StatusCode::OK);
    let found: UserEnvelope<User> = body_json(resp).await;
    assert_eq!(found.user.id, id);

    // update email, username unchanged
    let resp = ServiceExt::ready(&mut app)
        .await
        .unwrap()
        .call(json_request(
            "PUT",
            &format!("/api/user/{id}"),
            r#"{"user":{"email":"run@test"}}"#,
        ))
        .await
        .unwrap();
    assert_eq!(resp.status(), StatusCode::OK);
    let updated: UserEnvelope<User> = body_json(resp).await;
    assert_eq!(updated.user.email, "run@test");
    assert_eq!(updated.user.username.as_deref(), Some("walker"));

    // delete — 200 with no body
    let resp = ServiceExt::ready(&mut app)
        .await
        .unwrap()
        .call(empty_request("DELETE", &format!("/api/user/{id}")))
        .await
        .unwrap();
    assert_eq!(resp.status(), StatusCode::OK);
    assert!(body_bytes(resp).await.is_empty());

    // get after delete — 404
    let resp = ServiceExt::ready(&mut app)
        .await
        .unwrap()
        .call(empty_request("GET", &format!("/api/user/{id}")))
        .await
        .unwrap();
    assert_eq!(resp.status(), StatusCode::NOT_FOUND);
}
