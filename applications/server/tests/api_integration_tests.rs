/// API integration tests
/// Tests complete HTTP request/response cycles with real database
mod common;

use axum::http::StatusCode;
use common::TestApp;
use serde_json::json;

#[tokio::test]
async fn test_health_check() {
    let app = TestApp::new().await;

    let (status, body) = app.send("GET", "/health", None).await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["status"], "ok");
    assert_eq!(body["service"], "maria-server");
}

#[tokio::test]
async fn test_get_unknown_user() {
    let app = TestApp::new().await;

    let (status, body) = app.send("GET", "/user/10", None).await;

    assert_eq!(status, StatusCode::NOT_FOUND);
    assert_eq!(
        body,
        json!({"message": "element not found", "by": "user_id", "id": 10, "status_code": 404})
    );
}

#[tokio::test]
async fn test_get_existing_user() {
    let app = TestApp::new().await;
    let user = app.seed_user("name", "alias", "email@email.com").await;

    let (status, body) = app.send("GET", &format!("/user/{}", user.id), None).await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["user_id"], user.id);
    assert_eq!(body["user_name"], "name");
    assert_eq!(body["alias"], "alias");
    assert_eq!(body["email"], "email@email.com");
    assert_eq!(body["active"], false);
    assert!(body["date_created"].is_string());
}

#[tokio::test]
async fn test_get_user_bad_params() {
    let app = TestApp::new().await;

    let (status, body) = app.send("GET", "/user", None).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["message"], "user_id param is missed");

    let (status, body) = app.send("GET", "/user/abc", None).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert!(body["message"]
        .as_str()
        .unwrap()
        .starts_with("cannot parse user_id 'abc'"));
}

#[tokio::test]
async fn test_create_user() {
    let app = TestApp::new().await;

    let (status, body) = app
        .send(
            "POST",
            "/user",
            Some(json!({"user_name": "name", "alias": "alias", "email": "email@email.com"})),
        )
        .await;

    assert_eq!(status, StatusCode::OK);
    assert!(body["user_id"].as_i64().unwrap() > 0);
    assert_eq!(body["active"], false);

    let (status, fetched) = app
        .send("GET", &format!("/user/{}", body["user_id"]), None)
        .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(fetched, body);
}

#[tokio::test]
async fn test_create_duplicate_user_name() {
    let app = TestApp::new().await;
    app.seed_user("name", "alias", "email@email.com").await;

    let (status, body) = app
        .send(
            "POST",
            "/user",
            Some(json!({"user_name": "name", "alias": "other", "email": "other@email.com"})),
        )
        .await;

    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(
        body,
        json!({"message": "a user with the same user_name already exists", "status_code": 400})
    );
}

#[tokio::test]
async fn test_create_user_missing_fields() {
    let app = TestApp::new().await;

    let (status, body) = app.send("POST", "/user", Some(json!({}))).await;

    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(
        body["message"],
        "user_name is required\nalias is required\nemail is required"
    );
}

#[tokio::test]
async fn test_update_user_by_id_with_path_segment() {
    let app = TestApp::new().await;
    let user = app.seed_user("name", "alias", "email@email.com").await;

    let uri = format!("/user/{0}?user_id={0}", user.id);
    let (status, body) = app.send("PUT", &uri, Some(json!({"active": true}))).await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["user_id"], user.id);
    assert_eq!(body["active"], true);

    let (_, fetched) = app.send("GET", &format!("/user/{}", user.id), None).await;
    assert_eq!(fetched["active"], true);
}

#[tokio::test]
async fn test_update_user_by_name_and_alias() {
    let app = TestApp::new().await;
    let user = app.seed_user("name", "alias", "email@email.com").await;

    let (status, body) = app
        .send("PUT", "/user?user_name=name", Some(json!({"active": true})))
        .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["active"], true);

    let (status, body) = app
        .send("PUT", "/user?alias=alias", Some(json!({"active": false})))
        .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["user_id"], user.id);
    assert_eq!(body["active"], false);
}

#[tokio::test]
async fn test_update_unknown_user() {
    let app = TestApp::new().await;

    let (status, body) = app
        .send("PUT", "/user?user_id=10", Some(json!({"active": true})))
        .await;

    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["message"], "user not found by user_id: 10");
}

#[tokio::test]
async fn test_update_user_param_errors() {
    let app = TestApp::new().await;

    let cases = [
        (
            "/user",
            "none of user_id, user_name or alias was specified in query string",
        ),
        (
            "/user?user_id=value&user_name=value",
            "specify only one parameter (user_id, user_name or alias)",
        ),
        ("/user?user_id=value", "user_id must be a positive integer"),
        ("/user?user_id=0", "user_id must be a positive integer"),
    ];

    for (uri, message) in cases {
        let (status, body) = app.send("PUT", uri, Some(json!({"active": true}))).await;

        assert_eq!(status, StatusCode::BAD_REQUEST, "{}", uri);
        assert_eq!(body["message"], message, "{}", uri);
    }
}

#[tokio::test]
async fn test_update_user_without_change() {
    let app = TestApp::new().await;
    let user = app.seed_user("name", "alias", "email@email.com").await;

    let (status, body) = app
        .send("PUT", &format!("/user?user_id={}", user.id), Some(json!({})))
        .await;

    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(
        body["message"],
        "request does not specify a change to be applied"
    );
}
