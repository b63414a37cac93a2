//! User API Tests
//!
//! Registration, login, profiles and account management.

use axum::http::StatusCode;
use chrono::{Months, Utc};
use pretty_assertions::assert_eq;
use serde_json::json;

use crate::common::{fake_email, user_body, TestApp, ADMIN_EMAIL, PASSWORD};

#[tokio::test]
async fn test_register_hides_password() {
    let app = TestApp::new();
    let email = fake_email();

    let response = app.post_json("/user", user_body(&email, "Ana")).await;

    assert_eq!(response.status, StatusCode::CREATED);
    assert_eq!(response.json["email"], email.as_str());
    assert_eq!(response.json["firstName"], "Ana");
    assert_eq!(response.json["gender"], "CUSTOM");
    assert!(response.json.get("password").is_none());
    assert!(response.json.get("passwordHash").is_none());
    assert!(!response.text.contains(PASSWORD));
    assert!(!response.text.contains("argon2"));
}

#[tokio::test]
async fn test_register_rejects_under_sixteen() {
    let app = TestApp::new();
    let fifteen_years_ago = Utc::now()
        .date_naive()
        .checked_sub_months(Months::new(15 * 12))
        .unwrap();
    let mut body = user_body(&fake_email(), "Kid");
    body["birthdayDate"] = json!(fifteen_years_ago.format("%Y-%m-%d").to_string());

    let response = app.post_json("/user", body).await;

    assert_eq!(response.status, StatusCode::BAD_REQUEST);
    let field = response.json["errors"][0]["field"].as_str().unwrap();
    assert!(field.to_lowercase().starts_with("birthday"), "{}", field);
}

#[tokio::test]
async fn test_register_rejects_weak_password() {
    let app = TestApp::new();
    let mut body = user_body(&fake_email(), "Ana");
    body["password"] = json!("password");

    let response = app.post_json("/user", body).await;

    assert_eq!(response.status, StatusCode::BAD_REQUEST);
    assert_eq!(response.json["errors"][0]["field"], "password");
}

#[tokio::test]
async fn test_register_rejects_overlong_email() {
    let app = TestApp::new();
    let email = format!("{}@{}.com", "a".repeat(64), vec!["b".repeat(60); 4].join("."));

    let response = app.post_json("/user", user_body(&email, "Ana")).await;

    assert_eq!(response.status, StatusCode::BAD_REQUEST);
    assert_eq!(response.json["errors"][0]["field"], "email");
}

#[tokio::test]
async fn test_register_rejects_duplicate_email() {
    let app = TestApp::new();
    let email = fake_email();
    app.register(&email, "Ana").await;

    let response = app.post_json("/user", user_body(&email, "Bea")).await;

    assert_eq!(response.status, StatusCode::CONFLICT);
}

#[tokio::test]
async fn test_login_returns_token() {
    let app = TestApp::new();
    let email = fake_email();
    app.register(&email, "Ana").await;

    let response = app.login(&email, PASSWORD).await;

    assert_eq!(response.status, StatusCode::OK);
    assert!(response.json["token"].as_str().is_some_and(|t| !t.is_empty()));
}

#[tokio::test]
async fn test_login_failures_are_indistinguishable() {
    let app = TestApp::new();
    let email = fake_email();
    app.register(&email, "Ana").await;

    let wrong_password = app.login(&email, "Wrong123!").await;
    let unknown_email = app.login("nobody@example.com", PASSWORD).await;

    assert_eq!(wrong_password.status, StatusCode::UNAUTHORIZED);
    assert_eq!(unknown_email.status, StatusCode::UNAUTHORIZED);
    assert_eq!(wrong_password.json, unknown_email.json);
}

#[tokio::test]
async fn test_login_requires_both_fields() {
    let app = TestApp::new();

    let response = app
        .post_json("/user/login", json!({ "email": "ana@example.com" }))
        .await;

    assert_eq!(response.status, StatusCode::BAD_REQUEST);
}

#[tokio::test]
async fn test_list_users_paginates() {
    let app = TestApp::new();
    for name in ["Ana", "Bea", "Cai"] {
        app.register(&fake_email(), name).await;
    }

    let response = app.get("/user?page=2&limit=2").await;

    assert_eq!(response.status, StatusCode::OK);
    assert_eq!(response.json["totalItems"], 3);
    assert_eq!(response.json["totalPages"], 2);
    assert_eq!(response.json["currentPage"], 2);
    assert_eq!(response.json["data"].as_array().unwrap().len(), 1);
    assert_eq!(response.json["data"][0]["firstName"], "Cai");
}

#[tokio::test]
async fn test_list_users_rejects_bad_page() {
    let app = TestApp::new();

    let response = app.get("/user?page=zero").await;

    assert_eq!(response.status, StatusCode::BAD_REQUEST);
    assert_eq!(response.json["message"], "Params page or limit are not valid");
}

#[tokio::test]
async fn test_search_by_name_needs_token() {
    let app = TestApp::new();

    let response = app.get("/user/name/ana").await;

    assert_eq!(response.status, StatusCode::UNAUTHORIZED);
}

#[tokio::test]
async fn test_search_by_name_is_case_insensitive_prefix() {
    let app = TestApp::new();
    let (_, token) = app.signed_up(&fake_email(), "Anabel").await;
    app.register(&fake_email(), "Andres").await;
    app.register(&fake_email(), "Bea").await;

    let found = app.get_auth("/user/name/AN", &token).await;
    let missing = app.get_auth("/user/name/zz", &token).await;

    assert_eq!(found.status, StatusCode::OK);
    assert_eq!(found.json.as_array().unwrap().len(), 2);
    assert_eq!(missing.status, StatusCode::NOT_FOUND);
    assert_eq!(missing.json, json!([]));
}

#[tokio::test]
async fn test_profile_of_stranger_is_forbidden() {
    let app = TestApp::new();
    let (_, token) = app.signed_up(&fake_email(), "Ana").await;
    let stranger = app.register(&fake_email(), "Bea").await;

    let response = app.get_auth(&format!("/user/{}", stranger), &token).await;

    assert_eq!(response.status, StatusCode::FORBIDDEN);
}

#[tokio::test]
async fn test_profile_of_friend_with_posts() {
    let app = TestApp::new();
    let (ana, ana_token) = app.signed_up(&fake_email(), "Ana").await;
    let (bea, bea_token) = app.signed_up(&fake_email(), "Bea").await;
    app.create_post(&bea, "Morning run").await;

    let sent = app
        .post_json_auth(
            "/friendship",
            json!({ "sender": ana, "recipient": bea, "message": "hi" }),
            &ana_token,
        )
        .await;
    let request_id = sent.json["id"].as_str().unwrap().to_string();
    let answered = app
        .put_json_auth(
            &format!("/friendship/{}", request_id),
            json!({ "status": "accepted" }),
            &bea_token,
        )
        .await;
    assert_eq!(answered.status, StatusCode::OK);

    let plain = app.get_auth(&format!("/user/{}", bea), &ana_token).await;
    let with_posts = app
        .get_auth(&format!("/user/{}?includePosts=true", bea), &ana_token)
        .await;
    let reverse = app.get_auth(&format!("/user/{}", ana), &bea_token).await;

    assert_eq!(plain.status, StatusCode::OK);
    assert!(plain.json.get("post").is_none());
    assert_eq!(with_posts.status, StatusCode::OK);
    assert_eq!(with_posts.json["post"][0]["text"], "Morning run");
    assert_eq!(with_posts.json["post"][0]["user"], bea.as_str());
    assert_eq!(reverse.status, StatusCode::OK);
}

#[tokio::test]
async fn test_own_profile_is_visible() {
    let app = TestApp::new();
    let (id, token) = app.signed_up(&fake_email(), "Ana").await;

    let response = app.get_auth(&format!("/user/{}", id), &token).await;

    assert_eq!(response.status, StatusCode::OK);
    assert_eq!(response.json["id"], id.as_str());
}

#[tokio::test]
async fn test_profile_of_missing_user() {
    let app = TestApp::new();
    let (_, token) = app.signed_up(&fake_email(), "Ana").await;

    let missing = app.get_auth("/user/1", &token).await;
    let malformed = app.get_auth("/user/not-an-id", &token).await;

    assert_eq!(missing.status, StatusCode::NOT_FOUND);
    assert_eq!(malformed.status, StatusCode::BAD_REQUEST);
}

#[tokio::test]
async fn test_update_own_account() {
    let app = TestApp::new();
    let (id, token) = app.signed_up(&fake_email(), "Ana").await;

    let response = app
        .put_json_auth(
            &format!("/user/{}", id),
            json!({ "firstName": "Anabel", "gender": "female" }),
            &token,
        )
        .await;

    assert_eq!(response.status, StatusCode::OK);
    assert_eq!(response.json["firstName"], "Anabel");
    assert_eq!(response.json["lastName"], "Tester");
    assert_eq!(response.json["gender"], "FEMALE");
}

#[tokio::test]
async fn test_update_other_account_is_forbidden() {
    let app = TestApp::new();
    let (_, token) = app.signed_up(&fake_email(), "Ana").await;
    let other = app.register(&fake_email(), "Bea").await;

    let response = app
        .put_json_auth(
            &format!("/user/{}", other),
            json!({ "firstName": "Hacked" }),
            &token,
        )
        .await;

    assert_eq!(response.status, StatusCode::FORBIDDEN);
}

#[tokio::test]
async fn test_password_change_takes_effect() {
    let app = TestApp::new();
    let email = fake_email();
    let (id, token) = app.signed_up(&email, "Ana").await;

    let response = app
        .put_json_auth(
            &format!("/user/{}", id),
            json!({ "password": "Changed9?" }),
            &token,
        )
        .await;
    assert_eq!(response.status, StatusCode::OK);

    assert_eq!(app.login(&email, PASSWORD).await.status, StatusCode::UNAUTHORIZED);
    assert_eq!(app.login(&email, "Changed9?").await.status, StatusCode::OK);
}

#[tokio::test]
async fn test_admin_can_delete_anyone() {
    let app = TestApp::new();
    let (_, admin_token) = app.signed_up(ADMIN_EMAIL, "Admin").await;
    let victim = app.register(&fake_email(), "Bea").await;

    let deleted = app
        .delete_auth(&format!("/user/{}", victim), &admin_token)
        .await;
    let again = app
        .delete_auth(&format!("/user/{}", victim), &admin_token)
        .await;

    assert_eq!(deleted.status, StatusCode::OK);
    assert_eq!(deleted.json["id"], victim.as_str());
    assert_eq!(again.status, StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn test_invalid_token_is_rejected() {
    let app = TestApp::new();
    let id = app.register(&fake_email(), "Ana").await;

    let response = app
        .delete_auth(&format!("/user/{}", id), "not.a.token")
        .await;

    assert_eq!(response.status, StatusCode::UNAUTHORIZED);
    assert_eq!(response.json["message"], "Invalid or expired token");
}
