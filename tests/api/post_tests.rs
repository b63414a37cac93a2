//! Post API Tests

use axum::http::StatusCode;
use serde_json::json;

use crate::common::{fake_email, TestApp};

#[tokio::test]
async fn test_create_post_returns_owner_id() {
    let app = TestApp::new();
    let owner = app.register(&fake_email(), "Ana").await;

    let response = app
        .post_json(
            "/post",
            json!({ "text": "  First post  ", "images": ["/img/a.png"], "user": owner }),
        )
        .await;

    assert_eq!(response.status, StatusCode::CREATED);
    assert_eq!(response.json["text"], "First post");
    assert_eq!(response.json["user"], owner.as_str());
    assert_eq!(response.json["images"], json!(["/img/a.png"]));
    assert_eq!(response.json["likes"], json!([]));
}

#[tokio::test]
async fn test_create_post_validates_text_and_images() {
    let app = TestApp::new();
    let owner = app.register(&fake_email(), "Ana").await;

    let too_long = app
        .post_json("/post", json!({ "text": "x".repeat(451), "user": owner }))
        .await;
    let short_image = app
        .post_json(
            "/post",
            json!({ "text": "hello", "images": ["a"], "user": owner }),
        )
        .await;
    let no_owner = app.post_json("/post", json!({ "text": "hello" })).await;

    assert_eq!(too_long.status, StatusCode::BAD_REQUEST);
    assert_eq!(short_image.status, StatusCode::BAD_REQUEST);
    assert_eq!(no_owner.status, StatusCode::BAD_REQUEST);
}

#[tokio::test]
async fn test_list_posts_second_page() {
    let app = TestApp::new();
    let owner = app.register(&fake_email(), "Ana").await;
    for i in 0..12 {
        app.create_post(&owner, &format!("Post number {}", i)).await;
    }

    let response = app.get("/post?page=2&limit=5").await;

    assert_eq!(response.status, StatusCode::OK);
    assert_eq!(response.json["totalItems"], 12);
    assert_eq!(response.json["totalPages"], 3);
    assert_eq!(response.json["currentPage"], 2);
    let data = response.json["data"].as_array().unwrap();
    assert_eq!(data.len(), 5);
    assert_eq!(data[0]["text"], "Post number 5");
    assert_eq!(data[0]["user"]["id"], owner.as_str());
    assert_eq!(data[0]["user"]["firstName"], "Ana");
}

#[tokio::test]
async fn test_list_posts_defaults_and_bad_limit() {
    let app = TestApp::new();

    let empty = app.get("/post").await;
    let bad = app.get("/post?limit=-1").await;

    assert_eq!(empty.status, StatusCode::OK);
    assert_eq!(empty.json["currentPage"], 1);
    assert_eq!(empty.json["totalPages"], 0);
    assert_eq!(empty.json["data"], json!([]));
    assert_eq!(bad.status, StatusCode::BAD_REQUEST);
}

#[tokio::test]
async fn test_list_posts_rejects_offset_overflow() {
    let app = TestApp::new();

    let response = app.get("/post?page=4294967295&limit=4294967295").await;

    assert_eq!(response.status, StatusCode::BAD_REQUEST);
    assert_eq!(response.json["message"], "Params page or limit are not valid");
}

#[tokio::test]
async fn test_get_post_expands_owner() {
    let app = TestApp::new();
    let owner = app.register(&fake_email(), "Ana").await;
    let post = app.create_post(&owner, "Hello").await;

    let response = app.get(&format!("/post/{}", post)).await;

    assert_eq!(response.status, StatusCode::OK);
    assert_eq!(response.json["id"], post.as_str());
    assert_eq!(response.json["user"]["id"], owner.as_str());
    assert!(response.json["user"].get("password").is_none());
}

#[tokio::test]
async fn test_get_post_with_deleted_owner() {
    let app = TestApp::new();
    let (owner, token) = app.signed_up(&fake_email(), "Ana").await;
    let post = app.create_post(&owner, "Orphan").await;
    app.delete_auth(&format!("/user/{}", owner), &token).await;

    let response = app.get(&format!("/post/{}", post)).await;

    assert_eq!(response.status, StatusCode::OK);
    assert!(response.json["user"].is_null());
}

#[tokio::test]
async fn test_search_by_title() {
    let app = TestApp::new();
    let owner = app.register(&fake_email(), "Ana").await;
    app.create_post(&owner, "Hiking in the Alps").await;
    app.create_post(&owner, "hiking again").await;
    app.create_post(&owner, "Cooking").await;

    let found = app.get("/post/title/HIK").await;
    let missing = app.get("/post/title/zzz").await;

    assert_eq!(found.status, StatusCode::OK);
    assert_eq!(found.json.as_array().unwrap().len(), 2);
    assert_eq!(missing.status, StatusCode::NOT_FOUND);
    assert_eq!(missing.json, json!([]));
}

#[tokio::test]
async fn test_update_post_replaces_supplied_fields() {
    let app = TestApp::new();
    let owner = app.register(&fake_email(), "Ana").await;
    let fan = app.register(&fake_email(), "Bea").await;
    let post = app.create_post(&owner, "Draft").await;

    let response = app
        .put_json(
            &format!("/post/{}", post),
            json!({ "text": "Final", "likes": [fan] }),
        )
        .await;

    assert_eq!(response.status, StatusCode::OK);
    assert_eq!(response.json["text"], "Final");
    assert_eq!(response.json["likes"], json!([fan]));
    assert_eq!(response.json["user"], owner.as_str());
}

#[tokio::test]
async fn test_update_missing_post() {
    let app = TestApp::new();

    let response = app.put_json("/post/42", json!({ "text": "Final" })).await;

    assert_eq!(response.status, StatusCode::NOT_FOUND);
    assert_eq!(response.json, json!({}));
}

#[tokio::test]
async fn test_delete_post() {
    let app = TestApp::new();
    let owner = app.register(&fake_email(), "Ana").await;
    let post = app.create_post(&owner, "Short lived").await;

    let deleted = app.delete(&format!("/post/{}", post)).await;
    let missing = app.delete(&format!("/post/{}", post)).await;

    assert_eq!(deleted.status, StatusCode::OK);
    assert_eq!(deleted.json["text"], "Short lived");
    assert_eq!(missing.status, StatusCode::NOT_FOUND);
    assert_eq!(missing.json, json!({}));
}

#[tokio::test]
async fn test_malformed_post_id() {
    let app = TestApp::new();

    let response = app.get("/post/abc").await;

    assert_eq!(response.status, StatusCode::BAD_REQUEST);
    assert_eq!(response.json["message"], "Invalid id");
}
