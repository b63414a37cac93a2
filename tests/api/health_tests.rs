//! Health, home page and fallback tests

use axum::http::StatusCode;

use crate::common::TestApp;

#[tokio::test]
async fn test_health_check_returns_ok() {
    let app = TestApp::new();

    let response = app.get("/health").await;

    assert_eq!(response.status, StatusCode::OK);
    assert_eq!(response.json["status"], "healthy");
    assert_eq!(response.json["version"], env!("CARGO_PKG_VERSION"));
}

#[tokio::test]
async fn test_home_names_the_database() {
    let app = TestApp::new();

    let response = app.get("/").await;

    assert_eq!(response.status, StatusCode::OK);
    assert!(response.text.contains("home page"));
    assert!(response.text.ends_with("Connected to database: social_test"));
}

#[tokio::test]
async fn test_unknown_route_gets_plain_text_404() {
    let app = TestApp::new();

    let response = app.get("/nothing/here").await;

    assert_eq!(response.status, StatusCode::NOT_FOUND);
    assert_eq!(
        response.text,
        "Sorry :( we could not find the requested page."
    );
}

#[tokio::test]
async fn test_metrics_count_matched_routes() {
    let app = TestApp::new();
    app.get("/health").await;

    let response = app.get("/metrics").await;

    assert_eq!(response.status, StatusCode::OK);
    assert!(response.text.contains("social_api_http_requests_total"));
    assert!(response.text.contains("path=\"/health\""));
}
