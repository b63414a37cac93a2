//! Route Configuration
//!
//! Configures all HTTP routes for the API. Routes that need a caller take
//! an [`AuthUser`](super::extractors::AuthUser) argument, so public and
//! protected routes share a router.

use axum::{middleware, routing::get, Router};
use tower_http::services::ServeDir;

use super::handlers;
use crate::presentation::middleware::track_metrics;
use crate::startup::AppState;

/// Create the main API router
pub fn create_router(state: AppState) -> Router {
    let static_dir = ServeDir::new(&state.settings.static_files.dir);

    Router::new()
        .route("/", get(handlers::health::home))
        .nest("/user", user_routes())
        .nest("/post", post_routes())
        .nest("/friendship", friendship_routes())
        // Health check and Prometheus endpoints
        .route("/health", get(handlers::health::health_check))
        .route("/metrics", get(handlers::health::metrics_handler))
        .route_layer(middleware::from_fn(track_metrics))
        .nest_service("/public", static_dir)
        .fallback(handlers::health::not_found)
        .with_state(state)
}

/// User routes
fn user_routes() -> Router<AppState> {
    use handlers::user;

    Router::new()
        .route("/", get(user::list_users).post(user::create_user))
        .route("/login", axum::routing::post(user::login))
        .route("/name/{name}", get(user::search_by_name))
        .route(
            "/{id}",
            get(user::get_user)
                .put(user::update_user)
                .delete(user::delete_user),
        )
}

/// Post routes
fn post_routes() -> Router<AppState> {
    use handlers::post;

    Router::new()
        .route("/", get(post::list_posts).post(post::create_post))
        .route("/title/{title}", get(post::search_by_title))
        .route(
            "/{id}",
            get(post::get_post)
                .put(post::update_post)
                .delete(post::delete_post),
        )
}

/// Friendship request routes
fn friendship_routes() -> Router<AppState> {
    use handlers::friendship;

    Router::new()
        .route(
            "/",
            get(friendship::list_requests).post(friendship::send_request),
        )
        .route(
            "/{id}",
            get(friendship::pending_for_user).put(friendship::respond),
        )
}
