//! Common Test Utilities
//!
//! In-memory repositories with the same observable behavior as the
//! Postgres ones, and a `TestApp` that drives the full router in-process.

#![allow(dead_code)]

use std::collections::BTreeMap;
use std::sync::Arc;

use async_trait::async_trait;
use axum::{
    body::{to_bytes, Body},
    http::{header, Method, Request, StatusCode},
    Router,
};
use parking_lot::Mutex;
use serde_json::{json, Value};
use tower::ServiceExt;

use social_api::config::{
    AuthSettings, CorsSettings, DatabaseSettings, JwtSettings, ServerSettings, Settings,
    SnowflakeSettings, StaticFileSettings,
};
use social_api::domain::{
    FriendshipRepository, FriendshipRequest, FriendshipStatus, Group, GroupRepository,
    PageRequest, Post, PostRepository, Repositories, User, UserRepository,
};
use social_api::shared::error::AppError;
use social_api::startup::{build_router, AppState};

pub const ADMIN_EMAIL: &str = "admin@gmail.com";
pub const PASSWORD: &str = "Secret1!";

fn page_of<T: Clone>(items: &BTreeMap<i64, T>, page: PageRequest) -> Vec<T> {
    items
        .values()
        .skip(page.offset() as usize)
        .take(page.limit() as usize)
        .cloned()
        .collect()
}

fn starts_with_ignore_case(value: &str, prefix: &str) -> bool {
    value.to_lowercase().starts_with(&prefix.to_lowercase())
}

fn clear_map<T>(items: &Mutex<BTreeMap<i64, T>>) -> u64 {
    let mut items = items.lock();
    let removed = items.len() as u64;
    items.clear();
    removed
}

#[derive(Default)]
pub struct InMemoryUserRepository {
    users: Mutex<BTreeMap<i64, User>>,
}

#[async_trait]
impl UserRepository for InMemoryUserRepository {
    async fn find_by_id(&self, id: i64) -> Result<Option<User>, AppError> {
        Ok(self.users.lock().get(&id).cloned())
    }

    async fn find_by_ids(&self, ids: &[i64]) -> Result<Vec<User>, AppError> {
        let users = self.users.lock();
        Ok(ids.iter().filter_map(|id| users.get(id).cloned()).collect())
    }

    async fn find_by_email(&self, email: &str) -> Result<Option<User>, AppError> {
        Ok(self
            .users
            .lock()
            .values()
            .find(|u| u.email == email)
            .cloned())
    }

    async fn search_by_first_name(&self, prefix: &str) -> Result<Vec<User>, AppError> {
        Ok(self
            .users
            .lock()
            .values()
            .filter(|u| starts_with_ignore_case(&u.first_name, prefix))
            .cloned()
            .collect())
    }

    async fn list(&self, page: PageRequest) -> Result<Vec<User>, AppError> {
        Ok(page_of(&self.users.lock(), page))
    }

    async fn count(&self) -> Result<u64, AppError> {
        Ok(self.users.lock().len() as u64)
    }

    async fn create(&self, user: &User) -> Result<User, AppError> {
        let mut users = self.users.lock();
        if users.values().any(|u| u.email == user.email) {
            return Err(AppError::Conflict("users_email_key".into()));
        }
        users.insert(user.id, user.clone());
        Ok(user.clone())
    }

    async fn update(&self, user: &User) -> Result<Option<User>, AppError> {
        let mut users = self.users.lock();
        if users
            .values()
            .any(|u| u.id != user.id && u.email == user.email)
        {
            return Err(AppError::Conflict("users_email_key".into()));
        }
        Ok(users.get_mut(&user.id).map(|stored| {
            *stored = user.clone();
            stored.clone()
        }))
    }

    async fn delete(&self, id: i64) -> Result<Option<User>, AppError> {
        Ok(self.users.lock().remove(&id))
    }

    async fn clear(&self) -> Result<u64, AppError> {
        Ok(clear_map(&self.users))
    }
}

#[derive(Default)]
pub struct InMemoryPostRepository {
    posts: Mutex<BTreeMap<i64, Post>>,
}

#[async_trait]
impl PostRepository for InMemoryPostRepository {
    async fn find_by_id(&self, id: i64) -> Result<Option<Post>, AppError> {
        Ok(self.posts.lock().get(&id).cloned())
    }

    async fn find_by_user(&self, user_id: i64) -> Result<Vec<Post>, AppError> {
        Ok(self
            .posts
            .lock()
            .values()
            .filter(|p| p.user_id == user_id)
            .cloned()
            .collect())
    }

    async fn search_by_text(&self, prefix: &str) -> Result<Vec<Post>, AppError> {
        Ok(self
            .posts
            .lock()
            .values()
            .filter(|p| starts_with_ignore_case(&p.text, prefix))
            .cloned()
            .collect())
    }

    async fn list(&self, page: PageRequest) -> Result<Vec<Post>, AppError> {
        Ok(page_of(&self.posts.lock(), page))
    }

    async fn count(&self) -> Result<u64, AppError> {
        Ok(self.posts.lock().len() as u64)
    }

    async fn create(&self, post: &Post) -> Result<Post, AppError> {
        self.posts.lock().insert(post.id, post.clone());
        Ok(post.clone())
    }

    async fn update(&self, post: &Post) -> Result<Option<Post>, AppError> {
        Ok(self.posts.lock().get_mut(&post.id).map(|stored| {
            *stored = post.clone();
            stored.clone()
        }))
    }

    async fn delete(&self, id: i64) -> Result<Option<Post>, AppError> {
        Ok(self.posts.lock().remove(&id))
    }

    async fn clear(&self) -> Result<u64, AppError> {
        Ok(clear_map(&self.posts))
    }
}

#[derive(Default)]
pub struct InMemoryGroupRepository {
    groups: Mutex<BTreeMap<i64, Group>>,
}

impl InMemoryGroupRepository {
    pub fn all(&self) -> Vec<Group> {
        self.groups.lock().values().cloned().collect()
    }
}

#[async_trait]
impl GroupRepository for InMemoryGroupRepository {
    async fn create(&self, group: &Group) -> Result<Group, AppError> {
        self.groups.lock().insert(group.id, group.clone());
        Ok(group.clone())
    }

    async fn count(&self) -> Result<u64, AppError> {
        Ok(self.groups.lock().len() as u64)
    }

    async fn clear(&self) -> Result<u64, AppError> {
        Ok(clear_map(&self.groups))
    }
}

#[derive(Default)]
pub struct InMemoryFriendshipRepository {
    requests: Mutex<BTreeMap<i64, FriendshipRequest>>,
}

impl InMemoryFriendshipRepository {
    pub fn all(&self) -> Vec<FriendshipRequest> {
        self.requests.lock().values().cloned().collect()
    }
}

#[async_trait]
impl FriendshipRepository for InMemoryFriendshipRepository {
    async fn find_by_id(&self, id: i64) -> Result<Option<FriendshipRequest>, AppError> {
        Ok(self.requests.lock().get(&id).cloned())
    }

    async fn find_pending_duplicate(
        &self,
        sender_id: i64,
        recipient_id: i64,
        message: &str,
    ) -> Result<Option<FriendshipRequest>, AppError> {
        Ok(self
            .requests
            .lock()
            .values()
            .find(|r| {
                r.status == FriendshipStatus::Pending
                    && r.duplicates(sender_id, recipient_id, message)
            })
            .cloned())
    }

    async fn find_pending_for_user(
        &self,
        user_id: i64,
    ) -> Result<Vec<FriendshipRequest>, AppError> {
        Ok(self
            .requests
            .lock()
            .values()
            .filter(|r| r.status == FriendshipStatus::Pending && r.involves(user_id))
            .cloned()
            .collect())
    }

    async fn are_friends(&self, user_a: i64, user_b: i64) -> Result<bool, AppError> {
        Ok(self.requests.lock().values().any(|r| {
            r.status == FriendshipStatus::Accepted
                && ((r.sender_id == user_a && r.recipient_id == user_b)
                    || (r.sender_id == user_b && r.recipient_id == user_a))
        }))
    }

    async fn list(&self, page: PageRequest) -> Result<Vec<FriendshipRequest>, AppError> {
        Ok(page_of(&self.requests.lock(), page))
    }

    async fn count(&self) -> Result<u64, AppError> {
        Ok(self.requests.lock().len() as u64)
    }

    async fn create(&self, request: &FriendshipRequest) -> Result<FriendshipRequest, AppError> {
        let mut requests = self.requests.lock();
        let message = request.message.as_deref().unwrap_or_default();
        if request.status == FriendshipStatus::Pending
            && requests.values().any(|r| {
                r.status == FriendshipStatus::Pending
                    && r.duplicates(request.sender_id, request.recipient_id, message)
            })
        {
            return Err(AppError::Conflict("uq_friendship_requests_pending".into()));
        }
        requests.insert(request.id, request.clone());
        Ok(request.clone())
    }

    async fn update_pending_status(
        &self,
        id: i64,
        status: FriendshipStatus,
    ) -> Result<Option<FriendshipRequest>, AppError> {
        let mut requests = self.requests.lock();
        Ok(requests
            .get_mut(&id)
            .filter(|r| r.status == FriendshipStatus::Pending)
            .map(|r| {
                r.status = status;
                r.updated_at = chrono::Utc::now();
                r.clone()
            }))
    }

    async fn clear(&self) -> Result<u64, AppError> {
        Ok(clear_map(&self.requests))
    }
}

/// Concrete handles on the in-memory stores, for assertions that look
/// behind the HTTP surface.
#[derive(Clone, Default)]
pub struct Stores {
    pub users: Arc<InMemoryUserRepository>,
    pub posts: Arc<InMemoryPostRepository>,
    pub groups: Arc<InMemoryGroupRepository>,
    pub friendships: Arc<InMemoryFriendshipRepository>,
}

impl Stores {
    pub fn repositories(&self) -> Repositories {
        Repositories {
            users: self.users.clone(),
            posts: self.posts.clone(),
            groups: self.groups.clone(),
            friendships: self.friendships.clone(),
        }
    }
}

pub fn test_settings() -> Settings {
    Settings {
        server: ServerSettings {
            host: "127.0.0.1".into(),
            port: 0,
        },
        database: DatabaseSettings {
            url: "postgres://localhost/social_test".into(),
            max_connections: 1,
            min_connections: 1,
            acquire_timeout: 1,
            run_migrations: false,
        },
        jwt: JwtSettings {
            secret: "integration-test-secret-that-is-long-enough".into(),
            token_expiry_minutes: 60,
        },
        auth: AuthSettings {
            admin_email: ADMIN_EMAIL.into(),
        },
        snowflake: SnowflakeSettings { machine_id: 1 },
        cors: CorsSettings {
            allowed_origins: vec![],
        },
        static_files: StaticFileSettings {
            dir: "public".into(),
        },
        environment: "test".into(),
    }
}

/// Status plus the body, parsed as JSON when possible.
pub struct TestResponse {
    pub status: StatusCode,
    pub text: String,
    pub json: Value,
}

/// Test application driving the real router in-process
pub struct TestApp {
    pub router: Router,
    pub stores: Stores,
}

impl TestApp {
    pub fn new() -> Self {
        let stores = Stores::default();
        let state = AppState::new(stores.repositories(), test_settings());

        Self {
            router: build_router(state),
            stores,
        }
    }

    pub async fn request(
        &self,
        method: Method,
        uri: &str,
        body: Option<Value>,
        token: Option<&str>,
    ) -> TestResponse {
        let mut builder = Request::builder().method(method).uri(uri);
        if let Some(token) = token {
            builder = builder.header(header::AUTHORIZATION, format!("Bearer {}", token));
        }
        let request = match body {
            Some(body) => builder
                .header(header::CONTENT_TYPE, "application/json")
                .body(Body::from(body.to_string())),
            None => builder.body(Body::empty()),
        }
        .unwrap();

        let response = self.router.clone().oneshot(request).await.unwrap();
        let status = response.status();
        let bytes = to_bytes(response.into_body(), usize::MAX).await.unwrap();
        let text = String::from_utf8_lossy(&bytes).into_owned();
        let json = serde_json::from_str(&text).unwrap_or(Value::Null);

        TestResponse { status, text, json }
    }

    pub async fn get(&self, uri: &str) -> TestResponse {
        self.request(Method::GET, uri, None, None).await
    }

    pub async fn get_auth(&self, uri: &str, token: &str) -> TestResponse {
        self.request(Method::GET, uri, None, Some(token)).await
    }

    pub async fn post_json(&self, uri: &str, body: Value) -> TestResponse {
        self.request(Method::POST, uri, Some(body), None).await
    }

    pub async fn post_json_auth(&self, uri: &str, body: Value, token: &str) -> TestResponse {
        self.request(Method::POST, uri, Some(body), Some(token)).await
    }

    pub async fn put_json(&self, uri: &str, body: Value) -> TestResponse {
        self.request(Method::PUT, uri, Some(body), None).await
    }

    pub async fn put_json_auth(&self, uri: &str, body: Value, token: &str) -> TestResponse {
        self.request(Method::PUT, uri, Some(body), Some(token)).await
    }

    pub async fn delete(&self, uri: &str) -> TestResponse {
        self.request(Method::DELETE, uri, None, None).await
    }

    pub async fn delete_auth(&self, uri: &str, token: &str) -> TestResponse {
        self.request(Method::DELETE, uri, None, Some(token)).await
    }

    /// Register a user and return their id.
    pub async fn register(&self, email: &str, first_name: &str) -> String {
        let response = self.post_json("/user", user_body(email, first_name)).await;
        assert_eq!(response.status, StatusCode::CREATED, "{}", response.text);
        response.json["id"].as_str().unwrap().to_string()
    }

    pub async fn login(&self, email: &str, password: &str) -> TestResponse {
        self.post_json("/user/login", json!({ "email": email, "password": password }))
            .await
    }

    /// Register and log in; returns (id, token).
    pub async fn signed_up(&self, email: &str, first_name: &str) -> (String, String) {
        let id = self.register(email, first_name).await;
        let response = self.login(email, PASSWORD).await;
        assert_eq!(response.status, StatusCode::OK, "{}", response.text);
        (id, response.json["token"].as_str().unwrap().to_string())
    }

    pub async fn create_post(&self, user_id: &str, text: &str) -> String {
        let response = self
            .post_json("/post", json!({ "text": text, "user": user_id }))
            .await;
        assert_eq!(response.status, StatusCode::CREATED, "{}", response.text);
        response.json["id"].as_str().unwrap().to_string()
    }
}

pub fn user_body(email: &str, first_name: &str) -> Value {
    json!({
        "email": email,
        "password": PASSWORD,
        "firstName": first_name,
        "lastName": "Tester",
        "birthdayDate": "1990-05-17",
        "gender": "custom"
    })
}

/// A random address, prefixed with a counter so that one test never
/// draws the same address twice.
pub fn fake_email() -> String {
    use std::sync::atomic::{AtomicUsize, Ordering};

    use fake::{faker::internet::en::SafeEmail, Fake};

    static NEXT: AtomicUsize = AtomicUsize::new(0);
    let email: String = SafeEmail().fake();
    format!("u{}.{}", NEXT.fetch_add(1, Ordering::Relaxed), email)
}
