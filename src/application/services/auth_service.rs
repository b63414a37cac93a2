//! Authentication Service
//!
//! Password hashing, login, and bearer token issuance/verification.

use std::sync::Arc;

use argon2::{
    password_hash::{rand_core::OsRng, PasswordHash, PasswordHasher, PasswordVerifier, SaltString},
    Argon2,
};
use async_trait::async_trait;
use chrono::{Duration, Utc};
use jsonwebtoken::{decode, encode, DecodingKey, EncodingKey, Header, Validation};
use once_cell::sync::Lazy;
use serde::{Deserialize, Serialize};

use crate::config::JwtSettings;
use crate::domain::{User, UserRepository};
use crate::shared::error::AppError;

/// Hash verified when a login names an unknown email, so that both failure
/// paths cost one Argon2 verification.
static DUMMY_HASH: Lazy<Option<String>> =
    Lazy::new(|| hash_password("timing-equalizer-password").ok());

/// Authentication service trait for dependency injection
#[async_trait]
pub trait AuthService: Send + Sync {
    /// Check credentials and issue a bearer token.
    async fn login(&self, email: &str, password: &str) -> Result<String, AuthError>;

    /// Sign a bearer token for `user`.
    fn issue_token(&self, user: &User) -> Result<String, AuthError>;

    /// Validate a bearer token. Any failure yields `None`.
    fn verify_token(&self, token: &str) -> Option<Identity>;
}

/// The caller a valid bearer token speaks for.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Identity {
    pub user_id: i64,
    pub email: String,
}

/// JWT claims structure
#[derive(Debug, Serialize, Deserialize)]
pub struct Claims {
    /// Subject (user ID)
    pub sub: String,
    /// Email at issuance time
    pub email: String,
    /// Expiration time (Unix timestamp)
    pub exp: i64,
    /// Issued at time (Unix timestamp)
    pub iat: i64,
    /// JWT ID
    pub jti: String,
}

/// Authentication errors
#[derive(Debug, thiserror::Error)]
pub enum AuthError {
    #[error("Invalid credentials")]
    InvalidCredentials,

    #[error("Internal error: {0}")]
    Internal(String),
}

impl From<AuthError> for AppError {
    fn from(err: AuthError) -> Self {
        match err {
            AuthError::InvalidCredentials => {
                AppError::Unauthorized("Invalid email or password".into())
            }
            AuthError::Internal(msg) => AppError::Internal(msg),
        }
    }
}

/// Hash a password using Argon2id with a fresh random salt.
pub fn hash_password(password: &str) -> Result<String, AuthError> {
    let salt = SaltString::generate(&mut OsRng);

    Argon2::default()
        .hash_password(password.as_bytes(), &salt)
        .map(|hash| hash.to_string())
        .map_err(|e| AuthError::Internal(format!("Password hashing failed: {}", e)))
}

/// Verify a password against its hash
pub fn verify_password(password: &str, hash: &str) -> Result<bool, AuthError> {
    let parsed_hash = PasswordHash::new(hash)
        .map_err(|e| AuthError::Internal(format!("Invalid password hash: {}", e)))?;

    Ok(Argon2::default()
        .verify_password(password.as_bytes(), &parsed_hash)
        .is_ok())
}

/// AuthService implementation
pub struct AuthServiceImpl<U>
where
    U: UserRepository + ?Sized,
{
    user_repo: Arc<U>,
    jwt_settings: JwtSettings,
}

impl<U> AuthServiceImpl<U>
where
    U: UserRepository + ?Sized,
{
    /// Create a new AuthServiceImpl
    pub fn new(user_repo: Arc<U>, jwt_settings: JwtSettings) -> Self {
        Self {
            user_repo,
            jwt_settings,
        }
    }

    fn decode_token(&self, token: &str) -> Option<Claims> {
        decode::<Claims>(
            token,
            &DecodingKey::from_secret(self.jwt_settings.secret.as_bytes()),
            &Validation::default(),
        )
        .ok()
        .map(|data| data.claims)
    }
}

#[async_trait]
impl<U> AuthService for AuthServiceImpl<U>
where
    U: UserRepository + ?Sized + 'static,
{
    async fn login(&self, email: &str, password: &str) -> Result<String, AuthError> {
        let user = self
            .user_repo
            .find_by_email(email.trim())
            .await
            .map_err(|e| AuthError::Internal(e.to_string()))?;

        let Some(user) = user else {
            if let Some(dummy) = DUMMY_HASH.as_deref() {
                let _ = verify_password(password, dummy);
            }
            tracing::debug!("Login attempt for unknown email");
            return Err(AuthError::InvalidCredentials);
        };

        if !verify_password(password, &user.password_hash)? {
            tracing::debug!(user_id = user.id, "Login attempt with wrong password");
            return Err(AuthError::InvalidCredentials);
        }

        self.issue_token(&user)
    }

    fn issue_token(&self, user: &User) -> Result<String, AuthError> {
        let now = Utc::now();
        let expiry = now + Duration::minutes(self.jwt_settings.token_expiry_minutes);

        let claims = Claims {
            sub: user.id.to_string(),
            email: user.email.clone(),
            exp: expiry.timestamp(),
            iat: now.timestamp(),
            jti: uuid::Uuid::new_v4().to_string(),
        };

        encode(
            &Header::default(),
            &claims,
            &EncodingKey::from_secret(self.jwt_settings.secret.as_bytes()),
        )
        .map_err(|e| AuthError::Internal(format!("Token generation failed: {}", e)))
    }

    fn verify_token(&self, token: &str) -> Option<Identity> {
        let claims = self.decode_token(token)?;
        let user_id = claims.sub.parse().ok()?;

        Some(Identity {
            user_id,
            email: claims.email,
        })
    }
}
