//! Request DTOs
//!
//! Data structures for API request bodies and query strings. String fields
//! are trimmed while deserializing, before validation runs.

use chrono::{DateTime, NaiveDate};
use serde::{de, Deserialize, Deserializer};
use validator::Validate;

use crate::application::services::{
    NewFriendshipRequestDto, NewPostDto, NewUserDto, UpdatePostDto, UpdateUserDto,
};
use crate::domain::{Gender, PageRequest};
use crate::shared::error::AppError;
use crate::shared::snowflake::{
    deserialize_id, deserialize_ids, deserialize_optional_id, deserialize_optional_ids,
};
use crate::shared::validation::{
    validate_image_paths, validate_minimum_age, validate_password_strength,
};

fn trimmed<'de, D>(deserializer: D) -> Result<String, D::Error>
where
    D: Deserializer<'de>,
{
    Ok(String::deserialize(deserializer)?.trim().to_string())
}

fn trimmed_option<'de, D>(deserializer: D) -> Result<Option<String>, D::Error>
where
    D: Deserializer<'de>,
{
    Ok(Option::<String>::deserialize(deserializer)?.map(|s| s.trim().to_string()))
}

fn trimmed_list<'de, D>(deserializer: D) -> Result<Vec<String>, D::Error>
where
    D: Deserializer<'de>,
{
    Ok(Vec::<String>::deserialize(deserializer)?
        .into_iter()
        .map(|s| s.trim().to_string())
        .collect())
}

fn trimmed_optional_list<'de, D>(deserializer: D) -> Result<Option<Vec<String>>, D::Error>
where
    D: Deserializer<'de>,
{
    Ok(Option::<Vec<String>>::deserialize(deserializer)?
        .map(|list| list.into_iter().map(|s| s.trim().to_string()).collect()))
}

/// Accepts a calendar date (`1990-05-17`) or a full RFC 3339 timestamp,
/// keeping only the date.
fn parse_birthday(raw: &str) -> Option<NaiveDate> {
    let raw = raw.trim();
    NaiveDate::parse_from_str(raw, "%Y-%m-%d")
        .ok()
        .or_else(|| DateTime::parse_from_rfc3339(raw).ok().map(|dt| dt.date_naive()))
}

fn birthday<'de, D>(deserializer: D) -> Result<NaiveDate, D::Error>
where
    D: Deserializer<'de>,
{
    let raw = String::deserialize(deserializer)?;
    parse_birthday(&raw)
        .ok_or_else(|| de::Error::custom("birthdayDate must be a date such as 1990-05-17"))
}

fn optional_birthday<'de, D>(deserializer: D) -> Result<Option<NaiveDate>, D::Error>
where
    D: Deserializer<'de>,
{
    match Option::<String>::deserialize(deserializer)? {
        Some(raw) => parse_birthday(&raw)
            .map(Some)
            .ok_or_else(|| de::Error::custom("birthdayDate must be a date such as 1990-05-17")),
        None => Ok(None),
    }
}

/// Login request. Missing fields deserialize as empty and fail validation.
#[derive(Debug, Deserialize, Validate)]
pub struct LoginRequest {
    #[serde(default, deserialize_with = "trimmed")]
    #[validate(length(min = 1, message = "Email is required"))]
    pub email: String,

    #[serde(default, deserialize_with = "trimmed")]
    #[validate(length(min = 1, message = "Password is required"))]
    pub password: String,
}

/// Registration request
#[derive(Debug, Deserialize, Validate)]
#[serde(rename_all = "camelCase")]
pub struct CreateUserRequest {
    #[serde(deserialize_with = "trimmed")]
    #[validate(
        email(message = "Invalid email format"),
        length(max = 254, message = "Email must be at most 254 characters")
    )]
    pub email: String,

    #[serde(deserialize_with = "trimmed")]
    #[validate(custom(function = "validate_password_strength"))]
    pub password: String,

    #[serde(deserialize_with = "trimmed")]
    #[validate(length(min = 2, max = 20, message = "First name must be 2-20 characters"))]
    pub first_name: String,

    #[serde(deserialize_with = "trimmed")]
    #[validate(length(min = 2, max = 20, message = "Last name must be 2-20 characters"))]
    pub last_name: String,

    #[serde(deserialize_with = "birthday")]
    #[validate(custom(function = "validate_minimum_age"))]
    pub birthday_date: NaiveDate,

    pub gender: Gender,

    #[serde(default, deserialize_with = "trimmed_option")]
    pub profile_image: Option<String>,
}

impl From<CreateUserRequest> for NewUserDto {
    fn from(req: CreateUserRequest) -> Self {
        Self {
            email: req.email,
            password: req.password,
            first_name: req.first_name,
            last_name: req.last_name,
            birthday_date: req.birthday_date,
            gender: req.gender,
            profile_image: req.profile_image.filter(|p| !p.is_empty()),
        }
    }
}

/// Update user request; absent fields are left unchanged
#[derive(Debug, Default, Deserialize, Validate)]
#[serde(rename_all = "camelCase")]
pub struct UpdateUserRequest {
    #[serde(default, deserialize_with = "trimmed_option")]
    #[validate(
        email(message = "Invalid email format"),
        length(max = 254, message = "Email must be at most 254 characters")
    )]
    pub email: Option<String>,

    #[serde(default, deserialize_with = "trimmed_option")]
    #[validate(custom(function = "validate_password_strength"))]
    pub password: Option<String>,

    #[serde(default, deserialize_with = "trimmed_option")]
    #[validate(length(min = 2, max = 20, message = "First name must be 2-20 characters"))]
    pub first_name: Option<String>,

    #[serde(default, deserialize_with = "trimmed_option")]
    #[validate(length(min = 2, max = 20, message = "Last name must be 2-20 characters"))]
    pub last_name: Option<String>,

    #[serde(default, deserialize_with = "optional_birthday")]
    #[validate(custom(function = "validate_minimum_age"))]
    pub birthday_date: Option<NaiveDate>,

    #[serde(default)]
    pub gender: Option<Gender>,

    #[serde(default, deserialize_with = "trimmed_option")]
    pub profile_image: Option<String>,
}

impl From<UpdateUserRequest> for UpdateUserDto {
    fn from(req: UpdateUserRequest) -> Self {
        Self {
            email: req.email,
            password: req.password,
            first_name: req.first_name,
            last_name: req.last_name,
            birthday_date: req.birthday_date,
            gender: req.gender,
            profile_image: req.profile_image,
        }
    }
}

/// Create post request
#[derive(Debug, Deserialize, Validate)]
pub struct CreatePostRequest {
    #[serde(deserialize_with = "trimmed")]
    #[validate(length(min = 1, max = 450, message = "Text must be 1-450 characters"))]
    pub text: String,

    #[serde(default, deserialize_with = "trimmed_list")]
    #[validate(custom(function = "validate_image_paths"))]
    pub images: Vec<String>,

    /// Owning user id
    #[serde(deserialize_with = "deserialize_id")]
    pub user: i64,

    #[serde(default, deserialize_with = "deserialize_ids")]
    pub likes: Vec<i64>,
}

impl From<CreatePostRequest> for NewPostDto {
    fn from(req: CreatePostRequest) -> Self {
        Self {
            text: req.text,
            images: req.images,
            user_id: req.user,
            likes: req.likes,
        }
    }
}

/// Update post request; supplied fields replace the stored ones
#[derive(Debug, Default, Deserialize, Validate)]
pub struct UpdatePostRequest {
    #[serde(default, deserialize_with = "trimmed_option")]
    #[validate(length(min = 1, max = 450, message = "Text must be 1-450 characters"))]
    pub text: Option<String>,

    #[serde(default, deserialize_with = "trimmed_optional_list")]
    #[validate(custom(function = "validate_image_paths"))]
    pub images: Option<Vec<String>>,

    #[serde(default, deserialize_with = "deserialize_optional_id")]
    pub user: Option<i64>,

    #[serde(default, deserialize_with = "deserialize_optional_ids")]
    pub likes: Option<Vec<i64>>,
}

impl From<UpdatePostRequest> for UpdatePostDto {
    fn from(req: UpdatePostRequest) -> Self {
        Self {
            text: req.text,
            images: req.images,
            user_id: req.user,
            likes: req.likes,
        }
    }
}

/// Send friendship request
#[derive(Debug, Deserialize, Validate)]
pub struct CreateFriendshipRequest {
    #[serde(deserialize_with = "deserialize_id")]
    pub sender: i64,

    #[serde(deserialize_with = "deserialize_id")]
    pub recipient: i64,

    #[serde(default, deserialize_with = "trimmed_option")]
    #[validate(length(max = 450, message = "Message must be at most 450 characters"))]
    pub message: Option<String>,
}

impl From<CreateFriendshipRequest> for NewFriendshipRequestDto {
    fn from(req: CreateFriendshipRequest) -> Self {
        Self {
            sender_id: req.sender,
            recipient_id: req.recipient,
            message: req.message,
        }
    }
}

/// Answer a friendship request. The literal is checked by the handler so
/// that an unknown value is a 400 rather than a body rejection.
#[derive(Debug, Default, Deserialize, Validate)]
pub struct RespondFriendshipRequest {
    #[serde(default)]
    pub status: String,
}

/// `?page=&limit=` query string, kept raw so that bad values can be
/// reported with the API's own message.
#[derive(Debug, Default, Deserialize)]
pub struct PaginationQuery {
    pub page: Option<String>,
    pub limit: Option<String>,
}

impl PaginationQuery {
    pub fn page_request(&self) -> Result<PageRequest, AppError> {
        PageRequest::parse(self.page.as_deref(), self.limit.as_deref())
            .ok_or_else(|| AppError::BadRequest("Params page or limit are not valid".into()))
    }
}

/// `?includePosts=true` on the profile route
#[derive(Debug, Default, Deserialize)]
pub struct ProfileQuery {
    #[serde(rename = "includePosts")]
    pub include_posts: Option<String>,
}

impl ProfileQuery {
    pub fn include_posts(&self) -> bool {
        self.include_posts.as_deref() == Some("true")
    }
}
