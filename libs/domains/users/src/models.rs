use chrono::{DateTime, Utc};
use serde::{Deserialize, Deserializer, Serialize};
use std::fmt;
use utoipa::ToSchema;
use validator::Validate;

/// Stored account
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct User {
    /// Assigned by the store, never reused
    pub id: i32,
    /// Trimmed and lowercased; unique
    pub email: String,
    pub username: String,
    /// Argon2 PHC string, never exposed in API responses
    #[serde(skip_serializing)]
    pub password_hash: String,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

/// Insert payload handed to the repository; the store assigns `id` and timestamps
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NewUser {
    pub email: String,
    pub username: String,
    pub password_hash: String,
}

/// Mutable columns. `email` and `id` are fixed once created.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct UserChanges {
    pub username: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
pub struct UserResponse {
    pub id: i32,
    pub email: String,
    pub username: String,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl From<User> for UserResponse {
    fn from(user: User) -> Self {
        Self {
            id: user.id,
            email: user.email,
            username: user.username,
            created_at: user.created_at,
            updated_at: user.updated_at,
        }
    }
}

#[derive(Clone, Deserialize, Validate, ToSchema)]
pub struct CreateUser {
    #[serde(deserialize_with = "trimmed")]
    #[validate(email, length(min = 1, max = 255))]
    #[schema(example = "alice@example.com")]
    pub email: String,
    #[validate(length(min = 1, max = 100))]
    #[schema(example = "alice")]
    pub username: String,
    #[validate(length(min = 1, max = 128))]
    #[schema(format = Password)]
    pub password: String,
}

impl fmt::Debug for CreateUser {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("CreateUser")
            .field("email", &self.email)
            .field("username", &self.username)
            .field("password", &"<redacted>")
            .finish()
    }
}

#[derive(Debug, Clone, Deserialize, Validate, ToSchema)]
pub struct UpdateUser {
    #[validate(length(min = 1, max = 100))]
    #[schema(example = "newname")]
    pub username: String,
}

/// How a caller identifies an account: by id or by username
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum UserLookup {
    Id(i32),
    Username(String),
}

impl UserLookup {
    /// All-digit segments that fit an `i32` are ids, anything else a username
    pub fn from_path_segment(segment: &str) -> Self {
        if !segment.is_empty() && segment.bytes().all(|b| b.is_ascii_digit()) {
            if let Ok(id) = segment.parse() {
                return UserLookup::Id(id);
            }
        }
        UserLookup::Username(segment.to_string())
    }
}

impl fmt::Display for UserLookup {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            UserLookup::Id(id) => write!(f, "{id}"),
            UserLookup::Username(username) => f.write_str(username),
        }
    }
}

impl From<i32> for UserLookup {
    fn from(id: i32) -> Self {
        UserLookup::Id(id)
    }
}

impl From<&str> for UserLookup {
    fn from(username: &str) -> Self {
        UserLookup::Username(username.to_string())
    }
}

impl From<String> for UserLookup {
    fn from(username: String) -> Self {
        UserLookup::Username(username)
    }
}

/// Single-column predicate for [`crate::UserRepository::find_one`]
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum UserFilter {
    Id(i32),
    Username(String),
    /// Expected already normalized, see [`normalize_email`]
    Email(String),
}

impl From<UserLookup> for UserFilter {
    fn from(lookup: UserLookup) -> Self {
        match lookup {
            UserLookup::Id(id) => UserFilter::Id(id),
            UserLookup::Username(username) => UserFilter::Username(username),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
pub struct MessageResponse {
    pub message: String,
}

impl MessageResponse {
    pub fn new(message: impl Into<String>) -> Self {
        Self {
            message: message.into(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
pub struct UserCreated {
    pub id: i32,
    pub message: String,
}

/// Canonical form used for storage and uniqueness checks
pub fn normalize_email(email: &str) -> String {
    email.trim().to_lowercase()
}

fn trimmed<'de, D: Deserializer<'de>>(deserializer: D) -> Result<String, D::Error> {
    String::deserialize(deserializer).map(|s| s.trim().to_string())
}
