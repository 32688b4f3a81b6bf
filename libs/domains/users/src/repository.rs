use async_trait::async_trait;
use chrono::Utc;
use std::collections::BTreeMap;
use std::sync::Arc;
use std::sync::atomic::{AtomicI32, Ordering};
use tokio::sync::RwLock;

use crate::error::{UserError, UserResult};
use crate::models::{NewUser, User, UserChanges, UserFilter};

/// Repository trait for User persistence
///
/// Implementations assign ids, never reuse them, and enforce email
/// uniqueness themselves so concurrent creates cannot both succeed.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait UserRepository: Send + Sync {
    /// First user matching the filter, lowest id wins
    async fn find_one(&self, filter: UserFilter) -> UserResult<Option<User>>;

    /// All users ordered by id
    async fn list(&self) -> UserResult<Vec<User>>;

    /// Insert a user; a taken email is a `Conflict`
    async fn create(&self, input: NewUser) -> UserResult<User>;

    /// Apply changes and return the number of affected rows
    async fn update(&self, id: i32, changes: UserChanges) -> UserResult<u64>;

    /// Delete by id and return the number of affected rows
    async fn delete(&self, id: i32) -> UserResult<u64>;
}

/// In-memory implementation of UserRepository (for development/testing)
#[derive(Debug, Clone)]
pub struct InMemoryUserRepository {
    users: Arc<RwLock<BTreeMap<i32, User>>>,
    next_id: Arc<AtomicI32>,
}

impl InMemoryUserRepository {
    pub fn new() -> Self {
        Self {
            users: Arc::new(RwLock::new(BTreeMap::new())),
            next_id: Arc::new(AtomicI32::new(1)),
        }
    }
}

impl Default for InMemoryUserRepository {
    fn default() -> Self {
        Self::new()
    }
}

fn matches(user: &User, filter: &UserFilter) -> bool {
    match filter {
        UserFilter::Id(id) => user.id == *id,
        UserFilter::Username(username) => user.username == *username,
        UserFilter::Email(email) => user.email.eq_ignore_ascii_case(email),
    }
}

#[async_trait]
impl UserRepository for InMemoryUserRepository {
    async fn find_one(&self, filter: UserFilter) -> UserResult<Option<User>> {
        let users = self.users.read().await;

        let user = match filter {
            UserFilter::Id(id) => users.get(&id).cloned(),
            ref other => users.values().find(|u| matches(u, other)).cloned(),
        };
        Ok(user)
    }

    async fn list(&self) -> UserResult<Vec<User>> {
        let users = self.users.read().await;
        Ok(users.values().cloned().collect())
    }

    async fn create(&self, input: NewUser) -> UserResult<User> {
        let mut users = self.users.write().await;

        let email_exists = users
            .values()
            .any(|u| u.email.eq_ignore_ascii_case(&input.email));

        if email_exists {
            return Err(UserError::Conflict("email already registered".to_string()));
        }

        let now = Utc::now();
        let user = User {
            id: self.next_id.fetch_add(1, Ordering::SeqCst),
            email: input.email,
            username: input.username,
            password_hash: input.password_hash,
            created_at: now,
            updated_at: now,
        };
        users.insert(user.id, user.clone());

        tracing::debug!(user_id = user.id, "Stored user in memory");
        Ok(user)
    }

    async fn update(&self, id: i32, changes: UserChanges) -> UserResult<u64> {
        let mut users = self.users.write().await;

        let Some(user) = users.get_mut(&id) else {
            return Ok(0);
        };

        if let Some(username) = changes.username {
            user.username = username;
        }
        user.updated_at = Utc::now();

        Ok(1)
    }

    async fn delete(&self, id: i32) -> UserResult<u64> {
        let mut users = self.users.write().await;
        Ok(u64::from(users.remove(&id).is_some()))
    }
}
