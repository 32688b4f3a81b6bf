use argon2::{
    Argon2,
    password_hash::{PasswordHasher, SaltString, rand_core::OsRng},
};
use std::sync::Arc;
use validator::Validate;

use crate::error::{UserError, UserResult};
use crate::models::{
    CreateUser, MessageResponse, NewUser, UpdateUser, User, UserChanges, UserCreated, UserFilter,
    UserLookup, UserResponse, normalize_email,
};
use crate::notifier::VerificationSender;
use crate::repository::UserRepository;

/// Service layer for User business logic
pub struct UserService<R: UserRepository> {
    repository: Arc<R>,
    sender: Arc<dyn VerificationSender>,
}

impl<R: UserRepository> Clone for UserService<R> {
    fn clone(&self) -> Self {
        Self {
            repository: Arc::clone(&self.repository),
            sender: Arc::clone(&self.sender),
        }
    }
}

impl<R: UserRepository> UserService<R> {
    pub fn new(repository: R, sender: Arc<dyn VerificationSender>) -> Self {
        Self {
            repository: Arc::new(repository),
            sender,
        }
    }

    /// Create a user and request its verification email.
    ///
    /// Only `Validation` and `Conflict` reach the caller as such; every other
    /// failure is logged and reported as `Unknown`. A failed verification
    /// send is logged and does not undo the creation.
    pub async fn create_user(&self, input: CreateUser) -> UserResult<UserCreated> {
        let user = match self.try_create(input).await {
            Ok(user) => user,
            Err(e @ (UserError::Validation(_) | UserError::Conflict(_))) => return Err(e),
            Err(e) => {
                tracing::error!(error = %e, "Failed to create user");
                return Err(UserError::Unknown);
            }
        };

        tracing::info!(user_id = user.id, "Created user");

        if let Err(e) = self.sender.send_verification(&user).await {
            tracing::warn!(user_id = user.id, error = %e, "Verification email not sent");
        }

        Ok(UserCreated {
            id: user.id,
            message: "User created successfully".to_string(),
        })
    }

    async fn try_create(&self, mut input: CreateUser) -> UserResult<User> {
        // Validate the canonical form
        input.email = normalize_email(&input.email);
        input.validate()?;

        if self
            .repository
            .find_one(UserFilter::Email(input.email.clone()))
            .await?
            .is_some()
        {
            return Err(UserError::Conflict("email already registered".to_string()));
        }

        let password_hash = hash_password(input.password).await?;

        self.repository
            .create(NewUser {
                email: input.email,
                username: input.username,
                password_hash,
            })
            .await
    }

    /// List all users in id order
    pub async fn list_users(&self) -> UserResult<Vec<UserResponse>> {
        let users = self.repository.list().await?;
        Ok(users.into_iter().map(Into::into).collect())
    }

    /// Get a user by id or username
    pub async fn find_user(&self, identifier: impl Into<UserLookup>) -> UserResult<UserResponse> {
        let lookup = identifier.into();

        let user = self
            .repository
            .find_one(lookup.clone().into())
            .await?
            .ok_or(UserError::NotFound(lookup))?;

        Ok(user.into())
    }

    /// Change a user's username. Email and id never change.
    pub async fn update_user(&self, id: i32, input: UpdateUser) -> UserResult<MessageResponse> {
        input.validate()?;

        if self.repository.find_one(UserFilter::Id(id)).await?.is_none() {
            return Err(UserError::NotFound(UserLookup::Id(id)));
        }

        let changes = UserChanges {
            username: Some(input.username),
        };

        if self.repository.update(id, changes).await? == 0 {
            return Err(UserError::NotFound(UserLookup::Id(id)));
        }

        tracing::info!(user_id = id, "Updated user");
        Ok(MessageResponse::new("User updated successfully"))
    }

    /// Delete a user
    pub async fn delete_user(&self, id: i32) -> UserResult<MessageResponse> {
        if self.repository.delete(id).await? == 0 {
            return Err(UserError::NotFound(UserLookup::Id(id)));
        }

        tracing::info!(user_id = id, "Deleted user");
        Ok(MessageResponse::new("User removed successfully"))
    }
}

// Runs on the blocking pool
async fn hash_password(password: String) -> UserResult<String> {
    tokio::task::spawn_blocking(move || {
        let salt = SaltString::generate(&mut OsRng);

        Argon2::default()
            .hash_password(password.as_bytes(), &salt)
            .map(|hash| hash.to_string())
            .map_err(|e| UserError::PasswordHash(e.to_string()))
    })
    .await
    .map_err(|e| UserError::PasswordHash(e.to_string()))?
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::notifier::MockVerificationSender;
    use crate::repository::MockUserRepository;
    use chrono::Utc;

    fn input(email: &str) -> CreateUser {
        CreateUser {
            email: email.to_string(),
            username: "alice".to_string(),
            password: "secret".to_string(),
        }
    }

    fn stored(id: i32, new_user: NewUser) -> User {
        let now = Utc::now();
        User {
            id,
            email: new_user.email,
            username: new_user.username,
            password_hash: new_user.password_hash,
            created_at: now,
            updated_at: now,
        }
    }

    fn service(repo: MockUserRepository, sender: MockVerificationSender) -> UserService<MockUserRepository> {
        UserService::new(repo, Arc::new(sender))
    }

    #[tokio::test]
    async fn test_create_user_hashes_and_notifies_once() {
        let mut repo = MockUserRepository::new();
        repo.expect_find_one()
            .withf(|f| *f == UserFilter::Email("alice@example.com".into()))
            .returning(|_| Ok(None));
        repo.expect_create()
            .withf(|u| u.email == "alice@example.com" && u.password_hash.starts_with("$argon2"))
            .times(1)
            .returning(|u| Ok(stored(7, u)));

        let mut sender = MockVerificationSender::new();
        sender
            .expect_send_verification()
            .withf(|u| u.id == 7)
            .times(1)
            .returning(|_| Ok(()));

        let created = service(repo, sender)
            .create_user(input(" Alice@Example.com "))
            .await
            .unwrap();

        assert_eq!(created.id, 7);
        assert_eq!(created.message, "User created successfully");
    }

    #[tokio::test]
    async fn test_create_user_survives_sender_failure() {
        let mut repo = MockUserRepository::new();
        repo.expect_find_one().returning(|_| Ok(None));
        repo.expect_create().returning(|u| Ok(stored(1, u)));

        let mut sender = MockVerificationSender::new();
        sender
            .expect_send_verification()
            .times(1)
            .returning(|_| Err(UserError::Notification("smtp down".into())));

        let created = service(repo, sender).create_user(input("a@b.com")).await;
        assert!(created.is_ok());
    }

    #[tokio::test]
    async fn test_create_user_invalid_email_never_touches_collaborators() {
        let mut repo = MockUserRepository::new();
        repo.expect_find_one().never();
        repo.expect_create().never();
        let mut sender = MockVerificationSender::new();
        sender.expect_send_verification().never();

        let result = service(repo, sender).create_user(input("not-an-email")).await;
        assert!(matches!(result, Err(UserError::Validation(_))));
    }

    #[tokio::test]
    async fn test_create_user_existing_email_conflicts() {
        let mut repo = MockUserRepository::new();
        repo.expect_find_one().returning(|_| {
            Ok(Some(stored(
                1,
                NewUser {
                    email: "a@b.com".into(),
                    username: "first".into(),
                    password_hash: "hash".into(),
                },
            )))
        });
        repo.expect_create().never();
        let mut sender = MockVerificationSender::new();
        sender.expect_send_verification().never();

        let result = service(repo, sender).create_user(input("a@b.com")).await;
        assert!(matches!(result, Err(UserError::Conflict(_))));
    }

    #[tokio::test]
    async fn test_create_user_insert_race_is_conflict() {
        let mut repo = MockUserRepository::new();
        repo.expect_find_one().returning(|_| Ok(None));
        repo.expect_create()
            .returning(|_| Err(UserError::Conflict("email already registered".into())));
        let mut sender = MockVerificationSender::new();
        sender.expect_send_verification().never();

        let result = service(repo, sender).create_user(input("a@b.com")).await;
        assert!(matches!(result, Err(UserError::Conflict(_))));
    }

    #[tokio::test]
    async fn test_create_user_store_failure_is_unknown() {
        let mut repo = MockUserRepository::new();
        repo.expect_find_one().returning(|_| Ok(None));
        repo.expect_create().returning(|_| {
            Err(UserError::Database(sea_orm::DbErr::Custom(
                "connection refused".into(),
            )))
        });
        let mut sender = MockVerificationSender::new();
        sender.expect_send_verification().never();

        let result = service(repo, sender).create_user(input("a@b.com")).await;
        assert!(matches!(result, Err(UserError::Unknown)));
    }

    #[tokio::test]
    async fn test_find_user_not_found_names_identifier() {
        let mut repo = MockUserRepository::new();
        repo.expect_find_one()
            .withf(|f| *f == UserFilter::Id(999_999))
            .returning(|_| Ok(None));

        let err = service(repo, MockVerificationSender::new())
            .find_user(999_999)
            .await
            .unwrap_err();

        assert!(matches!(err, UserError::NotFound(UserLookup::Id(999_999))));
        assert!(err.to_string().contains("999999"));
    }

    #[tokio::test]
    async fn test_update_user_rejects_empty_username() {
        let mut repo = MockUserRepository::new();
        repo.expect_find_one().never();
        repo.expect_update().never();

        let result = service(repo, MockVerificationSender::new())
            .update_user(
                1,
                UpdateUser {
                    username: String::new(),
                },
            )
            .await;

        assert!(matches!(result, Err(UserError::Validation(_))));
    }

    #[tokio::test]
    async fn test_update_user_zero_rows_is_not_found() {
        let mut repo = MockUserRepository::new();
        repo.expect_find_one().returning(|_| {
            Ok(Some(stored(
                3,
                NewUser {
                    email: "a@b.com".into(),
                    username: "old".into(),
                    password_hash: "hash".into(),
                },
            )))
        });
        // Deleted between the lookup and the update
        repo.expect_update().returning(|_, _| Ok(0));

        let result = service(repo, MockVerificationSender::new())
            .update_user(
                3,
                UpdateUser {
                    username: "new".into(),
                },
            )
            .await;

        assert!(matches!(result, Err(UserError::NotFound(UserLookup::Id(3)))));
    }

    #[tokio::test]
    async fn test_delete_user_missing_is_not_found() {
        let mut repo = MockUserRepository::new();
        repo.expect_delete().returning(|_| Ok(0));

        let result = service(repo, MockVerificationSender::new())
            .delete_user(5)
            .await;

        assert!(matches!(result, Err(UserError::NotFound(UserLookup::Id(5)))));
    }
}
