use async_trait::async_trait;
use chrono::Utc;
use sea_orm::ActiveValue::{NotSet, Set};
use sea_orm::sea_query::Expr;
use sea_orm::{
    ActiveModelTrait, ColumnTrait, DatabaseConnection, DbErr, EntityTrait, QueryFilter, QueryOrder,
    SqlErr,
};

use crate::{
    entity,
    error::{UserError, UserResult},
    models::{NewUser, User, UserChanges, UserFilter},
    repository::UserRepository,
};

/// Postgres-backed [`UserRepository`]; email uniqueness comes from the
/// `users.email` unique index
#[derive(Clone)]
pub struct PgUserRepository {
    db: DatabaseConnection,
}

impl PgUserRepository {
    pub fn new(db: DatabaseConnection) -> Self {
        Self { db }
    }
}

fn map_insert_error(err: DbErr) -> UserError {
    match err.sql_err() {
        Some(SqlErr::UniqueConstraintViolation(detail)) => {
            tracing::debug!(%detail, "Unique constraint violated on insert");
            UserError::Conflict("email already registered".to_string())
        }
        _ => UserError::Database(err),
    }
}

#[async_trait]
impl UserRepository for PgUserRepository {
    async fn find_one(&self, filter: UserFilter) -> UserResult<Option<User>> {
        let condition = match filter {
            UserFilter::Id(id) => entity::Column::Id.eq(id),
            UserFilter::Username(username) => entity::Column::Username.eq(username),
            UserFilter::Email(email) => entity::Column::Email.eq(email),
        };

        let model = entity::Entity::find()
            .filter(condition)
            .order_by_asc(entity::Column::Id)
            .one(&self.db)
            .await?;

        Ok(model.map(Into::into))
    }

    async fn list(&self) -> UserResult<Vec<User>> {
        let models = entity::Entity::find()
            .order_by_asc(entity::Column::Id)
            .all(&self.db)
            .await?;

        Ok(models.into_iter().map(Into::into).collect())
    }

    async fn create(&self, input: NewUser) -> UserResult<User> {
        let now = Utc::now();
        let active_model = entity::ActiveModel {
            id: NotSet,
            email: Set(input.email),
            username: Set(input.username),
            password_hash: Set(input.password_hash),
            created_at: Set(now.into()),
            updated_at: Set(now.into()),
        };

        let model = active_model
            .insert(&self.db)
            .await
            .map_err(map_insert_error)?;

        tracing::debug!(user_id = model.id, "Inserted user row");
        Ok(model.into())
    }

    async fn update(&self, id: i32, changes: UserChanges) -> UserResult<u64> {
        let now: sea_orm::prelude::DateTimeWithTimeZone = Utc::now().into();
        let mut query =
            entity::Entity::update_many().col_expr(entity::Column::UpdatedAt, Expr::value(now));

        if let Some(username) = changes.username {
            query = query.col_expr(entity::Column::Username, Expr::value(username));
        }

        let result = query
            .filter(entity::Column::Id.eq(id))
            .exec(&self.db)
            .await?;

        Ok(result.rows_affected)
    }

    async fn delete(&self, id: i32) -> UserResult<u64> {
        let result = entity::Entity::delete_by_id(id).exec(&self.db).await?;
        Ok(result.rows_affected)
    }
}
