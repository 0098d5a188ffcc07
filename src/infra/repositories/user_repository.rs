//! User repository - persistence for user records.

use async_trait::async_trait;
use chrono::Utc;
use sea_orm::{
    ActiveModelTrait, ColumnTrait, DatabaseConnection, EntityTrait, PaginatorTrait, QueryFilter,
    Set,
};
use uuid::Uuid;

#[cfg(any(test, feature = "test-utils"))]
use mockall::automock;

use super::entities::user::{self, Entity as UserEntity};
use super::unique_violation_to;
use crate::domain::{User, UserRole};
use crate::errors::{AppError, AppResult};

/// User repository trait for dependency injection.
#[cfg_attr(any(test, feature = "test-utils"), automock)]
#[async_trait]
pub trait UserRepository: Send + Sync {
    /// Find user by ID
    async fn find_by_id(&self, id: Uuid) -> AppResult<Option<User>>;

    /// Find user by email
    async fn find_by_email(&self, email: &str) -> AppResult<Option<User>>;

    /// List all users, newest first
    async fn list(&self) -> AppResult<Vec<User>>;

    /// Insert a new user; the password must already be hashed
    async fn create(
        &self,
        name: String,
        email: String,
        password_hash: String,
        address: Option<String>,
        role: UserRole,
    ) -> AppResult<User>;

    /// Full-field replace of a user's mutable attributes
    async fn update(
        &self,
        id: Uuid,
        name: String,
        email: String,
        address: Option<String>,
        role: UserRole,
    ) -> AppResult<User>;

    /// Delete user by ID
    async fn delete(&self, id: Uuid) -> AppResult<()>;

    /// Count all users
    async fn count_all(&self) -> AppResult<u64>;

    /// Count users holding a specific role
    async fn count_by_role(&self, role: UserRole) -> AppResult<u64>;
}

/// SeaORM-backed user repository.
pub struct UserStore {
    db: DatabaseConnection,
}

impl UserStore {
    pub fn new(db: DatabaseConnection) -> Self {
        Self { db }
    }
}

#[async_trait]
impl UserRepository for UserStore {
    async fn find_by_id(&self, id: Uuid) -> AppResult<Option<User>> {
        UserEntity::find_by_id(id)
            .one(&self.db)
            .await?
            .map(User::try_from)
            .transpose()
    }

    async fn find_by_email(&self, email: &str) -> AppResult<Option<User>> {
        UserEntity::find()
            .filter(user::Column::Email.eq(email))
            .one(&self.db)
            .await?
            .map(User::try_from)
            .transpose()
    }

    async fn list(&self) -> AppResult<Vec<User>> {
        use sea_orm::QueryOrder;

        UserEntity::find()
            .order_by_desc(user::Column::CreatedAt)
            .all(&self.db)
            .await?
            .into_iter()
            .map(User::try_from)
            .collect()
    }

    async fn create(
        &self,
        name: String,
        email: String,
        password_hash: String,
        address: Option<String>,
        role: UserRole,
    ) -> AppResult<User> {
        let now = Utc::now();
        let active_model = user::ActiveModel {
            id: Set(Uuid::new_v4()),
            name: Set(name),
            email: Set(email),
            password_hash: Set(password_hash),
            address: Set(address),
            role: Set(role.to_string()),
            created_at: Set(now),
            updated_at: Set(now),
        };

        let model = active_model
            .insert(&self.db)
            .await
            .map_err(|e| unique_violation_to(e, AppError::duplicate_email("User")))?;

        User::try_from(model)
    }

    async fn update(
        &self,
        id: Uuid,
        name: String,
        email: String,
        address: Option<String>,
        role: UserRole,
    ) -> AppResult<User> {
        let model = UserEntity::find_by_id(id)
            .one(&self.db)
            .await?
            .ok_or(AppError::NotFound)?;

        let mut active: user::ActiveModel = model.into();
        active.name = Set(name);
        active.email = Set(email);
        active.address = Set(address);
        active.role = Set(role.to_string());
        active.updated_at = Set(Utc::now());

        let model = active
            .update(&self.db)
            .await
            .map_err(|e| unique_violation_to(e, AppError::duplicate_email("User")))?;

        User::try_from(model)
    }

    async fn delete(&self, id: Uuid) -> AppResult<()> {
        let result = UserEntity::delete_by_id(id).exec(&self.db).await?;

        if result.rows_affected == 0 {
            return Err(AppError::NotFound);
        }

        Ok(())
    }

    async fn count_all(&self) -> AppResult<u64> {
        UserEntity::find().count(&self.db).await.map_err(Into::into)
    }

    async fn count_by_role(&self, role: UserRole) -> AppResult<u64> {
        UserEntity::find()
            .filter(user::Column::Role.eq(role.as_str()))
            .count(&self.db)
            .await
            .map_err(Into::into)
    }
}
