//! User service - admin-facing user management and dashboard statistics.

use async_trait::async_trait;
use serde::Serialize;
use std::sync::Arc;
use utoipa::ToSchema;
use uuid::Uuid;

use crate::domain::{Password, StoreWithRating, User, UserRole};
use crate::errors::{AppError, AppResult};
use crate::infra::{RatingRepository, StoreRepository, UserRepository};

/// A user together with their owned stores.
///
/// `stores` is populated only when the user holds the store_owner role.
#[derive(Debug)]
pub struct UserDetail {
    pub user: User,
    pub stores: Option<Vec<StoreWithRating>>,
}

/// Dashboard statistics - six independent counts computed at read time.
#[derive(Debug, Serialize, ToSchema)]
pub struct DashboardStats {
    pub total_users: u64,
    pub total_stores: u64,
    pub total_ratings: u64,
    pub total_admins: u64,
    pub total_store_owners: u64,
    pub total_normal_users: u64,
}

/// User service trait for dependency injection.
#[async_trait]
pub trait UserService: Send + Sync {
    /// Get user by ID
    async fn get_user(&self, id: Uuid) -> AppResult<User>;

    /// Get user by ID, embedding owned stores for store owners
    async fn get_user_detail(&self, id: Uuid) -> AppResult<UserDetail>;

    /// List all users
    async fn list_users(&self) -> AppResult<Vec<User>>;

    /// Create a user with an explicit role (admin operation)
    async fn create_user(
        &self,
        name: String,
        email: String,
        password: String,
        address: Option<String>,
        role: UserRole,
    ) -> AppResult<User>;

    /// Replace a user's name, email, address, and role
    async fn update_user(
        &self,
        id: Uuid,
        name: String,
        email: String,
        address: Option<String>,
        role: UserRole,
    ) -> AppResult<User>;

    /// Delete user by ID
    async fn delete_user(&self, id: Uuid) -> AppResult<()>;

    /// Compute dashboard statistics
    async fn dashboard_stats(&self) -> AppResult<DashboardStats>;
}

/// Concrete implementation of UserService.
pub struct UserManager {
    users: Arc<dyn UserRepository>,
    stores: Arc<dyn StoreRepository>,
    ratings: Arc<dyn RatingRepository>,
}

impl UserManager {
    /// Create new user service instance
    pub fn new(
        users: Arc<dyn UserRepository>,
        stores: Arc<dyn StoreRepository>,
        ratings: Arc<dyn RatingRepository>,
    ) -> Self {
        Self {
            users,
            stores,
            ratings,
        }
    }
}

#[async_trait]
impl UserService for UserManager {
    async fn get_user(&self, id: Uuid) -> AppResult<User> {
        self.users.find_by_id(id).await?.ok_or(AppError::NotFound)
    }

    async fn get_user_detail(&self, id: Uuid) -> AppResult<UserDetail> {
        let user = self.users.find_by_id(id).await?.ok_or(AppError::NotFound)?;

        let stores = if user.role == UserRole::StoreOwner {
            Some(self.stores.list_by_owner(user.id).await?)
        } else {
            None
        };

        Ok(UserDetail { user, stores })
    }

    async fn list_users(&self) -> AppResult<Vec<User>> {
        self.users.list().await
    }

    async fn create_user(
        &self,
        name: String,
        email: String,
        password: String,
        address: Option<String>,
        role: UserRole,
    ) -> AppResult<User> {
        if self.users.find_by_email(&email).await?.is_some() {
            return Err(AppError::duplicate_email("User"));
        }

        let password_hash = Password::new(&password)?.into_string();
        self.users
            .create(name, email, password_hash, address, role)
            .await
    }

    async fn update_user(
        &self,
        id: Uuid,
        name: String,
        email: String,
        address: Option<String>,
        role: UserRole,
    ) -> AppResult<User> {
        self.users.update(id, name, email, address, role).await
    }

    async fn delete_user(&self, id: Uuid) -> AppResult<()> {
        self.users.delete(id).await
    }

    async fn dashboard_stats(&self) -> AppResult<DashboardStats> {
        // Six independent counts; run them concurrently over the pool
        let (
            total_users,
            total_stores,
            total_ratings,
            total_admins,
            total_store_owners,
            total_normal_users,
        ) = tokio::try_join!(
            self.users.count_all(),
            self.stores.count_all(),
            self.ratings.count_all(),
            self.users.count_by_role(UserRole::Admin),
            self.users.count_by_role(UserRole::StoreOwner),
            self.users.count_by_role(UserRole::User),
        )?;

        Ok(DashboardStats {
            total_users,
            total_stores,
            total_ratings,
            total_admins,
            total_store_owners,
            total_normal_users,
        })
    }
}
