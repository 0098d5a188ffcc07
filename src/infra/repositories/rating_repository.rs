//! Rating repository - persistence for the (user, store) rating rows.

use async_trait::async_trait;
use chrono::Utc;
use sea_orm::{ActiveModelTrait, DatabaseConnection, EntityTrait, PaginatorTrait, Set};
use uuid::Uuid;

#[cfg(any(test, feature = "test-utils"))]
use mockall::automock;

use super::entities::rating::{self, Entity as RatingEntity};
use super::unique_violation_to;
use crate::domain::Rating;
use crate::errors::{AppError, AppResult};

/// Rating repository trait for dependency injection.
#[cfg_attr(any(test, feature = "test-utils"), automock)]
#[async_trait]
pub trait RatingRepository: Send + Sync {
    /// Find the rating a user has submitted for a store, if any
    async fn find(&self, user_id: Uuid, store_id: Uuid) -> AppResult<Option<Rating>>;

    /// Insert a new rating row.
    ///
    /// A concurrent duplicate submission trips the composite-key constraint
    /// and surfaces as a conflict, not a server error.
    async fn insert(&self, user_id: Uuid, store_id: Uuid, value: i32) -> AppResult<Rating>;

    /// Overwrite the value of an existing rating row
    async fn update_value(&self, user_id: Uuid, store_id: Uuid, value: i32) -> AppResult<Rating>;

    /// Count all rating rows
    async fn count_all(&self) -> AppResult<u64>;
}

/// SeaORM-backed rating repository.
pub struct RatingLedger {
    db: DatabaseConnection,
}

impl RatingLedger {
    pub fn new(db: DatabaseConnection) -> Self {
        Self { db }
    }
}

#[async_trait]
impl RatingRepository for RatingLedger {
    async fn find(&self, user_id: Uuid, store_id: Uuid) -> AppResult<Option<Rating>> {
        Ok(RatingEntity::find_by_id((user_id, store_id))
            .one(&self.db)
            .await?
            .map(Rating::from))
    }

    async fn insert(&self, user_id: Uuid, store_id: Uuid, value: i32) -> AppResult<Rating> {
        let now = Utc::now();
        let active_model = rating::ActiveModel {
            user_id: Set(user_id),
            store_id: Set(store_id),
            rating: Set(value),
            created_at: Set(now),
            updated_at: Set(now),
        };

        let model = active_model
            .insert(&self.db)
            .await
            .map_err(|e| unique_violation_to(e, AppError::conflict("Rating")))?;

        Ok(Rating::from(model))
    }

    async fn update_value(&self, user_id: Uuid, store_id: Uuid, value: i32) -> AppResult<Rating> {
        let model = RatingEntity::find_by_id((user_id, store_id))
            .one(&self.db)
            .await?
            .ok_or(AppError::NotFound)?;

        let mut active: rating::ActiveModel = model.into();
        active.rating = Set(value);
        active.updated_at = Set(Utc::now());

        let model = active.update(&self.db).await?;

        Ok(Rating::from(model))
    }

    async fn count_all(&self) -> AppResult<u64> {
        RatingEntity::find()
            .count(&self.db)
            .await
            .map_err(Into::into)
    }
}
