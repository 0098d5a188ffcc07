//! Store repository - persistence for store records plus the
//! rating-aggregation query.

use async_trait::async_trait;
use chrono::Utc;
use sea_orm::{
    ActiveModelTrait, ColumnTrait, DatabaseConnection, EntityTrait, FromQueryResult,
    PaginatorTrait, QueryFilter, QuerySelect, Set,
};
use uuid::Uuid;

#[cfg(any(test, feature = "test-utils"))]
use mockall::automock;

use super::entities::{
    rating,
    store::{self, Entity as StoreEntity},
};
use super::unique_violation_to;
use crate::domain::{Store, StoreWithRating};
use crate::errors::{AppError, AppResult};

/// Store repository trait for dependency injection.
#[cfg_attr(any(test, feature = "test-utils"), automock)]
#[async_trait]
pub trait StoreRepository: Send + Sync {
    /// Find store by ID, without aggregates
    async fn find_by_id(&self, id: Uuid) -> AppResult<Option<Store>>;

    /// Find store by email
    async fn find_by_email(&self, email: &str) -> AppResult<Option<Store>>;

    /// Find store by ID with rating aggregates
    async fn find_with_ratings(&self, id: Uuid) -> AppResult<Option<StoreWithRating>>;

    /// List all stores with rating aggregates
    async fn list_with_ratings(&self) -> AppResult<Vec<StoreWithRating>>;

    /// List stores owned by a user, with rating aggregates
    async fn list_by_owner(&self, owner_id: Uuid) -> AppResult<Vec<StoreWithRating>>;

    /// Insert a new store owned by `owner_id`
    async fn create(
        &self,
        name: String,
        email: String,
        address: String,
        owner_id: Uuid,
    ) -> AppResult<Store>;

    /// Full-field replace of a store's mutable attributes
    async fn update(
        &self,
        id: Uuid,
        name: String,
        email: String,
        address: String,
    ) -> AppResult<Store>;

    /// Delete store by ID
    async fn delete(&self, id: Uuid) -> AppResult<()>;

    /// Count all stores
    async fn count_all(&self) -> AppResult<u64>;
}

/// Aggregation row shape produced by the LEFT JOIN query.
///
/// `rating_sum` is NULL for stores with no ratings; `total_ratings` counts
/// joined rating rows, so it is 0 in that case.
#[derive(Debug, FromQueryResult)]
struct StoreAggregateRow {
    id: Uuid,
    name: String,
    email: String,
    address: String,
    owner_id: Uuid,
    created_at: chrono::DateTime<Utc>,
    rating_sum: Option<i64>,
    total_ratings: i64,
}

impl From<StoreAggregateRow> for StoreWithRating {
    fn from(row: StoreAggregateRow) -> Self {
        let average_rating = if row.total_ratings > 0 {
            row.rating_sum.unwrap_or(0) as f64 / row.total_ratings as f64
        } else {
            0.0
        };

        StoreWithRating {
            id: row.id,
            name: row.name,
            email: row.email,
            address: row.address,
            owner_id: row.owner_id,
            created_at: row.created_at,
            average_rating,
            total_ratings: row.total_ratings,
        }
    }
}

/// SeaORM-backed store repository.
pub struct StoreRegistry {
    db: DatabaseConnection,
}

impl StoreRegistry {
    pub fn new(db: DatabaseConnection) -> Self {
        Self { db }
    }

    /// Base SELECT for stores joined with their ratings.
    ///
    /// Grouping by the primary key is enough for Postgres; the remaining
    /// store columns are functionally dependent on it.
    fn aggregate_query() -> sea_orm::Select<StoreEntity> {
        StoreEntity::find()
            .select_only()
            .column(store::Column::Id)
            .column(store::Column::Name)
            .column(store::Column::Email)
            .column(store::Column::Address)
            .column(store::Column::OwnerId)
            .column(store::Column::CreatedAt)
            .column_as(rating::Column::Rating.sum(), "rating_sum")
            .column_as(rating::Column::Rating.count(), "total_ratings")
            .left_join(rating::Entity)
            .group_by(store::Column::Id)
    }
}

#[async_trait]
impl StoreRepository for StoreRegistry {
    async fn find_by_id(&self, id: Uuid) -> AppResult<Option<Store>> {
        Ok(StoreEntity::find_by_id(id)
            .one(&self.db)
            .await?
            .map(Store::from))
    }

    async fn find_by_email(&self, email: &str) -> AppResult<Option<Store>> {
        Ok(StoreEntity::find()
            .filter(store::Column::Email.eq(email))
            .one(&self.db)
            .await?
            .map(Store::from))
    }

    async fn find_with_ratings(&self, id: Uuid) -> AppResult<Option<StoreWithRating>> {
        Ok(Self::aggregate_query()
            .filter(store::Column::Id.eq(id))
            .into_model::<StoreAggregateRow>()
            .one(&self.db)
            .await?
            .map(StoreWithRating::from))
    }

    async fn list_with_ratings(&self) -> AppResult<Vec<StoreWithRating>> {
        Ok(Self::aggregate_query()
            .into_model::<StoreAggregateRow>()
            .all(&self.db)
            .await?
            .into_iter()
            .map(StoreWithRating::from)
            .collect())
    }

    async fn list_by_owner(&self, owner_id: Uuid) -> AppResult<Vec<StoreWithRating>> {
        Ok(Self::aggregate_query()
            .filter(store::Column::OwnerId.eq(owner_id))
            .into_model::<StoreAggregateRow>()
            .all(&self.db)
            .await?
            .into_iter()
            .map(StoreWithRating::from)
            .collect())
    }

    async fn create(
        &self,
        name: String,
        email: String,
        address: String,
        owner_id: Uuid,
    ) -> AppResult<Store> {
        let now = Utc::now();
        let active_model = store::ActiveModel {
            id: Set(Uuid::new_v4()),
            name: Set(name),
            email: Set(email),
            address: Set(address),
            owner_id: Set(owner_id),
            created_at: Set(now),
            updated_at: Set(now),
        };

        let model = active_model
            .insert(&self.db)
            .await
            .map_err(|e| unique_violation_to(e, AppError::duplicate_email("Store")))?;

        Ok(Store::from(model))
    }

    async fn update(
        &self,
        id: Uuid,
        name: String,
        email: String,
        address: String,
    ) -> AppResult<Store> {
        let model = StoreEntity::find_by_id(id)
            .one(&self.db)
            .await?
            .ok_or(AppError::NotFound)?;

        let mut active: store::ActiveModel = model.into();
        active.name = Set(name);
        active.email = Set(email);
        active.address = Set(address);
        active.updated_at = Set(Utc::now());

        let model = active
            .update(&self.db)
            .await
            .map_err(|e| unique_violation_to(e, AppError::duplicate_email("Store")))?;

        Ok(Store::from(model))
    }

    async fn delete(&self, id: Uuid) -> AppResult<()> {
        let result = StoreEntity::delete_by_id(id).exec(&self.db).await?;

        if result.rows_affected == 0 {
            return Err(AppError::NotFound);
        }

        Ok(())
    }

    async fn count_all(&self) -> AppResult<u64> {
        StoreEntity::find()
            .count(&self.db)
            .await
            .map_err(Into::into)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn row(rating_sum: Option<i64>, total_ratings: i64) -> StoreAggregateRow {
        StoreAggregateRow {
            id: Uuid::new_v4(),
            name: "Corner Books".to_string(),
            email: "contact@cornerbooks.example".to_string(),
            address: "5 High Street".to_string(),
            owner_id: Uuid::new_v4(),
            created_at: Utc::now(),
            rating_sum,
            total_ratings,
        }
    }

    #[test]
    fn unrated_store_aggregates_to_zero() {
        let aggregate = StoreWithRating::from(row(None, 0));
        assert_eq!(aggregate.average_rating, 0.0);
        assert_eq!(aggregate.total_ratings, 0);
    }

    #[test]
    fn average_is_the_arithmetic_mean() {
        // Ratings 5, 4, 3, 2 -> mean 3.5
        let aggregate = StoreWithRating::from(row(Some(14), 4));
        assert!((aggregate.average_rating - 3.5).abs() < f64::EPSILON);
        assert_eq!(aggregate.total_ratings, 4);

        // A single rating is its own average
        let aggregate = StoreWithRating::from(row(Some(4), 1));
        assert!((aggregate.average_rating - 4.0).abs() < f64::EPSILON);
    }
}
