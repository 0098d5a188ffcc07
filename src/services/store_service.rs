//! Store service - store management and the rating upsert.

use async_trait::async_trait;
use std::sync::Arc;
use uuid::Uuid;

use crate::domain::{is_valid_rating, Store, StoreWithRating};
use crate::errors::{AppError, AppResult};
use crate::infra::{RatingRepository, StoreRepository};

/// Store service trait for dependency injection.
#[async_trait]
pub trait StoreService: Send + Sync {
    /// List all stores with their rating aggregates
    async fn list_stores(&self) -> AppResult<Vec<StoreWithRating>>;

    /// Get one store with aggregates.
    ///
    /// When `viewer` is an authenticated user, the second element is that
    /// user's own rating for the store (None if they have not rated it).
    async fn get_store(
        &self,
        id: Uuid,
        viewer: Option<Uuid>,
    ) -> AppResult<(StoreWithRating, Option<i32>)>;

    /// Create a store owned by the calling user
    async fn create_store(
        &self,
        name: String,
        email: String,
        address: String,
        owner_id: Uuid,
    ) -> AppResult<Store>;

    /// Update a store. Callers who are neither the owner nor an admin get
    /// NotFound, indistinguishable from a missing store.
    async fn update_store(
        &self,
        id: Uuid,
        caller_id: Uuid,
        is_admin: bool,
        name: String,
        email: String,
        address: String,
    ) -> AppResult<Store>;

    /// Delete a store, with the same merged ownership check as update
    async fn delete_store(&self, id: Uuid, caller_id: Uuid, is_admin: bool) -> AppResult<()>;

    /// Submit or replace the caller's rating for a store
    async fn submit_rating(&self, store_id: Uuid, user_id: Uuid, value: i32) -> AppResult<()>;
}

/// Concrete implementation of StoreService.
pub struct StoreManager {
    stores: Arc<dyn StoreRepository>,
    ratings: Arc<dyn RatingRepository>,
}

impl StoreManager {
    /// Create new store service instance
    pub fn new(stores: Arc<dyn StoreRepository>, ratings: Arc<dyn RatingRepository>) -> Self {
        Self { stores, ratings }
    }

    /// Fetch the store and apply the merged owner-or-admin check.
    async fn find_owned(&self, id: Uuid, caller_id: Uuid, is_admin: bool) -> AppResult<Store> {
        let store = self.stores.find_by_id(id).await?.ok_or(AppError::NotFound)?;

        // Existence is deliberately not leaked to non-owners
        if store.owner_id != caller_id && !is_admin {
            return Err(AppError::NotFound);
        }

        Ok(store)
    }
}

#[async_trait]
impl StoreService for StoreManager {
    async fn list_stores(&self) -> AppResult<Vec<StoreWithRating>> {
        self.stores.list_with_ratings().await
    }

    async fn get_store(
        &self,
        id: Uuid,
        viewer: Option<Uuid>,
    ) -> AppResult<(StoreWithRating, Option<i32>)> {
        let store = self
            .stores
            .find_with_ratings(id)
            .await?
            .ok_or(AppError::NotFound)?;

        let viewer_rating = match viewer {
            Some(user_id) => self
                .ratings
                .find(user_id, id)
                .await?
                .map(|rating| rating.rating),
            None => None,
        };

        Ok((store, viewer_rating))
    }

    async fn create_store(
        &self,
        name: String,
        email: String,
        address: String,
        owner_id: Uuid,
    ) -> AppResult<Store> {
        // Friendly pre-check; the unique index on stores.email is the backstop
        if self.stores.find_by_email(&email).await?.is_some() {
            return Err(AppError::duplicate_email("Store"));
        }

        self.stores.create(name, email, address, owner_id).await
    }

    async fn update_store(
        &self,
        id: Uuid,
        caller_id: Uuid,
        is_admin: bool,
        name: String,
        email: String,
        address: String,
    ) -> AppResult<Store> {
        self.find_owned(id, caller_id, is_admin).await?;
        self.stores.update(id, name, email, address).await
    }

    async fn delete_store(&self, id: Uuid, caller_id: Uuid, is_admin: bool) -> AppResult<()> {
        self.find_owned(id, caller_id, is_admin).await?;
        self.stores.delete(id).await
    }

    async fn submit_rating(&self, store_id: Uuid, user_id: Uuid, value: i32) -> AppResult<()> {
        if !is_valid_rating(value) {
            return Err(AppError::validation("Rating must be between 1 and 5"));
        }

        // A rating for a nonexistent store is a 404, not a validation error
        if self.stores.find_by_id(store_id).await?.is_none() {
            return Err(AppError::NotFound);
        }

        // Upsert: at most one row per (user, store); resubmission overwrites
        match self.ratings.find(user_id, store_id).await? {
            Some(_) => {
                self.ratings.update_value(user_id, store_id, value).await?;
            }
            None => {
                self.ratings.insert(user_id, store_id, value).await?;
            }
        }

        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Utc;

    use crate::domain::Rating;
    use crate::infra::{MockRatingRepository, MockStoreRepository};

    fn sample_store(owner_id: Uuid) -> Store {
        Store {
            id: Uuid::new_v4(),
            name: "Corner Books".to_string(),
            email: "contact@cornerbooks.example".to_string(),
            address: "5 High Street".to_string(),
            owner_id,
            created_at: Utc::now(),
            updated_at: Utc::now(),
        }
    }

    fn sample_rating(user_id: Uuid, store_id: Uuid, value: i32) -> Rating {
        Rating {
            user_id,
            store_id,
            rating: value,
            created_at: Utc::now(),
            updated_at: Utc::now(),
        }
    }

    fn sample_aggregate(store: &Store, average: f64, total: i64) -> StoreWithRating {
        StoreWithRating {
            id: store.id,
            name: store.name.clone(),
            email: store.email.clone(),
            address: store.address.clone(),
            owner_id: store.owner_id,
            created_at: store.created_at,
            average_rating: average,
            total_ratings: total,
        }
    }

    fn manager(
        stores: MockStoreRepository,
        ratings: MockRatingRepository,
    ) -> StoreManager {
        StoreManager::new(Arc::new(stores), Arc::new(ratings))
    }

    #[tokio::test]
    async fn submit_rating_inserts_when_absent() {
        let owner = Uuid::new_v4();
        let user = Uuid::new_v4();
        let store = sample_store(owner);
        let store_id = store.id;

        let mut stores = MockStoreRepository::new();
        stores
            .expect_find_by_id()
            .returning(move |_| Ok(Some(store.clone())));

        let mut ratings = MockRatingRepository::new();
        ratings.expect_find().returning(|_, _| Ok(None));
        ratings
            .expect_insert()
            .times(1)
            .returning(|user_id, store_id, value| Ok(sample_rating(user_id, store_id, value)));
        ratings.expect_update_value().never();

        let service = manager(stores, ratings);
        assert!(service.submit_rating(store_id, user, 4).await.is_ok());
    }

    #[tokio::test]
    async fn submit_rating_overwrites_when_present() {
        let user = Uuid::new_v4();
        let store = sample_store(Uuid::new_v4());
        let store_id = store.id;

        let mut stores = MockStoreRepository::new();
        stores
            .expect_find_by_id()
            .returning(move |_| Ok(Some(store.clone())));

        let mut ratings = MockRatingRepository::new();
        ratings
            .expect_find()
            .returning(move |user_id, store_id| Ok(Some(sample_rating(user_id, store_id, 2))));
        ratings
            .expect_update_value()
            .withf(|_, _, value| *value == 5)
            .times(1)
            .returning(|user_id, store_id, value| Ok(sample_rating(user_id, store_id, value)));
        ratings.expect_insert().never();

        let service = manager(stores, ratings);
        assert!(service.submit_rating(store_id, user, 5).await.is_ok());
    }

    #[tokio::test]
    async fn submit_rating_for_missing_store_is_not_found() {
        let mut stores = MockStoreRepository::new();
        stores.expect_find_by_id().returning(|_| Ok(None));

        let ratings = MockRatingRepository::new();

        let service = manager(stores, ratings);
        let result = service
            .submit_rating(Uuid::new_v4(), Uuid::new_v4(), 3)
            .await;
        assert!(matches!(result.unwrap_err(), AppError::NotFound));
    }

    #[tokio::test]
    async fn submit_rating_rejects_out_of_range_values() {
        let stores = MockStoreRepository::new();
        let ratings = MockRatingRepository::new();
        let service = manager(stores, ratings);

        for value in [0, 6, -1] {
            let result = service
                .submit_rating(Uuid::new_v4(), Uuid::new_v4(), value)
                .await;
            assert!(matches!(result.unwrap_err(), AppError::Validation(_)));
        }
    }

    #[tokio::test]
    async fn update_by_non_owner_is_indistinguishable_from_missing() {
        let owner = Uuid::new_v4();
        let stranger = Uuid::new_v4();
        let store = sample_store(owner);
        let store_id = store.id;

        let mut stores = MockStoreRepository::new();
        stores
            .expect_find_by_id()
            .returning(move |_| Ok(Some(store.clone())));
        stores.expect_update().never();

        let service = manager(stores, MockRatingRepository::new());
        let result = service
            .update_store(
                store_id,
                stranger,
                false,
                "New Name".to_string(),
                "new@example.com".to_string(),
                "New Address".to_string(),
            )
            .await;

        assert!(matches!(result.unwrap_err(), AppError::NotFound));
    }

    #[tokio::test]
    async fn update_by_owner_succeeds() {
        let owner = Uuid::new_v4();
        let store = sample_store(owner);
        let store_id = store.id;
        let updated = store.clone();

        let mut stores = MockStoreRepository::new();
        stores
            .expect_find_by_id()
            .returning(move |_| Ok(Some(store.clone())));
        stores
            .expect_update()
            .times(1)
            .returning(move |_, _, _, _| Ok(updated.clone()));

        let service = manager(stores, MockRatingRepository::new());
        let result = service
            .update_store(
                store_id,
                owner,
                false,
                "New Name".to_string(),
                "new@example.com".to_string(),
                "New Address".to_string(),
            )
            .await;

        assert!(result.is_ok());
    }

    #[tokio::test]
    async fn admin_may_update_any_store() {
        let store = sample_store(Uuid::new_v4());
        let store_id = store.id;
        let updated = store.clone();

        let mut stores = MockStoreRepository::new();
        stores
            .expect_find_by_id()
            .returning(move |_| Ok(Some(store.clone())));
        stores
            .expect_update()
            .times(1)
            .returning(move |_, _, _, _| Ok(updated.clone()));

        let service = manager(stores, MockRatingRepository::new());
        let result = service
            .update_store(
                store_id,
                Uuid::new_v4(),
                true,
                "New Name".to_string(),
                "new@example.com".to_string(),
                "New Address".to_string(),
            )
            .await;

        assert!(result.is_ok());
    }

    #[tokio::test]
    async fn delete_by_non_owner_is_indistinguishable_from_missing() {
        let store = sample_store(Uuid::new_v4());
        let store_id = store.id;

        let mut stores = MockStoreRepository::new();
        stores
            .expect_find_by_id()
            .returning(move |_| Ok(Some(store.clone())));
        stores.expect_delete().never();

        let service = manager(stores, MockRatingRepository::new());
        let result = service.delete_store(store_id, Uuid::new_v4(), false).await;

        assert!(matches!(result.unwrap_err(), AppError::NotFound));
    }

    #[tokio::test]
    async fn create_with_existing_email_is_rejected_before_insert() {
        let existing = sample_store(Uuid::new_v4());

        let mut stores = MockStoreRepository::new();
        stores
            .expect_find_by_email()
            .returning(move |_| Ok(Some(existing.clone())));
        stores.expect_create().never();

        let service = manager(stores, MockRatingRepository::new());
        let result = service
            .create_store(
                "Corner Books".to_string(),
                "contact@cornerbooks.example".to_string(),
                "5 High Street".to_string(),
                Uuid::new_v4(),
            )
            .await;

        assert!(matches!(result.unwrap_err(), AppError::DuplicateEmail(_)));
    }

    #[tokio::test]
    async fn get_store_reports_viewer_rating() {
        let viewer = Uuid::new_v4();
        let store = sample_store(Uuid::new_v4());
        let store_id = store.id;
        let aggregate = sample_aggregate(&store, 4.0, 1);

        let mut stores = MockStoreRepository::new();
        stores
            .expect_find_with_ratings()
            .returning(move |_| Ok(Some(aggregate.clone())));

        let mut ratings = MockRatingRepository::new();
        ratings
            .expect_find()
            .returning(move |user_id, store_id| Ok(Some(sample_rating(user_id, store_id, 4))));

        let service = manager(stores, ratings);
        let (found, viewer_rating) = service.get_store(store_id, Some(viewer)).await.unwrap();

        assert_eq!(found.average_rating, 4.0);
        assert_eq!(found.total_ratings, 1);
        assert_eq!(viewer_rating, Some(4));
    }

    #[tokio::test]
    async fn get_store_anonymous_skips_rating_lookup() {
        let store = sample_store(Uuid::new_v4());
        let store_id = store.id;
        let aggregate = sample_aggregate(&store, 0.0, 0);

        let mut stores = MockStoreRepository::new();
        stores
            .expect_find_with_ratings()
            .returning(move |_| Ok(Some(aggregate.clone())));

        let mut ratings = MockRatingRepository::new();
        ratings.expect_find().never();

        let service = manager(stores, ratings);
        let (found, viewer_rating) = service.get_store(store_id, None).await.unwrap();

        assert_eq!(found.average_rating, 0.0);
        assert_eq!(found.total_ratings, 0);
        assert_eq!(viewer_rating, None);
    }
}
