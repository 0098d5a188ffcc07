//! Store domain entity and read models.

use chrono::{DateTime, Utc};
use serde::Serialize;
use utoipa::ToSchema;
use uuid::Uuid;

/// Store domain entity
#[derive(Debug, Clone, Serialize, ToSchema)]
pub struct Store {
    pub id: Uuid,
    pub name: String,
    pub email: String,
    pub address: String,
    /// The user who created the store and is allowed to manage it
    pub owner_id: Uuid,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

/// Store read model with rating aggregates.
///
/// Aggregates are computed fresh on every read (LEFT JOIN over ratings),
/// never stored; a store with no ratings reports average 0.0 and count 0.
#[derive(Debug, Clone, Serialize, ToSchema)]
pub struct StoreWithRating {
    pub id: Uuid,
    pub name: String,
    pub email: String,
    pub address: String,
    pub owner_id: Uuid,
    pub created_at: DateTime<Utc>,
    /// Mean of all ratings for this store, 0.0 when unrated
    #[schema(example = 4.2)]
    pub average_rating: f64,
    /// Number of ratings submitted for this store
    #[schema(example = 12)]
    pub total_ratings: i64,
}
