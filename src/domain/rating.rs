//! Rating domain entity.

use chrono::{DateTime, Utc};
use serde::Serialize;
use uuid::Uuid;

use crate::config::{MAX_RATING, MIN_RATING};

/// A single user's rating of a single store.
///
/// Identity is the (user_id, store_id) pair; at most one row exists per pair.
/// Resubmission overwrites the value in place, no history is kept.
#[derive(Debug, Clone, Serialize)]
pub struct Rating {
    pub user_id: Uuid,
    pub store_id: Uuid,
    pub rating: i32,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

/// Check a rating value against the allowed 1..=5 range.
pub fn is_valid_rating(value: i32) -> bool {
    (MIN_RATING..=MAX_RATING).contains(&value)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn rating_bounds_are_inclusive() {
        assert!(is_valid_rating(1));
        assert!(is_valid_rating(5));
        assert!(!is_valid_rating(0));
        assert!(!is_valid_rating(6));
        assert!(!is_valid_rating(-3));
    }
}
