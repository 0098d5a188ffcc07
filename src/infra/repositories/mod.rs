//! Repository layer - Data access abstraction
//!
//! Repositories provide an abstraction over data persistence,
//! following the Repository pattern for clean separation of concerns.
//!
//! The pre-insert uniqueness checks in the services are an optimization for
//! friendlier errors; the schema's unique constraints are the real
//! invariant, and constraint violations from the database are translated
//! back into domain errors here.

pub(crate) mod entities;
mod rating_repository;
mod store_repository;
mod user_repository;

pub use rating_repository::{RatingLedger, RatingRepository};
pub use store_repository::{StoreRegistry, StoreRepository};
pub use user_repository::{UserRepository, UserStore};

// Export mocks for tests (both unit and integration)
#[cfg(any(test, feature = "test-utils"))]
pub use rating_repository::MockRatingRepository;
#[cfg(any(test, feature = "test-utils"))]
pub use store_repository::MockStoreRepository;
#[cfg(any(test, feature = "test-utils"))]
pub use user_repository::MockUserRepository;

use sea_orm::{DbErr, SqlErr};

use crate::errors::AppError;

/// Translate a unique-constraint violation into the given domain error,
/// passing every other database error through unchanged.
pub(crate) fn unique_violation_to(err: DbErr, domain_err: AppError) -> AppError {
    match err.sql_err() {
        Some(SqlErr::UniqueConstraintViolation(_)) => domain_err,
        _ => AppError::from(err),
    }
}
