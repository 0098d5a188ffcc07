//! Infrastructure layer - External systems integration
//!
//! This module handles database connections, SeaORM entities,
//! and the repository implementations over them.

pub mod db;
pub mod repositories;

pub use db::{Database, Migrator};
pub use repositories::{
    RatingLedger, RatingRepository, StoreRegistry, StoreRepository, UserRepository, UserStore,
};

#[cfg(any(test, feature = "test-utils"))]
pub use repositories::{MockRatingRepository, MockStoreRepository, MockUserRepository};
