//! Application state - Dependency injection container.
//!
//! Built once at startup from the pool handle and configuration, then
//! cloned into every request handler.

use std::sync::Arc;

use crate::config::Config;
use crate::infra::Database;
use crate::services::{AuthService, Services, StoreService, UserService};

/// Application state containing all services.
#[derive(Clone)]
pub struct AppState {
    /// Authentication service
    pub auth_service: Arc<dyn AuthService>,
    /// User service
    pub user_service: Arc<dyn UserService>,
    /// Store service
    pub store_service: Arc<dyn StoreService>,
    /// Database connection
    pub database: Arc<Database>,
}

impl AppState {
    /// Create application state from a database connection and config.
    pub fn from_config(database: Arc<Database>, config: Config) -> Self {
        let services = Services::from_connection(database.get_connection(), config);

        Self {
            auth_service: services.auth(),
            user_service: services.users(),
            store_service: services.stores(),
            database,
        }
    }

    /// Create application state with manually injected services (for tests).
    pub fn new(
        auth_service: Arc<dyn AuthService>,
        user_service: Arc<dyn UserService>,
        store_service: Arc<dyn StoreService>,
        database: Arc<Database>,
    ) -> Self {
        Self {
            auth_service,
            user_service,
            store_service,
            database,
        }
    }
}
