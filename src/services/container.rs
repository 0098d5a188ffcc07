//! Service container - wires repositories into services at startup.

use std::sync::Arc;

use super::{AuthService, Authenticator, StoreManager, StoreService, UserManager, UserService};
use crate::config::Config;
use crate::infra::{RatingLedger, StoreRegistry, UserStore};

/// Holds every application service, constructed once from the pool handle
/// and configuration.
pub struct Services {
    auth_service: Arc<dyn AuthService>,
    user_service: Arc<dyn UserService>,
    store_service: Arc<dyn StoreService>,
}

impl Services {
    /// Create a service container from a database connection and config
    pub fn from_connection(db: sea_orm::DatabaseConnection, config: Config) -> Self {
        let users = Arc::new(UserStore::new(db.clone()));
        let stores = Arc::new(StoreRegistry::new(db.clone()));
        let ratings = Arc::new(RatingLedger::new(db));

        let auth_service = Arc::new(Authenticator::new(users.clone(), config));
        let user_service = Arc::new(UserManager::new(
            users.clone(),
            stores.clone(),
            ratings.clone(),
        ));
        let store_service = Arc::new(StoreManager::new(stores, ratings));

        Self {
            auth_service,
            user_service,
            store_service,
        }
    }

    /// Get authentication service
    pub fn auth(&self) -> Arc<dyn AuthService> {
        self.auth_service.clone()
    }

    /// Get user service
    pub fn users(&self) -> Arc<dyn UserService> {
        self.user_service.clone()
    }

    /// Get store service
    pub fn stores(&self) -> Arc<dyn StoreService> {
        self.store_service.clone()
    }
}
