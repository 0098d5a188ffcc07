//! Application services layer - Use cases and business logic.
//!
//! Services orchestrate domain logic and repositories to fulfill
//! application use cases. They depend on repository traits for
//! dependency inversion.

mod auth_service;
mod container;
mod store_service;
mod user_service;

pub use auth_service::{AuthService, Authenticator, Claims, LoginResponse};
pub use container::Services;
pub use store_service::{StoreManager, StoreService};
pub use user_service::{DashboardStats, UserDetail, UserManager, UserService};
