//! OpenAPI documentation configuration.
//!
//! Provides Swagger UI for API exploration and testing.

use utoipa::openapi::security::{HttpAuthScheme, HttpBuilder, SecurityScheme};
use utoipa::{Modify, OpenApi};

use crate::api::handlers::{auth_handler, store_handler, user_handler};
use crate::domain::{Store, StoreWithRating, UserResponse, UserRole};
use crate::services::{DashboardStats, LoginResponse};
use crate::types::MessageResponse;

/// OpenAPI documentation for the Store Rating API
#[derive(OpenApi)]
#[openapi(
    info(
        title = "Store Rating API",
        version = "0.1.0",
        description = "Role-based REST API for registering users, managing stores, and submitting 1-5 star ratings",
        license(name = "MIT", url = "https://opensource.org/licenses/MIT")
    ),
    servers(
        (url = "http://localhost:5000", description = "Local development server")
    ),
    paths(
        // Authentication endpoints
        auth_handler::register,
        auth_handler::login,
        auth_handler::me,
        // Store endpoints
        store_handler::list_stores,
        store_handler::get_store,
        store_handler::create_store,
        store_handler::update_store,
        store_handler::delete_store,
        store_handler::submit_rating,
        // User endpoints
        user_handler::list_users,
        user_handler::get_user,
        user_handler::create_user,
        user_handler::update_user,
        user_handler::delete_user,
        user_handler::dashboard_stats,
    ),
    components(
        schemas(
            // Domain types
            UserRole,
            UserResponse,
            Store,
            StoreWithRating,
            // Auth types
            auth_handler::RegisterRequest,
            auth_handler::LoginRequest,
            LoginResponse,
            // Store handler types
            store_handler::StoreRequest,
            store_handler::RateRequest,
            store_handler::StoreDetailResponse,
            // User handler types
            user_handler::CreateUserRequest,
            user_handler::UpdateUserRequest,
            user_handler::UserDetailResponse,
            DashboardStats,
            // Shared types
            MessageResponse,
        )
    ),
    modifiers(&SecurityAddon),
    tags(
        (name = "Authentication", description = "User registration and login"),
        (name = "Stores", description = "Store browsing, management, and ratings"),
        (name = "Users", description = "Administrative user management")
    )
)]
pub struct ApiDoc;

/// Security scheme modifier for JWT Bearer authentication
struct SecurityAddon;

impl Modify for SecurityAddon {
    fn modify(&self, openapi: &mut utoipa::openapi::OpenApi) {
        if let Some(components) = openapi.components.as_mut() {
            components.add_security_scheme(
                "bearer_auth",
                SecurityScheme::Http(
                    HttpBuilder::new()
                        .scheme(HttpAuthScheme::Bearer)
                        .bearer_format("JWT")
                        .description(Some("JWT token obtained from /api/auth/login"))
                        .build(),
                ),
            );
        }
    }
}
