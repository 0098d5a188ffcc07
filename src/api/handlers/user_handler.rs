//! User management handlers. Every route here is admin-only.

use axum::{
    extract::{Extension, Path, State},
    http::StatusCode,
    middleware,
    response::Json,
    routing::get,
    Router,
};
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;
use uuid::Uuid;
use validator::Validate;

use crate::api::extractors::ValidatedJson;
use crate::api::middleware::{auth_middleware, require_admin, CurrentUser};
use crate::api::AppState;
use crate::domain::{StoreWithRating, UserResponse, UserRole};
use crate::errors::AppResult;
use crate::services::DashboardStats;
use crate::types::MessageResponse;

/// User create request (admin)
#[derive(Debug, Deserialize, Validate, ToSchema)]
pub struct CreateUserRequest {
    /// User display name
    #[validate(length(min = 2, max = 60, message = "Name must be between 2 and 60 characters"))]
    #[schema(example = "Johnathan Doe")]
    pub name: String,
    /// User email address
    #[validate(email(message = "Please enter a valid email"))]
    #[schema(example = "user@example.com")]
    pub email: String,
    /// Password: at least 6 characters, one uppercase, one of !@#$%^&*
    #[validate(custom(function = "crate::domain::validate_password_strength"))]
    #[schema(example = "Secure!1", min_length = 6)]
    pub password: String,
    /// Optional postal address
    #[validate(length(max = 400, message = "Address must not exceed 400 characters"))]
    pub address: Option<String>,
    /// Role to assign
    #[schema(example = "store_owner")]
    pub role: UserRole,
}

/// User update request (admin, full-field replace)
#[derive(Debug, Deserialize, Validate, ToSchema)]
pub struct UpdateUserRequest {
    /// User display name
    #[validate(length(min = 2, max = 60, message = "Name must be between 2 and 60 characters"))]
    pub name: String,
    /// User email address
    #[validate(email(message = "Please enter a valid email"))]
    pub email: String,
    /// Optional postal address
    #[validate(length(max = 400, message = "Address must not exceed 400 characters"))]
    pub address: Option<String>,
    /// Role to assign
    pub role: UserRole,
}

/// User detail response; `stores` is present for store owners only.
#[derive(Debug, Serialize, ToSchema)]
pub struct UserDetailResponse {
    #[serde(flatten)]
    pub user: UserResponse,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub stores: Option<Vec<StoreWithRating>>,
}

/// Create user management routes
pub fn user_routes(state: AppState) -> Router<AppState> {
    Router::new()
        .route("/", get(list_users).post(create_user))
        .route("/dashboard/stats", get(dashboard_stats))
        .route("/:id", get(get_user).put(update_user).delete(delete_user))
        .route_layer(middleware::from_fn_with_state(state, auth_middleware))
}

/// List all users
#[utoipa::path(
    get,
    path = "/api/users",
    tag = "Users",
    security(("bearer_auth" = [])),
    responses(
        (status = 200, description = "List of all users", body = Vec<UserResponse>),
        (status = 401, description = "Unauthorized"),
        (status = 403, description = "Forbidden - Admin only")
    )
)]
pub async fn list_users(
    Extension(current_user): Extension<CurrentUser>,
    State(state): State<AppState>,
) -> AppResult<Json<Vec<UserResponse>>> {
    require_admin(&current_user)?;
    let users = state.user_service.list_users().await?;
    Ok(Json(users.into_iter().map(UserResponse::from).collect()))
}

/// Get user by ID, with owned stores for store owners
#[utoipa::path(
    get,
    path = "/api/users/{id}",
    tag = "Users",
    security(("bearer_auth" = [])),
    params(("id" = Uuid, Path, description = "User ID")),
    responses(
        (status = 200, description = "User profile", body = UserDetailResponse),
        (status = 401, description = "Unauthorized"),
        (status = 403, description = "Forbidden - Admin only"),
        (status = 404, description = "User not found")
    )
)]
pub async fn get_user(
    Extension(current_user): Extension<CurrentUser>,
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
) -> AppResult<Json<UserDetailResponse>> {
    require_admin(&current_user)?;

    let detail = state.user_service.get_user_detail(id).await?;

    Ok(Json(UserDetailResponse {
        user: UserResponse::from(detail.user),
        stores: detail.stores,
    }))
}

/// Create a new user with an explicit role
#[utoipa::path(
    post,
    path = "/api/users",
    tag = "Users",
    security(("bearer_auth" = [])),
    request_body = CreateUserRequest,
    responses(
        (status = 201, description = "User created successfully", body = UserResponse),
        (status = 400, description = "Validation error or duplicate email"),
        (status = 401, description = "Unauthorized"),
        (status = 403, description = "Forbidden - Admin only")
    )
)]
pub async fn create_user(
    Extension(current_user): Extension<CurrentUser>,
    State(state): State<AppState>,
    ValidatedJson(payload): ValidatedJson<CreateUserRequest>,
) -> AppResult<(StatusCode, Json<UserResponse>)> {
    require_admin(&current_user)?;

    let user = state
        .user_service
        .create_user(
            payload.name,
            payload.email,
            payload.password,
            payload.address,
            payload.role,
        )
        .await?;

    Ok((StatusCode::CREATED, Json(UserResponse::from(user))))
}

/// Update a user (full-field replace)
#[utoipa::path(
    put,
    path = "/api/users/{id}",
    tag = "Users",
    security(("bearer_auth" = [])),
    params(("id" = Uuid, Path, description = "User ID")),
    request_body = UpdateUserRequest,
    responses(
        (status = 200, description = "User updated successfully", body = UserResponse),
        (status = 400, description = "Validation error"),
        (status = 401, description = "Unauthorized"),
        (status = 403, description = "Forbidden - Admin only"),
        (status = 404, description = "User not found")
    )
)]
pub async fn update_user(
    Extension(current_user): Extension<CurrentUser>,
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
    ValidatedJson(payload): ValidatedJson<UpdateUserRequest>,
) -> AppResult<Json<UserResponse>> {
    require_admin(&current_user)?;

    let user = state
        .user_service
        .update_user(
            id,
            payload.name,
            payload.email,
            payload.address,
            payload.role,
        )
        .await?;

    Ok(Json(UserResponse::from(user)))
}

/// Delete a user
#[utoipa::path(
    delete,
    path = "/api/users/{id}",
    tag = "Users",
    security(("bearer_auth" = [])),
    params(("id" = Uuid, Path, description = "User ID")),
    responses(
        (status = 200, description = "User deleted successfully", body = MessageResponse),
        (status = 401, description = "Unauthorized"),
        (status = 403, description = "Forbidden - Admin only"),
        (status = 404, description = "User not found")
    )
)]
pub async fn delete_user(
    Extension(current_user): Extension<CurrentUser>,
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
) -> AppResult<Json<MessageResponse>> {
    require_admin(&current_user)?;

    state.user_service.delete_user(id).await?;

    Ok(Json(MessageResponse::new("User deleted successfully")))
}

/// Get dashboard statistics
#[utoipa::path(
    get,
    path = "/api/users/dashboard/stats",
    tag = "Users",
    security(("bearer_auth" = [])),
    responses(
        (status = 200, description = "Aggregate counts", body = DashboardStats),
        (status = 401, description = "Unauthorized"),
        (status = 403, description = "Forbidden - Admin only")
    )
)]
pub async fn dashboard_stats(
    Extension(current_user): Extension<CurrentUser>,
    State(state): State<AppState>,
) -> AppResult<Json<DashboardStats>> {
    require_admin(&current_user)?;

    let stats = state.user_service.dashboard_stats().await?;
    Ok(Json(stats))
}
