//! Store handlers: browsing, management, and rating submission.

use axum::{
    extract::{Extension, Path, State},
    http::StatusCode,
    middleware,
    response::Json,
    routing::{get, post, put},
    Router,
};
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;
use uuid::Uuid;
use validator::Validate;

use crate::api::extractors::ValidatedJson;
use crate::api::middleware::{
    auth_middleware, optional_auth_middleware, require_role, CurrentUser, MaybeUser,
};
use crate::api::AppState;
use crate::domain::{Store, StoreWithRating, UserRole};
use crate::errors::AppResult;
use crate::types::MessageResponse;

/// Store create/update request (full-field replace on update)
#[derive(Debug, Deserialize, Validate, ToSchema)]
pub struct StoreRequest {
    /// Store display name
    #[validate(length(min = 2, max = 60, message = "Name must be between 2 and 60 characters"))]
    #[schema(example = "Corner Books")]
    pub name: String,
    /// Store contact email, unique among stores
    #[validate(email(message = "Please enter a valid email"))]
    #[schema(example = "contact@cornerbooks.example")]
    pub email: String,
    /// Store address
    #[validate(length(max = 400, message = "Address must not exceed 400 characters"))]
    #[schema(example = "5 High Street")]
    pub address: String,
}

/// Rating submission request
#[derive(Debug, Deserialize, Validate, ToSchema)]
pub struct RateRequest {
    /// Star rating
    #[validate(range(min = 1, max = 5, message = "Rating must be between 1 and 5"))]
    #[schema(example = 4, minimum = 1, maximum = 5)]
    pub rating: i32,
}

/// Store detail response.
///
/// `user_rating` is present only for authenticated callers; it is null when
/// the caller has not rated the store, hence the nested Option.
#[derive(Debug, Serialize, ToSchema)]
pub struct StoreDetailResponse {
    #[serde(flatten)]
    pub store: StoreWithRating,
    #[serde(rename = "userRating", skip_serializing_if = "Option::is_none")]
    #[schema(value_type = Option<i32>)]
    pub user_rating: Option<Option<i32>>,
}

/// Create store routes
pub fn store_routes(state: AppState) -> Router<AppState> {
    let public = Router::new().route("/", get(list_stores));

    let optional = Router::new().route("/:id", get(get_store)).route_layer(
        middleware::from_fn_with_state(state.clone(), optional_auth_middleware),
    );

    let protected = Router::new()
        .route("/", post(create_store))
        .route("/:id", put(update_store).delete(delete_store))
        .route("/:id/rate", post(submit_rating))
        .route_layer(middleware::from_fn_with_state(state, auth_middleware));

    public.merge(optional).merge(protected)
}

/// List all stores with rating aggregates
#[utoipa::path(
    get,
    path = "/api/stores",
    tag = "Stores",
    responses(
        (status = 200, description = "All stores with aggregates", body = Vec<StoreWithRating>)
    )
)]
pub async fn list_stores(State(state): State<AppState>) -> AppResult<Json<Vec<StoreWithRating>>> {
    let stores = state.store_service.list_stores().await?;
    Ok(Json(stores))
}

/// Get a store with aggregates; authenticated callers also get their own rating
#[utoipa::path(
    get,
    path = "/api/stores/{id}",
    tag = "Stores",
    params(("id" = Uuid, Path, description = "Store ID")),
    responses(
        (status = 200, description = "Store with aggregates", body = StoreDetailResponse),
        (status = 404, description = "Store not found")
    )
)]
pub async fn get_store(
    Extension(MaybeUser(maybe_user)): Extension<MaybeUser>,
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
) -> AppResult<Json<StoreDetailResponse>> {
    let viewer = maybe_user.as_ref().map(|user| user.id);
    let (store, viewer_rating) = state.store_service.get_store(id, viewer).await?;

    Ok(Json(StoreDetailResponse {
        store,
        user_rating: maybe_user.map(|_| viewer_rating),
    }))
}

/// Create a new store owned by the caller
#[utoipa::path(
    post,
    path = "/api/stores",
    tag = "Stores",
    security(("bearer_auth" = [])),
    request_body = StoreRequest,
    responses(
        (status = 201, description = "Store created successfully", body = Store),
        (status = 400, description = "Validation error or duplicate email"),
        (status = 401, description = "Unauthorized"),
        (status = 403, description = "Forbidden - admin or store_owner only")
    )
)]
pub async fn create_store(
    Extension(current_user): Extension<CurrentUser>,
    State(state): State<AppState>,
    ValidatedJson(payload): ValidatedJson<StoreRequest>,
) -> AppResult<(StatusCode, Json<Store>)> {
    require_role(&current_user, &[UserRole::Admin, UserRole::StoreOwner])?;

    let store = state
        .store_service
        .create_store(payload.name, payload.email, payload.address, current_user.id)
        .await?;

    Ok((StatusCode::CREATED, Json(store)))
}

/// Update a store (owner or admin)
#[utoipa::path(
    put,
    path = "/api/stores/{id}",
    tag = "Stores",
    security(("bearer_auth" = [])),
    params(("id" = Uuid, Path, description = "Store ID")),
    request_body = StoreRequest,
    responses(
        (status = 200, description = "Store updated successfully", body = Store),
        (status = 400, description = "Validation error"),
        (status = 401, description = "Unauthorized"),
        (status = 403, description = "Forbidden - admin or store_owner only"),
        (status = 404, description = "Store not found or not owned by the caller")
    )
)]
pub async fn update_store(
    Extension(current_user): Extension<CurrentUser>,
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
    ValidatedJson(payload): ValidatedJson<StoreRequest>,
) -> AppResult<Json<Store>> {
    require_role(&current_user, &[UserRole::Admin, UserRole::StoreOwner])?;

    let store = state
        .store_service
        .update_store(
            id,
            current_user.id,
            current_user.is_admin(),
            payload.name,
            payload.email,
            payload.address,
        )
        .await?;

    Ok(Json(store))
}

/// Delete a store (owner or admin)
#[utoipa::path(
    delete,
    path = "/api/stores/{id}",
    tag = "Stores",
    security(("bearer_auth" = [])),
    params(("id" = Uuid, Path, description = "Store ID")),
    responses(
        (status = 200, description = "Store deleted successfully", body = MessageResponse),
        (status = 401, description = "Unauthorized"),
        (status = 403, description = "Forbidden - admin or store_owner only"),
        (status = 404, description = "Store not found or not owned by the caller")
    )
)]
pub async fn delete_store(
    Extension(current_user): Extension<CurrentUser>,
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
) -> AppResult<Json<MessageResponse>> {
    require_role(&current_user, &[UserRole::Admin, UserRole::StoreOwner])?;

    state
        .store_service
        .delete_store(id, current_user.id, current_user.is_admin())
        .await?;

    Ok(Json(MessageResponse::new("Store deleted successfully")))
}

/// Submit or replace a rating for a store
#[utoipa::path(
    post,
    path = "/api/stores/{id}/rate",
    tag = "Stores",
    security(("bearer_auth" = [])),
    params(("id" = Uuid, Path, description = "Store ID")),
    request_body = RateRequest,
    responses(
        (status = 200, description = "Rating submitted successfully", body = MessageResponse),
        (status = 400, description = "Validation error"),
        (status = 401, description = "Unauthorized"),
        (status = 403, description = "Forbidden - user role only"),
        (status = 404, description = "Store not found")
    )
)]
pub async fn submit_rating(
    Extension(current_user): Extension<CurrentUser>,
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
    ValidatedJson(payload): ValidatedJson<RateRequest>,
) -> AppResult<Json<MessageResponse>> {
    require_role(&current_user, &[UserRole::User])?;

    state
        .store_service
        .submit_rating(id, current_user.id, payload.rating)
        .await?;

    Ok(Json(MessageResponse::new("Rating submitted successfully")))
}
