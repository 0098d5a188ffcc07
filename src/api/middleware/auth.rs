//! JWT authentication middleware and role checks.

use axum::{
    extract::{Request, State},
    http::header::AUTHORIZATION,
    middleware::Next,
    response::Response,
};
use uuid::Uuid;

use crate::api::AppState;
use crate::config::BEARER_TOKEN_PREFIX;
use crate::domain::UserRole;
use crate::errors::AppError;

/// Authenticated user extracted from the bearer token
#[derive(Clone, Debug)]
pub struct CurrentUser {
    pub id: Uuid,
    pub email: String,
    pub role: UserRole,
}

impl CurrentUser {
    /// Check if user has admin role.
    pub fn is_admin(&self) -> bool {
        self.role.is_admin()
    }
}

/// Identity on routes where authentication is optional.
///
/// `None` means the request carried no usable token; the route still runs.
#[derive(Clone, Debug)]
pub struct MaybeUser(pub Option<CurrentUser>);

fn resolve_identity(state: &AppState, request: &Request) -> Result<CurrentUser, AppError> {
    let auth_header = request
        .headers()
        .get(AUTHORIZATION)
        .and_then(|h| h.to_str().ok())
        .ok_or(AppError::Unauthorized)?;

    let token = auth_header
        .strip_prefix(BEARER_TOKEN_PREFIX)
        .ok_or(AppError::Unauthorized)?;

    let claims = state.auth_service.verify_token(token)?;

    // A tampered or unknown role string means the token is not ours
    let role = UserRole::try_from(claims.role.as_str()).map_err(|_| AppError::Unauthorized)?;

    Ok(CurrentUser {
        id: claims.sub,
        email: claims.email,
        role,
    })
}

/// JWT authentication middleware.
///
/// Extracts and validates the token from the Authorization header, then
/// injects the CurrentUser into the request extensions. Missing or invalid
/// credentials are a 401.
pub async fn auth_middleware(
    State(state): State<AppState>,
    mut request: Request,
    next: Next,
) -> Result<Response, AppError> {
    let current_user = resolve_identity(&state, &request)?;
    request.extensions_mut().insert(current_user);

    Ok(next.run(request).await)
}

/// Optional-authentication middleware.
///
/// Resolves the caller's identity when a valid token is present and
/// otherwise lets the request through anonymously.
pub async fn optional_auth_middleware(
    State(state): State<AppState>,
    mut request: Request,
    next: Next,
) -> Response {
    let maybe_user = MaybeUser(resolve_identity(&state, &request).ok());
    request.extensions_mut().insert(maybe_user);

    next.run(request).await
}

/// Require admin role, returns Forbidden error if not admin.
pub fn require_admin(user: &CurrentUser) -> Result<(), AppError> {
    if user.is_admin() {
        Ok(())
    } else {
        Err(AppError::Forbidden)
    }
}

/// Require the caller's role to be in the endpoint's allow-list.
pub fn require_role(user: &CurrentUser, allowed: &[UserRole]) -> Result<(), AppError> {
    if allowed.contains(&user.role) {
        Ok(())
    } else {
        Err(AppError::Forbidden)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn user_with_role(role: UserRole) -> CurrentUser {
        CurrentUser {
            id: Uuid::new_v4(),
            email: "someone@example.com".to_string(),
            role,
        }
    }

    #[test]
    fn require_admin_rejects_other_roles() {
        assert!(require_admin(&user_with_role(UserRole::Admin)).is_ok());
        assert!(require_admin(&user_with_role(UserRole::StoreOwner)).is_err());
        assert!(require_admin(&user_with_role(UserRole::User)).is_err());
    }

    #[test]
    fn require_role_checks_the_allow_list() {
        let allowed = [UserRole::Admin, UserRole::StoreOwner];
        assert!(require_role(&user_with_role(UserRole::Admin), &allowed).is_ok());
        assert!(require_role(&user_with_role(UserRole::StoreOwner), &allowed).is_ok());
        assert!(require_role(&user_with_role(UserRole::User), &allowed).is_err());

        // Admin is not implicitly allowed everywhere: rating is user-only
        assert!(require_role(&user_with_role(UserRole::Admin), &[UserRole::User]).is_err());
    }
}
