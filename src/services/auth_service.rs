//! Authentication service - registration, login, and token handling.
//!
//! Password hashing lives in the domain `Password` value object; this
//! service owns token issuance and verification.

use async_trait::async_trait;
use chrono::{Duration, Utc};
use jsonwebtoken::{decode, encode, DecodingKey, EncodingKey, Header, Validation};
use serde::{Deserialize, Serialize};
use std::sync::Arc;
use utoipa::ToSchema;
use uuid::Uuid;

use crate::config::{Config, SECONDS_PER_HOUR, TOKEN_TYPE_BEARER};
use crate::domain::{Password, User, UserResponse, UserRole};
use crate::errors::{AppError, AppResult};
use crate::infra::UserRepository;

/// JWT claims payload
#[derive(Debug, Serialize, Deserialize)]
pub struct Claims {
    pub sub: Uuid,
    pub email: String,
    pub role: String,
    pub exp: i64,
    pub iat: i64,
}

/// Token response returned after successful authentication
#[derive(Debug, Serialize, ToSchema)]
pub struct LoginResponse {
    /// JWT access token
    #[schema(example = "eyJhbGciOiJIUzI1NiIsInR5cCI6IkpXVCJ9...")]
    pub token: String,
    /// Token type (always "Bearer")
    #[schema(example = "Bearer")]
    pub token_type: String,
    /// Token expiration time in seconds
    #[schema(example = 86400)]
    pub expires_in: i64,
    /// The authenticated user
    pub user: UserResponse,
}

/// Authentication service trait for dependency injection.
#[async_trait]
pub trait AuthService: Send + Sync {
    /// Register a new user with the `user` role
    async fn register(
        &self,
        name: String,
        email: String,
        password: String,
        address: Option<String>,
    ) -> AppResult<User>;

    /// Login and return a signed token plus the user
    async fn login(&self, email: String, password: String) -> AppResult<LoginResponse>;

    /// Verify a token and extract its claims
    fn verify_token(&self, token: &str) -> AppResult<Claims>;
}

/// Generate a signed token for a user
fn generate_token(user: &User, config: &Config) -> AppResult<(String, i64)> {
    let now = Utc::now();
    let expires_at = now + Duration::hours(config.jwt_expiration_hours);

    let claims = Claims {
        sub: user.id,
        email: user.email.clone(),
        role: user.role.to_string(),
        exp: expires_at.timestamp(),
        iat: now.timestamp(),
    };

    let token = encode(
        &Header::default(),
        &claims,
        &EncodingKey::from_secret(config.jwt_secret_bytes()),
    )?;

    Ok((token, config.jwt_expiration_hours * SECONDS_PER_HOUR))
}

/// Concrete implementation of AuthService.
pub struct Authenticator {
    users: Arc<dyn UserRepository>,
    config: Config,
}

impl Authenticator {
    /// Create new auth service instance
    pub fn new(users: Arc<dyn UserRepository>, config: Config) -> Self {
        Self { users, config }
    }
}

#[async_trait]
impl AuthService for Authenticator {
    async fn register(
        &self,
        name: String,
        email: String,
        password: String,
        address: Option<String>,
    ) -> AppResult<User> {
        // Email format is validated by the handler's ValidatedJson extractor.
        // The pre-check gives a friendly error; the schema's unique index is
        // what actually holds under concurrent registrations.
        if self.users.find_by_email(&email).await?.is_some() {
            return Err(AppError::duplicate_email("User"));
        }

        let password_hash = Password::new(&password)?.into_string();
        self.users
            .create(name, email, password_hash, address, UserRole::User)
            .await
    }

    async fn login(&self, email: String, password: String) -> AppResult<LoginResponse> {
        let user_result = self.users.find_by_email(&email).await?;

        // SECURITY: Perform password verification even if user doesn't exist
        // to prevent timing attacks that could enumerate valid emails.
        // We use a dummy hash that will always fail verification.
        let dummy_hash =
            "$argon2id$v=19$m=19456,t=2,p=1$dummysalt123456$dummyhash1234567890123456789012";

        let (password_hash, user_exists) = match &user_result {
            Some(user) => (user.password_hash.as_str(), true),
            None => (dummy_hash, false),
        };

        let stored_password = Password::from_hash(password_hash.to_string());
        let password_valid = stored_password.verify(&password);

        // Only succeed if both user exists AND password is valid
        if !user_exists || !password_valid {
            return Err(AppError::InvalidCredentials);
        }

        // Safe to unwrap since we verified user_exists is true
        let user = user_result.unwrap();
        let (token, expires_in) = generate_token(&user, &self.config)?;

        Ok(LoginResponse {
            token,
            token_type: TOKEN_TYPE_BEARER.to_string(),
            expires_in,
            user: UserResponse::from(user),
        })
    }

    fn verify_token(&self, token: &str) -> AppResult<Claims> {
        let token_data = decode::<Claims>(
            token,
            &DecodingKey::from_secret(self.config.jwt_secret_bytes()),
            &Validation::default(),
        )?;

        Ok(token_data.claims)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::infra::MockUserRepository;

    const TEST_SECRET: &str = "test-secret-key-for-testing-only-32chars";

    fn sample_user(email: &str, password: &str, role: UserRole) -> User {
        User {
            id: Uuid::new_v4(),
            name: "Test User".to_string(),
            email: email.to_string(),
            password_hash: Password::new(password).unwrap().into_string(),
            address: None,
            role,
            created_at: Utc::now(),
            updated_at: Utc::now(),
        }
    }

    fn authenticator(users: MockUserRepository) -> Authenticator {
        Authenticator::new(Arc::new(users), Config::with_secret(TEST_SECRET))
    }

    #[tokio::test]
    async fn register_rejects_duplicate_email() {
        let existing = sample_user("taken@example.com", "Secure!1", UserRole::User);

        let mut users = MockUserRepository::new();
        users
            .expect_find_by_email()
            .returning(move |_| Ok(Some(existing.clone())));
        users.expect_create().never();

        let service = authenticator(users);
        let result = service
            .register(
                "Someone Else".to_string(),
                "taken@example.com".to_string(),
                "Secure!1".to_string(),
                None,
            )
            .await;

        assert!(matches!(result.unwrap_err(), AppError::DuplicateEmail(_)));
    }

    #[tokio::test]
    async fn register_hashes_password_and_assigns_user_role() {
        let mut users = MockUserRepository::new();
        users.expect_find_by_email().returning(|_| Ok(None));
        users
            .expect_create()
            .withf(|_, _, password_hash, _, role| {
                password_hash.starts_with("$argon2") && *role == UserRole::User
            })
            .times(1)
            .returning(|name, email, password_hash, address, role| {
                Ok(User {
                    id: Uuid::new_v4(),
                    name,
                    email,
                    password_hash,
                    address,
                    role,
                    created_at: Utc::now(),
                    updated_at: Utc::now(),
                })
            });

        let service = authenticator(users);
        let user = service
            .register(
                "New User".to_string(),
                "new@example.com".to_string(),
                "Secure!1".to_string(),
                Some("12 Baker Street".to_string()),
            )
            .await
            .unwrap();

        assert_eq!(user.role, UserRole::User);
        assert_ne!(user.password_hash, "Secure!1");
    }

    #[tokio::test]
    async fn login_with_unknown_email_fails_with_invalid_credentials() {
        let mut users = MockUserRepository::new();
        users.expect_find_by_email().returning(|_| Ok(None));

        let service = authenticator(users);
        let result = service
            .login("ghost@example.com".to_string(), "Secure!1".to_string())
            .await;

        assert!(matches!(result.unwrap_err(), AppError::InvalidCredentials));
    }

    #[tokio::test]
    async fn login_with_wrong_password_fails_with_invalid_credentials() {
        let user = sample_user("known@example.com", "Right!1x", UserRole::User);

        let mut users = MockUserRepository::new();
        users
            .expect_find_by_email()
            .returning(move |_| Ok(Some(user.clone())));

        let service = authenticator(users);
        let result = service
            .login("known@example.com".to_string(), "Wrong!1x".to_string())
            .await;

        assert!(matches!(result.unwrap_err(), AppError::InvalidCredentials));
    }

    #[tokio::test]
    async fn login_token_decodes_to_the_correct_identity() {
        let user = sample_user("owner@example.com", "Secure!1", UserRole::StoreOwner);
        let user_id = user.id;

        let mut users = MockUserRepository::new();
        users
            .expect_find_by_email()
            .returning(move |_| Ok(Some(user.clone())));

        let service = authenticator(users);
        let response = service
            .login("owner@example.com".to_string(), "Secure!1".to_string())
            .await
            .unwrap();

        assert_eq!(response.token_type, TOKEN_TYPE_BEARER);
        assert_eq!(response.user.id, user_id);

        let claims = service.verify_token(&response.token).unwrap();
        assert_eq!(claims.sub, user_id);
        assert_eq!(claims.role, "store_owner");
        assert!(claims.exp > claims.iat);
    }

    #[tokio::test]
    async fn verify_token_rejects_garbage() {
        let service = authenticator(MockUserRepository::new());
        assert!(service.verify_token("not-a-token").is_err());
    }

    #[tokio::test]
    async fn tokens_signed_with_another_key_are_rejected() {
        let user = sample_user("user@example.com", "Secure!1", UserRole::User);

        let mut users = MockUserRepository::new();
        users
            .expect_find_by_email()
            .returning(move |_| Ok(Some(user.clone())));

        let issuing = Authenticator::new(
            Arc::new(users),
            Config::with_secret("another-secret-key-32-characters!!"),
        );
        let response = issuing
            .login("user@example.com".to_string(), "Secure!1".to_string())
            .await
            .unwrap();

        let verifying = authenticator(MockUserRepository::new());
        assert!(verifying.verify_token(&response.token).is_err());
    }
}
