//! Authentication service - registration, login and JWT handling.
//!
//! Passwords are hashed and verified through the domain `Password` value
//! object; tokens are HS256 JWTs signed with the configured secret.

use async_trait::async_trait;
use chrono::{Duration, Utc};
use jsonwebtoken::{decode, encode, DecodingKey, EncodingKey, Header, Validation};
use serde::{Deserialize, Serialize};
use std::sync::Arc;
use utoipa::ToSchema;

use crate::config::{Config, SECONDS_PER_HOUR, TOKEN_TYPE_BEARER};
use crate::domain::{NewUser, Password, User};
use crate::errors::{AppError, AppResult};
use crate::infra::UnitOfWork;

#[cfg(any(test, feature = "test-utils"))]
use mockall::automock;

// Verified when the email is unknown, so a miss costs as much as a hit
const DUMMY_HASH: &str =
    "$argon2id$v=19$m=19456,t=2,p=1$ZHVtbXlzYWx0MTIzNDU2$0Wd0d4b9bSgP+f4MQTBDLNZ8KQoU8nIb1dQX6rq4y2E";

/// JWT claims payload
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Claims {
    /// User id
    pub sub: i32,
    pub email: String,
    pub exp: i64,
    pub iat: i64,
}

/// Token response returned after successful authentication
#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
pub struct TokenResponse {
    /// JWT access token
    #[schema(example = "eyJhbGciOiJIUzI1NiIsInR5cCI6IkpXVCJ9...")]
    pub access_token: String,
    /// Token type (always "Bearer")
    #[schema(example = "Bearer")]
    pub token_type: String,
    /// Token expiration time in seconds
    #[schema(example = 86400)]
    pub expires_in: i64,
}

#[cfg_attr(any(test, feature = "test-utils"), automock)]
#[async_trait]
pub trait AuthService: Send + Sync {
    /// Register a new user; the email must not be taken
    async fn register(
        &self,
        email: String,
        password: String,
        first_name: Option<String>,
        last_name: Option<String>,
    ) -> AppResult<User>;

    /// Login and return JWT token
    async fn login(&self, email: String, password: String) -> AppResult<TokenResponse>;

    /// Verify JWT token and extract claims
    fn verify_token(&self, token: &str) -> AppResult<Claims>;
}

fn generate_token(user: &User, config: &Config) -> AppResult<TokenResponse> {
    let now = Utc::now();
    let expires_at = now + Duration::hours(config.jwt_expiration_hours);

    let claims = Claims {
        sub: user.id,
        email: user.email.clone(),
        exp: expires_at.timestamp(),
        iat: now.timestamp(),
    };

    let token = encode(
        &Header::default(),
        &claims,
        &EncodingKey::from_secret(config.jwt_secret_bytes()),
    )?;

    Ok(TokenResponse {
        access_token: token,
        token_type: TOKEN_TYPE_BEARER.to_string(),
        expires_in: config.jwt_expiration_hours * SECONDS_PER_HOUR,
    })
}

/// Concrete implementation of AuthService using Unit of Work.
pub struct Authenticator<U: UnitOfWork> {
    uow: Arc<U>,
    config: Config,
}

impl<U: UnitOfWork> Authenticator<U> {
    pub fn new(uow: Arc<U>, config: Config) -> Self {
        Self { uow, config }
    }
}

#[async_trait]
impl<U: UnitOfWork> AuthService for Authenticator<U> {
    async fn register(
        &self,
        email: String,
        password: String,
        first_name: Option<String>,
        last_name: Option<String>,
    ) -> AppResult<User> {
        let password_hash = Password::new(&password)?.into_string();

        let user = self
            .uow
            .transaction(move |tx| {
                Box::pin(async move {
                    if tx.users().find_by_email(&email).await?.is_some() {
                        return Err(AppError::conflict("User with this email already exists"));
                    }
                    tx.users()
                        .create(&NewUser {
                            email,
                            password_hash,
                            first_name,
                            last_name,
                        })
                        .await
                })
            })
            .await?;

        tracing::info!(user_id = user.id, "User registered");
        Ok(user)
    }

    async fn login(&self, email: String, password: String) -> AppResult<TokenResponse> {
        let user = self.uow.repos().users().find_by_email(&email).await?;

        // Verify even for unknown emails so response time does not reveal them
        let hash = user
            .as_ref()
            .map_or(DUMMY_HASH, |u| u.password_hash.as_str());
        let password_valid = Password::from_hash(hash.to_string()).verify(&password);

        match user {
            Some(user) if password_valid => generate_token(&user, &self.config),
            _ => {
                tracing::debug!("Rejected login attempt");
                Err(AppError::InvalidCredentials)
            }
        }
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
    use crate::infra::unit_of_work::testing::{TestRepositories, TestUnitOfWork};

    fn user(password: &str) -> User {
        User {
            id: 4,
            email: "guest@example.com".into(),
            password_hash: Password::new(password).unwrap().into_string(),
            first_name: None,
            last_name: None,
            telegram_id: None,
            pachca_id: None,
            created_at: Utc::now(),
        }
    }

    fn service(repos: TestRepositories) -> Authenticator<TestUnitOfWork> {
        Authenticator::new(Arc::new(TestUnitOfWork::from(repos)), Config::for_tests())
    }

    #[tokio::test]
    async fn register_rejects_a_used_email() {
        let mut repos = TestRepositories::default();
        repos
            .users
            .expect_find_by_email()
            .returning(|_| Ok(Some(user("password123"))));
        repos.users.expect_create().never();

        let result = service(repos)
            .register("guest@example.com".into(), "password123".into(), None, None)
            .await;

        assert!(matches!(result, Err(AppError::Conflict(_))));
    }

    #[tokio::test]
    async fn register_stores_a_hash_not_the_password() {
        let mut repos = TestRepositories::default();
        repos.users.expect_find_by_email().returning(|_| Ok(None));
        repos
            .users
            .expect_create()
            .withf(|new| new.password_hash != "password123" && new.password_hash.starts_with("$argon2"))
            .returning(|new| {
                Ok(User {
                    email: new.email.clone(),
                    ..user("password123")
                })
            });

        let created = service(repos)
            .register("new@example.com".into(), "password123".into(), None, None)
            .await
            .unwrap();
        assert_eq!(created.email, "new@example.com");
    }

    #[tokio::test]
    async fn login_issues_a_token_that_verifies() {
        let mut repos = TestRepositories::default();
        repos
            .users
            .expect_find_by_email()
            .returning(|_| Ok(Some(user("password123"))));
        let service = service(repos);

        let token = service
            .login("guest@example.com".into(), "password123".into())
            .await
            .unwrap();
        assert_eq!(token.token_type, "Bearer");

        let claims = service.verify_token(&token.access_token).unwrap();
        assert_eq!(claims.sub, 4);
        assert_eq!(claims.email, "guest@example.com");
    }

    #[tokio::test]
    async fn wrong_password_and_unknown_email_look_the_same() {
        let mut repos = TestRepositories::default();
        repos
            .users
            .expect_find_by_email()
            .returning(|email| Ok((email == "guest@example.com").then(|| user("password123"))));
        let service = service(repos);

        let wrong = service
            .login("guest@example.com".into(), "not-the-password".into())
            .await;
        let unknown = service
            .login("nobody@example.com".into(), "password123".into())
            .await;

        assert!(matches!(wrong, Err(AppError::InvalidCredentials)));
        assert!(matches!(unknown, Err(AppError::InvalidCredentials)));
    }

    #[test]
    fn tampered_token_is_rejected() {
        let service = service(TestRepositories::default());
        assert!(matches!(
            service.verify_token("not.a.jwt"),
            Err(AppError::Jwt(_))
        ));
    }
}
