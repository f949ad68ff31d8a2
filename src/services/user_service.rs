//! User service - profile reads and self-service account changes.

use async_trait::async_trait;
use std::sync::Arc;

use crate::domain::{User, UserFilter, UserPatch};
use crate::errors::{AppError, AppResult, OptionExt};
use crate::infra::UnitOfWork;
use crate::types::PaginationParams;

#[cfg(any(test, feature = "test-utils"))]
use mockall::automock;

#[cfg_attr(any(test, feature = "test-utils"), automock)]
#[async_trait]
pub trait UserService: Send + Sync {
    async fn list_users(&self, filter: UserFilter, page: PaginationParams) -> AppResult<Vec<User>>;

    async fn get_user(&self, id: i32) -> AppResult<User>;

    /// `actor_id` may only change their own account
    async fn update_user(&self, actor_id: i32, id: i32, patch: UserPatch) -> AppResult<User>;

    /// Removes the account together with its bookings
    async fn delete_user(&self, actor_id: i32, id: i32) -> AppResult<()>;
}

/// Concrete implementation of UserService using Unit of Work.
pub struct UserManager<U: UnitOfWork> {
    uow: Arc<U>,
}

impl<U: UnitOfWork> UserManager<U> {
    pub fn new(uow: Arc<U>) -> Self {
        Self { uow }
    }
}

#[async_trait]
impl<U: UnitOfWork> UserService for UserManager<U> {
    async fn list_users(&self, filter: UserFilter, page: PaginationParams) -> AppResult<Vec<User>> {
        self.uow.repos().users().list(&filter, &page).await
    }

    async fn get_user(&self, id: i32) -> AppResult<User> {
        self.uow.repos().users().find_by_id(id).await?.ok_or_not_found("User")
    }

    async fn update_user(&self, actor_id: i32, id: i32, patch: UserPatch) -> AppResult<User> {
        self.uow
            .transaction(move |tx| {
                Box::pin(async move {
                    let existing = tx.users().find_by_id(id).await?.ok_or_not_found("User")?;
                    if existing.id != actor_id {
                        return Err(AppError::Forbidden);
                    }
                    if patch.is_empty() {
                        return Ok(existing);
                    }

                    if let Some(email) = &patch.email {
                        if let Some(other) = tx.users().find_by_email(email).await? {
                            if other.id != id {
                                return Err(AppError::conflict(
                                    "User with this email already exists",
                                ));
                            }
                        }
                    }

                    tx.users().update(id, &patch).await?.ok_or_not_found("User")
                })
            })
            .await
    }

    async fn delete_user(&self, actor_id: i32, id: i32) -> AppResult<()> {
        self.uow
            .transaction(move |tx| {
                Box::pin(async move {
                    tx.users().find_by_id(id).await?.ok_or_not_found("User")?;
                    if id != actor_id {
                        return Err(AppError::Forbidden);
                    }
                    tx.users().delete(id).await?;
                    tracing::info!(user_id = id, "User deleted");
                    Ok(())
                })
            })
            .await
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::infra::unit_of_work::testing::{TestRepositories, TestUnitOfWork};
    use chrono::Utc;

    fn user(id: i32, email: &str) -> User {
        User {
            id,
            email: email.into(),
            password_hash: "$argon2id$hash".into(),
            first_name: None,
            last_name: None,
            telegram_id: None,
            pachca_id: None,
            created_at: Utc::now(),
        }
    }

    fn service(repos: TestRepositories) -> UserManager<TestUnitOfWork> {
        UserManager::new(Arc::new(TestUnitOfWork::from(repos)))
    }

    #[tokio::test]
    async fn changing_someone_else_is_forbidden() {
        let mut repos = TestRepositories::default();
        repos
            .users
            .expect_find_by_id()
            .returning(|id| Ok(Some(user(id, "other@example.com"))));
        repos.users.expect_update().never();

        let patch = UserPatch {
            first_name: Some(Some("Mallory".into())),
            ..Default::default()
        };
        let result = service(repos).update_user(1, 2, patch).await;
        assert!(matches!(result, Err(AppError::Forbidden)));
    }

    #[tokio::test]
    async fn taking_another_users_email_conflicts() {
        let mut repos = TestRepositories::default();
        repos
            .users
            .expect_find_by_id()
            .returning(|id| Ok(Some(user(id, "me@example.com"))));
        repos
            .users
            .expect_find_by_email()
            .returning(|email| Ok(Some(user(8, email))));

        let patch = UserPatch {
            email: Some("taken@example.com".into()),
            ..Default::default()
        };
        let result = service(repos).update_user(1, 1, patch).await;
        assert!(matches!(result, Err(AppError::Conflict(_))));
    }

    #[tokio::test]
    async fn deleting_a_missing_user_is_not_found() {
        let mut repos = TestRepositories::default();
        repos.users.expect_find_by_id().returning(|_| Ok(None));

        let result = service(repos).delete_user(1, 1).await;
        assert!(matches!(result, Err(AppError::NotFound(_))));
    }

    #[tokio::test]
    async fn users_can_delete_themselves() {
        let mut repos = TestRepositories::default();
        repos
            .users
            .expect_find_by_id()
            .returning(|id| Ok(Some(user(id, "me@example.com"))));
        repos.users.expect_delete().times(1).returning(|_| Ok(true));

        assert!(service(repos).delete_user(3, 3).await.is_ok());
    }
}
