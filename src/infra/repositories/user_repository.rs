//! User persistence.
//!
//! Emails are stored lower-cased so uniqueness and lookups ignore case.

use async_trait::async_trait;
use sea_orm::{
    ActiveModelTrait, ColumnTrait, ConnectionTrait, EntityTrait, QueryFilter, QueryOrder, Set,
};

use super::base::{filter_term, Connected, DeleteRepository, ReadRepository, WriteRepository};
use super::entities::user::{self, ActiveModel, Entity as UserEntity};
use crate::domain::{NewUser, User, UserFilter, UserPatch};
use crate::errors::AppResult;
use crate::types::PaginationParams;

#[cfg(any(test, feature = "test-utils"))]
use mockall::automock;

/// User repository trait for dependency injection.
#[cfg_attr(any(test, feature = "test-utils"), automock)]
#[async_trait]
pub trait UserRepository: Send + Sync {
    async fn find_by_id(&self, id: i32) -> AppResult<Option<User>>;

    /// Find user by email address, ignoring case
    async fn find_by_email(&self, email: &str) -> AppResult<Option<User>>;

    async fn list(&self, filter: &UserFilter, page: &PaginationParams) -> AppResult<Vec<User>>;

    async fn create(&self, user: &NewUser) -> AppResult<User>;

    /// Apply the present fields; `None` if the user does not exist
    async fn update(&self, id: i32, changes: &UserPatch) -> AppResult<Option<User>>;

    /// Delete the user together with their bookings
    async fn delete(&self, id: i32) -> AppResult<bool>;
}

pub struct UserStore<'a, C> {
    db: &'a C,
}

impl<'a, C> UserStore<'a, C> {
    pub fn new(db: &'a C) -> Self {
        Self { db }
    }
}

impl<C: ConnectionTrait + Send + Sync> Connected for UserStore<'_, C> {
    type Conn = C;

    fn db(&self) -> &C {
        self.db
    }
}

impl<C: ConnectionTrait + Send + Sync> ReadRepository<UserEntity> for UserStore<'_, C> {}
impl<C: ConnectionTrait + Send + Sync> WriteRepository<ActiveModel> for UserStore<'_, C> {}
impl<C: ConnectionTrait + Send + Sync> DeleteRepository<UserEntity> for UserStore<'_, C> {}

fn normalize_email(email: &str) -> String {
    email.trim().to_lowercase()
}

#[async_trait]
impl<C: ConnectionTrait + Send + Sync> UserRepository for UserStore<'_, C> {
    async fn find_by_id(&self, id: i32) -> AppResult<Option<User>> {
        Ok(self.find_model(id).await?.map(User::from))
    }

    async fn find_by_email(&self, email: &str) -> AppResult<Option<User>> {
        let result = UserEntity::find()
            .filter(user::Column::Email.eq(normalize_email(email)))
            .one(self.db)
            .await?;

        Ok(result.map(User::from))
    }

    async fn list(&self, filter: &UserFilter, page: &PaginationParams) -> AppResult<Vec<User>> {
        let mut select = UserEntity::find();
        if let Some(email) = filter_term(&filter.email) {
            select = select.filter(user::Column::Email.eq(normalize_email(email)));
        }

        let models = self
            .fetch_page(select.order_by_asc(user::Column::Id), page)
            .await?;
        Ok(models.into_iter().map(User::from).collect())
    }

    async fn create(&self, new: &NewUser) -> AppResult<User> {
        let active_model = ActiveModel {
            email: Set(normalize_email(&new.email)),
            hashed_password: Set(new.password_hash.clone()),
            first_name: Set(new.first_name.clone()),
            last_name: Set(new.last_name.clone()),
            telegram_id: Set(None),
            pachca_id: Set(None),
            created_at: Set(chrono::Utc::now()),
            ..Default::default()
        };

        Ok(self.insert_model(active_model).await?.into())
    }

    async fn update(&self, id: i32, changes: &UserPatch) -> AppResult<Option<User>> {
        let Some(user) = self.find_model(id).await? else {
            return Ok(None);
        };

        let mut active: ActiveModel = user.clone().into();
        if let Some(email) = &changes.email {
            active.email = Set(normalize_email(email));
        }
        if let Some(first_name) = &changes.first_name {
            active.first_name = Set(first_name.clone());
        }
        if let Some(last_name) = &changes.last_name {
            active.last_name = Set(last_name.clone());
        }
        if let Some(telegram_id) = changes.telegram_id {
            active.telegram_id = Set(telegram_id);
        }
        if let Some(pachca_id) = changes.pachca_id {
            active.pachca_id = Set(pachca_id);
        }
        if !active.is_changed() {
            return Ok(Some(user.into()));
        }

        Ok(Some(self.update_model(active).await?.into()))
    }

    async fn delete(&self, id: i32) -> AppResult<bool> {
        self.delete_model(id).await
    }
}
