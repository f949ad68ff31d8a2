//! Country persistence.

use async_trait::async_trait;
use sea_orm::{
    ActiveModelTrait, ColumnTrait, ConnectionTrait, EntityTrait, PaginatorTrait, QueryFilter,
    QueryOrder, Set,
};

use super::base::{
    contains_ci, equals_ci, filter_term, Connected, DeleteRepository, ReadRepository,
    WriteRepository,
};
use super::entities::{city, country};
use crate::domain::{country::normalize_iso_code, Country, CountryFilter, CountryInput, CountryPatch};
use crate::errors::AppResult;
use crate::types::PaginationParams;

#[cfg(any(test, feature = "test-utils"))]
use mockall::automock;

#[cfg_attr(any(test, feature = "test-utils"), automock)]
#[async_trait]
pub trait CountryRepository: Send + Sync {
    async fn find_by_id(&self, id: i32) -> AppResult<Option<Country>>;

    /// Page of countries ordered by id, optionally filtered by name substring
    async fn list(&self, filter: &CountryFilter, page: &PaginationParams) -> AppResult<Vec<Country>>;

    /// Case-insensitive exact name match
    async fn find_by_name(&self, name: &str) -> AppResult<Option<Country>>;

    /// Case-insensitive ISO code match
    async fn find_by_iso_code(&self, iso_code: &str) -> AppResult<Option<Country>>;

    async fn create(&self, input: &CountryInput) -> AppResult<Country>;

    /// Apply the present fields; `None` if the country does not exist
    async fn update(&self, id: i32, changes: &CountryPatch) -> AppResult<Option<Country>>;

    async fn delete(&self, id: i32) -> AppResult<bool>;

    async fn has_cities(&self, id: i32) -> AppResult<bool>;
}

pub struct CountryStore<'a, C> {
    db: &'a C,
}

impl<'a, C> CountryStore<'a, C> {
    pub fn new(db: &'a C) -> Self {
        Self { db }
    }
}

impl<C: ConnectionTrait + Send + Sync> Connected for CountryStore<'_, C> {
    type Conn = C;

    fn db(&self) -> &C {
        self.db
    }
}

impl<C: ConnectionTrait + Send + Sync> ReadRepository<country::Entity> for CountryStore<'_, C> {}
impl<C: ConnectionTrait + Send + Sync> WriteRepository<country::ActiveModel> for CountryStore<'_, C> {}
impl<C: ConnectionTrait + Send + Sync> DeleteRepository<country::Entity> for CountryStore<'_, C> {}

#[async_trait]
impl<C: ConnectionTrait + Send + Sync> CountryRepository for CountryStore<'_, C> {
    async fn find_by_id(&self, id: i32) -> AppResult<Option<Country>> {
        Ok(self.find_model(id).await?.map(Country::from))
    }

    async fn list(&self, filter: &CountryFilter, page: &PaginationParams) -> AppResult<Vec<Country>> {
        let mut select = country::Entity::find();
        if let Some(name) = filter_term(&filter.name) {
            select = select.filter(contains_ci((country::Entity, country::Column::Name), name));
        }

        let rows = self
            .fetch_page(select.order_by_asc(country::Column::Id), page)
            .await?;
        Ok(rows.into_iter().map(Country::from).collect())
    }

    async fn find_by_name(&self, name: &str) -> AppResult<Option<Country>> {
        let row = country::Entity::find()
            .filter(equals_ci((country::Entity, country::Column::Name), name.trim()))
            .one(self.db)
            .await?;
        Ok(row.map(Country::from))
    }

    async fn find_by_iso_code(&self, iso_code: &str) -> AppResult<Option<Country>> {
        let row = country::Entity::find()
            .filter(country::Column::IsoCode.eq(normalize_iso_code(iso_code)))
            .one(self.db)
            .await?;
        Ok(row.map(Country::from))
    }

    async fn create(&self, input: &CountryInput) -> AppResult<Country> {
        let model = country::ActiveModel {
            name: Set(input.name.trim().to_string()),
            iso_code: Set(normalize_iso_code(&input.iso_code)),
            ..Default::default()
        };
        Ok(self.insert_model(model).await?.into())
    }

    async fn update(&self, id: i32, changes: &CountryPatch) -> AppResult<Option<Country>> {
        let Some(existing) = self.find_model(id).await? else {
            return Ok(None);
        };

        let mut active: country::ActiveModel = existing.clone().into();
        if let Some(name) = &changes.name {
            active.name = Set(name.trim().to_string());
        }
        if let Some(iso_code) = &changes.iso_code {
            active.iso_code = Set(normalize_iso_code(iso_code));
        }
        if !active.is_changed() {
            return Ok(Some(existing.into()));
        }

        Ok(Some(self.update_model(active).await?.into()))
    }

    async fn delete(&self, id: i32) -> AppResult<bool> {
        self.delete_model(id).await
    }

    async fn has_cities(&self, id: i32) -> AppResult<bool> {
        let count = city::Entity::find()
            .filter(city::Column::CountryId.eq(id))
            .count(self.db)
            .await?;
        Ok(count > 0)
    }
}
