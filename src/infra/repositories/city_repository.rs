//! City persistence. Every city is returned with its country.

use async_trait::async_trait;
use sea_orm::{
    ActiveModelTrait, ColumnTrait, ConnectionTrait, EntityTrait, PaginatorTrait, QueryFilter,
    QueryOrder, QuerySelect, Set,
};

use super::base::{
    contains_ci, equals_ci, filter_term, Connected, DeleteRepository, ReadRepository,
    WriteRepository,
};
use super::entities::{city, country, hotel};
use super::mappers::city_from;
use crate::domain::{City, CityFilter, CityInput, CityPatch};
use crate::errors::{AppError, AppResult};
use crate::types::PaginationParams;

#[cfg(any(test, feature = "test-utils"))]
use mockall::automock;

#[cfg_attr(any(test, feature = "test-utils"), automock)]
#[async_trait]
pub trait CityRepository: Send + Sync {
    async fn find_by_id(&self, id: i32) -> AppResult<Option<City>>;

    async fn list(&self, filter: &CityFilter, page: &PaginationParams) -> AppResult<Vec<City>>;

    /// Case-insensitive name match within one country
    async fn find_by_name_in_country(&self, name: &str, country_id: i32)
        -> AppResult<Option<City>>;

    /// Case-insensitive name match in any country; the oldest city wins
    async fn find_by_name(&self, name: &str) -> AppResult<Option<City>>;

    async fn create(&self, input: &CityInput) -> AppResult<City>;

    async fn update(&self, id: i32, changes: &CityPatch) -> AppResult<Option<City>>;

    async fn delete(&self, id: i32) -> AppResult<bool>;

    async fn has_hotels(&self, id: i32) -> AppResult<bool>;
}

pub struct CityStore<'a, C> {
    db: &'a C,
}

impl<'a, C> CityStore<'a, C> {
    pub fn new(db: &'a C) -> Self {
        Self { db }
    }
}

impl<C: ConnectionTrait + Send + Sync> Connected for CityStore<'_, C> {
    type Conn = C;

    fn db(&self) -> &C {
        self.db
    }
}

impl<C: ConnectionTrait + Send + Sync> ReadRepository<city::Entity> for CityStore<'_, C> {}
impl<C: ConnectionTrait + Send + Sync> WriteRepository<city::ActiveModel> for CityStore<'_, C> {}
impl<C: ConnectionTrait + Send + Sync> DeleteRepository<city::Entity> for CityStore<'_, C> {}

fn with_country(row: (city::Model, Option<country::Model>)) -> Option<City> {
    match row {
        (city, Some(country)) => Some(city_from(city, country)),
        (city, None) => {
            tracing::error!(city_id = city.id, "City row has no country");
            None
        }
    }
}

impl<C: ConnectionTrait + Send + Sync> CityStore<'_, C> {
    async fn first_where(&self, condition: sea_orm::Condition) -> AppResult<Option<City>> {
        let row = city::Entity::find()
            .find_also_related(country::Entity)
            .filter(condition)
            .order_by_asc(city::Column::Id)
            .one(self.db)
            .await?;
        Ok(row.and_then(with_country))
    }

    async fn reload(&self, id: i32) -> AppResult<City> {
        self.find_by_id(id)
            .await?
            .ok_or_else(|| AppError::internal(format!("City {id} vanished after write")))
    }
}

#[async_trait]
impl<C: ConnectionTrait + Send + Sync> CityRepository for CityStore<'_, C> {
    async fn find_by_id(&self, id: i32) -> AppResult<Option<City>> {
        self.first_where(sea_orm::Condition::all().add(city::Column::Id.eq(id)))
            .await
    }

    async fn list(&self, filter: &CityFilter, page: &PaginationParams) -> AppResult<Vec<City>> {
        let mut select = city::Entity::find().find_also_related(country::Entity);
        if let Some(name) = filter_term(&filter.name) {
            select = select.filter(contains_ci((city::Entity, city::Column::Name), name));
        }
        if let Some(country_id) = filter.country_id {
            select = select.filter(city::Column::CountryId.eq(country_id));
        }

        let rows = select
            .order_by_asc(city::Column::Id)
            .offset(page.offset())
            .limit(page.limit())
            .all(self.db)
            .await?;
        Ok(rows.into_iter().filter_map(with_country).collect())
    }

    async fn find_by_name_in_country(
        &self,
        name: &str,
        country_id: i32,
    ) -> AppResult<Option<City>> {
        self.first_where(
            sea_orm::Condition::all()
                .add(equals_ci((city::Entity, city::Column::Name), name.trim()))
                .add(city::Column::CountryId.eq(country_id)),
        )
        .await
    }

    async fn find_by_name(&self, name: &str) -> AppResult<Option<City>> {
        self.first_where(
            sea_orm::Condition::all().add(equals_ci((city::Entity, city::Column::Name), name.trim())),
        )
        .await
    }

    async fn create(&self, input: &CityInput) -> AppResult<City> {
        let model = city::ActiveModel {
            name: Set(input.name.trim().to_string()),
            country_id: Set(input.country_id),
            ..Default::default()
        };
        let inserted = self.insert_model(model).await?;
        self.reload(inserted.id).await
    }

    async fn update(&self, id: i32, changes: &CityPatch) -> AppResult<Option<City>> {
        let Some(existing) = self.find_model(id).await? else {
            return Ok(None);
        };

        let mut active: city::ActiveModel = existing.into();
        if let Some(name) = &changes.name {
            active.name = Set(name.trim().to_string());
        }
        if let Some(country_id) = changes.country_id {
            active.country_id = Set(country_id);
        }
        if active.is_changed() {
            self.update_model(active).await?;
        }

        self.reload(id).await.map(Some)
    }

    async fn delete(&self, id: i32) -> AppResult<bool> {
        self.delete_model(id).await
    }

    async fn has_hotels(&self, id: i32) -> AppResult<bool> {
        let count = hotel::Entity::find()
            .filter(hotel::Column::CityId.eq(id))
            .count(self.db)
            .await?;
        Ok(count > 0)
    }
}
