//! Facility persistence.

use async_trait::async_trait;
use sea_orm::{
    ActiveModelTrait, ColumnTrait, ConnectionTrait, EntityTrait, QueryFilter, QueryOrder,
    QuerySelect, Set,
};

use super::base::{
    contains_ci, equals_ci, filter_term, Connected, DeleteRepository, ReadRepository,
    WriteRepository,
};
use super::entities::facility;
use crate::domain::{Facility, FacilityFilter, FacilityInput, FacilityPatch};
use crate::errors::AppResult;
use crate::types::PaginationParams;

#[cfg(any(test, feature = "test-utils"))]
use mockall::automock;

#[cfg_attr(any(test, feature = "test-utils"), automock)]
#[async_trait]
pub trait FacilityRepository: Send + Sync {
    async fn find_by_id(&self, id: i32) -> AppResult<Option<Facility>>;

    async fn list(&self, filter: &FacilityFilter, page: &PaginationParams)
        -> AppResult<Vec<Facility>>;

    /// Case-insensitive exact name match
    async fn find_by_name(&self, name: &str) -> AppResult<Option<Facility>>;

    /// Ids from `ids` that match no facility, in input order
    async fn find_missing(&self, ids: &[i32]) -> AppResult<Vec<i32>>;

    async fn create(&self, input: &FacilityInput) -> AppResult<Facility>;

    async fn update(&self, id: i32, changes: &FacilityPatch) -> AppResult<Option<Facility>>;

    async fn delete(&self, id: i32) -> AppResult<bool>;
}

pub struct FacilityStore<'a, C> {
    db: &'a C,
}

impl<'a, C> FacilityStore<'a, C> {
    pub fn new(db: &'a C) -> Self {
        Self { db }
    }
}

impl<C: ConnectionTrait + Send + Sync> Connected for FacilityStore<'_, C> {
    type Conn = C;

    fn db(&self) -> &C {
        self.db
    }
}

impl<C: ConnectionTrait + Send + Sync> ReadRepository<facility::Entity> for FacilityStore<'_, C> {}
impl<C: ConnectionTrait + Send + Sync> WriteRepository<facility::ActiveModel> for FacilityStore<'_, C> {}
impl<C: ConnectionTrait + Send + Sync> DeleteRepository<facility::Entity> for FacilityStore<'_, C> {}

#[async_trait]
impl<C: ConnectionTrait + Send + Sync> FacilityRepository for FacilityStore<'_, C> {
    async fn find_by_id(&self, id: i32) -> AppResult<Option<Facility>> {
        Ok(self.find_model(id).await?.map(Facility::from))
    }

    async fn list(
        &self,
        filter: &FacilityFilter,
        page: &PaginationParams,
    ) -> AppResult<Vec<Facility>> {
        let mut select = facility::Entity::find();
        if let Some(name) = filter_term(&filter.name) {
            select = select.filter(contains_ci((facility::Entity, facility::Column::Name), name));
        }

        let rows = self
            .fetch_page(select.order_by_asc(facility::Column::Id), page)
            .await?;
        Ok(rows.into_iter().map(Facility::from).collect())
    }

    async fn find_by_name(&self, name: &str) -> AppResult<Option<Facility>> {
        let row = facility::Entity::find()
            .filter(equals_ci((facility::Entity, facility::Column::Name), name.trim()))
            .one(self.db)
            .await?;
        Ok(row.map(Facility::from))
    }

    async fn find_missing(&self, ids: &[i32]) -> AppResult<Vec<i32>> {
        if ids.is_empty() {
            return Ok(Vec::new());
        }

        let found: Vec<i32> = facility::Entity::find()
            .select_only()
            .column(facility::Column::Id)
            .filter(facility::Column::Id.is_in(ids.iter().copied()))
            .into_tuple()
            .all(self.db)
            .await?;

        Ok(ids.iter().copied().filter(|id| !found.contains(id)).collect())
    }

    async fn create(&self, input: &FacilityInput) -> AppResult<Facility> {
        let model = facility::ActiveModel {
            name: Set(input.name.trim().to_string()),
            ..Default::default()
        };
        Ok(self.insert_model(model).await?.into())
    }

    async fn update(&self, id: i32, changes: &FacilityPatch) -> AppResult<Option<Facility>> {
        let Some(existing) = self.find_model(id).await? else {
            return Ok(None);
        };

        let mut active: facility::ActiveModel = existing.clone().into();
        if let Some(name) = &changes.name {
            active.name = Set(name.trim().to_string());
        }
        if !active.is_changed() {
            return Ok(Some(existing.into()));
        }

        Ok(Some(self.update_model(active).await?.into()))
    }

    async fn delete(&self, id: i32) -> AppResult<bool> {
        self.delete_model(id).await
    }
}
