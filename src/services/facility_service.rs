//! Facility service - unique names and facility id resolution for hotels
//! and rooms.

use async_trait::async_trait;
use std::sync::Arc;

use crate::domain::facility::dedup_ids;
use crate::domain::{Facility, FacilityFilter, FacilityInput, FacilityPatch};
use crate::errors::{AppError, AppResult, OptionExt};
use crate::infra::{Repositories, UnitOfWork};
use crate::types::PaginationParams;

#[cfg(any(test, feature = "test-utils"))]
use mockall::automock;

#[cfg_attr(any(test, feature = "test-utils"), automock)]
#[async_trait]
pub trait FacilityService: Send + Sync {
    async fn list(&self, filter: FacilityFilter, page: PaginationParams)
        -> AppResult<Vec<Facility>>;

    async fn get(&self, id: i32) -> AppResult<Facility>;

    async fn create(&self, input: FacilityInput) -> AppResult<Facility>;

    async fn update(&self, id: i32, patch: FacilityPatch) -> AppResult<Facility>;

    /// Also unlinks the facility from every hotel and room
    async fn delete(&self, id: i32) -> AppResult<()>;
}

pub struct FacilityManager<U: UnitOfWork> {
    uow: Arc<U>,
}

impl<U: UnitOfWork> FacilityManager<U> {
    pub fn new(uow: Arc<U>) -> Self {
        Self { uow }
    }
}

/// De-duplicate `ids` and make sure each names a facility.
pub(crate) async fn resolve_facility_ids(
    repos: &dyn Repositories,
    ids: &[i32],
) -> AppResult<Vec<i32>> {
    let ids = dedup_ids(ids);
    if ids.is_empty() {
        return Ok(ids);
    }

    let missing = repos.facilities().find_missing(&ids).await?;
    if !missing.is_empty() {
        let listed: Vec<String> = missing.iter().map(i32::to_string).collect();
        return Err(AppError::not_found(format!(
            "Facilities [{}]",
            listed.join(", ")
        )));
    }
    Ok(ids)
}

async fn ensure_name_free(repos: &dyn Repositories, name: &str, own_id: Option<i32>) -> AppResult<()> {
    match repos.facilities().find_by_name(name.trim()).await? {
        Some(other) if Some(other.id) != own_id => Err(AppError::conflict(format!(
            "Facility '{}' already exists",
            other.name
        ))),
        _ => Ok(()),
    }
}

#[async_trait]
impl<U: UnitOfWork> FacilityService for FacilityManager<U> {
    async fn list(
        &self,
        filter: FacilityFilter,
        page: PaginationParams,
    ) -> AppResult<Vec<Facility>> {
        self.uow.repos().facilities().list(&filter, &page).await
    }

    async fn get(&self, id: i32) -> AppResult<Facility> {
        self.uow
            .repos()
            .facilities()
            .find_by_id(id)
            .await?
            .ok_or_not_found("Facility")
    }

    async fn create(&self, input: FacilityInput) -> AppResult<Facility> {
        self.uow
            .transaction(move |tx| {
                Box::pin(async move {
                    ensure_name_free(&*tx, &input.name, None).await?;
                    tx.facilities().create(&input).await
                })
            })
            .await
    }

    async fn update(&self, id: i32, patch: FacilityPatch) -> AppResult<Facility> {
        self.uow
            .transaction(move |tx| {
                Box::pin(async move {
                    let existing = tx.facilities().find_by_id(id).await?.ok_or_not_found("Facility")?;
                    let Some(name) = &patch.name else {
                        return Ok(existing);
                    };
                    if name.trim().to_lowercase() != existing.name.to_lowercase() {
                        ensure_name_free(&*tx, name, Some(id)).await?;
                    }
                    tx.facilities().update(id, &patch).await?.ok_or_not_found("Facility")
                })
            })
            .await
    }

    async fn delete(&self, id: i32) -> AppResult<()> {
        let deleted = self.uow.repos().facilities().delete(id).await?;
        if !deleted {
            return Err(AppError::not_found("Facility"));
        }
        tracing::info!(facility_id = id, "Facility deleted");
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::infra::unit_of_work::testing::{TestRepositories, TestUnitOfWork};

    fn wifi() -> Facility {
        Facility {
            id: 1,
            name: "Wi-Fi".into(),
        }
    }

    #[tokio::test]
    async fn unknown_facility_ids_are_reported() {
        let mut repos = TestRepositories::default();
        repos
            .facilities
            .expect_find_missing()
            .withf(|ids| ids == [1, 5, 8])
            .returning(|_| Ok(vec![5, 8]));

        let result = resolve_facility_ids(&repos, &[8, 1, 5, 1]).await;
        assert!(matches!(result, Err(AppError::NotFound(msg)) if msg == "Facilities [5, 8]"));
    }

    #[tokio::test]
    async fn empty_facility_list_skips_the_lookup() {
        let mut repos = TestRepositories::default();
        repos.facilities.expect_find_missing().never();

        assert!(resolve_facility_ids(&repos, &[]).await.unwrap().is_empty());
    }

    #[tokio::test]
    async fn duplicate_name_conflicts() {
        let mut repos = TestRepositories::default();
        repos
            .facilities
            .expect_find_by_name()
            .returning(|_| Ok(Some(wifi())));
        repos.facilities.expect_create().never();

        let service = FacilityManager::new(Arc::new(TestUnitOfWork::from(repos)));
        let result = service
            .create(FacilityInput {
                name: "wi-fi".into(),
            })
            .await;

        assert!(matches!(result, Err(AppError::Conflict(_))));
    }

    #[tokio::test]
    async fn deleting_a_missing_facility_is_not_found() {
        let mut repos = TestRepositories::default();
        repos.facilities.expect_delete().returning(|_| Ok(false));

        let service = FacilityManager::new(Arc::new(TestUnitOfWork::from(repos)));
        assert!(matches!(service.delete(7).await, Err(AppError::NotFound(_))));
    }
}
