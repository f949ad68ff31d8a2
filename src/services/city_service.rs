//! City service - country existence and `(name, country)` uniqueness.

use async_trait::async_trait;
use std::sync::Arc;

use crate::domain::{City, CityFilter, CityInput, CityPatch};
use crate::errors::{AppError, AppResult, OptionExt};
use crate::infra::{Repositories, UnitOfWork};
use crate::types::PaginationParams;

#[cfg(any(test, feature = "test-utils"))]
use mockall::automock;

#[cfg_attr(any(test, feature = "test-utils"), automock)]
#[async_trait]
pub trait CityService: Send + Sync {
    async fn list(&self, filter: CityFilter, page: PaginationParams) -> AppResult<Vec<City>>;

    async fn get(&self, id: i32) -> AppResult<City>;

    async fn create(&self, input: CityInput) -> AppResult<City>;

    async fn update(&self, id: i32, patch: CityPatch) -> AppResult<City>;

    /// Refused while hotels are located in the city
    async fn delete(&self, id: i32) -> AppResult<()>;
}

pub struct CityManager<U: UnitOfWork> {
    uow: Arc<U>,
}

impl<U: UnitOfWork> CityManager<U> {
    pub fn new(uow: Arc<U>) -> Self {
        Self { uow }
    }
}

async fn ensure_country_exists(repos: &dyn Repositories, country_id: i32) -> AppResult<()> {
    repos
        .countries()
        .find_by_id(country_id)
        .await?
        .ok_or_not_found("Country")
        .map(|_| ())
}

async fn ensure_name_free(
    repos: &dyn Repositories,
    name: &str,
    country_id: i32,
    own_id: Option<i32>,
) -> AppResult<()> {
    match repos.cities().find_by_name_in_country(name.trim(), country_id).await? {
        Some(other) if Some(other.id) != own_id => Err(AppError::conflict(format!(
            "City '{}' already exists in {}",
            other.name, other.country.name
        ))),
        _ => Ok(()),
    }
}

#[async_trait]
impl<U: UnitOfWork> CityService for CityManager<U> {
    async fn list(&self, filter: CityFilter, page: PaginationParams) -> AppResult<Vec<City>> {
        self.uow.repos().cities().list(&filter, &page).await
    }

    async fn get(&self, id: i32) -> AppResult<City> {
        self.uow.repos().cities().find_by_id(id).await?.ok_or_not_found("City")
    }

    async fn create(&self, input: CityInput) -> AppResult<City> {
        self.uow
            .transaction(move |tx| {
                Box::pin(async move {
                    ensure_country_exists(&*tx, input.country_id).await?;
                    ensure_name_free(&*tx, &input.name, input.country_id, None).await?;
                    let city = tx.cities().create(&input).await?;
                    tracing::info!(city_id = city.id, "City created");
                    Ok(city)
                })
            })
            .await
    }

    async fn update(&self, id: i32, patch: CityPatch) -> AppResult<City> {
        self.uow
            .transaction(move |tx| {
                Box::pin(async move {
                    let existing = tx.cities().find_by_id(id).await?.ok_or_not_found("City")?;
                    if patch.is_empty() {
                        return Ok(existing);
                    }

                    let country_id = patch.country_id.unwrap_or(existing.country.id);
                    if country_id != existing.country.id {
                        ensure_country_exists(&*tx, country_id).await?;
                    }

                    let name = patch.name.as_deref().unwrap_or(&existing.name);
                    let renamed = name.trim().to_lowercase() != existing.name.to_lowercase();
                    if renamed || country_id != existing.country.id {
                        ensure_name_free(&*tx, name, country_id, Some(id)).await?;
                    }

                    tx.cities().update(id, &patch).await?.ok_or_not_found("City")
                })
            })
            .await
    }

    async fn delete(&self, id: i32) -> AppResult<()> {
        self.uow
            .transaction(move |tx| {
                Box::pin(async move {
                    tx.cities().find_by_id(id).await?.ok_or_not_found("City")?;
                    if tx.cities().has_hotels(id).await? {
                        return Err(AppError::bad_request(
                            "City still has hotels; delete them first",
                        ));
                    }
                    tx.cities().delete(id).await?;
                    tracing::info!(city_id = id, "City deleted");
                    Ok(())
                })
            })
            .await
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::Country;
    use crate::infra::unit_of_work::testing::{TestRepositories, TestUnitOfWork};

    fn country(id: i32) -> Country {
        Country {
            id,
            name: "Russia".into(),
            iso_code: "RU".into(),
        }
    }

    fn kazan() -> City {
        City {
            id: 3,
            name: "Kazan".into(),
            country: country(1),
        }
    }

    fn service(repos: TestRepositories) -> CityManager<TestUnitOfWork> {
        CityManager::new(Arc::new(TestUnitOfWork::from(repos)))
    }

    #[tokio::test]
    async fn create_requires_the_country() {
        let mut repos = TestRepositories::default();
        repos.countries.expect_find_by_id().returning(|_| Ok(None));
        repos.cities.expect_create().never();

        let result = service(repos)
            .create(CityInput {
                name: "Kazan".into(),
                country_id: 9,
            })
            .await;

        assert!(matches!(result, Err(AppError::NotFound(entity)) if entity == "Country"));
    }

    #[tokio::test]
    async fn create_rejects_a_duplicate_in_the_same_country() {
        let mut repos = TestRepositories::default();
        repos
            .countries
            .expect_find_by_id()
            .returning(|id| Ok(Some(country(id))));
        repos
            .cities
            .expect_find_by_name_in_country()
            .returning(|_, _| Ok(Some(kazan())));

        let result = service(repos)
            .create(CityInput {
                name: "kazan".into(),
                country_id: 1,
            })
            .await;

        assert!(matches!(result, Err(AppError::Conflict(_))));
    }

    #[tokio::test]
    async fn moving_to_another_country_rechecks_uniqueness_there() {
        let mut repos = TestRepositories::default();
        repos.cities.expect_find_by_id().returning(|_| Ok(Some(kazan())));
        repos
            .countries
            .expect_find_by_id()
            .returning(|id| Ok(Some(country(id))));
        repos
            .cities
            .expect_find_by_name_in_country()
            .withf(|name, country_id| name == "Kazan" && *country_id == 2)
            .returning(|_, _| Ok(None));
        repos
            .cities
            .expect_update()
            .returning(|_, _| Ok(Some(kazan())));

        let patch = CityPatch {
            name: None,
            country_id: Some(2),
        };
        assert!(service(repos).update(3, patch).await.is_ok());
    }

    #[tokio::test]
    async fn delete_with_hotels_is_a_bad_request() {
        let mut repos = TestRepositories::default();
        repos.cities.expect_find_by_id().returning(|_| Ok(Some(kazan())));
        repos.cities.expect_has_hotels().returning(|_| Ok(true));
        repos.cities.expect_delete().never();

        let result = service(repos).delete(3).await;
        assert!(matches!(result, Err(AppError::BadRequest(_))));
    }
}
