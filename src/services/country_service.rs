//! Country service - name and ISO code uniqueness, delete protection.

use async_trait::async_trait;
use std::sync::Arc;

use crate::domain::country::normalize_iso_code;
use crate::domain::{Country, CountryFilter, CountryInput, CountryPatch};
use crate::errors::{AppError, AppResult, OptionExt};
use crate::infra::{Repositories, UnitOfWork};
use crate::types::PaginationParams;

#[cfg(any(test, feature = "test-utils"))]
use mockall::automock;

#[cfg_attr(any(test, feature = "test-utils"), automock)]
#[async_trait]
pub trait CountryService: Send + Sync {
    async fn list(&self, filter: CountryFilter, page: PaginationParams) -> AppResult<Vec<Country>>;

    async fn get(&self, id: i32) -> AppResult<Country>;

    async fn create(&self, input: CountryInput) -> AppResult<Country>;

    /// Apply the present fields; PUT arrives here as a full patch
    async fn update(&self, id: i32, patch: CountryPatch) -> AppResult<Country>;

    /// Refused while the country still has cities
    async fn delete(&self, id: i32) -> AppResult<()>;
}

pub struct CountryManager<U: UnitOfWork> {
    uow: Arc<U>,
}

impl<U: UnitOfWork> CountryManager<U> {
    pub fn new(uow: Arc<U>) -> Self {
        Self { uow }
    }
}

async fn ensure_name_free(repos: &dyn Repositories, name: &str, own_id: Option<i32>) -> AppResult<()> {
    match repos.countries().find_by_name(name.trim()).await? {
        Some(other) if Some(other.id) != own_id => Err(AppError::conflict(format!(
            "Country with name '{}' already exists",
            other.name
        ))),
        _ => Ok(()),
    }
}

async fn ensure_iso_code_free(
    repos: &dyn Repositories,
    iso_code: &str,
    own_id: Option<i32>,
) -> AppResult<()> {
    match repos.countries().find_by_iso_code(iso_code).await? {
        Some(other) if Some(other.id) != own_id => Err(AppError::conflict(format!(
            "Country with ISO code '{}' already exists",
            other.iso_code
        ))),
        _ => Ok(()),
    }
}

#[async_trait]
impl<U: UnitOfWork> CountryService for CountryManager<U> {
    async fn list(&self, filter: CountryFilter, page: PaginationParams) -> AppResult<Vec<Country>> {
        self.uow.repos().countries().list(&filter, &page).await
    }

    async fn get(&self, id: i32) -> AppResult<Country> {
        self.uow
            .repos()
            .countries()
            .find_by_id(id)
            .await?
            .ok_or_not_found("Country")
    }

    async fn create(&self, input: CountryInput) -> AppResult<Country> {
        self.uow
            .transaction(move |tx| {
                Box::pin(async move {
                    ensure_name_free(&*tx, &input.name, None).await?;
                    ensure_iso_code_free(&*tx, &normalize_iso_code(&input.iso_code), None).await?;
                    let country = tx.countries().create(&input).await?;
                    tracing::info!(country_id = country.id, "Country created");
                    Ok(country)
                })
            })
            .await
    }

    async fn update(&self, id: i32, patch: CountryPatch) -> AppResult<Country> {
        self.uow
            .transaction(move |tx| {
                Box::pin(async move {
                    let existing = tx.countries().find_by_id(id).await?.ok_or_not_found("Country")?;
                    if patch.is_empty() {
                        return Ok(existing);
                    }

                    if let Some(name) = &patch.name {
                        if name.trim().to_lowercase() != existing.name.to_lowercase() {
                            ensure_name_free(&*tx, name, Some(id)).await?;
                        }
                    }
                    if let Some(iso_code) = &patch.iso_code {
                        let iso_code = normalize_iso_code(iso_code);
                        if iso_code != existing.iso_code {
                            ensure_iso_code_free(&*tx, &iso_code, Some(id)).await?;
                        }
                    }

                    tx.countries().update(id, &patch).await?.ok_or_not_found("Country")
                })
            })
            .await
    }

    async fn delete(&self, id: i32) -> AppResult<()> {
        self.uow
            .transaction(move |tx| {
                Box::pin(async move {
                    tx.countries().find_by_id(id).await?.ok_or_not_found("Country")?;
                    if tx.countries().has_cities(id).await? {
                        return Err(AppError::bad_request(
                            "Country still has cities; delete them first",
                        ));
                    }
                    tx.countries().delete(id).await?;
                    tracing::info!(country_id = id, "Country deleted");
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

    fn russia() -> Country {
        Country {
            id: 1,
            name: "Russia".into(),
            iso_code: "RU".into(),
        }
    }

    fn service(repos: TestRepositories) -> CountryManager<TestUnitOfWork> {
        CountryManager::new(Arc::new(TestUnitOfWork::from(repos)))
    }

    #[tokio::test]
    async fn create_rejects_a_taken_name() {
        let mut repos = TestRepositories::default();
        repos
            .countries
            .expect_find_by_name()
            .returning(|_| Ok(Some(russia())));
        repos.countries.expect_create().never();

        let result = service(repos)
            .create(CountryInput {
                name: "RUSSIA".into(),
                iso_code: "XX".into(),
            })
            .await;

        assert!(matches!(result, Err(AppError::Conflict(msg)) if msg.contains("name")));
    }

    #[tokio::test]
    async fn create_rejects_a_taken_iso_code() {
        let mut repos = TestRepositories::default();
        repos.countries.expect_find_by_name().returning(|_| Ok(None));
        repos
            .countries
            .expect_find_by_iso_code()
            .withf(|code| code == "RU")
            .returning(|_| Ok(Some(russia())));

        let result = service(repos)
            .create(CountryInput {
                name: "Rossiya".into(),
                iso_code: "ru".into(),
            })
            .await;

        assert!(matches!(result, Err(AppError::Conflict(msg)) if msg.contains("ISO code")));
    }

    #[tokio::test]
    async fn empty_patch_returns_the_country_unchanged() {
        let mut repos = TestRepositories::default();
        repos
            .countries
            .expect_find_by_id()
            .returning(|_| Ok(Some(russia())));
        repos.countries.expect_update().never();

        let country = service(repos).update(1, CountryPatch::default()).await.unwrap();
        assert_eq!(country, russia());
    }

    #[tokio::test]
    async fn renaming_to_the_same_name_skips_the_uniqueness_check() {
        let mut repos = TestRepositories::default();
        repos
            .countries
            .expect_find_by_id()
            .returning(|_| Ok(Some(russia())));
        repos.countries.expect_find_by_name().never();
        repos
            .countries
            .expect_update()
            .returning(|_, _| Ok(Some(russia())));

        let patch = CountryPatch {
            name: Some("russia".into()),
            iso_code: None,
        };
        assert!(service(repos).update(1, patch).await.is_ok());
    }

    #[tokio::test]
    async fn delete_with_cities_is_a_bad_request() {
        let mut repos = TestRepositories::default();
        repos
            .countries
            .expect_find_by_id()
            .returning(|_| Ok(Some(russia())));
        repos.countries.expect_has_cities().returning(|_| Ok(true));
        repos.countries.expect_delete().never();

        let result = service(repos).delete(1).await;
        assert!(matches!(result, Err(AppError::BadRequest(_))));
    }

    #[tokio::test]
    async fn missing_country_is_not_found() {
        let mut repos = TestRepositories::default();
        repos.countries.expect_find_by_id().returning(|_| Ok(None));

        let result = service(repos).get(404).await;
        assert!(matches!(result, Err(AppError::NotFound(entity)) if entity == "Country"));
    }
}
