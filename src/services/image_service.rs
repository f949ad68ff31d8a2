//! Image service

use async_trait::async_trait;
use std::sync::Arc;

use crate::domain::{Image, ImageFilter, ImageInput, ImagePatch};
use crate::errors::{AppError, AppResult, OptionExt};
use crate::infra::{Repositories, UnitOfWork};
use crate::types::PaginationParams;

#[cfg(any(test, feature = "test-utils"))]
use mockall::automock;

#[cfg_attr(any(test, feature = "test-utils"), automock)]
#[async_trait]
pub trait ImageService: Send + Sync {
    async fn list(&self, filter: ImageFilter, page: PaginationParams) -> AppResult<Vec<Image>>;

    async fn get(&self, id: i32) -> AppResult<Image>;

    async fn create(&self, input: ImageInput) -> AppResult<Image>;

    async fn update(&self, id: i32, patch: ImagePatch) -> AppResult<Image>;

    async fn delete(&self, id: i32) -> AppResult<()>;
}

pub struct ImageManager<U: UnitOfWork> {
    uow: Arc<U>,
}

impl<U: UnitOfWork> ImageManager<U> {
    pub fn new(uow: Arc<U>) -> Self {
        Self { uow }
    }
}

async fn ensure_hotel_exists(repos: &dyn Repositories, hotel_id: i32) -> AppResult<()> {
    if repos.hotels().exists(hotel_id).await? {
        Ok(())
    } else {
        Err(AppError::not_found("Hotel"))
    }
}

#[async_trait]
impl<U: UnitOfWork> ImageService for ImageManager<U> {
    async fn list(&self, filter: ImageFilter, page: PaginationParams) -> AppResult<Vec<Image>> {
        self.uow.repos().images().list(&filter, &page).await
    }

    async fn get(&self, id: i32) -> AppResult<Image> {
        self.uow.repos().images().find_by_id(id).await?.ok_or_not_found("Image")
    }

    async fn create(&self, input: ImageInput) -> AppResult<Image> {
        self.uow
            .transaction(move |tx| {
                Box::pin(async move {
                    ensure_hotel_exists(&*tx, input.hotel_id).await?;
                    tx.images().create(&input).await
                })
            })
            .await
    }

    async fn update(&self, id: i32, patch: ImagePatch) -> AppResult<Image> {
        self.uow
            .transaction(move |tx| {
                Box::pin(async move {
                    let existing = tx.images().find_by_id(id).await?.ok_or_not_found("Image")?;
                    if patch.is_empty() {
                        return Ok(existing);
                    }
                    if let Some(hotel_id) = patch.hotel_id.filter(|&h| h != existing.hotel_id) {
                        ensure_hotel_exists(&*tx, hotel_id).await?;
                    }
                    tx.images().update(id, &patch).await?.ok_or_not_found("Image")
                })
            })
            .await
    }

    async fn delete(&self, id: i32) -> AppResult<()> {
        if !self.uow.repos().images().delete(id).await? {
            return Err(AppError::not_found("Image"));
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::infra::unit_of_work::testing::{TestRepositories, TestUnitOfWork};

    fn service(repos: TestRepositories) -> ImageManager<TestUnitOfWork> {
        ImageManager::new(Arc::new(TestUnitOfWork::from(repos)))
    }

    #[tokio::test]
    async fn image_needs_an_existing_hotel() {
        let mut repos = TestRepositories::default();
        repos.hotels.expect_exists().returning(|_| Ok(false));
        repos.images.expect_create().never();

        let result = service(repos)
            .create(ImageInput {
                hotel_id: 42,
                url: "https://cdn.example.com/lobby.jpg".into(),
                description: None,
            })
            .await;

        assert!(matches!(result, Err(AppError::NotFound(entity)) if entity == "Hotel"));
    }

    #[tokio::test]
    async fn clearing_the_description_does_not_recheck_the_hotel() {
        let existing = Image {
            id: 1,
            hotel_id: 2,
            url: "https://cdn.example.com/pool.jpg".into(),
            description: Some("Pool".into()),
        };
        let mut repos = TestRepositories::default();
        let found = existing.clone();
        repos
            .images
            .expect_find_by_id()
            .returning(move |_| Ok(Some(found.clone())));
        repos.hotels.expect_exists().never();
        repos.images.expect_update().returning(move |_, _| {
            Ok(Some(Image {
                description: None,
                ..existing.clone()
            }))
        });

        let patch: ImagePatch = serde_json::from_str(r#"{"description": null}"#).unwrap();
        let image = service(repos).update(1, patch).await.unwrap();
        assert_eq!(image.description, None);
    }
}
