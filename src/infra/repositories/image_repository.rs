//! Hotel image persistence.

use async_trait::async_trait;
use sea_orm::{
    ActiveModelTrait, ColumnTrait, ConnectionTrait, EntityTrait, QueryFilter, QueryOrder, Set,
};

use super::base::{Connected, DeleteRepository, ReadRepository, WriteRepository};
use super::entities::image;
use crate::domain::{Image, ImageFilter, ImageInput, ImagePatch};
use crate::errors::AppResult;
use crate::types::PaginationParams;

#[cfg(any(test, feature = "test-utils"))]
use mockall::automock;

#[cfg_attr(any(test, feature = "test-utils"), automock)]
#[async_trait]
pub trait ImageRepository: Send + Sync {
    async fn find_by_id(&self, id: i32) -> AppResult<Option<Image>>;

    async fn list(&self, filter: &ImageFilter, page: &PaginationParams) -> AppResult<Vec<Image>>;

    async fn create(&self, input: &ImageInput) -> AppResult<Image>;

    async fn update(&self, id: i32, changes: &ImagePatch) -> AppResult<Option<Image>>;

    async fn delete(&self, id: i32) -> AppResult<bool>;
}

pub struct ImageStore<'a, C> {
    db: &'a C,
}

impl<'a, C> ImageStore<'a, C> {
    pub fn new(db: &'a C) -> Self {
        Self { db }
    }
}

impl<C: ConnectionTrait + Send + Sync> Connected for ImageStore<'_, C> {
    type Conn = C;

    fn db(&self) -> &C {
        self.db
    }
}

impl<C: ConnectionTrait + Send + Sync> ReadRepository<image::Entity> for ImageStore<'_, C> {}
impl<C: ConnectionTrait + Send + Sync> WriteRepository<image::ActiveModel> for ImageStore<'_, C> {}
impl<C: ConnectionTrait + Send + Sync> DeleteRepository<image::Entity> for ImageStore<'_, C> {}

#[async_trait]
impl<C: ConnectionTrait + Send + Sync> ImageRepository for ImageStore<'_, C> {
    async fn find_by_id(&self, id: i32) -> AppResult<Option<Image>> {
        Ok(self.find_model(id).await?.map(Image::from))
    }

    async fn list(&self, filter: &ImageFilter, page: &PaginationParams) -> AppResult<Vec<Image>> {
        let mut select = image::Entity::find();
        if let Some(hotel_id) = filter.hotel_id {
            select = select.filter(image::Column::HotelId.eq(hotel_id));
        }

        let rows = self
            .fetch_page(select.order_by_asc(image::Column::Id), page)
            .await?;
        Ok(rows.into_iter().map(Image::from).collect())
    }

    async fn create(&self, input: &ImageInput) -> AppResult<Image> {
        let model = image::ActiveModel {
            hotel_id: Set(input.hotel_id),
            url: Set(input.url.trim().to_string()),
            description: Set(input.description.clone()),
            ..Default::default()
        };
        Ok(self.insert_model(model).await?.into())
    }

    async fn update(&self, id: i32, changes: &ImagePatch) -> AppResult<Option<Image>> {
        let Some(existing) = self.find_model(id).await? else {
            return Ok(None);
        };

        let mut active: image::ActiveModel = existing.clone().into();
        if let Some(hotel_id) = changes.hotel_id {
            active.hotel_id = Set(hotel_id);
        }
        if let Some(url) = &changes.url {
            active.url = Set(url.trim().to_string());
        }
        if let Some(description) = &changes.description {
            active.description = Set(description.clone());
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
