//! Hotel persistence.
//!
//! Hotels are listed together with their city and country names and
//! their facilities; those are loaded in two follow-up queries per page
//! rather than per hotel.

use std::collections::HashMap;

use async_trait::async_trait;
use sea_orm::{
    ActiveModelTrait, ColumnTrait, ConnectionTrait, EntityTrait, QueryFilter, QueryOrder,
    QuerySelect, Set,
};

use super::base::{
    contains_ci, filter_term, Connected, DeleteRepository, ReadRepository, WriteRepository,
};
use super::entities::{city, country, facility, hotel, hotel_facility};
use super::mappers::{group_facilities, hotel_from, Location};
use crate::domain::{Hotel, HotelChanges, HotelFilter, NewHotel};
use crate::errors::{AppError, AppResult};
use crate::types::PaginationParams;

#[cfg(any(test, feature = "test-utils"))]
use mockall::automock;

#[cfg_attr(any(test, feature = "test-utils"), automock)]
#[async_trait]
pub trait HotelRepository: Send + Sync {
    async fn find_by_id(&self, id: i32) -> AppResult<Option<Hotel>>;

    async fn exists(&self, id: i32) -> AppResult<bool>;

    async fn list(&self, filter: &HotelFilter, page: &PaginationParams) -> AppResult<Vec<Hotel>>;

    async fn create(&self, hotel: &NewHotel) -> AppResult<Hotel>;

    async fn update(&self, id: i32, changes: &HotelChanges) -> AppResult<Option<Hotel>>;

    /// Removes the hotel with its rooms, images and facility links
    async fn delete(&self, id: i32) -> AppResult<bool>;

    /// Replace the hotel's facility links with exactly `facility_ids`
    async fn set_facilities(&self, hotel_id: i32, facility_ids: &[i32]) -> AppResult<()>;
}

pub struct HotelStore<'a, C> {
    db: &'a C,
}

impl<'a, C> HotelStore<'a, C> {
    pub fn new(db: &'a C) -> Self {
        Self { db }
    }
}

impl<C: ConnectionTrait + Send + Sync> Connected for HotelStore<'_, C> {
    type Conn = C;

    fn db(&self) -> &C {
        self.db
    }
}

impl<C: ConnectionTrait + Send + Sync> ReadRepository<hotel::Entity> for HotelStore<'_, C> {}
impl<C: ConnectionTrait + Send + Sync> WriteRepository<hotel::ActiveModel> for HotelStore<'_, C> {}
impl<C: ConnectionTrait + Send + Sync> DeleteRepository<hotel::Entity> for HotelStore<'_, C> {}

impl<C: ConnectionTrait + Send + Sync> HotelStore<'_, C> {
    /// Attach location names and facilities to hotel rows, keeping row order.
    async fn assemble(&self, rows: Vec<(hotel::Model, Option<city::Model>)>) -> AppResult<Vec<Hotel>> {
        if rows.is_empty() {
            return Ok(Vec::new());
        }

        let country_ids: Vec<i32> = rows
            .iter()
            .filter_map(|(_, city)| city.as_ref().map(|c| c.country_id))
            .collect();
        let countries: HashMap<i32, String> = country::Entity::find()
            .filter(country::Column::Id.is_in(country_ids))
            .all(self.db)
            .await?
            .into_iter()
            .map(|c| (c.id, c.name))
            .collect();

        let hotel_ids: Vec<i32> = rows.iter().map(|(h, _)| h.id).collect();
        let links = hotel_facility::Entity::find()
            .filter(hotel_facility::Column::HotelId.is_in(hotel_ids))
            .find_also_related(facility::Entity)
            .all(self.db)
            .await?;
        let mut facilities =
            group_facilities(links.into_iter().map(|(link, f)| (link.hotel_id, f)));

        Ok(rows
            .into_iter()
            .map(|(hotel, city)| {
                let location = city
                    .map(|c| Location {
                        country: countries.get(&c.country_id).cloned().unwrap_or_default(),
                        city: c.name,
                    })
                    .unwrap_or_default();
                let hotel_facilities = facilities.remove(&hotel.id).unwrap_or_default();
                hotel_from(hotel, location, hotel_facilities)
            })
            .collect())
    }

    async fn reload(&self, id: i32) -> AppResult<Hotel> {
        self.find_by_id(id)
            .await?
            .ok_or_else(|| AppError::internal(format!("Hotel {id} vanished after write")))
    }
}

#[async_trait]
impl<C: ConnectionTrait + Send + Sync> HotelRepository for HotelStore<'_, C> {
    async fn find_by_id(&self, id: i32) -> AppResult<Option<Hotel>> {
        let Some(row) = hotel::Entity::find_by_id(id)
            .find_also_related(city::Entity)
            .one(self.db)
            .await?
        else {
            return Ok(None);
        };
        Ok(self.assemble(vec![row]).await?.pop())
    }

    async fn exists(&self, id: i32) -> AppResult<bool> {
        Ok(self.find_model(id).await?.is_some())
    }

    async fn list(&self, filter: &HotelFilter, page: &PaginationParams) -> AppResult<Vec<Hotel>> {
        let mut select = hotel::Entity::find().find_also_related(city::Entity);
        if let Some(title) = filter_term(&filter.title) {
            select = select.filter(contains_ci((hotel::Entity, hotel::Column::Title), title));
        }
        if let Some(address) = filter_term(&filter.address) {
            select = select.filter(contains_ci((hotel::Entity, hotel::Column::Address), address));
        }
        if let Some(city_name) = filter_term(&filter.city) {
            select = select.filter(contains_ci((city::Entity, city::Column::Name), city_name));
        }
        if let Some(city_id) = filter.city_id {
            select = select.filter(hotel::Column::CityId.eq(city_id));
        }

        let rows = select
            .order_by_asc(hotel::Column::Id)
            .offset(page.offset())
            .limit(page.limit())
            .all(self.db)
            .await?;
        self.assemble(rows).await
    }

    async fn create(&self, new: &NewHotel) -> AppResult<Hotel> {
        let model = hotel::ActiveModel {
            title: Set(new.title.trim().to_string()),
            address: Set(new.address.trim().to_string()),
            postal_code: Set(new.postal_code.clone()),
            city_id: Set(new.city_id),
            check_in_time: Set(new.check_in_time),
            check_out_time: Set(new.check_out_time),
            ..Default::default()
        };
        let inserted = self.insert_model(model).await?;
        self.reload(inserted.id).await
    }

    async fn update(&self, id: i32, changes: &HotelChanges) -> AppResult<Option<Hotel>> {
        let Some(existing) = self.find_model(id).await? else {
            return Ok(None);
        };

        let mut active: hotel::ActiveModel = existing.into();
        if let Some(title) = &changes.title {
            active.title = Set(title.trim().to_string());
        }
        if let Some(address) = &changes.address {
            active.address = Set(address.trim().to_string());
        }
        if let Some(postal_code) = &changes.postal_code {
            active.postal_code = Set(postal_code.clone());
        }
        if let Some(city_id) = changes.city_id {
            active.city_id = Set(city_id);
        }
        if let Some(check_in) = changes.check_in_time {
            active.check_in_time = Set(check_in);
        }
        if let Some(check_out) = changes.check_out_time {
            active.check_out_time = Set(check_out);
        }
        if active.is_changed() {
            self.update_model(active).await?;
        }

        self.reload(id).await.map(Some)
    }

    async fn delete(&self, id: i32) -> AppResult<bool> {
        self.delete_model(id).await
    }

    async fn set_facilities(&self, hotel_id: i32, facility_ids: &[i32]) -> AppResult<()> {
        hotel_facility::Entity::delete_many()
            .filter(hotel_facility::Column::HotelId.eq(hotel_id))
            .exec(self.db)
            .await?;

        if facility_ids.is_empty() {
            return Ok(());
        }

        let links = facility_ids.iter().map(|&facility_id| hotel_facility::ActiveModel {
            hotel_id: Set(hotel_id),
            facility_id: Set(facility_id),
        });
        hotel_facility::Entity::insert_many(links)
            .exec_without_returning(self.db)
            .await?;
        Ok(())
    }
}
