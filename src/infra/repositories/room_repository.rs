//! Room persistence, including the availability filter.

use async_trait::async_trait;
use chrono::NaiveDate;
use sea_orm::{
    sea_query::Query, ActiveModelTrait, ColumnTrait, ConnectionTrait, EntityTrait, PaginatorTrait,
    QueryFilter, QueryOrder, Set,
};

use super::booking_repository::shares_a_night;
use super::base::{
    contains_ci, filter_term, Connected, DeleteRepository, ReadRepository, WriteRepository,
};
use super::entities::{booking, facility, room, room_facility};
use super::mappers::{group_facilities, room_from};
use crate::domain::{Room, RoomFilter, RoomInput, RoomPatch};
use crate::errors::{AppError, AppResult};
use crate::types::PaginationParams;

#[cfg(any(test, feature = "test-utils"))]
use mockall::automock;

#[cfg_attr(any(test, feature = "test-utils"), automock)]
#[async_trait]
pub trait RoomRepository: Send + Sync {
    async fn find_by_id(&self, id: i32) -> AppResult<Option<Room>>;

    /// The room, only if it belongs to `hotel_id`
    async fn find_in_hotel(&self, hotel_id: i32, id: i32) -> AppResult<Option<Room>>;

    /// Rooms of a hotel; with both filter dates set, only rooms with no
    /// booking overlapping that stay
    async fn list(
        &self,
        hotel_id: i32,
        filter: &RoomFilter,
        page: &PaginationParams,
    ) -> AppResult<Vec<Room>>;

    async fn create(&self, hotel_id: i32, input: &RoomInput) -> AppResult<Room>;

    async fn update(&self, id: i32, changes: &RoomPatch) -> AppResult<Option<Room>>;

    async fn delete(&self, id: i32) -> AppResult<bool>;

    async fn has_bookings(&self, id: i32) -> AppResult<bool>;

    async fn set_facilities(&self, room_id: i32, facility_ids: &[i32]) -> AppResult<()>;
}

pub struct RoomStore<'a, C> {
    db: &'a C,
}

impl<'a, C> RoomStore<'a, C> {
    pub fn new(db: &'a C) -> Self {
        Self { db }
    }
}

impl<C: ConnectionTrait + Send + Sync> Connected for RoomStore<'_, C> {
    type Conn = C;

    fn db(&self) -> &C {
        self.db
    }
}

impl<C: ConnectionTrait + Send + Sync> ReadRepository<room::Entity> for RoomStore<'_, C> {}
impl<C: ConnectionTrait + Send + Sync> WriteRepository<room::ActiveModel> for RoomStore<'_, C> {}
impl<C: ConnectionTrait + Send + Sync> DeleteRepository<room::Entity> for RoomStore<'_, C> {}

/// `room.id NOT IN (rooms booked for any night of [from, to))`
fn free_between(date_from: NaiveDate, date_to: NaiveDate) -> sea_orm::sea_query::SimpleExpr {
    room::Column::Id.not_in_subquery(
        Query::select()
            .column(booking::Column::RoomId)
            .from(booking::Entity)
            .and_where(shares_a_night(date_from, date_to))
            .to_owned(),
    )
}

impl<C: ConnectionTrait + Send + Sync> RoomStore<'_, C> {
    async fn assemble(&self, rows: Vec<room::Model>) -> AppResult<Vec<Room>> {
        if rows.is_empty() {
            return Ok(Vec::new());
        }

        let room_ids: Vec<i32> = rows.iter().map(|r| r.id).collect();
        let links = room_facility::Entity::find()
            .filter(room_facility::Column::RoomId.is_in(room_ids))
            .find_also_related(facility::Entity)
            .all(self.db)
            .await?;
        let mut facilities =
            group_facilities(links.into_iter().map(|(link, f)| (link.room_id, f)));

        Ok(rows
            .into_iter()
            .map(|room| {
                let room_facilities = facilities.remove(&room.id).unwrap_or_default();
                room_from(room, room_facilities)
            })
            .collect())
    }

    async fn reload(&self, id: i32) -> AppResult<Room> {
        self.find_by_id(id)
            .await?
            .ok_or_else(|| AppError::internal(format!("Room {id} vanished after write")))
    }
}

#[async_trait]
impl<C: ConnectionTrait + Send + Sync> RoomRepository for RoomStore<'_, C> {
    async fn find_by_id(&self, id: i32) -> AppResult<Option<Room>> {
        let Some(row) = self.find_model(id).await? else {
            return Ok(None);
        };
        Ok(self.assemble(vec![row]).await?.pop())
    }

    async fn find_in_hotel(&self, hotel_id: i32, id: i32) -> AppResult<Option<Room>> {
        let row = room::Entity::find_by_id(id)
            .filter(room::Column::HotelId.eq(hotel_id))
            .one(self.db)
            .await?;
        match row {
            Some(row) => Ok(self.assemble(vec![row]).await?.pop()),
            None => Ok(None),
        }
    }

    async fn list(
        &self,
        hotel_id: i32,
        filter: &RoomFilter,
        page: &PaginationParams,
    ) -> AppResult<Vec<Room>> {
        let mut select = room::Entity::find().filter(room::Column::HotelId.eq(hotel_id));
        if let Some(title) = filter_term(&filter.title) {
            select = select.filter(contains_ci((room::Entity, room::Column::Title), title));
        }
        if let Some((date_from, date_to)) = filter.stay() {
            select = select.filter(free_between(date_from, date_to));
        }

        let rows = self
            .fetch_page(select.order_by_asc(room::Column::Id), page)
            .await?;
        self.assemble(rows).await
    }

    async fn create(&self, hotel_id: i32, input: &RoomInput) -> AppResult<Room> {
        let model = room::ActiveModel {
            hotel_id: Set(hotel_id),
            title: Set(input.title.trim().to_string()),
            description: Set(input.description.clone()),
            price_per_night: Set(input.price_per_night),
            capacity: Set(input.capacity),
            ..Default::default()
        };
        let inserted = self.insert_model(model).await?;
        self.reload(inserted.id).await
    }

    async fn update(&self, id: i32, changes: &RoomPatch) -> AppResult<Option<Room>> {
        let Some(existing) = self.find_model(id).await? else {
            return Ok(None);
        };

        let mut active: room::ActiveModel = existing.into();
        if let Some(title) = &changes.title {
            active.title = Set(title.trim().to_string());
        }
        if let Some(description) = &changes.description {
            active.description = Set(description.clone());
        }
        if let Some(price) = changes.price_per_night {
            active.price_per_night = Set(price);
        }
        if let Some(capacity) = changes.capacity {
            active.capacity = Set(capacity);
        }
        if active.is_changed() {
            self.update_model(active).await?;
        }

        self.reload(id).await.map(Some)
    }

    async fn delete(&self, id: i32) -> AppResult<bool> {
        self.delete_model(id).await
    }

    async fn has_bookings(&self, id: i32) -> AppResult<bool> {
        let count = booking::Entity::find()
            .filter(booking::Column::RoomId.eq(id))
            .count(self.db)
            .await?;
        Ok(count > 0)
    }

    async fn set_facilities(&self, room_id: i32, facility_ids: &[i32]) -> AppResult<()> {
        room_facility::Entity::delete_many()
            .filter(room_facility::Column::RoomId.eq(room_id))
            .exec(self.db)
            .await?;

        if facility_ids.is_empty() {
            return Ok(());
        }

        let links = facility_ids.iter().map(|&facility_id| room_facility::ActiveModel {
            room_id: Set(room_id),
            facility_id: Set(facility_id),
        });
        room_facility::Entity::insert_many(links)
            .exec_without_returning(self.db)
            .await?;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use sea_orm::{DbBackend, QueryTrait};

    fn day(d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(2025, 7, d).unwrap()
    }

    #[test]
    fn free_rooms_exclude_any_booking_sharing_a_night() {
        let sql = room::Entity::find()
            .filter(free_between(day(1), day(5)))
            .build(DbBackend::Postgres)
            .to_string();

        assert!(sql.contains(r#""rooms"."id" NOT IN (SELECT "room_id" FROM "bookings""#), "{sql}");
        assert!(sql.contains(r#""bookings"."date_from" < '2025-07-05'"#), "{sql}");
        assert!(sql.contains(r#""bookings"."date_to" > '2025-07-01'"#), "{sql}");
        assert!(!sql.contains("<="), "{sql}");
    }
}
