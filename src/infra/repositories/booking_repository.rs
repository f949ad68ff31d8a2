//! Booking persistence.

use async_trait::async_trait;
use chrono::NaiveDate;
use sea_orm::{
    sea_query::SimpleExpr, ColumnTrait, ConnectionTrait, EntityTrait, PaginatorTrait, QueryFilter,
    QueryOrder, Select, Set,
};

use super::base::{Connected, DeleteRepository, ReadRepository, WriteRepository};
use super::entities::booking;
use crate::domain::{Booking, NewBooking};
use crate::errors::AppResult;
use crate::types::PaginationParams;

#[cfg(any(test, feature = "test-utils"))]
use mockall::automock;

#[cfg_attr(any(test, feature = "test-utils"), automock)]
#[async_trait]
pub trait BookingRepository: Send + Sync {
    async fn find_by_id(&self, id: i32) -> AppResult<Option<Booking>>;

    /// All bookings, or only one user's when `user_id` is set
    async fn list(&self, user_id: Option<i32>, page: &PaginationParams)
        -> AppResult<Vec<Booking>>;

    /// Bookings of `room_id` sharing a night with `[date_from, date_to)`,
    /// not counting `exclude_id`
    async fn count_overlapping(
        &self,
        room_id: i32,
        date_from: NaiveDate,
        date_to: NaiveDate,
        exclude_id: Option<i32>,
    ) -> AppResult<u64>;

    async fn create(&self, booking: &NewBooking) -> AppResult<Booking>;

    async fn update_stay(
        &self,
        id: i32,
        date_from: NaiveDate,
        date_to: NaiveDate,
        price: i64,
    ) -> AppResult<Option<Booking>>;

    async fn delete(&self, id: i32) -> AppResult<bool>;
}

pub struct BookingStore<'a, C> {
    db: &'a C,
}

impl<'a, C> BookingStore<'a, C> {
    pub fn new(db: &'a C) -> Self {
        Self { db }
    }
}

impl<C: ConnectionTrait + Send + Sync> Connected for BookingStore<'_, C> {
    type Conn = C;

    fn db(&self) -> &C {
        self.db
    }
}

/// A booking shares a night with `[date_from, date_to)`. Both bounds are
/// strict, so a stay ending on the day another starts does not count.
pub(super) fn shares_a_night(date_from: NaiveDate, date_to: NaiveDate) -> SimpleExpr {
    booking::Column::DateFrom
        .lt(date_to)
        .and(booking::Column::DateTo.gt(date_from))
}

fn overlapping(
    room_id: i32,
    date_from: NaiveDate,
    date_to: NaiveDate,
    exclude_id: Option<i32>,
) -> Select<booking::Entity> {
    let select = booking::Entity::find()
        .filter(booking::Column::RoomId.eq(room_id))
        .filter(shares_a_night(date_from, date_to));
    match exclude_id {
        Some(id) => select.filter(booking::Column::Id.ne(id)),
        None => select,
    }
}

impl<C: ConnectionTrait + Send + Sync> ReadRepository<booking::Entity> for BookingStore<'_, C> {}
impl<C: ConnectionTrait + Send + Sync> WriteRepository<booking::ActiveModel> for BookingStore<'_, C> {}
impl<C: ConnectionTrait + Send + Sync> DeleteRepository<booking::Entity> for BookingStore<'_, C> {}

#[async_trait]
impl<C: ConnectionTrait + Send + Sync> BookingRepository for BookingStore<'_, C> {
    async fn find_by_id(&self, id: i32) -> AppResult<Option<Booking>> {
        Ok(self.find_model(id).await?.map(Booking::from))
    }

    async fn list(
        &self,
        user_id: Option<i32>,
        page: &PaginationParams,
    ) -> AppResult<Vec<Booking>> {
        let mut select = booking::Entity::find();
        if let Some(user_id) = user_id {
            select = select.filter(booking::Column::UserId.eq(user_id));
        }

        let rows = self
            .fetch_page(select.order_by_asc(booking::Column::Id), page)
            .await?;
        Ok(rows.into_iter().map(Booking::from).collect())
    }

    async fn count_overlapping(
        &self,
        room_id: i32,
        date_from: NaiveDate,
        date_to: NaiveDate,
        exclude_id: Option<i32>,
    ) -> AppResult<u64> {
        Ok(overlapping(room_id, date_from, date_to, exclude_id)
            .count(self.db)
            .await?)
    }

    async fn create(&self, new: &NewBooking) -> AppResult<Booking> {
        let model = booking::ActiveModel {
            room_id: Set(new.room_id),
            user_id: Set(new.user_id),
            date_from: Set(new.date_from),
            date_to: Set(new.date_to),
            price: Set(new.price),
            created_at: Set(chrono::Utc::now()),
            ..Default::default()
        };
        Ok(self.insert_model(model).await?.into())
    }

    async fn update_stay(
        &self,
        id: i32,
        date_from: NaiveDate,
        date_to: NaiveDate,
        price: i64,
    ) -> AppResult<Option<Booking>> {
        let Some(existing) = self.find_model(id).await? else {
            return Ok(None);
        };

        let mut active: booking::ActiveModel = existing.into();
        active.date_from = Set(date_from);
        active.date_to = Set(date_to);
        active.price = Set(price);

        Ok(Some(self.update_model(active).await?.into()))
    }

    async fn delete(&self, id: i32) -> AppResult<bool> {
        self.delete_model(id).await
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use sea_orm::{DbBackend, QueryTrait};

    fn day(d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(2025, 7, d).unwrap()
    }

    fn sql(room_id: i32, from: u32, to: u32, exclude_id: Option<i32>) -> String {
        overlapping(room_id, day(from), day(to), exclude_id)
            .build(DbBackend::Postgres)
            .to_string()
    }

    #[test]
    fn overlap_bounds_are_strict() {
        let sql = sql(4, 1, 5, None);
        assert!(sql.contains(r#""bookings"."room_id" = 4"#), "{sql}");
        assert!(sql.contains(r#""bookings"."date_from" < '2025-07-05'"#), "{sql}");
        assert!(sql.contains(r#""bookings"."date_to" > '2025-07-01'"#), "{sql}");
        // Inclusive bounds would make back-to-back stays collide
        assert!(!sql.contains("<="), "{sql}");
        assert!(!sql.contains(">="), "{sql}");
    }

    #[test]
    fn moved_booking_does_not_collide_with_itself() {
        assert!(sql(4, 1, 5, Some(9)).contains(r#""bookings"."id" <> 9"#));
        assert!(!sql(4, 1, 5, None).contains("<>"));
    }
}
