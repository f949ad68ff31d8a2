//! Booking service - stay validation, double-booking detection and pricing.
//!
//! Creates and moves re-read the room and the competing bookings inside a
//! serializable transaction. The overlap check produces the readable 409;
//! two requests racing past it are still separated by the
//! `bookings_no_overlap` exclusion constraint, whose violation also
//! surfaces as 409.

use async_trait::async_trait;
use std::sync::Arc;

use crate::domain::booking::{nights, total_price};
use crate::domain::{Booking, BookingInput, BookingPatch, NewBooking, Room};
use crate::errors::{AppError, AppResult, OptionExt};
use crate::infra::{Repositories, UnitOfWork};
use crate::types::PaginationParams;

use chrono::NaiveDate;

#[cfg(any(test, feature = "test-utils"))]
use mockall::automock;

#[cfg_attr(any(test, feature = "test-utils"), automock)]
#[async_trait]
pub trait BookingService: Send + Sync {
    async fn list(&self, page: PaginationParams) -> AppResult<Vec<Booking>>;

    async fn list_for_user(&self, user_id: i32, page: PaginationParams)
        -> AppResult<Vec<Booking>>;

    async fn get(&self, id: i32) -> AppResult<Booking>;

    /// Book a room for `user_id`
    async fn create(&self, user_id: i32, input: BookingInput) -> AppResult<Booking>;

    /// Move the owner's stay; the price is recomputed
    async fn update(&self, user_id: i32, id: i32, patch: BookingPatch) -> AppResult<Booking>;

    async fn delete(&self, user_id: i32, id: i32) -> AppResult<()>;
}

pub struct BookingManager<U: UnitOfWork> {
    uow: Arc<U>,
}

impl<U: UnitOfWork> BookingManager<U> {
    pub fn new(uow: Arc<U>) -> Self {
        Self { uow }
    }
}

/// Validate a stay of `room` and price it.
async fn quote(
    repos: &dyn Repositories,
    room: &Room,
    date_from: NaiveDate,
    date_to: NaiveDate,
    exclude_id: Option<i32>,
) -> AppResult<i64> {
    let nights = nights(date_from, date_to)?;

    let overlapping = repos
        .bookings()
        .count_overlapping(room.id, date_from, date_to, exclude_id)
        .await?;
    if overlapping > 0 {
        return Err(AppError::conflict(
            "Room is already booked for the selected dates",
        ));
    }

    total_price(room.price_per_night, nights)
}

async fn owned_booking(repos: &dyn Repositories, user_id: i32, id: i32) -> AppResult<Booking> {
    let booking = repos.bookings().find_by_id(id).await?.ok_or_not_found("Booking")?;
    if booking.user_id != user_id {
        return Err(AppError::Forbidden);
    }
    Ok(booking)
}

#[async_trait]
impl<U: UnitOfWork> BookingService for BookingManager<U> {
    async fn list(&self, page: PaginationParams) -> AppResult<Vec<Booking>> {
        self.uow.repos().bookings().list(None, &page).await
    }

    async fn list_for_user(
        &self,
        user_id: i32,
        page: PaginationParams,
    ) -> AppResult<Vec<Booking>> {
        self.uow.repos().bookings().list(Some(user_id), &page).await
    }

    async fn get(&self, id: i32) -> AppResult<Booking> {
        self.uow
            .repos()
            .bookings()
            .find_by_id(id)
            .await?
            .ok_or_not_found("Booking")
    }

    async fn create(&self, user_id: i32, input: BookingInput) -> AppResult<Booking> {
        self.uow
            .transaction_serializable(move |tx| {
                Box::pin(async move {
                    let room = tx
                        .rooms()
                        .find_by_id(input.room_id)
                        .await?
                        .ok_or_not_found("Room")?;
                    let price = quote(&*tx, &room, input.date_from, input.date_to, None).await?;

                    let booking = tx
                        .bookings()
                        .create(&NewBooking {
                            room_id: room.id,
                            user_id,
                            date_from: input.date_from,
                            date_to: input.date_to,
                            price,
                        })
                        .await?;
                    tracing::info!(
                        booking_id = booking.id,
                        room_id = room.id,
                        user_id,
                        "Booking created"
                    );
                    Ok(booking)
                })
            })
            .await
    }

    async fn update(&self, user_id: i32, id: i32, patch: BookingPatch) -> AppResult<Booking> {
        self.uow
            .transaction_serializable(move |tx| {
                Box::pin(async move {
                    let booking = owned_booking(&*tx, user_id, id).await?;
                    if patch.is_empty() {
                        return Ok(booking);
                    }

                    let (date_from, date_to) = patch.apply_to(&booking);
                    let room = tx
                        .rooms()
                        .find_by_id(booking.room_id)
                        .await?
                        .ok_or_not_found("Room")?;
                    let price = quote(&*tx, &room, date_from, date_to, Some(id)).await?;

                    tx.bookings()
                        .update_stay(id, date_from, date_to, price)
                        .await?
                        .ok_or_not_found("Booking")
                })
            })
            .await
    }

    async fn delete(&self, user_id: i32, id: i32) -> AppResult<()> {
        self.uow
            .transaction(move |tx| {
                Box::pin(async move {
                    owned_booking(&*tx, user_id, id).await?;
                    tx.bookings().delete(id).await?;
                    tracing::info!(booking_id = id, user_id, "Booking cancelled");
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
    use chrono::Utc;

    fn day(d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(2025, 7, d).unwrap()
    }

    fn room() -> Room {
        Room {
            id: 5,
            hotel_id: 1,
            title: "Deluxe double".into(),
            description: None,
            price_per_night: 5000,
            capacity: 2,
            facilities: vec![],
        }
    }

    fn booking(user_id: i32) -> Booking {
        Booking {
            id: 9,
            room_id: 5,
            user_id,
            date_from: day(1),
            date_to: day(5),
            price: 20_000,
            created_at: Utc::now(),
        }
    }

    fn stay(from: u32, to: u32) -> BookingInput {
        BookingInput {
            room_id: 5,
            date_from: day(from),
            date_to: day(to),
        }
    }

    fn service(repos: TestRepositories) -> BookingManager<TestUnitOfWork> {
        BookingManager::new(Arc::new(TestUnitOfWork::from(repos)))
    }

    #[tokio::test]
    async fn booking_an_unknown_room_is_not_found() {
        let mut repos = TestRepositories::default();
        repos.rooms.expect_find_by_id().returning(|_| Ok(None));
        repos.bookings.expect_create().never();

        let result = service(repos).create(1, stay(1, 5)).await;
        assert!(matches!(result, Err(AppError::NotFound(entity)) if entity == "Room"));
    }

    #[tokio::test]
    async fn inverted_dates_are_a_bad_request() {
        let mut repos = TestRepositories::default();
        repos.rooms.expect_find_by_id().returning(|_| Ok(Some(room())));
        repos.bookings.expect_count_overlapping().never();

        let result = service(repos).create(1, stay(5, 5)).await;
        assert!(matches!(result, Err(AppError::BadRequest(_))));
    }

    #[tokio::test]
    async fn overlapping_stay_conflicts() {
        let mut repos = TestRepositories::default();
        repos.rooms.expect_find_by_id().returning(|_| Ok(Some(room())));
        repos
            .bookings
            .expect_count_overlapping()
            .returning(|_, _, _, _| Ok(1));
        repos.bookings.expect_create().never();

        let result = service(repos).create(1, stay(4, 8)).await;
        assert!(matches!(result, Err(AppError::Conflict(_))));
    }

    #[tokio::test]
    async fn free_stay_is_priced_per_night() {
        let mut repos = TestRepositories::default();
        repos.rooms.expect_find_by_id().returning(|_| Ok(Some(room())));
        repos
            .bookings
            .expect_count_overlapping()
            .withf(|room_id, _, _, exclude| *room_id == 5 && exclude.is_none())
            .returning(|_, _, _, _| Ok(0));
        repos
            .bookings
            .expect_create()
            .withf(|new| new.price == 15_000 && new.user_id == 7)
            .returning(|new| {
                Ok(Booking {
                    id: 1,
                    room_id: new.room_id,
                    user_id: new.user_id,
                    date_from: new.date_from,
                    date_to: new.date_to,
                    price: new.price,
                    created_at: Utc::now(),
                })
            });

        let created = service(repos).create(7, stay(5, 8)).await.unwrap();
        assert_eq!(created.price, 15_000);
    }

    #[tokio::test]
    async fn someone_elses_booking_is_forbidden() {
        let mut repos = TestRepositories::default();
        repos
            .bookings
            .expect_find_by_id()
            .returning(|_| Ok(Some(booking(2))));
        repos.bookings.expect_delete().never();

        let result = service(repos).delete(1, 9).await;
        assert!(matches!(result, Err(AppError::Forbidden)));
    }

    #[tokio::test]
    async fn deleting_a_missing_booking_is_not_found() {
        let mut repos = TestRepositories::default();
        repos.bookings.expect_find_by_id().returning(|_| Ok(None));

        let result = service(repos).delete(1, 9).await;
        assert!(matches!(result, Err(AppError::NotFound(_))));
    }

    #[tokio::test]
    async fn moving_a_stay_ignores_the_booking_itself() {
        let mut repos = TestRepositories::default();
        repos
            .bookings
            .expect_find_by_id()
            .returning(|_| Ok(Some(booking(1))));
        repos.rooms.expect_find_by_id().returning(|_| Ok(Some(room())));
        repos
            .bookings
            .expect_count_overlapping()
            .withf(|_, from, to, exclude| *from == day(3) && *to == day(5) && *exclude == Some(9))
            .returning(|_, _, _, _| Ok(0));
        repos
            .bookings
            .expect_update_stay()
            .withf(|_, _, _, price| *price == 10_000)
            .returning(|id, from, to, price| {
                Ok(Some(Booking {
                    id,
                    date_from: from,
                    date_to: to,
                    price,
                    ..booking(1)
                }))
            });

        let patch = BookingPatch {
            date_from: Some(day(3)),
            date_to: None,
        };
        let moved = service(repos).update(1, 9, patch).await.unwrap();
        assert_eq!((moved.date_from, moved.price), (day(3), 10_000));
    }

    #[tokio::test]
    async fn empty_patch_leaves_the_booking_alone() {
        let mut repos = TestRepositories::default();
        repos
            .bookings
            .expect_find_by_id()
            .returning(|_| Ok(Some(booking(1))));
        repos.bookings.expect_update_stay().never();

        let unchanged = service(repos)
            .update(1, 9, BookingPatch::default())
            .await
            .unwrap();
        assert_eq!(unchanged.price, 20_000);
    }
}
