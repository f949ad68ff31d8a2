//! Room service - rooms are always addressed through their hotel.

use async_trait::async_trait;
use std::sync::Arc;

use crate::domain::booking::nights;
use crate::domain::{Room, RoomFilter, RoomInput, RoomPatch};
use crate::errors::{AppError, AppResult, OptionExt};
use crate::infra::{Repositories, UnitOfWork};
use crate::types::PaginationParams;

use super::facility_service::resolve_facility_ids;

#[cfg(any(test, feature = "test-utils"))]
use mockall::automock;

#[cfg_attr(any(test, feature = "test-utils"), automock)]
#[async_trait]
pub trait RoomService: Send + Sync {
    /// Rooms of a hotel; with a full date range, only those free for it
    async fn list(
        &self,
        hotel_id: i32,
        filter: RoomFilter,
        page: PaginationParams,
    ) -> AppResult<Vec<Room>>;

    async fn get(&self, hotel_id: i32, id: i32) -> AppResult<Room>;

    async fn create(&self, hotel_id: i32, input: RoomInput) -> AppResult<Room>;

    async fn update(&self, hotel_id: i32, id: i32, patch: RoomPatch) -> AppResult<Room>;

    /// Refused while the room has bookings
    async fn delete(&self, hotel_id: i32, id: i32) -> AppResult<()>;
}

pub struct RoomManager<U: UnitOfWork> {
    uow: Arc<U>,
}

impl<U: UnitOfWork> RoomManager<U> {
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

async fn room_in_hotel(repos: &dyn Repositories, hotel_id: i32, id: i32) -> AppResult<Room> {
    ensure_hotel_exists(repos, hotel_id).await?;
    repos
        .rooms()
        .find_in_hotel(hotel_id, id)
        .await?
        .ok_or_not_found("Room")
}

#[async_trait]
impl<U: UnitOfWork> RoomService for RoomManager<U> {
    async fn list(
        &self,
        hotel_id: i32,
        filter: RoomFilter,
        page: PaginationParams,
    ) -> AppResult<Vec<Room>> {
        if let Some((date_from, date_to)) = filter.stay() {
            nights(date_from, date_to)?;
        }
        let repos = self.uow.repos();
        ensure_hotel_exists(&*repos, hotel_id).await?;
        repos.rooms().list(hotel_id, &filter, &page).await
    }

    async fn get(&self, hotel_id: i32, id: i32) -> AppResult<Room> {
        room_in_hotel(&*self.uow.repos(), hotel_id, id).await
    }

    async fn create(&self, hotel_id: i32, input: RoomInput) -> AppResult<Room> {
        self.uow
            .transaction(move |tx| {
                Box::pin(async move {
                    ensure_hotel_exists(&*tx, hotel_id).await?;
                    let facility_ids = match &input.facility_ids {
                        Some(ids) => resolve_facility_ids(&*tx, ids).await?,
                        None => Vec::new(),
                    };

                    let room = tx.rooms().create(hotel_id, &input).await?;
                    tracing::info!(hotel_id, room_id = room.id, "Room created");
                    if facility_ids.is_empty() {
                        return Ok(room);
                    }

                    tx.rooms().set_facilities(room.id, &facility_ids).await?;
                    tx.rooms().find_by_id(room.id).await?.ok_or_not_found("Room")
                })
            })
            .await
    }

    async fn update(&self, hotel_id: i32, id: i32, patch: RoomPatch) -> AppResult<Room> {
        self.uow
            .transaction(move |tx| {
                Box::pin(async move {
                    let mut room = room_in_hotel(&*tx, hotel_id, id).await?;
                    if patch.is_empty() {
                        return Ok(room);
                    }

                    let facility_ids = match &patch.facility_ids {
                        Some(ids) => Some(resolve_facility_ids(&*tx, ids).await?),
                        None => None,
                    };
                    if patch.has_column_changes() {
                        room = tx.rooms().update(id, &patch).await?.ok_or_not_found("Room")?;
                    }
                    if let Some(ids) = facility_ids {
                        tx.rooms().set_facilities(id, &ids).await?;
                        room = tx.rooms().find_by_id(id).await?.ok_or_not_found("Room")?;
                    }
                    Ok(room)
                })
            })
            .await
    }

    async fn delete(&self, hotel_id: i32, id: i32) -> AppResult<()> {
        self.uow
            .transaction(move |tx| {
                Box::pin(async move {
                    room_in_hotel(&*tx, hotel_id, id).await?;
                    if tx.rooms().has_bookings(id).await? {
                        return Err(AppError::bad_request(
                            "Room has bookings and cannot be deleted",
                        ));
                    }
                    tx.rooms().delete(id).await?;
                    tracing::info!(hotel_id, room_id = id, "Room deleted");
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
    use chrono::NaiveDate;

    fn room(hotel_id: i32) -> Room {
        Room {
            id: 5,
            hotel_id,
            title: "Deluxe double".into(),
            description: None,
            price_per_night: 5000,
            capacity: 2,
            facilities: vec![],
        }
    }

    fn service(repos: TestRepositories) -> RoomManager<TestUnitOfWork> {
        RoomManager::new(Arc::new(TestUnitOfWork::from(repos)))
    }

    #[tokio::test]
    async fn room_of_another_hotel_is_not_found() {
        let mut repos = TestRepositories::default();
        repos.hotels.expect_exists().returning(|_| Ok(true));
        repos.rooms.expect_find_in_hotel().returning(|_, _| Ok(None));

        let result = service(repos).get(1, 5).await;
        assert!(matches!(result, Err(AppError::NotFound(entity)) if entity == "Room"));
    }

    #[tokio::test]
    async fn listing_rooms_of_a_missing_hotel_is_not_found() {
        let mut repos = TestRepositories::default();
        repos.hotels.expect_exists().returning(|_| Ok(false));
        repos.rooms.expect_list().never();

        let result = service(repos)
            .list(9, RoomFilter::default(), PaginationParams::default())
            .await;
        assert!(matches!(result, Err(AppError::NotFound(entity)) if entity == "Hotel"));
    }

    #[tokio::test]
    async fn inverted_availability_range_is_rejected() {
        let repos = TestRepositories::default();
        let filter = RoomFilter {
            title: None,
            date_from: NaiveDate::from_ymd_opt(2025, 7, 5),
            date_to: NaiveDate::from_ymd_opt(2025, 7, 1),
        };

        let result = service(repos)
            .list(1, filter, PaginationParams::default())
            .await;
        assert!(matches!(result, Err(AppError::BadRequest(_))));
    }

    #[tokio::test]
    async fn booked_room_cannot_be_deleted() {
        let mut repos = TestRepositories::default();
        repos.hotels.expect_exists().returning(|_| Ok(true));
        repos
            .rooms
            .expect_find_in_hotel()
            .returning(|hotel_id, _| Ok(Some(room(hotel_id))));
        repos.rooms.expect_has_bookings().returning(|_| Ok(true));
        repos.rooms.expect_delete().never();

        let result = service(repos).delete(1, 5).await;
        assert!(matches!(result, Err(AppError::BadRequest(_))));
    }

    #[tokio::test]
    async fn create_without_facilities_skips_linking() {
        let mut repos = TestRepositories::default();
        repos.hotels.expect_exists().returning(|_| Ok(true));
        repos
            .rooms
            .expect_create()
            .returning(|hotel_id, _| Ok(room(hotel_id)));
        repos.rooms.expect_set_facilities().never();

        let input = RoomInput {
            title: "Deluxe double".into(),
            description: None,
            price_per_night: 5000,
            capacity: 2,
            facility_ids: None,
        };
        let created = service(repos).create(1, input).await.unwrap();
        assert_eq!(created.hotel_id, 1);
    }
}
