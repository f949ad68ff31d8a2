//! Hotel service - city resolution by name and facility links.

use async_trait::async_trait;
use std::sync::Arc;

use crate::domain::hotel::{default_check_in, default_check_out};
use crate::domain::{Hotel, HotelChanges, HotelFilter, HotelInput, HotelPatch, NewHotel};
use crate::errors::{AppError, AppResult, OptionExt};
use crate::infra::{Repositories, UnitOfWork};
use crate::types::PaginationParams;

use super::facility_service::resolve_facility_ids;

#[cfg(any(test, feature = "test-utils"))]
use mockall::automock;

#[cfg_attr(any(test, feature = "test-utils"), automock)]
#[async_trait]
pub trait HotelService: Send + Sync {
    async fn list(&self, filter: HotelFilter, page: PaginationParams) -> AppResult<Vec<Hotel>>;

    async fn get(&self, id: i32) -> AppResult<Hotel>;

    async fn create(&self, input: HotelInput) -> AppResult<Hotel>;

    async fn update(&self, id: i32, patch: HotelPatch) -> AppResult<Hotel>;

    /// Removes the hotel with its rooms, images and facility links
    async fn delete(&self, id: i32) -> AppResult<()>;
}

pub struct HotelManager<U: UnitOfWork> {
    uow: Arc<U>,
}

impl<U: UnitOfWork> HotelManager<U> {
    pub fn new(uow: Arc<U>) -> Self {
        Self { uow }
    }
}

async fn resolve_city(repos: &dyn Repositories, name: &str) -> AppResult<i32> {
    repos
        .cities()
        .find_by_name(name)
        .await?
        .map(|city| city.id)
        .ok_or_else(|| AppError::not_found(format!("City '{}'", name.trim())))
}

#[async_trait]
impl<U: UnitOfWork> HotelService for HotelManager<U> {
    async fn list(&self, filter: HotelFilter, page: PaginationParams) -> AppResult<Vec<Hotel>> {
        self.uow.repos().hotels().list(&filter, &page).await
    }

    async fn get(&self, id: i32) -> AppResult<Hotel> {
        self.uow.repos().hotels().find_by_id(id).await?.ok_or_not_found("Hotel")
    }

    async fn create(&self, input: HotelInput) -> AppResult<Hotel> {
        self.uow
            .transaction(move |tx| {
                Box::pin(async move {
                    let city_id = resolve_city(&*tx, &input.city).await?;
                    let facility_ids = match &input.facility_ids {
                        Some(ids) => Some(resolve_facility_ids(&*tx, ids).await?),
                        None => None,
                    };

                    let new = NewHotel {
                        title: input.title,
                        address: input.address,
                        postal_code: input.postal_code,
                        city_id,
                        check_in_time: input.check_in_time.unwrap_or_else(default_check_in),
                        check_out_time: input.check_out_time.unwrap_or_else(default_check_out),
                    };
                    let hotel = tx.hotels().create(&new).await?;
                    tracing::info!(hotel_id = hotel.id, "Hotel created");

                    match facility_ids {
                        Some(ids) if !ids.is_empty() => {
                            tx.hotels().set_facilities(hotel.id, &ids).await?;
                            tx.hotels().find_by_id(hotel.id).await?.ok_or_not_found("Hotel")
                        }
                        _ => Ok(hotel),
                    }
                })
            })
            .await
    }

    async fn update(&self, id: i32, patch: HotelPatch) -> AppResult<Hotel> {
        self.uow
            .transaction(move |tx| {
                Box::pin(async move {
                    let existing = tx.hotels().find_by_id(id).await?.ok_or_not_found("Hotel")?;
                    if patch.is_empty() {
                        return Ok(existing);
                    }

                    let city_id = match &patch.city {
                        Some(name) => Some(resolve_city(&*tx, name).await?),
                        None => None,
                    };
                    let facility_ids = match &patch.facility_ids {
                        Some(ids) => Some(resolve_facility_ids(&*tx, ids).await?),
                        None => None,
                    };

                    let changes = HotelChanges {
                        title: patch.title,
                        address: patch.address,
                        postal_code: patch.postal_code,
                        city_id,
                        check_in_time: patch.check_in_time,
                        check_out_time: patch.check_out_time,
                    };
                    let mut hotel = existing;
                    if changes != HotelChanges::default() {
                        hotel = tx.hotels().update(id, &changes).await?.ok_or_not_found("Hotel")?;
                    }
                    if let Some(ids) = facility_ids {
                        tx.hotels().set_facilities(id, &ids).await?;
                        hotel = tx.hotels().find_by_id(id).await?.ok_or_not_found("Hotel")?;
                    }
                    Ok(hotel)
                })
            })
            .await
    }

    async fn delete(&self, id: i32) -> AppResult<()> {
        if !self.uow.repos().hotels().delete(id).await? {
            return Err(AppError::not_found("Hotel"));
        }
        tracing::info!(hotel_id = id, "Hotel deleted");
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::{City, Country, Facility};
    use crate::infra::unit_of_work::testing::{TestRepositories, TestUnitOfWork};
    use chrono::NaiveTime;

    fn kazan() -> City {
        City {
            id: 3,
            name: "Kazan".into(),
            country: Country {
                id: 1,
                name: "Russia".into(),
                iso_code: "RU".into(),
            },
        }
    }

    fn hotel(facilities: Vec<Facility>) -> Hotel {
        Hotel {
            id: 10,
            title: "Grand Volga".into(),
            address: "Baumana St, 9".into(),
            postal_code: None,
            city_id: 3,
            city: "Kazan".into(),
            country: "Russia".into(),
            check_in_time: default_check_in(),
            check_out_time: default_check_out(),
            facilities,
        }
    }

    fn input(city: &str, facility_ids: Option<Vec<i32>>) -> HotelInput {
        HotelInput {
            title: "Grand Volga".into(),
            city: city.into(),
            address: "Baumana St, 9".into(),
            postal_code: None,
            check_in_time: None,
            check_out_time: None,
            facility_ids,
        }
    }

    fn service(repos: TestRepositories) -> HotelManager<TestUnitOfWork> {
        HotelManager::new(Arc::new(TestUnitOfWork::from(repos)))
    }

    #[tokio::test]
    async fn unknown_city_is_not_found() {
        let mut repos = TestRepositories::default();
        repos.cities.expect_find_by_name().returning(|_| Ok(None));
        repos.hotels.expect_create().never();

        let result = service(repos).create(input("Atlantis", None)).await;
        assert!(matches!(result, Err(AppError::NotFound(msg)) if msg.contains("Atlantis")));
    }

    #[tokio::test]
    async fn create_applies_default_times_and_links_facilities() {
        let mut repos = TestRepositories::default();
        repos.cities.expect_find_by_name().returning(|_| Ok(Some(kazan())));
        repos.facilities.expect_find_missing().returning(|_| Ok(vec![]));
        repos
            .hotels
            .expect_create()
            .withf(|new| {
                new.city_id == 3
                    && new.check_in_time == NaiveTime::from_hms_opt(14, 0, 0).unwrap()
                    && new.check_out_time == NaiveTime::from_hms_opt(12, 0, 0).unwrap()
            })
            .returning(|_| Ok(hotel(vec![])));
        repos
            .hotels
            .expect_set_facilities()
            .withf(|id, ids| *id == 10 && ids == [1, 2])
            .times(1)
            .returning(|_, _| Ok(()));
        repos.hotels.expect_find_by_id().returning(|_| {
            Ok(Some(hotel(vec![Facility {
                id: 1,
                name: "Pool".into(),
            }])))
        });

        let created = service(repos)
            .create(input("kazan", Some(vec![2, 1, 2])))
            .await
            .unwrap();
        assert_eq!(created.facilities.len(), 1);
    }

    #[tokio::test]
    async fn facility_only_patch_does_not_touch_columns() {
        let mut repos = TestRepositories::default();
        repos
            .hotels
            .expect_find_by_id()
            .returning(|_| Ok(Some(hotel(vec![]))));
        repos.facilities.expect_find_missing().returning(|_| Ok(vec![]));
        repos.hotels.expect_update().never();
        repos
            .hotels
            .expect_set_facilities()
            .times(1)
            .returning(|_, _| Ok(()));

        let patch = HotelPatch {
            facility_ids: Some(vec![]),
            ..Default::default()
        };
        assert!(service(repos).update(10, patch).await.is_ok());
    }

    #[tokio::test]
    async fn deleting_a_missing_hotel_is_not_found() {
        let mut repos = TestRepositories::default();
        repos.hotels.expect_delete().returning(|_| Ok(false));

        assert!(matches!(
            service(repos).delete(10).await,
            Err(AppError::NotFound(_))
        ));
    }
}
