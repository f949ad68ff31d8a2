//! Unit of Work pattern implementation.
//!
//! Services reach every repository through a [`UnitOfWork`]: plain reads
//! go through [`UnitOfWork::repos`] on the pool, and multi-step writes run
//! inside [`UnitOfWork::transaction`], where every repository shares one
//! database transaction that is committed on `Ok` and rolled back on `Err`.

use std::future::Future;
use std::ops::Deref;
use std::pin::Pin;

use async_trait::async_trait;
use sea_orm::{AccessMode, DatabaseConnection, IsolationLevel, TransactionTrait};

use super::repositories::{Repositories, Scope};
use crate::errors::AppResult;

/// Boxed future returned by a transaction body.
pub type TxFuture<'a, T> = Pin<Box<dyn Future<Output = AppResult<T>> + Send + 'a>>;

/// Unit of Work trait for dependency injection.
///
/// Generic over the closure, so services take it as a type parameter
/// rather than a trait object. Tests swap in
/// [`testing::TestUnitOfWork`] backed by repository mocks.
#[async_trait]
pub trait UnitOfWork: Send + Sync + 'static {
    /// Repositories running directly on the pool.
    fn repos(&self) -> Box<dyn Repositories + '_>;

    /// Execute a closure within a ReadCommitted transaction.
    async fn transaction<F, T>(&self, f: F) -> AppResult<T>
    where
        F: for<'a> FnOnce(TransactionContext<'a>) -> TxFuture<'a, T> + Send,
        T: Send;

    /// Execute a closure within a Serializable transaction.
    async fn transaction_serializable<F, T>(&self, f: F) -> AppResult<T>
    where
        F: for<'a> FnOnce(TransactionContext<'a>) -> TxFuture<'a, T> + Send,
        T: Send;
}

/// Repository access within one transaction.
pub struct TransactionContext<'a> {
    repos: Box<dyn Repositories + 'a>,
}

impl<'a> TransactionContext<'a> {
    pub fn new(repos: Box<dyn Repositories + 'a>) -> Self {
        Self { repos }
    }
}

impl<'a> Deref for TransactionContext<'a> {
    type Target = dyn Repositories + 'a;

    fn deref(&self) -> &Self::Target {
        self.repos.as_ref()
    }
}

/// Concrete implementation of UnitOfWork over a sea-orm pool.
pub struct Persistence {
    db: DatabaseConnection,
}

impl Persistence {
    pub fn new(db: DatabaseConnection) -> Self {
        Self { db }
    }

    async fn execute_transaction<F, T>(&self, isolation: IsolationLevel, f: F) -> AppResult<T>
    where
        F: for<'a> FnOnce(TransactionContext<'a>) -> TxFuture<'a, T> + Send,
        T: Send,
    {
        let txn = self
            .db
            .begin_with_config(Some(isolation), Some(AccessMode::ReadWrite))
            .await?;

        let outcome = f(TransactionContext::new(Box::new(Scope::new(&txn)))).await;

        match outcome {
            Ok(result) => {
                txn.commit().await?;
                Ok(result)
            }
            Err(e) => {
                if let Err(rollback_err) = txn.rollback().await {
                    tracing::error!("Transaction rollback failed: {}", rollback_err);
                }
                Err(e)
            }
        }
    }
}

#[async_trait]
impl UnitOfWork for Persistence {
    fn repos(&self) -> Box<dyn Repositories + '_> {
        Box::new(Scope::new(&self.db))
    }

    async fn transaction<F, T>(&self, f: F) -> AppResult<T>
    where
        F: for<'a> FnOnce(TransactionContext<'a>) -> TxFuture<'a, T> + Send,
        T: Send,
    {
        self.execute_transaction(IsolationLevel::ReadCommitted, f).await
    }

    async fn transaction_serializable<F, T>(&self, f: F) -> AppResult<T>
    where
        F: for<'a> FnOnce(TransactionContext<'a>) -> TxFuture<'a, T> + Send,
        T: Send,
    {
        self.execute_transaction(IsolationLevel::Serializable, f).await
    }
}

/// Mock-backed unit of work for service tests.
#[cfg(any(test, feature = "test-utils"))]
pub mod testing {
    use super::*;
    use crate::infra::repositories::{
        BookingRepository, CityRepository, CountryRepository, FacilityRepository,
        HotelRepository, ImageRepository, MockBookingRepository, MockCityRepository,
        MockCountryRepository, MockFacilityRepository, MockHotelRepository,
        MockImageRepository, MockRoomRepository, MockUserRepository, RoomRepository,
        UserRepository,
    };

    /// One mock per repository; set expectations before handing it over.
    #[derive(Default)]
    pub struct TestRepositories {
        pub countries: MockCountryRepository,
        pub cities: MockCityRepository,
        pub hotels: MockHotelRepository,
        pub rooms: MockRoomRepository,
        pub bookings: MockBookingRepository,
        pub facilities: MockFacilityRepository,
        pub images: MockImageRepository,
        pub users: MockUserRepository,
    }

    impl Repositories for TestRepositories {
        fn countries(&self) -> &dyn CountryRepository {
            &self.countries
        }
        fn cities(&self) -> &dyn CityRepository {
            &self.cities
        }
        fn hotels(&self) -> &dyn HotelRepository {
            &self.hotels
        }
        fn rooms(&self) -> &dyn RoomRepository {
            &self.rooms
        }
        fn bookings(&self) -> &dyn BookingRepository {
            &self.bookings
        }
        fn facilities(&self) -> &dyn FacilityRepository {
            &self.facilities
        }
        fn images(&self) -> &dyn ImageRepository {
            &self.images
        }
        fn users(&self) -> &dyn UserRepository {
            &self.users
        }
    }

    /// Runs transaction bodies directly against the mocks.
    #[derive(Default)]
    pub struct TestUnitOfWork {
        pub repos: TestRepositories,
    }

    impl From<TestRepositories> for TestUnitOfWork {
        fn from(repos: TestRepositories) -> Self {
            Self { repos }
        }
    }

    #[async_trait]
    impl UnitOfWork for TestUnitOfWork {
        fn repos(&self) -> Box<dyn Repositories + '_> {
            Box::new(&self.repos)
        }

        async fn transaction<F, T>(&self, f: F) -> AppResult<T>
        where
            F: for<'a> FnOnce(TransactionContext<'a>) -> TxFuture<'a, T> + Send,
            T: Send,
        {
            f(TransactionContext::new(Box::new(&self.repos))).await
        }

        async fn transaction_serializable<F, T>(&self, f: F) -> AppResult<T>
        where
            F: for<'a> FnOnce(TransactionContext<'a>) -> TxFuture<'a, T> + Send,
            T: Send,
        {
            f(TransactionContext::new(Box::new(&self.repos))).await
        }
    }
}

#[cfg(test)]
mod tests {
    use super::testing::{TestRepositories, TestUnitOfWork};
    use super::*;
    use crate::domain::Country;
    use crate::errors::AppError;

    #[tokio::test]
    async fn transaction_body_sees_the_same_repositories() {
        let mut repos = TestRepositories::default();
        repos.countries.expect_find_by_id().returning(|id| {
            Ok(Some(Country {
                id,
                name: "Russia".into(),
                iso_code: "RU".into(),
            }))
        });
        let uow = TestUnitOfWork::from(repos);

        let name = uow
            .transaction(|ctx| {
                Box::pin(async move {
                    let country = ctx.countries().find_by_id(7).await?;
                    Ok(country.map(|c| c.name))
                })
            })
            .await
            .unwrap();

        assert_eq!(name.as_deref(), Some("Russia"));
    }

    #[tokio::test]
    async fn transaction_error_is_returned_unchanged() {
        let uow = TestUnitOfWork::default();

        let result: AppResult<()> = uow
            .transaction(|_ctx| Box::pin(async move { Err(AppError::conflict("taken")) }))
            .await;

        assert!(matches!(result, Err(AppError::Conflict(_))));
    }
}
