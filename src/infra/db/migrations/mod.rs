//! Database migrations.
//!
//! Migration names follow the pattern: m{YYYYMMDD}_{NNNNNN}_{description}

use sea_orm_migration::prelude::*;

mod m20240101_000001_create_users_table;
mod m20240101_000002_create_locations_tables;
mod m20240101_000003_create_hotels_tables;
mod m20240101_000004_create_facilities_tables;
mod m20240101_000005_create_bookings_table;
mod m20240102_000001_add_booking_overlap_constraint;
mod m20240102_000002_add_case_insensitive_unique_indexes;

pub struct Migrator;

#[async_trait::async_trait]
impl MigratorTrait for Migrator {
    fn migrations() -> Vec<Box<dyn MigrationTrait>> {
        vec![
            Box::new(m20240101_000001_create_users_table::Migration),
            Box::new(m20240101_000002_create_locations_tables::Migration),
            Box::new(m20240101_000003_create_hotels_tables::Migration),
            Box::new(m20240101_000004_create_facilities_tables::Migration),
            Box::new(m20240101_000005_create_bookings_table::Migration),
            Box::new(m20240102_000001_add_booking_overlap_constraint::Migration),
            Box::new(m20240102_000002_add_case_insensitive_unique_indexes::Migration),
        ]
    }
}
