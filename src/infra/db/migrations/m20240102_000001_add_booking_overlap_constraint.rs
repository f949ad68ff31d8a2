//! Migration: reject overlapping stays of one room in the database itself.
//!
//! The service checks for overlaps before inserting, but two concurrent
//! requests can both pass that check. The exclusion constraint makes the
//! second insert fail with SQLSTATE 23P01, which surfaces as 409.

use sea_orm_migration::prelude::*;

#[derive(DeriveMigrationName)]
pub struct Migration;

#[async_trait::async_trait]
impl MigrationTrait for Migration {
    async fn up(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        let db = manager.get_connection();

        // btree_gist provides the `=` operator class for integers in GiST
        db.execute_unprepared("CREATE EXTENSION IF NOT EXISTS btree_gist")
            .await?;
        db.execute_unprepared(
            "ALTER TABLE bookings ADD CONSTRAINT bookings_no_overlap \
             EXCLUDE USING gist (room_id WITH =, daterange(date_from, date_to, '[)') WITH &&)",
        )
        .await?;

        Ok(())
    }

    async fn down(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .get_connection()
            .execute_unprepared("ALTER TABLE bookings DROP CONSTRAINT IF EXISTS bookings_no_overlap")
            .await?;
        Ok(())
    }
}
