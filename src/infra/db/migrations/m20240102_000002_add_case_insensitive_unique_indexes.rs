//! Migration: case-insensitive uniqueness for catalog names.

use sea_orm_migration::prelude::*;

#[derive(DeriveMigrationName)]
pub struct Migration;

const INDEXES: &[(&str, &str)] = &[
    ("uq_countries_name_ci", "countries (lower(name))"),
    ("uq_cities_name_country_ci", "cities (lower(name), country_id)"),
    ("uq_facilities_name_ci", "facilities (lower(name))"),
];

#[async_trait::async_trait]
impl MigrationTrait for Migration {
    async fn up(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        let db = manager.get_connection();
        for (name, target) in INDEXES {
            db.execute_unprepared(&format!("CREATE UNIQUE INDEX IF NOT EXISTS {name} ON {target}"))
                .await?;
        }
        Ok(())
    }

    async fn down(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        let db = manager.get_connection();
        for (name, _) in INDEXES {
            db.execute_unprepared(&format!("DROP INDEX IF EXISTS {name}"))
                .await?;
        }
        Ok(())
    }
}
