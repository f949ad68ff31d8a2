//! Migration: hotels with their rooms and images.

use sea_orm_migration::prelude::*;

use super::m20240101_000002_create_locations_tables::Cities;

#[derive(DeriveMigrationName)]
pub struct Migration;

#[async_trait::async_trait]
impl MigrationTrait for Migration {
    async fn up(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .create_table(
                Table::create()
                    .table(Hotels::Table)
                    .if_not_exists()
                    .col(
                        ColumnDef::new(Hotels::Id)
                            .integer()
                            .not_null()
                            .auto_increment()
                            .primary_key(),
                    )
                    .col(ColumnDef::new(Hotels::Title).string_len(200).not_null())
                    .col(ColumnDef::new(Hotels::Address).string_len(300).not_null())
                    .col(ColumnDef::new(Hotels::PostalCode).string_len(20).null())
                    .col(ColumnDef::new(Hotels::CityId).integer().not_null())
                    .col(
                        ColumnDef::new(Hotels::CheckInTime)
                            .time()
                            .not_null()
                            .default("14:00:00"),
                    )
                    .col(
                        ColumnDef::new(Hotels::CheckOutTime)
                            .time()
                            .not_null()
                            .default("12:00:00"),
                    )
                    .foreign_key(
                        ForeignKey::create()
                            .name("fk_hotels_city_id")
                            .from(Hotels::Table, Hotels::CityId)
                            .to(Cities::Table, Cities::Id)
                            .on_delete(ForeignKeyAction::Restrict),
                    )
                    .to_owned(),
            )
            .await?;

        manager
            .create_table(
                Table::create()
                    .table(Rooms::Table)
                    .if_not_exists()
                    .col(
                        ColumnDef::new(Rooms::Id)
                            .integer()
                            .not_null()
                            .auto_increment()
                            .primary_key(),
                    )
                    .col(ColumnDef::new(Rooms::HotelId).integer().not_null())
                    .col(ColumnDef::new(Rooms::Title).string_len(200).not_null())
                    .col(ColumnDef::new(Rooms::Description).text().null())
                    .col(ColumnDef::new(Rooms::PricePerNight).integer().not_null())
                    .col(ColumnDef::new(Rooms::Capacity).integer().not_null())
                    .check(Expr::col(Rooms::PricePerNight).gt(0))
                    .check(Expr::col(Rooms::Capacity).gt(0))
                    .foreign_key(
                        ForeignKey::create()
                            .name("fk_rooms_hotel_id")
                            .from(Rooms::Table, Rooms::HotelId)
                            .to(Hotels::Table, Hotels::Id)
                            .on_delete(ForeignKeyAction::Cascade),
                    )
                    .to_owned(),
            )
            .await?;

        manager
            .create_table(
                Table::create()
                    .table(Images::Table)
                    .if_not_exists()
                    .col(
                        ColumnDef::new(Images::Id)
                            .integer()
                            .not_null()
                            .auto_increment()
                            .primary_key(),
                    )
                    .col(ColumnDef::new(Images::HotelId).integer().not_null())
                    .col(ColumnDef::new(Images::Url).string_len(2048).not_null())
                    .col(ColumnDef::new(Images::Description).string_len(500).null())
                    .foreign_key(
                        ForeignKey::create()
                            .name("fk_images_hotel_id")
                            .from(Images::Table, Images::HotelId)
                            .to(Hotels::Table, Hotels::Id)
                            .on_delete(ForeignKeyAction::Cascade),
                    )
                    .to_owned(),
            )
            .await?;

        manager
            .create_index(
                Index::create()
                    .name("idx_hotels_city_id")
                    .table(Hotels::Table)
                    .col(Hotels::CityId)
                    .to_owned(),
            )
            .await?;
        manager
            .create_index(
                Index::create()
                    .name("idx_rooms_hotel_id")
                    .table(Rooms::Table)
                    .col(Rooms::HotelId)
                    .to_owned(),
            )
            .await?;
        manager
            .create_index(
                Index::create()
                    .name("idx_images_hotel_id")
                    .table(Images::Table)
                    .col(Images::HotelId)
                    .to_owned(),
            )
            .await
    }

    async fn down(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .drop_table(Table::drop().table(Images::Table).to_owned())
            .await?;
        manager
            .drop_table(Table::drop().table(Rooms::Table).to_owned())
            .await?;
        manager
            .drop_table(Table::drop().table(Hotels::Table).to_owned())
            .await
    }
}

#[derive(Iden)]
pub enum Hotels {
    Table,
    Id,
    Title,
    Address,
    PostalCode,
    CityId,
    CheckInTime,
    CheckOutTime,
}

#[derive(Iden)]
pub enum Rooms {
    Table,
    Id,
    HotelId,
    Title,
    Description,
    PricePerNight,
    Capacity,
}

#[derive(Iden)]
enum Images {
    Table,
    Id,
    HotelId,
    Url,
    Description,
}
