//! Migration: facilities and their links to hotels and rooms.

use sea_orm_migration::prelude::*;

use super::m20240101_000003_create_hotels_tables::{Hotels, Rooms};

#[derive(DeriveMigrationName)]
pub struct Migration;

#[async_trait::async_trait]
impl MigrationTrait for Migration {
    async fn up(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .create_table(
                Table::create()
                    .table(Facilities::Table)
                    .if_not_exists()
                    .col(
                        ColumnDef::new(Facilities::Id)
                            .integer()
                            .not_null()
                            .auto_increment()
                            .primary_key(),
                    )
                    .col(ColumnDef::new(Facilities::Name).string_len(100).not_null())
                    .to_owned(),
            )
            .await?;

        manager
            .create_table(
                Table::create()
                    .table(HotelsFacilities::Table)
                    .if_not_exists()
                    .col(ColumnDef::new(HotelsFacilities::HotelId).integer().not_null())
                    .col(ColumnDef::new(HotelsFacilities::FacilityId).integer().not_null())
                    .primary_key(
                        Index::create()
                            .col(HotelsFacilities::HotelId)
                            .col(HotelsFacilities::FacilityId),
                    )
                    .foreign_key(
                        ForeignKey::create()
                            .name("fk_hotels_facilities_hotel_id")
                            .from(HotelsFacilities::Table, HotelsFacilities::HotelId)
                            .to(Hotels::Table, Hotels::Id)
                            .on_delete(ForeignKeyAction::Cascade),
                    )
                    .foreign_key(
                        ForeignKey::create()
                            .name("fk_hotels_facilities_facility_id")
                            .from(HotelsFacilities::Table, HotelsFacilities::FacilityId)
                            .to(Facilities::Table, Facilities::Id)
                            .on_delete(ForeignKeyAction::Cascade),
                    )
                    .to_owned(),
            )
            .await?;

        manager
            .create_table(
                Table::create()
                    .table(RoomsFacilities::Table)
                    .if_not_exists()
                    .col(ColumnDef::new(RoomsFacilities::RoomId).integer().not_null())
                    .col(ColumnDef::new(RoomsFacilities::FacilityId).integer().not_null())
                    .primary_key(
                        Index::create()
                            .col(RoomsFacilities::RoomId)
                            .col(RoomsFacilities::FacilityId),
                    )
                    .foreign_key(
                        ForeignKey::create()
                            .name("fk_rooms_facilities_room_id")
                            .from(RoomsFacilities::Table, RoomsFacilities::RoomId)
                            .to(Rooms::Table, Rooms::Id)
                            .on_delete(ForeignKeyAction::Cascade),
                    )
                    .foreign_key(
                        ForeignKey::create()
                            .name("fk_rooms_facilities_facility_id")
                            .from(RoomsFacilities::Table, RoomsFacilities::FacilityId)
                            .to(Facilities::Table, Facilities::Id)
                            .on_delete(ForeignKeyAction::Cascade),
                    )
                    .to_owned(),
            )
            .await
    }

    async fn down(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .drop_table(Table::drop().table(RoomsFacilities::Table).to_owned())
            .await?;
        manager
            .drop_table(Table::drop().table(HotelsFacilities::Table).to_owned())
            .await?;
        manager
            .drop_table(Table::drop().table(Facilities::Table).to_owned())
            .await
    }
}

#[derive(Iden)]
enum Facilities {
    Table,
    Id,
    Name,
}

#[derive(Iden)]
enum HotelsFacilities {
    Table,
    HotelId,
    FacilityId,
}

#[derive(Iden)]
enum RoomsFacilities {
    Table,
    RoomId,
    FacilityId,
}
