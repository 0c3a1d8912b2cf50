use sea_orm_migration::prelude::*;

#[derive(DeriveIden)]
enum Roles {
    Table,
    Id,
    Name,
}

#[derive(DeriveIden)]
enum Users {
    Table,
    Id,
    Email,
    PasswordHash,
    FirstName,
    LastName,
    IsDeleted,
    CreatedAt,
}

#[derive(DeriveIden)]
enum UsersRoles {
    Table,
    UserId,
    RoleId,
}

#[derive(DeriveIden)]
enum CarTypes {
    Table,
    Id,
    Name,
}

#[derive(DeriveIden)]
enum Cars {
    Table,
    Id,
    Model,
    Brand,
    CarTypeId,
    AvailableUnits,
    DailyPrice,
    IsDeleted,
    CreatedAt,
}

#[derive(DeriveIden)]
enum Rentals {
    Table,
    Id,
    RentalDate,
    ReturnDate,
    ActualReturnDate,
    CarId,
    UserId,
    IsDeleted,
    CreatedAt,
}

#[derive(DeriveIden)]
enum PaymentStatuses {
    Table,
    Id,
    Name,
}

#[derive(DeriveIden)]
enum PaymentTypes {
    Table,
    Id,
    Name,
}

#[derive(DeriveIden)]
enum Payments {
    Table,
    Id,
    StatusId,
    TypeId,
    RentalId,
    SessionUrl,
    SessionId,
    AmountToPay,
    IsDeleted,
    CreatedAt,
}

#[derive(DeriveMigrationName)]
pub struct Migration;

#[async_trait::async_trait]
impl MigrationTrait for Migration {
    async fn up(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .create_table(
                Table::create()
                    .table(Roles::Table)
                    .if_not_exists()
                    .col(
                        ColumnDef::new(Roles::Id)
                            .big_integer()
                            .not_null()
                            .auto_increment()
                            .primary_key(),
                    )
                    .col(
                        ColumnDef::new(Roles::Name)
                            .string()
                            .not_null()
                            .unique_key(),
                    )
                    .to_owned(),
            )
            .await?;

        manager
            .create_table(
                Table::create()
                    .table(Users::Table)
                    .if_not_exists()
                    .col(
                        ColumnDef::new(Users::Id)
                            .big_integer()
                            .not_null()
                            .auto_increment()
                            .primary_key(),
                    )
                    .col(
                        ColumnDef::new(Users::Email)
                            .string()
                            .not_null()
                            .unique_key(),
                    )
                    .col(ColumnDef::new(Users::PasswordHash).string().not_null())
                    .col(ColumnDef::new(Users::FirstName).string().not_null())
                    .col(ColumnDef::new(Users::LastName).string().not_null())
                    .col(
                        ColumnDef::new(Users::IsDeleted)
                            .boolean()
                            .not_null()
                            .default(false),
                    )
                    .col(
                        ColumnDef::new(Users::CreatedAt)
                            .timestamp_with_time_zone()
                            .default(Expr::current_timestamp()),
                    )
                    .to_owned(),
            )
            .await?;

        manager
            .create_table(
                Table::create()
                    .table(UsersRoles::Table)
                    .if_not_exists()
                    .col(
                        ColumnDef::new(UsersRoles::UserId)
                            .big_integer()
                            .not_null(),
                    )
                    .col(
                        ColumnDef::new(UsersRoles::RoleId)
                            .big_integer()
                            .not_null(),
                    )
                    .primary_key(
                        Index::create()
                            .col(UsersRoles::UserId)
                            .col(UsersRoles::RoleId),
                    )
                    .foreign_key(
                        ForeignKey::create()
                            .name("fk_users_roles_user_id")
                            .from(UsersRoles::Table, UsersRoles::UserId)
                            .to(Users::Table, Users::Id),
                    )
                    .foreign_key(
                        ForeignKey::create()
                            .name("fk_users_roles_role_id")
                            .from(UsersRoles::Table, UsersRoles::RoleId)
                            .to(Roles::Table, Roles::Id),
                    )
                    .to_owned(),
            )
            .await?;

        manager
            .create_table(
                Table::create()
                    .table(CarTypes::Table)
                    .if_not_exists()
                    .col(
                        ColumnDef::new(CarTypes::Id)
                            .big_integer()
                            .not_null()
                            .auto_increment()
                            .primary_key(),
                    )
                    .col(
                        ColumnDef::new(CarTypes::Name)
                            .string()
                            .not_null()
                            .unique_key(),
                    )
                    .to_owned(),
            )
            .await?;

        manager
            .create_table(
                Table::create()
                    .table(Cars::Table)
                    .if_not_exists()
                    .col(
                        ColumnDef::new(Cars::Id)
                            .big_integer()
                            .not_null()
                            .auto_increment()
                            .primary_key(),
                    )
                    .col(ColumnDef::new(Cars::Model).string().not_null())
                    .col(ColumnDef::new(Cars::Brand).string().not_null())
                    .col(ColumnDef::new(Cars::CarTypeId).big_integer().not_null())
                    .col(
                        ColumnDef::new(Cars::AvailableUnits)
                            .integer()
                            .not_null()
                            .default(0),
                    )
                    .col(
                        ColumnDef::new(Cars::DailyPrice)
                            .decimal_len(19, 2)
                            .not_null(),
                    )
                    .col(
                        ColumnDef::new(Cars::IsDeleted)
                            .boolean()
                            .not_null()
                            .default(false),
                    )
                    .col(
                        ColumnDef::new(Cars::CreatedAt)
                            .timestamp_with_time_zone()
                            .default(Expr::current_timestamp()),
                    )
                    .foreign_key(
                        ForeignKey::create()
                            .name("fk_cars_car_type_id")
                            .from(Cars::Table, Cars::CarTypeId)
                            .to(CarTypes::Table, CarTypes::Id),
                    )
                    .to_owned(),
            )
            .await?;

        manager
            .create_table(
                Table::create()
                    .table(Rentals::Table)
                    .if_not_exists()
                    .col(
                        ColumnDef::new(Rentals::Id)
                            .big_integer()
                            .not_null()
                            .auto_increment()
                            .primary_key(),
                    )
                    .col(
                        ColumnDef::new(Rentals::RentalDate)
                            .timestamp_with_time_zone()
                            .not_null(),
                    )
                    .col(
                        ColumnDef::new(Rentals::ReturnDate)
                            .timestamp_with_time_zone()
                            .not_null(),
                    )
                    .col(
                        ColumnDef::new(Rentals::ActualReturnDate)
                            .timestamp_with_time_zone()
                            .null(),
                    )
                    .col(ColumnDef::new(Rentals::CarId).big_integer().not_null())
                    .col(ColumnDef::new(Rentals::UserId).big_integer().not_null())
                    .col(
                        ColumnDef::new(Rentals::IsDeleted)
                            .boolean()
                            .not_null()
                            .default(false),
                    )
                    .col(
                        ColumnDef::new(Rentals::CreatedAt)
                            .timestamp_with_time_zone()
                            .default(Expr::current_timestamp()),
                    )
                    .foreign_key(
                        ForeignKey::create()
                            .name("fk_rentals_car_id")
                            .from(Rentals::Table, Rentals::CarId)
                            .to(Cars::Table, Cars::Id),
                    )
                    .foreign_key(
                        ForeignKey::create()
                            .name("fk_rentals_user_id")
                            .from(Rentals::Table, Rentals::UserId)
                            .to(Users::Table, Users::Id),
                    )
                    .to_owned(),
            )
            .await?;

        manager
            .create_index(
                Index::create()
                    .name("idx_rentals_car_id")
                    .table(Rentals::Table)
                    .col(Rentals::CarId)
                    .to_owned(),
            )
            .await?;

        manager
            .create_index(
                Index::create()
                    .name("idx_rentals_user_id")
                    .table(Rentals::Table)
                    .col(Rentals::UserId)
                    .to_owned(),
            )
            .await?;

        manager
            .create_table(
                Table::create()
                    .table(PaymentStatuses::Table)
                    .if_not_exists()
                    .col(
                        ColumnDef::new(PaymentStatuses::Id)
                            .big_integer()
                            .not_null()
                            .auto_increment()
                            .primary_key(),
                    )
                    .col(
                        ColumnDef::new(PaymentStatuses::Name)
                            .string()
                            .not_null()
                            .unique_key(),
                    )
                    .to_owned(),
            )
            .await?;

        manager
            .create_table(
                Table::create()
                    .table(PaymentTypes::Table)
                    .if_not_exists()
                    .col(
                        ColumnDef::new(PaymentTypes::Id)
                            .big_integer()
                            .not_null()
                            .auto_increment()
                            .primary_key(),
                    )
                    .col(
                        ColumnDef::new(PaymentTypes::Name)
                            .string()
                            .not_null()
                            .unique_key(),
                    )
                    .to_owned(),
            )
            .await?;

        manager
            .create_table(
                Table::create()
                    .table(Payments::Table)
                    .if_not_exists()
                    .col(
                        ColumnDef::new(Payments::Id)
                            .big_integer()
                            .not_null()
                            .auto_increment()
                            .primary_key(),
                    )
                    .col(ColumnDef::new(Payments::StatusId).big_integer().not_null())
                    .col(ColumnDef::new(Payments::TypeId).big_integer().not_null())
                    .col(ColumnDef::new(Payments::RentalId).big_integer().not_null())
                    .col(ColumnDef::new(Payments::SessionUrl).text().null())
                    .col(ColumnDef::new(Payments::SessionId).string().null())
                    .col(
                        ColumnDef::new(Payments::AmountToPay)
                            .decimal_len(19, 2)
                            .not_null(),
                    )
                    .col(
                        ColumnDef::new(Payments::IsDeleted)
                            .boolean()
                            .not_null()
                            .default(false),
                    )
                    .col(
                        ColumnDef::new(Payments::CreatedAt)
                            .timestamp_with_time_zone()
                            .default(Expr::current_timestamp()),
                    )
                    .foreign_key(
                        ForeignKey::create()
                            .name("fk_payments_status_id")
                            .from(Payments::Table, Payments::StatusId)
                            .to(PaymentStatuses::Table, PaymentStatuses::Id),
                    )
                    .foreign_key(
                        ForeignKey::create()
                            .name("fk_payments_type_id")
                            .from(Payments::Table, Payments::TypeId)
                            .to(PaymentTypes::Table, PaymentTypes::Id),
                    )
                    .foreign_key(
                        ForeignKey::create()
                            .name("fk_payments_rental_id")
                            .from(Payments::Table, Payments::RentalId)
                            .to(Rentals::Table, Rentals::Id),
                    )
                    .to_owned(),
            )
            .await?;

        manager
            .create_index(
                Index::create()
                    .name("idx_payments_rental_id")
                    .table(Payments::Table)
                    .col(Payments::RentalId)
                    .to_owned(),
            )
            .await?;

        manager
            .create_index(
                Index::create()
                    .name("idx_payments_status_id")
                    .table(Payments::Table)
                    .col(Payments::StatusId)
                    .to_owned(),
            )
            .await?;

        Ok(())
    }

    async fn down(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .drop_table(Table::drop().table(Payments::Table).to_owned())
            .await?;
        manager
            .drop_table(Table::drop().table(PaymentTypes::Table).to_owned())
            .await?;
        manager
            .drop_table(Table::drop().table(PaymentStatuses::Table).to_owned())
            .await?;
        manager
            .drop_table(Table::drop().table(Rentals::Table).to_owned())
            .await?;
        manager
            .drop_table(Table::drop().table(Cars::Table).to_owned())
            .await?;
        manager
            .drop_table(Table::drop().table(CarTypes::Table).to_owned())
            .await?;
        manager
            .drop_table(Table::drop().table(UsersRoles::Table).to_owned())
            .await?;
        manager
            .drop_table(Table::drop().table(Users::Table).to_owned())
            .await?;
        manager
            .drop_table(Table::drop().table(Roles::Table).to_owned())
            .await
    }
}
