use sea_orm_migration::prelude::*;
use sea_orm_migration::sea_query::OnConflict;

#[derive(DeriveIden)]
enum Roles {
    Table,
    Name,
}

#[derive(DeriveIden)]
enum CarTypes {
    Table,
    Name,
}

#[derive(DeriveIden)]
enum PaymentStatuses {
    Table,
    Name,
}

#[derive(DeriveIden)]
enum PaymentTypes {
    Table,
    Name,
}

const ROLE_NAMES: [&str; 2] = ["CUSTOMER", "MANAGER"];
const CAR_TYPE_NAMES: [&str; 3] = ["SEDAN", "SUV", "HATCHBACK"];
const PAYMENT_STATUS_NAMES: [&str; 2] = ["PENDING", "PAID"];
const PAYMENT_TYPE_NAMES: [&str; 2] = ["PAYMENT", "FINE"];

#[derive(DeriveMigrationName)]
pub struct Migration;

#[async_trait::async_trait]
impl MigrationTrait for Migration {
    async fn up(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        for name in ROLE_NAMES {
            let stmt = Query::insert()
                .into_table(Roles::Table)
                .columns([Roles::Name])
                .values_panic([name.into()])
                .on_conflict(OnConflict::column(Roles::Name).do_nothing().to_owned())
                .to_owned();
            manager.exec_stmt(stmt).await?;
        }

        for name in CAR_TYPE_NAMES {
            let stmt = Query::insert()
                .into_table(CarTypes::Table)
                .columns([CarTypes::Name])
                .values_panic([name.into()])
                .on_conflict(OnConflict::column(CarTypes::Name).do_nothing().to_owned())
                .to_owned();
            manager.exec_stmt(stmt).await?;
        }

        for name in PAYMENT_STATUS_NAMES {
            let stmt = Query::insert()
                .into_table(PaymentStatuses::Table)
                .columns([PaymentStatuses::Name])
                .values_panic([name.into()])
                .on_conflict(
                    OnConflict::column(PaymentStatuses::Name)
                        .do_nothing()
                        .to_owned(),
                )
                .to_owned();
            manager.exec_stmt(stmt).await?;
        }

        for name in PAYMENT_TYPE_NAMES {
            let stmt = Query::insert()
                .into_table(PaymentTypes::Table)
                .columns([PaymentTypes::Name])
                .values_panic([name.into()])
                .on_conflict(
                    OnConflict::column(PaymentTypes::Name)
                        .do_nothing()
                        .to_owned(),
                )
                .to_owned();
            manager.exec_stmt(stmt).await?;
        }

        Ok(())
    }

    async fn down(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .exec_stmt(
                Query::delete()
                    .from_table(PaymentTypes::Table)
                    .and_where(Expr::col(PaymentTypes::Name).is_in(PAYMENT_TYPE_NAMES))
                    .to_owned(),
            )
            .await?;
        manager
            .exec_stmt(
                Query::delete()
                    .from_table(PaymentStatuses::Table)
                    .and_where(Expr::col(PaymentStatuses::Name).is_in(PAYMENT_STATUS_NAMES))
                    .to_owned(),
            )
            .await?;
        manager
            .exec_stmt(
                Query::delete()
                    .from_table(CarTypes::Table)
                    .and_where(Expr::col(CarTypes::Name).is_in(CAR_TYPE_NAMES))
                    .to_owned(),
            )
            .await?;
        manager
            .exec_stmt(
                Query::delete()
                    .from_table(Roles::Table)
                    .and_where(Expr::col(Roles::Name).is_in(ROLE_NAMES))
                    .to_owned(),
            )
            .await?;

        Ok(())
    }
}
