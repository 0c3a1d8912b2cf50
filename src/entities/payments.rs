use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use sea_orm::entity::prelude::*;

/// A payment session opened against the gateway for a finished rental.
/// Created PENDING; moves to PAID exactly once via the success callback.
#[derive(Clone, Debug, PartialEq, DeriveEntityModel, Eq)]
#[sea_orm(table_name = "payments")]
pub struct Model {
    #[sea_orm(primary_key)]
    pub id: i64,
    pub status_id: i64,
    pub type_id: i64,
    pub rental_id: i64,
    pub session_url: Option<String>,
    pub session_id: Option<String>,
    #[sea_orm(column_type = "Decimal(Some((19, 2)))")]
    pub amount_to_pay: Decimal,
    pub is_deleted: bool,
    pub created_at: Option<DateTime<Utc>>,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {
    #[sea_orm(
        belongs_to = "super::payment_statuses::Entity",
        from = "Column::StatusId",
        to = "super::payment_statuses::Column::Id"
    )]
    Status,
    #[sea_orm(
        belongs_to = "super::payment_types::Entity",
        from = "Column::TypeId",
        to = "super::payment_types::Column::Id"
    )]
    PaymentType,
    #[sea_orm(
        belongs_to = "super::rentals::Entity",
        from = "Column::RentalId",
        to = "super::rentals::Column::Id"
    )]
    Rental,
}

impl Related<super::payment_statuses::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::Status.def()
    }
}

impl Related<super::payment_types::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::PaymentType.def()
    }
}

impl Related<super::rentals::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::Rental.def()
    }
}

impl ActiveModelBehavior for ActiveModel {}
