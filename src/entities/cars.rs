use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use sea_orm::entity::prelude::*;

#[derive(Clone, Debug, PartialEq, DeriveEntityModel, Eq)]
#[sea_orm(table_name = "cars")]
pub struct Model {
    #[sea_orm(primary_key)]
    pub id: i64,
    pub model: String,
    pub brand: String,
    pub car_type_id: i64,
    pub available_units: i32,
    #[sea_orm(column_type = "Decimal(Some((19, 2)))")]
    pub daily_price: Decimal,
    pub is_deleted: bool,
    pub created_at: Option<DateTime<Utc>>,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {
    #[sea_orm(
        belongs_to = "super::car_types::Entity",
        from = "Column::CarTypeId",
        to = "super::car_types::Column::Id"
    )]
    CarType,
    #[sea_orm(has_many = "super::rentals::Entity")]
    Rentals,
}

impl Related<super::car_types::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::CarType.def()
    }
}

impl Related<super::rentals::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::Rentals.def()
    }
}

impl ActiveModelBehavior for ActiveModel {}
