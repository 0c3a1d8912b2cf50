use sea_orm::entity::prelude::*;
use serde::{Deserialize, Serialize};
use std::str::FromStr;
use utoipa::ToSchema;

#[derive(
    Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, ToSchema, DeriveActiveEnum, EnumIter,
)]
#[sea_orm(rs_type = "String", db_type = "String(None)")]
pub enum CarTypeName {
    #[sea_orm(string_value = "SEDAN")]
    Sedan,
    #[sea_orm(string_value = "SUV")]
    Suv,
    #[sea_orm(string_value = "HATCHBACK")]
    Hatchback,
}

impl std::fmt::Display for CarTypeName {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            CarTypeName::Sedan => write!(f, "SEDAN"),
            CarTypeName::Suv => write!(f, "SUV"),
            CarTypeName::Hatchback => write!(f, "HATCHBACK"),
        }
    }
}

impl FromStr for CarTypeName {
    type Err = ();

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_uppercase().as_str() {
            "SEDAN" => Ok(CarTypeName::Sedan),
            "SUV" => Ok(CarTypeName::Suv),
            "HATCHBACK" => Ok(CarTypeName::Hatchback),
            _ => Err(()),
        }
    }
}

#[derive(Clone, Debug, PartialEq, DeriveEntityModel, Eq)]
#[sea_orm(table_name = "car_types")]
pub struct Model {
    #[sea_orm(primary_key)]
    pub id: i64,
    pub name: CarTypeName,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {
    #[sea_orm(has_many = "super::cars::Entity")]
    Cars,
}

impl Related<super::cars::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::Cars.def()
    }
}

impl ActiveModelBehavior for ActiveModel {}
