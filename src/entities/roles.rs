use sea_orm::entity::prelude::*;
use serde::{Deserialize, Serialize};
use std::str::FromStr;
use utoipa::ToSchema;

/// Authorization role names stored in the `roles` reference table.
#[derive(
    Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, ToSchema, DeriveActiveEnum, EnumIter,
)]
#[sea_orm(rs_type = "String", db_type = "String(None)")]
pub enum RoleName {
    #[sea_orm(string_value = "CUSTOMER")]
    Customer,
    #[sea_orm(string_value = "MANAGER")]
    Manager,
}

impl std::fmt::Display for RoleName {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            RoleName::Customer => write!(f, "CUSTOMER"),
            RoleName::Manager => write!(f, "MANAGER"),
        }
    }
}

impl FromStr for RoleName {
    type Err = ();

    /// Accepts role names case-insensitively and ignores surrounding whitespace.
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_uppercase().as_str() {
            "CUSTOMER" => Ok(RoleName::Customer),
            "MANAGER" => Ok(RoleName::Manager),
            _ => Err(()),
        }
    }
}

#[derive(Clone, Debug, PartialEq, DeriveEntityModel, Eq)]
#[sea_orm(table_name = "roles")]
pub struct Model {
    #[sea_orm(primary_key)]
    pub id: i64,
    pub name: RoleName,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {
    #[sea_orm(has_many = "super::users_roles::Entity")]
    UsersRoles,
}

impl Related<super::users_roles::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::UsersRoles.def()
    }
}

impl Related<super::users::Entity> for Entity {
    fn to() -> RelationDef {
        super::users_roles::Relation::User.def()
    }

    fn via() -> Option<RelationDef> {
        Some(super::users_roles::Relation::Role.def().rev())
    }
}

impl ActiveModelBehavior for ActiveModel {}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_role_names_case_insensitively() {
        assert_eq!("manager".parse::<RoleName>(), Ok(RoleName::Manager));
        assert_eq!(" Customer ".parse::<RoleName>(), Ok(RoleName::Customer));
        assert_eq!("MANAGER".parse::<RoleName>(), Ok(RoleName::Manager));
        assert!("driver".parse::<RoleName>().is_err());
        assert!("".parse::<RoleName>().is_err());
    }
}
