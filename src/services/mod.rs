pub mod auth_service;
pub mod car_service;
pub mod payment_service;
pub mod rental_service;
pub mod user_service;

pub use auth_service::*;
pub use car_service::*;
pub use payment_service::*;
pub use rental_service::*;
pub use user_service::*;

use crate::entities::{role_entity as roles, user_entity as users, RoleName};
use crate::error::{AppError, AppResult};
use sea_orm::{ConnectionTrait, EntityTrait, ModelTrait};

/// Loads a live user or fails with 404.
pub async fn require_user<C: ConnectionTrait>(db: &C, user_id: i64) -> AppResult<users::Model> {
    let user = users::Entity::find_by_id(user_id)
        .one(db)
        .await?
        .ok_or_else(|| AppError::NotFound(format!("User {user_id} not found")))?;
    if user.is_deleted {
        return Err(AppError::NotFound(format!("User {user_id} not found")));
    }
    Ok(user)
}

pub async fn user_roles<C: ConnectionTrait>(
    db: &C,
    user: &users::Model,
) -> AppResult<Vec<RoleName>> {
    let roles = user
        .find_related(roles::Entity)
        .all(db)
        .await?
        .into_iter()
        .map(|r| r.name)
        .collect();
    Ok(roles)
}

pub async fn is_manager<C: ConnectionTrait>(db: &C, user_id: i64) -> AppResult<bool> {
    let user = require_user(db, user_id).await?;
    let roles = user_roles(db, &user).await?;
    Ok(roles.contains(&RoleName::Manager))
}
