use crate::entities::{role_entity as roles, users_roles_entity as users_roles, RoleName};
use crate::error::{AppError, AppResult};
use crate::models::{UpdateProfileRequest, UpdateRolesRequest, UserResponse};
use sea_orm::{
    ActiveModelTrait, ColumnTrait, DatabaseConnection, EntityTrait, IntoActiveModel, QueryFilter,
    Set, SqlErr, TransactionTrait,
};

#[derive(Clone)]
pub struct UserService {
    pool: DatabaseConnection,
}

impl UserService {
    pub fn new(pool: DatabaseConnection) -> Self {
        Self { pool }
    }

    pub async fn get_profile(&self, user_id: i64) -> AppResult<UserResponse> {
        let user = super::require_user(&self.pool, user_id).await?;
        let roles = super::user_roles(&self.pool, &user).await?;
        Ok(UserResponse::from_parts(user, &roles))
    }

    pub async fn update_profile(
        &self,
        user_id: i64,
        req: UpdateProfileRequest,
    ) -> AppResult<UserResponse> {
        let user = super::require_user(&self.pool, user_id).await?;

        let email = req.email.trim().to_lowercase();
        if email.is_empty() || !email.contains('@') {
            return Err(AppError::ValidationError("Invalid email address".into()));
        }
        if req.first_name.trim().is_empty() || req.last_name.trim().is_empty() {
            return Err(AppError::ValidationError(
                "First and last name are required".into(),
            ));
        }

        let mut am = user.into_active_model();
        am.email = Set(email);
        am.first_name = Set(req.first_name.trim().to_string());
        am.last_name = Set(req.last_name.trim().to_string());

        let user = match am.update(&self.pool).await {
            Ok(user) => user,
            Err(e) => {
                return match e.sql_err() {
                    Some(SqlErr::UniqueConstraintViolation(_)) => Err(AppError::RegistrationError(
                        "Email is already registered".into(),
                    )),
                    _ => Err(e.into()),
                };
            }
        };

        let roles = super::user_roles(&self.pool, &user).await?;
        Ok(UserResponse::from_parts(user, &roles))
    }

    /// Grants roles to a user. Roles are only ever added, never revoked here.
    pub async fn update_roles(
        &self,
        caller_id: i64,
        target_user_id: i64,
        req: UpdateRolesRequest,
    ) -> AppResult<UserResponse> {
        if !super::is_manager(&self.pool, caller_id).await? {
            return Err(AppError::PermissionDenied(
                "Only managers can update roles".into(),
            ));
        }

        let mut requested = Vec::new();
        for name in &req.roles {
            let role: RoleName = name
                .parse()
                .map_err(|_| AppError::NotFound(format!("Role {name} not found")))?;
            if !requested.contains(&role) {
                requested.push(role);
            }
        }
        if requested.is_empty() {
            return Err(AppError::ValidationError(
                "At least one role is required".into(),
            ));
        }

        let txn = self.pool.begin().await?;
        let user = super::require_user(&txn, target_user_id).await?;
        let current = super::user_roles(&txn, &user).await?;

        for role in requested {
            if current.contains(&role) {
                continue;
            }
            let role_row = roles::Entity::find()
                .filter(roles::Column::Name.eq(role))
                .one(&txn)
                .await?
                .ok_or_else(|| AppError::InternalError(format!("Role {role} is not seeded")))?;
            users_roles::ActiveModel {
                user_id: Set(user.id),
                role_id: Set(role_row.id),
            }
            .insert(&txn)
            .await?;
        }
        txn.commit().await?;

        let user = super::require_user(&self.pool, target_user_id).await?;
        let roles = super::user_roles(&self.pool, &user).await?;
        log::info!("User {caller_id} updated roles of user {target_user_id}: {roles:?}");
        Ok(UserResponse::from_parts(user, &roles))
    }
}
