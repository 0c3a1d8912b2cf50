use crate::entities::{
    role_entity as roles, user_entity as users, users_roles_entity as users_roles, RoleName,
};
use crate::error::{AppError, AppResult};
use crate::models::{AuthResponse, LoginRequest, RegisterRequest, UserResponse};
use crate::utils::{hash_password, validate_password, verify_password, JwtService};
use sea_orm::{
    ActiveModelTrait, ColumnTrait, DatabaseConnection, EntityTrait, QueryFilter, Set, SqlErr,
    TransactionTrait,
};

#[derive(Clone)]
pub struct AuthService {
    pool: DatabaseConnection,
    jwt_service: JwtService,
}

impl AuthService {
    pub fn new(pool: DatabaseConnection, jwt_service: JwtService) -> Self {
        Self { pool, jwt_service }
    }

    pub async fn register(&self, req: RegisterRequest) -> AppResult<UserResponse> {
        let email = req.email.trim().to_lowercase();
        if email.is_empty() || !email.contains('@') {
            return Err(AppError::ValidationError("Invalid email address".into()));
        }
        if req.first_name.trim().is_empty() || req.last_name.trim().is_empty() {
            return Err(AppError::ValidationError(
                "First and last name are required".into(),
            ));
        }
        validate_password(&req.password)?;
        if req.password != req.repeat_password {
            return Err(AppError::ValidationError("Passwords do not match".into()));
        }

        let existing = users::Entity::find()
            .filter(users::Column::Email.eq(email.clone()))
            .one(&self.pool)
            .await?;
        if existing.is_some() {
            return Err(AppError::RegistrationError(format!(
                "Email {email} is already registered"
            )));
        }

        let password_hash = hash_password(&req.password)?;

        let txn = self.pool.begin().await?;
        let insert = users::ActiveModel {
            email: Set(email.clone()),
            password_hash: Set(password_hash),
            first_name: Set(req.first_name.trim().to_string()),
            last_name: Set(req.last_name.trim().to_string()),
            ..Default::default()
        }
        .insert(&txn)
        .await;
        let user = match insert {
            Ok(user) => user,
            // concurrent registration may slip past the pre-check
            Err(e) => {
                return match e.sql_err() {
                    Some(SqlErr::UniqueConstraintViolation(_)) => Err(AppError::RegistrationError(
                        format!("Email {email} is already registered"),
                    )),
                    _ => Err(e.into()),
                };
            }
        };

        let customer_role = roles::Entity::find()
            .filter(roles::Column::Name.eq(RoleName::Customer))
            .one(&txn)
            .await?
            .ok_or_else(|| AppError::InternalError("CUSTOMER role is not seeded".into()))?;
        users_roles::ActiveModel {
            user_id: Set(user.id),
            role_id: Set(customer_role.id),
        }
        .insert(&txn)
        .await?;
        txn.commit().await?;

        log::info!("Registered new user {} ({})", user.id, user.email);
        Ok(UserResponse::from_parts(user, &[RoleName::Customer]))
    }

    pub async fn login(&self, req: LoginRequest) -> AppResult<AuthResponse> {
        let email = req.email.trim().to_lowercase();
        let user = users::Entity::find()
            .filter(users::Column::Email.eq(email))
            .one(&self.pool)
            .await?
            .ok_or_else(|| AppError::AuthError("Invalid email or password".into()))?;
        if user.is_deleted {
            return Err(AppError::AuthError("Invalid email or password".into()));
        }
        if !verify_password(&req.password, &user.password_hash)? {
            return Err(AppError::AuthError("Invalid email or password".into()));
        }

        let roles = super::user_roles(&self.pool, &user).await?;
        let access_token = self
            .jwt_service
            .generate_access_token(user.id, &user.email)?;
        let refresh_token = self
            .jwt_service
            .generate_refresh_token(user.id, &user.email)?;
        let expires_in = self.jwt_service.get_access_token_expires_in();

        Ok(AuthResponse {
            user: UserResponse::from_parts(user, &roles),
            access_token,
            refresh_token,
            expires_in,
        })
    }

    pub async fn refresh_token(&self, refresh_token: &str) -> AppResult<AuthResponse> {
        let claims = self.jwt_service.verify_refresh_token(refresh_token)?;
        let user_id: i64 = claims
            .sub
            .parse()
            .map_err(|_| AppError::AuthError("Invalid token subject".into()))?;
        let user = super::require_user(&self.pool, user_id)
            .await
            .map_err(|_| AppError::AuthError("User no longer exists".into()))?;

        let roles = super::user_roles(&self.pool, &user).await?;
        let access_token = self
            .jwt_service
            .generate_access_token(user.id, &user.email)?;
        let refresh_token = self
            .jwt_service
            .generate_refresh_token(user.id, &user.email)?;
        let expires_in = self.jwt_service.get_access_token_expires_in();

        Ok(AuthResponse {
            user: UserResponse::from_parts(user, &roles),
            access_token,
            refresh_token,
            expires_in,
        })
    }

    /// Creates the bootstrap manager account on startup if configured and absent.
    pub async fn ensure_default_manager(&self, email: &str, password: &str) -> AppResult<()> {
        if email.is_empty() || password.is_empty() {
            return Ok(());
        }
        let email = email.trim().to_lowercase();
        let existing = users::Entity::find()
            .filter(users::Column::Email.eq(email.clone()))
            .one(&self.pool)
            .await?;
        if existing.is_some() {
            return Ok(());
        }

        let password_hash = hash_password(password)?;
        let txn = self.pool.begin().await?;
        let user = users::ActiveModel {
            email: Set(email.clone()),
            password_hash: Set(password_hash),
            first_name: Set("Default".to_string()),
            last_name: Set("Manager".to_string()),
            ..Default::default()
        }
        .insert(&txn)
        .await?;
        let manager_role = roles::Entity::find()
            .filter(roles::Column::Name.eq(RoleName::Manager))
            .one(&txn)
            .await?
            .ok_or_else(|| AppError::InternalError("MANAGER role is not seeded".into()))?;
        users_roles::ActiveModel {
            user_id: Set(user.id),
            role_id: Set(manager_role.id),
        }
        .insert(&txn)
        .await?;
        txn.commit().await?;
        log::info!("Created default manager account {email}");
        Ok(())
    }
}
