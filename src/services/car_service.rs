use crate::entities::{car_entity as cars, car_type_entity as car_types, CarTypeName};
use crate::error::{AppError, AppResult};
use crate::models::{CarRequest, CarResponse, PaginatedResponse, PaginationParams};
use sea_orm::{
    ActiveModelTrait, ColumnTrait, DatabaseConnection, EntityTrait, IntoActiveModel,
    PaginatorTrait, QueryFilter, QueryOrder, QuerySelect, Set, TransactionTrait,
};

#[derive(Clone)]
pub struct CarService {
    pool: DatabaseConnection,
}

impl CarService {
    pub fn new(pool: DatabaseConnection) -> Self {
        Self { pool }
    }

    async fn resolve_car_type(
        &self,
        db: &impl sea_orm::ConnectionTrait,
        name: &str,
    ) -> AppResult<car_types::Model> {
        let type_name: CarTypeName = name
            .parse()
            .map_err(|_| AppError::ValidationError(format!("Unknown car type {name}")))?;
        car_types::Entity::find()
            .filter(car_types::Column::Name.eq(type_name))
            .one(db)
            .await?
            .ok_or_else(|| AppError::InternalError(format!("Car type {type_name} is not seeded")))
    }

    fn validate(req: &CarRequest) -> AppResult<()> {
        if req.model.trim().is_empty() || req.brand.trim().is_empty() {
            return Err(AppError::ValidationError(
                "Model and brand are required".into(),
            ));
        }
        if req.available_units < 0 {
            return Err(AppError::ValidationError(
                "Available units cannot be negative".into(),
            ));
        }
        if req.daily_price.is_sign_negative() || req.daily_price.is_zero() {
            return Err(AppError::ValidationError(
                "Daily price must be positive".into(),
            ));
        }
        Ok(())
    }

    /// Adds a car. Matching a live car on model, brand, type and daily price
    /// merges the request into that row by adding the units instead.
    pub async fn create_car(&self, caller_id: i64, req: CarRequest) -> AppResult<CarResponse> {
        if !super::is_manager(&self.pool, caller_id).await? {
            return Err(AppError::PermissionDenied(
                "Only managers can manage the inventory".into(),
            ));
        }
        Self::validate(&req)?;

        let txn = self.pool.begin().await?;
        let car_type = self.resolve_car_type(&txn, &req.car_type).await?;

        let duplicate = cars::Entity::find()
            .filter(cars::Column::Model.eq(req.model.trim()))
            .filter(cars::Column::Brand.eq(req.brand.trim()))
            .filter(cars::Column::CarTypeId.eq(car_type.id))
            .filter(cars::Column::DailyPrice.eq(req.daily_price))
            .filter(cars::Column::IsDeleted.eq(false))
            .lock_exclusive()
            .one(&txn)
            .await?;

        let car = match duplicate {
            Some(existing) => {
                let merged_units = existing.available_units + req.available_units;
                let mut am = existing.into_active_model();
                am.available_units = Set(merged_units);
                am.update(&txn).await?
            }
            None => {
                cars::ActiveModel {
                    model: Set(req.model.trim().to_string()),
                    brand: Set(req.brand.trim().to_string()),
                    car_type_id: Set(car_type.id),
                    available_units: Set(req.available_units),
                    daily_price: Set(req.daily_price),
                    ..Default::default()
                }
                .insert(&txn)
                .await?
            }
        };
        txn.commit().await?;

        Ok(CarResponse::from_parts(car, car_type.name))
    }

    pub async fn get_cars(
        &self,
        params: &PaginationParams,
    ) -> AppResult<PaginatedResponse<CarResponse>> {
        let query = cars::Entity::find()
            .filter(cars::Column::IsDeleted.eq(false))
            .order_by_asc(cars::Column::Id);
        let total = query.clone().count(&self.pool).await? as i64;
        let rows = query
            .find_also_related(car_types::Entity)
            .offset(params.offset() as u64)
            .limit(params.limit() as u64)
            .all(&self.pool)
            .await?;

        let mut data = Vec::with_capacity(rows.len());
        for (car, car_type) in rows {
            let car_type = car_type
                .ok_or_else(|| AppError::InternalError("Car has no type row".into()))?;
            data.push(CarResponse::from_parts(car, car_type.name));
        }
        Ok(PaginatedResponse::new(data, params, total))
    }

    pub async fn get_car(&self, car_id: i64) -> AppResult<CarResponse> {
        let (car, car_type) = Self::find_live_car(&self.pool, car_id).await?;
        Ok(CarResponse::from_parts(car, car_type.name))
    }

    pub async fn update_car(
        &self,
        caller_id: i64,
        car_id: i64,
        req: CarRequest,
    ) -> AppResult<CarResponse> {
        if !super::is_manager(&self.pool, caller_id).await? {
            return Err(AppError::PermissionDenied(
                "Only managers can manage the inventory".into(),
            ));
        }
        Self::validate(&req)?;

        let (car, _) = Self::find_live_car(&self.pool, car_id).await?;
        let car_type = self.resolve_car_type(&self.pool, &req.car_type).await?;

        let mut am = car.into_active_model();
        am.model = Set(req.model.trim().to_string());
        am.brand = Set(req.brand.trim().to_string());
        am.car_type_id = Set(car_type.id);
        am.available_units = Set(req.available_units);
        am.daily_price = Set(req.daily_price);
        let car = am.update(&self.pool).await?;

        Ok(CarResponse::from_parts(car, car_type.name))
    }

    /// Soft delete. Existing rentals keep pointing at the row.
    pub async fn delete_car(&self, caller_id: i64, car_id: i64) -> AppResult<()> {
        if !super::is_manager(&self.pool, caller_id).await? {
            return Err(AppError::PermissionDenied(
                "Only managers can manage the inventory".into(),
            ));
        }
        let (car, _) = Self::find_live_car(&self.pool, car_id).await?;
        let mut am = car.into_active_model();
        am.is_deleted = Set(true);
        am.update(&self.pool).await?;
        log::info!("User {caller_id} deleted car {car_id}");
        Ok(())
    }

    pub(crate) async fn find_live_car(
        db: &impl sea_orm::ConnectionTrait,
        car_id: i64,
    ) -> AppResult<(cars::Model, car_types::Model)> {
        let (car, car_type) = cars::Entity::find_by_id(car_id)
            .find_also_related(car_types::Entity)
            .one(db)
            .await?
            .ok_or_else(|| AppError::NotFound(format!("Car {car_id} not found")))?;
        if car.is_deleted {
            return Err(AppError::NotFound(format!("Car {car_id} not found")));
        }
        let car_type =
            car_type.ok_or_else(|| AppError::InternalError("Car has no type row".into()))?;
        Ok((car, car_type))
    }
}
