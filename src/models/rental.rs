use crate::entities::{car_entity as cars, rental_entity as rentals, user_entity as users};
use crate::models::PaginationParams;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

#[derive(Debug, Serialize, Deserialize, ToSchema)]
pub struct CreateRentalRequest {
    pub car_id: i64,
    #[schema(example = "2025-09-11T10:00:00Z")]
    pub rental_date: DateTime<Utc>,
    #[schema(example = "2025-09-15T10:00:00Z")]
    pub return_date: DateTime<Utc>,
}

#[derive(Debug, Clone, Deserialize, ToSchema)]
pub struct RentalQuery {
    /// Filter by renter; manager only.
    pub user_id: Option<i64>,
    /// true: active rentals only; false: returned only; absent: all.
    pub is_active: Option<bool>,
    pub page: Option<i64>,
    pub page_size: Option<i64>,
}

impl RentalQuery {
    pub fn pagination(&self) -> PaginationParams {
        PaginationParams {
            page: self.page,
            page_size: self.page_size,
        }
    }
}

#[derive(Debug, Serialize, Deserialize, ToSchema)]
pub struct RentalResponse {
    pub id: i64,
    pub rental_date: DateTime<Utc>,
    pub return_date: DateTime<Utc>,
    pub actual_return_date: Option<DateTime<Utc>>,
    pub car_id: i64,
    pub brand: String,
    pub model: String,
    pub user_id: i64,
    pub email: String,
    pub is_active: bool,
}

impl RentalResponse {
    pub fn from_parts(rental: rentals::Model, car: &cars::Model, user: &users::Model) -> Self {
        let is_active = rental.actual_return_date.is_none();
        Self {
            id: rental.id,
            rental_date: rental.rental_date,
            return_date: rental.return_date,
            actual_return_date: rental.actual_return_date,
            car_id: car.id,
            brand: car.brand.clone(),
            model: car.model.clone(),
            user_id: user.id,
            email: user.email.clone(),
            is_active,
        }
    }
}
