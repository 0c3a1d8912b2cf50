use crate::entities::{
    car_entity as cars, payment_entity as payments, rental_entity as rentals, PaymentStatusName,
    PaymentTypeName,
};
use crate::models::PaginationParams;
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

#[derive(Debug, Clone, Deserialize, ToSchema)]
pub struct PaymentQuery {
    /// Filter by renter; manager only.
    pub user_id: Option<i64>,
    pub page: Option<i64>,
    pub page_size: Option<i64>,
}

impl PaymentQuery {
    pub fn pagination(&self) -> PaginationParams {
        PaginationParams {
            page: self.page,
            page_size: self.page_size,
        }
    }
}

#[derive(Debug, Serialize, Deserialize, ToSchema)]
pub struct PaymentResponse {
    pub id: i64,
    pub status: String,
    pub payment_type: String,
    pub rental_id: i64,
    pub brand: String,
    pub model: String,
    pub session_url: Option<String>,
    pub session_id: Option<String>,
    #[schema(value_type = String, example = "49.90")]
    pub amount_to_pay: Decimal,
}

impl PaymentResponse {
    pub fn from_parts(
        payment: payments::Model,
        status: PaymentStatusName,
        payment_type: PaymentTypeName,
        rental: &rentals::Model,
        car: &cars::Model,
    ) -> Self {
        Self {
            id: payment.id,
            status: status.to_string(),
            payment_type: payment_type.to_string(),
            rental_id: rental.id,
            brand: car.brand.clone(),
            model: car.model.clone(),
            session_url: payment.session_url,
            session_id: payment.session_id,
            amount_to_pay: payment.amount_to_pay,
        }
    }
}

#[derive(Debug, Serialize, Deserialize, ToSchema)]
pub struct PaymentUrlResponse {
    pub payment_id: i64,
    pub session_url: String,
}
