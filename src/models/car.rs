use crate::entities::{car_entity as cars, CarTypeName};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

#[derive(Debug, Serialize, Deserialize, ToSchema)]
pub struct CarRequest {
    #[schema(example = "Model 3")]
    pub model: String,
    #[schema(example = "Tesla")]
    pub brand: String,
    /// Car type name: SEDAN, SUV or HATCHBACK (case-insensitive).
    #[schema(example = "SEDAN")]
    pub car_type: String,
    #[schema(example = 3)]
    pub available_units: i32,
    #[schema(example = "49.99")]
    pub daily_price: Decimal,
}

#[derive(Debug, Serialize, Deserialize, ToSchema)]
pub struct CarResponse {
    pub id: i64,
    pub model: String,
    pub brand: String,
    pub car_type: CarTypeName,
    pub available_units: i32,
    pub daily_price: Decimal,
}

impl CarResponse {
    pub fn from_parts(car: cars::Model, car_type: CarTypeName) -> Self {
        Self {
            id: car.id,
            model: car.model,
            brand: car.brand,
            car_type,
            available_units: car.available_units,
            daily_price: car.daily_price,
        }
    }
}
