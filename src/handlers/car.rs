use crate::handlers::user::get_user_id_from_request;
use crate::models::*;
use crate::services::CarService;
use actix_web::{web, HttpRequest, HttpResponse, ResponseError, Result};
use serde_json::json;

#[utoipa::path(
    post,
    path = "/cars",
    tag = "cars",
    request_body = CarRequest,
    security(
        ("bearer_auth" = [])
    ),
    responses(
        (status = 200, description = "Car created or merged into an existing row", body = CarResponse),
        (status = 400, description = "Invalid request"),
        (status = 403, description = "Caller is not a manager")
    )
)]
pub async fn create_car(
    car_service: web::Data<CarService>,
    req: HttpRequest,
    request: web::Json<CarRequest>,
) -> Result<HttpResponse> {
    let caller_id = get_user_id_from_request(&req).unwrap_or(0);

    match car_service.create_car(caller_id, request.into_inner()).await {
        Ok(car) => Ok(HttpResponse::Ok().json(json!({
            "success": true,
            "data": car
        }))),
        Err(e) => Ok(e.error_response()),
    }
}

#[utoipa::path(
    get,
    path = "/cars",
    tag = "cars",
    params(
        ("page" = Option<i64>, Query, description = "Page number, 1-based"),
        ("page_size" = Option<i64>, Query, description = "Items per page, max 100")
    ),
    security(
        ("bearer_auth" = [])
    ),
    responses(
        (status = 200, description = "Paginated car list")
    )
)]
pub async fn get_cars(
    car_service: web::Data<CarService>,
    query: web::Query<PaginationParams>,
) -> Result<HttpResponse> {
    match car_service.get_cars(&query.into_inner()).await {
        Ok(cars) => Ok(HttpResponse::Ok().json(json!({
            "success": true,
            "data": cars
        }))),
        Err(e) => Ok(e.error_response()),
    }
}

#[utoipa::path(
    get,
    path = "/cars/{id}",
    tag = "cars",
    params(
        ("id" = i64, Path, description = "Car id")
    ),
    security(
        ("bearer_auth" = [])
    ),
    responses(
        (status = 200, description = "Car details", body = CarResponse),
        (status = 404, description = "Car not found")
    )
)]
pub async fn get_car(car_service: web::Data<CarService>, path: web::Path<i64>) -> Result<HttpResponse> {
    match car_service.get_car(path.into_inner()).await {
        Ok(car) => Ok(HttpResponse::Ok().json(json!({
            "success": true,
            "data": car
        }))),
        Err(e) => Ok(e.error_response()),
    }
}

#[utoipa::path(
    put,
    path = "/cars/{id}",
    tag = "cars",
    request_body = CarRequest,
    params(
        ("id" = i64, Path, description = "Car id")
    ),
    security(
        ("bearer_auth" = [])
    ),
    responses(
        (status = 200, description = "Car updated", body = CarResponse),
        (status = 403, description = "Caller is not a manager"),
        (status = 404, description = "Car not found")
    )
)]
pub async fn update_car(
    car_service: web::Data<CarService>,
    req: HttpRequest,
    path: web::Path<i64>,
    request: web::Json<CarRequest>,
) -> Result<HttpResponse> {
    let caller_id = get_user_id_from_request(&req).unwrap_or(0);

    match car_service
        .update_car(caller_id, path.into_inner(), request.into_inner())
        .await
    {
        Ok(car) => Ok(HttpResponse::Ok().json(json!({
            "success": true,
            "data": car
        }))),
        Err(e) => Ok(e.error_response()),
    }
}

#[utoipa::path(
    delete,
    path = "/cars/{id}",
    tag = "cars",
    params(
        ("id" = i64, Path, description = "Car id")
    ),
    security(
        ("bearer_auth" = [])
    ),
    responses(
        (status = 200, description = "Car soft-deleted"),
        (status = 403, description = "Caller is not a manager"),
        (status = 404, description = "Car not found")
    )
)]
pub async fn delete_car(
    car_service: web::Data<CarService>,
    req: HttpRequest,
    path: web::Path<i64>,
) -> Result<HttpResponse> {
    let caller_id = get_user_id_from_request(&req).unwrap_or(0);

    match car_service.delete_car(caller_id, path.into_inner()).await {
        Ok(()) => Ok(HttpResponse::Ok().json(json!({
            "success": true,
            "message": "Car deleted"
        }))),
        Err(e) => Ok(e.error_response()),
    }
}

pub fn car_config(cfg: &mut web::ServiceConfig) {
    cfg.service(
        web::scope("/cars")
            .route("", web::post().to(create_car))
            .route("", web::get().to(get_cars))
            .route("/{id}", web::get().to(get_car))
            .route("/{id}", web::put().to(update_car))
            .route("/{id}", web::delete().to(delete_car)),
    );
}
