use crate::handlers::user::get_user_id_from_request;
use crate::models::*;
use crate::services::RentalService;
use actix_web::{web, HttpRequest, HttpResponse, ResponseError, Result};
use serde_json::json;

#[utoipa::path(
    post,
    path = "/rentals",
    tag = "rentals",
    request_body = CreateRentalRequest,
    security(
        ("bearer_auth" = [])
    ),
    responses(
        (status = 200, description = "Rental created", body = RentalResponse),
        (status = 404, description = "Car not found"),
        (status = 422, description = "No cars available or pending payment outstanding")
    )
)]
pub async fn create_rental(
    rental_service: web::Data<RentalService>,
    req: HttpRequest,
    request: web::Json<CreateRentalRequest>,
) -> Result<HttpResponse> {
    let user_id = get_user_id_from_request(&req).unwrap_or(0);

    match rental_service.create_rental(user_id, request.into_inner()).await {
        Ok(rental) => Ok(HttpResponse::Ok().json(json!({
            "success": true,
            "data": rental
        }))),
        Err(e) => Ok(e.error_response()),
    }
}

#[utoipa::path(
    get,
    path = "/rentals",
    tag = "rentals",
    params(
        ("user_id" = Option<i64>, Query, description = "Filter by renter (manager only)"),
        ("is_active" = Option<bool>, Query, description = "true for active rentals, false for returned"),
        ("page" = Option<i64>, Query, description = "Page number, 1-based"),
        ("page_size" = Option<i64>, Query, description = "Items per page, max 100")
    ),
    security(
        ("bearer_auth" = [])
    ),
    responses(
        (status = 200, description = "Paginated rental list"),
        (status = 403, description = "Non-manager filtering by another user")
    )
)]
pub async fn get_rentals(
    rental_service: web::Data<RentalService>,
    req: HttpRequest,
    query: web::Query<RentalQuery>,
) -> Result<HttpResponse> {
    let caller_id = get_user_id_from_request(&req).unwrap_or(0);

    match rental_service.get_rentals(caller_id, &query.into_inner()).await {
        Ok(rentals) => Ok(HttpResponse::Ok().json(json!({
            "success": true,
            "data": rentals
        }))),
        Err(e) => Ok(e.error_response()),
    }
}

#[utoipa::path(
    get,
    path = "/rentals/{id}",
    tag = "rentals",
    params(
        ("id" = i64, Path, description = "Rental id")
    ),
    security(
        ("bearer_auth" = [])
    ),
    responses(
        (status = 200, description = "Rental details", body = RentalResponse),
        (status = 403, description = "Caller is not the renter or a manager"),
        (status = 404, description = "Rental not found")
    )
)]
pub async fn get_rental(
    rental_service: web::Data<RentalService>,
    req: HttpRequest,
    path: web::Path<i64>,
) -> Result<HttpResponse> {
    let caller_id = get_user_id_from_request(&req).unwrap_or(0);

    match rental_service.get_rental(caller_id, path.into_inner()).await {
        Ok(rental) => Ok(HttpResponse::Ok().json(json!({
            "success": true,
            "data": rental
        }))),
        Err(e) => Ok(e.error_response()),
    }
}

#[utoipa::path(
    post,
    path = "/rentals/{id}/return",
    tag = "rentals",
    params(
        ("id" = i64, Path, description = "Rental id")
    ),
    security(
        ("bearer_auth" = [])
    ),
    responses(
        (status = 200, description = "Rental returned", body = RentalResponse),
        (status = 403, description = "Caller is not the renter or a manager"),
        (status = 404, description = "Rental not found"),
        (status = 422, description = "Rental already returned")
    )
)]
pub async fn return_rental(
    rental_service: web::Data<RentalService>,
    req: HttpRequest,
    path: web::Path<i64>,
) -> Result<HttpResponse> {
    let caller_id = get_user_id_from_request(&req).unwrap_or(0);

    match rental_service.return_rental(caller_id, path.into_inner()).await {
        Ok(rental) => Ok(HttpResponse::Ok().json(json!({
            "success": true,
            "data": rental
        }))),
        Err(e) => Ok(e.error_response()),
    }
}

pub fn rental_config(cfg: &mut web::ServiceConfig) {
    cfg.service(
        web::scope("/rentals")
            .route("", web::post().to(create_rental))
            .route("", web::get().to(get_rentals))
            .route("/{id}", web::get().to(get_rental))
            .route("/{id}/return", web::post().to(return_rental)),
    );
}
