use crate::handlers::user::get_user_id_from_request;
use crate::models::*;
use crate::services::PaymentService;
use actix_web::{web, HttpRequest, HttpResponse, ResponseError, Result};
use serde::Deserialize;
use serde_json::json;

#[derive(Debug, Deserialize)]
pub struct CallbackQuery {
    pub id: Option<i64>,
}

#[utoipa::path(
    post,
    path = "/payments/{id}",
    tag = "payments",
    params(
        ("id" = i64, Path, description = "Rental id to pay for")
    ),
    security(
        ("bearer_auth" = [])
    ),
    responses(
        (status = 200, description = "Checkout session opened", body = PaymentUrlResponse),
        (status = 403, description = "Caller is not the renter or a manager"),
        (status = 404, description = "Rental not found"),
        (status = 422, description = "Car not yet returned"),
        (status = 502, description = "Payment gateway failure")
    )
)]
pub async fn create_payment(
    payment_service: web::Data<PaymentService>,
    req: HttpRequest,
    path: web::Path<i64>,
) -> Result<HttpResponse> {
    let caller_id = get_user_id_from_request(&req).unwrap_or(0);

    match payment_service
        .create_session(caller_id, path.into_inner())
        .await
    {
        Ok(session) => Ok(HttpResponse::Ok().json(json!({
            "success": true,
            "data": session
        }))),
        Err(e) => Ok(e.error_response()),
    }
}

#[utoipa::path(
    get,
    path = "/payments",
    tag = "payments",
    params(
        ("user_id" = Option<i64>, Query, description = "Filter by renter (manager only, ignored otherwise)"),
        ("page" = Option<i64>, Query, description = "Page number, 1-based"),
        ("page_size" = Option<i64>, Query, description = "Items per page, max 100")
    ),
    security(
        ("bearer_auth" = [])
    ),
    responses(
        (status = 200, description = "Paginated payment list")
    )
)]
pub async fn get_payments(
    payment_service: web::Data<PaymentService>,
    req: HttpRequest,
    query: web::Query<PaymentQuery>,
) -> Result<HttpResponse> {
    let caller_id = get_user_id_from_request(&req).unwrap_or(0);

    match payment_service.get_payments(caller_id, &query.into_inner()).await {
        Ok(payments) => Ok(HttpResponse::Ok().json(json!({
            "success": true,
            "data": payments
        }))),
        Err(e) => Ok(e.error_response()),
    }
}

#[utoipa::path(
    get,
    path = "/payments/success",
    tag = "payments",
    params(
        ("id" = Option<i64>, Query, description = "Payment to mark as paid")
    ),
    responses(
        (status = 200, description = "Payment marked as paid"),
        (status = 404, description = "Payment not found")
    )
)]
pub async fn payment_success(
    payment_service: web::Data<PaymentService>,
    query: web::Query<CallbackQuery>,
) -> Result<HttpResponse> {
    match query.id {
        Some(payment_id) => match payment_service.handle_success(payment_id).await {
            Ok(payment) => Ok(HttpResponse::Ok().json(json!({
                "success": true,
                "data": payment,
                "message": "Payment completed, thank you!"
            }))),
            Err(e) => Ok(e.error_response()),
        },
        None => Ok(HttpResponse::Ok().json(json!({
            "success": true,
            "message": "Payment completed, thank you!"
        }))),
    }
}

#[utoipa::path(
    get,
    path = "/payments/cancel",
    tag = "payments",
    responses(
        (status = 200, description = "Payment cancelled; the session stays open for 24 hours")
    )
)]
pub async fn payment_cancel() -> Result<HttpResponse> {
    // the Stripe session itself remains payable for 24 hours
    Ok(HttpResponse::Ok().json(json!({
        "success": true,
        "message": "Payment cancelled. The session can still be paid within 24 hours."
    })))
}

pub fn payment_config(cfg: &mut web::ServiceConfig) {
    cfg.service(
        web::scope("/payments")
            .route("", web::get().to(get_payments))
            .route("/success", web::get().to(payment_success))
            .route("/cancel", web::get().to(payment_cancel))
            .route("/{id}", web::post().to(create_payment)),
    );
}
