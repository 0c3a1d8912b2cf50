use actix_web::web;
use utoipa::OpenApi;
use utoipa::{
    openapi::security::{Http, HttpAuthScheme, SecurityScheme},
    Modify,
};
use utoipa_swagger_ui::SwaggerUi;

use crate::entities::{CarTypeName, PaymentStatusName, PaymentTypeName, RoleName};
use crate::handlers;
use crate::models::*;

struct SecurityAddon;

impl Modify for SecurityAddon {
    fn modify(&self, openapi: &mut utoipa::openapi::OpenApi) {
        let components = openapi.components.as_mut().unwrap();
        components.add_security_scheme(
            "bearer_auth",
            SecurityScheme::Http(Http::new(HttpAuthScheme::Bearer)),
        )
    }
}

#[derive(OpenApi)]
#[openapi(
    paths(
        handlers::auth::register,
        handlers::auth::login,
        handlers::auth::refresh,
        handlers::user::get_me,
        handlers::user::update_me,
        handlers::user::update_roles,
        handlers::car::create_car,
        handlers::car::get_cars,
        handlers::car::get_car,
        handlers::car::update_car,
        handlers::car::delete_car,
        handlers::rental::create_rental,
        handlers::rental::get_rentals,
        handlers::rental::get_rental,
        handlers::rental::return_rental,
        handlers::payment::create_payment,
        handlers::payment::get_payments,
        handlers::payment::payment_success,
        handlers::payment::payment_cancel,
    ),
    components(
        schemas(
            RegisterRequest,
            LoginRequest,
            UpdateProfileRequest,
            UpdateRolesRequest,
            UserResponse,
            AuthResponse,
            RoleName,
            CarRequest,
            CarResponse,
            CarTypeName,
            CreateRentalRequest,
            RentalQuery,
            RentalResponse,
            PaymentQuery,
            PaymentResponse,
            PaymentUrlResponse,
            PaymentStatusName,
            PaymentTypeName,
            ApiError,
        )
    ),
    modifiers(&SecurityAddon),
    tags(
        (name = "auth", description = "Authentication API"),
        (name = "user", description = "User management API"),
        (name = "cars", description = "Car inventory API"),
        (name = "rentals", description = "Rental lifecycle API"),
        (name = "payments", description = "Payment session API"),
    ),
    info(
        title = "Car Sharing Backend API",
        version = "1.0.0",
        description = "Car sharing booking REST API documentation",
    ),
    servers(
        (url = "/api/v1", description = "Local server")
    )
)]
pub struct ApiDoc;

pub fn swagger_config(cfg: &mut web::ServiceConfig) {
    cfg.service(
        SwaggerUi::new("/swagger-ui/{_:.*}").url("/api-docs/openapi.json", ApiDoc::openapi()),
    )
    .route(
        "/swagger-ui",
        web::get().to(|| async {
            actix_web::HttpResponse::Found()
                .append_header(("Location", "/swagger-ui/"))
                .finish()
        }),
    );
}
