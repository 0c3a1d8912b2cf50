pub mod auth;
pub mod car;
pub mod payment;
pub mod rental;
pub mod user;

pub use auth::auth_config;
pub use car::car_config;
pub use payment::payment_config;
pub use rental::rental_config;
pub use user::user_config;
