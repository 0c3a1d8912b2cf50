pub mod car_types;
pub mod cars;
pub mod payment_statuses;
pub mod payment_types;
pub mod payments;
pub mod rentals;
pub mod roles;
pub mod users;
pub mod users_roles;

pub use car_types::CarTypeName;
pub use payment_statuses::PaymentStatusName;
pub use payment_types::PaymentTypeName;
pub use roles::RoleName;

pub use car_types as car_type_entity;
pub use cars as car_entity;
pub use payment_statuses as payment_status_entity;
pub use payment_types as payment_type_entity;
pub use payments as payment_entity;
pub use rentals as rental_entity;
pub use roles as role_entity;
pub use users as user_entity;
pub use users_roles as users_roles_entity;
