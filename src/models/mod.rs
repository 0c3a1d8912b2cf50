pub mod car;
pub mod common;
pub mod pagination;
pub mod payment;
pub mod rental;
pub mod user;

pub use car::*;
pub use common::*;
pub use pagination::*;
pub use payment::*;
pub use rental::*;
pub use user::*;
