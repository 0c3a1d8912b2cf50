pub mod stripe;
pub mod telegram;

pub use stripe::*;
pub use telegram::*;
