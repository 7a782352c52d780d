pub mod catalog_service;
pub mod checkout_service;
pub mod order_service;

pub use catalog_service::*;
pub use checkout_service::*;
pub use order_service::*;
