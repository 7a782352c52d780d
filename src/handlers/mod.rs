pub mod category;
pub mod checkout;
pub mod order;
pub mod product;
pub mod webhook;

pub use category::category_config;
pub use checkout::checkout_config;
pub use order::order_config;
pub use product::product_config;
pub use webhook::webhook_config;
