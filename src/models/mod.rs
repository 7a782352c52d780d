pub mod category;
pub mod checkout;
pub mod common;
pub mod order;
pub mod product;

pub use category::*;
pub use checkout::*;
pub use common::*;
pub use order::*;
pub use product::*;
