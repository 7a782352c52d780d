pub mod content;
pub mod stripe;

pub use self::content::*;
pub use self::stripe::*;
