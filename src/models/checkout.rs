use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
pub struct CreateCheckoutRequest {
    pub items: Vec<CartItemRequest>,
    pub customer_name: String,
    pub customer_email: String,
    pub clerk_user_id: String,
}

#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
pub struct CartItemRequest {
    /// Content-backend document id of the product.
    pub product_id: String,
    pub quantity: i64,
}

#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
pub struct CheckoutResponse {
    pub order_number: String,
    pub session_id: String,
    /// Hosted payment page to redirect the customer to.
    pub url: Option<String>,
}
