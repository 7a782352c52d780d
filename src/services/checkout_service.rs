use futures_util::future::try_join_all;
use uuid::Uuid;

use crate::error::{AppError, AppResult};
use crate::external::{
    CheckoutLineItemParams, CreateCheckoutSessionParams, StripeService,
};
use crate::models::{CheckoutResponse, CreateCheckoutRequest};
use crate::services::CatalogService;
use crate::utils::major_to_minor;

const CHECKOUT_CURRENCY: &str = "usd";

/// Creates hosted checkout sessions from cart contents. Product names and
/// prices come from the content backend, never from the client.
#[derive(Clone)]
pub struct CheckoutService {
    stripe: StripeService,
    catalog: CatalogService,
}

impl CheckoutService {
    pub fn new(stripe: StripeService, catalog: CatalogService) -> Self {
        Self { stripe, catalog }
    }

    pub async fn create_checkout_session(
        &self,
        request: &CreateCheckoutRequest,
    ) -> AppResult<CheckoutResponse> {
        if request.items.is_empty() {
            return Err(AppError::ValidationError("cart is empty".to_string()));
        }
        if request.items.iter().any(|item| item.quantity <= 0) {
            return Err(AppError::ValidationError(
                "item quantity must be positive".to_string(),
            ));
        }
        // The webhook rejects sessions whose metadata has empty values, so a
        // session must never be created with them: it could be paid but its
        // completion event would never materialize an order.
        for (field, value) in [
            ("customer_name", &request.customer_name),
            ("customer_email", &request.customer_email),
            ("clerk_user_id", &request.clerk_user_id),
        ] {
            if value.is_empty() {
                return Err(AppError::ValidationError(format!(
                    "{field} must not be empty"
                )));
            }
        }

        // The order number is generated here and travels through the
        // session metadata; the webhook persists it on the order document.
        let order_number = Uuid::new_v4().to_string();

        let products = try_join_all(
            request
                .items
                .iter()
                .map(|item| self.catalog.get_product_by_id(&item.product_id)),
        )
        .await?;

        let mut line_items = Vec::with_capacity(request.items.len());
        for (item, product) in request.items.iter().zip(products) {
            let product = product.ok_or_else(|| {
                AppError::NotFound(format!("product not found: {}", item.product_id))
            })?;
            line_items.push(CheckoutLineItemParams {
                name: product.name,
                unit_amount: major_to_minor(product.price),
                currency: CHECKOUT_CURRENCY.to_string(),
                product_id: product.id,
                quantity: item.quantity,
            });
        }

        let session = self
            .stripe
            .create_checkout_session(&CreateCheckoutSessionParams {
                order_number: order_number.clone(),
                customer_name: request.customer_name.clone(),
                customer_email: request.customer_email.clone(),
                clerk_user_id: request.clerk_user_id.clone(),
                line_items,
            })
            .await?;

        Ok(CheckoutResponse {
            order_number,
            session_id: session.id,
            url: session.url,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::{SanityConfig, StripeConfig};
    use crate::external::ContentService;
    use crate::models::CartItemRequest;

    // Validation runs before any external call, so the clients can point at
    // addresses nothing listens on.
    fn service() -> CheckoutService {
        let stripe = StripeService::new(StripeConfig {
            secret_key: "sk_test_123".to_string(),
            webhook_secret: "whsec_123".to_string(),
            api_base: "http://127.0.0.1:19".to_string(),
            success_url: String::new(),
            cancel_url: String::new(),
        });
        let content = ContentService::new(SanityConfig {
            project_id: "testproj".to_string(),
            dataset: "test".to_string(),
            api_version: "2024-01-01".to_string(),
            api_token: String::new(),
            base_url: Some("http://127.0.0.1:19".to_string()),
        });
        CheckoutService::new(stripe, CatalogService::new(content))
    }

    fn request() -> CreateCheckoutRequest {
        CreateCheckoutRequest {
            items: vec![CartItemRequest {
                product_id: "p1".to_string(),
                quantity: 1,
            }],
            customer_name: "Jane Doe".to_string(),
            customer_email: "jane@example.com".to_string(),
            clerk_user_id: "user_1".to_string(),
        }
    }

    #[actix_web::test]
    async fn empty_cart_is_rejected() {
        let mut req = request();
        req.items.clear();
        let err = service().create_checkout_session(&req).await.unwrap_err();
        assert!(matches!(err, AppError::ValidationError(_)));
    }

    #[actix_web::test]
    async fn non_positive_quantity_is_rejected() {
        let mut req = request();
        req.items[0].quantity = 0;
        let err = service().create_checkout_session(&req).await.unwrap_err();
        assert!(matches!(err, AppError::ValidationError(_)));
    }

    #[actix_web::test]
    async fn empty_customer_fields_are_rejected() {
        // An empty value here would pass through the session metadata and
        // make the completion webhook fail materialization with no retry.
        let cases: [fn(&mut CreateCheckoutRequest); 3] = [
            |r| r.customer_name.clear(),
            |r| r.customer_email.clear(),
            |r| r.clerk_user_id.clear(),
        ];
        for clear in cases {
            let mut req = request();
            clear(&mut req);
            let err = service().create_checkout_session(&req).await.unwrap_err();
            assert!(matches!(err, AppError::ValidationError(_)));
        }
    }
}
