use chrono::{DateTime, Utc};
use serde_json::Value;
use uuid::Uuid;

use crate::error::{AppError, AppResult};
use crate::external::{ContentService, StripeLineItem, StripeService};
use crate::models::{CompletedCheckout, OrderDocument, OrderProductEntry, OrderSummary, ProductReference};
use crate::utils::minor_to_major;

const ORDER_STATUS_PAID: &str = "paid";

/// Materializes completed checkout sessions into order documents and reads
/// them back for order history.
#[derive(Clone)]
pub struct OrderService {
    stripe: StripeService,
    content: ContentService,
}

impl OrderService {
    pub fn new(stripe: StripeService, content: ContentService) -> Self {
        Self { stripe, content }
    }

    /// Creates the order document for a completed checkout session: fetches
    /// the session's line items, maps them onto product references, and
    /// writes one order document. Returns the created document id.
    ///
    /// Runs exactly once per delivery with no local retry; redelivery of the
    /// same event creates a duplicate order.
    pub async fn create_order_from_session(
        &self,
        checkout: &CompletedCheckout,
    ) -> AppResult<String> {
        let line_items = self
            .stripe
            .list_line_items(&checkout.session_id)
            .await
            .map_err(|e| {
                AppError::MaterializationFailure(format!("failed to list line items: {e}"))
            })?;

        let products = map_line_items(&line_items)?;
        let document = build_order_document(checkout, products, Utc::now());

        self.content.create(&document).await.map_err(|e| {
            AppError::MaterializationFailure(format!("failed to create order document: {e}"))
        })
    }

    pub async fn get_user_orders(&self, clerk_user_id: &str) -> AppResult<Vec<OrderSummary>> {
        let groq = r#"*[_type == "order" && clerkUserId == $userId] | order(orderDate desc) {
            ...,
            products[]{
                ...,
                product->
            }
        }"#;
        let user_id = Value::String(clerk_user_id.to_string());
        let orders = self
            .content
            .query_with_params::<Vec<OrderSummary>>(groq, &[("userId", &user_id)])
            .await?;
        Ok(orders.unwrap_or_default())
    }
}

/// Maps processor line items to order product entries. Quantity defaults to
/// zero when absent; every entry gets a fresh array key.
fn map_line_items(items: &[StripeLineItem]) -> AppResult<Vec<OrderProductEntry>> {
    items
        .iter()
        .map(|item| {
            let document_id = item
                .price
                .as_ref()
                .and_then(|p| p.product.as_ref())
                .and_then(|p| p.metadata.get("id"))
                .ok_or_else(|| {
                    AppError::MaterializationFailure(format!(
                        "line item {} has no backend product id in its metadata",
                        item.id
                    ))
                })?;

            Ok(OrderProductEntry {
                key: Uuid::new_v4().to_string(),
                product: ProductReference::new(document_id.clone()),
                quantity: item.quantity.unwrap_or(0),
            })
        })
        .collect()
}

fn build_order_document(
    checkout: &CompletedCheckout,
    products: Vec<OrderProductEntry>,
    now: DateTime<Utc>,
) -> OrderDocument {
    OrderDocument {
        doc_type: "order".to_string(),
        order_number: checkout.metadata.order_number.clone(),
        stripe_checkout_session_id: checkout.session_id.clone(),
        stripe_payment_intent_id: checkout.payment_intent_id.clone(),
        stripe_customer_id: checkout.customer_id.clone(),
        clerk_user_id: checkout.metadata.clerk_user_id.clone(),
        customer_name: checkout.metadata.customer_name.clone(),
        email: checkout.metadata.customer_email.clone(),
        currency: checkout.currency.clone(),
        amount_discount: checkout.amount_discount.map(minor_to_major).unwrap_or(0.0),
        products,
        total_price: checkout.amount_total.map(minor_to_major).unwrap_or(0.0),
        status: ORDER_STATUS_PAID.to_string(),
        // The document carries the materialization time, not the session's
        // own created timestamp.
        order_date: now,
    }
}
