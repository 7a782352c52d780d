use reqwest::Client;
use serde::Deserialize;
use std::collections::HashMap;
use stripe::{Event, Webhook};

use crate::config::StripeConfig;
use crate::error::{AppError, AppResult};

/// One line item of a checkout session, fetched with
/// `expand[]=data.price.product` so the product metadata is inlined.
#[derive(Debug, Clone, Deserialize)]
pub struct StripeLineItem {
    pub id: String,
    pub quantity: Option<i64>,
    pub price: Option<StripeLineItemPrice>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct StripeLineItemPrice {
    pub product: Option<StripeExpandedProduct>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct StripeExpandedProduct {
    pub id: String,
    #[serde(default)]
    pub metadata: HashMap<String, String>,
}

#[derive(Debug, Deserialize)]
struct StripeLineItemList {
    data: Vec<StripeLineItem>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct CheckoutSessionSummary {
    pub id: String,
    pub url: Option<String>,
}

/// Parameters for creating a hosted checkout session. Prices are in minor
/// currency units, as the processor expects.
#[derive(Debug, Clone)]
pub struct CreateCheckoutSessionParams {
    pub order_number: String,
    pub customer_name: String,
    pub customer_email: String,
    pub clerk_user_id: String,
    pub line_items: Vec<CheckoutLineItemParams>,
}

#[derive(Debug, Clone)]
pub struct CheckoutLineItemParams {
    pub name: String,
    pub unit_amount: i64,
    pub currency: String,
    /// Content-backend document id, carried in the product metadata so the
    /// webhook can reference the product later.
    pub product_id: String,
    pub quantity: i64,
}

#[derive(Clone)]
pub struct StripeService {
    client: Client,
    config: StripeConfig,
}

impl StripeService {
    pub fn new(config: StripeConfig) -> Self {
        Self {
            client: Client::new(),
            config,
        }
    }

    /// Verifies the webhook signature and parses the payload into a typed
    /// event. An unset secret is a config error, not a signature error.
    pub fn verify_webhook_signature(&self, payload: &str, signature: &str) -> AppResult<Event> {
        if self.config.webhook_secret.is_empty() {
            return Err(AppError::ConfigError(
                "stripe webhook secret is not set".to_string(),
            ));
        }

        Webhook::construct_event(payload, signature, &self.config.webhook_secret)
            .map_err(|e| AppError::InvalidSignature(e.to_string()))
    }

    pub async fn list_line_items(&self, session_id: &str) -> AppResult<Vec<StripeLineItem>> {
        let url = format!(
            "{}/v1/checkout/sessions/{}/line_items",
            self.config.api_base, session_id
        );

        let response = self
            .client
            .get(&url)
            .bearer_auth(&self.config.secret_key)
            .query(&[("expand[]", "data.price.product"), ("limit", "100")])
            .send()
            .await?;

        if response.status().is_success() {
            let list: StripeLineItemList = response.json().await?;
            Ok(list.data)
        } else {
            let error_text = response
                .text()
                .await
                .unwrap_or_else(|_| "unknown error".to_string());
            Err(AppError::ExternalApiError(format!(
                "Failed to list line items: {error_text}"
            )))
        }
    }

    pub async fn create_checkout_session(
        &self,
        params: &CreateCheckoutSessionParams,
    ) -> AppResult<CheckoutSessionSummary> {
        let url = format!("{}/v1/checkout/sessions", self.config.api_base);
        let form = build_checkout_session_form(params, &self.config);

        let response = self
            .client
            .post(&url)
            .bearer_auth(&self.config.secret_key)
            .form(&form)
            .send()
            .await?;

        if response.status().is_success() {
            let session: CheckoutSessionSummary = response.json().await?;
            Ok(session)
        } else {
            let error_text = response
                .text()
                .await
                .unwrap_or_else(|_| "unknown error".to_string());
            Err(AppError::ExternalApiError(format!(
                "Failed to create checkout session: {error_text}"
            )))
        }
    }
}

fn build_checkout_session_form(
    params: &CreateCheckoutSessionParams,
    config: &StripeConfig,
) -> Vec<(String, String)> {
    let mut form = vec![
        ("mode".to_string(), "payment".to_string()),
        ("customer_email".to_string(), params.customer_email.clone()),
        (
            "metadata[orderNumber]".to_string(),
            params.order_number.clone(),
        ),
        (
            "metadata[customerName]".to_string(),
            params.customer_name.clone(),
        ),
        (
            "metadata[customerEmail]".to_string(),
            params.customer_email.clone(),
        ),
        (
            "metadata[clerkUserId]".to_string(),
            params.clerk_user_id.clone(),
        ),
    ];

    if !config.success_url.is_empty() {
        form.push(("success_url".to_string(), config.success_url.clone()));
    }
    if !config.cancel_url.is_empty() {
        form.push(("cancel_url".to_string(), config.cancel_url.clone()));
    }

    for (i, item) in params.line_items.iter().enumerate() {
        form.push((
            format!("line_items[{i}][quantity]"),
            item.quantity.to_string(),
        ));
        form.push((
            format!("line_items[{i}][price_data][currency]"),
            item.currency.clone(),
        ));
        form.push((
            format!("line_items[{i}][price_data][unit_amount]"),
            item.unit_amount.to_string(),
        ));
        form.push((
            format!("line_items[{i}][price_data][product_data][name]"),
            item.name.clone(),
        ));
        form.push((
            format!("line_items[{i}][price_data][product_data][metadata][id]"),
            item.product_id.clone(),
        ));
    }

    form
}

#[cfg(test)]
mod tests {
    use super::*;

    fn test_config() -> StripeConfig {
        StripeConfig {
            secret_key: "sk_test_123".to_string(),
            webhook_secret: "whsec_123".to_string(),
            api_base: "https://api.stripe.com".to_string(),
            success_url: "https://shop.example.com/success".to_string(),
            cancel_url: "https://shop.example.com/cart".to_string(),
        }
    }

    #[test]
    fn empty_webhook_secret_is_a_config_error() {
        let service = StripeService::new(StripeConfig {
            webhook_secret: String::new(),
            ..test_config()
        });
        let err = service
            .verify_webhook_signature("{}", "t=0,v1=abc")
            .unwrap_err();
        assert!(matches!(err, AppError::ConfigError(_)));
    }

    #[test]
    fn garbage_signature_is_rejected() {
        let service = StripeService::new(test_config());
        let err = service
            .verify_webhook_signature("{}", "not-a-signature")
            .unwrap_err();
        assert!(matches!(err, AppError::InvalidSignature(_)));
    }

    #[test]
    fn line_item_list_deserializes_expanded_products() {
        let body = r#"{
            "object": "list",
            "data": [{
                "id": "li_1",
                "object": "item",
                "quantity": 2,
                "price": {
                    "id": "price_1",
                    "product": {
                        "id": "prod_1",
                        "object": "product",
                        "metadata": {"id": "p1"}
                    }
                }
            }],
            "has_more": false
        }"#;
        let list: StripeLineItemList = serde_json::from_str(body).unwrap();
        assert_eq!(list.data.len(), 1);
        let item = &list.data[0];
        assert_eq!(item.quantity, Some(2));
        let product = item.price.as_ref().unwrap().product.as_ref().unwrap();
        assert_eq!(product.metadata.get("id").unwrap(), "p1");
    }

    #[test]
    fn checkout_session_form_carries_metadata_and_line_items() {
        let params = CreateCheckoutSessionParams {
            order_number: "ord-1".to_string(),
            customer_name: "Jane Doe".to_string(),
            customer_email: "jane@example.com".to_string(),
            clerk_user_id: "user_1".to_string(),
            line_items: vec![CheckoutLineItemParams {
                name: "Mug".to_string(),
                unit_amount: 2500,
                currency: "usd".to_string(),
                product_id: "p1".to_string(),
                quantity: 2,
            }],
        };
        let form = build_checkout_session_form(&params, &test_config());

        let get = |key: &str| {
            form.iter()
                .find(|(k, _)| k == key)
                .map(|(_, v)| v.as_str())
        };
        assert_eq!(get("mode"), Some("payment"));
        assert_eq!(get("metadata[orderNumber]"), Some("ord-1"));
        assert_eq!(get("metadata[clerkUserId]"), Some("user_1"));
        assert_eq!(get("line_items[0][quantity]"), Some("2"));
        assert_eq!(get("line_items[0][price_data][unit_amount]"), Some("2500"));
        assert_eq!(
            get("line_items[0][price_data][product_data][metadata][id]"),
            Some("p1")
        );
    }
}
