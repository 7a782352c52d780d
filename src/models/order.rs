use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use stripe::{CheckoutSession, Expandable};
use utoipa::ToSchema;

use crate::error::AppError;

/// Required checkout-session metadata, validated at the webhook boundary.
///
/// The keys are set by `create_checkout_session` and round-trip through the
/// payment processor untouched.
#[derive(Debug, Clone, PartialEq)]
pub struct CheckoutMetadata {
    pub order_number: String,
    pub customer_name: String,
    pub customer_email: String,
    pub clerk_user_id: String,
}

impl CheckoutMetadata {
    pub const ORDER_NUMBER: &'static str = "orderNumber";
    pub const CUSTOMER_NAME: &'static str = "customerName";
    pub const CUSTOMER_EMAIL: &'static str = "customerEmail";
    pub const CLERK_USER_ID: &'static str = "clerkUserId";

    pub fn from_map(metadata: Option<&HashMap<String, String>>) -> Result<Self, AppError> {
        let metadata = metadata
            .ok_or_else(|| AppError::MalformedMetadata("session has no metadata".to_string()))?;

        let required = |key: &str| -> Result<String, AppError> {
            match metadata.get(key) {
                Some(value) if !value.is_empty() => Ok(value.clone()),
                _ => Err(AppError::MalformedMetadata(format!(
                    "missing or empty metadata key: {key}"
                ))),
            }
        };

        Ok(Self {
            order_number: required(Self::ORDER_NUMBER)?,
            customer_name: required(Self::CUSTOMER_NAME)?,
            customer_email: required(Self::CUSTOMER_EMAIL)?,
            clerk_user_id: required(Self::CLERK_USER_ID)?,
        })
    }
}

/// The slice of a completed checkout session the materializer needs,
/// extracted from the processor's event object.
#[derive(Debug, Clone)]
pub struct CompletedCheckout {
    pub session_id: String,
    pub amount_total: Option<i64>,
    pub amount_discount: Option<i64>,
    pub currency: Option<String>,
    pub payment_intent_id: Option<String>,
    pub customer_id: Option<String>,
    pub metadata: CheckoutMetadata,
}

impl TryFrom<&CheckoutSession> for CompletedCheckout {
    type Error = AppError;

    fn try_from(session: &CheckoutSession) -> Result<Self, Self::Error> {
        let metadata = CheckoutMetadata::from_map(session.metadata.as_ref())?;

        let payment_intent_id = session.payment_intent.as_ref().map(|pi| match pi {
            Expandable::Id(id) => id.to_string(),
            Expandable::Object(obj) => obj.id.to_string(),
        });
        let customer_id = session.customer.as_ref().map(|c| match c {
            Expandable::Id(id) => id.to_string(),
            Expandable::Object(obj) => obj.id.to_string(),
        });

        Ok(Self {
            session_id: session.id.to_string(),
            amount_total: session.amount_total,
            amount_discount: session.total_details.as_ref().map(|t| t.amount_discount),
            currency: session.currency.map(|c| c.to_string()),
            payment_intent_id,
            customer_id,
            metadata,
        })
    }
}

/// The order document written to the content backend. Field names follow the
/// backend's order schema, hence the camelCase and `_`-prefixed keys.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct OrderDocument {
    #[serde(rename = "_type")]
    pub doc_type: String,
    pub order_number: String,
    pub stripe_checkout_session_id: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub stripe_payment_intent_id: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub stripe_customer_id: Option<String>,
    pub clerk_user_id: String,
    pub customer_name: String,
    pub email: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub currency: Option<String>,
    pub amount_discount: f64,
    pub products: Vec<OrderProductEntry>,
    pub total_price: f64,
    pub status: String,
    pub order_date: DateTime<Utc>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct OrderProductEntry {
    /// Array key local to the document, never a business identifier.
    #[serde(rename = "_key")]
    pub key: String,
    pub product: ProductReference,
    pub quantity: i64,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ProductReference {
    #[serde(rename = "_type")]
    pub ref_type: String,
    #[serde(rename = "_ref")]
    pub ref_id: String,
}

impl ProductReference {
    pub fn new(document_id: impl Into<String>) -> Self {
        Self {
            ref_type: "reference".to_string(),
            ref_id: document_id.into(),
        }
    }
}

/// An order as read back from the content backend for order history.
#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct OrderSummary {
    pub order_number: String,
    #[serde(default)]
    pub order_date: Option<DateTime<Utc>>,
    #[serde(default)]
    pub status: Option<String>,
    #[serde(default)]
    pub total_price: Option<f64>,
    #[serde(default)]
    pub amount_discount: Option<f64>,
    #[serde(default)]
    pub currency: Option<String>,
    #[serde(default)]
    #[schema(value_type = Object)]
    pub products: Option<serde_json::Value>,
}

#[derive(Debug, Deserialize)]
pub struct OrderHistoryQuery {
    pub user_id: Option<String>,
}

#[cfg(test)]
mod tests {
    use super::*;

    fn full_metadata() -> HashMap<String, String> {
        HashMap::from([
            ("orderNumber".to_string(), "ord-123".to_string()),
            ("customerName".to_string(), "Jane Doe".to_string()),
            ("customerEmail".to_string(), "jane@example.com".to_string()),
            ("clerkUserId".to_string(), "user_abc".to_string()),
        ])
    }

    #[test]
    fn metadata_parses_when_all_keys_present() {
        let map = full_metadata();
        let meta = CheckoutMetadata::from_map(Some(&map)).unwrap();
        assert_eq!(meta.order_number, "ord-123");
        assert_eq!(meta.clerk_user_id, "user_abc");
    }

    #[test]
    fn metadata_missing_key_is_rejected() {
        let mut map = full_metadata();
        map.remove("customerEmail");
        let err = CheckoutMetadata::from_map(Some(&map)).unwrap_err();
        assert!(matches!(err, AppError::MalformedMetadata(_)));
    }

    #[test]
    fn metadata_empty_value_is_rejected() {
        let mut map = full_metadata();
        map.insert("orderNumber".to_string(), String::new());
        let err = CheckoutMetadata::from_map(Some(&map)).unwrap_err();
        assert!(matches!(err, AppError::MalformedMetadata(_)));
    }

    #[test]
    fn metadata_absent_map_is_rejected() {
        let err = CheckoutMetadata::from_map(None).unwrap_err();
        assert!(matches!(err, AppError::MalformedMetadata(_)));
    }

    #[test]
    fn order_document_serializes_with_backend_field_names() {
        let doc = OrderDocument {
            doc_type: "order".to_string(),
            order_number: "ord-123".to_string(),
            stripe_checkout_session_id: "cs_test_1".to_string(),
            stripe_payment_intent_id: Some("pi_1".to_string()),
            stripe_customer_id: None,
            clerk_user_id: "user_abc".to_string(),
            customer_name: "Jane Doe".to_string(),
            email: "jane@example.com".to_string(),
            currency: Some("usd".to_string()),
            amount_discount: 0.0,
            products: vec![OrderProductEntry {
                key: "k1".to_string(),
                product: ProductReference::new("p1"),
                quantity: 2,
            }],
            total_price: 50.0,
            status: "paid".to_string(),
            order_date: Utc::now(),
        };

        let value = serde_json::to_value(&doc).unwrap();
        assert_eq!(value["_type"], "order");
        assert_eq!(value["orderNumber"], "ord-123");
        assert_eq!(value["stripeCheckoutSessionId"], "cs_test_1");
        assert_eq!(value["totalPrice"], 50.0);
        assert_eq!(value["amountDiscount"], 0.0);
        assert_eq!(value["status"], "paid");
        assert_eq!(value["products"][0]["_key"], "k1");
        assert_eq!(value["products"][0]["product"]["_type"], "reference");
        assert_eq!(value["products"][0]["product"]["_ref"], "p1");
        assert_eq!(value["products"][0]["quantity"], 2);
        assert!(value.get("stripeCustomerId").is_none());
    }
}
