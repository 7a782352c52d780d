use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

/// A product document as stored in the content backend.
///
/// `image` and `description` are backend-specific structures (image asset
/// reference, portable text) that this service only passes through.
#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
pub struct Product {
    #[serde(rename = "_id")]
    pub id: String,
    pub name: String,
    #[serde(default)]
    pub slug: Option<Slug>,
    pub price: f64,
    #[serde(default)]
    pub stock: Option<i64>,
    #[serde(default)]
    #[schema(value_type = Object)]
    pub image: Option<serde_json::Value>,
    #[serde(default)]
    #[schema(value_type = Object)]
    pub description: Option<serde_json::Value>,
    #[serde(default)]
    #[schema(value_type = Object)]
    pub categories: Option<serde_json::Value>,
}

#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
pub struct Slug {
    pub current: String,
}
