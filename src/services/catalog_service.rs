use serde_json::Value;

use crate::error::AppResult;
use crate::external::ContentService;
use crate::models::{Category, Product};

/// Read-only product and category queries against the content backend.
#[derive(Clone)]
pub struct CatalogService {
    content: ContentService,
}

impl CatalogService {
    pub fn new(content: ContentService) -> Self {
        Self { content }
    }

    pub async fn get_all_products(&self) -> AppResult<Vec<Product>> {
        let products = self
            .content
            .query::<Vec<Product>>("*[_type == 'product'] | order(name asc)")
            .await?;
        Ok(products.unwrap_or_default())
    }

    pub async fn get_all_categories(&self) -> AppResult<Vec<Category>> {
        let categories = self
            .content
            .query::<Vec<Category>>("*[_type == 'category'] | order(name asc)")
            .await?;
        Ok(categories.unwrap_or_default())
    }

    /// Prefix search on product names.
    pub async fn search_products_by_name(&self, term: &str) -> AppResult<Vec<Product>> {
        let groq = "*[_type == 'product' && name match $searchParam] | order(name asc)";
        let param = Value::String(format!("{term}*"));
        let products = self
            .content
            .query_with_params::<Vec<Product>>(groq, &[("searchParam", &param)])
            .await?;
        Ok(products.unwrap_or_default())
    }

    pub async fn get_products_by_category(&self, slug: &str) -> AppResult<Vec<Product>> {
        let groq = "*[_type == 'product' && references(*[_type == 'category' && slug.current == $slug]._id)] | order(name asc)";
        let param = Value::String(slug.to_string());
        let products = self
            .content
            .query_with_params::<Vec<Product>>(groq, &[("slug", &param)])
            .await?;
        Ok(products.unwrap_or_default())
    }

    pub async fn get_product_by_id(&self, product_id: &str) -> AppResult<Option<Product>> {
        let groq = "*[_type == 'product' && _id == $id][0]";
        let param = Value::String(product_id.to_string());
        self.content
            .query_with_params::<Product>(groq, &[("id", &param)])
            .await
    }
}
