use actix_web::{web, HttpResponse, ResponseError, Result};
use serde::Deserialize;
use serde_json::json;

use crate::services::CatalogService;

#[derive(Debug, Deserialize)]
pub struct SearchQuery {
    pub q: Option<String>,
}

#[utoipa::path(
    get,
    path = "/products",
    tag = "catalog",
    responses(
        (status = 200, description = "All products, name ascending"),
        (status = 502, description = "Content backend unavailable")
    )
)]
pub async fn get_products(catalog: web::Data<CatalogService>) -> Result<HttpResponse> {
    match catalog.get_all_products().await {
        Ok(products) => Ok(HttpResponse::Ok().json(json!({
            "success": true,
            "data": products
        }))),
        Err(e) => Ok(e.error_response()),
    }
}

#[utoipa::path(
    get,
    path = "/products/search",
    tag = "catalog",
    params(
        ("q" = Option<String>, Query, description = "Name prefix to search for")
    ),
    responses(
        (status = 200, description = "Products matching the search term"),
        (status = 502, description = "Content backend unavailable")
    )
)]
pub async fn search_products(
    catalog: web::Data<CatalogService>,
    query: web::Query<SearchQuery>,
) -> Result<HttpResponse> {
    let term = query.q.as_deref().unwrap_or("").trim().to_string();
    if term.is_empty() {
        return Ok(HttpResponse::Ok().json(json!({
            "success": true,
            "data": []
        })));
    }

    match catalog.search_products_by_name(&term).await {
        Ok(products) => Ok(HttpResponse::Ok().json(json!({
            "success": true,
            "data": products
        }))),
        Err(e) => Ok(e.error_response()),
    }
}

pub fn product_config(cfg: &mut web::ServiceConfig) {
    cfg.service(
        web::scope("/products")
            .route("", web::get().to(get_products))
            .route("/search", web::get().to(search_products)),
    );
}
