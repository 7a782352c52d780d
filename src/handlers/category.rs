use actix_web::{web, HttpResponse, ResponseError, Result};
use serde_json::json;

use crate::services::CatalogService;

#[utoipa::path(
    get,
    path = "/categories",
    tag = "catalog",
    responses(
        (status = 200, description = "All categories, name ascending"),
        (status = 502, description = "Content backend unavailable")
    )
)]
pub async fn get_categories(catalog: web::Data<CatalogService>) -> Result<HttpResponse> {
    match catalog.get_all_categories().await {
        Ok(categories) => Ok(HttpResponse::Ok().json(json!({
            "success": true,
            "data": categories
        }))),
        Err(e) => Ok(e.error_response()),
    }
}

#[utoipa::path(
    get,
    path = "/categories/{slug}/products",
    tag = "catalog",
    params(
        ("slug" = String, Path, description = "Category slug")
    ),
    responses(
        (status = 200, description = "Products in the category"),
        (status = 502, description = "Content backend unavailable")
    )
)]
pub async fn get_category_products(
    catalog: web::Data<CatalogService>,
    path: web::Path<String>,
) -> Result<HttpResponse> {
    let slug = path.into_inner();
    match catalog.get_products_by_category(&slug).await {
        Ok(products) => Ok(HttpResponse::Ok().json(json!({
            "success": true,
            "data": products
        }))),
        Err(e) => Ok(e.error_response()),
    }
}

pub fn category_config(cfg: &mut web::ServiceConfig) {
    cfg.service(
        web::scope("/categories")
            .route("", web::get().to(get_categories))
            .route("/{slug}/products", web::get().to(get_category_products)),
    );
}
