use actix_web::web;
use utoipa::OpenApi;
use utoipa_swagger_ui::SwaggerUi;

use crate::handlers;
use crate::models::*;

#[derive(OpenApi)]
#[openapi(
    paths(
        handlers::product::get_products,
        handlers::product::search_products,
        handlers::category::get_categories,
        handlers::category::get_category_products,
        handlers::order::get_order_history,
        handlers::checkout::create_checkout,
    ),
    components(
        schemas(
            Product,
            Slug,
            Category,
            OrderSummary,
            CreateCheckoutRequest,
            CartItemRequest,
            CheckoutResponse,
            ApiError,
        )
    ),
    tags(
        (name = "catalog", description = "Product and category browsing"),
        (name = "order", description = "Order history"),
        (name = "checkout", description = "Checkout session creation"),
    ),
    info(
        title = "Storefront Backend API",
        version = "1.0.0",
        description = "Storefront REST API: catalog, search, checkout and order history"
    ),
    servers(
        (url = "/api/v1", description = "Local server")
    )
)]
pub struct ApiDoc;

pub fn swagger_config(cfg: &mut web::ServiceConfig) {
    cfg.service(
        SwaggerUi::new("/swagger-ui/{_:.*}").url("/api-docs/openapi.json", ApiDoc::openapi()),
    )
    .route(
        "/swagger-ui",
        web::get().to(|| async {
            actix_web::HttpResponse::Found()
                .append_header(("Location", "/swagger-ui/"))
                .finish()
        }),
    );
}
