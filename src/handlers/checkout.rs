use actix_web::{web, HttpResponse, ResponseError, Result};
use serde_json::json;

use crate::models::CreateCheckoutRequest;
use crate::services::CheckoutService;

#[utoipa::path(
    post,
    path = "/checkout",
    tag = "checkout",
    request_body = CreateCheckoutRequest,
    responses(
        (status = 200, description = "Checkout session created"),
        (status = 400, description = "Empty cart or invalid quantity"),
        (status = 404, description = "Unknown product in cart"),
        (status = 502, description = "Payment processor or content backend unavailable")
    )
)]
pub async fn create_checkout(
    checkout_service: web::Data<CheckoutService>,
    request: web::Json<CreateCheckoutRequest>,
) -> Result<HttpResponse> {
    match checkout_service.create_checkout_session(&request).await {
        Ok(response) => Ok(HttpResponse::Ok().json(json!({
            "success": true,
            "data": response
        }))),
        Err(e) => Ok(e.error_response()),
    }
}

pub fn checkout_config(cfg: &mut web::ServiceConfig) {
    cfg.service(web::scope("/checkout").route("", web::post().to(create_checkout)));
}
