use actix_web::{web, HttpResponse, ResponseError, Result};
use serde_json::json;

use crate::error::AppError;
use crate::models::OrderHistoryQuery;
use crate::services::OrderService;

#[utoipa::path(
    get,
    path = "/orders",
    tag = "order",
    params(
        ("user_id" = String, Query, description = "External user id whose orders to list")
    ),
    responses(
        (status = 200, description = "Order history, newest first"),
        (status = 400, description = "Missing user_id"),
        (status = 502, description = "Content backend unavailable")
    )
)]
pub async fn get_order_history(
    order_service: web::Data<OrderService>,
    query: web::Query<OrderHistoryQuery>,
) -> Result<HttpResponse> {
    let user_id = match query.user_id.as_deref() {
        Some(id) if !id.is_empty() => id,
        _ => {
            return Ok(
                AppError::ValidationError("user_id is required".to_string()).error_response()
            );
        }
    };

    match order_service.get_user_orders(user_id).await {
        Ok(orders) => Ok(HttpResponse::Ok().json(json!({
            "success": true,
            "data": orders
        }))),
        Err(e) => Ok(e.error_response()),
    }
}

pub fn order_config(cfg: &mut web::ServiceConfig) {
    cfg.service(web::scope("/orders").route("", web::get().to(get_order_history)));
}
