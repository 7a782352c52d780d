use actix_web::{web, HttpRequest, HttpResponse, ResponseError, Result};
use log::{error, info, warn};
use stripe::{EventObject, EventType};

use crate::models::CompletedCheckout;
use crate::services::OrderService;
use crate::external::StripeService;

/// Stripe webhook endpoint.
///
/// Verifies the delivery signature, then materializes an order for
/// `checkout.session.completed` events. Every other event type is
/// acknowledged without action so the processor does not retry it.
pub async fn stripe_webhook(
    req: HttpRequest,
    body: web::Bytes,
    stripe_service: web::Data<StripeService>,
    order_service: web::Data<OrderService>,
) -> Result<HttpResponse> {
    let signature = match req.headers().get("stripe-signature") {
        Some(sig) => sig.to_str().unwrap_or(""),
        None => {
            warn!("Missing stripe-signature header");
            return Ok(HttpResponse::BadRequest().json(serde_json::json!({
                "error": "missing stripe-signature header"
            })));
        }
    };

    let payload = std::str::from_utf8(&body).map_err(|_| {
        error!("Invalid UTF-8 in webhook payload");
        actix_web::error::ErrorBadRequest("invalid payload encoding")
    })?;

    let event = match stripe_service.verify_webhook_signature(payload, signature) {
        Ok(event) => event,
        Err(e) => {
            error!("Webhook rejected: {e}");
            return Ok(HttpResponse::build(e.status_code()).json(serde_json::json!({
                "error": e.to_string()
            })));
        }
    };

    info!(
        "Received Stripe webhook event: {} ({})",
        event.type_, event.id
    );

    if event.type_ == EventType::CheckoutSessionCompleted {
        let session = match event.data.object {
            EventObject::CheckoutSession(session) => session,
            _ => {
                warn!("checkout.session.completed event without a session object");
                return Ok(HttpResponse::BadRequest().json(serde_json::json!({
                    "error": "event does not contain a checkout session"
                })));
            }
        };

        let checkout = match CompletedCheckout::try_from(&session) {
            Ok(checkout) => checkout,
            Err(e) => {
                error!("Rejecting completed session {}: {e}", session.id);
                return Ok(HttpResponse::build(e.status_code()).json(serde_json::json!({
                    "error": e.to_string()
                })));
            }
        };

        // Any failure here returns 5xx so the processor redelivers; no
        // local retry.
        match order_service.create_order_from_session(&checkout).await {
            Ok(document_id) => {
                info!(
                    "Order document {document_id} created for session {}",
                    checkout.session_id
                );
            }
            Err(e) => {
                error!("Failed to create order for session {}: {e}", checkout.session_id);
                return Ok(HttpResponse::build(e.status_code()).json(serde_json::json!({
                    "error": e.to_string()
                })));
            }
        }
    } else {
        info!("Ignoring event type: {}", event.type_);
    }

    Ok(HttpResponse::Ok().json(serde_json::json!({
        "received": true
    })))
}

pub fn webhook_config(cfg: &mut web::ServiceConfig) {
    cfg.service(web::scope("/webhook").route("/stripe", web::post().to(stripe_webhook)));
}
