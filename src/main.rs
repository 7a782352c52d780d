use actix_web::{middleware::Logger, web, App, HttpServer};
use chrono::Local; // timestamp in log lines
use env_logger::{Env, Target};
use std::io::Write; // for env_logger custom formatter

use storefront_backend::{
    config::Config,
    external::{ContentService, StripeService},
    handlers,
    middlewares::create_cors,
    services::{CatalogService, CheckoutService, OrderService},
    swagger::swagger_config,
};

#[actix_web::main]
async fn main() -> std::io::Result<()> {
    env_logger::Builder::from_env(Env::default().default_filter_or("info"))
        .format(|buf, record| {
            let ts = Local::now().format("%Y-%m-%dT%H:%M:%S%.3f%:z");
            let level = record.level().as_str().to_ascii_lowercase();
            let msg_json = serde_json::to_string(&format!("{}", record.args()))
                .unwrap_or_else(|_| "\"<invalid utf8>\"".to_string());
            writeln!(
                buf,
                "{{\"timestamp\":\"{}\",\"level\":\"{}\",\"message\":{},\"target\":\"{}\"}}",
                ts,
                level,
                msg_json,
                record.target(),
            )
        })
        .target(Target::Stdout)
        .init();

    let config = Config::from_toml().expect("Failed to load configuration file");

    if config.stripe.webhook_secret.is_empty() {
        // Deliveries will be rejected with a config error until it is set.
        log::warn!("STRIPE_WEBHOOK_SECRET is not set");
    }

    // External service clients, injected into the services below.
    let stripe_service = StripeService::new(config.stripe.clone());
    let content_service = ContentService::new(config.sanity.clone());

    let catalog_service = CatalogService::new(content_service.clone());
    let order_service = OrderService::new(stripe_service.clone(), content_service.clone());
    let checkout_service = CheckoutService::new(stripe_service.clone(), catalog_service.clone());

    log::info!(
        "Starting HTTP server at {}:{}",
        config.server.host,
        config.server.port
    );

    HttpServer::new(move || {
        App::new()
            .wrap(Logger::default())
            .wrap(create_cors())
            .app_data(web::Data::new(stripe_service.clone()))
            .app_data(web::Data::new(content_service.clone()))
            .app_data(web::Data::new(catalog_service.clone()))
            .app_data(web::Data::new(order_service.clone()))
            .app_data(web::Data::new(checkout_service.clone()))
            .configure(swagger_config)
            .configure(handlers::webhook_config)
            .service(
                web::scope("/api/v1")
                    .configure(handlers::product_config)
                    .configure(handlers::category_config)
                    .configure(handlers::order_config)
                    .configure(handlers::checkout_config),
            )
    })
    .bind((config.server.host.as_str(), config.server.port))?
    .run()
    .await
}
