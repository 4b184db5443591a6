use actix_web::http::header;
use actix_web::middleware::{DefaultHeaders, Logger};
use actix_web::web::Data;
use actix_web::{App, HttpServer};
use env_logger::Env;
use soulmatch::app_config::AppConfig;
use soulmatch::middleware::{BearerAuth, RequestTimeout};
use soulmatch::payment::{PaymentGateway, StripeGateway};
use soulmatch::token::{TokenService, MIN_SECRET_LEN};
use std::sync::Arc;

#[actix_web::main]
async fn main() -> std::io::Result<()> {
    init_lib_mods();

    let config = AppConfig::load().unwrap_or_else(|e| {
        log::warn!("Failed to load config file, using defaults: {}", e);
        AppConfig::default()
    });

    if config.auth.token_secret.is_empty() {
        log::error!("ACCESS_TOKEN_SECRET is not set; refusing to start.");
        return Err(std::io::Error::new(
            std::io::ErrorKind::InvalidInput,
            "token secret is not set",
        ));
    } else if config.auth.token_secret.len() < MIN_SECRET_LEN {
        log::warn!(
            "ACCESS_TOKEN_SECRET is shorter than {} bytes; tokens are easier to forge.",
            MIN_SECRET_LEN
        );
    }

    // A database outage at startup is logged, not fatal.
    let db = soulmatch::db::connect_or_disconnected(&config.database).await;
    if let Err(e) = soulmatch::db::create_schema(&db).await {
        log::error!("Failed to create schema: {}", e);
    }

    let db = Data::new(db);
    let tokens = Data::new(TokenService::new(
        config.auth.token_secret.as_bytes(),
        chrono::Duration::minutes(config.auth.token_ttl_minutes),
    ));
    let gateway: Data<Arc<dyn PaymentGateway>> =
        Data::new(Arc::new(StripeGateway::new(config.payment.clone())));
    let request_timeout = config.server.request_timeout();

    log::info!(
        "Server is running on {}:{}",
        config.server.host,
        config.server.port
    );

    HttpServer::new(move || {
        // Order of middleware IS IMPORTANT and is in REVERSE EXECUTION ORDER.
        App::new()
            .app_data(db.clone())
            .app_data(tokens.clone())
            .app_data(gateway.clone())
            .wrap(BearerAuth)
            .wrap(RequestTimeout::new(request_timeout))
            .wrap(
                DefaultHeaders::new()
                    .add((header::ACCESS_CONTROL_ALLOW_ORIGIN, "*"))
                    .add((
                        header::ACCESS_CONTROL_ALLOW_METHODS,
                        "GET,POST,PATCH,DELETE,OPTIONS",
                    ))
                    .add((
                        header::ACCESS_CONTROL_ALLOW_HEADERS,
                        "Content-Type,Authorization",
                    ))
                    .add((header::X_CONTENT_TYPE_OPTIONS, "nosniff")),
            )
            .wrap(Logger::new("%a %r %s %Dms"))
            .configure(soulmatch::web::configure)
    })
    .bind((config.server.host.as_str(), config.server.port))?
    .run()
    .await
}

/// Initialize third party crates we rely on but don't have control over.
pub fn init_lib_mods() {
    // A missing .env is fine in deployments that set real environment variables.
    dotenv::dotenv().ok();
    env_logger::Builder::from_env(Env::default().default_filter_or("info")).init();
}
