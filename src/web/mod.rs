pub mod biodatas;
pub mod favourites;
pub mod index;
pub mod jwt;
pub mod payments;
pub mod premium;
pub mod success_stories;
pub mod users;

use crate::error::AppError;
use actix_web::{http::Method, web, HttpRequest, HttpResponse};

/// Configures the web app by adding services from each web file.
///
/// @see https://docs.rs/actix-web/4.0.1/actix_web/struct.App.html#method.configure
pub fn configure(conf: &mut web::ServiceConfig) {
    // Malformed bodies, queries and paths answer with the same JSON shape as handlers.
    conf.app_data(
        web::JsonConfig::default()
            .error_handler(|err, _req| AppError::BadRequest(err.to_string()).into()),
    )
    .app_data(
        web::QueryConfig::default()
            .error_handler(|err, _req| AppError::BadRequest(err.to_string()).into()),
    )
    .app_data(
        web::PathConfig::default()
            .error_handler(|err, _req| AppError::BadRequest(err.to_string()).into()),
    );

    // Descending order. Order is important.
    // Route resolution will stop at the first match.
    index::configure(conf);
    jwt::configure(conf);
    users::configure(conf);
    biodatas::configure(conf);
    payments::configure(conf);
    premium::configure(conf);
    success_stories::configure(conf);
    favourites::configure(conf);

    conf.default_service(web::route().to(fallback));
}

/// Answers CORS preflight for any path and 404 for everything else.
async fn fallback(req: HttpRequest) -> HttpResponse {
    if req.method() == Method::OPTIONS {
        HttpResponse::NoContent().finish()
    } else {
        HttpResponse::NotFound().json(serde_json::json!({ "message": "Not found" }))
    }
}
