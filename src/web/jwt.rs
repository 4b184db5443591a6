//! Token issuance.

use crate::error::AppError;
use crate::token::{Claims, TokenService};
use actix_web::{post, web, HttpResponse};
use serde::Serialize;

pub(super) fn configure(conf: &mut actix_web::web::ServiceConfig) {
    conf.service(issue_token);
}

#[derive(Serialize)]
struct TokenResponse {
    token: String,
}

/// POST /jwt - Sign the submitted claims. No refresh exists; clients call this again.
#[post("/jwt")]
async fn issue_token(
    tokens: web::Data<TokenService>,
    claims: web::Json<Claims>,
) -> Result<HttpResponse, AppError> {
    let claims = claims.into_inner();
    if claims.email.trim().is_empty() {
        return Err(AppError::BadRequest("email is required".to_owned()));
    }

    let token = tokens.issue(claims).map_err(|e| {
        log::error!("Failed to issue token: {}", e);
        AppError::Internal(e.to_string())
    })?;

    Ok(HttpResponse::Ok().json(TokenResponse { token }))
}
