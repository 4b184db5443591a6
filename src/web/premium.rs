//! Premium upgrade requests.

use super::users::DeleteResponse;
use crate::error::AppError;
use crate::middleware::{AdminIdentity, Identity};
use crate::premium::{self, NewPremiumRequest};
use actix_web::{delete, get, patch, post, web, HttpResponse};
use sea_orm::DatabaseConnection;
use validator::Validate;

pub(super) fn configure(conf: &mut actix_web::web::ServiceConfig) {
    conf.service(create_request)
        .service(list_requests)
        .service(list_own_requests)
        .service(approve_request)
        .service(delete_request);
}

/// POST /request-premium - Ask for the caller's own biodata to become premium.
#[post("/request-premium")]
async fn create_request(
    identity: Identity,
    db: web::Data<DatabaseConnection>,
    body: web::Json<NewPremiumRequest>,
) -> Result<HttpResponse, AppError> {
    let new = body.into_inner();
    new.validate()?;
    identity.require_email(&new.user_email)?;

    let request = premium::create_request(db.get_ref(), new).await?;
    Ok(HttpResponse::Created().json(request))
}

/// GET /request-premium - Every premium request, admin only.
#[get("/request-premium")]
async fn list_requests(
    _admin: AdminIdentity,
    db: web::Data<DatabaseConnection>,
) -> Result<HttpResponse, AppError> {
    let requests = premium::list_all(db.get_ref()).await?;
    Ok(HttpResponse::Ok().json(requests))
}

/// GET /request-premium/{email} - The caller's premium requests.
#[get("/request-premium/{email}")]
async fn list_own_requests(
    identity: Identity,
    db: web::Data<DatabaseConnection>,
    email: web::Path<String>,
) -> Result<HttpResponse, AppError> {
    identity.require_email(&email)?;

    let requests = premium::list_for_user(db.get_ref(), &email).await?;
    Ok(HttpResponse::Ok().json(requests))
}

/// PATCH /request-premium/{id} - Approve; role and biodata flag follow atomically.
#[patch("/request-premium/{id}")]
async fn approve_request(
    admin: AdminIdentity,
    db: web::Data<DatabaseConnection>,
    id: web::Path<i32>,
) -> Result<HttpResponse, AppError> {
    let request = premium::approve(db.get_ref(), id.into_inner()).await?;
    log::info!("{} approved premium request {}", admin.email(), request.id);
    Ok(HttpResponse::Ok().json(request))
}

/// DELETE /request-premium/{id} - Drop a pending request.
#[delete("/request-premium/{id}")]
async fn delete_request(
    identity: Identity,
    db: web::Data<DatabaseConnection>,
    id: web::Path<i32>,
) -> Result<HttpResponse, AppError> {
    let is_admin = crate::user::is_admin(db.get_ref(), identity.email()).await?;
    premium::delete(db.get_ref(), id.into_inner(), identity.email(), is_admin).await?;
    Ok(HttpResponse::Ok().json(DeleteResponse { deleted_count: 1 }))
}
