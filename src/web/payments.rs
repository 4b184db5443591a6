//! Payment intents and the contact-request lifecycle they unlock.

use super::users::DeleteResponse;
use crate::contact_request::{self, NewPayment};
use crate::error::AppError;
use crate::middleware::{AdminIdentity, Identity};
use crate::payment::{self, PaymentError, PaymentGateway};
use actix_web::{delete, get, patch, post, web, HttpResponse};
use sea_orm::DatabaseConnection;
use serde::{Deserialize, Serialize};
use std::sync::Arc;
use validator::Validate;

pub(super) fn configure(conf: &mut actix_web::web::ServiceConfig) {
    conf.service(create_payment_intent)
        .service(record_payment)
        .service(list_contact_requests)
        .service(list_own_contact_requests)
        .service(approve_contact_request)
        .service(delete_contact_request);
}

#[derive(Deserialize)]
struct IntentBody {
    price: f64,
}

#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
struct IntentResponse {
    client_secret: String,
}

/// POST /create-payment-intent - Start a payment with the provider.
#[post("/create-payment-intent")]
async fn create_payment_intent(
    _identity: Identity,
    gateway: web::Data<Arc<dyn PaymentGateway>>,
    body: web::Json<IntentBody>,
) -> Result<HttpResponse, AppError> {
    let amount = payment::to_minor_units(body.price)
        .map_err(|e| AppError::BadRequest(e.to_string()))?;

    let client_secret = gateway.create_intent(amount).await.map_err(|e| match e {
        PaymentError::InvalidAmount => AppError::BadRequest(e.to_string()),
        PaymentError::Provider(msg) => {
            log::error!("Payment intent failed: {}", msg);
            AppError::Internal(msg)
        }
    })?;

    Ok(HttpResponse::Ok().json(IntentResponse { client_secret }))
}

/// POST /payments - Record a completed payment as a pending contact request.
#[post("/payments")]
async fn record_payment(
    identity: Identity,
    db: web::Data<DatabaseConnection>,
    body: web::Json<NewPayment>,
) -> Result<HttpResponse, AppError> {
    let payment = body.into_inner();
    payment.validate()?;
    identity.require_email(&payment.email)?;

    let request = contact_request::create_contact_request(db.get_ref(), payment).await?;
    Ok(HttpResponse::Created().json(request))
}

/// GET /contact-requests - Every contact request, admin only.
#[get("/contact-requests")]
async fn list_contact_requests(
    _admin: AdminIdentity,
    db: web::Data<DatabaseConnection>,
) -> Result<HttpResponse, AppError> {
    let requests = contact_request::list_all(db.get_ref()).await?;
    Ok(HttpResponse::Ok().json(requests))
}

/// GET /contact-requests/{email} - The caller's contact requests.
#[get("/contact-requests/{email}")]
async fn list_own_contact_requests(
    identity: Identity,
    db: web::Data<DatabaseConnection>,
    email: web::Path<String>,
) -> Result<HttpResponse, AppError> {
    identity.require_email(&email)?;

    let requests = contact_request::list_for_requester(db.get_ref(), &email).await?;
    Ok(HttpResponse::Ok().json(requests))
}

/// PATCH /contact-requests/{id} - Approve and reveal the mobile number.
#[patch("/contact-requests/{id}")]
async fn approve_contact_request(
    admin: AdminIdentity,
    db: web::Data<DatabaseConnection>,
    id: web::Path<i32>,
) -> Result<HttpResponse, AppError> {
    let request = contact_request::approve(db.get_ref(), id.into_inner()).await?;
    log::info!("{} approved contact request {}", admin.email(), request.id);
    Ok(HttpResponse::Ok().json(request))
}

/// DELETE /contact-requests/{id} - Withdraw a request (requester) or remove it (admin).
#[delete("/contact-requests/{id}")]
async fn delete_contact_request(
    identity: Identity,
    db: web::Data<DatabaseConnection>,
    id: web::Path<i32>,
) -> Result<HttpResponse, AppError> {
    let is_admin = crate::user::is_admin(db.get_ref(), identity.email()).await?;
    contact_request::delete(db.get_ref(), id.into_inner(), identity.email(), is_admin).await?;
    Ok(HttpResponse::Ok().json(DeleteResponse { deleted_count: 1 }))
}
