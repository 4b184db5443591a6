use super::users::DeleteResponse;
use crate::error::AppError;
use crate::favourite::{self, NewFavourite};
use crate::middleware::Identity;
use actix_web::{delete, get, post, web, HttpResponse};
use sea_orm::DatabaseConnection;

pub(super) fn configure(conf: &mut actix_web::web::ServiceConfig) {
    conf.service(list_favourites)
        .service(add_favourite)
        .service(delete_favourite);
}

/// GET /favourites/{email} - The caller's favourites.
#[get("/favourites/{email}")]
async fn list_favourites(
    identity: Identity,
    db: web::Data<DatabaseConnection>,
    email: web::Path<String>,
) -> Result<HttpResponse, AppError> {
    identity.require_email(&email)?;

    let favourites = favourite::list_favourites(db.get_ref(), &email).await?;
    Ok(HttpResponse::Ok().json(favourites))
}

/// POST /favourites - Add a biodata to the caller's favourites.
#[post("/favourites")]
async fn add_favourite(
    identity: Identity,
    db: web::Data<DatabaseConnection>,
    body: web::Json<NewFavourite>,
) -> Result<HttpResponse, AppError> {
    let favourite =
        favourite::add_favourite(db.get_ref(), identity.email(), body.into_inner()).await?;
    Ok(HttpResponse::Created().json(favourite))
}

/// DELETE /favourites/{id}
#[delete("/favourites/{id}")]
async fn delete_favourite(
    identity: Identity,
    db: web::Data<DatabaseConnection>,
    id: web::Path<i32>,
) -> Result<HttpResponse, AppError> {
    favourite::delete_favourite(db.get_ref(), identity.email(), id.into_inner()).await?;
    Ok(HttpResponse::Ok().json(DeleteResponse { deleted_count: 1 }))
}
