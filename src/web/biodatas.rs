//! Biodata endpoints.

use crate::biodata::{self, BiodataFilter, BiodataInput};
use crate::error::AppError;
use crate::middleware::{AdminIdentity, Identity};
use crate::orm::users::Role;
use actix_web::{get, post, web, HttpResponse};
use sea_orm::DatabaseConnection;
use serde::{Deserialize, Serialize};
use validator::Validate;

pub(super) fn configure(conf: &mut actix_web::web::ServiceConfig) {
    // `/biodatas/premium` must precede `/biodatas/{email}`.
    conf.service(list_biodatas)
        .service(list_premium)
        .service(upsert_biodata)
        .service(view_details)
        .service(view_own_biodata)
        .service(view_stats);
}

/// GET /biodatas - Public, filtered and paged listing without contact fields.
#[get("/biodatas")]
async fn list_biodatas(
    db: web::Data<DatabaseConnection>,
    filter: web::Query<BiodataFilter>,
) -> Result<HttpResponse, AppError> {
    let page = biodata::list_biodatas(db.get_ref(), &filter).await?;
    Ok(HttpResponse::Ok().json(page))
}

#[derive(Deserialize)]
struct PremiumSort {
    sort: Option<String>,
}

/// GET /biodatas/premium - Premium profiles ordered by age.
#[get("/biodatas/premium")]
async fn list_premium(
    db: web::Data<DatabaseConnection>,
    query: web::Query<PremiumSort>,
) -> Result<HttpResponse, AppError> {
    let descending = match query.sort.as_deref() {
        None | Some("asc") => false,
        Some("desc") => true,
        Some(other) => {
            return Err(AppError::BadRequest(format!(
                "Unknown sort order: {}",
                other
            )))
        }
    };

    let biodatas = biodata::list_premium(db.get_ref(), descending).await?;
    Ok(HttpResponse::Ok().json(biodatas))
}

#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
struct UpsertResponse {
    inserted: bool,
    biodata_id: i32,
    biodata: crate::orm::biodatas::Model,
}

/// POST /biodatas - Create the caller's biodata or replace it wholesale.
#[post("/biodatas")]
async fn upsert_biodata(
    identity: Identity,
    db: web::Data<DatabaseConnection>,
    body: web::Json<BiodataInput>,
) -> Result<HttpResponse, AppError> {
    let input = body.into_inner();
    input.validate()?;
    identity.require_email(&input.user_email)?;

    let outcome = biodata::upsert_biodata(db.get_ref(), input).await?;
    let biodata = outcome.model().to_owned();

    let mut resp = if outcome.is_inserted() {
        HttpResponse::Created()
    } else {
        HttpResponse::Ok()
    };
    Ok(resp.json(UpsertResponse {
        inserted: outcome.is_inserted(),
        biodata_id: biodata.biodata_id,
        biodata,
    }))
}

/// GET /biodatas/details/{id} - One biodata. Contact fields are shown only to the owner,
/// admins and premium members.
#[get("/biodatas/details/{id}")]
async fn view_details(
    identity: Identity,
    db: web::Data<DatabaseConnection>,
    id: web::Path<i32>,
) -> Result<HttpResponse, AppError> {
    let biodata = biodata::find_by_id(db.get_ref(), id.into_inner())
        .await?
        .ok_or_else(|| AppError::NotFound("Biodata not found".to_owned()))?;

    let entitled = biodata.user_email == identity.email()
        || crate::user::find_by_email(db.get_ref(), identity.email())
            .await?
            .map_or(false, |u| matches!(u.role, Role::Admin | Role::Premium));

    let biodata = if entitled {
        biodata
    } else {
        biodata::redact_contact(biodata)
    };
    Ok(HttpResponse::Ok().json(biodata))
}

/// GET /biodatas/{email} - The caller's own biodata with contact fields.
#[get("/biodatas/{email}")]
async fn view_own_biodata(
    identity: Identity,
    db: web::Data<DatabaseConnection>,
    email: web::Path<String>,
) -> Result<HttpResponse, AppError> {
    identity.require_email(&email)?;

    let biodata = biodata::find_by_email(db.get_ref(), &email)
        .await?
        .ok_or_else(|| AppError::NotFound("Biodata not found".to_owned()))?;
    Ok(HttpResponse::Ok().json(biodata))
}

/// GET /biodata-stats - Dashboard counters, admin only.
#[get("/biodata-stats")]
async fn view_stats(
    _admin: AdminIdentity,
    db: web::Data<DatabaseConnection>,
) -> Result<HttpResponse, AppError> {
    let stats = biodata::stats(db.get_ref()).await?;
    Ok(HttpResponse::Ok().json(stats))
}
