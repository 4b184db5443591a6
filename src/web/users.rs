//! Account endpoints.

use crate::error::AppError;
use crate::middleware::{AdminIdentity, Identity};
use crate::orm::users::Role;
use crate::user::{self, CreateOutcome, NewUser};
use actix_web::{delete, get, patch, post, web, HttpResponse};
use sea_orm::DatabaseConnection;
use serde::{Deserialize, Serialize};
use validator::Validate;

pub(super) fn configure(conf: &mut actix_web::web::ServiceConfig) {
    conf.service(create_user)
        .service(list_users)
        .service(check_admin)
        .service(view_user)
        .service(update_role)
        .service(delete_user);
}

#[derive(Deserialize, Validate)]
#[serde(rename_all = "camelCase")]
struct CreateUserBody {
    #[validate(email)]
    email: String,
    name: Option<String>,
    #[serde(alias = "photoURL")]
    photo_url: Option<String>,
    /// Accepted for compatibility; new accounts always start as `normal`.
    role: Option<String>,
}

#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
struct CreateUserResponse {
    #[serde(skip_serializing_if = "Option::is_none")]
    message: Option<&'static str>,
    acknowledged: bool,
    inserted_id: i32,
}

/// POST /users - Register an account, or return the existing one for the same email.
#[post("/users")]
async fn create_user(
    db: web::Data<DatabaseConnection>,
    body: web::Json<CreateUserBody>,
) -> Result<HttpResponse, AppError> {
    let body = body.into_inner();
    body.validate()?;

    if let Some(role) = body.role.as_deref().filter(|r| *r != "normal") {
        log::warn!(
            "Ignoring requested role {:?} for new account {}",
            role,
            body.email
        );
    }

    let outcome = user::create_user(
        db.get_ref(),
        NewUser {
            email: body.email.trim().to_owned(),
            name: body.name,
            photo_url: body.photo_url,
        },
    )
    .await?;

    let message = match outcome {
        CreateOutcome::Created(_) => None,
        CreateOutcome::AlreadyExists(_) => Some("User already exists"),
    };

    Ok(HttpResponse::Ok().json(CreateUserResponse {
        message,
        acknowledged: true,
        inserted_id: outcome.id(),
    }))
}

#[derive(Deserialize)]
struct UserSearch {
    search: Option<String>,
}

/// GET /users - All accounts, admin only.
#[get("/users")]
async fn list_users(
    _admin: AdminIdentity,
    db: web::Data<DatabaseConnection>,
    query: web::Query<UserSearch>,
) -> Result<HttpResponse, AppError> {
    let users = user::list_users(db.get_ref(), query.search.as_deref()).await?;
    Ok(HttpResponse::Ok().json(users))
}

#[derive(Serialize)]
struct AdminCheck {
    admin: bool,
}

/// GET /users/admin/{email} - Whether the caller is an admin.
#[get("/users/admin/{email}")]
async fn check_admin(
    identity: Identity,
    db: web::Data<DatabaseConnection>,
    email: web::Path<String>,
) -> Result<HttpResponse, AppError> {
    identity.require_email(&email)?;

    let admin = user::is_admin(db.get_ref(), &email).await?;
    Ok(HttpResponse::Ok().json(AdminCheck { admin }))
}

/// GET /users/{email} - The caller's own account.
#[get("/users/{email}")]
async fn view_user(
    identity: Identity,
    db: web::Data<DatabaseConnection>,
    email: web::Path<String>,
) -> Result<HttpResponse, AppError> {
    identity.require_email(&email)?;

    let user = user::find_by_email(db.get_ref(), &email)
        .await?
        .ok_or_else(|| AppError::NotFound("User not found".to_owned()))?;
    Ok(HttpResponse::Ok().json(user))
}

#[derive(Deserialize)]
struct RoleBody {
    role: Role,
}

/// PATCH /users/role/{id} - Set a role; the biodata premium flag follows it.
#[patch("/users/role/{id}")]
async fn update_role(
    admin: AdminIdentity,
    db: web::Data<DatabaseConnection>,
    user_id: web::Path<i32>,
    body: web::Json<RoleBody>,
) -> Result<HttpResponse, AppError> {
    let user = user::update_role(db.get_ref(), user_id.into_inner(), body.role).await?;
    log::info!("{} changed role of {} to {:?}", admin.email(), user.email, user.role);
    Ok(HttpResponse::Ok().json(user))
}

#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
pub(super) struct DeleteResponse {
    pub deleted_count: u64,
}

/// DELETE /users/{id} - Remove an account, admin only.
#[delete("/users/{id}")]
async fn delete_user(
    admin: AdminIdentity,
    db: web::Data<DatabaseConnection>,
    user_id: web::Path<i32>,
) -> Result<HttpResponse, AppError> {
    let deleted_count = user::delete_user(db.get_ref(), user_id.into_inner()).await?;
    if deleted_count == 0 {
        return Err(AppError::NotFound("User not found".to_owned()));
    }

    log::info!("{} deleted a user account", admin.email());
    Ok(HttpResponse::Ok().json(DeleteResponse { deleted_count }))
}
