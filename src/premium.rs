//! Premium upgrade workflow.
//!
//! A request moves `pending -> approved`, or is deleted while pending; there is no
//! rejected state. Approval is a fan-out over three records (the request, the user's
//! role and the biodata's premium flag) committed in one transaction so a half-applied
//! approval is never visible.

use crate::error::AppError;
use crate::orm::premium_requests::{self, PremiumStatus};
use crate::orm::users::{self, Role};
use chrono::Utc;
use sea_orm::sea_query::Expr;
use sea_orm::{
    entity::*, query::*, ActiveValue::Set, DatabaseConnection, DbErr, TransactionTrait,
};
use serde::Deserialize;
use validator::Validate;

#[derive(Debug, Clone, Deserialize, Validate)]
#[serde(rename_all = "camelCase")]
pub struct NewPremiumRequest {
    /// Internal id of the biodata to upgrade.
    pub biodata_unique_id: i32,
    #[validate(email)]
    pub user_email: String,
    pub user_name: Option<String>,
}

/// Opens a premium request for the requester's own biodata.
pub async fn create_request(
    db: &DatabaseConnection,
    new: NewPremiumRequest,
) -> Result<premium_requests::Model, AppError> {
    let biodata = crate::biodata::find_by_id(db, new.biodata_unique_id)
        .await?
        .ok_or_else(|| AppError::NotFound("Biodata not found".to_owned()))?;

    if biodata.user_email != new.user_email {
        return Err(AppError::Forbidden(
            "You can only request premium for your own biodata".to_owned(),
        ));
    }

    let existing = premium_requests::Entity::find()
        .filter(premium_requests::Column::BiodataUniqueId.eq(new.biodata_unique_id))
        .filter(premium_requests::Column::UserEmail.eq(new.user_email.as_str()))
        .one(db)
        .await?;
    if existing.is_some() {
        return Err(AppError::Conflict(
            "Premium request already exists".to_owned(),
        ));
    }

    let request = premium_requests::ActiveModel {
        biodata_unique_id: Set(biodata.id),
        biodata_id: Set(biodata.biodata_id),
        user_email: Set(new.user_email),
        user_name: Set(new.user_name.or(Some(biodata.name))),
        status: Set(PremiumStatus::Pending),
        created_at: Set(Utc::now().naive_utc()),
        ..Default::default()
    }
    .insert(db)
    .await?;

    log::info!(
        "Premium request {} opened by {} for biodata {}",
        request.id,
        request.user_email,
        request.biodata_id
    );
    Ok(request)
}

pub async fn list_all(db: &DatabaseConnection) -> Result<Vec<premium_requests::Model>, DbErr> {
    premium_requests::Entity::find()
        .order_by_desc(premium_requests::Column::CreatedAt)
        .all(db)
        .await
}

pub async fn list_for_user(
    db: &DatabaseConnection,
    email: &str,
) -> Result<Vec<premium_requests::Model>, DbErr> {
    premium_requests::Entity::find()
        .filter(premium_requests::Column::UserEmail.eq(email))
        .order_by_desc(premium_requests::Column::CreatedAt)
        .all(db)
        .await
}

/// Approves a pending request: request -> approved, user -> premium, biodata -> premium.
pub async fn approve(
    db: &DatabaseConnection,
    id: i32,
) -> Result<premium_requests::Model, AppError> {
    let txn = db.begin().await?;

    let request = premium_requests::Entity::find_by_id(id)
        .one(&txn)
        .await?
        .ok_or_else(|| AppError::NotFound("Premium request not found".to_owned()))?;

    if request.status == PremiumStatus::Approved {
        return Err(AppError::Conflict(
            "Premium request is already approved".to_owned(),
        ));
    }

    let user_rows = users::Entity::update_many()
        .col_expr(users::Column::Role, Expr::value(Role::Premium))
        .filter(users::Column::Email.eq(request.user_email.as_str()))
        .exec(&txn)
        .await?
        .rows_affected;
    if user_rows == 0 {
        // Dropping the transaction rolls it back.
        return Err(AppError::NotFound("User not found".to_owned()));
    }

    let biodata_rows = crate::user::set_biodata_premium(&txn, &request.user_email, true).await?;
    if biodata_rows == 0 {
        return Err(AppError::NotFound("Biodata not found".to_owned()));
    }

    let mut active: premium_requests::ActiveModel = request.into();
    active.status = Set(PremiumStatus::Approved);
    let request = active.update(&txn).await?;

    txn.commit().await?;
    log::info!(
        "Premium request {} approved; {} is now premium",
        request.id,
        request.user_email
    );

    Ok(request)
}

/// Deletes a pending request. Only the requester or an admin may do so.
pub async fn delete(
    db: &DatabaseConnection,
    id: i32,
    caller: &str,
    caller_is_admin: bool,
) -> Result<(), AppError> {
    let request = premium_requests::Entity::find_by_id(id)
        .one(db)
        .await?
        .ok_or_else(|| AppError::NotFound("Premium request not found".to_owned()))?;

    if request.user_email != caller && !caller_is_admin {
        return Err(AppError::forbidden());
    }

    if request.status == PremiumStatus::Approved {
        return Err(AppError::Conflict(
            "Approved premium requests cannot be deleted".to_owned(),
        ));
    }

    premium_requests::Entity::delete_by_id(id).exec(db).await?;
    log::info!("Premium request {} deleted by {}", id, caller);
    Ok(())
}
