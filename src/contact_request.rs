//! Contact reveal: a paid request for a biodata owner's mobile number.
//!
//! A request starts `pending` when the payment completes. On admin approval the mobile
//! number is copied from the biodata into the request, exactly once.

use crate::error::AppError;
use crate::orm::contact_requests::{self, ContactStatus};
use chrono::Utc;
use sea_orm::sea_query::Expr;
use sea_orm::{entity::*, query::*, ActiveValue::Set, DatabaseConnection, DbErr};
use serde::Deserialize;
use validator::Validate;

#[derive(Debug, Clone, Deserialize, Validate)]
#[serde(rename_all = "camelCase")]
pub struct NewPayment {
    #[validate(email)]
    pub email: String,
    pub biodata_id: i32,
    #[validate(length(min = 1, max = 255))]
    pub transaction_id: String,
    #[validate(range(min = 0.0))]
    pub price: f64,
}

pub async fn create_contact_request(
    db: &DatabaseConnection,
    payment: NewPayment,
) -> Result<contact_requests::Model, AppError> {
    let biodata = crate::biodata::find_by_biodata_id(db, payment.biodata_id)
        .await?
        .ok_or_else(|| AppError::NotFound("Biodata not found".to_owned()))?;

    if biodata.user_email == payment.email {
        return Err(AppError::Conflict(
            "You cannot request your own contact information".to_owned(),
        ));
    }

    let duplicate = contact_requests::Entity::find()
        .filter(contact_requests::Column::Email.eq(payment.email.as_str()))
        .filter(contact_requests::Column::BiodataId.eq(payment.biodata_id))
        .one(db)
        .await?;
    if duplicate.is_some() {
        return Err(AppError::Conflict(
            "Contact information already requested".to_owned(),
        ));
    }

    let request = contact_requests::ActiveModel {
        email: Set(payment.email),
        biodata_id: Set(payment.biodata_id),
        biodata_name: Set(Some(biodata.name)),
        transaction_id: Set(payment.transaction_id),
        price: Set(payment.price),
        status: Set(ContactStatus::Pending),
        mobile_number: Set(None),
        created_at: Set(Utc::now().naive_utc()),
        ..Default::default()
    }
    .insert(db)
    .await?;

    log::info!(
        "Contact request {} created by {} for biodata {}",
        request.id,
        request.email,
        request.biodata_id
    );
    Ok(request)
}

pub async fn list_all(db: &DatabaseConnection) -> Result<Vec<contact_requests::Model>, DbErr> {
    contact_requests::Entity::find()
        .order_by_desc(contact_requests::Column::CreatedAt)
        .all(db)
        .await
}

pub async fn list_for_requester(
    db: &DatabaseConnection,
    email: &str,
) -> Result<Vec<contact_requests::Model>, DbErr> {
    contact_requests::Entity::find()
        .filter(contact_requests::Column::Email.eq(email))
        .order_by_desc(contact_requests::Column::CreatedAt)
        .all(db)
        .await
}

/// Approves a pending request, copying the biodata's mobile number into it.
///
/// Fails with `NotFound` when the biodata is gone or has no mobile number; the request
/// then stays pending.
pub async fn approve(
    db: &DatabaseConnection,
    id: i32,
) -> Result<contact_requests::Model, AppError> {
    let request = contact_requests::Entity::find_by_id(id)
        .one(db)
        .await?
        .ok_or_else(|| AppError::NotFound("Contact request not found".to_owned()))?;

    if request.status == ContactStatus::Approved {
        return Err(AppError::Conflict(
            "Contact request is already approved".to_owned(),
        ));
    }

    let mobile_number = crate::biodata::find_by_biodata_id(db, request.biodata_id)
        .await?
        .and_then(|b| b.mobile_number)
        .filter(|m| !m.trim().is_empty())
        .ok_or_else(|| AppError::NotFound("Mobile number not found".to_owned()))?;

    // Conditional on `pending` so a concurrent approval cannot write twice.
    let res = contact_requests::Entity::update_many()
        .col_expr(
            contact_requests::Column::Status,
            Expr::value(ContactStatus::Approved),
        )
        .col_expr(
            contact_requests::Column::MobileNumber,
            Expr::value(mobile_number),
        )
        .filter(contact_requests::Column::Id.eq(id))
        .filter(contact_requests::Column::Status.eq(ContactStatus::Pending))
        .exec(db)
        .await?;
    if res.rows_affected == 0 {
        return Err(AppError::Conflict(
            "Contact request is already approved".to_owned(),
        ));
    }

    log::info!("Contact request {} approved", id);
    contact_requests::Entity::find_by_id(id)
        .one(db)
        .await?
        .ok_or_else(|| AppError::NotFound("Contact request not found".to_owned()))
}

/// Deletes a request. Only the requester or an admin may do so.
pub async fn delete(
    db: &DatabaseConnection,
    id: i32,
    caller: &str,
    caller_is_admin: bool,
) -> Result<(), AppError> {
    let request = contact_requests::Entity::find_by_id(id)
        .one(db)
        .await?
        .ok_or_else(|| AppError::NotFound("Contact request not found".to_owned()))?;

    if request.email != caller && !caller_is_admin {
        return Err(AppError::forbidden());
    }

    contact_requests::Entity::delete_by_id(id).exec(db).await?;
    log::info!("Contact request {} deleted by {}", id, caller);
    Ok(())
}
