//! Account records and role management.

use crate::error::AppError;
use crate::orm::{biodatas, users};
use crate::orm::users::Role;
use chrono::Utc;
use sea_orm::sea_query::Expr;
use sea_orm::{
    entity::*, query::*, ActiveValue::Set, ConnectionTrait, DatabaseConnection, DbErr,
    TransactionTrait,
};

/// Fields accepted when an account is first seen.
#[derive(Debug, Clone, Default)]
pub struct NewUser {
    pub email: String,
    pub name: Option<String>,
    pub photo_url: Option<String>,
}

/// Result of an idempotent create.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum CreateOutcome {
    Created(i32),
    AlreadyExists(i32),
}

impl CreateOutcome {
    pub fn id(&self) -> i32 {
        match self {
            CreateOutcome::Created(id) | CreateOutcome::AlreadyExists(id) => *id,
        }
    }
}

pub async fn find_by_email<C: ConnectionTrait>(
    db: &C,
    email: &str,
) -> Result<Option<users::Model>, DbErr> {
    users::Entity::find()
        .filter(users::Column::Email.eq(email))
        .one(db)
        .await
}

/// Inserts a user unless one with the same email exists, in which case the existing id
/// is returned. New accounts always start as `normal`.
pub async fn create_user(db: &DatabaseConnection, new: NewUser) -> Result<CreateOutcome, DbErr> {
    if let Some(existing) = find_by_email(db, &new.email).await? {
        return Ok(CreateOutcome::AlreadyExists(existing.id));
    }

    let user = users::ActiveModel {
        email: Set(new.email.to_owned()),
        name: Set(new.name),
        photo_url: Set(new.photo_url),
        role: Set(Role::Normal),
        created_at: Set(Utc::now().naive_utc()),
        ..Default::default()
    };

    match user.insert(db).await {
        Ok(model) => {
            log::info!("New user registered: {} (user_id: {})", model.email, model.id);
            Ok(CreateOutcome::Created(model.id))
        }
        // Lost a race against a concurrent create for the same email.
        Err(e) if crate::error::is_unique_violation(&e) => find_by_email(db, &new.email)
            .await?
            .map(|existing| CreateOutcome::AlreadyExists(existing.id))
            .ok_or(e),
        Err(e) => Err(e),
    }
}

/// Lists users, optionally filtered by a case-insensitive name fragment.
pub async fn list_users(
    db: &DatabaseConnection,
    search: Option<&str>,
) -> Result<Vec<users::Model>, DbErr> {
    let mut query = users::Entity::find().order_by_asc(users::Column::Id);

    if let Some(search) = search.map(str::trim).filter(|s| !s.is_empty()) {
        query = query.filter(
            Expr::cust_with_values("LOWER(name) LIKE ?", vec![format!("%{}%", search.to_lowercase())]),
        );
    }

    query.all(db).await
}

/// True when the stored role of `email` is admin. Read fresh on every call.
pub async fn is_admin(db: &DatabaseConnection, email: &str) -> Result<bool, DbErr> {
    Ok(find_by_email(db, email)
        .await?
        .map_or(false, |user| user.role == Role::Admin))
}

/// Sets a user's role and mirrors the premium flag onto their biodata in one transaction.
pub async fn update_role(
    db: &DatabaseConnection,
    user_id: i32,
    role: Role,
) -> Result<users::Model, AppError> {
    let txn = db.begin().await?;

    let user = users::Entity::find_by_id(user_id)
        .one(&txn)
        .await?
        .ok_or_else(|| AppError::NotFound("User not found".to_owned()))?;

    let email = user.email.to_owned();
    let mut active: users::ActiveModel = user.into();
    active.role = Set(role);
    let user = active.update(&txn).await?;

    set_biodata_premium(&txn, &email, role == Role::Premium).await?;

    txn.commit().await?;
    log::info!("Role of {} set to {:?}", email, role);

    Ok(user)
}

/// Writes `Biodata.isPremium` for the biodata owned by `email`, if any.
pub(crate) async fn set_biodata_premium<C: ConnectionTrait>(
    db: &C,
    email: &str,
    is_premium: bool,
) -> Result<u64, DbErr> {
    let res = biodatas::Entity::update_many()
        .col_expr(biodatas::Column::IsPremium, Expr::value(is_premium))
        .filter(biodatas::Column::UserEmail.eq(email))
        .exec(db)
        .await?;
    Ok(res.rows_affected)
}

pub async fn delete_user(db: &DatabaseConnection, user_id: i32) -> Result<u64, DbErr> {
    let res = users::Entity::delete_by_id(user_id).exec(db).await?;
    if res.rows_affected > 0 {
        log::info!("Deleted user_id {}", user_id);
    }
    Ok(res.rows_affected)
}
