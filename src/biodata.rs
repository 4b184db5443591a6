//! Biodata profiles: upsert-by-replace, lookups and listings.

use crate::error::is_unique_violation;
use crate::orm::users::Role;
use crate::orm::{biodatas, contact_requests, success_stories};
use chrono::Utc;
use sea_orm::sea_query::Expr;
use sea_orm::{
    entity::*, query::*, ActiveValue::Set, ActiveValue::Unchanged, ConnectionTrait,
    DatabaseConnection, DbErr, FromQueryResult, PaginatorTrait,
};
use serde::{Deserialize, Serialize};
use std::future::Future;
use validator::{Validate, ValidationError};

/// Attempts at assigning a fresh biodataId before giving up.
const MAX_ID_ATTEMPTS: u32 = 5;
pub const DEFAULT_PAGE_SIZE: u64 = 20;
pub const MAX_PAGE_SIZE: u64 = 100;

fn validate_biodata_type(value: &str) -> Result<(), ValidationError> {
    match value {
        "Male" | "Female" => Ok(()),
        _ => Err(ValidationError::new("biodata_type")),
    }
}

/// A complete biodata submission. Every resubmission replaces the stored document.
#[derive(Debug, Clone, Default, Deserialize, Validate)]
#[serde(rename_all = "camelCase")]
pub struct BiodataInput {
    #[validate(email)]
    pub user_email: String,
    #[validate(custom = "validate_biodata_type")]
    pub biodata_type: String,
    #[validate(length(min = 1, max = 255))]
    pub name: String,
    pub profile_image: Option<String>,
    pub date_of_birth: Option<String>,
    #[validate(range(min = 18, max = 120))]
    pub age: Option<i32>,
    pub height: Option<String>,
    pub weight: Option<String>,
    pub occupation: Option<String>,
    pub race: Option<String>,
    pub fathers_name: Option<String>,
    pub mothers_name: Option<String>,
    pub permanent_division: Option<String>,
    pub present_division: Option<String>,
    pub expected_partner_age: Option<String>,
    pub expected_partner_height: Option<String>,
    pub expected_partner_weight: Option<String>,
    #[validate(email)]
    pub contact_email: Option<String>,
    #[validate(length(max = 32))]
    pub mobile_number: Option<String>,
}

impl BiodataInput {
    /// Every column is written, so fields missing from the submission become NULL.
    fn into_active_model(self, biodata_id: i32, is_premium: bool) -> biodatas::ActiveModel {
        biodatas::ActiveModel {
            biodata_id: Set(biodata_id),
            user_email: Set(self.user_email),
            is_premium: Set(is_premium),
            biodata_type: Set(self.biodata_type),
            name: Set(self.name),
            profile_image: Set(self.profile_image),
            date_of_birth: Set(self.date_of_birth),
            age: Set(self.age),
            height: Set(self.height),
            weight: Set(self.weight),
            occupation: Set(self.occupation),
            race: Set(self.race),
            fathers_name: Set(self.fathers_name),
            mothers_name: Set(self.mothers_name),
            permanent_division: Set(self.permanent_division),
            present_division: Set(self.present_division),
            expected_partner_age: Set(self.expected_partner_age),
            expected_partner_height: Set(self.expected_partner_height),
            expected_partner_weight: Set(self.expected_partner_weight),
            contact_email: Set(self.contact_email),
            mobile_number: Set(self.mobile_number),
            updated_at: Set(Utc::now().naive_utc()),
            ..Default::default()
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub enum UpsertOutcome {
    Inserted(biodatas::Model),
    Replaced(biodatas::Model),
}

impl UpsertOutcome {
    pub fn model(&self) -> &biodatas::Model {
        match self {
            UpsertOutcome::Inserted(m) | UpsertOutcome::Replaced(m) => m,
        }
    }

    pub fn is_inserted(&self) -> bool {
        matches!(self, UpsertOutcome::Inserted(_))
    }
}

pub async fn find_by_email<C: ConnectionTrait>(
    db: &C,
    email: &str,
) -> Result<Option<biodatas::Model>, DbErr> {
    biodatas::Entity::find()
        .filter(biodatas::Column::UserEmail.eq(email))
        .one(db)
        .await
}

/// Looks a biodata up by its public number.
pub async fn find_by_biodata_id<C: ConnectionTrait>(
    db: &C,
    biodata_id: i32,
) -> Result<Option<biodatas::Model>, DbErr> {
    biodatas::Entity::find()
        .filter(biodatas::Column::BiodataId.eq(biodata_id))
        .one(db)
        .await
}

pub async fn find_by_id<C: ConnectionTrait>(
    db: &C,
    id: i32,
) -> Result<Option<biodatas::Model>, DbErr> {
    biodatas::Entity::find_by_id(id).one(db).await
}

/// One greater than the highest assigned biodataId, or 1 for an empty store.
pub async fn next_biodata_id<C: ConnectionTrait>(db: &C) -> Result<i32, DbErr> {
    Ok(biodatas::Entity::find()
        .order_by_desc(biodatas::Column::BiodataId)
        .one(db)
        .await?
        .map_or(1, |b| b.biodata_id + 1))
}

/// Creates the biodata for `input.user_email`, or replaces it wholesale if one exists.
///
/// A replaced biodata keeps its biodataId. A new one takes the next id; if a concurrent
/// insert claimed the same id the unique index rejects ours and the whole step reruns.
pub async fn upsert_biodata(
    db: &DatabaseConnection,
    input: BiodataInput,
) -> Result<UpsertOutcome, DbErr> {
    let email = input.user_email.to_owned();
    retry_on_unique_violation(&email, || try_upsert(db, input.clone())).await
}

/// Runs `op` until it succeeds, fails with anything but a unique violation, or has
/// been tried `MAX_ID_ATTEMPTS` times.
async fn retry_on_unique_violation<T, F, Fut>(email: &str, mut op: F) -> Result<T, DbErr>
where
    F: FnMut() -> Fut,
    Fut: Future<Output = Result<T, DbErr>>,
{
    let mut attempt = 1;
    loop {
        match op().await {
            Err(e) if is_unique_violation(&e) && attempt < MAX_ID_ATTEMPTS => {
                log::warn!(
                    "biodataId collision for {} (attempt {}), retrying",
                    email,
                    attempt
                );
                attempt += 1;
            }
            res => return res,
        }
    }
}

async fn try_upsert(db: &DatabaseConnection, input: BiodataInput) -> Result<UpsertOutcome, DbErr> {
    // isPremium always mirrors the owner's role, never the submission.
    let is_premium = crate::user::find_by_email(db, &input.user_email)
        .await?
        .map_or(false, |u| u.role == Role::Premium);

    if let Some(existing) = find_by_email(db, &input.user_email).await? {
        let mut active = input.into_active_model(existing.biodata_id, is_premium);
        active.id = Unchanged(existing.id);
        let model = active.update(db).await?;
        log::info!(
            "Biodata {} replaced for {}",
            model.biodata_id,
            model.user_email
        );
        return Ok(UpsertOutcome::Replaced(model));
    }

    let biodata_id = next_biodata_id(db).await?;
    let model = input
        .into_active_model(biodata_id, is_premium)
        .insert(db)
        .await?;
    log::info!(
        "Biodata {} created for {}",
        model.biodata_id,
        model.user_email
    );
    Ok(UpsertOutcome::Inserted(model))
}

/// Strips contact fields from a biodata shown to someone not entitled to them.
pub fn redact_contact(mut biodata: biodatas::Model) -> biodatas::Model {
    biodata.mobile_number = None;
    biodata.contact_email = None;
    biodata
}

#[derive(Debug, Default, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct BiodataFilter {
    pub biodata_type: Option<String>,
    pub permanent_division: Option<String>,
    pub min_age: Option<i32>,
    pub max_age: Option<i32>,
    /// 1-based page number.
    pub page: Option<u64>,
    pub limit: Option<u64>,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct BiodataPage {
    pub total: u64,
    pub page: u64,
    pub limit: u64,
    pub items: Vec<biodatas::Model>,
}

/// Public listing ordered by biodataId. Contact fields are removed.
pub async fn list_biodatas(
    db: &DatabaseConnection,
    filter: &BiodataFilter,
) -> Result<BiodataPage, DbErr> {
    let mut query = biodatas::Entity::find().order_by_asc(biodatas::Column::BiodataId);

    if let Some(biodata_type) = &filter.biodata_type {
        query = query.filter(biodatas::Column::BiodataType.eq(biodata_type.to_owned()));
    }
    if let Some(division) = &filter.permanent_division {
        query = query.filter(biodatas::Column::PermanentDivision.eq(division.to_owned()));
    }
    if let Some(min_age) = filter.min_age {
        query = query.filter(biodatas::Column::Age.gte(min_age));
    }
    if let Some(max_age) = filter.max_age {
        query = query.filter(biodatas::Column::Age.lte(max_age));
    }

    let limit = filter
        .limit
        .unwrap_or(DEFAULT_PAGE_SIZE)
        .clamp(1, MAX_PAGE_SIZE);
    let page = filter.page.unwrap_or(1).max(1);

    let paginator = query.paginate(db, limit as usize);
    let total = paginator.num_items().await? as u64;
    let items = paginator
        .fetch_page((page - 1) as usize)
        .await?
        .into_iter()
        .map(redact_contact)
        .collect();

    Ok(BiodataPage {
        total,
        page,
        limit,
        items,
    })
}

/// Premium biodatas ordered by age.
pub async fn list_premium(
    db: &DatabaseConnection,
    descending: bool,
) -> Result<Vec<biodatas::Model>, DbErr> {
    let query = biodatas::Entity::find().filter(biodatas::Column::IsPremium.eq(true));
    let query = if descending {
        query.order_by_desc(biodatas::Column::Age)
    } else {
        query.order_by_asc(biodatas::Column::Age)
    };

    Ok(query
        .all(db)
        .await?
        .into_iter()
        .map(redact_contact)
        .collect())
}

#[derive(Debug, Serialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct BiodataStats {
    pub total: u64,
    pub male: u64,
    pub female: u64,
    pub premium: u64,
    pub marriages: u64,
    pub contact_revenue: f64,
}

#[derive(FromQueryResult)]
struct RevenueRow {
    total: Option<f64>,
}

pub async fn stats(db: &DatabaseConnection) -> Result<BiodataStats, DbErr> {
    let total = biodatas::Entity::find().count(db).await? as u64;
    let male = biodatas::Entity::find()
        .filter(biodatas::Column::BiodataType.eq("Male"))
        .count(db)
        .await? as u64;
    let female = biodatas::Entity::find()
        .filter(biodatas::Column::BiodataType.eq("Female"))
        .count(db)
        .await? as u64;
    let premium = biodatas::Entity::find()
        .filter(biodatas::Column::IsPremium.eq(true))
        .count(db)
        .await? as u64;
    let marriages = success_stories::Entity::find().count(db).await? as u64;

    let contact_revenue = contact_requests::Entity::find()
        .select_only()
        .column_as(Expr::col(contact_requests::Column::Price).sum(), "total")
        .into_model::<RevenueRow>()
        .one(db)
        .await?
        .and_then(|row| row.total)
        .unwrap_or(0.0);

    Ok(BiodataStats {
        total,
        male,
        female,
        premium,
        marriages,
        contact_revenue,
    })
}
