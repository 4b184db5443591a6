//! Success stories freeze a snapshot of both partners' biodata at submission time.

use crate::error::AppError;
use crate::orm::{biodatas, success_stories};
use chrono::Utc;
use sea_orm::{entity::*, query::*, ActiveValue::Set, DatabaseConnection, DbErr};
use serde::{Deserialize, Deserializer};
use validator::Validate;

pub const MIN_RATING: f64 = 0.0;
pub const MAX_RATING: f64 = 5.0;

/// Accepts a rating sent either as a JSON number or as a numeric string.
fn rating_from_number_or_str<'de, D>(deserializer: D) -> Result<f64, D::Error>
where
    D: Deserializer<'de>,
{
    #[derive(Deserialize)]
    #[serde(untagged)]
    enum Raw {
        Number(f64),
        Text(String),
    }

    match Raw::deserialize(deserializer)? {
        Raw::Number(n) => Ok(n),
        Raw::Text(s) => s.trim().parse().map_err(serde::de::Error::custom),
    }
}

#[derive(Debug, Clone, Deserialize, Validate)]
#[serde(rename_all = "camelCase")]
pub struct NewSuccessStory {
    pub self_biodata_id: i32,
    pub partner_biodata_id: i32,
    pub couple_image: Option<String>,
    #[validate(length(min = 1))]
    pub story: String,
    #[validate(length(min = 1, max = 64))]
    pub marriage_date: String,
    #[serde(deserialize_with = "rating_from_number_or_str")]
    #[validate(range(min = 0.0, max = 5.0))]
    pub rating: f64,
}

pub async fn create_story(
    db: &DatabaseConnection,
    author: &str,
    new: NewSuccessStory,
) -> Result<success_stories::Model, AppError> {
    if new.self_biodata_id == new.partner_biodata_id {
        return Err(AppError::BadRequest(
            "Partner biodata must differ from your own".to_owned(),
        ));
    }
    if !new.rating.is_finite() || !(MIN_RATING..=MAX_RATING).contains(&new.rating) {
        return Err(AppError::BadRequest(format!(
            "Rating must be between {} and {}",
            MIN_RATING, MAX_RATING
        )));
    }

    let own = find_biodata(db, new.self_biodata_id).await?;
    let partner = find_biodata(db, new.partner_biodata_id).await?;

    let story = success_stories::ActiveModel {
        self_biodata_id: Set(own.biodata_id),
        self_name: Set(own.name),
        self_image: Set(own.profile_image),
        self_date_of_birth: Set(own.date_of_birth),
        self_occupation: Set(own.occupation),
        partner_biodata_id: Set(partner.biodata_id),
        partner_name: Set(partner.name),
        partner_image: Set(partner.profile_image),
        partner_date_of_birth: Set(partner.date_of_birth),
        partner_occupation: Set(partner.occupation),
        couple_image: Set(new.couple_image),
        story: Set(new.story),
        marriage_date: Set(new.marriage_date),
        rating: Set(new.rating),
        submitted_by: Set(author.to_owned()),
        created_at: Set(Utc::now().naive_utc()),
        ..Default::default()
    }
    .insert(db)
    .await?;

    log::info!(
        "Success story {} created for biodatas {} and {}",
        story.id,
        story.self_biodata_id,
        story.partner_biodata_id
    );
    Ok(story)
}

async fn find_biodata(db: &DatabaseConnection, biodata_id: i32) -> Result<biodatas::Model, AppError> {
    crate::biodata::find_by_biodata_id(db, biodata_id)
        .await?
        .ok_or_else(|| AppError::NotFound(format!("Biodata {} not found", biodata_id)))
}

/// Newest marriage first.
pub async fn list_stories(db: &DatabaseConnection) -> Result<Vec<success_stories::Model>, DbErr> {
    success_stories::Entity::find()
        .order_by_desc(success_stories::Column::MarriageDate)
        .order_by_desc(success_stories::Column::CreatedAt)
        .all(db)
        .await
}
