use crate::error::AppError;
use crate::orm::favourites;
use chrono::Utc;
use sea_orm::{entity::*, query::*, ActiveValue::Set, DatabaseConnection, DbErr};
use serde::Deserialize;

/// A favourite names only the target biodata; everything else is copied from the store.
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct NewFavourite {
    pub favourite_biodata_id: i32,
}

/// Adds biodata `new.favourite_biodata_id` to the favourites of `owner`.
///
/// Unknown biodatas are `NotFound`. The owner's own biodata and duplicates are refused.
pub async fn add_favourite(
    db: &DatabaseConnection,
    owner: &str,
    new: NewFavourite,
) -> Result<favourites::Model, AppError> {
    let biodata = crate::biodata::find_by_biodata_id(db, new.favourite_biodata_id)
        .await?
        .ok_or_else(|| AppError::NotFound("Biodata not found".to_owned()))?;

    if biodata.user_email == owner {
        return Err(AppError::Conflict(
            "You cannot add your own biodata to favourites".to_owned(),
        ));
    }

    let duplicate = favourites::Entity::find()
        .filter(favourites::Column::Email.eq(owner))
        .filter(favourites::Column::FavouriteBiodataId.eq(biodata.biodata_id))
        .one(db)
        .await?;
    if duplicate.is_some() {
        return Err(AppError::Conflict(
            "Biodata is already in your favourites".to_owned(),
        ));
    }

    let favourite = favourites::ActiveModel {
        email: Set(owner.to_owned()),
        favourite_email: Set(biodata.user_email),
        favourite_biodata_id: Set(biodata.biodata_id),
        favourite_name: Set(Some(biodata.name)),
        favourite_occupation: Set(biodata.occupation),
        favourite_permanent_division: Set(biodata.permanent_division),
        created_at: Set(Utc::now().naive_utc()),
        ..Default::default()
    }
    .insert(db)
    .await?;

    log::info!(
        "{} favourited biodata {}",
        favourite.email,
        favourite.favourite_biodata_id
    );
    Ok(favourite)
}

pub async fn list_favourites(
    db: &DatabaseConnection,
    owner: &str,
) -> Result<Vec<favourites::Model>, DbErr> {
    favourites::Entity::find()
        .filter(favourites::Column::Email.eq(owner))
        .order_by_desc(favourites::Column::CreatedAt)
        .all(db)
        .await
}

/// Deletes a favourite belonging to `owner`.
pub async fn delete_favourite(
    db: &DatabaseConnection,
    owner: &str,
    id: i32,
) -> Result<(), AppError> {
    let favourite = favourites::Entity::find_by_id(id)
        .one(db)
        .await?
        .ok_or_else(|| AppError::NotFound("Favourite not found".to_owned()))?;

    if favourite.email != owner {
        return Err(AppError::forbidden());
    }

    favourites::Entity::delete_by_id(id).exec(db).await?;
    Ok(())
}
