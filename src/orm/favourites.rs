//! SeaORM Entity for favourites table

use sea_orm::entity::prelude::*;
use serde::Serialize;

#[derive(Clone, Debug, PartialEq, DeriveEntityModel, Serialize)]
#[sea_orm(table_name = "favourites")]
#[serde(rename_all = "camelCase")]
pub struct Model {
    #[sea_orm(primary_key)]
    #[serde(rename = "_id")]
    pub id: i32,
    /// Owner of the favourite list.
    pub email: String,
    pub favourite_email: String,
    pub favourite_biodata_id: i32,
    pub favourite_name: Option<String>,
    pub favourite_occupation: Option<String>,
    pub favourite_permanent_division: Option<String>,
    pub created_at: DateTime,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {}

impl ActiveModelBehavior for ActiveModel {}
