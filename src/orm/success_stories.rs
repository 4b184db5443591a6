//! SeaORM Entity for success_stories table
//!
//! Partner details are copied in at creation and never refreshed.

use sea_orm::entity::prelude::*;
use serde::Serialize;

#[derive(Clone, Debug, PartialEq, DeriveEntityModel, Serialize)]
#[sea_orm(table_name = "success_stories")]
#[serde(rename_all = "camelCase")]
pub struct Model {
    #[sea_orm(primary_key)]
    #[serde(rename = "_id")]
    pub id: i32,
    pub self_biodata_id: i32,
    pub self_name: String,
    pub self_image: Option<String>,
    pub self_date_of_birth: Option<String>,
    pub self_occupation: Option<String>,
    pub partner_biodata_id: i32,
    pub partner_name: String,
    pub partner_image: Option<String>,
    pub partner_date_of_birth: Option<String>,
    pub partner_occupation: Option<String>,
    pub couple_image: Option<String>,
    #[sea_orm(column_type = "Text")]
    pub story: String,
    pub marriage_date: String,
    pub rating: f64,
    /// Author of the submission.
    pub submitted_by: String,
    pub created_at: DateTime,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {}

impl ActiveModelBehavior for ActiveModel {}
