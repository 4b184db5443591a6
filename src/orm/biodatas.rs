//! SeaORM Entity for biodatas table

use sea_orm::entity::prelude::*;
use serde::Serialize;

#[derive(Clone, Debug, PartialEq, DeriveEntityModel, Serialize)]
#[sea_orm(table_name = "biodatas")]
#[serde(rename_all = "camelCase")]
pub struct Model {
    #[sea_orm(primary_key)]
    #[serde(rename = "_id")]
    pub id: i32,
    /// Public, monotonically assigned profile number.
    #[sea_orm(unique)]
    pub biodata_id: i32,
    #[sea_orm(unique)]
    pub user_email: String,
    pub is_premium: bool,
    pub biodata_type: String,
    pub name: String,
    pub profile_image: Option<String>,
    pub date_of_birth: Option<String>,
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
    pub contact_email: Option<String>,
    pub mobile_number: Option<String>,
    pub updated_at: DateTime,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {}

impl ActiveModelBehavior for ActiveModel {}
