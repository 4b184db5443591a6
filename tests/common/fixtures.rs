//! Test fixtures for creating test data
#![allow(dead_code)]

use actix_web::body::MessageBody;
use actix_web::dev::ServiceResponse;
use actix_web::{test, web::Data};
use async_trait::async_trait;
use chrono::Utc;
use sea_orm::{entity::*, ActiveValue::Set, DatabaseConnection, DbErr};
use soulmatch::biodata::{self, BiodataInput};
use soulmatch::orm::biodatas;
use soulmatch::orm::users::{self, Role};
use soulmatch::payment::{PaymentError, PaymentGateway};
use soulmatch::token::{Claims, TokenService};
use std::sync::Arc;

pub const TEST_SECRET: &str = "test-secret-that-is-long-enough-for-hs256";

pub fn token_service() -> TokenService {
    TokenService::new(TEST_SECRET, chrono::Duration::hours(1))
}

/// Signed bearer token for `email`.
pub fn token_for(email: &str) -> String {
    token_service()
        .issue(Claims::for_email(email))
        .expect("Failed to issue token")
}

pub fn bearer(email: &str) -> (&'static str, String) {
    ("Authorization", format!("Bearer {}", token_for(email)))
}

/// Create a user with a given role directly in the store
pub async fn create_test_user(
    db: &DatabaseConnection,
    email: &str,
    role: Role,
) -> Result<users::Model, DbErr> {
    users::ActiveModel {
        email: Set(email.to_owned()),
        name: Set(Some(email.split('@').next().unwrap_or(email).to_owned())),
        photo_url: Set(None),
        role: Set(role),
        created_at: Set(Utc::now().naive_utc()),
        ..Default::default()
    }
    .insert(db)
    .await
}

/// A complete biodata submission for `email`.
pub fn biodata_input(email: &str, biodata_type: &str, age: i32) -> BiodataInput {
    BiodataInput {
        user_email: email.to_owned(),
        biodata_type: biodata_type.to_owned(),
        name: format!("Biodata of {}", email),
        profile_image: Some("https://img.example/p.png".to_owned()),
        date_of_birth: Some("1995-04-12".to_owned()),
        age: Some(age),
        height: Some("5'6\"".to_owned()),
        weight: Some("60kg".to_owned()),
        occupation: Some("Engineer".to_owned()),
        race: Some("Fair".to_owned()),
        fathers_name: Some("Father".to_owned()),
        mothers_name: Some("Mother".to_owned()),
        permanent_division: Some("Dhaka".to_owned()),
        present_division: Some("Dhaka".to_owned()),
        expected_partner_age: Some("25".to_owned()),
        expected_partner_height: Some("5'4\"".to_owned()),
        expected_partner_weight: Some("55kg".to_owned()),
        contact_email: Some(email.to_owned()),
        mobile_number: Some("+8801700000000".to_owned()),
    }
}

/// Create a biodata through the regular upsert path
pub async fn create_test_biodata(
    db: &DatabaseConnection,
    email: &str,
    biodata_type: &str,
    age: i32,
) -> Result<biodatas::Model, DbErr> {
    let outcome = biodata::upsert_biodata(db, biodata_input(email, biodata_type, age)).await?;
    Ok(outcome.model().to_owned())
}

/// Payment gateway that answers without network access.
pub struct FakeGateway;

#[async_trait]
impl PaymentGateway for FakeGateway {
    async fn create_intent(&self, amount_minor: i64) -> Result<String, PaymentError> {
        Ok(format!("pi_test_{}_secret", amount_minor))
    }
}

pub fn fake_gateway() -> Data<Arc<dyn PaymentGateway>> {
    let gateway: Arc<dyn PaymentGateway> = Arc::new(FakeGateway);
    Data::new(gateway)
}

/// Reads a JSON response body.
pub async fn read_json<B: MessageBody>(resp: ServiceResponse<B>) -> serde_json::Value {
    let body = test::read_body(resp).await;
    serde_json::from_slice(&body).expect("Response is not JSON")
}
