//! Integration tests for biodata profiles

#[macro_use]
mod common;

use actix_web::test;
use common::{database::*, fixtures::*};
use soulmatch::biodata::{self, BiodataFilter};
use soulmatch::orm::users::Role;

#[actix_rt::test]
async fn test_first_biodata_gets_id_one() {
    let db = setup_test_database().await.expect("Failed to setup test database");

    assert_eq!(biodata::next_biodata_id(&db).await.unwrap(), 1);
    let created = create_test_biodata(&db, "first@test.com", "Male", 30)
        .await
        .unwrap();
    assert_eq!(created.biodata_id, 1);
}

#[actix_rt::test]
async fn test_new_biodata_takes_max_plus_one() {
    let db = setup_test_database().await.expect("Failed to setup test database");

    for (i, email) in ["a@test.com", "b@test.com", "c@test.com"].iter().enumerate() {
        let b = create_test_biodata(&db, email, "Female", 24).await.unwrap();
        assert_eq!(b.biodata_id, i as i32 + 1);
    }

    // Removing a middle record does not reuse its number.
    let b = biodata::find_by_biodata_id(&db, 2).await.unwrap().unwrap();
    use sea_orm::EntityTrait;
    soulmatch::orm::biodatas::Entity::delete_by_id(b.id)
        .exec(&db)
        .await
        .unwrap();

    let next = create_test_biodata(&db, "d@test.com", "Male", 29).await.unwrap();
    assert_eq!(next.biodata_id, 4);
}

#[actix_rt::test]
async fn test_resubmission_replaces_and_keeps_id() {
    let db = setup_test_database().await.expect("Failed to setup test database");
    create_test_biodata(&db, "other@test.com", "Male", 31).await.unwrap();
    let original = create_test_biodata(&db, "me@test.com", "Female", 27).await.unwrap();

    let mut resubmission = biodata_input("me@test.com", "Female", 28);
    resubmission.occupation = None;
    resubmission.race = None;

    let outcome = biodata::upsert_biodata(&db, resubmission).await.unwrap();
    assert!(!outcome.is_inserted());

    let replaced = outcome.model();
    assert_eq!(replaced.id, original.id);
    assert_eq!(replaced.biodata_id, original.biodata_id);
    assert_eq!(replaced.age, Some(28));
    // Omitted fields are cleared, not merged.
    assert_eq!(replaced.occupation, None);
    assert_eq!(replaced.race, None);
}

#[actix_rt::test]
async fn test_premium_flag_follows_owner_role() {
    let db = setup_test_database().await.expect("Failed to setup test database");
    create_test_user(&db, "gold@test.com", Role::Premium).await.unwrap();
    create_test_user(&db, "plain@test.com", Role::Normal).await.unwrap();

    let gold = create_test_biodata(&db, "gold@test.com", "Male", 33).await.unwrap();
    let plain = create_test_biodata(&db, "plain@test.com", "Female", 25).await.unwrap();

    assert!(gold.is_premium);
    assert!(!plain.is_premium);
}

#[actix_rt::test]
async fn test_listing_filters_pages_and_redacts() {
    let db = setup_test_database().await.expect("Failed to setup test database");
    create_test_biodata(&db, "m1@test.com", "Male", 25).await.unwrap();
    create_test_biodata(&db, "m2@test.com", "Male", 35).await.unwrap();
    create_test_biodata(&db, "f1@test.com", "Female", 22).await.unwrap();

    let males = biodata::list_biodatas(
        &db,
        &BiodataFilter {
            biodata_type: Some("Male".to_owned()),
            ..Default::default()
        },
    )
    .await
    .unwrap();
    assert_eq!(males.total, 2);
    assert!(males.items.iter().all(|b| b.mobile_number.is_none()));
    assert!(males.items.iter().all(|b| b.contact_email.is_none()));

    let aged = biodata::list_biodatas(
        &db,
        &BiodataFilter {
            min_age: Some(23),
            max_age: Some(30),
            ..Default::default()
        },
    )
    .await
    .unwrap();
    assert_eq!(aged.total, 1);
    assert_eq!(aged.items[0].user_email, "m1@test.com");

    let second_page = biodata::list_biodatas(
        &db,
        &BiodataFilter {
            page: Some(2),
            limit: Some(2),
            ..Default::default()
        },
    )
    .await
    .unwrap();
    assert_eq!(second_page.total, 3);
    assert_eq!(second_page.items.len(), 1);
    assert_eq!(second_page.items[0].biodata_id, 3);
}

#[actix_rt::test]
async fn test_premium_listing_sorted_by_age() {
    let db = setup_test_database().await.expect("Failed to setup test database");
    for (email, age) in [("p1@test.com", 40), ("p2@test.com", 21), ("p3@test.com", 30)] {
        create_test_user(&db, email, Role::Premium).await.unwrap();
        create_test_biodata(&db, email, "Female", age).await.unwrap();
    }
    create_test_biodata(&db, "n@test.com", "Female", 19).await.unwrap();

    let asc: Vec<_> = biodata::list_premium(&db, false)
        .await
        .unwrap()
        .into_iter()
        .map(|b| b.age)
        .collect();
    assert_eq!(asc, vec![Some(21), Some(30), Some(40)]);

    let desc: Vec<_> = biodata::list_premium(&db, true)
        .await
        .unwrap()
        .into_iter()
        .map(|b| b.age)
        .collect();
    assert_eq!(desc, vec![Some(40), Some(30), Some(21)]);
}

#[actix_rt::test]
async fn test_upsert_over_http() {
    let db = setup_test_database().await.expect("Failed to setup test database");
    let app = test_app!(db);

    let body = serde_json::json!({
        "userEmail": "me@test.com",
        "biodataType": "Female",
        "name": "Me",
        "age": 26,
        "mobileNumber": "+8801711111111",
    });

    let req = test::TestRequest::post()
        .uri("/biodatas")
        .insert_header(bearer("me@test.com"))
        .set_json(&body)
        .to_request();
    let resp = test::call_service(&app, req).await;
    assert_eq!(resp.status(), 201);
    let json = read_json(resp).await;
    assert_eq!(json["inserted"], true);
    assert_eq!(json["biodataId"], 1);
    assert_eq!(json["biodata"]["isPremium"], false);

    let req = test::TestRequest::post()
        .uri("/biodatas")
        .insert_header(bearer("me@test.com"))
        .set_json(&body)
        .to_request();
    let resp = test::call_service(&app, req).await;
    assert_eq!(resp.status(), 200);
    assert_eq!(read_json(resp).await["inserted"], false);

    // Someone else's email in the body.
    let req = test::TestRequest::post()
        .uri("/biodatas")
        .insert_header(bearer("intruder@test.com"))
        .set_json(&body)
        .to_request();
    assert_eq!(test::call_service(&app, req).await.status(), 403);
}

#[actix_rt::test]
async fn test_invalid_biodata_type_rejected() {
    let db = setup_test_database().await.expect("Failed to setup test database");
    let app = test_app!(db);

    let req = test::TestRequest::post()
        .uri("/biodatas")
        .insert_header(bearer("me@test.com"))
        .set_json(serde_json::json!({
            "userEmail": "me@test.com",
            "biodataType": "Other",
            "name": "Me",
        }))
        .to_request();
    let resp = test::call_service(&app, req).await;
    assert_eq!(resp.status(), 400);
    assert!(read_json(resp).await["message"].is_string());
}

#[actix_rt::test]
async fn test_details_contact_visibility() {
    let db = setup_test_database().await.expect("Failed to setup test database");
    create_test_user(&db, "owner@test.com", Role::Normal).await.unwrap();
    create_test_user(&db, "viewer@test.com", Role::Normal).await.unwrap();
    create_test_user(&db, "vip@test.com", Role::Premium).await.unwrap();
    let owned = create_test_biodata(&db, "owner@test.com", "Male", 30).await.unwrap();
    let app = test_app!(db);

    let uri = format!("/biodatas/details/{}", owned.id);

    let req = test::TestRequest::get()
        .uri(&uri)
        .insert_header(bearer("viewer@test.com"))
        .to_request();
    let json = read_json(test::call_service(&app, req).await).await;
    assert!(json["mobileNumber"].is_null());
    assert_eq!(json["biodataId"], owned.biodata_id);

    for email in ["vip@test.com", "owner@test.com"] {
        let req = test::TestRequest::get()
            .uri(&uri)
            .insert_header(bearer(email))
            .to_request();
        let json = read_json(test::call_service(&app, req).await).await;
        assert_eq!(json["mobileNumber"], "+8801700000000");
    }

    let req = test::TestRequest::get()
        .uri("/biodatas/details/9999")
        .insert_header(bearer("viewer@test.com"))
        .to_request();
    assert_eq!(test::call_service(&app, req).await.status(), 404);
}

#[actix_rt::test]
async fn test_premium_route_is_not_an_email() {
    let db = setup_test_database().await.expect("Failed to setup test database");
    let app = test_app!(db);

    let req = test::TestRequest::get()
        .uri("/biodatas/premium?sort=desc")
        .to_request();
    let resp = test::call_service(&app, req).await;
    assert_eq!(resp.status(), 200);
    assert_eq!(read_json(resp).await, serde_json::json!([]));

    let req = test::TestRequest::get()
        .uri("/biodatas/premium?sort=sideways")
        .to_request();
    assert_eq!(test::call_service(&app, req).await.status(), 400);
}

#[actix_rt::test]
async fn test_stats_counts() {
    let db = setup_test_database().await.expect("Failed to setup test database");
    create_test_user(&db, "admin@test.com", Role::Admin).await.unwrap();
    create_test_user(&db, "gold@test.com", Role::Premium).await.unwrap();
    create_test_biodata(&db, "gold@test.com", "Male", 30).await.unwrap();
    create_test_biodata(&db, "f@test.com", "Female", 24).await.unwrap();
    create_test_biodata(&db, "g@test.com", "Female", 26).await.unwrap();

    let stats = biodata::stats(&db).await.unwrap();
    assert_eq!(stats.total, 3);
    assert_eq!(stats.male, 1);
    assert_eq!(stats.female, 2);
    assert_eq!(stats.premium, 1);
    assert_eq!(stats.marriages, 0);
    assert_eq!(stats.contact_revenue, 0.0);

    let app = test_app!(db);
    let req = test::TestRequest::get()
        .uri("/biodata-stats")
        .insert_header(bearer("gold@test.com"))
        .to_request();
    assert_eq!(test::call_service(&app, req).await.status(), 403);

    let req = test::TestRequest::get()
        .uri("/biodata-stats")
        .insert_header(bearer("admin@test.com"))
        .to_request();
    let json = read_json(test::call_service(&app, req).await).await;
    assert_eq!(json["total"], 3);
    assert_eq!(json["contactRevenue"], 0.0);
}
