//! Integration tests for success stories

#[macro_use]
mod common;

use actix_web::test;
use common::{database::*, fixtures::*};
use soulmatch::error::AppError;
use soulmatch::success_story::{self, NewSuccessStory};

fn story(self_id: i32, partner_id: i32, marriage_date: &str) -> NewSuccessStory {
    NewSuccessStory {
        self_biodata_id: self_id,
        partner_biodata_id: partner_id,
        couple_image: Some("https://img.example/couple.png".to_owned()),
        story: "We met through SoulMatch.".to_owned(),
        marriage_date: marriage_date.to_owned(),
        rating: 4.5,
    }
}

#[actix_rt::test]
async fn test_story_snapshots_both_partners() {
    let db = setup_test_database().await.expect("Failed to setup test database");
    let groom = create_test_biodata(&db, "groom@test.com", "Male", 31).await.unwrap();
    let bride = create_test_biodata(&db, "bride@test.com", "Female", 27).await.unwrap();

    let created = success_story::create_story(&db, "groom@test.com", story(groom.biodata_id, bride.biodata_id, "2024-02-14"))
        .await
        .unwrap();
    assert_eq!(created.self_name, groom.name);
    assert_eq!(created.partner_name, bride.name);
    assert_eq!(created.submitted_by, "groom@test.com");

    // Later edits to a biodata do not rewrite the story.
    let mut renamed = biodata_input("bride@test.com", "Female", 28);
    renamed.name = "New Name".to_owned();
    soulmatch::biodata::upsert_biodata(&db, renamed).await.unwrap();

    let stories = success_story::list_stories(&db).await.unwrap();
    assert_eq!(stories[0].partner_name, bride.name);

    let stats = soulmatch::biodata::stats(&db).await.unwrap();
    assert_eq!(stats.marriages, 1);
}

#[actix_rt::test]
async fn test_invalid_stories_refused() {
    let db = setup_test_database().await.expect("Failed to setup test database");
    let groom = create_test_biodata(&db, "groom@test.com", "Male", 31).await.unwrap();

    let same = success_story::create_story(&db, "groom@test.com", story(groom.biodata_id, groom.biodata_id, "2024-02-14"))
        .await
        .unwrap_err();
    assert!(matches!(same, AppError::BadRequest(_)));

    let missing = success_story::create_story(&db, "groom@test.com", story(groom.biodata_id, 404, "2024-02-14"))
        .await
        .unwrap_err();
    assert!(matches!(missing, AppError::NotFound(_)));

    let mut too_high = story(groom.biodata_id, 404, "2024-02-14");
    too_high.rating = 9.0;
    let err = success_story::create_story(&db, "groom@test.com", too_high)
        .await
        .unwrap_err();
    assert!(matches!(err, AppError::BadRequest(_)));
}

#[actix_rt::test]
async fn test_stories_newest_marriage_first() {
    let db = setup_test_database().await.expect("Failed to setup test database");
    let a = create_test_biodata(&db, "a@test.com", "Male", 31).await.unwrap();
    let b = create_test_biodata(&db, "b@test.com", "Female", 27).await.unwrap();
    let c = create_test_biodata(&db, "c@test.com", "Male", 33).await.unwrap();
    let d = create_test_biodata(&db, "d@test.com", "Female", 29).await.unwrap();

    success_story::create_story(&db, "a@test.com", story(a.biodata_id, b.biodata_id, "2021-06-01"))
        .await
        .unwrap();
    success_story::create_story(&db, "c@test.com", story(c.biodata_id, d.biodata_id, "2023-12-24"))
        .await
        .unwrap();

    let dates: Vec<_> = success_story::list_stories(&db)
        .await
        .unwrap()
        .into_iter()
        .map(|s| s.marriage_date)
        .collect();
    assert_eq!(dates, vec!["2023-12-24", "2021-06-01"]);
}

#[actix_rt::test]
async fn test_stories_over_http() {
    let db = setup_test_database().await.expect("Failed to setup test database");
    let groom = create_test_biodata(&db, "groom@test.com", "Male", 31).await.unwrap();
    let bride = create_test_biodata(&db, "bride@test.com", "Female", 27).await.unwrap();
    let app = test_app!(db);

    let body = serde_json::json!({
        "selfBiodataId": groom.biodata_id,
        "partnerBiodataId": bride.biodata_id,
        "story": "Found each other.",
        "marriageDate": "2024-02-14",
        "rating": "5",
    });

    let req = test::TestRequest::post()
        .uri("/success-stories")
        .set_json(&body)
        .to_request();
    assert_eq!(test::call_service(&app, req).await.status(), 401);

    let req = test::TestRequest::post()
        .uri("/success-stories")
        .insert_header(bearer("groom@test.com"))
        .set_json(&body)
        .to_request();
    let resp = test::call_service(&app, req).await;
    assert_eq!(resp.status(), 201);
    assert_eq!(read_json(resp).await["rating"], 5.0);

    let req = test::TestRequest::get().uri("/success-stories").to_request();
    let resp = test::call_service(&app, req).await;
    assert_eq!(resp.status(), 200);
    assert_eq!(read_json(resp).await.as_array().map(Vec::len), Some(1));
}
