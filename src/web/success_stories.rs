use crate::error::AppError;
use crate::middleware::Identity;
use crate::success_story::{self, NewSuccessStory};
use actix_web::{get, post, web, HttpResponse};
use sea_orm::DatabaseConnection;
use validator::Validate;

pub(super) fn configure(conf: &mut actix_web::web::ServiceConfig) {
    conf.service(create_story).service(list_stories);
}

/// POST /success-stories
#[post("/success-stories")]
async fn create_story(
    identity: Identity,
    db: web::Data<DatabaseConnection>,
    body: web::Json<NewSuccessStory>,
) -> Result<HttpResponse, AppError> {
    let new = body.into_inner();
    new.validate()?;

    let story = success_story::create_story(db.get_ref(), identity.email(), new).await?;
    Ok(HttpResponse::Created().json(story))
}

/// GET /success-stories
#[get("/success-stories")]
async fn list_stories(db: web::Data<DatabaseConnection>) -> Result<HttpResponse, AppError> {
    let stories = success_story::list_stories(db.get_ref()).await?;
    Ok(HttpResponse::Ok().json(stories))
}
