use actix_web::{get, HttpResponse, Responder};

pub(super) fn configure(conf: &mut actix_web::web::ServiceConfig) {
    conf.service(view_index);
}

#[get("/")]
async fn view_index() -> impl Responder {
    HttpResponse::Ok()
        .content_type("text/plain")
        .body("SoulMatch server is running")
}
