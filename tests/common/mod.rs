pub mod database;
pub mod fixtures;

/// Builds the full application around a store handle, the way the server binary does.
#[allow(unused_macros)]
macro_rules! test_app {
    ($db:expr) => {
        actix_web::test::init_service(
            actix_web::App::new()
                .app_data(actix_web::web::Data::new($db.clone()))
                .app_data(actix_web::web::Data::new(common::fixtures::token_service()))
                .app_data(common::fixtures::fake_gateway())
                .wrap(soulmatch::middleware::BearerAuth)
                .wrap(soulmatch::middleware::RequestTimeout::new(
                    std::time::Duration::from_secs(10),
                ))
                .configure(soulmatch::web::configure),
        )
        .await
    };
}
