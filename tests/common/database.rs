//! Test database setup
#![allow(dead_code)]

use sea_orm::{ConnectOptions, Database, DatabaseConnection, DbErr};

/// Opens a private in-memory SQLite store with every table created.
///
/// The pool holds exactly one connection; a second one would see a different,
/// empty in-memory database.
pub async fn setup_test_database() -> Result<DatabaseConnection, DbErr> {
    let mut opt = ConnectOptions::new("sqlite::memory:".to_owned());
    opt.max_connections(1)
        .min_connections(1)
        .sqlx_logging(false);

    let db = Database::connect(opt).await?;
    soulmatch::db::create_schema(&db).await?;
    Ok(db)
}
