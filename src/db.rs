//! Store handle construction and schema bootstrapping.
//!
//! The connection is created once at startup and handed to the web layer as
//! `web::Data<DatabaseConnection>`; nothing here is global.

use crate::app_config::DatabaseConfig;
use crate::orm::{
    biodatas, contact_requests, favourites, premium_requests, success_stories, users,
};
use sea_orm::{
    ConnectOptions, ConnectionTrait, Database, DatabaseConnection, DbErr, EntityTrait, Schema,
};

/// Opens a connection pool with the configured limits.
pub async fn connect(config: &DatabaseConfig) -> Result<DatabaseConnection, DbErr> {
    let mut opt = ConnectOptions::new(config.url.to_owned());
    opt.max_connections(config.max_connections)
        .sqlx_logging(false);
    Database::connect(opt).await
}

/// Opens a connection pool, or logs the failure and returns a disconnected handle.
///
/// The listener still starts; every datastore call then fails with an internal error
/// until the process is restarted against a reachable database.
pub async fn connect_or_disconnected(config: &DatabaseConfig) -> DatabaseConnection {
    match connect(config).await {
        Ok(db) => {
            log::info!("Connected to database");
            db
        }
        Err(e) => {
            log::error!("Failed to connect to database: {}", e);
            DatabaseConnection::Disconnected
        }
    }
}

/// Creates every table that does not exist yet.
pub async fn create_schema(db: &DatabaseConnection) -> Result<(), DbErr> {
    let schema = Schema::new(db.get_database_backend());

    create_table(db, &schema, users::Entity).await?;
    create_table(db, &schema, biodatas::Entity).await?;
    create_table(db, &schema, favourites::Entity).await?;
    create_table(db, &schema, contact_requests::Entity).await?;
    create_table(db, &schema, premium_requests::Entity).await?;
    create_table(db, &schema, success_stories::Entity).await?;

    Ok(())
}

async fn create_table<E: EntityTrait>(
    db: &DatabaseConnection,
    schema: &Schema,
    entity: E,
) -> Result<(), DbErr> {
    let mut stmt = schema.create_table_from_entity(entity);
    stmt.if_not_exists();
    db.execute(db.get_database_backend().build(&stmt)).await?;
    Ok(())
}
