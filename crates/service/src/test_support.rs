#![cfg(test)]
use sea_orm::DatabaseConnection;

/// Fresh migrated SQLite database for one test.
pub async fn get_db() -> Result<DatabaseConnection, anyhow::Error> {
    models::db::connect_temp_sqlite("service").await
}
