use rocket_db_pools::{Database, sqlx};
use sqlx::{PgPool, migrate::Migrator};

#[derive(Database)]
#[database("catalog_db")]
pub struct CatalogDb(sqlx::PgPool);

static MIGRATOR: Migrator = sqlx::migrate!("./migrations");

/// Run database migrations.
///
/// Idempotent: migrations that have already been applied are skipped, and
/// checksum drift aborts startup before the API serves traffic.
pub async fn run_migrations(pool: &PgPool) -> Result<(), sqlx::Error> {
    log::info!("checking database migration state");
    MIGRATOR.run(pool).await?;
    log::info!("database migrations up to date");
    Ok(())
}
