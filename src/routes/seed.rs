use rocket::State;
use rocket::get;
use rocket::serde::json::Json;
use rocket_db_pools::sqlx;
use rocket_okapi::okapi::schemars::JsonSchema;
use rocket_okapi::openapi;
use serde::{Deserialize, Serialize};

use crate::error::ApiError;
use crate::import::{ImportConfig, PgImportStore, run_import};

#[derive(Debug, Serialize, Deserialize, JsonSchema)]
pub struct SeedImportResponse {
    #[serde(rename = "manufacturersAdded")]
    pub manufacturers_added: usize,
    #[serde(rename = "vehiclesAdded")]
    pub vehicles_added: usize,
}

/// Import the vehicle CSV dataset into the catalog tables.
///
/// This endpoint is idempotent - re-running it over an unchanged file adds
/// nothing, because manufacturers and vehicles already present in storage
/// are skipped by the pipeline's dedup checks.
#[openapi(tag = "Seed")]
#[get("/seed/import")]
pub async fn import(pool: &State<sqlx::PgPool>) -> Result<Json<SeedImportResponse>, ApiError> {
    let config = ImportConfig::from_env();
    let mut store = PgImportStore::new(pool.inner().clone());

    let stats = run_import(&mut store, &config).await?;

    Ok(Json(SeedImportResponse {
        manufacturers_added: stats.manufacturers_added,
        vehicles_added: stats.vehicles_added,
    }))
}
