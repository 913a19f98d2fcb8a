//! Storage collaborator contract for the import pipeline.
//!
//! The pipeline owns exactly one store handle for the duration of a run and
//! awaits every call before touching the next row, so implementations never
//! see interleaved operations from the same invocation.

use async_trait::async_trait;
use rocket_db_pools::sqlx::{self, PgPool};
use rust_decimal::Decimal;

use crate::models::Manufacturer;

/// A vehicle accepted by the pipeline but not necessarily flushed yet.
#[derive(Debug, Clone, PartialEq)]
pub struct NewVehicle {
    pub model_name: String,
    pub year: i32,
    pub combined_mpg: Option<Decimal>,
    pub annual_fuel_cost: Option<Decimal>,
    pub manufacturer_id: i32,
}

/// Operations the pipeline needs from relational storage.
///
/// `create_manufacturer` must return the generated identity synchronously
/// (from the pipeline's point of view) because later rows reference it as a
/// foreign key. `flush_vehicles` durably commits one batch as a unit of
/// work; batches flushed earlier stay committed if a later flush fails.
#[async_trait]
pub trait ImportStore: Send {
    async fn list_manufacturers(&mut self) -> Result<Vec<Manufacturer>, sqlx::Error>;

    async fn create_manufacturer(
        &mut self,
        name: &str,
        code: Option<&str>,
    ) -> Result<i32, sqlx::Error>;

    async fn vehicle_exists(
        &mut self,
        model_name: &str,
        year: i32,
        manufacturer_id: i32,
    ) -> Result<bool, sqlx::Error>;

    async fn flush_vehicles(&mut self, batch: &[NewVehicle]) -> Result<(), sqlx::Error>;
}

/// PostgreSQL-backed store used by the seed endpoint.
pub struct PgImportStore {
    pool: PgPool,
}

impl PgImportStore {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl ImportStore for PgImportStore {
    async fn list_manufacturers(&mut self) -> Result<Vec<Manufacturer>, sqlx::Error> {
        sqlx::query_as("SELECT id, name, code FROM manufacturers")
            .fetch_all(&self.pool)
            .await
    }

    async fn create_manufacturer(
        &mut self,
        name: &str,
        code: Option<&str>,
    ) -> Result<i32, sqlx::Error> {
        sqlx::query_scalar(
            "INSERT INTO manufacturers (name, code) VALUES ($1, $2) RETURNING id",
        )
        .bind(name)
        .bind(code)
        .fetch_one(&self.pool)
        .await
    }

    async fn vehicle_exists(
        &mut self,
        model_name: &str,
        year: i32,
        manufacturer_id: i32,
    ) -> Result<bool, sqlx::Error> {
        sqlx::query_scalar(
            r#"SELECT EXISTS(
                 SELECT 1 FROM vehicles
                 WHERE model_name = $1 AND year = $2 AND manufacturer_id = $3
               )"#,
        )
        .bind(model_name)
        .bind(year)
        .bind(manufacturer_id)
        .fetch_one(&self.pool)
        .await
    }

    async fn flush_vehicles(&mut self, batch: &[NewVehicle]) -> Result<(), sqlx::Error> {
        if batch.is_empty() {
            return Ok(());
        }

        let mut model_names = Vec::with_capacity(batch.len());
        let mut years = Vec::with_capacity(batch.len());
        let mut mpgs = Vec::with_capacity(batch.len());
        let mut costs = Vec::with_capacity(batch.len());
        let mut manufacturer_ids = Vec::with_capacity(batch.len());

        for vehicle in batch {
            model_names.push(vehicle.model_name.clone());
            years.push(vehicle.year);
            mpgs.push(vehicle.combined_mpg);
            costs.push(vehicle.annual_fuel_cost);
            manufacturer_ids.push(vehicle.manufacturer_id);
        }

        sqlx::query(
            r#"INSERT INTO vehicles (model_name, year, combined_mpg, annual_fuel_cost, manufacturer_id)
               SELECT model_name, year, combined_mpg, annual_fuel_cost, manufacturer_id
               FROM UNNEST($1::text[], $2::int[], $3::numeric[], $4::numeric[], $5::int[])
                 AS t(model_name, year, combined_mpg, annual_fuel_cost, manufacturer_id)"#,
        )
        .bind(&model_names)
        .bind(&years)
        .bind(&mpgs)
        .bind(&costs)
        .bind(&manufacturer_ids)
        .execute(&self.pool)
        .await?;

        log::trace!("flushed {} vehicles", batch.len());
        Ok(())
    }
}
