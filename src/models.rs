use rocket_db_pools::sqlx::FromRow;
use rocket_okapi::okapi::schemars::JsonSchema;
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

// ===== Catalog Models =====

#[derive(Debug, Clone, Serialize, Deserialize, JsonSchema, FromRow)]
pub struct Manufacturer {
    pub id: i32,
    pub name: String,
    pub code: Option<String>,
}

#[derive(Debug, Clone, Serialize, Deserialize, JsonSchema, FromRow)]
pub struct Vehicle {
    pub id: i32,
    pub model_name: String,
    pub year: i32,
    pub combined_mpg: Option<Decimal>,
    pub annual_fuel_cost: Option<Decimal>,
    pub manufacturer_id: i32,
}

// ===== Request Payloads =====

#[derive(Debug, Clone, Deserialize, JsonSchema)]
pub struct NewManufacturer {
    pub name: String,
    pub code: Option<String>,
}

#[derive(Debug, Clone, Deserialize, JsonSchema)]
pub struct ManufacturerUpdate {
    pub id: i32,
    pub name: String,
    pub code: Option<String>,
}

#[derive(Debug, Clone, Deserialize, JsonSchema)]
pub struct NewVehicleRequest {
    pub model_name: String,
    pub year: i32,
    pub combined_mpg: Option<Decimal>,
    pub annual_fuel_cost: Option<Decimal>,
    pub manufacturer_id: i32,
}

#[derive(Debug, Clone, Deserialize, JsonSchema)]
pub struct VehicleUpdate {
    pub id: i32,
    pub model_name: String,
    pub year: i32,
    pub combined_mpg: Option<Decimal>,
    pub annual_fuel_cost: Option<Decimal>,
    pub manufacturer_id: i32,
}

// ===== Generic Response Wrappers =====

#[derive(Debug, Clone, Serialize, Deserialize, JsonSchema)]
pub struct DataResponse<T> {
    pub data: T,
}
