use rocket::response::status;
use rocket::serde::json::Json;
use rocket::{delete, get, post, put};
use rocket_db_pools::{Connection, sqlx};
use rocket_okapi::openapi;

use crate::auth::AuthUser;
use crate::db::CatalogDb;
use crate::error::ApiError;
use crate::models::{DataResponse, NewVehicleRequest, Vehicle, VehicleUpdate};

/// Get all vehicles
#[openapi(tag = "Vehicles")]
#[get("/vehicles")]
pub async fn list_vehicles(
    _user: AuthUser,
    mut db: Connection<CatalogDb>,
) -> Result<Json<DataResponse<Vec<Vehicle>>>, ApiError> {
    let vehicles: Vec<Vehicle> = sqlx::query_as(
        r#"SELECT id, model_name, year, combined_mpg, annual_fuel_cost, manufacturer_id
           FROM vehicles
           ORDER BY model_name ASC, year ASC"#,
    )
    .fetch_all(&mut **db)
    .await?;

    Ok(Json(DataResponse { data: vehicles }))
}

/// Get a specific vehicle by id
#[openapi(tag = "Vehicles")]
#[get("/vehicles/<id>")]
pub async fn get_vehicle(
    _user: AuthUser,
    id: i32,
    mut db: Connection<CatalogDb>,
) -> Result<Json<Vehicle>, ApiError> {
    let vehicle: Vehicle = sqlx::query_as(
        r#"SELECT id, model_name, year, combined_mpg, annual_fuel_cost, manufacturer_id
           FROM vehicles WHERE id = $1"#,
    )
    .bind(id)
    .fetch_one(&mut **db)
    .await
    .map_err(|_| ApiError::NotFound(format!("Vehicle {} not found", id)))?;

    Ok(Json(vehicle))
}

/// Create a vehicle
///
/// The referenced manufacturer must already exist.
#[openapi(tag = "Vehicles")]
#[post("/vehicles", data = "<request>")]
pub async fn create_vehicle(
    _user: AuthUser,
    request: Json<NewVehicleRequest>,
    mut db: Connection<CatalogDb>,
) -> Result<status::Created<Json<Vehicle>>, ApiError> {
    let model_name = request.model_name.trim();
    if model_name.is_empty() {
        return Err(ApiError::BadRequest("Vehicle model name is required".into()));
    }

    ensure_manufacturer_exists(request.manufacturer_id, &mut db).await?;

    let vehicle: Vehicle = sqlx::query_as(
        r#"INSERT INTO vehicles (model_name, year, combined_mpg, annual_fuel_cost, manufacturer_id)
           VALUES ($1, $2, $3, $4, $5)
           RETURNING id, model_name, year, combined_mpg, annual_fuel_cost, manufacturer_id"#,
    )
    .bind(model_name)
    .bind(request.year)
    .bind(request.combined_mpg)
    .bind(request.annual_fuel_cost)
    .bind(request.manufacturer_id)
    .fetch_one(&mut **db)
    .await?;

    let location = format!("/api/vehicles/{}", vehicle.id);
    Ok(status::Created::new(location).body(Json(vehicle)))
}

/// Update a vehicle
#[openapi(tag = "Vehicles")]
#[put("/vehicles/<id>", data = "<request>")]
pub async fn update_vehicle(
    _user: AuthUser,
    id: i32,
    request: Json<VehicleUpdate>,
    mut db: Connection<CatalogDb>,
) -> Result<status::NoContent, ApiError> {
    if id != request.id {
        return Err(ApiError::BadRequest(
            "Path id does not match payload id".into(),
        ));
    }

    ensure_manufacturer_exists(request.manufacturer_id, &mut db).await?;

    let result = sqlx::query(
        r#"UPDATE vehicles
           SET model_name = $1, year = $2, combined_mpg = $3, annual_fuel_cost = $4, manufacturer_id = $5
           WHERE id = $6"#,
    )
    .bind(request.model_name.trim())
    .bind(request.year)
    .bind(request.combined_mpg)
    .bind(request.annual_fuel_cost)
    .bind(request.manufacturer_id)
    .bind(id)
    .execute(&mut **db)
    .await?;

    if result.rows_affected() == 0 {
        return Err(ApiError::NotFound(format!("Vehicle {} not found", id)));
    }

    Ok(status::NoContent)
}

/// Delete a vehicle
#[openapi(tag = "Vehicles")]
#[delete("/vehicles/<id>")]
pub async fn delete_vehicle(
    _user: AuthUser,
    id: i32,
    mut db: Connection<CatalogDb>,
) -> Result<status::NoContent, ApiError> {
    let result = sqlx::query("DELETE FROM vehicles WHERE id = $1")
        .bind(id)
        .execute(&mut **db)
        .await?;

    if result.rows_affected() == 0 {
        return Err(ApiError::NotFound(format!("Vehicle {} not found", id)));
    }

    Ok(status::NoContent)
}

async fn ensure_manufacturer_exists(
    manufacturer_id: i32,
    db: &mut Connection<CatalogDb>,
) -> Result<(), ApiError> {
    let exists: bool = sqlx::query_scalar("SELECT EXISTS(SELECT 1 FROM manufacturers WHERE id = $1)")
        .bind(manufacturer_id)
        .fetch_one(db.as_mut())
        .await?;

    if exists {
        Ok(())
    } else {
        Err(ApiError::BadRequest(format!(
            "Manufacturer {} does not exist",
            manufacturer_id
        )))
    }
}
