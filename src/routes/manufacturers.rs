use rocket::response::status;
use rocket::serde::json::Json;
use rocket::{delete, get, post, put};
use rocket_db_pools::{Connection, sqlx};
use rocket_okapi::openapi;

use crate::auth::AuthUser;
use crate::db::CatalogDb;
use crate::error::ApiError;
use crate::models::{DataResponse, Manufacturer, ManufacturerUpdate, NewManufacturer, Vehicle};

/// Get all manufacturers
#[openapi(tag = "Manufacturers")]
#[get("/manufacturers")]
pub async fn list_manufacturers(
    _user: AuthUser,
    mut db: Connection<CatalogDb>,
) -> Result<Json<DataResponse<Vec<Manufacturer>>>, ApiError> {
    let manufacturers: Vec<Manufacturer> = sqlx::query_as(
        r#"SELECT id, name, code
           FROM manufacturers
           ORDER BY name ASC"#,
    )
    .fetch_all(&mut **db)
    .await?;

    Ok(Json(DataResponse {
        data: manufacturers,
    }))
}

/// Get a specific manufacturer by id
#[openapi(tag = "Manufacturers")]
#[get("/manufacturers/<id>")]
pub async fn get_manufacturer(
    _user: AuthUser,
    id: i32,
    mut db: Connection<CatalogDb>,
) -> Result<Json<Manufacturer>, ApiError> {
    let manufacturer: Manufacturer =
        sqlx::query_as("SELECT id, name, code FROM manufacturers WHERE id = $1")
            .bind(id)
            .fetch_one(&mut **db)
            .await
            .map_err(|_| ApiError::NotFound(format!("Manufacturer {} not found", id)))?;

    Ok(Json(manufacturer))
}

/// Get the vehicles owned by a manufacturer
#[openapi(tag = "Manufacturers")]
#[get("/manufacturers/<id>/vehicles")]
pub async fn get_manufacturer_vehicles(
    _user: AuthUser,
    id: i32,
    mut db: Connection<CatalogDb>,
) -> Result<Json<DataResponse<Vec<Vehicle>>>, ApiError> {
    let exists: bool = sqlx::query_scalar("SELECT EXISTS(SELECT 1 FROM manufacturers WHERE id = $1)")
        .bind(id)
        .fetch_one(&mut **db)
        .await?;

    if !exists {
        return Err(ApiError::NotFound(format!("Manufacturer {} not found", id)));
    }

    let vehicles: Vec<Vehicle> = sqlx::query_as(
        r#"SELECT id, model_name, year, combined_mpg, annual_fuel_cost, manufacturer_id
           FROM vehicles
           WHERE manufacturer_id = $1
           ORDER BY model_name ASC, year ASC"#,
    )
    .bind(id)
    .fetch_all(&mut **db)
    .await?;

    Ok(Json(DataResponse { data: vehicles }))
}

/// Create a manufacturer
#[openapi(tag = "Manufacturers")]
#[post("/manufacturers", data = "<request>")]
pub async fn create_manufacturer(
    _user: AuthUser,
    request: Json<NewManufacturer>,
    mut db: Connection<CatalogDb>,
) -> Result<status::Created<Json<Manufacturer>>, ApiError> {
    let name = request.name.trim();
    if name.is_empty() {
        return Err(ApiError::BadRequest("Manufacturer name is required".into()));
    }

    let manufacturer: Manufacturer = sqlx::query_as(
        r#"INSERT INTO manufacturers (name, code)
           VALUES ($1, $2)
           RETURNING id, name, code"#,
    )
    .bind(name)
    .bind(request.code.as_deref())
    .fetch_one(&mut **db)
    .await?;

    let location = format!("/api/manufacturers/{}", manufacturer.id);
    Ok(status::Created::new(location).body(Json(manufacturer)))
}

/// Update a manufacturer
#[openapi(tag = "Manufacturers")]
#[put("/manufacturers/<id>", data = "<request>")]
pub async fn update_manufacturer(
    _user: AuthUser,
    id: i32,
    request: Json<ManufacturerUpdate>,
    mut db: Connection<CatalogDb>,
) -> Result<status::NoContent, ApiError> {
    if id != request.id {
        return Err(ApiError::BadRequest(
            "Path id does not match payload id".into(),
        ));
    }

    let result = sqlx::query("UPDATE manufacturers SET name = $1, code = $2 WHERE id = $3")
        .bind(request.name.trim())
        .bind(request.code.as_deref())
        .bind(id)
        .execute(&mut **db)
        .await?;

    if result.rows_affected() == 0 {
        return Err(ApiError::NotFound(format!("Manufacturer {} not found", id)));
    }

    Ok(status::NoContent)
}

/// Delete a manufacturer
///
/// Deletion is blocked while the manufacturer still owns any vehicle.
#[openapi(tag = "Manufacturers")]
#[delete("/manufacturers/<id>")]
pub async fn delete_manufacturer(
    _user: AuthUser,
    id: i32,
    mut db: Connection<CatalogDb>,
) -> Result<status::NoContent, ApiError> {
    let exists: bool = sqlx::query_scalar("SELECT EXISTS(SELECT 1 FROM manufacturers WHERE id = $1)")
        .bind(id)
        .fetch_one(&mut **db)
        .await?;

    if !exists {
        return Err(ApiError::NotFound(format!("Manufacturer {} not found", id)));
    }

    let has_vehicles: bool =
        sqlx::query_scalar("SELECT EXISTS(SELECT 1 FROM vehicles WHERE manufacturer_id = $1)")
            .bind(id)
            .fetch_one(&mut **db)
            .await?;

    if has_vehicles {
        return Err(ApiError::BadRequest(
            "Cannot delete manufacturer with associated vehicles. Delete the vehicles first.".into(),
        ));
    }

    sqlx::query("DELETE FROM manufacturers WHERE id = $1")
        .bind(id)
        .execute(&mut **db)
        .await?;

    Ok(status::NoContent)
}
