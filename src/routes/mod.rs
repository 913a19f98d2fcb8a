//! HTTP route handlers grouped by resource domain.
//!
//! Each submodule corresponds to a logical area of the API (manufacturers,
//! vehicles, seeding) and exposes typed Rocket handlers annotated with
//! `#[openapi]` so `rocket_okapi` can derive an OpenAPI document
//! automatically. Authentication handlers live in [`crate::auth::routes`].

pub mod health;
pub mod manufacturers;
pub mod seed;
pub mod vehicles;
