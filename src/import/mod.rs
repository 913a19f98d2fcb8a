//! CSV ingestion and normalization pipeline.
//!
//! This module ingests the flat vehicle dataset into the normalized
//! manufacturer/vehicle tables. The pipeline reads the whole file's lines,
//! resolves column positions once from the header row, then iterates data
//! lines sequentially:
//!
//! 1. **`csv`**: splits each line on commas, honoring double-quoted fields,
//!    and resolves required/optional column names case-insensitively.
//! 2. **`row`**: converts raw fields into a typed [`row::VehicleRow`],
//!    skipping rows that are too short or lack a make/model.
//! 3. **`pipeline`**: resolves manufacturers through a case-folded
//!    name index seeded from storage (persisting new ones immediately so
//!    their generated ids are usable as foreign keys), dedups vehicles
//!    against storage by (model, year, manufacturer), and buffers accepted
//!    rows until a batch-sized flush, plus one final flush.
//! 4. **`store`**: the relational storage contract and its Postgres
//!    implementation.
//!
//! The run is not all-or-nothing: batches committed before a failure stay
//! committed, and re-running skips them via the dedup checks.

pub mod config;
pub mod csv;
pub mod error;
pub mod pipeline;
pub mod row;
pub mod stats;
pub mod store;

pub use config::ImportConfig;
pub use error::ImportError;
pub use pipeline::{import_lines, run_import};
pub use stats::ImportStats;
pub use store::{ImportStore, NewVehicle, PgImportStore};
