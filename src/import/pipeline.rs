//! Sequential import pipeline: split, normalize, resolve, dedup, commit.
//!
//! Lines are processed strictly in file order. The manufacturer index must
//! be updated (and the new record persisted, so its generated id exists)
//! before any later row can reference it, and flush ordering must match
//! insertion order, so no row-level parallelism is attempted.
//!
//! Concurrent imports against the same backing store are not coordinated:
//! two runs that both miss the in-memory index can each create a
//! manufacturer of the same name. Accepted limitation.

use std::collections::HashMap;

use crate::import::config::ImportConfig;
use crate::import::csv::{HeaderIndexes, split_csv_line};
use crate::import::error::ImportError;
use crate::import::row::normalize_row;
use crate::import::stats::ImportStats;
use crate::import::store::{ImportStore, NewVehicle};

/// Run the full import: read the configured CSV file and feed its lines
/// through [`import_lines`].
pub async fn run_import<S: ImportStore>(
    store: &mut S,
    config: &ImportConfig,
) -> Result<ImportStats, ImportError> {
    if !config.csv_path.exists() {
        return Err(ImportError::SourceMissing(config.csv_path.clone()));
    }

    log::info!("starting import from {}", config.csv_path.display());

    let text = std::fs::read_to_string(&config.csv_path)?;
    let lines: Vec<&str> = text.lines().collect();

    import_lines(store, &lines, config.batch_size).await
}

/// Import pre-read CSV lines (header first) into storage.
///
/// Re-running over an unchanged file is idempotent: manufacturers are found
/// in the index seeded from storage and vehicles are skipped by the
/// (model, year, manufacturer) existence check. A flush failure aborts the
/// remainder of the run; batches committed earlier stay committed, and a
/// re-run completes the rest without duplicating them.
pub async fn import_lines<S: ImportStore>(
    store: &mut S,
    lines: &[&str],
    batch_size: usize,
) -> Result<ImportStats, ImportError> {
    let headers = split_csv_line(lines.first().copied().unwrap_or(""));
    let indexes = HeaderIndexes::resolve(&headers)?;

    // Index of every manufacturer currently in storage, keyed by
    // case-folded name. First-seen spelling and code win.
    let mut manufacturer_ids: HashMap<String, i32> = HashMap::new();
    for manufacturer in store.list_manufacturers().await? {
        manufacturer_ids
            .entry(manufacturer.name.to_lowercase())
            .or_insert(manufacturer.id);
    }

    let mut stats = ImportStats::default();
    let mut pending: Vec<NewVehicle> = Vec::new();

    for line in lines.iter().skip(1) {
        let fields = split_csv_line(line);
        let Some(row) = normalize_row(&fields, &indexes) else {
            continue;
        };

        let key = row.make.to_lowercase();
        let manufacturer_id = match manufacturer_ids.get(&key) {
            Some(&id) => id,
            None => {
                // Persist before continuing: the generated id is the foreign
                // key for this row's vehicle and any later ones.
                let id = store
                    .create_manufacturer(&row.make, row.mfr_code.as_deref())
                    .await?;
                manufacturer_ids.insert(key, id);
                stats.manufacturers_added += 1;
                id
            }
        };

        if store
            .vehicle_exists(&row.model, row.year, manufacturer_id)
            .await?
        {
            continue;
        }

        pending.push(NewVehicle {
            model_name: row.model,
            year: row.year,
            combined_mpg: row.combined_mpg,
            annual_fuel_cost: row.annual_fuel_cost,
            manufacturer_id,
        });
        stats.vehicles_added += 1;

        if pending.len() == batch_size {
            store.flush_vehicles(&pending).await?;
            pending.clear();
        }
    }

    if !pending.is_empty() {
        store.flush_vehicles(&pending).await?;
    }

    log::info!(
        "import complete: {} manufacturers, {} vehicles added",
        stats.manufacturers_added,
        stats.vehicles_added
    );

    Ok(stats)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::Manufacturer;
    use async_trait::async_trait;
    use rocket_db_pools::sqlx;

    /// In-memory store mirroring the contract of [`PgImportStore`], with an
    /// optional injected failure on the nth flush call.
    #[derive(Default)]
    struct MemoryStore {
        manufacturers: Vec<Manufacturer>,
        vehicles: Vec<NewVehicle>,
        flush_calls: usize,
        fail_on_flush: Option<usize>,
        next_id: i32,
    }

    impl MemoryStore {
        fn new() -> Self {
            Self {
                next_id: 1,
                ..Self::default()
            }
        }
    }

    #[async_trait]
    impl ImportStore for MemoryStore {
        async fn list_manufacturers(&mut self) -> Result<Vec<Manufacturer>, sqlx::Error> {
            Ok(self.manufacturers.clone())
        }

        async fn create_manufacturer(
            &mut self,
            name: &str,
            code: Option<&str>,
        ) -> Result<i32, sqlx::Error> {
            let id = self.next_id;
            self.next_id += 1;
            self.manufacturers.push(Manufacturer {
                id,
                name: name.to_string(),
                code: code.map(|c| c.to_string()),
            });
            Ok(id)
        }

        async fn vehicle_exists(
            &mut self,
            model_name: &str,
            year: i32,
            manufacturer_id: i32,
        ) -> Result<bool, sqlx::Error> {
            Ok(self.vehicles.iter().any(|v| {
                v.model_name == model_name && v.year == year && v.manufacturer_id == manufacturer_id
            }))
        }

        async fn flush_vehicles(&mut self, batch: &[NewVehicle]) -> Result<(), sqlx::Error> {
            self.flush_calls += 1;
            if self.fail_on_flush == Some(self.flush_calls) {
                return Err(sqlx::Error::PoolClosed);
            }
            self.vehicles.extend_from_slice(batch);
            Ok(())
        }
    }

    const HEADER: &str =
        "Make,Model,Year,Combined Mpg For Fuel Type1,Annual Fuel Cost For Fuel Type1,MFR Code";

    fn file_with_rows(rows: &[String]) -> Vec<String> {
        let mut lines = vec![HEADER.to_string()];
        lines.extend_from_slice(rows);
        lines
    }

    async fn import(store: &mut MemoryStore, lines: &[String], batch_size: usize) -> ImportStats {
        let refs: Vec<&str> = lines.iter().map(String::as_str).collect();
        import_lines(store, &refs, batch_size)
            .await
            .expect("import succeeds")
    }

    #[tokio::test]
    async fn imports_rows_grouped_by_manufacturer() {
        let mut store = MemoryStore::new();
        let lines = file_with_rows(&[
            "Toyota,Corolla,2021,33.5,1650,TYT".to_string(),
            "Toyota,Camry,2022,32,1700,TYT".to_string(),
            "Honda,Civic,2021,36,1500,HND".to_string(),
        ]);

        let stats = import(&mut store, &lines, 100).await;

        assert_eq!(stats.manufacturers_added, 2);
        assert_eq!(stats.vehicles_added, 3);
        assert_eq!(store.manufacturers[0].name, "Toyota");
        assert_eq!(store.manufacturers[0].code.as_deref(), Some("TYT"));
        assert_eq!(store.flush_calls, 1);
    }

    #[tokio::test]
    async fn reimport_of_unchanged_file_adds_nothing() {
        let mut store = MemoryStore::new();
        let lines = file_with_rows(&[
            "Toyota,Corolla,2021,33.5,1650,TYT".to_string(),
            "Honda,Civic,2021,36,1500,HND".to_string(),
        ]);

        import(&mut store, &lines, 100).await;
        let second = import(&mut store, &lines, 100).await;

        assert_eq!(second, ImportStats::default());
        assert_eq!(store.manufacturers.len(), 2);
        assert_eq!(store.vehicles.len(), 2);
    }

    #[tokio::test]
    async fn manufacturer_spellings_collapse_case_insensitively() {
        let mut store = MemoryStore::new();
        let lines = file_with_rows(&[
            "Toyota,Corolla,2021,,,TYT".to_string(),
            "TOYOTA,Camry,2022,,,T2".to_string(),
        ]);

        let stats = import(&mut store, &lines, 100).await;

        assert_eq!(stats.manufacturers_added, 1);
        assert_eq!(stats.vehicles_added, 2);
        // First-seen spelling and code win; both vehicles share its id.
        assert_eq!(store.manufacturers.len(), 1);
        assert_eq!(store.manufacturers[0].name, "Toyota");
        assert_eq!(store.manufacturers[0].code.as_deref(), Some("TYT"));
        assert!(store.vehicles.iter().all(|v| v.manufacturer_id == 1));
    }

    #[tokio::test]
    async fn skipped_rows_touch_neither_counter() {
        let mut store = MemoryStore::new();
        let lines = file_with_rows(&[
            ",Corolla,2021,,,".to_string(),
            "Toyota,,2021,,,".to_string(),
            "short".to_string(),
            "Toyota,Camry,2022,,,".to_string(),
        ]);

        let stats = import(&mut store, &lines, 100).await;

        assert_eq!(stats.manufacturers_added, 1);
        assert_eq!(stats.vehicles_added, 1);
    }

    #[tokio::test]
    async fn flushes_every_batch_and_once_for_the_remainder() {
        let mut store = MemoryStore::new();
        let rows: Vec<String> = (0..250)
            .map(|i| format!("Make{},Model{},2021,,,", i % 3, i))
            .collect();
        let lines = file_with_rows(&rows);

        let stats = import(&mut store, &lines, 100).await;

        assert_eq!(stats.manufacturers_added, 3);
        assert_eq!(stats.vehicles_added, 250);
        assert_eq!(store.flush_calls, 3);
        assert_eq!(store.vehicles.len(), 250);
    }

    #[tokio::test]
    async fn empty_data_section_performs_no_flush() {
        let mut store = MemoryStore::new();
        let lines = file_with_rows(&[]);

        let stats = import(&mut store, &lines, 100).await;

        assert_eq!(stats, ImportStats::default());
        assert_eq!(store.flush_calls, 0);
    }

    #[tokio::test]
    async fn existing_manufacturers_seed_the_index() {
        let mut store = MemoryStore::new();
        store
            .create_manufacturer("Toyota", Some("TYT"))
            .await
            .unwrap();
        let lines = file_with_rows(&["toyota,Corolla,2021,,,".to_string()]);

        let stats = import(&mut store, &lines, 100).await;

        assert_eq!(stats.manufacturers_added, 0);
        assert_eq!(stats.vehicles_added, 1);
        assert_eq!(store.vehicles[0].manufacturer_id, 1);
    }

    #[tokio::test]
    async fn missing_required_column_fails_before_any_row() {
        let mut store = MemoryStore::new();
        let lines = vec!["Model,Year".to_string(), "Corolla,2021".to_string()];
        let refs: Vec<&str> = lines.iter().map(String::as_str).collect();

        let err = import_lines(&mut store, &refs, 100).await.unwrap_err();

        assert!(matches!(err, ImportError::MissingColumns(_)));
        assert_eq!(store.flush_calls, 0);
        assert!(store.manufacturers.is_empty());
    }

    #[tokio::test]
    async fn flush_failure_keeps_prior_batches_and_resumes_on_rerun() {
        let mut store = MemoryStore::new();
        store.fail_on_flush = Some(2);
        let rows: Vec<String> = (0..150).map(|i| format!("Acme,Model{},2021,,,", i)).collect();
        let lines = file_with_rows(&rows);
        let refs: Vec<&str> = lines.iter().map(String::as_str).collect();

        let err = import_lines(&mut store, &refs, 100).await.unwrap_err();
        assert!(matches!(err, ImportError::Storage(_)));
        // First 100 stay durably stored; the failed batch does not.
        assert_eq!(store.vehicles.len(), 100);

        store.fail_on_flush = None;
        let stats = import(&mut store, &lines, 100).await;

        assert_eq!(stats.manufacturers_added, 0);
        assert_eq!(stats.vehicles_added, 50);
        assert_eq!(store.vehicles.len(), 150);
    }

    #[tokio::test]
    async fn missing_source_file_fails_without_touching_storage() {
        let mut store = MemoryStore::new();
        let config = ImportConfig::with_path("/nonexistent/VehicleData.csv");

        let err = run_import(&mut store, &config).await.unwrap_err();

        assert!(matches!(err, ImportError::SourceMissing(_)));
        assert_eq!(store.flush_calls, 0);
    }

    #[tokio::test]
    async fn reads_rows_from_a_file_on_disk() {
        let dir = tempfile::tempdir().expect("tempdir");
        let path = dir.path().join("VehicleData.csv");
        std::fs::write(
            &path,
            format!("{HEADER}\nToyota,\"Corolla, LE\",2021,33.5,1650,TYT\n"),
        )
        .expect("write csv");

        let mut store = MemoryStore::new();
        let config = ImportConfig::with_path(&path);
        let stats = run_import(&mut store, &config).await.expect("import succeeds");

        assert_eq!(stats.manufacturers_added, 1);
        assert_eq!(stats.vehicles_added, 1);
        assert_eq!(store.vehicles[0].model_name, "Corolla, LE");
    }
}
