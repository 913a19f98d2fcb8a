use std::path::PathBuf;

/// Number of accepted vehicles buffered before a flush when the environment
/// does not override it.
pub const DEFAULT_BATCH_SIZE: usize = 100;

/// Import pipeline configuration loaded from environment variables.
#[derive(Debug, Clone)]
pub struct ImportConfig {
    pub csv_path: PathBuf,
    pub batch_size: usize,
}

impl ImportConfig {
    pub fn from_env() -> Self {
        let csv_path = std::env::var("VEHICLE_API_CSV_PATH")
            .map(PathBuf::from)
            .unwrap_or_else(|_| PathBuf::from("data/VehicleData.csv"));
        let batch_size = std::env::var("VEHICLE_API_IMPORT_BATCH_SIZE")
            .ok()
            .and_then(|v| v.parse::<usize>().ok())
            .filter(|&n| n > 0)
            .unwrap_or(DEFAULT_BATCH_SIZE);

        Self { csv_path, batch_size }
    }

    pub fn with_path(csv_path: impl Into<PathBuf>) -> Self {
        Self {
            csv_path: csv_path.into(),
            batch_size: DEFAULT_BATCH_SIZE,
        }
    }
}
