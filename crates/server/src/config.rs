//! Application configuration loaded from environment variables.
//!
//! Loaded once at startup and injected into the components that need it;
//! nothing reads the environment after construction.

use std::path::PathBuf;

use predictor::PredictorConfig;

/// Default allow-list for uploaded image extensions
pub const DEFAULT_ALLOWED_EXTENSIONS: [&str; 3] = [".jpg", ".jpeg", ".png"];

/// Runtime configuration for the estimation service.
///
/// Recognized environment variables (all optional, `.env` honored):
/// - `PORT`: listen port (default `8080`)
/// - `UPLOAD_DIR`: artifact root directory (default `./uploads`)
/// - `DATA_DIR`: document store root directory (default `./data`)
/// - `MAX_FILE_SIZE_MB`: per-image upload limit (default `10`)
/// - `PREDICTOR_URL`: base URL of the prediction service; unset selects
///   the deterministic fallback
/// - `FALLBACK_MODE`: `true` forces fallback even with an endpoint set
/// - `PREDICTOR_RETRIES`: retries after the initial attempt (default `2`)
#[derive(Debug, Clone)]
pub struct AppConfig {
    pub bind_addr: String,
    pub upload_dir: PathBuf,
    pub data_dir: PathBuf,
    pub max_file_bytes: usize,
    pub allowed_extensions: Vec<String>,
    pub predictor: PredictorConfig,
}

impl AppConfig {
    /// Load configuration from the environment, falling back to defaults.
    pub fn from_env() -> Self {
        dotenvy::dotenv().ok();

        let port = std::env::var("PORT").unwrap_or_else(|_| "8080".to_string());

        let upload_dir = std::env::var("UPLOAD_DIR")
            .map(PathBuf::from)
            .unwrap_or_else(|_| PathBuf::from("./uploads"));

        let data_dir = std::env::var("DATA_DIR")
            .map(PathBuf::from)
            .unwrap_or_else(|_| PathBuf::from("./data"));

        let max_file_mb: usize = std::env::var("MAX_FILE_SIZE_MB")
            .ok()
            .and_then(|v| v.parse().ok())
            .filter(|mb| *mb > 0)
            .unwrap_or(10);

        let base_url = std::env::var("PREDICTOR_URL")
            .ok()
            .filter(|url| !url.trim().is_empty());
        let force_fallback = std::env::var("FALLBACK_MODE")
            .map(|v| v.eq_ignore_ascii_case("true"))
            .unwrap_or(false);
        let max_retries = std::env::var("PREDICTOR_RETRIES")
            .ok()
            .and_then(|v| v.parse().ok())
            .unwrap_or(predictor::DEFAULT_MAX_RETRIES);

        Self {
            bind_addr: format!("0.0.0.0:{port}"),
            upload_dir,
            data_dir,
            max_file_bytes: max_file_mb * 1024 * 1024,
            allowed_extensions: DEFAULT_ALLOWED_EXTENSIONS
                .iter()
                .map(|ext| ext.to_string())
                .collect(),
            predictor: PredictorConfig {
                base_url,
                force_fallback,
                max_retries,
                ..PredictorConfig::default()
            },
        }
    }
}
