/// Application configuration module
use std::env;
use std::path::PathBuf;

#[derive(Clone, Debug)]
pub struct AppConfig {
    pub bind_addr: String,
    pub data_dir: PathBuf,
}

impl AppConfig {
    /// Load configuration from environment variables
    pub fn from_env() -> anyhow::Result<Self> {
        dotenvy::dotenv().ok();

        let bind_addr = env::var("BIND_ADDR").unwrap_or_else(|_| "0.0.0.0:5000".to_string());
        let data_dir = env::var("DATA_DIR").unwrap_or_else(|_| "data".to_string());

        Ok(Self {
            bind_addr,
            data_dir: PathBuf::from(data_dir),
        })
    }

    /// Path of the durable report snapshot file.
    pub fn reports_file(&self) -> PathBuf {
        self.data_dir.join("reports.json")
    }
}
