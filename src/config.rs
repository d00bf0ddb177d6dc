use std::path::PathBuf;

use serde::Deserialize;

/// Settings read from the environment (and `.env`) at startup.
#[derive(Debug, Deserialize)]
pub struct AppConfig {
    pub database_url: String,
    #[serde(default = "default_listen_addr")]
    pub listen_addr: String,
    #[serde(default = "default_upload_dir")]
    pub upload_dir: PathBuf,
    #[serde(default = "default_max_upload_bytes")]
    pub max_upload_bytes: u64,
}

fn default_listen_addr() -> String {
    "0.0.0.0:5000".to_string()
}

fn default_upload_dir() -> PathBuf {
    PathBuf::from("uploads")
}

fn default_max_upload_bytes() -> u64 {
    5 * 1024 * 1024
}

impl AppConfig {
    pub fn from_env() -> Result<AppConfig, envy::Error> {
        envy::from_env::<AppConfig>()
    }
}
