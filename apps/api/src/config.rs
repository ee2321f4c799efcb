use std::path::PathBuf;

use anyhow::{Context, Result};

/// Application configuration loaded from environment variables.
#[derive(Debug, Clone)]
pub struct Config {
    pub port: u16,
    pub rust_log: String,
    /// Holds `applications.json` and the `uploads/` tree.
    pub storage_root: PathBuf,
    /// Serves `index.html`, `qr.html` and their assets.
    pub static_dir: PathBuf,
}

impl Config {
    pub fn from_env() -> Result<Self> {
        dotenvy::dotenv().ok(); // load .env if present; ignore if missing

        Ok(Config {
            port: std::env::var("PORT")
                .unwrap_or_else(|_| "3000".to_string())
                .parse::<u16>()
                .context("PORT must be a valid port number")?,
            rust_log: std::env::var("RUST_LOG").unwrap_or_else(|_| "info".to_string()),
            storage_root: storage_root(),
            static_dir: std::env::var("STATIC_DIR")
                .map(PathBuf::from)
                .unwrap_or_else(|_| PathBuf::from("static")),
        })
    }
}

/// `STORAGE_ROOT` wins, then the hosting platform's volume mount, then the
/// working directory.
fn storage_root() -> PathBuf {
    ["STORAGE_ROOT", "RAILWAY_VOLUME_MOUNT_PATH"]
        .iter()
        .find_map(|key| std::env::var(key).ok().filter(|v| !v.trim().is_empty()))
        .map(PathBuf::from)
        .unwrap_or_else(|| PathBuf::from("."))
}
