//! Configuration module
//!
//! Service configuration is read from the environment (optionally seeded from a
//! `.env` file). Every setting has a default so the service starts with no
//! environment at all.

use std::env;
use std::path::PathBuf;
use std::time::Duration;

const PORT: u16 = 5000;
const MAX_UPLOAD_SIZE_MB: usize = 50;
const SWEEP_INTERVAL_SECS: u64 = 30;
const FILE_TTL_SECS: u64 = 60;
const DEFAULT_ALLOWED_EXTENSIONS: &str = "jpg,jpeg,png,heif,heic,webp";

/// Log output format for the tracing subscriber
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum LogFormat {
    #[default]
    Pretty,
    Json,
}

impl LogFormat {
    pub fn parse(s: &str) -> Self {
        match s.trim().to_lowercase().as_str() {
            "json" => LogFormat::Json,
            _ => LogFormat::Pretty,
        }
    }
}

/// Application configuration
#[derive(Clone, Debug)]
pub struct Config {
    pub server_port: u16,
    pub environment: String,
    pub cors_origins: Vec<String>,
    /// Fixed workspace directory. `None` means a fresh temporary directory per process.
    pub workspace_dir: Option<PathBuf>,
    pub max_upload_size_bytes: usize,
    pub allowed_extensions: Vec<String>,
    pub heif_convert_path: String,
    pub sweep_interval_secs: u64,
    pub file_ttl_secs: u64,
    /// Only the client that compressed a file may download it
    pub download_ip_check: bool,
    pub log_format: LogFormat,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            server_port: PORT,
            environment: "development".to_string(),
            cors_origins: vec!["*".to_string()],
            workspace_dir: None,
            max_upload_size_bytes: MAX_UPLOAD_SIZE_MB * 1024 * 1024,
            allowed_extensions: parse_list(DEFAULT_ALLOWED_EXTENSIONS),
            heif_convert_path: "heif-convert".to_string(),
            sweep_interval_secs: SWEEP_INTERVAL_SECS,
            file_ttl_secs: FILE_TTL_SECS,
            download_ip_check: true,
            log_format: LogFormat::Pretty,
        }
    }
}

impl Config {
    pub fn from_env() -> Result<Self, anyhow::Error> {
        dotenvy::dotenv().ok();

        let environment = env::var("ENVIRONMENT")
            .or_else(|_| env::var("APP_ENV"))
            .unwrap_or_else(|_| "development".to_string());

        let cors_origins_str = env::var("CORS_ORIGINS").unwrap_or_else(|_| "*".to_string());

        let max_upload_size_mb = env::var("MAX_UPLOAD_SIZE_MB")
            .unwrap_or_else(|_| MAX_UPLOAD_SIZE_MB.to_string())
            .parse::<usize>()
            .unwrap_or(MAX_UPLOAD_SIZE_MB);

        let config = Config {
            server_port: env::var("PORT")
                .unwrap_or_else(|_| PORT.to_string())
                .parse()
                .map_err(|_| anyhow::anyhow!("PORT must be a valid number"))?,
            environment,
            cors_origins: cors_origins_str
                .split(',')
                .map(|s| s.trim().to_string())
                .filter(|s| !s.is_empty())
                .collect(),
            workspace_dir: env::var("WORKSPACE_DIR")
                .ok()
                .filter(|s| !s.trim().is_empty())
                .map(PathBuf::from),
            max_upload_size_bytes: max_upload_size_mb * 1024 * 1024,
            allowed_extensions: parse_list(
                &env::var("ALLOWED_EXTENSIONS")
                    .unwrap_or_else(|_| DEFAULT_ALLOWED_EXTENSIONS.to_string()),
            ),
            heif_convert_path: env::var("HEIF_CONVERT_PATH")
                .unwrap_or_else(|_| "heif-convert".to_string()),
            sweep_interval_secs: env::var("SWEEP_INTERVAL_SECS")
                .unwrap_or_else(|_| SWEEP_INTERVAL_SECS.to_string())
                .parse()
                .unwrap_or(SWEEP_INTERVAL_SECS),
            file_ttl_secs: env::var("FILE_TTL_SECS")
                .unwrap_or_else(|_| FILE_TTL_SECS.to_string())
                .parse()
                .unwrap_or(FILE_TTL_SECS),
            download_ip_check: env::var("DOWNLOAD_IP_CHECK")
                .unwrap_or_else(|_| "true".to_string())
                .to_lowercase()
                .parse()
                .unwrap_or(true),
            log_format: LogFormat::parse(
                &env::var("LOG_FORMAT").unwrap_or_else(|_| "pretty".to_string()),
            ),
        };

        config.validate()?;
        Ok(config)
    }

    pub fn validate(&self) -> Result<(), anyhow::Error> {
        if self.is_production() && self.cors_origins.iter().any(|o| o == "*") {
            return Err(anyhow::anyhow!(
                "CORS_ORIGINS cannot be '*' in production. Please specify explicit origins."
            ));
        }
        if self.max_upload_size_bytes == 0 {
            return Err(anyhow::anyhow!("MAX_UPLOAD_SIZE_MB must be greater than 0"));
        }
        if self.allowed_extensions.is_empty() {
            return Err(anyhow::anyhow!("ALLOWED_EXTENSIONS must not be empty"));
        }
        if self.sweep_interval_secs == 0 {
            return Err(anyhow::anyhow!("SWEEP_INTERVAL_SECS must be greater than 0"));
        }
        Ok(())
    }

    /// Check if the application is running in production mode
    pub fn is_production(&self) -> bool {
        let env = self.environment.to_lowercase();
        env == "production" || env == "prod"
    }

    pub fn sweep_interval(&self) -> Duration {
        Duration::from_secs(self.sweep_interval_secs)
    }

    pub fn file_ttl(&self) -> Duration {
        Duration::from_secs(self.file_ttl_secs)
    }
}

fn parse_list(value: &str) -> Vec<String> {
    value
        .split(',')
        .map(|s| s.trim().to_lowercase())
        .filter(|s| !s.is_empty())
        .collect()
}
