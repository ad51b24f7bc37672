use std::path::PathBuf;
use serde::{Deserialize, Serialize};
use directories::ProjectDirs;
use clap::Parser;
use std::fs;
use tracing::{info, warn};

const DEFAULT_PORT: u16 = 3333;
const DEFAULT_MAX_UPLOAD_BYTES: usize = 5 * 1024 * 1024;

/// Configuration for the Ecoleta server
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Config {
    /// URL for the database connection
    pub database_url: String,
    /// Address the server binds to
    pub host: String,
    /// Port the server listens on
    pub port: u16,
    /// Directory holding uploaded images and catalog icons
    pub uploads_dir: PathBuf,
    /// Externally visible base URL; derived from host and port when unset
    pub public_url: Option<String>,
    /// Largest accepted request body, in bytes
    pub max_upload_bytes: usize,
    /// Directory for the rolling JSON log file; no file logging when unset
    pub log_dir: Option<PathBuf>,
}

/// Update structure for Config with all fields optional
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, Default)]
pub struct ConfigUpdate {
    #[serde(default)]
    pub database_url: Option<String>,
    #[serde(default)]
    pub host: Option<String>,
    #[serde(default)]
    pub port: Option<u16>,
    #[serde(default)]
    pub uploads_dir: Option<PathBuf>,
    #[serde(default)]
    pub public_url: Option<String>,
    #[serde(default)]
    pub max_upload_bytes: Option<usize>,
    #[serde(default)]
    pub log_dir: Option<PathBuf>,
    /// Server URL used by the CLI client; ignored by the server
    #[serde(default)]
    pub server_url: Option<String>,
}

/// Command line arguments for the server
#[derive(Parser, Debug, Default)]
#[clap(name = "ecoleta", about = "Waste-collection point registry")]
pub struct CliArgs {
    /// Database URL
    #[clap(long, env = "DATABASE_URL")]
    pub database_url: Option<String>,

    /// Address to bind to
    #[clap(long, env = "ECOLETA_HOST")]
    pub host: Option<String>,

    /// Port to listen on
    #[clap(long, env = "ECOLETA_PORT")]
    pub port: Option<u16>,

    /// Directory for uploaded images
    #[clap(long, env = "ECOLETA_UPLOADS_DIR")]
    pub uploads_dir: Option<PathBuf>,

    /// Public base URL used to build image URLs
    #[clap(long, env = "ECOLETA_PUBLIC_URL")]
    pub public_url: Option<String>,

    /// Maximum request body size in bytes
    #[clap(long, env = "ECOLETA_MAX_UPLOAD_BYTES")]
    pub max_upload_bytes: Option<usize>,

    /// Directory for log files
    #[clap(long, env = "ECOLETA_LOG_DIR")]
    pub log_dir: Option<PathBuf>,

    /// Debug mode
    #[clap(long, env = "ECOLETA_DEBUG", default_value_t = false)]
    pub debug: bool,

    /// Log to the console as JSON
    #[clap(long, env = "ECOLETA_LOG_JSON", default_value_t = false)]
    pub log_json: bool,
}

impl Config {
    /// Applies a config update to the current configuration
    pub fn apply_update(self, update: ConfigUpdate) -> Self {
        Self {
            database_url: update.database_url.unwrap_or(self.database_url),
            host: update.host.unwrap_or(self.host),
            port: update.port.unwrap_or(self.port),
            uploads_dir: update.uploads_dir.unwrap_or(self.uploads_dir),
            public_url: update.public_url.or(self.public_url),
            max_upload_bytes: update.max_upload_bytes.unwrap_or(self.max_upload_bytes),
            log_dir: update.log_dir.or(self.log_dir),
        }
    }

    /// The base URL clients reach the server at
    pub fn public_url(&self) -> String {
        match &self.public_url {
            Some(url) => url.trim_end_matches('/').to_string(),
            None => format!("http://{}:{}", self.host, self.port),
        }
    }

    /// The `host:port` pair the server binds to
    pub fn listen_addr(&self) -> String {
        format!("{}:{}", self.host, self.port)
    }
}

/// Returns the base (default) configuration
///
/// With a data directory, the database and uploads live inside it;
/// otherwise they are relative to the working directory.
pub fn base_config(data_path: Option<PathBuf>) -> Config {
    let (database_url, uploads_dir) = match data_path {
        Some(path) => (
            path.join("ecoleta.db").to_string_lossy().to_string(),
            path.join("uploads"),
        ),
        None => ("ecoleta.db".to_string(), PathBuf::from("uploads")),
    };

    Config {
        database_url,
        host: "127.0.0.1".to_string(),
        port: DEFAULT_PORT,
        uploads_dir,
        public_url: None,
        max_upload_bytes: DEFAULT_MAX_UPLOAD_BYTES,
        log_dir: None,
    }
}

/// Loads configuration from a TOML file
///
/// A missing path or file yields an empty update.
pub fn config_from_file(config_path: Option<PathBuf>) -> Result<ConfigUpdate, String> {
    let Some(config_path) = config_path else {
        return Ok(ConfigUpdate::default());
    };

    if !config_path.exists() {
        info!("Config file not found at {:?}, using defaults", config_path);
        return Ok(ConfigUpdate::default());
    }

    match fs::read_to_string(&config_path) {
        Ok(content) => match toml::from_str::<ConfigUpdate>(&content) {
            Ok(config) => {
                info!("Loaded configuration from {:?}", config_path);
                Ok(config)
            },
            Err(e) => {
                warn!("Failed to parse config file: {}", e);
                Err(format!("Failed to parse config file: {}", e))
            }
        },
        Err(e) => {
            warn!("Failed to read config file: {}", e);
            Err(format!("Failed to read config file: {}", e))
        }
    }
}

/// Loads configuration from command line arguments
pub fn config_from_args(args: &CliArgs) -> ConfigUpdate {
    ConfigUpdate {
        database_url: args.database_url.clone(),
        host: args.host.clone(),
        port: args.port,
        uploads_dir: args.uploads_dir.clone(),
        public_url: args.public_url.clone(),
        max_upload_bytes: args.max_upload_bytes,
        log_dir: args.log_dir.clone(),
        server_url: None,
    }
}

/// Returns the XDG config directory if it exists
pub fn get_config_dir_path() -> Option<PathBuf> {
    let Some(proj_dirs) = ProjectDirs::from("br", "ecoleta", "ecoleta") else {
        warn!("Could not determine XDG config directory, skipping config file");
        return None;
    };

    let path = proj_dirs.config_dir().to_path_buf();
    if path.exists() {
        Some(path)
    } else {
        info!("Config path not found at {:?}, using defaults", path);
        None
    }
}

/// Gets the complete configuration by combining defaults with
/// values from config file, environment variables, and command line arguments
/// in order of increasing precedence
pub fn get_config(args: &CliArgs) -> Config {
    let config_dir = get_config_dir_path();

    let base = base_config(config_dir.clone());
    let from_file = config_from_file(config_dir.map(|dir| dir.join("config.toml")))
        .unwrap_or_default();

    base
        .apply_update(from_file)
        .apply_update(config_from_args(args))
}

#[cfg(test)]
mod tests;
