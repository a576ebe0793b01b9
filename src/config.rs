//! Platform paths, `config.toml` loading and settings resolution

use std::path::{Path, PathBuf};
use std::time::Duration;

use anyhow::{Context, Result, bail};
use directories::{ProjectDirs, UserDirs};
use serde::Deserialize;

use botlogs_api::ClientConfig;
use botlogs_view::ViewConfig;

const APP_ID: &str = "botlogs";
const CONFIG_FILE_NAME: &str = "config.toml";
const LOG_FILE_NAME: &str = "botlogs.log";

const MAX_PAGE_SIZE: u32 = 500;
const LOG_LEVELS: [&str; 5] = ["error", "warn", "info", "debug", "trace"];

/// Where botlogs keeps its files
#[derive(Debug, Clone)]
pub struct PlatformPaths {
    pub config_dir: PathBuf,
    pub data_dir: PathBuf,
}

impl PlatformPaths {
    /// Platform directories, or the current directory when they cannot be determined
    pub fn resolve() -> Self {
        match ProjectDirs::from("", "", APP_ID) {
            Some(dirs) => Self {
                config_dir: dirs.config_dir().to_path_buf(),
                data_dir: dirs.data_dir().to_path_buf(),
            },
            None => Self {
                config_dir: PathBuf::from("."),
                data_dir: PathBuf::from("."),
            },
        }
    }

    pub fn config_file(&self) -> PathBuf {
        self.config_dir.join(CONFIG_FILE_NAME)
    }
}

/// Raw shape of `config.toml`; every key is optional
#[derive(Debug, Default, Deserialize)]
#[serde(default)]
pub struct FileConfig {
    pub server: ServerSection,
    pub view: ViewSection,
    pub export: ExportSection,
    pub logging: LoggingSection,
}

#[derive(Debug, Default, Deserialize)]
#[serde(default)]
pub struct ServerSection {
    pub base_url: Option<String>,
    pub access_token: Option<String>,
    pub timeout_secs: Option<u64>,
}

#[derive(Debug, Default, Deserialize)]
#[serde(default)]
pub struct ViewSection {
    pub page_size: Option<u32>,
    pub search_debounce_ms: Option<u64>,
    pub notification_secs: Option<u64>,
}

#[derive(Debug, Default, Deserialize)]
#[serde(default)]
pub struct ExportSection {
    pub directory: Option<PathBuf>,
}

#[derive(Debug, Default, Deserialize)]
#[serde(default)]
pub struct LoggingSection {
    /// One of error, warn, info, debug, trace
    pub level: Option<String>,
    pub file: Option<PathBuf>,
}

impl FileConfig {
    /// Read `path`; a missing file yields the defaults
    pub fn load(path: &Path) -> Result<Self> {
        if !path.exists() {
            return Ok(Self::default());
        }
        let content = std::fs::read_to_string(path)
            .with_context(|| format!("failed to read config file {}", path.display()))?;
        Self::parse(&content).with_context(|| format!("invalid config file {}", path.display()))
    }

    pub fn parse(content: &str) -> Result<Self> {
        Ok(toml::from_str(content)?)
    }
}

/// Values given on the command line or through the environment
#[derive(Debug, Default, Clone)]
pub struct Overrides {
    pub url: Option<String>,
    pub token: Option<String>,
    pub export_dir: Option<PathBuf>,
    pub debug: bool,
}

/// Fully resolved settings
#[derive(Debug)]
pub struct Settings {
    pub client: ClientConfig,
    pub view: ViewConfig,
    /// Default filter directive when `RUST_LOG` is unset
    pub log_level: String,
    pub log_file: PathBuf,
}

impl Settings {
    /// Merge overrides over the file over the defaults
    pub fn resolve(overrides: Overrides, file: FileConfig, paths: &PlatformPaths) -> Result<Self> {
        let mut client = ClientConfig::default();
        if let Some(url) = overrides.url.or(file.server.base_url) {
            client.base_url = url;
        }
        client.access_token = overrides.token.or(file.server.access_token);
        if let Some(secs) = file.server.timeout_secs {
            if secs == 0 {
                bail!("[server] timeout_secs must be greater than 0");
            }
            client.timeout = Duration::from_secs(secs);
        }

        let mut view = ViewConfig::default();
        if let Some(size) = file.view.page_size {
            if !(1..=MAX_PAGE_SIZE).contains(&size) {
                bail!("[view] page_size = {size} is out of range (1-{MAX_PAGE_SIZE})");
            }
            view.page_size = size;
        }
        if let Some(ms) = file.view.search_debounce_ms {
            view.search_debounce = Duration::from_millis(ms);
        }
        if let Some(secs) = file.view.notification_secs {
            view.notification_ttl = Duration::from_secs(secs);
        }
        view.export_dir = overrides
            .export_dir
            .or(file.export.directory)
            .unwrap_or_else(default_export_dir);

        let log_level = if overrides.debug {
            "debug".to_string()
        } else {
            match file.logging.level {
                Some(level) if LOG_LEVELS.contains(&level.to_lowercase().as_str()) => {
                    level.to_lowercase()
                }
                Some(level) => bail!(
                    "[logging] level = \"{level}\" is not recognised (expected one of {})",
                    LOG_LEVELS.join(", ")
                ),
                None => "warn".to_string(),
            }
        };
        let log_file = file
            .logging
            .file
            .unwrap_or_else(|| paths.data_dir.join(LOG_FILE_NAME));

        Ok(Self {
            client,
            view,
            log_level,
            log_file,
        })
    }
}

/// The user's download directory, else the current directory
fn default_export_dir() -> PathBuf {
    UserDirs::new()
        .and_then(|dirs| dirs.download_dir().map(Path::to_path_buf))
        .unwrap_or_else(|| PathBuf::from("."))
}
