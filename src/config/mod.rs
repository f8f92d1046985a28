use anyhow::{Context, Result};
use serde::Deserialize;
use std::fs;
use std::path::{Path, PathBuf};
use tracing::{info, warn};

pub const DEFAULT_ENDPOINT: &str = "http://127.0.0.1:5000/chat";
pub const DEFAULT_TITLE: &str = "Horoscope AI";
pub const DEFAULT_LOG_FILE: &str = "./horoscope-chat.log";

#[derive(Debug, Clone, PartialEq)]
pub struct AppConfig {
    pub endpoint: String,
    pub title: String,
    pub theme: String,
    pub network: NetworkConfig,
    pub log_file: PathBuf,
}

/// Timeouts for the single exchange. A value of 0 waits forever.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize)]
pub struct NetworkConfig {
    pub connect_timeout_ms: u64,
    pub request_timeout_ms: u64,
}

impl Default for NetworkConfig {
    fn default() -> Self {
        Self {
            connect_timeout_ms: 5_000,
            request_timeout_ms: 120_000,
        }
    }
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            endpoint: DEFAULT_ENDPOINT.to_string(),
            title: DEFAULT_TITLE.to_string(),
            theme: "dark".to_string(),
            network: NetworkConfig::default(),
            log_file: PathBuf::from(DEFAULT_LOG_FILE),
        }
    }
}

#[derive(Debug, Clone, Default, Deserialize, PartialEq)]
pub struct FileConfig {
    pub endpoint: Option<String>,
    pub title: Option<String>,
    pub theme: Option<String>,
    pub log_file: Option<PathBuf>,
    pub network: Option<PartialNetworkConfig>,
}

#[derive(Debug, Clone, Default, Deserialize, PartialEq)]
pub struct PartialNetworkConfig {
    pub connect_timeout_ms: Option<u64>,
    pub request_timeout_ms: Option<u64>,
}

/// Values read from the process environment.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct EnvOverrides {
    pub endpoint: Option<String>,
    pub request_timeout_ms: Option<u64>,
}

impl EnvOverrides {
    pub fn from_env() -> Self {
        Self {
            endpoint: std::env::var("HOROSCOPE_ENDPOINT")
                .ok()
                .filter(|s| !s.is_empty()),
            request_timeout_ms: std::env::var("HOROSCOPE_TIMEOUT_MS")
                .ok()
                .and_then(|v| v.parse::<u64>().ok()),
        }
    }
}

impl AppConfig {
    pub fn from_cli(cli: &crate::cli::Cli) -> Result<Self> {
        let cwd = std::env::current_dir().context("resolve current dir")?;
        let project_cfg = load_project_config(&cwd).unwrap_or_default();
        let file_cfg = load_file_config().unwrap_or_default();
        Ok(Self::merge(
            cli,
            &EnvOverrides::from_env(),
            project_cfg,
            file_cfg,
        ))
    }

    /// Resolve each field: CLI, then env, then project file, then global file.
    pub fn merge(
        cli: &crate::cli::Cli,
        env: &EnvOverrides,
        project_cfg: FileConfig,
        file_cfg: FileConfig,
    ) -> Self {
        let defaults = AppConfig::default();

        let endpoint = cli
            .endpoint
            .clone()
            .or_else(|| env.endpoint.clone())
            .or(project_cfg.endpoint)
            .or(file_cfg.endpoint)
            .unwrap_or(defaults.endpoint);
        let title = cli
            .title
            .clone()
            .or(project_cfg.title)
            .or(file_cfg.title)
            .unwrap_or(defaults.title);
        let theme = cli
            .theme
            .clone()
            .or(project_cfg.theme)
            .or(file_cfg.theme)
            .unwrap_or(defaults.theme);
        let log_file = cli
            .log_file
            .clone()
            .or(project_cfg.log_file)
            .or(file_cfg.log_file)
            .unwrap_or(defaults.log_file);

        let network = {
            let project_net = project_cfg.network.unwrap_or_default();
            let file_net = file_cfg.network.unwrap_or_default();
            NetworkConfig {
                connect_timeout_ms: project_net
                    .connect_timeout_ms
                    .or(file_net.connect_timeout_ms)
                    .unwrap_or(defaults.network.connect_timeout_ms),
                request_timeout_ms: cli
                    .timeout_ms
                    .or(env.request_timeout_ms)
                    .or(project_net.request_timeout_ms)
                    .or(file_net.request_timeout_ms)
                    .unwrap_or(defaults.network.request_timeout_ms),
            }
        };

        Self {
            endpoint,
            title,
            theme,
            network,
            log_file,
        }
    }
}

fn parse_config_file(path: &Path) -> Result<Option<FileConfig>> {
    let s = fs::read_to_string(path)
        .with_context(|| format!("read config file: {}", path.display()))?;
    match toml::from_str::<FileConfig>(&s) {
        Ok(cfg) => {
            info!(path=%path.display(), "loaded config file");
            Ok(Some(cfg))
        }
        Err(e) => {
            warn!(path=%path.display(), error=%e.to_string(), "parse config failed");
            Ok(None)
        }
    }
}

pub fn load_file_config() -> Result<FileConfig> {
    fn candidate_paths() -> Vec<PathBuf> {
        let mut v = Vec::new();
        if let Ok(p) = std::env::var("HOROSCOPE_CHAT_CONFIG") {
            v.push(PathBuf::from(p));
        }
        if let Some(dir) = dirs::config_dir() {
            v.push(dir.join("horoscope-chat").join("config.toml"));
        }
        v
    }

    for p in candidate_paths() {
        if p.exists()
            && let Some(cfg) = parse_config_file(&p)?
        {
            return Ok(cfg);
        }
    }
    Ok(FileConfig::default())
}

/// Load project-specific configuration from .horoscope/config.toml
pub fn load_project_config(project_root: &Path) -> Result<FileConfig> {
    let path = project_root.join(".horoscope").join("config.toml");
    if !path.exists() {
        return Ok(FileConfig::default());
    }
    Ok(parse_config_file(&path)?.unwrap_or_default())
}
