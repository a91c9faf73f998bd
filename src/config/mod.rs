#![forbid(unsafe_code)]

use std::path::PathBuf;

use anyhow::Context as _;
use directories::ProjectDirs;
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
#[serde(default)]
pub struct Config {
    pub ui: UiConfig,
    pub status: StatusConfig,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(default)]
pub struct UiConfig {
    pub icons: bool,
    pub tilde_home: bool,
}

impl Default for UiConfig {
    fn default() -> Self {
        Self {
            icons: true,
            tilde_home: true,
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(default)]
pub struct StatusConfig {
    pub refresh_interval_ms: u64,
    pub log_limit: usize,
}

impl Default for StatusConfig {
    fn default() -> Self {
        Self {
            refresh_interval_ms: 2000,
            log_limit: 50,
        }
    }
}

#[derive(Debug, Clone)]
pub struct ConfigPaths {
    pub config_file: PathBuf,
}

pub fn default_paths() -> anyhow::Result<ConfigPaths> {
    let unix = home_config_path_unix();
    if !cfg!(windows) {
        return Ok(ConfigPaths { config_file: unix });
    }

    // Windows: prefer the Unix-style path if present for portability.
    if unix.exists() {
        return Ok(ConfigPaths { config_file: unix });
    }

    let proj = ProjectDirs::from("dev", "wtdash", "wtdash")
        .context("failed to determine platform config directory")?;
    Ok(ConfigPaths {
        config_file: proj.config_dir().join("config.toml"),
    })
}

fn home_config_path_unix() -> PathBuf {
    let home = home_dir().unwrap_or_else(|| PathBuf::from("~"));
    home.join(".config").join("wtdash").join("config.toml")
}

fn home_dir() -> Option<PathBuf> {
    if let Some(v) = std::env::var_os("HOME") {
        return Some(PathBuf::from(v));
    }
    if let Some(v) = std::env::var_os("USERPROFILE") {
        return Some(PathBuf::from(v));
    }
    None
}

/// Abbreviates a path under the user's home directory to `~/...` for
/// display.
#[must_use]
pub fn tilde_path(input: &str) -> String {
    let Some(home) = home_dir() else {
        return input.to_owned();
    };
    let home_str = home.to_string_lossy();
    if let Some(rest) = input.strip_prefix(home_str.as_ref()) {
        if rest.is_empty() {
            return "~".to_owned();
        }
        if rest.starts_with(std::path::MAIN_SEPARATOR) {
            return format!("~{rest}");
        }
    }
    input.to_owned()
}

/// Loads the config file, falling back to defaults when it is missing.
pub fn load() -> anyhow::Result<(Config, ConfigPaths)> {
    let paths = default_paths()?;
    if !paths.config_file.exists() {
        return Ok((Config::default(), paths));
    }
    let raw = std::fs::read_to_string(&paths.config_file)
        .with_context(|| format!("failed to read {}", paths.config_file.display()))?;
    let cfg: Config = toml::from_str(&raw)
        .with_context(|| format!("failed to parse TOML in {}", paths.config_file.display()))?;
    Ok((cfg, paths))
}

pub fn resolved_toml(cfg: &Config) -> anyhow::Result<String> {
    toml::to_string_pretty(cfg).context("failed to serialize config")
}
