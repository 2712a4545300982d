use crate::domain::LogLevel;
use crate::infra::{PodmanAdapter, ProcessRunner};
use anyhow::{Context, Result};
use serde::Deserialize;
use std::fs;
use std::path::{Path, PathBuf};
use std::sync::Arc;
use tracing::{debug, info};

pub const DEFAULT_CONFIG_NAME: &str = "podprobe.toml";
pub const DEFAULT_BINARY: &str = "podman";

const DEFAULT_CONFIG_TOML: &str = r#"# podprobe configuration

[podman]
# Executable to invoke. `~` and environment variables are expanded.
binary = "podman"

# Passed to podman as --log-level on every call.
# One of: debug, info, warn, error, fatal, panic
# log_level = "error"
"#;

pub fn default_config_dir() -> PathBuf {
    std::env::var("HOME")
        .map(PathBuf::from)
        .unwrap_or_else(|_| PathBuf::from("/tmp"))
        .join(".config/podprobe")
}

pub fn ensure_config_dir(config_dir: &Path) -> Result<()> {
    fs::create_dir_all(config_dir).with_context(|| format!("creating {:?}", config_dir))
}

#[derive(Deserialize, Debug, Default, Clone, PartialEq, Eq)]
#[serde(deny_unknown_fields)]
pub struct PodmanConfig {
    pub binary: Option<String>,
    pub log_level: Option<LogLevel>,
}

#[derive(Deserialize, Debug, Default, Clone, PartialEq, Eq)]
#[serde(deny_unknown_fields)]
pub struct AppConfig {
    #[serde(default)]
    pub podman: PodmanConfig,
}

impl AppConfig {
    /// Merges another AppConfig into self.
    /// Values from `other` overwrite values in `self` if present.
    pub fn merge(&mut self, other: AppConfig) {
        if let Some(binary) = other.podman.binary {
            self.podman.binary = Some(binary);
        }
        if let Some(level) = other.podman.log_level {
            self.podman.log_level = Some(level);
        }
    }

    /// Executable path with `~` and `$VARS` expanded.
    pub fn binary_path(&self) -> Result<PathBuf> {
        let raw = self.podman.binary.as_deref().unwrap_or(DEFAULT_BINARY);
        let expanded =
            shellexpand::full(raw).with_context(|| format!("expanding binary path {raw:?}"))?;
        Ok(PathBuf::from(expanded.as_ref()))
    }

    pub fn build_adapter(&self) -> Result<PodmanAdapter> {
        let runner = ProcessRunner::new(self.binary_path()?);
        debug!(binary = ?runner.binary(), log_level = ?self.podman.log_level, "building adapter");

        let mut adapter = PodmanAdapter::with_runner(Arc::new(runner));
        adapter.set_log_level(self.podman.log_level);
        Ok(adapter)
    }
}

fn read_config(path: &Path) -> Result<AppConfig> {
    let content = fs::read_to_string(path).with_context(|| format!("reading {:?}", path))?;
    toml::from_str(&content).with_context(|| format!("parsing {:?}", path))
}

/// Loads `podprobe.toml` from `config_dir`, then overlays one found in the
/// current directory. Missing files leave the defaults in place.
pub fn load_app_config(config_dir: &Path) -> Result<AppConfig> {
    load_layered(&[
        config_dir.join(DEFAULT_CONFIG_NAME),
        PathBuf::from("./").join(DEFAULT_CONFIG_NAME),
    ])
}

fn load_layered(paths: &[PathBuf]) -> Result<AppConfig> {
    let mut app_config = AppConfig::default();

    for path in paths {
        if path.exists() {
            debug!("loading config from {:?}", path);
            app_config.merge(read_config(path)?);
        }
    }

    Ok(app_config)
}

/// Writes a commented default config unless one already exists.
/// Returns the path of the config file.
pub fn install_default_config(target_dir: &Path) -> Result<PathBuf> {
    ensure_config_dir(target_dir)?;

    let target = target_dir.join(DEFAULT_CONFIG_NAME);
    if target.exists() {
        info!("config already present at {:?}", target);
        return Ok(target);
    }

    fs::write(&target, DEFAULT_CONFIG_TOML)
        .with_context(|| format!("writing default config to {:?}", target))?;
    Ok(target)
}
