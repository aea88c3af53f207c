//! Configuration schema, defaults, and layered loading.
//!
//! Precedence: defaults < config file < environment < CLI
use anyhow::{ensure, Context, Result};
use directories::ProjectDirs;
use figment::{
    providers::{Env, Format, Serialized, Toml},
    Figment,
};
use serde::{Deserialize, Serialize};
use std::path::PathBuf;

use crate::defaults;

pub const MAX_BUFFER_SIZE_BYTES: usize = 16 * 1024 * 1024;
const MAX_SIZE_DECIMALS: u32 = 6;

pub fn config_path() -> PathBuf {
    ProjectDirs::from("", "", "fftc")
        .map(|p| p.config_dir().join("config.toml"))
        .unwrap_or_else(|| PathBuf::from("fftc.toml"))
}

/// Copy loop tuning shared by both roles.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct TransferSettings {
    /// Bytes moved per read/write cycle
    pub buffer_size: usize,
    /// Buffer fills between progress lines
    pub report_interval: u32,
    /// Decimal places in formatted sizes
    pub size_decimals: u32,
}

impl Default for TransferSettings {
    fn default() -> Self {
        Self {
            buffer_size: defaults::BUFFER_SIZE,
            report_interval: defaults::REPORT_INTERVAL,
            size_decimals: defaults::SIZE_DECIMALS,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct ListenSettings {
    pub backlog: u32,
}

impl Default for ListenSettings {
    fn default() -> Self {
        Self {
            backlog: defaults::LISTEN_BACKLOG,
        }
    }
}

/// Fully resolved application configuration after all layers merge.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct AppConfig {
    pub transfer: TransferSettings,
    pub listen: ListenSettings,
}

impl AppConfig {
    /// Validates tuning bounds and rejects unusable values.
    pub fn validate(&self) -> Result<()> {
        let transfer = self.transfer;
        ensure!(
            transfer.buffer_size > 0,
            "Invalid config: transfer.buffer_size must be > 0"
        );
        ensure!(
            transfer.buffer_size <= MAX_BUFFER_SIZE_BYTES,
            "Invalid config: transfer.buffer_size must be <= {MAX_BUFFER_SIZE_BYTES}"
        );
        ensure!(
            transfer.report_interval >= 1,
            "Invalid config: transfer.report_interval must be >= 1"
        );
        ensure!(
            transfer.size_decimals <= MAX_SIZE_DECIMALS,
            "Invalid config: transfer.size_decimals must be <= {MAX_SIZE_DECIMALS}"
        );
        ensure!(
            self.listen.backlog >= 1,
            "Invalid config: listen.backlog must be >= 1"
        );
        Ok(())
    }
}

/// Values supplied on the command line. `None` leaves the loaded value alone.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct ConfigOverrides {
    pub buffer_size: Option<usize>,
    pub report_interval: Option<u32>,
}

/// Base figment (defaults + file + env) without validation.
pub(crate) fn layered() -> Figment {
    Figment::new()
        .merge(Serialized::defaults(AppConfig::default()))
        .merge(Toml::file(config_path()))
        .merge(Env::prefixed("FFTC_").split("__"))
}

/// Loads config from defaults/file/env.
pub fn load_config() -> Result<AppConfig> {
    let config: AppConfig = layered()
        .extract()
        .context("Failed to load configuration")?;

    config.validate()?;

    Ok(config)
}

/// Applies runtime overrides to a loaded config and re-validates it.
pub fn apply_overrides(mut config: AppConfig, overrides: &ConfigOverrides) -> Result<AppConfig> {
    if let Some(buffer_size) = overrides.buffer_size {
        config.transfer.buffer_size = buffer_size;
    }
    if let Some(report_interval) = overrides.report_interval {
        config.transfer.report_interval = report_interval;
    }

    config.validate()?;
    Ok(config)
}
