//! Validate an on-disk config file.

use crate::common::config::AppConfig;
use anyhow::{Context, Result};
use figment::{
    providers::{Format, Serialized, Toml},
    Figment,
};
use std::fs;
use std::io::Write;
use std::path::Path;

fn validate_config_text(text: &str) -> Result<AppConfig> {
    let config: AppConfig = Figment::new()
        .merge(Serialized::defaults(AppConfig::default()))
        .merge(Toml::string(text))
        .extract()
        .context("Failed to parse config")?;

    config.validate()?;
    Ok(config)
}

pub(super) fn check_config_with_writer(path: &Path, output: &mut dyn Write) -> Result<()> {
    if !path.exists() {
        writeln!(output, "No config file at {}, defaults apply", path.display())?;
        return Ok(());
    }

    let text = fs::read_to_string(path)
        .with_context(|| format!("Failed to read config file {}", path.display()))?;
    let config = validate_config_text(&text)
        .with_context(|| format!("Config file {} is invalid", path.display()))?;

    writeln!(
        output,
        "{} is valid (buffer_size = {}, report_interval = {}, backlog = {})",
        path.display(),
        config.transfer.buffer_size,
        config.transfer.report_interval,
        config.listen.backlog
    )?;
    Ok(())
}
