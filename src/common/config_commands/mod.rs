//! CLI handlers for config subcommands.

mod check;
mod show;

use crate::common::config::{config_path, AppConfig};
use anyhow::{Context, Result};

fn defaults_toml() -> Result<String> {
    toml::to_string_pretty(&AppConfig::default()).context("Failed to serialize default config")
}

/// Print resolved config file path.
pub fn run_config_path() -> Result<()> {
    let stdout = std::io::stdout();
    let mut output = stdout.lock();
    show::path_config_with_writer(&config_path(), &mut output)
}

/// Print config file contents, or the built-in defaults.
pub fn run_config_show(defaults: bool) -> Result<()> {
    let stdout = std::io::stdout();
    let mut output = stdout.lock();
    if defaults {
        return show::write_defaults(&defaults_toml()?, &mut output);
    }

    let path = config_path();
    let stderr = std::io::stderr();
    let mut err_output = stderr.lock();
    show::show_config_with_io(&path, &mut output, &mut err_output)
}

/// Validate the config file on disk without running a transfer.
pub fn run_config_check() -> Result<()> {
    let stdout = std::io::stdout();
    let mut output = stdout.lock();
    check::check_config_with_writer(&config_path(), &mut output)
}
