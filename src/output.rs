//! Terminal presentation: banner, status lines, and wait spinners.

use console::style;
use indicatif::{ProgressBar, ProgressStyle};
use std::fmt::Display;
use std::io::Write;
use std::time::Duration;

use crate::defaults::VERSION;

pub fn banner() -> String {
    format!("Welcome to Fast File Transfer Client v{VERSION}")
}

/// Write one status line. Console failures are logged, never fatal.
pub fn line(out: &mut dyn Write, msg: impl Display) {
    if let Err(e) = writeln!(out, "{msg}") {
        tracing::debug!(error = %e, "Failed to write status line");
    }
}

/// Spinner shown while blocked on connect or accept. Draws to stderr and
/// stays hidden when stderr is not a terminal.
pub fn spinner(msg: &str) -> ProgressBar {
    let pb = ProgressBar::new_spinner();
    pb.set_style(
        ProgressStyle::default_spinner()
            .template("{spinner:.cyan} {msg}")
            .unwrap_or_else(|_| ProgressStyle::default_spinner()),
    );
    pb.set_message(msg.to_string());
    pb.enable_steady_tick(Duration::from_millis(80));
    pb
}

pub fn finish_spinner_success(spinner: &ProgressBar, msg: &str) {
    spinner.finish_with_message(format!("{} {}", style("✓").green().bold(), msg));
}

pub fn finish_spinner_error(spinner: &ProgressBar, msg: &str) {
    spinner.finish_with_message(format!("{} {}", style("✗").red().bold(), msg));
}
