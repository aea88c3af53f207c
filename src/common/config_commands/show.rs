use anyhow::{Context, Result};
use std::fs;
use std::io::Write;
use std::path::Path;

/// Write the resolved config path to provided writer.
pub(super) fn path_config_with_writer(path: &Path, output: &mut dyn Write) -> Result<()> {
    writeln!(output, "{}", path.display())?;
    Ok(())
}

pub(super) fn write_defaults(text: &str, output: &mut dyn Write) -> Result<()> {
    output.write_all(text.as_bytes())?;
    Ok(())
}

/// Stream config file contents (fallback guidance when missing.)
pub(super) fn show_config_with_io(
    path: &Path,
    stdout: &mut dyn Write,
    stderr: &mut dyn Write,
) -> Result<()> {
    if path.exists() {
        let mut file = fs::File::open(path)
            .with_context(|| format!("Failed to open config file {}", path.display()))?;
        std::io::copy(&mut file, stdout)?;
    } else {
        writeln!(stderr, "No config file found at {}", path.display())?;
        writeln!(
            stderr,
            "Using default settings. Run `fftc config show --defaults` for a starting point."
        )?;
    }

    Ok(())
}
