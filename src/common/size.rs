//! Human-readable byte counts for console output.

const UNITS: [&str; 6] = ["B", "KB", "MB", "GB", "TB", "PB"];
const STEP: f64 = 1000.0;

/// Scale `bytes` into the largest fitting decimal unit (base 1000).
///
/// The value is rounded half away from zero to `decimals` places after every
/// division, so a value that rounds up to 1000 moves on to the next unit.
/// Scaling stops at `PB`.
pub fn format_size(bytes: u64, decimals: u32) -> String {
    let factor = 10f64.powi(decimals as i32);
    let mut value = bytes as f64;
    let mut unit = 0;

    while value >= STEP && unit < UNITS.len() - 1 {
        value /= STEP;
        value = (value * factor).round() / factor;
        unit += 1;
    }

    format!("{}{}", value, UNITS[unit])
}
