use std::io::Write;

use crate::common::format_size;

/// Receives cumulative byte counts from the copy loop.
pub trait ProgressSink {
    /// Periodic update while the loop is running.
    fn report(&mut self, total: u64);

    /// Final update, called exactly once when the loop exits.
    fn finish(&mut self, total: u64) {
        self.report(total);
    }
}

/// Single updating console line: `\r<label>: <size> ...`.
pub struct LineReporter<W: Write> {
    out: W,
    label: &'static str,
    decimals: u32,
}

impl<W: Write> LineReporter<W> {
    pub fn new(out: W, label: &'static str, decimals: u32) -> Self {
        Self {
            out,
            label,
            decimals,
        }
    }

    fn draw(&mut self, total: u64, end: &str) {
        let size = format_size(total, self.decimals);
        // Console output is advisory, a broken stdout must not fail the transfer
        let result = write!(self.out, "\r{}: {} ...{}", self.label, size, end)
            .and_then(|_| self.out.flush());
        if let Err(e) = result {
            tracing::debug!(error = %e, "Failed to draw progress line");
        }
    }
}

impl<W: Write> ProgressSink for LineReporter<W> {
    fn report(&mut self, total: u64) {
        self.draw(total, "");
    }

    fn finish(&mut self, total: u64) {
        self.draw(total, "\n");
    }
}
