//! Stream boundary policy.
//!
//! The wire carries raw file bytes with no header or trailer. The sender marks
//! the end of the transfer by shutting down its write side, and the receiver
//! sees that as a zero-length read. Everything that depends on that
//! convention goes through [`Framing`] so the copy loop, reporting, and error
//! handling stay the same if a framed protocol is added later.

use std::io;
use std::net::{Shutdown, TcpStream};

/// How a receive loop ended.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Completion {
    /// Peer shut down its write side after the last byte.
    Clean,
    /// Connection failed mid-stream; bytes received so far were kept.
    Truncated { reason: String },
}

impl Completion {
    pub fn is_clean(&self) -> bool {
        matches!(self, Self::Clean)
    }
}

pub trait Framing {
    /// Signal end of transfer once the last payload byte has been written.
    fn finish_send(&self, stream: &TcpStream) -> io::Result<()>;

    /// Decide what a connection read error during receive means.
    /// `Err` escalates it to a failed transfer.
    fn on_stream_error(&self, error: io::Error, received: u64) -> Result<Completion, io::Error>;
}

/// Unframed byte stream, terminated by TCP write-side shutdown.
#[derive(Debug, Clone, Copy, Default)]
pub struct RawStream;

impl Framing for RawStream {
    fn finish_send(&self, stream: &TcpStream) -> io::Result<()> {
        stream.shutdown(Shutdown::Write)
    }

    // Without a length prefix a dropped connection cannot be told apart from
    // a short file, so the partial file is kept and reported as truncated.
    fn on_stream_error(&self, error: io::Error, received: u64) -> Result<Completion, io::Error> {
        tracing::warn!(received, error = %error, "Connection dropped mid-transfer");
        Ok(Completion::Truncated {
            reason: error.to_string(),
        })
    }
}
