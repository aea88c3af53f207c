//! Transfer engine shared by both roles: the copy loop, progress reporting,
//! and the stream boundary policy.

mod copy;
mod framing;
mod progress;

pub use copy::{copy_stream, CopyError};
pub use framing::{Completion, Framing, RawStream};
pub use progress::{LineReporter, ProgressSink};

use std::net::{Shutdown, SocketAddr, TcpStream};

/// One established TCP connection and the address of the peer on the other end.
#[derive(Debug)]
pub struct Connection {
    pub stream: TcpStream,
    pub peer: SocketAddr,
}

impl Connection {
    pub fn new(stream: TcpStream, peer: SocketAddr) -> Self {
        Self { stream, peer }
    }

    /// Best-effort shutdown of both directions. Errors are logged and dropped,
    /// the socket itself closes when `self` goes out of scope.
    pub fn close(self) {
        if let Err(e) = self.stream.shutdown(Shutdown::Both) {
            tracing::debug!(peer = %self.peer, error = %e, "Ignoring shutdown error");
        }
    }
}
