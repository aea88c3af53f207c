//! Failure kinds surfaced by the transfer engine.

use std::io;
use std::net::SocketAddr;
use std::path::{Path, PathBuf};
use thiserror::Error;

#[derive(Debug, Error)]
pub enum TransferError {
    #[error("invalid arguments: {0}")]
    Usage(String),

    #[error("no route to host {host}")]
    HostUnreachable {
        host: String,
        #[source]
        source: Option<io::Error>,
    },

    #[error("could not connect to peer {addr}")]
    ConnectFailed {
        addr: SocketAddr,
        #[source]
        source: io::Error,
    },

    #[error("port {port} is already in use")]
    PortInUse {
        port: u16,
        #[source]
        source: io::Error,
    },

    #[error("permission denied listening on port {port}")]
    PermissionDenied {
        port: u16,
        #[source]
        source: io::Error,
    },

    #[error("failed to listen on port {port}")]
    BindFailed {
        port: u16,
        #[source]
        source: io::Error,
    },

    #[error("failed to accept incoming connection")]
    AcceptFailed(#[source] io::Error),

    #[error("file not found: {}", path.display())]
    FileNotFound {
        path: PathBuf,
        #[source]
        source: io::Error,
    },

    #[error("access denied: {}", path.display())]
    FileAccessDenied {
        path: PathBuf,
        #[source]
        source: io::Error,
    },

    #[error("not a regular file: {}", path.display())]
    NotAFile { path: PathBuf },

    #[error("file I/O failed on {} after {transferred} bytes", path.display())]
    FileAccess {
        path: PathBuf,
        transferred: u64,
        #[source]
        source: io::Error,
    },

    #[error("connection I/O failed after {transferred} bytes")]
    StreamIo {
        transferred: u64,
        #[source]
        source: io::Error,
    },
}

impl TransferError {
    /// Classify a failure to open or inspect a local file.
    pub fn open_file(path: &Path, source: io::Error) -> Self {
        let path = path.to_path_buf();
        match source.kind() {
            io::ErrorKind::NotFound => Self::FileNotFound { path, source },
            io::ErrorKind::PermissionDenied => Self::FileAccessDenied { path, source },
            _ => Self::FileAccess {
                path,
                transferred: 0,
                source,
            },
        }
    }

    /// Classify a failure to bind or listen on a local port.
    pub fn bind(port: u16, source: io::Error) -> Self {
        match source.kind() {
            io::ErrorKind::AddrInUse => Self::PortInUse { port, source },
            io::ErrorKind::PermissionDenied => Self::PermissionDenied { port, source },
            _ => Self::BindFailed { port, source },
        }
    }
}
