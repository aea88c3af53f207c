//! Sending side: connect to a peer and stream one file to it.

mod resolve;

pub use resolve::resolve;

use std::fs::File;
use std::io::Write;
use std::net::{SocketAddr, TcpStream};
use std::path::Path;

use crate::common::{format_size, TransferError, TransferSettings};
use crate::output::line;
use crate::transfer::{copy_stream, Connection, CopyError, Framing, LineReporter, RawStream};

/// Result of a completed send.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SendSummary {
    pub bytes: u64,
    pub peer: SocketAddr,
}

pub struct Sender<F: Framing = RawStream> {
    settings: TransferSettings,
    framing: F,
}

impl Sender {
    pub fn new(settings: TransferSettings) -> Self {
        Self::with_framing(settings, RawStream)
    }
}

impl<F: Framing> Sender<F> {
    pub fn with_framing(settings: TransferSettings, framing: F) -> Self {
        Self { settings, framing }
    }

    /// Resolve, probe the source file, connect, and stream the file.
    ///
    /// The file is checked before any connection is opened so a bad path
    /// never reaches the peer.
    pub fn send_file(
        &self,
        destination: &str,
        port: u16,
        path: &Path,
        console: &mut dyn Write,
    ) -> Result<SendSummary, TransferError> {
        probe_source(path)?;
        let connection = self.connect(destination, port)?;
        self.send(connection, path, console)
    }

    /// Resolve `destination` and open a TCP connection to it.
    #[tracing::instrument(skip(self))]
    pub fn connect(&self, destination: &str, port: u16) -> Result<Connection, TransferError> {
        let addr = SocketAddr::new(resolve(destination)?, port);
        tracing::info!(%addr, "Connecting");

        let stream = TcpStream::connect(addr)
            .map_err(|source| TransferError::ConnectFailed { addr, source })?;

        Ok(Connection::new(stream, addr))
    }

    /// Stream `path` over an established connection, then signal end of
    /// transfer and close. No acknowledgment is awaited from the peer.
    #[tracing::instrument(skip_all, fields(peer = %connection.peer, path = %path.display()))]
    pub fn send(
        &self,
        connection: Connection,
        path: &Path,
        console: &mut dyn Write,
    ) -> Result<SendSummary, TransferError> {
        let decimals = self.settings.size_decimals;

        let (mut file, size) = match open_source(path) {
            Ok(opened) => opened,
            Err(e) => {
                connection.close();
                return Err(e);
            }
        };

        line(
            console,
            format_args!(
                "Sending {} of data. This may take a while ...",
                format_size(size, decimals)
            ),
        );

        let mut sink = &connection.stream;
        let mut reporter = LineReporter::new(&mut *console, "Sent", decimals);
        let result = copy_stream(&mut file, &mut sink, &self.settings, &mut reporter);
        drop(reporter);

        let bytes = match result {
            Ok(bytes) => bytes,
            Err(CopyError::Source {
                transferred,
                source,
            }) => {
                connection.close();
                return Err(TransferError::FileAccess {
                    path: path.to_path_buf(),
                    transferred,
                    source,
                });
            }
            Err(CopyError::Sink {
                transferred,
                source,
            }) => {
                connection.close();
                return Err(TransferError::StreamIo {
                    transferred,
                    source,
                });
            }
        };

        if let Err(source) = self.framing.finish_send(&connection.stream) {
            connection.close();
            return Err(TransferError::StreamIo {
                transferred: bytes,
                source,
            });
        }

        let peer = connection.peer;
        drop(connection);
        tracing::info!(bytes, "Send complete");
        line(console, "Done!");

        Ok(SendSummary { bytes, peer })
    }
}

/// Check that `path` names a readable regular file and return its size.
pub fn probe_source(path: &Path) -> Result<u64, TransferError> {
    let metadata = std::fs::metadata(path).map_err(|e| TransferError::open_file(path, e))?;
    if !metadata.is_file() {
        return Err(TransferError::NotAFile {
            path: path.to_path_buf(),
        });
    }
    Ok(metadata.len())
}

fn open_source(path: &Path) -> Result<(File, u64), TransferError> {
    let file = File::open(path).map_err(|e| TransferError::open_file(path, e))?;
    let size = file
        .metadata()
        .map_err(|e| TransferError::open_file(path, e))?
        .len();
    Ok((file, size))
}
