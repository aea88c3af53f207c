//! Receiving side: listen on a port, accept one connection, and write the
//! incoming stream to a file.

use socket2::{Domain, Protocol, Socket, Type};
use std::fs::File;
use std::io::{self, Write};
use std::net::{SocketAddr, TcpListener};
use std::path::Path;

use crate::common::{AppConfig, TransferError, TransferSettings};
use crate::output::line;
use crate::transfer::{
    copy_stream, Completion, Connection, CopyError, Framing, LineReporter, RawStream,
};

/// Result of a finished receive, clean or truncated.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ReceiveSummary {
    pub bytes: u64,
    pub peer: SocketAddr,
    pub completion: Completion,
}

/// Bound listener waiting for exactly one sender.
pub struct Receiver<F: Framing = RawStream> {
    listener: TcpListener,
    local_addr: SocketAddr,
    settings: TransferSettings,
    framing: F,
}

impl Receiver {
    /// Bind the wildcard IPv4 address on `port`. Port 0 picks a free port,
    /// see [`Receiver::local_addr`].
    #[tracing::instrument(skip(config))]
    pub fn bind(port: u16, config: &AppConfig) -> Result<Self, TransferError> {
        let listener =
            listen(port, config.listen.backlog).map_err(|e| TransferError::bind(port, e))?;
        let local_addr = listener
            .local_addr()
            .map_err(|e| TransferError::bind(port, e))?;

        tracing::info!(%local_addr, "Listening");
        Ok(Self {
            listener,
            local_addr,
            settings: config.transfer,
            framing: RawStream,
        })
    }
}

impl<F: Framing> Receiver<F> {
    pub fn with_framing<G: Framing>(self, framing: G) -> Receiver<G> {
        Receiver {
            listener: self.listener,
            local_addr: self.local_addr,
            settings: self.settings,
            framing,
        }
    }

    pub fn local_addr(&self) -> SocketAddr {
        self.local_addr
    }

    /// Block until a sender connects.
    pub fn accept(&self) -> Result<Connection, TransferError> {
        let (stream, peer) = self.listener.accept().map_err(TransferError::AcceptFailed)?;
        tracing::info!(%peer, "Accepted connection");
        Ok(Connection::new(stream, peer))
    }

    /// Accept one connection and write everything it carries to `path`.
    pub fn receive_file(
        self,
        path: &Path,
        console: &mut dyn Write,
    ) -> Result<ReceiveSummary, TransferError> {
        let connection = self.accept()?;
        self.receive(connection, path, console)
    }

    /// Write the stream from `connection` to `path`, truncating any existing
    /// file. A dropped connection keeps the bytes received so far and is
    /// reported as [`Completion::Truncated`], not as an error.
    ///
    /// Consumes the receiver so the listener closes with the session.
    #[tracing::instrument(skip_all, fields(peer = %connection.peer, path = %path.display()))]
    pub fn receive(
        self,
        connection: Connection,
        path: &Path,
        console: &mut dyn Write,
    ) -> Result<ReceiveSummary, TransferError> {
        let mut file = match File::create(path) {
            Ok(file) => file,
            Err(e) => {
                connection.close();
                return Err(TransferError::open_file(path, e));
            }
        };

        let mut source = &connection.stream;
        let decimals = self.settings.size_decimals;
        let mut reporter = LineReporter::new(&mut *console, "Received", decimals);
        let result = copy_stream(&mut source, &mut file, &self.settings, &mut reporter);
        drop(reporter);

        let (bytes, completion) = match result {
            Ok(bytes) => (bytes, Completion::Clean),
            Err(CopyError::Source {
                transferred,
                source,
            }) => match self.framing.on_stream_error(source, transferred) {
                Ok(completion) => (transferred, completion),
                Err(source) => {
                    connection.close();
                    return Err(TransferError::StreamIo {
                        transferred,
                        source,
                    });
                }
            },
            Err(CopyError::Sink {
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
        };

        if let Err(source) = file.flush() {
            connection.close();
            return Err(TransferError::FileAccess {
                path: path.to_path_buf(),
                transferred: bytes,
                source,
            });
        }
        drop(file);

        let peer = connection.peer;
        connection.close();

        if let Completion::Truncated { reason } = &completion {
            line(console, format_args!("Connection closed early: {reason}"));
        }
        line(
            console,
            format_args!("{} bytes written to {}", bytes, path.display()),
        );
        line(console, format_args!("Closed connection to {}", peer.ip()));
        tracing::info!(bytes, clean = completion.is_clean(), "Receive complete");

        Ok(ReceiveSummary {
            bytes,
            peer,
            completion,
        })
    }
}

fn listen(port: u16, backlog: u32) -> io::Result<TcpListener> {
    let addr = SocketAddr::from(([0, 0, 0, 0], port));
    let socket = Socket::new(Domain::IPV4, Type::STREAM, Some(Protocol::TCP))?;

    // Matches std::net::TcpListener: lets a restarted receiver reuse a port
    // still in TIME_WAIT. An active listener on the port still fails bind.
    #[cfg(unix)]
    socket.set_reuse_address(true)?;

    socket.bind(&addr.into())?;
    socket.listen(i32::try_from(backlog).unwrap_or(i32::MAX))?;
    Ok(socket.into())
}
