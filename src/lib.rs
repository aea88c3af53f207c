pub mod common;
pub mod output;
pub mod receive;
pub mod send;
pub mod transfer;

pub use common::{AppConfig, TransferError, TransferSettings};
pub use receive::{ReceiveSummary, Receiver};
pub use send::{SendSummary, Sender};
pub use transfer::{Completion, Connection, Framing, RawStream};

// Constants shared by the CLI and the transfer engine
pub mod defaults {
    /// Version printed in the banner and `--version`.
    pub const VERSION: &str = env!("CARGO_PKG_VERSION");
    pub const BUFFER_SIZE: usize = 64 * 1024; // 64KiB
    pub const REPORT_INTERVAL: u32 = 16;
    pub const LISTEN_BACKLOG: u32 = 16;
    pub const SIZE_DECIMALS: u32 = 1;
}
