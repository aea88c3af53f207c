pub mod config;
pub mod config_commands;
pub mod errors;
pub mod size;

pub use config::{AppConfig, ListenSettings, TransferSettings};
pub use errors::TransferError;
pub use size::format_size;
