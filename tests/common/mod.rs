#![allow(dead_code)]

pub mod config_test_utils;

use fftc::{AppConfig, ReceiveSummary, Receiver, TransferError, TransferSettings};
use std::path::{Path, PathBuf};
use std::thread::JoinHandle;
use tempfile::TempDir;

pub const SMALL_BUFFER: usize = 4 * 1024;

pub fn setup_temp_dir() -> TempDir {
    TempDir::new().expect("Failed to create temp directory")
}

pub fn small_buffer_config() -> AppConfig {
    AppConfig {
        transfer: TransferSettings {
            buffer_size: SMALL_BUFFER,
            ..TransferSettings::default()
        },
        ..AppConfig::default()
    }
}

/// Deterministic payload with a long period so misplaced chunks are caught.
pub fn create_test_data(size: usize) -> Vec<u8> {
    (0..size).map(|i| ((i * 31 + i / 251) % 256) as u8).collect()
}

pub fn write_source(dir: &TempDir, name: &str, data: &[u8]) -> PathBuf {
    let path = dir.path().join(name);
    std::fs::write(&path, data).expect("write source file");
    path
}

pub struct ReceiverRun {
    pub port: u16,
    pub handle: JoinHandle<(Result<ReceiveSummary, TransferError>, String)>,
}

impl ReceiverRun {
    pub fn join(self) -> (Result<ReceiveSummary, TransferError>, String) {
        self.handle.join().expect("receiver thread panicked")
    }
}

/// Bind an ephemeral port and run one receive on a background thread.
pub fn spawn_receiver(config: &AppConfig, dest: &Path) -> ReceiverRun {
    let receiver = Receiver::bind(0, config).expect("bind receiver");
    let port = receiver.local_addr().port();
    let dest = dest.to_path_buf();

    let handle = std::thread::spawn(move || {
        let mut console = Vec::new();
        let result = receiver.receive_file(&dest, &mut console);
        (result, String::from_utf8_lossy(&console).into_owned())
    });

    ReceiverRun { port, handle }
}
