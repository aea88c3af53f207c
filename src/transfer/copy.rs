use std::io::{self, Read, Write};
use thiserror::Error;

use super::progress::ProgressSink;
use crate::common::TransferSettings;

/// Which side of the copy failed, plus how far the copy got.
#[derive(Debug, Error)]
pub enum CopyError {
    #[error("read failed after {transferred} bytes")]
    Source {
        transferred: u64,
        #[source]
        source: io::Error,
    },
    #[error("write failed after {transferred} bytes")]
    Sink {
        transferred: u64,
        #[source]
        source: io::Error,
    },
}

impl CopyError {
    pub fn transferred(&self) -> u64 {
        match self {
            Self::Source { transferred, .. } | Self::Sink { transferred, .. } => *transferred,
        }
    }
}

/// Move bytes from `source` to `sink` until `source` reports end of stream.
///
/// Progress is emitted every `settings.report_interval` buffer fills, then
/// once more when the loop exits, also on error, so the last report always
/// carries the true total. Returns the number of bytes written to `sink`.
pub fn copy_stream<R, W, P>(
    source: &mut R,
    sink: &mut W,
    settings: &TransferSettings,
    progress: &mut P,
) -> Result<u64, CopyError>
where
    R: Read + ?Sized,
    W: Write + ?Sized,
    P: ProgressSink + ?Sized,
{
    let mut buffer = vec![0u8; settings.buffer_size.max(1)];
    let interval = settings.report_interval.max(1);
    let mut total = 0u64;
    let mut fills = 0u32;

    let result = loop {
        let n = match source.read(&mut buffer) {
            Ok(0) => break Ok(total),
            Ok(n) => n,
            Err(e) if e.kind() == io::ErrorKind::Interrupted => continue,
            Err(source) => {
                break Err(CopyError::Source {
                    transferred: total,
                    source,
                })
            }
        };

        if let Err(source) = sink.write_all(&buffer[..n]) {
            break Err(CopyError::Sink {
                transferred: total,
                source,
            });
        }

        total += n as u64;
        fills += 1;
        if fills >= interval {
            fills = 0;
            progress.report(total);
        }
    };

    progress.finish(total);
    result
}
