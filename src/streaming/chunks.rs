//! Chunked file reading as a lazy byte stream.

use bytes::Bytes;
use std::convert::Infallible;
use std::io::SeekFrom;
use std::path::PathBuf;
use tokio::fs::File;
use tokio::io::{AsyncReadExt, AsyncSeekExt};

/// Size of each emitted chunk.
pub const CHUNK_SIZE: usize = 64 * 1024;

/// Lazily read `path` and emit its bytes in 64 KiB chunks, honoring an
/// optional inclusive byte window.
///
/// The stream is finite and not restartable. The file is opened when the
/// first chunk is polled, so open and read failures happen after response
/// headers are committed; they are logged and the stream ends early, leaving
/// the client to detect truncation from the Content-Length mismatch. The
/// file handle is released when the stream finishes or is dropped, including
/// on client disconnect.
pub fn file_chunk_stream(
    path: PathBuf,
    range: Option<(u64, u64)>,
) -> impl futures_core::Stream<Item = Result<Bytes, Infallible>> {
    async_stream::stream! {
        let mut file = match File::open(&path).await {
            Ok(f) => f,
            Err(e) => {
                tracing::error!("Failed to open {} for streaming: {e}", path.display());
                return;
            }
        };

        // None means read until end-of-file.
        let mut remaining = match range {
            Some((start, end)) => {
                if let Err(e) = file.seek(SeekFrom::Start(start)).await {
                    tracing::error!("Seek to {start} failed for {}: {e}", path.display());
                    return;
                }
                Some(end - start + 1)
            }
            None => None,
        };

        let mut buf = vec![0u8; CHUNK_SIZE];
        loop {
            let want = match remaining {
                Some(0) => break,
                Some(r) => r.min(CHUNK_SIZE as u64) as usize,
                None => CHUNK_SIZE,
            };

            match file.read(&mut buf[..want]).await {
                Ok(0) => break,
                Ok(n) => {
                    if let Some(r) = remaining.as_mut() {
                        *r -= n as u64;
                    }
                    yield Ok(Bytes::copy_from_slice(&buf[..n]));
                }
                Err(e) => {
                    tracing::error!("Read failed for {}: {e}", path.display());
                    break;
                }
            }
        }
    }
}
