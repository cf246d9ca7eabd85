//! Bounded response body capture.

use bytes::{Bytes, BytesMut};
use futures_util::{Stream, StreamExt};

/// A response body read under a byte ceiling.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LimitedBody {
    /// Captured bytes, never longer than the ceiling.
    pub bytes: Bytes,
    /// Whether the source had more bytes than the ceiling.
    pub truncated: bool,
    /// Best-effort size of the full body.
    pub original_size: u64,
}

/// Read at most `max_bytes + 1` bytes from `stream`.
///
/// The extra byte detects truncation without draining the rest of the
/// source. On truncation `original_size` is the declared length when it is
/// positive, otherwise the number of bytes read (an underestimate when the
/// length is unknown).
pub async fn read_limited<S, E>(
    mut stream: S,
    max_bytes: usize,
    declared_length: Option<u64>,
) -> Result<LimitedBody, E>
where
    S: Stream<Item = Result<Bytes, E>> + Unpin,
{
    let ceiling = max_bytes.saturating_add(1);
    let mut buffer = BytesMut::with_capacity(ceiling.min(8 * 1024));

    while buffer.len() < ceiling {
        let Some(chunk) = stream.next().await else {
            break;
        };
        let chunk = chunk?;
        let take = chunk.len().min(ceiling - buffer.len());
        buffer.extend_from_slice(&chunk[..take]);
    }

    let read = buffer.len();
    if read > max_bytes {
        buffer.truncate(max_bytes);
        let original_size = declared_length
            .filter(|len| *len > 0)
            .unwrap_or(read as u64);
        Ok(LimitedBody {
            bytes: buffer.freeze(),
            truncated: true,
            original_size,
        })
    } else {
        Ok(LimitedBody {
            bytes: buffer.freeze(),
            truncated: false,
            original_size: read as u64,
        })
    }
}
