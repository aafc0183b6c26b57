//! HTTP `Range` header parsing.

/// Outcome of resolving a `Range` header against a file of known size.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RangeOutcome {
    /// Serve bytes `start..=end` with 206 Partial Content.
    Partial { start: u64, end: u64 },
    /// Syntactically valid but lies entirely outside the file; respond 416.
    Unsatisfiable,
}

/// Parse an HTTP Range header value against a file of `file_size` bytes.
///
/// Supports the single-range forms:
/// - `bytes=0-499`
/// - `bytes=500-`
/// - `bytes=-500` (last 500 bytes)
///
/// Returns `None` for malformed values (including multi-range and inverted
/// ranges), which callers treat as "no range requested" per RFC 7233.
pub fn parse_range_header(value: &str, file_size: u64) -> Option<RangeOutcome> {
    let header = value.strip_prefix("bytes=")?;

    let parts: Vec<&str> = header.split('-').collect();
    if parts.len() != 2 {
        return None;
    }

    let start = parts[0].trim();
    let end = parts[1].trim();

    match (start.is_empty(), end.is_empty()) {
        // bytes=-500 (last 500 bytes)
        (true, false) => {
            let suffix_len: u64 = end.parse().ok()?;
            if suffix_len == 0 || file_size == 0 {
                return Some(RangeOutcome::Unsatisfiable);
            }
            let start = file_size.saturating_sub(suffix_len);
            Some(RangeOutcome::Partial {
                start,
                end: file_size - 1,
            })
        }
        // bytes=500- (from 500 to end)
        (false, true) => {
            let start: u64 = start.parse().ok()?;
            if start >= file_size {
                return Some(RangeOutcome::Unsatisfiable);
            }
            Some(RangeOutcome::Partial {
                start,
                end: file_size - 1,
            })
        }
        // bytes=0-499
        (false, false) => {
            let start: u64 = start.parse().ok()?;
            let end: u64 = end.parse().ok()?;
            if start > end {
                return None;
            }
            if start >= file_size {
                return Some(RangeOutcome::Unsatisfiable);
            }
            Some(RangeOutcome::Partial {
                start,
                end: end.min(file_size - 1),
            })
        }
        // bytes=- (invalid)
        (true, true) => None,
    }
}
