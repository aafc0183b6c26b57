//! Secure local file streaming with HTTP range support.
//!
//! Requests flow through three stages: the allow-list snapshot built at
//! startup ([`AllowList`]), per-request path validation ([`validate_path`]),
//! and chunked body streaming ([`file_chunk_stream`]).

pub mod allow_list;
pub mod chunks;
pub mod range;
pub mod validate;

pub use allow_list::AllowList;
pub use chunks::{file_chunk_stream, CHUNK_SIZE};
pub use range::{parse_range_header, RangeOutcome};
pub use validate::{validate_path, ServableFile};

use axum::body::Body;
use axum::http::{header, StatusCode};
use axum::response::{IntoResponse, Response};

use crate::error::Result;

/// Streamed responses must not be cached; the underlying file can change
/// between requests.
const CACHE_CONTROL_VALUE: &str = "no-cache, must-revalidate";

/// Serve a local file over HTTP, honoring an optional `Range` header value.
///
/// Validates the path, then answers 200 with the whole file, 206 with the
/// requested byte window, or 416 when the range lies entirely outside the
/// file. Malformed `Range` values are ignored and the whole file is served.
pub async fn serve_local_file(
    requested: &str,
    range_header: Option<&str>,
    allow_list: &AllowList,
) -> Result<Response> {
    let file = validate_path(requested, allow_list).await?;

    let range = range_header.and_then(|value| parse_range_header(value, file.size));

    match range {
        Some(RangeOutcome::Partial { start, end }) => {
            let length = end - start + 1;
            let body = Body::from_stream(file_chunk_stream(file.path, Some((start, end))));

            Ok((
                StatusCode::PARTIAL_CONTENT,
                [
                    (header::CONTENT_TYPE.as_str(), file.mime.to_string()),
                    (header::CONTENT_LENGTH.as_str(), length.to_string()),
                    (
                        header::CONTENT_RANGE.as_str(),
                        format!("bytes {start}-{end}/{}", file.size),
                    ),
                    (header::ACCEPT_RANGES.as_str(), "bytes".to_string()),
                    (
                        header::CACHE_CONTROL.as_str(),
                        CACHE_CONTROL_VALUE.to_string(),
                    ),
                ],
                body,
            )
                .into_response())
        }
        Some(RangeOutcome::Unsatisfiable) => Ok((
            StatusCode::RANGE_NOT_SATISFIABLE,
            [(
                header::CONTENT_RANGE.as_str(),
                format!("bytes */{}", file.size),
            )],
            Body::empty(),
        )
            .into_response()),
        None => {
            let body = Body::from_stream(file_chunk_stream(file.path, None));

            Ok((
                StatusCode::OK,
                [
                    (header::CONTENT_TYPE.as_str(), file.mime.to_string()),
                    (header::CONTENT_LENGTH.as_str(), file.size.to_string()),
                    (header::ACCEPT_RANGES.as_str(), "bytes".to_string()),
                    (
                        header::CACHE_CONTROL.as_str(),
                        CACHE_CONTROL_VALUE.to_string(),
                    ),
                ],
                body,
            )
                .into_response())
        }
    }
}
