//! Request path validation against the allow-list.

use std::path::{Path, PathBuf};
use tokio::fs;

use crate::error::{Error, Result};
use crate::streaming::allow_list::AllowList;

/// A validated, servable local file.
#[derive(Debug, Clone)]
pub struct ServableFile {
    /// Canonical absolute path.
    pub path: PathBuf,
    /// Size in bytes.
    pub size: u64,
    /// MIME type guessed from the file extension.
    pub mime: &'static str,
}

/// Validate a requested path for serving.
///
/// Canonicalizes the path (resolving symlinks and relative segments), checks
/// the canonical form against the allow-list, probes readability, and
/// determines the file size and MIME type. Every rejection is logged with
/// the offending path.
pub async fn validate_path(requested: &str, allow_list: &AllowList) -> Result<ServableFile> {
    let canonical = match fs::canonicalize(requested).await {
        Ok(p) => p,
        Err(_) => {
            tracing::warn!(path = %requested, "Rejected stream request: file not found");
            return Err(Error::FileNotFound);
        }
    };

    if !allow_list.permits(&canonical) {
        tracing::warn!(
            path = %canonical.display(),
            allowed = ?allow_list.bases(),
            "Rejected stream request: path outside allowed directories"
        );
        return Err(Error::AccessDenied);
    }

    // Readability probe. The handle is dropped right away; the streamer
    // re-opens the file when the body is first polled.
    if let Err(e) = fs::File::open(&canonical).await {
        tracing::warn!(
            path = %canonical.display(),
            error = %e,
            "Rejected stream request: file not accessible"
        );
        return Err(Error::FileNotAccessible);
    }

    let metadata = match fs::metadata(&canonical).await {
        Ok(m) => m,
        Err(e) => {
            tracing::error!(
                path = %canonical.display(),
                error = %e,
                "Failed to determine file size"
            );
            return Err(Error::SizeUnavailable);
        }
    };

    if !metadata.is_file() {
        tracing::warn!(path = %canonical.display(), "Rejected stream request: not a regular file");
        return Err(Error::FileNotFound);
    }

    let mime = guess_mime_type(&canonical);

    Ok(ServableFile {
        path: canonical,
        size: metadata.len(),
        mime,
    })
}

/// Guess the MIME type from the file extension.
pub fn guess_mime_type(path: impl AsRef<Path>) -> &'static str {
    let ext = path
        .as_ref()
        .extension()
        .and_then(|e| e.to_str())
        .map(|s| s.to_lowercase());

    match ext.as_deref().unwrap_or("") {
        "mp4" | "m4v" => "video/mp4",
        "mkv" => "video/x-matroska",
        "webm" => "video/webm",
        "avi" => "video/x-msvideo",
        "mov" => "video/quicktime",
        "ts" | "m2ts" => "video/mp2t",
        "m4a" => "audio/mp4",
        "mp3" => "audio/mpeg",
        "flac" => "audio/flac",
        "wav" => "audio/wav",
        _ => "application/octet-stream",
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn allow(dir: &Path) -> AllowList {
        AllowList::resolve(&[dir.display().to_string()], &[])
    }

    #[tokio::test]
    async fn accepts_file_under_allowed_base() {
        let dir = tempfile::tempdir().unwrap();
        let file = dir.path().join("movie.mp4");
        std::fs::write(&file, b"data").unwrap();

        let servable = validate_path(&file.display().to_string(), &allow(dir.path()))
            .await
            .unwrap();
        assert_eq!(servable.size, 4);
        assert_eq!(servable.mime, "video/mp4");
        assert!(servable.path.is_absolute());
    }

    #[tokio::test]
    async fn missing_file_is_not_found() {
        let dir = tempfile::tempdir().unwrap();
        let missing = dir.path().join("gone.mp4");

        let err = validate_path(&missing.display().to_string(), &allow(dir.path()))
            .await
            .unwrap_err();
        assert!(matches!(err, Error::FileNotFound));
    }

    #[tokio::test]
    async fn file_outside_allow_list_is_denied() {
        let root = tempfile::tempdir().unwrap();
        let media = root.path().join("media");
        let private = root.path().join("private");
        std::fs::create_dir(&media).unwrap();
        std::fs::create_dir(&private).unwrap();
        std::fs::write(private.join("secret.mp4"), b"secret").unwrap();

        let err = validate_path(
            &private.join("secret.mp4").display().to_string(),
            &allow(&media),
        )
        .await
        .unwrap_err();
        assert!(matches!(err, Error::AccessDenied));
    }

    #[tokio::test]
    async fn traversal_is_resolved_before_allow_check() {
        let root = tempfile::tempdir().unwrap();
        let media = root.path().join("media");
        let private = root.path().join("private");
        std::fs::create_dir(&media).unwrap();
        std::fs::create_dir(&private).unwrap();
        std::fs::write(private.join("secret.mp4"), b"secret").unwrap();

        let sneaky = format!("{}/../private/secret.mp4", media.display());
        let err = validate_path(&sneaky, &allow(&media)).await.unwrap_err();
        assert!(matches!(err, Error::AccessDenied));
    }

    #[cfg(unix)]
    #[tokio::test]
    async fn symlink_escape_is_denied() {
        let root = tempfile::tempdir().unwrap();
        let media = root.path().join("media");
        let private = root.path().join("private");
        std::fs::create_dir(&media).unwrap();
        std::fs::create_dir(&private).unwrap();
        std::fs::write(private.join("secret.mp4"), b"secret").unwrap();
        std::os::unix::fs::symlink(private.join("secret.mp4"), media.join("link.mp4")).unwrap();

        let err = validate_path(&media.join("link.mp4").display().to_string(), &allow(&media))
            .await
            .unwrap_err();
        assert!(matches!(err, Error::AccessDenied));
    }

    #[tokio::test]
    async fn directory_is_not_found() {
        let dir = tempfile::tempdir().unwrap();
        let sub = dir.path().join("videos");
        std::fs::create_dir(&sub).unwrap();

        let err = validate_path(&sub.display().to_string(), &allow(dir.path()))
            .await
            .unwrap_err();
        assert!(matches!(err, Error::FileNotFound));
    }

    #[test]
    fn mime_types_from_extension() {
        assert_eq!(guess_mime_type("a.mp4"), "video/mp4");
        assert_eq!(guess_mime_type("a.MKV"), "video/x-matroska");
        assert_eq!(guess_mime_type("a.webm"), "video/webm");
        assert_eq!(guess_mime_type("a.mp3"), "audio/mpeg");
        assert_eq!(guess_mime_type("a.flac"), "audio/flac");
        assert_eq!(guess_mime_type("noext"), "application/octet-stream");
        assert_eq!(guess_mime_type("a.xyz"), "application/octet-stream");
    }
}
