//! Allowed base directories for local file serving.

use std::path::{Path, PathBuf};

/// Immutable set of base directories within which local files may be served.
///
/// Resolved once at startup from configuration and shared read-only across
/// requests. Changing the list means rebuilding the snapshot and restarting
/// the server.
#[derive(Debug, Clone)]
pub struct AllowList {
    bases: Vec<PathBuf>,
}

impl AllowList {
    /// Build the allow-list from configured entries, falling back to
    /// `defaults` when no usable configured entry remains.
    ///
    /// Entries are trimmed and empty ones dropped. A configured list with at
    /// least one usable entry replaces the defaults entirely. Entries that
    /// exist on disk are resolved to their canonical form (symlinks and `..`
    /// resolved); nonexistent ones are kept literally so volumes mounted
    /// later still match. Duplicates are removed.
    pub fn resolve(configured: &[String], defaults: &[&str]) -> Self {
        let entries: Vec<&str> = configured
            .iter()
            .map(|s| s.trim())
            .filter(|s| !s.is_empty())
            .collect();

        let chosen: Vec<&str> = if entries.is_empty() {
            defaults
                .iter()
                .map(|s| s.trim())
                .filter(|s| !s.is_empty())
                .collect()
        } else {
            entries
        };

        let mut bases: Vec<PathBuf> = Vec::with_capacity(chosen.len());
        for entry in chosen {
            let path = Path::new(entry);
            let base = match path.canonicalize() {
                Ok(canonical) => canonical,
                // Not mounted yet; keep the configured path as-is.
                Err(_) => path.to_path_buf(),
            };
            if !bases.contains(&base) {
                bases.push(base);
            }
        }

        Self { bases }
    }

    /// Whether `canonical` lies under one of the allowed bases.
    ///
    /// Matching is path-segment-aware: `/media2/file` does not match an
    /// allowed base `/media` even though it shares the string prefix.
    pub fn permits(&self, canonical: &Path) -> bool {
        self.bases.iter().any(|base| canonical.starts_with(base))
    }

    /// The resolved base directories.
    pub fn bases(&self) -> &[PathBuf] {
        &self.bases
    }
}
