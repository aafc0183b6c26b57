//! Shared test harness for integration tests.
//!
//! Provides [`TestHarness`] which creates an in-memory DB, a temp media
//! directory wired into the allow-list, and the full [`AppContext`]. The
//! [`TestHarness::with_server`] constructor starts Axum on a random port for
//! HTTP-level testing.

use std::net::SocketAddr;
use std::path::{Path, PathBuf};
use std::sync::Arc;

use chanstream::config::Config;
use chanstream::db::pool::{get_conn, init_memory_pool, DbPool, PooledConnection};
use chanstream::db::{channels, Channel, MediaType};
use chanstream::server::{create_router, AppContext};
use chanstream::streaming::AllowList;

/// Test harness wrapping a fully-constructed [`AppContext`] backed by an
/// in-memory database and a temp media directory.
pub struct TestHarness {
    pub ctx: AppContext,
    pub db: DbPool,
    /// Temp directory permitted by the allow-list; deleted on drop.
    pub media_root: tempfile::TempDir,
}

impl TestHarness {
    /// Create a harness whose allow-list permits only a fresh temp directory.
    pub fn new() -> Self {
        let media_root = tempfile::tempdir().expect("failed to create media dir");
        let allowed = vec![media_root.path().display().to_string()];
        Self::with_allowed_paths(media_root, allowed)
    }

    /// Create a harness with an explicit allow-list.
    pub fn with_allowed_paths(media_root: tempfile::TempDir, allowed: Vec<String>) -> Self {
        let db = init_memory_pool().expect("failed to create in-memory pool");
        let allow_list = AllowList::resolve(&allowed, &[]);

        let ctx = AppContext {
            db: db.clone(),
            config: Arc::new(Config::default()),
            allow_list: Arc::new(allow_list),
        };

        Self {
            ctx,
            db,
            media_root,
        }
    }

    /// Start an Axum server on a random port and return the harness together
    /// with the bound socket address.
    pub async fn with_server() -> (Self, SocketAddr) {
        Self::serve(Self::new()).await
    }

    /// Start an Axum server for a harness built with custom allowed paths.
    pub async fn serve(harness: Self) -> (Self, SocketAddr) {
        let app = create_router(harness.ctx.clone());

        let listener = tokio::net::TcpListener::bind("127.0.0.1:0")
            .await
            .expect("failed to bind random port");
        let addr = listener.local_addr().expect("failed to get local addr");

        tokio::spawn(async move {
            axum::serve(listener, app).await.ok();
        });

        (harness, addr)
    }

    /// Get a database connection from the pool.
    pub fn conn(&self) -> PooledConnection {
        get_conn(&self.db).expect("failed to get db connection")
    }

    /// Write `data` to `name` under the allowed media root and return the path.
    pub fn write_media_file(&self, name: &str, data: &[u8]) -> PathBuf {
        let path = self.media_root.path().join(name);
        std::fs::write(&path, data).expect("failed to write media file");
        path
    }

    /// Insert a `local_file` channel pointing at `path`.
    pub fn create_local_channel(&self, name: &str, path: &Path) -> Channel {
        let conn = self.conn();
        channels::create_channel(
            &conn,
            name,
            None,
            MediaType::LocalFile,
            Some(&path.display().to_string()),
        )
        .expect("failed to create channel")
    }

    /// Insert a `url` channel pointing at `url`.
    pub fn create_url_channel(&self, name: &str, url: &str) -> Channel {
        let conn = self.conn();
        channels::create_channel(&conn, name, Some(url), MediaType::Url, None)
            .expect("failed to create channel")
    }
}
