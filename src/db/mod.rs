//! SQLite-backed persistence: connection pooling, embedded migrations,
//! and channel storage.

pub mod channels;
pub mod migrations;
pub mod pool;

pub use channels::{Channel, ChannelId, MediaType};
pub use pool::{get_conn, init_memory_pool, init_pool, DbPool, PooledConnection};
