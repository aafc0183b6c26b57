//! Chanstream - channel media server with secure local file streaming
//!
//! This library crate exposes the core functionality for integration testing.

pub mod config;
pub mod db;
pub mod error;
pub mod server;
pub mod streaming;

pub use error::{Error, Result};
