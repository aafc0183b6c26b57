//! Channel model and CRUD operations.

use chrono::Utc;
use rusqlite::Connection;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;
use uuid::Uuid;

use crate::error::{Error, Result};

// ---------------------------------------------------------------------------
// ChannelId
// ---------------------------------------------------------------------------

/// Unique identifier for a channel.
///
/// Newtype over `Uuid`, preventing accidental misuse of raw strings as IDs.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct ChannelId(Uuid);

impl ChannelId {
    /// Create a new random ID.
    #[must_use]
    pub fn new() -> Self {
        Self(Uuid::new_v4())
    }

    /// Return the inner UUID value.
    #[must_use]
    pub fn as_uuid(&self) -> &Uuid {
        &self.0
    }
}

impl Default for ChannelId {
    fn default() -> Self {
        Self::new()
    }
}

impl fmt::Display for ChannelId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl FromStr for ChannelId {
    type Err = uuid::Error;

    fn from_str(s: &str) -> std::result::Result<Self, Self::Err> {
        Uuid::parse_str(s).map(Self)
    }
}

impl From<Uuid> for ChannelId {
    fn from(uuid: Uuid) -> Self {
        Self(uuid)
    }
}

impl From<ChannelId> for Uuid {
    fn from(id: ChannelId) -> Self {
        id.0
    }
}

// ---------------------------------------------------------------------------
// MediaType
// ---------------------------------------------------------------------------

/// How a channel sources its media: a remote URL or a file on local disk.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum MediaType {
    Url,
    LocalFile,
}

impl MediaType {
    /// Stable string form, as stored in the database.
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Url => "url",
            Self::LocalFile => "local_file",
        }
    }

    /// Human-readable label for UI display.
    pub fn label(&self) -> &'static str {
        match self {
            Self::Url => "URL",
            Self::LocalFile => "Local File",
        }
    }

    /// Badge color hint for UI display.
    pub fn color(&self) -> &'static str {
        match self {
            Self::Url => "info",
            Self::LocalFile => "success",
        }
    }
}

impl fmt::Display for MediaType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

// ---------------------------------------------------------------------------
// Channel
// ---------------------------------------------------------------------------

/// A channel row, mapping 1:1 to the `channels` table.
#[derive(Debug, Clone, Serialize)]
pub struct Channel {
    pub id: ChannelId,
    pub name: String,
    pub url: Option<String>,
    pub media_type: MediaType,
    pub local_file_path: Option<String>,
    pub created_at: String,
}

impl Channel {
    pub fn from_row(row: &rusqlite::Row) -> rusqlite::Result<Self> {
        let id: String = row.get(0)?;
        let id = Uuid::parse_str(&id).map_err(|e| {
            rusqlite::Error::FromSqlConversionFailure(0, rusqlite::types::Type::Text, Box::new(e))
        })?;

        let media_type: String = row.get(3)?;
        let media_type = match media_type.as_str() {
            "url" => MediaType::Url,
            "local_file" => MediaType::LocalFile,
            other => {
                return Err(rusqlite::Error::FromSqlConversionFailure(
                    3,
                    rusqlite::types::Type::Text,
                    format!("unknown media type: {other}").into(),
                ))
            }
        };

        Ok(Self {
            id: ChannelId::from(id),
            name: row.get(1)?,
            url: row.get(2)?,
            media_type,
            local_file_path: row.get(4)?,
            created_at: row.get(5)?,
        })
    }
}

// ---------------------------------------------------------------------------
// queries
// ---------------------------------------------------------------------------

const CHANNEL_COLUMNS: &str = "id, name, url, media_type, local_file_path, created_at";

/// Create a new channel.
pub fn create_channel(
    conn: &Connection,
    name: &str,
    url: Option<&str>,
    media_type: MediaType,
    local_file_path: Option<&str>,
) -> Result<Channel> {
    let id = ChannelId::new();
    let created_at = Utc::now().to_rfc3339();

    conn.execute(
        "INSERT INTO channels (id, name, url, media_type, local_file_path, created_at)
         VALUES (?1, ?2, ?3, ?4, ?5, ?6)",
        rusqlite::params![
            id.to_string(),
            name,
            url,
            media_type.as_str(),
            local_file_path,
            created_at
        ],
    )
    .map_err(|e| Error::database(e.to_string()))?;

    Ok(Channel {
        id,
        name: name.to_string(),
        url: url.map(String::from),
        media_type,
        local_file_path: local_file_path.map(String::from),
        created_at,
    })
}

/// Get a channel by ID.
pub fn get_channel(conn: &Connection, id: ChannelId) -> Result<Option<Channel>> {
    let result = conn.query_row(
        &format!("SELECT {CHANNEL_COLUMNS} FROM channels WHERE id = ?1"),
        [id.to_string()],
        Channel::from_row,
    );
    match result {
        Ok(c) => Ok(Some(c)),
        Err(rusqlite::Error::QueryReturnedNoRows) => Ok(None),
        Err(e) => Err(Error::database(e.to_string())),
    }
}

/// List all channels ordered by name.
pub fn list_channels(conn: &Connection) -> Result<Vec<Channel>> {
    let mut stmt = conn
        .prepare(&format!(
            "SELECT {CHANNEL_COLUMNS} FROM channels ORDER BY name"
        ))
        .map_err(|e| Error::database(e.to_string()))?;
    let rows = stmt
        .query_map([], Channel::from_row)
        .map_err(|e| Error::database(e.to_string()))?
        .collect::<std::result::Result<Vec<_>, _>>()
        .map_err(|e| Error::database(e.to_string()))?;
    Ok(rows)
}

/// Update a channel's name, url, media type, and local file path.
pub fn update_channel(
    conn: &Connection,
    id: ChannelId,
    name: &str,
    url: Option<&str>,
    media_type: MediaType,
    local_file_path: Option<&str>,
) -> Result<bool> {
    let n = conn
        .execute(
            "UPDATE channels SET name = ?1, url = ?2, media_type = ?3, local_file_path = ?4
             WHERE id = ?5",
            rusqlite::params![name, url, media_type.as_str(), local_file_path, id.to_string()],
        )
        .map_err(|e| Error::database(e.to_string()))?;
    Ok(n > 0)
}

/// Delete a channel.
pub fn delete_channel(conn: &Connection, id: ChannelId) -> Result<bool> {
    let n = conn
        .execute("DELETE FROM channels WHERE id = ?1", [id.to_string()])
        .map_err(|e| Error::database(e.to_string()))?;
    Ok(n > 0)
}
