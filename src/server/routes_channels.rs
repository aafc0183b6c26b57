//! Channel CRUD and streaming route handlers.

use axum::extract::{Path, State};
use axum::http::{header, HeaderMap, StatusCode};
use axum::response::{IntoResponse, Redirect, Response};
use axum::Json;
use serde::{Deserialize, Serialize};

use crate::db::{self, Channel, ChannelId, MediaType};
use crate::error::{Error, Result};
use crate::server::AppContext;
use crate::streaming;

/// Request body for creating a channel.
#[derive(Debug, Deserialize)]
pub struct CreateChannelRequest {
    pub name: String,
    pub url: Option<String>,
    #[serde(default)]
    pub media_type: Option<MediaType>,
    pub local_file_path: Option<String>,
}

/// Request body for updating a channel; absent fields keep their value.
#[derive(Debug, Deserialize)]
pub struct UpdateChannelRequest {
    pub name: Option<String>,
    pub url: Option<String>,
    pub media_type: Option<MediaType>,
    pub local_file_path: Option<String>,
}

/// Channel response.
#[derive(Debug, Serialize)]
pub struct ChannelResponse {
    pub id: String,
    pub name: String,
    pub url: Option<String>,
    pub media_type: MediaType,
    pub media_type_label: &'static str,
    pub media_type_color: &'static str,
    pub local_file_path: Option<String>,
    pub created_at: String,
}

impl ChannelResponse {
    fn from_model(channel: &Channel) -> Self {
        Self {
            id: channel.id.to_string(),
            name: channel.name.clone(),
            url: channel.url.clone(),
            media_type: channel.media_type,
            media_type_label: channel.media_type.label(),
            media_type_color: channel.media_type.color(),
            local_file_path: channel.local_file_path.clone(),
            created_at: channel.created_at.clone(),
        }
    }
}

/// Check that a channel's media source matches its media type.
fn validate_media_source(
    media_type: MediaType,
    url: Option<&str>,
    local_file_path: Option<&str>,
) -> Result<()> {
    match media_type {
        MediaType::Url => {
            if url.map_or(true, |u| u.trim().is_empty()) {
                return Err(Error::Validation(
                    "url is required for url channels".into(),
                ));
            }
        }
        MediaType::LocalFile => {
            if local_file_path.map_or(true, |p| p.trim().is_empty()) {
                return Err(Error::Validation(
                    "local_file_path is required for local_file channels".into(),
                ));
            }
        }
    }
    Ok(())
}

fn parse_channel_id(id: &str) -> Result<ChannelId> {
    id.parse()
        .map_err(|_| Error::Validation("Invalid channel ID".into()))
}

/// GET /api/channels
pub async fn list_channels(State(ctx): State<AppContext>) -> Result<Json<Vec<ChannelResponse>>> {
    let conn = db::get_conn(&ctx.db)?;
    let channels = db::channels::list_channels(&conn)?;
    let responses: Vec<ChannelResponse> =
        channels.iter().map(ChannelResponse::from_model).collect();
    Ok(Json(responses))
}

/// POST /api/channels
pub async fn create_channel(
    State(ctx): State<AppContext>,
    Json(payload): Json<CreateChannelRequest>,
) -> Result<impl IntoResponse> {
    if payload.name.trim().is_empty() {
        return Err(Error::Validation("name is required".into()));
    }

    let media_type = payload.media_type.unwrap_or(MediaType::Url);
    validate_media_source(
        media_type,
        payload.url.as_deref(),
        payload.local_file_path.as_deref(),
    )?;

    let conn = db::get_conn(&ctx.db)?;
    let channel = db::channels::create_channel(
        &conn,
        payload.name.trim(),
        payload.url.as_deref(),
        media_type,
        payload.local_file_path.as_deref(),
    )?;

    tracing::info!("Created channel {} ({})", channel.name, channel.id);

    Ok((
        StatusCode::CREATED,
        Json(ChannelResponse::from_model(&channel)),
    ))
}

/// GET /api/channels/{id}
pub async fn get_channel(
    State(ctx): State<AppContext>,
    Path(id): Path<String>,
) -> Result<Json<ChannelResponse>> {
    let channel_id = parse_channel_id(&id)?;

    let conn = db::get_conn(&ctx.db)?;
    let channel = db::channels::get_channel(&conn, channel_id)?
        .ok_or_else(|| Error::not_found("channel", channel_id))?;

    Ok(Json(ChannelResponse::from_model(&channel)))
}

/// PUT /api/channels/{id}
pub async fn update_channel(
    State(ctx): State<AppContext>,
    Path(id): Path<String>,
    Json(payload): Json<UpdateChannelRequest>,
) -> Result<Json<ChannelResponse>> {
    let channel_id = parse_channel_id(&id)?;

    let conn = db::get_conn(&ctx.db)?;
    let current = db::channels::get_channel(&conn, channel_id)?
        .ok_or_else(|| Error::not_found("channel", channel_id))?;

    let name = payload.name.unwrap_or(current.name);
    if name.trim().is_empty() {
        return Err(Error::Validation("name must not be empty".into()));
    }
    let url = payload.url.or(current.url);
    let media_type = payload.media_type.unwrap_or(current.media_type);
    let local_file_path = payload.local_file_path.or(current.local_file_path);

    validate_media_source(media_type, url.as_deref(), local_file_path.as_deref())?;

    db::channels::update_channel(
        &conn,
        channel_id,
        name.trim(),
        url.as_deref(),
        media_type,
        local_file_path.as_deref(),
    )?;

    let updated = db::channels::get_channel(&conn, channel_id)?
        .ok_or_else(|| Error::not_found("channel", channel_id))?;

    Ok(Json(ChannelResponse::from_model(&updated)))
}

/// DELETE /api/channels/{id}
pub async fn delete_channel(
    State(ctx): State<AppContext>,
    Path(id): Path<String>,
) -> Result<impl IntoResponse> {
    let channel_id = parse_channel_id(&id)?;

    let conn = db::get_conn(&ctx.db)?;
    let deleted = db::channels::delete_channel(&conn, channel_id)?;

    if !deleted {
        return Err(Error::not_found("channel", channel_id));
    }

    tracing::info!("Deleted channel {channel_id}");

    Ok(StatusCode::NO_CONTENT)
}

/// GET /api/channels/{id}/stream
///
/// For `url` channels, redirects the player to the remote source. For
/// `local_file` channels, streams the file from disk with range support.
pub async fn stream_channel(
    State(ctx): State<AppContext>,
    Path(id): Path<String>,
    headers: HeaderMap,
) -> Result<Response> {
    let channel_id = parse_channel_id(&id)?;

    let conn = db::get_conn(&ctx.db)?;
    let channel = db::channels::get_channel(&conn, channel_id)?
        .ok_or_else(|| Error::not_found("channel", channel_id))?;

    match channel.media_type {
        MediaType::Url => {
            let url = channel
                .url
                .ok_or_else(|| Error::not_found("stream URL for channel", channel_id))?;
            Ok(Redirect::temporary(&url).into_response())
        }
        MediaType::LocalFile => {
            let path = channel.local_file_path.ok_or(Error::FileNotFound)?;
            let range = headers.get(header::RANGE).and_then(|h| h.to_str().ok());
            streaming::serve_local_file(&path, range, &ctx.allow_list).await
        }
    }
}
