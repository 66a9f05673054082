//! YouTube Data API v3 adapter.
//!
//! Implements [`SourceReader`] over `playlistItems` and [`MetadataResolver`]
//! over `videos`. Endpoint and key are explicit client state so tests and
//! mirrors can point it elsewhere.

use std::time::Duration;

use async_trait::async_trait;
use reqwest::{Client, StatusCode};
use serde::Deserialize;

use crate::{
    duration,
    error::{ResolveError, SourceError},
    resolver::MetadataResolver,
    source::{Page, SourceReader},
    types::{Definition, VideoMetadata, VideoReference},
};

pub const DEFAULT_BASE_URL: &str = "https://www.googleapis.com/youtube/v3";

/// Largest page size the playlistItems endpoint accepts.
pub const MAX_PAGE_SIZE: u32 = 50;

pub const DEFAULT_REQUEST_TIMEOUT_SECS: u64 = 30;

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct PlaylistItemsResponse {
    #[serde(default)]
    items: Vec<PlaylistItem>,
    next_page_token: Option<String>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct PlaylistItem {
    content_details: PlaylistItemDetails,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct PlaylistItemDetails {
    video_id: String,
}

#[derive(Debug, Deserialize)]
struct VideoListResponse {
    #[serde(default)]
    items: Vec<VideoItem>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct VideoItem {
    content_details: VideoDetails,
    status: VideoStatus,
}

#[derive(Debug, Deserialize)]
struct VideoDetails {
    duration: String,
    definition: Option<Definition>,
}

#[derive(Debug, Deserialize)]
struct VideoStatus {
    #[serde(default)]
    embeddable: bool,
}

fn parse_page(body: &str) -> Result<Page, serde_json::Error> {
    let response: PlaylistItemsResponse = serde_json::from_str(body)?;
    Ok(Page {
        items: response
            .items
            .into_iter()
            .map(|item| VideoReference::new(item.content_details.video_id))
            .collect(),
        next_token: response.next_page_token,
    })
}

fn parse_video(id: &str, body: &str) -> Result<VideoMetadata, ResolveError> {
    let response: VideoListResponse =
        serde_json::from_str(body).map_err(|e| ResolveError::MalformedResponse {
            id: id.to_string(),
            reason: e.to_string(),
        })?;

    let item = response
        .items
        .into_iter()
        .next()
        .ok_or_else(|| ResolveError::NotFound { id: id.to_string() })?;

    let duration_seconds = duration::decode(&item.content_details.duration)
        .map_err(|e| ResolveError::invalid_duration(id, e))?;

    Ok(VideoMetadata {
        id: id.to_string(),
        duration_seconds,
        embeddable: item.status.embeddable,
        definition: item.content_details.definition,
    })
}

#[derive(Debug, Clone)]
pub struct YoutubeClient {
    client: Client,
    base_url: String,
    api_key: String,
    page_size: u32,
}

impl YoutubeClient {
    pub fn new(api_key: impl Into<String>) -> Result<Self, reqwest::Error> {
        let client = Client::builder()
            .timeout(Duration::from_secs(DEFAULT_REQUEST_TIMEOUT_SECS))
            .build()?;
        Ok(Self::with_client(client, api_key))
    }

    /// Use an existing `reqwest::Client`, e.g. to share a connection pool.
    pub fn with_client(client: Client, api_key: impl Into<String>) -> Self {
        Self {
            client,
            base_url: DEFAULT_BASE_URL.to_string(),
            api_key: api_key.into(),
            page_size: MAX_PAGE_SIZE,
        }
    }

    pub fn with_base_url(mut self, base_url: impl Into<String>) -> Self {
        self.base_url = base_url.into().trim_end_matches('/').to_string();
        self
    }

    pub fn with_page_size(mut self, page_size: u32) -> Self {
        self.page_size = page_size.clamp(1, MAX_PAGE_SIZE);
        self
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    async fn get_text(
        &self,
        endpoint: &str,
        query: &[(&str, &str)],
    ) -> Result<(StatusCode, String), reqwest::Error> {
        let response = self
            .client
            .get(format!("{}/{}", self.base_url, endpoint))
            .query(query)
            .query(&[("key", self.api_key.as_str())])
            .send()
            .await?;
        let status = response.status();
        let body = response.text().await?;
        Ok((status, body))
    }
}

#[async_trait]
impl SourceReader for YoutubeClient {
    async fn fetch_page(
        &self,
        source_id: &str,
        token: Option<&str>,
    ) -> Result<Page, SourceError> {
        let fetch_error = |reason: String| SourceError::Fetch {
            source_id: source_id.to_string(),
            page: 0,
            reason,
        };

        let page_size = self.page_size.to_string();
        let mut query = vec![
            ("part", "contentDetails"),
            ("playlistId", source_id),
            ("maxResults", page_size.as_str()),
        ];
        if let Some(token) = token {
            query.push(("pageToken", token));
        }

        let (status, body) = self
            .get_text("playlistItems", &query)
            .await
            .map_err(|e| fetch_error(e.to_string()))?;

        if !status.is_success() {
            return Err(fetch_error(format!("HTTP {status}")));
        }

        parse_page(&body).map_err(|e| fetch_error(format!("invalid response: {e}")))
    }
}

#[async_trait]
impl MetadataResolver for YoutubeClient {
    async fn resolve(&self, id: &str) -> Result<VideoMetadata, ResolveError> {
        let query = [("part", "contentDetails,status"), ("id", id)];

        let (status, body) = self.get_text("videos", &query).await.map_err(|e| {
            ResolveError::TransportFailure {
                id: id.to_string(),
                reason: e.to_string(),
            }
        })?;

        if status == StatusCode::NOT_FOUND {
            return Err(ResolveError::NotFound { id: id.to_string() });
        }
        if !status.is_success() {
            return Err(ResolveError::TransportFailure {
                id: id.to_string(),
                reason: format!("HTTP {status}"),
            });
        }

        parse_video(id, &body)
    }
}
