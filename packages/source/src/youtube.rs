//! `YouTube` Data API v3 client.
//!
//! Two endpoints are used: `search` for one page of keyword results, and
//! `videos` for duration and view statistics of up to 50 ids at a time.
//! Each call is a single request; there is no retry.

use std::collections::BTreeMap;

use async_trait::async_trait;
use disc_clinic_source_models::{SearchItem, SearchPage, VideoDetails};
use serde::Deserialize;
use serde::de::DeserializeOwned;

use crate::{SourceError, VideoSource};

/// Keyword search endpoint.
pub const SEARCH_URL: &str = "https://www.googleapis.com/youtube/v3/search";

/// Video details endpoint.
pub const VIDEOS_URL: &str = "https://www.googleapis.com/youtube/v3/videos";

/// Environment variable holding the API key.
pub const API_KEY_ENV: &str = "YOUTUBE_API_KEY";

/// Largest page size the search endpoint accepts.
pub const MAX_PAGE_SIZE: u32 = 50;

/// The "Sports" video category.
const SPORTS_CATEGORY_ID: &str = "17";

/// Client for the search and videos endpoints.
pub struct YouTubeClient {
    client: reqwest::Client,
    api_key: String,
    page_size: u32,
}

impl YouTubeClient {
    /// Creates a client. `page_size` is clamped to `1..=50`.
    #[must_use]
    pub fn new(api_key: impl Into<String>, page_size: u32) -> Self {
        Self {
            client: reqwest::Client::new(),
            api_key: api_key.into(),
            page_size: page_size.clamp(1, MAX_PAGE_SIZE),
        }
    }

    /// Creates a client from an explicit key, falling back to
    /// [`API_KEY_ENV`].
    ///
    /// # Errors
    ///
    /// Returns [`SourceError::MissingCredential`] if neither supplies a
    /// non-empty key.
    pub fn from_key_or_env(api_key: Option<&str>, page_size: u32) -> Result<Self, SourceError> {
        let key = api_key
            .map(str::to_string)
            .or_else(|| std::env::var(API_KEY_ENV).ok())
            .filter(|key| !key.trim().is_empty())
            .ok_or(SourceError::MissingCredential {
                env_var: API_KEY_ENV,
            })?;

        Ok(Self::new(key, page_size))
    }

    /// Returns the configured page size.
    #[must_use]
    pub const fn page_size(&self) -> u32 {
        self.page_size
    }

    async fn get_text(&self, url: &str, params: &[(&str, String)]) -> Result<String, SourceError> {
        let response = self.client.get(url).query(params).send().await?;
        let status = response.status();
        let text = response.text().await?;

        if !status.is_success() {
            let message = serde_json::from_str::<ErrorEnvelope>(&text)
                .ok()
                .and_then(|envelope| envelope.error)
                .map_or_else(|| format!("HTTP {status}"), |error| error.describe());
            return Err(SourceError::Api { message });
        }

        Ok(text)
    }
}

#[async_trait]
impl VideoSource for YouTubeClient {
    fn name(&self) -> &'static str {
        "youtube"
    }

    async fn fetch_batch(
        &self,
        query: &str,
        page_token: Option<&str>,
    ) -> Result<SearchPage, SourceError> {
        let mut params = vec![
            ("key", self.api_key.clone()),
            ("q", query.to_string()),
            ("part", "snippet".to_string()),
            ("maxResults", self.page_size.to_string()),
            ("type", "video".to_string()),
            ("videoCategoryId", SPORTS_CATEGORY_ID.to_string()),
            ("videoEmbeddable", "true".to_string()),
            ("relevanceLanguage", "en".to_string()),
        ];
        if let Some(token) = page_token {
            params.push(("pageToken", token.to_string()));
        }

        log::debug!("YouTube search q={query:?} pageToken={page_token:?}");
        let text = self.get_text(SEARCH_URL, &params).await?;
        parse_search_response(&text)
    }

    async fn fetch_details(
        &self,
        ids: &[String],
    ) -> Result<BTreeMap<String, VideoDetails>, SourceError> {
        if ids.is_empty() {
            return Ok(BTreeMap::new());
        }

        let params = [
            ("key", self.api_key.clone()),
            ("id", ids.join(",")),
            ("part", "contentDetails,statistics".to_string()),
        ];

        log::debug!("YouTube details for {} ids", ids.len());
        let text = self.get_text(VIDEOS_URL, &params).await?;
        parse_videos_response(&text)
    }
}

/// Parses a `search` response body into a [`SearchPage`].
///
/// Items without a video id (channels, playlists) are skipped.
///
/// # Errors
///
/// Returns [`SourceError::Api`] if the body carries an `error` object, or
/// [`SourceError::Json`] if it is not valid JSON.
pub fn parse_search_response(text: &str) -> Result<SearchPage, SourceError> {
    let response: SearchResponse = parse_body(text)?;

    let items = response
        .items
        .into_iter()
        .filter_map(|result| {
            let video_id = result.id.and_then(|id| id.video_id)?;
            let snippet = result.snippet.unwrap_or_default();
            Some(SearchItem {
                video_id,
                title: unescape_html(&snippet.title),
                channel_title: unescape_html(&snippet.channel_title),
                thumbnail_url: snippet
                    .thumbnails
                    .and_then(|thumbnails| thumbnails.medium)
                    .map(|thumbnail| thumbnail.url),
            })
        })
        .collect();

    Ok(SearchPage {
        items,
        next_page_token: response.next_page_token.filter(|token| !token.is_empty()),
    })
}

/// Parses a `videos` response body into details keyed by video id.
///
/// Items without `contentDetails` are omitted. A missing or non-numeric
/// `viewCount` yields `None`.
///
/// # Errors
///
/// Returns [`SourceError::Api`] if the body carries an `error` object, or
/// [`SourceError::Json`] if it is not valid JSON.
pub fn parse_videos_response(text: &str) -> Result<BTreeMap<String, VideoDetails>, SourceError> {
    let response: VideosResponse = parse_body(text)?;

    let mut details = BTreeMap::new();
    for item in response.items {
        let Some(content) = item.content_details else {
            log::debug!("Video {} has no contentDetails, skipping", item.id);
            continue;
        };
        let view_count = item
            .statistics
            .and_then(|stats| stats.view_count)
            .and_then(|count| count.parse::<u64>().ok());

        details.insert(
            item.id.clone(),
            VideoDetails {
                video_id: item.id,
                duration: content.duration,
                view_count,
            },
        );
    }

    Ok(details)
}

/// Deserializes `text`, turning an embedded `error` object into
/// [`SourceError::Api`].
fn parse_body<T: DeserializeOwned + HasError>(text: &str) -> Result<T, SourceError> {
    let mut body: T = serde_json::from_str(text)?;
    if let Some(error) = body.take_error() {
        return Err(SourceError::Api {
            message: error.describe(),
        });
    }
    Ok(body)
}

/// Decodes the HTML entities the API uses in titles.
fn unescape_html(s: &str) -> String {
    if !s.contains('&') {
        return s.to_string();
    }
    s.replace("&quot;", "\"")
        .replace("&#39;", "'")
        .replace("&lt;", "<")
        .replace("&gt;", ">")
        .replace("&amp;", "&")
}

trait HasError {
    fn take_error(&mut self) -> Option<ApiErrorDetail>;
}

#[derive(Debug, Deserialize)]
struct ErrorEnvelope {
    error: Option<ApiErrorDetail>,
}

#[derive(Debug, Deserialize)]
struct ApiErrorDetail {
    code: Option<u16>,
    #[serde(default)]
    message: String,
}

impl ApiErrorDetail {
    fn describe(&self) -> String {
        match self.code {
            Some(code) => format!("{code}: {}", self.message),
            None => self.message.clone(),
        }
    }
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct SearchResponse {
    #[serde(default)]
    items: Vec<SearchResult>,
    next_page_token: Option<String>,
    error: Option<ApiErrorDetail>,
}

impl HasError for SearchResponse {
    fn take_error(&mut self) -> Option<ApiErrorDetail> {
        self.error.take()
    }
}

#[derive(Debug, Deserialize)]
struct SearchResult {
    id: Option<ResultId>,
    snippet: Option<Snippet>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct ResultId {
    video_id: Option<String>,
}

#[derive(Debug, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
struct Snippet {
    #[serde(default)]
    title: String,
    #[serde(default)]
    channel_title: String,
    thumbnails: Option<Thumbnails>,
}

#[derive(Debug, Deserialize)]
struct Thumbnails {
    medium: Option<Thumbnail>,
}

#[derive(Debug, Deserialize)]
struct Thumbnail {
    url: String,
}

#[derive(Debug, Deserialize)]
struct VideosResponse {
    #[serde(default)]
    items: Vec<VideoItem>,
    error: Option<ApiErrorDetail>,
}

impl HasError for VideosResponse {
    fn take_error(&mut self) -> Option<ApiErrorDetail> {
        self.error.take()
    }
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct VideoItem {
    id: String,
    content_details: Option<ContentDetails>,
    statistics: Option<Statistics>,
}

#[derive(Debug, Deserialize)]
struct ContentDetails {
    #[serde(default)]
    duration: String,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct Statistics {
    view_count: Option<String>,
}
