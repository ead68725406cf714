#![cfg_attr(feature = "fail-on-warnings", deny(warnings))]
#![warn(clippy::all, clippy::pedantic, clippy::nursery, clippy::cargo)]
#![allow(clippy::multiple_crate_versions)]

//! External video source trait and display formatting.
//!
//! A [`VideoSource`] answers two questions: which videos match a keyword
//! query (one page at a time), and what are the duration and view count of
//! a set of videos. [`youtube::YouTubeClient`] implements it against the
//! `YouTube` Data API v3; tests substitute an in-memory source.

pub mod parsing;
pub mod progress;
pub mod youtube;

use std::collections::BTreeMap;

use async_trait::async_trait;
use disc_clinic_source_models::{SearchPage, VideoDetails};

/// Errors that can occur while talking to a video source.
#[derive(Debug, thiserror::Error)]
pub enum SourceError {
    /// HTTP request failed.
    #[error("HTTP request failed: {0}")]
    Http(#[from] reqwest::Error),

    /// JSON parsing failed.
    #[error("JSON parse error: {0}")]
    Json(#[from] serde_json::Error),

    /// The API answered with an error status or error body.
    #[error("API error: {message}")]
    Api {
        /// Description returned by the API, or the HTTP status.
        message: String,
    },

    /// No API key was configured.
    #[error("Missing API key: set --api-key or {env_var}")]
    MissingCredential {
        /// Environment variable that would have supplied the key.
        env_var: &'static str,
    },
}

/// A paginated keyword search plus a batched detail lookup.
///
/// Implementations make exactly one request per call and never retry.
#[async_trait]
pub trait VideoSource: Send + Sync {
    /// Returns a short identifier for log messages (e.g., `"youtube"`).
    fn name(&self) -> &str;

    /// Fetches one page of search results for `query`.
    ///
    /// `page_token` is the continuation token from the previous page, or
    /// `None` for the first page.
    ///
    /// # Errors
    ///
    /// Returns [`SourceError`] if the request fails or the API reports an
    /// error.
    async fn fetch_batch(
        &self,
        query: &str,
        page_token: Option<&str>,
    ) -> Result<SearchPage, SourceError>;

    /// Fetches duration and statistics for `ids`, keyed by video id.
    ///
    /// Ids the API does not know are absent from the result.
    ///
    /// # Errors
    ///
    /// Returns [`SourceError`] if the request fails or the API reports an
    /// error.
    async fn fetch_details(
        &self,
        ids: &[String],
    ) -> Result<BTreeMap<String, VideoDetails>, SourceError>;
}
