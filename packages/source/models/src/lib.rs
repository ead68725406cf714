#![cfg_attr(feature = "fail-on-warnings", deny(warnings))]
#![warn(clippy::all, clippy::pedantic, clippy::nursery, clippy::cargo)]
#![allow(clippy::multiple_crate_versions, clippy::cargo_common_metadata)]

//! Video record types and the search API's request/response shapes.
//!
//! Every input row and every fetched search result becomes a
//! [`VideoRecord`]. Search and detail lookups exchange [`SearchPage`] and
//! [`VideoDetails`] values, independent of the HTTP client that produced
//! them.

use serde::{Deserialize, Serialize};
use strum_macros::{AsRefStr, Display, EnumString};

/// Where a record entered the working set.
#[derive(
    Debug,
    Clone,
    Copy,
    PartialEq,
    Eq,
    PartialOrd,
    Ord,
    Hash,
    Serialize,
    Deserialize,
    Display,
    EnumString,
    AsRefStr,
)]
#[serde(rename_all = "snake_case")]
#[strum(serialize_all = "snake_case")]
pub enum SourceTag {
    /// Loaded from the input dataset.
    Base,
    /// Fetched from the external search API during this run.
    Fetched,
}

/// A single video with its derived fields.
///
/// Optional fields are `None` when the source did not provide a value;
/// they are never defaulted to zero.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct VideoRecord {
    /// Identifier used for duplicate suppression within a run.
    pub id: String,
    /// Display title as provided by the source.
    pub title: String,
    /// Channel name, if known.
    pub channel: Option<String>,
    /// Human-readable duration (e.g., `"12:38"` or `"SHORTS"`).
    pub duration: Option<String>,
    /// Duration in seconds, if it could be determined.
    pub duration_seconds: Option<u64>,
    /// Human-readable view count (e.g., `"1.3M views"`).
    pub views: Option<String>,
    /// Raw view count, if it could be determined.
    pub view_count: Option<u64>,
    /// Whether the video is a short (under 60 seconds).
    pub is_short: bool,
    /// Thumbnail URL, if one is known.
    pub thumbnail_url: Option<String>,
    /// Title reduced to its content words.
    pub processed_title: String,
    /// Topic labels in taxonomy order. Never empty.
    pub topics: Vec<String>,
    /// Which side of the merge this record came from.
    pub source: SourceTag,
    /// Input columns without a dedicated field, in input column order.
    #[serde(skip)]
    pub extra: Vec<(String, String)>,
}

impl VideoRecord {
    /// Returns the passthrough value for `column`, if the record has one.
    #[must_use]
    pub fn extra_value(&self, column: &str) -> Option<&str> {
        self.extra
            .iter()
            .find(|(name, _)| name == column)
            .map(|(_, value)| value.as_str())
    }
}

/// One result of a keyword search.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SearchItem {
    /// Native video identifier.
    pub video_id: String,
    /// Video title.
    pub title: String,
    /// Name of the uploading channel.
    pub channel_title: String,
    /// Medium-size thumbnail URL, if present.
    pub thumbnail_url: Option<String>,
}

/// One page of keyword search results.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct SearchPage {
    /// Results on this page, in API order.
    pub items: Vec<SearchItem>,
    /// Continuation token; `None` means this is the last page.
    pub next_page_token: Option<String>,
}

/// Duration and statistics for one video.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct VideoDetails {
    /// Native video identifier.
    pub video_id: String,
    /// ISO-8601 duration (e.g., `"PT12M38S"`).
    pub duration: String,
    /// View count, if the statistic is public.
    pub view_count: Option<u64>,
}
