#![cfg_attr(feature = "fail-on-warnings", deny(warnings))]
#![warn(clippy::all, clippy::pedantic, clippy::nursery, clippy::cargo)]
#![allow(clippy::multiple_crate_versions, clippy::cargo_common_metadata)]

//! Run configuration, fetch outcome, and topic report types.

use std::time::Duration;

use chrono::{DateTime, Utc};
use serde::ser::{SerializeMap, Serializer};
use serde::{Deserialize, Serialize};
use strum_macros::{AsRefStr, Display, EnumString};

/// Default search query.
pub const DEFAULT_QUERY: &str = "disc golf clinic";

/// Default combined dataset size.
pub const DEFAULT_TARGET: usize = 500;

/// Default results requested per search page.
pub const DEFAULT_PAGE_SIZE: u32 = 50;

/// Default pause between successful search pages.
pub const DEFAULT_DELAY_MS: u64 = 1000;

/// Default number of clusters for the cluster tagger.
pub const DEFAULT_CLUSTERS: usize = 10;

/// Which tagging strategy a run uses.
#[derive(
    Debug,
    Clone,
    Copy,
    Default,
    PartialEq,
    Eq,
    Serialize,
    Deserialize,
    Display,
    EnumString,
    AsRefStr,
)]
#[serde(rename_all = "snake_case")]
#[strum(serialize_all = "snake_case")]
pub enum TaggerKind {
    /// Keyword substring matching against the taxonomy.
    #[default]
    Keyword,
    /// Keyword matching, then nearest TF-IDF cluster for unmatched titles.
    Cluster,
}

/// Settings for the fetch loop and tagging. Static for the run.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ExpandConfig {
    /// Search query sent to the video source.
    pub query: String,
    /// Combined dataset size to stop at.
    pub target: usize,
    /// Results requested per search page.
    pub page_size: u32,
    /// Pause between successful pages, in milliseconds.
    pub delay_ms: u64,
    /// Tagging strategy.
    pub tagger: TaggerKind,
    /// Cluster count for [`TaggerKind::Cluster`].
    pub clusters: usize,
}

impl ExpandConfig {
    /// Returns the inter-page delay.
    #[must_use]
    pub const fn delay(&self) -> Duration {
        Duration::from_millis(self.delay_ms)
    }
}

impl Default for ExpandConfig {
    fn default() -> Self {
        Self {
            query: DEFAULT_QUERY.to_string(),
            target: DEFAULT_TARGET,
            page_size: DEFAULT_PAGE_SIZE,
            delay_ms: DEFAULT_DELAY_MS,
            tagger: TaggerKind::default(),
            clusters: DEFAULT_CLUSTERS,
        }
    }
}

/// Why the fetch loop ended.
#[derive(
    Debug,
    Clone,
    Copy,
    PartialEq,
    Eq,
    Serialize,
    Deserialize,
    Display,
    EnumString,
    AsRefStr,
)]
#[serde(rename_all = "snake_case")]
#[strum(serialize_all = "snake_case")]
pub enum StopReason {
    /// Base plus fetched records reached the target.
    TargetReached,
    /// The base dataset already met the target; nothing was requested.
    AlreadyAtTarget,
    /// A search page came back empty.
    Exhausted,
    /// A search page had no continuation token.
    NoMorePages,
    /// A request failed; the warning holds the message.
    ApiError,
    /// Fetching was not requested for this run.
    Skipped,
}

/// What the fetch loop did.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FetchSummary {
    /// Why the loop ended.
    pub stop_reason: StopReason,
    /// Search pages successfully retrieved.
    pub pages_fetched: u32,
    /// Records added by the loop.
    pub fetched_count: usize,
    /// Message of the error that ended the loop, if any.
    pub warning: Option<String>,
}

impl FetchSummary {
    /// Summary for a run that made no requests.
    #[must_use]
    pub const fn skipped() -> Self {
        Self {
            stop_reason: StopReason::Skipped,
            pages_fetched: 0,
            fetched_count: 0,
            warning: None,
        }
    }
}

/// Topic occurrence counts in report order.
///
/// Serializes as a JSON object whose key order is the report order.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct TopicCounts(pub Vec<(String, usize)>);

impl TopicCounts {
    /// Returns the count for `topic`, if it occurred.
    #[must_use]
    pub fn get(&self, topic: &str) -> Option<usize> {
        self.0
            .iter()
            .find(|(name, _)| name == topic)
            .map(|(_, count)| *count)
    }

    /// Topic names in report order.
    #[must_use]
    pub fn names(&self) -> Vec<&str> {
        self.0.iter().map(|(name, _)| name.as_str()).collect()
    }

    /// Iterates `(topic, count)` pairs in report order.
    pub fn entries(&self) -> impl Iterator<Item = (&str, usize)> {
        self.0.iter().map(|(name, count)| (name.as_str(), *count))
    }

    /// Number of distinct topics.
    #[must_use]
    pub fn len(&self) -> usize {
        self.0.len()
    }

    /// Returns `true` if no topic occurred.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    /// Sum of all counts, equal to the number of (record, topic) pairs.
    #[must_use]
    pub fn total(&self) -> usize {
        self.0.iter().map(|(_, count)| count).sum()
    }
}

impl Serialize for TopicCounts {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        let mut map = serializer.serialize_map(Some(self.0.len()))?;
        for (topic, count) in &self.0 {
            map.serialize_entry(topic, count)?;
        }
        map.end()
    }
}

/// Aggregate topic counts for one run. Built once, never mutated.
#[derive(Debug, Clone, Serialize)]
pub struct TopicReport {
    /// Topic occurrence counts, highest first.
    pub topics: TopicCounts,
    /// Records in the combined dataset.
    pub video_count: usize,
    /// Distinct topics that occurred.
    pub topic_count: usize,
    /// Records from the input dataset.
    pub base_count: usize,
    /// Records added by the fetch loop.
    pub fetched_count: usize,
    /// What the fetch loop did.
    pub fetch: FetchSummary,
    /// When the report was built.
    pub generated_at: DateTime<Utc>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults_match_documented_values() {
        let config = ExpandConfig::default();
        assert_eq!(config.query, "disc golf clinic");
        assert_eq!(config.target, 500);
        assert_eq!(config.page_size, 50);
        assert_eq!(config.delay(), Duration::from_secs(1));
        assert_eq!(config.tagger, TaggerKind::Keyword);
        assert_eq!(config.clusters, 10);
    }

    #[test]
    fn tagger_kind_parses_from_cli_strings() {
        assert_eq!("cluster".parse::<TaggerKind>().unwrap(), TaggerKind::Cluster);
        assert_eq!(TaggerKind::Keyword.to_string(), "keyword");
    }

    #[test]
    fn topic_counts_serialize_in_report_order() {
        let counts = TopicCounts(vec![
            ("putting".to_string(), 3),
            ("general".to_string(), 2),
            ("angle".to_string(), 1),
        ]);

        let json = serde_json::to_string(&counts).unwrap();
        assert_eq!(json, r#"{"putting":3,"general":2,"angle":1}"#);
        assert_eq!(counts.total(), 6);
        assert_eq!(counts.get("general"), Some(2));
        assert_eq!(counts.get("driving"), None);
    }

    #[test]
    fn report_uses_snake_case_keys() {
        let report = TopicReport {
            topics: TopicCounts(vec![("putting".to_string(), 1)]),
            video_count: 1,
            topic_count: 1,
            base_count: 1,
            fetched_count: 0,
            fetch: FetchSummary::skipped(),
            generated_at: DateTime::<Utc>::UNIX_EPOCH,
        };

        let json = serde_json::to_value(&report).unwrap();
        assert_eq!(json["video_count"], 1);
        assert_eq!(json["fetch"]["stop_reason"], "skipped");
        assert!(json["fetch"]["warning"].is_null());
        assert_eq!(json["topics"]["putting"], 1);
    }
}
