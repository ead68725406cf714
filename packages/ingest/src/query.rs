//! Catalog filtering and sorting over tagged records.

use std::cmp::Ordering;
use std::collections::BTreeSet;

use disc_clinic_source_models::VideoRecord;
use serde::{Deserialize, Serialize};
use strum_macros::{AsRefStr, Display, EnumString};

/// Record filters. Every set field must match.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct FilterOptions {
    /// Case-insensitive substring of the title or channel.
    pub search: Option<String>,
    /// Allowed channels; empty allows all.
    pub channels: Vec<String>,
    /// `Some(true)` keeps only shorts, `Some(false)` drops them.
    pub shorts: Option<bool>,
    /// Minimum duration in seconds; unknown durations count as 0.
    pub min_duration: Option<u64>,
    /// Maximum duration in seconds; unknown durations count as 0.
    pub max_duration: Option<u64>,
    /// Keeps records carrying any of these topics; empty allows all.
    pub topics: Vec<String>,
}

impl FilterOptions {
    /// Returns `true` if `record` passes every filter.
    #[must_use]
    pub fn matches(&self, record: &VideoRecord) -> bool {
        if let Some(search) = &self.search {
            let needle = search.to_lowercase();
            let in_title = record.title.to_lowercase().contains(&needle);
            let in_channel = record
                .channel
                .as_deref()
                .is_some_and(|channel| channel.to_lowercase().contains(&needle));
            if !in_title && !in_channel {
                return false;
            }
        }

        if !self.channels.is_empty()
            && !record
                .channel
                .as_ref()
                .is_some_and(|channel| self.channels.contains(channel))
        {
            return false;
        }

        if let Some(shorts) = self.shorts
            && record.is_short != shorts
        {
            return false;
        }

        let seconds = record.duration_seconds.unwrap_or(0);
        if self.min_duration.is_some_and(|min| seconds < min) {
            return false;
        }
        if self.max_duration.is_some_and(|max| seconds > max) {
            return false;
        }

        if !self.topics.is_empty() && !record.topics.iter().any(|t| self.topics.contains(t)) {
            return false;
        }

        true
    }
}

/// Sort key for [`sort_videos`].
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
pub enum SortOption {
    /// View count.
    #[default]
    Views,
    /// Duration in seconds.
    Duration,
    /// Title, case-insensitive.
    Title,
    /// Channel name, case-insensitive.
    Channel,
}

/// Sort direction for [`sort_videos`].
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
pub enum SortDirection {
    /// Smallest first.
    Asc,
    /// Largest first.
    #[default]
    Desc,
}

/// Returns the records that pass `filters`, in their original order.
#[must_use]
pub fn filter_videos<'a>(records: &'a [VideoRecord], filters: &FilterOptions) -> Vec<&'a VideoRecord> {
    records.iter().filter(|r| filters.matches(r)).collect()
}

/// Sorts records in place. The sort is stable; missing numbers sort as 0
/// and a missing channel as the empty string.
pub fn sort_videos(records: &mut [&VideoRecord], by: SortOption, direction: SortDirection) {
    records.sort_by(|a, b| {
        let ordering = compare(a, b, by);
        match direction {
            SortDirection::Asc => ordering,
            SortDirection::Desc => ordering.reverse(),
        }
    });
}

fn compare(a: &VideoRecord, b: &VideoRecord, by: SortOption) -> Ordering {
    match by {
        SortOption::Views => a.view_count.unwrap_or(0).cmp(&b.view_count.unwrap_or(0)),
        SortOption::Duration => a
            .duration_seconds
            .unwrap_or(0)
            .cmp(&b.duration_seconds.unwrap_or(0)),
        SortOption::Title => a.title.to_lowercase().cmp(&b.title.to_lowercase()),
        SortOption::Channel => channel_key(a).cmp(&channel_key(b)),
    }
}

fn channel_key(record: &VideoRecord) -> String {
    record.channel.as_deref().unwrap_or("").to_lowercase()
}

/// Returns the distinct channel names, sorted.
#[must_use]
pub fn extract_channels(records: &[VideoRecord]) -> Vec<String> {
    records
        .iter()
        .filter_map(|r| r.channel.clone())
        .collect::<BTreeSet<_>>()
        .into_iter()
        .collect()
}
