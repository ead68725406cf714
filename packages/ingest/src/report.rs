//! Topic occurrence report.
//!
//! Counts how many records carry each topic. The order is by descending
//! count; ties go to taxonomy declaration order, then the fallback topic,
//! then any other label (cluster names) in order of first appearance.

use std::cmp::Reverse;

use disc_clinic_ingest_models::{FetchSummary, TopicCounts, TopicReport};
use disc_clinic_topic_models::{FALLBACK_TOPIC, TopicTaxonomy};

use crate::merge::CombinedDataset;

/// Counts topic occurrences across `records`' topic lists, in report order.
#[must_use]
pub fn count_topics<'a>(
    topic_lists: impl IntoIterator<Item = &'a [String]>,
    taxonomy: &TopicTaxonomy,
) -> TopicCounts {
    // (topic, count), in first-appearance order
    let mut counts: Vec<(String, usize)> = Vec::new();
    for topics in topic_lists {
        for topic in topics {
            match counts.iter_mut().find(|(name, _)| name == topic) {
                Some((_, count)) => *count += 1,
                None => counts.push((topic.clone(), 1)),
            }
        }
    }

    let rank = |name: &str, first_seen: usize| match taxonomy.position(name) {
        Some(position) => (0, position),
        None if name == FALLBACK_TOPIC => (1, 0),
        None => (2, first_seen),
    };

    let mut ranked: Vec<(usize, (String, usize))> = counts.into_iter().enumerate().collect();
    ranked.sort_by_key(|(first_seen, (name, count))| (Reverse(*count), rank(name, *first_seen)));

    TopicCounts(ranked.into_iter().map(|(_, entry)| entry).collect())
}

/// Builds the report for a combined dataset.
#[must_use]
pub fn build_report(
    dataset: &CombinedDataset,
    taxonomy: &TopicTaxonomy,
    fetch: FetchSummary,
) -> TopicReport {
    let topics = count_topics(
        dataset.records.iter().map(|r| r.topics.as_slice()),
        taxonomy,
    );

    log::info!(
        "Topic counts: {}",
        topics
            .entries()
            .map(|(topic, count)| format!("{topic}={count}"))
            .collect::<Vec<_>>()
            .join(", ")
    );

    TopicReport {
        topic_count: topics.len(),
        topics,
        video_count: dataset.records.len(),
        base_count: dataset.base_count(),
        fetched_count: dataset.fetched_count(),
        fetch,
        generated_at: chrono::Utc::now(),
    }
}
