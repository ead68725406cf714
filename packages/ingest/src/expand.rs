//! Paginated fetch loop.
//!
//! Pulls search pages from a [`VideoSource`] until the combined dataset
//! reaches the target size, skipping anything already in the working set.
//! Errors end the loop but never discard what was already accumulated.

use std::collections::{BTreeSet, HashSet};
use std::sync::Arc;

use disc_clinic_ingest_models::{ExpandConfig, FetchSummary, StopReason};
use disc_clinic_source::VideoSource;
use disc_clinic_source::parsing::{
    SHORTS_MARKER, format_duration, format_views, is_short, parse_iso_duration, thumbnail_url,
};
use disc_clinic_source::progress::{FetchProgress, null_progress};
use disc_clinic_source_models::{SearchItem, SourceTag, VideoDetails, VideoRecord};
use disc_clinic_topic::normalize::normalize;
use disc_clinic_topic::tagger::TopicTagger;

/// Records added by the fetch loop and how the loop ended.
#[derive(Debug, Clone)]
pub struct FetchResult {
    /// New records in arrival order.
    pub records: Vec<VideoRecord>,
    /// Stop reason, page count, and any warning.
    pub summary: FetchSummary,
}

/// Fetches new videos until `base_count` plus the fetched records reaches
/// `config.target`.
///
/// `seen_ids` must hold every base identifier; each accepted record's id is
/// added to it. The loop stops on reaching the target (never exceeding it),
/// on an empty page, on a page without a continuation token, or on the
/// first error. Nothing is retried.
#[allow(clippy::too_many_lines)]
pub async fn fetch_additional(
    source: &dyn VideoSource,
    config: &ExpandConfig,
    tagger: &dyn TopicTagger,
    seen_ids: &mut BTreeSet<String>,
    base_count: usize,
    progress: Option<Arc<dyn FetchProgress>>,
) -> FetchResult {
    let progress = progress.unwrap_or_else(null_progress);
    let mut records: Vec<VideoRecord> = Vec::new();

    if base_count >= config.target {
        log::info!(
            "Base dataset already has {base_count} videos (target {}), skipping fetch",
            config.target
        );
        progress.skipped();
        return FetchResult {
            records,
            summary: FetchSummary {
                stop_reason: StopReason::AlreadyAtTarget,
                pages_fetched: 0,
                fetched_count: 0,
                warning: None,
            },
        };
    }

    let needed = config.target - base_count;
    log::info!(
        "{}: fetching up to {needed} videos for {:?} ({base_count} in base, target {})",
        source.name(),
        config.query,
        config.target
    );
    progress.started(needed as u64);

    let delay = config.delay();
    let mut page_token: Option<String> = None;
    let mut pages_fetched: u32 = 0;

    let (stop_reason, warning) = loop {
        let page = match source.fetch_batch(&config.query, page_token.as_deref()).await {
            Ok(page) => page,
            Err(e) => {
                log::warn!(
                    "{}: search failed after {pages_fetched} pages, keeping {} fetched videos: {e}",
                    source.name(),
                    records.len()
                );
                break (StopReason::ApiError, Some(e.to_string()));
            }
        };
        pages_fetched += 1;

        if page.items.is_empty() {
            log::info!("{}: page {pages_fetched} was empty", source.name());
            break (StopReason::Exhausted, None);
        }

        let page_len = page.items.len();
        let mut page_ids: HashSet<String> = HashSet::new();
        let candidates: Vec<SearchItem> = page
            .items
            .into_iter()
            .filter(|item| {
                !seen_ids.contains(&item.video_id) && page_ids.insert(item.video_id.clone())
            })
            .collect();

        log::debug!(
            "{}: page {pages_fetched} had {page_len} results, {} new",
            source.name(),
            candidates.len()
        );

        if !candidates.is_empty() {
            let ids: Vec<String> = candidates.iter().map(|c| c.video_id.clone()).collect();
            let details = match source.fetch_details(&ids).await {
                Ok(details) => details,
                Err(e) => {
                    log::warn!(
                        "{}: detail lookup failed on page {pages_fetched}, keeping {} fetched videos: {e}",
                        source.name(),
                        records.len()
                    );
                    break (StopReason::ApiError, Some(e.to_string()));
                }
            };

            for item in candidates {
                if records.len() >= needed {
                    break;
                }
                let Some(detail) = details.get(&item.video_id) else {
                    log::debug!("No details returned for {}, dropping", item.video_id);
                    continue;
                };

                let record = fetched_record(item, detail, tagger);
                seen_ids.insert(record.id.clone());
                records.push(record);
                progress.video_added();
            }
        }

        progress.page_done(pages_fetched, records.len() as u64);
        log::info!(
            "{}: {} / {needed} fetched after {pages_fetched} pages",
            source.name(),
            records.len()
        );

        if records.len() >= needed {
            break (StopReason::TargetReached, None);
        }

        let Some(token) = page.next_page_token else {
            break (StopReason::NoMorePages, None);
        };
        page_token = Some(token);

        if !delay.is_zero() {
            tokio::time::sleep(delay).await;
        }
    };

    progress.stopped(records.len() as u64, stop_reason.as_ref());
    log::info!(
        "{}: fetch stopped ({stop_reason}) with {} new videos from {pages_fetched} pages",
        source.name(),
        records.len()
    );

    let fetched_count = records.len();
    FetchResult {
        records,
        summary: FetchSummary {
            stop_reason,
            pages_fetched,
            fetched_count,
            warning,
        },
    }
}

/// Builds a fetched record from a search result and its details.
///
/// Shorts display [`SHORTS_MARKER`] as their duration. A missing view count
/// stays missing.
#[must_use]
pub fn fetched_record(
    item: SearchItem,
    detail: &VideoDetails,
    tagger: &dyn TopicTagger,
) -> VideoRecord {
    let seconds = parse_iso_duration(&detail.duration);
    let short = is_short(seconds);
    let duration = if short {
        SHORTS_MARKER.to_string()
    } else {
        format_duration(seconds)
    };

    let thumbnail = item
        .thumbnail_url
        .unwrap_or_else(|| thumbnail_url(&item.video_id));
    let channel = (!item.channel_title.is_empty()).then_some(item.channel_title);

    VideoRecord {
        processed_title: normalize(&item.title),
        topics: tagger.assign_topics(&item.title),
        id: item.video_id,
        title: item.title,
        channel,
        duration: Some(duration),
        duration_seconds: Some(seconds),
        views: detail.view_count.map(format_views),
        view_count: detail.view_count,
        is_short: short,
        thumbnail_url: Some(thumbnail),
        source: SourceTag::Fetched,
        extra: Vec::new(),
    }
}
