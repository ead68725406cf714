#![cfg_attr(feature = "fail-on-warnings", deny(warnings))]
#![warn(clippy::all, clippy::pedantic, clippy::nursery, clippy::cargo)]
#![allow(clippy::multiple_crate_versions, clippy::cargo_common_metadata)]

//! Library for enriching a disc golf clinic video dataset.
//!
//! A run loads the base CSV, tags every title, optionally tops the dataset
//! up from a [`VideoSource`], and writes the combined dataset plus a topic
//! occurrence report.

pub mod base;
pub mod display;
pub mod expand;
pub mod interactive;
pub mod merge;
pub mod output;
pub mod query;
pub mod report;

#[cfg(test)]
pub(crate) mod testing;

use std::collections::BTreeSet;
use std::path::PathBuf;
use std::sync::Arc;
use std::time::Instant;

use disc_clinic_ingest_models::{ExpandConfig, FetchSummary, TaggerKind, TopicReport};
use disc_clinic_source::progress::FetchProgress;
use disc_clinic_source::{SourceError, VideoSource};
use disc_clinic_source_models::VideoRecord;
use disc_clinic_topic::cluster::{ClusterConfig, ClusterTagger};
use disc_clinic_topic::registry::resolve_taxonomy;
use disc_clinic_topic::tagger::{KeywordTagger, TopicTagger};
use disc_clinic_topic::{TopicError, TopicTaxonomy};

use crate::base::{BaseDataset, read_base_csv};
use crate::expand::fetch_additional;
use crate::merge::{CombinedDataset, merge};
use crate::output::{WrittenArtifacts, write_artifacts};
use crate::report::build_report;

/// Errors that can occur during a run.
#[derive(Debug, thiserror::Error)]
pub enum IngestError {
    /// CSV reading or writing failed.
    #[error("CSV error: {0}")]
    Csv(#[from] csv::Error),

    /// File I/O failed.
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// JSON serialization failed.
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    /// The input file lacks required columns.
    #[error("Input is missing required columns: {}", .missing.join(", "))]
    MissingColumns {
        /// Names of the absent columns.
        missing: Vec<String>,
    },

    /// The taxonomy could not be loaded.
    #[error(transparent)]
    Topic(#[from] TopicError),

    /// The video source could not be configured.
    #[error(transparent)]
    Source(#[from] SourceError),
}

/// Everything a run needs besides the video source.
#[derive(Debug, Clone)]
pub struct RunOptions {
    /// Base dataset CSV.
    pub input: PathBuf,
    /// Directory for the output artifacts.
    pub output_dir: PathBuf,
    /// Replacement taxonomy TOML; `None` uses the embedded one.
    pub taxonomy: Option<PathBuf>,
    /// Also write the records JSON export.
    pub records_json: bool,
    /// Fetch loop and tagging settings.
    pub config: ExpandConfig,
}

/// Result of a completed run.
#[derive(Debug, Clone)]
pub struct RunOutcome {
    /// The topic report that was written.
    pub report: TopicReport,
    /// Paths of the written files.
    pub artifacts: WrittenArtifacts,
}

/// Builds the tagger for `kind`. The cluster tagger is fitted over
/// `corpus` titles.
#[must_use]
pub fn build_tagger<'a>(
    kind: TaggerKind,
    taxonomy: TopicTaxonomy,
    corpus: impl IntoIterator<Item = &'a str>,
    clusters: usize,
) -> Box<dyn TopicTagger> {
    match kind {
        TaggerKind::Keyword => Box::new(KeywordTagger::new(taxonomy)),
        TaggerKind::Cluster => Box::new(ClusterTagger::fit(
            taxonomy,
            corpus,
            ClusterConfig {
                clusters,
                ..ClusterConfig::default()
            },
        )),
    }
}

/// Loads and tags a dataset for catalog queries.
///
/// Any file with the required columns works, including a previous run's
/// combined output.
///
/// # Errors
///
/// Returns [`IngestError`] if the file or taxonomy cannot be loaded.
pub fn load_catalog(
    input: &std::path::Path,
    taxonomy: Option<&std::path::Path>,
    kind: TaggerKind,
    clusters: usize,
) -> Result<(BaseDataset, Vec<VideoRecord>), IngestError> {
    let dataset = read_base_csv(input)?;
    let taxonomy = resolve_taxonomy(taxonomy)?;
    let tagger = build_tagger(kind, taxonomy, dataset.titles(), clusters);
    let records = dataset.to_records(tagger.as_ref());
    Ok((dataset, records))
}

/// Runs the whole pipeline: load, tag, fetch (when `source` is given),
/// merge, report, and write.
///
/// Input and taxonomy errors are returned before anything is fetched or
/// written. Source errors end the fetch loop and are recorded in the
/// report instead of failing the run.
///
/// # Errors
///
/// Returns [`IngestError`] if the input cannot be loaded or an output file
/// cannot be written.
pub async fn run(
    options: &RunOptions,
    source: Option<&dyn VideoSource>,
    progress: Option<Arc<dyn FetchProgress>>,
) -> Result<RunOutcome, IngestError> {
    let start = Instant::now();

    let dataset = read_base_csv(&options.input)?;
    let taxonomy = resolve_taxonomy(options.taxonomy.as_deref())?;
    let tagger = build_tagger(
        options.config.tagger,
        taxonomy.clone(),
        dataset.titles(),
        options.config.clusters,
    );
    log::info!("Tagging with the {} tagger", tagger.name());

    let base_records = dataset.to_records(tagger.as_ref());

    let (fetched, fetch_summary) = if let Some(source) = source {
        let mut seen_ids: BTreeSet<String> = base_records.iter().map(|r| r.id.clone()).collect();
        let result = fetch_additional(
            source,
            &options.config,
            tagger.as_ref(),
            &mut seen_ids,
            base_records.len(),
            progress,
        )
        .await;
        (result.records, result.summary)
    } else {
        log::info!("Fetching disabled, analyzing base dataset only");
        (Vec::new(), FetchSummary::skipped())
    };

    let combined: CombinedDataset = merge(dataset.headers, base_records, fetched);
    let report = build_report(&combined, &taxonomy, fetch_summary);
    let artifacts = write_artifacts(
        &options.output_dir,
        &combined,
        &report,
        options.records_json,
    )?;

    log::info!(
        "Run complete: {} videos, {} topics in {:.1}s",
        report.video_count,
        report.topic_count,
        start.elapsed().as_secs_f64()
    );

    Ok(RunOutcome { report, artifacts })
}

#[cfg(test)]
mod tests {
    use disc_clinic_ingest_models::StopReason;

    use super::*;
    use crate::output::{COMBINED_CSV, REPORT_JSON};
    use crate::testing::{MockSource, item, page};

    const BASE_TITLES: [&str; 10] = [
        "How to Putt with Confidence",
        "Backhand Form Basics",
        "Forehand Flick Drills",
        "Max Distance Drives",
        "Approach Shots Inside the Circle",
        "Hyzer vs Anhyzer Lines",
        "Roller Shots Explained",
        "Tournament Mindset",
        "What's in my Bag",
        "Weekly Vlog",
    ];

    fn temp_dir(name: &str) -> PathBuf {
        let dir = std::env::temp_dir().join(name);
        let _ = std::fs::remove_dir_all(&dir);
        std::fs::create_dir_all(&dir).unwrap();
        dir
    }

    fn write_base(dir: &std::path::Path) -> PathBuf {
        let mut csv = String::from("Title,Channel,Duration,Views\n");
        for (i, title) in BASE_TITLES.iter().enumerate() {
            csv.push_str(&format!("{title},Coach {i},{i}:30,{i}.5K views\n"));
        }
        let path = dir.join("base.csv");
        std::fs::write(&path, csv).unwrap();
        path
    }

    fn options(dir: &std::path::Path, input: PathBuf, target: usize) -> RunOptions {
        RunOptions {
            input,
            output_dir: dir.join("out"),
            taxonomy: None,
            records_json: true,
            config: ExpandConfig {
                target,
                delay_ms: 0,
                ..ExpandConfig::default()
            },
        }
    }

    #[tokio::test]
    async fn end_to_end_combines_base_and_fetched() {
        let dir = temp_dir("disc_clinic_end_to_end");
        let input = write_base(&dir);
        let fetched_ids = ["f1", "f2", "f3", "f4", "f5"];
        let source = MockSource::new(vec![Ok(page(
            fetched_ids.iter().map(|id| item(id)).collect(),
            Some("more"),
        ))])
        .with_details(&fetched_ids);

        let outcome = run(&options(&dir, input, 15), Some(&source), None)
            .await
            .unwrap();

        let report = &outcome.report;
        assert_eq!(report.video_count, 15);
        assert_eq!(report.base_count, 10);
        assert_eq!(report.fetched_count, 5);
        assert_eq!(report.fetch.stop_reason, StopReason::TargetReached);
        assert_eq!(report.topic_count, report.topics.len());

        let combined = std::fs::read_to_string(&outcome.artifacts.combined_csv).unwrap();
        assert!(outcome.artifacts.combined_csv.ends_with(COMBINED_CSV));
        assert_eq!(combined.lines().count(), 16);

        let records: Vec<VideoRecord> = serde_json::from_str(
            &std::fs::read_to_string(outcome.artifacts.records_json.as_ref().unwrap()).unwrap(),
        )
        .unwrap();
        let pairs: usize = records.iter().map(|r| r.topics.len()).sum();
        assert_eq!(report.topics.total(), pairs);
        assert!(records.iter().all(|r| !r.topics.is_empty()));

        let report_json: serde_json::Value = serde_json::from_str(
            &std::fs::read_to_string(dir.join("out").join(REPORT_JSON)).unwrap(),
        )
        .unwrap();
        assert_eq!(report_json["video_count"], 15);
        assert_eq!(report_json["fetch"]["stop_reason"], "target_reached");

        let _ = std::fs::remove_dir_all(&dir);
    }

    #[tokio::test]
    async fn single_last_page_under_default_target() {
        let dir = temp_dir("disc_clinic_single_page");
        let input = write_base(&dir);
        let fetched_ids = ["g1", "g2", "g3", "g4", "g5"];
        let source = MockSource::new(vec![Ok(page(
            fetched_ids.iter().map(|id| item(id)).collect(),
            None,
        ))])
        .with_details(&fetched_ids);

        let outcome = run(
            &options(&dir, input, disc_clinic_ingest_models::DEFAULT_TARGET),
            Some(&source),
            None,
        )
        .await
        .unwrap();

        let report = &outcome.report;
        assert_eq!(report.video_count, 15);
        assert_eq!(report.base_count, 10);
        assert_eq!(report.fetched_count, 5);
        assert_eq!(report.fetch.stop_reason, StopReason::NoMorePages);
        assert_eq!(report.fetch.pages_fetched, 1);
        assert_eq!(source.searches(), vec![None]);

        let records: Vec<VideoRecord> = serde_json::from_str(
            &std::fs::read_to_string(outcome.artifacts.records_json.as_ref().unwrap()).unwrap(),
        )
        .unwrap();
        let pairs: usize = records.iter().map(|r| r.topics.len()).sum();
        assert_eq!(report.topics.total(), pairs);

        let _ = std::fs::remove_dir_all(&dir);
    }

    #[tokio::test]
    async fn api_failure_still_writes_outputs() {
        let dir = temp_dir("disc_clinic_api_failure");
        let input = write_base(&dir);
        let source = MockSource::new(vec![Err("quotaExceeded".to_string())]);

        let outcome = run(&options(&dir, input, 50), Some(&source), None)
            .await
            .unwrap();

        assert_eq!(outcome.report.video_count, 10);
        assert_eq!(outcome.report.fetch.stop_reason, StopReason::ApiError);
        assert!(outcome.artifacts.combined_csv.exists());
        assert!(outcome.artifacts.report_json.exists());

        let _ = std::fs::remove_dir_all(&dir);
    }

    #[tokio::test]
    async fn missing_columns_fail_before_fetching() {
        let dir = temp_dir("disc_clinic_missing_columns");
        let input = dir.join("bad.csv");
        std::fs::write(&input, "Title,Channel\nA,B\n").unwrap();
        let source = MockSource::new(Vec::new());

        let result = run(&options(&dir, input, 50), Some(&source), None).await;

        assert!(matches!(result, Err(IngestError::MissingColumns { .. })));
        assert!(source.searches().is_empty());
        assert!(!dir.join("out").exists());

        let _ = std::fs::remove_dir_all(&dir);
    }

    #[tokio::test]
    async fn offline_run_analyzes_base_only() {
        let dir = temp_dir("disc_clinic_offline");
        let input = write_base(&dir);
        let mut opts = options(&dir, input, 500);
        opts.records_json = false;

        let outcome = run(&opts, None, None).await.unwrap();

        assert_eq!(outcome.report.video_count, 10);
        assert_eq!(outcome.report.fetch.stop_reason, StopReason::Skipped);
        assert_eq!(outcome.artifacts.records_json, None);

        let _ = std::fs::remove_dir_all(&dir);
    }

    #[tokio::test]
    async fn cluster_tagger_labels_every_record() {
        let dir = temp_dir("disc_clinic_cluster_run");
        let input = write_base(&dir);
        let mut opts = options(&dir, input, 500);
        opts.config.tagger = TaggerKind::Cluster;
        opts.config.clusters = 3;

        let outcome = run(&opts, None, None).await.unwrap();

        assert_eq!(outcome.report.video_count, 10);
        assert!(outcome.report.topics.total() >= 10);

        let _ = std::fs::remove_dir_all(&dir);
    }

    #[test]
    fn loads_catalog_for_queries() {
        let dir = temp_dir("disc_clinic_catalog");
        let input = write_base(&dir);

        let (dataset, records) = load_catalog(&input, None, TaggerKind::Keyword, 10).unwrap();

        assert_eq!(dataset.len(), 10);
        assert_eq!(records.len(), 10);
        assert_eq!(records[9].topics, vec!["general"]);

        let _ = std::fs::remove_dir_all(&dir);
    }
}
