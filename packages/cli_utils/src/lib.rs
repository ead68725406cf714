#![cfg_attr(feature = "fail-on-warnings", deny(warnings))]
#![warn(clippy::all, clippy::pedantic, clippy::nursery, clippy::cargo)]
#![allow(clippy::multiple_crate_versions, clippy::cargo_common_metadata)]

//! Terminal output for the disc-clinic command line.
//!
//! [`FetchBar`] draws the fetch loop as an `indicatif` bar. [`init_logger`]
//! routes `pretty_env_logger` through `indicatif-log-bridge` so log lines
//! print above the bar instead of through it.

use std::sync::Arc;
use std::time::Duration;

use disc_clinic_source::progress::FetchProgress;
use indicatif::{ProgressBar, ProgressStyle};

pub use indicatif::MultiProgress;

/// Bar template once the number of needed videos is known.
const COUNT_TEMPLATE: &str = "  {msg} {wide_bar:.cyan/dim} {pos}/{len} videos [{eta}]";

/// Fetch loop progress as a spinner that becomes a video counter.
pub struct FetchBar {
    bar: ProgressBar,
    query: String,
}

impl FetchBar {
    /// Adds a spinner for a search on `query` to `multi`.
    #[must_use]
    pub fn new(multi: &MultiProgress, query: &str) -> Arc<dyn FetchProgress> {
        let bar = multi.add(ProgressBar::new_spinner());
        bar.enable_steady_tick(Duration::from_millis(100));
        bar.set_style(
            ProgressStyle::with_template("{spinner:.cyan} {msg}")
                .unwrap_or_else(|_| ProgressStyle::default_spinner()),
        );
        bar.set_message(format!("Searching {query:?}"));

        Arc::new(Self {
            bar,
            query: query.to_string(),
        })
    }
}

impl FetchProgress for FetchBar {
    fn started(&self, needed: u64) {
        self.bar.set_length(needed);
        self.bar.set_style(
            ProgressStyle::with_template(COUNT_TEMPLATE)
                .unwrap_or_else(|_| ProgressStyle::default_bar())
                .progress_chars("##-"),
        );
        self.bar.set_message(format!("{:?} page 1", self.query));
    }

    fn skipped(&self) {
        self.bar.finish_and_clear();
    }

    fn video_added(&self) {
        self.bar.inc(1);
    }

    fn page_done(&self, page: u32, _fetched: u64) {
        self.bar.set_message(format!("{:?} page {}", self.query, page + 1));
    }

    fn stopped(&self, fetched: u64, reason: &str) {
        self.bar.finish_with_message(format!("{fetched} videos fetched ({reason})"));
    }
}

/// Installs the global logger (filtered by `RUST_LOG`) behind
/// `indicatif-log-bridge`.
///
/// Returns the [`MultiProgress`] every bar must be added to.
#[must_use]
pub fn init_logger() -> MultiProgress {
    let multi = MultiProgress::new();

    let logger = pretty_env_logger::formatted_builder()
        .parse_env("RUST_LOG")
        .build();
    let level = logger.filter();

    // A logger may already be installed (e.g., by a test harness).
    indicatif_log_bridge::LogWrapper::new(multi.clone(), logger)
        .try_init()
        .ok();

    log::set_max_level(level);

    multi
}
