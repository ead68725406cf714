//! Fetch loop progress.
//!
//! The loop reports through [`FetchProgress`] so the library never touches
//! the terminal. The CLI draws a bar; tests pass [`NullProgress`] or a
//! recorder.

use std::sync::Arc;

/// Observer for one run of the fetch loop.
///
/// Exactly one of [`started`](Self::started) or [`skipped`](Self::skipped)
/// is called. A started loop always ends with [`stopped`](Self::stopped).
pub trait FetchProgress: Send + Sync {
    /// The loop is about to search for `needed` more videos.
    fn started(&self, needed: u64);

    /// The base dataset already meets the target; nothing is fetched.
    fn skipped(&self);

    /// One new video was accepted.
    fn video_added(&self);

    /// Search page `page` (1-based) was processed; `fetched` is the running
    /// total of accepted videos.
    fn page_done(&self, page: u32, fetched: u64);

    /// The loop ended with `fetched` videos for `reason`.
    fn stopped(&self, fetched: u64, reason: &str);
}

/// Ignores every update.
pub struct NullProgress;

impl FetchProgress for NullProgress {
    fn started(&self, _needed: u64) {}
    fn skipped(&self) {}
    fn video_added(&self) {}
    fn page_done(&self, _page: u32, _fetched: u64) {}
    fn stopped(&self, _fetched: u64, _reason: &str) {}
}

/// Returns a shared [`NullProgress`].
#[must_use]
pub fn null_progress() -> Arc<dyn FetchProgress> {
    Arc::new(NullProgress)
}
