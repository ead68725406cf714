//! In-memory [`VideoSource`] for tests.

use std::collections::{BTreeMap, VecDeque};
use std::sync::Mutex;

use async_trait::async_trait;
use disc_clinic_source::progress::FetchProgress;
use disc_clinic_source::{SourceError, VideoSource};
use disc_clinic_source_models::{SearchItem, SearchPage, VideoDetails};

/// Serves scripted search pages and a fixed detail table, recording every
/// request. Once the script runs out, searches return an empty page.
pub struct MockSource {
    pages: Mutex<VecDeque<Result<SearchPage, String>>>,
    details: BTreeMap<String, VideoDetails>,
    detail_calls_before_failure: Option<usize>,
    searches: Mutex<Vec<Option<String>>>,
    detail_requests: Mutex<Vec<Vec<String>>>,
}

impl MockSource {
    pub fn new(pages: Vec<Result<SearchPage, String>>) -> Self {
        Self {
            pages: Mutex::new(pages.into()),
            details: BTreeMap::new(),
            detail_calls_before_failure: None,
            searches: Mutex::new(Vec::new()),
            detail_requests: Mutex::new(Vec::new()),
        }
    }

    /// Gives each id a ten-minute duration and 1,000 views.
    pub fn with_details(mut self, ids: &[&str]) -> Self {
        for id in ids {
            self.details.insert(
                (*id).to_string(),
                VideoDetails {
                    video_id: (*id).to_string(),
                    duration: "PT10M".to_string(),
                    view_count: Some(1_000),
                },
            );
        }
        self
    }

    /// Fails every detail request after the first `calls`.
    pub const fn failing_details_after(mut self, calls: usize) -> Self {
        self.detail_calls_before_failure = Some(calls);
        self
    }

    pub fn searches(&self) -> Vec<Option<String>> {
        self.searches.lock().unwrap().clone()
    }

    pub fn detail_requests(&self) -> Vec<Vec<String>> {
        self.detail_requests.lock().unwrap().clone()
    }
}

#[async_trait]
impl VideoSource for MockSource {
    fn name(&self) -> &'static str {
        "mock"
    }

    async fn fetch_batch(
        &self,
        _query: &str,
        page_token: Option<&str>,
    ) -> Result<SearchPage, SourceError> {
        self.searches
            .lock()
            .unwrap()
            .push(page_token.map(ToString::to_string));

        match self.pages.lock().unwrap().pop_front() {
            Some(Ok(page)) => Ok(page),
            Some(Err(message)) => Err(SourceError::Api { message }),
            None => Ok(SearchPage::default()),
        }
    }

    async fn fetch_details(
        &self,
        ids: &[String],
    ) -> Result<BTreeMap<String, VideoDetails>, SourceError> {
        let calls = {
            let mut requests = self.detail_requests.lock().unwrap();
            requests.push(ids.to_vec());
            requests.len()
        };

        if self
            .detail_calls_before_failure
            .is_some_and(|allowed| calls > allowed)
        {
            return Err(SourceError::Api {
                message: "backendError".to_string(),
            });
        }

        Ok(ids
            .iter()
            .filter_map(|id| self.details.get(id).map(|d| (id.clone(), d.clone())))
            .collect())
    }
}

/// A search result titled after its id.
pub fn item(id: &str) -> SearchItem {
    SearchItem {
        video_id: id.to_string(),
        title: format!("Video {id}"),
        channel_title: "Test Channel".to_string(),
        thumbnail_url: None,
    }
}

pub fn page(items: Vec<SearchItem>, next_page_token: Option<&str>) -> SearchPage {
    SearchPage {
        items,
        next_page_token: next_page_token.map(ToString::to_string),
    }
}

/// Records every progress event as a short string.
#[derive(Default)]
pub struct RecordingProgress {
    events: Mutex<Vec<String>>,
}

impl RecordingProgress {
    pub fn events(&self) -> Vec<String> {
        self.events.lock().unwrap().clone()
    }

    fn push(&self, event: String) {
        self.events.lock().unwrap().push(event);
    }
}

impl FetchProgress for RecordingProgress {
    fn started(&self, needed: u64) {
        self.push(format!("started {needed}"));
    }

    fn skipped(&self) {
        self.push("skipped".to_string());
    }

    fn video_added(&self) {
        self.push("video".to_string());
    }

    fn page_done(&self, page: u32, fetched: u64) {
        self.push(format!("page {page} {fetched}"));
    }

    fn stopped(&self, fetched: u64, reason: &str) {
        self.push(format!("stopped {fetched} {reason}"));
    }
}
