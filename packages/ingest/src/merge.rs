//! Combining base and fetched records.

use disc_clinic_source_models::{SourceTag, VideoRecord};

/// Base and fetched records under one schema.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct CombinedDataset {
    /// Input column names in order. Fetched records leave the non-core
    /// columns empty.
    pub headers: Vec<String>,
    /// Base records first, then fetched records, each in arrival order.
    pub records: Vec<VideoRecord>,
}

impl CombinedDataset {
    /// Number of records loaded from the input.
    #[must_use]
    pub fn base_count(&self) -> usize {
        self.count(SourceTag::Base)
    }

    /// Number of records added by the fetch loop.
    #[must_use]
    pub fn fetched_count(&self) -> usize {
        self.count(SourceTag::Fetched)
    }

    fn count(&self, source: SourceTag) -> usize {
        self.records.iter().filter(|r| r.source == source).count()
    }
}

/// Concatenates `base` and `fetched`, base first.
#[must_use]
pub fn merge(
    headers: Vec<String>,
    base: Vec<VideoRecord>,
    fetched: Vec<VideoRecord>,
) -> CombinedDataset {
    log::info!(
        "Combined dataset: {} base + {} fetched = {} videos",
        base.len(),
        fetched.len(),
        base.len() + fetched.len()
    );

    let mut records = base;
    records.extend(fetched);

    CombinedDataset { headers, records }
}
