#![cfg_attr(feature = "fail-on-warnings", deny(warnings))]
#![warn(clippy::all, clippy::pedantic, clippy::nursery, clippy::cargo)]
#![allow(clippy::multiple_crate_versions, clippy::cargo_common_metadata)]

//! Title normalization and topic tagging.
//!
//! Every video title flows through two steps before it is counted:
//! [`normalize::normalize`] produces a stopword-free token string, and a
//! [`tagger::TopicTagger`] assigns one or more topic labels. Two taggers are
//! provided: [`tagger::KeywordTagger`] matches the taxonomy table directly,
//! and [`cluster::ClusterTagger`] falls back to a label derived from
//! clustering the corpus when no keyword matches.

pub mod cluster;
pub mod normalize;
pub mod registry;
pub mod tagger;

pub use disc_clinic_topic_models::{FALLBACK_TOPIC, TopicDefinition, TopicTaxonomy};

/// Errors that can occur while loading a taxonomy.
#[derive(Debug, thiserror::Error)]
pub enum TopicError {
    /// Reading the taxonomy file failed.
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// The taxonomy file is not valid TOML for the expected schema.
    #[error("TOML parse error: {0}")]
    Toml(#[from] toml::de::Error),

    /// The taxonomy parsed but violates its invariants.
    #[error("Invalid taxonomy: {0}")]
    Invalid(#[from] disc_clinic_topic_models::InvalidTaxonomyError),
}
