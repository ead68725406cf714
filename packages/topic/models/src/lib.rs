#![cfg_attr(feature = "fail-on-warnings", deny(warnings))]
#![warn(clippy::all, clippy::pedantic, clippy::nursery, clippy::cargo)]
#![allow(clippy::multiple_crate_versions, clippy::cargo_common_metadata)]

//! Topic taxonomy types.
//!
//! A [`TopicTaxonomy`] is an ordered table of topic names to keyword lists.
//! Every tagger in the workspace classifies titles against one of these
//! tables; the order of the table decides which topics are tested first and
//! how ties are broken in reports, never which topics match.

use std::collections::BTreeSet;

use serde::{Deserialize, Serialize};

/// Label assigned to a title that matches no topic in the taxonomy.
pub const FALLBACK_TOPIC: &str = "general";

/// A single topic and the keyword substrings that select it.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TopicDefinition {
    /// Topic label (e.g., `"putting"`).
    pub name: String,
    /// Lowercase substrings; any one of them occurring in a lowercased
    /// title selects this topic.
    pub keywords: Vec<String>,
}

/// An ordered topic → keyword-list table.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TopicTaxonomy {
    /// Human-readable name of the table (e.g., `"Disc golf techniques"`).
    #[serde(default)]
    pub name: String,
    /// Topics in declaration order.
    #[serde(rename = "topic")]
    pub topics: Vec<TopicDefinition>,
}

impl TopicTaxonomy {
    /// Builds a taxonomy from `(name, keywords)` pairs, validating it.
    ///
    /// # Errors
    ///
    /// Returns [`InvalidTaxonomyError`] if the table violates any of the
    /// invariants checked by [`TopicTaxonomy::validate`].
    pub fn from_pairs(
        name: &str,
        pairs: &[(&str, &[&str])],
    ) -> Result<Self, InvalidTaxonomyError> {
        let taxonomy = Self {
            name: name.to_string(),
            topics: pairs
                .iter()
                .map(|(topic, keywords)| TopicDefinition {
                    name: (*topic).to_string(),
                    keywords: keywords.iter().map(|k| (*k).to_string()).collect(),
                })
                .collect(),
        };
        taxonomy.validate()?;
        Ok(taxonomy)
    }

    /// Checks the taxonomy invariants: at least one topic, unique non-empty
    /// topic names, and non-empty keyword lists without blank keywords.
    ///
    /// # Errors
    ///
    /// Returns [`InvalidTaxonomyError`] describing the first violation.
    pub fn validate(&self) -> Result<(), InvalidTaxonomyError> {
        if self.topics.is_empty() {
            return Err(InvalidTaxonomyError::Empty);
        }

        let mut seen = BTreeSet::new();
        for topic in &self.topics {
            if topic.name.trim().is_empty() {
                return Err(InvalidTaxonomyError::BlankTopicName);
            }
            if !seen.insert(topic.name.as_str()) {
                return Err(InvalidTaxonomyError::DuplicateTopic {
                    topic: topic.name.clone(),
                });
            }
            if topic.keywords.is_empty() {
                return Err(InvalidTaxonomyError::NoKeywords {
                    topic: topic.name.clone(),
                });
            }
            if topic.keywords.iter().any(|k| k.is_empty()) {
                return Err(InvalidTaxonomyError::BlankKeyword {
                    topic: topic.name.clone(),
                });
            }
        }

        Ok(())
    }

    /// Returns the topic names in declaration order.
    #[must_use]
    pub fn names(&self) -> Vec<&str> {
        self.topics.iter().map(|t| t.name.as_str()).collect()
    }

    /// Returns the declaration index of `topic`, if it is part of the table.
    #[must_use]
    pub fn position(&self, topic: &str) -> Option<usize> {
        self.topics.iter().position(|t| t.name == topic)
    }

    /// Returns the number of topics in the table.
    #[must_use]
    pub const fn len(&self) -> usize {
        self.topics.len()
    }

    /// Returns `true` if the table has no topics.
    #[must_use]
    pub const fn is_empty(&self) -> bool {
        self.topics.is_empty()
    }
}

/// Error returned when a taxonomy table violates its invariants.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum InvalidTaxonomyError {
    /// The table declares no topics.
    Empty,
    /// A topic has an empty or whitespace-only name.
    BlankTopicName,
    /// Two topics share a name.
    DuplicateTopic {
        /// The repeated topic name.
        topic: String,
    },
    /// A topic has no keywords.
    NoKeywords {
        /// The topic without keywords.
        topic: String,
    },
    /// A topic lists an empty keyword, which would match every title.
    BlankKeyword {
        /// The topic with the blank keyword.
        topic: String,
    },
}

impl std::fmt::Display for InvalidTaxonomyError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Empty => write!(f, "taxonomy declares no topics"),
            Self::BlankTopicName => write!(f, "taxonomy contains a blank topic name"),
            Self::DuplicateTopic { topic } => write!(f, "topic '{topic}' is declared twice"),
            Self::NoKeywords { topic } => write!(f, "topic '{topic}' has no keywords"),
            Self::BlankKeyword { topic } => write!(f, "topic '{topic}' has a blank keyword"),
        }
    }
}

impl std::error::Error for InvalidTaxonomyError {}
