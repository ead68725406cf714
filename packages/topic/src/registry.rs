//! Taxonomy registry.
//!
//! The default disc golf taxonomy is baked into the binary at compile time
//! via [`include_str!`]. A replacement table with the same schema can be
//! loaded from disk with [`load_taxonomy`].

use std::path::Path;

use disc_clinic_topic_models::TopicTaxonomy;

use crate::TopicError;

/// The embedded default taxonomy.
const DISC_GOLF_TOML: &str = include_str!("../taxonomies/disc_golf.toml");

/// Parses and validates a taxonomy from TOML text.
///
/// # Errors
///
/// Returns [`TopicError::Toml`] if the text does not match the schema, or
/// [`TopicError::Invalid`] if the table breaks a taxonomy invariant.
pub fn parse_taxonomy_toml(text: &str) -> Result<TopicTaxonomy, TopicError> {
    let taxonomy: TopicTaxonomy = toml::from_str(text)?;
    taxonomy.validate()?;
    Ok(taxonomy)
}

/// Returns the embedded disc golf taxonomy.
///
/// # Panics
///
/// Panics if the embedded TOML is malformed (guarded by the tests below).
#[must_use]
pub fn default_taxonomy() -> TopicTaxonomy {
    parse_taxonomy_toml(DISC_GOLF_TOML)
        .unwrap_or_else(|e| panic!("Failed to parse disc_golf.toml: {e}"))
}

/// Loads a taxonomy from a TOML file.
///
/// # Errors
///
/// Returns [`TopicError`] if the file cannot be read, parsed, or validated.
pub fn load_taxonomy(path: &Path) -> Result<TopicTaxonomy, TopicError> {
    log::debug!("Loading taxonomy from {}", path.display());
    let text = std::fs::read_to_string(path)?;
    let taxonomy = parse_taxonomy_toml(&text)?;
    log::info!(
        "Loaded taxonomy '{}' with {} topics from {}",
        taxonomy.name,
        taxonomy.len(),
        path.display()
    );
    Ok(taxonomy)
}

/// Returns the taxonomy at `path`, or the embedded default when `None`.
///
/// # Errors
///
/// Returns [`TopicError`] if a path is given and loading it fails.
pub fn resolve_taxonomy(path: Option<&Path>) -> Result<TopicTaxonomy, TopicError> {
    path.map_or_else(|| Ok(default_taxonomy()), load_taxonomy)
}
