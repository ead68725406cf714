//! Topic tagging.
//!
//! Maps a raw video title to the topic labels of a [`TopicTaxonomy`]. A
//! title may carry several topics; all matching topics are returned in
//! taxonomy order and the result is never empty.

use disc_clinic_topic_models::{FALLBACK_TOPIC, TopicTaxonomy};

/// A strategy for labeling a title with topics.
///
/// Implementations must return at least one label for every input,
/// including the empty string.
pub trait TopicTagger: Send + Sync {
    /// Short identifier for log messages (e.g., `"keyword"`).
    fn name(&self) -> &str;

    /// Returns the topics for `title`, in a stable order, without
    /// duplicates. Never empty.
    fn assign_topics(&self, title: &str) -> Vec<String>;

    /// The taxonomy whose declaration order the labels follow.
    fn taxonomy(&self) -> &TopicTaxonomy;
}

/// Tags titles by substring matching against a keyword taxonomy.
///
/// Matching happens on the lowercased raw title, not the normalized form,
/// so keywords like `"360"` survive. Matching is substring based: `"flat"`
/// matches inside `"flatten"` too.
#[derive(Debug, Clone)]
pub struct KeywordTagger {
    taxonomy: TopicTaxonomy,
}

impl KeywordTagger {
    /// Creates a tagger over an already-validated taxonomy.
    #[must_use]
    pub const fn new(taxonomy: TopicTaxonomy) -> Self {
        Self { taxonomy }
    }

    /// Returns every taxonomy topic whose keywords occur in `title`,
    /// without applying the fallback label.
    #[must_use]
    pub fn matching_topics(&self, title: &str) -> Vec<String> {
        let lower = title.to_lowercase();

        self.taxonomy
            .topics
            .iter()
            .filter(|topic| contains_any(&lower, &topic.keywords))
            .map(|topic| topic.name.clone())
            .collect()
    }
}

impl TopicTagger for KeywordTagger {
    fn name(&self) -> &'static str {
        "keyword"
    }

    fn assign_topics(&self, title: &str) -> Vec<String> {
        let mut topics = self.matching_topics(title);
        if topics.is_empty() {
            topics.push(FALLBACK_TOPIC.to_string());
        }
        topics
    }

    fn taxonomy(&self) -> &TopicTaxonomy {
        &self.taxonomy
    }
}

/// Checks if `haystack` contains any of the given `needles`.
fn contains_any(haystack: &str, needles: &[String]) -> bool {
    needles.iter().any(|needle| haystack.contains(needle.as_str()))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::registry::default_taxonomy;

    fn tagger() -> KeywordTagger {
        KeywordTagger::new(default_taxonomy())
    }

    #[test]
    fn tags_single_topic() {
        assert_eq!(tagger().assign_topics("Sidearm Flick Drills"), vec!["forehand"]);
    }

    #[test]
    fn forehand_also_matches_grip_through_hand() {
        assert_eq!(
            tagger().assign_topics("Forehand Flick Drills"),
            vec!["forehand", "grip"]
        );
    }

    #[test]
    fn keeps_every_matching_topic_in_taxonomy_order() {
        assert_eq!(
            tagger().assign_topics("Beginner Putt Routine"),
            vec!["putting", "beginner"]
        );
    }

    #[test]
    fn ignores_input_order() {
        assert_eq!(
            tagger().assign_topics("GRIP tips for the FOREHAND"),
            vec!["forehand", "grip"]
        );
    }

    #[test]
    fn matches_punctuation_adjacent_keywords() {
        assert_eq!(tagger().assign_topics("The 360-shot!"), vec!["approach", "specialty"]);
    }

    #[test]
    fn matches_substrings_inside_longer_words() {
        // "flatten" contains "flat", "improve" contains "pro"
        assert_eq!(
            tagger().assign_topics("Flatten it out and improve"),
            vec!["advanced", "angle"]
        );
    }

    #[test]
    fn shared_keyword_selects_both_topics() {
        // "confidence" is listed under both putting and mindset
        assert_eq!(tagger().assign_topics("Confidence"), vec!["putting", "mindset"]);
    }

    #[test]
    fn falls_back_to_general() {
        assert_eq!(tagger().assign_topics("Weekly vlog #12"), vec![FALLBACK_TOPIC]);
        assert_eq!(tagger().assign_topics(""), vec![FALLBACK_TOPIC]);
    }

    #[test]
    fn never_returns_empty_or_duplicates() {
        let titles = [
            "",
            "x",
            "Disc golf disc golf disc golf",
            "Max distance power drive: long drives for beginners, first steps",
            "!!!",
        ];
        let t = tagger();
        for title in titles {
            let topics = t.assign_topics(title);
            assert!(!topics.is_empty(), "{title}");
            let mut deduped = topics.clone();
            deduped.sort();
            deduped.dedup();
            assert_eq!(deduped.len(), topics.len(), "{title}");
        }
    }

    #[test]
    fn matching_topics_skips_fallback() {
        assert!(tagger().matching_topics("Weekly vlog").is_empty());
    }
}
