//! Title normalization.
//!
//! Reduces a free-text video title to the content words that carry topic
//! signal. The pipeline is deterministic and idempotent: feeding its output
//! back in returns the same string.

use std::collections::BTreeSet;
use std::sync::LazyLock;

use regex::Regex;

/// Matches every character that is neither an ASCII letter nor whitespace.
static NON_LETTER_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"[^a-zA-Z\s]").expect("valid regex"));

/// Standard English stopwords. Contractions are omitted because the letter
/// filter splits them before the stopword check.
const ENGLISH_STOPWORDS: &[&str] = &[
    "i", "me", "my", "myself", "we", "our", "ours", "ourselves", "you", "your", "yours",
    "yourself", "yourselves", "he", "him", "his", "himself", "she", "her", "hers", "herself",
    "it", "its", "itself", "they", "them", "their", "theirs", "themselves", "what", "which",
    "who", "whom", "this", "that", "these", "those", "am", "is", "are", "was", "were", "be",
    "been", "being", "have", "has", "had", "having", "do", "does", "did", "doing", "a", "an",
    "the", "and", "but", "if", "or", "because", "as", "until", "while", "of", "at", "by",
    "for", "with", "about", "against", "between", "into", "through", "during", "before",
    "after", "above", "below", "to", "from", "up", "down", "in", "out", "on", "off", "over",
    "under", "again", "further", "then", "once", "here", "there", "when", "where", "why",
    "how", "all", "any", "both", "each", "few", "more", "most", "other", "some", "such", "no",
    "nor", "not", "only", "own", "same", "so", "than", "too", "very", "s", "t", "can",
    "will", "just", "don", "should", "now", "d", "ll", "m", "o", "re", "ve", "y", "ain",
    "aren", "couldn", "didn", "doesn", "hadn", "hasn", "haven", "isn", "ma", "mightn",
    "mustn", "needn", "shan", "shouldn", "wasn", "weren", "won", "wouldn",
];

/// Words that appear in nearly every disc golf clinic title.
const DOMAIN_STOPWORDS: &[&str] = &[
    "disc", "golf", "clinic", "tutorial", "tips", "how", "to", "with", "and", "the", "in",
    "of", "for", "at", "on", "by", "your", "you", "this", "that", "these", "those", "is",
    "are", "was", "were", "be", "been", "being", "have", "has", "had", "do", "does", "did",
    "a", "an", "pt", "part",
];

/// Tokens this short or shorter are dropped.
const MIN_TOKEN_LEN_EXCLUSIVE: usize = 2;

static STOPWORDS: LazyLock<BTreeSet<&'static str>> = LazyLock::new(|| {
    ENGLISH_STOPWORDS
        .iter()
        .chain(DOMAIN_STOPWORDS)
        .copied()
        .collect()
});

/// Returns `true` if `token` is in the combined stopword set.
#[must_use]
pub fn is_stopword(token: &str) -> bool {
    STOPWORDS.contains(token)
}

/// Normalizes a video title into its content words.
///
/// The pipeline:
/// 1. Lowercase
/// 2. Replace every non-letter, non-whitespace character with a space
/// 3. Split on whitespace
/// 4. Drop English and disc golf stopwords
/// 5. Drop tokens of two characters or fewer
/// 6. Join with single spaces
#[must_use]
pub fn normalize(title: &str) -> String {
    let lower = title.to_lowercase();
    let letters = NON_LETTER_RE.replace_all(&lower, " ");

    letters
        .split_whitespace()
        .filter(|token| !is_stopword(token))
        .filter(|token| token.len() > MIN_TOKEN_LEN_EXCLUSIVE)
        .collect::<Vec<_>>()
        .join(" ")
}

/// Splits an already-normalized title into its tokens.
pub fn tokens(normalized: &str) -> impl Iterator<Item = &str> {
    normalized.split_whitespace()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn strips_stopwords_and_digits() {
        assert_eq!(
            normalize("How to Putt with Confidence | Disc Golf Clinic Pt. 2"),
            "putt confidence"
        );
    }

    #[test]
    fn replaces_punctuation_with_token_boundaries() {
        assert_eq!(normalize("Hyzer-Flip/Anhyzer"), "hyzer flip anhyzer");
    }

    #[test]
    fn drops_short_tokens() {
        assert_eq!(normalize("Go up 4 OB ace run"), "ace run");
    }

    #[test]
    fn empty_input_yields_empty_output() {
        assert_eq!(normalize(""), "");
        assert_eq!(normalize("   "), "");
        assert_eq!(normalize("2024 #1 !!!"), "");
    }

    #[test]
    fn all_stopwords_yield_empty_output() {
        assert_eq!(normalize("How to do this with your disc"), "");
    }

    #[test]
    fn non_ascii_letters_split_tokens() {
        assert_eq!(normalize("Técnica de lanzamiento"), "cnica lanzamiento");
    }

    #[test]
    fn normalization_is_idempotent() {
        let titles = [
            "Backhand Form Check: 5 Drills for MAX Distance!!",
            "Disc Golf Tutorial - Forehand (Sidearm) Basics pt 1",
            "THE 360 SHOT?! Tomahawk & Thumber explained",
            "",
            "a b c",
        ];
        for title in titles {
            let once = normalize(title);
            assert_eq!(normalize(&once), once, "{title}");
        }
    }

    #[test]
    fn splits_tokens() {
        assert_eq!(
            tokens("putt confidence").collect::<Vec<_>>(),
            vec!["putt", "confidence"]
        );
    }
}
