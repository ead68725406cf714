//! Cluster-based topic tagging.
//!
//! [`ClusterTagger`] tags with the keyword taxonomy first and only falls
//! back to a statistical label when no keyword matches. The fallback label
//! comes from clustering the normalized titles of a reference corpus:
//!
//! 1. TF-IDF vectors over the most frequent corpus terms (smooth idf,
//!    L2-normalized rows)
//! 2. k-means with deterministic farthest-point seeding
//! 3. Each cluster is named after its two most common words
//!
//! Titles outside the corpus are vectorized with the fitted vocabulary and
//! labeled by their nearest centroid.

use std::collections::BTreeMap;

use disc_clinic_topic_models::{FALLBACK_TOPIC, TopicTaxonomy};

use crate::normalize::{normalize, tokens};
use crate::tagger::{KeywordTagger, TopicTagger};

/// Tuning knobs for [`ClusterTagger::fit`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ClusterConfig {
    /// Number of clusters to form (capped at the corpus size).
    pub clusters: usize,
    /// Maximum vocabulary size, keeping the most frequent terms.
    pub max_features: usize,
    /// Upper bound on k-means refinement passes.
    pub max_iterations: usize,
    /// Number of words joined to form a cluster label.
    pub label_words: usize,
}

impl Default for ClusterConfig {
    fn default() -> Self {
        Self {
            clusters: 10,
            max_features: 100,
            max_iterations: 300,
            label_words: 2,
        }
    }
}

/// A [`TopicTagger`] that labels keyword misses with a fitted cluster name.
#[derive(Debug, Clone)]
pub struct ClusterTagger {
    keywords: KeywordTagger,
    vocabulary: BTreeMap<String, usize>,
    idf: Vec<f64>,
    centroids: Vec<Vec<f64>>,
    labels: Vec<String>,
}

impl ClusterTagger {
    /// Fits the cluster model over `titles` (raw, un-normalized).
    #[must_use]
    pub fn fit<'a>(
        taxonomy: TopicTaxonomy,
        titles: impl IntoIterator<Item = &'a str>,
        config: ClusterConfig,
    ) -> Self {
        let docs: Vec<String> = titles.into_iter().map(normalize).collect();

        let vocabulary = build_vocabulary(&docs, config.max_features);
        let idf = smooth_idf(&docs, &vocabulary);
        let vectors: Vec<Vec<f64>> = docs
            .iter()
            .map(|doc| tfidf_vector(doc, &vocabulary, &idf))
            .collect();

        let mut centroids = seed_centroids(&vectors, config.clusters);
        let assignments = refine(&vectors, &mut centroids, config.max_iterations);
        let labels = (0..centroids.len())
            .map(|cluster| label_cluster(&docs, &assignments, cluster, config.label_words))
            .collect::<Vec<_>>();

        log::info!(
            "Fitted {} clusters over {} titles ({} terms): {}",
            centroids.len(),
            docs.len(),
            vocabulary.len(),
            labels.join(", ")
        );

        Self {
            keywords: KeywordTagger::new(taxonomy),
            vocabulary,
            idf,
            centroids,
            labels,
        }
    }

    /// Returns the fitted cluster labels, indexed by cluster.
    #[must_use]
    pub fn cluster_labels(&self) -> &[String] {
        &self.labels
    }

    /// Returns the index of the cluster nearest to `title`, if any cluster
    /// was fitted.
    #[must_use]
    pub fn cluster_of(&self, title: &str) -> Option<usize> {
        let vector = tfidf_vector(&normalize(title), &self.vocabulary, &self.idf);
        nearest(&vector, &self.centroids)
    }
}

impl TopicTagger for ClusterTagger {
    fn name(&self) -> &'static str {
        "cluster"
    }

    fn assign_topics(&self, title: &str) -> Vec<String> {
        let topics = self.keywords.matching_topics(title);
        if !topics.is_empty() {
            return topics;
        }

        let label = self
            .cluster_of(title)
            .and_then(|cluster| self.labels.get(cluster))
            .map_or(FALLBACK_TOPIC, String::as_str);

        vec![label.to_string()]
    }

    fn taxonomy(&self) -> &TopicTaxonomy {
        self.keywords.taxonomy()
    }
}

/// Picks the `max_features` most frequent terms. Ties go to the
/// alphabetically smaller term; columns are assigned alphabetically.
fn build_vocabulary(docs: &[String], max_features: usize) -> BTreeMap<String, usize> {
    let mut counts: BTreeMap<&str, u64> = BTreeMap::new();
    for doc in docs {
        for token in tokens(doc) {
            *counts.entry(token).or_default() += 1;
        }
    }

    let mut ranked: Vec<(&str, u64)> = counts.into_iter().collect();
    ranked.sort_by(|a, b| b.1.cmp(&a.1).then_with(|| a.0.cmp(b.0)));
    ranked.truncate(max_features);

    let mut terms: Vec<&str> = ranked.into_iter().map(|(term, _)| term).collect();
    terms.sort_unstable();

    terms
        .into_iter()
        .enumerate()
        .map(|(column, term)| (term.to_string(), column))
        .collect()
}

/// `ln((1 + n) / (1 + df)) + 1` for every vocabulary column.
#[allow(clippy::cast_precision_loss)]
fn smooth_idf(docs: &[String], vocabulary: &BTreeMap<String, usize>) -> Vec<f64> {
    let mut df = vec![0u64; vocabulary.len()];
    for doc in docs {
        let mut present = vec![false; vocabulary.len()];
        for token in tokens(doc) {
            if let Some(&column) = vocabulary.get(token) {
                present[column] = true;
            }
        }
        for (column, hit) in present.into_iter().enumerate() {
            if hit {
                df[column] += 1;
            }
        }
    }

    let n = docs.len() as f64;
    df.into_iter()
        .map(|d| ((1.0 + n) / (1.0 + d as f64)).ln() + 1.0)
        .collect()
}

/// Term counts weighted by idf, scaled to unit length. Documents with no
/// vocabulary terms produce the zero vector.
fn tfidf_vector(doc: &str, vocabulary: &BTreeMap<String, usize>, idf: &[f64]) -> Vec<f64> {
    let mut vector = vec![0.0; vocabulary.len()];
    for token in tokens(doc) {
        if let Some(&column) = vocabulary.get(token) {
            vector[column] += idf[column];
        }
    }

    let norm = vector.iter().map(|v| v * v).sum::<f64>().sqrt();
    if norm > 0.0 {
        for v in &mut vector {
            *v /= norm;
        }
    }
    vector
}

fn squared_distance(a: &[f64], b: &[f64]) -> f64 {
    a.iter().zip(b).map(|(x, y)| (x - y) * (x - y)).sum()
}

/// Index of the closest centroid; ties resolve to the lower index.
fn nearest(vector: &[f64], centroids: &[Vec<f64>]) -> Option<usize> {
    centroids
        .iter()
        .enumerate()
        .map(|(i, c)| (i, squared_distance(vector, c)))
        .min_by(|a, b| a.1.total_cmp(&b.1))
        .map(|(i, _)| i)
}

/// Farthest-point seeding: start from the first vector, then repeatedly add
/// the vector farthest from every chosen centroid. Stops early once every
/// remaining vector coincides with a centroid.
fn seed_centroids(vectors: &[Vec<f64>], clusters: usize) -> Vec<Vec<f64>> {
    let Some(first) = vectors.first() else {
        return Vec::new();
    };

    let mut centroids = vec![first.clone()];
    while centroids.len() < clusters {
        let farthest = vectors
            .iter()
            .map(|v| {
                centroids
                    .iter()
                    .map(|c| squared_distance(v, c))
                    .fold(f64::INFINITY, f64::min)
            })
            .enumerate()
            .max_by(|a, b| a.1.total_cmp(&b.1).then_with(|| b.0.cmp(&a.0)));

        match farthest {
            Some((index, distance)) if distance > 0.0 => centroids.push(vectors[index].clone()),
            _ => break,
        }
    }

    centroids
}

/// Lloyd refinement. Returns the final cluster index of every vector.
/// Empty clusters keep their previous centroid.
#[allow(clippy::cast_precision_loss)]
fn refine(vectors: &[Vec<f64>], centroids: &mut [Vec<f64>], max_iterations: usize) -> Vec<usize> {
    let mut assignments: Vec<usize> = vectors
        .iter()
        .map(|v| nearest(v, centroids).unwrap_or(0))
        .collect();

    for iteration in 0..max_iterations {
        for (cluster, centroid) in centroids.iter_mut().enumerate() {
            let members: Vec<&Vec<f64>> = vectors
                .iter()
                .zip(&assignments)
                .filter(|(_, a)| **a == cluster)
                .map(|(v, _)| v)
                .collect();
            if members.is_empty() {
                continue;
            }
            for (column, value) in centroid.iter_mut().enumerate() {
                *value = members.iter().map(|m| m[column]).sum::<f64>() / members.len() as f64;
            }
        }

        let next: Vec<usize> = vectors
            .iter()
            .map(|v| nearest(v, centroids).unwrap_or(0))
            .collect();
        if next == assignments {
            log::debug!("k-means converged after {} iterations", iteration + 1);
            break;
        }
        assignments = next;
    }

    assignments
}

/// Names a cluster after its most common words, counted over the
/// normalized titles assigned to it. Ties keep first-seen order.
fn label_cluster(docs: &[String], assignments: &[usize], cluster: usize, words: usize) -> String {
    let mut counts: Vec<(&str, u64)> = Vec::new();
    for (doc, _) in docs.iter().zip(assignments).filter(|(_, a)| **a == cluster) {
        for token in tokens(doc) {
            match counts.iter_mut().find(|(t, _)| *t == token) {
                Some((_, count)) => *count += 1,
                None => counts.push((token, 1)),
            }
        }
    }

    // Stable sort keeps first-seen order among equal counts.
    counts.sort_by(|a, b| b.1.cmp(&a.1));

    let label = counts
        .iter()
        .take(words)
        .map(|(t, _)| *t)
        .collect::<Vec<_>>()
        .join(" ");

    if label.is_empty() {
        FALLBACK_TOPIC.to_string()
    } else {
        label
    }
}
