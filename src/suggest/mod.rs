//! Typeahead suggestions
//!
//! Merges candidates from four store-backed sources: popular query history,
//! tags, topics, and author names. Each source is independent; a failing
//! source is logged and simply contributes nothing, so partial results beat
//! a hard failure. No index involvement; this is a pure read path against
//! the store.

use std::sync::Arc;

use fuzzy_matcher::FuzzyMatcher;
use fuzzy_matcher::skim::SkimMatcherV2;
use serde::{Deserialize, Serialize};

use crate::errors::StoreError;
use crate::store::ContentStore;

/// Which source produced a suggestion
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SuggestionKind {
    Query,
    Tag,
    Topic,
    Author,
}

/// One typeahead candidate
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Suggestion {
    pub text: String,
    pub kind: SuggestionKind,
    /// Source-normalized rank in `(0.0, 1.0]`; higher is better
    pub score: f32,
}

/// Produces merged autocomplete suggestions for a prefix
pub struct SuggestionResolver {
    store: Arc<dyn ContentStore>,
}

impl SuggestionResolver {
    pub fn new(store: Arc<dyn ContentStore>) -> Self {
        Self { store }
    }

    /// Suggest up to `limit` candidates for `prefix`, best first
    ///
    /// Popular queries are scored by relative popularity, the textual
    /// sources by match closeness; each source is normalized to `(0, 1]`
    /// before the merge. Duplicate texts keep their highest-scoring entry.
    pub async fn suggest(&self, prefix: &str, limit: usize) -> Vec<Suggestion> {
        let prefix = prefix.trim();
        if prefix.is_empty() || limit == 0 {
            return Vec::new();
        }

        let (queries, tags, topics, authors) = tokio::join!(
            self.store.popular_queries(prefix, limit),
            self.store.matching_tags(prefix, limit),
            self.store.matching_topics(prefix, limit),
            self.store.matching_authors(prefix, limit),
        );

        let mut suggestions = Vec::new();
        match queries {
            Ok(rows) => {
                let max_count = rows.iter().map(|q| q.count).max().unwrap_or(0).max(1);
                suggestions.extend(rows.into_iter().map(|q| Suggestion {
                    score: q.count as f32 / max_count as f32,
                    text: q.text,
                    kind: SuggestionKind::Query,
                }));
            }
            Err(error) => log_source_failure("popular_queries", &error),
        }
        suggestions.extend(scored_source(tags, prefix, SuggestionKind::Tag, "tags"));
        suggestions.extend(scored_source(topics, prefix, SuggestionKind::Topic, "topics"));
        suggestions.extend(scored_source(
            authors,
            prefix,
            SuggestionKind::Author,
            "authors",
        ));

        suggestions.sort_by(|a, b| {
            b.score
                .total_cmp(&a.score)
                .then_with(|| a.text.cmp(&b.text))
        });
        dedupe_by_text(&mut suggestions);
        suggestions.truncate(limit);
        suggestions
    }
}

/// Score one textual source by fuzzy closeness to the prefix
fn scored_source(
    candidates: Result<Vec<String>, StoreError>,
    prefix: &str,
    kind: SuggestionKind,
    source: &'static str,
) -> Vec<Suggestion> {
    let candidates = match candidates {
        Ok(candidates) => candidates,
        Err(error) => {
            log_source_failure(source, &error);
            return Vec::new();
        }
    };

    let matcher = SkimMatcherV2::default();
    let scored: Vec<(String, i64)> = candidates
        .into_iter()
        .filter_map(|text| {
            matcher
                .fuzzy_match(&text, prefix)
                .map(|score| (text, score))
        })
        .collect();
    let max_score = scored.iter().map(|(_, s)| *s).max().unwrap_or(0).max(1);

    scored
        .into_iter()
        .map(|(text, score)| Suggestion {
            text,
            kind,
            score: score as f32 / max_score as f32,
        })
        .collect()
}

fn log_source_failure(source: &'static str, error: &StoreError) {
    tracing::warn!(
        source = source,
        error = %error,
        "suggestion source failed, continuing without it"
    );
}

/// Keep the first (highest-scoring, given prior sort) entry per text
fn dedupe_by_text(suggestions: &mut Vec<Suggestion>) {
    let mut seen = std::collections::HashSet::new();
    suggestions.retain(|s| seen.insert(s.text.to_lowercase()));
}
