//! Fuzzy text matching against the cached index
//!
//! Scores are closeness distances: 0 is a perfect match, lower is better. A
//! document's score combines its matched field scores multiplicatively,
//! each raised to the field's weight, so a hit in a heavy field (title)
//! pulls the combined score down further than the same hit in a light one
//! (topics), and matching several fields compounds.

use crate::index::SearchIndex;
use crate::types::{Highlight, SearchField};

/// Scale applied to substring hits so they always beat the fuzzy threshold
const SUBSTRING_SCALE: f64 = 0.1;

/// Floor applied before exponentiation; keeps field weight meaningful when
/// a field matches perfectly (a true zero would erase every other factor)
const SCORE_FLOOR: f64 = 1e-6;

/// Minimum Jaro-Winkler similarity for a did-you-mean correction
const CORRECTION_SIMILARITY: f64 = 0.80;

/// One candidate produced by the text path, before filter intersection
#[derive(Debug, Clone)]
pub struct TextMatch {
    pub id: String,
    /// Weight-combined distance; 0 = perfect, lower = closer
    pub score: f32,
    pub highlights: Vec<Highlight>,
}

/// Runs fuzzy matches against an index snapshot
#[derive(Debug, Clone)]
pub struct TextResolver {
    fuzzy_threshold: f32,
    highlight_window: usize,
}

impl TextResolver {
    pub fn new(fuzzy_threshold: f32, highlight_window: usize) -> Self {
        Self {
            fuzzy_threshold,
            highlight_window,
        }
    }

    /// Match `text` against the index restricted to `scope`
    ///
    /// An empty scope means all weighted fields. With `fuzzy` off only
    /// substring-containing fields match (near-exact behavior). The result
    /// is sorted by score ascending; ties keep index insertion order, so
    /// repeated runs against the same snapshot order identically. No match
    /// is an empty list, never an error.
    #[must_use]
    pub fn resolve(
        &self,
        index: &SearchIndex,
        text: &str,
        scope: &[SearchField],
        fuzzy: bool,
    ) -> Vec<TextMatch> {
        let query = text.trim().to_lowercase();
        if query.is_empty() {
            return Vec::new();
        }
        let tokens: Vec<&str> = query.split_whitespace().collect();
        let all_fields = SearchField::all();
        let scope: &[SearchField] = if scope.is_empty() { &all_fields } else { scope };

        let mut matches = Vec::new();
        for doc in index.documents() {
            let mut combined = 1.0f64;
            let mut matched = false;
            let mut highlights = Vec::new();

            for &field in scope {
                let haystack = doc.search_text(field);
                if haystack.is_empty() {
                    continue;
                }
                let field_score = match substring_score(&query, haystack) {
                    Some(score) => Some(score),
                    None if fuzzy => {
                        token_score(&tokens, haystack)
                            .filter(|s| *s <= f64::from(self.fuzzy_threshold))
                    }
                    None => None,
                };
                let Some(field_score) = field_score else {
                    continue;
                };
                matched = true;
                combined *= field_score.max(SCORE_FLOOR).powf(f64::from(field.weight()));
                if let Some(fragment) =
                    fragment(&doc.display_text(field), &query, &tokens, self.highlight_window)
                {
                    highlights.push(Highlight { field, fragment });
                }
            }

            if matched {
                matches.push(TextMatch {
                    id: doc.id.clone(),
                    score: combined as f32,
                    highlights,
                });
            }
        }

        // Stable sort: equal scores keep store-snapshot order.
        matches.sort_by(|a, b| a.score.total_cmp(&b.score));
        matches
    }
}

/// Suggest the closest index term when a text query matched nothing
#[must_use]
pub fn did_you_mean(index: &SearchIndex, text: &str) -> Option<String> {
    let query = text.trim().to_lowercase();
    if query.is_empty() {
        return None;
    }
    let mut best: Option<(f64, &str)> = None;
    for term in index.vocabulary() {
        let term_lower = term.to_lowercase();
        if term_lower == query {
            continue;
        }
        let similarity = strsim::jaro_winkler(&query, &term_lower);
        if similarity < CORRECTION_SIMILARITY {
            continue;
        }
        let better = match best {
            None => true,
            Some((best_similarity, best_term)) => {
                similarity > best_similarity || (similarity == best_similarity && term < best_term)
            }
        };
        if better {
            best = Some((similarity, term));
        }
    }
    best.map(|(_, term)| term.to_string())
}

/// Distance for a whole-phrase substring hit
///
/// Equality scores 0; containment scores by how much of the field the query
/// covers, always below the fuzzy range.
fn substring_score(query: &str, haystack: &str) -> Option<f64> {
    if haystack == query {
        return Some(0.0);
    }
    if !haystack.contains(query) {
        return None;
    }
    let coverage = query.chars().count() as f64 / haystack.chars().count().max(1) as f64;
    Some(SUBSTRING_SCALE * (1.0 - coverage))
}

/// Mean over query tokens of the best per-token Jaro-Winkler distance
fn token_score(tokens: &[&str], haystack: &str) -> Option<f64> {
    let mut total = 0.0f64;
    for token in tokens {
        let best = haystack
            .split_whitespace()
            .map(|hay| 1.0 - strsim::jaro_winkler(token, hay))
            .fold(f64::INFINITY, f64::min);
        if !best.is_finite() {
            return None;
        }
        total += best;
    }
    Some(total / tokens.len() as f64)
}

/// Best-effort fragment around the first hit of the query in `raw`
///
/// Matching is ASCII-case-insensitive so byte offsets stay valid in the
/// original text; window edges snap to char boundaries.
fn fragment(raw: &str, query: &str, tokens: &[&str], window: usize) -> Option<String> {
    if raw.is_empty() {
        return None;
    }
    let lowered = raw.to_ascii_lowercase();
    let (pos, len) = match lowered.find(query) {
        Some(pos) => (pos, query.len()),
        None => tokens
            .iter()
            .filter_map(|token| lowered.find(token).map(|pos| (pos, token.len())))
            .min_by_key(|(pos, _)| *pos)?,
    };

    let half = window.saturating_sub(len) / 2;
    let mut start = pos.saturating_sub(half);
    let mut end = (pos + len + half).min(raw.len());
    while start > 0 && !raw.is_char_boundary(start) {
        start -= 1;
    }
    while end < raw.len() && !raw.is_char_boundary(end) {
        end += 1;
    }

    let mut out = String::new();
    if start > 0 {
        out.push('…');
    }
    out.push_str(raw[start..end].trim());
    if end < raw.len() {
        out.push('…');
    }
    Some(out)
}
