//! Per-user and per-author result enrichment
//!
//! Enrichment is read-only and additive: it attaches user context and author
//! display fields to the current page's items without touching the catalog
//! or the index. It is also best-effort: any lookup failure degrades to the
//! un-enriched items rather than failing the query, and items are never left
//! half-enriched.

use std::collections::{HashMap, HashSet};
use std::sync::Arc;

use crate::store::{ContentStore, InteractionKind};
use crate::types::ResultItem;

/// Attaches user interaction state, progress, and author summaries
pub struct ResultEnricher {
    store: Arc<dyn ContentStore>,
}

impl ResultEnricher {
    pub fn new(store: Arc<dyn ContentStore>) -> Self {
        Self { store }
    }

    /// Enrich the current page's items for `user_id`
    ///
    /// Without a user id the items pass through untouched, leaving the
    /// user-context fields absent so callers can tell "no user context
    /// requested" from "no interaction found". Lookups cover exactly the
    /// page's item ids and distinct author ids, never the whole catalog.
    pub async fn enrich(&self, items: Vec<ResultItem>, user_id: Option<&str>) -> Vec<ResultItem> {
        let Some(user_id) = user_id else {
            return items;
        };
        if items.is_empty() {
            return items;
        }

        let item_ids: Vec<String> = items.iter().map(|item| item.id.clone()).collect();
        let author_ids: Vec<String> = {
            let mut seen = HashSet::new();
            items
                .iter()
                .filter(|item| seen.insert(item.author_id.clone()))
                .map(|item| item.author_id.clone())
                .collect()
        };

        let (interactions, progress, authors) = tokio::join!(
            self.store.user_interactions(user_id, &item_ids),
            self.store.user_progress(user_id, &item_ids),
            self.store.author_summaries(&author_ids),
        );

        // All-or-nothing: one failed lookup returns the items unchanged.
        let (interactions, progress, authors) = match (interactions, progress, authors) {
            (Ok(i), Ok(p), Ok(a)) => (i, p, a),
            (i, p, a) => {
                let error = [
                    i.err().map(|e| e.to_string()),
                    p.err().map(|e| e.to_string()),
                    a.err().map(|e| e.to_string()),
                ]
                .into_iter()
                .flatten()
                .collect::<Vec<_>>()
                .join("; ");
                tracing::warn!(
                    user_id = user_id,
                    error = %error,
                    "enrichment lookup failed, returning un-enriched items"
                );
                return items;
            }
        };

        let mut bookmarked = HashSet::new();
        let mut liked = HashSet::new();
        for row in interactions {
            match row.kind {
                InteractionKind::Bookmark => bookmarked.insert(row.item_id),
                InteractionKind::Like => liked.insert(row.item_id),
            };
        }
        let progress_by_id: HashMap<String, (f32, bool)> = progress
            .into_iter()
            .map(|row| (row.item_id, (row.percent, row.completed)))
            .collect();
        let authors_by_id: HashMap<String, (Option<String>, bool)> = authors
            .into_iter()
            .map(|author| (author.id, (author.avatar, author.verified)))
            .collect();

        items
            .into_iter()
            .map(|mut item| {
                item.is_bookmarked = Some(bookmarked.contains(&item.id));
                item.is_liked = Some(liked.contains(&item.id));
                if let Some((percent, completed)) = progress_by_id.get(&item.id) {
                    item.progress = Some(*percent);
                    item.is_completed = Some(*completed);
                }
                if let Some((avatar, verified)) = authors_by_id.get(&item.author_id) {
                    item.author_avatar = avatar.clone();
                    item.author_verified = Some(*verified);
                }
                item
            })
            .collect()
    }
}
