/// Note searcher with fuzzy matching
///
/// Scores each note by its title and body and keeps the best matches.

use crate::db::{Database, Note};
use crate::error::Result;
use fuzzy_matcher::skim::SkimMatcherV2;
use fuzzy_matcher::FuzzyMatcher;

/// Default number of results returned by a search
pub const DEFAULT_SEARCH_LIMIT: usize = 50;

/// Title hits count for more than body hits
const TITLE_WEIGHT: i64 = 2;

/// A matched note and its score
#[derive(Debug, Clone)]
pub struct SearchResult {
    pub note: Note,
    pub score: i64,
}

/// Handles note searching with fuzzy matching
pub struct Searcher {
    matcher: SkimMatcherV2,
}

impl Default for Searcher {
    fn default() -> Self {
        Self::new()
    }
}

impl Searcher {
    pub fn new() -> Self {
        Self {
            matcher: SkimMatcherV2::default(),
        }
    }

    /// Search notes with fuzzy matching
    ///
    /// # Arguments
    /// * `db` - Database to read notes from
    /// * `query` - Search query; blank matches nothing
    /// * `limit` - Maximum results to return
    ///
    /// # Returns
    /// * `Ok(Vec<SearchResult>)` - Search results sorted by score
    pub async fn search(
        &self,
        db: &Database,
        query: &str,
        limit: usize,
    ) -> Result<Vec<SearchResult>> {
        let query = query.trim();
        if query.is_empty() {
            return Ok(Vec::new());
        }

        let notes = db.get_all_notes().await?;
        Ok(self.rank(notes, query, limit))
    }

    /// Score and order already-loaded notes
    pub fn rank(&self, notes: Vec<Note>, query: &str, limit: usize) -> Vec<SearchResult> {
        let mut results: Vec<SearchResult> = notes
            .into_iter()
            .filter_map(|note| {
                let title = self
                    .matcher
                    .fuzzy_match(&note.title, query)
                    .map(|s| s * TITLE_WEIGHT);
                let body = self.matcher.fuzzy_match(&note.body, query);

                title.max(body).map(|score| SearchResult { note, score })
            })
            .collect();

        // Stable sort keeps the store's recency order among equal scores
        results.sort_by(|a, b| b.score.cmp(&a.score));
        results.truncate(limit);

        results
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::testing::{FixedClock, SequenceIds};
    use crate::db::NoteInput;
    use std::sync::Arc;

    async fn setup() -> Database {
        let db = Database::new_test(
            Arc::new(FixedClock::new(0)),
            Arc::new(SequenceIds::default()),
        )
        .await
        .unwrap();

        let notes = vec![
            ("Groceries", "milk, eggs, bread"),
            ("Rust notes", "ownership and borrowing"),
            ("Meeting", "discuss the rust migration"),
            ("Travel", "pack passport"),
        ];

        for (title, body) in notes {
            db.create_note(NoteInput {
                title: title.to_string(),
                body: body.to_string(),
                folder_id: None,
            })
            .await
            .unwrap();
        }

        db
    }

    #[tokio::test]
    async fn test_fuzzy_search() {
        let db = setup().await;
        let searcher = Searcher::new();

        let results = searcher.search(&db, "rust", 10).await.unwrap();
        assert!(results.len() >= 2);
        // Title matches outrank body matches
        assert_eq!(results[0].note.title, "Rust notes");
    }

    #[tokio::test]
    async fn test_fuzzy_typo() {
        let db = setup().await;
        let searcher = Searcher::new();

        let results = searcher.search(&db, "psprt", 10).await.unwrap();
        assert!(!results.is_empty());
        assert_eq!(results[0].note.title, "Travel");
    }

    #[tokio::test]
    async fn test_blank_query_and_limit() {
        let db = setup().await;
        let searcher = Searcher::new();

        assert!(searcher.search(&db, "   ", 10).await.unwrap().is_empty());
        assert_eq!(searcher.search(&db, "e", 1).await.unwrap().len(), 1);
    }
}
