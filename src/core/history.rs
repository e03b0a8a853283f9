use std::collections::VecDeque;
use tracing::debug;

pub const DEFAULT_HISTORY_LIMIT: usize = 5;

/// Most recent search queries, newest first.
///
/// Queries are compared case-insensitively; searching again for a query
/// already in the list moves it to the front with the newest spelling.
#[derive(Debug, Clone)]
pub struct RecentSearches {
    limit: usize,
    queries: VecDeque<String>,
}

impl RecentSearches {
    pub fn new(limit: usize) -> Self {
        Self {
            limit,
            queries: VecDeque::with_capacity(limit),
        }
    }

    pub fn record(&mut self, query: &str) {
        let query = query.trim();
        if query.is_empty() || self.limit == 0 {
            return;
        }

        let lowered = query.to_lowercase();
        self.queries.retain(|q| q.to_lowercase() != lowered);
        self.queries.push_front(query.to_string());
        self.queries.truncate(self.limit);
        debug!(query, size = self.queries.len(), "Recorded recent search");
    }

    pub fn iter(&self) -> impl Iterator<Item = &str> {
        self.queries.iter().map(String::as_str)
    }

    pub fn len(&self) -> usize {
        self.queries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.queries.is_empty()
    }

    pub fn clear(&mut self) {
        self.queries.clear();
    }
}

impl Default for RecentSearches {
    fn default() -> Self {
        Self::new(DEFAULT_HISTORY_LIMIT)
    }
}
