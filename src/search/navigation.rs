use tracing::info;

use super::query::Query;
use super::traits::Navigator;

/// In-process [`Navigator`] holding a path, its query and the visited locations.
#[derive(Debug, Clone)]
pub struct MemoryNavigator {
    path: String,
    query: Query,
    history: Vec<String>,
}

impl MemoryNavigator {
    pub fn new(path: impl Into<String>) -> Self {
        Self::with_query(path, Query::new())
    }

    /// Start at a location such as `/?duration=7` or a full URL.
    pub fn from_url(location: &str) -> Self {
        let path = match location.find('?') {
            Some(pos) => &location[..pos],
            None if location.contains('=') => "/",
            None => location,
        };
        let path = if path.is_empty() { "/" } else { path };
        Self::with_query(path, Query::parse(location))
    }

    fn with_query(path: impl Into<String>, query: Query) -> Self {
        let mut navigator = Self {
            path: path.into(),
            query,
            history: Vec::new(),
        };
        navigator.history.push(navigator.location());
        navigator
    }

    pub fn location(&self) -> String {
        if self.query.is_empty() {
            self.path.clone()
        } else {
            format!("{}?{}", self.path, self.query)
        }
    }

    /// Every distinct location visited, oldest first
    pub fn history(&self) -> &[String] {
        &self.history
    }
}

impl Navigator for MemoryNavigator {
    fn current_query(&self) -> Query {
        self.query.clone()
    }

    fn replace_url(&mut self, query: &Query) {
        if &self.query == query {
            return;
        }
        self.query = query.clone();
        let location = self.location();
        info!(%location, "navigated");
        self.history.push(location);
    }
}
