//! Fixed-result search client for unit tests.

use super::{SearchClient, SearchHit};
use crate::error::{Result, ScriptcastError};
use async_trait::async_trait;
use std::sync::Mutex;

/// Returns the same hits for every query and records the queries.
pub struct StaticSearch {
    hits: Vec<SearchHit>,
    fail: bool,
    queries: Mutex<Vec<String>>,
}

impl StaticSearch {
    pub fn new(hits: Vec<SearchHit>) -> Self {
        Self {
            hits,
            fail: false,
            queries: Mutex::new(Vec::new()),
        }
    }

    /// A client whose every search fails.
    pub fn failing() -> Self {
        Self {
            hits: Vec::new(),
            fail: true,
            queries: Mutex::new(Vec::new()),
        }
    }

    pub fn queries(&self) -> Vec<String> {
        self.queries.lock().unwrap().clone()
    }
}

#[async_trait]
impl SearchClient for StaticSearch {
    async fn search(&self, query: &str, limit: usize) -> Result<Vec<SearchHit>> {
        self.queries.lock().unwrap().push(query.to_string());
        if self.fail {
            return Err(ScriptcastError::Search("search backend unavailable".to_string()));
        }
        Ok(self.hits.iter().take(limit).cloned().collect())
    }

    fn name(&self) -> &str {
        "static"
    }
}
