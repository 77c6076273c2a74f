use serde::{Deserialize, Serialize};

use crate::collector::Layout;

/// One extracted article
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ArticleRecord {
    pub keyword: String,
    pub title: String,
    pub authors: String,
    pub views: u64,
}

impl ArticleRecord {
    pub fn new(
        keyword: impl Into<String>,
        title: impl Into<String>,
        authors: impl Into<String>,
        views: u64,
    ) -> Self {
        Self {
            keyword: keyword.into(),
            title: title.into(),
            authors: authors.into(),
            views: views.max(1),
        }
    }
}

/// Outcome of one collection run.
///
/// An empty `records` with no `error` means the site returned nothing usable;
/// `error` is set only when the run itself failed.
#[derive(Debug, Clone, Serialize)]
pub struct CollectionResult {
    pub keyword: String,
    pub records: Vec<ArticleRecord>,
    pub layout: Option<Layout>,
    pub selector: Option<String>,
    pub candidates: usize,
    pub error: Option<String>,
}

impl CollectionResult {
    pub fn failed(keyword: &str, message: String) -> Self {
        Self {
            keyword: keyword.to_string(),
            records: Vec::new(),
            layout: None,
            selector: None,
            candidates: 0,
            error: Some(message),
        }
    }

    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }

    pub fn len(&self) -> usize {
        self.records.len()
    }
}
