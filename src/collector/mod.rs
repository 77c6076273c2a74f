pub mod extract;
pub mod page;
pub mod session;

pub use extract::{Rejection, extract_record, extract_records, parse_views};
pub use page::{
    AcquireOptions, ArticleSelector, Layout, PageSnapshot, acquire_page, detect_layout,
};
pub use session::{
    BrowserBinary, BrowserSession, ChromeSession, ChromeSessionFactory, SessionFactory,
    SessionGuard,
};

use std::time::Instant;
use tracing::{error, info, warn};

use crate::config::Config;
use crate::error::{TrackerError, TrackerResult};
use crate::models::CollectionResult;

/// Runs one keyword search end to end: browser session, page, records.
///
/// Each call opens and tears down its own session; nothing is cached
/// between runs.
pub struct Collector<F: SessionFactory> {
    factory: F,
    config: Config,
}

impl Collector<ChromeSessionFactory> {
    /// Collector backed by a real headless Chrome
    pub fn from_config(config: Config) -> Self {
        let factory = ChromeSessionFactory::from_config(&config);
        Self::new(factory, config)
    }
}

impl<F: SessionFactory> Collector<F> {
    pub fn new(factory: F, config: Config) -> Self {
        Self { factory, config }
    }

    /// Collect article records for `keyword`.
    ///
    /// Never fails: a run that cannot complete comes back empty with its
    /// `error` message set.
    pub async fn collect(&self, keyword: &str) -> CollectionResult {
        let started = Instant::now();
        info!("Collecting articles for '{}'", keyword);

        match self.run(keyword).await {
            Ok(result) => {
                if result.is_empty() {
                    warn!("No articles found for '{}'", keyword);
                }
                info!(
                    "Collected {} records in {:.2}s",
                    result.len(),
                    started.elapsed().as_secs_f64()
                );
                result
            }
            Err(e) => {
                error!("Collection failed for '{}': {}", keyword, e);
                CollectionResult::failed(keyword, e.to_string())
            }
        }
    }

    async fn run(&self, keyword: &str) -> TrackerResult<CollectionResult> {
        let session = self.factory.open().map_err(TrackerError::session)?;
        let mut session = SessionGuard::new(session);

        let url = self.config.search_url(keyword);
        info!("Loading {}", url);
        let options = AcquireOptions::from(&self.config);
        let page = acquire_page(&mut *session, &url, options).await?;

        let candidates = page.candidate_count();
        info!("Found {} candidate elements", candidates);

        let records = match page.selector {
            Some(selector) => extract_records(&page.document(), selector, keyword),
            None => Vec::new(),
        };

        Ok(CollectionResult {
            keyword: keyword.to_string(),
            records,
            layout: Some(page.layout),
            selector: page.selector.map(|s| s.css().to_string()),
            candidates,
            error: None,
        })
    }
}
