use once_cell::sync::Lazy;
use scraper::{Html, Selector};
use serde::Serialize;
use std::time::Duration;
use tokio::time::sleep;
use tracing::{debug, info, warn};

use super::session::BrowserSession;
use crate::config::Config;
use crate::error::{TrackerError, TrackerResult};

/// Free-text banner the site shows when it serves its redesigned layout
pub const ALTERNATE_MARKER: &str = "new version of our website";

static PRIMARY: Lazy<Selector> = Lazy::new(|| Selector::parse(".generic-item").unwrap());
static SECONDARY: Lazy<Selector> = Lazy::new(|| Selector::parse(".article-item").unwrap());

/// Which page structure the site served
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum Layout {
    /// Classic result list, `.generic-item` rows present
    Legacy,
    /// The redesign banner is on the page
    Alternate,
    /// No banner and no classic rows (yet)
    Unknown,
}

/// Candidate article containers, in the order they are tried
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ArticleSelector {
    Primary,
    Secondary,
}

impl ArticleSelector {
    pub fn css(&self) -> &'static str {
        match self {
            ArticleSelector::Primary => ".generic-item",
            ArticleSelector::Secondary => ".article-item",
        }
    }

    pub fn selector(&self) -> &'static Selector {
        match self {
            ArticleSelector::Primary => &*PRIMARY,
            ArticleSelector::Secondary => &*SECONDARY,
        }
    }
}

/// Timing knobs for page acquisition
#[derive(Debug, Clone, Copy)]
pub struct AcquireOptions {
    pub settle_delay: Duration,
    pub poll_attempts: u32,
    pub poll_interval: Duration,
}

impl From<&Config> for AcquireOptions {
    fn from(config: &Config) -> Self {
        Self {
            settle_delay: config.settle_delay,
            poll_attempts: config.poll_attempts,
            poll_interval: config.poll_interval,
        }
    }
}

/// Final page source plus what was learned about it
#[derive(Debug, Clone)]
pub struct PageSnapshot {
    pub html: String,
    pub layout: Layout,
    pub selector: Option<ArticleSelector>,
}

impl PageSnapshot {
    pub fn document(&self) -> Html {
        Html::parse_document(&self.html)
    }

    pub fn candidate_count(&self) -> usize {
        self.selector
            .map(|s| count_candidates(&self.html, s))
            .unwrap_or(0)
    }
}

pub fn count_candidates(html: &str, selector: ArticleSelector) -> usize {
    Html::parse_document(html)
        .select(selector.selector())
        .count()
}

pub fn detect_layout(html: &str) -> Layout {
    if html.to_lowercase().contains(ALTERNATE_MARKER) {
        Layout::Alternate
    } else if count_candidates(html, ArticleSelector::Primary) > 0 {
        Layout::Legacy
    } else {
        Layout::Unknown
    }
}

/// Load `url`, let client-side rendering settle, classify the layout and
/// settle on the selector that yields article candidates.
///
/// Only navigation and page-source failures are errors; a page with no
/// candidates comes back as a snapshot with `selector: None`.
pub async fn acquire_page<S: BrowserSession>(
    session: &mut S,
    url: &str,
    options: AcquireOptions,
) -> TrackerResult<PageSnapshot> {
    session
        .navigate(url)
        .map_err(|e| TrackerError::navigation(url, e))?;

    info!(
        "Waiting {:.1}s for page to render",
        options.settle_delay.as_secs_f64()
    );
    sleep(options.settle_delay).await;

    let mut html = session.page_source().map_err(TrackerError::page_source)?;
    let layout = detect_layout(&html);
    debug!(
        "Detected {:?} layout, {} primary candidates",
        layout,
        count_candidates(&html, ArticleSelector::Primary)
    );

    let selector = match layout {
        Layout::Legacy => Some(ArticleSelector::Primary),
        Layout::Alternate | Layout::Unknown => {
            warn!("{:?} layout, re-polling for classic results", layout);
            html = poll_primary(session, &html, options).await?;

            if count_candidates(&html, ArticleSelector::Primary) > 0 {
                Some(ArticleSelector::Primary)
            } else if count_candidates(&html, ArticleSelector::Secondary) > 0 {
                info!("Falling back to {}", ArticleSelector::Secondary.css());
                Some(ArticleSelector::Secondary)
            } else {
                None
            }
        }
    };

    Ok(PageSnapshot {
        html,
        layout,
        selector,
    })
}

/// Re-read the page up to `poll_attempts` times until the primary selector
/// matches. Returns the last source read.
async fn poll_primary<S: BrowserSession>(
    session: &mut S,
    current: &str,
    options: AcquireOptions,
) -> TrackerResult<String> {
    let mut html = current.to_string();

    for attempt in 1..=options.poll_attempts {
        html = session.page_source().map_err(TrackerError::page_source)?;
        let found = count_candidates(&html, ArticleSelector::Primary);
        if found > 0 {
            info!("Classic results appeared on poll {} ({} items)", attempt, found);
            break;
        }
        debug!("Poll {}/{}: no classic results", attempt, options.poll_attempts);
        if attempt < options.poll_attempts {
            sleep(options.poll_interval).await;
        }
    }

    Ok(html)
}
