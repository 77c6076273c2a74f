use once_cell::sync::Lazy;
use regex::Regex;
use scraper::{ElementRef, Html, Selector};
use std::fmt;
use tracing::debug;

use super::page::ArticleSelector;
use crate::models::ArticleRecord;

pub const MIN_TITLE_CHARS: usize = 20;

/// UI chrome that sometimes sits inside a result container
pub const GARBAGE_PHRASES: &[&str] = &[
    "Sign in",
    "Update Search",
    "Publication Date",
    "Show export options",
    "Unknown",
    "Subscribe",
];

pub const UNKNOWN_AUTHORS: &str = "Unknown";

static TITLE_LINK: Lazy<Selector> = Lazy::new(|| Selector::parse(".title-link").unwrap());
static ANCHOR: Lazy<Selector> = Lazy::new(|| Selector::parse("a").unwrap());
static AUTHORS: Lazy<Selector> = Lazy::new(|| Selector::parse(".authors").unwrap());
static VIEWS: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"(?:Viewed by|Views)[:\s]*([\d,]+)").unwrap());

/// One way of pulling a field out of a result container
type FieldStrategy = fn(&ElementRef) -> Option<String>;

const TITLE_STRATEGIES: &[FieldStrategy] = &[title_link_text, first_anchor_text];
const AUTHOR_STRATEGIES: &[FieldStrategy] = &[authors_text];

/// Why a candidate element did not become a record
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Rejection {
    NoTitle,
    TitleTooShort(usize),
    GarbageTitle(&'static str),
    MissingAuthors,
}

impl fmt::Display for Rejection {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Rejection::NoTitle => write!(f, "no title"),
            Rejection::TitleTooShort(n) => write!(f, "title too short ({} chars)", n),
            Rejection::GarbageTitle(phrase) => write!(f, "title contains {:?}", phrase),
            Rejection::MissingAuthors => write!(f, "no authors"),
        }
    }
}

/// Elements whose text never renders
const NON_VISIBLE_TAGS: &[&str] = &["script", "style", "noscript", "template"];

/// Rendered text of `element`: script and style bodies skipped, runs of
/// whitespace collapsed
fn normalized_text(element: &ElementRef) -> String {
    let mut parts = Vec::new();
    for node in element.descendants() {
        let Some(text) = node.value().as_text() else {
            continue;
        };
        let hidden = node
            .ancestors()
            .take_while(|ancestor| *ancestor != **element)
            .any(|ancestor| {
                ancestor
                    .value()
                    .as_element()
                    .is_some_and(|e| NON_VISIBLE_TAGS.contains(&e.name()))
            });
        if !hidden {
            parts.push(&**text);
        }
    }

    parts
        .join(" ")
        .split_whitespace()
        .collect::<Vec<_>>()
        .join(" ")
}

fn non_empty(text: String) -> Option<String> {
    if text.is_empty() { None } else { Some(text) }
}

fn title_link_text(element: &ElementRef) -> Option<String> {
    element
        .select(&TITLE_LINK)
        .next()
        .and_then(|e| non_empty(normalized_text(&e)))
}

fn first_anchor_text(element: &ElementRef) -> Option<String> {
    element
        .select(&ANCHOR)
        .next()
        .and_then(|e| non_empty(normalized_text(&e)))
}

fn authors_text(element: &ElementRef) -> Option<String> {
    element
        .select(&AUTHORS)
        .next()
        .and_then(|e| non_empty(normalized_text(&e)))
}

fn first_success(strategies: &[FieldStrategy], element: &ElementRef) -> Option<String> {
    strategies.iter().find_map(|strategy| strategy(element))
}

/// Visible text of the whole container
pub fn visible_text(element: &ElementRef) -> String {
    normalized_text(element)
}

/// Views parsed from "Viewed by 1,234" / "Views: 56"; 1 when absent
pub fn parse_views(text: &str) -> u64 {
    VIEWS
        .captures(text)
        .and_then(|caps| caps.get(1))
        .and_then(|m| m.as_str().replace(',', "").parse::<u64>().ok())
        .map(|views| views.max(1))
        .unwrap_or(1)
}

/// Checks applied to a title, in order: length, then garbage phrases
pub fn check_title(title: &str) -> Result<(), Rejection> {
    let chars = title.chars().count();
    if chars < MIN_TITLE_CHARS {
        return Err(Rejection::TitleTooShort(chars));
    }
    if let Some(phrase) = GARBAGE_PHRASES.iter().copied().find(|p| title.contains(p)) {
        return Err(Rejection::GarbageTitle(phrase));
    }
    Ok(())
}

/// Turn one result container into a record, or say why not
pub fn extract_record(element: &ElementRef, keyword: &str) -> Result<ArticleRecord, Rejection> {
    let title = first_success(TITLE_STRATEGIES, element).ok_or(Rejection::NoTitle)?;
    check_title(&title)?;

    let authors = first_success(AUTHOR_STRATEGIES, element)
        .filter(|a| a != UNKNOWN_AUTHORS)
        .ok_or(Rejection::MissingAuthors)?;

    let views = parse_views(&visible_text(element));

    Ok(ArticleRecord::new(keyword, title, authors, views))
}

/// Extract every acceptable record from a parsed page. Rejected elements are
/// logged and skipped.
pub fn extract_records(
    document: &Html,
    selector: ArticleSelector,
    keyword: &str,
) -> Vec<ArticleRecord> {
    let mut records = Vec::new();
    let mut rejected = 0usize;

    for element in document.select(selector.selector()) {
        match extract_record(&element, keyword) {
            Ok(record) => records.push(record),
            Err(reason) => {
                rejected += 1;
                debug!("Skipping element: {}", reason);
            }
        }
    }

    debug!(
        "Extracted {} records, rejected {} elements",
        records.len(),
        rejected
    );
    records
}
