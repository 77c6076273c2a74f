use once_cell::sync::Lazy;
use regex::Regex;

use super::stopwords::StopwordSet;

static WORD: Lazy<Regex> = Lazy::new(|| Regex::new(r"\b[a-zA-Z]{3,}\b").unwrap());

/// Lowercase alphabetic runs of three or more letters, in title order.
/// Repeats are kept.
pub fn tokenize(title: &str) -> Vec<String> {
    let lower = title.to_lowercase();
    WORD.find_iter(&lower)
        .map(|m| m.as_str().to_string())
        .collect()
}

pub fn filter_stopwords(tokens: Vec<String>, stopwords: &StopwordSet) -> Vec<String> {
    tokens
        .into_iter()
        .filter(|t| !stopwords.contains(t))
        .collect()
}

/// `tokenize` then `filter_stopwords`
pub fn keywords(title: &str, stopwords: &StopwordSet) -> Vec<String> {
    filter_stopwords(tokenize(title), stopwords)
}
