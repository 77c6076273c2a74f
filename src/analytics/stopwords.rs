use serde::Serialize;
use std::collections::BTreeSet;

/// Words that say nothing about a research trend
pub const DEFAULT_STOPWORDS: &[&str] = &[
    "analysis",
    "study",
    "method",
    "using",
    "based",
    "data",
    "journal",
    "and",
    "the",
    "for",
    "from",
    "with",
    "between",
    "during",
    "review",
    "research",
    "results",
    "model",
    "approach",
    "effect",
    "response",
    "potential",
    "application",
    "development",
];

/// User-editable exclusion list. Owned by the caller and passed into the
/// analytics functions explicitly.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(transparent)]
pub struct StopwordSet {
    words: BTreeSet<String>,
}

impl Default for StopwordSet {
    fn default() -> Self {
        Self {
            words: DEFAULT_STOPWORDS.iter().map(|w| w.to_string()).collect(),
        }
    }
}

impl StopwordSet {
    pub fn empty() -> Self {
        Self {
            words: BTreeSet::new(),
        }
    }

    pub fn from_words<I, S>(words: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        Self {
            words: words
                .into_iter()
                .map(|w| w.as_ref().trim().to_lowercase())
                .filter(|w| !w.is_empty())
                .collect(),
        }
    }

    /// Add comma-separated words; returns how many were new
    pub fn add(&mut self, input: &str) -> usize {
        input
            .split(',')
            .map(|w| w.trim().to_lowercase())
            .filter(|w| !w.is_empty())
            .filter(|w| self.words.insert(w.clone()))
            .count()
    }

    pub fn remove(&mut self, word: &str) -> bool {
        self.words.remove(&word.trim().to_lowercase())
    }

    /// Back to the default list
    pub fn reset(&mut self) {
        *self = Self::default();
    }

    pub fn contains(&self, word: &str) -> bool {
        self.words.contains(word)
    }

    pub fn len(&self) -> usize {
        self.words.len()
    }

    pub fn is_empty(&self) -> bool {
        self.words.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = &str> {
        self.words.iter().map(String::as_str)
    }

    /// The set in force for one search: these words plus the lowercase
    /// words of the keyword itself. `self` is left untouched.
    pub fn for_keyword(&self, keyword: &str) -> StopwordSet {
        let mut active = self.clone();
        active
            .words
            .extend(keyword.to_lowercase().split_whitespace().map(str::to_string));
        active
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_list() {
        let set = StopwordSet::default();
        assert_eq!(set.len(), DEFAULT_STOPWORDS.len());
        assert!(set.contains("research"));
        assert!(set.contains("the"));
        assert!(!set.contains("soil"));
    }

    #[test]
    fn test_add_comma_separated() {
        let mut set = StopwordSet::empty();
        assert_eq!(set.add(" Review, analysis ,, DATA"), 3);
        assert_eq!(set.add("review, novel"), 1);
        assert!(set.contains("review"));
        assert!(set.contains("novel"));
        assert_eq!(set.len(), 4);
    }

    #[test]
    fn test_remove_and_reset() {
        let mut set = StopwordSet::default();
        assert!(set.remove("Study"));
        assert!(!set.remove("study"));
        set.add("crop");
        set.reset();
        assert_eq!(set, StopwordSet::default());
    }

    #[test]
    fn test_from_words_normalizes() {
        let set = StopwordSet::from_words(["  Crop ", "", "crop", "YIELD"]);
        assert_eq!(set.iter().collect::<Vec<_>>(), vec!["crop", "yield"]);
    }

    #[test]
    fn test_keyword_words_are_transient() {
        let set = StopwordSet::default();
        let active = set.for_keyword("Smart  Farm");

        assert!(active.contains("smart"));
        assert!(active.contains("farm"));
        assert!(!set.contains("smart"));
        assert_eq!(active.len(), set.len() + 2);
    }
}
