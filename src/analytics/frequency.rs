use serde::{Serialize, Serializer};
use std::collections::HashMap;

use super::ranking::top_k;
use super::stopwords::StopwordSet;
use super::tokenize::keywords;
use crate::models::ArticleRecord;

/// Token scores in first-seen order
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct FrequencyTable {
    entries: Vec<(String, u64)>,
    index: HashMap<String, usize>,
}

impl FrequencyTable {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn add(&mut self, token: &str, amount: u64) {
        match self.index.get(token) {
            Some(&i) => self.entries[i].1 += amount,
            None => {
                self.index.insert(token.to_string(), self.entries.len());
                self.entries.push((token.to_string(), amount));
            }
        }
    }

    pub fn get(&self, token: &str) -> Option<u64> {
        self.index.get(token).map(|&i| self.entries[i].1)
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, u64)> {
        self.entries.iter().map(|(k, v)| (k.as_str(), *v))
    }

    pub fn max_score(&self) -> Option<u64> {
        self.entries.iter().map(|(_, v)| *v).max()
    }

    pub fn top_k(&self, k: usize) -> Vec<(String, u64)> {
        top_k(self.entries.iter().cloned(), k)
    }
}

impl Serialize for FrequencyTable {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.collect_map(self.entries.iter().map(|(k, v)| (k, v)))
    }
}

/// Count-based and view-weighted scores over the same tokens
#[derive(Debug, Clone, Default, Serialize)]
pub struct KeywordFrequencies {
    pub simple: FrequencyTable,
    pub weighted: FrequencyTable,
}

/// One pass over every title: each surviving token adds 1 to its simple
/// score and the title's views to its weighted score.
pub fn compute_frequencies(
    records: &[ArticleRecord],
    stopwords: &StopwordSet,
) -> KeywordFrequencies {
    let mut frequencies = KeywordFrequencies::default();

    for record in records {
        for token in keywords(&record.title, stopwords) {
            frequencies.simple.add(&token, 1);
            frequencies.weighted.add(&token, record.views);
        }
    }

    frequencies
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::BTreeSet;

    fn record(title: &str, views: u64) -> ArticleRecord {
        ArticleRecord::new("vertical farm", title, "by Someone", views)
    }

    #[test]
    fn test_survivors_are_tokens_minus_stopwords_and_keyword() {
        let records = vec![
            record("Vertical Farm Lighting Research Method", 10),
            record("Lighting Spectra Study in a Vertical Farm", 5),
        ];
        let mut stopwords = StopwordSet::empty();
        stopwords.add("research, method, study");
        let active = stopwords.for_keyword("vertical farm");

        let freq = compute_frequencies(&records, &active);

        let survivors: BTreeSet<&str> = freq.simple.iter().map(|(k, _)| k).collect();
        assert_eq!(survivors, BTreeSet::from(["lighting", "spectra"]));
        assert_eq!(freq.simple.get("lighting"), Some(2));
        assert_eq!(freq.simple.get("spectra"), Some(1));
        assert_eq!(freq.weighted.get("lighting"), Some(15));
        assert_eq!(freq.weighted.get("spectra"), Some(5));
        assert_eq!(freq.simple.get("farm"), None);
    }

    #[test]
    fn test_repeated_token_counts_each_time() {
        let records = vec![record("Biochar biochar and more biochar amendments", 3)];
        let freq = compute_frequencies(&records, &StopwordSet::default());

        assert_eq!(freq.simple.get("biochar"), Some(3));
        assert_eq!(freq.weighted.get("biochar"), Some(9));
    }

    #[test]
    fn test_weighted_never_below_simple() {
        let records = vec![
            record("Hydroponic Nutrient Solutions for Lettuce", 1),
            record("Lettuce Growth Under LED Hydroponic Systems", 40),
            record("Aquaponic Systems and Fish Welfare", 7),
        ];
        let freq = compute_frequencies(&records, &StopwordSet::default());

        assert!(!freq.simple.is_empty());
        for (token, count) in freq.simple.iter() {
            assert!(freq.weighted.get(token).unwrap() >= count, "{}", token);
        }
    }

    #[test]
    fn test_top_k_stable_on_ties() {
        let mut table = FrequencyTable::new();
        for (token, n) in [("soil", 2), ("water", 3), ("carbon", 2), ("root", 3), ("leaf", 1)] {
            table.add(token, n);
        }

        assert_eq!(
            table.top_k(4),
            vec![
                ("water".to_string(), 3),
                ("root".to_string(), 3),
                ("soil".to_string(), 2),
                ("carbon".to_string(), 2),
            ]
        );
    }

    #[test]
    fn test_no_records_is_empty_not_error() {
        let freq = compute_frequencies(&[], &StopwordSet::default());
        assert!(freq.simple.is_empty());
        assert!(freq.weighted.is_empty());
        assert_eq!(freq.weighted.max_score(), None);
    }

    #[test]
    fn test_serializes_in_first_seen_order() {
        let mut table = FrequencyTable::new();
        table.add("zeta", 1);
        table.add("alpha", 2);
        assert_eq!(serde_json::to_string(&table).unwrap(), r#"{"zeta":1,"alpha":2}"#);
    }
}
