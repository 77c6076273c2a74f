pub mod authors;
pub mod cooccurrence;
pub mod frequency;
pub mod ranking;
pub mod stopwords;
pub mod tokenize;

pub use authors::{AuthorImpact, AuthorStats, compute_author_stats, split_authors};
pub use cooccurrence::{CorrelationMatrix, compute_correlation};
pub use frequency::{FrequencyTable, KeywordFrequencies, compute_frequencies};
pub use ranking::top_k;
pub use stopwords::{DEFAULT_STOPWORDS, StopwordSet};
pub use tokenize::{filter_stopwords, keywords, tokenize};

use serde::Serialize;
use tracing::debug;

use crate::models::ArticleRecord;

/// Size of every ranking in a report
pub const TOP_K: usize = 10;

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct RankedKeyword {
    pub word: String,
    pub score: u64,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct RankedAuthor {
    pub name: String,
    pub paper_count: u64,
    pub total_views: u64,
}

/// Everything the rendering layer needs for one keyword's dataset
#[derive(Debug, Clone, Serialize)]
pub struct TrendReport {
    pub keyword: String,
    pub record_count: usize,
    pub frequencies: KeywordFrequencies,
    pub top_simple: Vec<RankedKeyword>,
    pub top_weighted: Vec<RankedKeyword>,
    /// `None` when fewer than two keywords survived filtering
    pub correlation: Option<CorrelationMatrix>,
    pub top_authors_by_papers: Vec<RankedAuthor>,
    pub top_authors_by_views: Vec<RankedAuthor>,
}

impl TrendReport {
    /// Run every analysis over `records`, excluding `stopwords` plus the
    /// words of `keyword`.
    pub fn build(keyword: &str, records: &[ArticleRecord], stopwords: &StopwordSet) -> Self {
        let active = stopwords.for_keyword(keyword);
        let frequencies = compute_frequencies(records, &active);
        debug!(
            "{} distinct keywords across {} titles",
            frequencies.simple.len(),
            records.len()
        );

        let top_simple = ranked_keywords(frequencies.simple.top_k(TOP_K));
        let top_weighted = ranked_keywords(frequencies.weighted.top_k(TOP_K));

        let top_words: Vec<String> = top_simple.iter().map(|k| k.word.clone()).collect();
        let titles: Vec<&str> = records.iter().map(|r| r.title.as_str()).collect();
        let correlation = compute_correlation(&top_words, &titles);

        let authors = compute_author_stats(records);
        let top_authors_by_papers = ranked_authors(&authors, authors.top_by_papers(TOP_K));
        let top_authors_by_views = ranked_authors(&authors, authors.top_by_views(TOP_K));

        Self {
            keyword: keyword.to_string(),
            record_count: records.len(),
            frequencies,
            top_simple,
            top_weighted,
            correlation,
            top_authors_by_papers,
            top_authors_by_views,
        }
    }

    pub fn is_empty(&self) -> bool {
        self.record_count == 0
    }

    /// True when view weighting has anything to show
    pub fn has_weighted_signal(&self) -> bool {
        self.frequencies.weighted.max_score().unwrap_or(0) > 0
    }
}

fn ranked_keywords(entries: Vec<(String, u64)>) -> Vec<RankedKeyword> {
    entries
        .into_iter()
        .map(|(word, score)| RankedKeyword { word, score })
        .collect()
}

fn ranked_authors(stats: &AuthorStats, entries: Vec<(String, u64)>) -> Vec<RankedAuthor> {
    entries
        .into_iter()
        .map(|(name, _)| {
            let impact = stats.get(&name).unwrap_or_default();
            RankedAuthor {
                name,
                paper_count: impact.paper_count,
                total_views: impact.total_views,
            }
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn records() -> Vec<ArticleRecord> {
        vec![
            ArticleRecord::new(
                "smart farm",
                "Smart Farm Sensor Networks for Greenhouse Monitoring",
                "by Alice Kim and Bob Lee",
                120,
            ),
            ArticleRecord::new(
                "smart farm",
                "Greenhouse Climate Control with Sensor Fusion",
                "by Alice Kim",
                30,
            ),
            ArticleRecord::new(
                "smart farm",
                "Livestock Monitoring in a Smart Farm Setting",
                "by Chris Park",
                5,
            ),
        ]
    }

    #[test]
    fn test_report_end_to_end() {
        let report = TrendReport::build("Smart Farm", &records(), &StopwordSet::default());

        assert_eq!(report.record_count, 3);
        assert!(report.frequencies.simple.get("smart").is_none());
        assert!(report.frequencies.simple.get("farm").is_none());
        assert!(report.frequencies.simple.get("with").is_none());

        assert_eq!(
            report.top_simple[0..3],
            [
                RankedKeyword { word: "sensor".into(), score: 2 },
                RankedKeyword { word: "greenhouse".into(), score: 2 },
                RankedKeyword { word: "monitoring".into(), score: 2 },
            ]
        );
        assert_eq!(report.top_weighted[0].word, "sensor");
        assert_eq!(report.top_weighted[0].score, 150);

        let correlation = report.correlation.as_ref().unwrap();
        assert_eq!(correlation.keywords.len(), report.top_simple.len());

        assert_eq!(
            report.top_authors_by_papers[0],
            RankedAuthor {
                name: "Alice Kim".into(),
                paper_count: 2,
                total_views: 150
            }
        );
        assert_eq!(report.top_authors_by_views[1].name, "Bob Lee");
        assert!(report.has_weighted_signal());
    }

    #[test]
    fn test_empty_dataset_report() {
        let report = TrendReport::build("anything", &[], &StopwordSet::default());

        assert!(report.is_empty());
        assert!(report.top_simple.is_empty());
        assert!(report.correlation.is_none());
        assert!(report.top_authors_by_papers.is_empty());
        assert!(!report.has_weighted_signal());
    }

    #[test]
    fn test_caller_stopwords_unchanged() {
        let stopwords = StopwordSet::default();
        let _ = TrendReport::build("Smart Farm", &records(), &stopwords);
        assert!(!stopwords.contains("smart"));
    }
}
