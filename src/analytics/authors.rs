use serde::Serialize;
use std::collections::HashMap;

use super::ranking::top_k;
use crate::models::ArticleRecord;

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub struct AuthorImpact {
    pub paper_count: u64,
    pub total_views: u64,
}

/// Per-author totals, in the order authors were first seen
#[derive(Debug, Clone, Default)]
pub struct AuthorStats {
    entries: Vec<(String, AuthorImpact)>,
    index: HashMap<String, usize>,
}

impl AuthorStats {
    fn credit(&mut self, name: &str, views: u64) {
        let i = match self.index.get(name) {
            Some(&i) => i,
            None => {
                self.index.insert(name.to_string(), self.entries.len());
                self.entries.push((name.to_string(), AuthorImpact::default()));
                self.entries.len() - 1
            }
        };
        let impact = &mut self.entries[i].1;
        impact.paper_count += 1;
        impact.total_views += views;
    }

    pub fn get(&self, name: &str) -> Option<AuthorImpact> {
        self.index.get(name).map(|&i| self.entries[i].1)
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, AuthorImpact)> {
        self.entries.iter().map(|(n, s)| (n.as_str(), *s))
    }

    pub fn top_by_papers(&self, k: usize) -> Vec<(String, u64)> {
        top_k(
            self.entries.iter().map(|(n, s)| (n.clone(), s.paper_count)),
            k,
        )
    }

    pub fn top_by_views(&self, k: usize) -> Vec<(String, u64)> {
        top_k(
            self.entries.iter().map(|(n, s)| (n.clone(), s.total_views)),
            k,
        )
    }
}

/// Split an author line such as "by A. Smith, B. Jones and C. Wu" into
/// names. Fragments of two characters or fewer are dropped.
pub fn split_authors(raw: &str) -> Vec<String> {
    let trimmed = raw.trim_start();
    let without_by = trimmed.strip_prefix("by ").unwrap_or(trimmed);

    without_by
        .replace(" and ", ", ")
        .split(',')
        .map(str::trim)
        .filter(|name| name.chars().count() > 2)
        .map(str::to_string)
        .collect()
}

/// Credit every named author of every record with one paper and the
/// record's views
pub fn compute_author_stats(records: &[ArticleRecord]) -> AuthorStats {
    let mut stats = AuthorStats::default();
    for record in records {
        for name in split_authors(&record.authors) {
            stats.credit(&name, record.views);
        }
    }
    stats
}

#[cfg(test)]
mod tests {
    use super::*;

    fn record(authors: &str, views: u64) -> ArticleRecord {
        ArticleRecord::new("k", "Some Sufficiently Long Title Here", authors, views)
    }

    #[test]
    fn test_split_by_and_and() {
        assert_eq!(split_authors("by A. Smith and B. Jones"), vec!["A. Smith", "B. Jones"]);
    }

    #[test]
    fn test_split_mixed_separators() {
        assert_eq!(
            split_authors("by Mei Chen, Jae Park, Li Wu and Omar Haddad"),
            vec!["Mei Chen", "Jae Park", "Li Wu", "Omar Haddad"]
        );
    }

    #[test]
    fn test_only_leading_by_is_stripped() {
        assert_eq!(split_authors("Abby Stone, Kirby Lane"), vec!["Abby Stone", "Kirby Lane"]);
    }

    #[test]
    fn test_short_fragments_dropped() {
        assert_eq!(split_authors("by Al, Xu, , Lee Min"), vec!["Lee Min"]);
        assert!(split_authors("").is_empty());
    }

    #[test]
    fn test_each_author_credited_with_record_views() {
        let stats = compute_author_stats(&[record("by A. Smith and B. Jones", 40)]);
        assert_eq!(
            stats.get("A. Smith"),
            Some(AuthorImpact {
                paper_count: 1,
                total_views: 40
            })
        );
        assert_eq!(stats.get("B. Jones").unwrap().total_views, 40);
    }

    #[test]
    fn test_aggregation_and_rankings() {
        let records = vec![
            record("by Alice, Bob", 10),
            record("by Alice", 5),
            record("by Carol and Bob", 100),
            record("by Dave", 100),
        ];
        let stats = compute_author_stats(&records);

        assert_eq!(stats.len(), 4);
        assert_eq!(
            stats.top_by_papers(3),
            vec![
                ("Alice".to_string(), 2),
                ("Bob".to_string(), 2),
                ("Carol".to_string(), 1),
            ]
        );
        assert_eq!(
            stats.top_by_views(2),
            vec![("Bob".to_string(), 110), ("Carol".to_string(), 100)]
        );
    }
}
