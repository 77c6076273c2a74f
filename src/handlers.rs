use anyhow::{Context, Result, bail};
use std::fmt::Write;
use tracing::{info, warn};

use crate::analytics::{StopwordSet, TrendReport};
use crate::collector::Collector;
use crate::config::Config;
use crate::models::ArticleRecord;
use crate::store;

/// How a report is printed
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum OutputFormat {
    Text,
    Json,
}

/// Edits to the saved stopword list
#[derive(Debug, Clone, Default)]
pub struct StopwordEdit {
    pub add: Option<String>,
    pub remove: Vec<String>,
    pub reset: bool,
}

fn clean_keyword(keyword: &str) -> Result<&str> {
    let keyword = keyword.trim();
    if keyword.is_empty() {
        bail!("Keyword cannot be empty or only whitespace");
    }
    Ok(keyword)
}

/// Live collection: scrape, optionally save, then report
pub async fn collect_handler(
    config: &Config,
    keyword: &str,
    save: bool,
    format: OutputFormat,
) -> Result<()> {
    let keyword = clean_keyword(keyword)?;

    let collector = Collector::from_config(config.clone());
    let result = collector.collect(keyword).await;

    if let Some(message) = result.error {
        bail!("Collection failed: {}", message);
    }
    if result.records.is_empty() {
        warn!("No data found for '{}'", keyword);
        println!("No articles found for '{}'.", keyword);
        return Ok(());
    }

    if save {
        let path = store::dataset_path(&config.data_dir, keyword);
        store::save_csv(&path, &result.records)
            .with_context(|| format!("Failed to save {}", path.display()))?;
        println!("Saved {} records to {}", result.records.len(), path.display());
    }

    report(config, keyword, &result.records, format)
}

/// Report over a previously saved dataset
pub fn analyze_handler(config: &Config, keyword: &str, format: OutputFormat) -> Result<()> {
    let keyword = clean_keyword(keyword)?;
    let path = store::dataset_path(&config.data_dir, keyword);
    let records = store::load_csv(&path)?;
    info!("Loaded {} records for '{}'", records.len(), keyword);

    report(config, keyword, &records, format)
}

pub fn list_handler(config: &Config) -> Result<()> {
    let names = store::saved_datasets(&config.data_dir)
        .with_context(|| format!("Failed to read {}", config.data_dir.display()))?;

    if names.is_empty() {
        println!("No saved datasets in {}", config.data_dir.display());
    }
    for name in names {
        println!("{}", name);
    }
    Ok(())
}

/// Apply edits to the saved stopword list (reset first, then add, then
/// remove) and print the result
pub fn stopwords_handler(config: &Config, edit: &StopwordEdit) -> Result<()> {
    let mut stopwords = store::load_stopwords(&config.data_dir)?;
    let mut changed = false;

    if edit.reset {
        stopwords.reset();
        changed = true;
    }
    if let Some(words) = &edit.add {
        let added = stopwords.add(words);
        info!("Added {} stopwords", added);
        changed |= added > 0;
    }
    for word in &edit.remove {
        if stopwords.remove(word) {
            changed = true;
        } else {
            warn!("'{}' was not in the stopword list", word);
        }
    }

    if changed {
        store::save_stopwords(&config.data_dir, &stopwords)?;
    }
    println!("{}", stopwords.iter().collect::<Vec<_>>().join(", "));
    Ok(())
}

fn report(
    config: &Config,
    keyword: &str,
    records: &[ArticleRecord],
    format: OutputFormat,
) -> Result<()> {
    let stopwords = store::load_stopwords(&config.data_dir)?;
    let report = TrendReport::build(keyword, records, &stopwords);

    match format {
        OutputFormat::Json => println!("{}", serde_json::to_string_pretty(&report)?),
        OutputFormat::Text => print!("{}", format_report(&report, &stopwords)),
    }
    Ok(())
}

/// Plain-text rendering of a report
pub fn format_report(report: &TrendReport, stopwords: &StopwordSet) -> String {
    let mut out = String::new();
    let _ = writeln!(out, "Research trends: {} ({} papers)", report.keyword, report.record_count);
    let _ = writeln!(out, "Excluded words: {}", stopwords.len());

    let _ = writeln!(out, "\nTop keywords by frequency");
    if report.top_simple.is_empty() {
        let _ = writeln!(out, "  (no keywords to analyze)");
    }
    for (rank, k) in report.top_simple.iter().enumerate() {
        let _ = writeln!(out, "  {:>2}. {:<24} {:>8}", rank + 1, k.word, k.score);
    }

    let _ = writeln!(out, "\nTop keywords by views");
    if !report.has_weighted_signal() {
        let _ = writeln!(out, "  (not enough view data)");
    } else {
        for (rank, k) in report.top_weighted.iter().enumerate() {
            let _ = writeln!(out, "  {:>2}. {:<24} {:>8}", rank + 1, k.word, k.score);
        }
    }

    let _ = writeln!(out, "\nKeyword co-occurrence");
    match &report.correlation {
        None => {
            let _ = writeln!(out, "  (not enough data)");
        }
        Some(matrix) => {
            let _ = write!(out, "  {:<14}", "");
            for word in &matrix.keywords {
                let _ = write!(out, " {:>6.6}", word);
            }
            let _ = writeln!(out);
            for (i, word) in matrix.keywords.iter().enumerate() {
                let _ = write!(out, "  {:<14.14}", word);
                for value in &matrix.values[i] {
                    let _ = write!(out, " {:>6.2}", value);
                }
                let _ = writeln!(out);
            }
        }
    }

    let _ = writeln!(out, "\nMost prolific authors");
    if report.top_authors_by_papers.is_empty() {
        let _ = writeln!(out, "  (no author data)");
    }
    for (rank, a) in report.top_authors_by_papers.iter().enumerate() {
        let _ = writeln!(out, "  {:>2}. {:<32} {:>4} papers", rank + 1, a.name, a.paper_count);
    }

    let _ = writeln!(out, "\nMost viewed authors");
    for (rank, a) in report.top_authors_by_views.iter().enumerate() {
        let _ = writeln!(out, "  {:>2}. {:<32} {:>8} views", rank + 1, a.name, a.total_views);
    }

    out
}
