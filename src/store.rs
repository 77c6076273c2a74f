use serde::{Deserialize, Serialize};
use std::fs;
use std::io::Write;
use std::path::{Path, PathBuf};
use tracing::{debug, info};

use crate::analytics::StopwordSet;
use crate::error::{TrackerError, TrackerResult};
use crate::models::ArticleRecord;

pub const DATASET_SUFFIX: &str = "_data.csv";
pub const STOPWORDS_FILE: &str = "stopwords.txt";
const UTF8_BOM: &str = "\u{feff}";
const HEADER: [&str; 4] = ["Keyword", "Title", "Authors", "Views"];

/// One CSV row. `Views` may be missing, blank or written as a float
/// (`12.0`) by other tools.
#[derive(Debug, Serialize, Deserialize)]
struct CsvRow {
    #[serde(rename = "Keyword")]
    keyword: String,
    #[serde(rename = "Title")]
    title: String,
    #[serde(rename = "Authors")]
    authors: String,
    #[serde(rename = "Views", default)]
    views: Option<String>,
}

impl From<CsvRow> for ArticleRecord {
    fn from(row: CsvRow) -> Self {
        let views = row.views.as_deref().map(parse_views_cell).unwrap_or(1);
        // ArticleRecord::new lifts 0 to 1
        ArticleRecord::new(row.keyword, row.title, row.authors, views)
    }
}

impl From<&ArticleRecord> for CsvRow {
    fn from(record: &ArticleRecord) -> Self {
        Self {
            keyword: record.keyword.clone(),
            title: record.title.clone(),
            authors: record.authors.clone(),
            views: Some(record.views.to_string()),
        }
    }
}

/// Integer, or a float rounded to the nearest integer; anything else counts
/// as 1
fn parse_views_cell(cell: &str) -> u64 {
    let cell = cell.trim();
    if let Ok(views) = cell.parse::<u64>() {
        return views;
    }
    match cell.parse::<f64>() {
        Ok(views) if views.is_finite() && views >= 0.0 => views.round() as u64,
        _ => 1,
    }
}

/// `<dir>/<keyword>_data.csv`, with path separators in the keyword replaced
/// so the file always lands directly in `dir`
pub fn dataset_path(dir: &Path, keyword: &str) -> PathBuf {
    let name: String = keyword
        .trim()
        .chars()
        .map(|c| if matches!(c, '/' | '\\') { '_' } else { c })
        .collect();
    dir.join(format!("{}{}", name, DATASET_SUFFIX))
}

/// Serialize records as BOM-prefixed UTF-8 CSV so spreadsheet tools keep
/// non-ASCII titles and names intact.
pub fn to_csv_bytes(records: &[ArticleRecord]) -> TrackerResult<Vec<u8>> {
    let mut out = UTF8_BOM.as_bytes().to_vec();
    {
        let mut writer = csv::WriterBuilder::new()
            .has_headers(false)
            .from_writer(&mut out);
        writer.write_record(HEADER)?;
        for record in records {
            writer.serialize(CsvRow::from(record))?;
        }
        writer.flush()?;
    }
    Ok(out)
}

pub fn save_csv(path: &Path, records: &[ArticleRecord]) -> TrackerResult<()> {
    let bytes = to_csv_bytes(records)?;
    let mut file = fs::File::create(path)?;
    file.write_all(&bytes)?;
    info!("Saved {} records to {}", records.len(), path.display());
    Ok(())
}

pub fn from_csv_str(content: &str) -> TrackerResult<Vec<ArticleRecord>> {
    let content = content.strip_prefix(UTF8_BOM).unwrap_or(content);
    let mut reader = csv::Reader::from_reader(content.as_bytes());

    let mut records = Vec::new();
    for row in reader.deserialize::<CsvRow>() {
        records.push(ArticleRecord::from(row?));
    }
    Ok(records)
}

pub fn load_csv(path: &Path) -> TrackerResult<Vec<ArticleRecord>> {
    if !path.exists() {
        return Err(TrackerError::NoDataset(path.to_path_buf()));
    }
    let content = fs::read_to_string(path)?;
    let records = from_csv_str(&content)?;
    debug!("Loaded {} records from {}", records.len(), path.display());
    Ok(records)
}

/// Keywords of every saved dataset in `dir`, sorted
pub fn saved_datasets(dir: &Path) -> TrackerResult<Vec<String>> {
    let mut names = Vec::new();
    for entry in fs::read_dir(dir)? {
        let file_name = entry?.file_name();
        if let Some(keyword) = file_name
            .to_str()
            .and_then(|name| name.strip_suffix(DATASET_SUFFIX))
        {
            names.push(keyword.to_string());
        }
    }
    names.sort();
    Ok(names)
}

/// The user's exclusion list from `<dir>/stopwords.txt`, one word per
/// line. Falls back to the default list when the file does not exist.
pub fn load_stopwords(dir: &Path) -> TrackerResult<StopwordSet> {
    let path = dir.join(STOPWORDS_FILE);
    if !path.exists() {
        return Ok(StopwordSet::default());
    }
    let content = fs::read_to_string(&path)?;
    Ok(StopwordSet::from_words(content.lines()))
}

pub fn save_stopwords(dir: &Path, stopwords: &StopwordSet) -> TrackerResult<()> {
    let mut content = stopwords.iter().collect::<Vec<_>>().join("\n");
    content.push('\n');
    fs::write(dir.join(STOPWORDS_FILE), content)?;
    debug!("Saved {} stopwords", stopwords.len());
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sample() -> Vec<ArticleRecord> {
        vec![
            ArticleRecord::new(
                "스마트팜",
                "Análisis de cultivos en invernaderos inteligentes",
                "by José Pérez and 김민수",
                1500,
            ),
            ArticleRecord::new(
                "스마트팜",
                "Title, with a comma and \"quotes\" inside it",
                "by A. Smith",
                1,
            ),
        ]
    }

    #[test]
    fn test_csv_has_bom_and_header() {
        let bytes = to_csv_bytes(&sample()).unwrap();
        assert!(bytes.starts_with(&[0xEF, 0xBB, 0xBF]));

        let text = String::from_utf8(bytes).unwrap();
        let first_line = text.trim_start_matches(UTF8_BOM).lines().next().unwrap();
        assert_eq!(first_line, "Keyword,Title,Authors,Views");
    }

    #[test]
    fn test_empty_dataset_still_has_header() {
        let bytes = to_csv_bytes(&[]).unwrap();
        let text = String::from_utf8(bytes).unwrap();
        let body = text.strip_prefix(UTF8_BOM).unwrap();
        assert_eq!(body.lines().collect::<Vec<_>>(), vec!["Keyword,Title,Authors,Views"]);

        let dir = tempfile::tempdir().unwrap();
        let path = dataset_path(dir.path(), "empty");
        save_csv(&path, &[]).unwrap();
        assert!(fs::read_to_string(&path).unwrap().contains("Keyword,Title,Authors,Views"));
        assert!(load_csv(&path).unwrap().is_empty());
    }

    #[test]
    fn test_float_views_cells_load() {
        let records = from_csv_str(
            "Keyword,Title,Authors,Views\n\
             soil,First Long Title About Soil Health,by A,12.0\n\
             soil,Second Long Title About Soil Health,by B,n/a\n\
             soil,Third Long Title About Soil Health,by C, 7 \n",
        )
        .unwrap();
        let views: Vec<u64> = records.iter().map(|r| r.views).collect();
        assert_eq!(views, vec![12, 1, 7]);
    }

    #[test]
    fn test_dataset_path_stays_in_dir() {
        let dir = Path::new("/data");
        assert_eq!(dataset_path(dir, " rice "), PathBuf::from("/data/rice_data.csv"));
        assert_eq!(
            dataset_path(dir, "../etc/passwd"),
            PathBuf::from("/data/.._etc_passwd_data.csv")
        );
        assert_eq!(dataset_path(dir, r"a\b").parent(), Some(dir));
    }

    #[test]
    fn test_save_then_load_file() {
        let dir = tempfile::tempdir().unwrap();
        let path = dataset_path(dir.path(), "스마트팜");

        save_csv(&path, &sample()).unwrap();
        assert_eq!(load_csv(&path).unwrap(), sample());
    }

    #[test]
    fn test_missing_views_column_defaults_to_one() {
        let records = from_csv_str(
            "Keyword,Title,Authors\nsoil,Soil Carbon Sequestration Strategies,by C. Park\n",
        )
        .unwrap();
        assert_eq!(records.len(), 1);
        assert_eq!(records[0].views, 1);
    }

    #[test]
    fn test_blank_and_zero_views_become_one() {
        let records = from_csv_str(
            "Keyword,Title,Authors,Views\n\
             soil,First Long Title About Soil Health,by A,\n\
             soil,Second Long Title About Soil Health,by B,0\n\
             soil,Third Long Title About Soil Health,by C,42\n",
        )
        .unwrap();
        let views: Vec<u64> = records.iter().map(|r| r.views).collect();
        assert_eq!(views, vec![1, 1, 42]);
    }

    #[test]
    fn test_saved_datasets_lists_keywords() {
        let dir = tempfile::tempdir().unwrap();
        save_csv(&dataset_path(dir.path(), "tomato"), &[]).unwrap();
        save_csv(&dataset_path(dir.path(), "rice"), &[]).unwrap();
        fs::write(dir.path().join("notes.txt"), "x").unwrap();

        assert_eq!(saved_datasets(dir.path()).unwrap(), vec!["rice", "tomato"]);
    }

    #[test]
    fn test_stopwords_persist() {
        let dir = tempfile::tempdir().unwrap();
        assert_eq!(load_stopwords(dir.path()).unwrap(), StopwordSet::default());

        let mut stopwords = StopwordSet::default();
        stopwords.add("greenhouse, crop");
        stopwords.remove("the");
        save_stopwords(dir.path(), &stopwords).unwrap();

        let loaded = load_stopwords(dir.path()).unwrap();
        assert_eq!(loaded, stopwords);
        assert!(loaded.contains("greenhouse"));
        assert!(!loaded.contains("the"));
    }

    #[test]
    fn test_load_missing_dataset() {
        let dir = tempfile::tempdir().unwrap();
        let err = load_csv(&dataset_path(dir.path(), "nope")).unwrap_err();
        assert!(matches!(err, TrackerError::NoDataset(_)));
    }
}
