use std::path::PathBuf;

use thiserror::Error;

/// Errors that can end a collection run or a dataset operation
#[derive(Debug, Error)]
pub enum TrackerError {
    #[error("failed to start browser session: {0}")]
    Session(String),

    #[error("failed to load {url}: {reason}")]
    Navigation { url: String, reason: String },

    #[error("failed to read page source: {0}")]
    PageSource(String),

    #[error("no saved dataset at {}", .0.display())]
    NoDataset(PathBuf),

    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("CSV error: {0}")]
    Csv(#[from] csv::Error),
}

impl TrackerError {
    /// Browser-layer errors come out of headless_chrome as anyhow chains;
    /// keep the whole chain on one line for the user-facing message.
    pub fn session(err: anyhow::Error) -> Self {
        TrackerError::Session(format!("{:#}", err))
    }

    pub fn navigation(url: &str, err: anyhow::Error) -> Self {
        TrackerError::Navigation {
            url: url.to_string(),
            reason: format!("{:#}", err),
        }
    }

    pub fn page_source(err: anyhow::Error) -> Self {
        TrackerError::PageSource(format!("{:#}", err))
    }
}

pub type TrackerResult<T> = Result<T, TrackerError>;
