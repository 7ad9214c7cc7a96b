//! Error Types for Concert Data

use thiserror::Error;

pub type Result<T> = std::result::Result<T, DataError>;

#[derive(Error, Debug)]
pub enum DataError {
    #[error("Invalid calendar date: {0:?}")]
    InvalidDate(String),

    #[error("Spreadsheet fetch failed with status {status}: {url}")]
    Fetch { url: String, status: u16 },

    #[error("Network error: {0}")]
    Network(#[from] reqwest::Error),
}
