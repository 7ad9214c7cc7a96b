//! Concert Sources
//!
//! Where concert listings come from: a list compiled into the binary, or a
//! spreadsheet published as CSV.

mod spreadsheet;
mod static_list;

pub use spreadsheet::{SpreadsheetConfig, SpreadsheetSource};
pub use static_list::{StaticSource, static_concerts};

use async_trait::async_trait;

use crate::error::Result;
use crate::model::Concert;

/// Concert source trait (Strategy pattern)
///
/// Every `load` returns a fresh, independently owned collection.
#[async_trait]
pub trait ConcertSource: Send + Sync {
    /// Load all concerts in source order
    async fn load(&self) -> Result<Vec<Concert>>;

    /// Source name for logs and health output
    fn name(&self) -> &str;
}
