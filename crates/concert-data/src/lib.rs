//! # concert-data
//!
//! Concert listings for the Meadowlark House concert series.
//!
//! ## Data Flow
//!
//! ```text
//! ┌──────────────┐   ┌────────────┐   ┌─────────────┐   ┌──────────────────┐
//! │  Published   │──▶│ parse_csv  │──▶│  normalize  │──▶│ ConcertRepository│
//! │  CSV export  │   │  (Records) │   │  (Concert)  │   │ upcoming / past  │
//! └──────────────┘   └────────────┘   └─────────────┘   │ by_slug / next   │
//!                                                       └──────────────────┘
//!        ┌──────────────┐                                        ▲
//!        │ Static list  │────────────────────────────────────────┘
//!        └──────────────┘
//! ```
//!
//! Dates are calendar dates (`chrono::NaiveDate`). Status is either authored
//! directly (static list) or derived from the date plus a manual override
//! column (spreadsheet).
//!
//! ## Usage
//!
//! ```rust,ignore
//! use concert_data::{ConcertRepository, SpreadsheetSource};
//!
//! let source = SpreadsheetSource::new("https://docs.google.com/.../pub?output=csv")?;
//! let repo = ConcertRepository::load_from(&source).await?;
//!
//! if let Some(next) = repo.next() {
//!     println!("{} on {}", next.artist_name, next.display_date());
//! }
//! ```

pub mod calendar;
pub mod csv;
pub mod error;
pub mod model;
pub mod normalize;
pub mod repository;
pub mod source;

pub use calendar::{derive_status, format_date, parse_calendar_date};
pub use csv::{Record, parse_csv};
pub use error::{DataError, Result};
pub use model::{Concert, ConcertStatus, VENUE, Venue};
pub use normalize::concerts_from_csv;
pub use repository::ConcertRepository;
pub use source::{ConcertSource, SpreadsheetConfig, SpreadsheetSource, StaticSource};
