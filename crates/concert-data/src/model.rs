//! Domain Models
//!
//! Concert listings and the venue they take place at. Dates are plain
//! calendar dates (`NaiveDate`) so nothing shifts with the host timezone.

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

use crate::calendar;

/// Display status of a concert
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ConcertStatus {
    Upcoming,
    Past,
    Cancelled,
}

impl ConcertStatus {
    pub fn as_str(&self) -> &str {
        match self {
            ConcertStatus::Upcoming => "upcoming",
            ConcertStatus::Past => "past",
            ConcertStatus::Cancelled => "cancelled",
        }
    }
}

impl std::fmt::Display for ConcertStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// A single concert listing
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Concert {
    pub id: String,

    /// URL-safe key, unique within a loaded collection
    pub slug: String,

    pub artist_name: String,

    /// Local calendar date of the show, serialized as `YYYY-MM-DD`
    pub date: NaiveDate,

    /// e.g. "6:30 PM"
    pub doors_time: String,

    /// e.g. "7:00 PM"
    pub show_time: String,

    /// Free text, e.g. "$20-30"
    pub suggested_donation: String,

    /// Shown on listing pages
    pub short_description: String,

    /// Shown on the detail page
    pub full_description: String,

    pub artist_bio: String,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub artist_website: Option<String>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub artist_spotify: Option<String>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub artist_instagram: Option<String>,

    pub featured_image: String,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub artist_image: Option<String>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub gallery_images: Option<Vec<String>>,

    /// YouTube embed ID
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub youtube_video_id: Option<String>,

    /// Private stream for ticketed viewers
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub stream_video_id: Option<String>,

    /// Access code for the watch page
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub stream_password: Option<String>,

    /// RSVP form link, empty when RSVP is closed
    pub rsvp_link: String,

    pub status: ConcertStatus,
}

impl Concert {
    /// Minimal concert with every text field empty
    pub fn new(slug: impl Into<String>, date: NaiveDate, status: ConcertStatus) -> Self {
        Self {
            id: String::new(),
            slug: slug.into(),
            artist_name: String::new(),
            date,
            doors_time: String::new(),
            show_time: String::new(),
            suggested_donation: String::new(),
            short_description: String::new(),
            full_description: String::new(),
            artist_bio: String::new(),
            artist_website: None,
            artist_spotify: None,
            artist_instagram: None,
            featured_image: String::new(),
            artist_image: None,
            gallery_images: None,
            youtube_video_id: None,
            stream_video_id: None,
            stream_password: None,
            rsvp_link: String::new(),
            status,
        }
    }

    /// Long-form date, e.g. "Saturday, March 15, 2025"
    pub fn display_date(&self) -> String {
        calendar::format_calendar_date(self.date)
    }

    pub fn is_cancelled(&self) -> bool {
        self.status == ConcertStatus::Cancelled
    }
}

/// Venue information shown on every listing
#[derive(Clone, Debug, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Venue {
    pub name: &'static str,
    pub address: &'static str,
    pub city: &'static str,
    pub state: &'static str,
    pub zip: &'static str,
    pub neighborhood: &'static str,
    pub parking_info: &'static str,
    pub additional_info: &'static str,
}

impl Venue {
    /// Single-line postal address
    pub fn full_address(&self) -> String {
        format!("{}, {}, {} {}", self.address, self.city, self.state, self.zip)
    }
}

pub const VENUE: Venue = Venue {
    name: "Meadowlark House",
    address: "10500 Beard Avenue",
    city: "Austin",
    state: "TX",
    zip: "78748",
    neighborhood: "Bauerle Ranch",
    parking_info: "Street parking is available on Beard Avenue and Drew Lane. Please be mindful of neighbors and avoid blocking driveways.",
    additional_info: "Look for the Meadowlark Concert Series sign. Exact details will be provided when you RSVP.",
};
