//! Spreadsheet Row Normalization
//!
//! Turns header-keyed CSV records into typed `Concert` values. Required text
//! columns default to empty strings, optional ones become `None` when blank.

use std::collections::HashSet;

use chrono::NaiveDate;

use crate::calendar::{derive_status, parse_calendar_date};
use crate::csv::{Record, parse_csv};
use crate::model::Concert;

/// Separator for multiple URLs in the `galleryImages` column
const GALLERY_SEPARATOR: char = '|';

/// Slugs taken by the listing endpoints under `/api/concerts/`
pub const RESERVED_SLUGS: [&str; 3] = ["upcoming", "past", "next"];

/// Convert one record into a concert.
///
/// Returns `None` for rows without a slug, with a reserved slug or with an
/// unreadable date. Stream fields are never taken from the sheet.
pub fn concert_from_record(record: &Record, today: NaiveDate) -> Option<Concert> {
    let slug = required(record, "slug");
    if slug.is_empty() {
        return None;
    }
    if RESERVED_SLUGS.contains(&slug.as_str()) {
        tracing::warn!(slug = %slug, "Skipping concert with reserved slug");
        return None;
    }

    let raw_date = required(record, "date");
    let Some(date) = parse_calendar_date(&raw_date) else {
        tracing::warn!(slug = %slug, date = %raw_date, "Skipping concert with unreadable date");
        return None;
    };

    let status = derive_status(date, optional(record, "status").as_deref(), today);

    Some(Concert {
        id: required(record, "id"),
        slug,
        artist_name: required(record, "artistName"),
        date,
        doors_time: required(record, "doorsTime"),
        show_time: required(record, "showTime"),
        suggested_donation: required(record, "suggestedDonation"),
        short_description: required(record, "shortDescription"),
        full_description: required(record, "fullDescription"),
        artist_bio: required(record, "artistBio"),
        artist_website: optional(record, "artistWebsite"),
        artist_spotify: optional(record, "artistSpotify"),
        artist_instagram: optional(record, "artistInstagram"),
        featured_image: required(record, "featuredImage"),
        artist_image: optional(record, "artistImage"),
        gallery_images: gallery(record),
        youtube_video_id: optional(record, "youtubeVideoId"),
        stream_video_id: None,
        stream_password: None,
        rsvp_link: required(record, "rsvpLink"),
        status,
    })
}

/// Parse a published CSV export into concerts, in sheet order.
///
/// Rows with an empty or reserved slug are dropped; for repeated slugs the
/// first row wins.
pub fn concerts_from_csv(text: &str, today: NaiveDate) -> Vec<Concert> {
    let mut seen = HashSet::new();
    let mut concerts = Vec::new();

    for record in parse_csv(text) {
        let Some(concert) = concert_from_record(&record, today) else {
            continue;
        };

        if !seen.insert(concert.slug.clone()) {
            tracing::warn!(slug = %concert.slug, "Skipping duplicate concert slug");
            continue;
        }

        concerts.push(concert);
    }

    tracing::debug!(count = concerts.len(), "Normalized spreadsheet concerts");
    concerts
}

fn required(record: &Record, column: &str) -> String {
    record.get(column).cloned().unwrap_or_default()
}

fn optional(record: &Record, column: &str) -> Option<String> {
    record.get(column).filter(|v| !v.is_empty()).cloned()
}

fn gallery(record: &Record) -> Option<Vec<String>> {
    let images: Vec<String> = optional(record, "galleryImages")?
        .split(GALLERY_SEPARATOR)
        .map(str::trim)
        .filter(|url| !url.is_empty())
        .map(String::from)
        .collect();

    (!images.is_empty()).then_some(images)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::ConcertStatus;

    fn date(y: i32, m: u32, d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, d).unwrap()
    }

    #[test]
    fn test_past_and_cancelled_rows() {
        let csv = "slug,date,status\na,2020-01-01,\nb,2099-01-01,cancelled\n";
        let concerts = concerts_from_csv(csv, date(2025, 6, 1));

        assert_eq!(concerts.len(), 2);
        assert_eq!(concerts[0].slug, "a");
        assert_eq!(concerts[0].status, ConcertStatus::Past);
        assert_eq!(concerts[1].slug, "b");
        assert_eq!(concerts[1].status, ConcertStatus::Cancelled);
    }

    #[test]
    fn test_missing_fields_default() {
        let csv = "slug,date,artistWebsite\na,2030-01-01,\n";
        let concert = &concerts_from_csv(csv, date(2025, 6, 1))[0];

        assert_eq!(concert.artist_name, "");
        assert_eq!(concert.featured_image, "");
        assert_eq!(concert.rsvp_link, "");
        assert_eq!(concert.artist_website, None);
        assert_eq!(concert.artist_spotify, None);
        assert_eq!(concert.status, ConcertStatus::Upcoming);
    }

    #[test]
    fn test_optional_fields_present() {
        let csv = "slug,date,artistWebsite,youtubeVideoId,galleryImages\n\
                   a,2030-01-01,https://band.example,abc123,https://img/1.jpg | https://img/2.jpg\n";
        let concert = &concerts_from_csv(csv, date(2025, 6, 1))[0];

        assert_eq!(concert.artist_website.as_deref(), Some("https://band.example"));
        assert_eq!(concert.youtube_video_id.as_deref(), Some("abc123"));
        assert_eq!(
            concert.gallery_images,
            Some(vec!["https://img/1.jpg".to_string(), "https://img/2.jpg".to_string()])
        );
    }

    #[test]
    fn test_empty_slug_dropped() {
        let csv = "slug,date\n,2030-01-01\nreal,2030-01-01\n";
        let concerts = concerts_from_csv(csv, date(2025, 6, 1));
        assert_eq!(concerts.len(), 1);
        assert_eq!(concerts[0].slug, "real");
    }

    #[test]
    fn test_reserved_slugs_dropped() {
        let csv = "slug,date\nnext,2030-01-01\npast,2030-01-01\n\
                   upcoming,2030-01-01\nnext-show,2030-01-01\n";
        let concerts = concerts_from_csv(csv, date(2025, 6, 1));
        assert_eq!(concerts.len(), 1);
        assert_eq!(concerts[0].slug, "next-show");
    }

    #[test]
    fn test_unreadable_date_dropped() {
        let csv = "slug,date\na,TBD\nb,2030-01-01\n";
        let concerts = concerts_from_csv(csv, date(2025, 6, 1));
        assert_eq!(concerts.len(), 1);
        assert_eq!(concerts[0].slug, "b");
    }

    #[test]
    fn test_duplicate_slug_first_wins() {
        let csv = "slug,date,artistName\na,2030-01-01,First\na,2031-01-01,Second\n";
        let concerts = concerts_from_csv(csv, date(2025, 6, 1));
        assert_eq!(concerts.len(), 1);
        assert_eq!(concerts[0].artist_name, "First");
    }

    #[test]
    fn test_stream_fields_not_read_from_sheet() {
        let csv = "slug,date,streamPassword,streamVideoId\na,2030-01-01,secret,vid\n";
        let concert = &concerts_from_csv(csv, date(2025, 6, 1))[0];
        assert_eq!(concert.stream_password, None);
        assert_eq!(concert.stream_video_id, None);
    }
}
