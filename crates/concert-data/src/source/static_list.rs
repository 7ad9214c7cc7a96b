//! Static Concert List
//!
//! Hand-authored listings compiled into the binary. Edit `build_concerts`
//! to add or update concerts.

use std::sync::LazyLock;

use async_trait::async_trait;
use chrono::NaiveDate;

use super::ConcertSource;
use crate::error::Result;
use crate::model::{Concert, ConcertStatus};

static CONCERTS: LazyLock<Vec<Concert>> = LazyLock::new(build_concerts);

/// The process-wide static list
pub fn static_concerts() -> &'static [Concert] {
    &CONCERTS
}

/// Serves the compiled-in list
#[derive(Clone, Copy, Debug, Default)]
pub struct StaticSource;

impl StaticSource {
    pub fn new() -> Self {
        Self
    }
}

#[async_trait]
impl ConcertSource for StaticSource {
    async fn load(&self) -> Result<Vec<Concert>> {
        Ok(static_concerts().to_vec())
    }

    fn name(&self) -> &str {
        "static"
    }
}

fn build_concerts() -> Vec<Concert> {
    vec![Concert {
        id: "1".into(),
        slug: "the-consequences-february-2026".into(),
        artist_name: "The Consequences".into(),
        date: NaiveDate::from_ymd_opt(2026, 2, 14).unwrap_or_default(),
        doors_time: "6:00 PM".into(),
        show_time: "7:00 PM".into(),
        suggested_donation: "$20".into(),
        short_description: "Award-winning Irish traditional band featuring concertina, fiddle, bodhrán, and piano.".into(),
        full_description: "Get ready for an amazing night of Irish traditional music with The Consequences!

There will also be a session after the show, so bring your instruments if you got 'em!"
            .into(),
        artist_bio: "Driven by a passion for exploring the colors and complexities of Irish music, The Consequences are a new Irish traditional band founded by Lexie Boatright (concertina & harp), Jake James (fiddle), Cara Wildman (bodhrán & dance), and Ryan Ward (piano & piano accordion). Award-winning soloists in their own right, the quartet comes together to create a dynamic and enthralling sound with a combination of traditional and original tunes.

Lexie Boatright is a multiple All-Ireland award-winning harpist and concertina player and executive director of the Baltimore-Washington Academy of Irish Culture.

Jake James is a two-time All-Ireland fiddle champion from Queens, NYC. The Irish Echo called his 2018 album Firewood an \"outstanding debut solo recording.\"

Cara Wildman is a highly sought after bodhrán player at the cutting edge of the instrument's modern development. She was the 2021 All-Ireland Fleadhfest champion and has a Masters in Irish Traditional Music Performance from the University of Limerick.

Ryan Ward is an award-winning pianist and accordion player from NYC. He is a Senior All-Ireland Accompaniment Champion and a highly sought after accompanist in the NY area."
            .into(),
        artist_website: Some("https://theconsequencesband.com/home".into()),
        artist_spotify: None,
        artist_instagram: None,
        featured_image: "https://d10j3mvrs1suex.cloudfront.net/s:bzglfiles/u/684926/935add7e27569408466d6612b01eefed7020809b/original/promo-photo2.jpg/!!/b%3AW1sic2l6ZSIsInBob3RvIl1d/meta%3AeyJzcmNCdWNrZXQiOiJiemdsZmlsZXMifQ%3D%3D.jpg".into(),
        artist_image: None,
        gallery_images: None,
        youtube_video_id: Some("9jKpjU9RDU8".into()),
        stream_video_id: None,
        stream_password: None,
        rsvp_link: String::new(),
        status: ConcertStatus::Upcoming,
    }]
}
