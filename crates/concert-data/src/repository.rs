//! Concert Repository
//!
//! Query operations over one loaded collection of concerts. A repository
//! is built fresh from each load and never mutated afterwards.

use crate::error::Result;
use crate::model::{Concert, ConcertStatus};
use crate::source::ConcertSource;

/// An immutable, queryable set of concerts
#[derive(Clone, Debug, Default)]
pub struct ConcertRepository {
    concerts: Vec<Concert>,
}

impl ConcertRepository {
    pub fn new(concerts: Vec<Concert>) -> Self {
        Self { concerts }
    }

    /// Load a fresh collection from a source
    pub async fn load_from(source: &dyn ConcertSource) -> Result<Self> {
        let concerts = source.load().await?;
        tracing::debug!(source = source.name(), count = concerts.len(), "Loaded concerts");
        Ok(Self::new(concerts))
    }

    /// Upcoming concerts, earliest first
    pub fn upcoming(&self) -> Vec<&Concert> {
        let mut upcoming = self.with_status(ConcertStatus::Upcoming);
        upcoming.sort_by_key(|c| c.date);
        upcoming
    }

    /// Past concerts, most recent first
    pub fn past(&self) -> Vec<&Concert> {
        let mut past = self.with_status(ConcertStatus::Past);
        past.sort_by(|a, b| b.date.cmp(&a.date));
        past
    }

    pub fn by_slug(&self, slug: &str) -> Option<&Concert> {
        self.concerts.iter().find(|c| c.slug == slug)
    }

    /// The soonest upcoming concert
    pub fn next(&self) -> Option<&Concert> {
        self.upcoming().into_iter().next()
    }

    pub fn all(&self) -> &[Concert] {
        &self.concerts
    }

    pub fn len(&self) -> usize {
        self.concerts.len()
    }

    pub fn is_empty(&self) -> bool {
        self.concerts.is_empty()
    }

    fn with_status(&self, status: ConcertStatus) -> Vec<&Concert> {
        self.concerts.iter().filter(|c| c.status == status).collect()
    }
}
