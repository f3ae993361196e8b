//! Candidate address generation.
//!
//! Expands one tile address into every (date, layer) URL worth probing over a
//! lookback window. Day offsets are shuffled so that repeated lookups do not
//! all start at "today", which is the date most likely to be missing while
//! GIBS is still processing it. Within one date the layers keep the order of
//! [`Layer::ALL`].

use chrono::{DateTime, Days, NaiveDate, Utc};
use rand::seq::SliceRandom;
use rand::Rng;

use crate::coord::TileAddress;
use crate::provider::{tile_url, Layer};

/// One probe target.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Candidate {
    /// Fully-qualified tile URL, cache buster included.
    pub url: String,
    /// Calendar date of the mosaic.
    pub date: NaiveDate,
    /// Days before the reference date (0 = the reference date itself).
    pub day_offset: u32,
    /// Source layer.
    pub layer: Layer,
}

/// Ordered candidate addresses for a single resolution.
///
/// Consumed front to back by one resolution; a fresh list is built for every
/// call.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct CandidateList {
    candidates: Vec<Candidate>,
}

impl CandidateList {
    /// Builds a list from bare URLs with placeholder date and layer.
    #[cfg(test)]
    pub(crate) fn from_urls<I, S>(urls: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        let candidates = urls
            .into_iter()
            .map(|url| Candidate {
                url: url.into(),
                date: NaiveDate::MIN,
                day_offset: 0,
                layer: Layer::ViirsSnpp,
            })
            .collect();
        Self { candidates }
    }

    pub fn len(&self) -> usize {
        self.candidates.len()
    }

    pub fn is_empty(&self) -> bool {
        self.candidates.is_empty()
    }

    pub fn iter(&self) -> std::slice::Iter<'_, Candidate> {
        self.candidates.iter()
    }

    /// The URLs in probe order.
    pub fn urls(&self) -> impl Iterator<Item = &str> {
        self.candidates.iter().map(|c| c.url.as_str())
    }
}

impl IntoIterator for CandidateList {
    type Item = Candidate;
    type IntoIter = std::vec::IntoIter<Candidate>;

    fn into_iter(self) -> Self::IntoIter {
        self.candidates.into_iter()
    }
}

impl<'a> IntoIterator for &'a CandidateList {
    type Item = &'a Candidate;
    type IntoIter = std::slice::Iter<'a, Candidate>;

    fn into_iter(self) -> Self::IntoIter {
        self.candidates.iter()
    }
}

/// Builds the candidate list for a tile over a lookback window.
///
/// # Arguments
///
/// * `tile` - Tile to request
/// * `lookback_days` - Number of calendar days to search, counting the
///   reference date as offset 0
/// * `reference` - "Now": supplies the UTC reference date and the cache-buster
///   timestamp
/// * `rng` - Random source for the day-offset shuffle
///
/// The result holds `lookback_days × 2` candidates: shuffled day offsets on
/// the outside, [`Layer::ALL`] order on the inside. Offsets that would fall
/// before the earliest representable calendar date are dropped.
pub fn build_candidate_addresses<R>(
    tile: &TileAddress,
    lookback_days: u32,
    reference: DateTime<Utc>,
    rng: &mut R,
) -> CandidateList
where
    R: Rng + ?Sized,
{
    let today = reference.date_naive();
    let cache_buster = reference.timestamp_millis();

    let mut offsets: Vec<u32> = (0..lookback_days).collect();
    offsets.shuffle(rng);

    let mut candidates = Vec::with_capacity(offsets.len() * Layer::ALL.len());
    for day_offset in offsets {
        let Some(date) = today.checked_sub_days(Days::new(u64::from(day_offset))) else {
            continue;
        };

        for layer in Layer::ALL {
            candidates.push(Candidate {
                url: tile_url(layer, date, tile, cache_buster),
                date,
                day_offset,
                layer,
            });
        }
    }

    CandidateList { candidates }
}
