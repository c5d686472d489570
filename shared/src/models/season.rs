//! Harvest season calendar

use std::fmt;
use std::str::FromStr;

use chrono::{Datelike, NaiveDate};
use serde::{Deserialize, Serialize};

/// One of the three annual rice cropping windows
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub enum Season {
    S1,
    S2,
    S3,
}

impl Season {
    /// All seasons in calendar order
    pub const ALL: [Season; 3] = [Season::S1, Season::S2, Season::S3];

    /// 1-based position within the year
    pub fn ordinal(&self) -> u8 {
        match self {
            Season::S1 => 1,
            Season::S2 => 2,
            Season::S3 => 3,
        }
    }

    pub fn from_ordinal(ordinal: u8) -> Option<Self> {
        match ordinal {
            1 => Some(Season::S1),
            2 => Some(Season::S2),
            3 => Some(Season::S3),
            _ => None,
        }
    }
}

impl fmt::Display for Season {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "S{}", self.ordinal())
    }
}

/// Bucket key for a harvest season: `(year, season)`
///
/// Ordering is chronological because `year` is compared before `season`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct SeasonKey {
    pub year: i32,
    pub season: Season,
}

impl SeasonKey {
    pub fn new(year: i32, season: Season) -> Self {
        Self { year, season }
    }
}

impl fmt::Display for SeasonKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{:04}-{}", self.year, self.season)
    }
}

impl FromStr for SeasonKey {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let (year, season) = s
            .rsplit_once("-S")
            .ok_or_else(|| format!("Invalid season key: {}", s))?;
        let year = year
            .parse::<i32>()
            .map_err(|_| format!("Invalid season year: {}", s))?;
        let season = season
            .parse::<u8>()
            .ok()
            .and_then(Season::from_ordinal)
            .ok_or_else(|| format!("Invalid season number: {}", s))?;
        Ok(Self { year, season })
    }
}

impl Serialize for SeasonKey {
    fn serialize<S: serde::Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.collect_str(self)
    }
}

impl<'de> Deserialize<'de> for SeasonKey {
    fn deserialize<D: serde::Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let s = String::deserialize(deserializer)?;
        s.parse().map_err(serde::de::Error::custom)
    }
}

/// Assign a harvest date to its season bucket
///
/// March-May is S1, June-August S2, September-November S3. December rolls
/// into S1 of the following year while January and February stay in S1 of
/// their own year.
pub fn season_of(date: NaiveDate) -> SeasonKey {
    let year = date.year();
    match date.month() {
        3..=5 => SeasonKey::new(year, Season::S1),
        6..=8 => SeasonKey::new(year, Season::S2),
        9..=11 => SeasonKey::new(year, Season::S3),
        12 => SeasonKey::new(year + 1, Season::S1),
        _ => SeasonKey::new(year, Season::S1),
    }
}
