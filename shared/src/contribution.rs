use chrono::{Days, NaiveDate};
use strum::EnumIter;

use super::*;

/// Coarse intensity bucket of a day's contribution count.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, EnumIter, Serialize, Deserialize,
)]
#[serde(into = "u8", try_from = "u8")]
#[repr(u8)]
pub enum Level {
    None = 0,
    Low = 1,
    Medium = 2,
    High = 3,
    Max = 4,
}

impl Level {
    pub const fn from_count(count: u32) -> Self {
        match count {
            0 => Self::None,
            1..=2 => Self::Low,
            3..=5 => Self::Medium,
            6..=8 => Self::High,
            _ => Self::Max,
        }
    }

    pub const fn value(self) -> u8 {
        self as u8
    }
}

impl From<Level> for u8 {
    fn from(level: Level) -> Self {
        level.value()
    }
}

impl TryFrom<u8> for Level {
    type Error = Error;

    fn try_from(value: u8) -> Result<Self> {
        match value {
            0 => Ok(Self::None),
            1 => Ok(Self::Low),
            2 => Ok(Self::Medium),
            3 => Ok(Self::High),
            4 => Ok(Self::Max),
            _ => Err(Error::invalid(format!("level {value} is out of range 0..=4"))),
        }
    }
}

/// One calendar day of activity. The level is always derived from `count`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(into = "DayRecord")]
pub struct ContributionDay {
    pub date: NaiveDate,
    pub count: u32,
}

#[derive(Serialize)]
struct DayRecord {
    date: NaiveDate,
    count: u32,
    level: Level,
}

impl From<ContributionDay> for DayRecord {
    fn from(day: ContributionDay) -> Self {
        Self {
            date: day.date,
            count: day.count,
            level: day.level(),
        }
    }
}

impl ContributionDay {
    pub const fn new(date: NaiveDate, count: u32) -> Self {
        Self { date, count }
    }

    pub const fn level(&self) -> Level {
        Level::from_count(self.count)
    }

    pub const fn is_active(&self) -> bool {
        self.count > 0
    }
}

/// Gap-free run of days in ascending order with a one-day stride.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
#[serde(transparent)]
pub struct ContributionSequence {
    days: Vec<ContributionDay>,
}

impl ContributionSequence {
    pub fn new(days: Vec<ContributionDay>) -> Result<Self> {
        for (index, pair) in days.windows(2).enumerate() {
            if pair[0].date.succ_opt() != Some(pair[1].date) {
                return Err(Error::invalid(format!(
                    "day {} ({}) does not directly follow {}",
                    index + 1,
                    pair[1].date,
                    pair[0].date
                )));
            }
        }

        Ok(Self { days })
    }

    pub fn from_counts(start: NaiveDate, counts: impl IntoIterator<Item = u32>) -> Result<Self> {
        let mut days = Vec::new();
        let mut date = Some(start);
        for count in counts {
            let current = date.ok_or_else(|| {
                Error::invalid(format!("sequence starting at {start} overflows the calendar"))
            })?;
            days.push(ContributionDay::new(current, count));
            date = current.succ_opt();
        }

        Ok(Self { days })
    }

    pub(crate) fn from_days_unchecked(days: Vec<ContributionDay>) -> Self {
        Self { days }
    }

    pub fn days(&self) -> &[ContributionDay] {
        &self.days
    }

    pub fn iter(&self) -> std::slice::Iter<'_, ContributionDay> {
        self.days.iter()
    }

    pub fn len(&self) -> usize {
        self.days.len()
    }

    pub fn is_empty(&self) -> bool {
        self.days.is_empty()
    }

    pub fn get(&self, index: usize) -> Option<&ContributionDay> {
        self.days.get(index)
    }

    /// Inclusive first and last date.
    pub fn date_range(&self) -> Result<(NaiveDate, NaiveDate)> {
        match (self.days.first(), self.days.last()) {
            (Some(first), Some(last)) => Ok((first.date, last.date)),
            _ => Err(Error::EmptyInput("an empty sequence has no date range")),
        }
    }

    pub fn max_count(&self) -> u32 {
        self.days.iter().map(|day| day.count).max().unwrap_or_default()
    }

}

impl<'de> Deserialize<'de> for ContributionSequence {
    fn deserialize<D>(deserializer: D) -> std::result::Result<Self, D::Error>
    where
        D: serde::Deserializer<'de>,
    {
        let days = Vec::<ContributionDay>::deserialize(deserializer)?;
        Self::new(days).map_err(serde::de::Error::custom)
    }
}

impl<'a> IntoIterator for &'a ContributionSequence {
    type Item = &'a ContributionDay;
    type IntoIter = std::slice::Iter<'a, ContributionDay>;

    fn into_iter(self) -> Self::IntoIter {
        self.days.iter()
    }
}

pub(crate) fn window_start(end: NaiveDate, window_days: u32) -> Result<NaiveDate> {
    if window_days == 0 {
        return Err(Error::invalid("window size must be a positive number of days"));
    }

    end.checked_sub_days(Days::new(u64::from(window_days - 1)))
        .ok_or_else(|| {
            Error::invalid(format!(
                "a {window_days}-day window ending at {end} starts before the supported calendar"
            ))
        })
}
