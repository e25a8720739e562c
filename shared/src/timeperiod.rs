use chrono::{Datelike, Days, NaiveDate};
use strum::{Display, EnumIter, EnumString, FromRepr};

use super::*;

pub use strum::IntoEnumIterator;

pub type TimePeriodString = String;

pub const MONTH_NAMES: [&str; 12] = [
    "Jan", "Feb", "Mar", "Apr", "May", "Jun", "Jul", "Aug", "Sep", "Oct", "Nov", "Dec",
];

/// Weekday indexed from Sunday, the way the heatmap rows are ordered.
#[derive(
    Debug,
    Clone,
    Copy,
    PartialEq,
    Eq,
    Hash,
    EnumIter,
    FromRepr,
    Display,
    EnumString,
    Serialize,
    Deserialize,
)]
#[repr(u8)]
pub enum DayOfWeek {
    Sunday,
    Monday,
    Tuesday,
    Wednesday,
    Thursday,
    Friday,
    Saturday,
}

impl DayOfWeek {
    pub fn of(date: NaiveDate) -> Self {
        Self::from_index(date.weekday().num_days_from_sunday() as usize)
    }

    /// Wraps around, so any index lands on a weekday.
    pub fn from_index(index: usize) -> Self {
        Self::from_repr((index % 7) as u8).unwrap_or(Self::Sunday)
    }

    pub const fn index(self) -> usize {
        self as usize
    }

    pub const fn short_name(self) -> &'static str {
        match self {
            Self::Sunday => "Sun",
            Self::Monday => "Mon",
            Self::Tuesday => "Tue",
            Self::Wednesday => "Wed",
            Self::Thursday => "Thu",
            Self::Friday => "Fri",
            Self::Saturday => "Sat",
        }
    }
}

#[derive(
    Debug, PartialEq, Eq, Clone, Copy, EnumIter, EnumString, Display, Serialize, Deserialize,
)]
#[serde(rename_all = "snake_case")]
#[strum(serialize_all = "snake_case")]
pub enum TimePeriod {
    Day,
    Week,
    Month,
    Quarter,
    Year,
    #[strum(to_string = "all-time", serialize = "all_time")]
    #[serde(rename = "all-time")]
    AllTime,
}

impl TimePeriod {
    /// Sortable key of the period containing `date`.
    pub fn time_string(&self, date: NaiveDate) -> TimePeriodString {
        match self {
            Self::Day => date.format("%Y-%m-%d").to_string(),
            Self::Week => {
                let week = date.iso_week();
                format!("{}-W{:02}", week.year(), week.week())
            }
            Self::Month => format!("{}-{:02}", date.year(), date.month()),
            Self::Quarter => format!("{}-Q{}", date.year(), date.month0() / 3 + 1),
            Self::Year => date.year().to_string(),
            Self::AllTime => "all-time".to_string(),
        }
    }

    /// First day of the period containing `date`. `None` for all-time.
    pub fn start_period(&self, date: NaiveDate) -> Option<NaiveDate> {
        match self {
            Self::Day => Some(date),
            Self::Week => date.checked_sub_days(Days::new(u64::from(
                date.weekday().num_days_from_monday(),
            ))),
            Self::Month => date.with_day(1),
            Self::Quarter => NaiveDate::from_ymd_opt(date.year(), date.month0() / 3 * 3 + 1, 1),
            Self::Year => NaiveDate::from_ymd_opt(date.year(), 1, 1),
            Self::AllTime => None,
        }
    }
}
