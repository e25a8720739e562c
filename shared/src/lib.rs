use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

mod activity;
mod contribution;
mod error;
mod generator;
mod grid;
mod stats;
mod streak;
mod timeperiod;

pub mod github;

pub use activity::*;
pub use contribution::*;
pub use error::*;
pub use generator::*;
pub use grid::*;
pub use stats::*;
pub use streak::*;
pub use timeperiod::*;

pub type GithubHandle = String;

/// Read-only aggregate shown on the profile card.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct UserSummary {
    pub total_contributions: u64,
    pub streaks: StreakSummary,
    pub most_active_day: DayOfWeek,
    pub average_daily: f64,
}

impl UserSummary {
    pub fn new(sequence: &ContributionSequence) -> Self {
        Self {
            total_contributions: sequence.total_contributions(),
            streaks: sequence.streak_summary(),
            most_active_day: sequence.most_active_weekday(),
            average_daily: sequence.average_daily(),
        }
    }
}

pub fn summarize(sequence: &ContributionSequence) -> UserSummary {
    UserSummary::new(sequence)
}

pub fn today() -> NaiveDate {
    chrono::Utc::now().date_naive()
}
