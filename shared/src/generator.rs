use chrono::{Datelike, NaiveDate};
use rand::Rng;
use strum::{Display, EnumIter, EnumString};

use super::*;

pub const DEFAULT_WINDOW_DAYS: u32 = 365;

/// Shape of the synthetic activity.
#[derive(
    Debug,
    Clone,
    Copy,
    PartialEq,
    Eq,
    Default,
    EnumIter,
    EnumString,
    Display,
    Serialize,
    Deserialize,
)]
#[serde(rename_all = "snake_case")]
#[strum(serialize_all = "snake_case")]
pub enum ActivityProfile {
    /// Every day drawn uniformly from `0..12`.
    #[default]
    Uniform,
    /// Mostly idle days with occasional medium and rare high activity.
    Weighted,
}

impl ActivityProfile {
    pub fn sample_count<R: Rng + ?Sized>(self, rng: &mut R) -> u32 {
        match self {
            Self::Uniform => rng.gen_range(0..12),
            Self::Weighted => {
                let roll: f64 = rng.gen();
                if roll > 0.95 {
                    rng.gen_range(10..30)
                } else if roll > 0.7 {
                    rng.gen_range(1..6)
                } else {
                    0
                }
            }
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Window {
    TrailingDays(u32),
    /// January 1 of the end date's year through the end date.
    YearToDate,
}

impl Default for Window {
    fn default() -> Self {
        Self::TrailingDays(DEFAULT_WINDOW_DAYS)
    }
}

impl Window {
    pub fn days_until(&self, end: NaiveDate) -> u32 {
        match self {
            Self::TrailingDays(days) => *days,
            Self::YearToDate => end.ordinal(),
        }
    }
}

/// Synthesizes `window_days` consecutive days ending at `end` inclusive.
pub fn generate<R: Rng + ?Sized>(
    window_days: u32,
    end: NaiveDate,
    profile: ActivityProfile,
    rng: &mut R,
) -> Result<ContributionSequence> {
    let start = window_start(end, window_days)?;
    tracing::debug!(%start, %end, %profile, "Generating contributions");

    let days = start
        .iter_days()
        .take(window_days as usize)
        .map(|date| ContributionDay::new(date, profile.sample_count(rng)))
        .collect();

    Ok(ContributionSequence::from_days_unchecked(days))
}

pub fn generate_window<R: Rng + ?Sized>(
    window: Window,
    end: NaiveDate,
    profile: ActivityProfile,
    rng: &mut R,
) -> Result<ContributionSequence> {
    generate(window.days_until(end), end, profile, rng)
}
