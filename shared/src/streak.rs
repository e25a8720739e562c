use chrono::NaiveDate;

use super::*;

/// Maximal run of consecutive days with at least one contribution.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Streak {
    pub start: NaiveDate,
    pub end: NaiveDate,
    pub length: u32,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct StreakSummary {
    /// Run touching the last day, 0 if the last day has no contributions.
    pub current: u32,
    pub longest: u32,
}

impl ContributionSequence {
    pub fn streak_summary(&self) -> StreakSummary {
        self.iter()
            .fold(StreakSummary::default(), |mut summary, day| {
                if day.is_active() {
                    summary.current += 1;
                    summary.longest = summary.longest.max(summary.current);
                } else {
                    summary.current = 0;
                }
                summary
            })
    }

    pub fn current_streak(&self) -> u32 {
        self.streak_summary().current
    }

    pub fn longest_streak(&self) -> u32 {
        self.streak_summary().longest
    }

    /// Every maximal run in discovery order. A run reaching the last day is
    /// closed at the sequence boundary like any other.
    pub fn streaks(&self) -> Vec<Streak> {
        let mut streaks = Vec::new();
        let mut open: Option<Streak> = None;

        for day in self.iter() {
            if !day.is_active() {
                streaks.extend(open.take());
                continue;
            }

            if let Some(streak) = open.as_mut() {
                streak.end = day.date;
                streak.length += 1;
            } else {
                open = Some(Streak {
                    start: day.date,
                    end: day.date,
                    length: 1,
                });
            }
        }
        streaks.extend(open);

        streaks
    }

    /// Longest `n` runs, ties kept in discovery order.
    pub fn top_streaks(&self, n: usize) -> Vec<Streak> {
        let mut streaks = self.streaks();
        streaks.sort_by(|a, b| b.length.cmp(&a.length));
        streaks.truncate(n);
        streaks
    }
}
