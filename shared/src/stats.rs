use chrono::{Datelike, NaiveDate};

use super::*;

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PeriodTotal {
    pub period: TimePeriodString,
    /// `None` only for the all-time period.
    pub start: Option<NaiveDate>,
    pub contributions: u64,
}

impl ContributionSequence {
    pub fn total_contributions(&self) -> u64 {
        self.iter().map(|day| u64::from(day.count)).sum()
    }

    /// Sum per calendar month, January first. Years are not distinguished,
    /// so a multi-year sequence folds the same month of every year together.
    /// Use [`Self::totals_by_period`] for year-scoped totals.
    pub fn monthly_buckets(&self) -> [u64; 12] {
        let mut buckets = [0; 12];
        for day in self {
            buckets[day.date.month0() as usize] += u64::from(day.count);
        }
        buckets
    }

    /// Sum per weekday, Sunday first.
    pub fn weekday_buckets(&self) -> [u64; 7] {
        let mut buckets = [0; 7];
        for day in self {
            buckets[DayOfWeek::of(day.date).index()] += u64::from(day.count);
        }
        buckets
    }

    /// Weekday with the strictly largest sum; the earliest weekday wins a tie,
    /// which makes an empty sequence report Sunday.
    pub fn most_active_weekday(&self) -> DayOfWeek {
        let buckets = self.weekday_buckets();
        let mut best = 0;
        for (index, total) in buckets.iter().enumerate().skip(1) {
            if *total > buckets[best] {
                best = index;
            }
        }
        DayOfWeek::from_index(best)
    }

    /// Mean contributions per day rounded to one decimal, 0 when empty.
    pub fn average_daily(&self) -> f64 {
        if self.is_empty() {
            return 0.0;
        }
        let average = self.total_contributions() as f64 / self.len() as f64;
        (average * 10.0).round() / 10.0
    }

    /// Totals per distinct period key, in ascending order.
    pub fn totals_by_period(&self, period: TimePeriod) -> Vec<PeriodTotal> {
        let mut totals: Vec<PeriodTotal> = Vec::new();
        for day in self {
            let key = period.time_string(day.date);
            match totals.last_mut() {
                Some(last) if last.period == key => last.contributions += u64::from(day.count),
                _ => totals.push(PeriodTotal {
                    period: key,
                    start: period.start_period(day.date),
                    contributions: u64::from(day.count),
                }),
            }
        }
        totals
    }

    pub fn summary(&self) -> UserSummary {
        UserSummary::new(self)
    }
}

#[cfg(test)]
mod tests {
    use rand::SeedableRng;
    use rand_chacha::ChaCha8Rng;

    use super::*;

    fn date(y: i32, m: u32, d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, d).unwrap()
    }

    #[test]
    fn week_scenario() {
        // 2024-03-17 is a Sunday
        let sequence =
            ContributionSequence::from_counts(date(2024, 3, 17), [0, 1, 0, 3, 4, 5, 0]).unwrap();

        assert_eq!(sequence.total_contributions(), 13);
        assert_eq!(sequence.weekday_buckets(), [0, 1, 0, 3, 4, 5, 0]);
        assert_eq!(sequence.most_active_weekday(), DayOfWeek::Friday);
        assert_eq!(sequence.average_daily(), 1.9);

        let summary = summarize(&sequence);
        assert_eq!(summary.total_contributions, 13);
        assert_eq!(summary.streaks.current, 0);
        assert_eq!(summary.streaks.longest, 3);
        assert_eq!(summary.most_active_day, DayOfWeek::Friday);
    }

    #[test]
    fn empty_sequence_defaults() {
        let summary = ContributionSequence::default().summary();
        assert_eq!(summary.total_contributions, 0);
        assert_eq!(summary.average_daily, 0.0);
        assert_eq!(summary.streaks.longest, 0);
        assert_eq!(summary.most_active_day, DayOfWeek::Sunday);
    }

    #[test]
    fn weekday_tie_prefers_earliest() {
        // Monday and Thursday both sum to 4
        let sequence =
            ContributionSequence::from_counts(date(2024, 3, 17), [0, 4, 0, 0, 4, 0, 0]).unwrap();
        assert_eq!(sequence.most_active_weekday(), DayOfWeek::Monday);
    }

    #[test]
    fn monthly_buckets_fold_years_together() {
        let sequence = ContributionSequence::from_counts(
            date(2023, 1, 1),
            std::iter::repeat(1).take(365 + 31),
        )
        .unwrap();
        let buckets = sequence.monthly_buckets();
        assert_eq!(buckets[0], 62);
        assert_eq!(buckets[1], 28);

        let years = sequence.totals_by_period(TimePeriod::Year);
        assert_eq!(years.len(), 2);
        assert_eq!(years[0].period, "2023");
        assert_eq!(years[0].contributions, 365);
        assert_eq!(years[1].start, Some(date(2024, 1, 1)));
        assert_eq!(years[1].contributions, 31);
    }

    #[test]
    fn period_totals() {
        let sequence =
            ContributionSequence::from_counts(date(2024, 1, 30), [1, 2, 3, 4, 5]).unwrap();
        let months = sequence.totals_by_period(TimePeriod::Month);
        assert_eq!(
            months,
            vec![
                PeriodTotal {
                    period: "2024-01".to_string(),
                    start: Some(date(2024, 1, 1)),
                    contributions: 3,
                },
                PeriodTotal {
                    period: "2024-02".to_string(),
                    start: Some(date(2024, 2, 1)),
                    contributions: 12,
                },
            ]
        );

        let all_time = sequence.totals_by_period(TimePeriod::AllTime);
        assert_eq!(all_time.len(), 1);
        assert_eq!(all_time[0].start, None);
        assert_eq!(all_time[0].contributions, 15);
    }

    #[test]
    fn aggregation_conserves_total() {
        let end = date(2024, 6, 30);
        let profiles = [ActivityProfile::Uniform, ActivityProfile::Weighted];
        for (seed, profile) in (0..10).zip(profiles.into_iter().cycle()) {
            let mut rng = ChaCha8Rng::seed_from_u64(seed);
            let sequence = generate(365, end, profile, &mut rng).unwrap();
            let total = sequence.total_contributions();

            assert_eq!(sequence.monthly_buckets().iter().sum::<u64>(), total);
            assert_eq!(sequence.weekday_buckets().iter().sum::<u64>(), total);
            for period in TimePeriod::iter() {
                let sum: u64 = sequence
                    .totals_by_period(period)
                    .iter()
                    .map(|p| p.contributions)
                    .sum();
                assert_eq!(sum, total, "{period}");
            }

            let exact = total as f64 / sequence.len() as f64;
            assert!((sequence.average_daily() - exact).abs() <= 0.05 + f64::EPSILON);
        }
    }
}
