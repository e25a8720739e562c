use std::time::Duration;

use chrono::{Datelike, NaiveDate};
use rand::SeedableRng;
use rand_chacha::ChaCha8Rng;
use shared::{
    ActivityProfile, ContributionSequence, HourlyBucket, RepositoryStats, TypeShare, Window,
};
use tracing::instrument;

use crate::Config;

#[derive(Debug, Clone, PartialEq)]
pub struct ActivityBreakdown {
    pub hourly: Vec<HourlyBucket>,
    pub types: Vec<TypeShare>,
    pub repository: RepositoryStats,
}

/// Where a user's contribution data comes from. The dashboard only ever talks
/// to this seam, so a real provider can replace the mock one.
#[async_trait::async_trait]
pub trait ContributionSource: Send + Sync {
    async fn contributions(
        &self,
        username: &str,
        window: Window,
        profile: Option<ActivityProfile>,
    ) -> anyhow::Result<ContributionSequence>;

    async fn activity(&self, username: &str) -> anyhow::Result<ActivityBreakdown>;
}

/// Synthesizes data locally. With a seed every user gets a stable history for
/// a given end date; without one each request draws fresh entropy.
#[derive(Debug, Clone)]
pub struct MockSource {
    profile: ActivityProfile,
    seed: Option<u64>,
    latency: Duration,
    end_date: Option<NaiveDate>,
}

impl MockSource {
    pub fn new(profile: ActivityProfile, seed: Option<u64>, latency: Duration) -> Self {
        Self {
            profile,
            seed,
            latency,
            end_date: None,
        }
    }

    pub fn from_config(config: &Config) -> Self {
        Self::new(
            config.activity_profile,
            config.seed,
            Duration::from_millis(config.simulated_latency_ms),
        )
    }

    /// Pins the last day of every window instead of following the clock.
    pub fn with_end_date(mut self, end_date: NaiveDate) -> Self {
        self.end_date = Some(end_date);
        self
    }

    fn end_date(&self) -> NaiveDate {
        self.end_date.unwrap_or_else(shared::today)
    }

    fn rng(&self, username: &str, salt: u64) -> ChaCha8Rng {
        match self.seed {
            Some(seed) => ChaCha8Rng::seed_from_u64(mix(seed, username, salt)),
            None => ChaCha8Rng::from_entropy(),
        }
    }

    async fn simulate_latency(&self) {
        if !self.latency.is_zero() {
            rocket::tokio::time::sleep(self.latency).await;
        }
    }
}

#[async_trait::async_trait]
impl ContributionSource for MockSource {
    #[instrument(skip(self))]
    async fn contributions(
        &self,
        username: &str,
        window: Window,
        profile: Option<ActivityProfile>,
    ) -> anyhow::Result<ContributionSequence> {
        self.simulate_latency().await;

        let end = self.end_date();
        let profile = profile.unwrap_or(self.profile);
        let mut rng = self.rng(username, day_number(end));
        let sequence = shared::generate_window(window, end, profile, &mut rng)?;
        tracing::debug!(days = sequence.len(), "Generated contributions for {username}");

        Ok(sequence)
    }

    #[instrument(skip(self))]
    async fn activity(&self, username: &str) -> anyhow::Result<ActivityBreakdown> {
        self.simulate_latency().await;

        let mut rng = self.rng(username, !day_number(self.end_date()));
        Ok(ActivityBreakdown {
            hourly: shared::hourly_distribution(&mut rng),
            types: shared::contribution_types(&mut rng),
            repository: shared::repository_stats(&mut rng),
        })
    }
}

fn day_number(date: NaiveDate) -> u64 {
    date.num_days_from_ce().unsigned_abs().into()
}

// FNV-1a, stable across runs unlike the std hasher
fn mix(seed: u64, username: &str, salt: u64) -> u64 {
    const PRIME: u64 = 0x0000_0100_0000_01b3;
    username
        .to_ascii_lowercase()
        .bytes()
        .chain(salt.to_le_bytes())
        .fold(0xcbf2_9ce4_8422_2325 ^ seed, |hash, byte| {
            (hash ^ u64::from(byte)).wrapping_mul(PRIME)
        })
}

#[cfg(test)]
mod tests {
    use super::*;

    fn end() -> NaiveDate {
        NaiveDate::from_ymd_opt(2024, 10, 18).unwrap()
    }

    fn source(seed: Option<u64>) -> MockSource {
        MockSource::new(ActivityProfile::Weighted, seed, Duration::ZERO).with_end_date(end())
    }

    #[rocket::async_test]
    async fn seeded_source_is_stable_per_user() {
        let source = source(Some(99));
        let window = Window::TrailingDays(120);
        let first = source.contributions("octocat", window, None).await.unwrap();
        let again = source.contributions("OctoCat", window, None).await.unwrap();
        let other = source.contributions("torvalds", window, None).await.unwrap();

        assert_eq!(first, again);
        assert_ne!(first, other);
        assert_eq!(first.date_range().unwrap().1, end());
    }

    #[rocket::async_test]
    async fn profile_override_is_honored() {
        let source = source(Some(1));
        let sequence = source
            .contributions(
                "octocat",
                Window::TrailingDays(365),
                Some(ActivityProfile::Uniform),
            )
            .await
            .unwrap();
        assert!(sequence.iter().all(|day| day.count < 12));
        assert!(sequence.iter().filter(|day| day.count == 0).count() < 100);
    }

    #[rocket::async_test]
    async fn invalid_window_keeps_its_error_type() {
        let error = source(None)
            .contributions("octocat", Window::TrailingDays(0), None)
            .await
            .unwrap_err();
        assert!(matches!(
            error.downcast_ref::<shared::Error>(),
            Some(shared::Error::InvalidArgument(_))
        ));
    }

    #[rocket::async_test]
    async fn activity_has_every_breakdown() {
        let activity = source(Some(5)).activity("octocat").await.unwrap();
        assert_eq!(activity.hourly.len(), 24);
        assert_eq!(activity.types.len(), 5);
        assert_eq!(activity.repository.top_languages.len(), 5);
    }

    #[test]
    fn mix_depends_on_every_input() {
        let base = mix(1, "octocat", 2);
        assert_eq!(base, mix(1, "octocat", 2));
        assert_ne!(base, mix(2, "octocat", 2));
        assert_ne!(base, mix(1, "octodog", 2));
        assert_ne!(base, mix(1, "octocat", 3));
    }
}
