use rand::Rng;
use strum::{Display, EnumIter};

use super::*;

pub const HOURS_PER_DAY: u8 = 24;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct HourlyBucket {
    pub hour: u8,
    pub contributions: u32,
}

impl HourlyBucket {
    /// `12am`, `1am` … `12pm`, `1pm` … `11pm`.
    pub fn label(&self) -> String {
        match self.hour {
            0 => "12am".to_string(),
            h @ 1..=11 => format!("{h}am"),
            12 => "12pm".to_string(),
            h => format!("{}pm", h - 12),
        }
    }
}

/// Simulated time-of-day activity peaking late morning to mid afternoon and
/// again in the evening.
pub fn hourly_distribution<R: Rng + ?Sized>(rng: &mut R) -> Vec<HourlyBucket> {
    (0..HOURS_PER_DAY)
        .map(|hour| {
            let contributions = match hour {
                9..=15 => 15 + rng.gen_range(0..10),
                20..=22 => 10 + rng.gen_range(0..8),
                _ => rng.gen_range(0..5),
            };
            HourlyBucket {
                hour,
                contributions,
            }
        })
        .collect()
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, EnumIter, Display, Serialize, Deserialize)]
pub enum ContributionType {
    Code,
    #[strum(to_string = "Pull Requests")]
    PullRequests,
    Issues,
    #[strum(to_string = "Code Reviews")]
    CodeReviews,
    Discussion,
}

impl ContributionType {
    pub const fn color(self) -> &'static str {
        match self {
            Self::Code => "#6366f1",
            Self::PullRequests => "#8b5cf6",
            Self::Issues => "#ec4899",
            Self::CodeReviews => "#f97316",
            Self::Discussion => "#14b8a6",
        }
    }

    /// Guaranteed floor and random spread of the simulated value.
    const fn weight(self) -> (u32, u32) {
        match self {
            Self::Code => (35, 20),
            Self::PullRequests => (15, 15),
            Self::Issues => (10, 10),
            Self::CodeReviews => (15, 15),
            Self::Discussion => (5, 10),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct TypeShare {
    pub kind: ContributionType,
    pub value: u32,
}

pub fn contribution_types<R: Rng + ?Sized>(rng: &mut R) -> Vec<TypeShare> {
    ContributionType::iter()
        .map(|kind| {
            let (floor, spread) = kind.weight();
            TypeShare {
                kind,
                value: floor + rng.gen_range(0..spread),
            }
        })
        .collect()
}

/// Share of each entry relative to the sum, rounded to whole percent.
pub fn percentages(shares: &[TypeShare]) -> Vec<u32> {
    let total: u32 = shares.iter().map(|share| share.value).sum();
    if total == 0 {
        return vec![0; shares.len()];
    }
    shares
        .iter()
        .map(|share| (f64::from(share.value) * 100.0 / f64::from(total)).round() as u32)
        .collect()
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct LanguageShare {
    pub name: String,
    pub percentage: u32,
    pub color: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RepositoryStats {
    pub total_repos: u32,
    pub stars_received: u32,
    pub forks_received: u32,
    pub top_languages: Vec<LanguageShare>,
}

const LANGUAGES: [(&str, u32, u32, &str); 5] = [
    ("JavaScript", 40, 20, "#f7df1e"),
    ("TypeScript", 20, 15, "#3178c6"),
    ("Python", 10, 10, "#3776ab"),
    ("HTML/CSS", 5, 5, "#e34c26"),
    ("Other", 5, 5, "#cccccc"),
];

pub fn repository_stats<R: Rng + ?Sized>(rng: &mut R) -> RepositoryStats {
    RepositoryStats {
        total_repos: 15 + rng.gen_range(0..20),
        stars_received: 100 + rng.gen_range(0..500),
        forks_received: 20 + rng.gen_range(0..100),
        top_languages: LANGUAGES
            .iter()
            .map(|(name, floor, spread, color)| LanguageShare {
                name: name.to_string(),
                percentage: floor + rng.gen_range(0..*spread),
                color: color.to_string(),
            })
            .collect(),
    }
}
