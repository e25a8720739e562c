use chrono::NaiveDate;
use rocket::{
    http::Status,
    response::{self, Responder},
    serde::json::Json,
    FromFormField, Request,
};
use serde::{Deserialize, Serialize};
use shared::{
    github, ActivityProfile, ContributionDay, ContributionSequence, DayOfWeek, GridPosition,
    IntoEnumIterator, MonthLabel, PeriodTotal, Streak, UserSummary, MONTH_NAMES,
};
use utoipa::ToSchema;

use crate::source::ActivityBreakdown;

#[derive(Debug, Clone, Copy, FromFormField, ToSchema)]
pub enum Profile {
    Uniform,
    Weighted,
}

impl From<Profile> for ActivityProfile {
    fn from(profile: Profile) -> Self {
        match profile {
            Profile::Uniform => ActivityProfile::Uniform,
            Profile::Weighted => ActivityProfile::Weighted,
        }
    }
}

#[derive(Clone, Debug, Serialize, Deserialize, ToSchema)]
pub struct ErrorResponse {
    pub error: String,
}

#[derive(Debug)]
pub enum ApiError {
    BadRequest(String),
    Internal(anyhow::Error),
}

impl From<shared::Error> for ApiError {
    fn from(error: shared::Error) -> Self {
        Self::BadRequest(error.to_string())
    }
}

impl From<anyhow::Error> for ApiError {
    fn from(error: anyhow::Error) -> Self {
        match error.downcast::<shared::Error>() {
            Ok(error) => error.into(),
            Err(error) => Self::Internal(error),
        }
    }
}

impl<'r> Responder<'r, 'static> for ApiError {
    fn respond_to(self, request: &'r Request<'_>) -> response::Result<'static> {
        match self {
            Self::BadRequest(error) => {
                rocket::info!("Rejected {}: {error}", request.uri());
                (Status::BadRequest, Json(ErrorResponse { error })).respond_to(request)
            }
            Self::Internal(error) => {
                rocket::error!("Failed to handle {}: {error:#}", request.uri());
                Err(Status::InternalServerError)
            }
        }
    }
}

#[derive(Clone, Debug, Serialize, Deserialize, ToSchema)]
pub struct GithubMeta {
    login: String,
    image: String,
    profile: String,
}

impl GithubMeta {
    pub fn new(login: String) -> Self {
        let image = github::avatar_url(&login);
        let profile = github::profile_url(&login);
        Self {
            login,
            image,
            profile,
        }
    }
}

#[derive(Clone, Debug, Serialize, Deserialize, ToSchema)]
pub struct WindowResponse {
    pub start: NaiveDate,
    pub end: NaiveDate,
    pub days: usize,
}

impl WindowResponse {
    pub fn new(sequence: &ContributionSequence) -> Option<Self> {
        let (start, end) = sequence.date_range().ok()?;
        Some(Self {
            start,
            end,
            days: sequence.len(),
        })
    }
}

#[derive(Clone, Debug, Serialize, Deserialize, ToSchema)]
pub struct StreaksResponse {
    pub current: u32,
    pub longest: u32,
}

#[derive(Clone, Debug, Serialize, Deserialize, ToSchema)]
pub struct UserSummaryResponse {
    pub total_contributions: u64,
    pub streaks: StreaksResponse,
    pub most_active_day: String,
    pub average_daily: f64,
}

impl From<UserSummary> for UserSummaryResponse {
    fn from(summary: UserSummary) -> Self {
        Self {
            total_contributions: summary.total_contributions,
            streaks: StreaksResponse {
                current: summary.streaks.current,
                longest: summary.streaks.longest,
            },
            most_active_day: summary.most_active_day.to_string(),
            average_daily: summary.average_daily,
        }
    }
}

#[derive(Clone, Debug, Serialize, Deserialize, ToSchema)]
pub struct UserProfileResponse {
    pub user: GithubMeta,
    pub window: Option<WindowResponse>,
    pub summary: UserSummaryResponse,
}

#[derive(Clone, Debug, Serialize, Deserialize, ToSchema)]
pub struct ContributionDayResponse {
    pub date: NaiveDate,
    pub count: u32,
    pub level: u8,
    pub week: usize,
    pub day: usize,
}

impl ContributionDayResponse {
    pub fn new(position: GridPosition, day: &ContributionDay) -> Self {
        Self {
            date: day.date,
            count: day.count,
            level: day.level().value(),
            week: position.week,
            day: position.day,
        }
    }
}

#[derive(Clone, Debug, Serialize, Deserialize, ToSchema)]
pub struct MonthLabelResponse {
    pub week: usize,
    pub name: String,
}

impl From<MonthLabel> for MonthLabelResponse {
    fn from(label: MonthLabel) -> Self {
        Self {
            week: label.week,
            name: label.name,
        }
    }
}

#[derive(Clone, Debug, Serialize, Deserialize, ToSchema)]
pub struct ContributionsResponse {
    pub user: GithubMeta,
    pub weeks: usize,
    pub month_labels: Vec<MonthLabelResponse>,
    pub days: Vec<ContributionDayResponse>,
}

impl ContributionsResponse {
    pub fn new(login: String, sequence: &ContributionSequence) -> Self {
        Self {
            user: GithubMeta::new(login),
            weeks: sequence.week_count(),
            month_labels: sequence
                .month_labels()
                .into_iter()
                .map(Into::into)
                .collect(),
            days: sequence
                .positioned()
                .map(|(position, day)| ContributionDayResponse::new(position, day))
                .collect(),
        }
    }
}

#[derive(Clone, Debug, Serialize, Deserialize, ToSchema)]
pub struct BucketResponse {
    pub name: String,
    pub contributions: u64,
}

impl BucketResponse {
    pub fn new(name: impl Into<String>, contributions: u64) -> Self {
        Self {
            name: name.into(),
            contributions,
        }
    }
}

#[derive(Clone, Debug, Serialize, Deserialize, ToSchema)]
pub struct StreakResponse {
    pub rank: usize,
    pub start: NaiveDate,
    pub end: NaiveDate,
    pub length: u32,
}

impl StreakResponse {
    pub fn ranked(streaks: Vec<Streak>) -> Vec<Self> {
        streaks
            .into_iter()
            .enumerate()
            .map(|(index, streak)| Self {
                rank: index + 1,
                start: streak.start,
                end: streak.end,
                length: streak.length,
            })
            .collect()
    }
}

#[derive(Clone, Debug, Serialize, Deserialize, ToSchema)]
pub struct StatsResponse {
    pub monthly: Vec<BucketResponse>,
    pub weekday: Vec<BucketResponse>,
    /// Only present for simulated users.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub hourly: Option<Vec<BucketResponse>>,
    pub top_streaks: Vec<StreakResponse>,
}

impl StatsResponse {
    pub fn new(sequence: &ContributionSequence, top: usize) -> Self {
        Self {
            monthly: MONTH_NAMES
                .iter()
                .zip(sequence.monthly_buckets())
                .map(|(name, total)| BucketResponse::new(*name, total))
                .collect(),
            weekday: DayOfWeek::iter()
                .zip(sequence.weekday_buckets())
                .map(|(day, total)| BucketResponse::new(day.short_name(), total))
                .collect(),
            hourly: None,
            top_streaks: StreakResponse::ranked(sequence.top_streaks(top)),
        }
    }

    pub fn with_activity(mut self, activity: &ActivityBreakdown) -> Self {
        self.hourly = Some(
            activity
                .hourly
                .iter()
                .map(|bucket| BucketResponse::new(bucket.label(), u64::from(bucket.contributions)))
                .collect(),
        );
        self
    }
}

#[derive(Clone, Debug, Serialize, Deserialize, ToSchema)]
pub struct PeriodTotalResponse {
    pub period: String,
    pub start: Option<NaiveDate>,
    pub contributions: u64,
}

impl From<PeriodTotal> for PeriodTotalResponse {
    fn from(total: PeriodTotal) -> Self {
        Self {
            period: total.period,
            start: total.start,
            contributions: total.contributions,
        }
    }
}

#[derive(Clone, Debug, Serialize, Deserialize, ToSchema)]
pub struct TypeShareResponse {
    pub name: String,
    pub value: u32,
    pub percentage: u32,
    pub color: String,
}

#[derive(Clone, Debug, Serialize, Deserialize, ToSchema)]
pub struct LanguageResponse {
    pub name: String,
    pub percentage: u32,
    pub color: String,
}

#[derive(Clone, Debug, Serialize, Deserialize, ToSchema)]
pub struct RepositoryResponse {
    pub total_repos: u32,
    pub stars_received: u32,
    pub forks_received: u32,
    pub top_languages: Vec<LanguageResponse>,
}

#[derive(Clone, Debug, Serialize, Deserialize, ToSchema)]
pub struct ActivityResponse {
    pub user: GithubMeta,
    pub types: Vec<TypeShareResponse>,
    pub repository: RepositoryResponse,
}

impl ActivityResponse {
    pub fn new(login: String, activity: ActivityBreakdown) -> Self {
        let percentages = shared::percentages(&activity.types);
        let types = activity
            .types
            .iter()
            .zip(percentages)
            .map(|(share, percentage)| TypeShareResponse {
                name: share.kind.to_string(),
                value: share.value,
                percentage,
                color: share.kind.color().to_string(),
            })
            .collect();
        let repository = activity.repository;

        Self {
            user: GithubMeta::new(login),
            types,
            repository: RepositoryResponse {
                total_repos: repository.total_repos,
                stars_received: repository.stars_received,
                forks_received: repository.forks_received,
                top_languages: repository
                    .top_languages
                    .into_iter()
                    .map(|language| LanguageResponse {
                        name: language.name,
                        percentage: language.percentage,
                        color: language.color,
                    })
                    .collect(),
            },
        }
    }
}

#[derive(Clone, Debug, Serialize, Deserialize, ToSchema)]
pub struct ContributionDayRequest {
    pub date: NaiveDate,
    pub count: u32,
}

#[derive(Clone, Debug, Serialize, Deserialize, ToSchema)]
pub struct SequenceReportResponse {
    pub window: Option<WindowResponse>,
    pub summary: UserSummaryResponse,
    pub stats: StatsResponse,
}

impl SequenceReportResponse {
    pub fn new(sequence: &ContributionSequence, top: usize) -> Self {
        Self {
            window: WindowResponse::new(sequence),
            summary: sequence.summary().into(),
            stats: StatsResponse::new(sequence, top),
        }
    }
}
