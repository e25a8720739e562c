use std::sync::Arc;

use rocket::{
    fairing::AdHoc,
    form::{FromFormField, ValueField},
};
use shared::{ContributionSequence, GithubHandle, Window};
use utoipa::OpenApi;
use utoipa_swagger_ui::SwaggerUi;

use crate::{
    consts::{DEFAULT_TOP_STREAKS, MAX_TOP_STREAKS, MAX_WINDOW_DAYS},
    svg::{Mode, View},
    types::*,
    Config, ContributionSource,
};

pub mod statistics;
pub mod user;

#[derive(OpenApi)]
#[openapi(
    paths(
        user::get_user,
        user::get_user_contributions,
        user::get_user_stats,
        user::get_user_periods,
        user::get_user_activity,
        user::get_heatmap_svg,
        user::get_heatmap_png,
        statistics::post_summary,
    ),
    components(schemas(
        Profile,
        Mode,
        View,
        ErrorResponse,
        GithubMeta,
        WindowResponse,
        StreaksResponse,
        UserSummaryResponse,
        UserProfileResponse,
        ContributionDayResponse,
        MonthLabelResponse,
        ContributionsResponse,
        BucketResponse,
        StreakResponse,
        StatsResponse,
        PeriodTotalResponse,
        TypeShareResponse,
        LanguageResponse,
        RepositoryResponse,
        ActivityResponse,
        ContributionDayRequest,
        SequenceReportResponse,
    )),
    tags((name = "Contribution dashboard", description = "Simulated GitHub contribution analytics"))
)]
pub struct ApiDoc;

/// Parses an optional query value with the field's own form rules. Rocket's
/// `Option<T>` guard turns a malformed value into `None`; this reports it.
pub(crate) fn parse_query<'v, T: FromFormField<'v>>(
    name: &str,
    raw: Option<&'v str>,
) -> shared::Result<Option<T>> {
    raw.map(|value| {
        T::from_value(ValueField::from_value(value)).map_err(|errors| {
            shared::Error::invalid(format!("invalid `{name}` value `{value}`: {errors}"))
        })
    })
    .transpose()
}

/// Window and profile selection shared by every per-user endpoint.
pub(crate) struct WindowQuery {
    days: Option<u32>,
    year_to_date: bool,
    profile: Option<Profile>,
}

impl WindowQuery {
    pub fn parse(
        days: Option<&str>,
        year_to_date: Option<&str>,
        profile: Option<&str>,
    ) -> shared::Result<Self> {
        let days = parse_query::<u32>("days", days)?;
        let year_to_date = parse_query::<bool>("year_to_date", year_to_date)?.unwrap_or_default();
        if year_to_date && days.is_some() {
            return Err(shared::Error::invalid(
                "`days` cannot be combined with `year_to_date`",
            ));
        }

        Ok(Self {
            days,
            year_to_date,
            profile: parse_query("profile", profile)?,
        })
    }

    fn window(&self, config: &Config) -> shared::Result<Window> {
        if self.year_to_date {
            return Ok(Window::YearToDate);
        }
        let days = self.days.unwrap_or(config.window_days);
        if days > MAX_WINDOW_DAYS {
            return Err(shared::Error::invalid(format!(
                "window of {days} days exceeds the maximum of {MAX_WINDOW_DAYS}"
            )));
        }
        Ok(Window::TrailingDays(days))
    }

    pub async fn load(
        &self,
        username: &str,
        source: &Arc<dyn ContributionSource>,
        config: &Config,
    ) -> Result<(GithubHandle, ContributionSequence), ApiError> {
        let login = shared::github::validate_handle(username)?;
        let window = self.window(config)?;
        let sequence = source
            .contributions(&login, window, self.profile.map(Into::into))
            .await?;
        Ok((login, sequence))
    }
}

pub(crate) fn parse_top(top: Option<&str>) -> shared::Result<usize> {
    let top = parse_query("top", top)?.unwrap_or(DEFAULT_TOP_STREAKS);
    if top > MAX_TOP_STREAKS {
        return Err(shared::Error::invalid(format!(
            "at most {MAX_TOP_STREAKS} streaks can be requested"
        )));
    }
    Ok(top)
}

pub fn stage() -> AdHoc {
    AdHoc::on_ignite("Installing entrypoints", |rocket| async {
        rocket
            .attach(user::stage())
            .attach(statistics::stage())
            .mount(
                "/",
                SwaggerUi::new("/swagger-ui/<_..>").url("/api-docs/openapi.json", ApiDoc::openapi()),
            )
    })
}

#[cfg(test)]
mod tests {
    use chrono::NaiveDate;
    use rocket::{
        http::{ContentType, Status},
        local::blocking::Client,
    };
    use serde_json::{json, Value};
    use usvg::fontdb;

    use super::*;
    use crate::MockSource;

    fn client() -> Client {
        let config = Config {
            seed: Some(7),
            ..Default::default()
        };
        let end = NaiveDate::from_ymd_opt(2024, 10, 18).unwrap();
        let source: Arc<dyn ContributionSource> =
            Arc::new(MockSource::from_config(&config).with_end_date(end));
        let rocket = crate::build_with(config, source, Arc::new(fontdb::Database::new())).unwrap();
        Client::tracked(rocket).unwrap()
    }

    fn get_json(client: &Client, uri: &str) -> (Status, Value) {
        let response = client.get(uri).dispatch();
        let status = response.status();
        (status, response.into_json().unwrap_or(Value::Null))
    }

    #[test]
    fn user_profile_covers_the_default_window() {
        let client = client();
        let (status, body) = get_json(&client, "/api/users/octocat");

        assert_eq!(status, Status::Ok);
        assert_eq!(body["user"]["login"], "octocat");
        assert_eq!(body["user"]["profile"], "https://github.com/octocat");
        assert_eq!(body["window"]["days"], 365);
        assert_eq!(body["window"]["end"], "2024-10-18");
        let streaks = &body["summary"]["streaks"];
        assert!(streaks["longest"].as_u64() >= streaks["current"].as_u64());
    }

    #[test]
    fn seeded_profile_is_repeatable() {
        let client = client();
        let (_, first) = get_json(&client, "/api/users/octocat?days=90&profile=weighted");
        let (_, again) = get_json(&client, "/api/users/octocat?days=90&profile=weighted");
        assert_eq!(first, again);
    }

    #[test]
    fn year_to_date_starts_on_january_first() {
        let client = client();
        let (status, body) = get_json(&client, "/api/users/octocat?year_to_date=true");

        assert_eq!(status, Status::Ok);
        assert_eq!(body["window"]["start"], "2024-01-01");
        assert_eq!(body["window"]["days"], 292);
    }

    #[test]
    fn invalid_requests_are_rejected() {
        let client = client();
        for uri in [
            "/api/users/bad--name",
            "/api/users/octocat?days=0",
            "/api/users/octocat?days=5000",
            "/api/users/octocat/stats?top=1000",
            "/api/users/octocat/periods/decade",
            "/api/users/octocat?days=-5",
            "/api/users/octocat?days=abc",
            "/api/users/octocat?profile=bursty",
            "/api/users/octocat?year_to_date=maybe",
            "/api/users/octocat?year_to_date=true&days=30",
            "/api/users/octocat/stats?top=-1",
            "/api/users/octocat/heatmap?mode=blue",
            "/api/users/octocat/heatmap?view=cube",
            "/api/users/octocat/heatmap.png?mode=blue",
        ] {
            let (status, body) = get_json(&client, uri);
            assert_eq!(status, Status::BadRequest, "{uri}");
            assert!(body["error"].is_string(), "{uri}");
        }
    }

    #[test]
    fn contributions_are_laid_out_on_the_grid() {
        let client = client();
        let (status, body) = get_json(&client, "/api/users/octocat/contributions?days=30");

        assert_eq!(status, Status::Ok);
        let days = body["days"].as_array().unwrap();
        assert_eq!(days.len(), 30);
        assert_eq!(body["weeks"], 5);
        assert_eq!(days[8]["week"], 1);
        assert_eq!(days[8]["day"], 1);
        assert_eq!(days[29]["date"], "2024-10-18");
        assert_eq!(body["month_labels"][0]["name"], "Sep");
    }

    #[test]
    fn stats_include_every_breakdown() {
        let client = client();
        let (status, body) = get_json(&client, "/api/users/octocat/stats?top=3");

        assert_eq!(status, Status::Ok);
        assert_eq!(body["monthly"].as_array().unwrap().len(), 12);
        assert_eq!(body["weekday"].as_array().unwrap().len(), 7);
        assert_eq!(body["hourly"].as_array().unwrap().len(), 24);
        assert_eq!(body["weekday"][0]["name"], "Sun");
        let streaks = body["top_streaks"].as_array().unwrap();
        assert!(streaks.len() <= 3);
        if let Some(first) = streaks.first() {
            assert_eq!(first["rank"], 1);
        }
    }

    #[test]
    fn periods_are_keyed_by_period() {
        let client = client();
        let (status, body) = get_json(&client, "/api/users/octocat/periods/year?days=365");

        assert_eq!(status, Status::Ok);
        let periods = body.as_array().unwrap();
        assert_eq!(periods.len(), 2);
        assert_eq!(periods[0]["period"], "2023");
        assert_eq!(periods[1]["start"], "2024-01-01");
    }

    #[test]
    fn activity_percentages_cover_every_type() {
        let client = client();
        let (status, body) = get_json(&client, "/api/users/octocat/activity");

        assert_eq!(status, Status::Ok);
        let types = body["types"].as_array().unwrap();
        assert_eq!(types.len(), 5);
        assert!(types.iter().all(|share| share["color"].is_string()));
        assert_eq!(body["repository"]["top_languages"].as_array().unwrap().len(), 5);
    }

    #[test]
    fn heatmaps_are_served_uncached() {
        let client = client();

        let response = client
            .get("/api/users/octocat/heatmap?days=60&mode=dark&view=isometric")
            .dispatch();
        assert_eq!(response.status(), Status::Ok);
        assert_eq!(response.content_type(), Some(ContentType::SVG));
        assert_eq!(response.headers().get_one("Cache-Control"), Some("no-cache"));
        assert!(response.into_string().unwrap().starts_with("<svg"));

        let response = client.get("/api/users/octocat/heatmap.png?days=60").dispatch();
        assert_eq!(response.status(), Status::Ok);
        assert_eq!(response.content_type(), Some(ContentType::PNG));
        assert!(response.into_bytes().unwrap().starts_with(b"\x89PNG"));
    }

    #[test]
    fn summary_of_a_supplied_sequence() {
        let client = client();
        let days: Vec<Value> = [0, 1, 0, 3, 4, 5, 0]
            .into_iter()
            .enumerate()
            .map(|(offset, count)| json!({ "date": format!("2024-03-{}", 17 + offset), "count": count }))
            .collect();

        let response = client.post("/api/summary").json(&days).dispatch();
        assert_eq!(response.status(), Status::Ok);
        let body: Value = response.into_json().unwrap();
        assert_eq!(body["summary"]["total_contributions"], 13);
        assert_eq!(body["summary"]["most_active_day"], "Friday");
        assert_eq!(body["summary"]["average_daily"], 1.9);
        assert_eq!(body["summary"]["streaks"]["current"], 0);
        assert_eq!(body["summary"]["streaks"]["longest"], 3);
        assert_eq!(body["stats"]["top_streaks"][0]["start"], "2024-03-20");
    }

    #[test]
    fn summary_rejects_gaps() {
        let client = client();
        let days = json!([
            { "date": "2024-03-17", "count": 1 },
            { "date": "2024-03-19", "count": 1 },
        ]);
        let response = client.post("/api/summary").json(&days).dispatch();
        assert_eq!(response.status(), Status::BadRequest);
    }

    #[test]
    fn summary_rejects_malformed_days_as_json() {
        let client = client();
        for days in [
            json!([{ "date": "2024-13-45", "count": 1 }]),
            json!([{ "date": "2024-03-17", "count": -1 }]),
            json!({ "date": "2024-03-17" }),
        ] {
            let response = client.post("/api/summary").json(&days).dispatch();
            assert_eq!(response.status(), Status::BadRequest, "{days}");
            assert_eq!(response.content_type(), Some(ContentType::JSON));
            let body: Value = response.into_json().unwrap();
            assert!(body["error"].is_string(), "{days}");
        }

        let response = client.post("/api/summary?top=lots").json(&json!([])).dispatch();
        assert_eq!(response.status(), Status::BadRequest);
    }

    #[test]
    fn empty_summary_uses_defaults() {
        let client = client();
        let response = client.post("/api/summary").json(&json!([])).dispatch();
        assert_eq!(response.status(), Status::Ok);
        let body: Value = response.into_json().unwrap();
        assert!(body["window"].is_null());
        assert_eq!(body["summary"]["most_active_day"], "Sunday");
        assert_eq!(body["summary"]["average_daily"], 0.0);
    }

    #[test]
    fn docs_and_metrics_are_mounted() {
        let client = client();
        let (status, body) = get_json(&client, "/api-docs/openapi.json");
        assert_eq!(status, Status::Ok);
        assert!(body["paths"]["/api/users/{username}"].is_object());

        let response = client.get("/metrics").dispatch();
        assert_eq!(response.status(), Status::Ok);
    }
}
