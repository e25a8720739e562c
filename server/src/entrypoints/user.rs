use std::sync::Arc;

use rocket::{
    http::{ContentType, Header},
    response::{self, Responder},
    serde::json::Json,
    Request, Response, State,
};
use shared::TimePeriod;
use tracing::instrument;
use usvg::fontdb;

use super::{parse_query, parse_top, WindowQuery};
use crate::{
    svg::{self, Mode, View},
    types::{
        ActivityResponse, ApiError, ContributionsResponse, ErrorResponse, GithubMeta,
        PeriodTotalResponse, StatsResponse, UserProfileResponse, WindowResponse,
    },
    Config, ContributionSource,
};

pub struct Image {
    body: Vec<u8>,
    content_type: ContentType,
}

impl Image {
    pub fn svg(svg: String) -> Self {
        Self {
            body: svg.into_bytes(),
            content_type: ContentType::SVG,
        }
    }

    pub fn png(png: Vec<u8>) -> Self {
        Self {
            body: png,
            content_type: ContentType::PNG,
        }
    }
}

impl<'r> Responder<'r, 'static> for Image {
    fn respond_to(self, _req: &'r Request<'_>) -> response::Result<'static> {
        let expiration = chrono::Utc::now();

        Response::build()
            .header(Header::new("Cache-Control", "no-cache"))
            .header(Header::new("Pragma", "no-cache"))
            .header(Header::new("Expires", expiration.to_rfc2822()))
            .header(self.content_type)
            .sized_body(self.body.len(), std::io::Cursor::new(self.body))
            .ok()
    }
}

/// Window is the trailing `days` (default 365) or, with `year_to_date`, January 1
/// through today. Passing both is rejected.
#[utoipa::path(context_path = "/api/users", responses(
    (status = 200, description = "Get user profile and summary", body = UserProfileResponse),
    (status = 400, description = "Invalid username or window", body = ErrorResponse)
))]
#[get("/<username>?<days>&<year_to_date>&<profile>")]
#[instrument(skip(source, config))]
async fn get_user(
    username: &str,
    days: Option<&str>,
    year_to_date: Option<&str>,
    profile: Option<&str>,
    source: &State<Arc<dyn ContributionSource>>,
    config: &State<Config>,
) -> Result<Json<UserProfileResponse>, ApiError> {
    let query = WindowQuery::parse(days, year_to_date, profile)?;
    let (login, sequence) = query.load(username, source, config).await?;

    Ok(Json(UserProfileResponse {
        window: WindowResponse::new(&sequence),
        summary: sequence.summary().into(),
        user: GithubMeta::new(login),
    }))
}

#[utoipa::path(context_path = "/api/users", responses(
    (status = 200, description = "Get daily contributions laid out on the heatmap grid", body = ContributionsResponse),
    (status = 400, description = "Invalid username or window", body = ErrorResponse)
))]
#[get("/<username>/contributions?<days>&<year_to_date>&<profile>")]
async fn get_user_contributions(
    username: &str,
    days: Option<&str>,
    year_to_date: Option<&str>,
    profile: Option<&str>,
    source: &State<Arc<dyn ContributionSource>>,
    config: &State<Config>,
) -> Result<Json<ContributionsResponse>, ApiError> {
    let query = WindowQuery::parse(days, year_to_date, profile)?;
    let (login, sequence) = query.load(username, source, config).await?;

    Ok(Json(ContributionsResponse::new(login, &sequence)))
}

#[utoipa::path(context_path = "/api/users", responses(
    (status = 200, description = "Get monthly, weekday and hourly breakdowns with top streaks", body = StatsResponse),
    (status = 400, description = "Invalid username, window or streak count", body = ErrorResponse)
))]
#[get("/<username>/stats?<days>&<year_to_date>&<profile>&<top>")]
async fn get_user_stats(
    username: &str,
    days: Option<&str>,
    year_to_date: Option<&str>,
    profile: Option<&str>,
    top: Option<&str>,
    source: &State<Arc<dyn ContributionSource>>,
    config: &State<Config>,
) -> Result<Json<StatsResponse>, ApiError> {
    let top = parse_top(top)?;
    let query = WindowQuery::parse(days, year_to_date, profile)?;
    let (login, sequence) = query.load(username, source, config).await?;
    let activity = source.activity(&login).await?;

    Ok(Json(
        StatsResponse::new(&sequence, top).with_activity(&activity),
    ))
}

#[utoipa::path(context_path = "/api/users", responses(
    (status = 200, description = "Get contribution totals per period", body = [PeriodTotalResponse]),
    (status = 400, description = "Invalid username, window or period", body = ErrorResponse)
))]
#[get("/<username>/periods/<period>?<days>&<year_to_date>&<profile>")]
async fn get_user_periods(
    username: &str,
    period: &str,
    days: Option<&str>,
    year_to_date: Option<&str>,
    profile: Option<&str>,
    source: &State<Arc<dyn ContributionSource>>,
    config: &State<Config>,
) -> Result<Json<Vec<PeriodTotalResponse>>, ApiError> {
    let period: TimePeriod = period
        .parse()
        .map_err(|_| shared::Error::invalid(format!("unknown period `{period}`")))?;
    let query = WindowQuery::parse(days, year_to_date, profile)?;
    let (_, sequence) = query.load(username, source, config).await?;

    Ok(Json(
        sequence
            .totals_by_period(period)
            .into_iter()
            .map(Into::into)
            .collect(),
    ))
}

#[utoipa::path(context_path = "/api/users", responses(
    (status = 200, description = "Get contribution types and repository statistics", body = ActivityResponse),
    (status = 400, description = "Invalid username", body = ErrorResponse)
))]
#[get("/<username>/activity")]
async fn get_user_activity(
    username: &str,
    source: &State<Arc<dyn ContributionSource>>,
) -> Result<Json<ActivityResponse>, ApiError> {
    let login = shared::github::validate_handle(username)?;
    let activity = source.activity(&login).await?;

    Ok(Json(ActivityResponse::new(login, activity)))
}

#[utoipa::path(context_path = "/api/users", responses(
    (status = 200, description = "Render the contribution heatmap as SVG", content_type = "image/svg+xml", body = String),
    (status = 400, description = "Invalid username or window", body = ErrorResponse)
))]
#[get("/<username>/heatmap?<days>&<year_to_date>&<profile>&<mode>&<view>")]
#[allow(clippy::too_many_arguments)]
#[instrument(skip(source, config))]
async fn get_heatmap_svg(
    username: &str,
    days: Option<&str>,
    year_to_date: Option<&str>,
    profile: Option<&str>,
    mode: Option<&str>,
    view: Option<&str>,
    source: &State<Arc<dyn ContributionSource>>,
    config: &State<Config>,
) -> Result<Image, ApiError> {
    let mode: Mode = parse_query("mode", mode)?.unwrap_or_default();
    let view: View = parse_query("view", view)?.unwrap_or_default();
    let query = WindowQuery::parse(days, year_to_date, profile)?;
    let (login, sequence) = query.load(username, source, config).await?;
    let svg = svg::generate_heatmap_svg(&login, &sequence, mode, view)?;

    Ok(Image::svg(svg))
}

#[utoipa::path(context_path = "/api/users", responses(
    (status = 200, description = "Render the contribution heatmap as PNG", content_type = "image/png", body = Vec<u8>),
    (status = 400, description = "Invalid username or window", body = ErrorResponse)
))]
#[get("/<username>/heatmap.png?<days>&<year_to_date>&<profile>&<mode>&<view>")]
#[allow(clippy::too_many_arguments)]
#[instrument(skip(source, config, font))]
async fn get_heatmap_png(
    username: &str,
    days: Option<&str>,
    year_to_date: Option<&str>,
    profile: Option<&str>,
    mode: Option<&str>,
    view: Option<&str>,
    source: &State<Arc<dyn ContributionSource>>,
    config: &State<Config>,
    font: &State<Arc<fontdb::Database>>,
) -> Result<Image, ApiError> {
    let mode: Mode = parse_query("mode", mode)?.unwrap_or_default();
    let view: View = parse_query("view", view)?.unwrap_or_default();
    let query = WindowQuery::parse(days, year_to_date, profile)?;
    let (login, sequence) = query.load(username, source, config).await?;
    let svg = svg::generate_heatmap_svg(&login, &sequence, mode, view)?;

    let font = Arc::clone(font);
    let png = rocket::tokio::task::spawn_blocking(move || svg::generate_heatmap_png(&svg, font))
        .await
        .map_err(anyhow::Error::from)??;

    Ok(Image::png(png))
}

pub fn stage() -> rocket::fairing::AdHoc {
    rocket::fairing::AdHoc::on_ignite("Installing user entrypoints", |rocket| async {
        rocket.mount(
            "/api/users/",
            rocket::routes![
                get_user,
                get_user_contributions,
                get_user_stats,
                get_user_periods,
                get_user_activity,
                get_heatmap_svg,
                get_heatmap_png
            ],
        )
    })
}
