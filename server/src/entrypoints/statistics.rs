use rocket::serde::json::{self, Json};
use shared::{ContributionDay, ContributionSequence};

use super::parse_top;
use crate::types::{ApiError, ContributionDayRequest, ErrorResponse, SequenceReportResponse};

/// Summarizes a sequence supplied by the caller instead of a simulated one.
#[utoipa::path(context_path = "/api", request_body = Vec<ContributionDayRequest>, responses(
    (status = 200, description = "Summarize a caller-supplied sequence", body = SequenceReportResponse),
    (status = 400, description = "Malformed body or days that are not consecutive", body = ErrorResponse)
))]
#[post("/summary?<top>", format = "json", data = "<days>")]
async fn post_summary(
    top: Option<&str>,
    days: Result<Json<Vec<ContributionDayRequest>>, json::Error<'_>>,
) -> Result<Json<SequenceReportResponse>, ApiError> {
    let top = parse_top(top)?;
    let days = days
        .map_err(|error| ApiError::BadRequest(error.to_string()))?
        .into_inner()
        .into_iter()
        .map(|day| ContributionDay::new(day.date, day.count))
        .collect();
    let sequence = ContributionSequence::new(days)?;

    Ok(Json(SequenceReportResponse::new(&sequence, top)))
}

pub fn stage() -> rocket::fairing::AdHoc {
    rocket::fairing::AdHoc::on_ignite("Installing summary entrypoints", |rocket| async {
        rocket.mount("/api", rocket::routes![post_summary])
    })
}
