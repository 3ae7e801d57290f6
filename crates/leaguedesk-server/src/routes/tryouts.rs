use axum::extract::State;
use axum::http::header;
use axum::response::{IntoResponse, Response};

use leaguedesk_core::tryouts::TryoutSheet;

use crate::error::ApiResult;
use crate::state::{AppState, Ctx};

/// Serve a sheet as a PDF download.
fn attachment(sheet: TryoutSheet) -> Response {
    (
        [
            (header::CONTENT_TYPE, "application/pdf".to_string()),
            (
                header::CONTENT_DISPOSITION,
                format!("attachment; filename=\"{}\"", sheet.filename),
            ),
        ],
        sheet.pdf.bytes,
    )
        .into_response()
}

pub async fn week1_pdf(State(state): State<AppState>, Ctx(ctx): Ctx) -> ApiResult<Response> {
    let sheet = state.league.week1_tryout_sheet(&ctx).await?;
    Ok(attachment(sheet))
}

pub async fn week2_pdf(State(state): State<AppState>, Ctx(ctx): Ctx) -> ApiResult<Response> {
    let sheet = state.league.week2_tryout_sheet(&ctx).await?;
    Ok(attachment(sheet))
}
