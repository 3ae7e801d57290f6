//! Tryout sheet generation: fetch, lay out, render.

use tracing::{error, info};

use crate::access::RequestContext;
use crate::error::{LeagueError, Result};
use crate::models::SeasonConfig;
use crate::pdf::{render_week1, render_week2, RenderedPdf};
use crate::utils::slugify;
use crate::League;

/// A rendered sheet ready to send as an attachment.
#[derive(Debug, Clone)]
pub struct TryoutSheet {
    pub filename: String,
    pub pdf: RenderedPdf,
}

/// e.g. "fall-2025-week1-tryouts.pdf"
pub fn sheet_filename(season: &SeasonConfig, week: u8) -> String {
    let code = match slugify(&season.code) {
        code if code.is_empty() => slugify(&season.name),
        code => code,
    };
    format!("{}-{}-week{}-tryouts.pdf", code, season.year, week)
}

/// Run a synchronous render on the blocking pool.
async fn render_blocking<F>(render: F) -> Result<RenderedPdf>
where
    F: FnOnce() -> Result<RenderedPdf> + Send + 'static,
{
    tokio::task::spawn_blocking(render).await.map_err(|e| {
        error!(error = %e, "PDF render task failed");
        LeagueError::Pdf(e.to_string())
    })?
}

impl League {
    pub async fn week1_tryout_sheet(&self, ctx: &RequestContext) -> Result<TryoutSheet> {
        ctx.require_evaluator()?;
        let season = ctx.season()?.clone();

        let rows = self.week1_roster_rows(season.id).await?;
        if rows.is_empty() {
            return Err(LeagueError::not_found(format!(
                "No week 1 roster has been set for {}",
                season.display_name()
            )));
        }

        let filename = sheet_filename(&season, 1);
        let row_count = rows.len();
        let pdf = render_blocking(move || render_week1(&season, &rows)).await?;
        info!(filename = %filename, rows = row_count, pages = pdf.page_count, "Rendered week 1 tryout sheet");
        Ok(TryoutSheet { filename, pdf })
    }

    pub async fn week2_tryout_sheet(&self, ctx: &RequestContext) -> Result<TryoutSheet> {
        ctx.require_evaluator()?;
        let season = ctx.season()?.clone();

        let (rows, divisions) = futures::try_join!(
            self.week2_roster_rows(season.id),
            self.list_divisions(season.id),
        )?;
        if rows.is_empty() {
            return Err(LeagueError::not_found(format!(
                "No week 2 roster has been set for {}",
                season.display_name()
            )));
        }

        let filename = sheet_filename(&season, 2);
        let row_count = rows.len();
        let pdf = render_blocking(move || render_week2(&season, &rows, &divisions)).await?;
        info!(filename = %filename, rows = row_count, pages = pdf.page_count, "Rendered week 2 tryout sheet");
        Ok(TryoutSheet { filename, pdf })
    }
}
