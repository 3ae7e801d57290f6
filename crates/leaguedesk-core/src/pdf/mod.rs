//! Tryout sheet layout engine.
//!
//! Turns pre-fetched roster rows into printable PDF sheets: one page per
//! week 1 session/court, and per-session pages of side-by-side team
//! matchups for week 2. Rendering is synchronous and deterministic; the
//! caller runs it off the async runtime.
//!
//! - `metrics` / `fit`: Helvetica text widths, shrinking and truncation
//! - `layout`: column widths shared by every page of a document
//! - `grouping`: rows to pages
//! - `canvas` / `table`: drawing

pub mod canvas;
pub mod fit;
pub mod grouping;
pub mod layout;
pub mod metrics;
pub mod table;
pub mod week1;
pub mod week2;

use printpdf::{Mm, Op, PdfDocument, PdfPage, PdfSaveOptions, Rgb};
use tracing::debug;

use crate::error::{LeagueError, Result};
use crate::models::SeasonConfig;
use crate::utils::format_date;
use canvas::Canvas;
use metrics::Font;

pub use week1::render_week1;
pub use week2::render_week2;

/// US Letter, landscape, in points.
pub const PAGE_WIDTH: f32 = 792.0;
pub const PAGE_HEIGHT: f32 = 612.0;
pub const MARGIN: f32 = 36.0;
pub const CONTENT_WIDTH: f32 = PAGE_WIDTH - 2.0 * MARGIN;

const MM_PER_PT: f32 = 25.4 / 72.0;

const TITLE_SIZE: f32 = 16.0;
const SUBTITLE_SIZE: f32 = 11.0;
const FOOTER_SIZE: f32 = 8.0;
/// Space taken by the title block above the first table.
const TITLE_BLOCK: f32 = 48.0;

pub const PLACEHOLDER: &str = "No players assigned";

const fn rgb(r: f32, g: f32, b: f32) -> Rgb {
    Rgb {
        r,
        g,
        b,
        icc_profile: None,
    }
}

pub static BLACK: Rgb = rgb(0.0, 0.0, 0.0);
pub static GRID_GRAY: Rgb = rgb(0.55, 0.55, 0.55);
pub static HEADER_FILL: Rgb = rgb(0.88, 0.88, 0.88);
pub static MUTED_TEXT: Rgb = rgb(0.4, 0.4, 0.4);
pub static PAIR_YELLOW: Rgb = rgb(1.0, 0.95, 0.6);
pub static SETTER_BLUE: Rgb = rgb(0.75, 0.87, 1.0);
pub static NOT_MALE_PINK: Rgb = rgb(1.0, 0.82, 0.9);
pub static NO_HISTORY_GREEN: Rgb = rgb(0.8, 0.95, 0.8);

/// A finished document.
#[derive(Debug, Clone)]
pub struct RenderedPdf {
    pub bytes: Vec<u8>,
    pub page_count: usize,
}

/// "Session 2 (7:30pm)", or just "Session 3" when the time is unknown.
pub(crate) fn session_label(season: &SeasonConfig, session: u32) -> String {
    match season.session_time(session) {
        Some(time) => format!("Session {} ({})", session, time),
        None => format!("Session {}", session),
    }
}

/// Title and subtitle lines. Returns the top of the content area.
pub(crate) fn draw_title(canvas: &mut Canvas, title: &str, subtitle: &str) -> f32 {
    canvas.set_fill_color(&BLACK);
    canvas.text(title, Font::Bold, TITLE_SIZE, MARGIN, MARGIN + TITLE_SIZE);
    let subtitle = fit::truncate_to_fit(subtitle, Font::Regular, SUBTITLE_SIZE, CONTENT_WIDTH);
    canvas.text(&subtitle, Font::Regular, SUBTITLE_SIZE, MARGIN, MARGIN + TITLE_SIZE + 18.0);
    MARGIN + TITLE_BLOCK
}

pub(crate) fn draw_footer(canvas: &mut Canvas, page: usize, total: usize) {
    canvas.set_fill_color(&MUTED_TEXT);
    canvas.text(
        &format!("Page {} of {}", page, total),
        Font::Regular,
        FOOTER_SIZE,
        MARGIN,
        PAGE_HEIGHT - MARGIN / 2.0,
    );
}

/// Title line shared by both weeks, e.g. "Fall 2025 Tryouts - Week 1".
pub(crate) fn sheet_title(season: &SeasonConfig, week: u8) -> String {
    format!("{} Tryouts - Week {}", season.display_name(), week)
}

pub(crate) fn sheet_date(date: Option<&str>) -> Option<String> {
    date.map(str::trim).filter(|d| !d.is_empty()).map(format_date)
}

/// Bundle page operations into a PDF.
pub(crate) fn assemble(title: &str, pages: Vec<Vec<Op>>) -> Result<RenderedPdf> {
    let page_count = pages.len();
    let pdf_pages: Vec<PdfPage> = pages
        .into_iter()
        .map(|ops| PdfPage::new(Mm(PAGE_WIDTH * MM_PER_PT), Mm(PAGE_HEIGHT * MM_PER_PT), ops))
        .collect();

    let mut doc = PdfDocument::new(title);
    doc.with_pages(pdf_pages);
    let mut warnings = Vec::new();
    let bytes = doc.save(&PdfSaveOptions::default(), &mut warnings);
    if !warnings.is_empty() {
        debug!(count = warnings.len(), "PDF writer reported warnings");
    }
    if bytes.is_empty() {
        return Err(LeagueError::Pdf("renderer produced an empty document".to_string()));
    }
    Ok(RenderedPdf { bytes, page_count })
}
