//! Week 2 sheet: per-session pages with up to three division bands, each
//! holding two provisional teams side by side. Teams too long for a band
//! continue on the next page.

use printpdf::Op;
use tracing::debug;

use super::canvas::Canvas;
use super::grouping::{
    group_week2, paginate_week2, row_height, TeamRoster, Week2Page, DIVISIONS_PER_PAGE,
    WEEK2_MAX_ROW_HEIGHT, WEEK2_MIN_ROW_HEIGHT,
};
use super::layout::{resolve_columns, Column, TableStyle, WEEK2_COLUMNS};
use super::metrics::Font;
use super::table::{draw_header, draw_rows};
use super::{
    assemble, draw_footer, draw_title, session_label, sheet_date, sheet_title, RenderedPdf, BLACK,
    CONTENT_WIDTH, MARGIN, MUTED_TEXT, PAGE_HEIGHT, PLACEHOLDER, TITLE_BLOCK,
};
use crate::error::Result;
use crate::models::{Division, RosterRow, SeasonConfig};

pub const WEEK2_STYLE: TableStyle = TableStyle {
    header_size: 7.0,
    body_size: 7.5,
    min_fit_size: 5.0,
    padding: 4.0,
    header_height: 12.0,
};

/// Space between the two team tables of a matchup.
const GUTTER: f32 = 18.0;
const BAND_TITLE_HEIGHT: f32 = 16.0;
const BAND_GAP: f32 = 6.0;
const BAND_TITLE_SIZE: f32 = 10.0;

fn team_table_width() -> f32 {
    (CONTENT_WIDTH - GUTTER) / 2.0
}

fn band_height() -> f32 {
    (PAGE_HEIGHT - MARGIN - (MARGIN + TITLE_BLOCK)) / DIVISIONS_PER_PAGE as f32
}

/// Vertical space for rows inside one band.
fn band_rows_available() -> f32 {
    band_height() - BAND_TITLE_HEIGHT - WEEK2_STYLE.header_height - BAND_GAP
}

fn subtitle(season: &SeasonConfig, page: &Week2Page) -> String {
    let divisions: Vec<&str> = page
        .matchups
        .iter()
        .map(|m| m.division_name.as_str())
        .collect();
    let mut parts = vec![session_label(season, page.session), divisions.join(", ")];
    if let Some(date) = sheet_date(season.week2_date.as_deref()) {
        parts.push(date);
    }
    let mut subtitle = parts.join("  |  ");
    if page.part > 0 {
        subtitle.push_str("  (continued)");
    }
    subtitle
}

/// Vertical placement shared by both tables of a band.
struct Band {
    top: f32,
    row_height: f32,
    continued: bool,
}

fn draw_team(canvas: &mut Canvas, columns: &[Column], division: &str, team: &TeamRoster, x: f32, band: &Band) {
    let Band {
        top,
        row_height: height,
        continued,
    } = *band;
    canvas.set_fill_color(&BLACK);
    canvas.text(
        &format!("{} - Team {}", division, team.team),
        Font::Bold,
        BAND_TITLE_SIZE,
        x,
        top + BAND_TITLE_SIZE,
    );
    let table_top = top + BAND_TITLE_HEIGHT;
    let header = draw_header(canvas, columns, x, table_top, &WEEK2_STYLE);
    let rows_top = table_top + header;

    if team.rows.is_empty() {
        if !continued {
            canvas.set_fill_color(&MUTED_TEXT);
            canvas.text(PLACEHOLDER, Font::Regular, WEEK2_STYLE.body_size, x + 4.0, rows_top + 12.0);
        }
        return;
    }
    draw_rows(canvas, columns, &team.rows, x, rows_top, height, &WEEK2_STYLE);
}

fn page_ops(season: &SeasonConfig, page: &Week2Page, columns: &[Column], number: usize, total: usize) -> Vec<Op> {
    let available = band_rows_available();
    let height = row_height(
        page.max_team_rows(),
        available,
        WEEK2_MIN_ROW_HEIGHT,
        WEEK2_MAX_ROW_HEIGHT,
    );

    let mut canvas = Canvas::new(PAGE_HEIGHT);
    let top = draw_title(&mut canvas, &sheet_title(season, 2), &subtitle(season, page));
    let right_x = MARGIN + team_table_width() + GUTTER;

    for (band, matchup) in page.matchups.iter().enumerate() {
        let band = Band {
            top: top + band as f32 * band_height(),
            row_height: height,
            continued: page.part > 0,
        };
        draw_team(&mut canvas, columns, &matchup.division_name, &matchup.left, MARGIN, &band);
        draw_team(&mut canvas, columns, &matchup.division_name, &matchup.right, right_x, &band);
    }
    draw_footer(&mut canvas, number, total);
    canvas.into_ops()
}

/// Lay out every page of the week 2 sheet as drawing operations.
pub fn week2_pages(season: &SeasonConfig, rows: &[RosterRow], divisions: &[Division]) -> Vec<Vec<Op>> {
    let pages = paginate_week2(group_week2(rows, divisions), band_rows_available());
    let columns = resolve_columns(&WEEK2_COLUMNS, rows, team_table_width(), &WEEK2_STYLE);
    debug!(rows = rows.len(), pages = pages.len(), "Laid out week 2 sheet");

    let total = pages.len();
    pages
        .iter()
        .enumerate()
        .map(|(i, page)| page_ops(season, page, &columns, i + 1, total))
        .collect()
}

pub fn render_week2(season: &SeasonConfig, rows: &[RosterRow], divisions: &[Division]) -> Result<RenderedPdf> {
    let title = sheet_title(season, 2);
    assemble(&title, week2_pages(season, rows, divisions))
}
