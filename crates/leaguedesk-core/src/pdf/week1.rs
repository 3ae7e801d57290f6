//! Week 1 sheet: one page per session and court.

use printpdf::Op;
use tracing::debug;

use super::canvas::Canvas;
use super::grouping::{group_week1, paginate_week1, Week1Page};
use super::layout::{resolve_columns, Column, TableStyle, WEEK1_COLUMNS};
use super::metrics::Font;
use super::table::{draw_header, draw_rows};
use super::{
    assemble, draw_footer, draw_title, session_label, sheet_date, sheet_title, RenderedPdf,
    CONTENT_WIDTH, MARGIN, MUTED_TEXT, PAGE_HEIGHT, PLACEHOLDER, TITLE_BLOCK,
};
use crate::error::Result;
use crate::models::{RosterRow, SeasonConfig};

pub const WEEK1_STYLE: TableStyle = TableStyle {
    header_size: 9.0,
    body_size: 10.0,
    min_fit_size: 6.0,
    padding: 8.0,
    header_height: 18.0,
};

/// Vertical space for rows below the title block and the table header.
fn rows_available() -> f32 {
    PAGE_HEIGHT - MARGIN - (MARGIN + TITLE_BLOCK) - WEEK1_STYLE.header_height
}

fn subtitle(season: &SeasonConfig, page: &Week1Page) -> String {
    let mut parts = vec![
        session_label(season, page.key.session),
        format!("Court {}", page.key.court),
    ];
    if let Some(date) = sheet_date(season.week1_date.as_deref()) {
        parts.push(date);
    }
    let mut subtitle = parts.join("  |  ");
    if page.part > 0 {
        subtitle.push_str("  (continued)");
    }
    subtitle
}

fn page_ops(
    season: &SeasonConfig,
    page: &Week1Page,
    columns: &[Column],
    row_height: f32,
    number: usize,
    total: usize,
) -> Vec<Op> {
    let mut canvas = Canvas::new(PAGE_HEIGHT);
    let top = draw_title(&mut canvas, &sheet_title(season, 1), &subtitle(season, page));
    let header = draw_header(&mut canvas, columns, MARGIN, top, &WEEK1_STYLE);

    if page.rows.is_empty() {
        canvas.set_fill_color(&MUTED_TEXT);
        canvas.text(PLACEHOLDER, Font::Regular, 12.0, MARGIN + 8.0, top + header + 28.0);
    } else {
        draw_rows(
            &mut canvas,
            columns,
            &page.rows,
            MARGIN,
            top + header,
            row_height,
            &WEEK1_STYLE,
        );
    }
    draw_footer(&mut canvas, number, total);
    canvas.into_ops()
}

/// Lay out every page of the week 1 sheet as drawing operations.
pub fn week1_pages(season: &SeasonConfig, rows: &[RosterRow]) -> Vec<Vec<Op>> {
    let groups = group_week1(rows, season.session_count(), season.court_count());
    let (row_height, pages) = paginate_week1(&groups, rows_available());
    let columns = resolve_columns(&WEEK1_COLUMNS, rows, CONTENT_WIDTH, &WEEK1_STYLE);
    debug!(
        rows = rows.len(),
        pages = pages.len(),
        row_height,
        "Laid out week 1 sheet"
    );

    let total = pages.len();
    pages
        .iter()
        .enumerate()
        .map(|(i, page)| page_ops(season, page, &columns, row_height, i + 1, total))
        .collect()
}

pub fn render_week1(season: &SeasonConfig, rows: &[RosterRow]) -> Result<RenderedPdf> {
    let title = sheet_title(season, 1);
    assemble(&title, week1_pages(season, rows))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::roster::week1_row;
    use crate::models::season::sample_season;

    fn forty_rows_missing_one_court() -> Vec<RosterRow> {
        let occupied: Vec<(u32, u32)> = (1..=2)
            .flat_map(|s| (1..=4).map(move |c| (s, c)))
            .filter(|&slot| slot != (1, 4))
            .collect();
        (0..40)
            .map(|i| {
                let (session, court) = occupied[i % occupied.len()];
                week1_row(i as i64, session, court, &format!("Player {}", i))
            })
            .collect()
    }

    #[test]
    fn test_missing_court_renders_placeholder_page() {
        let season = sample_season();
        let pages = week1_pages(&season, &forty_rows_missing_one_court());
        assert_eq!(pages.len(), 8);

        // Slot order: session 1 courts 1-4, then session 2
        let empty = format!("{:?}", pages[3]);
        assert!(empty.contains(PLACEHOLDER));
        assert!(empty.contains("Court 4"));
        assert!(!format!("{:?}", pages[0]).contains(PLACEHOLDER));
    }

    #[test]
    fn test_header_carries_session_time_and_date() {
        let season = sample_season();
        let pages = week1_pages(&season, &forty_rows_missing_one_court());
        let first = format!("{:?}", pages[4]);
        assert!(first.contains("Fall 2025 Tryouts - Week 1"));
        assert!(first.contains("Session 2 (7:30pm)"));
        assert!(first.contains("Sat, Sep 6, 2025"));
        assert!(first.contains("Page 5 of 8"));
    }

    #[test]
    fn test_render_week1_produces_pdf() {
        let season = sample_season();
        let pdf = render_week1(&season, &forty_rows_missing_one_court()).unwrap();
        assert_eq!(pdf.page_count, 8);
        assert!(pdf.bytes.starts_with(b"%PDF"));
    }

    #[test]
    fn test_empty_roster_still_lays_out_schedule() {
        let season = sample_season();
        let pages = week1_pages(&season, &[]);
        assert_eq!(pages.len(), 8);
    }
}
