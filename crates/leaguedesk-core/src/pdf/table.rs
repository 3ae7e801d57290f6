use printpdf::Rgb;

use super::canvas::Canvas;
use super::fit::{fit_text, truncate_to_fit};
use super::layout::{Column, ColumnKind, TableStyle};
use super::metrics::Font;
use super::{BLACK, GRID_GRAY, HEADER_FILL, NO_HISTORY_GREEN, NOT_MALE_PINK, PAIR_YELLOW, SETTER_BLUE};
use crate::models::RosterRow;

/// Background for a cell, if its value calls for one.
pub fn cell_highlight(kind: ColumnKind, row: &RosterRow) -> Option<&'static Rgb> {
    match kind {
        ColumnKind::Pair if row.has_pair() => Some(&PAIR_YELLOW),
        ColumnKind::Positions if row.is_setter() => Some(&SETTER_BLUE),
        ColumnKind::Gender if row.is_not_male() => Some(&NOT_MALE_PINK),
        ColumnKind::LastSeason | ColumnKind::LastDivision if row.blank_history => Some(&NO_HISTORY_GREEN),
        _ => None,
    }
}

/// Baseline that vertically centres text of `size` in a band.
fn baseline(top: f32, height: f32, size: f32) -> f32 {
    top + (height + size * 0.7) / 2.0
}

/// Draw the header band. Returns its height.
pub fn draw_header(canvas: &mut Canvas, columns: &[Column], x: f32, top: f32, style: &TableStyle) -> f32 {
    let height = style.header_height;
    let mut cx = x;
    for column in columns {
        canvas.set_fill_color(&HEADER_FILL);
        canvas.fill_rect(cx, top, column.width, height);
        canvas.set_outline_color(&GRID_GRAY);
        canvas.stroke_rect(cx, top, column.width, height);

        let inner = column.width - style.padding;
        let text = truncate_to_fit(column.kind.header(), Font::Bold, style.header_size, inner);
        canvas.set_fill_color(&BLACK);
        canvas.text(
            &text,
            Font::Bold,
            style.header_size,
            cx + style.padding / 2.0,
            baseline(top, height, style.header_size),
        );
        cx += column.width;
    }
    height
}

/// Draw one grid line per row, fitting each value to its cell.
pub fn draw_rows(
    canvas: &mut Canvas,
    columns: &[Column],
    rows: &[RosterRow],
    x: f32,
    top: f32,
    row_height: f32,
    style: &TableStyle,
) {
    let body_size = style.body_size.min(row_height * 0.8);
    let min_size = style.min_fit_size.min(body_size);

    for (i, row) in rows.iter().enumerate() {
        let row_top = top + i as f32 * row_height;
        let mut cx = x;
        for column in columns {
            if let Some(color) = cell_highlight(column.kind, row) {
                canvas.set_fill_color(color);
                canvas.fill_rect(cx, row_top, column.width, row_height);
            }
            canvas.set_outline_color(&GRID_GRAY);
            canvas.stroke_rect(cx, row_top, column.width, row_height);

            let inner = (column.width - style.padding).max(0.0);
            let value = column.kind.value(row);
            let (text, size) = if column.kind.is_elastic() {
                let fitted = fit_text(value, Font::Regular, body_size, min_size, inner);
                (fitted.text, fitted.size)
            } else {
                (truncate_to_fit(value, Font::Regular, body_size, inner), body_size)
            };
            canvas.set_fill_color(&BLACK);
            canvas.text(
                &text,
                Font::Regular,
                size,
                cx + style.padding / 2.0,
                baseline(row_top, row_height, size),
            );
            cx += column.width;
        }
    }
}
