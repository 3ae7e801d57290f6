//! Column width resolution.
//!
//! Widths are computed once per document from every row that will be
//! drawn, so all pages of a sheet share the same grid. Fixed columns size
//! to their widest value within `[min, max]`; Name and Pair are elastic
//! and share whatever the fixed columns leave; Notes takes any slack.

use super::metrics::{text_width, Font};
use crate::models::RosterRow;

/// Smallest width an elastic column is squeezed to, space permitting.
pub const HARD_MIN_ELASTIC: f32 = 40.0;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ColumnKind {
    Id,
    Name,
    Pair,
    LastDivision,
    LastSeason,
    Positions,
    Height,
    Gender,
    Notes,
}

impl ColumnKind {
    pub fn header(self) -> &'static str {
        match self {
            ColumnKind::Id => "#",
            ColumnKind::Name => "Name",
            ColumnKind::Pair => "Pair",
            ColumnKind::LastDivision => "Last Div",
            ColumnKind::LastSeason => "Last Season",
            ColumnKind::Positions => "Positions",
            ColumnKind::Height => "Height",
            ColumnKind::Gender => "Gender",
            ColumnKind::Notes => "Notes",
        }
    }

    pub fn is_elastic(self) -> bool {
        matches!(self, ColumnKind::Name | ColumnKind::Pair)
    }

    /// The cell text for a row. Notes are written by hand.
    pub fn value(self, row: &RosterRow) -> &str {
        match self {
            ColumnKind::Id => &row.label,
            ColumnKind::Name => &row.name,
            ColumnKind::Pair => &row.pair,
            ColumnKind::LastDivision => &row.last_division,
            ColumnKind::LastSeason => &row.last_season,
            ColumnKind::Positions => &row.positions,
            ColumnKind::Height => &row.height,
            ColumnKind::Gender => &row.gender,
            ColumnKind::Notes => "",
        }
    }
}

/// Width limits for one column of a sheet.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ColumnSpec {
    pub kind: ColumnKind,
    pub min: f32,
    /// Ignored for elastic columns. Longer values are truncated when drawn.
    pub max: f32,
}

impl ColumnSpec {
    pub const fn new(kind: ColumnKind, min: f32, max: f32) -> Self {
        Self { kind, min, max }
    }
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Column {
    pub kind: ColumnKind,
    pub width: f32,
}

/// Font sizes and spacing for a table.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct TableStyle {
    pub header_size: f32,
    pub body_size: f32,
    /// Floor for Name and Pair when shrinking to fit
    pub min_fit_size: f32,
    /// Horizontal padding inside a cell, both sides together
    pub padding: f32,
    pub header_height: f32,
}

pub const WEEK1_COLUMNS: [ColumnSpec; 9] = [
    ColumnSpec::new(ColumnKind::Id, 22.0, 30.0),
    ColumnSpec::new(ColumnKind::Name, 60.0, 0.0),
    ColumnSpec::new(ColumnKind::Pair, 60.0, 0.0),
    ColumnSpec::new(ColumnKind::LastDivision, 45.0, 80.0),
    ColumnSpec::new(ColumnKind::LastSeason, 55.0, 80.0),
    ColumnSpec::new(ColumnKind::Positions, 50.0, 110.0),
    ColumnSpec::new(ColumnKind::Height, 36.0, 40.0),
    ColumnSpec::new(ColumnKind::Gender, 40.0, 56.0),
    ColumnSpec::new(ColumnKind::Notes, 90.0, 0.0),
];

pub const WEEK2_COLUMNS: [ColumnSpec; 7] = [
    ColumnSpec::new(ColumnKind::Id, 16.0, 24.0),
    ColumnSpec::new(ColumnKind::Name, 50.0, 0.0),
    ColumnSpec::new(ColumnKind::Pair, 40.0, 0.0),
    ColumnSpec::new(ColumnKind::Positions, 36.0, 64.0),
    ColumnSpec::new(ColumnKind::Gender, 30.0, 44.0),
    ColumnSpec::new(ColumnKind::LastDivision, 32.0, 56.0),
    ColumnSpec::new(ColumnKind::Notes, 40.0, 0.0),
];

/// Widest of the bold header and the regular-weight values, plus padding.
fn natural_width(kind: ColumnKind, rows: &[RosterRow], style: &TableStyle) -> f32 {
    let header = text_width(kind.header(), Font::Bold, style.header_size);
    let widest = rows
        .iter()
        .map(|r| text_width(kind.value(r), Font::Regular, style.body_size))
        .fold(header, f32::max);
    widest.ceil() + style.padding
}

/// Scale elastic widths by a common factor to fill `remaining` exactly.
/// Columns that would drop under the floor are pinned to it and the rest
/// rescaled.
fn share_remaining(natural: &[f32], remaining: f32) -> Vec<f32> {
    if natural.is_empty() {
        return Vec::new();
    }
    let remaining = remaining.max(0.0);
    let floor = HARD_MIN_ELASTIC.min(remaining / natural.len() as f32);
    let mut pinned = vec![false; natural.len()];

    loop {
        let pinned_count = pinned.iter().filter(|p| **p).count();
        let budget = remaining - pinned_count as f32 * floor;
        let need: f32 = natural
            .iter()
            .zip(&pinned)
            .filter(|(_, p)| !**p)
            .map(|(n, _)| *n)
            .sum();
        let scale = if need > 0.0 { budget / need } else { 0.0 };

        let mut changed = false;
        for (i, n) in natural.iter().enumerate() {
            if !pinned[i] && n * scale < floor {
                pinned[i] = true;
                changed = true;
            }
        }
        if !changed {
            return natural
                .iter()
                .zip(&pinned)
                .map(|(n, p)| if *p { floor } else { n * scale })
                .collect();
        }
    }
}

/// Resolve every column's width for a table `table_width` points wide.
pub fn resolve_columns(
    specs: &[ColumnSpec],
    rows: &[RosterRow],
    table_width: f32,
    style: &TableStyle,
) -> Vec<Column> {
    let mut columns: Vec<Column> = specs
        .iter()
        .map(|spec| {
            let width = if spec.kind.is_elastic() {
                natural_width(spec.kind, rows, style).max(spec.min)
            } else if spec.kind == ColumnKind::Notes {
                spec.min
            } else {
                let header = text_width(spec.kind.header(), Font::Bold, style.header_size).ceil()
                    + style.padding;
                natural_width(spec.kind, rows, style)
                    .min(spec.max)
                    .max(spec.min)
                    .max(header)
            };
            Column { kind: spec.kind, width }
        })
        .collect();

    let fixed: f32 = columns
        .iter()
        .filter(|c| !c.kind.is_elastic())
        .map(|c| c.width)
        .sum();
    let remaining = table_width - fixed;
    let natural: Vec<f32> = columns
        .iter()
        .filter(|c| c.kind.is_elastic())
        .map(|c| c.width)
        .collect();
    let needed: f32 = natural.iter().sum();

    if needed > remaining {
        let shared = share_remaining(&natural, remaining);
        for (column, width) in columns.iter_mut().filter(|c| c.kind.is_elastic()).zip(shared) {
            column.width = width;
        }
    } else if let Some(notes) = columns.iter_mut().find(|c| c.kind == ColumnKind::Notes) {
        notes.width += remaining - needed;
    }
    columns
}

/// Total width of a set of columns.
pub fn table_width(columns: &[Column]) -> f32 {
    columns.iter().map(|c| c.width).sum()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::roster::week1_row;
    use proptest::prelude::*;

    const STYLE: TableStyle = TableStyle {
        header_size: 9.0,
        body_size: 9.0,
        min_fit_size: 6.0,
        padding: 8.0,
        header_height: 18.0,
    };

    fn width_of(columns: &[Column], kind: ColumnKind) -> f32 {
        columns.iter().find(|c| c.kind == kind).map(|c| c.width).unwrap_or(0.0)
    }

    #[test]
    fn test_short_names_leave_slack_to_notes() {
        let rows = vec![week1_row(1, 1, 1, "Al Li")];
        let columns = resolve_columns(&WEEK1_COLUMNS, &rows, 720.0, &STYLE);
        assert!((table_width(&columns) - 720.0).abs() < 0.01);
        assert_eq!(width_of(&columns, ColumnKind::Name), 60.0);
        assert!(width_of(&columns, ColumnKind::Notes) > 90.0);
    }

    #[test]
    fn test_long_names_are_scaled_to_fill() {
        let mut row = week1_row(1, 1, 1, &"Maximilian Featherstonehaugh ".repeat(6));
        row.pair = "Bartholomew Montgomery-Smythe ".repeat(4);
        let columns = resolve_columns(&WEEK1_COLUMNS, &[row], 720.0, &STYLE);

        let name = width_of(&columns, ColumnKind::Name);
        let pair = width_of(&columns, ColumnKind::Pair);
        assert!(name > pair);
        assert!((table_width(&columns) - 720.0).abs() < 0.01);
        assert_eq!(width_of(&columns, ColumnKind::Notes), 90.0);
    }

    #[test]
    fn test_fixed_column_capped_at_max() {
        let mut row = week1_row(1, 1, 1, "Ann Lee");
        row.positions = "Setter, Hitter, Other, Setter, Hitter, Other".to_string();
        let columns = resolve_columns(&WEEK1_COLUMNS, &[row], 720.0, &STYLE);
        assert_eq!(width_of(&columns, ColumnKind::Positions), 110.0);
    }

    #[test]
    fn test_share_remaining_pins_small_columns() {
        let shared = share_remaining(&[1000.0, 10.0], 200.0);
        assert_eq!(shared[1], HARD_MIN_ELASTIC);
        assert!((shared[0] + shared[1] - 200.0).abs() < 0.01);

        // Less than two floors: the floor drops to half the remainder
        let shared = share_remaining(&[500.0, 5.0], 50.0);
        assert_eq!(shared[1], 25.0);
        assert!((shared[0] - 25.0).abs() < 0.01);
    }

    fn arb_row() -> impl Strategy<Value = RosterRow> {
        ("[A-Za-z .'-]{0,50}", "[A-Za-z .'-]{0,50}", "[A-Za-z, ]{0,40}", "[A-Za-z ]{0,20}").prop_map(
            |(name, pair, positions, last_division)| {
                let mut row = week1_row(1, 1, 1, &name);
                row.pair = pair;
                row.positions = positions;
                row.last_division = last_division;
                row
            },
        )
    }

    proptest! {
        #[test]
        fn prop_column_widths_respect_bounds(
            rows in prop::collection::vec(arb_row(), 0..30),
            table in 500.0f32..900.0,
        ) {
            let columns = resolve_columns(&WEEK1_COLUMNS, &rows, table, &STYLE);
            for (column, spec) in columns.iter().zip(WEEK1_COLUMNS.iter()) {
                if spec.kind.is_elastic() {
                    continue;
                }
                let header = text_width(spec.kind.header(), Font::Bold, STYLE.header_size);
                prop_assert!(column.width >= spec.min);
                prop_assert!(column.width >= header);
            }

            let others: f32 = columns.iter().filter(|c| !c.kind.is_elastic()).map(|c| c.width).sum();
            let elastic = width_of(&columns, ColumnKind::Name) + width_of(&columns, ColumnKind::Pair);
            prop_assert!(elastic <= table - others + 0.01);
            prop_assert!(table_width(&columns) <= table + 0.01);
        }
    }
}
