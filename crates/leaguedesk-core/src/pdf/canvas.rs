//! Thin drawing layer over printpdf operations.
//!
//! Coordinates are in points measured from the top-left corner of the
//! page, which is how the sheet layouts think; they are flipped to PDF
//! space here.

use printpdf::{
    Color, LinePoint, Op, PaintMode, Point, Polygon, PolygonRing, Pt, Rgb, TextItem,
    WindingOrder,
};

use super::metrics::Font;

pub struct Canvas {
    page_height: f32,
    ops: Vec<Op>,
}

impl Canvas {
    pub fn new(page_height: f32) -> Self {
        Self {
            page_height,
            ops: Vec::new(),
        }
    }

    fn point(&self, x: f32, top: f32) -> LinePoint {
        LinePoint {
            p: Point {
                x: Pt(x),
                y: Pt(self.page_height - top),
            },
            bezier: false,
        }
    }

    pub fn set_fill_color(&mut self, color: &Rgb) {
        self.ops.push(Op::SetFillColor {
            col: Color::Rgb(color.clone()),
        });
    }

    pub fn set_outline_color(&mut self, color: &Rgb) {
        self.ops.push(Op::SetOutlineColor {
            col: Color::Rgb(color.clone()),
        });
    }

    fn rect(&mut self, x: f32, top: f32, width: f32, height: f32, mode: PaintMode) {
        let points = vec![
            self.point(x, top),
            self.point(x + width, top),
            self.point(x + width, top + height),
            self.point(x, top + height),
        ];
        self.ops.push(Op::DrawPolygon {
            polygon: Polygon {
                rings: vec![PolygonRing { points }],
                mode,
                winding_order: WindingOrder::NonZero,
            },
        });
    }

    pub fn fill_rect(&mut self, x: f32, top: f32, width: f32, height: f32) {
        self.rect(x, top, width, height, PaintMode::Fill);
    }

    pub fn stroke_rect(&mut self, x: f32, top: f32, width: f32, height: f32) {
        self.rect(x, top, width, height, PaintMode::Stroke);
    }

    /// Draw `text` with its baseline `baseline` points below the page top.
    pub fn text(&mut self, text: &str, font: Font, size: f32, x: f32, baseline: f32) {
        if text.is_empty() {
            return;
        }
        let pos = self.point(x, baseline).p;
        self.ops.push(Op::StartTextSection);
        self.ops.push(Op::SetFontSizeBuiltinFont {
            size: Pt(size),
            font: font.builtin(),
        });
        self.ops.push(Op::SetTextCursor { pos });
        self.ops.push(Op::WriteTextBuiltinFont {
            items: vec![TextItem::Text(text.to_string())],
            font: font.builtin(),
        });
        self.ops.push(Op::EndTextSection);
    }

    pub fn into_ops(self) -> Vec<Op> {
        self.ops
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_text_emits_one_section() {
        let mut canvas = Canvas::new(612.0);
        canvas.text("Court 1", Font::Bold, 12.0, 36.0, 50.0);
        canvas.text("", Font::Regular, 12.0, 36.0, 70.0);
        let ops = canvas.into_ops();
        assert_eq!(ops.len(), 5);
        assert!(matches!(ops[0], Op::StartTextSection));
        assert!(matches!(ops[4], Op::EndTextSection));
    }

    #[test]
    fn test_coordinates_flip_to_pdf_space() {
        let mut canvas = Canvas::new(612.0);
        canvas.stroke_rect(0.0, 12.0, 100.0, 20.0);
        match &canvas.into_ops()[0] {
            Op::DrawPolygon { polygon } => {
                let points = &polygon.rings[0].points;
                assert_eq!(points[0].p.y, Pt(600.0));
                assert_eq!(points[1].p.x, Pt(100.0));
                assert_eq!(points[2].p.y, Pt(580.0));
            }
            other => panic!("unexpected op {:?}", other),
        }
    }
}
