use crate::config::{HeadingStyle, TextStyle};
use crate::error::{Error, Result};
use crate::fonts::TextMeasurer;
use crate::model::{Alignment, DrawOp, FontDescriptor, Rgb};

use super::pagination::cell_baseline;
use super::wrap::{WrappedLine, wrap};

/// Atomic renderable unit. Each variant knows its height for a given width.
#[derive(Clone, Debug)]
pub enum ContentBlock {
    Paragraph(Paragraph),
    Bullet(Bullet),
    Heading(Heading),
    TableRow(TableRow),
}

impl ContentBlock {
    pub fn measure(&self, width: f32, measurer: &dyn TextMeasurer) -> f32 {
        match self {
            ContentBlock::Paragraph(p) => p.lines(width, measurer).count() as f32 * p.style.line_height,
            ContentBlock::Bullet(b) => b.lines(width, measurer).count() as f32 * b.style.line_height,
            ContentBlock::Heading(h) => h.style.text.line_height,
            ContentBlock::TableRow(r) => r.height,
        }
    }

    /// Space left below the block.
    pub fn trailing_margin(&self) -> f32 {
        match self {
            ContentBlock::Paragraph(p) => p.style.space_after,
            ContentBlock::Bullet(b) => b.style.space_after,
            ContentBlock::Heading(h) => h.style.text.space_after,
            ContentBlock::TableRow(_) => 0.0,
        }
    }

    /// Height that must still fit after the block for it to stay on this page.
    pub fn keep_with_next(&self) -> f32 {
        match self {
            ContentBlock::Heading(h) => h.style.text.space_after + h.lookahead,
            ContentBlock::TableRow(r) => r.keep_with_next,
            ContentBlock::Paragraph(_) | ContentBlock::Bullet(_) => 0.0,
        }
    }

    pub fn draw(
        &self,
        x: f32,
        y: f32,
        width: f32,
        measurer: &dyn TextMeasurer,
        out: &mut Vec<DrawOp>,
    ) {
        match self {
            ContentBlock::Paragraph(p) => {
                for (i, line) in p.lines(width, measurer).enumerate() {
                    p.draw_line(&line, x, y + i as f32 * p.style.line_height, width, out);
                }
            }
            ContentBlock::Bullet(b) => b.draw(x, y, width, measurer, out),
            ContentBlock::Heading(h) => h.draw(x, y, width, measurer, out),
            ContentBlock::TableRow(r) => r.draw(x, y, measurer, out),
        }
    }
}

fn text_op(text: &str, x: f32, baseline: f32, style: &TextStyle) -> DrawOp {
    DrawOp::Text {
        x,
        y: baseline,
        text: text.to_string(),
        font: style.font.clone(),
        color: style.color,
    }
}

fn aligned_x(x: f32, width: f32, text_width: f32, align: Alignment) -> f32 {
    match align {
        Alignment::Left => x,
        Alignment::Center => x + (width - text_width) / 2.0,
        Alignment::Right => x + width - text_width,
    }
}

fn warn_overflow(line: &WrappedLine, width: f32) {
    if line.overflow {
        log::warn!(
            "word {:?} is {:.1}pt wide, wider than the {:.1}pt line",
            line.text,
            line.width,
            width
        );
    }
}

#[derive(Clone, Debug)]
pub struct Paragraph {
    pub text: String,
    pub style: TextStyle,
    pub align: Alignment,
}

impl Paragraph {
    pub fn new(text: impl Into<String>, style: TextStyle) -> Self {
        Self {
            text: text.into(),
            style,
            align: Alignment::Left,
        }
    }

    pub fn aligned(mut self, align: Alignment) -> Self {
        self.align = align;
        self
    }

    pub fn lines<'a>(
        &'a self,
        width: f32,
        measurer: &'a dyn TextMeasurer,
    ) -> impl Iterator<Item = WrappedLine> + 'a {
        wrap(&self.text, width, &self.style.font, measurer)
    }

    /// Draw one wrapped line whose cell starts at `top`.
    pub(crate) fn draw_line(
        &self,
        line: &WrappedLine,
        x: f32,
        top: f32,
        width: f32,
        out: &mut Vec<DrawOp>,
    ) {
        warn_overflow(line, width);
        if line.text.is_empty() {
            return;
        }
        let baseline = cell_baseline(top, self.style.line_height, self.style.font.size);
        let lx = aligned_x(x, width, line.width, self.align);
        out.push(text_op(&line.text, lx, baseline, &self.style));
    }
}

/// Bulleted item: the symbol sits in the indent column, the text wraps in
/// the remaining width (hanging indent).
#[derive(Clone, Debug)]
pub struct Bullet {
    pub text: String,
    pub style: TextStyle,
    pub indent: f32,
    pub symbol: char,
}

impl Bullet {
    pub fn new(text: impl Into<String>, style: TextStyle, indent: f32) -> Self {
        Self {
            text: text.into(),
            style,
            indent,
            symbol: '\u{2022}',
        }
    }

    fn lines<'a>(
        &'a self,
        width: f32,
        measurer: &'a dyn TextMeasurer,
    ) -> impl Iterator<Item = WrappedLine> + 'a {
        wrap(&self.text, (width - self.indent).max(0.0), &self.style.font, measurer)
    }

    fn draw(&self, x: f32, y: f32, width: f32, measurer: &dyn TextMeasurer, out: &mut Vec<DrawOp>) {
        let lh = self.style.line_height;
        let size = self.style.font.size;
        out.push(text_op(
            &self.symbol.to_string(),
            x,
            cell_baseline(y, lh, size),
            &self.style,
        ));
        let text_width = (width - self.indent).max(0.0);
        for (i, line) in self.lines(width, measurer).enumerate() {
            warn_overflow(&line, text_width);
            if line.text.is_empty() {
                continue;
            }
            let baseline = cell_baseline(y + i as f32 * lh, lh, size);
            out.push(text_op(&line.text, x + self.indent, baseline, &self.style));
        }
    }
}

#[derive(Clone, Debug)]
pub struct Heading {
    pub text: String,
    pub style: HeadingStyle,
    /// Height of the start of the content that follows (a body line, or a
    /// table header with its first row); reserved so the heading never ends
    /// up alone at the bottom of a page.
    pub lookahead: f32,
}

impl Heading {
    fn draw(&self, x: f32, y: f32, width: f32, measurer: &dyn TextMeasurer, out: &mut Vec<DrawOp>) {
        let text = &self.style.text;
        let text_width = measurer.text_width(&self.text, &text.font);
        if text_width > width {
            log::warn!("heading {:?} overflows the line by {:.1}pt", self.text, text_width - width);
        }
        let baseline = cell_baseline(y, text.line_height, text.font.size);
        out.push(text_op(&self.text, x, baseline, text));
        if let Some(color) = self.style.rule {
            let rule_y = y + text.line_height;
            out.push(DrawOp::Line {
                x1: x,
                y1: rule_y,
                x2: x + width,
                y2: rule_y,
                width: 0.5,
                color,
            });
        }
    }
}

/// One single-line table row. Cell text is never wrapped; text wider than its
/// column overflows the cell.
#[derive(Clone, Debug)]
pub struct TableRow {
    pub cells: Vec<String>,
    pub widths: Vec<f32>,
    pub height: f32,
    pub font: FontDescriptor,
    pub text_color: Rgb,
    pub fill: Option<Rgb>,
    pub border: Option<Rgb>,
    pub padding: f32,
    pub keep_with_next: f32,
}

impl TableRow {
    /// Checks the cell count against the declared columns.
    pub fn new(
        row: usize,
        cells: Vec<String>,
        widths: Vec<f32>,
        height: f32,
        font: FontDescriptor,
        text_color: Rgb,
    ) -> Result<Self> {
        if cells.len() != widths.len() {
            return Err(Error::ColumnCountMismatch {
                row,
                expected: widths.len(),
                found: cells.len(),
            });
        }
        Ok(Self {
            cells,
            widths,
            height,
            font,
            text_color,
            fill: None,
            border: None,
            padding: 0.0,
            keep_with_next: 0.0,
        })
    }

    fn draw(&self, x: f32, y: f32, measurer: &dyn TextMeasurer, out: &mut Vec<DrawOp>) {
        let baseline = cell_baseline(y, self.height, self.font.size);
        let mut cell_x = x;
        for (text, &w) in self.cells.iter().zip(&self.widths) {
            if self.fill.is_some() || self.border.is_some() {
                out.push(DrawOp::Rect {
                    x: cell_x,
                    y,
                    width: w,
                    height: self.height,
                    fill: self.fill,
                    stroke: self.border,
                });
            }
            if !text.is_empty() {
                let tw = measurer.text_width(text, &self.font);
                if tw + 2.0 * self.padding > w {
                    log::warn!("cell {text:?} overflows its {w:.1}pt column");
                }
                out.push(DrawOp::Text {
                    x: cell_x + self.padding,
                    y: baseline,
                    text: text.clone(),
                    font: self.font.clone(),
                    color: self.text_color,
                });
            }
            cell_x += w;
        }
    }
}
