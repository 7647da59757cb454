use crate::config::TextStyle;
use crate::error::{Error, Result};
use crate::fonts::TextMeasurer;
use crate::model::{Alignment, DraftOp, DraftText, DrawOp, PageDraft, PageGeometry, Rgb};

use super::blocks::ContentBlock;
use super::cursor::{EPSILON, PageCursor};

/// Header or footer renderer, called once per page.
pub type FurnitureFn = Box<dyn FnMut(&mut Furniture<'_>)>;

/// Drawing surface handed to header/footer callbacks. It has its own y
/// position and never moves the body cursor; only the header's final y is
/// used, as the top of the body content.
pub struct Furniture<'a> {
    page_number: usize,
    geometry: PageGeometry,
    y: f32,
    alias: Option<&'a str>,
    draft: &'a mut PageDraft,
}

impl Furniture<'_> {
    pub fn page_number(&self) -> usize {
        self.page_number
    }

    pub fn geometry(&self) -> &PageGeometry {
        &self.geometry
    }

    pub fn y(&self) -> f32 {
        self.y
    }

    /// Negative values are measured from the bottom edge of the page.
    pub fn set_y(&mut self, y: f32) {
        self.y = if y < 0.0 { self.geometry.height + y } else { y };
    }

    pub fn ln(&mut self, height: f32) {
        self.y += height;
    }

    /// Single-line cell spanning the usable width at the current y. The
    /// total-pages alias in `text` is kept as a deferred piece. Does not move y.
    pub fn cell(&mut self, text: &str, height: f32, align: Alignment, style: &TextStyle) {
        let text = DraftText::tokenize(text, self.alias);
        self.text_cell(text, height, align, style);
    }

    /// Like `cell`, for text whose deferred pieces are already built.
    pub fn text_cell(&mut self, text: DraftText, height: f32, align: Alignment, style: &TextStyle) {
        self.draft.ops.push(DraftOp::Text {
            x: self.geometry.margin_left,
            y: cell_baseline(self.y, height, style.font.size),
            text,
            font: style.font.clone(),
            color: style.color,
            align_box: Some((self.geometry.usable_width(), align)),
        });
    }

    /// Horizontal line across the margins at the current y.
    pub fn rule(&mut self, color: Rgb, width: f32) {
        self.draft.draw(DrawOp::Line {
            x1: self.geometry.margin_left,
            y1: self.y,
            x2: self.geometry.width - self.geometry.margin_right,
            y2: self.y,
            width,
            color,
        });
    }
}

/// Baseline of single-line text vertically centered in a cell starting at `top`.
pub(crate) fn cell_baseline(top: f32, height: f32, font_size: f32) -> f32 {
    top + height / 2.0 + 0.3 * font_size
}

/// Explicit layout state of one document: the cursor, finished pages and the
/// page under construction. Break decisions are taken before a block is drawn.
pub struct LayoutState {
    cursor: PageCursor,
    alias: Option<String>,
    pages: Vec<PageDraft>,
    current: Option<PageDraft>,
    header: Option<FurnitureFn>,
    footer: Option<FurnitureFn>,
}

impl LayoutState {
    pub fn new(geometry: PageGeometry, total_pages_alias: Option<String>) -> Self {
        Self {
            cursor: PageCursor::new(geometry),
            alias: total_pages_alias,
            pages: Vec::new(),
            current: None,
            header: None,
            footer: None,
        }
    }

    pub fn set_header(&mut self, header: FurnitureFn) {
        self.header = Some(header);
    }

    pub fn set_footer(&mut self, footer: FurnitureFn) {
        self.footer = Some(footer);
    }

    pub fn cursor(&self) -> &PageCursor {
        &self.cursor
    }

    pub fn geometry(&self) -> &PageGeometry {
        self.cursor.geometry()
    }

    /// Number of the open page, or of the last closed one.
    pub fn page_number(&self) -> usize {
        self.current
            .as_ref()
            .map_or(self.pages.len(), |page| page.number)
    }

    pub fn will_fit(&self, height: f32) -> bool {
        self.cursor.remaining_height() + EPSILON >= height
    }

    /// Close the open page (footer) and start a new one (header).
    pub fn break_page(&mut self) {
        self.close_page();
        let number = self.pages.len() + 1;
        let mut draft = PageDraft::new(number);
        self.cursor.reset_to_top();

        let geometry = *self.cursor.geometry();
        let mut content_top = geometry.margin_top;
        if let Some(header) = self.header.as_mut() {
            let mut furniture = Furniture {
                page_number: number,
                geometry,
                y: geometry.margin_top,
                alias: self.alias.as_deref(),
                draft: &mut draft,
            };
            header(&mut furniture);
            content_top = furniture.y;
        }
        self.cursor.start_content_at(content_top);
        log::debug!("open page {number}, content starts at y={content_top:.2}");
        self.current = Some(draft);
    }

    pub(crate) fn close_page(&mut self) {
        let Some(mut draft) = self.current.take() else {
            return;
        };
        let geometry = *self.cursor.geometry();
        if let Some(footer) = self.footer.as_mut() {
            let mut furniture = Furniture {
                page_number: draft.number,
                geometry,
                y: geometry.break_line(),
                alias: self.alias.as_deref(),
                draft: &mut draft,
            };
            footer(&mut furniture);
        }
        draft.closed = true;
        log::debug!("close page {} ({} ops)", draft.number, draft.ops.len());
        self.pages.push(draft);
    }

    fn ensure_page(&mut self) {
        if self.current.is_none() {
            self.break_page();
        }
    }

    /// Make sure `height` (plus `keep_with_next` of lookahead) fits on the
    /// current page, breaking first if it does not. Fails if `height` exceeds
    /// what an empty page offers.
    pub fn reserve(&mut self, height: f32, keep_with_next: f32) -> Result<()> {
        self.ensure_page();
        let available = self.cursor.page_capacity();
        if height > available + EPSILON {
            return Err(Error::PageOverflow { height, available });
        }
        if !self.will_fit(height + keep_with_next) && !self.cursor.at_page_top() {
            log::debug!(
                "page break before block of {height:.2}pt (+{keep_with_next:.2}pt), {:.2}pt left",
                self.cursor.remaining_height()
            );
            self.break_page();
        }
        Ok(())
    }

    /// Measure, maybe break, draw, advance. Paragraphs taller than an empty
    /// page are placed line by line instead of atomically.
    pub fn place(&mut self, block: &ContentBlock, measurer: &dyn TextMeasurer) -> Result<()> {
        self.ensure_page();
        let width = self.geometry().usable_width();
        let height = block.measure(width, measurer);

        if let ContentBlock::Paragraph(paragraph) = block {
            if height > self.cursor.page_capacity() + EPSILON {
                return self.place_lines(paragraph, measurer);
            }
        }

        self.reserve(height, block.keep_with_next())?;
        let (x, y) = self.cursor.position();
        let mut ops = Vec::new();
        block.draw(x, y, width, measurer, &mut ops);
        self.extend(ops);
        self.cursor.advance(height)?;
        self.cursor.line_feed(block.trailing_margin());
        Ok(())
    }

    fn place_lines(
        &mut self,
        paragraph: &super::blocks::Paragraph,
        measurer: &dyn TextMeasurer,
    ) -> Result<()> {
        let width = self.geometry().usable_width();
        let line_h = paragraph.style.line_height;
        log::debug!(
            "paragraph taller than a page, placing line by line from page {}",
            self.page_number()
        );
        for line in paragraph.lines(width, measurer) {
            self.reserve(line_h, 0.0)?;
            let (x, y) = self.cursor.position();
            let mut ops = Vec::new();
            paragraph.draw_line(&line, x, y, width, &mut ops);
            self.extend(ops);
            self.cursor.advance(line_h)?;
        }
        self.cursor.line_feed(paragraph.style.space_after);
        Ok(())
    }

    /// Manual line feed of body content; never breaks.
    pub fn line_feed(&mut self, height: f32) {
        self.ensure_page();
        self.cursor.line_feed(height);
    }

    fn extend(&mut self, ops: Vec<DrawOp>) {
        self.ensure_page();
        if let Some(page) = self.current.as_mut() {
            page.ops.extend(ops.into_iter().map(DraftOp::Draw));
        }
    }

    /// Close the last page and hand out every draft. A document always has
    /// at least one page.
    pub fn finish(mut self) -> Vec<PageDraft> {
        self.ensure_page();
        self.close_page();
        self.pages
    }

    /// Drafts closed so far plus the open page, without closing it.
    pub fn snapshot(&self) -> Vec<PageDraft> {
        self.pages.iter().chain(self.current.iter()).cloned().collect()
    }
}
