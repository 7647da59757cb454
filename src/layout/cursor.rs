use crate::error::{Error, Result};
use crate::model::PageGeometry;

/// Tolerance for floating point comparisons against the break line.
pub(crate) const EPSILON: f32 = 1e-3;

/// The write head of a document. Every vertical move of body content goes
/// through `advance`; the y axis grows towards the bottom of the page.
#[derive(Clone, Debug)]
pub struct PageCursor {
    geometry: PageGeometry,
    x: f32,
    y: f32,
    /// Where body content starts on the current page (below the header).
    content_top: f32,
}

impl PageCursor {
    pub fn new(geometry: PageGeometry) -> Self {
        Self {
            geometry,
            x: geometry.margin_left,
            y: geometry.margin_top,
            content_top: geometry.margin_top,
        }
    }

    pub fn geometry(&self) -> &PageGeometry {
        &self.geometry
    }

    pub fn position(&self) -> (f32, f32) {
        (self.x, self.y)
    }

    pub fn reset_to_top(&mut self) {
        self.x = self.geometry.margin_left;
        self.y = self.geometry.margin_top;
        self.content_top = self.geometry.margin_top;
    }

    /// Mark where body content begins on this page, e.g. after the header.
    /// Never above the top margin.
    pub(crate) fn start_content_at(&mut self, y: f32) {
        let y = y.max(self.geometry.margin_top);
        self.content_top = y;
        self.y = y;
        self.x = self.geometry.margin_left;
    }

    /// Space an empty page offers to body content.
    pub fn page_capacity(&self) -> f32 {
        self.geometry.break_line() - self.content_top
    }

    pub fn remaining_height(&self) -> f32 {
        self.geometry.break_line() - self.y
    }

    /// True while nothing has been written below the content top.
    pub fn at_page_top(&self) -> bool {
        (self.y - self.content_top).abs() < EPSILON
    }

    /// Move the head down by `height`. A height no empty page could hold is a
    /// sizing error of the caller.
    pub fn advance(&mut self, height: f32) -> Result<()> {
        let available = self.page_capacity();
        if height > available + EPSILON {
            return Err(Error::PageOverflow { height, available });
        }
        self.line_feed(height);
        Ok(())
    }

    /// Manual line feed: moves the head without any capacity check.
    pub fn line_feed(&mut self, height: f32) {
        self.y += height;
        self.x = self.geometry.margin_left;
    }
}
