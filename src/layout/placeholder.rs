use crate::error::{Error, Result};
use crate::fonts::TextMeasurer;
use crate::model::{Alignment, DraftOp, DrawOp, Page, PageDraft};

/// Second pass of composition: turns closed page drafts into final pages once
/// the total page count is known.
pub struct PlaceholderResolver<'a> {
    measurer: &'a dyn TextMeasurer,
}

impl<'a> PlaceholderResolver<'a> {
    pub fn new(measurer: &'a dyn TextMeasurer) -> Self {
        Self { measurer }
    }

    /// Substitute every total-pages piece with `drafts.len()`.
    ///
    /// The drafts must be the complete, closed page sequence `1..=n`; anything
    /// else means the count would be wrong. Resolution does not modify the
    /// drafts, so resolving again yields identical pages.
    pub fn resolve(&self, drafts: &[PageDraft]) -> Result<Vec<Page>> {
        if let Some(open) = drafts.iter().find(|d| !d.closed) {
            return Err(Error::PlaceholderResolutionOrder(format!(
                "page {} is still open",
                open.number
            )));
        }
        if let Some((idx, draft)) = drafts
            .iter()
            .enumerate()
            .find(|(idx, d)| d.number != idx + 1)
        {
            return Err(Error::PlaceholderResolutionOrder(format!(
                "page at position {} is numbered {}",
                idx + 1,
                draft.number
            )));
        }

        let total = drafts.len();
        let pages = drafts
            .iter()
            .map(|draft| Page {
                number: draft.number,
                ops: draft.ops.iter().map(|op| self.resolve_op(op, total)).collect(),
            })
            .collect();
        log::debug!("resolved placeholders on {total} pages");
        Ok(pages)
    }

    fn resolve_op(&self, op: &DraftOp, total: usize) -> DrawOp {
        match op {
            DraftOp::Draw(op) => op.clone(),
            DraftOp::Text {
                x,
                y,
                text,
                font,
                color,
                align_box,
            } => {
                let text = text.render(total);
                let x = match *align_box {
                    Some((width, align)) if align != Alignment::Left => {
                        let tw = self.measurer.text_width(&text, font);
                        match align {
                            Alignment::Center => x + (width - tw) / 2.0,
                            _ => x + width - tw,
                        }
                    }
                    _ => *x,
                };
                DrawOp::Text {
                    x,
                    y: *y,
                    text,
                    font: font.clone(),
                    color: *color,
                }
            }
        }
    }
}
