#![allow(dead_code)]

use flowdoc_pdf::config::TextStyle;
use flowdoc_pdf::layout::{ContentBlock, LayoutState, Paragraph};
use flowdoc_pdf::model::{BLACK, FontDescriptor, Page, PageDraft, PageGeometry};
use flowdoc_pdf::{TextMeasurer, layout::PlaceholderResolver};

/// Every character is half the font size wide, spaces included.
pub struct Mono;

impl TextMeasurer for Mono {
    fn text_width(&self, text: &str, font: &FontDescriptor) -> f32 {
        text.chars().count() as f32 * font.size * 0.5
    }
}

/// 200x280 page with 20pt margins: 240pt of body height, 160pt of width.
pub fn geometry() -> PageGeometry {
    PageGeometry {
        width: 200.0,
        height: 280.0,
        margin_left: 20.0,
        margin_top: 20.0,
        margin_right: 20.0,
        break_margin: 20.0,
    }
}

pub fn style(line_height: f32, space_after: f32) -> TextStyle {
    TextStyle {
        font: FontDescriptor::new("Mono", 10.0),
        color: BLACK,
        line_height,
        space_after,
    }
}

/// A single-line paragraph exactly `height` tall with no space after it.
pub fn block(text: &str, height: f32) -> ContentBlock {
    ContentBlock::Paragraph(Paragraph::new(text, style(height, 0.0)))
}

pub fn state() -> LayoutState {
    LayoutState::new(geometry(), Some("{nb}".to_string()))
}

pub fn resolve(drafts: &[PageDraft]) -> Vec<Page> {
    PlaceholderResolver::new(&Mono)
        .resolve(drafts)
        .expect("resolve placeholders")
}

pub fn page_texts(page: &Page) -> Vec<String> {
    page.texts().map(str::to_string).collect()
}

pub fn init_logging() {
    let _ = env_logger::builder().is_test(true).try_init();
}
