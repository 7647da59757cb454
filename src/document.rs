use crate::config::{FOOTER_PAGE_KEY, FOOTER_TOTAL_KEY, LayoutConfig, TextStyle};
use crate::error::Result;
use crate::fonts::FontRegistry;
use crate::layout::{
    Bullet, Column, ContentBlock, Furniture, Heading, LayoutState, Paragraph, PlaceholderResolver,
    Table,
};
use crate::model::{Alignment, DraftText, Page, PageDraft};

/// Top-level driver: sequences content blocks through the paginator and runs
/// the placeholder pass once the last page is closed.
pub struct Document<'f> {
    config: LayoutConfig,
    fonts: &'f FontRegistry,
    state: LayoutState,
}

impl<'f> Document<'f> {
    pub fn open(config: LayoutConfig, fonts: &'f FontRegistry) -> Self {
        let state = LayoutState::new(config.geometry, config.total_pages_alias.clone());
        Self {
            config,
            fonts,
            state,
        }
    }

    pub fn config(&self) -> &LayoutConfig {
        &self.config
    }

    /// Current page number (0 before the first block).
    pub fn page_number(&self) -> usize {
        self.state.page_number()
    }

    pub fn set_header(&mut self, header: impl FnMut(&mut Furniture<'_>) + 'static) {
        self.state.set_header(Box::new(header));
    }

    pub fn set_footer(&mut self, footer: impl FnMut(&mut Furniture<'_>) + 'static) {
        self.state.set_footer(Box::new(footer));
    }

    /// Running title with a rule in the header, centered page counter in the
    /// footer (`config.footer_format`). The footer's `{total}` key is a
    /// deferred page count whatever `total_pages_alias` is set to.
    pub fn use_standard_furniture(&mut self) {
        let header_style = self.config.theme.header.clone();
        let header_rule = self.config.theme.header_rule;
        let footer_style = self.config.theme.footer.clone();
        let footer_offset = self.config.theme.footer_offset;

        if !self.config.title.is_empty() {
            let title = self.config.title.clone();
            let style = header_style;
            self.set_header(move |f| {
                f.cell(&title, style.line_height, Alignment::Left, &style);
                f.ln(style.line_height);
                f.rule(header_rule, 0.5);
                f.ln(style.space_after);
            });
        }

        let format = self.config.footer_format.clone();
        let style = footer_style;
        self.set_footer(move |f| {
            let text = format.replace(FOOTER_PAGE_KEY, &f.page_number().to_string());
            let text = DraftText::tokenize(&text, Some(FOOTER_TOTAL_KEY));
            f.set_y(-footer_offset);
            f.text_cell(text, style.line_height, Alignment::Center, &style);
        });
    }

    /// Start a new page regardless of the space left.
    pub fn add_page(&mut self) {
        self.state.break_page();
    }

    /// Manual line feed.
    pub fn add_spacing(&mut self, height: f32) {
        self.state.line_feed(height);
    }

    pub fn add_paragraph(&mut self, text: &str) -> Result<()> {
        let style = self.config.theme.body.clone();
        self.add_styled_paragraph(text, style, Alignment::Left)
    }

    pub fn add_styled_paragraph(
        &mut self,
        text: &str,
        style: TextStyle,
        align: Alignment,
    ) -> Result<()> {
        let block = ContentBlock::Paragraph(Paragraph::new(text, style).aligned(align));
        self.state.place(&block, self.fonts)
    }

    pub fn add_bullet(&mut self, text: &str) -> Result<()> {
        let theme = &self.config.theme;
        let mut bullet = Bullet::new(text, theme.bullet.clone(), theme.bullet_indent);
        bullet.symbol = theme.bullet_symbol;
        self.state.place(&ContentBlock::Bullet(bullet), self.fonts)
    }

    /// Heading kept together with one body line. Levels outside 1..=3 use
    /// the nearest defined level.
    pub fn add_heading(&mut self, text: &str, level: u8) -> Result<()> {
        let lookahead = self.config.theme.body.line_height;
        self.add_heading_keeping(text, level, lookahead)
    }

    /// Heading that moves to the next page unless `lookahead` of the
    /// following content fits below it, e.g. `TableStyle::lead_height`
    /// before a table.
    pub fn add_heading_keeping(&mut self, text: &str, level: u8, lookahead: f32) -> Result<()> {
        let heading = Heading {
            text: text.to_string(),
            style: self.config.theme.heading(level).clone(),
            lookahead,
        };
        self.state.place(&ContentBlock::Heading(heading), self.fonts)
    }

    pub fn add_table(&mut self, columns: Vec<Column>, rows: Vec<Vec<String>>) -> Result<()> {
        let table = Table::new(columns, self.config.theme.table.clone()).with_rows(rows);
        self.add_table_with(&table)
    }

    pub fn add_table_with(&mut self, table: &Table) -> Result<()> {
        table.render(&mut self.state, self.fonts)
    }

    /// Cover page: new page, vertical offset, centered title, optional
    /// subtitle and the configured tagline lines.
    pub fn add_cover(&mut self, title: &str, subtitle: Option<&str>) -> Result<()> {
        self.add_page();
        self.add_spacing(self.config.theme.cover_offset);

        let theme = self.config.theme.clone();
        let mut title_style = theme.cover_title.clone();
        if subtitle.is_none() {
            title_style.space_after = theme.cover_subtitle.space_after;
        }
        self.add_styled_paragraph(title, title_style, Alignment::Center)?;
        if let Some(subtitle) = subtitle {
            self.add_styled_paragraph(subtitle, theme.cover_subtitle.clone(), Alignment::Center)?;
        }
        for line in self.config.cover_taglines.clone() {
            self.add_styled_paragraph(&line, theme.cover_tagline.clone(), Alignment::Center)?;
        }
        Ok(())
    }

    /// Close the last page. No content can be added afterwards.
    pub fn close(self) -> ComposedDocument<'f> {
        let drafts = self.state.finish();
        log::debug!("document closed with {} pages", drafts.len());
        ComposedDocument {
            config: self.config,
            fonts: self.fonts,
            drafts,
        }
    }

    /// Close, resolve placeholders and serialize to PDF bytes.
    pub fn close_document(self) -> Result<Vec<u8>> {
        self.close().to_pdf()
    }

    /// Current drafts including the open page, for inspection.
    pub fn drafts(&self) -> Vec<PageDraft> {
        self.state.snapshot()
    }
}

/// A document whose page sequence is final but whose deferred text is not
/// resolved yet.
pub struct ComposedDocument<'f> {
    config: LayoutConfig,
    fonts: &'f FontRegistry,
    drafts: Vec<PageDraft>,
}

impl ComposedDocument<'_> {
    pub fn page_count(&self) -> usize {
        self.drafts.len()
    }

    pub fn drafts(&self) -> &[PageDraft] {
        &self.drafts
    }

    pub fn config(&self) -> &LayoutConfig {
        &self.config
    }

    pub fn finalize(&self) -> Result<Vec<Page>> {
        PlaceholderResolver::new(self.fonts).resolve(&self.drafts)
    }

    pub fn to_pdf(&self) -> Result<Vec<u8>> {
        let pages = self.finalize()?;
        crate::pdf::render(&pages, &self.config, self.fonts)
    }
}
