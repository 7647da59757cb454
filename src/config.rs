use crate::model::{FontDescriptor, PageGeometry, Rgb, WHITE};

/// Points per millimetre.
pub const MM: f32 = 72.0 / 25.4;

pub const DEFAULT_FAMILY: &str = "Helvetica";
pub const DEFAULT_TOTAL_PAGES_ALIAS: &str = "{nb}";

/// Keys of `LayoutConfig::footer_format`.
pub const FOOTER_PAGE_KEY: &str = "{page}";
pub const FOOTER_TOTAL_KEY: &str = "{total}";

impl Default for PageGeometry {
    /// A4 portrait, 10 mm side/top margins, 20 mm auto-break margin.
    fn default() -> Self {
        Self {
            width: 210.0 * MM,
            height: 297.0 * MM,
            margin_left: 10.0 * MM,
            margin_top: 10.0 * MM,
            margin_right: 10.0 * MM,
            break_margin: 20.0 * MM,
        }
    }
}

#[derive(Clone, Debug, PartialEq)]
pub struct TextStyle {
    pub font: FontDescriptor,
    pub color: Rgb,
    pub line_height: f32,
    pub space_after: f32,
}

impl TextStyle {
    fn new(size: f32, color: Rgb, line_height_mm: f32, space_after_mm: f32) -> Self {
        Self {
            font: FontDescriptor::new(DEFAULT_FAMILY, size),
            color,
            line_height: line_height_mm * MM,
            space_after: space_after_mm * MM,
        }
    }

    fn bold(mut self) -> Self {
        self.font.bold = true;
        self
    }

    fn italic(mut self) -> Self {
        self.font.italic = true;
        self
    }
}

#[derive(Clone, Debug, PartialEq)]
pub struct HeadingStyle {
    pub text: TextStyle,
    /// Colored rule drawn under the heading text.
    pub rule: Option<Rgb>,
}

#[derive(Clone, Debug, PartialEq)]
pub struct TableStyle {
    pub header_font: FontDescriptor,
    pub header_fill: Rgb,
    pub header_text: Rgb,
    pub header_height: f32,
    pub body_font: FontDescriptor,
    pub body_text: Rgb,
    pub row_height: f32,
    pub band_fill: Rgb,
    pub border: Option<Rgb>,
    pub cell_padding: f32,
    pub space_after: f32,
}

impl TableStyle {
    /// Height of the part of a table that must stay together: the header row
    /// plus the first body row, if any.
    pub fn lead_height(&self, row_count: usize) -> f32 {
        if row_count == 0 {
            self.header_height
        } else {
            self.header_height + self.row_height
        }
    }
}

impl Default for TableStyle {
    fn default() -> Self {
        Self {
            header_font: FontDescriptor::new(DEFAULT_FAMILY, 9.0).bold(),
            header_fill: [30, 60, 120],
            header_text: WHITE,
            header_height: 7.0 * MM,
            body_font: FontDescriptor::new(DEFAULT_FAMILY, 9.0),
            body_text: [30, 30, 30],
            row_height: 6.0 * MM,
            band_fill: [240, 240, 250],
            border: Some([0, 0, 0]),
            cell_padding: 1.0 * MM,
            space_after: 4.0 * MM,
        }
    }
}

#[derive(Clone, Debug, PartialEq)]
pub struct Theme {
    pub body: TextStyle,
    pub bullet: TextStyle,
    pub bullet_indent: f32,
    pub bullet_symbol: char,
    /// Heading levels 1..=3.
    pub headings: [HeadingStyle; 3],
    pub header: TextStyle,
    pub header_rule: Rgb,
    pub footer: TextStyle,
    /// Distance of the footer line from the bottom edge.
    pub footer_offset: f32,
    pub cover_title: TextStyle,
    pub cover_subtitle: TextStyle,
    pub cover_tagline: TextStyle,
    pub cover_offset: f32,
    pub table: TableStyle,
}

impl Default for Theme {
    fn default() -> Self {
        Self {
            body: TextStyle::new(10.0, [30, 30, 30], 5.5, 2.0),
            bullet: TextStyle::new(10.0, [30, 30, 30], 5.5, 1.0),
            bullet_indent: 10.0 * MM,
            bullet_symbol: '\u{2022}',
            headings: [
                HeadingStyle {
                    text: TextStyle::new(14.0, [30, 60, 120], 10.0, 4.0).bold(),
                    rule: Some([30, 60, 120]),
                },
                HeadingStyle {
                    text: TextStyle::new(12.0, [50, 50, 50], 8.0, 2.0).bold(),
                    rule: None,
                },
                HeadingStyle {
                    text: TextStyle::new(10.0, [70, 70, 70], 7.0, 1.0).bold(),
                    rule: None,
                },
            ],
            header: TextStyle::new(10.0, [100, 100, 100], 8.0, 4.0).bold(),
            header_rule: [200, 200, 200],
            footer: TextStyle::new(8.0, [150, 150, 150], 10.0, 0.0).italic(),
            footer_offset: 15.0 * MM,
            cover_title: TextStyle::new(28.0, [30, 60, 120], 15.0, 6.0).bold(),
            cover_subtitle: TextStyle::new(14.0, [80, 80, 80], 10.0, 20.0),
            cover_tagline: TextStyle::new(11.0, [120, 120, 120], 8.0, 0.0),
            cover_offset: 60.0 * MM,
            table: TableStyle::default(),
        }
    }
}

impl Theme {
    pub fn heading(&self, level: u8) -> &HeadingStyle {
        let idx = (level.clamp(1, 3) - 1) as usize;
        &self.headings[idx]
    }

    /// Switch every style to `family`, keeping weights and sizes.
    pub fn with_family(mut self, family: &str) -> Self {
        let fonts = [
            &mut self.body.font,
            &mut self.bullet.font,
            &mut self.header.font,
            &mut self.footer.font,
            &mut self.cover_title.font,
            &mut self.cover_subtitle.font,
            &mut self.cover_tagline.font,
            &mut self.table.header_font,
            &mut self.table.body_font,
        ];
        for font in fonts {
            font.family = family.to_string();
        }
        for heading in &mut self.headings {
            heading.text.font.family = family.to_string();
        }
        self
    }
}

#[derive(Clone, Debug, PartialEq)]
pub struct LayoutConfig {
    pub geometry: PageGeometry,
    pub theme: Theme,
    /// Token standing for the total page count in header/footer text.
    pub total_pages_alias: Option<String>,
    /// Running title, used by the standard header and the PDF info dictionary.
    pub title: String,
    /// Standard footer text: `{page}` is the current page number, `{total}`
    /// the page count. Independent of `total_pages_alias`.
    pub footer_format: String,
    /// Tagline lines printed under the cover subtitle.
    pub cover_taglines: Vec<String>,
}

impl Default for LayoutConfig {
    fn default() -> Self {
        Self {
            geometry: PageGeometry::default(),
            theme: Theme::default(),
            total_pages_alias: Some(DEFAULT_TOTAL_PAGES_ALIAS.to_string()),
            title: String::new(),
            footer_format: format!("Page {FOOTER_PAGE_KEY}/{FOOTER_TOTAL_KEY}"),
            cover_taglines: Vec::new(),
        }
    }
}

impl LayoutConfig {
    pub fn with_title(mut self, title: impl Into<String>) -> Self {
        self.title = title.into();
        self
    }

    pub fn with_geometry(mut self, geometry: PageGeometry) -> Self {
        self.geometry = geometry;
        self
    }

    pub fn with_margins(mut self, side: f32, top: f32, bottom: f32) -> Self {
        self.geometry.margin_left = side;
        self.geometry.margin_right = side;
        self.geometry.margin_top = top;
        self.geometry.break_margin = bottom;
        self
    }
}
