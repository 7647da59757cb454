/// 8-bit RGB color.
pub type Rgb = [u8; 3];

pub const BLACK: Rgb = [0, 0, 0];
pub const WHITE: Rgb = [255, 255, 255];

#[derive(Clone, Copy, Debug, Default, PartialEq)]
pub enum Alignment {
    #[default]
    Left,
    Center,
    Right,
}

#[derive(Clone, Debug, PartialEq)]
pub struct FontDescriptor {
    pub family: String,
    pub bold: bool,
    pub italic: bool,
    pub size: f32, // points
}

impl FontDescriptor {
    pub fn new(family: impl Into<String>, size: f32) -> Self {
        Self {
            family: family.into(),
            bold: false,
            italic: false,
            size,
        }
    }

    pub fn bold(mut self) -> Self {
        self.bold = true;
        self
    }

    pub fn italic(mut self) -> Self {
        self.italic = true;
        self
    }

    /// Registry key: family plus a style suffix (`/B`, `/I`, `/BI`).
    pub fn key(&self) -> String {
        font_key(&self.family, self.bold, self.italic)
    }
}

pub(crate) fn font_key(family: &str, bold: bool, italic: bool) -> String {
    let base = family.trim().to_lowercase();
    match (bold, italic) {
        (true, true) => format!("{}/BI", base),
        (true, false) => format!("{}/B", base),
        (false, true) => format!("{}/I", base),
        (false, false) => base,
    }
}

/// Fixed page dimensions and margins. `break_margin` is the reserved band at
/// the bottom of the page where footers live; body content never enters it.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct PageGeometry {
    pub width: f32,
    pub height: f32,
    pub margin_left: f32,
    pub margin_top: f32,
    pub margin_right: f32,
    pub break_margin: f32,
}

impl PageGeometry {
    pub fn usable_width(&self) -> f32 {
        self.width - self.margin_left - self.margin_right
    }

    /// y coordinate (top-down) at which content must stop.
    pub fn break_line(&self) -> f32 {
        self.height - self.break_margin
    }
}

/// A resolved drawing operation. Coordinates are top-down: `y` grows towards
/// the bottom of the page. Text `y` is the baseline.
#[derive(Clone, Debug, PartialEq)]
pub enum DrawOp {
    Text {
        x: f32,
        y: f32,
        text: String,
        font: FontDescriptor,
        color: Rgb,
    },
    Line {
        x1: f32,
        y1: f32,
        x2: f32,
        y2: f32,
        width: f32,
        color: Rgb,
    },
    Rect {
        x: f32,
        y: f32,
        width: f32,
        height: f32,
        fill: Option<Rgb>,
        stroke: Option<Rgb>,
    },
}

/// A finalized page: every value is known, nothing left to substitute.
#[derive(Clone, Debug, PartialEq)]
pub struct Page {
    pub number: usize, // 1-based
    pub ops: Vec<DrawOp>,
}

impl Page {
    /// Text runs in drawing order.
    pub fn texts(&self) -> impl Iterator<Item = &str> {
        self.ops.iter().filter_map(|op| match op {
            DrawOp::Text { text, .. } => Some(text.as_str()),
            _ => None,
        })
    }

    pub fn contains_text(&self, needle: &str) -> bool {
        self.texts().any(|t| t.contains(needle))
    }

    /// Filled rectangles, in drawing order.
    pub fn fills(&self) -> impl Iterator<Item = (f32, Rgb)> + '_ {
        self.ops.iter().filter_map(|op| match op {
            DrawOp::Rect {
                y, fill: Some(c), ..
            } => Some((*y, *c)),
            _ => None,
        })
    }
}

/// Piece of furniture text whose value may not be known until every page exists.
#[derive(Clone, Debug, PartialEq)]
pub enum TextPiece {
    Literal(String),
    TotalPages,
}

#[derive(Clone, Debug, Default, PartialEq)]
pub struct DraftText {
    pub pieces: Vec<TextPiece>,
}

impl DraftText {
    pub fn literal(text: impl Into<String>) -> Self {
        Self {
            pieces: vec![TextPiece::Literal(text.into())],
        }
    }

    /// Split `text` at every occurrence of `alias`, turning each into a
    /// `TotalPages` piece. With no alias the text stays a single literal.
    pub fn tokenize(text: &str, alias: Option<&str>) -> Self {
        let Some(alias) = alias.filter(|a| !a.is_empty()) else {
            return Self::literal(text);
        };
        let mut pieces = Vec::new();
        let mut rest = text;
        while let Some(pos) = rest.find(alias) {
            if pos > 0 {
                pieces.push(TextPiece::Literal(rest[..pos].to_string()));
            }
            pieces.push(TextPiece::TotalPages);
            rest = &rest[pos + alias.len()..];
        }
        if !rest.is_empty() || pieces.is_empty() {
            pieces.push(TextPiece::Literal(rest.to_string()));
        }
        Self { pieces }
    }

    pub fn push(&mut self, piece: TextPiece) -> &mut Self {
        self.pieces.push(piece);
        self
    }

    pub fn is_deferred(&self) -> bool {
        self.pieces.iter().any(|p| matches!(p, TextPiece::TotalPages))
    }

    pub fn render(&self, total_pages: usize) -> String {
        let mut out = String::new();
        for piece in &self.pieces {
            match piece {
                TextPiece::Literal(s) => out.push_str(s),
                TextPiece::TotalPages => out.push_str(&total_pages.to_string()),
            }
        }
        out
    }
}

/// Drawing operation as recorded during composition.
#[derive(Clone, Debug, PartialEq)]
pub enum DraftOp {
    Draw(DrawOp),
    /// Text that may contain deferred pieces. When `align_box` is set the text
    /// is positioned inside `(x, width)` once its final width is known.
    Text {
        x: f32,
        y: f32,
        text: DraftText,
        font: FontDescriptor,
        color: Rgb,
        align_box: Option<(f32, Alignment)>,
    },
}

#[derive(Clone, Debug, PartialEq)]
pub struct PageDraft {
    pub number: usize,
    pub ops: Vec<DraftOp>,
    pub closed: bool,
}

impl PageDraft {
    pub fn new(number: usize) -> Self {
        Self {
            number,
            ops: Vec::new(),
            closed: false,
        }
    }

    pub fn draw(&mut self, op: DrawOp) {
        self.ops.push(DraftOp::Draw(op));
    }
}
