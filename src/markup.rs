//! Line-oriented content markup feeding the document assembler.
//!
//! ```text
//! = Running title
//! !cover Title | Subtitle
//! !page
//! # Chapter
//! ## Section
//! ### Subsection
//! Paragraph text, consecutive lines
//! are joined with a space.
//! - Bullet item
//!   continued on an indented line
//! |= Role:30 | Description:90 | Permission:55
//! | admin | Full access | all |
//! ```
//!
//! Table column widths are in millimetres.

use crate::config::MM;
use crate::document::Document;
use crate::error::{Error, Result};
use crate::layout::Column;

#[derive(Clone, Debug, PartialEq)]
pub enum Item {
    Cover {
        title: String,
        subtitle: Option<String>,
    },
    PageBreak,
    Heading {
        level: u8,
        text: String,
    },
    Paragraph(String),
    Bullet(String),
    Table {
        columns: Vec<Column>,
        rows: Vec<Vec<String>>,
    },
}

#[derive(Clone, Debug, Default, PartialEq)]
pub struct Markup {
    pub title: Option<String>,
    pub items: Vec<Item>,
}

fn markup_err(line: usize, message: impl Into<String>) -> Error {
    Error::Markup {
        line,
        message: message.into(),
    }
}

fn split_cells(line: &str) -> Vec<String> {
    let inner = line.trim();
    let inner = inner.strip_prefix('|').unwrap_or(inner);
    let inner = inner.strip_suffix('|').unwrap_or(inner);
    inner.split('|').map(|c| c.trim().to_string()).collect()
}

fn parse_column(cell: &str, line: usize) -> Result<Column> {
    let (header, width) = cell
        .rsplit_once(':')
        .ok_or_else(|| markup_err(line, format!("column {cell:?} has no width (expected Name:mm)")))?;
    let width: f32 = width
        .trim()
        .parse()
        .map_err(|_| markup_err(line, format!("invalid column width {:?}", width.trim())))?;
    if !(width > 0.0) {
        return Err(markup_err(line, format!("column width must be positive, got {width}")));
    }
    Ok(Column::new(header.trim(), width * MM))
}

/// What the line currently being accumulated belongs to.
enum Open {
    None,
    Paragraph(String),
    Bullet(String),
    Table(Vec<Column>, Vec<Vec<String>>),
}

impl Open {
    fn flush(&mut self, items: &mut Vec<Item>) {
        match std::mem::replace(self, Open::None) {
            Open::None => {}
            Open::Paragraph(text) => items.push(Item::Paragraph(text)),
            Open::Bullet(text) => items.push(Item::Bullet(text)),
            Open::Table(columns, rows) => items.push(Item::Table { columns, rows }),
        }
    }
}

pub fn parse(source: &str) -> Result<Markup> {
    let mut markup = Markup::default();
    let mut open = Open::None;

    for (idx, raw) in source.lines().enumerate() {
        let line_no = idx + 1;
        let line = raw.trim_end();
        let trimmed = line.trim_start();

        if trimmed.is_empty() {
            open.flush(&mut markup.items);
            continue;
        }

        if let Some(header) = trimmed.strip_prefix("|=") {
            open.flush(&mut markup.items);
            let columns = split_cells(header)
                .iter()
                .map(|c| parse_column(c, line_no))
                .collect::<Result<Vec<_>>>()?;
            open = Open::Table(columns, Vec::new());
            continue;
        }

        if trimmed.starts_with('|') {
            match &mut open {
                Open::Table(_, rows) => rows.push(split_cells(trimmed)),
                _ => return Err(markup_err(line_no, "table row without a |= header line")),
            }
            continue;
        }

        // Indented continuation of a bullet item
        if line.starts_with("  ") {
            if let Open::Bullet(text) = &mut open {
                text.push(' ');
                text.push_str(trimmed);
                continue;
            }
        }

        if let Some(title) = trimmed.strip_prefix("= ") {
            open.flush(&mut markup.items);
            markup.title = Some(title.trim().to_string());
        } else if let Some(rest) = trimmed
            .strip_prefix("!cover")
            .filter(|rest| rest.is_empty() || rest.starts_with(char::is_whitespace))
        {
            open.flush(&mut markup.items);
            let (title, subtitle) = match rest.split_once('|') {
                Some((t, s)) => (t.trim(), Some(s.trim().to_string()).filter(|s| !s.is_empty())),
                None => (rest.trim(), None),
            };
            if title.is_empty() {
                return Err(markup_err(line_no, "!cover needs a title"));
            }
            markup.items.push(Item::Cover {
                title: title.to_string(),
                subtitle,
            });
        } else if trimmed == "!page" {
            open.flush(&mut markup.items);
            markup.items.push(Item::PageBreak);
        } else if trimmed.starts_with('!') {
            return Err(markup_err(line_no, format!("unknown directive {trimmed:?}")));
        } else if trimmed.starts_with('#') {
            open.flush(&mut markup.items);
            let level = trimmed.chars().take_while(|&c| c == '#').count();
            if level > 3 {
                return Err(markup_err(line_no, "headings go down to ### only"));
            }
            let text = trimmed[level..].trim();
            if text.is_empty() {
                return Err(markup_err(line_no, "empty heading"));
            }
            markup.items.push(Item::Heading {
                level: level as u8,
                text: text.to_string(),
            });
        } else if let Some(text) = trimmed.strip_prefix("- ").or_else(|| trimmed.strip_prefix("* ")) {
            open.flush(&mut markup.items);
            open = Open::Bullet(text.trim().to_string());
        } else {
            match &mut open {
                Open::Paragraph(text) => {
                    text.push(' ');
                    text.push_str(trimmed);
                }
                _ => {
                    open.flush(&mut markup.items);
                    open = Open::Paragraph(trimmed.to_string());
                }
            }
        }
    }
    open.flush(&mut markup.items);
    Ok(markup)
}

/// Height of the start of `next` that a heading must keep with it.
fn lookahead(next: Option<&Item>, doc: &Document<'_>) -> f32 {
    let theme = &doc.config().theme;
    match next {
        Some(Item::Table { rows, .. }) => theme.table.lead_height(rows.len()),
        Some(Item::Bullet(_)) => theme.bullet.line_height,
        _ => theme.body.line_height,
    }
}

/// Feed parsed items to the assembler in document order.
pub fn apply(items: &[Item], doc: &mut Document<'_>) -> Result<()> {
    for (index, item) in items.iter().enumerate() {
        match item {
            Item::Cover { title, subtitle } => doc.add_cover(title, subtitle.as_deref())?,
            Item::PageBreak => doc.add_page(),
            Item::Heading { level, text } => {
                let keep = lookahead(items.get(index + 1), doc);
                doc.add_heading_keeping(text, *level, keep)?
            }
            Item::Paragraph(text) => doc.add_paragraph(text)?,
            Item::Bullet(text) => doc.add_bullet(text)?,
            Item::Table { columns, rows } => doc.add_table(columns.clone(), rows.clone())?,
        }
    }
    Ok(())
}
