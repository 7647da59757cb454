use crate::fonts::TextMeasurer;
use crate::model::FontDescriptor;

#[derive(Clone, Debug, PartialEq)]
pub struct WrappedLine {
    pub text: String,
    pub width: f32,
    /// Set when the line is a single word wider than the target width.
    pub overflow: bool,
}

/// Greedy word wrap of `text` into lines no wider than `max_width`.
///
/// Words are separated by whitespace and rejoined with single spaces; `\n`
/// forces a break. A word that cannot fit on an empty line is emitted alone
/// on its own line and flagged as `overflow`, never split. The returned
/// iterator is lazy and can be restarted by cloning it before consumption.
pub fn wrap<'a>(
    text: &'a str,
    max_width: f32,
    font: &'a FontDescriptor,
    measurer: &'a dyn TextMeasurer,
) -> WrappedLines<'a> {
    WrappedLines {
        rest: text,
        max_width,
        font,
        measurer,
        done: false,
    }
}

pub struct WrappedLines<'a> {
    rest: &'a str,
    max_width: f32,
    font: &'a FontDescriptor,
    measurer: &'a dyn TextMeasurer,
    done: bool,
}

impl Clone for WrappedLines<'_> {
    fn clone(&self) -> Self {
        Self {
            rest: self.rest,
            max_width: self.max_width,
            font: self.font,
            measurer: self.measurer,
            done: self.done,
        }
    }
}

impl Iterator for WrappedLines<'_> {
    type Item = WrappedLine;

    fn next(&mut self) -> Option<WrappedLine> {
        if self.done {
            return None;
        }

        let (segment, after_break) = match self.rest.find('\n') {
            Some(i) => (&self.rest[..i], Some(&self.rest[i + 1..])),
            None => (self.rest, None),
        };

        let space_w = self.measurer.space_width(self.font);
        let mut text = String::new();
        let mut width = 0.0f32;
        let mut tail = segment;

        loop {
            let trimmed = tail.trim_start();
            if trimmed.is_empty() {
                break;
            }
            let end = trimmed.find(char::is_whitespace).unwrap_or(trimmed.len());
            let word = &trimmed[..end];
            let ww = self.measurer.text_width(word, self.font);

            if !text.is_empty() && width + space_w + ww > self.max_width {
                // Break before this word; the rest of the segment starts here.
                let consumed = segment.len() - trimmed.len();
                self.rest = &self.rest[consumed..];
                let overflow = width > self.max_width;
                return Some(WrappedLine {
                    text,
                    width,
                    overflow,
                });
            }

            if !text.is_empty() {
                text.push(' ');
                width += space_w;
            }
            text.push_str(word);
            width += ww;
            tail = &trimmed[end..];
        }

        match after_break {
            Some(rest) => self.rest = rest,
            None => self.done = true,
        }
        let overflow = width > self.max_width;
        Some(WrappedLine {
            text,
            width,
            overflow,
        })
    }
}
