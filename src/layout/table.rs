use crate::config::TableStyle;
use crate::error::{Error, Result};
use crate::fonts::TextMeasurer;
use crate::model::Rgb;

use super::blocks::{ContentBlock, TableRow};
use super::pagination::LayoutState;

#[derive(Clone, Debug, PartialEq)]
pub struct Column {
    pub header: String,
    pub width: f32, // points
}

impl Column {
    pub fn new(header: impl Into<String>, width: f32) -> Self {
        Self {
            header: header.into(),
            width,
        }
    }
}

/// Fill of body row `index`: odd rows are banded, even rows are left unfilled.
/// A pure function of the index, so a table renders the same way every time.
pub fn band_fill(index: usize, band: Rgb) -> Option<Rgb> {
    (index % 2 == 1).then_some(band)
}

/// Table with fixed column widths, a filled header row and banded body rows.
#[derive(Clone, Debug)]
pub struct Table {
    pub columns: Vec<Column>,
    pub rows: Vec<Vec<String>>,
    pub style: TableStyle,
    /// Draw the header row again at the top of every continuation page.
    pub repeat_header: bool,
}

impl Table {
    pub fn new(columns: Vec<Column>, style: TableStyle) -> Self {
        Self {
            columns,
            rows: Vec::new(),
            style,
            repeat_header: true,
        }
    }

    pub fn with_rows(mut self, rows: Vec<Vec<String>>) -> Self {
        self.rows = rows;
        self
    }

    pub fn push_row<S: Into<String>>(&mut self, cells: impl IntoIterator<Item = S>) {
        self.rows.push(cells.into_iter().map(Into::into).collect());
    }

    pub fn width(&self) -> f32 {
        self.columns.iter().map(|c| c.width).sum()
    }

    fn widths(&self) -> Vec<f32> {
        self.columns.iter().map(|c| c.width).collect()
    }

    /// Check every row's arity. Runs before anything is drawn.
    pub fn validate(&self) -> Result<()> {
        let expected = self.columns.len();
        match self
            .rows
            .iter()
            .enumerate()
            .find(|(_, cells)| cells.len() != expected)
        {
            Some((row, cells)) => Err(Error::ColumnCountMismatch {
                row,
                expected,
                found: cells.len(),
            }),
            None => Ok(()),
        }
    }

    pub fn header_row(&self) -> TableRow {
        let s = &self.style;
        TableRow {
            cells: self.columns.iter().map(|c| c.header.clone()).collect(),
            widths: self.widths(),
            height: s.header_height,
            font: s.header_font.clone(),
            text_color: s.header_text,
            fill: Some(s.header_fill),
            border: s.border,
            padding: s.cell_padding,
            keep_with_next: s.lead_height(self.rows.len()) - s.header_height,
        }
    }

    pub fn body_row(&self, index: usize) -> Result<TableRow> {
        let s = &self.style;
        let cells = self.rows.get(index).cloned().unwrap_or_default();
        let mut row = TableRow::new(
            index,
            cells,
            self.widths(),
            s.row_height,
            s.body_font.clone(),
            s.body_text,
        )?;
        row.fill = band_fill(index, s.band_fill);
        row.border = s.border;
        row.padding = s.cell_padding;
        Ok(row)
    }

    /// Lay the table out through the paginator: header kept together with
    /// the first row, header repeated after each page break.
    pub fn render(&self, state: &mut LayoutState, measurer: &dyn TextMeasurer) -> Result<()> {
        self.validate()?;
        let header = ContentBlock::TableRow(self.header_row());
        state.place(&header, measurer)?;

        for index in 0..self.rows.len() {
            let row = self.body_row(index)?;
            if !state.will_fit(row.height) {
                state.break_page();
                if self.repeat_header {
                    state.place(&header, measurer)?;
                }
            }
            state.place(&ContentBlock::TableRow(row), measurer)?;
        }
        state.line_feed(self.style.space_after);
        log::debug!(
            "table: {} columns, {} rows, ends on page {}",
            self.columns.len(),
            self.rows.len(),
            state.page_number()
        );
        Ok(())
    }
}
