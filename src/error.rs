use thiserror::Error;

#[derive(Debug, Error)]
pub enum Error {
    /// A single content block is taller than an empty page can hold.
    #[error("content block of {height:.1}pt exceeds the {available:.1}pt available on an empty page")]
    PageOverflow { height: f32, available: f32 },

    #[error("table row {row} has {found} cells, expected {expected}")]
    ColumnCountMismatch {
        row: usize,
        expected: usize,
        found: usize,
    },

    /// Placeholders were resolved against a page set that is not final.
    #[error("placeholder resolution out of order: {0}")]
    PlaceholderResolutionOrder(String),

    #[error("font error: {0}")]
    Font(String),

    #[error("markup error at line {line}: {message}")]
    Markup { line: usize, message: String },

    #[error("PDF error: {0}")]
    Pdf(String),

    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
}

pub type Result<T> = std::result::Result<T, Error>;
