mod blocks;
mod cursor;
mod pagination;
mod placeholder;
mod table;
mod wrap;

pub use blocks::{Bullet, ContentBlock, Heading, Paragraph, TableRow};
pub use cursor::PageCursor;
pub use pagination::{Furniture, FurnitureFn, LayoutState};
pub use placeholder::PlaceholderResolver;
pub use table::{Column, Table, band_fill};
pub use wrap::{WrappedLine, WrappedLines, wrap};
