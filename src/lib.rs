pub mod config;
mod document;
mod error;
mod fonts;
pub mod layout;
pub mod markup;
pub mod model;
mod pdf;

pub use config::{HeadingStyle, LayoutConfig, MM, TableStyle, TextStyle, Theme};
pub use document::{ComposedDocument, Document};
pub use error::{Error, Result};
pub use fonts::{FontRegistry, TextMeasurer};
pub use layout::{Column, Furniture, Table};
pub use model::{Alignment, DrawOp, FontDescriptor, Page, PageGeometry, Rgb};

use std::path::Path;
use std::time::Instant;

/// Lay out markup source and serialize it. A `= title` line in the source
/// is used when `config.title` is empty.
pub fn render_markup(source: &str, config: LayoutConfig, fonts: &FontRegistry) -> Result<Vec<u8>> {
    let t0 = Instant::now();

    let parsed = markup::parse(source)?;
    let t_parse = t0.elapsed();

    let config = match parsed.title {
        Some(title) if config.title.is_empty() => config.with_title(title),
        _ => config,
    };
    let mut doc = Document::open(config, fonts);
    doc.use_standard_furniture();
    markup::apply(&parsed.items, &mut doc)?;
    let composed = doc.close();
    let t_layout = t0.elapsed();

    let bytes = composed.to_pdf()?;
    let t_total = t0.elapsed();

    log::info!(
        "Timing: parse={:.1}ms, layout={:.1}ms, render={:.1}ms, total={:.1}ms ({} pages, {} bytes)",
        t_parse.as_secs_f64() * 1000.0,
        (t_layout - t_parse).as_secs_f64() * 1000.0,
        (t_total - t_layout).as_secs_f64() * 1000.0,
        t_total.as_secs_f64() * 1000.0,
        composed.page_count(),
        bytes.len(),
    );

    Ok(bytes)
}

pub fn convert_markup_to_pdf(
    input: &Path,
    output: &Path,
    config: LayoutConfig,
    fonts: &FontRegistry,
) -> Result<()> {
    let source = std::fs::read_to_string(input)?;
    let bytes = render_markup(&source, config, fonts)?;
    std::fs::write(output, &bytes)?;
    log::info!("wrote {}", output.display());
    Ok(())
}
