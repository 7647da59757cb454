use std::collections::{HashMap, HashSet};

use pdf_writer::{Content, Filter, Name, Pdf, Rect, Ref, Str, TextStr};

use crate::config::LayoutConfig;
use crate::error::{Error, Result};
use crate::fonts::{EmbeddedFont, FontRegistry, embed_font};
use crate::model::{DrawOp, Page, Rgb};

fn set_fill(content: &mut Content, [r, g, b]: Rgb) {
    content.set_fill_rgb(r as f32 / 255.0, g as f32 / 255.0, b as f32 / 255.0);
}

fn set_stroke(content: &mut Content, [r, g, b]: Rgb) {
    content.set_stroke_rgb(r as f32 / 255.0, g as f32 / 255.0, b as f32 / 255.0);
}

/// Translate one page's operations into a content stream. Operations use a
/// top-down y axis; PDF user space grows upwards.
fn render_page(
    page: &Page,
    page_height: f32,
    fonts: &FontRegistry,
    embedded: &HashMap<String, EmbeddedFont>,
) -> Content {
    let mut content = Content::new();
    for op in &page.ops {
        match op {
            DrawOp::Rect {
                x,
                y,
                width,
                height,
                fill,
                stroke,
            } => {
                content.save_state();
                content.rect(*x, page_height - y - height, *width, *height);
                match (fill, stroke) {
                    (Some(f), Some(s)) => {
                        set_fill(&mut content, *f);
                        set_stroke(&mut content, *s);
                        content.set_line_width(0.2);
                        content.fill_nonzero_and_stroke();
                    }
                    (Some(f), None) => {
                        set_fill(&mut content, *f);
                        content.fill_nonzero();
                    }
                    (None, Some(s)) => {
                        set_stroke(&mut content, *s);
                        content.set_line_width(0.2);
                        content.stroke();
                    }
                    (None, None) => {
                        content.end_path();
                    }
                }
                content.restore_state();
            }
            DrawOp::Line {
                x1,
                y1,
                x2,
                y2,
                width,
                color,
            } => {
                content.save_state();
                set_stroke(&mut content, *color);
                content.set_line_width(*width);
                content.move_to(*x1, page_height - y1);
                content.line_to(*x2, page_height - y2);
                content.stroke();
                content.restore_state();
            }
            DrawOp::Text {
                x,
                y,
                text,
                font,
                color,
            } => {
                let key = fonts.resolved_key(font);
                let Some(entry) = embedded.get(&key) else {
                    continue;
                };
                content.begin_text();
                set_fill(&mut content, *color);
                content.set_font(Name(entry.pdf_name.as_bytes()), font.size);
                content.next_line(*x, page_height - y);
                content.show(Str(&entry.encode(text)));
                content.end_text();
            }
        }
    }
    content
}

/// Serialize finalized pages. This is the boundary to the output format; all
/// layout decisions have been made before it is called.
pub fn render(pages: &[Page], config: &LayoutConfig, fonts: &FontRegistry) -> Result<Vec<u8>> {
    if pages.is_empty() {
        return Err(Error::Pdf("document has no pages".into()));
    }
    let t0 = std::time::Instant::now();
    let mut pdf = Pdf::new();
    let mut next_id = 1i32;
    let mut alloc = || {
        let r = Ref::new(next_id);
        next_id += 1;
        r
    };

    let catalog_id = alloc();
    let pages_id = alloc();
    let info_id = alloc();

    // Phase 1: collect fonts in first-use order with the characters they draw
    let mut font_order: Vec<String> = Vec::new();
    let mut used_chars: HashMap<String, HashSet<char>> = HashMap::new();
    let mut key_fonts = HashMap::new();
    for op in pages.iter().flat_map(|p| p.ops.iter()) {
        if let DrawOp::Text { text, font, .. } = op {
            let key = fonts.resolved_key(font);
            if !used_chars.contains_key(&key) {
                font_order.push(key.clone());
                key_fonts.insert(key.clone(), font.clone());
            }
            used_chars.entry(key).or_default().extend(text.chars());
        }
    }

    let mut embedded: HashMap<String, EmbeddedFont> = HashMap::new();
    for (i, key) in font_order.iter().enumerate() {
        let face = fonts.face(&key_fonts[key]);
        let entry = embed_font(&mut pdf, face, format!("F{}", i + 1), &used_chars[key], &mut alloc);
        embedded.insert(key.clone(), entry);
    }
    let t_fonts = t0.elapsed();

    // Phase 2: one compressed content stream per page
    let page_height = config.geometry.height;
    let n = pages.len();
    let page_ids: Vec<Ref> = (0..n).map(|_| alloc()).collect();
    let content_ids: Vec<Ref> = (0..n).map(|_| alloc()).collect();

    for (i, page) in pages.iter().enumerate() {
        let raw = render_page(page, page_height, fonts, &embedded).finish();
        let compressed = miniz_oxide::deflate::compress_to_vec_zlib(raw.as_slice(), 6);
        pdf.stream(content_ids[i], &compressed)
            .filter(Filter::FlateDecode);
    }

    // Phase 3: document structure
    pdf.catalog(catalog_id).pages(pages_id);
    pdf.pages(pages_id)
        .kids(page_ids.iter().copied())
        .count(n as i32);

    let font_pairs: Vec<(String, Ref)> = font_order
        .iter()
        .map(|key| (embedded[key].pdf_name.clone(), embedded[key].font_ref))
        .collect();

    for i in 0..n {
        let mut page = pdf.page(page_ids[i]);
        page.media_box(Rect::new(0.0, 0.0, config.geometry.width, page_height))
            .parent(pages_id)
            .contents(content_ids[i]);
        let mut resources = page.resources();
        let mut font_dict = resources.fonts();
        for (name, font_ref) in &font_pairs {
            font_dict.pair(Name(name.as_bytes()), *font_ref);
        }
    }

    {
        let mut info = pdf.document_info(info_id);
        if !config.title.is_empty() {
            info.title(TextStr(&config.title));
        }
        info.producer(TextStr(concat!("flowdoc-pdf ", env!("CARGO_PKG_VERSION"))));
    }

    log::info!(
        "PDF phases: fonts={:.1}ms, pages+structure={:.1}ms ({} pages, {} fonts)",
        t_fonts.as_secs_f64() * 1000.0,
        (t0.elapsed() - t_fonts).as_secs_f64() * 1000.0,
        n,
        font_order.len(),
    );

    Ok(pdf.finish())
}
