use std::collections::{HashMap, HashSet};
use std::path::Path;

use pdf_writer::{Name, Pdf, Rect, Ref};
use ttf_parser::Face;

use crate::error::{Error, Result};
use crate::model::{FontDescriptor, font_key};

/// Width measurement seam between the layout engine and the glyph backend.
pub trait TextMeasurer {
    /// Advance width of `text` in points, without kerning.
    fn text_width(&self, text: &str, font: &FontDescriptor) -> f32;

    fn space_width(&self, font: &FontDescriptor) -> f32 {
        self.text_width(" ", font)
    }
}

/// Width used for characters the face has no glyph for, in 1000-units.
const MISSING_GLYPH_WIDTH: f32 = 500.0;

/// Unicode ranges cached per TrueType face: Latin, Latin Extended, general
/// punctuation, currency, arrows and geometric shapes.
const CACHED_RANGES: &[(u32, u32)] = &[
    (0x0020, 0x02FF),
    (0x2000, 0x206F),
    (0x20A0, 0x20CF),
    (0x2100, 0x215F),
    (0x2190, 0x21FF),
    (0x25A0, 0x25FF),
];

pub(crate) struct FontFace {
    pub(crate) base_font: String,
    pub(crate) widths_1000: Vec<f32>,
    pub(crate) char_widths_1000: Option<HashMap<char, f32>>,
    /// TrueType program; `None` for the built-in Helvetica family.
    pub(crate) data: Option<Vec<u8>>,
}

impl FontFace {
    /// Width of a single character in 1000-units. Uses the per-char cache when
    /// the face is a TrueType font, falls back to the WinAnsi table.
    pub(crate) fn char_width_1000(&self, ch: char) -> f32 {
        if let Some(ref map) = self.char_widths_1000 {
            if let Some(&w) = map.get(&ch) {
                return w;
            }
        }
        let byte = char_to_winansi(ch);
        if byte >= 32 {
            self.widths_1000[(byte - 32) as usize]
        } else {
            MISSING_GLYPH_WIDTH
        }
    }

    pub(crate) fn word_width(&self, word: &str, font_size: f32) -> f32 {
        word.chars()
            .map(|ch| self.char_width_1000(ch) * font_size / 1000.0)
            .sum()
    }

    fn builtin(base_font: &str) -> Self {
        Self {
            base_font: base_font.to_string(),
            widths_1000: helvetica_widths(),
            char_widths_1000: None,
            data: None,
        }
    }

    fn from_truetype(family: &str, data: Vec<u8>) -> Result<Self> {
        let (widths_1000, char_widths_1000) = {
            let face = Face::parse(&data, 0)
                .map_err(|e| Error::Font(format!("{family}: {e}")))?;
            let units = face.units_per_em() as f32;
            let advance = |ch: char| {
                face.glyph_index(ch)
                    .and_then(|gid| face.glyph_hor_advance(gid))
                    .map(|adv| adv as f32 / units * 1000.0)
            };

            let widths: Vec<f32> = (32u8..=255u8)
                .map(|byte| advance(winansi_to_char(byte)).unwrap_or(0.0))
                .collect();

            let mut char_widths = HashMap::new();
            for &(start, end) in CACHED_RANGES {
                for ch in (start..=end).filter_map(char::from_u32) {
                    if let Some(w) = advance(ch) {
                        char_widths.insert(ch, w);
                    }
                }
            }
            (widths, char_widths)
        };

        Ok(Self {
            base_font: family.replace(' ', ""),
            widths_1000,
            char_widths_1000: Some(char_widths_1000),
            data: Some(data),
        })
    }
}

/// Fonts known to a document, keyed by family and style.
///
/// The Helvetica family is always available with approximate metrics and maps
/// to the PDF base-14 fonts. Unknown families fall back to Helvetica in the
/// requested style.
pub struct FontRegistry {
    faces: HashMap<String, FontFace>,
}

impl Default for FontRegistry {
    fn default() -> Self {
        Self::new()
    }
}

impl FontRegistry {
    pub fn new() -> Self {
        let mut faces = HashMap::new();
        for (bold, italic, base) in [
            (false, false, "Helvetica"),
            (true, false, "Helvetica-Bold"),
            (false, true, "Helvetica-Oblique"),
            (true, true, "Helvetica-BoldOblique"),
        ] {
            faces.insert(font_key("helvetica", bold, italic), FontFace::builtin(base));
        }
        Self { faces }
    }

    /// Register a TrueType/OpenType face for `family` in the given style.
    pub fn register_ttf(
        &mut self,
        family: &str,
        bold: bool,
        italic: bool,
        data: Vec<u8>,
    ) -> Result<()> {
        let face = FontFace::from_truetype(family, data)?;
        log::debug!(
            "register_ttf: {family} bold={bold} italic={italic} ({} cached glyph widths)",
            face.char_widths_1000.as_ref().map_or(0, |m| m.len())
        );
        self.faces.insert(font_key(family, bold, italic), face);
        Ok(())
    }

    pub fn register_ttf_file(
        &mut self,
        family: &str,
        bold: bool,
        italic: bool,
        path: &Path,
    ) -> Result<()> {
        let data = std::fs::read(path).map_err(|e| {
            Error::Io(std::io::Error::new(
                e.kind(),
                format!("{}: {}", e, path.display()),
            ))
        })?;
        self.register_ttf(family, bold, italic, data)
    }

    /// Resolve a descriptor to a face: exact match, then the family's regular
    /// face, then Helvetica in the requested style.
    pub(crate) fn face(&self, font: &FontDescriptor) -> &FontFace {
        self.faces
            .get(&font.key())
            .or_else(|| self.faces.get(&font_key(&font.family, false, false)))
            .or_else(|| self.faces.get(&font_key("helvetica", font.bold, font.italic)))
            .unwrap_or_else(|| &self.faces[&font_key("helvetica", false, false)])
    }

    /// Key of the face `font` actually resolves to.
    pub(crate) fn resolved_key(&self, font: &FontDescriptor) -> String {
        [
            font.key(),
            font_key(&font.family, false, false),
            font_key("helvetica", font.bold, font.italic),
        ]
        .into_iter()
        .find(|k| self.faces.contains_key(k))
        .unwrap_or_else(|| font_key("helvetica", false, false))
    }
}

impl TextMeasurer for FontRegistry {
    fn text_width(&self, text: &str, font: &FontDescriptor) -> f32 {
        self.face(font).word_width(text, font.size)
    }
}

/// Windows-1252 (WinAnsi) byte to Unicode char mapping.
/// Bytes 0x80-0x9F are remapped; all others map directly to their Unicode codepoint.
fn winansi_to_char(byte: u8) -> char {
    match byte {
        0x80 => '\u{20AC}',
        0x82 => '\u{201A}',
        0x83 => '\u{0192}',
        0x84 => '\u{201E}',
        0x85 => '\u{2026}',
        0x86 => '\u{2020}',
        0x87 => '\u{2021}',
        0x88 => '\u{02C6}',
        0x89 => '\u{2030}',
        0x8A => '\u{0160}',
        0x8B => '\u{2039}',
        0x8C => '\u{0152}',
        0x8E => '\u{017D}',
        0x91 => '\u{2018}',
        0x92 => '\u{2019}',
        0x93 => '\u{201C}',
        0x94 => '\u{201D}',
        0x95 => '\u{2022}', // bullet
        0x96 => '\u{2013}',
        0x97 => '\u{2014}',
        0x98 => '\u{02DC}',
        0x99 => '\u{2122}',
        0x9A => '\u{0161}',
        0x9B => '\u{203A}',
        0x9C => '\u{0153}',
        0x9E => '\u{017E}',
        0x9F => '\u{0178}',
        _ => byte as char,
    }
}

/// Map a single Unicode char to its WinAnsi byte, or 0 if unmappable.
fn char_to_winansi(c: char) -> u8 {
    match c as u32 {
        0x0020..=0x007F => c as u8,
        0x00A0..=0x00FF => c as u8,
        0x20AC => 0x80,
        0x201A => 0x82,
        0x0192 => 0x83,
        0x201E => 0x84,
        0x2026 => 0x85,
        0x2020 => 0x86,
        0x2021 => 0x87,
        0x02C6 => 0x88,
        0x2030 => 0x89,
        0x0160 => 0x8A,
        0x2039 => 0x8B,
        0x0152 => 0x8C,
        0x017D => 0x8E,
        0x2018 => 0x91,
        0x2019 => 0x92,
        0x201C => 0x93,
        0x201D => 0x94,
        0x2022 => 0x95,
        0x2013 => 0x96,
        0x2014 => 0x97,
        0x02DC => 0x98,
        0x2122 => 0x99,
        0x0161 => 0x9A,
        0x203A => 0x9B,
        0x0153 => 0x9C,
        0x017E => 0x9E,
        0x0178 => 0x9F,
        _ => 0,
    }
}

/// Convert a UTF-8 string to WinAnsi (Windows-1252) bytes for PDF Str encoding.
/// Unmappable characters become `?`.
pub(crate) fn to_winansi_bytes(s: &str) -> Vec<u8> {
    s.chars()
        .map(|c| match char_to_winansi(c) {
            0 => b'?',
            b => b,
        })
        .collect()
}

/// Encode UTF-8 text as big-endian 2-byte glyph IDs for CIDFont content streams.
pub(crate) fn encode_as_gids(text: &str, char_to_gid: &HashMap<char, u16>) -> Vec<u8> {
    let mut out = Vec::with_capacity(text.len() * 2);
    for ch in text.chars() {
        let gid = char_to_gid.get(&ch).copied().unwrap_or(0);
        out.push((gid >> 8) as u8);
        out.push((gid & 0xFF) as u8);
    }
    out
}

/// Approximate Helvetica widths at 1000 units/em for WinAnsi chars 32..=255.
fn helvetica_widths() -> Vec<f32> {
    (32u8..=255u8)
        .map(|b| match b {
            32 => 278.0,                          // space
            33..=47 => 333.0,                     // punctuation
            48..=57 => 556.0,                     // digits
            58..=64 => 333.0,                     // more punctuation
            73 | 74 => 278.0,                     // I J (narrow uppercase)
            77 => 833.0,                          // M (wide)
            65..=90 => 667.0,                     // uppercase A-Z (average)
            91..=96 => 333.0,                     // brackets etc.
            102 | 105 | 106 | 108 | 116 => 278.0, // narrow lowercase: f i j l t
            109 | 119 => 833.0,                   // m w (wide)
            97..=122 => 556.0,                    // lowercase a-z (average)
            0x95 => 350.0,                        // bullet
            _ => 556.0,
        })
        .collect()
}

/// A face as written into the PDF.
pub(crate) struct EmbeddedFont {
    pub(crate) pdf_name: String,
    pub(crate) font_ref: Ref,
    /// Glyph remapping for CID fonts; `None` means WinAnsi-encoded Type1.
    pub(crate) char_to_gid: Option<HashMap<char, u16>>,
}

impl EmbeddedFont {
    pub(crate) fn encode(&self, text: &str) -> Vec<u8> {
        match &self.char_to_gid {
            Some(map) => encode_as_gids(text, map),
            None => to_winansi_bytes(text),
        }
    }
}

/// Write `face` into `pdf`, subsetting TrueType programs to `used_chars`.
pub(crate) fn embed_font(
    pdf: &mut Pdf,
    face: &FontFace,
    pdf_name: String,
    used_chars: &HashSet<char>,
    alloc: &mut impl FnMut() -> Ref,
) -> EmbeddedFont {
    let t0 = std::time::Instant::now();
    let font_ref = alloc();

    let char_to_gid = face.data.as_ref().and_then(|data| {
        let embedded = embed_truetype(pdf, font_ref, &face.base_font, data, used_chars, alloc);
        if embedded.is_none() {
            log::warn!("Embedding {} failed, using Helvetica", face.base_font);
        }
        embedded
    });

    if char_to_gid.is_none() {
        let base = if face.data.is_some() {
            "Helvetica"
        } else {
            face.base_font.as_str()
        };
        pdf.type1_font(font_ref)
            .base_font(Name(base.as_bytes()))
            .encoding_predefined(Name(b"WinAnsiEncoding"));
    }

    log::debug!(
        "embed_font: {} as {pdf_name} ({} chars) in {:.1}ms",
        face.base_font,
        used_chars.len(),
        t0.elapsed().as_secs_f64() * 1000.0,
    );

    EmbeddedFont {
        pdf_name,
        font_ref,
        char_to_gid,
    }
}

/// Embed a TrueType/OpenType font as a CIDFont (Type0 composite) with Identity-H encoding.
/// The font data is subsetted to only include glyphs used in the document.
fn embed_truetype(
    pdf: &mut Pdf,
    font_ref: Ref,
    font_name: &str,
    font_data: &[u8],
    used_chars: &HashSet<char>,
    alloc: &mut impl FnMut() -> Ref,
) -> Option<HashMap<char, u16>> {
    let face = Face::parse(font_data, 0).ok()?;
    let descriptor_ref = alloc();
    let data_ref = alloc();

    let units = face.units_per_em() as f32;
    let ascent = face.ascender() as f32 / units * 1000.0;
    let descent = face.descender() as f32 / units * 1000.0;
    let cap_height = face
        .capital_height()
        .map(|h| h as f32 / units * 1000.0)
        .unwrap_or(700.0);

    let bb = face.global_bounding_box();
    let bbox = Rect::new(
        bb.x_min as f32 / units * 1000.0,
        bb.y_min as f32 / units * 1000.0,
        bb.x_max as f32 / units * 1000.0,
        bb.y_max as f32 / units * 1000.0,
    );

    let mut remapper = subsetter::GlyphRemapper::new();
    let mut char_to_gid = HashMap::new();
    let mut gid_widths: Vec<(u16, f32)> = Vec::new();
    for &ch in used_chars {
        match face.glyph_index(ch) {
            Some(gid) => {
                let new_gid = remapper.remap(gid.0);
                char_to_gid.insert(ch, new_gid);
                let w = face
                    .glyph_hor_advance(gid)
                    .map(|adv| adv as f32 / units * 1000.0)
                    .unwrap_or(0.0);
                gid_widths.push((new_gid, w));
            }
            None if !ch.is_whitespace() => {
                log::warn!("{font_name}: no glyph for {ch:?}");
            }
            None => {}
        }
    }

    let subset_data = subsetter::subset(font_data, 0, &remapper).unwrap_or_else(|e| {
        log::warn!("Font subsetting failed for {font_name}: {e}, embedding full font");
        font_data.to_vec()
    });

    let data_len = i32::try_from(subset_data.len()).ok()?;
    pdf.stream(data_ref, &subset_data)
        .pair(Name(b"Length1"), data_len);

    let ps_name = font_name.replace(' ', "");

    pdf.font_descriptor(descriptor_ref)
        .name(Name(ps_name.as_bytes()))
        .flags(pdf_writer::types::FontFlags::NON_SYMBOLIC)
        .bbox(bbox)
        .italic_angle(0.0)
        .ascent(ascent)
        .descent(descent)
        .cap_height(cap_height)
        .stem_v(80.0)
        .font_file2(data_ref);

    let cid_font_ref = alloc();
    let system_info = pdf_writer::types::SystemInfo {
        registry: pdf_writer::Str(b"Adobe"),
        ordering: pdf_writer::Str(b"Identity"),
        supplement: 0,
    };
    {
        let mut cid = pdf.cid_font(cid_font_ref);
        cid.subtype(pdf_writer::types::CidFontType::Type2);
        cid.base_font(Name(ps_name.as_bytes()));
        cid.system_info(system_info);
        cid.font_descriptor(descriptor_ref);
        cid.default_width(0.0);
        cid.cid_to_gid_map_predefined(Name(b"Identity"));
        gid_widths.sort_by_key(|&(gid, _)| gid);
        gid_widths.dedup_by_key(|&mut (gid, _)| gid);
        if !gid_widths.is_empty() {
            let mut w = cid.widths();
            for &(gid, width) in &gid_widths {
                w.consecutive(gid, [width]);
            }
        }
    }

    let tounicode_ref = alloc();
    let cmap_name = format!("{}-UTF16", ps_name);
    let mut cmap = pdf_writer::types::UnicodeCmap::new(
        Name(cmap_name.as_bytes()),
        pdf_writer::types::SystemInfo {
            registry: pdf_writer::Str(b"Adobe"),
            ordering: pdf_writer::Str(b"Identity"),
            supplement: 0,
        },
    );
    for (&ch, &new_gid) in &char_to_gid {
        cmap.pair(new_gid, ch);
    }
    let cmap_data = cmap.finish();
    pdf.stream(tounicode_ref, cmap_data.as_slice());

    pdf.type0_font(font_ref)
        .base_font(Name(ps_name.as_bytes()))
        .encoding_predefined(Name(b"Identity-H"))
        .descendant_font(cid_font_ref)
        .to_unicode(tounicode_ref);

    Some(char_to_gid)
}
