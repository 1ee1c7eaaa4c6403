use pango::prelude::FontMapExt;

use super::GlyphOracle;

// PANGO_GLYPH_EMPTY / PANGO_GLYPH_UNKNOWN_FLAG
const GLYPH_EMPTY: u32 = 0x0FFF_FFFF;
const GLYPH_UNKNOWN_FLAG: u32 = 0x1000_0000;

/// Shapes text with pango and accepts it when it comes out as exactly one
/// real glyph from one font.
///
/// Not `Send`: build it on the thread that queries it.
#[derive(Derivative)]
#[derivative(Debug)]
pub struct PangoOracle {
    font: String,
    #[derivative(Debug = "ignore")]
    layout: pango::Layout,
}

impl PangoOracle {
    /// `font` is a pango font description such as `"Noto Color Emoji 24"`.
    pub fn new(font: &str) -> Option<PangoOracle> {
        let fontmap = pangocairo::FontMap::default()?;
        let context = fontmap.create_context()?;
        context.set_base_dir(pango::Direction::Ltr);
        let desc = pango::FontDescription::from_string(font);
        context.set_font_description(&desc);
        let layout = pango::Layout::new(&context);
        log::debug!("pango oracle using font '{}'", font);
        Some(PangoOracle {
            font: font.to_string(),
            layout,
        })
    }

    pub fn font(&self) -> &str {
        &self.font
    }

    fn shapes_to_single_glyph(&self) -> bool {
        if self.layout.unknown_glyphs_count() > 0 {
            return false;
        }
        let line = match self.layout.line_readonly(0) {
            Some(line) => line,
            None => return false,
        };
        let runs = line.runs();
        // more than one run means font fallback split the sequence
        if runs.len() != 1 {
            return false;
        }
        let glyph_string = runs[0].glyph_string();
        let mut visible = 0;
        for info in glyph_string.glyph_info() {
            let glyph = info.glyph();
            if glyph & GLYPH_UNKNOWN_FLAG != 0 {
                return false;
            }
            // zero width joiners and selectors shape to empty glyphs
            if glyph != GLYPH_EMPTY {
                visible += 1;
            }
        }
        visible == 1
    }
}

impl GlyphOracle for PangoOracle {
    fn can_render(&mut self, text: &str) -> bool {
        if text.is_empty() {
            return false;
        }
        self.layout.set_text(text);
        let renders = self.shapes_to_single_glyph();
        /* release internal layout resources */
        self.layout.set_text("");
        renders
    }
}
