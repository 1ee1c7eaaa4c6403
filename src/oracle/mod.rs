#[cfg(feature = "pango")]
mod shaper;

use std::panic::{self, AssertUnwindSafe};

#[cfg(feature = "pango")]
pub use self::shaper::PangoOracle;

/// Answers whether the host can show `text` as one coherent glyph cluster,
/// rather than fallback boxes or several unrelated glyphs.
///
/// Supplied by the host; the core only asks.
pub trait GlyphOracle {
    fn can_render(&mut self, text: &str) -> bool;
}

impl<F> GlyphOracle for F
where
    F: FnMut(&str) -> bool,
{
    fn can_render(&mut self, text: &str) -> bool {
        self(text)
    }
}

/// Asks `oracle`, failing closed: a panicking rendering stack never counts
/// as support.
pub(crate) fn query<O: GlyphOracle + ?Sized>(oracle: &mut O, text: &str) -> bool {
    match panic::catch_unwind(AssertUnwindSafe(|| oracle.can_render(text))) {
        Ok(renders) => {
            log::trace!("oracle {:?} -> {}", text, renders);
            renders
        }
        Err(_) => {
            log::warn!("glyph oracle panicked on {:?}, counting as unsupported", text);
            false
        }
    }
}
