//! The contract every shaping backend fulfils
//!
//! A backend owns its font resources and turns text into positioned glyphs.
//! Callers that only care about positions go through [`Shaper::shape_text`];
//! backends that can also report glyph ids and clusters implement
//! [`Shaper::shape_glyphs`] and get `shape_text` for free.

use crate::{
    error::Result,
    types::{FaceMetrics, GlyphPos, ShapedGlyph},
};

/// Where characters become positioned glyphs
///
/// No `Send`/`Sync` bound: native font handles are usually tied to the
/// thread that created them, and one instance must never be shaped on
/// from two threads at once.
///
/// ```ignore
/// struct MyShaper;
///
/// impl Shaper for MyShaper {
///     fn name(&self) -> &'static str {
///         "my-shaper"
///     }
///
///     fn shape_glyphs(&self, text: &str) -> Result<Vec<ShapedGlyph>> {
///         Ok(Vec::new())
///     }
/// }
/// ```
pub trait Shaper {
    /// Identify yourself in logs and error messages
    fn name(&self) -> &'static str;

    /// Shape `text` and report glyph ids, clusters and positions in engine order
    fn shape_glyphs(&self, text: &str) -> Result<Vec<ShapedGlyph>>;

    /// Shape `text` and report one position record per output glyph
    fn shape_text(&self, text: &str) -> Result<Vec<GlyphPos>> {
        Ok(self
            .shape_glyphs(text)?
            .into_iter()
            .map(|glyph| glyph.pos)
            .collect())
    }

    /// Vertical metrics of the face at the configured size
    fn metrics(&self) -> Option<FaceMetrics> {
        None
    }
}
