//! FreeType + HarfBuzz shaping backend for hbshape
//!
//! FreeType loads the font program and fixes the nominal size; HarfBuzz does
//! the layout. A shaper is built once and then shapes any number of strings:
//!
//! ```no_run
//! use hbshape_core::{traits::Shaper, types::Units, ShaperConfig};
//! use hbshape_ft_hb::FtHbShaper;
//!
//! let bytes = std::fs::read("DejaVuSans.ttf")?;
//! let shaper = FtHbShaper::new(bytes, 16, ShaperConfig::with_units(Units::Pixels))?;
//! for pos in shaper.shape_text("Hello")? {
//!     println!("{:.2} {:.2}", pos.x_advance, pos.x_offset);
//! }
//! # Ok::<(), Box<dyn std::error::Error>>(())
//! ```

use std::path::Path;

use freetype::freetype::FT_F26Dot6;

use hbshape_core::{
    error::{HbShapeError, Result, ShapingError},
    traits::Shaper,
    types::{FaceMetrics, GlyphPos, ShapedGlyph, Units},
    FontSource, ShaperConfig,
};

pub mod engine;
mod hb;

pub use engine::{engine_status, FontFace};

use hb::{ShapingFont, TextBuffer};

/// Longest input the shaping engine accepts in one buffer, in bytes
pub const MAX_TEXT_LEN: usize = 0x3FFF_FFFF;

/// A font loaded through FreeType and wrapped for HarfBuzz
///
/// Owns the FreeType face and the HarfBuzz font built over it; both are
/// released when the shaper is dropped. Not `Send`: one shaper stays on the
/// thread that built it, build another shaper per thread instead.
pub struct FtHbShaper {
    // Declared before `face` so it is dropped first.
    font: ShapingFont,
    face: FontFace,
    config: ShaperConfig,
    size: u32,
}

impl FtHbShaper {
    /// Load a font program and prepare it for shaping at `size`
    pub fn new(source: impl Into<FontSource>, size: u32, config: ShaperConfig) -> Result<Self> {
        let source = source.into();
        let char_size = config
            .units
            .char_size(size)
            .filter(|_| size > 0)
            .and_then(|cs| FT_F26Dot6::try_from(cs).ok())
            .ok_or(HbShapeError::InvalidSize(size))?;

        let engine = engine::engine()?;

        log::debug!(
            "Loading face {} (index {}) at size {} ({})",
            source.describe(),
            config.face_index,
            size,
            config.units
        );

        let face = match source {
            FontSource::Bytes(bytes) => engine.open_memory(bytes, config.face_index)?,
            FontSource::Path(path) => engine.open_file(&path, config.face_index)?,
        };
        face.set_char_size(char_size)?;

        // The font picks up the char size set above.
        let font = ShapingFont::from_face(&face)?;

        log::debug!(
            "Shaping font ready: {} glyphs, upem {}",
            font.glyph_count(),
            face.units_per_em()
        );

        Ok(Self {
            font,
            face,
            config,
            size,
        })
    }

    /// Load font bytes with the default config
    pub fn from_bytes(bytes: impl Into<Vec<u8>>, size: u32) -> Result<Self> {
        Self::new(FontSource::Bytes(bytes.into()), size, ShaperConfig::default())
    }

    /// Load a font file with the default config
    pub fn from_file(path: impl AsRef<Path>, size: u32) -> Result<Self> {
        Self::new(
            FontSource::Path(path.as_ref().to_path_buf()),
            size,
            ShaperConfig::default(),
        )
    }

    pub fn config(&self) -> ShaperConfig {
        self.config
    }

    /// Size as requested at construction
    pub fn size(&self) -> u32 {
        self.size
    }

    pub fn units(&self) -> Units {
        self.config.units
    }

    fn shape_with_limit(&self, text: &str, max_len: usize) -> Result<Vec<ShapedGlyph>> {
        if text.is_empty() {
            return Ok(Vec::new());
        }
        if text.len() > max_len {
            return Err(ShapingError::TextTooLong {
                len: text.len(),
                max: max_len,
            }
            .into());
        }

        // Released on every path out of this function.
        let mut buffer = TextBuffer::new(text)?;
        buffer.shape(&self.font);

        let infos = buffer.glyph_infos();
        let positions = buffer.glyph_positions();
        hb::check_shaped(
            text.len(),
            buffer.allocation_successful(),
            infos.len(),
            positions.len(),
        )?;

        log::trace!("Shaped {} bytes into {} glyphs", text.len(), positions.len());

        let units = self.config.units;
        Ok(infos
            .iter()
            .zip(positions)
            .map(|(info, pos)| ShapedGlyph {
                id: info.codepoint,
                cluster: info.cluster,
                pos: GlyphPos::from_fixed(
                    pos.x_advance,
                    pos.y_advance,
                    pos.x_offset,
                    pos.y_offset,
                    units,
                ),
            })
            .collect())
    }
}

impl Shaper for FtHbShaper {
    fn name(&self) -> &'static str {
        "FreeType+HarfBuzz"
    }

    fn shape_glyphs(&self, text: &str) -> Result<Vec<ShapedGlyph>> {
        self.shape_with_limit(text, MAX_TEXT_LEN)
    }

    fn metrics(&self) -> Option<FaceMetrics> {
        let face = &self.face;
        let size = face.size_metrics()?;
        let units = self.config.units;

        Some(FaceMetrics {
            family_name: face.family_name(),
            style_name: face.style_name(),
            units_per_em: face.units_per_em(),
            glyph_count: face.num_glyphs(),
            x_ppem: size.x_ppem,
            y_ppem: size.y_ppem,
            ascender: units.convert(size.ascender),
            descender: units.convert(size.descender),
            height: units.convert(size.height),
            max_advance: units.convert(size.max_advance),
        })
    }
}
