//! hbshape - turn a string into positioned glyphs
//!
//! A thin layer over two native engines: FreeType loads the font and fixes
//! the size, HarfBuzz shapes the text. Build a shaper once per font and size,
//! then call [`Shaper::shape_text`] as often as needed.
//!
//! # Example
//!
//! ```no_run
//! use hbshape::prelude::*;
//!
//! let shaper = hbshape::shaper_from_file("DejaVuSans.ttf", 16)?;
//! let positions = shaper.shape_text("office")?;
//! let (width, _) = hbshape::types::total_advance(&positions);
//! println!("{} glyphs, {width:.1}px wide", positions.len());
//! # Ok::<(), hbshape::HbShapeError>(())
//! ```
//!
//! # Units
//!
//! Positions are reported in pixels by default. Pass
//! [`ShaperConfig::with_units`]`(`[`Units::FixedPoint`]`)` to get the raw
//! 26.6 values instead, with the size given in 26.6 units as well.
//!
//! # Feature Flags
//!
//! - `serde`: `Serialize`/`Deserialize` for the position and metrics types

use std::path::Path;

pub use hbshape_core::{config, error, traits, types, FontSource, ShaperConfig};
pub use hbshape_core::{HbShapeError, Result, Shaper};
pub use hbshape_core::types::{FaceMetrics, GlyphPos, ShapedGlyph, Units};
pub use hbshape_ft_hb::{engine_status, FtHbShaper, MAX_TEXT_LEN};

/// The shaper this crate builds by default
pub type DefaultShaper = FtHbShaper;

/// Build the default shaper from any font source
pub fn shaper(
    source: impl Into<FontSource>,
    size: u32,
    config: ShaperConfig,
) -> Result<DefaultShaper> {
    let shaper = FtHbShaper::new(source, size, config)?;
    log::debug!("Built {} shaper at size {size}", shaper.name());
    Ok(shaper)
}

/// Build the default shaper from font bytes with the default config
pub fn shaper_from_bytes(bytes: impl Into<Vec<u8>>, size: u32) -> Result<DefaultShaper> {
    shaper(FontSource::Bytes(bytes.into()), size, ShaperConfig::default())
}

/// Build the default shaper from a font file with the default config
pub fn shaper_from_file(path: impl AsRef<Path>, size: u32) -> Result<DefaultShaper> {
    shaper(
        FontSource::Path(path.as_ref().to_path_buf()),
        size,
        ShaperConfig::default(),
    )
}

/// Common imports for typical usage
pub mod prelude {
    pub use hbshape_core::{
        error::{HbShapeError, Result},
        traits::Shaper,
        types::{GlyphPos, ShapedGlyph, Units},
        FontSource, ShaperConfig,
    };
}
